use crate::ValidationError;

/// Syntactic bech32 account-address validation. The hub accepts any
/// human-readable prefix; ownership and existence checks belong to the
/// external account ledger.
pub fn validate_address(addr: &str) -> Result<(), ValidationError> {
    let (_hrp, data) =
        bech32::decode(addr).map_err(|_| ValidationError::InvalidRecipient(addr.to_string()))?;
    if data.is_empty() {
        return Err(ValidationError::InvalidRecipient(addr.to_string()));
    }
    Ok(())
}

use cosmwasm_std::Uint128;
use serde_json::Value;
use thiserror::Error;
use tracing::debug;

/// Memo object carrying the early-settlement instruction, e.g.
/// `{"demand": {"fee": "150"}}`.
pub const DEMAND_MEMO_KEY: &str = "demand";
pub const DEMAND_MEMO_FEE: &str = "fee";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum MemoError {
    #[error("fee instruction is not an object")]
    NotAnObject,

    #[error("fee field is missing")]
    MissingFee,

    #[error("fee must be a string")]
    FeeNotAString,

    #[error("invalid fee amount: {0}")]
    InvalidFee(String),
}

/// Extracts the demand-order fee from a transfer memo.
///
/// A memo that is not JSON, not an object, or has no demand instruction is
/// simply not asking for an order. A demand instruction that is present but
/// malformed is an error the sender must hear about.
pub fn parse_fee_memo(memo: &str) -> Result<Option<Uint128>, MemoError> {
    let value: Value = match serde_json::from_str(memo) {
        Ok(value) => value,
        Err(err) => {
            if !memo.is_empty() {
                debug!(%err, "transfer memo is not JSON, skipping demand order");
            }
            return Ok(None);
        }
    };
    let Some(instruction) = value.get(DEMAND_MEMO_KEY) else {
        return Ok(None);
    };

    let object = instruction.as_object().ok_or(MemoError::NotAnObject)?;
    let fee = object.get(DEMAND_MEMO_FEE).ok_or(MemoError::MissingFee)?;
    let fee = fee.as_str().ok_or(MemoError::FeeNotAString)?;
    let fee = fee
        .parse::<Uint128>()
        .map_err(|_| MemoError::InvalidFee(fee.to_string()))?;
    Ok(Some(fee))
}

use crate::ValidationError;

/// Validates a denomination as it appears on a transfer that crossed one or
/// more channels: zero or more `port/channel` trace pairs followed by a base
/// denomination, e.g. `transfer/channel-0/arax`.
///
/// A bare base denomination (no trace) is accepted; a trace with a dangling
/// port and no channel is not.
pub fn validate_prefixed_denom(denom: &str) -> Result<(), ValidationError> {
    let invalid = || ValidationError::InvalidDenom(denom.to_string());

    let segments: Vec<&str> = denom.split('/').collect();
    // Pairs plus a base means the segment count is always odd.
    if segments.len() % 2 == 0 {
        return Err(invalid());
    }

    let base = segments[segments.len() - 1];
    if !is_valid_base_denom(base) {
        return Err(invalid());
    }

    for pair in segments[..segments.len() - 1].chunks(2) {
        if !is_valid_port_id(pair[0]) || !is_valid_channel_id(pair[1]) {
            return Err(invalid());
        }
    }
    Ok(())
}

fn is_valid_base_denom(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() => {}
        _ => return false,
    }
    (3..=128).contains(&s.len())
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, ':' | '.' | '_' | '-'))
}

fn is_valid_port_id(s: &str) -> bool {
    (2..=128).contains(&s.len())
        && s.chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '+' | '-' | '#'))
}

fn is_valid_channel_id(s: &str) -> bool {
    match s.strip_prefix("channel-") {
        Some(n) => !n.is_empty() && n.chars().all(|c| c.is_ascii_digit()),
        None => false,
    }
}

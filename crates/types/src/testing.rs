//! Deterministic fixtures shared by the test suites across the workspace.

use bech32::{Bech32, Hrp};

/// Builds a syntactically valid bech32 account address from a seed byte.
pub fn addr(prefix: &str, seed: u8) -> String {
    let hrp = Hrp::parse(prefix).expect("valid hrp");
    bech32::encode::<Bech32>(hrp, &[seed; 20]).expect("bech32 encode")
}

/// Shorthand for a hub-prefixed address.
pub fn hub_addr(seed: u8) -> String {
    addr("hub", seed)
}

use rollapp_settlement_types::{ErrorClass, PacketStatus};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LedgerError {
    /// The key was derived from a live scan or a tracked order, so a miss
    /// means the index and the records have diverged.
    #[error("packet not found: {key}")]
    NotFound { key: String },

    #[error("packet already resolved: {key} is {status}")]
    AlreadyResolved { key: String, status: PacketStatus },

    #[error("invalid packet transition target: {to}")]
    InvalidTransition { to: PacketStatus },

    #[error("packet is not pending: {key}")]
    NotPending { key: String },

    #[error("packet status hook failed: {0}")]
    HookFailed(#[from] crate::HookError),

    #[error("payload encoding failed: {0}")]
    Encoding(#[from] cosmwasm_std::StdError),
}

impl LedgerError {
    pub fn class(&self) -> ErrorClass {
        match self {
            LedgerError::NotFound { .. } => ErrorClass::Fatal,
            LedgerError::AlreadyResolved { .. } => ErrorClass::Conflict,
            LedgerError::InvalidTransition { .. } => ErrorClass::Conflict,
            LedgerError::NotPending { .. } => ErrorClass::Conflict,
            LedgerError::HookFailed(_) => ErrorClass::Fatal,
            LedgerError::Encoding(_) => ErrorClass::Fatal,
        }
    }
}

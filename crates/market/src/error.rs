use cosmwasm_std::Uint128;
use rollapp_settlement_types::{ErrorClass, OrderStatus, ValidationError};
use thiserror::Error;

use crate::{BankError, FulfillmentHookError};

#[derive(Debug, Error)]
pub enum MarketError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("demand order does not exist: {id}")]
    OrderNotFound { id: String },

    #[error("demand order is not active: {id} is {status}")]
    OrderInactive { id: String, status: OrderStatus },

    #[error("demand order already exists: {id}")]
    OrderExists { id: String },

    #[error("recipient address is blocked: {recipient}")]
    BlockedRecipient { recipient: String },

    #[error("fulfiller account does not exist: {fulfiller}")]
    FulfillerNotFound { fulfiller: String },

    #[error("fulfiller balance too low: has {available} of {denom}, needs {required}")]
    InsufficientBalance {
        fulfiller: String,
        denom: String,
        required: Uint128,
        available: Uint128,
    },

    /// The tracking key came from a live order, so a miss means order and
    /// ledger state have diverged.
    #[error("tracked packet not found: {key}")]
    PacketNotFound { key: String },

    #[error("tracked packet is not pending: {key}")]
    PacketNotPending { key: String },

    #[error("value transfer failed: {0}")]
    Transfer(#[from] BankError),

    #[error("settlement hook failed after fulfillment write: {0}")]
    SettlementHook(#[from] FulfillmentHookError),

    #[error("packet ledger failure: {0}")]
    Ledger(String),
}

impl MarketError {
    pub fn class(&self) -> ErrorClass {
        match self {
            MarketError::Validation(_) => ErrorClass::Validation,
            MarketError::OrderNotFound { .. } => ErrorClass::NotFound,
            MarketError::OrderInactive { .. } => ErrorClass::Conflict,
            MarketError::OrderExists { .. } => ErrorClass::Conflict,
            MarketError::BlockedRecipient { .. } => ErrorClass::Blocked,
            MarketError::FulfillerNotFound { .. } => ErrorClass::NotFound,
            MarketError::InsufficientBalance { .. } => ErrorClass::InsufficientFunds,
            MarketError::PacketNotFound { .. } => ErrorClass::Fatal,
            MarketError::PacketNotPending { .. } => ErrorClass::Conflict,
            MarketError::Transfer(_) => ErrorClass::Conflict,
            MarketError::SettlementHook(_) => ErrorClass::Fatal,
            MarketError::Ledger(_) => ErrorClass::Fatal,
        }
    }
}

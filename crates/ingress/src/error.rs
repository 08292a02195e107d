use cosmwasm_schema::cw_serde;
use rollapp_settlement_market::MarketError;
use rollapp_settlement_types::ErrorClass;
use thiserror::Error;

use crate::{MemoError, StateError};

#[derive(Debug, Error)]
pub enum IngressError {
    #[error("not a fungible transfer payload: {0}")]
    InvalidTransfer(#[from] cosmwasm_std::StdError),

    #[error("rollapp state query failed: {0}")]
    State(#[from] StateError),

    #[error("invalid transfer amount: {0}")]
    InvalidAmount(String),

    #[error("invalid fee instruction: {0}")]
    Memo(#[from] MemoError),

    #[error(transparent)]
    Order(#[from] MarketError),
}

impl IngressError {
    pub fn class(&self) -> ErrorClass {
        match self {
            IngressError::InvalidTransfer(_) => ErrorClass::Validation,
            IngressError::State(_) => ErrorClass::Validation,
            IngressError::InvalidAmount(_) => ErrorClass::Validation,
            IngressError::Memo(_) => ErrorClass::Validation,
            IngressError::Order(err) => err.class(),
        }
    }

    /// The transport-level effect of an ingress failure: a structured
    /// error acknowledgement relayed back to the sender.
    pub fn into_acknowledgement(self) -> Acknowledgement {
        Acknowledgement::Error(self.to_string())
    }
}

/// Minimal transfer acknowledgement shape written back to the transport.
#[cw_serde]
pub enum Acknowledgement {
    Result(cosmwasm_std::Binary),
    Error(String),
}

impl Acknowledgement {
    pub fn success() -> Self {
        Acknowledgement::Result(cosmwasm_std::Binary::from(b"\x01".as_slice()))
    }
}

//! Interfaces this module expects from its collaborators, plus an in-memory
//! bank used by tests and demos.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, RwLock};

use cosmwasm_std::{Coin, Uint128};
use rollapp_settlement_ledger::{LedgerError, PacketLedger};
use rollapp_settlement_types::{PacketKey, PendingPacket};
use thiserror::Error;

use crate::MarketError;

#[derive(Debug, Error)]
pub enum BankError {
    #[error("insufficient spendable funds: {address} holds {available} of {denom}, needs {required}")]
    InsufficientFunds {
        address: String,
        denom: String,
        required: Uint128,
        available: Uint128,
    },

    #[error("transfer rejected: {0}")]
    Rejected(String),
}

/// The external account/bank ledger. Deposits, withdrawals and policy live
/// outside this module; fulfillment only needs these four primitives.
pub trait ExternalLedger: Send + Sync {
    fn spendable_balance(&self, address: &str, denom: &str) -> Uint128;

    /// Atomic single-denomination value transfer.
    fn transfer(&self, from: &str, to: &str, amount: &Coin) -> Result<(), BankError>;

    fn is_blocked(&self, address: &str) -> bool;

    fn account_exists(&self, address: &str) -> bool;
}

/// Read/re-point access to the pending-packet ledger. A lookup relation,
/// never ownership: the marketplace holds keys into the ledger's key space
/// but the ledger knows nothing about orders.
pub trait PacketTracker: Send + Sync {
    fn packet(&self, key: &PacketKey) -> Option<PendingPacket>;

    fn update_recipient(&self, key: &PacketKey, recipient: &str) -> Result<(), MarketError>;
}

impl PacketTracker for PacketLedger {
    fn packet(&self, key: &PacketKey) -> Option<PendingPacket> {
        self.get(key)
    }

    fn update_recipient(&self, key: &PacketKey, recipient: &str) -> Result<(), MarketError> {
        self.update_recipient(key, recipient).map_err(|err| match err {
            LedgerError::NotFound { key } => MarketError::PacketNotFound { key },
            LedgerError::NotPending { key } => MarketError::PacketNotPending { key },
            other => MarketError::Ledger(other.to_string()),
        })
    }
}

/// In-memory [`ExternalLedger`] with explicit accounts, balances and a
/// blocked-address list.
#[derive(Clone, Default)]
pub struct MemoryBank {
    balances: Arc<RwLock<HashMap<(String, String), Uint128>>>,
    accounts: Arc<RwLock<HashSet<String>>>,
    blocked: Arc<RwLock<HashSet<String>>>,
}

impl MemoryBank {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_account(self, address: impl Into<String>) -> Self {
        self.accounts.write().unwrap().insert(address.into());
        self
    }

    pub fn with_balance(self, address: impl Into<String>, coin: Coin) -> Self {
        let address = address.into();
        self.accounts.write().unwrap().insert(address.clone());
        self.balances
            .write()
            .unwrap()
            .insert((address, coin.denom), coin.amount);
        self
    }

    pub fn with_blocked(self, address: impl Into<String>) -> Self {
        self.blocked.write().unwrap().insert(address.into());
        self
    }

    pub fn balance_of(&self, address: &str, denom: &str) -> Uint128 {
        self.spendable_balance(address, denom)
    }
}

impl ExternalLedger for MemoryBank {
    fn spendable_balance(&self, address: &str, denom: &str) -> Uint128 {
        self.balances
            .read()
            .unwrap()
            .get(&(address.to_string(), denom.to_string()))
            .copied()
            .unwrap_or_default()
    }

    fn transfer(&self, from: &str, to: &str, amount: &Coin) -> Result<(), BankError> {
        let mut balances = self.balances.write().unwrap();
        let from_key = (from.to_string(), amount.denom.clone());
        let available = balances.get(&from_key).copied().unwrap_or_default();
        if available < amount.amount {
            return Err(BankError::InsufficientFunds {
                address: from.to_string(),
                denom: amount.denom.clone(),
                required: amount.amount,
                available,
            });
        }
        balances.insert(from_key, available - amount.amount);
        let to_key = (to.to_string(), amount.denom.clone());
        let credited = balances.get(&to_key).copied().unwrap_or_default() + amount.amount;
        balances.insert(to_key, credited);
        Ok(())
    }

    fn is_blocked(&self, address: &str) -> bool {
        self.blocked.read().unwrap().contains(address)
    }

    fn account_exists(&self, address: &str) -> bool {
        self.accounts.read().unwrap().contains(address)
    }
}

//! Interfaces this module expects from the transport/light-client layer,
//! plus an in-memory implementation for tests and demos.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use rollapp_settlement_types::TransferPacket;
use thiserror::Error;

#[derive(Debug, Error)]
#[error("{0}")]
pub struct StateError(String);

impl StateError {
    pub fn new(msg: impl Into<String>) -> Self {
        Self(msg.into())
    }
}

/// Rollapp registry and light-client heights, as seen by the ingress path.
pub trait RollappState: Send + Sync {
    /// Rollapp chain id behind a destination channel, `None` when the
    /// channel does not lead to a tracked rollapp.
    fn rollapp_of_channel(&self, port: &str, channel: &str)
        -> Result<Option<String>, StateError>;

    /// Latest light-client height for the packet's channel, used as a
    /// conservative stand-in for the packet's proof height.
    fn client_height(&self, packet: &TransferPacket) -> Result<u64, StateError>;

    /// Highest finalized height of a rollapp, `None` before the first
    /// state root is accepted.
    fn finalized_height(&self, rollapp_id: &str) -> Option<u64>;
}

/// In-memory [`RollappState`] with explicit channel and height tables.
#[derive(Clone, Default)]
pub struct MemoryState {
    channels: Arc<RwLock<HashMap<(String, String), String>>>,
    client_heights: Arc<RwLock<HashMap<String, u64>>>,
    finalized_heights: Arc<RwLock<HashMap<String, u64>>>,
}

impl MemoryState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_channel(
        self,
        port: impl Into<String>,
        channel: impl Into<String>,
        rollapp_id: impl Into<String>,
    ) -> Self {
        self.channels
            .write()
            .unwrap()
            .insert((port.into(), channel.into()), rollapp_id.into());
        self
    }

    pub fn set_client_height(&self, rollapp_id: impl Into<String>, height: u64) {
        self.client_heights
            .write()
            .unwrap()
            .insert(rollapp_id.into(), height);
    }

    pub fn set_finalized_height(&self, rollapp_id: impl Into<String>, height: u64) {
        self.finalized_heights
            .write()
            .unwrap()
            .insert(rollapp_id.into(), height);
    }
}

impl RollappState for MemoryState {
    fn rollapp_of_channel(
        &self,
        port: &str,
        channel: &str,
    ) -> Result<Option<String>, StateError> {
        Ok(self
            .channels
            .read()
            .unwrap()
            .get(&(port.to_string(), channel.to_string()))
            .cloned())
    }

    fn client_height(&self, packet: &TransferPacket) -> Result<u64, StateError> {
        let rollapp = self
            .rollapp_of_channel(&packet.destination_port, &packet.destination_channel)?
            .ok_or_else(|| StateError::new("no client for channel"))?;
        self.client_heights
            .read()
            .unwrap()
            .get(&rollapp)
            .copied()
            .ok_or_else(|| StateError::new(format!("no client state for {rollapp}")))
    }

    fn finalized_height(&self, rollapp_id: &str) -> Option<u64> {
        self.finalized_heights.read().unwrap().get(rollapp_id).copied()
    }
}

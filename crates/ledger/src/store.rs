use std::collections::BTreeMap;
use std::sync::{Arc, RwLock};

use rollapp_settlement_types::{PacketKey, PacketStatus, PendingPacket};
use tracing::{debug, error, info};

use crate::{LedgerError, MultiPacketHooks, PacketHooks};

/// Indexed store of held transfer packets.
///
/// Keys order by `(rollapp, status, proof height, packet identity)`, so all
/// pending packets of a rollapp form one contiguous, height-ordered run,
/// the shape batch finalization scans. A status transition relocates the
/// record: the old key is deleted, the new key written, and registered
/// hooks are told about the `(old, new)` pair.
///
/// Handles are cheap clones over shared state.
#[derive(Clone, Default)]
pub struct PacketLedger {
    packets: Arc<RwLock<BTreeMap<PacketKey, PendingPacket>>>,
    hooks: Arc<RwLock<Option<MultiPacketHooks>>>,
}

impl PacketLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers the status-change listeners. Callable exactly once;
    /// calling twice is a wiring bug, not a runtime condition.
    pub fn set_hooks(&self, hooks: MultiPacketHooks) {
        let mut slot = self.hooks.write().unwrap();
        if slot.is_some() {
            panic!("packet hooks already registered");
        }
        *slot = Some(hooks);
    }

    /// Stores a packet under its composite key, overwriting any previous
    /// record at the same identity.
    pub fn put(&self, rollapp_id: impl Into<String>, packet: PendingPacket) -> PacketKey {
        let key = PacketKey::new(rollapp_id, packet.status, packet.proof_height, &packet.packet);
        self.packets.write().unwrap().insert(key.clone(), packet);
        debug!(key = %key, "stored rollapp packet");
        key
    }

    pub fn get(&self, key: &PacketKey) -> Option<PendingPacket> {
        self.packets.read().unwrap().get(key).cloned()
    }

    /// Moves a packet to a terminal status, relocating it under the new key
    /// and notifying hooks. A hook failure restores the old record so packet
    /// and dependent state never diverge.
    pub fn update_status(
        &self,
        old_key: &PacketKey,
        new_status: PacketStatus,
    ) -> Result<PacketKey, LedgerError> {
        if !new_status.is_terminal() {
            return Err(LedgerError::InvalidTransition { to: new_status });
        }

        let (new_key, packet) = {
            let mut packets = self.packets.write().unwrap();
            let mut record = packets.remove(old_key).ok_or_else(|| LedgerError::NotFound {
                key: old_key.canonical(),
            })?;
            if record.status.is_terminal() {
                let status = record.status;
                packets.insert(old_key.clone(), record);
                return Err(LedgerError::AlreadyResolved {
                    key: old_key.canonical(),
                    status,
                });
            }

            record.status = new_status;
            let new_key = old_key.with_status(new_status);
            packets.insert(new_key.clone(), record.clone());
            (new_key, record)
        };

        let hooks = self.hooks.read().unwrap();
        if let Some(hooks) = hooks.as_ref() {
            if let Err(err) = hooks.after_packet_status_changed(&packet, old_key, &new_key) {
                error!(old = %old_key, new = %new_key, %err, "status hook failed, rolling back");
                let mut packets = self.packets.write().unwrap();
                packets.remove(&new_key);
                let mut restored = packet;
                restored.status = old_key.status;
                packets.insert(old_key.clone(), restored);
                return Err(err.into());
            }
        }

        info!(old = %old_key, new = %new_key, "rollapp packet resolved");
        Ok(new_key)
    }

    /// Re-points the eventual beneficiary of a packet that is still pending.
    pub fn update_recipient(
        &self,
        key: &PacketKey,
        recipient: &str,
    ) -> Result<(), LedgerError> {
        let mut packets = self.packets.write().unwrap();
        let record = packets.get_mut(key).ok_or_else(|| LedgerError::NotFound {
            key: key.canonical(),
        })?;
        if record.status != PacketStatus::Pending {
            return Err(LedgerError::NotPending {
                key: key.canonical(),
            });
        }
        record.set_receiver(recipient)?;
        Ok(())
    }

    /// Pending packets of a rollapp with proof height at or below `height`,
    /// in the order batch effects must apply: ascending proof height, then
    /// packet identity.
    pub fn scan_pending_up_to(
        &self,
        rollapp_id: &str,
        height: u64,
    ) -> Vec<(PacketKey, PendingPacket)> {
        let start = PacketKey {
            rollapp_id: rollapp_id.to_string(),
            status: PacketStatus::Pending,
            proof_height: 0,
            channel: String::new(),
            sequence: 0,
        };
        self.packets
            .read()
            .unwrap()
            .range(start..)
            .take_while(|(k, _)| {
                k.rollapp_id == rollapp_id
                    && k.status == PacketStatus::Pending
                    && k.proof_height <= height
            })
            .map(|(k, p)| (k.clone(), p.clone()))
            .collect()
    }

    /// Finalizes every pending packet covered by a newly accepted state
    /// root, in scan order. Stops at the first error.
    pub fn finalize_pending_up_to(
        &self,
        rollapp_id: &str,
        height: u64,
    ) -> Result<Vec<PacketKey>, LedgerError> {
        self.resolve_pending_up_to(rollapp_id, height, PacketStatus::Finalized)
    }

    /// Reverts every pending packet covered by a rejected state root.
    pub fn revert_pending_up_to(
        &self,
        rollapp_id: &str,
        height: u64,
    ) -> Result<Vec<PacketKey>, LedgerError> {
        self.resolve_pending_up_to(rollapp_id, height, PacketStatus::Reverted)
    }

    fn resolve_pending_up_to(
        &self,
        rollapp_id: &str,
        height: u64,
        status: PacketStatus,
    ) -> Result<Vec<PacketKey>, LedgerError> {
        let pending = self.scan_pending_up_to(rollapp_id, height);
        let mut resolved = Vec::with_capacity(pending.len());
        for (key, _) in pending {
            resolved.push(self.update_status(&key, status)?);
        }
        Ok(resolved)
    }

    pub fn len(&self) -> usize {
        self.packets.read().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.packets.read().unwrap().is_empty()
    }
}

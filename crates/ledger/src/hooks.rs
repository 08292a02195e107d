use rollapp_settlement_types::{PacketKey, PendingPacket};
use thiserror::Error;

/// Failure raised by a status-change listener. Any hook error aborts the
/// triggering ledger transition as a whole.
#[derive(Debug, Error)]
#[error("{0}")]
pub struct HookError(String);

impl HookError {
    pub fn new(msg: impl Into<String>) -> Self {
        Self(msg.into())
    }
}

/// Notification contract invoked synchronously, exactly once per packet
/// status transition, after the relocated record is written and before the
/// caller observes success.
pub trait PacketHooks: Send + Sync {
    fn after_packet_status_changed(
        &self,
        packet: &PendingPacket,
        old_key: &PacketKey,
        new_key: &PacketKey,
    ) -> Result<(), HookError>;
}

/// Ordered composition of listeners; the first error short-circuits.
#[derive(Default)]
pub struct MultiPacketHooks(Vec<Box<dyn PacketHooks>>);

impl MultiPacketHooks {
    pub fn new(hooks: Vec<Box<dyn PacketHooks>>) -> Self {
        Self(hooks)
    }
}

impl PacketHooks for MultiPacketHooks {
    fn after_packet_status_changed(
        &self,
        packet: &PendingPacket,
        old_key: &PacketKey,
        new_key: &PacketKey,
    ) -> Result<(), HookError> {
        for hook in &self.0 {
            hook.after_packet_status_changed(packet, old_key, new_key)?;
        }
        Ok(())
    }
}

/// Listener that ignores every notification.
pub struct NoopPacketHooks;

impl PacketHooks for NoopPacketHooks {
    fn after_packet_status_changed(
        &self,
        _packet: &PendingPacket,
        _old_key: &PacketKey,
        _new_key: &PacketKey,
    ) -> Result<(), HookError> {
        Ok(())
    }
}

use cosmwasm_schema::cw_serde;

use crate::{PacketStatus, TransferPacket};

/// Composite index key of a held packet:
/// `(rollapp_id, status, proof_height, destination channel, sequence)`.
///
/// The derived ordering is the scan order: all packets of a rollapp in one
/// status, ascending proof height, then packet identity, which is stable
/// insertion order within a height. Status and height are mutable over the
/// record's life, so a status transition relocates the record and reports
/// the `(old, new)` key pair to dependents.
#[cw_serde]
#[derive(Eq, Hash, PartialOrd, Ord)]
pub struct PacketKey {
    pub rollapp_id: String,
    pub status: PacketStatus,
    pub proof_height: u64,
    pub channel: String,
    pub sequence: u64,
}

impl PacketKey {
    pub fn new(
        rollapp_id: impl Into<String>,
        status: PacketStatus,
        proof_height: u64,
        packet: &TransferPacket,
    ) -> Self {
        Self {
            rollapp_id: rollapp_id.into(),
            status,
            proof_height,
            channel: packet.destination_channel.clone(),
            sequence: packet.sequence,
        }
    }

    /// The same identity under a different status.
    pub fn with_status(&self, status: PacketStatus) -> Self {
        Self {
            status,
            ..self.clone()
        }
    }

    /// Canonical string form, also used as the demand-order id. Heights and
    /// sequences are zero-padded so lexicographic order matches key order.
    pub fn canonical(&self) -> String {
        format!(
            "{}/{}/{:020}/{}/{:020}",
            self.rollapp_id, self.status, self.proof_height, self.channel, self.sequence
        )
    }
}

impl std::fmt::Display for PacketKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.canonical())
    }
}

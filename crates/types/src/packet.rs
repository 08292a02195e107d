use cosmwasm_schema::cw_serde;
use cosmwasm_std::{from_json, to_json_binary, Binary, StdError};

/// Lifecycle status of a held transfer packet.
///
/// A packet is created `Pending` and moves to exactly one terminal status:
/// `Finalized` once the rollapp state root covering it is accepted, or
/// `Reverted` if that state root is rejected.
#[cw_serde]
#[derive(Copy, Eq, Hash, PartialOrd, Ord)]
pub enum PacketStatus {
    Pending,
    Finalized,
    Reverted,
}

impl PacketStatus {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, PacketStatus::Pending)
    }

    /// Stable label used in the canonical key encoding.
    pub fn as_str(&self) -> &'static str {
        match self {
            PacketStatus::Pending => "pending",
            PacketStatus::Finalized => "finalized",
            PacketStatus::Reverted => "reverted",
        }
    }
}

impl std::fmt::Display for PacketStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The transport lifecycle event that put the packet on hold.
#[cw_serde]
#[derive(Copy, Eq, Hash)]
pub enum PacketKind {
    OnReceive,
    OnAcknowledge,
    OnTimeout,
}

/// Transport-level packet identity plus its opaque payload.
#[cw_serde]
pub struct TransferPacket {
    pub sequence: u64,
    pub source_port: String,
    pub source_channel: String,
    pub destination_port: String,
    pub destination_channel: String,
    /// Raw payload bytes; decodes as [`TransferData`] for fungible transfers.
    pub data: Binary,
}

impl TransferPacket {
    pub fn transfer_data(&self) -> Result<TransferData, StdError> {
        from_json(&self.data)
    }
}

/// Fungible-transfer payload carried by a [`TransferPacket`].
#[cw_serde]
#[derive(Default)]
pub struct TransferData {
    pub denom: String,
    pub amount: String,
    pub sender: String,
    pub receiver: String,
    #[serde(default)]
    pub memo: String,
}

impl TransferData {
    pub fn to_binary(&self) -> Result<Binary, StdError> {
        to_json_binary(self)
    }
}

/// An inbound transfer held until the originating rollapp state finalizes.
#[cw_serde]
pub struct PendingPacket {
    pub packet: TransferPacket,
    /// Decoded payload, kept in lockstep with `packet.data`.
    pub transfer: TransferData,
    pub status: PacketStatus,
    pub kind: PacketKind,
    /// Light-client height at receipt, a conservative stand-in for the
    /// packet's proof height.
    pub proof_height: u64,
    /// Address of the relayer that submitted the packet.
    pub relayer: String,
    pub acknowledgement: Option<Binary>,
    pub is_timeout: bool,
}

impl PendingPacket {
    pub fn on_receive(
        packet: TransferPacket,
        transfer: TransferData,
        proof_height: u64,
        relayer: impl Into<String>,
    ) -> Self {
        Self {
            packet,
            transfer,
            status: PacketStatus::Pending,
            kind: PacketKind::OnReceive,
            proof_height,
            relayer: relayer.into(),
            acknowledgement: None,
            is_timeout: false,
        }
    }

    pub fn on_acknowledgement(
        packet: TransferPacket,
        transfer: TransferData,
        proof_height: u64,
        relayer: impl Into<String>,
        acknowledgement: Binary,
    ) -> Self {
        Self {
            packet,
            transfer,
            status: PacketStatus::Pending,
            kind: PacketKind::OnAcknowledge,
            proof_height,
            relayer: relayer.into(),
            acknowledgement: Some(acknowledgement),
            is_timeout: false,
        }
    }

    pub fn on_timeout(
        packet: TransferPacket,
        transfer: TransferData,
        proof_height: u64,
        relayer: impl Into<String>,
    ) -> Self {
        Self {
            packet,
            transfer,
            status: PacketStatus::Pending,
            kind: PacketKind::OnTimeout,
            proof_height,
            relayer: relayer.into(),
            acknowledgement: None,
            is_timeout: true,
        }
    }

    /// Re-points the eventual beneficiary of the transfer, keeping the raw
    /// payload and the decoded copy consistent.
    pub fn set_receiver(&mut self, receiver: impl Into<String>) -> Result<(), StdError> {
        self.transfer.receiver = receiver.into();
        self.packet.data = self.transfer.to_binary()?;
        Ok(())
    }
}

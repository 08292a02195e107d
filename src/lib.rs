//! Deferred settlement for rollapp-originated transfers.
//!
//! Inbound transfer packets from a rollapp are held in a pending ledger
//! until the rollapp's state root finalizes on the hub; a demand-order
//! marketplace lets a fulfiller buy the recipient's claim early at a
//! discount. [`Hub`] wires the two stores together and exposes the
//! externally triggerable surface.

pub mod config;
pub mod hub;

pub use config::*;
pub use hub::*;

pub use rollapp_settlement_ingress::{
    Acknowledgement, IngressError, MemoryState, ReceiveOutcome, RollappState, TransferMiddleware,
};
pub use rollapp_settlement_ledger::{
    LedgerError, MultiPacketHooks, PacketHooks, PacketLedger,
};
pub use rollapp_settlement_market::{
    ExternalLedger, MarketError, MarketKeeper, MemoryBank, MultiOrderHooks, OrderHooks,
    OrderReconciler, OrderStore,
};
pub use rollapp_settlement_types::{
    DemandOrder, ErrorClass, FulfillOrder, OrderEvent, OrderStatus, PacketKey, PacketKind,
    PacketStatus, PendingPacket, TransferData, TransferPacket,
};

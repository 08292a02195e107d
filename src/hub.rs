use cosmwasm_std::Binary;
use rollapp_settlement_ingress::{IngressError, ReceiveOutcome, RollappState, TransferMiddleware};
use rollapp_settlement_ledger::{LedgerError, MultiPacketHooks, PacketLedger};
use rollapp_settlement_market::{
    ExternalLedger, MarketError, MarketKeeper, MultiOrderHooks, OrderHooks, OrderReconciler,
    OrderStore,
};
use rollapp_settlement_types::{
    DemandOrder, FulfillOrder, OrderEvent, PacketKey, TransferPacket,
};

use crate::HubConfig;

/// The context object carrying the two stores and every registered
/// listener. Constructed once at process start; the only post-construction
/// mutation of the wiring is [`Hub::set_order_hooks`], which fails fast on
/// a second call.
pub struct Hub<S: RollappState, B: ExternalLedger> {
    ledger: PacketLedger,
    orders: OrderStore,
    market: MarketKeeper<PacketLedger, B>,
    ingress: TransferMiddleware<S>,
}

impl<S: RollappState, B: ExternalLedger> Hub<S, B> {
    pub fn new(config: HubConfig, state: S, bank: B) -> Self {
        let ledger = PacketLedger::new();
        let orders = OrderStore::new();

        // The marketplace reconciler is the only packet-status listener;
        // it keeps order state in lockstep with ledger transitions.
        ledger.set_hooks(MultiPacketHooks::new(vec![Box::new(OrderReconciler::new(
            orders.clone(),
        ))]));

        let market = MarketKeeper::new(orders.clone(), ledger.clone(), bank);
        let ingress = TransferMiddleware::new(
            state,
            ledger.clone(),
            orders.clone(),
            config.rollapps_enabled,
        );
        tracing::info!(
            rollapps_enabled = config.rollapps_enabled,
            "deferred settlement hub wired"
        );

        Self {
            ledger,
            orders,
            market,
            ingress,
        }
    }

    /// Registers settlement-notification listeners, in invocation order.
    pub fn set_order_hooks(&self, hooks: Vec<Box<dyn OrderHooks>>) {
        self.orders.set_hooks(MultiOrderHooks::new(hooks));
    }

    pub fn ledger(&self) -> &PacketLedger {
        &self.ledger
    }

    /* ------------------------------ ingress ------------------------------ */

    pub fn receive(
        &self,
        packet: &TransferPacket,
        relayer: &str,
    ) -> Result<ReceiveOutcome, IngressError> {
        self.ingress.on_recv_packet(packet, relayer)
    }

    pub fn acknowledge(
        &self,
        packet: &TransferPacket,
        acknowledgement: Binary,
        relayer: &str,
    ) -> Result<ReceiveOutcome, IngressError> {
        self.ingress
            .on_acknowledgement_packet(packet, acknowledgement, relayer)
    }

    pub fn timeout(
        &self,
        packet: &TransferPacket,
        relayer: &str,
    ) -> Result<ReceiveOutcome, IngressError> {
        self.ingress.on_timeout_packet(packet, relayer)
    }

    /* ---------------------------- finalization --------------------------- */

    /// State root accepted: resolve every covered pending packet.
    pub fn finalize_rollapp(
        &self,
        rollapp_id: &str,
        height: u64,
    ) -> Result<Vec<PacketKey>, LedgerError> {
        self.ledger.finalize_pending_up_to(rollapp_id, height)
    }

    /// State root rejected: revert every covered pending packet.
    pub fn revert_rollapp(
        &self,
        rollapp_id: &str,
        height: u64,
    ) -> Result<Vec<PacketKey>, LedgerError> {
        self.ledger.revert_pending_up_to(rollapp_id, height)
    }

    /* ----------------------------- marketplace --------------------------- */

    /// The sole externally triggerable state transition besides ingress.
    pub fn fulfill_order(&self, msg: FulfillOrder) -> Result<DemandOrder, MarketError> {
        self.market.fulfill_order(msg)
    }

    pub fn order(&self, id: &str) -> Option<DemandOrder> {
        self.market.orders().order(id)
    }

    /// Diagnostic full listing; not a client-facing query.
    pub fn all_orders(&self) -> Vec<DemandOrder> {
        self.market.orders().all_orders()
    }

    /// Drains the domain events buffered since the last call.
    pub fn take_events(&self) -> Vec<OrderEvent> {
        self.market.orders().take_events()
    }
}

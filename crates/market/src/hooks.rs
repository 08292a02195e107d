use rollapp_settlement_ledger::{HookError, PacketHooks};
use rollapp_settlement_types::{DemandOrder, OrderStatus, PacketKey, PacketStatus, PendingPacket};
use thiserror::Error;
use tracing::debug;

use crate::OrderStore;

/// Failure raised by a settlement listener after an order was marked
/// fulfilled. Fatal by contract: a partially applied fulfillment must not
/// be allowed to commit.
#[derive(Debug, Error)]
#[error("{0}")]
pub struct FulfillmentHookError(String);

impl FulfillmentHookError {
    pub fn new(msg: impl Into<String>) -> Self {
        Self(msg.into())
    }
}

/// Settlement-notification contract, invoked synchronously when an order
/// write transitions it into `Fulfilled`.
pub trait OrderHooks: Send + Sync {
    fn after_order_fulfilled(&self, order: &DemandOrder) -> Result<(), FulfillmentHookError>;
}

/// Ordered composition of listeners; the first error short-circuits.
#[derive(Default)]
pub struct MultiOrderHooks(Vec<Box<dyn OrderHooks>>);

impl MultiOrderHooks {
    pub fn new(hooks: Vec<Box<dyn OrderHooks>>) -> Self {
        Self(hooks)
    }
}

impl OrderHooks for MultiOrderHooks {
    fn after_order_fulfilled(&self, order: &DemandOrder) -> Result<(), FulfillmentHookError> {
        for hook in &self.0 {
            hook.after_order_fulfilled(order)?;
        }
        Ok(())
    }
}

pub struct NoopOrderHooks;

impl OrderHooks for NoopOrderHooks {
    fn after_order_fulfilled(&self, _order: &DemandOrder) -> Result<(), FulfillmentHookError> {
        Ok(())
    }
}

/// Keeps demand orders consistent with packet-status transitions.
///
/// Registered with the packet ledger as a status-change listener. Order
/// identity was fixed against the packet's key at creation, so the lookup
/// always goes through `old_key`.
pub struct OrderReconciler {
    orders: OrderStore,
}

impl OrderReconciler {
    pub fn new(orders: OrderStore) -> Self {
        Self { orders }
    }
}

impl PacketHooks for OrderReconciler {
    fn after_packet_status_changed(
        &self,
        packet: &PendingPacket,
        old_key: &PacketKey,
        new_key: &PacketKey,
    ) -> Result<(), HookError> {
        let order_id = old_key.canonical();
        let Some(mut order) = self.orders.order(&order_id) else {
            // Not every packet carries a demand order.
            debug!(key = %old_key, "no demand order for resolved packet");
            return Ok(());
        };

        order.tracking_packet_key = new_key.clone();
        // A fulfilled claim's settlement is final; the fulfiller already
        // assumed the risk of the packet's eventual outcome.
        if order.status != OrderStatus::Fulfilled {
            match packet.status {
                PacketStatus::Finalized => order.status = OrderStatus::Expired,
                PacketStatus::Reverted => order.status = OrderStatus::Reverted,
                PacketStatus::Pending => {}
            }
        }

        self.orders
            .set_order(order)
            .map_err(|err| HookError::new(err.to_string()))
    }
}

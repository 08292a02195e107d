use cosmwasm_schema::cw_serde;

use crate::{DemandOrder, OrderStatus};

/// Domain event emitted on every demand-order write, for off-process
/// indexers. Carries the order's tracked packet key alongside the pricing
/// fields so an indexer never needs a follow-up lookup.
#[cw_serde]
pub struct OrderEvent {
    pub order_id: String,
    pub packet_key: String,
    pub price: String,
    pub fee: String,
    pub denom: String,
    pub status: OrderStatus,
}

impl From<&DemandOrder> for OrderEvent {
    fn from(order: &DemandOrder) -> Self {
        Self {
            order_id: order.id.clone(),
            packet_key: order.tracking_packet_key.canonical(),
            price: order.price.clone(),
            fee: order.fee.clone(),
            denom: order.denom.clone(),
            status: order.status,
        }
    }
}

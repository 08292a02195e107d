use rollapp_settlement_types::{DemandOrder, FulfillOrder, OrderStatus};
use tracing::info;

use crate::{ExternalLedger, MarketError, OrderStore, PacketTracker};

/// Executes fulfillment requests against the order store, the packet
/// ledger and the external bank.
///
/// All validation happens before the first mutation; afterwards the
/// recipient re-pointing, the value transfer and the status write commit
/// as one logical transaction. A transfer failure unwinds the re-pointing,
/// so a rejected request leaves no trace.
pub struct MarketKeeper<T: PacketTracker, B: ExternalLedger> {
    orders: OrderStore,
    packets: T,
    bank: B,
}

impl<T: PacketTracker, B: ExternalLedger> MarketKeeper<T, B> {
    pub fn new(orders: OrderStore, packets: T, bank: B) -> Self {
        Self {
            orders,
            packets,
            bank,
        }
    }

    pub fn orders(&self) -> &OrderStore {
        &self.orders
    }

    /// The sole externally triggerable marketplace transition: a fulfiller
    /// buys an active order by paying its price to the original recipient,
    /// and the tracked packet's eventual proceeds are re-routed to the
    /// fulfiller.
    pub fn fulfill_order(&self, msg: FulfillOrder) -> Result<DemandOrder, MarketError> {
        msg.validate_basic()?;

        let order = self
            .orders
            .order(&msg.order_id)
            .ok_or(MarketError::OrderNotFound {
                id: msg.order_id.clone(),
            })?;
        if order.status != OrderStatus::Active {
            return Err(MarketError::OrderInactive {
                id: order.id,
                status: order.status,
            });
        }
        if self.bank.is_blocked(&order.recipient) {
            return Err(MarketError::BlockedRecipient {
                recipient: order.recipient,
            });
        }
        if !self.bank.account_exists(&msg.fulfiller) {
            return Err(MarketError::FulfillerNotFound {
                fulfiller: msg.fulfiller,
            });
        }

        let price = order.price_coin()?;
        let available = self.bank.spendable_balance(&msg.fulfiller, &price.denom);
        if available < price.amount {
            return Err(MarketError::InsufficientBalance {
                fulfiller: msg.fulfiller,
                denom: price.denom,
                required: price.amount,
                available,
            });
        }

        let packet =
            self.packets
                .packet(&order.tracking_packet_key)
                .ok_or(MarketError::PacketNotFound {
                    key: order.tracking_packet_key.canonical(),
                })?;
        let original_receiver = packet.transfer.receiver;

        // Re-point the eventual proceeds to the fulfiller while the packet
        // is still pending, pay the recipient, then mark the order.
        self.packets
            .update_recipient(&order.tracking_packet_key, &msg.fulfiller)?;

        if let Err(err) = self.bank.transfer(&msg.fulfiller, &order.recipient, &price) {
            self.packets
                .update_recipient(&order.tracking_packet_key, &original_receiver)?;
            return Err(err.into());
        }

        let mut order = order;
        order.status = OrderStatus::Fulfilled;
        self.orders.set_order(order.clone())?;

        info!(
            id = %order.id,
            fulfiller = %msg.fulfiller,
            price = %order.price,
            "demand order fulfilled"
        );
        Ok(order)
    }
}

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use cosmwasm_std::Uint128;
use rollapp_settlement_types::{
    DemandOrder, OrderEvent, OrderStatus, PacketKey, ValidationError,
};
use tracing::{debug, info};

use crate::{MarketError, MultiOrderHooks, OrderHooks};

/// Owner of all demand-order records.
///
/// Every write re-emits the order's domain event; a write that transitions
/// an order into `Fulfilled` additionally notifies the registered
/// settlement listeners. Handles are cheap clones over shared state.
#[derive(Clone, Default)]
pub struct OrderStore {
    orders: Arc<RwLock<HashMap<String, DemandOrder>>>,
    events: Arc<RwLock<Vec<OrderEvent>>>,
    hooks: Arc<RwLock<Option<MultiOrderHooks>>>,
}

impl OrderStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers the settlement listeners. Callable exactly once; calling
    /// twice is a wiring bug, not a runtime condition.
    pub fn set_hooks(&self, hooks: MultiOrderHooks) {
        let mut slot = self.hooks.write().unwrap();
        if slot.is_some() {
            panic!("order hooks already registered");
        }
        *slot = Some(hooks);
    }

    /// Creates the single demand order for an eligible pending packet.
    /// `price = transfer_amount - fee`; a fee of zero, a fee above the
    /// transfer amount, or a price of zero are all fee-validation failures.
    pub fn create_order(
        &self,
        tracking_packet_key: PacketKey,
        transfer_amount: Uint128,
        fee: Uint128,
        denom: impl Into<String>,
        recipient: impl Into<String>,
    ) -> Result<DemandOrder, MarketError> {
        if fee.is_zero() {
            return Err(ValidationError::InvalidFee.into());
        }
        let price = transfer_amount
            .checked_sub(fee)
            .map_err(|_| ValidationError::InvalidFee)?;
        if price.is_zero() {
            return Err(ValidationError::InvalidFee.into());
        }

        let order = DemandOrder::new(
            tracking_packet_key,
            price.to_string(),
            fee.to_string(),
            denom,
            recipient,
        );
        order.validate_basic()?;

        if self.orders.read().unwrap().contains_key(&order.id) {
            return Err(MarketError::OrderExists {
                id: order.id.clone(),
            });
        }
        self.set_order(order.clone())?;
        info!(id = %order.id, price = %order.price, fee = %order.fee, "demand order created");
        Ok(order)
    }

    pub fn order(&self, id: &str) -> Option<DemandOrder> {
        self.orders.read().unwrap().get(id).cloned()
    }

    /// Every order, id-sorted. Diagnostic surface; not a client query.
    pub fn all_orders(&self) -> Vec<DemandOrder> {
        let mut orders: Vec<DemandOrder> = self.orders.read().unwrap().values().cloned().collect();
        orders.sort_by(|a, b| a.id.cmp(&b.id));
        orders
    }

    /// Writes an order and re-emits its domain event. A write that moves
    /// the stored status into `Fulfilled` triggers the settlement
    /// listeners; their failure is fatal to the enclosing unit.
    pub fn set_order(&self, order: DemandOrder) -> Result<(), MarketError> {
        let newly_fulfilled = {
            let mut orders = self.orders.write().unwrap();
            let prior = orders.insert(order.id.clone(), order.clone());
            order.status == OrderStatus::Fulfilled
                && prior.map_or(true, |p| p.status != OrderStatus::Fulfilled)
        };

        self.events.write().unwrap().push(OrderEvent::from(&order));
        debug!(id = %order.id, status = %order.status, "demand order written");

        if newly_fulfilled {
            let hooks = self.hooks.read().unwrap();
            if let Some(hooks) = hooks.as_ref() {
                hooks.after_order_fulfilled(&order)?;
            }
        }
        Ok(())
    }

    /// Drains the buffered domain events.
    pub fn take_events(&self) -> Vec<OrderEvent> {
        std::mem::take(&mut *self.events.write().unwrap())
    }

    pub fn len(&self) -> usize {
        self.orders.read().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.orders.read().unwrap().is_empty()
    }
}

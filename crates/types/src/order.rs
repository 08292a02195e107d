use cosmwasm_schema::cw_serde;
use cosmwasm_std::{Coin, Uint128};

use crate::{validate_address, validate_prefixed_denom, PacketKey, ValidationError};

/// Marketplace status of a demand order.
///
/// Transitions only move forward: `Active` to exactly one of the others.
/// `Fulfilled` is absorbing; later packet transitions touch only the
/// tracking key, never the status.
#[cw_serde]
#[derive(Copy, Eq, Hash)]
pub enum OrderStatus {
    Active,
    Fulfilled,
    Expired,
    Reverted,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Active => "active",
            OrderStatus::Fulfilled => "fulfilled",
            OrderStatus::Expired => "expired",
            OrderStatus::Reverted => "reverted",
        }
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A purchasable claim on the eventual proceeds of one pending packet.
#[cw_serde]
pub struct DemandOrder {
    /// Canonical key of the originating packet at creation time. Fixed for
    /// the order's life even as the packet itself is relocated.
    pub id: String,
    /// Amount owed to whoever controls the claim: transfer amount minus fee.
    pub price: String,
    /// Discount kept by the party that settles early.
    pub fee: String,
    pub denom: String,
    /// Final beneficiary of the claim.
    pub recipient: String,
    pub status: OrderStatus,
    /// Current key of the tracked packet, updated on every relocation.
    pub tracking_packet_key: PacketKey,
}

impl DemandOrder {
    pub fn new(
        tracking_packet_key: PacketKey,
        price: impl Into<String>,
        fee: impl Into<String>,
        denom: impl Into<String>,
        recipient: impl Into<String>,
    ) -> Self {
        Self {
            id: tracking_packet_key.canonical(),
            price: price.into(),
            fee: fee.into(),
            denom: denom.into(),
            recipient: recipient.into(),
            status: OrderStatus::Active,
            tracking_packet_key,
        }
    }

    /// Stateless validation of the monetary and addressing invariants.
    /// The fee's upper bound (fee <= transfer amount) is enforced where the
    /// price is computed; here both components must simply be positive.
    pub fn validate_basic(&self) -> Result<(), ValidationError> {
        let price = parse_amount(&self.price)?;
        if price.is_zero() {
            return Err(ValidationError::InvalidPrice);
        }
        let fee = parse_amount(&self.fee)?;
        if fee.is_zero() {
            return Err(ValidationError::InvalidFee);
        }
        validate_address(&self.recipient)?;
        validate_prefixed_denom(&self.denom)
    }

    /// The price as a payable coin. Valid orders always convert.
    pub fn price_coin(&self) -> Result<Coin, ValidationError> {
        let amount = parse_amount(&self.price)?;
        Ok(Coin {
            denom: self.denom.clone(),
            amount,
        })
    }
}

/// Request to buy an active demand order.
#[cw_serde]
pub struct FulfillOrder {
    pub order_id: String,
    pub fulfiller: String,
}

impl FulfillOrder {
    pub fn new(order_id: impl Into<String>, fulfiller: impl Into<String>) -> Self {
        Self {
            order_id: order_id.into(),
            fulfiller: fulfiller.into(),
        }
    }

    pub fn validate_basic(&self) -> Result<(), ValidationError> {
        if self.order_id.is_empty() {
            return Err(ValidationError::InvalidOrderId);
        }
        validate_address(&self.fulfiller)
            .map_err(|_| ValidationError::InvalidFulfiller(self.fulfiller.clone()))
    }
}

fn parse_amount(s: &str) -> Result<Uint128, ValidationError> {
    s.parse::<Uint128>()
        .map_err(|_| ValidationError::InvalidAmount(s.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::hub_addr;
    use crate::PacketStatus;

    fn tracking_key() -> PacketKey {
        PacketKey {
            rollapp_id: "rollapp_1-1".to_string(),
            status: PacketStatus::Pending,
            proof_height: 5,
            channel: "channel-0".to_string(),
            sequence: 1,
        }
    }

    fn order(price: &str, fee: &str) -> DemandOrder {
        DemandOrder::new(
            tracking_key(),
            price,
            fee,
            "transfer/channel-0/arax",
            hub_addr(1),
        )
    }

    #[test]
    fn id_is_the_packet_key() {
        let o = order("50", "150");
        assert_eq!(o.id, tracking_key().canonical());
        assert_eq!(o.status, OrderStatus::Active);
    }

    #[test]
    fn valid_order_passes() {
        order("999999850", "150").validate_basic().unwrap();
    }

    #[test]
    fn rejects_non_numeric_amounts() {
        assert_eq!(
            order("-150", "10").validate_basic(),
            Err(ValidationError::InvalidAmount("-150".to_string()))
        );
        assert!(order("10", "abc").validate_basic().is_err());
    }

    #[test]
    fn rejects_zero_components() {
        assert_eq!(
            order("0", "10").validate_basic(),
            Err(ValidationError::InvalidPrice)
        );
        assert_eq!(
            order("10", "0").validate_basic(),
            Err(ValidationError::InvalidFee)
        );
    }

    #[test]
    fn high_fee_is_allowed_when_price_stays_positive() {
        // fee may exceed price; the binding bound is the transfer amount
        order("50", "150").validate_basic().unwrap();
    }

    #[test]
    fn rejects_bad_recipient_and_denom() {
        let mut o = order("50", "10");
        o.recipient = "nope".to_string();
        assert!(matches!(
            o.validate_basic(),
            Err(ValidationError::InvalidRecipient(_))
        ));

        let mut o = order("50", "10");
        o.denom = "transfer/uatom".to_string();
        assert!(matches!(
            o.validate_basic(),
            Err(ValidationError::InvalidDenom(_))
        ));
    }

    #[test]
    fn price_coin_carries_the_order_denom() {
        let coin = order("50", "10").price_coin().unwrap();
        assert_eq!(coin.amount, Uint128::new(50));
        assert_eq!(coin.denom, "transfer/channel-0/arax");
    }

    #[test]
    fn fulfill_message_validation() {
        FulfillOrder::new("some-id", hub_addr(2))
            .validate_basic()
            .unwrap();
        assert_eq!(
            FulfillOrder::new("", hub_addr(2)).validate_basic(),
            Err(ValidationError::InvalidOrderId)
        );
        assert!(matches!(
            FulfillOrder::new("some-id", "bad").validate_basic(),
            Err(ValidationError::InvalidFulfiller(_))
        ));
    }
}

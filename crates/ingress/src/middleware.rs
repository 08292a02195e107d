use cosmwasm_std::Binary;
use rollapp_settlement_ledger::PacketLedger;
use rollapp_settlement_market::OrderStore;
use rollapp_settlement_types::{PacketKey, PendingPacket, TransferData, TransferPacket};
use tracing::debug;

use crate::{parse_fee_memo, IngressError, RollappState};

/// What ingress decided to do with a packet.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ReceiveOutcome {
    /// Not ours to defer: handed to the normal settlement path.
    Forwarded,

    /// Held until the rollapp state covering it finalizes.
    Deferred {
        packet_key: PacketKey,
        /// Id of the demand order, when the transfer carried a fee
        /// instruction.
        order_id: Option<String>,
    },
}

/// Sits between the transport and the normal transfer application. Packets
/// bound for a rollapp whose state is not yet finalized are parked in the
/// packet ledger; everything else passes through untouched.
pub struct TransferMiddleware<S: RollappState> {
    state: S,
    ledger: PacketLedger,
    orders: OrderStore,
    rollapps_enabled: bool,
}

impl<S: RollappState> TransferMiddleware<S> {
    pub fn new(state: S, ledger: PacketLedger, orders: OrderStore, rollapps_enabled: bool) -> Self {
        Self {
            state,
            ledger,
            orders,
            rollapps_enabled,
        }
    }

    /// Inbound transfer. Deferral persists the packet first; a malformed
    /// fee instruction then fails the receive with a structured error
    /// acknowledgement while the packet stays parked.
    pub fn on_recv_packet(
        &self,
        packet: &TransferPacket,
        relayer: &str,
    ) -> Result<ReceiveOutcome, IngressError> {
        let Some((rollapp, transfer, proof_height)) = self.applicability(packet)? else {
            return Ok(ReceiveOutcome::Forwarded);
        };

        let memo = transfer.memo.clone();
        let amount = transfer.amount.clone();
        let denom = transfer.denom.clone();
        let receiver = transfer.receiver.clone();

        let pending = PendingPacket::on_receive(packet.clone(), transfer, proof_height, relayer);
        let packet_key = self.ledger.put(&rollapp, pending);

        let order_id = match parse_fee_memo(&memo)? {
            None => None,
            Some(fee) => {
                let amount = amount
                    .parse::<cosmwasm_std::Uint128>()
                    .map_err(|_| IngressError::InvalidAmount(amount.clone()))?;
                let order = self
                    .orders
                    .create_order(packet_key.clone(), amount, fee, denom, receiver)?;
                Some(order.id)
            }
        };

        Ok(ReceiveOutcome::Deferred {
            packet_key,
            order_id,
        })
    }

    /// Acknowledgement for a transfer we sent towards a rollapp; parked
    /// until finalization like the receive path, carrying the raw
    /// acknowledgement for later propagation.
    pub fn on_acknowledgement_packet(
        &self,
        packet: &TransferPacket,
        acknowledgement: Binary,
        relayer: &str,
    ) -> Result<ReceiveOutcome, IngressError> {
        let Some((rollapp, transfer, proof_height)) = self.applicability(packet)? else {
            return Ok(ReceiveOutcome::Forwarded);
        };

        let pending = PendingPacket::on_acknowledgement(
            packet.clone(),
            transfer,
            proof_height,
            relayer,
            acknowledgement,
        );
        let packet_key = self.ledger.put(&rollapp, pending);
        Ok(ReceiveOutcome::Deferred {
            packet_key,
            order_id: None,
        })
    }

    /// Timeout of a transfer we sent towards a rollapp.
    pub fn on_timeout_packet(
        &self,
        packet: &TransferPacket,
        relayer: &str,
    ) -> Result<ReceiveOutcome, IngressError> {
        let Some((rollapp, transfer, proof_height)) = self.applicability(packet)? else {
            return Ok(ReceiveOutcome::Forwarded);
        };

        let pending = PendingPacket::on_timeout(packet.clone(), transfer, proof_height, relayer);
        let packet_key = self.ledger.put(&rollapp, pending);
        Ok(ReceiveOutcome::Deferred {
            packet_key,
            order_id: None,
        })
    }

    /// Shared applicability ladder: decodes the payload and decides whether
    /// the packet must be held. `None` means the normal path handles it.
    fn applicability(
        &self,
        packet: &TransferPacket,
    ) -> Result<Option<(String, TransferData, u64)>, IngressError> {
        if !self.rollapps_enabled {
            return Ok(None);
        }

        let transfer = packet.transfer_data()?;

        let Some(rollapp) = self
            .state
            .rollapp_of_channel(&packet.destination_port, &packet.destination_channel)?
        else {
            debug!(
                port = %packet.destination_port,
                channel = %packet.destination_channel,
                "skipping transfer for non-rollapp chain"
            );
            return Ok(None);
        };

        let proof_height = self.state.client_height(packet)?;
        if let Some(finalized) = self.state.finalized_height(&rollapp) {
            if finalized >= proof_height {
                debug!(%rollapp, proof_height, finalized, "packet height already finalized");
                return Ok(None);
            }
        }

        Ok(Some((rollapp, transfer, proof_height)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{MemoError, MemoryState};
    use rollapp_settlement_market::MarketError;
    use rollapp_settlement_types::testing::hub_addr;
    use rollapp_settlement_types::{OrderStatus, PacketKind, ValidationError};

    const ROLLAPP: &str = "rollapp_1-1";
    const DENOM: &str = "transfer/channel-0/arax";

    struct Fixture {
        state: MemoryState,
        ledger: PacketLedger,
        orders: OrderStore,
        middleware: TransferMiddleware<MemoryState>,
    }

    fn fixture() -> Fixture {
        let state = MemoryState::new().with_channel("transfer", "channel-0", ROLLAPP);
        state.set_client_height(ROLLAPP, 10);
        let ledger = PacketLedger::new();
        let orders = OrderStore::new();
        let middleware =
            TransferMiddleware::new(state.clone(), ledger.clone(), orders.clone(), true);
        Fixture {
            state,
            ledger,
            orders,
            middleware,
        }
    }

    fn transfer_packet(channel: &str, sequence: u64, amount: &str, memo: &str) -> TransferPacket {
        let transfer = TransferData {
            denom: DENOM.to_string(),
            amount: amount.to_string(),
            sender: "sender".to_string(),
            receiver: hub_addr(1),
            memo: memo.to_string(),
        };
        TransferPacket {
            sequence,
            source_port: "transfer".to_string(),
            source_channel: "channel-7".to_string(),
            destination_port: "transfer".to_string(),
            destination_channel: channel.to_string(),
            data: transfer.to_binary().unwrap(),
        }
    }

    fn demand_memo(fee: &str) -> String {
        format!("{{\"demand\":{{\"fee\":\"{fee}\"}}}}")
    }

    #[test]
    fn plain_transfer_is_deferred_without_an_order() {
        let fx = fixture();
        let outcome = fx
            .middleware
            .on_recv_packet(&transfer_packet("channel-0", 1, "200", ""), "relayer")
            .unwrap();

        let ReceiveOutcome::Deferred {
            packet_key,
            order_id,
        } = outcome
        else {
            panic!("expected deferral");
        };
        assert!(order_id.is_none());
        assert_eq!(packet_key.proof_height, 10);
        assert_eq!(fx.ledger.get(&packet_key).unwrap().kind, PacketKind::OnReceive);
        assert!(fx.orders.is_empty());
    }

    #[test]
    fn fee_instruction_creates_a_priced_order() {
        let fx = fixture();
        let packet = transfer_packet("channel-0", 1, "1000000000", &demand_memo("150"));
        let outcome = fx.middleware.on_recv_packet(&packet, "relayer").unwrap();

        let ReceiveOutcome::Deferred { order_id, .. } = outcome else {
            panic!("expected deferral");
        };
        let order = fx.orders.order(&order_id.unwrap()).unwrap();
        assert_eq!(order.price, "999999850");
        assert_eq!(order.fee, "150");
        assert_eq!(order.status, OrderStatus::Active);
        assert_eq!(order.recipient, hub_addr(1));
    }

    #[test]
    fn non_rollapp_destination_is_forwarded() {
        let fx = fixture();
        let outcome = fx
            .middleware
            .on_recv_packet(&transfer_packet("channel-9", 1, "200", ""), "relayer")
            .unwrap();
        assert_eq!(outcome, ReceiveOutcome::Forwarded);
        assert!(fx.ledger.is_empty());
    }

    #[test]
    fn already_finalized_height_is_forwarded() {
        let fx = fixture();
        fx.state.set_finalized_height(ROLLAPP, 10);
        let outcome = fx
            .middleware
            .on_recv_packet(&transfer_packet("channel-0", 1, "200", ""), "relayer")
            .unwrap();
        assert_eq!(outcome, ReceiveOutcome::Forwarded);
        assert!(fx.ledger.is_empty());
    }

    #[test]
    fn disabled_middleware_forwards_everything() {
        let fx = fixture();
        let middleware =
            TransferMiddleware::new(fx.state.clone(), fx.ledger.clone(), fx.orders.clone(), false);
        let outcome = middleware
            .on_recv_packet(
                &transfer_packet("channel-0", 1, "200", &demand_memo("150")),
                "relayer",
            )
            .unwrap();
        assert_eq!(outcome, ReceiveOutcome::Forwarded);
        assert!(fx.ledger.is_empty());
    }

    #[test]
    fn missing_fee_field_fails_but_packet_stays_parked() {
        let fx = fixture();
        let err = fx
            .middleware
            .on_recv_packet(
                &transfer_packet("channel-0", 1, "200", "{\"demand\":{}}"),
                "relayer",
            )
            .unwrap_err();
        assert!(matches!(err, IngressError::Memo(MemoError::MissingFee)));
        assert_eq!(fx.ledger.len(), 1);
        assert!(fx.orders.is_empty());
    }

    #[test]
    fn negative_fee_fails_validation() {
        let fx = fixture();
        let err = fx
            .middleware
            .on_recv_packet(
                &transfer_packet("channel-0", 1, "1000000000", &demand_memo("-150")),
                "relayer",
            )
            .unwrap_err();
        assert!(matches!(err, IngressError::Memo(MemoError::InvalidFee(_))));
        assert!(fx.orders.is_empty());
    }

    #[test]
    fn fee_above_amount_fails_validation() {
        let fx = fixture();
        let err = fx
            .middleware
            .on_recv_packet(
                &transfer_packet("channel-0", 1, "1000", &demand_memo("1001")),
                "relayer",
            )
            .unwrap_err();
        assert!(matches!(
            err,
            IngressError::Order(MarketError::Validation(ValidationError::InvalidFee))
        ));
        assert!(fx.orders.is_empty());
    }

    #[test]
    fn zero_fee_fails_validation() {
        let fx = fixture();
        let err = fx
            .middleware
            .on_recv_packet(
                &transfer_packet("channel-0", 1, "1", &demand_memo("0")),
                "relayer",
            )
            .unwrap_err();
        assert!(matches!(
            err,
            IngressError::Order(MarketError::Validation(ValidationError::InvalidFee))
        ));
    }

    #[test]
    fn unparseable_amount_fails() {
        let fx = fixture();
        let err = fx
            .middleware
            .on_recv_packet(
                &transfer_packet("channel-0", 1, "lots", &demand_memo("150")),
                "relayer",
            )
            .unwrap_err();
        assert!(matches!(err, IngressError::InvalidAmount(_)));
    }

    #[test]
    fn error_converts_to_error_acknowledgement() {
        let err = IngressError::InvalidAmount("lots".to_string());
        let ack = err.into_acknowledgement();
        assert!(matches!(ack, crate::Acknowledgement::Error(_)));
    }

    #[test]
    fn acknowledgement_path_parks_with_payload() {
        let fx = fixture();
        let packet = transfer_packet("channel-0", 2, "200", "");
        let outcome = fx
            .middleware
            .on_acknowledgement_packet(&packet, Binary::from(b"ok".as_slice()), "relayer")
            .unwrap();

        let ReceiveOutcome::Deferred { packet_key, .. } = outcome else {
            panic!("expected deferral");
        };
        let parked = fx.ledger.get(&packet_key).unwrap();
        assert_eq!(parked.kind, PacketKind::OnAcknowledge);
        assert_eq!(parked.acknowledgement, Some(Binary::from(b"ok".as_slice())));
    }

    #[test]
    fn timeout_path_parks_with_flag() {
        let fx = fixture();
        let packet = transfer_packet("channel-0", 3, "200", "");
        let outcome = fx
            .middleware
            .on_timeout_packet(&packet, "relayer")
            .unwrap();

        let ReceiveOutcome::Deferred { packet_key, .. } = outcome else {
            panic!("expected deferral");
        };
        let parked = fx.ledger.get(&packet_key).unwrap();
        assert_eq!(parked.kind, PacketKind::OnTimeout);
        assert!(parked.is_timeout);
    }

    #[test]
    fn zero_fee_keeps_packet_parked() {
        let fx = fixture();
        let _ = fx.middleware.on_recv_packet(
            &transfer_packet("channel-0", 1, "1", &demand_memo("0")),
            "relayer",
        );
        assert_eq!(fx.ledger.len(), 1);
    }
}

//! # Transfer Application
//!
//! Fungible-token transfer, the deferred handler the hub node runs packets
//! through.
//!
//! Payloads are JSON [`TransferPacketData`]. Balances live in the hub store
//! under [`BALANCE_PREFIX`], so credits are written inside the finalizer's
//! unit of work and vanish with it if the unit is dropped.
//!
//! | Packet type | Effect |
//! |-------------|--------|
//! | `OnRecv` | credit the receiver |
//! | `OnAcknowledgement` (error ack) | refund the sender |
//! | `OnAcknowledgement` (success) | none |
//! | `OnTimeout` | refund the sender |

use hub_01_packet_store::{Acknowledgement, PacketType};
use hub_04_delayed_ack::{DeferredPacketHandler, HandlerError};
use serde::{Deserialize, Serialize};
use shared_types::{decode, encode, KeyValueStore};
use tracing::debug;

/// Module prefix for account balances.
pub const BALANCE_PREFIX: u8 = 0x40;

/// Success acknowledgement body.
pub const SUCCESS_ACK: &[u8] = br#"{"result":"AQ=="}"#;

/// Transfer packet payload.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferPacketData {
    /// Token denomination.
    pub denom: String,
    /// Decimal amount.
    pub amount: String,
    /// Account on the sending side.
    pub sender: String,
    /// Account on the receiving side.
    pub receiver: String,
    /// Error carried by an acknowledgement of a hub-sent transfer.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ack_error: Option<String>,
}

impl TransferPacketData {
    /// Create a payload.
    pub fn new(
        denom: impl Into<String>,
        amount: u128,
        sender: impl Into<String>,
        receiver: impl Into<String>,
    ) -> Self {
        Self {
            denom: denom.into(),
            amount: amount.to_string(),
            sender: sender.into(),
            receiver: receiver.into(),
            ack_error: None,
        }
    }

    /// Mark the payload as an error acknowledgement.
    pub fn with_ack_error(mut self, error: impl Into<String>) -> Self {
        self.ack_error = Some(error.into());
        self
    }

    /// JSON bytes, as carried in a packet.
    pub fn to_bytes(&self) -> Vec<u8> {
        serde_json::to_vec(self).unwrap_or_default()
    }

    fn parse(data: &[u8]) -> Result<(Self, u128), HandlerError> {
        let payload: Self = serde_json::from_slice(data)
            .map_err(|e| HandlerError::MalformedPayload(e.to_string()))?;
        let amount: u128 = payload
            .amount
            .parse()
            .map_err(|_| HandlerError::MalformedPayload(format!("amount {:?}", payload.amount)))?;
        if amount == 0 {
            return Err(HandlerError::Rejected("zero amount".to_string()));
        }
        if payload.denom.is_empty() {
            return Err(HandlerError::Rejected("empty denom".to_string()));
        }
        Ok((payload, amount))
    }
}

/// Store key of one account's balance in one denomination.
pub fn balance_key(account: &str, denom: &str) -> Vec<u8> {
    let mut key = Vec::with_capacity(9 + account.len() + denom.len());
    key.push(BALANCE_PREFIX);
    key.extend_from_slice(&(account.len() as u64).to_be_bytes());
    key.extend_from_slice(account.as_bytes());
    key.extend_from_slice(denom.as_bytes());
    key
}

/// Fungible-token transfer handler.
#[derive(Clone, Copy, Debug, Default)]
pub struct TransferApp;

impl TransferApp {
    /// Create the handler.
    pub fn new() -> Self {
        Self
    }

    /// Balance of `account` in `denom`.
    pub fn balance(
        store: &dyn KeyValueStore,
        account: &str,
        denom: &str,
    ) -> Result<u128, HandlerError> {
        match store.get(&balance_key(account, denom))? {
            Some(bytes) => Ok(decode(&bytes)?),
            None => Ok(0),
        }
    }

    fn credit(
        store: &mut dyn KeyValueStore,
        account: &str,
        denom: &str,
        amount: u128,
    ) -> Result<u128, HandlerError> {
        let balance = Self::balance(store, account, denom)?
            .checked_add(amount)
            .ok_or_else(|| HandlerError::Rejected(format!("balance overflow for {}", account)))?;
        store.put(&balance_key(account, denom), &encode(&balance)?)?;
        Ok(balance)
    }
}

impl DeferredPacketHandler for TransferApp {
    fn handle_finalized_packet(
        &self,
        store: &mut dyn KeyValueStore,
        packet_type: PacketType,
        data: &[u8],
    ) -> Result<Acknowledgement, HandlerError> {
        let (payload, amount) = TransferPacketData::parse(data)?;

        let credited = match (packet_type, &payload.ack_error) {
            (PacketType::OnRecv, _) => Some(&payload.receiver),
            (PacketType::OnAcknowledgement, Some(_)) | (PacketType::OnTimeout, _) => {
                Some(&payload.sender)
            }
            (PacketType::OnAcknowledgement, None) => None,
        };

        if let Some(account) = credited {
            let balance = Self::credit(store, account, &payload.denom, amount)?;
            debug!(
                "[transfer] {} credited {} {} (balance {})",
                account, amount, payload.denom, balance
            );
        }

        Ok(Acknowledgement::Success(SUCCESS_ACK.to_vec()))
    }
}

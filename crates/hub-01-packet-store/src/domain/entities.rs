//! # Domain Entities
//!
//! Rollapp packets and their identity/store keys.

use super::value_objects::{Acknowledgement, PacketStatus, PacketType};
use serde::{Deserialize, Serialize};
use shared_types::{Height, RollappId, Timestamp};
use std::fmt;

/// Module prefix for packet records in the hub store.
pub const PACKET_PREFIX: u8 = 0x10;

/// Stable identity of a packet, independent of its status.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PacketId {
    /// Origin chain.
    pub rollapp_id: RollappId,
    /// Origin height the inclusion proof is anchored to.
    pub proof_height: Height,
    /// Packet sequence on its channel.
    pub sequence: u64,
    /// Deferred handler kind.
    pub packet_type: PacketType,
}

impl PacketId {
    fn encode_into(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(&self.rollapp_id.key_bytes());
        out.extend_from_slice(&self.proof_height.to_be_bytes());
        out.extend_from_slice(&self.sequence.to_be_bytes());
        out.push(self.packet_type.key_byte());
    }
}

impl fmt::Display for PacketId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{}/{}/{}",
            self.rollapp_id, self.proof_height, self.sequence, self.packet_type
        )
    }
}

/// Store key of a packet: its status plus its identity.
///
/// Changes whenever the status changes.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PacketKey {
    /// Status segment of the key.
    pub status: PacketStatus,
    /// Identity segment of the key.
    pub id: PacketId,
}

impl PacketKey {
    /// Build a key.
    pub fn new(status: PacketStatus, id: PacketId) -> Self {
        Self { status, id }
    }

    /// Same identity under another status.
    pub fn with_status(&self, status: PacketStatus) -> Self {
        Self {
            status,
            id: self.id.clone(),
        }
    }

    /// Raw store key.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Self::status_prefix(self.status);
        self.id.encode_into(&mut out);
        out
    }

    /// Parse a raw store key.
    pub fn from_bytes(bytes: &[u8]) -> Option<Self> {
        let (&module, rest) = bytes.split_first()?;
        if module != PACKET_PREFIX {
            return None;
        }
        let (&status_byte, rest) = rest.split_first()?;
        let status = PacketStatus::from_key_byte(status_byte)?;

        let id_len = usize::try_from(u64::from_be_bytes(rest.get(..8)?.try_into().ok()?)).ok()?;
        let rest = rest.get(8..)?;
        let id = std::str::from_utf8(rest.get(..id_len)?).ok()?;
        let rest = rest.get(id_len..)?;
        if rest.len() != 17 {
            return None;
        }
        let proof_height = u64::from_be_bytes(rest[..8].try_into().ok()?);
        let sequence = u64::from_be_bytes(rest[8..16].try_into().ok()?);
        let packet_type = PacketType::from_key_byte(rest[16])?;

        Some(Self {
            status,
            id: PacketId {
                rollapp_id: RollappId::new(id),
                proof_height,
                sequence,
                packet_type,
            },
        })
    }

    /// Prefix of every key with the given status.
    pub fn status_prefix(status: PacketStatus) -> Vec<u8> {
        vec![PACKET_PREFIX, status.key_byte()]
    }

    /// Prefix of every key with the given status and rollapp.
    pub fn rollapp_prefix(status: PacketStatus, rollapp_id: &RollappId) -> Vec<u8> {
        let mut out = Self::status_prefix(status);
        out.extend_from_slice(&rollapp_id.key_bytes());
        out
    }
}

impl fmt::Display for PacketKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.status, self.id)
    }
}

/// One cross-chain packet instance received from a rollapp.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RollappPacket {
    /// Origin chain.
    pub rollapp_id: RollappId,
    /// Deferred handler kind.
    pub packet_type: PacketType,
    /// Origin height the inclusion proof is anchored to.
    pub proof_height: Height,
    /// Packet sequence on its channel.
    pub sequence: u64,
    /// Lifecycle status.
    pub status: PacketStatus,
    /// Opaque payload forwarded unchanged to the deferred handler.
    pub data: Vec<u8>,
    /// Relayer that delivered the packet, if known.
    pub relayer: Option<String>,
    /// Acknowledgement recorded when the deferred handler ran.
    pub acknowledgement: Option<Acknowledgement>,
    /// Handler failure message, if the handler failed.
    pub error: Option<String>,
    /// Hub time of admission.
    pub received_at: Timestamp,
    /// Hub time of the last status change.
    pub status_updated_at: Option<Timestamp>,
}

impl RollappPacket {
    /// Create a new pending packet.
    pub fn new(
        rollapp_id: RollappId,
        packet_type: PacketType,
        proof_height: Height,
        sequence: u64,
        data: Vec<u8>,
    ) -> Self {
        Self {
            rollapp_id,
            packet_type,
            proof_height,
            sequence,
            status: PacketStatus::Pending,
            data,
            relayer: None,
            acknowledgement: None,
            error: None,
            received_at: 0,
            status_updated_at: None,
        }
    }

    /// Set the relayer.
    pub fn with_relayer(mut self, relayer: impl Into<String>) -> Self {
        self.relayer = Some(relayer.into());
        self
    }

    /// Set the admission time.
    pub fn with_received_at(mut self, time: Timestamp) -> Self {
        self.received_at = time;
        self
    }

    /// Stable identity.
    pub fn id(&self) -> PacketId {
        PacketId {
            rollapp_id: self.rollapp_id.clone(),
            proof_height: self.proof_height,
            sequence: self.sequence,
            packet_type: self.packet_type,
        }
    }

    /// Current store key.
    pub fn key(&self) -> PacketKey {
        PacketKey::new(self.status, self.id())
    }
}

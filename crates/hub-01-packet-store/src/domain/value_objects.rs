//! # Domain Value Objects
//!
//! Packet type, status state machine and acknowledgements.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Which deferred handler runs when the packet finalizes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum PacketType {
    /// Inbound packet from the rollapp.
    OnRecv,
    /// Acknowledgement of a packet the hub sent.
    OnAcknowledgement,
    /// Timeout of a packet the hub sent.
    OnTimeout,
}

impl PacketType {
    /// Byte used in store keys.
    pub fn key_byte(&self) -> u8 {
        match self {
            PacketType::OnRecv => 1,
            PacketType::OnAcknowledgement => 2,
            PacketType::OnTimeout => 3,
        }
    }

    /// Inverse of [`PacketType::key_byte`].
    pub fn from_key_byte(byte: u8) -> Option<Self> {
        match byte {
            1 => Some(PacketType::OnRecv),
            2 => Some(PacketType::OnAcknowledgement),
            3 => Some(PacketType::OnTimeout),
            _ => None,
        }
    }
}

impl fmt::Display for PacketType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PacketType::OnRecv => "recv",
            PacketType::OnAcknowledgement => "ack",
            PacketType::OnTimeout => "timeout",
        };
        f.write_str(name)
    }
}

/// Packet lifecycle status.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum PacketStatus {
    /// Admitted, waiting for the origin state to become trustworthy.
    #[default]
    Pending,
    /// Deferred handler ran (successfully or not). Terminal.
    Finalized,
    /// Origin state proven fraudulent, handler never ran. Terminal.
    Reverted,
}

impl PacketStatus {
    /// The legal transition table.
    ///
    /// Only `Pending → Finalized` and `Pending → Reverted` exist.
    pub fn can_transition_to(&self, next: PacketStatus) -> bool {
        matches!(
            (self, next),
            (Self::Pending, Self::Finalized) | (Self::Pending, Self::Reverted)
        )
    }

    /// Check if terminal state.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Finalized | Self::Reverted)
    }

    /// Byte used in store keys.
    pub fn key_byte(&self) -> u8 {
        match self {
            PacketStatus::Pending => 1,
            PacketStatus::Finalized => 2,
            PacketStatus::Reverted => 3,
        }
    }

    /// Inverse of [`PacketStatus::key_byte`].
    pub fn from_key_byte(byte: u8) -> Option<Self> {
        match byte {
            1 => Some(PacketStatus::Pending),
            2 => Some(PacketStatus::Finalized),
            3 => Some(PacketStatus::Reverted),
            _ => None,
        }
    }

    /// All statuses, in key order.
    pub const ALL: [PacketStatus; 3] = [
        PacketStatus::Pending,
        PacketStatus::Finalized,
        PacketStatus::Reverted,
    ];
}

impl fmt::Display for PacketStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PacketStatus::Pending => "pending",
            PacketStatus::Finalized => "finalized",
            PacketStatus::Reverted => "reverted",
        };
        f.write_str(name)
    }
}

/// Acknowledgement produced by the deferred handler.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Acknowledgement {
    /// Application result bytes.
    Success(Vec<u8>),
    /// Error acknowledgement; the side effect was attempted and recorded.
    Error(String),
}

impl Acknowledgement {
    /// Whether this is a success acknowledgement.
    pub fn is_success(&self) -> bool {
        matches!(self, Acknowledgement::Success(_))
    }
}

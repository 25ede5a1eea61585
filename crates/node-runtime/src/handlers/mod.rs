//! # Application Handlers
//!
//! The application side of the delayed-ack finalizer: the deferred packet
//! handler and the status listeners the node registers.

pub mod order_tracking;
pub mod transfer;

pub use order_tracking::{DemandOrder, OrderTrackingHook, ORDER_PREFIX};
pub use transfer::{TransferApp, TransferPacketData, BALANCE_PREFIX};

//! `can-core` library: hardware-independent CAN driver core for `no_std`
//! targets. The crate exposes the receive ring filled from interrupt context,
//! the transmit channel forwarding to a hardware send primitive, and the
//! driver context sequencing a port layer through init/start/stop.
//!
//! Register access, interrupt wiring and bit timing live in a port layer
//! implementing [`transport::traits::can_port::CanPort`].
#![no_std]
//==================================================================================
/// Shared value types: bit rate and lifecycle state.
pub mod core;
/// Driver context: the application-facing entry point.
pub mod driver;
/// Errors for frame construction, lifecycle transitions, overruns and
/// transmit rejections.
pub mod error;
/// Interrupt-safe single-producer/single-consumer receive ring.
pub mod infra;
/// Frames, identifiers, transmit channel and the port-layer traits.
pub mod transport;
//==================================================================================
pub use crate::core::{Bitrate, LifecycleState};
pub use crate::driver::CanDriver;
pub use crate::error::{DriverError, FrameError, QueueFull, WriteRejected};
pub use crate::infra::rx_queue::{RxConsumer, RxProducer, RxQueue};
pub use crate::transport::can_frame::{CanFrame, FrameFlags};
pub use crate::transport::can_id::CanId;
pub use crate::transport::traits::{can_bus::CanBus, can_port::CanPort, tx_primitive::TxPrimitive};
pub use crate::transport::tx_channel::TxChannel;
//==================================================================================

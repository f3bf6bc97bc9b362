//! Error definitions shared across library modules.
//! Each type models one failure scenario: frame construction, a lifecycle
//! transition refused by the port layer, a receive overrun, or a frame the
//! transmit primitive did not accept.
use crate::core::LifecycleState;
use thiserror_no_std::Error;

//==================================================================================FRAME_ERROR
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
/// Errors that can occur while building a CAN identifier or frame.
pub enum FrameError {
    /// The raw identifier does not fit the requested width (11 or 29 bits).
    #[error("Identifier out of range: {raw:#x}")]
    IdOutOfRange { raw: u32 },
    /// Classic CAN carries at most eight payload bytes.
    #[error("Payload too long: {len} bytes")]
    PayloadTooLong { len: usize },
    /// Data length code above eight.
    #[error("Invalid data length code: {dlc}")]
    InvalidDlc { dlc: usize },
}

//==================================================================================DRIVER_ERROR
#[derive(Error, Debug)]
/// Errors returned by the driver context operations.
///
/// Port failures carry the port layer's own error unchanged; the context stays
/// in the state it had before the call.
pub enum DriverError<E: core::fmt::Debug> {
    /// The port layer rejected the device or the requested speed.
    #[error("Port init failed: {0:?}")]
    PortInit(E),
    /// The port layer could not enable reception/transmission.
    #[error("Port start failed: {0:?}")]
    PortStart(E),
    /// The port layer could not quiesce the peripheral.
    #[error("Port stop failed: {0:?}")]
    PortStop(E),
    /// The transmit primitive reported a fault that waiting cannot clear.
    #[error("Transmit failed: {0:?}")]
    Transmit(E),
    /// `read`/`write` called while the context is not started.
    #[error("Operation {operation} not allowed in state {state:?}")]
    InvalidState {
        state: LifecycleState,
        operation: &'static str,
    },
}

//==================================================================================QUEUE_ERROR
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
/// Receive overrun: the queue was full and the incoming frame was dropped.
///
/// Reported to the producer only; the drop is counted and never surfaces as a
/// `read` failure.
#[error("Receive queue full, frame dropped")]
pub struct QueueFull;

//==================================================================================WRITE_ERROR
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
/// The transmit primitive refused a frame.
///
/// `write` turns this into a short count; it is only visible when sending
/// through [`TxChannel::send`](crate::transport::tx_channel::TxChannel::send).
pub enum WriteRejected<E: core::fmt::Debug> {
    /// Every mailbox was busy; the frame can be offered again later.
    #[error("Transmit mailboxes busy")]
    Busy,
    /// The primitive reported a fault.
    #[error("Frame rejected by transmit primitive: {0:?}")]
    Fault(E),
}

impl<E: core::fmt::Debug> From<nb::Error<E>> for WriteRejected<E> {
    fn from(err: nb::Error<E>) -> Self {
        match err {
            nb::Error::WouldBlock => WriteRejected::Busy,
            nb::Error::Other(err) => WriteRejected::Fault(err),
        }
    }
}

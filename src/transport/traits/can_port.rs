//! Capability set a hardware backend provides to the driver core.
//!
//! One implementation exists per peripheral family. It owns register access,
//! interrupt wiring, bit timing, filters and bus-off recovery; the core only
//! sequences its lifecycle calls.
use crate::core::Bitrate;
use crate::infra::rx_queue::RxProducer;
use crate::transport::traits::tx_primitive::TxPrimitive;

/// Lifecycle operations of a CAN peripheral backend.
///
/// `'a` is the lifetime of the receive queue and device descriptor lent to the
/// backend for the whole life of the driver context.
pub trait CanPort<'a> {
    /// Opaque peripheral descriptor (controller index, pin mapping...). The
    /// core passes it through without looking at it.
    type Device: ?Sized;
    /// Backend failure, propagated verbatim by the driver.
    type Error: core::fmt::Debug;
    /// Write primitive handed to the transmit channel. Transmit faults are
    /// reported with the backend's own error type.
    type Tx: TxPrimitive<Error = Self::Error>;

    /// Configure bit timing and filters for `device` at `speed`.
    ///
    /// `rx` is the receive-callback entry point: the backend keeps it and
    /// pushes every received frame into it from interrupt context. On success
    /// the backend returns its write primitive.
    fn init(
        &mut self,
        device: &'a Self::Device,
        speed: Bitrate,
        rx: RxProducer<'a>,
    ) -> Result<Self::Tx, Self::Error>;

    /// Enable reception/transmission interrupts (or DMA).
    fn start(&mut self) -> Result<(), Self::Error>;

    /// Disable interrupts and quiesce the peripheral. Expected to be
    /// idempotent.
    fn stop(&mut self) -> Result<(), Self::Error>;
}

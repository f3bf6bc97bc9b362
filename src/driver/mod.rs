//! Driver context: the single entry point application code uses to run a
//! CAN peripheral through its port layer.
//!
//! ```text
//!           application task                     interrupt context
//!   read ◄── RxConsumer ◄──── RxQueue ◄──── RxProducer ◄── port layer ISR
//!   write ──► TxChannel ──► TxPrimitive (port layer)
//!   init/start/stop ──► CanPort (port layer)
//! ```
//!
//! The context allocates nothing: the receive storage, the queue and the
//! device descriptor are lent by the caller for the lifetime `'a`. Instances
//! share no state, so one context per peripheral can run side by side.
use core::future::poll_fn;
use core::task::Poll;

use crate::core::{Bitrate, LifecycleState};
use crate::error::DriverError;
use crate::infra::rx_queue::{RxConsumer, RxQueue};
use crate::transport::can_frame::CanFrame;
use crate::transport::traits::can_bus::CanBus;
use crate::transport::traits::can_port::CanPort;
use crate::transport::tx_channel::TxChannel;

//==================================================================================CAN_DRIVER
/// One CAN peripheral driven through port layer `P`.
pub struct CanDriver<'a, P: CanPort<'a>> {
    device: &'a P::Device,
    port: P,
    rx: RxConsumer<'a>,
    tx: TxChannel<P::Tx>,
    state: LifecycleState,
}

impl<'a, P: CanPort<'a>> CanDriver<'a, P> {
    /// Wire `queue` to the port layer and configure the hardware.
    ///
    /// The queue is split: its producer goes to [`CanPort::init`] together with
    /// `device` and `speed`, its consumer stays in the context. The port
    /// returns the write primitive the transmit channel forwards to.
    ///
    /// # Errors
    ///
    /// [`DriverError::PortInit`] when the port rejects the device or speed; no
    /// context is created.
    pub fn init(
        mut port: P,
        device: &'a P::Device,
        speed: Bitrate,
        queue: &'a mut RxQueue<'_>,
    ) -> Result<Self, DriverError<P::Error>> {
        let (producer, consumer) = queue.split();

        #[cfg(feature = "defmt")]
        defmt::debug!(
            "CAN init: {} bps, receive capacity {}",
            speed.bits_per_second(),
            consumer.capacity()
        );

        let primitive = port.init(device, speed, producer).map_err(|err| {
            #[cfg(feature = "defmt")]
            defmt::error!("CAN port init failed: {}", defmt::Debug2Format(&err));
            DriverError::PortInit(err)
        })?;

        #[cfg(feature = "defmt")]
        defmt::info!("CAN driver initialized");

        Ok(Self {
            device,
            port,
            rx: consumer,
            tx: TxChannel::new(primitive),
            state: LifecycleState::Initialized,
        })
    }

    /// Enable frame reception and transmission.
    ///
    /// # Errors
    ///
    /// [`DriverError::PortStart`]; the state is left unchanged.
    pub fn start(&mut self) -> Result<(), DriverError<P::Error>> {
        self.port.start().map_err(|err| {
            #[cfg(feature = "defmt")]
            defmt::error!("CAN port start failed: {}", defmt::Debug2Format(&err));
            DriverError::PortStart(err)
        })?;
        self.transition(LifecycleState::Started);
        Ok(())
    }

    /// Disable interrupts and quiesce the peripheral.
    ///
    /// Safe to call repeatedly: every call is delegated to the port layer, and
    /// a port that tolerates repeated stops leaves the context `Stopped`.
    /// Frames still queued stay readable after the next `start`.
    ///
    /// # Errors
    ///
    /// [`DriverError::PortStop`]; the state is left unchanged.
    pub fn stop(&mut self) -> Result<(), DriverError<P::Error>> {
        self.port.stop().map_err(|err| {
            #[cfg(feature = "defmt")]
            defmt::error!("CAN port stop failed: {}", defmt::Debug2Format(&err));
            DriverError::PortStop(err)
        })?;
        self.transition(LifecycleState::Stopped);
        Ok(())
    }

    /// Drain up to `out.len()` received frames, oldest first.
    ///
    /// Returns the number of frames copied; 0 when nothing is queued. Never
    /// waits and never blocks the producer.
    ///
    /// # Errors
    ///
    /// [`DriverError::InvalidState`] unless started; nothing is consumed.
    pub fn read(&mut self, out: &mut [CanFrame]) -> Result<usize, DriverError<P::Error>> {
        self.ensure_running("read")?;
        Ok(self.rx.read_into(out))
    }

    /// Forward `frames` to the hardware, in order, until one is rejected.
    ///
    /// Returns how many were accepted. A short count is the backpressure
    /// signal: the remaining frames were not offered and are left to the
    /// caller. No retry is attempted.
    ///
    /// # Errors
    ///
    /// [`DriverError::InvalidState`] unless started; nothing is sent.
    pub fn write(&mut self, frames: &[CanFrame]) -> Result<usize, DriverError<P::Error>> {
        self.ensure_running("write")?;
        Ok(self.tx.send_all(frames))
    }

    /// Like [`CanDriver::read`], but waits until at least one frame is queued.
    ///
    /// An empty `out` returns `Ok(0)` straight away.
    pub async fn read_async(
        &mut self,
        out: &mut [CanFrame],
    ) -> Result<usize, DriverError<P::Error>> {
        self.ensure_running("read")?;
        if out.is_empty() {
            return Ok(0);
        }

        let rx = &self.rx;
        poll_fn(|cx| {
            if !rx.is_empty() {
                return Poll::Ready(());
            }
            rx.register_waker(cx.waker());
            // Check after the waker is set
            if rx.is_empty() {
                Poll::Pending
            } else {
                Poll::Ready(())
            }
        })
        .await;

        Ok(self.rx.read_into(out))
    }

    /// Like [`CanDriver::write`], but waits while the transmit mailboxes are
    /// busy instead of returning early.
    ///
    /// Returns how many frames were accepted: all of them, or the count before
    /// the first transmit fault (bus-off, disabled peripheral...). The faulty
    /// frame and those after it are left to the caller.
    ///
    /// # Errors
    ///
    /// [`DriverError::InvalidState`] unless started; nothing is sent.
    pub async fn write_async(
        &mut self,
        frames: &[CanFrame],
    ) -> Result<usize, DriverError<P::Error>> {
        self.ensure_running("write")?;
        let mut accepted = 0;
        for frame in frames {
            if self.tx.send_async(frame).await.is_err() {
                break;
            }
            accepted += 1;
        }
        Ok(accepted)
    }

    /// Current lifecycle state.
    #[inline]
    pub fn state(&self) -> LifecycleState {
        self.state
    }

    /// Device descriptor given to `init`.
    #[inline]
    pub fn device(&self) -> &'a P::Device {
        self.device
    }

    /// Frames dropped so far because the receive queue was full.
    #[inline]
    pub fn dropped(&self) -> usize {
        self.rx.dropped()
    }

    /// Frames waiting to be read.
    #[inline]
    pub fn pending(&self) -> usize {
        self.rx.len()
    }

    /// Receive queue capacity, in frames.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.rx.capacity()
    }

    fn ensure_running(&self, operation: &'static str) -> Result<(), DriverError<P::Error>> {
        if self.state.is_running() {
            Ok(())
        } else {
            Err(DriverError::InvalidState {
                state: self.state,
                operation,
            })
        }
    }

    fn transition(&mut self, next: LifecycleState) {
        #[cfg(feature = "defmt")]
        defmt::info!("CAN driver {} -> {}", self.state, next);
        self.state = next;
    }
}

//==================================================================================CAN_BUS
impl<'a, P: CanPort<'a>> CanBus for CanDriver<'a, P> {
    type Error = DriverError<P::Error>;

    async fn send<'b>(&'b mut self, frame: &'b CanFrame) -> Result<(), Self::Error> {
        self.ensure_running("write")?;
        self.tx.send_async(frame).await.map_err(DriverError::Transmit)
    }

    async fn recv(&mut self) -> Result<CanFrame, Self::Error> {
        let mut out = [CanFrame::EMPTY];
        self.read_async(&mut out).await?;
        Ok(out[0])
    }
}

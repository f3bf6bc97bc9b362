//! Transmit channel: forwards outbound frames, one at a time and in caller
//! order, to the write primitive supplied by the port layer.
//!
//! The channel does not buffer. A frame is either accepted by the primitive
//! during the call or reported as rejected; the non-blocking paths never
//! retry. The async path waits out busy mailboxes but gives up on faults.
use core::future::poll_fn;
use core::task::Poll;

use crate::error::WriteRejected;
use crate::transport::can_frame::CanFrame;
use crate::transport::traits::tx_primitive::TxPrimitive;

/// Thin adapter over a [`TxPrimitive`].
pub struct TxChannel<W: TxPrimitive> {
    primitive: W,
}

impl<W: TxPrimitive> TxChannel<W> {
    pub fn new(primitive: W) -> Self {
        Self { primitive }
    }

    /// Forward one frame. A rejection is returned as is, without retry.
    pub fn send(&mut self, frame: &CanFrame) -> Result<(), WriteRejected<W::Error>> {
        self.primitive.try_transmit(frame).map_err(WriteRejected::from)
    }

    /// Forward `frames` in order and stop at the first rejection.
    ///
    /// Returns how many frames the primitive accepted; frames after the
    /// rejected one are not offered at all.
    pub fn send_all(&mut self, frames: &[CanFrame]) -> usize {
        let mut accepted = 0;
        for frame in frames {
            if let Err(_err) = self.send(frame) {
                #[cfg(feature = "defmt")]
                defmt::debug!(
                    "CAN write rejected after {} of {} frames: {}",
                    accepted,
                    frames.len(),
                    defmt::Debug2Format(&_err)
                );
                break;
            }
            accepted += 1;
        }
        accepted
    }

    /// Forward one frame, waiting for [`TxPrimitive::wait_ready`] while every
    /// mailbox is busy.
    ///
    /// # Errors
    ///
    /// The primitive's fault, as soon as it reports one. Faults are not
    /// retried.
    pub async fn send_async(&mut self, frame: &CanFrame) -> Result<(), W::Error> {
        loop {
            match self.primitive.try_transmit(frame) {
                Ok(()) => return Ok(()),
                Err(nb::Error::Other(err)) => {
                    #[cfg(feature = "defmt")]
                    defmt::warn!("CAN transmit fault: {}", defmt::Debug2Format(&err));
                    return Err(err);
                }
                Err(nb::Error::WouldBlock) => {
                    #[cfg(feature = "defmt")]
                    defmt::trace!("CAN mailboxes busy, waiting for hardware");
                    self.primitive.wait_ready().await;
                    // Let other tasks run even when the primitive reports
                    // readiness straight away.
                    yield_now().await;
                }
            }
        }
    }

    /// Access the underlying primitive.
    pub fn primitive(&self) -> &W {
        &self.primitive
    }
}

/// Return `Pending` once, waking immediately.
async fn yield_now() {
    let mut yielded = false;
    poll_fn(|cx| {
        if yielded {
            Poll::Ready(())
        } else {
            yielded = true;
            cx.waker().wake_by_ref();
            Poll::Pending
        }
    })
    .await
}

//! Hardware send primitive used by the transmit channel.
use crate::transport::can_frame::CanFrame;
use futures_util::Future;

/// Hands one frame at a time to the transmit hardware.
pub trait TxPrimitive {
    type Error: core::fmt::Debug;

    /// Try to queue `frame` in a hardware mailbox. Must not block.
    ///
    /// `nb::Error::WouldBlock` means every mailbox is busy and the frame may be
    /// offered again once [`TxPrimitive::wait_ready`] resolves.
    /// `nb::Error::Other` is a fault (bus-off, peripheral disabled...) that
    /// waiting will not clear.
    fn try_transmit(&mut self, frame: &CanFrame) -> nb::Result<(), Self::Error>;

    /// Resolve once the hardware may accept a frame again (typically on the
    /// transmit-complete interrupt). Only used by the async send path.
    ///
    /// The default resolves immediately, which turns the async path into a
    /// polling retry loop that yields to the executor between attempts.
    fn wait_ready<'a>(&'a mut self) -> impl Future<Output = ()> + 'a {
        core::future::ready(())
    }
}

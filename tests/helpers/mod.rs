// Test doubles simulating a CAN peripheral backend (port layer) during
// integration tests.
use can_core::{Bitrate, CanFrame, CanId, CanPort, RxProducer, TxPrimitive};
use std::cell::{Cell, RefCell};
use tokio::sync::Notify;

/// Two controllers on the simulated chip.
pub const CONTROLLER_COUNT: u8 = 2;

#[derive(Debug)]
/// Peripheral descriptor: which controller, which pin set.
pub struct MockDevice {
    pub controller: u8,
    pub pins: (u8, u8),
}

impl MockDevice {
    #[allow(dead_code)]
    pub fn controller(controller: u8) -> Self {
        Self {
            controller,
            pins: (2 * controller, 2 * controller + 1),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[allow(dead_code)]
/// Failures reported by the simulated hardware.
pub enum MockError {
    NoSuchController,
    UnsupportedBitrate,
    AlreadyStarted,
    BusOff,
}

#[allow(dead_code)]
/// Register-level state of the simulated peripheral, shared between the test
/// body (playing the bus and the interrupt handler) and the port.
pub struct MockHardware {
    pub configured: Cell<Option<Bitrate>>,
    /// TX/RX pins routed to the controller by `init`.
    pub routed_pins: Cell<Option<(u8, u8)>>,
    pub started: Cell<bool>,
    pub start_calls: Cell<usize>,
    pub stop_calls: Cell<usize>,
    /// Bus-off: transmissions fault and `stop` fails.
    pub bus_off: Cell<bool>,
    /// Free transmit mailboxes; each accepted frame takes one.
    pub free_mailboxes: Cell<usize>,
    pub tx_attempts: Cell<usize>,
    /// Frames accepted by the transmit mailboxes, in order.
    pub sent: RefCell<Vec<CanFrame>>,
    pub tx_complete: Notify,
}

#[allow(dead_code)]
impl MockHardware {
    pub fn new(free_mailboxes: usize) -> Self {
        Self {
            configured: Cell::new(None),
            routed_pins: Cell::new(None),
            started: Cell::new(false),
            start_calls: Cell::new(0),
            stop_calls: Cell::new(0),
            bus_off: Cell::new(false),
            free_mailboxes: Cell::new(free_mailboxes),
            tx_attempts: Cell::new(0),
            sent: RefCell::new(Vec::new()),
            tx_complete: Notify::new(),
        }
    }

    /// Transmit-complete interrupt: `count` mailboxes become free again.
    pub fn complete_transmissions(&self, count: usize) {
        self.free_mailboxes.set(self.free_mailboxes.get() + count);
        self.tx_complete.notify_one();
    }

    pub fn sent_ids(&self) -> Vec<u32> {
        self.sent.borrow().iter().map(|f| f.raw_id()).collect()
    }
}

/// Slot where the port parks the receive producer handed over by `init`.
/// Tests take it out to play the receive interrupt.
pub type RxSlot<'a> = RefCell<Option<RxProducer<'a>>>;

/// Port layer over [`MockHardware`].
pub struct MockPort<'h, 'a> {
    hw: &'h MockHardware,
    rx: &'h RxSlot<'a>,
}

impl<'h, 'a> MockPort<'h, 'a> {
    #[allow(dead_code)]
    pub fn new(hw: &'h MockHardware, rx: &'h RxSlot<'a>) -> Self {
        Self { hw, rx }
    }
}

impl<'h, 'a> CanPort<'a> for MockPort<'h, 'a> {
    type Device = MockDevice;
    type Error = MockError;
    type Tx = MockTx<'h>;

    fn init(
        &mut self,
        device: &'a MockDevice,
        speed: Bitrate,
        rx: RxProducer<'a>,
    ) -> Result<MockTx<'h>, MockError> {
        if device.controller >= CONTROLLER_COUNT {
            return Err(MockError::NoSuchController);
        }
        if speed.bits_per_second() == 0 || speed > Bitrate::RATE_1M {
            return Err(MockError::UnsupportedBitrate);
        }
        self.hw.configured.set(Some(speed));
        self.hw.routed_pins.set(Some(device.pins));
        *self.rx.borrow_mut() = Some(rx);
        Ok(MockTx { hw: self.hw })
    }

    fn start(&mut self) -> Result<(), MockError> {
        self.hw.start_calls.set(self.hw.start_calls.get() + 1);
        if self.hw.started.get() {
            return Err(MockError::AlreadyStarted);
        }
        self.hw.started.set(true);
        Ok(())
    }

    fn stop(&mut self) -> Result<(), MockError> {
        self.hw.stop_calls.set(self.hw.stop_calls.get() + 1);
        if self.hw.bus_off.get() {
            return Err(MockError::BusOff);
        }
        self.hw.started.set(false);
        Ok(())
    }
}

/// Transmit mailboxes of the simulated peripheral.
pub struct MockTx<'h> {
    hw: &'h MockHardware,
}

impl TxPrimitive for MockTx<'_> {
    type Error = MockError;

    fn try_transmit(&mut self, frame: &CanFrame) -> nb::Result<(), MockError> {
        self.hw.tx_attempts.set(self.hw.tx_attempts.get() + 1);
        if self.hw.bus_off.get() {
            return Err(nb::Error::Other(MockError::BusOff));
        }
        let free = self.hw.free_mailboxes.get();
        if free == 0 {
            return Err(nb::Error::WouldBlock);
        }
        self.hw.free_mailboxes.set(free - 1);
        self.hw.sent.borrow_mut().push(*frame);
        Ok(())
    }

    async fn wait_ready(&mut self) {
        self.hw.tx_complete.notified().await;
    }
}

#[allow(dead_code)]
/// Standard data frame whose single payload byte echoes the identifier.
pub fn frame(id: u16) -> CanFrame {
    CanFrame::new(CanId::Standard(id), &[id as u8]).expect("valid frame")
}

//! Loopback example: a simulated controller whose transmit mailbox feeds its
//! own receive interrupt, the way a CAN peripheral behaves in internal
//! loopback mode. Runs on the host.
//!
//! ```bash
//! cargo run --example loopback
//! ```
use std::sync::atomic::{AtomicBool, Ordering};

use can_core::{
    Bitrate, CanBus, CanDriver, CanFrame, CanId, CanPort, RxProducer, RxQueue, TxPrimitive,
};

#[derive(Debug)]
enum LoopbackError {
    UnsupportedBitrate,
    Disabled,
}

/// Port layer of the simulated controller. `enabled` plays the role of the
/// peripheral's enable bit, shared with the transmit side.
struct LoopbackPort<'a> {
    enabled: &'a AtomicBool,
}

/// Transmit mailbox: every accepted frame is received again straight away.
struct LoopbackTx<'a> {
    enabled: &'a AtomicBool,
    rx: RxProducer<'a>,
}

impl<'a> CanPort<'a> for LoopbackPort<'a> {
    type Device = str;
    type Error = LoopbackError;
    type Tx = LoopbackTx<'a>;

    fn init(
        &mut self,
        device: &'a str,
        speed: Bitrate,
        rx: RxProducer<'a>,
    ) -> Result<LoopbackTx<'a>, LoopbackError> {
        if speed > Bitrate::RATE_1M {
            return Err(LoopbackError::UnsupportedBitrate);
        }
        println!("  [{device}] configured at {} bps", speed.bits_per_second());
        Ok(LoopbackTx {
            enabled: self.enabled,
            rx,
        })
    }

    fn start(&mut self) -> Result<(), LoopbackError> {
        self.enabled.store(true, Ordering::Release);
        Ok(())
    }

    fn stop(&mut self) -> Result<(), LoopbackError> {
        self.enabled.store(false, Ordering::Release);
        Ok(())
    }
}

impl TxPrimitive for LoopbackTx<'_> {
    type Error = LoopbackError;

    fn try_transmit(&mut self, frame: &CanFrame) -> nb::Result<(), LoopbackError> {
        if !self.enabled.load(Ordering::Acquire) {
            return Err(nb::Error::Other(LoopbackError::Disabled));
        }
        // Sent either way; a full receive ring only loses the echo.
        let _ = self.rx.push(*frame);
        Ok(())
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    println!("=== Loopback Example ===\n");

    let mut storage = [CanFrame::EMPTY; 8];
    let mut queue = RxQueue::new(&mut storage);
    let enabled = AtomicBool::new(false);

    let port = LoopbackPort { enabled: &enabled };
    let mut driver = match CanDriver::init(port, "can0", Bitrate::RATE_500K, &mut queue) {
        Ok(driver) => driver,
        Err(err) => {
            println!("init failed: {err}");
            return;
        }
    };

    // 1. The data path stays closed until `start`.
    println!("1. Before start:");
    match driver.write(&[CanFrame::EMPTY]) {
        Ok(count) => println!("  unexpected: {count} frame(s) written"),
        Err(err) => println!("  write refused: {err}"),
    }

    if let Err(err) = driver.start() {
        println!("start failed: {err}");
        return;
    }

    // 2. Blocking write then read. Ten frames into an 8-frame ring: the last
    //    two echoes are dropped and counted.
    println!("\n2. Burst of 10 frames:");
    let burst: Vec<CanFrame> = (0u16..10)
        .filter_map(|i| CanFrame::new(CanId::Standard(0x100 + i), &[i as u8]).ok())
        .collect();
    let written = driver.write(&burst).unwrap_or(0);
    println!("  written: {written}, pending: {}", driver.pending());

    let mut out = [CanFrame::EMPTY; 16];
    let count = driver.read(&mut out).unwrap_or(0);
    for frame in &out[..count] {
        println!("  rx {:?} data={:02X?}", frame.id(), frame.data());
    }
    println!("  dropped: {} of capacity {}", driver.dropped(), driver.capacity());

    // 3. Same controller seen as a `CanBus`.
    println!("\n3. CanBus round trip:");
    let ping = match CanFrame::new(CanId::Extended(0x18EA_FF00), &[0x00, 0xEE, 0x00]) {
        Ok(frame) => frame,
        Err(err) => {
            println!("  bad frame: {err}");
            return;
        }
    };
    let result = match driver.send(&ping).await {
        Ok(()) => driver.recv().await,
        Err(err) => Err(err),
    };
    match result {
        Ok(frame) => println!("  echoed {:?} data={:02X?}", frame.id(), frame.data()),
        Err(err) => println!("  bus error: {err:?}"),
    }

    // 4. Stopping disables the mailbox; queued frames wait for a restart.
    println!("\n4. Stop:");
    match driver.stop() {
        Ok(()) => println!("  state: {:?}", driver.state()),
        Err(err) => println!("  stop failed: {err}"),
    }
}

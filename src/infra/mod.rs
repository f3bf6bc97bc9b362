//! Infrastructure shared by the driver: the interrupt-safe receive ring.
pub mod rx_queue;

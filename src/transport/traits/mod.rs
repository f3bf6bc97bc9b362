//! Abstraction traits at the hardware seam (port layer, transmit primitive)
//! and the async bus interface offered to protocol layers.
pub mod can_bus;
pub mod can_port;
pub mod tx_primitive;

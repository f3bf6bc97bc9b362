//! Frame-level transport: identifiers, the frame value type, the transmit
//! channel and the traits at the port-layer seam.

pub mod can_frame;
pub mod can_id;
pub mod traits;
pub mod tx_channel;

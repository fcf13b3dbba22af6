//! Typed CRC16 framing for robot peripherals.
//!
//! smartlink moves five fixed-layout message kinds (commands, discovery
//! responses, telemetry, settings and bare tagged values) over byte links
//! such as UARTs and radios, one checksummed frame at a time.
//!
//! # Crate Structure
//!
//! - [`frame`]: Records, the frame codec, and blocking/async stream adapters

/// Re-export frame types.
pub mod frame {
    pub use smartlink_frame::*;
}

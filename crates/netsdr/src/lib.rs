//! Client for NetSDR-class networked receivers.
//!
//! # Crate Structure
//!
//! - [`codec`]: Message header packing, encode/decode, sample extraction
//! - [`transport`]: TCP control client and UDP data listener (behind `transport` feature)

/// Re-export codec types.
pub mod codec {
    pub use netsdr_codec::*;
}

/// Re-export transport types (requires `transport` feature).
#[cfg(feature = "transport")]
pub mod transport {
    pub use netsdr_transport::*;
}

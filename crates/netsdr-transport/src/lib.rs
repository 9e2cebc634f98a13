//! Network transports for NetSDR receivers.
//!
//! - [`TcpClient`]: the control connection, delivering the byte stream in
//!   arbitrary chunks
//! - [`UdpListener`]: the data channel, delivering one buffer per datagram
//!
//! Both hand received bytes to the caller as a [`ChunkStream`] whose read loop
//! is stopped through a [`CancellationToken`](tokio_util::sync::CancellationToken).
//! Decoding is left to `netsdr-codec`.

pub mod config;
pub mod error;
pub mod stream;
pub mod tcp;
pub mod udp;

pub use config::TransportConfig;
pub use error::{Result, TransportError};
pub use stream::ChunkStream;
pub use tcp::TcpClient;
pub use udp::UdpListener;
pub use tokio_util::sync::CancellationToken;

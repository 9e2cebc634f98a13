use std::time::Duration;

/// Default time allowed for a TCP connection attempt.
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// Default read size for stream transports: one full data item.
pub const DEFAULT_READ_BUFFER_SIZE: usize = 8194;

/// Largest datagram the UDP listener accepts.
pub const MAX_DATAGRAM_SIZE: usize = 65_535;

/// Default number of received chunks queued before the read loop waits.
pub const DEFAULT_CHANNEL_CAPACITY: usize = 64;

/// Settings shared by the TCP client and UDP listener.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportConfig {
    /// Time allowed for a TCP connect. Default: 5 s.
    pub connect_timeout: Duration,
    /// Bytes requested per TCP read. Default: 8194.
    pub read_buffer_size: usize,
    /// Chunks buffered between the read loop and the consumer. Default: 64.
    pub channel_capacity: usize,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            read_buffer_size: DEFAULT_READ_BUFFER_SIZE,
            channel_capacity: DEFAULT_CHANNEL_CAPACITY,
        }
    }
}

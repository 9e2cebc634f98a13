/// Errors that can occur while encoding messages or reading them from a stream.
#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    /// A caller-supplied argument is outside the range the protocol accepts.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The encoded message would not fit the 13-bit length field.
    #[error("message length {length} exceeds maximum of {max} bytes")]
    LengthExceeded { length: usize, max: usize },

    /// A header on the wire declares a length shorter than the header itself.
    #[error("invalid header length {length} (shorter than the 2-byte header)")]
    InvalidHeader { length: usize },

    /// A message kind or item code name was not recognized.
    #[error("unknown name: {0}")]
    UnknownName(String),

    /// An I/O error occurred while reading or writing messages.
    #[error("codec I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The connection was closed before a complete message was received.
    #[error("connection closed (incomplete message)")]
    ConnectionClosed,
}

/// Why a received buffer did not decode into a valid message.
///
/// Malformed input is expected on the network, so this is carried next to
/// the partially decoded message instead of being raised.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum DecodeFailure {
    /// Fewer than the 2 header bytes were available.
    #[error("buffer too short for a header ({len} bytes)")]
    Truncated { len: usize },

    /// A control-plane message ended before its 2-byte item code.
    #[error("control message is missing its item code")]
    MissingItemCode,

    /// The item code field holds a value this client does not know.
    #[error("unknown item code 0x{0:04X}")]
    UnknownItemCode(u16),

    /// The payload size disagrees with the length in the header.
    #[error("payload length mismatch (header says {expected}, got {actual})")]
    LengthMismatch { expected: isize, actual: usize },
}

pub type Result<T> = std::result::Result<T, CodecError>;

use std::fmt;
use std::io;

use netsdr_codec::{CodecError, DecodeFailure};
use netsdr_transport::TransportError;

pub const SUCCESS: i32 = 0;
pub const FAILURE: i32 = 1;
pub const TRANSPORT_ERROR: i32 = 3;
pub const PERMISSION_DENIED: i32 = 50;
pub const DATA_INVALID: i32 = 60;
pub const USAGE: i32 = 64;
pub const TIMEOUT: i32 = 124;
pub const INTERNAL: i32 = 125;

pub type CliResult<T> = Result<T, CliError>;

#[derive(Debug)]
pub struct CliError {
    pub code: i32,
    pub message: String,
}

impl CliError {
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

pub fn io_error(context: &str, err: io::Error) -> CliError {
    let code = match err.kind() {
        io::ErrorKind::PermissionDenied => PERMISSION_DENIED,
        io::ErrorKind::TimedOut | io::ErrorKind::WouldBlock => TIMEOUT,
        io::ErrorKind::ConnectionRefused
        | io::ErrorKind::ConnectionReset
        | io::ErrorKind::AddrInUse => TRANSPORT_ERROR,
        _ => INTERNAL,
    };
    CliError::new(code, format!("{context}: {err}"))
}

pub fn transport_error(context: &str, err: TransportError) -> CliError {
    match err {
        TransportError::Connect { .. } | TransportError::Bind { .. } => {
            CliError::new(TRANSPORT_ERROR, format!("{context}: {err}"))
        }
        TransportError::Timeout { .. } => CliError::new(TIMEOUT, format!("{context}: {err}")),
        TransportError::Io(source) => io_error(context, source),
        other => CliError::new(TRANSPORT_ERROR, format!("{context}: {other}")),
    }
}

pub fn codec_error(context: &str, err: CodecError) -> CliError {
    match err {
        CodecError::InvalidArgument(_) | CodecError::UnknownName(_) => {
            CliError::new(USAGE, format!("{context}: {err}"))
        }
        CodecError::LengthExceeded { .. } | CodecError::InvalidHeader { .. } => {
            CliError::new(DATA_INVALID, format!("{context}: {err}"))
        }
        CodecError::Io(source) => io_error(context, source),
        CodecError::ConnectionClosed => CliError::new(FAILURE, format!("{context}: {err}")),
    }
}

pub fn decode_failure(context: &str, failure: DecodeFailure) -> CliError {
    CliError::new(DATA_INVALID, format!("{context}: {failure}"))
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    #[test]
    fn codec_errors_map_to_exit_codes() {
        let usage = codec_error("x", CodecError::InvalidArgument("bits".into()));
        assert_eq!(usage.code, USAGE);

        let invalid = codec_error(
            "x",
            CodecError::LengthExceeded {
                length: 9000,
                max: 8191,
            },
        );
        assert_eq!(invalid.code, DATA_INVALID);
        assert!(invalid.message.starts_with("x: message length 9000"));
    }

    #[test]
    fn transport_errors_map_to_exit_codes() {
        let timeout = transport_error(
            "connect failed",
            TransportError::Timeout {
                addr: "10.0.0.1:50000".into(),
                after: Duration::from_secs(5),
            },
        );
        assert_eq!(timeout.code, TIMEOUT);

        let refused = transport_error(
            "send failed",
            TransportError::Io(io::Error::from(io::ErrorKind::ConnectionReset)),
        );
        assert_eq!(refused.code, TRANSPORT_ERROR);

        assert_eq!(
            transport_error("send failed", TransportError::NotConnected).code,
            TRANSPORT_ERROR
        );
    }

    #[test]
    fn decode_failure_is_data_invalid() {
        let err = decode_failure("decode", DecodeFailure::UnknownItemCode(0x1234));
        assert_eq!(err.code, DATA_INVALID);
        assert_eq!(err.message, "decode: unknown item code 0x1234");
    }
}

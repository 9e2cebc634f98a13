use std::io::{ErrorKind, Read};

use bytes::BytesMut;

use crate::codec::{decode, split_message, CodecConfig, Decoded};
use crate::error::{CodecError, Result};
use crate::header::MAX_DATA_ITEM_LENGTH;

const INITIAL_BUFFER_CAPACITY: usize = 2 * MAX_DATA_ITEM_LENGTH;

/// Reads complete messages from any `Read` stream.
///
/// A stream transport hands over arbitrary chunks; the header length is used
/// to cut them back into whole messages before decoding.
pub struct MessageReader<T> {
    inner: T,
    buf: BytesMut,
    config: CodecConfig,
}

impl<T: Read> MessageReader<T> {
    /// Create a new message reader with default configuration.
    pub fn new(inner: T) -> Self {
        Self::with_config(inner, CodecConfig::default())
    }

    /// Create a new message reader with explicit configuration.
    pub fn with_config(inner: T, config: CodecConfig) -> Self {
        Self {
            inner,
            buf: BytesMut::with_capacity(INITIAL_BUFFER_CAPACITY),
            config,
        }
    }

    /// Read and decode the next complete message (blocking).
    ///
    /// Returns `Err(CodecError::ConnectionClosed)` when EOF is reached.
    pub fn read_message(&mut self) -> Result<Decoded> {
        let mut chunk = vec![0u8; self.config.read_chunk_size.max(1)];
        loop {
            if let Some(raw) = split_message(&mut self.buf)? {
                return Ok(decode(&raw));
            }

            let read = match self.inner.read(&mut chunk) {
                Ok(n) => n,
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) => return Err(CodecError::Io(err)),
            };

            if read == 0 {
                return Err(CodecError::ConnectionClosed);
            }

            self.buf.extend_from_slice(&chunk[..read]);
        }
    }

    /// Borrow the underlying stream.
    pub fn get_ref(&self) -> &T {
        &self.inner
    }

    /// Mutably borrow the underlying stream.
    pub fn get_mut(&mut self) -> &mut T {
        &mut self.inner
    }

    /// Consume the reader and return the inner stream.
    pub fn into_inner(self) -> T {
        self.inner
    }

    pub fn config(&self) -> &CodecConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;
    use crate::codec::{write_message, Message};
    use crate::error::DecodeFailure;
    use crate::kind::{ItemCode, MessageKind};

    fn wire(messages: &[Message]) -> Vec<u8> {
        let mut out = Vec::new();
        for message in messages {
            out.extend_from_slice(&message.encode().unwrap());
        }
        out
    }

    #[test]
    fn read_single_message() {
        let bytes = wire(&[Message::control(
            MessageKind::CurrentControlItem,
            ItemCode::ReceiverState,
            &[0x01u8, 0x02][..],
        )]);

        let mut reader = MessageReader::new(Cursor::new(bytes));
        let decoded = reader.read_message().unwrap();

        assert!(decoded.is_valid());
        assert_eq!(decoded.message.item_code, Some(ItemCode::ReceiverState));
        assert_eq!(decoded.message.payload.as_ref(), &[0x01, 0x02]);
    }

    #[test]
    fn read_multiple_messages() {
        let bytes = wire(&[
            Message::control(MessageKind::SetControlItem, ItemCode::ReceiverFrequency, &b"one"[..]),
            Message::control(MessageKind::SetControlItem, ItemCode::RfFilter, &b"two"[..]),
            Message::control(MessageKind::Ack, ItemCode::ReceiverState, &b"three"[..]),
        ]);

        let mut reader = MessageReader::new(Cursor::new(bytes));

        let m1 = reader.read_message().unwrap().message;
        let m2 = reader.read_message().unwrap().message;
        let m3 = reader.read_message().unwrap().message;

        assert_eq!((m1.item_code, m1.payload.as_ref()), (Some(ItemCode::ReceiverFrequency), b"one".as_ref()));
        assert_eq!((m2.item_code, m2.payload.as_ref()), (Some(ItemCode::RfFilter), b"two".as_ref()));
        assert_eq!((m3.kind, m3.payload.as_ref()), (MessageKind::Ack, b"three".as_ref()));
    }

    #[test]
    fn partial_read_handling() {
        let mut bytes = BytesMut::new();
        write_message(MessageKind::DataItem0, None, &[7u8; 300], &mut bytes).unwrap();

        let byte_reader = ByteByByteReader {
            bytes: bytes.to_vec(),
            pos: 0,
        };
        let mut reader = MessageReader::new(byte_reader);

        let decoded = reader.read_message().unwrap();
        assert!(decoded.is_valid());
        assert_eq!(decoded.message.sequence_number, Some(0x0707));
        assert_eq!(decoded.message.payload.len(), 298);
    }

    #[test]
    fn invalid_message_is_returned_not_raised() {
        let bytes = vec![0x06, 0x00, 0xEF, 0xBE, 0x00, 0x00];
        let mut reader = MessageReader::new(Cursor::new(bytes));
        let decoded = reader.read_message().unwrap();
        assert_eq!(decoded.failure(), Some(DecodeFailure::UnknownItemCode(0xBEEF)));
    }

    #[test]
    fn connection_closed_cleanly() {
        let mut reader = MessageReader::new(Cursor::new(Vec::<u8>::new()));
        let err = reader.read_message().unwrap_err();
        assert!(matches!(err, CodecError::ConnectionClosed));
    }

    #[test]
    fn connection_closed_mid_message() {
        let bytes = vec![0x10, 0x00, 0x18, 0x00, 0x01];
        let mut reader = MessageReader::new(Cursor::new(bytes));
        let err = reader.read_message().unwrap_err();
        assert!(matches!(err, CodecError::ConnectionClosed));
    }

    #[test]
    fn invalid_header_in_stream() {
        let mut reader = MessageReader::new(Cursor::new(vec![0x00, 0x00, 0x00]));
        let err = reader.read_message().unwrap_err();
        assert!(matches!(err, CodecError::InvalidHeader { length: 0 }));
    }

    #[test]
    fn small_read_chunks() {
        let bytes = wire(&[
            Message::data(MessageKind::DataItem1, vec![1u8; 40]),
            Message::data(MessageKind::DataItem2, vec![2u8; 40]),
        ]);
        let config = CodecConfig { read_chunk_size: 3 };
        let mut reader = MessageReader::with_config(Cursor::new(bytes), config);

        assert_eq!(reader.read_message().unwrap().message.kind, MessageKind::DataItem1);
        assert_eq!(reader.read_message().unwrap().message.kind, MessageKind::DataItem2);
        assert_eq!(reader.config().read_chunk_size, 3);
    }

    #[derive(Debug)]
    struct ByteByByteReader {
        bytes: Vec<u8>,
        pos: usize,
    }

    impl Read for ByteByByteReader {
        fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
            if self.pos >= self.bytes.len() || buf.is_empty() {
                return Ok(0);
            }

            buf[0] = self.bytes[self.pos];
            self.pos += 1;
            Ok(1)
        }
    }

    #[test]
    fn interrupted_read_retries() {
        let bytes = wire(&[Message::control(
            MessageKind::SetControlItem,
            ItemCode::AdModes,
            &b"ok"[..],
        )]);

        let reader = InterruptedThenData {
            state: 0,
            bytes,
            pos: 0,
        };
        let mut framed = MessageReader::new(reader);
        let decoded = framed.read_message().unwrap();

        assert_eq!(decoded.message.item_code, Some(ItemCode::AdModes));
        assert_eq!(decoded.message.payload.as_ref(), b"ok");
    }

    #[test]
    fn would_block_propagates_io_error() {
        let reader = WouldBlock;
        let mut framed = MessageReader::new(reader);
        let err = framed.read_message().unwrap_err();
        assert!(matches!(err, CodecError::Io(e) if e.kind() == ErrorKind::WouldBlock));
    }

    struct WouldBlock;

    impl Read for WouldBlock {
        fn read(&mut self, _buf: &mut [u8]) -> std::io::Result<usize> {
            Err(std::io::Error::from(ErrorKind::WouldBlock))
        }
    }

    struct InterruptedThenData {
        state: u8,
        bytes: Vec<u8>,
        pos: usize,
    }

    impl Read for InterruptedThenData {
        fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
            if self.state == 0 {
                self.state = 1;
                return Err(std::io::Error::from(ErrorKind::Interrupted));
            }
            if self.pos >= self.bytes.len() {
                return Ok(0);
            }
            let remaining = self.bytes.len() - self.pos;
            let n = remaining.min(buf.len());
            buf[..n].copy_from_slice(&self.bytes[self.pos..self.pos + n]);
            self.pos += n;
            Ok(n)
        }
    }

    #[test]
    fn accessors_and_into_inner() {
        let cursor = Cursor::new(Vec::<u8>::new());
        let mut reader = MessageReader::new(cursor);

        let _ = reader.get_ref();
        let _ = reader.get_mut();
        let _inner = reader.into_inner();
    }
}

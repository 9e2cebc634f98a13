use std::io::{ErrorKind, Write};

use bytes::BytesMut;

use crate::codec::{write_message, Message};
use crate::error::{CodecError, Result};
use crate::header::MAX_DATA_ITEM_LENGTH;
use crate::kind::{ItemCode, MessageKind};

/// Writes complete messages to any `Write` stream.
pub struct MessageWriter<T> {
    inner: T,
    buf: BytesMut,
}

impl<T: Write> MessageWriter<T> {
    pub fn new(inner: T) -> Self {
        Self {
            inner,
            buf: BytesMut::with_capacity(MAX_DATA_ITEM_LENGTH),
        }
    }

    /// Encode and send a control item message (blocking).
    pub fn send_control_item(
        &mut self,
        kind: MessageKind,
        item_code: Option<ItemCode>,
        payload: &[u8],
    ) -> Result<()> {
        self.buf.clear();
        write_message(kind, item_code, payload, &mut self.buf)?;
        self.write_buffered()
    }

    /// Encode and send a data item message (blocking).
    pub fn send_data_item(&mut self, kind: MessageKind, payload: &[u8]) -> Result<()> {
        self.send_control_item(kind, None, payload)
    }

    /// Write a complete message. The sequence number is never written.
    pub fn write_message(&mut self, message: &Message) -> Result<()> {
        self.send_control_item(message.kind, message.outbound_item_code(), &message.payload)
    }

    fn write_buffered(&mut self) -> Result<()> {
        let mut offset = 0usize;
        while offset < self.buf.len() {
            match self.inner.write(&self.buf[offset..]) {
                Ok(0) => return Err(CodecError::ConnectionClosed),
                Ok(n) => offset += n,
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) if err.kind() == ErrorKind::WouldBlock => continue,
                Err(err) => return Err(CodecError::Io(err)),
            }
        }

        self.flush()
    }

    /// Flush the underlying stream.
    pub fn flush(&mut self) -> Result<()> {
        loop {
            match self.inner.flush() {
                Ok(()) => return Ok(()),
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) if err.kind() == ErrorKind::WouldBlock => continue,
                Err(err) => return Err(CodecError::Io(err)),
            }
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

    /// Consume the writer and return the inner stream.
    pub fn into_inner(self) -> T {
        self.inner
    }
}

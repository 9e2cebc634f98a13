use bytes::{BufMut, Bytes, BytesMut};

use crate::error::{CodecError, DecodeFailure, Result};
use crate::header::{Header, HEADER_SIZE, MAX_DATA_ITEM_LENGTH};
use crate::kind::{ItemCode, MessageKind};

/// Size of the item code field in control-plane messages.
pub const ITEM_CODE_SIZE: usize = 2;

/// Size of the sequence number field in data-plane messages.
pub const SEQUENCE_NUMBER_SIZE: usize = 2;

/// A protocol message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub kind: MessageKind,
    /// Control-plane only. `None` is the "no item code" sentinel.
    pub item_code: Option<ItemCode>,
    /// Data-plane only. Written by the device, never by this client.
    pub sequence_number: Option<u16>,
    pub payload: Bytes,
}

impl Message {
    /// Create a control-plane message.
    pub fn control(kind: MessageKind, item_code: ItemCode, payload: impl Into<Bytes>) -> Self {
        Self {
            kind,
            item_code: Some(item_code),
            sequence_number: None,
            payload: payload.into(),
        }
    }

    /// Create a data-plane message.
    pub fn data(kind: MessageKind, payload: impl Into<Bytes>) -> Self {
        Self {
            kind,
            item_code: None,
            sequence_number: None,
            payload: payload.into(),
        }
    }

    fn empty(kind: MessageKind) -> Self {
        Self::data(kind, Bytes::new())
    }

    /// Encode this message for sending.
    ///
    /// Control-plane kinds write the item code; the sequence number is never written.
    pub fn encode(&self) -> Result<Bytes> {
        let mut dst = BytesMut::new();
        write_message(self.kind, self.outbound_item_code(), &self.payload, &mut dst)?;
        Ok(dst.freeze())
    }

    pub(crate) fn outbound_item_code(&self) -> Option<ItemCode> {
        if self.kind.is_control_plane() {
            self.item_code
        } else {
            None
        }
    }
}

/// Outcome of decoding one buffer.
///
/// The message always holds whatever fields could be parsed; `failure`
/// says whether the buffer was a valid message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decoded {
    pub message: Message,
    pub failure: Option<DecodeFailure>,
}

impl Decoded {
    /// Returns true if the buffer decoded without any failure.
    pub fn is_valid(&self) -> bool {
        self.failure.is_none()
    }

    pub fn failure(&self) -> Option<DecodeFailure> {
        self.failure
    }

    /// Discard the partial message on failure.
    pub fn into_result(self) -> std::result::Result<Message, DecodeFailure> {
        match self.failure {
            None => Ok(self.message),
            Some(failure) => Err(failure),
        }
    }
}

/// Encode a control-plane message.
///
/// Wire format:
/// ```text
/// ┌──────────────┬─────────────────┬───────────────┐
/// │ Header (2B)  │ Item code (2B)  │ Payload       │
/// │ kind|length  │ LE, if present  │               │
/// └──────────────┴─────────────────┴───────────────┘
/// ```
pub fn encode_control_item(
    kind: MessageKind,
    item_code: Option<ItemCode>,
    payload: &[u8],
) -> Result<Bytes> {
    let mut dst = BytesMut::new();
    write_message(kind, item_code, payload, &mut dst)?;
    Ok(dst.freeze())
}

/// Encode a data-plane message: header followed by the payload.
pub fn encode_data_item(kind: MessageKind, payload: &[u8]) -> Result<Bytes> {
    encode_control_item(kind, None, payload)
}

/// Append one encoded message to `dst`.
///
/// Nothing is written if the message does not fit the length field.
pub fn write_message(
    kind: MessageKind,
    item_code: Option<ItemCode>,
    payload: &[u8],
    dst: &mut BytesMut,
) -> Result<()> {
    let code_len = if item_code.is_some() { ITEM_CODE_SIZE } else { 0 };
    let header = Header::pack(kind, code_len + payload.len())?;

    dst.reserve(HEADER_SIZE + code_len + payload.len());
    dst.put_u16_le(header);
    if let Some(code) = item_code {
        dst.put_u16_le(code.value());
    }
    dst.put_slice(payload);
    Ok(())
}

/// Decode one complete message from `buffer`.
///
/// Never fails outright: malformed input comes back as a [`Decoded`] with
/// `failure` set and as many fields filled in as could be read.
pub fn decode(buffer: &[u8]) -> Decoded {
    let Some(header) = Header::peek(buffer) else {
        return Decoded {
            message: Message::empty(MessageKind::SetControlItem),
            failure: Some(DecodeFailure::Truncated { len: buffer.len() }),
        };
    };

    let mut message = Message::empty(header.kind);
    let mut failure = None;
    let mut remaining = header.length as isize - HEADER_SIZE as isize;
    let mut rest = &buffer[HEADER_SIZE..];

    if header.kind.is_control_plane() {
        let Some((code, tail)) = rest.split_first_chunk::<ITEM_CODE_SIZE>() else {
            return Decoded {
                message,
                failure: Some(DecodeFailure::MissingItemCode),
            };
        };
        rest = tail;
        remaining -= ITEM_CODE_SIZE as isize;

        let value = u16::from_le_bytes(*code);
        if value != 0 {
            match ItemCode::from_value(value) {
                Some(code) => message.item_code = Some(code),
                None => failure = Some(DecodeFailure::UnknownItemCode(value)),
            }
        }
    } else if let Some((seq, tail)) = rest.split_first_chunk::<SEQUENCE_NUMBER_SIZE>() {
        message.sequence_number = Some(u16::from_le_bytes(*seq));
        rest = tail;
        remaining -= SEQUENCE_NUMBER_SIZE as isize;
    }

    message.payload = Bytes::copy_from_slice(rest);

    if failure.is_none() && rest.len() as isize != remaining {
        failure = Some(DecodeFailure::LengthMismatch {
            expected: remaining,
            actual: rest.len(),
        });
    }

    if let Some(failure) = &failure {
        tracing::trace!(kind = %header.kind, %failure, "message failed to decode");
    }

    Decoded { message, failure }
}

/// Split one complete encoded message off the front of a stream buffer.
///
/// Returns `Ok(None)` if the buffer doesn't contain a complete message yet.
/// On success, the message bytes are removed from `src`.
pub fn split_message(src: &mut BytesMut) -> Result<Option<BytesMut>> {
    let Some(header) = Header::peek(src) else {
        return Ok(None); // Need more data
    };

    if header.length < HEADER_SIZE {
        return Err(CodecError::InvalidHeader {
            length: header.length,
        });
    }

    if src.len() < header.length {
        return Ok(None); // Need more data
    }

    Ok(Some(src.split_to(header.length)))
}

/// Configuration for stream readers.
#[derive(Debug, Clone)]
pub struct CodecConfig {
    /// Bytes requested from the stream per read. Default: one full data item.
    pub read_chunk_size: usize,
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self {
            read_chunk_size: MAX_DATA_ITEM_LENGTH,
        }
    }
}

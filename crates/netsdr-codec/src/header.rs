use crate::error::{CodecError, Result};
use crate::kind::MessageKind;

/// Header size in bytes.
pub const HEADER_SIZE: usize = 2;

/// Largest total length the 13-bit length field can carry.
pub const MAX_MESSAGE_LENGTH: usize = 8191;

/// Total length of a full data item, written on the wire as length 0.
pub const MAX_DATA_ITEM_LENGTH: usize = 8194;

/// Low 13 bits of the header hold the total length.
pub const LENGTH_MASK: u16 = 0x1FFF;

/// High 3 bits of the header hold the message kind.
pub const KIND_SHIFT: u32 = 13;

/// A parsed message header.
///
/// Wire format (little-endian `u16`):
/// ```text
/// ┌────────────┬──────────────────────────────┐
/// │ Kind (3b)  │ Total length (13b)           │
/// │ bits 15-13 │ bits 12-0, header included   │
/// └────────────┴──────────────────────────────┘
/// ```
/// A data-plane header with length 0 stands for [`MAX_DATA_ITEM_LENGTH`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Header {
    pub kind: MessageKind,
    /// Total message length including the header, sentinel already resolved.
    pub length: usize,
}

impl Header {
    /// Build the packed header word for a message whose body (item code and
    /// payload) is `body_length` bytes.
    pub fn pack(kind: MessageKind, body_length: usize) -> Result<u16> {
        let mut total = body_length.saturating_add(HEADER_SIZE);

        if kind.is_data_plane() && total == MAX_DATA_ITEM_LENGTH {
            total = 0;
        }

        if total > MAX_MESSAGE_LENGTH {
            return Err(CodecError::LengthExceeded {
                length: total,
                max: MAX_MESSAGE_LENGTH,
            });
        }

        Ok((total as u16 & LENGTH_MASK) | (u16::from(kind.ordinal()) << KIND_SHIFT))
    }

    /// Parse a header word from its two little-endian bytes.
    pub fn parse(bytes: [u8; HEADER_SIZE]) -> Self {
        let num = u16::from_le_bytes(bytes);
        let kind = MessageKind::from_ordinal((num >> KIND_SHIFT) as u8);
        let mut length = usize::from(num & LENGTH_MASK);

        if kind.is_data_plane() && length == 0 {
            length = MAX_DATA_ITEM_LENGTH;
        }

        Self { kind, length }
    }

    /// Parse the header at the start of `buf`, or `None` if fewer than two
    /// bytes are available.
    pub fn peek(buf: &[u8]) -> Option<Self> {
        buf.first_chunk::<HEADER_SIZE>().map(|bytes| Self::parse(*bytes))
    }
}

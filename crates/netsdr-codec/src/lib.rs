//! Message codec for the NetSDR receiver-control protocol.
//!
//! Every message starts with a 2-byte little-endian header:
//! - 3 bits of message kind
//! - 13 bits of total length, header included
//!
//! Control-plane messages follow the header with a 2-byte item code; data-plane
//! messages from the device carry a 2-byte sequence number instead. Sample
//! payloads are decoded lazily into `i32` values.

pub mod codec;
pub mod error;
#[cfg(feature = "async")]
pub mod framed;
pub mod header;
pub mod kind;
pub mod reader;
pub mod samples;
pub mod writer;

pub use codec::{
    decode, encode_control_item, encode_data_item, split_message, write_message, CodecConfig,
    Decoded, Message, ITEM_CODE_SIZE, SEQUENCE_NUMBER_SIZE,
};
pub use error::{CodecError, DecodeFailure, Result};
#[cfg(feature = "async")]
pub use framed::NetSdrCodec;
pub use header::{Header, HEADER_SIZE, MAX_DATA_ITEM_LENGTH, MAX_MESSAGE_LENGTH};
pub use kind::{ItemCode, MessageKind};
pub use reader::MessageReader;
pub use samples::{samples, Samples};
pub use writer::MessageWriter;

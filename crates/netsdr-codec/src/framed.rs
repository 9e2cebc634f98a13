//! `tokio_util::codec` adapter for async stream transports.

use bytes::BytesMut;
use tokio_util::codec::{Decoder, Encoder};

use crate::codec::{decode, split_message, write_message, Decoded, Message};
use crate::error::CodecError;

/// Splits a byte stream into messages and decodes them; encodes outbound
/// messages.
#[derive(Debug, Clone, Copy, Default)]
pub struct NetSdrCodec;

impl NetSdrCodec {
    pub fn new() -> Self {
        Self
    }
}

impl Decoder for NetSdrCodec {
    type Item = Decoded;
    type Error = CodecError;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        Ok(split_message(src)?.map(|raw| decode(&raw)))
    }
}

impl Encoder<&Message> for NetSdrCodec {
    type Error = CodecError;

    fn encode(&mut self, item: &Message, dst: &mut BytesMut) -> Result<(), Self::Error> {
        write_message(item.kind, item.outbound_item_code(), &item.payload, dst)
    }
}

impl Encoder<Message> for NetSdrCodec {
    type Error = CodecError;

    fn encode(&mut self, item: Message, dst: &mut BytesMut) -> Result<(), Self::Error> {
        <Self as Encoder<&Message>>::encode(self, &item, dst)
    }
}

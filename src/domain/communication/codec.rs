use crate::domain::communication::protocol::Envelope;
use bytes::BytesMut;
use std::io;
use tokio_util::codec::{Decoder, Encoder, LengthDelimitedCodec};

/// Upper bound for a single frame. Large clusters produce big node maps, but
/// anything beyond this is treated as a corrupt stream.
pub const MAX_FRAME_LENGTH: usize = 16 * 1024 * 1024;

/// Combines LengthDelimitedCodec (TCP framing) with Bincode (Serialization).
pub struct ExpanderCodec {
    codec: LengthDelimitedCodec,
}

impl ExpanderCodec {
    pub fn new() -> Self {
        Self { codec: LengthDelimitedCodec::builder().max_frame_length(MAX_FRAME_LENGTH).new_codec() }
    }
}

impl Default for ExpanderCodec {
    fn default() -> Self {
        Self::new()
    }
}

impl Encoder<Envelope> for ExpanderCodec {
    type Error = io::Error;

    fn encode(&mut self, item: Envelope, dst: &mut BytesMut) -> Result<(), Self::Error> {
        let bytes = bincode::serialize(&item).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        self.codec.encode(bytes::Bytes::from(bytes), dst)
    }
}

impl Decoder for ExpanderCodec {
    type Item = Envelope;
    type Error = io::Error;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        match self.codec.decode(src)? {
            Some(bytes) => {
                let item = bincode::deserialize(&bytes).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
                Ok(Some(item))
            }
            None => Ok(None),
        }
    }
}

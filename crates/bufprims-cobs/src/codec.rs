//! `tokio_util` codec over the frame format.

use bytes::{Buf, Bytes, BytesMut};
use tokio_util::codec::{Decoder, Encoder};

use crate::config::DecoderConfig;
use crate::decoder::{DecoderStats, MessageDecoder};
use crate::encoder::encode;
use crate::error::{CobsError, Result};

/// Frames a byte stream for `FramedRead` / `FramedWrite`.
///
/// Decoding follows [`MessageDecoder`] exactly: malformed and oversized
/// frames are dropped and counted, never reported as errors. Encoding
/// refuses payloads the decoding side would drop.
#[derive(Debug, Default)]
pub struct CobsCodec<const MTU: usize> {
    decoder: MessageDecoder<MTU>,
}

impl<const MTU: usize> CobsCodec<MTU> {
    pub fn new() -> Self {
        Self {
            decoder: MessageDecoder::new(),
        }
    }

    pub fn with_config(config: DecoderConfig) -> Self {
        Self {
            decoder: MessageDecoder::with_config(config),
        }
    }

    /// Counters of the decoding half.
    pub fn stats(&self) -> DecoderStats {
        self.decoder.snapshot()
    }
}

impl<const MTU: usize> Decoder for CobsCodec<MTU> {
    type Item = Bytes;
    type Error = CobsError;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Bytes>> {
        while src.has_remaining() {
            let byte = src.get_u8();
            if let Some(message) = self.decoder.feed(byte) {
                return Ok(Some(Bytes::copy_from_slice(message)));
            }
        }
        Ok(None)
    }
}

impl<const MTU: usize, T: AsRef<[u8]>> Encoder<T> for CobsCodec<MTU> {
    type Error = CobsError;

    fn encode(&mut self, item: T, dst: &mut BytesMut) -> Result<()> {
        let payload = item.as_ref();
        let max = self.decoder.max_message_size();
        if payload.len() > max {
            return Err(CobsError::MessageTooLarge {
                size: payload.len(),
                max,
            });
        }
        encode(payload, dst)
    }
}

//! Zero-delimited framing with streaming, loss-counting decode.
//!
//! A COBS-style byte-stuffing scheme: `0x00` always marks a frame boundary
//! and non-zero pointer bytes give the distance to the next pointer, so
//! payloads may carry zeros. The [`MessageDecoder`] pulls bytes from any
//! [`ByteSource`] and resynchronizes on the next boundary after corruption,
//! counting what it had to drop.
//!
//! With the `async` feature, [`CobsCodec`] plugs the same format into
//! `tokio_util::codec`.

#[cfg(feature = "async")]
pub mod codec;
pub mod config;
pub mod decoder;
pub mod encoder;
pub mod error;
pub mod source;

#[cfg(feature = "async")]
pub use codec::CobsCodec;
pub use config::DecoderConfig;
pub use decoder::{DecoderStats, MessageDecoder, DELIMITER, OVERHEAD_CHAIN};
pub use encoder::{encode, max_encoded_len, MAX_RUN};
pub use error::{CobsError, Result};
pub use source::{ByteSource, ReaderSource, SliceSource};

//! Streaming frame decoder.
//!
//! Wire format: a `0x00` byte always ends a frame. Every other byte is
//! either data or a pointer holding the distance to the next pointer. The
//! first pointer of a frame is pure overhead; later pointers each stand
//! for one data zero, except that a pointer of `0xFF` in overhead position
//! makes the following pointer overhead as well. That chaining lets a
//! leading run of non-zero bytes exceed 254.
//!
//! The decoder never reports errors. A zero arriving mid-run drops the
//! partial frame, a frame longer than the configured ceiling is dropped in
//! full, and both show up only in the drop counter.

use tracing::{debug, trace};

use crate::config::DecoderConfig;
use crate::source::ByteSource;

/// Frame delimiter.
pub const DELIMITER: u8 = 0x00;

/// Pointer value that chains overhead into the next pointer.
pub const OVERHEAD_CHAIN: u8 = 0xFF;

/// Decoder counters, as reported by [`MessageDecoder::stats`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DecoderStats {
    /// Bytes held for the frame in progress.
    pub buffer_load: usize,
    /// Bytes discarded since the decoder was created.
    pub bytes_dropped: u32,
    /// Frames delivered since the decoder was created.
    pub message_count: u32,
}

/// Reassembles frames of up to `MTU` bytes from a byte stream.
pub struct MessageDecoder<const MTU: usize> {
    message: [u8; MTU],
    message_index: usize,
    breached: bool,

    zero_pointer: u8,
    zero_pointer_overhead: bool,

    bytes_dropped: u32,
    message_count: u32,
    stats_new: bool,

    config: DecoderConfig,
}

impl<const MTU: usize> Default for MessageDecoder<MTU> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const MTU: usize> MessageDecoder<MTU> {
    pub fn new() -> Self {
        Self::with_config(DecoderConfig::default())
    }

    pub fn with_config(config: DecoderConfig) -> Self {
        const { assert!(MTU > 0, "decoder MTU must be non-zero") };
        Self {
            message: [0; MTU],
            message_index: 0,
            breached: false,
            zero_pointer: 0,
            zero_pointer_overhead: true,
            bytes_dropped: 0,
            message_count: 0,
            stats_new: false,
            config,
        }
    }

    pub fn config(&self) -> &DecoderConfig {
        &self.config
    }

    /// Change the message ceiling. Applies from the next byte on.
    pub fn set_max_message_size(&mut self, max_message_size: usize) {
        self.config.max_message_size = max_message_size;
    }

    /// Ceiling in force: the configured size, clamped to `MTU`.
    pub fn max_message_size(&self) -> usize {
        self.config.effective_max(MTU)
    }

    /// Consume one byte. Returns the completed frame if this byte ended one.
    pub fn feed(&mut self, current: u8) -> Option<&[u8]> {
        if self.zero_pointer == 0 && current == DELIMITER {
            return self.complete();
        }

        if current == DELIMITER {
            debug!(
                dropped = self.message_index,
                "unexpected delimiter, resynchronizing"
            );
            self.discard();
            self.reset();
        } else if self.zero_pointer == 0 {
            if self.zero_pointer_overhead {
                self.zero_pointer_overhead = current == OVERHEAD_CHAIN;
            } else {
                self.push(0);
            }
            self.zero_pointer = current - 1;
        } else {
            self.push(current);
            self.zero_pointer -= 1;
        }

        None
    }

    /// Pull bytes from `source` until it runs dry, handing each completed
    /// frame to `on_message`. Returns the number of frames delivered.
    ///
    /// `on_message` cannot reach the decoder, so it cannot re-enter it.
    pub fn dispatch<S, F>(&mut self, source: &mut S, mut on_message: F) -> usize
    where
        S: ByteSource + ?Sized,
        F: FnMut(&[u8]),
    {
        let mut delivered = 0;
        while let Some(byte) = source.pop() {
            if let Some(message) = self.feed(byte) {
                on_message(message);
                delivered += 1;
            }
        }
        delivered
    }

    /// Report the counters if anything changed since the last call.
    ///
    /// Returns `None` when there is nothing new. Counters are cumulative and
    /// are not reset by polling.
    pub fn stats(&mut self) -> Option<DecoderStats> {
        if !self.stats_new {
            return None;
        }
        self.stats_new = false;
        Some(self.snapshot())
    }

    /// Current counters, without touching the change flag.
    pub fn snapshot(&self) -> DecoderStats {
        DecoderStats {
            buffer_load: self.message_index,
            bytes_dropped: self.bytes_dropped,
            message_count: self.message_count,
        }
    }

    fn complete(&mut self) -> Option<&[u8]> {
        let len = self.message_index;
        let deliver = len > 0 && !self.breached;
        if deliver {
            self.message_count = self.message_count.wrapping_add(1);
            self.stats_new = true;
        }
        self.reset();

        if !deliver {
            return None;
        }
        trace!(len, "frame decoded");
        Some(&self.message[..len])
    }

    fn reset(&mut self) {
        self.stats_new |= self.message_index != 0;
        self.message_index = 0;
        self.breached = false;
        self.zero_pointer = 0;
        self.zero_pointer_overhead = true;
    }

    fn discard(&mut self) {
        self.bytes_dropped = self.bytes_dropped.wrapping_add(self.message_index as u32);
        self.message_index = 0;
        self.stats_new = true;
    }

    fn push(&mut self, value: u8) {
        if self.breached {
            self.drop_byte();
        } else if self.message_index >= self.max_message_size() {
            debug!(
                max = self.max_message_size(),
                "frame exceeds message ceiling, dropping"
            );
            self.breached = true;
            self.discard();
            self.drop_byte();
        } else {
            self.message[self.message_index] = value;
            self.message_index += 1;
            self.stats_new = true;
        }
    }

    fn drop_byte(&mut self) {
        self.bytes_dropped = self.bytes_dropped.wrapping_add(1);
        self.stats_new = true;
    }
}

impl<const MTU: usize> std::fmt::Debug for MessageDecoder<MTU> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MessageDecoder")
            .field("mtu", &MTU)
            .field("config", &self.config)
            .field("message_index", &self.message_index)
            .field("breached", &self.breached)
            .field("zero_pointer", &self.zero_pointer)
            .field("zero_pointer_overhead", &self.zero_pointer_overhead)
            .field("bytes_dropped", &self.bytes_dropped)
            .field("message_count", &self.message_count)
            .finish()
    }
}

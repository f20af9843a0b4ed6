//! Bounded producer/consumer buffer.
//!
//! [`PcBuffer`] wraps a [`RingBuffer`] and enforces the capacity that the
//! ring itself leaves to its caller: pushes fail (or drop) when full and
//! pops report absence when empty. Blocking pushes have exactly one wake
//! mechanism, a user-supplied "data available" callback that is expected
//! to drain the buffer.

use std::io;

use tracing::{debug, trace};

use crate::align::{Alignment, NaturalAlign};
use crate::error::{Result, RingError};
use crate::ring::RingBuffer;

/// Counters kept by a [`PcBuffer`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PcBufferStats {
    /// Highest fill level seen since the last poll.
    pub high_watermark: usize,
    /// Elements discarded by [`PcBuffer::push_or_drop`] since the last poll.
    pub write_dropped: u32,
}

/// Callback invoked when a blocking push finds the buffer full.
pub type DataAvailable<const DEPTH: usize, E, A> = fn(&mut PcBuffer<DEPTH, E, A>);

/// A ring buffer with capacity checks.
pub struct PcBuffer<const DEPTH: usize, E = u8, A: Alignment = NaturalAlign> {
    ring: RingBuffer<DEPTH, E, A>,
    stats: PcBufferStats,
    data_available: Option<DataAvailable<DEPTH, E, A>>,
}

impl<const DEPTH: usize, E: Copy + Default, A: Alignment> Default for PcBuffer<DEPTH, E, A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const DEPTH: usize, E: Copy + Default, A: Alignment> PcBuffer<DEPTH, E, A> {
    pub fn new() -> Self {
        Self {
            ring: RingBuffer::new(),
            stats: PcBufferStats::default(),
            data_available: None,
        }
    }

    /// Create a buffer whose blocking pushes call `callback` when full.
    pub fn with_data_available(callback: DataAvailable<DEPTH, E, A>) -> Self {
        let mut buf = Self::new();
        buf.data_available = Some(callback);
        buf
    }

    /// Install (or remove) the "data available" callback.
    pub fn set_data_available(&mut self, callback: Option<DataAvailable<DEPTH, E, A>>) {
        self.data_available = callback;
    }

    /// Number of unread elements.
    pub fn len(&self) -> usize {
        self.ring.len()
    }

    pub fn empty(&self) -> bool {
        self.len() == 0
    }

    pub fn full(&self) -> bool {
        self.len() >= DEPTH
    }

    /// Free slots.
    pub fn space(&self) -> usize {
        DEPTH - self.len()
    }

    pub const fn capacity(&self) -> usize {
        DEPTH
    }

    /// Append one element, failing when full.
    pub fn push(&mut self, elem: E) -> Result<()> {
        if self.full() {
            return Err(RingError::Full { capacity: DEPTH });
        }
        self.ring.write_single(elem);
        self.track_watermark();
        Ok(())
    }

    /// Append one element; when full, the element is discarded and counted.
    ///
    /// Returns whether the element was stored.
    pub fn push_or_drop(&mut self, elem: E) -> bool {
        if self.full() {
            self.stats.write_dropped = self.stats.write_dropped.wrapping_add(1);
            trace!(capacity = DEPTH, "buffer full, dropping element");
            return false;
        }
        self.ring.write_single(elem);
        self.track_watermark();
        true
    }

    /// Append all of `elems` or nothing.
    pub fn push_n(&mut self, elems: &[E]) -> Result<()> {
        if elems.len() > self.space() {
            return Err(RingError::Insufficient {
                requested: elems.len(),
                available: self.space(),
            });
        }
        if !elems.is_empty() {
            self.ring.write_n(elems);
            self.track_watermark();
        }
        Ok(())
    }

    /// Append one element, invoking the "data available" callback while full.
    pub fn push_blocking(&mut self, elem: E) -> Result<()> {
        self.wait_for_space()?;
        self.push(elem)
    }

    /// Append all of `elems`, draining through the callback as often as needed.
    pub fn push_n_blocking(&mut self, elems: &[E]) -> Result<()> {
        let mut remaining = elems;
        while !remaining.is_empty() {
            self.wait_for_space()?;
            let (now, later) = remaining.split_at(self.space().min(remaining.len()));
            self.ring.write_n(now);
            self.track_watermark();
            remaining = later;
        }
        Ok(())
    }

    /// Consume one element, if any.
    pub fn pop(&mut self) -> Option<E> {
        if self.empty() {
            return None;
        }
        Some(self.ring.read_single())
    }

    /// Fill `out` completely or consume nothing.
    pub fn pop_n(&mut self, out: &mut [E]) -> Result<()> {
        if out.len() > self.len() {
            return Err(RingError::Insufficient {
                requested: out.len(),
                available: self.len(),
            });
        }
        if !out.is_empty() {
            self.ring.read_n(out);
        }
        Ok(())
    }

    /// Move as many elements as fit into `out`; returns the count.
    pub fn pop_all(&mut self, out: &mut [E]) -> usize {
        let count = self.len().min(out.len());
        if count > 0 {
            self.ring.read_n(&mut out[..count]);
        }
        count
    }

    /// Discard every unread element; returns the count.
    pub fn drop_all(&mut self) -> usize {
        let count = self.len();
        if count > 0 {
            self.ring.skip(count);
        }
        count
    }

    /// The next unread element without consuming it.
    pub fn peek(&self) -> Option<E> {
        if self.empty() {
            return None;
        }
        Some(self.ring.peek())
    }

    /// Reset cursors and counters. Stored data becomes unreachable.
    pub fn clear(&mut self) {
        self.ring.reset();
        self.stats = PcBufferStats::default();
    }

    /// Return the counters; `reset` zeroes them.
    pub fn poll_stats(&mut self, reset: bool) -> PcBufferStats {
        let stats = self.stats;
        if reset {
            self.stats = PcBufferStats {
                high_watermark: self.len(),
                write_dropped: 0,
            };
        }
        stats
    }

    /// The underlying ring.
    pub fn ring(&self) -> &RingBuffer<DEPTH, E, A> {
        &self.ring
    }

    /// The backing storage.
    pub fn head(&self) -> &[E; DEPTH] {
        self.ring.head()
    }

    fn track_watermark(&mut self) {
        self.stats.high_watermark = self.stats.high_watermark.max(self.len());
    }

    fn wait_for_space(&mut self) -> Result<()> {
        while self.full() {
            let Some(callback) = self.data_available else {
                debug!(capacity = DEPTH, "buffer full and no data-available callback");
                return Err(RingError::Full { capacity: DEPTH });
            };

            let before = self.len();
            callback(self);
            if self.len() >= before {
                debug!(capacity = DEPTH, "data-available callback freed no space");
                return Err(RingError::Full { capacity: DEPTH });
            }
        }
        Ok(())
    }
}

impl<const DEPTH: usize, A: Alignment> io::Write for PcBuffer<DEPTH, u8, A> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if buf.is_empty() {
            return Ok(0);
        }
        let count = self.space().min(buf.len());
        if count == 0 {
            return Err(io::Error::from(io::ErrorKind::WouldBlock));
        }
        self.ring.write_n(&buf[..count]);
        self.track_watermark();
        Ok(count)
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<const DEPTH: usize, A: Alignment> io::Read for PcBuffer<DEPTH, u8, A> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        Ok(self.pop_all(buf))
    }
}

impl<const DEPTH: usize, E, A: Alignment> std::fmt::Debug for PcBuffer<DEPTH, E, A> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PcBuffer")
            .field("ring", &self.ring)
            .field("stats", &self.stats)
            .field("data_available", &self.data_available.is_some())
            .finish()
    }
}

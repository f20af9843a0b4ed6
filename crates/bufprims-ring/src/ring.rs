//! Fixed-capacity circular buffer with monotonic cursors.
//!
//! Cursors count every element ever written or read and are never wrapped;
//! the storage index is `cursor % DEPTH`. The buffer does not compare the
//! two cursors: writing more than `DEPTH` elements without reading silently
//! overwrites unread data. Capacity enforcement belongs to the caller (see
//! `PcBuffer`, or the message layer built on top of this type).

use crate::align::{Aligned, Alignment, NaturalAlign};
use crate::endian::{handle_endian, Endian, Scalar};
use crate::wire::{BufferState, WireStruct};

/// Largest scalar width handled by the typed interface (`u128`).
const MAX_SCALAR_WIDTH: usize = 16;

/// Cursor and counter state of one ring.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CursorState {
    /// Elements ever written.
    pub write_cursor: usize,
    /// Elements ever read.
    pub read_cursor: usize,
    /// Elements written since the last metrics poll.
    pub write_count: u32,
    /// Elements read since the last metrics poll.
    pub read_count: u32,
}

/// A circular store of `DEPTH` elements.
///
/// `E` is the element type (one byte by default) and `A` the storage
/// alignment marker.
pub struct RingBuffer<const DEPTH: usize, E = u8, A: Alignment = NaturalAlign> {
    buffer: Aligned<A, [E; DEPTH]>,
    state: CursorState,
}

impl<const DEPTH: usize, E: Copy + Default, A: Alignment> Default for RingBuffer<DEPTH, E, A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const DEPTH: usize, E: Copy + Default, A: Alignment> RingBuffer<DEPTH, E, A> {
    /// Create an empty ring with all cursors at zero.
    pub fn new() -> Self {
        const { assert!(DEPTH > 0, "ring depth must be non-zero") };
        Self {
            buffer: Aligned::new([E::default(); DEPTH]),
            state: CursorState::default(),
        }
    }

    /// Append one element.
    #[inline]
    pub fn write_single(&mut self, elem: E) -> usize {
        let index = self.write_index();
        self.buffer.value[index] = elem;
        self.state.write_cursor = self.state.write_cursor.wrapping_add(1);
        self.state.write_count = self.state.write_count.wrapping_add(1);
        1
    }

    /// Append every element of `elems`, wrapping at the end of storage.
    pub fn write_n(&mut self, elems: &[E]) -> usize {
        self.write_from(Some(elems), elems.len())
    }

    /// Advance the write cursor by `count` without copying anything.
    pub fn reserve(&mut self, count: usize) -> usize {
        self.write_from(None, count)
    }

    /// Return the next unread element without consuming it.
    #[inline]
    pub fn peek(&self) -> E {
        self.buffer.value[self.read_index()]
    }

    /// Consume one element.
    #[inline]
    pub fn read_single(&mut self) -> E {
        let elem = self.peek();
        self.state.read_cursor = self.state.read_cursor.wrapping_add(1);
        self.state.read_count = self.state.read_count.wrapping_add(1);
        elem
    }

    /// Fill `elems` from the buffer, wrapping at the end of storage.
    pub fn read_n(&mut self, elems: &mut [E]) -> usize {
        let count = elems.len();
        self.read_into(Some(elems), count)
    }

    /// Advance the read cursor by `count`, discarding the data.
    pub fn skip(&mut self, count: usize) -> usize {
        self.read_into(None, count)
    }

    /// Return `(read_count, write_count)` since the last poll.
    ///
    /// When `reset` is set both counters are zeroed in the same call.
    pub fn poll_metrics(&mut self, reset: bool) -> (u32, u32) {
        (self.read_count(reset), self.write_count(reset))
    }

    /// Elements written since the last poll.
    pub fn write_count(&mut self, reset: bool) -> u32 {
        let result = self.state.write_count;
        if reset {
            self.state.write_count = 0;
        }
        result
    }

    /// Elements read since the last poll.
    pub fn read_count(&mut self, reset: bool) -> u32 {
        let result = self.state.read_count;
        if reset {
            self.state.read_count = 0;
        }
        result
    }

    /// Zero all cursor state. Storage contents are left as they are.
    pub fn reset(&mut self) {
        self.state = CursorState::default();
    }

    /// The backing storage.
    pub fn head(&self) -> &[E; DEPTH] {
        &self.buffer.value
    }

    /// Current cursor state.
    pub fn cursors(&self) -> CursorState {
        self.state
    }

    /// Cursor state as a wire struct. Cursors are truncated to 32 bits.
    pub fn state(&self) -> BufferState {
        BufferState::new(
            self.state.write_cursor as u32,
            self.state.read_cursor as u32,
            self.state.read_count,
            self.state.write_count,
        )
    }

    /// Elements written but not yet read.
    ///
    /// This can exceed `DEPTH` once unread data has been overwritten.
    pub fn len(&self) -> usize {
        self.state.write_cursor.wrapping_sub(self.state.read_cursor)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub const fn capacity(&self) -> usize {
        DEPTH
    }

    #[inline]
    fn write_index(&self) -> usize {
        self.state.write_cursor % DEPTH
    }

    #[inline]
    fn read_index(&self) -> usize {
        self.state.read_cursor % DEPTH
    }

    fn write_from(&mut self, mut src: Option<&[E]>, count: usize) -> usize {
        debug_assert!(count > 0, "zero-length ring write");

        let mut remaining = count;
        while remaining > 0 {
            // only the span up to the end of storage is contiguous
            let index = self.write_index();
            let chunk = (DEPTH - index).min(remaining);

            if let Some(elems) = src {
                let (head, tail) = elems.split_at(chunk);
                self.buffer.value[index..index + chunk].copy_from_slice(head);
                src = Some(tail);
            }

            remaining -= chunk;
            self.state.write_cursor = self.state.write_cursor.wrapping_add(chunk);
            self.state.write_count = self.state.write_count.wrapping_add(chunk as u32);
        }

        count
    }

    fn read_into(&mut self, mut dst: Option<&mut [E]>, count: usize) -> usize {
        debug_assert!(count > 0, "zero-length ring read");

        let mut remaining = count;
        while remaining > 0 {
            let index = self.read_index();
            let chunk = (DEPTH - index).min(remaining);

            if let Some(elems) = dst.take() {
                let (head, tail) = elems.split_at_mut(chunk);
                head.copy_from_slice(&self.buffer.value[index..index + chunk]);
                dst = Some(tail);
            }

            remaining -= chunk;
            self.state.read_cursor = self.state.read_cursor.wrapping_add(chunk);
            self.state.read_count = self.state.read_count.wrapping_add(chunk as u32);
        }

        count
    }
}

/// Typed access for byte rings.
impl<const DEPTH: usize, A: Alignment> RingBuffer<DEPTH, u8, A> {
    /// Write `value` in byte order `order`.
    ///
    /// One-byte values go through [`write_single`](Self::write_single);
    /// wider values are normalized and copied as `T::WIDTH` bytes.
    pub fn write<T: Scalar>(&mut self, value: T, order: Endian) -> usize {
        let mut scratch = [0u8; MAX_SCALAR_WIDTH];
        if T::WIDTH == 1 {
            value.store_ne(&mut scratch);
            return self.write_single(scratch[0]);
        }

        handle_endian(value, order).store_ne(&mut scratch);
        self.write_n(&scratch[..T::WIDTH])
    }

    /// Read a `T` that was written in byte order `order`.
    pub fn read<T: Scalar>(&mut self, order: Endian) -> T {
        if T::WIDTH == 1 {
            return T::load_ne(&[self.read_single()]);
        }

        let mut scratch = [0u8; MAX_SCALAR_WIDTH];
        self.read_n(&mut scratch[..T::WIDTH]);
        handle_endian(T::load_ne(&scratch), order)
    }

    /// Write a wire struct in byte order `order`.
    ///
    /// A normalized copy is encoded; `value` itself is not modified.
    pub fn write_struct<S: WireStruct>(&mut self, value: &S, order: Endian) -> usize {
        let encoded = value.encoded(order);
        self.write_n(encoded.raw())
    }

    /// Read a wire struct that was written in byte order `order`.
    pub fn read_struct<S: WireStruct>(&mut self, order: Endian) -> S {
        let mut value = S::default();
        self.read_n(value.raw_mut());
        value.normalize(order);
        value
    }
}

impl<const DEPTH: usize, E, A: Alignment> std::fmt::Debug for RingBuffer<DEPTH, E, A> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RingBuffer")
            .field("depth", &DEPTH)
            .field("alignment", &A::BYTES)
            .field("state", &self.state)
            .finish()
    }
}

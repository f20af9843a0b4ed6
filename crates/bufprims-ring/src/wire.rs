//! Fixed-layout wire structs.
//!
//! Types exchanged through ring buffers as a whole carry their own byte
//! image. A wire struct knows its size, exposes its raw bytes, and can
//! normalize those bytes to a requested byte order.

use crate::endian::{handle_endian, Endian, Scalar};

/// Contract for fixed-size structs transferred through a ring buffer.
pub trait WireStruct: Default {
    /// Encoded length in bytes.
    const SIZE: usize;

    /// Identifier written ahead of the struct by self-describing encoders.
    const ID: u16;

    /// Read-only view of the in-memory bytes.
    fn raw(&self) -> &[u8];

    /// Mutable view of the in-memory bytes.
    fn raw_mut(&mut self) -> &mut [u8];

    /// Normalize every multi-byte field to (or from) `order`, in place.
    fn normalize(&mut self, order: Endian);

    /// Build an instance from `bytes`, normalized to `order`.
    ///
    /// `bytes` must hold at least [`Self::SIZE`] bytes.
    fn decode(bytes: &[u8], order: Endian) -> Self {
        let mut value = Self::default();
        value.raw_mut().copy_from_slice(&bytes[..Self::SIZE]);
        value.normalize(order);
        value
    }

    /// A copy of `self` with every field normalized to `order`.
    fn encoded(&self, order: Endian) -> Self {
        Self::decode(self.raw(), order)
    }
}

/// Snapshot of a ring buffer's cursor state.
///
/// Four `u32` fields stored back to back in host order:
/// `write_cursor`, `read_cursor`, `read_count`, `write_count`.
#[derive(Clone, Copy, Default, PartialEq, Eq)]
pub struct BufferState {
    raw: [u8; BUFFER_STATE_SIZE],
}

const BUFFER_STATE_SIZE: usize = 16;

impl BufferState {
    pub const SIZE: usize = BUFFER_STATE_SIZE;

    const WRITE_CURSOR: usize = 0;
    const READ_CURSOR: usize = 4;
    const READ_COUNT: usize = 8;
    const WRITE_COUNT: usize = 12;

    pub fn new(write_cursor: u32, read_cursor: u32, read_count: u32, write_count: u32) -> Self {
        let mut state = Self::default();
        state.set_write_cursor(write_cursor);
        state.set_read_cursor(read_cursor);
        state.set_read_count(read_count);
        state.set_write_count(write_count);
        state
    }

    pub fn write_cursor(&self) -> u32 {
        self.field(Self::WRITE_CURSOR)
    }

    pub fn read_cursor(&self) -> u32 {
        self.field(Self::READ_CURSOR)
    }

    pub fn read_count(&self) -> u32 {
        self.field(Self::READ_COUNT)
    }

    pub fn write_count(&self) -> u32 {
        self.field(Self::WRITE_COUNT)
    }

    pub fn set_write_cursor(&mut self, value: u32) {
        self.set_field(Self::WRITE_CURSOR, value);
    }

    pub fn set_read_cursor(&mut self, value: u32) {
        self.set_field(Self::READ_CURSOR, value);
    }

    pub fn set_read_count(&mut self, value: u32) {
        self.set_field(Self::READ_COUNT, value);
    }

    pub fn set_write_count(&mut self, value: u32) {
        self.set_field(Self::WRITE_COUNT, value);
    }

    fn field(&self, offset: usize) -> u32 {
        u32::load_ne(&self.raw[offset..])
    }

    fn set_field(&mut self, offset: usize, value: u32) {
        value.store_ne(&mut self.raw[offset..]);
    }
}

impl WireStruct for BufferState {
    const SIZE: usize = BufferState::SIZE;
    const ID: u16 = 1;

    fn raw(&self) -> &[u8] {
        &self.raw
    }

    fn raw_mut(&mut self) -> &mut [u8] {
        &mut self.raw
    }

    fn normalize(&mut self, order: Endian) {
        for offset in [
            Self::WRITE_CURSOR,
            Self::READ_CURSOR,
            Self::READ_COUNT,
            Self::WRITE_COUNT,
        ] {
            let value = handle_endian(self.field(offset), order);
            self.set_field(offset, value);
        }
    }
}

impl std::fmt::Debug for BufferState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BufferState")
            .field("write_cursor", &self.write_cursor())
            .field("read_cursor", &self.read_cursor())
            .field("read_count", &self.read_count())
            .field("write_count", &self.write_count())
            .finish()
    }
}

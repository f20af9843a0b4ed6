//! Alignment markers for ring storage.
//!
//! Rust has no const-generic `align(N)`, so the backing array is wrapped
//! together with a zero-length array of a marker type whose alignment is
//! fixed by `#[repr(align)]`. Only powers of two can be spelled.

mod sealed {
    pub trait Sealed {}
}

/// A storage alignment, in bytes.
pub trait Alignment: Copy + Default + sealed::Sealed {
    /// Minimum alignment guaranteed for the storage, in bytes.
    const BYTES: usize;
}

/// Alignment of the element type itself.
#[derive(Debug, Clone, Copy, Default)]
#[repr(align(1))]
pub struct NaturalAlign;

impl sealed::Sealed for NaturalAlign {}

impl Alignment for NaturalAlign {
    const BYTES: usize = 1;
}

/// Storage aligned to 2 bytes.
#[derive(Debug, Clone, Copy, Default)]
#[repr(align(2))]
pub struct Align2;

impl sealed::Sealed for Align2 {}

impl Alignment for Align2 {
    const BYTES: usize = 2;
}

/// Storage aligned to 4 bytes.
#[derive(Debug, Clone, Copy, Default)]
#[repr(align(4))]
pub struct Align4;

impl sealed::Sealed for Align4 {}

impl Alignment for Align4 {
    const BYTES: usize = 4;
}

/// Storage aligned to 8 bytes.
#[derive(Debug, Clone, Copy, Default)]
#[repr(align(8))]
pub struct Align8;

impl sealed::Sealed for Align8 {}

impl Alignment for Align8 {
    const BYTES: usize = 8;
}

/// Storage aligned to 16 bytes.
#[derive(Debug, Clone, Copy, Default)]
#[repr(align(16))]
pub struct Align16;

impl sealed::Sealed for Align16 {}

impl Alignment for Align16 {
    const BYTES: usize = 16;
}

/// Storage aligned to 32 bytes.
#[derive(Debug, Clone, Copy, Default)]
#[repr(align(32))]
pub struct Align32;

impl sealed::Sealed for Align32 {}

impl Alignment for Align32 {
    const BYTES: usize = 32;
}

/// Storage aligned to 64 bytes.
#[derive(Debug, Clone, Copy, Default)]
#[repr(align(64))]
pub struct Align64;

impl sealed::Sealed for Align64 {}

impl Alignment for Align64 {
    const BYTES: usize = 64;
}

/// A value whose address is aligned to at least `A::BYTES`.
#[repr(C)]
pub(crate) struct Aligned<A: Alignment, T> {
    _align: [A; 0],
    pub(crate) value: T,
}

impl<A: Alignment, T> Aligned<A, T> {
    pub(crate) const fn new(value: T) -> Self {
        Self { _align: [], value }
    }
}

//! Byte-order normalization for scalar values.
//!
//! All transforms are value-in/value-out: the caller's original is never
//! touched. One-byte types pass through unchanged, multi-byte integers are
//! swapped only when the requested order differs from the host's, and
//! floating-point values are swapped through their same-width bit pattern.

/// Byte order requested for a typed transfer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endian {
    Big,
    Little,
}

impl Endian {
    /// Byte order of the host.
    #[cfg(target_endian = "little")]
    pub const NATIVE: Endian = Endian::Little;
    /// Byte order of the host.
    #[cfg(target_endian = "big")]
    pub const NATIVE: Endian = Endian::Big;

    /// Network byte order.
    pub const NETWORK: Endian = Endian::Big;

    /// Returns true if this order matches the host's.
    #[inline]
    pub const fn is_native(self) -> bool {
        matches!(
            (self, Self::NATIVE),
            (Endian::Big, Endian::Big) | (Endian::Little, Endian::Little)
        )
    }
}

impl Default for Endian {
    fn default() -> Self {
        Self::NATIVE
    }
}

mod sealed {
    pub trait Sealed {}
}

/// A fixed-width scalar that can be stored in a byte ring.
///
/// Implemented for the primitive integers, `bool`, and `f32`/`f64`. The set
/// is closed.
pub trait Scalar: Copy + Default + sealed::Sealed {
    /// Width in bytes.
    const WIDTH: usize;

    /// Reverse the byte order unconditionally.
    fn swap(self) -> Self;

    /// Store the in-memory (native) representation into `dst[..WIDTH]`.
    fn store_ne(self, dst: &mut [u8]);

    /// Load a value from its in-memory (native) representation.
    fn load_ne(src: &[u8]) -> Self;
}

macro_rules! impl_scalar_int {
    ($($ty:ty),* $(,)?) => {$(
        impl sealed::Sealed for $ty {}

        impl Scalar for $ty {
            const WIDTH: usize = core::mem::size_of::<$ty>();

            #[inline]
            fn swap(self) -> Self {
                self.swap_bytes()
            }

            #[inline]
            fn store_ne(self, dst: &mut [u8]) {
                dst[..Self::WIDTH].copy_from_slice(&self.to_ne_bytes());
            }

            #[inline]
            fn load_ne(src: &[u8]) -> Self {
                let mut raw = [0u8; core::mem::size_of::<$ty>()];
                raw.copy_from_slice(&src[..Self::WIDTH]);
                <$ty>::from_ne_bytes(raw)
            }
        }
    )*};
}

macro_rules! impl_scalar_float {
    ($($ty:ty => $bits:ty),* $(,)?) => {$(
        impl sealed::Sealed for $ty {}

        impl Scalar for $ty {
            const WIDTH: usize = core::mem::size_of::<$ty>();

            #[inline]
            fn swap(self) -> Self {
                <$ty>::from_bits(self.to_bits().swap())
            }

            #[inline]
            fn store_ne(self, dst: &mut [u8]) {
                self.to_bits().store_ne(dst);
            }

            #[inline]
            fn load_ne(src: &[u8]) -> Self {
                <$ty>::from_bits(<$bits>::load_ne(src))
            }
        }
    )*};
}

impl_scalar_int!(u8, i8, u16, i16, u32, i32, u64, i64, u128, i128, usize, isize);
impl_scalar_float!(f32 => u32, f64 => u64);

impl sealed::Sealed for bool {}

impl Scalar for bool {
    const WIDTH: usize = 1;

    #[inline]
    fn swap(self) -> Self {
        self
    }

    #[inline]
    fn store_ne(self, dst: &mut [u8]) {
        dst[0] = u8::from(self);
    }

    #[inline]
    fn load_ne(src: &[u8]) -> Self {
        src[0] != 0
    }
}

/// Normalize `value` to (or from) `order`.
///
/// The transform is its own inverse, so the same call converts host values
/// to wire order and wire values back to host order.
#[inline]
pub fn handle_endian<T: Scalar>(value: T, order: Endian) -> T {
    if T::WIDTH == 1 || order.is_native() {
        value
    } else {
        value.swap()
    }
}

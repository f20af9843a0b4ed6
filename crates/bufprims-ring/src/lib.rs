//! Fixed-capacity ring buffers with endian-portable typed access.
//!
//! This is the lowest layer of bufprims. Everything else builds on the
//! [`RingBuffer`] type provided here:
//! - [`endian`]: byte-order normalization for scalars
//! - [`ring`]: the circular store, with typed and wire-struct read/write
//! - [`pc`]: a bounded producer/consumer wrapper with blocking pushes
//! - [`lock`]: scoped critical sections for buffers shared across contexts
//!
//! No operation here allocates, blocks, or locks internally.

pub mod align;
pub mod endian;
pub mod error;
pub mod lock;
pub mod pc;
pub mod ring;
pub mod wire;

pub use align::{Align16, Align2, Align32, Align4, Align64, Align8, Alignment, NaturalAlign};
pub use endian::{handle_endian, Endian, Scalar};
pub use error::{Result, RingError};
pub use lock::{critical, ContextLock, Lock, NoopLock};
pub use pc::{DataAvailable, PcBuffer, PcBufferStats};
pub use ring::{CursorState, RingBuffer};
pub use wire::{BufferState, WireStruct};

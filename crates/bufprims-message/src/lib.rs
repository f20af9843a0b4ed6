//! Transactional message buffer.
//!
//! Layers message boundaries on top of a `bufprims-ring` byte ring. Messages
//! go in whole, through [`MessageBuffer::put_message`] or a multi-write
//! [`MessageContext`] transaction, and come out whole and in order through
//! [`MessageBuffer::get_message`].
//!
//! ```
//! use bufprims_message::MessageBuffer;
//! use bufprims_ring::Endian;
//!
//! let mut buf = MessageBuffer::<64, 4>::new();
//! {
//!     let mut ctx = buf.context();
//!     ctx.write(0x0102u16, Endian::Big);
//!     ctx.write_n(b"payload");
//! }
//!
//! let mut out = [0u8; 64];
//! let len = buf.get_message(&mut out).unwrap();
//! assert_eq!(&out[..len], b"\x01\x02payload");
//! ```

pub mod buffer;
pub mod context;
pub mod error;

pub use buffer::MessageBuffer;
pub use context::{MessageContext, TransactionOutcome};
pub use error::{MessageError, Result};

//! Fixed-capacity buffers and zero-delimited framing for constrained systems.
//!
//! Nothing here allocates on the data path or blocks: capacities are const
//! generics, and every failure is an explicit result or a counted loss.
//!
//! # Crate Structure
//!
//! - [`ring`]: ring buffers with endian-aware typed access, the bounded
//!   producer/consumer buffer, and scoped critical sections
//! - [`message`]: transactional message-boundary buffer
//! - [`cobs`]: streaming frame decoder, matching encoder, and byte sources

/// Re-export ring buffer types.
pub mod ring {
    pub use bufprims_ring::*;
}

/// Re-export message buffer types.
pub mod message {
    pub use bufprims_message::*;
}

/// Re-export framing types.
pub mod cobs {
    pub use bufprims_cobs::*;
}

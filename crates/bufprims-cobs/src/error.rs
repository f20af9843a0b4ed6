/// Errors from encoding payloads or reading framed streams.
#[derive(Debug, thiserror::Error)]
pub enum CobsError {
    /// A run of non-zero bytes after a data zero exceeds the longest
    /// span a single pointer can express.
    #[error("run of {len} non-zero bytes at offset {offset} cannot be encoded (max 254)")]
    UnencodableRun { offset: usize, len: usize },

    /// The payload is larger than the receiving decoder accepts.
    #[error("message too large ({size} bytes, max {max})")]
    MessageTooLarge { size: usize, max: usize },

    /// An I/O error occurred on the underlying stream.
    #[error("stream I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, CobsError>;

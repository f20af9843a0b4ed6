/// Reasons a message buffer refuses a transfer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum MessageError {
    /// Zero-length messages are not stored.
    #[error("message is empty")]
    ZeroLength,

    /// Every message slot is occupied.
    #[error("message limit reached ({max} messages)")]
    TooManyMessages { max: usize },

    /// The data ring cannot hold the message.
    #[error("message too large ({len} elements, {available} free)")]
    InsufficientSpace { len: usize, available: usize },

    /// No message is pending.
    #[error("no message pending")]
    Empty,

    /// The caller's output slice is shorter than the pending message.
    #[error("output too small ({len} element message, {capacity} element buffer)")]
    OutputTooSmall { len: usize, capacity: usize },
}

pub type Result<T> = std::result::Result<T, MessageError>;

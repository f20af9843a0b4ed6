/// Errors reported by the bounded producer/consumer buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum RingError {
    /// No room for another element.
    #[error("buffer full ({capacity} elements)")]
    Full { capacity: usize },

    /// An all-or-nothing transfer did not fit.
    #[error("requested {requested} elements, only {available} available")]
    Insufficient { requested: usize, available: usize },
}

pub type Result<T> = std::result::Result<T, RingError>;

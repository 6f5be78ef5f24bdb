//! Error types for buffers and sorters
//!
//! [`BufferError`] covers programmer errors raised by [`InstrumentedBuffer`]
//! operations (bad indices, empty slots, mismatched scratch sizes). These are
//! never clamped or silently absorbed: the offending operation is rejected
//! before any counter moves or any observer fires.
//!
//! [`SortError`] is what [`Sorter::step`] returns. Cancellation is *not* an
//! error; it is reported through [`Sorter::is_cancelled`].
//!
//! [`InstrumentedBuffer`]: crate::buffer::InstrumentedBuffer
//! [`Sorter::step`]: crate::sort::Sorter::step
//! [`Sorter::is_cancelled`]: crate::sort::Sorter::is_cancelled

/// Errors raised by instrumented buffer operations
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BufferError {
    /// Index outside `[0, len)`
    #[error("index {index} out of range for buffer of length {len}")]
    OutOfRange { index: usize, len: usize },

    /// Scratch buffer length differs from its primary buffer
    #[error("scratch buffer length {actual} does not match primary length {expected}")]
    SizeMismatch { expected: usize, actual: usize },

    /// Read from a slot that currently holds no element
    #[error("slot {index} is empty")]
    EmptySlot { index: usize },
}

/// Errors surfaced while stepping a sorter
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SortError {
    #[error(transparent)]
    Buffer(#[from] BufferError),

    /// The worker thread of a threaded sorter exited without reporting
    #[error("sort worker exited unexpectedly")]
    WorkerLost,
}

pub type BufferResult<T> = std::result::Result<T, BufferError>;
pub type SortResult<T> = std::result::Result<T, SortError>;

/// Command-line values that parse but cannot be used
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("size {size} exceeds the maximum of {max}")]
    SizeTooLarge { size: usize, max: usize },

    #[error("invalid log filter '{filter}': {source}")]
    LogFilter {
        filter: String,
        #[source]
        source: tracing_subscriber::filter::ParseError,
    },

    #[error("cannot install log subscriber: {0}")]
    Subscriber(String),

    #[error("cannot open log file {path}: {source}")]
    LogFile {
        path: std::path::PathBuf,
        #[source]
        source: std::io::Error,
    },
}

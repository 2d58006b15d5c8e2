//! Classifier error types

use thiserror::Error;

/// Result type for classifier operations
pub type Result<T> = std::result::Result<T, ClassifyError>;

/// Classifier failures: rejected input or a failed frame transform
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ClassifyError {
    /// Sample sequence has no samples
    #[error("sample sequence is empty")]
    EmptySignal,

    /// Sample rate of zero
    #[error("sample rate must be positive")]
    InvalidSampleRate,

    /// NaN or infinite sample at the given index
    #[error("non-finite sample at index {0}")]
    NonFiniteSample(usize),

    /// Frame transform failed
    #[error("spectrum computation failed: {0}")]
    Fft(String),
}

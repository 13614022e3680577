//! Error types for the cutmatte umbrella crate

use thiserror::Error;

/// Errors from end-to-end processing and preview sessions
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Decoding or encoding failed
    #[error("image error: {0}")]
    Io(#[from] cutmatte_io::IoError),

    /// The preview worker thread could not be started
    #[error("failed to start preview worker: {0}")]
    Worker(std::io::Error),
}

/// Result type for pipeline operations
pub type PipelineResult<T> = Result<T, PipelineError>;

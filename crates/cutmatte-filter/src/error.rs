//! Error types for cutmatte-filter
//!
//! Stage filters themselves are total; errors only arise when building
//! lookup tables from caller-supplied values.

use thiserror::Error;

/// Errors that can occur while preparing a filter
#[derive(Debug, Error, Clone, PartialEq)]
pub enum FilterError {
    /// Invalid parameters
    #[error("invalid parameters: {0}")]
    InvalidParameters(String),
}

/// Result type for filter operations
pub type FilterResult<T> = Result<T, FilterError>;

//! Core error type.
//!
//! Sub-crates define their own error enums and wrap `CoreError` as one
//! `#[from]` variant.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("invalid time {0:?}: expected HH:MM:SS or HH:MM")]
    InvalidTime(String),

    #[error("configuration error: {0}")]
    Config(String),
}

/// Shorthand result type for `bl-core`.
pub type CoreResult<T> = Result<T, CoreError>;

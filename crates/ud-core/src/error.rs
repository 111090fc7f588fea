//! Core error type.
//!
//! Sub-crates define their own error enums and wrap `CoreError` via
//! `#[from]` where a core failure can surface.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("configuration error: {0}")]
    Config(String),
}

/// Shorthand result type for `ud-core`.
pub type CoreResult<T> = Result<T, CoreError>;

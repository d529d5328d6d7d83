//! Error types for DocAtlas.
//!
//! Library crates use [`DocAtlasError`] via `thiserror`.
//! The CLI wraps this with `color-eyre` for rich diagnostics.

use std::path::PathBuf;

/// Top-level error type for all DocAtlas operations.
#[derive(Debug, thiserror::Error)]
pub enum DocAtlasError {
    /// Configuration loading or validation error, including bad input paths.
    #[error("config error: {message}")]
    Config { message: String },

    /// Markdown or HTML content could not be interpreted.
    #[error("parse error: {message}")]
    Parse { message: String },

    /// Filesystem I/O error.
    #[error("I/O error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Data validation error (schema mismatch, invalid format, etc.).
    #[error("validation error: {message}")]
    Validation { message: String },

    /// Zip archive creation error.
    #[error("archive error: {0}")]
    Archive(String),

    /// JSON or TOML serialization error.
    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Convenience alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, DocAtlasError>;

impl DocAtlasError {
    /// Create a config error from any displayable message.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    /// Create a parse error from any displayable message.
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse {
            message: msg.into(),
        }
    }

    /// Create a validation error from any displayable message.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation {
            message: msg.into(),
        }
    }

    /// Wrap a `std::io::Error` with a path for context.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// True for errors caused by the user's input rather than the run itself.
    pub fn is_config(&self) -> bool {
        matches!(self, Self::Config { .. })
    }
}

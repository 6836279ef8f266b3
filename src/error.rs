use std::path::PathBuf;

use thiserror::Error;

/// Unified error type for modtag operations
#[derive(Error, Debug)]
pub enum ModtagError {
    #[error("not a git repository: {path}")]
    NotARepository { path: PathBuf },

    #[error("module discovery failed under {path}: {source}")]
    Discovery {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Release-commit declared/changed mismatch. The payload carries the
    /// complete, pre-formatted message so callers see it verbatim.
    #[error("{0}")]
    ModuleValidation(String),

    #[error("git {operation} failed: {source}")]
    Driver {
        operation: &'static str,
        #[source]
        source: git2::Error,
    },

    #[error("invalid version: {0}")]
    Version(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience type alias for Results in modtag
pub type Result<T> = std::result::Result<T, ModtagError>;

impl ModtagError {
    /// Wrap a git2 error with the driver operation that raised it
    pub fn driver(operation: &'static str, source: git2::Error) -> Self {
        ModtagError::Driver { operation, source }
    }

    /// Create a version error with context
    pub fn version(msg: impl Into<String>) -> Self {
        ModtagError::Version(msg.into())
    }

    /// Create a configuration error with context
    pub fn config(msg: impl Into<String>) -> Self {
        ModtagError::Config(msg.into())
    }
}

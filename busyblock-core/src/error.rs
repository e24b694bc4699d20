//! Error types for busyblock.

use thiserror::Error;

/// Errors that can occur while configuring or running a sync.
#[derive(Error, Debug)]
pub enum BusyBlockError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Provider error: {0}")]
    Provider(String),

    #[error("Provider not found in PATH: {0}")]
    ProviderNotInstalled(String),

    #[error("Provider request timed out after {0}s")]
    ProviderTimeout(u64),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for busyblock operations.
pub type BusyBlockResult<T> = Result<T, BusyBlockError>;

//! Error types for the Hondana library.
//!
//! Uses `thiserror` for structured error definitions that provide
//! clear context about what went wrong.

use thiserror::Error;

/// Error type for catalog lookups.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CatalogError {
    /// Manga, chapter or page list does not exist
    #[error("Not found: {0}")]
    NotFound(String),

    /// The catalog could not be reached or returned no data
    #[error("Data unavailable: {0}")]
    Unavailable(String),
}

/// Error type for the key-value storage layer.
#[derive(Error, Debug)]
pub enum StorageError {
    /// Underlying filesystem operation failed
    #[error("Storage I/O failed: {0}")]
    Io(#[from] std::io::Error),

    /// Writing the value would exceed the storage quota
    #[error("Storage quota exceeded: need {needed} bytes, {available} available")]
    QuotaExceeded { needed: usize, available: usize },
}

/// Error type for reading state store operations.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Reading a key from storage failed (distinct from the key being absent)
    #[error("Failed to read '{key}' from storage: {source}")]
    Read {
        key: &'static str,
        #[source]
        source: StorageError,
    },

    /// The update could not be persisted; the in-memory state was rolled back
    #[error("Failed to persist '{key}': {source}")]
    Write {
        key: &'static str,
        #[source]
        source: StorageError,
    },

    /// The entry cannot be stored as given
    #[error("Invalid favorite '{id}': {reason}")]
    InvalidEntry { id: String, reason: String },

    /// Serializing a collection failed
    #[error("Failed to encode reading state: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Error type for configuration operations.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to read config file
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    /// Failed to parse config file
    #[error("Failed to parse config: {0}")]
    ParseError(String),

    /// Invalid configuration value
    #[error("Invalid config value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Config directory not found
    #[error("Could not determine config directory")]
    NoConfigDir,
}

/// Result type alias using anyhow for application-level error handling.
pub type Result<T> = anyhow::Result<T>;

//! Error types for depot-core
//!
//! Provides the unified error taxonomy shared by every storage backend.
//! Adapters map their native failures onto these variants so callers can
//! branch on kind without knowing which backend produced the error.

use thiserror::Error;

/// Result type alias for depot-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for depot-core operations
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration file error or a profile missing a required option
    #[error("Configuration error: {0}")]
    Config(String),

    /// Invalid path format or a path escaping the location namespace
    #[error("Invalid path: {0}")]
    InvalidPath(String),

    /// Target container or item does not exist
    #[error("Not found: {0}")]
    NotFound(String),

    /// Creation attempt collided with an existing container
    #[error("Already exists: {0}")]
    AlreadyExists(String),

    /// Listing cursor does not name a known resume point
    #[error("Invalid cursor: {0}")]
    BadCursor(String),

    /// Declared content size disagrees with the bytes actually streamed
    #[error("Size mismatch: declared {declared} bytes, received {actual}")]
    SizeMismatch { declared: u64, actual: u64 },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// TOML parsing error
    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    /// TOML serialization error
    #[error("TOML serialization error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// URL parsing error
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Backend failure with no portable classification
    #[error("Backend error: {0}")]
    Backend(String),
}

impl Error {
    /// True when the target container or item did not exist
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Error::NotFound(_))
    }

    /// True when a listing cursor named no known resume point
    pub const fn is_bad_cursor(&self) -> bool {
        matches!(self, Error::BadCursor(_))
    }

    /// Get the appropriate exit code for this error
    pub const fn exit_code(&self) -> i32 {
        match self {
            Error::InvalidPath(_) => 2,  // UsageError
            Error::Config(_) => 2,       // UsageError
            Error::BadCursor(_) => 2,    // UsageError
            Error::Backend(_) => 3,      // BackendError
            Error::NotFound(_) => 5,     // NotFound
            Error::AlreadyExists(_) => 6, // Conflict
            _ => 1,                      // GeneralError
        }
    }
}

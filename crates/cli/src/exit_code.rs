//! Exit code definitions for the depot CLI
//!
//! Scripts branch on these, so the table is part of the CLI's contract
//! and changing an assigned value is a breaking change.

use depot_core::Error;

/// Exit codes for the depot CLI.
///
/// These codes follow a consistent convention to allow scripts and automation
/// to handle different error scenarios appropriately.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitCode {
    /// Operation completed successfully
    Success = 0,

    /// General/unspecified error
    GeneralError = 1,

    /// User input error: invalid arguments, malformed path, bad cursor, etc.
    UsageError = 2,

    /// Backend or network failure with no portable classification
    BackendError = 3,

    /// Authentication or permission failure
    AuthError = 4,

    /// Resource not found: profile, container, or item does not exist
    NotFound = 5,

    /// Conflict: container already exists or is not empty
    Conflict = 6,

    /// Operation was interrupted (e.g., Ctrl+C)
    Interrupted = 130,
}

impl ExitCode {
    /// Convert exit code to i32 for use with std::process::exit
    #[inline]
    pub const fn as_i32(self) -> i32 {
        self as i32
    }

    /// Create exit code from i32 value
    ///
    /// Returns None if the value doesn't correspond to a known exit code.
    pub const fn from_i32(code: i32) -> Option<Self> {
        match code {
            0 => Some(Self::Success),
            1 => Some(Self::GeneralError),
            2 => Some(Self::UsageError),
            3 => Some(Self::BackendError),
            4 => Some(Self::AuthError),
            5 => Some(Self::NotFound),
            6 => Some(Self::Conflict),
            130 => Some(Self::Interrupted),
            _ => None,
        }
    }

    /// Map a storage error onto the exit code table
    ///
    /// Backend errors carry the native failure text; credential failures
    /// are recognizable there and reported as auth rather than as a
    /// generic backend error, and a non-empty container collision on
    /// removal is a conflict.
    pub fn from_error(err: &Error) -> Self {
        if let Error::Backend(message) = err {
            if message.contains("AccessDenied")
                || message.contains("InvalidAccessKeyId")
                || message.contains("SignatureDoesNotMatch")
            {
                return Self::AuthError;
            }
            if message.contains("BucketNotEmpty") {
                return Self::Conflict;
            }
        }
        Self::from_i32(err.exit_code()).unwrap_or(Self::GeneralError)
    }

    /// Get a human-readable description of the exit code
    pub const fn description(self) -> &'static str {
        match self {
            Self::Success => "Operation completed successfully",
            Self::GeneralError => "General error",
            Self::UsageError => "Invalid arguments or path format",
            Self::BackendError => "Backend or network error (retryable)",
            Self::AuthError => "Authentication or permission failure",
            Self::NotFound => "Resource not found",
            Self::Conflict => "Conflict with existing state",
            Self::Interrupted => "Operation interrupted",
        }
    }
}

impl From<ExitCode> for i32 {
    fn from(code: ExitCode) -> Self {
        code.as_i32()
    }
}

impl std::fmt::Display for ExitCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.description(), self.as_i32())
    }
}

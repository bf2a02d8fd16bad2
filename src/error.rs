//! Error types for the Now API client.
//!
//! Every failure a caller can observe is one of a small set of kinds:
//! configuration problems raised while building the client, transport-level
//! I/O failures, and unsuccessful (non-2xx) responses returned by the platform.

use std::path::PathBuf;
use thiserror::Error;

/// The main error type for the Now API client.
#[derive(Debug, Error)]
pub enum NowError {
    /// Configuration or credential-resolution errors.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Transport failure: network error, timeout, or a malformed or empty payload.
    #[error("I/O error: {message}")]
    Io {
        /// Description of the failure.
        message: String,
    },

    /// The platform answered with a status outside the 2xx range.
    #[error("Unsuccessful response: {status} - {message}")]
    UnsuccessfulResponse {
        /// HTTP status code.
        status: u16,
        /// Message provided by the server.
        message: String,
    },

    /// An argument was rejected before any request was sent.
    #[error("Invalid argument '{name}': {reason}")]
    InvalidArgument {
        /// Name of the offending argument.
        name: String,
        /// Why it was rejected.
        reason: String,
    },

    /// Generic internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Configuration-related errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// No token could be found through any credential source.
    #[error("Token not found: no explicit token, config file token, or NOW_TOKEN variable")]
    MissingToken,

    /// An explicitly supplied token was empty or blank.
    #[error("Token cannot be blank")]
    BlankToken,

    /// The credential file could not be read.
    #[error("Failed to read {path}: {message}")]
    ReadError {
        /// Path to the unreadable file.
        path: PathBuf,
        /// Description of the read error.
        message: String,
    },

    /// The credential file could not be parsed.
    #[error("Failed to parse configuration: {message}")]
    ParseError {
        /// Description of the parse error.
        message: String,
        /// Optional source location.
        location: Option<String>,
    },

    /// A client option is invalid.
    #[error("Invalid client option: {message}")]
    InvalidOption {
        /// Description of the invalid option.
        message: String,
    },
}

/// Result type alias for Now client operations.
pub type Result<T> = std::result::Result<T, NowError>;

impl NowError {
    /// Creates a new internal error with the given message.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// Creates an I/O error.
    #[must_use]
    pub fn io(message: impl Into<String>) -> Self {
        Self::Io {
            message: message.into(),
        }
    }

    /// Creates an unsuccessful-response error.
    #[must_use]
    pub fn unsuccessful(status: u16, message: impl Into<String>) -> Self {
        Self::UnsuccessfulResponse {
            status,
            message: message.into(),
        }
    }

    /// Creates an invalid-argument error.
    #[must_use]
    pub fn invalid_argument(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidArgument {
            name: name.into(),
            reason: reason.into(),
        }
    }

    /// Returns the HTTP status code for unsuccessful responses.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::UnsuccessfulResponse { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Returns true if the server answered with a non-2xx status.
    #[must_use]
    pub const fn is_unsuccessful_response(&self) -> bool {
        matches!(self, Self::UnsuccessfulResponse { .. })
    }

    /// Returns true if this is a transport-level failure.
    #[must_use]
    pub const fn is_io(&self) -> bool {
        matches!(self, Self::Io { .. })
    }
}

impl From<reqwest::Error> for NowError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            Self::io(format!("Failed to parse response: {e}"))
        } else {
            Self::io(format!("Request failed: {e}"))
        }
    }
}

impl ConfigError {
    /// Creates a parse error for a specific source location.
    #[must_use]
    pub fn parse(message: impl Into<String>, location: impl Into<String>) -> Self {
        Self::ParseError {
            message: message.into(),
            location: Some(location.into()),
        }
    }

    /// Creates an invalid-option error.
    #[must_use]
    pub fn invalid_option(message: impl Into<String>) -> Self {
        Self::InvalidOption {
            message: message.into(),
        }
    }
}

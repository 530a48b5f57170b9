/*!
 * Error types for the alertqa application.
 *
 * This module contains custom error types for the different parts of the engine,
 * using the thiserror crate for ergonomic error definitions.
 *
 * Scoring never fails: degenerate inputs resolve to neutral scores, so there is
 * no error type for the scorer.
 */

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

/// Errors that can occur when calling a translation provider
#[derive(Error, Debug)]
pub enum ProviderError {
    /// Error when making an API request fails
    #[error("API request failed: {0}")]
    RequestFailed(String),

    /// Error when parsing an API response fails
    #[error("Failed to parse API response: {0}")]
    ParseError(String),

    /// Error returned by the API itself
    #[error("API responded with error: {status_code} - {message}")]
    ApiError {
        /// HTTP status code
        status_code: u16,
        /// Error message from the API
        message: String,
    },

    /// Error establishing or maintaining a connection
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// Error related to rate limiting
    #[error("Rate limit exceeded: {0}")]
    RateLimitExceeded(String),

    /// Error with authentication
    #[error("Authentication error: {0}")]
    AuthenticationError(String),

    /// The call did not complete within the configured timeout
    #[error("Provider call timed out after {0:?}")]
    Timeout(Duration),

    /// The provider answered but returned no text
    #[error("Provider returned an empty response")]
    EmptyResponse,
}

impl ProviderError {
    /// Map an HTTP status and body to the matching error variant
    pub fn from_status(status_code: u16, message: impl Into<String>) -> Self {
        let message = message.into();
        match status_code {
            401 | 403 => Self::AuthenticationError(message),
            429 => Self::RateLimitExceeded(message),
            _ => Self::ApiError { status_code, message },
        }
    }

    /// Whether retrying the same request could succeed
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::ConnectionError(_) | Self::RateLimitExceeded(_) | Self::Timeout(_) => true,
            Self::ApiError { status_code, .. } => *status_code >= 500,
            _ => false,
        }
    }
}

impl From<reqwest::Error> for ProviderError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_timeout() {
            Self::ConnectionError(format!("request timed out: {}", error))
        } else if error.is_connect() {
            Self::ConnectionError(error.to_string())
        } else if error.is_decode() {
            Self::ParseError(error.to_string())
        } else {
            Self::RequestFailed(error.to_string())
        }
    }
}

/// Errors that can occur while loading the reference lexicon.
///
/// Any of these is fatal at startup: the engine never runs on a partially
/// loaded lexicon.
#[derive(Error, Debug)]
pub enum LexiconLoadError {
    /// The lexicon file could not be read
    #[error("Failed to read lexicon file {path:?}: {source}")]
    Io {
        /// Path of the lexicon asset
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// The lexicon document is not valid JSON or does not match the schema
    #[error("Failed to parse lexicon document: {0}")]
    Parse(#[from] serde_json::Error),

    /// An entry violates a lexicon invariant
    #[error("Invalid lexicon entry \"{term}\": {reason}")]
    Invalid {
        /// Source term of the offending entry
        term: String,
        /// Which invariant was violated
        reason: String,
    },

    /// The source has no asset that can be read
    #[error("{0} has no backing asset to read")]
    NoAsset(String),
}

/// Main application error type that wraps all other errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Error from a file operation
    #[error("File error: {0}")]
    File(String),

    /// Invalid configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// Error from a provider
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    /// Error from loading the lexicon
    #[error("Lexicon error: {0}")]
    Lexicon(#[from] LexiconLoadError),

    /// Any other error
    #[error("Unknown error: {0}")]
    Unknown(String),
}

// Utility functions for error conversion
impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        Self::Unknown(error.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(error: std::io::Error) -> Self {
        Self::File(error.to_string())
    }
}

//! Lookup error taxonomy.
//!
//! Every failure a lookup can produce is a [`LookupError`]. The variants carry
//! the context needed to decide on a retry (URL, status, timeout bound) and
//! the `code`/`retryable` pair is derived from the variant, never supplied by
//! the caller.

use std::fmt;

use serde::Serialize;
use thiserror::Error;

use crate::registry;

/// Stable machine-readable error codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    InvalidEcosystem,
    InvalidInput,
    PackageNotFound,
    DatabaseError,
    InternalError,
    ApiError,
    ApiTimeout,
    ApiUnavailable,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::InvalidEcosystem => "INVALID_ECOSYSTEM",
            ErrorCode::InvalidInput => "INVALID_INPUT",
            ErrorCode::PackageNotFound => "PACKAGE_NOT_FOUND",
            ErrorCode::DatabaseError => "DATABASE_ERROR",
            ErrorCode::InternalError => "INTERNAL_ERROR",
            ErrorCode::ApiError => "API_ERROR",
            ErrorCode::ApiTimeout => "API_TIMEOUT",
            ErrorCode::ApiUnavailable => "API_UNAVAILABLE",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error)]
pub enum LookupError {
    #[error("Unknown ecosystem: {0}")]
    InvalidEcosystem(String),

    #[error("{0}")]
    InvalidInput(String),

    #[error("Package not found: {0}")]
    PackageNotFound(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Internal error: {message}")]
    Internal { message: String, details: Option<String> },

    #[error("API error: {status} {status_text}")]
    Api {
        status: u16,
        status_text: String,
        url: String,
    },

    #[error("API request timed out after {timeout_ms}ms")]
    ApiTimeout { url: String, timeout_ms: u64 },

    #[error("API unavailable: {reason}")]
    ApiUnavailable { url: String, reason: String },
}

impl LookupError {
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }

    pub fn internal(message: impl Into<String>, details: Option<String>) -> Self {
        Self::Internal {
            message: message.into(),
            details,
        }
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            Self::InvalidEcosystem(_) => ErrorCode::InvalidEcosystem,
            Self::InvalidInput(_) => ErrorCode::InvalidInput,
            Self::PackageNotFound(_) => ErrorCode::PackageNotFound,
            Self::Database(_) => ErrorCode::DatabaseError,
            Self::Internal { .. } => ErrorCode::InternalError,
            Self::Api { .. } => ErrorCode::ApiError,
            Self::ApiTimeout { .. } => ErrorCode::ApiTimeout,
            Self::ApiUnavailable { .. } => ErrorCode::ApiUnavailable,
        }
    }

    /// Supplementary context: the request URL for remote failures, the list
    /// of supported ecosystems for an unknown one.
    pub fn details(&self) -> Option<String> {
        match self {
            Self::InvalidEcosystem(_) => Some(format!(
                "Supported: {}",
                registry::supported_ecosystems().collect::<Vec<_>>().join(", ")
            )),
            Self::Internal { details, .. } => details.clone(),
            Self::Api { url, .. } | Self::ApiTimeout { url, .. } | Self::ApiUnavailable { url, .. } => {
                Some(url.clone())
            }
            _ => None,
        }
    }

    pub fn retryable(&self) -> bool {
        match self {
            Self::Api { status, .. } => *status >= 500 || *status == 429,
            Self::ApiTimeout { .. } | Self::ApiUnavailable { .. } => true,
            _ => false,
        }
    }

    pub fn report(&self) -> ErrorReport {
        ErrorReport {
            code: self.code(),
            message: self.to_string(),
            details: self.details(),
            retryable: self.retryable(),
        }
    }
}

/// Structured, serializable view of a [`LookupError`].
///
/// `Display` renders the single line shown to users:
/// `[CODE] message (details) - may retry`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorReport {
    pub code: ErrorCode,
    pub message: String,
    pub details: Option<String>,
    pub retryable: bool,
}

impl fmt::Display for ErrorReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)?;
        if let Some(details) = &self.details {
            write!(f, " ({})", details)?;
        }
        if self.retryable {
            f.write_str(" - may retry")?;
        }
        Ok(())
    }
}

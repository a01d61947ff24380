//! Error types for Uber Ads API operations.

use thiserror::Error;

/// Result type for Uber Ads operations.
pub type AdsResult<T> = Result<T, AdsError>;

/// Errors that can occur while calling the Uber Ads API.
#[derive(Debug, Error)]
pub enum AdsError {
    /// The API answered with a non-success status, after any retries.
    #[error("Uber Ads API error: {message}")]
    Api {
        /// HTTP status code, when one was received.
        status: Option<u16>,
        /// Message extracted from the error body, or the raw error text.
        message: String,
    },

    /// The request never produced a usable response (connect failure,
    /// timeout), after any retries.
    #[error("request error: {source}")]
    Transport {
        /// Underlying HTTP client error.
        #[source]
        source: reqwest::Error,
    },

    /// A success response carried a body this client cannot decode.
    #[error("invalid response payload: {source}")]
    Decode {
        /// Underlying deserialisation error.
        #[source]
        source: serde_json::Error,
    },

    /// The client could not be constructed from the given configuration.
    #[error("invalid client configuration: {message}")]
    InvalidConfig {
        /// Description of what's wrong (never a credential value).
        message: String,
    },
}

impl AdsError {
    /// Creates an API error.
    pub fn api(status: Option<u16>, message: impl Into<String>) -> Self {
        Self::Api {
            status,
            message: message.into(),
        }
    }

    /// Creates an invalid-configuration error.
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            message: message.into(),
        }
    }

    /// Returns the HTTP status code associated with this error, if any.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => *status,
            _ => None,
        }
    }
}

/// A tool-argument validation failure.
///
/// Collects every offending field so the caller sees all problems at once
/// rather than fixing them one round-trip at a time. Validation happens
/// before any remote call is attempted.
#[derive(Debug, Error)]
#[error("{}", .problems.join("; "))]
pub struct ValidationError {
    /// One human-readable entry per offending field.
    pub problems: Vec<String>,
}

impl ValidationError {
    /// Creates a validation error from collected problems.
    #[must_use]
    pub const fn new(problems: Vec<String>) -> Self {
        Self { problems }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_error_display() {
        let err = AdsError::api(Some(404), "campaign not found");
        assert_eq!(err.to_string(), "Uber Ads API error: campaign not found");
        assert_eq!(err.status(), Some(404));
    }

    #[test]
    fn api_error_without_status() {
        let err = AdsError::api(None, "connection reset");
        assert_eq!(err.status(), None);
    }

    #[test]
    fn validation_error_joins_problems() {
        let err = ValidationError::new(vec![
            "missing required field 'ad_account_id'".to_string(),
            "field 'limit' must be an integer".to_string(),
        ]);
        assert_eq!(
            err.to_string(),
            "missing required field 'ad_account_id'; field 'limit' must be an integer"
        );
    }
}

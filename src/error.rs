//! Error types for the coin dashboard SDK

use crate::constants::DEFAULT_RETRY_AFTER_SECS;
use thiserror::Error;

/// Errors that can occur when fetching or serving market data
///
/// This is the single error shape that crosses the client boundary; no
/// transport error type escapes. The enum is `Clone` because deduplicated
/// fetches fan a single result out to every waiting caller.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ApiError {
    /// Upstream rejected the request with HTTP 429
    #[error("Too many requests. Please wait before trying again.")]
    RateLimited {
        /// Advisory wait before retrying, in seconds
        retry_after_secs: u64,
    },

    /// The request did not complete within the configured timeout
    #[error("Request timeout")]
    Timeout,

    /// Network-level failure (DNS, connect, TLS, interrupted body)
    #[error("Network error: {0}")]
    Network(String),

    /// Upstream returned a non-success HTTP status other than 429
    #[error("HTTP {status}: {message}")]
    Api { status: u16, message: String },

    /// Response body could not be decoded into the expected shape
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// The HTTP call succeeded but the payload is missing required data
    #[error("Missing data: {0}")]
    MissingData(String),
}

impl ApiError {
    /// HTTP status code surfaced by the transport, if any
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::RateLimited { .. } => Some(429),
            ApiError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// True if this failure was a rate-limit rejection
    pub fn is_rate_limit(&self) -> bool {
        matches!(self, ApiError::RateLimited { .. })
    }

    /// Advisory wait before retrying, in seconds (rate-limit failures only)
    pub fn retry_after_secs(&self) -> Option<u64> {
        match self {
            ApiError::RateLimited { retry_after_secs } => Some(*retry_after_secs),
            _ => None,
        }
    }

    /// True for 4xx-class failures other than 429
    ///
    /// Client errors are not transient and must never be retried.
    pub fn is_client_error(&self) -> bool {
        match self {
            ApiError::Api { status, .. } => (400..500).contains(status),
            _ => false,
        }
    }

    /// Creates a rate-limit error, falling back to the default wait
    pub fn rate_limited(retry_after_secs: Option<u64>) -> Self {
        Self::RateLimited {
            retry_after_secs: retry_after_secs.unwrap_or(DEFAULT_RETRY_AFTER_SECS),
        }
    }

    /// Creates an InvalidResponse error
    pub fn invalid_response(msg: impl Into<String>) -> Self {
        Self::InvalidResponse(msg.into())
    }

    /// Creates a MissingData error
    pub fn missing_data(msg: impl Into<String>) -> Self {
        Self::MissingData(msg.into())
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ApiError::Timeout
        } else if let Some(status) = err.status() {
            if status.as_u16() == 429 {
                ApiError::rate_limited(None)
            } else {
                ApiError::Api {
                    status: status.as_u16(),
                    message: err.to_string(),
                }
            }
        } else if err.is_decode() {
            ApiError::InvalidResponse(err.to_string())
        } else {
            ApiError::Network(err.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rate_limited_defaults_to_sixty_seconds() {
        let err = ApiError::rate_limited(None);
        assert!(err.is_rate_limit());
        assert_eq!(err.retry_after_secs(), Some(60));
        assert_eq!(err.status(), Some(429));
    }

    #[test]
    fn rate_limited_keeps_advisory_wait() {
        let err = ApiError::rate_limited(Some(5));
        assert_eq!(err.retry_after_secs(), Some(5));
    }

    #[test]
    fn client_error_classification_excludes_429() {
        let not_found = ApiError::Api {
            status: 404,
            message: "coin not found".to_string(),
        };
        assert!(not_found.is_client_error());
        assert!(!ApiError::rate_limited(None).is_client_error());

        let server = ApiError::Api {
            status: 503,
            message: "maintenance".to_string(),
        };
        assert!(!server.is_client_error());
        assert!(!ApiError::Timeout.is_client_error());
    }
}

//! Error types for flops API operations.
//!
//! This module provides the error taxonomy surfaced by every client call and the
//! table that maps provider error codes embedded in response envelopes onto it.

use serde_json::Value;
use thiserror::Error;

/// Main error type for flops API operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// Missing or rejected credentials, or the caller does not own the object
    #[error("Authorization failed: {0}")]
    Authorization(String),

    /// Object or VM does not exist
    #[error("Not found: {0}")]
    NotFound(String),

    /// Malformed caller input, detected locally or reported by the provider
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// Plan or resource limit reached
    #[error("Quota exceeded: {0}")]
    QuotaExceeded(String),

    /// An operation is already running against the resource
    #[error("Operation in progress: {0}")]
    Conflict(String),

    /// Catch-all provider error, including non-200 HTTP statuses
    #[error("API error: {0}")]
    ApiError(String),

    /// The operation poller deadline elapsed
    #[error("Timeout waiting for operation: {0}")]
    OperationTimeout(String),

    /// HTTP request could not be completed
    #[error("HTTP request failed: {0}")]
    HttpError(String),

    /// HTTP request timed out
    #[error("Request timed out: {0}")]
    Timeout(String),

    /// Response body was not valid JSON
    #[error("Failed to parse response: {0}")]
    ParseError(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Invalid endpoint
    #[error("Invalid endpoint: {0}")]
    InvalidEndpoint(String),
}

/// Specialized result type for flops API operations.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Classify a provider error envelope.
    ///
    /// The first matching row of the code table wins. Without a code, non-empty
    /// field errors produce a [`Error::ValidationError`] carrying the field detail;
    /// anything else falls back to [`Error::ApiError`]. The provider message is
    /// kept verbatim in every branch.
    #[must_use]
    pub fn from_provider(code: Option<&str>, message: &str, field_errors: Option<&Value>) -> Self {
        let message = message.to_string();
        match code {
            Some("error.not.owner") => Self::Authorization(message),
            Some("error.object.not.found" | "error.vm.not.found") => Self::NotFound(message),
            Some("unexpected.exception") => Self::ApiError(message),
            Some("vm.limit.exceed") => Self::QuotaExceeded(message),
            Some("error.vm.volume.under.operation" | "error.operation.already.started") => {
                Self::Conflict(message)
            }
            None => match field_errors.filter(|errors| has_content(errors)) {
                Some(errors) => Self::ValidationError(format!("{}{message}", render(errors))),
                None => Self::ApiError(message),
            },
            Some(_) => Self::ApiError(message),
        }
    }

    /// Returns the error code for this error type.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Authorization(_) => "AUTHORIZATION",
            Self::NotFound(_) => "NOT_FOUND",
            Self::ValidationError(_) => "VALIDATION_ERROR",
            Self::QuotaExceeded(_) => "QUOTA_EXCEEDED",
            Self::Conflict(_) => "CONFLICT",
            Self::ApiError(_) => "API_ERROR",
            Self::OperationTimeout(_) => "OPERATION_TIMEOUT",
            Self::HttpError(_) => "HTTP_ERROR",
            Self::Timeout(_) => "TIMEOUT",
            Self::ParseError(_) => "PARSE_ERROR",
            Self::ConfigError(_) => "CONFIG_ERROR",
            Self::InvalidEndpoint(_) => "INVALID_ENDPOINT",
        }
    }

    /// Returns true for [`Error::NotFound`], which teardown code commonly ignores.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}

fn has_content(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(flag) => *flag,
        Value::String(text) => !text.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
        Value::Number(_) => true,
    }
}

fn render(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

// Conversions from external error types
impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout(err.to_string())
        } else {
            Self::HttpError(err.to_string())
        }
    }
}

impl From<url::ParseError> for Error {
    fn from(err: url::ParseError) -> Self {
        Self::InvalidEndpoint(err.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::ParseError(err.to_string())
    }
}

impl From<validator::ValidationErrors> for Error {
    fn from(err: validator::ValidationErrors) -> Self {
        Self::ValidationError(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_not_owner_is_authorization() {
        let err = Error::from_provider(Some("error.not.owner"), "not yours", None);
        assert_eq!(err, Error::Authorization("not yours".to_string()));
    }

    #[test]
    fn test_not_found_codes() {
        for code in ["error.object.not.found", "error.vm.not.found"] {
            let err = Error::from_provider(Some(code), "gone", None);
            assert!(err.is_not_found(), "{code} should map to NotFound");
        }
    }

    #[test]
    fn test_not_found_ignores_message_and_field_errors() {
        let err = Error::from_provider(
            Some("error.object.not.found"),
            "vm.limit.exceed",
            Some(&json!({"name": "required"})),
        );
        assert!(matches!(err, Error::NotFound(_)));
    }

    #[test]
    fn test_quota_and_conflict_codes() {
        assert!(matches!(
            Error::from_provider(Some("vm.limit.exceed"), "limit", None),
            Error::QuotaExceeded(_)
        ));
        assert!(matches!(
            Error::from_provider(Some("error.vm.volume.under.operation"), "busy", None),
            Error::Conflict(_)
        ));
        assert!(matches!(
            Error::from_provider(Some("error.operation.already.started"), "busy", None),
            Error::Conflict(_)
        ));
    }

    #[test]
    fn test_unexpected_exception_is_generic() {
        let err = Error::from_provider(Some("unexpected.exception"), "boom", None);
        assert_eq!(err, Error::ApiError("boom".to_string()));
    }

    #[test]
    fn test_field_errors_without_code_are_validation() {
        let errors = json!({"memory": "must be at least 512"});
        let err = Error::from_provider(None, "Invalid parameters", Some(&errors));
        match err {
            Error::ValidationError(message) => {
                assert!(message.contains("must be at least 512"));
                assert!(message.contains("Invalid parameters"));
            }
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn test_empty_field_errors_fall_back() {
        for errors in [json!(""), json!({}), json!([]), Value::Null] {
            let err = Error::from_provider(None, "failed", Some(&errors));
            assert_eq!(err, Error::ApiError("failed".to_string()));
        }
        assert_eq!(
            Error::from_provider(None, "failed", None),
            Error::ApiError("failed".to_string())
        );
    }

    #[test]
    fn test_field_errors_with_unknown_code_fall_back() {
        let errors = json!({"name": "required"});
        let err = Error::from_provider(Some("error.something.else"), "odd", Some(&errors));
        assert_eq!(err, Error::ApiError("odd".to_string()));
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(
            Error::Authorization("test".to_string()).error_code(),
            "AUTHORIZATION"
        );
        assert_eq!(
            Error::QuotaExceeded("test".to_string()).error_code(),
            "QUOTA_EXCEEDED"
        );
        assert_eq!(
            Error::OperationTimeout("test".to_string()).error_code(),
            "OPERATION_TIMEOUT"
        );
        assert_eq!(
            Error::ParseError("test".to_string()).error_code(),
            "PARSE_ERROR"
        );
    }

    #[test]
    fn test_error_display() {
        let err = Error::Conflict("volume is busy".to_string());
        assert_eq!(err.to_string(), "Operation in progress: volume is busy");
    }

    #[test]
    fn test_from_url_parse_error() {
        let err = url::Url::parse("not a url").unwrap_err();
        let flops_err: Error = err.into();
        assert!(matches!(flops_err, Error::InvalidEndpoint(_)));
    }

    #[test]
    fn test_from_serde_json_error() {
        let err = serde_json::from_str::<Value>("{invalid json}").unwrap_err();
        let flops_err: Error = err.into();
        assert!(matches!(flops_err, Error::ParseError(_)));
    }
}

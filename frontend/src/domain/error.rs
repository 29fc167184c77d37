//! Domain-level error types.
//!
//! These errors are transport agnostic. Screens render them as a display
//! string; the CLI composition root wraps them in an `eyre` report.

use std::fmt;

use serde::Serialize;
use serde_json::Value;

use super::ports::ApiError;

/// Stable machine-readable error code describing the failure category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[non_exhaustive]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    /// Input failed local validation or the API rejected the request shape.
    InvalidRequest,
    /// Authentication failed or no session is present.
    Unauthorized,
    /// Authenticated but not permitted to perform this action.
    Forbidden,
    /// The requested resource does not exist.
    NotFound,
    /// The API could not be reached or answered with a server error.
    ServiceUnavailable,
    /// An unexpected error occurred, such as an undecodable payload.
    InternalError,
}

impl ErrorCode {
    fn fallback_message(self) -> &'static str {
        match self {
            Self::InvalidRequest => "invalid request",
            Self::Unauthorized => "authentication required",
            Self::Forbidden => "access denied",
            Self::NotFound => "not found",
            Self::ServiceUnavailable => "conference API unavailable",
            Self::InternalError => "unexpected error",
        }
    }
}

/// Domain error payload surfaced to screens.
///
/// ## Invariants
/// - `message` is never blank; a blank input is replaced by a generic message
///   for the error code so error panels always have something to show.
///
/// # Examples
/// ```
/// use conference_frontend::domain::{Error, ErrorCode};
///
/// let err = Error::new(ErrorCode::NotFound, "missing");
/// assert_eq!(err.code(), ErrorCode::NotFound);
/// assert_eq!(Error::not_found("  ").message(), "not found");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Error {
    code: ErrorCode,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<Value>,
}

impl Error {
    /// Create a new error.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        let message = message.into();
        let message = if message.trim().is_empty() {
            code.fallback_message().to_owned()
        } else {
            message
        };
        Self {
            code,
            message,
            details: None,
        }
    }

    /// Stable machine-readable error code.
    pub fn code(&self) -> ErrorCode {
        self.code
    }

    /// Human-readable message shown on error panels.
    pub fn message(&self) -> &str {
        self.message.as_str()
    }

    /// Supplementary error details, such as per-field validation messages.
    pub fn details(&self) -> Option<&Value> {
        self.details.as_ref()
    }

    /// Attach structured details to the error.
    pub fn with_details(mut self, details: Value) -> Self {
        self.details = Some(details);
        self
    }

    /// Convenience constructor for [`ErrorCode::InvalidRequest`].
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidRequest, message)
    }

    /// Convenience constructor for [`ErrorCode::Unauthorized`].
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Unauthorized, message)
    }

    /// Convenience constructor for [`ErrorCode::Forbidden`].
    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Forbidden, message)
    }

    /// Convenience constructor for [`ErrorCode::NotFound`].
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::NotFound, message)
    }

    /// Convenience constructor for [`ErrorCode::ServiceUnavailable`].
    pub fn service_unavailable(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ServiceUnavailable, message)
    }

    /// Convenience constructor for [`ErrorCode::InternalError`].
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InternalError, message)
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for Error {}

impl From<ApiError> for Error {
    fn from(value: ApiError) -> Self {
        let message = value.to_string();
        let code = match &value {
            ApiError::Transport { .. } => ErrorCode::ServiceUnavailable,
            ApiError::Decode { .. } => ErrorCode::InternalError,
            ApiError::Http { status, .. } => match *status {
                401 => ErrorCode::Unauthorized,
                403 => ErrorCode::Forbidden,
                404 => ErrorCode::NotFound,
                400..=499 => ErrorCode::InvalidRequest,
                _ => ErrorCode::ServiceUnavailable,
            },
        };
        Self::new(code, message)
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    #[rstest]
    #[case(401, ErrorCode::Unauthorized)]
    #[case(403, ErrorCode::Forbidden)]
    #[case(404, ErrorCode::NotFound)]
    #[case(422, ErrorCode::InvalidRequest)]
    #[case(500, ErrorCode::ServiceUnavailable)]
    fn http_statuses_map_to_codes(#[case] status: u16, #[case] expected: ErrorCode) {
        let err = Error::from(ApiError::http(status, "nope"));
        assert_eq!(err.code(), expected);
        assert_eq!(err.message(), format!("HTTP error: {status} - nope"));
    }

    #[test]
    fn transport_failures_are_service_unavailable() {
        let err = Error::from(ApiError::transport("connection refused"));
        assert_eq!(err.code(), ErrorCode::ServiceUnavailable);
        assert!(err.message().contains("connection refused"));
    }

    #[test]
    fn blank_messages_fall_back_to_code_text() {
        let err = Error::internal("   ");
        assert_eq!(err.message(), "unexpected error");
    }

    #[test]
    fn serialises_details_only_when_present() {
        let plain = serde_json::to_value(Error::forbidden("no")).expect("serialise");
        assert_eq!(plain, json!({ "code": "forbidden", "message": "no" }));

        let detailed = Error::invalid_request("bad")
            .with_details(json!({ "title": "required" }));
        let value = serde_json::to_value(detailed).expect("serialise");
        assert_eq!(value["details"]["title"], "required");
    }
}

//! Domain-level error types.
//!
//! These errors are transport agnostic. Inbound adapters map them to HTTP
//! responses or any other protocol-specific envelope.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::TraceId;

/// Generic message surfaced when the backing store cannot be reached.
pub const RETRY_LATER_MESSAGE: &str = "Please try again later.";

/// Message shared by every refused ownership check.
pub const NOT_ALLOWED_MESSAGE: &str = "You are not allowed to perform this action.";

/// Message shared by every failed credential check.
pub const INVALID_CREDENTIALS_MESSAGE: &str = "Invalid username or password.";

/// Stable machine-readable error code describing the failure category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[non_exhaustive]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    /// Input failed shape or uniqueness rules.
    InvalidRequest,
    /// Credentials did not match.
    Unauthorized,
    /// The actor lacks rights over the resource, or the resource is absent.
    Forbidden,
    /// The requested resource or identifier does not exist.
    NotFound,
    /// The store is temporarily unreachable; the caller may retry.
    ServiceUnavailable,
    /// An unexpected error occurred inside the domain.
    InternalError,
}

/// Domain error payload.
///
/// ## Invariants
/// - `message` is never blank; constructors substitute a code-specific
///   fallback when given an empty message.
/// - `errors` is only populated for [`ErrorCode::InvalidRequest`] and keeps
///   every violated rule in the order it was detected.
///
/// # Examples
/// ```
/// use postapp::domain::{Error, ErrorCode};
///
/// let err = Error::validation(vec!["You must provide a title.".to_owned()]);
/// assert_eq!(err.code(), ErrorCode::InvalidRequest);
/// assert_eq!(err.errors(), ["You must provide a title."]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Error {
    #[schema(example = "invalid_request")]
    code: ErrorCode,
    #[schema(example = "Validation failed.")]
    message: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    errors: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    trace_id: Option<String>,
}

impl Error {
    /// Create a new error with the given code and message.
    ///
    /// Captures the trace identifier of the current request when one is in
    /// scope.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        let message = message.into();
        let message = if message.trim().is_empty() {
            fallback_message(code).to_owned()
        } else {
            message
        };
        Self {
            code,
            message,
            errors: Vec::new(),
            trace_id: TraceId::current().map(|id| id.to_string()),
        }
    }

    /// Stable machine-readable error code.
    pub fn code(&self) -> ErrorCode {
        self.code
    }

    /// Human-readable message returned to adapters.
    pub fn message(&self) -> &str {
        self.message.as_str()
    }

    /// Every violated validation rule, in detection order.
    pub fn errors(&self) -> &[String] {
        &self.errors
    }

    /// Correlation identifier attached by the inbound adapter, if any.
    pub fn trace_id(&self) -> Option<&str> {
        self.trace_id.as_deref()
    }

    /// Attach a request trace identifier.
    pub fn with_trace_id(mut self, trace_id: impl Into<String>) -> Self {
        self.trace_id = Some(trace_id.into());
        self
    }

    /// Validation failure carrying the full list of violated rules.
    pub fn validation(errors: Vec<String>) -> Self {
        let mut error = Self::new(ErrorCode::InvalidRequest, "Validation failed.");
        error.errors = errors;
        error
    }

    /// Credential mismatch. The message never reveals which part was wrong.
    pub fn authentication() -> Self {
        Self::new(ErrorCode::Unauthorized, INVALID_CREDENTIALS_MESSAGE)
    }

    /// Refused ownership check, indistinguishable from a missing resource.
    pub fn authorization() -> Self {
        Self::new(ErrorCode::Forbidden, NOT_ALLOWED_MESSAGE)
    }

    /// Convenience constructor for [`ErrorCode::Unauthorized`].
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Unauthorized, message)
    }

    /// Convenience constructor for [`ErrorCode::NotFound`].
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::NotFound, message)
    }

    /// Retryable store failure. Infrastructure detail stays in the logs.
    pub fn service_unavailable() -> Self {
        Self::new(ErrorCode::ServiceUnavailable, RETRY_LATER_MESSAGE)
    }

    /// Convenience constructor for [`ErrorCode::InternalError`].
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InternalError, message)
    }

    /// Whether the caller may retry the operation unchanged.
    pub fn is_retryable(&self) -> bool {
        self.code == ErrorCode::ServiceUnavailable
    }
}

fn fallback_message(code: ErrorCode) -> &'static str {
    match code {
        ErrorCode::InvalidRequest => "Validation failed.",
        ErrorCode::Unauthorized => INVALID_CREDENTIALS_MESSAGE,
        ErrorCode::Forbidden => NOT_ALLOWED_MESSAGE,
        ErrorCode::NotFound => "Not found.",
        ErrorCode::ServiceUnavailable => RETRY_LATER_MESSAGE,
        ErrorCode::InternalError => "Internal server error",
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.errors.is_empty() {
            write!(f, "{}", self.message)
        } else {
            write!(f, "{}: {}", self.message, self.errors.join("; "))
        }
    }
}

impl std::error::Error for Error {}

#[cfg(test)]
mod tests;

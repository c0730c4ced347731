//! Domain-level error types.
//!
//! These errors are transport agnostic. Inbound adapters map them to HTTP
//! responses, queue payloads, or any other protocol-specific envelope.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Stable machine-readable error code describing the failure category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[non_exhaustive]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    /// The request is malformed or fails validation.
    InvalidRequest,
    /// Authentication failed or is missing.
    Unauthorized,
    /// The entity exists but its current status does not permit the action.
    Forbidden,
    /// The requested resource does not exist.
    NotFound,
    /// The operation already happened; repeating it cannot succeed.
    Conflict,
    /// A dependency (storage, notification transport) is unreachable.
    ServiceUnavailable,
    /// An unexpected error occurred inside the domain.
    InternalError,
}

/// Domain error payload.
///
/// ## Invariants
/// - `message` must be non-empty once trimmed of whitespace.
///
/// # Examples
/// ```
/// use backend::domain::{Error, ErrorCode};
///
/// let err = Error::new(ErrorCode::NotFound, "missing");
/// assert_eq!(err.code(), ErrorCode::NotFound);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[serde(deny_unknown_fields)]
#[serde(try_from = "ErrorDto", into = "ErrorDto")]
pub struct Error {
    code: ErrorCode,
    message: String,
    details: Option<Value>,
}

/// Validation errors emitted by the constructors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ErrorValidationError {
    EmptyMessage,
}

impl std::fmt::Display for ErrorValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyMessage => write!(f, "error message must not be empty"),
        }
    }
}

impl std::error::Error for ErrorValidationError {}

impl Error {
    /// Create a new error, panicking if validation fails.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        match Self::try_new(code, message) {
            Ok(value) => value,
            Err(err) => panic!("error messages must satisfy validation: {err}"),
        }
    }

    /// Fallible constructor that validates the message content.
    pub fn try_new(
        code: ErrorCode,
        message: impl Into<String>,
    ) -> Result<Self, ErrorValidationError> {
        let message = message.into();
        if message.trim().is_empty() {
            return Err(ErrorValidationError::EmptyMessage);
        }
        Ok(Self {
            code,
            message,
            details: None,
        })
    }

    /// Stable machine-readable error code.
    pub fn code(&self) -> ErrorCode {
        self.code
    }

    /// Human-readable message returned to adapters.
    pub fn message(&self) -> &str {
        self.message.as_str()
    }

    /// Supplementary error details for adapters.
    pub fn details(&self) -> Option<&Value> {
        self.details.as_ref()
    }

    /// Attach structured details to the error.
    ///
    /// # Examples
    /// ```
    /// use backend::domain::{Error, ErrorCode};
    /// use serde_json::json;
    ///
    /// let err = Error::new(ErrorCode::Forbidden, "not eligible")
    ///     .with_details(json!({ "currentStatus": "REJECTED" }));
    /// assert!(err.details().is_some());
    /// ```
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

    /// Convenience constructor for [`ErrorCode::Conflict`].
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Conflict, message)
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

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for Error {}

// Port failures map onto the taxonomy at the service boundary: unreachable
// backends are `ServiceUnavailable`, broken queries are `InternalError`, and
// uniqueness violations surface as `Conflict` rather than raw storage errors.

impl From<crate::domain::ports::ApplicationRepositoryError> for Error {
    fn from(err: crate::domain::ports::ApplicationRepositoryError) -> Self {
        use crate::domain::ports::ApplicationRepositoryError as E;
        match err {
            E::Connection { message } => Self::service_unavailable(message),
            E::Query { message } => Self::internal(message),
            E::DuplicateKey { message } => Self::conflict(message),
        }
    }
}

impl From<crate::domain::ports::FormRepositoryError> for Error {
    fn from(err: crate::domain::ports::FormRepositoryError) -> Self {
        use crate::domain::ports::FormRepositoryError as E;
        match err {
            E::Connection { message } => Self::service_unavailable(message),
            E::Query { message } => Self::internal(message),
            E::DuplicateKey { message } => Self::conflict(message),
        }
    }
}

impl From<crate::domain::ports::FoodRepositoryError> for Error {
    fn from(err: crate::domain::ports::FoodRepositoryError) -> Self {
        use crate::domain::ports::FoodRepositoryError as E;
        match err {
            E::Connection { message } => Self::service_unavailable(message),
            E::Query { message } => Self::internal(message),
            E::DuplicateKey { message } => Self::conflict(message),
        }
    }
}

impl From<crate::domain::ports::IdempotencyRepositoryError> for Error {
    fn from(err: crate::domain::ports::IdempotencyRepositoryError) -> Self {
        use crate::domain::ports::IdempotencyRepositoryError as E;
        match err {
            E::Connection { message } => Self::service_unavailable(message),
            E::Query { message } => Self::internal(message),
        }
    }
}

impl From<crate::domain::ports::SeedLockError> for Error {
    fn from(err: crate::domain::ports::SeedLockError) -> Self {
        use crate::domain::ports::SeedLockError as E;
        match err {
            E::Connection { message } | E::Acquire { message } => {
                Self::service_unavailable(message)
            }
        }
    }
}

impl From<crate::domain::ports::NotificationSenderError> for Error {
    fn from(err: crate::domain::ports::NotificationSenderError) -> Self {
        use crate::domain::ports::NotificationSenderError as E;
        match err {
            E::Transport { message } => Self::service_unavailable(message),
        }
    }
}

impl From<crate::domain::ports::PassGeneratorError> for Error {
    fn from(err: crate::domain::ports::PassGeneratorError) -> Self {
        use crate::domain::ports::PassGeneratorError as E;
        match err {
            E::Configuration { message } => Self::service_unavailable(message),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ErrorDto {
    code: ErrorCode,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<Value>,
}

impl From<Error> for ErrorDto {
    fn from(value: Error) -> Self {
        Self {
            code: value.code,
            message: value.message,
            details: value.details,
        }
    }
}

impl TryFrom<ErrorDto> for Error {
    type Error = ErrorValidationError;

    fn try_from(value: ErrorDto) -> Result<Self, Self::Error> {
        let ErrorDto {
            code,
            message,
            details,
        } = value;

        let mut error = Error::try_new(code, message)?;
        error.details = details;
        Ok(error)
    }
}

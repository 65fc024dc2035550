//! HTTP error payloads and mapping from service errors.
//!
//! Handled domain failures become shaped [`ApiError`] responses here;
//! everything else stays an unhandled fault for the boundary middleware to
//! convert into the terminal envelope.

use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::CustomerServiceError;
use crate::middleware::trace::TraceId;

/// Stable machine-readable error code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[non_exhaustive]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    /// The request is malformed or fails validation.
    InvalidRequest,
    /// The requested resource does not exist.
    NotFound,
    /// The request conflicts with existing state.
    Conflict,
    /// An unexpected error occurred on the server.
    InternalError,
}

/// Structured error payload returned by the API.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[serde(deny_unknown_fields)]
pub struct ApiError {
    /// Stable machine-readable error code.
    pub code: ErrorCode,
    /// Human-readable error message.
    pub message: String,
    /// Correlation identifier for cross-referencing logs.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(alias = "trace_id")]
    pub trace_id: Option<String>,
    /// Supplementary structured details.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
}

impl ApiError {
    /// Create an error, capturing the ambient trace identifier when one is
    /// in scope.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            trace_id: TraceId::current().map(|id| id.to_string()),
            details: None,
        }
    }

    /// Attach a trace identifier.
    pub fn with_trace_id(mut self, id: impl Into<String>) -> Self {
        self.trace_id = Some(id.into());
        self
    }

    /// Attach structured details.
    pub fn with_details(mut self, details: Value) -> Self {
        self.details = Some(details);
        self
    }

    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidRequest, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::NotFound, message)
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Conflict, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InternalError, message)
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for ApiError {}

impl ErrorCode {
    fn as_status_code(self) -> StatusCode {
        match self {
            ErrorCode::InvalidRequest => StatusCode::BAD_REQUEST,
            ErrorCode::NotFound => StatusCode::NOT_FOUND,
            ErrorCode::Conflict => StatusCode::CONFLICT,
            ErrorCode::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        self.code.as_status_code()
    }

    fn error_response(&self) -> HttpResponse {
        let mut builder = HttpResponse::build(self.status_code());
        if let Some(id) = &self.trace_id {
            builder.insert_header(("trace-id", id.clone()));
        }
        // Internal errors rendered outside the fault boundary never leak
        // their message or details.
        if matches!(self.code, ErrorCode::InternalError) {
            let mut redacted = self.clone();
            redacted.message = "Internal server error".to_string();
            redacted.details = None;
            return builder.json(redacted);
        }
        builder.json(self)
    }
}

/// Convenient alias for HTTP handlers.
pub type ApiResult<T> = Result<T, actix_web::Error>;

/// Opaque wrapper for failures the handlers do not shape themselves.
///
/// The fault boundary recognizes everything that is not an [`ApiError`] as
/// an unhandled fault, so this type only needs to preserve the message.
#[derive(Debug, Clone, thiserror::Error)]
#[error("{0}")]
pub struct UnhandledFault(pub String);

impl ResponseError for UnhandledFault {
    fn status_code(&self) -> StatusCode {
        StatusCode::INTERNAL_SERVER_ERROR
    }
}

/// Map a service failure into an HTTP error.
///
/// Validation and lookup-by-key misses become shaped responses; lookup and
/// persistence faults stay unhandled and terminate at the fault boundary.
pub fn map_service_error(error: CustomerServiceError) -> actix_web::Error {
    match error {
        CustomerServiceError::NotFound => ApiError::not_found("customer not found").into(),
        CustomerServiceError::InvalidInput { message } => {
            ApiError::invalid_request(message).into()
        }
        CustomerServiceError::DuplicateCep { cep } => ApiError::conflict(format!(
            "a customer with postal code {cep} already exists"
        ))
        .into(),
        CustomerServiceError::Lookup(_) | CustomerServiceError::Repository(_) => {
            UnhandledFault(error.to_string()).into()
        }
    }
}

// REST client error types
use serde_json::{json, Value};
use std::collections::HashMap;

/// Failure of a REST call, or of a request rejected before dispatch.
///
/// Status-bearing variants mirror what the backend answered; the rest are
/// produced locally.
#[derive(Debug)]
pub enum ApiError {
    // 400 Bad Request
    BadRequest(String),
    ValidationError {
        message: String,
        field_errors: Option<HashMap<String, String>>,
    },

    // 401 Unauthorized
    Unauthorized(String),

    // 403 Forbidden
    Forbidden(String),

    // 404 Not Found
    NotFound(String),

    // 409 Conflict
    Conflict(String),

    // 422 Unprocessable Entity
    UnprocessableEntity(String),

    // 429 Too Many Requests
    TooManyRequests(String),

    // 500 Internal Server Error
    InternalServerError(String),

    // 502 Bad Gateway
    BadGateway(String),

    // 503 Service Unavailable
    ServiceUnavailable(String),

    // Any other non-success status
    Unexpected { status: u16, message: String },

    // No stored credential for an authenticated call
    MissingCredential,

    // Connection, timeout, TLS or body decoding failures
    Transport(String),
}

impl ApiError {
    /// Map a non-success HTTP status and server message onto a variant
    pub fn from_status(status: u16, message: impl Into<String>) -> Self {
        let message = message.into();
        match status {
            400 => ApiError::BadRequest(message),
            401 => ApiError::Unauthorized(message),
            403 => ApiError::Forbidden(message),
            404 => ApiError::NotFound(message),
            409 => ApiError::Conflict(message),
            422 => ApiError::UnprocessableEntity(message),
            429 => ApiError::TooManyRequests(message),
            500 => ApiError::InternalServerError(message),
            502 => ApiError::BadGateway(message),
            503 => ApiError::ServiceUnavailable(message),
            status => ApiError::Unexpected { status, message },
        }
    }

    /// HTTP status code, 0 for errors that never reached the server
    pub fn status_code(&self) -> u16 {
        match self {
            ApiError::BadRequest(_) => 400,
            ApiError::ValidationError { .. } => 400,
            ApiError::Unauthorized(_) => 401,
            ApiError::Forbidden(_) => 403,
            ApiError::NotFound(_) => 404,
            ApiError::Conflict(_) => 409,
            ApiError::UnprocessableEntity(_) => 422,
            ApiError::TooManyRequests(_) => 429,
            ApiError::InternalServerError(_) => 500,
            ApiError::BadGateway(_) => 502,
            ApiError::ServiceUnavailable(_) => 503,
            ApiError::Unexpected { status, .. } => *status,
            ApiError::MissingCredential => 0,
            ApiError::Transport(_) => 0,
        }
    }

    /// User-facing message
    pub fn message(&self) -> &str {
        match self {
            ApiError::BadRequest(msg) => msg,
            ApiError::ValidationError { message, .. } => message,
            ApiError::Unauthorized(msg) => msg,
            ApiError::Forbidden(msg) => msg,
            ApiError::NotFound(msg) => msg,
            ApiError::Conflict(msg) => msg,
            ApiError::UnprocessableEntity(msg) => msg,
            ApiError::TooManyRequests(msg) => msg,
            ApiError::InternalServerError(msg) => msg,
            ApiError::BadGateway(msg) => msg,
            ApiError::ServiceUnavailable(msg) => msg,
            ApiError::Unexpected { message, .. } => message,
            ApiError::MissingCredential => "Not logged in",
            ApiError::Transport(msg) => msg,
        }
    }

    /// Get error code for scripted handling
    pub fn error_code(&self) -> &'static str {
        match self {
            ApiError::BadRequest(_) => "BAD_REQUEST",
            ApiError::ValidationError { .. } => "VALIDATION_ERROR",
            ApiError::Unauthorized(_) => "UNAUTHORIZED",
            ApiError::Forbidden(_) => "FORBIDDEN",
            ApiError::NotFound(_) => "NOT_FOUND",
            ApiError::Conflict(_) => "CONFLICT",
            ApiError::UnprocessableEntity(_) => "UNPROCESSABLE_ENTITY",
            ApiError::TooManyRequests(_) => "TOO_MANY_REQUESTS",
            ApiError::InternalServerError(_) => "INTERNAL_SERVER_ERROR",
            ApiError::BadGateway(_) => "BAD_GATEWAY",
            ApiError::ServiceUnavailable(_) => "SERVICE_UNAVAILABLE",
            ApiError::Unexpected { .. } => "UNEXPECTED_STATUS",
            ApiError::MissingCredential => "MISSING_CREDENTIAL",
            ApiError::Transport(_) => "TRANSPORT_ERROR",
        }
    }

    /// True when the failure was caught before any request was sent
    pub fn is_local(&self) -> bool {
        matches!(
            self,
            ApiError::ValidationError { .. } | ApiError::MissingCredential
        )
    }

    /// Convert to JSON body for `--json` output
    pub fn to_json(&self) -> Value {
        match self {
            ApiError::ValidationError { message, field_errors } => {
                let mut response = json!({
                    "success": false,
                    "error": message,
                    "error_code": "VALIDATION_ERROR"
                });

                if let Some(field_errors) = field_errors {
                    response["field_errors"] = json!(field_errors);
                }

                response
            }
            _ => {
                json!({
                    "success": false,
                    "error": self.message(),
                    "error_code": self.error_code(),
                    "status": self.status_code()
                })
            }
        }
    }
}

// Static constructor methods
impl ApiError {
    pub fn validation_error(
        message: impl Into<String>,
        field_errors: Option<HashMap<String, String>>,
    ) -> Self {
        ApiError::ValidationError {
            message: message.into(),
            field_errors,
        }
    }

    pub fn transport(message: impl Into<String>) -> Self {
        ApiError::Transport(message.into())
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ApiError::transport(format!("Request timed out: {}", err))
        } else if err.is_connect() {
            ApiError::transport(format!("Could not reach server: {}", err))
        } else {
            ApiError::transport(err.to_string())
        }
    }
}

impl From<url::ParseError> for ApiError {
    fn from(err: url::ParseError) -> Self {
        ApiError::transport(format!("Invalid request URL: {}", err))
    }
}

// Standard error trait implementations
impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.status_code() {
            0 => write!(f, "{}", self.message()),
            status => write!(f, "{} ({})", self.message(), status),
        }
    }
}

impl std::error::Error for ApiError {}

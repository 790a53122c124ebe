use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Value};
use thiserror::Error;

/// Shown when the backend gives no usable message of its own.
pub const GENERIC_RETRY_MESSAGE: &str = "The request could not be completed. Please try again.";

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Not Found: {0}")]
    NotFound(String),

    #[error("Bad Request: {0}")]
    BadRequest(String),

    #[error("Internal Server Error: {0}")]
    Internal(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("External service error: {0}")]
    ExternalService(String),
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::ValidationError(_) => StatusCode::BAD_REQUEST,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::ExternalService(_) => StatusCode::BAD_GATEWAY,
        }
    }

    pub fn message(&self) -> &str {
        match self {
            AppError::NotFound(msg)
            | AppError::BadRequest(msg)
            | AppError::Internal(msg)
            | AppError::ValidationError(msg)
            | AppError::Conflict(msg)
            | AppError::ExternalService(msg) => msg,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let message = self.message().to_string();

        tracing::error!("Error: {}: {}", status, message);

        let body = Json(json!({
            "error": message
        }));

        (status, body).into_response()
    }
}

/// Failure of a call to the clinic backend.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ApiError {
    #[error("Backend returned {status}: {}", .message.as_deref().unwrap_or(GENERIC_RETRY_MESSAGE))]
    Status { status: u16, message: Option<String> },

    #[error("Backend unreachable: {0}")]
    Transport(String),

    #[error("Unexpected backend response: {0}")]
    Decode(String),
}

impl ApiError {
    /// Message fit for the person filling the form.
    pub fn user_message(&self) -> String {
        match self {
            ApiError::Status { message: Some(message), .. } => message.clone(),
            _ => GENERIC_RETRY_MESSAGE.to_string(),
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }
}

/// Pull the `message` field out of an error body. Validation pipes on the
/// backend answer with either a string or a list of strings.
pub fn extract_server_message(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    match value.get("message")? {
        Value::String(message) if !message.trim().is_empty() => Some(message.clone()),
        Value::Array(items) => {
            let parts: Vec<&str> = items
                .iter()
                .filter_map(Value::as_str)
                .filter(|s| !s.trim().is_empty())
                .collect();
            if parts.is_empty() {
                None
            } else {
                Some(parts.join(", "))
            }
        }
        _ => None,
    }
}

impl From<ApiError> for AppError {
    fn from(error: ApiError) -> Self {
        let message = error.user_message();
        match error.status() {
            Some(404) => AppError::NotFound(message),
            Some(400) | Some(422) => AppError::BadRequest(message),
            Some(409) => AppError::Conflict(message),
            _ => AppError::ExternalService(message),
        }
    }
}

impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        match error.downcast::<ApiError>() {
            Ok(api_error) => api_error.into(),
            Err(other) => match other.downcast::<AppError>() {
                Ok(app_error) => app_error,
                Err(other) => AppError::Internal(other.to_string()),
            },
        }
    }
}

use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use medialab_core::constants::error_messages;
use medialab_core::{ErrorEnvelope, UpstreamError, ValidationError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    /// Path id that no item can have; answered without asking the server.
    #[error("{}", error_messages::ITEM_NOT_FOUND)]
    NotFound(i64),
    #[error("Validation error: {0}")]
    Validation(String),
    #[error("{}: {}", error_messages::INVALID_REQUEST, .0)]
    BadRequest(String),
    /// The server answered with an error status; relayed as-is.
    #[error("{message}")]
    Upstream { status: StatusCode, message: String },
    #[error("{}: {}", error_messages::SERVER_NOT_AVAILABLE, .0)]
    ServerUnavailable(UpstreamError),
}

impl AppError {
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Upstream { status, .. } => *status,
            Self::ServerUnavailable(_) => StatusCode::BAD_GATEWAY,
        }
    }
}

impl From<UpstreamError> for AppError {
    fn from(error: UpstreamError) -> Self {
        match error {
            UpstreamError::Http { status, message } => match StatusCode::from_u16(status) {
                Ok(status) if status.is_client_error() || status.is_server_error() => {
                    Self::Upstream { status, message }
                }
                _ => Self::ServerUnavailable(UpstreamError::Http { status, message }),
            },
            other => Self::ServerUnavailable(other),
        }
    }
}

impl From<ValidationError> for AppError {
    fn from(error: ValidationError) -> Self {
        Self::Validation(error.to_string())
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        match rejection {
            JsonRejection::JsonDataError(error) => Self::Validation(error.body_text()),
            other => Self::BadRequest(other.body_text()),
        }
    }
}

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        Self::Validation(rejection.body_text())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let mut body = ErrorEnvelope::new(self.to_string(), status.as_u16());
        match &self {
            Self::ServerUnavailable(error) => {
                body = body.with_details(serde_json::json!({ "reason": error.reason() }));
            }
            Self::NotFound(id) => {
                body = body.with_details(serde_json::json!({ "item_id": id }));
            }
            _ => {}
        }
        (status, Json(body)).into_response()
    }
}

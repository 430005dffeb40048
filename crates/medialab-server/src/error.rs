use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use medialab_core::constants::error_messages;
use medialab_core::ErrorEnvelope;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    /// Negative path ids land here too.
    #[error("{}", error_messages::ITEM_NOT_FOUND)]
    NotFound(i64),
    #[error("Validation error: {0}")]
    Validation(String),
    #[error("{}: {}", error_messages::INVALID_REQUEST, .0)]
    BadRequest(String),
}

impl AppError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub const fn status(&self) -> StatusCode {
        match self {
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
        }
    }
}

impl From<medialab_core::Error> for AppError {
    fn from(error: medialab_core::Error) -> Self {
        match error {
            medialab_core::Error::NotFound(id) => {
                Self::NotFound(i64::try_from(id).unwrap_or(i64::MAX))
            }
            medialab_core::Error::Validation(error) => Self::validation(error.to_string()),
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        match rejection {
            JsonRejection::JsonDataError(error) => Self::validation(error.body_text()),
            other => Self::BadRequest(other.body_text()),
        }
    }
}

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        Self::validation(rejection.body_text())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let mut body = ErrorEnvelope::new(self.to_string(), status.as_u16());
        if let Self::NotFound(id) = self {
            body = body.with_details(serde_json::json!({ "item_id": id }));
        }
        (status, Json(body)).into_response()
    }
}

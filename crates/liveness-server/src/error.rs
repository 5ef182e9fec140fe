use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use liveness_core::LivenessError;
use thiserror::Error;
use tracing::error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Unauthorized")]
    Unauthorized,

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    BadRequest(String),

    #[error(transparent)]
    Liveness(#[from] LivenessError),

    #[error("template error: {0}")]
    Render(#[from] minijinja::Error),
}

impl ApiError {
    /// Report any not-found flavour of `err` with a route-specific message.
    pub fn not_found_as(err: LivenessError, message: &str) -> Self {
        if err.is_not_found() {
            Self::NotFound(message.to_string())
        } else {
            Self::Liveness(err)
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Unauthorized | ApiError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Liveness(e) if e.is_not_found() => StatusCode::NOT_FOUND,
            ApiError::Liveness(_) | ApiError::Render(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!(error = %self, "request failed");
        }

        (status, Json(serde_json::json!({ "error": self.to_string() }))).into_response()
    }
}

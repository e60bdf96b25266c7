//! Mapping from core failures to HTTP responses.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use interviewer_core::EvalError;

/// Error returned by every handler.
#[derive(Debug)]
pub enum ApiError {
    /// A pipeline or session-store failure.
    Eval(EvalError),
    /// The session id in the request is not a valid identifier.
    MalformedSession(String),
    /// The request body could not be decoded.
    BadRequest(String),
}

impl From<EvalError> for ApiError {
    fn from(err: EvalError) -> Self {
        Self::Eval(err)
    }
}

impl ApiError {
    /// Status code and user-facing message for this error.
    pub fn status_and_message(&self) -> (StatusCode, String) {
        match self {
            Self::Eval(err @ EvalError::UnknownSession(_)) => {
                (StatusCode::NOT_FOUND, err.public_message())
            }
            Self::Eval(err @ EvalError::InvalidInput(_)) => {
                (StatusCode::UNPROCESSABLE_ENTITY, err.public_message())
            }
            Self::Eval(err @ EvalError::GenerationFailure { .. }) => {
                (StatusCode::BAD_GATEWAY, err.public_message())
            }
            Self::MalformedSession(raw) => {
                (StatusCode::NOT_FOUND, format!("unknown session: {raw}"))
            }
            Self::BadRequest(message) => (StatusCode::BAD_REQUEST, message.clone()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_message) = self.status_and_message();
        if status.is_server_error() {
            if let Self::Eval(err) = &self {
                tracing::error!("request failed: {err:#}");
            }
        }

        let body = Json(json!({
            "error": error_message,
        }));

        (status, body).into_response()
    }
}

//! HTTP error responses.
//!
//! Every error leaves the server as `{"error": "<message>"}` with a matching
//! status code.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde_json::json;

use crate::error::JotpadError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpError {
    pub status: StatusCode,
    pub message: String,
}

impl HttpError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn unauthorized() -> Self {
        Self::new(StatusCode::UNAUTHORIZED, "Unauthorized")
    }

    pub fn note_not_found() -> Self {
        Self::new(StatusCode::NOT_FOUND, "Note not found")
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
    }
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        (self.status, Json(json!({ "error": self.message }))).into_response()
    }
}

impl From<JotpadError> for HttpError {
    fn from(err: JotpadError) -> Self {
        match err {
            JotpadError::NoteNotFound(_) => HttpError::note_not_found(),
            JotpadError::InvalidContent(e) => HttpError::bad_request(e.to_string()),
            JotpadError::InvalidTitle(e) => HttpError::bad_request(e.to_string()),
            JotpadError::UserNotFound(_) => HttpError::unauthorized(),
            JotpadError::SlugCollision { .. } => HttpError::internal("Failed to update sharing"),
            other => {
                tracing::error!(error = %other, "request failed");
                HttpError::internal("Internal server error")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::ContentError;

    #[test]
    fn test_error_mapping() {
        let err: HttpError = JotpadError::NoteNotFound("abc".to_string()).into();
        assert_eq!(err, HttpError::note_not_found());

        let err: HttpError = JotpadError::InvalidContent(ContentError::NotJson).into();
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        assert_eq!(err.message, "Content is not valid JSON");

        let err: HttpError = JotpadError::Storage("disk full".to_string()).into();
        assert_eq!(err.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(!err.message.contains("disk full"));
    }
}

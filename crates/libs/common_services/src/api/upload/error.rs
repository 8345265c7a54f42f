use crate::storage::StorageError;
use axum::Json;
use axum::extract::multipart::MultipartError;
use axum::http::StatusCode;
use axum::http::header::CONTENT_TYPE;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use thiserror::Error;
use tracing::{error, warn};

#[derive(Debug, Error)]
pub enum UploadError {
    #[error("Could not store the uploaded photo: {0}")]
    Storage(#[from] StorageError),

    #[error("Invalid upload form: {0}")]
    InvalidForm(String),

    #[error("Uploaded file is too large: {0}")]
    TooLarge(String),
}

impl IntoResponse for UploadError {
    fn into_response(self) -> Response {
        match self {
            Self::Storage(e) => {
                error!("Upload failed at storage: {e}");
                (
                    StatusCode::BAD_GATEWAY,
                    [(CONTENT_TYPE, "text/plain; charset=utf-8")],
                    e.to_string(),
                )
                    .into_response()
            }
            Self::InvalidForm(message) => {
                warn!("Rejected upload form: {message}");
                let body = Json(json!({ "error": format!("Invalid upload form: {message}") }));
                (StatusCode::BAD_REQUEST, body).into_response()
            }
            Self::TooLarge(message) => {
                warn!("Rejected oversized upload: {message}");
                let body = Json(json!({ "error": "The uploaded file is too large" }));
                (StatusCode::PAYLOAD_TOO_LARGE, body).into_response()
            }
        }
    }
}

impl From<MultipartError> for UploadError {
    fn from(err: MultipartError) -> Self {
        if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
            Self::TooLarge(err.body_text())
        } else {
            Self::InvalidForm(err.body_text())
        }
    }
}

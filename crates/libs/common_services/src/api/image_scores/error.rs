use crate::database::DbError;
use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use thiserror::Error;
use tracing::error;

#[derive(Debug, Error)]
pub enum ImageScoreError {
    #[error("Database error: {0}")]
    Database(#[from] DbError),
}

impl IntoResponse for ImageScoreError {
    fn into_response(self) -> Response {
        match self {
            Self::Database(e) => {
                error!("Could not load image scores: {e}");
                let body = Json(json!({ "error": "A database error occurred." }));
                (StatusCode::INTERNAL_SERVER_ERROR, body).into_response()
            }
        }
    }
}

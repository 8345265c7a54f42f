use crate::api_state::ApiContext;
use crate::upload::handlers::{upload_file_handler, upload_form};
use axum::extract::DefaultBodyLimit;
use axum::{
    Router,
    routing::{get, post},
};

pub fn upload_public_router() -> Router<ApiContext> {
    Router::new().route("/Upload", get(upload_form))
}

pub fn upload_protected_router(max_upload_bytes: usize) -> Router<ApiContext> {
    Router::new()
        .route("/FileUpload", post(upload_file_handler))
        .layer(DefaultBodyLimit::max(max_upload_bytes))
}

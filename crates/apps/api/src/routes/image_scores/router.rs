use crate::api_state::ApiContext;
use crate::image_scores::handlers::list_image_scores_handler;
use axum::{Router, routing::get};

pub fn image_scores_protected_router() -> Router<ApiContext> {
    Router::new().route("/image-scores", get(list_image_scores_handler))
}

use crate::api_state::ApiContext;
use axum::{Extension, Json, extract::State};
use common_services::api::image_scores::error::ImageScoreError;
use common_services::api::image_scores::service::list_user_scores;
use common_services::database::app_user::User;
use common_services::database::image_score::ImageScore;
use tracing::instrument;

/// Lists the scores of the current user, newest first.
#[utoipa::path(
    get,
    path = "/image-scores",
    tag = "Image scores",
    responses(
        (status = 200, description = "The user's stored image scores", body = Vec<ImageScore>),
        (status = 401, description = "Authentication required"),
    ),
    security(
        ("bearer_auth" = [])
    )
)]
#[instrument(skip(context, user), err(Debug))]
pub async fn list_image_scores_handler(
    State(context): State<ApiContext>,
    Extension(user): Extension<User>,
) -> Result<Json<Vec<ImageScore>>, ImageScoreError> {
    let scores = list_user_scores(&context.pool, user.id).await?;
    Ok(Json(scores))
}

use crate::api::image_scores::error::ImageScoreError;
use crate::database::image_score::ImageScore;
use crate::database::image_score_store::ImageScoreStore;
use sqlx::PgPool;
use tracing::instrument;

/// Every score stored for `user_id`, newest first.
#[instrument(skip(pool), err(Debug))]
pub async fn list_user_scores(
    pool: &PgPool,
    user_id: i32,
) -> Result<Vec<ImageScore>, ImageScoreError> {
    Ok(ImageScoreStore::list_for_user(pool, user_id).await?)
}

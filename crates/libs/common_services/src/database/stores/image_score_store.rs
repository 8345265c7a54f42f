use crate::database::DbError;
use crate::database::image_score::{ImageScore, NewImageScore};
use sqlx::{Executor, PgPool, Postgres};
use std::future::Future;

const IMAGE_SCORE_COLUMNS: &str = "id, image_url, time_stamp, result, application_user_id";

pub struct ImageScoreStore;

impl ImageScoreStore {
    /// Inserts a new image score and returns the stored row.
    pub async fn create(
        executor: impl Executor<'_, Database = Postgres>,
        score: &NewImageScore,
    ) -> Result<ImageScore, DbError> {
        let query = format!(
            "INSERT INTO image_scores (image_url, time_stamp, result, application_user_id)
            VALUES ($1, $2, $3, $4)
            RETURNING {IMAGE_SCORE_COLUMNS}"
        );
        Ok(sqlx::query_as::<_, ImageScore>(&query)
            .bind(&score.image_url)
            .bind(score.time_stamp)
            .bind(&score.result)
            .bind(score.application_user_id)
            .fetch_one(executor)
            .await?)
    }

    /// All scores of one user, newest first.
    pub async fn list_for_user(
        executor: impl Executor<'_, Database = Postgres>,
        user_id: i32,
    ) -> Result<Vec<ImageScore>, DbError> {
        let query = format!(
            "SELECT {IMAGE_SCORE_COLUMNS}
            FROM image_scores
            WHERE application_user_id = $1
            ORDER BY time_stamp DESC, id DESC"
        );
        Ok(sqlx::query_as::<_, ImageScore>(&query)
            .bind(user_id)
            .fetch_all(executor)
            .await?)
    }

    pub async fn count_for_user(
        executor: impl Executor<'_, Database = Postgres>,
        user_id: i32,
    ) -> Result<i64, DbError> {
        Ok(sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM image_scores WHERE application_user_id = $1",
        )
        .bind(user_id)
        .fetch_one(executor)
        .await?)
    }
}

/// Destination for the score rows written after an analysis.
pub trait ScoreRecorder {
    fn record(
        &self,
        score: NewImageScore,
    ) -> impl Future<Output = Result<ImageScore, DbError>> + Send;
}

impl ScoreRecorder for PgPool {
    async fn record(&self, score: NewImageScore) -> Result<ImageScore, DbError> {
        ImageScoreStore::create(self, &score).await
    }
}

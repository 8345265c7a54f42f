use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

/// Corresponds to the `image_scores` table: one row per analysed upload that had faces.
#[derive(Debug, Serialize, Deserialize, FromRow, Clone, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ImageScore {
    pub id: i32,
    /// Blob URL without any SAS query, so it stays valid as an identifier.
    pub image_url: String,
    pub time_stamp: DateTime<Utc>,
    /// Gender of every detected face, each followed by `;`.
    pub result: String,
    pub application_user_id: i32,
}

/// Values for a new `image_scores` row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewImageScore {
    pub image_url: String,
    pub time_stamp: DateTime<Utc>,
    pub result: String,
    pub application_user_id: i32,
}

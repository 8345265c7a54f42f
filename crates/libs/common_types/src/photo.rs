use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// An uploaded photo as shown back to the uploader. Never persisted.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Photo {
    /// Read-only signed URL, valid for 30 minutes after the upload.
    pub url: String,
    /// Size of the uploaded file in bytes.
    pub size: u64,
    /// Generated blob name inside the container.
    pub name: String,
    pub content_type: String,
}

use axum::body::Bytes;
use common_types::photo::Photo;
use common_types::vision::FaceResult;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// The `file` part of an upload form, read fully into memory.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Bytes,
}

/// What the uploader gets to see after posting the form.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
#[serde(tag = "view", rename_all = "camelCase")]
pub enum UploadView {
    /// The upload form again, with the reason it was shown.
    Form { reason: FormReason },
    /// The stored photo with whatever the analysis found.
    Photo {
        photo: Photo,
        faces: Vec<FaceResult>,
        analysis: AnalysisStatus,
        /// Id of the stored score row, if one was written.
        #[serde(rename = "imageScoreId")]
        image_score_id: Option<i32>,
        /// Human readable note when analysis or saving the score went wrong.
        message: Option<String>,
    },
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub enum FormReason {
    MissingFile,
    EmptyFile,
    NoFaces,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub enum AnalysisStatus {
    Completed,
    Failed,
}

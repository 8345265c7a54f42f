use crate::api::upload::error::UploadError;
use crate::api::upload::interfaces::{AnalysisStatus, FormReason, UploadView, UploadedFile};
use crate::database::image_score::NewImageScore;
use crate::database::image_score_store::ScoreRecorder;
use crate::storage::BlobStore;
use crate::vision::{FaceAnalysis, FaceAnalyzer};
use chrono::Utc;
use common_types::photo::Photo;
use common_types::vision::FaceResult;
use tracing::{info, instrument, warn};
use uuid::Uuid;

const FALLBACK_EXTENSION: &str = "jpg";

/// A fresh `<uuid>.<ext>` blob name, the extension taken from an `image/*` content type.
/// Anything else is stored as `jpg`.
#[must_use]
pub fn unique_blob_name(content_type: &str) -> String {
    let extension = Some(content_type)
        .filter(|ct| {
            ct.split('/')
                .next()
                .is_some_and(|top| top.trim().eq_ignore_ascii_case("image"))
        })
        .and_then(mime_guess::get_mime_extensions_str)
        .and_then(preferred_extension)
        .unwrap_or(FALLBACK_EXTENSION);
    format!("{}.{extension}", Uuid::new_v4())
}

fn preferred_extension(extensions: &[&'static str]) -> Option<&'static str> {
    // `image/jpeg` maps to several extensions, `jpg` is the one people expect.
    extensions
        .iter()
        .find(|e| **e == "jpg")
        .or_else(|| extensions.first())
        .copied()
}

/// The gender of every face followed by `;`, e.g. `Male;Female;`.
#[must_use]
pub fn summarize_genders(faces: &[FaceResult]) -> String {
    faces.iter().map(|f| format!("{};", f.gender)).collect()
}

/// Stores the uploaded photo, has it analysed and records a score for the user.
///
/// Only storage failures end the request with an error. A failed analysis or a
/// failed insert is logged and reported inside the returned view.
#[instrument(skip(storage, analyzer, recorder, file), err(Debug))]
pub async fn process_upload<S, A, R>(
    storage: &S,
    analyzer: &A,
    recorder: &R,
    file: Option<UploadedFile>,
    user_id: Option<i32>,
) -> Result<UploadView, UploadError>
where
    S: BlobStore + Sync,
    A: FaceAnalyzer + Sync,
    R: ScoreRecorder + Sync,
{
    let Some(file) = file else {
        return Ok(UploadView::Form {
            reason: FormReason::MissingFile,
        });
    };
    if file.bytes.is_empty() {
        info!("Ignoring empty upload {}", file.file_name);
        return Ok(UploadView::Form {
            reason: FormReason::EmptyFile,
        });
    }

    let blob_name = unique_blob_name(&file.content_type);
    let size = file.bytes.len() as u64;
    storage
        .upload(&blob_name, &file.content_type, file.bytes.clone())
        .await?;

    let now = Utc::now();
    let signed = storage.read_url(&blob_name, now)?;
    let photo = Photo {
        url: signed.url.to_string(),
        size,
        name: blob_name,
        content_type: file.content_type,
    };
    info!(
        "Stored {} as {} ({size} bytes)",
        file.file_name, photo.name
    );

    // Labelled with the unsigned URL so SAS signatures stay out of the logs.
    let faces = match analyzer.analyze(file.bytes, signed.blob_url.as_str()).await {
        Ok(FaceAnalysis::NoFaces) => {
            info!("No faces found in {}", photo.name);
            return Ok(UploadView::Form {
                reason: FormReason::NoFaces,
            });
        }
        Ok(FaceAnalysis::Faces(faces)) => faces,
        Err(e) => {
            warn!("Analysis of {} failed: {e}", photo.name);
            return Ok(UploadView::Photo {
                photo,
                faces: Vec::new(),
                analysis: AnalysisStatus::Failed,
                image_score_id: None,
                message: Some("The photo could not be analysed.".to_owned()),
            });
        }
    };

    let Some(user_id) = user_id else {
        info!("No user attached to upload of {}, score not stored", photo.name);
        return Ok(UploadView::Photo {
            photo,
            faces,
            analysis: AnalysisStatus::Completed,
            image_score_id: None,
            message: None,
        });
    };

    let score = NewImageScore {
        image_url: signed.blob_url.to_string(),
        time_stamp: now,
        result: summarize_genders(&faces),
        application_user_id: user_id,
    };
    let (image_score_id, message) = match recorder.record(score).await {
        Ok(stored) => {
            info!("Stored image score {} for user {user_id}", stored.id);
            (Some(stored.id), None)
        }
        Err(e) => {
            warn!("Could not store image score for {}: {e}", photo.name);
            (None, Some("The result could not be saved.".to_owned()))
        }
    };

    Ok(UploadView::Photo {
        photo,
        faces,
        analysis: AnalysisStatus::Completed,
        image_score_id,
        message,
    })
}

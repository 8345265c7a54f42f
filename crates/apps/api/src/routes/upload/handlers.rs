use crate::api_state::ApiContext;
use axum::extract::{Multipart, State};
use axum::response::Html;
use axum::{Extension, Json};
use common_services::api::upload::error::UploadError;
use common_services::api::upload::interfaces::{UploadView, UploadedFile};
use common_services::api::upload::service::process_upload;
use common_services::database::app_user::User;
use tracing::{debug, instrument};
use utoipa::ToSchema;

const UPLOAD_FORM: &str = include_str!("../../../assets/upload.html");
const FILE_FIELD: &str = "file";

/// Shape of the multipart form accepted by `/FileUpload`, for the API docs only.
#[derive(ToSchema)]
#[allow(dead_code)]
pub struct UploadForm {
    #[schema(value_type = String, format = Binary)]
    file: Vec<u8>,
}

/// The upload form.
#[utoipa::path(
    get,
    path = "/Upload",
    tag = "Upload",
    responses(
        (status = 200, description = "HTML form to upload a photo", body = String, content_type = "text/html")
    )
)]
pub async fn upload_form() -> Html<&'static str> {
    Html(UPLOAD_FORM)
}

/// Stores an uploaded photo, analyses the faces in it and records the result for the user.
///
/// # Errors
///
/// Returns `UploadError` if the form can't be read or the photo can't be stored.
/// Analysis and database failures are reported in the returned view instead.
#[utoipa::path(
    post,
    path = "/FileUpload",
    tag = "Upload",
    request_body(content = UploadForm, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "The view to show after the upload", body = UploadView),
        (status = 400, description = "The form could not be read"),
        (status = 401, description = "Authentication required"),
        (status = 413, description = "The file is larger than the upload limit"),
        (status = 502, description = "The photo could not be stored", body = String, content_type = "text/plain"),
    ),
    security(
        ("bearer_auth" = [])
    )
)]
#[instrument(skip(context, user, multipart), err(Debug))]
pub async fn upload_file_handler(
    State(context): State<ApiContext>,
    Extension(user): Extension<User>,
    multipart: Multipart,
) -> Result<Json<UploadView>, UploadError> {
    let file = read_file_field(multipart).await?;
    let view = process_upload(
        &context.blob_store,
        &context.vision,
        &context.pool,
        file,
        Some(user.id),
    )
    .await?;
    Ok(Json(view))
}

/// Reads the first `file` part of the form. Other parts are skipped.
async fn read_file_field(mut multipart: Multipart) -> Result<Option<UploadedFile>, UploadError> {
    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some(FILE_FIELD) {
            debug!("Skipping form field {:?}", field.name());
            continue;
        }

        let file_name = field.file_name().unwrap_or("upload").to_owned();
        let content_type = field.content_type().map_or_else(
            || {
                mime_guess::from_path(&file_name)
                    .first_or_octet_stream()
                    .to_string()
            },
            ToOwned::to_owned,
        );
        let bytes = field.bytes().await?;
        return Ok(Some(UploadedFile {
            file_name,
            content_type,
            bytes,
        }));
    }
    Ok(None)
}

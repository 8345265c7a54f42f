use crate::routes::{auth, image_scores, root, upload};
use common_services::api::upload::interfaces::{AnalysisStatus, FormReason, UploadView};
use common_services::database::image_score::ImageScore;
use common_types::photo::Photo;
use common_types::vision::FaceResult;
use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};
use utoipa::{Modify, OpenApi};

#[derive(OpenApi)]
#[openapi(
    paths(
        root::handlers::root,
        root::handlers::health_check,
        root::handlers::error_page,
        // Auth handlers
        auth::handlers::login,
        auth::handlers::register,
        auth::handlers::refresh_session,
        auth::handlers::logout,
        auth::handlers::get_me,
        // Upload handlers
        upload::handlers::upload_form,
        upload::handlers::upload_file_handler,
        // Image score handlers
        image_scores::handlers::list_image_scores_handler,
    ),
    components(
        schemas(
            UploadView,
            FormReason,
            AnalysisStatus,
            Photo,
            FaceResult,
            ImageScore,
        ),
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Upload", description = "Upload a photo and get the faces in it analysed"),
        (name = "Image scores", description = "Stored results of earlier uploads"),
        (name = "Auth", description = "Authentication endpoints"),
        (name = "System", description = "Health check and error view"),
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(Http::new(HttpAuthScheme::Bearer)),
        );
    }
}

mod api_doc;
pub mod auth;
pub mod image_scores;
pub mod root;
pub mod upload;

use crate::api_state::ApiContext;
use crate::auth::middlewares::user::ApiUser;
use crate::auth::router::{auth_protected_router, auth_public_router};
use crate::image_scores::router::image_scores_protected_router;
use crate::root::router::root_public_router;
use crate::routes::api_doc::ApiDoc;
use crate::upload::router::{upload_protected_router, upload_public_router};
use app_state::RateLimitingSettings;
use axum::Router;
use axum::middleware::from_extractor_with_state;
use color_eyre::Result;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

// --- Router Construction ---
pub fn create_router(api_state: ApiContext) -> Result<Router> {
    Ok(Router::new()
        .merge(SwaggerUi::new("/docs").url("/openapi.json", ApiDoc::openapi()))
        .merge(public_routes(&api_state.settings.api.rate_limiting)?)
        .merge(protected_routes(api_state.clone()))
        .with_state(api_state))
}

fn public_routes(rate_limiting: &RateLimitingSettings) -> Result<Router<ApiContext>> {
    Ok(Router::new()
        .merge(auth_public_router(rate_limiting)?)
        .merge(root_public_router())
        .merge(upload_public_router()))
}

fn protected_routes(api_state: ApiContext) -> Router<ApiContext> {
    let max_upload_bytes = api_state.settings.api.max_upload_bytes;
    Router::new()
        .merge(auth_protected_router())
        .merge(upload_protected_router(max_upload_bytes))
        .merge(image_scores_protected_router())
        .route_layer(from_extractor_with_state::<ApiUser, ApiContext>(api_state))
}

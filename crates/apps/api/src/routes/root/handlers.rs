use crate::api_state::ApiContext;
use axum::Json;
use axum::extract::State;
use axum::http::{HeaderMap, HeaderValue, StatusCode, header};
use serde::Serialize;
use tracing::error;
use utoipa::ToSchema;

#[utoipa::path(
    get,
    path = "/",
    tag = "System",
    responses(
        (status = 200, description = "Root message")
    )
)]
pub async fn root() -> &'static str {
    "facescore is running. Upload a photo at /Upload."
}

#[utoipa::path(
    get,
    path = "/health",
    tag = "System",
    responses(
        (status = 200, description = "API is healthy and ready to accept traffic", body = String),
        (status = 503, description = "API is not healthy, likely due to a database issue.")
    )
)]
pub async fn health_check(State(context): State<ApiContext>) -> Result<&'static str, StatusCode> {
    match sqlx::query("SELECT 1").fetch_one(&context.pool).await {
        Ok(_) => Ok("OK"),
        Err(e) => {
            error!("Health check failed: database connection error: {}", e);
            Err(StatusCode::SERVICE_UNAVAILABLE)
        }
    }
}

/// Shown when a request failed in a way the client can't fix.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ErrorView {
    pub request_id: Option<String>,
    pub show_request_id: bool,
}

#[utoipa::path(
    get,
    path = "/Error",
    tag = "System",
    responses(
        (status = 200, description = "Error view with the id of the current request", body = ErrorView)
    )
)]
pub async fn error_page(
    headers: HeaderMap,
) -> ([(header::HeaderName, HeaderValue); 2], Json<ErrorView>) {
    let request_id = headers
        .get("x-request-id")
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.is_empty())
        .map(ToOwned::to_owned);

    (
        [
            (
                header::CACHE_CONTROL,
                HeaderValue::from_static("no-store, no-cache"),
            ),
            (header::PRAGMA, HeaderValue::from_static("no-cache")),
        ],
        Json(ErrorView {
            show_request_id: request_id.is_some(),
            request_id,
        }),
    )
}

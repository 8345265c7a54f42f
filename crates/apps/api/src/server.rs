use crate::api_state::ApiContext;
use crate::create_router;
use app_state::AppSettings;
use axum::Router;
use color_eyre::Result;
use color_eyre::eyre::eyre;
use http::{HeaderValue, header};
use sqlx::PgPool;
use std::iter::once;
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tower_http::compression::CompressionLayer;
use tower_http::cors;
use tower_http::cors::CorsLayer;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::sensitive_headers::SetSensitiveRequestHeadersLayer;
use tower_http::trace::TraceLayer;
use tracing::{error, info};

/// Binds the configured address and serves the API until the process stops.
pub async fn serve(pool: PgPool, settings: AppSettings) -> Result<()> {
    let addr: SocketAddr = format!("{}:{}", settings.api.host, settings.api.port)
        .parse()
        .map_err(|e| eyre!("Invalid address: {}", e))?;
    let listener = TcpListener::bind(addr).await?;
    serve_on(listener, pool, settings).await
}

/// Serves the API on an already bound listener.
pub async fn serve_on(listener: TcpListener, pool: PgPool, settings: AppSettings) -> Result<()> {
    info!("🚀 Initializing server...");
    let api_state = ApiContext::new(pool, settings)?;
    let app = create_app(api_state)?;

    info!("🐸 Server listening on http://{}", listener.local_addr()?);
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;
    Ok(())
}

/// The full router with every layer applied.
pub fn create_app(api_state: ApiContext) -> Result<Router> {
    // --- CORS Configuration ---
    let allowed_origins: Vec<HeaderValue> = api_state
        .settings
        .api
        .allowed_origins
        .iter()
        .filter_map(|s| match s.parse() {
            Ok(hv) => Some(hv),
            Err(e) => {
                error!("Invalid CORS origin configured: {} - Error: {}", s, e);
                None
            }
        })
        .collect();

    let cors = CorsLayer::new()
        .allow_methods(cors::Any)
        .allow_origin(allowed_origins)
        .allow_headers([
            header::AUTHORIZATION,
            header::CONTENT_TYPE,
            header::ACCEPT,
            header::ORIGIN,
            header::USER_AGENT,
            header::CACHE_CONTROL,
            header::PRAGMA,
        ])
        .expose_headers([header::HeaderName::from_static("x-request-id")]);

    // --- Create Router ---
    let app = create_router(api_state)?
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(TraceLayer::new_for_http().on_request(()))
        .layer(cors)
        .layer(CompressionLayer::new())
        .layer(SetSensitiveRequestHeadersLayer::new(once(
            header::AUTHORIZATION,
        )))
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid));
    Ok(app)
}

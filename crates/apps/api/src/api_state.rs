use app_state::AppSettings;
use axum::extract::FromRef;
use color_eyre::Result;
use common_services::storage::AzureBlobStore;
use common_services::vision::VisionClient;
use reqwest::Client;
use sqlx::PgPool;

#[derive(Clone)]
pub struct ApiContext {
    pub pool: PgPool,
    pub settings: AppSettings,
    pub blob_store: AzureBlobStore,
    pub vision: VisionClient,
}

impl ApiContext {
    /// Builds the storage and vision clients once, from the validated settings.
    pub fn new(pool: PgPool, settings: AppSettings) -> Result<Self> {
        Ok(Self {
            blob_store: AzureBlobStore::new(Client::new(), &settings.storage)?,
            vision: VisionClient::new(&settings.vision)?,
            pool,
            settings,
        })
    }
}

// These impls allow Axum to extract parts of the state on their own.
// This is useful for middleware and extractors that might only need one part of the state.
impl FromRef<ApiContext> for PgPool {
    fn from_ref(state: &ApiContext) -> Self {
        state.pool.clone()
    }
}

impl FromRef<ApiContext> for AppSettings {
    fn from_ref(state: &ApiContext) -> Self {
        state.settings.clone()
    }
}

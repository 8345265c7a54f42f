use crate::runner::context::context_utils::{
    create_test_database, create_test_settings, force_drop_db,
};
use crate::runner::context::fake_services::{FakeServices, start_fake_services};
use app_state::{AppSettings, load_settings_from_path};
use color_eyre::eyre::{Result, eyre};
use reqwest::Client;
use sqlx::PgPool;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

/// The main context for our integration tests.
pub struct TestContext {
    pub pool: PgPool,
    pub settings: AppSettings,
    pub http_client: Client,
    pub fakes: Arc<FakeServices>,
    // Private fields for cleanup on Drop
    db_name: String,
    management_pool: PgPool,
    api_handle: JoinHandle<()>,
    fakes_handle: JoinHandle<()>,
}

impl TestContext {
    /// Sets up a dedicated database, the fake external services and the API.
    pub async fn new() -> Result<Self> {
        info!("Setting up test environment...");

        let settings_path = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
            .join("assets/settings.yaml")
            .canonicalize()?;
        let base_settings = load_settings_from_path(&settings_path)?;

        // 1. Set up the dedicated test database
        let db_name = "facescore_test_db".to_owned();
        let (main_pool, management_pool) = create_test_database(
            &base_settings.secrets.database_url,
            &db_name,
            &base_settings.database,
        )
        .await?;

        // 2. Start the fake storage and vision services
        let (fakes, fakes_addr, fakes_handle) =
            start_fake_services(&base_settings.vision.subscription_key).await?;

        // 3. Generate the final settings for this test run
        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let settings =
            create_test_settings(&db_name, &base_settings, listener.local_addr()?, fakes_addr)?;

        // 4. Spawn the API as a background task
        let api_pool = main_pool.clone();
        let api_settings = settings.clone();
        let api_handle = tokio::spawn(async move {
            if let Err(e) = api::serve_on(listener, api_pool, api_settings).await {
                error!("API server failed: {}", e);
            }
        });

        // 5. Wait for the API to be ready to accept traffic
        let http_client = Client::new();
        Self::wait_for_healthy_api(&settings, &http_client).await?;

        info!("Test environment is ready.");
        Ok(Self {
            pool: main_pool,
            settings,
            http_client,
            fakes,
            db_name,
            management_pool,
            api_handle,
            fakes_handle,
        })
    }

    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.settings.api.public_url)
    }

    /// Polls the `/health` endpoint until it receives a successful response or times out.
    async fn wait_for_healthy_api(settings: &AppSettings, http_client: &Client) -> Result<()> {
        let health_url = format!("{}/health", &settings.api.public_url);
        for attempt in 1..=20 {
            info!("Health check attempt {}...", attempt);
            match http_client.get(&health_url).send().await {
                Ok(response) if response.status().is_success() => {
                    info!("API is healthy!");
                    return Ok(());
                }
                Ok(response) => {
                    warn!(
                        "API health check returned non-success status: {}",
                        response.status()
                    );
                }
                Err(e) => {
                    warn!("API health check failed: {:?}. Retrying...", e);
                }
            }
            tokio::time::sleep(Duration::from_millis(250)).await;
        }
        Err(eyre!(
            "API did not become healthy within the timeout period."
        ))
    }
}

impl Drop for TestContext {
    fn drop(&mut self) {
        self.api_handle.abort();
        self.fakes_handle.abort();

        let db_name = self.db_name.clone();
        let main_pool = self.pool.clone();
        let management_pool = self.management_pool.clone();
        tokio::spawn(async move {
            main_pool.close().await;
            info!("Dropping test database: {}", db_name);
            force_drop_db(&management_pool, &db_name).await;
        });

        info!("Teardown complete.");
    }
}

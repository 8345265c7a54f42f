use app_state::{AppSettings, DatabaseSettings};
use color_eyre::eyre::Result;
use common_services::database::{get_db_pool, run_migrations};
use sqlx::{Executor, PgPool};
use std::net::SocketAddr;
use tracing::info;
use url::Url;

/// Points the base settings at the test database, the bound API address and the fakes.
pub fn create_test_settings(
    database_name: &str,
    base_settings: &AppSettings,
    api_addr: SocketAddr,
    fakes_addr: SocketAddr,
) -> Result<AppSettings> {
    let mut settings = base_settings.clone();

    settings.api.port = u32::from(api_addr.port());
    settings.api.public_url = format!("http://{api_addr}");

    settings.storage.account_url =
        Url::parse(&format!("http://{fakes_addr}/{}", settings.storage.account_name))?;
    settings.vision.endpoint = Url::parse(&format!("http://{fakes_addr}/"))?;

    let mut db_url = Url::parse(&settings.secrets.database_url)?;
    db_url.set_path(&format!("/{database_name}"));
    settings.secrets.database_url = db_url.to_string();

    Ok(settings)
}

/// Recreates `database_name` from scratch and migrates it.
/// Returns the pool for the test database and the management pool used to drop it later.
pub async fn create_test_database(
    base_database_url: &str,
    database_name: &str,
    db_settings: &DatabaseSettings,
) -> Result<(PgPool, PgPool)> {
    // 1. Connect to the default 'postgres' database to manage other databases.
    let mut management_db_url = Url::parse(base_database_url)?;
    management_db_url.set_path("/postgres");
    let management_pool = get_db_pool(management_db_url.as_str(), db_settings).await?;
    force_drop_db(&management_pool, database_name).await;

    // 2. Create the new test database.
    management_pool
        .execute(format!("CREATE DATABASE \"{database_name}\"").as_str())
        .await?;

    // 3. Connect to the newly created test database.
    let mut test_db_url = Url::parse(base_database_url)?;
    test_db_url.set_path(&format!("/{database_name}"));
    let main_pool = get_db_pool(test_db_url.as_str(), db_settings).await?;

    // 4. Run migrations on the test database.
    run_migrations(&main_pool).await?;
    info!("Finished database migrations for {}", database_name);

    Ok((main_pool, management_pool))
}

pub async fn force_drop_db(management_pool: &PgPool, db_name: &str) {
    if let Err(e) = management_pool
        .execute(format!("DROP DATABASE IF EXISTS \"{db_name}\" WITH (FORCE)").as_str())
        .await
    {
        info!("Could not drop {db_name}: {e}");
    }
}

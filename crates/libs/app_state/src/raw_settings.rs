use common_types::vision::VisualFeature;
use serde::Deserialize;

/// Settings exactly as they appear in `config/settings.yaml` after env overrides.
#[derive(Debug, Deserialize, Clone)]
pub struct RawSettings {
    pub api: ApiSettings,
    pub logging: LoggingSettings,
    pub database: DatabaseSettings,
    pub auth: AuthSettings,
    pub storage: RawStorageSettings,
    pub vision: RawVisionSettings,
    pub secrets: SecretSettings,
}

/// Configuration for the API server.
#[derive(Debug, Deserialize, Clone)]
pub struct ApiSettings {
    pub host: String,
    pub port: u32,
    pub allowed_origins: Vec<String>,
    pub public_url: String,
    /// Largest accepted request body on the upload route.
    pub max_upload_bytes: usize,
    pub rate_limiting: RateLimitingSettings,
}

#[derive(Debug, Deserialize, Clone)]
pub struct RateLimitingSettings {
    pub req_per_second: u64,
    pub burst_size: u32,
}

/// Logging configuration.
#[derive(Debug, Deserialize, Clone)]
pub struct LoggingSettings {
    pub level: String,
}

/// Database connection pool configuration.
#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseSettings {
    pub max_connections: u32,
    pub min_connection: u32,
    pub max_lifetime: u64,
    pub idle_timeout: u64,
    pub acquire_timeout: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AuthSettings {
    pub access_token_expiry_minutes: i64,
    pub refresh_token_expiry_days: i64,
}

/// Blob storage account, as configured.
#[derive(Debug, Deserialize, Clone)]
pub struct RawStorageSettings {
    pub account_name: String,
    /// Base64 encoded shared key of the storage account.
    pub account_key: String,
    pub container_name: String,
    pub endpoint_suffix: String,
    /// Overrides the account URL, e.g. `http://127.0.0.1:10000/devstoreaccount1` for Azurite.
    #[serde(default)]
    pub blob_endpoint: Option<String>,
    /// Lifetime of the SAS used for the upload request itself.
    pub upload_sas_minutes: i64,
}

/// Vision service account, as configured.
#[derive(Debug, Deserialize, Clone)]
pub struct RawVisionSettings {
    pub subscription_key: String,
    pub endpoint: String,
    pub features: Vec<VisualFeature>,
    pub connect_timeout_secs: u64,
    pub timeout_secs: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct SecretSettings {
    pub jwt: String,
    pub database_url: String,
}

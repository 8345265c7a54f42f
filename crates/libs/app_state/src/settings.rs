use crate::{
    ApiSettings, AuthSettings, DatabaseSettings, LoggingSettings, RawSettings, RawStorageSettings,
    RawVisionSettings, SecretSettings,
};
use color_eyre::eyre::{Result, bail, eyre};
use common_types::vision::VisualFeature;
use std::time::Duration;
use url::Url;

/// Validated application settings, built once at startup and shared through the API state.
#[derive(Debug, Clone)]
pub struct AppSettings {
    pub api: ApiSettings,
    pub logging: LoggingSettings,
    pub database: DatabaseSettings,
    pub auth: AuthSettings,
    pub storage: StorageSettings,
    pub vision: VisionSettings,
    pub secrets: SecretSettings,
}

#[derive(Debug, Clone)]
pub struct StorageSettings {
    pub account_name: String,
    pub account_key: String,
    pub container_name: String,
    /// Root of the blob service for this account. Blob paths are appended to it.
    pub account_url: Url,
    pub upload_sas_minutes: i64,
}

#[derive(Debug, Clone)]
pub struct VisionSettings {
    pub subscription_key: String,
    pub endpoint: Url,
    pub features: Vec<VisualFeature>,
    pub connect_timeout: Duration,
    pub timeout: Duration,
}

impl TryFrom<RawSettings> for AppSettings {
    type Error = color_eyre::Report;

    fn try_from(raw: RawSettings) -> Result<Self> {
        Ok(Self {
            storage: raw.storage.try_into()?,
            vision: raw.vision.try_into()?,
            api: raw.api,
            logging: raw.logging,
            database: raw.database,
            auth: raw.auth,
            secrets: raw.secrets,
        })
    }
}

impl TryFrom<RawStorageSettings> for StorageSettings {
    type Error = color_eyre::Report;

    fn try_from(raw: RawStorageSettings) -> Result<Self> {
        let account_name = required(raw.account_name, "STORAGE_ACCOUNT_NAME")?;
        let account_key = required(raw.account_key, "STORAGE_ACCOUNT_KEY")?;
        let container_name = required(raw.container_name, "STORAGE_CONTAINER_NAME")?;

        let account_url = match raw.blob_endpoint.filter(|e| !e.trim().is_empty()) {
            Some(endpoint) => Url::parse(endpoint.trim_end_matches('/'))
                .map_err(|e| eyre!("Invalid storage.blob_endpoint {endpoint}: {e}"))?,
            None => {
                let url = format!("https://{account_name}.blob.{}", raw.endpoint_suffix);
                Url::parse(&url).map_err(|e| eyre!("Invalid storage account url {url}: {e}"))?
            }
        };
        if account_url.cannot_be_a_base() {
            bail!("Storage account url {account_url} cannot hold a blob path");
        }
        if raw.upload_sas_minutes <= 0 {
            bail!("storage.upload_sas_minutes must be positive");
        }

        Ok(Self {
            account_name,
            account_key,
            container_name,
            account_url,
            upload_sas_minutes: raw.upload_sas_minutes,
        })
    }
}

impl TryFrom<RawVisionSettings> for VisionSettings {
    type Error = color_eyre::Report;

    fn try_from(raw: RawVisionSettings) -> Result<Self> {
        let subscription_key = required(raw.subscription_key, "COMPUTER_VISION_SUBSCRIPTION_KEY")?;
        let endpoint = required(raw.endpoint, "COMPUTER_VISION_ENDPOINT")?;
        let endpoint = Url::parse(&endpoint)
            .map_err(|e| eyre!("Invalid vision endpoint {endpoint}: {e}"))?;
        if !raw.features.contains(&VisualFeature::Faces) {
            bail!("vision.features must include Faces");
        }

        Ok(Self {
            subscription_key,
            endpoint,
            features: raw.features,
            connect_timeout: Duration::from_secs(raw.connect_timeout_secs),
            timeout: Duration::from_secs(raw.timeout_secs),
        })
    }
}

fn required(value: String, env_name: &str) -> Result<String> {
    if value.trim().is_empty() {
        bail!("{env_name} is not set");
    }
    Ok(value)
}

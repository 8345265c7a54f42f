use crate::{AppSettings, RawSettings};
use color_eyre::eyre::Result;
use config::builder::DefaultState;
use config::ConfigBuilder;
use std::env;
use std::path::Path;
use tracing::debug;

/// Well-known environment variables and the settings keys they override.
pub const ENV_OVERRIDES: [(&str, &str); 5] = [
    ("STORAGE_ACCOUNT_NAME", "storage.account_name"),
    ("STORAGE_ACCOUNT_KEY", "storage.account_key"),
    ("STORAGE_CONTAINER_NAME", "storage.container_name"),
    ("COMPUTER_VISION_SUBSCRIPTION_KEY", "vision.subscription_key"),
    ("COMPUTER_VISION_ENDPOINT", "vision.endpoint"),
];

/// Loads `.env` and `config/settings.yaml` from the working directory.
pub fn load_app_settings() -> Result<AppSettings> {
    // Need to load from dotenv to get it to overwrite the settings from env.
    dotenv::from_path(".env").ok();
    load_settings_from_path(Path::new("config/settings.yaml"))
}

/// Loads settings from a yaml file, `APP__` prefixed env vars and the well-known env vars.
pub fn load_settings_from_path(path: &Path) -> Result<AppSettings> {
    let config_path = path.canonicalize()?;
    debug!("Loading settings from {}", config_path.display());

    let builder = config::Config::builder()
        .add_source(config::File::from(config_path))
        .add_source(
            config::Environment::with_prefix("APP")
                .separator("__")
                .try_parsing(true),
        );
    let builder = apply_env_overrides(builder, |name| env::var(name).ok())?;

    let raw_settings = builder.build()?.try_deserialize::<RawSettings>()?;
    AppSettings::try_from(raw_settings)
}

/// Applies [`ENV_OVERRIDES`], taking values from `lookup`.
pub fn apply_env_overrides(
    mut builder: ConfigBuilder<DefaultState>,
    lookup: impl Fn(&str) -> Option<String>,
) -> Result<ConfigBuilder<DefaultState>> {
    for (env_name, key) in ENV_OVERRIDES {
        builder = builder.set_override_option(key, lookup(env_name))?;
    }
    Ok(builder)
}

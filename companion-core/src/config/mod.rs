use crate::error::ClientError;
use config::{Config, Environment, File};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize, Clone)]
pub struct TelemetrySettings {
    #[serde(default = "default_service_name")]
    pub service_name: String,
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// OTLP gRPC endpoint (e.g. http://tempo:4317). Spans are only exported when set.
    #[serde(default)]
    pub otlp_endpoint: Option<String>,
}

impl Default for TelemetrySettings {
    fn default() -> Self {
        Self {
            service_name: default_service_name(),
            log_level: default_log_level(),
            otlp_endpoint: None,
        }
    }
}

fn default_service_name() -> String {
    "book-companion".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Resolve `<crate_dir>/config`, whether we run from the workspace root or
/// from inside the crate directory.
pub fn config_directory(crate_dir: &str) -> Result<PathBuf, ClientError> {
    let base_path = std::env::current_dir().map_err(|e| ClientError::Config(e.into()))?;

    if base_path.ends_with(crate_dir) {
        Ok(base_path.join("config"))
    } else {
        Ok(base_path.join(crate_dir).join("config"))
    }
}

/// Load settings for `crate_dir`: optional `config/base.yaml`, overridden by
/// `APP_`-prefixed environment variables (`APP_BACKEND__URL`, ...).
pub fn load_settings<T: DeserializeOwned>(crate_dir: &str) -> Result<T, ClientError> {
    dotenvy::dotenv().ok();

    let directory = config_directory(crate_dir)?;
    load_from(&directory)
}

pub fn load_from<T: DeserializeOwned>(directory: &Path) -> Result<T, ClientError> {
    let settings = Config::builder()
        .add_source(File::from(directory.join("base.yaml")).required(false))
        .add_source(
            Environment::with_prefix("APP")
                .prefix_separator("_")
                .separator("__"),
        )
        .build()?;

    Ok(settings.try_deserialize::<T>()?)
}

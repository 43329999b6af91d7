use companion_core::config::{load_settings, TelemetrySettings};
use companion_core::ClientError;
use serde::Deserialize;
use std::path::PathBuf;

#[derive(Deserialize, Clone, Debug, Default)]
pub struct Settings {
    #[serde(default)]
    pub backend: BackendSettings,
    #[serde(default)]
    pub session: SessionSettings,
    #[serde(default)]
    pub telemetry: TelemetrySettings,
}

#[derive(Deserialize, Clone, Debug)]
pub struct BackendSettings {
    /// Base URL of the book backend (chat, auth, translation, awards).
    #[serde(default = "default_backend_url")]
    pub url: String,
}

impl Default for BackendSettings {
    fn default() -> Self {
        Self {
            url: default_backend_url(),
        }
    }
}

fn default_backend_url() -> String {
    "http://localhost:8000".to_string()
}

#[derive(Deserialize, Clone, Debug)]
pub struct SessionSettings {
    /// JSON file holding `external_id`, `auth_token` and `user_id` between runs.
    #[serde(default = "default_session_path")]
    pub path: PathBuf,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            path: default_session_path(),
        }
    }
}

fn default_session_path() -> PathBuf {
    PathBuf::from(".book-companion").join("session.json")
}

pub fn get_configuration() -> Result<Settings, ClientError> {
    load_settings("book-companion")
}

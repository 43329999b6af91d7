use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("{0}")]
    Validation(String),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("{message}")]
    Api { status: u16, message: String },

    #[error("{0}")]
    Auth(String),

    #[error("Unexpected response: {0}")]
    Decode(String),

    #[error("Configuration error: {0}")]
    Config(anyhow::Error),
}

impl ClientError {
    /// Build an API error from a non-OK response body.
    ///
    /// The backend reports failures either as `{"detail": ...}` or as
    /// `{"message": ...}`; when neither is a string the caller's fallback is used.
    pub fn from_body(status: u16, body: &Value, fallback: &str) -> Self {
        let message = body
            .get("detail")
            .and_then(Value::as_str)
            .or_else(|| body.get("message").and_then(Value::as_str))
            .filter(|m| !m.trim().is_empty())
            .unwrap_or(fallback)
            .to_string();

        ClientError::Api { status, message }
    }

    /// Text safe to show to the reader of the book.
    ///
    /// Transport failures carry no useful detail for a reader, so they are
    /// replaced with `network_fallback`.
    pub fn user_message(&self, network_fallback: &str) -> String {
        match self {
            ClientError::Network(_) => network_fallback.to_string(),
            other => other.to_string(),
        }
    }
}

impl From<validator::ValidationErrors> for ClientError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut fields: Vec<_> = errors.field_errors().into_iter().collect();
        fields.sort_by(|a, b| a.0.cmp(&b.0));

        let message = fields
            .into_iter()
            .flat_map(|(_, errs)| errs.iter())
            .find_map(|e| e.message.as_ref().map(|m| m.to_string()))
            .unwrap_or_else(|| "Invalid input".to_string());

        ClientError::Validation(message)
    }
}

impl From<config::ConfigError> for ClientError {
    fn from(err: config::ConfigError) -> Self {
        ClientError::Config(anyhow::Error::new(err))
    }
}

impl From<serde_json::Error> for ClientError {
    fn from(err: serde_json::Error) -> Self {
        ClientError::Decode(err.to_string())
    }
}

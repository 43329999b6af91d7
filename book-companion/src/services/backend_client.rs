//! HTTP client for the book backend.
//!
//! One method per endpoint. Non-OK responses become [`ClientError::Api`] with
//! the backend's `detail`/`message` text, or the caller's fallback. No retries
//! and no timeouts: a failed call surfaces once.

use crate::config::BackendSettings;
use crate::models::{
    AwardRequest, AwardResult, ChapterAwardStatus, ChatRequest, ChatResponse, HealthStatus,
    PersonalizeChapterRequest, PersonalizedChapter, TranslateRequest, TranslateResponse,
};
use crate::models::user::{AuthEnvelope, LegacyAuthResponse, PasswordSignUp, SignUpProfile};
use companion_core::observability::{TracedClientExt, TracedRequest};
use companion_core::ClientError;
use reqwest::{Client, Response, Url};
use serde::de::DeserializeOwned;
use serde::Serialize;

pub struct BackendClient {
    client: Client,
    base_url: Url,
}

impl BackendClient {
    pub fn new(settings: &BackendSettings) -> Result<Self, ClientError> {
        let base_url = Url::parse(&settings.url).map_err(|e| {
            ClientError::Config(anyhow::anyhow!(
                "Invalid backend url '{}': {}",
                settings.url,
                e
            ))
        })?;

        if base_url.cannot_be_a_base() {
            return Err(ClientError::Config(anyhow::anyhow!(
                "Backend url '{}' cannot carry a path",
                settings.url
            )));
        }

        Ok(Self {
            client: Client::new(),
            base_url,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Append `segments` to the base URL, percent-encoding each one.
    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    async fn send(
        &self,
        request: TracedRequest,
        url: &Url,
    ) -> Result<Response, ClientError> {
        request.send().await.map_err(|e| {
            tracing::error!(url = %url, error = %e, "Backend request failed");
            ClientError::Network(e)
        })
    }

    async fn post<B: Serialize + ?Sized>(
        &self,
        segments: &[&str],
        body: &B,
    ) -> Result<Response, ClientError> {
        let url = self.endpoint(segments);
        let request = self.client.traced_post(url.clone()).json(body);
        self.send(request, &url).await
    }

    async fn get(&self, segments: &[&str]) -> Result<Response, ClientError> {
        let url = self.endpoint(segments);
        let request = self.client.traced_get(url.clone());
        self.send(request, &url).await
    }

    /// Decode a success body, or turn a non-OK response into an API error.
    async fn decode<T: DeserializeOwned>(
        response: Response,
        fallback: &str,
    ) -> Result<T, ClientError> {
        let status = response.status();
        let bytes = response.bytes().await?;

        if !status.is_success() {
            let body: serde_json::Value =
                serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null);
            tracing::warn!(status = status.as_u16(), "Backend returned an error");
            return Err(ClientError::from_body(status.as_u16(), &body, fallback));
        }

        Ok(serde_json::from_slice(&bytes)?)
    }

    pub async fn health(&self) -> Result<HealthStatus, ClientError> {
        let response = self.get(&["health"]).await?;
        Self::decode(response, "Backend unhealthy").await
    }

    pub async fn sign_up(&self, profile: &SignUpProfile) -> Result<AuthEnvelope, ClientError> {
        let response = self.post(&["api", "auth", "signup"], profile).await?;
        Self::decode(response, "Signup failed").await
    }

    pub async fn sign_in(&self, email: &str) -> Result<AuthEnvelope, ClientError> {
        let body = serde_json::json!({ "email": email });
        let response = self.post(&["api", "auth", "signin"], &body).await?;
        Self::decode(response, "Signin failed").await
    }

    pub async fn password_sign_in(
        &self,
        email: &str,
        password: &str,
    ) -> Result<LegacyAuthResponse, ClientError> {
        let body = serde_json::json!({ "email": email, "password": password });
        let response = self.post(&["auth", "signin"], &body).await?;
        Self::decode(response, "Sign in failed").await
    }

    pub async fn password_sign_up(
        &self,
        signup: &PasswordSignUp,
    ) -> Result<LegacyAuthResponse, ClientError> {
        let response = self.post(&["auth", "signup"], signup).await?;
        Self::decode(response, "Sign up failed").await
    }

    pub async fn award_status(
        &self,
        external_id: &str,
        chapter: &str,
    ) -> Result<ChapterAwardStatus, ClientError> {
        let response = self
            .get(&["api", "users", external_id, "award-status", chapter])
            .await?;
        Self::decode(response, "Failed to fetch award status").await
    }

    pub async fn award_bonus(&self, request: &AwardRequest) -> Result<AwardResult, ClientError> {
        let response = self.post(&["api", "users", "award-bonus"], request).await?;
        Self::decode(response, "Award failed").await
    }

    pub async fn translate_urdu(
        &self,
        request: &TranslateRequest,
    ) -> Result<TranslateResponse, ClientError> {
        let response = self.post(&["api", "translate", "urdu"], request).await?;
        Self::decode(response, "Translation failed").await
    }

    pub async fn personalize_chapter(
        &self,
        request: &PersonalizeChapterRequest,
    ) -> Result<PersonalizedChapter, ClientError> {
        let response = self
            .post(&["api", "personalize", "chapter"], request)
            .await?;
        Self::decode(response, "Failed to personalize chapter").await
    }

    /// `POST /api/chat`. A non-OK status reads "API Error: <reason>", whatever
    /// the body says.
    pub async fn chat(&self, request: &ChatRequest) -> Result<ChatResponse, ClientError> {
        let response = self.post(&["api", "chat"], request).await?;

        let status = response.status();
        if !status.is_success() {
            let reason = status.canonical_reason().unwrap_or("Unknown status");
            return Err(ClientError::Api {
                status: status.as_u16(),
                message: format!("API Error: {}", reason),
            });
        }

        Self::decode(response, "Chat failed").await
    }
}

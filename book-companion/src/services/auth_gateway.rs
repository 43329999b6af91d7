//! Sign-up, sign-in and sign-out for both credential styles.
//!
//! Email-only credentials go to `/api/auth/*` and set the session's
//! `external_id`. Password credentials go to the form endpoints `/auth/*` and
//! store that flow's token and user id. The session is written only after a
//! response carrying a usable user.

use crate::models::user::{AuthEnvelope, LegacyAuthResponse};
use crate::models::{PasswordSignUp, SignUpProfile, User};
use crate::services::backend_client::BackendClient;
use crate::session::{LegacyCredentials, Session};
use companion_core::ClientError;
use secrecy::{ExposeSecret, Secret};
use std::sync::Arc;

pub enum Credentials {
    Email(String),
    Password {
        email: String,
        password: Secret<String>,
    },
}

pub enum SignUp {
    Profile(SignUpProfile),
    WithPassword(PasswordSignUp),
}

pub struct AuthGateway {
    backend: Arc<BackendClient>,
    session: Session,
}

impl AuthGateway {
    pub fn new(backend: Arc<BackendClient>, session: Session) -> Self {
        Self { backend, session }
    }

    pub async fn sign_up(&self, request: SignUp) -> Result<User, ClientError> {
        let result = match request {
            SignUp::Profile(profile) => self.sign_up_with_profile(profile).await,
            SignUp::WithPassword(signup) => self.sign_up_with_password(signup).await,
        };

        if let Err(e) = &result {
            tracing::error!(error = %e, "Sign-up failed");
        }
        result
    }

    pub async fn sign_in(&self, credentials: Credentials) -> Result<User, ClientError> {
        let result = match credentials {
            Credentials::Email(email) => self.sign_in_with_email(&email).await,
            Credentials::Password { email, password } => {
                self.sign_in_with_password(&email, &password).await
            }
        };

        if let Err(e) = &result {
            tracing::error!(error = %e, "Sign-in failed");
        }
        result
    }

    async fn sign_up_with_profile(&self, mut profile: SignUpProfile) -> Result<User, ClientError> {
        if profile.external_id.is_none() {
            profile.external_id = self.session.external_id();
        }
        let envelope = self
            .backend
            .sign_up(&profile)
            .await
            .map_err(into_auth_error)?;
        self.accept(envelope, "Signup failed")
    }

    async fn sign_up_with_password(&self, signup: PasswordSignUp) -> Result<User, ClientError> {
        signup.check()?;
        let response = self
            .backend
            .password_sign_up(&signup)
            .await
            .map_err(into_auth_error)?;
        self.accept_legacy(response, "Sign up failed")
    }

    async fn sign_in_with_email(&self, email: &str) -> Result<User, ClientError> {
        let envelope = self
            .backend
            .sign_in(email)
            .await
            .map_err(into_auth_error)?;
        self.accept(envelope, "Signin failed")
    }

    async fn sign_in_with_password(
        &self,
        email: &str,
        password: &Secret<String>,
    ) -> Result<User, ClientError> {
        let response = self
            .backend
            .password_sign_in(email, password.expose_secret())
            .await
            .map_err(into_auth_error)?;
        self.accept_legacy(response, "Sign in failed")
    }

    /// Local only; the backend keeps no session to revoke.
    pub fn sign_out(&self) {
        self.session.clear();
        tracing::info!("Reader signed out");
    }

    fn accept(&self, envelope: AuthEnvelope, fallback: &str) -> Result<User, ClientError> {
        let user = envelope
            .user
            .and_then(|raw| raw.into_user())
            .ok_or_else(|| ClientError::Auth(fallback.to_string()))?;

        self.session.set_external_id(&user.external_id);
        tracing::info!(external_id = %user.external_id, "Reader signed in");
        Ok(user)
    }

    fn accept_legacy(
        &self,
        response: LegacyAuthResponse,
        fallback: &str,
    ) -> Result<User, ClientError> {
        if !response.success {
            let message = response
                .message
                .filter(|m| !m.trim().is_empty())
                .unwrap_or_else(|| fallback.to_string());
            return Err(ClientError::Auth(message));
        }

        let user = response
            .user
            .and_then(|raw| raw.into_user())
            .ok_or_else(|| ClientError::Auth(fallback.to_string()))?;

        if let Some(token) = response.token {
            self.session.set_legacy_credentials(&LegacyCredentials {
                user_id: user.external_id.clone(),
                token: Secret::new(token),
            });
        }

        tracing::info!(user_id = %user.external_id, "Reader signed in with password");
        Ok(user)
    }
}

/// Non-OK auth responses surface as auth failures with the backend's text.
fn into_auth_error(err: ClientError) -> ClientError {
    match err {
        ClientError::Api { message, .. } => ClientError::Auth(message),
        other => other,
    }
}

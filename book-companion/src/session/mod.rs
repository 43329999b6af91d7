//! The reader session, injected into every controller.
//!
//! Presence of an `external_id` is what "signed in" means for gating
//! translation and awards. The password form flow keeps its own token and
//! user id next to it; those do not sign the reader in (the two backends are
//! not reconciled).

pub mod store;

use secrecy::{ExposeSecret, Secret};
use std::sync::Arc;

pub use store::{FileSessionStore, MemorySessionStore, SessionStore};

pub const EXTERNAL_ID_KEY: &str = "external_id";
pub const AUTH_TOKEN_KEY: &str = "auth_token";
pub const USER_ID_KEY: &str = "user_id";

/// Token and user id issued by the password form endpoints.
#[derive(Debug, Clone)]
pub struct LegacyCredentials {
    pub user_id: String,
    pub token: Secret<String>,
}

#[derive(Clone)]
pub struct Session {
    store: Arc<dyn SessionStore>,
}

impl Session {
    /// Restore whatever the store already holds.
    pub fn open(store: Arc<dyn SessionStore>) -> Self {
        let session = Self { store };
        tracing::debug!(
            signed_in = session.is_logged_in(),
            "Session restored"
        );
        session
    }

    pub fn in_memory() -> Self {
        Self::open(Arc::new(MemorySessionStore::new()))
    }

    pub fn external_id(&self) -> Option<String> {
        self.store
            .get(EXTERNAL_ID_KEY)
            .filter(|id| !id.trim().is_empty())
    }

    pub fn is_logged_in(&self) -> bool {
        self.external_id().is_some()
    }

    pub fn set_external_id(&self, external_id: &str) {
        self.store.set(EXTERNAL_ID_KEY, external_id);
    }

    pub fn legacy_credentials(&self) -> Option<LegacyCredentials> {
        let token = self.store.get(AUTH_TOKEN_KEY)?;
        let user_id = self.store.get(USER_ID_KEY)?;
        Some(LegacyCredentials {
            user_id,
            token: Secret::new(token),
        })
    }

    pub fn set_legacy_credentials(&self, credentials: &LegacyCredentials) {
        self.store
            .set(AUTH_TOKEN_KEY, credentials.token.expose_secret());
        self.store.set(USER_ID_KEY, &credentials.user_id);
    }

    /// Sign-out teardown: forget every identity the session holds.
    pub fn clear(&self) {
        self.store.remove(EXTERNAL_ID_KEY);
        self.store.remove(AUTH_TOKEN_KEY);
        self.store.remove(USER_ID_KEY);
    }
}

use crate::config::Settings;
use crate::services::BackendClient;
use crate::session::{FileSessionStore, Session};
use crate::Companion;
use companion_core::ClientError;
use std::sync::Arc;

/// Wire the backend client and the on-disk session from configuration.
pub fn build_companion(settings: &Settings) -> Result<Companion, ClientError> {
    let backend = Arc::new(BackendClient::new(&settings.backend)?);
    let store = FileSessionStore::open(settings.session.path.clone());
    let session = Session::open(Arc::new(store));

    tracing::debug!(
        backend = %backend.base_url(),
        session_path = %settings.session.path.display(),
        "Companion ready"
    );
    Ok(Companion::new(backend, session))
}

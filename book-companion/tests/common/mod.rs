#![allow(dead_code)]

use book_companion::config::BackendSettings;
use book_companion::controllers::ChapterPage;
use book_companion::services::BackendClient;
use book_companion::session::{MemorySessionStore, Session, SessionStore};
use book_companion::Companion;
use companion_core::observability::init_test_tracing;
use std::sync::Arc;
use wiremock::MockServer;

pub const TEST_EXTERNAL_ID: &str = "reader-42";
pub const TEST_CHAPTER: &str = "ch-03-kinematics";
pub const CHAPTER_HTML: &str =
    "<h1>Kinematics</h1><p>Forward kinematics maps joint angles to poses.</p><pre><code>fk(q)</code></pre>";

/// A mocked book backend plus a companion wired to it with an in-memory
/// session.
pub struct TestBackend {
    pub server: MockServer,
    pub store: Arc<MemorySessionStore>,
    pub companion: Companion,
}

impl TestBackend {
    pub async fn spawn() -> Self {
        init_test_tracing();

        let server = MockServer::start().await;
        let backend = BackendClient::new(&BackendSettings { url: server.uri() })
            .expect("Failed to build backend client");

        let store = Arc::new(MemorySessionStore::new());
        let session = Session::open(store.clone() as Arc<dyn SessionStore>);
        let companion = Companion::new(Arc::new(backend), session);

        Self {
            server,
            store,
            companion,
        }
    }

    /// Spawn with the reader already signed in.
    pub async fn signed_in() -> Self {
        let backend = Self::spawn().await;
        backend.companion.session.set_external_id(TEST_EXTERNAL_ID);
        backend
    }

    pub fn session(&self) -> &Session {
        &self.companion.session
    }

    pub fn chapter_page(&self) -> ChapterPage {
        ChapterPage::new(CHAPTER_HTML)
    }

    /// JSON bodies of every request the mock backend received, in order.
    pub async fn request_bodies(&self) -> Vec<serde_json::Value> {
        self.server
            .received_requests()
            .await
            .unwrap_or_default()
            .iter()
            .map(|req| serde_json::from_slice(&req.body).unwrap_or(serde_json::Value::Null))
            .collect()
    }
}

pub mod config;
pub mod controllers;
pub mod models;
pub mod services;
pub mod session;
pub mod startup;

use controllers::{ChapterActions, ChapterPage, ChapterPersonalizer, ChatSession};
use services::{AuthGateway, BackendClient};
use session::Session;
use std::sync::Arc;

/// Shared client state: one backend client and one session, handed to every
/// controller.
#[derive(Clone)]
pub struct Companion {
    pub backend: Arc<BackendClient>,
    pub session: Session,
    pub auth: Arc<AuthGateway>,
}

impl Companion {
    pub fn new(backend: Arc<BackendClient>, session: Session) -> Self {
        let auth = Arc::new(AuthGateway::new(backend.clone(), session.clone()));
        Self {
            backend,
            session,
            auth,
        }
    }

    pub fn chapter_actions(&self, chapter: &str, page: &ChapterPage) -> ChapterActions {
        ChapterActions::new(chapter, page, self.backend.clone(), self.session.clone())
    }

    pub fn personalizer(&self, chapter: &str, page: &ChapterPage) -> ChapterPersonalizer {
        ChapterPersonalizer::new(chapter, page, self.backend.clone())
    }

    pub fn chat(&self) -> ChatSession {
        ChatSession::new(self.backend.clone(), self.session.clone())
    }
}

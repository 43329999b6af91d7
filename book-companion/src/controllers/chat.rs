use crate::models::{ChatRequest, HistoryEntry, Message, Role};
use crate::services::BackendClient;
use crate::session::Session;
use chrono::Utc;
use std::sync::Arc;

pub const WELCOME_MESSAGE: &str = "Welcome to the Robotics Book Assistant! 👋 I can help you understand concepts from the Physical AI & Humanoid Robotics book. You can ask me questions about any topic, or highlight text to get explanations about specific passages.";

/// Selections this short are treated as accidental.
const MIN_SELECTION_CHARS: usize = 10;

#[derive(Debug, Clone, PartialEq)]
pub enum SendOutcome {
    /// Nothing was sent.
    Rejected,
    Answered,
    Failed,
}

pub struct ChatSession {
    backend: Arc<BackendClient>,
    session: Session,
    messages: Vec<Message>,
    selected_text: Option<String>,
    error: Option<String>,
    loading: bool,
}

impl ChatSession {
    pub fn new(backend: Arc<BackendClient>, session: Session) -> Self {
        let welcome = Message {
            id: "0".to_string(),
            role: Role::Assistant,
            content: WELCOME_MESSAGE.to_string(),
            selected_text: None,
            sources: None,
            timestamp: Utc::now(),
        };

        Self {
            backend,
            session,
            messages: vec![welcome],
            selected_text: None,
            error: None,
            loading: false,
        }
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn selected_text(&self) -> Option<&str> {
        self.selected_text.as_deref()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Keep the reader's highlighted passage for the next question.
    pub fn capture_selection(&mut self, text: Option<&str>) {
        self.selected_text = text
            .map(str::trim)
            .filter(|t| t.chars().count() > MIN_SELECTION_CHARS)
            .map(str::to_string);
    }

    #[tracing::instrument(skip(self, query))]
    pub async fn send(&mut self, query: &str) -> SendOutcome {
        if query.trim().is_empty() {
            self.error = Some("Please enter a message".to_string());
            return SendOutcome::Rejected;
        }

        // Snapshot before appending: the query travels only in `query`.
        let conversation_history: Vec<HistoryEntry> =
            self.messages.iter().map(HistoryEntry::from).collect();

        let selected_text = self.selected_text.take();
        self.messages
            .push(Message::user(query, selected_text.clone()));
        self.error = None;
        self.loading = true;

        let request = ChatRequest {
            query: query.to_string(),
            selected_text,
            conversation_history,
            external_id: self.session.external_id(),
        };

        let outcome = match self.backend.chat(&request).await {
            Ok(response) => {
                tracing::debug!(sources = response.sources.len(), "Chat answered");
                self.messages
                    .push(Message::assistant(response.answer, Some(response.sources)));
                SendOutcome::Answered
            }
            Err(e) => {
                tracing::error!(error = %e, "Chat request failed");
                let text = e.to_string();
                self.messages.push(Message::assistant(
                    format!(
                        "Sorry, I encountered an error: {}. Please make sure the backend is running and properly configured.",
                        text
                    ),
                    None,
                ));
                self.error = Some(text);
                SendOutcome::Failed
            }
        };

        self.loading = false;
        outcome
    }
}

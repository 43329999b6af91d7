use crate::controllers::chapter_actions::ChapterPage;
use crate::models::{LearnerProfile, PersonalizeChapterRequest, PersonalizedChapter};
use crate::services::BackendClient;
use std::sync::Arc;

/// Rewrites one chapter for a learner profile.
pub struct ChapterPersonalizer {
    chapter: String,
    content: String,
    backend: Arc<BackendClient>,
    personalized: Option<PersonalizedChapter>,
    error: Option<String>,
    in_flight: bool,
}

impl ChapterPersonalizer {
    pub fn new(chapter: impl Into<String>, page: &ChapterPage, backend: Arc<BackendClient>) -> Self {
        Self {
            chapter: chapter.into(),
            content: page.chapter_text().to_string(),
            backend,
            personalized: None,
            error: None,
            in_flight: false,
        }
    }

    pub fn personalized(&self) -> Option<&PersonalizedChapter> {
        self.personalized.as_ref()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_loading(&self) -> bool {
        self.in_flight
    }

    #[tracing::instrument(skip(self, profile), fields(chapter = %self.chapter))]
    pub async fn personalize(&mut self, profile: &LearnerProfile) -> bool {
        if self.in_flight {
            return false;
        }

        self.in_flight = true;
        self.error = None;

        let request = PersonalizeChapterRequest {
            chapter_name: self.chapter.clone(),
            chapter_content: self.content.clone(),
            user_profile: profile.clone(),
        };
        let result = self.backend.personalize_chapter(&request).await;
        self.in_flight = false;

        match result {
            Ok(chapter) => {
                tracing::info!(
                    original_length = chapter.original_length,
                    personalized_length = chapter.personalized_length,
                    "Chapter personalized"
                );
                self.personalized = Some(chapter);
                true
            }
            Err(e) => {
                tracing::error!(error = %e, "Personalization failed");
                self.error = Some(e.user_message("Failed to personalize chapter"));
                false
            }
        }
    }
}

//! Per-chapter translate / restore controller with the bonus-award side flow.
//!
//! The chapter text is captured once, when the controller is created. Both
//! language variants are kept as data and the active one is what gets
//! rendered, so restoring the original never depends on what was on screen.

use crate::models::{AwardRequest, AwardResult, TranslateRequest, BONUS_POINTS};
use crate::services::BackendClient;
use crate::session::Session;
use companion_core::ClientError;
use std::sync::Arc;

/// Regions of a rendered chapter page, in the order they are preferred as the
/// chapter text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentRegion {
    Article,
    MarkdownBody,
    Main,
}

const REGION_PRIORITY: [ContentRegion; 3] = [
    ContentRegion::Article,
    ContentRegion::MarkdownBody,
    ContentRegion::Main,
];

/// Snapshot of a chapter page: whichever content regions it has, plus the
/// whole-page body.
#[derive(Debug, Clone, Default)]
pub struct ChapterPage {
    regions: Vec<(ContentRegion, String)>,
    body: String,
}

impl ChapterPage {
    pub fn new(body: impl Into<String>) -> Self {
        Self {
            regions: Vec::new(),
            body: body.into(),
        }
    }

    pub fn with_region(mut self, region: ContentRegion, text: impl Into<String>) -> Self {
        self.regions.push((region, text.into()));
        self
    }

    /// The first region present in priority order, else the body.
    pub fn chapter_text(&self) -> &str {
        REGION_PRIORITY
            .iter()
            .find_map(|wanted| {
                self.regions
                    .iter()
                    .find(|(region, _)| region == wanted)
                    .map(|(_, text)| text.as_str())
            })
            .unwrap_or(self.body.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Variant {
    Original,
    Translated,
}

#[derive(Debug, Clone)]
pub struct ChapterContent {
    original: String,
    translated: Option<String>,
    active: Variant,
}

impl ChapterContent {
    pub fn capture(page: &ChapterPage) -> Self {
        Self {
            original: page.chapter_text().to_string(),
            translated: None,
            active: Variant::Original,
        }
    }

    pub fn original(&self) -> &str {
        &self.original
    }

    pub fn translated(&self) -> Option<&str> {
        self.translated.as_deref()
    }

    pub fn active(&self) -> Variant {
        self.active
    }

    pub fn rendered(&self) -> &str {
        match (self.active, &self.translated) {
            (Variant::Translated, Some(text)) => text,
            _ => &self.original,
        }
    }

    fn show_translation(&mut self, text: String) {
        self.translated = Some(text);
        self.active = Variant::Translated;
    }

    fn show_original(&mut self) {
        self.active = Variant::Original;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChapterState {
    /// Not signed in, or not mounted yet.
    Idle,
    CheckingStatus,
    Eligible,
    /// Bonus already awarded or exhausted; translation is off.
    Disabled,
    Translating,
    Translated,
    Original,
    Error,
}

pub struct ChapterActions {
    chapter: String,
    backend: Arc<BackendClient>,
    session: Session,
    content: ChapterContent,
    state: ChapterState,
    message: Option<String>,
    in_flight: bool,
}

impl ChapterActions {
    pub fn new(
        chapter: impl Into<String>,
        page: &ChapterPage,
        backend: Arc<BackendClient>,
        session: Session,
    ) -> Self {
        Self {
            chapter: chapter.into(),
            backend,
            session,
            content: ChapterContent::capture(page),
            state: ChapterState::Idle,
            message: None,
            in_flight: false,
        }
    }

    pub fn state(&self) -> ChapterState {
        self.state
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    pub fn content(&self) -> &ChapterContent {
        &self.content
    }

    pub fn rendered(&self) -> &str {
        self.content.rendered()
    }

    pub fn has_translation(&self) -> bool {
        self.content.translated.is_some()
    }

    /// Whether the translate control is unavailable right now.
    pub fn is_disabled(&self) -> bool {
        self.in_flight || self.state == ChapterState::Disabled || !self.session.is_logged_in()
    }

    /// Look up the reader's award status for this chapter.
    #[tracing::instrument(skip(self), fields(chapter = %self.chapter))]
    pub async fn mount(&mut self) {
        let Some(external_id) = self.session.external_id() else {
            self.state = ChapterState::Idle;
            return;
        };

        self.state = ChapterState::CheckingStatus;
        match self.backend.award_status(&external_id, &self.chapter).await {
            Ok(status) if status.awarded => {
                self.state = ChapterState::Disabled;
                self.message = Some("Already translated — bonus awarded".to_string());
            }
            Ok(status) if status.is_exhausted() => {
                self.state = ChapterState::Disabled;
                self.message = Some("Max bonus reached".to_string());
            }
            Ok(_) => self.state = ChapterState::Eligible,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to fetch award status");
                self.state = ChapterState::Eligible;
            }
        }
    }

    /// Translate the chapter to Urdu and claim the bonus.
    #[tracing::instrument(skip(self), fields(chapter = %self.chapter))]
    pub async fn translate(&mut self) {
        if self.is_disabled() {
            tracing::debug!(state = ?self.state, "Translate ignored");
            return;
        }

        self.in_flight = true;
        self.state = ChapterState::Translating;
        self.message = Some("Translating...".to_string());

        let outcome = self.request_translation().await;

        match outcome {
            Ok(text) => {
                self.content.show_translation(text);
                self.state = ChapterState::Translated;
                self.message = Some("Translation complete".to_string());
                self.claim_award().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Translation failed");
                self.state = ChapterState::Error;
                self.message = Some(e.user_message("Network error while translating"));
            }
        }

        self.in_flight = false;
    }

    async fn request_translation(&self) -> Result<String, ClientError> {
        let content = self.content.original();
        if content.trim().is_empty() {
            return Err(ClientError::Validation(
                "No content found to translate".to_string(),
            ));
        }

        let request = TranslateRequest {
            content: content.to_string(),
            preserve_code_blocks: true,
        };
        let response = self.backend.translate_urdu(&request).await?;

        response
            .urdu_content
            .filter(|text| !text.is_empty())
            .ok_or_else(|| ClientError::Api {
                status: 200,
                message: "Translation failed".to_string(),
            })
    }

    /// Award failures never undo a finished translation; they are only logged.
    async fn claim_award(&mut self) {
        let Some(external_id) = self.session.external_id() else {
            return;
        };

        let request = AwardRequest {
            external_id,
            chapter: self.chapter.clone(),
            points: BONUS_POINTS,
        };

        match self.backend.award_bonus(&request).await {
            Ok(award) => self.message = Some(award_message(&award)),
            Err(e) => tracing::warn!(error = %e, "Award bonus failed"),
        }
    }

    /// Switch between the translation and the original, translating first
    /// when there is nothing to switch back to.
    pub async fn toggle(&mut self) {
        if self.in_flight {
            return;
        }

        if self.state == ChapterState::Translated && self.has_translation() {
            self.content.show_original();
            self.state = ChapterState::Original;
            self.message = Some("Restored original English content".to_string());
        } else {
            self.translate().await;
        }
    }
}

fn award_message(award: &AwardResult) -> String {
    if award.awarded {
        format!(
            "Translation complete — you earned {} bonus points (total {})",
            award.awarded_points.unwrap_or(i64::from(BONUS_POINTS)),
            award.total_points
        )
    } else {
        format!(
            "Translation complete — bonus already claimed (total {})",
            award.total_points
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chapter_text_prefers_article() {
        let page = ChapterPage::new("whole page")
            .with_region(ContentRegion::Main, "main text")
            .with_region(ContentRegion::Article, "article text");
        assert_eq!(page.chapter_text(), "article text");

        let page = ChapterPage::new("whole page")
            .with_region(ContentRegion::Main, "main text")
            .with_region(ContentRegion::MarkdownBody, "markdown text");
        assert_eq!(page.chapter_text(), "markdown text");

        assert_eq!(ChapterPage::new("whole page").chapter_text(), "whole page");
    }

    #[test]
    fn test_rendered_follows_active_variant() {
        let mut content = ChapterContent::capture(&ChapterPage::new("<p>Hello</p>"));
        assert_eq!(content.rendered(), "<p>Hello</p>");

        content.show_translation("ہیلو".to_string());
        assert_eq!(content.rendered(), "ہیلو");
        assert_eq!(content.active(), Variant::Translated);

        content.show_original();
        assert_eq!(content.rendered(), "<p>Hello</p>");
        assert_eq!(content.translated(), Some("ہیلو"));
    }

    #[test]
    fn test_award_messages() {
        let earned = AwardResult {
            awarded: true,
            awarded_points: Some(50),
            total_points: 50,
        };
        assert_eq!(
            award_message(&earned),
            "Translation complete — you earned 50 bonus points (total 50)"
        );

        let claimed = AwardResult {
            awarded: false,
            awarded_points: None,
            total_points: 50,
        };
        assert_eq!(
            award_message(&claimed),
            "Translation complete — bonus already claimed (total 50)"
        );
    }
}

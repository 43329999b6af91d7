use crate::models::user::LearnerProfile;
use serde::{Deserialize, Serialize};

/// Bonus points claimed per translated chapter.
pub const BONUS_POINTS: u32 = 50;

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ChapterAwardStatus {
    pub awarded: bool,
    pub remaining: i64,
    #[serde(default)]
    pub total_points: Option<i64>,
}

impl ChapterAwardStatus {
    /// Nothing left to earn on this chapter.
    pub fn is_exhausted(&self) -> bool {
        self.awarded || self.remaining == 0
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct AwardRequest {
    pub external_id: String,
    pub chapter: String,
    pub points: u32,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AwardResult {
    pub awarded: bool,
    #[serde(default)]
    pub awarded_points: Option<i64>,
    #[serde(default)]
    pub total_points: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct TranslateRequest {
    pub content: String,
    pub preserve_code_blocks: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TranslateResponse {
    #[serde(default)]
    pub urdu_content: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PersonalizeChapterRequest {
    pub chapter_name: String,
    pub chapter_content: String,
    pub user_profile: LearnerProfile,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PersonalizedChapter {
    pub chapter_name: String,
    #[serde(default)]
    pub original_length: usize,
    #[serde(default)]
    pub personalized_length: usize,
    pub personalized_content: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    #[serde(default)]
    pub service: Option<String>,
    #[serde(default)]
    pub version: Option<String>,
}

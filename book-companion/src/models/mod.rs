pub mod chapter;
pub mod chat;
pub mod user;

pub use chapter::{
    AwardRequest, AwardResult, ChapterAwardStatus, HealthStatus, PersonalizeChapterRequest,
    PersonalizedChapter, TranslateRequest, TranslateResponse, BONUS_POINTS,
};
pub use chat::{ChatRequest, ChatResponse, HistoryEntry, Message, Role, Source};
pub use user::{
    HardwareExperience, LearnerProfile, PasswordSignUp, SignUpProfile, SoftwareBackground, User,
};

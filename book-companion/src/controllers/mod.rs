pub mod chapter_actions;
pub mod chat;
pub mod personalize;

pub use chapter_actions::{ChapterActions, ChapterContent, ChapterPage, ChapterState, ContentRegion};
pub use chat::{ChatSession, SendOutcome, WELCOME_MESSAGE};
pub use personalize::ChapterPersonalizer;

//! companion-core: shared infrastructure for the book companion client.
pub mod config;
pub mod error;
pub mod observability;

pub use error::ClientError;

pub use reqwest;
pub use serde;
pub use serde_json;
pub use tracing;
pub use validator;

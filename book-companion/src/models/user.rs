use companion_core::ClientError;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::borrow::Cow;
use validator::{Validate, ValidationError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum SoftwareBackground {
    #[default]
    Beginner,
    Intermediate,
    Advanced,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum HardwareExperience {
    #[default]
    Low,
    Medium,
    High,
}

/// What the reader tells us about themselves; drives personalization.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LearnerProfile {
    pub software_background: SoftwareBackground,
    pub hardware_experience: HardwareExperience,
    #[serde(default)]
    pub programming_languages: Vec<String>,
    #[serde(default)]
    pub learning_goal: String,
}

impl LearnerProfile {
    /// Split a comma separated language list the way the sign-up form does:
    /// trimmed, empties dropped.
    pub fn parse_languages(raw: &str) -> Vec<String> {
        raw.split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect()
    }
}

/// Body of `POST /api/auth/signup`.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SignUpProfile {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub external_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(flatten)]
    pub profile: LearnerProfile,
}

/// Sign-up through the password form (`POST /auth/signup`).
///
/// No `Debug`: the struct holds a clear-text password.
#[derive(Clone, Serialize, Validate)]
pub struct PasswordSignUp {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,

    #[serde(skip_serializing)]
    #[validate(must_match(other = "password", message = "Passwords do not match"))]
    pub confirm_password: String,

    pub software_background: SoftwareBackground,
    pub hardware_experience: HardwareExperience,
    pub programming_languages: Vec<String>,

    #[validate(custom(function = "not_blank"))]
    pub learning_goal: String,
}

fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut err = ValidationError::new("blank");
        err.message = Some(Cow::from("Please enter your learning goal"));
        return Err(err);
    }
    Ok(())
}

impl PasswordSignUp {
    /// Validate and report the first problem in form order.
    pub fn check(&self) -> Result<(), ClientError> {
        let Err(errors) = self.validate() else {
            return Ok(());
        };

        let fields = errors.field_errors();
        for field in ["confirm_password", "password", "learning_goal", "email"] {
            let message = fields
                .get(field)
                .and_then(|errs| errs.iter().find_map(|e| e.message.clone()));
            if let Some(message) = message {
                return Err(ClientError::Validation(message.into_owned()));
            }
        }
        drop(fields);

        Err(errors.into())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub external_id: String,
    pub email: Option<String>,
    pub software_background: Option<String>,
    pub hardware_experience: Option<String>,
    pub programming_languages: Vec<String>,
    pub learning_goal: Option<String>,
}

/// User payload as the backend sends it. Either `external_id` or `id` may
/// carry the identifier, as a string or a number.
#[derive(Debug, Deserialize)]
pub struct RawUser {
    #[serde(default)]
    pub external_id: Option<Value>,
    #[serde(default)]
    pub id: Option<Value>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub software_background: Option<String>,
    #[serde(default)]
    pub hardware_experience: Option<String>,
    #[serde(default)]
    pub programming_languages: Option<Vec<String>>,
    #[serde(default)]
    pub learning_goal: Option<String>,
}

impl RawUser {
    /// Normalize into a [`User`]; `None` when neither id field is usable.
    pub fn into_user(self) -> Option<User> {
        let external_id = self
            .external_id
            .as_ref()
            .and_then(id_string)
            .or_else(|| self.id.as_ref().and_then(id_string))?;

        Some(User {
            external_id,
            email: self.email,
            software_background: self.software_background,
            hardware_experience: self.hardware_experience,
            programming_languages: self.programming_languages.unwrap_or_default(),
            learning_goal: self.learning_goal,
        })
    }
}

fn id_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Response of `/api/auth/signup` and `/api/auth/signin`.
#[derive(Debug, Deserialize)]
pub struct AuthEnvelope {
    #[serde(default)]
    pub user: Option<RawUser>,
}

/// Response of the password form endpoints (`/auth/signin`, `/auth/signup`).
/// Failures come back as `success: false` with a message, often with 200.
#[derive(Debug, Deserialize)]
pub struct LegacyAuthResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    pub user: Option<RawUser>,
}

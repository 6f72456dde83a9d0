use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Database model for the app_user table
#[derive(Debug, Clone, FromRow, Serialize, Deserialize, PartialEq)]
pub struct UserModel {
    pub id: String, // UUID v4 as string
    pub display_name: String,
    pub preferred_lang: String,      // Legacy single-language preference
    pub input_lang: Option<String>,  // Personal subtitle language
    pub output_lang: Option<String>, // Language of this user's speech on the board
    pub created_at: DateTime<Utc>,
}

impl UserModel {
    /// Creates a new guest user with a generated id
    pub fn new(
        display_name: String,
        preferred_lang: String,
        input_lang: Option<String>,
        output_lang: Option<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            display_name,
            preferred_lang,
            input_lang,
            output_lang,
            created_at: Utc::now(),
        }
    }

    /// Language this user reads personal subtitles in
    pub fn subtitle_lang(&self) -> &str {
        self.input_lang.as_deref().unwrap_or(&self.preferred_lang)
    }

    /// Language this user's own speech is shown in on the board
    pub fn board_lang(&self) -> &str {
        self.output_lang.as_deref().unwrap_or(&self.preferred_lang)
    }
}

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Database model for the room table
#[derive(Debug, Clone, FromRow, Serialize, Deserialize, PartialEq)]
pub struct RoomModel {
    pub id: String,
    pub name: String,
    pub default_board_lang: String,
    pub created_at: DateTime<Utc>,
}

impl RoomModel {
    /// Creates a new room model with generated ID
    pub fn new(name: String, default_board_lang: String) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name,
            default_board_lang,
            created_at: Utc::now(),
        }
    }
}

/// Room-scoped rule forcing a speaker's board language
#[derive(Debug, Clone, FromRow, Serialize, Deserialize, PartialEq, Eq)]
pub struct LangOverride {
    pub speaker_id: String,
    pub target_lang: String,
}

impl LangOverride {
    pub fn new(speaker_id: impl Into<String>, target_lang: impl Into<String>) -> Self {
        Self {
            speaker_id: speaker_id.into(),
            target_lang: target_lang.into(),
        }
    }
}

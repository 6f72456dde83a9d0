use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Database model for the message table
#[derive(Debug, Clone, FromRow, Serialize, Deserialize, PartialEq)]
pub struct MessageModel {
    pub id: String,
    pub room_id: String,
    pub speaker_id: String,
    pub source_lang: String,
    pub text: String,
    pub is_final: bool,
    pub created_at: DateTime<Utc>,
}

impl MessageModel {
    pub fn new(
        room_id: impl Into<String>,
        speaker_id: impl Into<String>,
        source_lang: impl Into<String>,
        text: impl Into<String>,
        is_final: bool,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            room_id: room_id.into(),
            speaker_id: speaker_id.into(),
            source_lang: source_lang.into(),
            text: text.into(),
            is_final,
            created_at: Utc::now(),
        }
    }
}

/// One stored translation, unique per (message_id, target_lang)
#[derive(Debug, Clone, FromRow, Serialize, Deserialize, PartialEq)]
pub struct TranslationRecord {
    pub message_id: String,
    pub target_lang: String,
    pub text: String,
    pub latency_ms: i64,
    pub quality: f64,
}

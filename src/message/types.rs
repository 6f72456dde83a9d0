use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::models::TranslationRecord;

fn default_limit() -> usize {
    50
}

#[derive(Debug, Deserialize)]
pub struct HistoryQuery {
    #[serde(default = "default_limit")]
    pub limit: usize,
}

/// A stored message as shown in room history
#[derive(Debug, Serialize, Deserialize)]
pub struct MessageView {
    pub id: String,
    pub speaker_id: String,
    pub speaker_name: Option<String>,
    pub source_lang: String,
    pub text: String,
    pub created_at: DateTime<Utc>,
    pub translations: Vec<TranslationRecord>,
}

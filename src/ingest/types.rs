use serde::{Deserialize, Serialize};

fn default_true() -> bool {
    true
}

/// Terminal status reported to ingestion callers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IngestStatus {
    Processing,
    Partial,
    Filtered,
    AwaitingConfirmation,
    TranslationProcessing,
}

#[derive(Debug, Deserialize)]
pub struct IngestTextRequest {
    pub room_id: String,
    pub text: String,
    pub source_lang: Option<String>,
    #[serde(default = "default_true")]
    pub is_final: bool,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct IngestResponse {
    pub message_id: Option<String>,
    pub source_lang: Option<String>,
    pub status: IngestStatus,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub reason: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SpeechIngestResponse {
    pub message_id: Option<String>,
    pub transcript: String,
    pub confidence: f64,
    pub detected_lang: String,
    pub status: IngestStatus,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub reason: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SttOnlyResponse {
    pub transcript_id: Option<String>,
    pub transcript: String,
    pub confidence: f64,
    pub detected_lang: String,
    pub status: IngestStatus,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub reason: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct TranslateSttRequest {
    pub transcript_id: String,
    pub room_id: String,
    pub confirmed_text: String,
    pub source_lang: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TranslateSttResponse {
    pub message_id: String,
    pub final_text: String,
    pub source_lang: String,
    pub translations_count: usize,
    pub status: IngestStatus,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TranscriptView {
    pub transcript_id: String,
    pub room_id: String,
    pub transcript: String,
    pub confidence: f64,
    pub detected_lang: String,
}

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Events pushed from the server to connected clients
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type")]
pub enum ServerEvent {
    #[serde(rename = "connection.established", rename_all = "camelCase")]
    ConnectionEstablished { room_id: String, user_id: String },

    #[serde(rename = "personal.subtitle", rename_all = "camelCase")]
    PersonalSubtitle {
        message_id: String,
        target_lang: String,
        text: String,
        speaker_name: String,
        source_lang: String,
    },

    #[serde(rename = "board.post", rename_all = "camelCase")]
    BoardPost {
        message_id: String,
        speaker_id: String,
        speaker_name: String,
        target_lang: String,
        text: String,
        source_lang: String,
    },

    #[serde(rename = "stt.preview", rename_all = "camelCase")]
    SttPreview {
        transcript_id: String,
        speaker_id: String,
        speaker_name: String,
        transcript: String,
        confidence: f64,
        detected_lang: String,
        status: String,
    },

    #[serde(rename = "translation.completed", rename_all = "camelCase")]
    TranslationCompleted {
        message_id: String,
        translations_count: usize,
    },

    #[serde(rename = "pong")]
    Pong,

    #[serde(rename = "client.prefLang.updated", rename_all = "camelCase")]
    PreferredLangUpdated { preferred_lang: String },

    #[serde(rename = "error")]
    Error { message: String },
}

impl ServerEvent {
    pub fn error(message: impl Into<String>) -> Self {
        ServerEvent::Error {
            message: message.into(),
        }
    }

    /// Serializes the event, adding `timestamp` unless one is already present
    pub fn to_wire(&self, now: DateTime<Utc>) -> Result<String, serde_json::Error> {
        let mut value = serde_json::to_value(self)?;
        if let Value::Object(fields) = &mut value {
            let missing = fields.get("timestamp").map_or(true, Value::is_null);
            if missing {
                fields.insert("timestamp".to_string(), Value::String(now.to_rfc3339()));
            }
        }
        serde_json::to_string(&value)
    }
}

/// Control messages a client may send on an open connection
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(tag = "type")]
pub enum ClientMessage {
    #[serde(rename = "ping")]
    Ping,

    #[serde(rename = "client.prefLang.update", rename_all = "camelCase")]
    PreferredLangUpdate {
        #[serde(alias = "preferred_lang")]
        preferred_lang: String,
    },
}

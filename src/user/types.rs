use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct UpdatePreferredLangRequest {
    pub preferred_lang: String,
}

#[derive(Debug, Deserialize)]
pub struct UpdateLanguagesRequest {
    pub input_lang: String,
    pub output_lang: String,
}

/// Generic acknowledgement body for update endpoints
#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct StatusMessage {
    pub message: String,
}

impl StatusMessage {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, instrument};

use super::provider::{SpeechProvider, SpeechTranscript};
use crate::shared::ProviderError;

const ENDPOINT: &str = "https://api.groq.com/openai/v1/audio/transcriptions";
const MODEL: &str = "whisper-large-v3";

#[derive(Deserialize)]
struct TranscriptionResponse {
    text: String,
}

/// Whisper served by Groq's OpenAI-compatible transcription API
pub struct GroqSpeechProvider {
    client: reqwest::Client,
    api_key: String,
}

impl GroqSpeechProvider {
    pub fn new(api_key: impl Into<String>, timeout: Duration) -> Self {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_default();

        Self {
            client,
            api_key: api_key.into(),
        }
    }
}

/// Whisper takes bare ISO-639-1 codes ("zh-TW" -> "zh")
fn whisper_language(language_code: &str) -> &str {
    language_code.split('-').next().unwrap_or(language_code)
}

fn file_name_for(content_type: &str) -> &'static str {
    match content_type.split(';').next().unwrap_or_default().trim() {
        "audio/wav" | "audio/x-wav" | "audio/wave" => "audio.wav",
        "audio/mpeg" | "audio/mp3" => "audio.mp3",
        "audio/mp4" | "audio/m4a" | "audio/x-m4a" => "audio.m4a",
        "audio/ogg" => "audio.ogg",
        _ => "audio.webm",
    }
}

#[async_trait]
impl SpeechProvider for GroqSpeechProvider {
    fn name(&self) -> &'static str {
        "groq"
    }

    #[instrument(skip(self, audio), fields(bytes = audio.len()))]
    async fn transcribe(
        &self,
        audio: &[u8],
        content_type: &str,
        language_code: &str,
    ) -> Result<SpeechTranscript, ProviderError> {
        let part = Part::bytes(audio.to_vec())
            .file_name(file_name_for(content_type))
            .mime_str(content_type)
            .map_err(|e| ProviderError::Http(e.to_string()))?;
        let form = Form::new()
            .part("file", part)
            .text("model", MODEL)
            .text("language", whisper_language(language_code).to_string())
            .text("response_format", "json")
            .text("temperature", "0");

        let response: TranscriptionResponse = self
            .client
            .post(ENDPOINT)
            .bearer_auth(&self.api_key)
            .multipart(form)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        debug!(chars = response.text.chars().count(), "Groq transcription received");
        // Whisper reports language names, not codes, so the requested code is echoed
        Ok(SpeechTranscript {
            text: response.text.trim().to_string(),
            confidence: 0.9,
            language: language_code.to_string(),
        })
    }
}

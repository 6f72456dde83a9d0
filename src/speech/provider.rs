use async_trait::async_trait;

use crate::shared::ProviderError;

/// Recognizer output for one audio clip
#[derive(Debug, Clone, PartialEq)]
pub struct SpeechTranscript {
    pub text: String,
    pub confidence: f64,
    pub language: String,
}

/// A speech-to-text backend, chosen once at startup
#[async_trait]
pub trait SpeechProvider: Send + Sync {
    fn name(&self) -> &'static str;

    async fn transcribe(
        &self,
        audio: &[u8],
        content_type: &str,
        language_code: &str,
    ) -> Result<SpeechTranscript, ProviderError>;
}

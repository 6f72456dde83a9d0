#![allow(dead_code)]

use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;

use lingoroom::auth::AuthVerifier;
use lingoroom::shared::ProviderError;
use lingoroom::speech::{SpeechProvider, SpeechTranscript};
use lingoroom::translation::{ProviderTranslation, TranslationProvider};

// ============================================================================
// Mock Infrastructure
// ============================================================================

/// Accepts every credential
pub struct AcceptAllVerifier;

#[async_trait]
impl AuthVerifier for AcceptAllVerifier {
    async fn verify(&self, _token: &str, _claimed_user_id: &str) -> bool {
        true
    }
}

/// Accepts exactly one token value
pub struct StaticTokenVerifier {
    token: String,
}

impl StaticTokenVerifier {
    pub fn new(token: &str) -> Self {
        Self {
            token: token.to_string(),
        }
    }
}

#[async_trait]
impl AuthVerifier for StaticTokenVerifier {
    async fn verify(&self, token: &str, _claimed_user_id: &str) -> bool {
        token == self.token
    }
}

/// Translation backend that records every call and can fail or stall per language
#[derive(Clone, Default)]
pub struct CountingTranslationProvider {
    calls: Arc<RwLock<Vec<String>>>,
    failing: Arc<HashSet<String>>,
    delays: Arc<HashMap<String, Duration>>,
}

impl CountingTranslationProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_for(mut self, lang: &str) -> Self {
        let mut failing = (*self.failing).clone();
        failing.insert(lang.to_string());
        self.failing = Arc::new(failing);
        self
    }

    pub fn delayed_for(mut self, lang: &str, delay: Duration) -> Self {
        let mut delays = (*self.delays).clone();
        delays.insert(lang.to_string(), delay);
        self.delays = Arc::new(delays);
        self
    }

    /// Target languages requested so far, in call order
    pub async fn calls(&self) -> Vec<String> {
        self.calls.read().await.clone()
    }

    pub async fn calls_for(&self, lang: &str) -> usize {
        self.calls.read().await.iter().filter(|l| *l == lang).count()
    }
}

#[async_trait]
impl TranslationProvider for CountingTranslationProvider {
    fn name(&self) -> &'static str {
        "counting"
    }

    async fn translate(
        &self,
        text: &str,
        target_lang: &str,
        _source_lang: Option<&str>,
    ) -> Result<ProviderTranslation, ProviderError> {
        self.calls.write().await.push(target_lang.to_string());

        if let Some(delay) = self.delays.get(target_lang) {
            tokio::time::sleep(*delay).await;
        }
        if self.failing.contains(target_lang) {
            return Err(ProviderError::Http(format!("{} unavailable", target_lang)));
        }

        Ok(ProviderTranslation {
            text: format!("[{}] {}", target_lang, text),
            quality: 0.9,
        })
    }
}

/// Speech backend that always hears the same line
pub struct ScriptedSpeechProvider {
    transcript: String,
    language: String,
}

impl ScriptedSpeechProvider {
    pub fn new(transcript: &str, language: &str) -> Self {
        Self {
            transcript: transcript.to_string(),
            language: language.to_string(),
        }
    }
}

#[async_trait]
impl SpeechProvider for ScriptedSpeechProvider {
    fn name(&self) -> &'static str {
        "scripted"
    }

    async fn transcribe(
        &self,
        _audio: &[u8],
        _content_type: &str,
        _language_code: &str,
    ) -> Result<SpeechTranscript, ProviderError> {
        Ok(SpeechTranscript {
            text: self.transcript.clone(),
            confidence: 0.93,
            language: self.language.clone(),
        })
    }
}

use futures::future::join_all;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

use super::provider::TranslationProvider;
use crate::shared::ProviderError;

/// Result for one target language. Failed languages carry the original text.
#[derive(Debug, Clone, PartialEq)]
pub struct TranslationOutcome {
    pub text: String,
    pub quality: f64,
    pub latency_ms: i64,
    pub error: Option<String>,
}

impl TranslationOutcome {
    fn identity(text: &str) -> Self {
        Self {
            text: text.to_string(),
            quality: 1.0,
            latency_ms: 0,
            error: None,
        }
    }

    fn degraded(text: &str, latency_ms: i64, error: ProviderError) -> Self {
        Self {
            text: text.to_string(),
            quality: 0.0,
            latency_ms,
            error: Some(error.to_string()),
        }
    }

    pub fn is_degraded(&self) -> bool {
        self.error.is_some()
    }
}

/// Fans one text out to many target languages concurrently
pub struct BatchTranslator {
    provider: Arc<dyn TranslationProvider>,
    timeout: Duration,
}

impl BatchTranslator {
    pub fn new(provider: Arc<dyn TranslationProvider>, timeout: Duration) -> Self {
        Self { provider, timeout }
    }

    /// Translates `text` into every language of `targets`.
    ///
    /// The source language short-circuits to the original text. Every other
    /// language is requested once, concurrently, with its own timeout; a
    /// failing language never affects the others.
    pub async fn translate_all(
        &self,
        text: &str,
        targets: &BTreeSet<String>,
        source_lang: &str,
    ) -> BTreeMap<String, TranslationOutcome> {
        let mut results = BTreeMap::new();
        let mut pending = Vec::new();

        for target in targets {
            if target == source_lang {
                results.insert(target.clone(), TranslationOutcome::identity(text));
            } else {
                pending.push(target.clone());
            }
        }

        let requests = pending.iter().map(|target| async move {
            let outcome = self.translate_one(text, target, source_lang).await;
            (target.clone(), outcome)
        });
        results.extend(join_all(requests).await);

        debug!(
            provider = self.provider.name(),
            languages = results.len(),
            provider_calls = pending.len(),
            "Batch translation finished"
        );
        results
    }

    async fn translate_one(&self, text: &str, target: &str, source_lang: &str) -> TranslationOutcome {
        let started = Instant::now();
        let call = self.provider.translate(text, target, Some(source_lang));

        let result = match tokio::time::timeout(self.timeout, call).await {
            Ok(result) => result,
            Err(_) => Err(ProviderError::Timeout(self.timeout.as_millis() as u64)),
        };
        let latency_ms = started.elapsed().as_millis() as i64;

        match result {
            Ok(translation) => TranslationOutcome {
                text: translation.text,
                quality: translation.quality,
                latency_ms,
                error: None,
            },
            Err(e) => {
                warn!(target_lang = %target, error = %e, "Translation failed, keeping original text");
                TranslationOutcome::degraded(text, latency_ms, e)
            }
        }
    }
}

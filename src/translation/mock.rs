use async_trait::async_trait;
use rand::Rng;
use std::time::Duration;
use tracing::debug;

use super::provider::{ProviderTranslation, TranslationProvider};
use crate::language::detect_language;
use crate::shared::ProviderError;

/// Known phrases and their renderings per target language
const PHRASES: &[(&str, &[(&str, &str)])] = &[
    (
        "你好",
        &[("en", "Hello"), ("ja", "こんにちは"), ("ko", "안녕하세요"), ("es", "Hola"), ("fr", "Bonjour")],
    ),
    (
        "謝謝",
        &[("en", "Thank you"), ("ja", "ありがとう"), ("ko", "감사합니다"), ("es", "Gracias"), ("fr", "Merci")],
    ),
    (
        "再見",
        &[("en", "Goodbye"), ("ja", "さようなら"), ("ko", "안녕히 가세요"), ("es", "Adiós"), ("fr", "Au revoir")],
    ),
    (
        "hello",
        &[
            ("zh-TW", "你好"),
            ("zh-CN", "你好"),
            ("ja", "こんにちは"),
            ("ko", "안녕하세요"),
            ("es", "Hola"),
            ("fr", "Bonjour"),
        ],
    ),
    (
        "thank you",
        &[
            ("zh-TW", "謝謝"),
            ("zh-CN", "谢谢"),
            ("ja", "ありがとう"),
            ("ko", "감사합니다"),
            ("es", "Gracias"),
            ("fr", "Merci"),
        ],
    ),
    (
        "goodbye",
        &[
            ("zh-TW", "再見"),
            ("zh-CN", "再见"),
            ("ja", "さようなら"),
            ("ko", "안녕히 가세요"),
            ("es", "Adiós"),
            ("fr", "Au revoir"),
        ],
    ),
    (
        "こんにちは",
        &[("zh-TW", "你好"), ("zh-CN", "你好"), ("en", "Hello"), ("ko", "안녕하세요"), ("es", "Hola")],
    ),
    (
        "ありがとう",
        &[("zh-TW", "謝謝"), ("zh-CN", "谢谢"), ("en", "Thank you"), ("ko", "감사합니다"), ("es", "Gracias")],
    ),
];

fn prefix_for(target_lang: &str) -> &'static str {
    match target_lang {
        "zh-TW" => "【翻譯】",
        "zh-CN" => "【翻译】",
        "ja" => "【翻訳】",
        "ko" => "【번역】",
        "es" => "[Traducido]",
        "fr" => "[Traduit]",
        "de" => "[Übersetzt]",
        _ => "[Translated]",
    }
}

/// Offline backend: phrase table lookups, otherwise a prefixed pseudo translation
pub struct MockTranslationProvider {
    simulate_latency: bool,
}

impl MockTranslationProvider {
    pub fn new() -> Self {
        Self {
            simulate_latency: true,
        }
    }

    pub fn without_latency() -> Self {
        Self {
            simulate_latency: false,
        }
    }

    fn render(text: &str, target_lang: &str, source_lang: &str) -> String {
        let lowered = text.trim().to_lowercase();

        for (phrase, renderings) in PHRASES {
            if !lowered.contains(&phrase.to_lowercase()) {
                continue;
            }
            if let Some((_, rendering)) = renderings.iter().find(|(lang, _)| *lang == target_lang) {
                let replaced = text.replace(phrase, rendering);
                if replaced != text {
                    return replaced;
                }
                break;
            }
        }

        if target_lang == source_lang {
            return text.to_string();
        }
        format!("{} {}", prefix_for(target_lang), text)
    }
}

impl Default for MockTranslationProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TranslationProvider for MockTranslationProvider {
    fn name(&self) -> &'static str {
        "mock"
    }

    async fn translate(
        &self,
        text: &str,
        target_lang: &str,
        source_lang: Option<&str>,
    ) -> Result<ProviderTranslation, ProviderError> {
        if self.simulate_latency {
            let jitter: u64 = rand::rng().random_range(0..20);
            let delay = 100 + text.chars().count() as u64 + jitter;
            tokio::time::sleep(Duration::from_millis(delay)).await;
        }

        let source_lang = source_lang.unwrap_or_else(|| detect_language(text));
        let translated = Self::render(text, target_lang, source_lang);
        debug!(target_lang = %target_lang, "Mock translation produced");

        Ok(ProviderTranslation {
            text: translated,
            quality: 0.9,
        })
    }
}

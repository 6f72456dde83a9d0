use async_trait::async_trait;
use std::time::Duration;

use super::provider::{SpeechProvider, SpeechTranscript};
use crate::shared::ProviderError;

fn canned_lines(language_code: &str) -> &'static [&'static str] {
    match language_code {
        "zh-TW" => &[
            "你好，這是一段測試語音",
            "謝謝你使用我們的語音轉文字服務",
            "今天天氣真不錯",
            "我正在測試即時翻譯功能",
        ],
        "ja" => &[
            "こんにちは、これはテスト音声です",
            "音声認識サービスをご利用いただき、ありがとうございます",
            "今日はとても良い天気ですね",
        ],
        _ => &[
            "Hello, this is a test speech",
            "Thank you for using our speech-to-text service",
            "The weather is really nice today",
            "I am testing the real-time translation feature",
        ],
    }
}

/// Offline recognizer: picks a canned line by clip size
pub struct MockSpeechProvider {
    latency: Duration,
}

impl MockSpeechProvider {
    pub fn new() -> Self {
        Self {
            latency: Duration::from_millis(500),
        }
    }

    pub fn without_latency() -> Self {
        Self {
            latency: Duration::ZERO,
        }
    }
}

impl Default for MockSpeechProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SpeechProvider for MockSpeechProvider {
    fn name(&self) -> &'static str {
        "mock"
    }

    async fn transcribe(
        &self,
        audio: &[u8],
        _content_type: &str,
        language_code: &str,
    ) -> Result<SpeechTranscript, ProviderError> {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }

        let lines = canned_lines(language_code);
        let index = (audio.len() / 1000).min(lines.len() - 1);

        Ok(SpeechTranscript {
            text: lines[index].to_string(),
            confidence: 0.95,
            language: language_code.to_string(),
        })
    }
}

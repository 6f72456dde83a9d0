use std::sync::Arc;
use tracing::{info, warn};

use super::{groq::GroqSpeechProvider, mock::MockSpeechProvider, provider::SpeechProvider};
use crate::config::{AppConfig, SpeechProviderKind};

/// Selects the speech backend once, at startup
pub fn build_speech_provider(config: &AppConfig) -> Arc<dyn SpeechProvider> {
    let provider: Arc<dyn SpeechProvider> = match (config.speech_provider, &config.groq_api_key) {
        (SpeechProviderKind::Mock, _) => Arc::new(MockSpeechProvider::new()),
        (SpeechProviderKind::Groq, Some(key)) => {
            Arc::new(GroqSpeechProvider::new(key.clone(), config.provider_timeout))
        }
        (SpeechProviderKind::Groq, None) => {
            warn!("STT_PROVIDER=groq but GROQ_API_KEY is not set, using mock");
            Arc::new(MockSpeechProvider::new())
        }
    };

    info!(provider = provider.name(), "Speech provider selected");
    provider
}

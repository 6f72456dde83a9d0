use std::sync::Arc;
use tracing::{info, warn};

use super::{
    free::FreeGoogleTranslateProvider, google::GoogleTranslateProvider,
    mock::MockTranslationProvider, provider::TranslationProvider,
};
use crate::config::{AppConfig, TranslateProviderKind};

/// Selects the translation backend once, at startup
pub fn build_translation_provider(config: &AppConfig) -> Arc<dyn TranslationProvider> {
    let provider: Arc<dyn TranslationProvider> = match config.translate_provider {
        TranslateProviderKind::Mock => Arc::new(MockTranslationProvider::new()),
        TranslateProviderKind::Free => {
            Arc::new(FreeGoogleTranslateProvider::new(config.provider_timeout))
        }
        TranslateProviderKind::Google => match &config.google_api_key {
            Some(key) => Arc::new(GoogleTranslateProvider::new(
                key.clone(),
                config.provider_timeout,
            )),
            None => {
                warn!("TRANSLATE_PROVIDER=google but GOOGLE_API_KEY is not set, using mock");
                Arc::new(MockTranslationProvider::new())
            }
        },
    };

    info!(provider = provider.name(), "Translation provider selected");
    provider
}

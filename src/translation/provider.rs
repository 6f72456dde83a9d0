use async_trait::async_trait;

use crate::shared::ProviderError;

/// Text returned by a backend for one target language
#[derive(Debug, Clone, PartialEq)]
pub struct ProviderTranslation {
    pub text: String,
    pub quality: f64,
}

/// A translation backend. One implementation per service, chosen at startup.
#[async_trait]
pub trait TranslationProvider: Send + Sync {
    fn name(&self) -> &'static str;

    async fn translate(
        &self,
        text: &str,
        target_lang: &str,
        source_lang: Option<&str>,
    ) -> Result<ProviderTranslation, ProviderError>;
}

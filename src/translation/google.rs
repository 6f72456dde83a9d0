use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, instrument};

use super::provider::{ProviderTranslation, TranslationProvider};
use crate::shared::ProviderError;

const ENDPOINT: &str = "https://translation.googleapis.com/language/translate/v2";

#[derive(Serialize)]
struct TranslateRequest<'a> {
    q: &'a str,
    target: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    source: Option<&'a str>,
    format: &'static str,
}

#[derive(Deserialize)]
struct TranslateResponse {
    data: TranslateData,
}

#[derive(Deserialize)]
struct TranslateData {
    translations: Vec<TranslatedText>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct TranslatedText {
    translated_text: String,
}

/// Google Cloud Translation (REST v2, API key auth)
pub struct GoogleTranslateProvider {
    client: reqwest::Client,
    api_key: String,
}

impl GoogleTranslateProvider {
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

#[async_trait]
impl TranslationProvider for GoogleTranslateProvider {
    fn name(&self) -> &'static str {
        "google"
    }

    #[instrument(skip(self, text))]
    async fn translate(
        &self,
        text: &str,
        target_lang: &str,
        source_lang: Option<&str>,
    ) -> Result<ProviderTranslation, ProviderError> {
        let request = TranslateRequest {
            q: text,
            target: target_lang,
            source: source_lang,
            format: "text",
        };

        let response: TranslateResponse = self
            .client
            .post(ENDPOINT)
            .query(&[("key", self.api_key.as_str())])
            .json(&request)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        let translated = response
            .data
            .translations
            .into_iter()
            .next()
            .ok_or_else(|| ProviderError::InvalidResponse("no translations returned".to_string()))?;

        debug!(target_lang = %target_lang, "Google translation received");
        Ok(ProviderTranslation {
            text: translated.translated_text,
            quality: 0.95,
        })
    }
}

use async_trait::async_trait;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, instrument};

use super::provider::{ProviderTranslation, TranslationProvider};
use crate::shared::ProviderError;

const ENDPOINT: &str = "https://translate.googleapis.com/translate_a/single";
const USER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko)";

/// Keyless backend using the public web translate endpoint
pub struct FreeGoogleTranslateProvider {
    client: reqwest::Client,
}

impl FreeGoogleTranslateProvider {
    pub fn new(timeout: Duration) -> Self {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()
            .unwrap_or_default();

        Self { client }
    }
}

/// The endpoint answers `[[["segment", "original", ...], ...], null, "detected", ...]`
fn join_segments(body: &Value) -> Result<String, ProviderError> {
    let segments = body
        .get(0)
        .and_then(Value::as_array)
        .ok_or_else(|| ProviderError::InvalidResponse("missing segment list".to_string()))?;

    let text: String = segments
        .iter()
        .filter_map(|segment| segment.get(0).and_then(Value::as_str))
        .collect();

    if text.is_empty() {
        return Err(ProviderError::InvalidResponse("empty translation".to_string()));
    }
    Ok(text)
}

#[async_trait]
impl TranslationProvider for FreeGoogleTranslateProvider {
    fn name(&self) -> &'static str {
        "free"
    }

    #[instrument(skip(self, text))]
    async fn translate(
        &self,
        text: &str,
        target_lang: &str,
        source_lang: Option<&str>,
    ) -> Result<ProviderTranslation, ProviderError> {
        let body: Value = self
            .client
            .get(ENDPOINT)
            .query(&[
                ("client", "gtx"),
                ("sl", source_lang.unwrap_or("auto")),
                ("tl", target_lang),
                ("dt", "t"),
                ("q", text),
            ])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        let translated = join_segments(&body)?;
        debug!(target_lang = %target_lang, "Free translation received");

        Ok(ProviderTranslation {
            text: translated,
            quality: 0.9,
        })
    }
}

use std::str::FromStr;
use std::time::Duration;

use strum_macros::{Display, EnumString};
use tracing::warn;

/// Translation backend selected once at startup
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum TranslateProviderKind {
    Mock,
    Google,
    Free,
}

/// Speech-to-text backend selected once at startup
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum SpeechProviderKind {
    Mock,
    Groq,
}

/// Process configuration, read from the environment with defaults
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bind_addr: String,
    pub database_url: Option<String>,
    pub translate_provider: TranslateProviderKind,
    pub speech_provider: SpeechProviderKind,
    pub google_api_key: Option<String>,
    pub groq_api_key: Option<String>,
    pub provider_timeout: Duration,
    pub transcript_ttl: Duration,
    pub transcript_capacity: usize,
    pub max_audio_bytes: usize,
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self {
            bind_addr: env_or("BIND_ADDR", "0.0.0.0:8000".to_string()),
            database_url: env_opt("DATABASE_URL"),
            translate_provider: env_or("TRANSLATE_PROVIDER", TranslateProviderKind::Mock),
            speech_provider: env_or("STT_PROVIDER", SpeechProviderKind::Mock),
            google_api_key: env_opt("GOOGLE_API_KEY"),
            groq_api_key: env_opt("GROQ_API_KEY"),
            provider_timeout: Duration::from_millis(non_zero_or(
                "PROVIDER_TIMEOUT_MS",
                env_or("PROVIDER_TIMEOUT_MS", 8_000),
                8_000,
            )),
            transcript_ttl: Duration::from_secs(non_zero_or(
                "TRANSCRIPT_TTL_SECS",
                env_or("TRANSCRIPT_TTL_SECS", 300),
                300,
            )),
            transcript_capacity: env_or("TRANSCRIPT_CAPACITY", 1024),
            max_audio_bytes: env_or("MAX_AUDIO_BYTES", 10 * 1024 * 1024),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0:8000".to_string(),
            database_url: None,
            translate_provider: TranslateProviderKind::Mock,
            speech_provider: SpeechProviderKind::Mock,
            google_api_key: None,
            groq_api_key: None,
            provider_timeout: Duration::from_secs(8),
            transcript_ttl: Duration::from_secs(300),
            transcript_capacity: 1024,
            max_audio_bytes: 10 * 1024 * 1024,
        }
    }
}

fn env_opt(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn env_or<T: FromStr>(key: &str, default: T) -> T {
    match env_opt(key) {
        Some(raw) => match raw.parse() {
            Ok(value) => value,
            Err(_) => {
                warn!(key = %key, value = %raw, "Invalid configuration value, using default");
                default
            }
        },
        None => default,
    }
}

/// A zero duration would expire or time out everything immediately
fn non_zero_or(key: &str, value: u64, default: u64) -> u64 {
    if value == 0 {
        warn!(key = %key, "Zero is not allowed here, using default");
        return default;
    }
    value
}

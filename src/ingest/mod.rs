// Public API - what other modules can use
pub use handlers::{
    cancel_transcript, get_transcript, ingest_text, stt_only, translate_stt, upload_speech,
};
pub use service::{
    AudioClip, ConfirmedTranscript, IngestOutcome, IngestService, SpeechIngest, StageOutcome,
};
pub use types::IngestStatus;

// Internal modules
mod handlers;
mod service;
mod types;

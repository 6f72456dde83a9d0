// Public API - what other modules can use
pub use factory::build_speech_provider;
pub use filter::{classify, FilterReason};
pub use mock::MockSpeechProvider;
pub use provider::{SpeechProvider, SpeechTranscript};
pub use transcript_cache::{start_transcript_sweeper, StagedTranscript, TranscriptCache};

// Internal modules
mod factory;
mod filter;
mod groq;
mod mock;
mod provider;
mod transcript_cache;

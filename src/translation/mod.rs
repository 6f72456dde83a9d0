// Public API - what other modules can use
pub use batch::{BatchTranslator, TranslationOutcome};
pub use factory::build_translation_provider;
pub use mock::MockTranslationProvider;
pub use orchestrator::{OrchestrationReport, TranslationJob, TranslationOrchestrator};
pub use provider::{ProviderTranslation, TranslationProvider};

// Internal modules
mod batch;
mod factory;
mod free;
mod google;
mod mock;
mod orchestrator;
mod provider;

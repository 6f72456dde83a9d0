pub mod assertions;
pub mod mocks;
pub mod setup;

// Re-export main utilities for use by test files
#[allow(unused_imports)]
pub use assertions::{wait_for_event, ReceivedFrames};
#[allow(unused_imports)]
pub use mocks::{
    AcceptAllVerifier, CountingTranslationProvider, ScriptedSpeechProvider, StaticTokenVerifier,
};
#[allow(unused_imports)]
pub use setup::{build_app_state, RelayHarness, RelayHarnessBuilder, TEST_SECRET};

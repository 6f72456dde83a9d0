// Public API - what other modules can use
pub use detect::detect_language;
pub use router::{LanguageRouter, RoutePlan};

// Internal modules
mod detect;
mod router;

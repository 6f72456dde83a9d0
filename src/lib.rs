// Library crate for the LingoRoom translation relay
// This file exposes the public API for the binary and integration tests

pub mod app;
pub mod auth;
pub mod config;
pub mod ingest;
pub mod language;
pub mod message;
pub mod room;
pub mod shared;
pub mod speech;
pub mod translation;
pub mod user;
pub mod websockets;

// Re-export commonly used types for easier access in tests
pub use app::build_router;
pub use config::AppConfig;
pub use language::{LanguageRouter, RoutePlan};
pub use room::{models::RoomModel, repository::RoomRepository};
pub use shared::{AppError, AppState};
pub use translation::{TranslationJob, TranslationOrchestrator};
pub use websockets::{ClientChannel, ConnectionHub, InMemoryConnectionHub, Outbound, ServerEvent};

// Public API - what other modules can use
pub use handlers::list_room_messages;
pub use models::{MessageModel, TranslationRecord};
pub use repository::{InMemoryMessageStore, MessageStore, PostgresMessageStore};

// Internal modules
mod handlers;
pub mod models;
pub mod repository;
mod types;

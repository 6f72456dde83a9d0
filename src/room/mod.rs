// Public API - what other modules can use
pub use handlers::{create_room, get_room, update_board_lang, update_overrides};
pub use models::{LangOverride, RoomModel};
pub use repository::{InMemoryRoomRepository, PostgresRoomRepository, RoomRepository};

// Internal modules
mod handlers;
pub mod models;
pub mod repository;
mod service;
mod types;

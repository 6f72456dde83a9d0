// Public API - what other modules can use
pub use handlers::{update_languages, update_preferred_lang};
pub use models::UserModel;
pub use repository::{
    display_name_for, InMemoryUserRepository, PostgresUserRepository, UserRepository,
    UNKNOWN_DISPLAY_NAME,
};
pub use types::StatusMessage;

// Internal modules
mod handlers;
pub mod models;
pub mod repository;
mod types;

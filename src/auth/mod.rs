// Public API - what other modules can use
pub use handlers::guest_login;
pub use middleware::jwt_auth;
pub use token::TokenConfig;
pub use types::AuthClaims;
pub use verifier::{AuthVerifier, JwtAuthVerifier};

// Internal modules
mod generators;
mod handlers;
mod middleware;
mod token;
pub mod types;
mod verifier;

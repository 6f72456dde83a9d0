use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::sync::Arc;
use thiserror::Error;

use crate::auth::TokenConfig;
use crate::config::AppConfig;
use crate::ingest::IngestService;
use crate::message::MessageStore;
use crate::room::RoomRepository;
use crate::user::UserRepository;
use crate::websockets::ConnectionHub;

/// Shared application state containing all dependencies
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub token_config: TokenConfig,
    pub users: Arc<dyn UserRepository>,
    pub rooms: Arc<dyn RoomRepository>,
    pub messages: Arc<dyn MessageStore>,
    pub hub: Arc<dyn ConnectionHub>,
    pub ingest: Arc<IngestService>,
}

impl AppState {
    pub fn new(
        config: Arc<AppConfig>,
        token_config: TokenConfig,
        users: Arc<dyn UserRepository>,
        rooms: Arc<dyn RoomRepository>,
        messages: Arc<dyn MessageStore>,
        hub: Arc<dyn ConnectionHub>,
        ingest: Arc<IngestService>,
    ) -> Self {
        Self {
            config,
            token_config,
            users,
            rooms,
            messages,
            hub,
            ingest,
        }
    }
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("JWT error: {0}")]
    JwtError(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Internal server error")]
    Internal,
}

impl From<sqlx::Error> for AppError {
    fn from(e: sqlx::Error) -> Self {
        AppError::DatabaseError(e.to_string())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            AppError::JwtError(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg),
            AppError::Forbidden(msg) => (StatusCode::FORBIDDEN, msg),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::DatabaseError(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Database error: {}", msg),
            ),
            AppError::Internal => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error".to_string(),
            ),
        };

        let body = Json(json!({
            "error": error_message
        }));

        (status, body).into_response()
    }
}

/// Failure of an external translation or speech backend
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ProviderError {
    #[error("provider timed out after {0} ms")]
    Timeout(u64),

    #[error("provider request failed: {0}")]
    Http(String),

    #[error("invalid provider response: {0}")]
    InvalidResponse(String),

    #[error("provider not configured: {0}")]
    NotConfigured(String),
}

impl From<reqwest::Error> for ProviderError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            ProviderError::InvalidResponse(e.to_string())
        } else {
            ProviderError::Http(e.to_string())
        }
    }
}

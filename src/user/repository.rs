use async_trait::async_trait;
use sqlx::PgPool;
use std::collections::HashMap;
use tokio::sync::RwLock;
use tracing::{debug, instrument, warn};

use super::models::UserModel;
use crate::shared::AppError;

/// Trait for user repository operations
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn create_user(&self, user: &UserModel) -> Result<(), AppError>;
    async fn get_user(&self, user_id: &str) -> Result<Option<UserModel>, AppError>;
    async fn update_preferred_lang(&self, user_id: &str, preferred_lang: &str)
        -> Result<(), AppError>;
    async fn set_languages(
        &self,
        user_id: &str,
        input_lang: &str,
        output_lang: &str,
    ) -> Result<(), AppError>;
}

/// Name shown for speakers the user store cannot resolve
pub const UNKNOWN_DISPLAY_NAME: &str = "Unknown";

/// Display name of `user_id`, or [`UNKNOWN_DISPLAY_NAME`] when missing or unreadable
pub async fn display_name_for(users: &dyn UserRepository, user_id: &str) -> String {
    match users.get_user(user_id).await {
        Ok(Some(user)) => user.display_name,
        Ok(None) => UNKNOWN_DISPLAY_NAME.to_string(),
        Err(e) => {
            warn!(user_id = %user_id, error = %e, "User lookup failed");
            UNKNOWN_DISPLAY_NAME.to_string()
        }
    }
}

/// In-memory implementation of UserRepository for development and testing
pub struct InMemoryUserRepository {
    users: RwLock<HashMap<String, UserModel>>,
}

impl Default for InMemoryUserRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self {
            users: RwLock::new(HashMap::new()),
        }
    }

    /// Creates an in-memory repository with pre-populated users
    pub fn with_users(users: Vec<UserModel>) -> Self {
        let users = users.into_iter().map(|u| (u.id.clone(), u)).collect();
        Self {
            users: RwLock::new(users),
        }
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    #[instrument(skip(self, user))]
    async fn create_user(&self, user: &UserModel) -> Result<(), AppError> {
        let mut users = self.users.write().await;
        if users.contains_key(&user.id) {
            warn!(user_id = %user.id, "User already exists in memory");
            return Err(AppError::DatabaseError("User already exists".to_string()));
        }
        users.insert(user.id.clone(), user.clone());

        debug!(user_id = %user.id, display_name = %user.display_name, "User created in memory");
        Ok(())
    }

    async fn get_user(&self, user_id: &str) -> Result<Option<UserModel>, AppError> {
        Ok(self.users.read().await.get(user_id).cloned())
    }

    #[instrument(skip(self))]
    async fn update_preferred_lang(
        &self,
        user_id: &str,
        preferred_lang: &str,
    ) -> Result<(), AppError> {
        let mut users = self.users.write().await;
        let user = users
            .get_mut(user_id)
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;
        user.preferred_lang = preferred_lang.to_string();
        Ok(())
    }

    #[instrument(skip(self))]
    async fn set_languages(
        &self,
        user_id: &str,
        input_lang: &str,
        output_lang: &str,
    ) -> Result<(), AppError> {
        let mut users = self.users.write().await;
        let user = users
            .get_mut(user_id)
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;
        user.input_lang = Some(input_lang.to_string());
        user.output_lang = Some(output_lang.to_string());
        Ok(())
    }
}

/// PostgreSQL implementation of user repository
pub struct PostgresUserRepository {
    pool: PgPool,
}

impl PostgresUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    #[instrument(skip(self, user))]
    async fn create_user(&self, user: &UserModel) -> Result<(), AppError> {
        sqlx::query(
            "INSERT INTO app_user (id, display_name, preferred_lang, input_lang, output_lang, created_at) VALUES ($1, $2, $3, $4, $5, $6)",
        )
        .bind(&user.id)
        .bind(&user.display_name)
        .bind(&user.preferred_lang)
        .bind(&user.input_lang)
        .bind(&user.output_lang)
        .bind(user.created_at)
        .execute(&self.pool)
        .await?;

        debug!(user_id = %user.id, "User created in database");
        Ok(())
    }

    async fn get_user(&self, user_id: &str) -> Result<Option<UserModel>, AppError> {
        let user = sqlx::query_as::<_, UserModel>(
            "SELECT id, display_name, preferred_lang, input_lang, output_lang, created_at FROM app_user WHERE id = $1",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    #[instrument(skip(self))]
    async fn update_preferred_lang(
        &self,
        user_id: &str,
        preferred_lang: &str,
    ) -> Result<(), AppError> {
        let result = sqlx::query("UPDATE app_user SET preferred_lang = $2 WHERE id = $1")
            .bind(user_id)
            .bind(preferred_lang)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("User not found".to_string()));
        }
        Ok(())
    }

    #[instrument(skip(self))]
    async fn set_languages(
        &self,
        user_id: &str,
        input_lang: &str,
        output_lang: &str,
    ) -> Result<(), AppError> {
        let result =
            sqlx::query("UPDATE app_user SET input_lang = $2, output_lang = $3 WHERE id = $1")
                .bind(user_id)
                .bind(input_lang)
                .bind(output_lang)
                .execute(&self.pool)
                .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("User not found".to_string()));
        }
        Ok(())
    }
}

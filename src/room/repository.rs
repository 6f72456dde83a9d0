use async_trait::async_trait;
use sqlx::PgPool;
use std::collections::HashMap;
use tokio::sync::RwLock;
use tracing::{debug, info, instrument, warn};

use super::models::{LangOverride, RoomModel};
use crate::shared::AppError;

/// Trait for room repository operations
#[async_trait]
pub trait RoomRepository: Send + Sync {
    async fn create_room(&self, room: &RoomModel) -> Result<(), AppError>;
    async fn get_room(&self, room_id: &str) -> Result<Option<RoomModel>, AppError>;
    async fn update_board_lang(&self, room_id: &str, board_lang: &str) -> Result<(), AppError>;
    async fn get_overrides(&self, room_id: &str) -> Result<Vec<LangOverride>, AppError>;

    /// Replaces the room's override set wholesale (delete-all-then-insert)
    async fn replace_overrides(
        &self,
        room_id: &str,
        overrides: &[LangOverride],
    ) -> Result<(), AppError>;
}

/// In-memory implementation of RoomRepository for development and testing
pub struct InMemoryRoomRepository {
    rooms: RwLock<HashMap<String, RoomModel>>,
    overrides: RwLock<HashMap<String, Vec<LangOverride>>>,
}

impl Default for InMemoryRoomRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryRoomRepository {
    /// Creates a new empty in-memory repository
    pub fn new() -> Self {
        Self {
            rooms: RwLock::new(HashMap::new()),
            overrides: RwLock::new(HashMap::new()),
        }
    }
}

#[async_trait]
impl RoomRepository for InMemoryRoomRepository {
    #[instrument(skip(self, room))]
    async fn create_room(&self, room: &RoomModel) -> Result<(), AppError> {
        debug!(room_id = %room.id, name = %room.name, "Creating room in memory");

        let mut rooms = self.rooms.write().await;
        if rooms.contains_key(&room.id) {
            warn!(room_id = %room.id, "Room already exists in memory");
            return Err(AppError::DatabaseError("Room already exists".to_string()));
        }
        rooms.insert(room.id.clone(), room.clone());
        Ok(())
    }

    async fn get_room(&self, room_id: &str) -> Result<Option<RoomModel>, AppError> {
        Ok(self.rooms.read().await.get(room_id).cloned())
    }

    #[instrument(skip(self))]
    async fn update_board_lang(&self, room_id: &str, board_lang: &str) -> Result<(), AppError> {
        let mut rooms = self.rooms.write().await;
        let room = rooms
            .get_mut(room_id)
            .ok_or_else(|| AppError::NotFound("Room not found".to_string()))?;
        room.default_board_lang = board_lang.to_string();

        info!(room_id = %room_id, board_lang = %board_lang, "Board language updated");
        Ok(())
    }

    async fn get_overrides(&self, room_id: &str) -> Result<Vec<LangOverride>, AppError> {
        Ok(self
            .overrides
            .read()
            .await
            .get(room_id)
            .cloned()
            .unwrap_or_default())
    }

    #[instrument(skip(self, overrides))]
    async fn replace_overrides(
        &self,
        room_id: &str,
        overrides: &[LangOverride],
    ) -> Result<(), AppError> {
        let mut all = self.overrides.write().await;
        if overrides.is_empty() {
            all.remove(room_id);
        } else {
            all.insert(room_id.to_string(), overrides.to_vec());
        }

        info!(room_id = %room_id, override_count = overrides.len(), "Overrides replaced");
        Ok(())
    }
}

/// PostgreSQL implementation of room repository
pub struct PostgresRoomRepository {
    pool: PgPool,
}

impl PostgresRoomRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RoomRepository for PostgresRoomRepository {
    #[instrument(skip(self, room))]
    async fn create_room(&self, room: &RoomModel) -> Result<(), AppError> {
        sqlx::query(
            "INSERT INTO room (id, name, default_board_lang, created_at) VALUES ($1, $2, $3, $4)",
        )
        .bind(&room.id)
        .bind(&room.name)
        .bind(&room.default_board_lang)
        .bind(room.created_at)
        .execute(&self.pool)
        .await?;

        debug!(room_id = %room.id, "Room created in database");
        Ok(())
    }

    async fn get_room(&self, room_id: &str) -> Result<Option<RoomModel>, AppError> {
        let room = sqlx::query_as::<_, RoomModel>(
            "SELECT id, name, default_board_lang, created_at FROM room WHERE id = $1",
        )
        .bind(room_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(room)
    }

    #[instrument(skip(self))]
    async fn update_board_lang(&self, room_id: &str, board_lang: &str) -> Result<(), AppError> {
        let result = sqlx::query("UPDATE room SET default_board_lang = $2 WHERE id = $1")
            .bind(room_id)
            .bind(board_lang)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Room not found".to_string()));
        }
        Ok(())
    }

    async fn get_overrides(&self, room_id: &str) -> Result<Vec<LangOverride>, AppError> {
        let overrides = sqlx::query_as::<_, LangOverride>(
            "SELECT speaker_id, target_lang FROM room_lang_override WHERE room_id = $1",
        )
        .bind(room_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(overrides)
    }

    #[instrument(skip(self, overrides))]
    async fn replace_overrides(
        &self,
        room_id: &str,
        overrides: &[LangOverride],
    ) -> Result<(), AppError> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM room_lang_override WHERE room_id = $1")
            .bind(room_id)
            .execute(&mut *tx)
            .await?;

        for rule in overrides {
            sqlx::query(
                "INSERT INTO room_lang_override (room_id, speaker_id, target_lang) VALUES ($1, $2, $3)",
            )
            .bind(room_id)
            .bind(&rule.speaker_id)
            .bind(&rule.target_lang)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        info!(room_id = %room_id, override_count = overrides.len(), "Overrides replaced in database");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_room(board_lang: &str) -> RoomModel {
        RoomModel::new("test-room".to_string(), board_lang.to_string())
    }

    #[tokio::test]
    async fn test_create_and_get_room() {
        let repo = InMemoryRoomRepository::new();
        let room = create_test_room("en");

        repo.create_room(&room).await.unwrap();

        let retrieved = repo.get_room(&room.id).await.unwrap().unwrap();
        assert_eq!(retrieved, room);
    }

    #[tokio::test]
    async fn test_create_duplicate_room() {
        let repo = InMemoryRoomRepository::new();
        let room = create_test_room("en");

        repo.create_room(&room).await.unwrap();
        let result = repo.create_room(&room).await;
        assert!(matches!(result, Err(AppError::DatabaseError(_))));
    }

    #[tokio::test]
    async fn test_update_board_lang() {
        let repo = InMemoryRoomRepository::new();
        let room = create_test_room("en");
        repo.create_room(&room).await.unwrap();

        repo.update_board_lang(&room.id, "ja").await.unwrap();

        let retrieved = repo.get_room(&room.id).await.unwrap().unwrap();
        assert_eq!(retrieved.default_board_lang, "ja");

        let missing = repo.update_board_lang("missing", "ja").await;
        assert!(matches!(missing, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_replace_overrides_is_wholesale() {
        let repo = InMemoryRoomRepository::new();
        let room = create_test_room("en");
        repo.create_room(&room).await.unwrap();

        repo.replace_overrides(
            &room.id,
            &[LangOverride::new("a", "ja"), LangOverride::new("b", "fr")],
        )
        .await
        .unwrap();
        repo.replace_overrides(&room.id, &[LangOverride::new("c", "de")])
            .await
            .unwrap();

        let overrides = repo.get_overrides(&room.id).await.unwrap();
        assert_eq!(overrides, vec![LangOverride::new("c", "de")]);

        repo.replace_overrides(&room.id, &[]).await.unwrap();
        assert!(repo.get_overrides(&room.id).await.unwrap().is_empty());
    }
}

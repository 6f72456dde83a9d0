use async_trait::async_trait;
use sqlx::PgPool;
use std::collections::{BTreeMap, HashMap};
use tokio::sync::RwLock;
use tracing::{debug, instrument};

use super::models::{MessageModel, TranslationRecord};
use crate::shared::AppError;

/// Persistence for utterances and their translations
#[async_trait]
pub trait MessageStore: Send + Sync {
    async fn create_message(&self, message: &MessageModel) -> Result<(), AppError>;

    /// Upsert keyed by (message_id, target_lang); the last write wins
    async fn save_translation(&self, record: &TranslationRecord) -> Result<(), AppError>;

    /// Latest final messages of a room, newest first
    async fn get_room_messages(
        &self,
        room_id: &str,
        limit: usize,
    ) -> Result<Vec<MessageModel>, AppError>;

    async fn get_message_translations(
        &self,
        message_id: &str,
    ) -> Result<Vec<TranslationRecord>, AppError>;
}

/// In-memory implementation of MessageStore for development and testing
pub struct InMemoryMessageStore {
    messages: RwLock<Vec<MessageModel>>,
    translations: RwLock<HashMap<String, BTreeMap<String, TranslationRecord>>>,
}

impl Default for InMemoryMessageStore {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryMessageStore {
    pub fn new() -> Self {
        Self {
            messages: RwLock::new(Vec::new()),
            translations: RwLock::new(HashMap::new()),
        }
    }

    /// Number of stored messages across all rooms
    pub async fn message_count(&self) -> usize {
        self.messages.read().await.len()
    }
}

#[async_trait]
impl MessageStore for InMemoryMessageStore {
    #[instrument(skip(self, message))]
    async fn create_message(&self, message: &MessageModel) -> Result<(), AppError> {
        debug!(message_id = %message.id, room_id = %message.room_id, "Storing message in memory");
        self.messages.write().await.push(message.clone());
        Ok(())
    }

    async fn save_translation(&self, record: &TranslationRecord) -> Result<(), AppError> {
        self.translations
            .write()
            .await
            .entry(record.message_id.clone())
            .or_default()
            .insert(record.target_lang.clone(), record.clone());
        Ok(())
    }

    async fn get_room_messages(
        &self,
        room_id: &str,
        limit: usize,
    ) -> Result<Vec<MessageModel>, AppError> {
        let messages = self.messages.read().await;
        Ok(messages
            .iter()
            .rev()
            .filter(|m| m.room_id == room_id && m.is_final)
            .take(limit)
            .cloned()
            .collect())
    }

    async fn get_message_translations(
        &self,
        message_id: &str,
    ) -> Result<Vec<TranslationRecord>, AppError> {
        Ok(self
            .translations
            .read()
            .await
            .get(message_id)
            .map(|by_lang| by_lang.values().cloned().collect())
            .unwrap_or_default())
    }
}

/// PostgreSQL implementation of message store
pub struct PostgresMessageStore {
    pool: PgPool,
}

impl PostgresMessageStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MessageStore for PostgresMessageStore {
    #[instrument(skip(self, message))]
    async fn create_message(&self, message: &MessageModel) -> Result<(), AppError> {
        sqlx::query(
            r#"
            INSERT INTO message (id, room_id, speaker_id, source_lang, text, is_final, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(&message.id)
        .bind(&message.room_id)
        .bind(&message.speaker_id)
        .bind(&message.source_lang)
        .bind(&message.text)
        .bind(message.is_final)
        .bind(message.created_at)
        .execute(&self.pool)
        .await?;

        debug!(message_id = %message.id, "Message stored in database");
        Ok(())
    }

    #[instrument(skip(self, record), fields(message_id = %record.message_id, target_lang = %record.target_lang))]
    async fn save_translation(&self, record: &TranslationRecord) -> Result<(), AppError> {
        sqlx::query(
            r#"
            INSERT INTO message_translation (message_id, target_lang, text, latency_ms, quality)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (message_id, target_lang)
            DO UPDATE SET text = EXCLUDED.text,
                          latency_ms = EXCLUDED.latency_ms,
                          quality = EXCLUDED.quality
            "#,
        )
        .bind(&record.message_id)
        .bind(&record.target_lang)
        .bind(&record.text)
        .bind(record.latency_ms)
        .bind(record.quality)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn get_room_messages(
        &self,
        room_id: &str,
        limit: usize,
    ) -> Result<Vec<MessageModel>, AppError> {
        let messages = sqlx::query_as::<_, MessageModel>(
            r#"
            SELECT id, room_id, speaker_id, source_lang, text, is_final, created_at
            FROM message
            WHERE room_id = $1 AND is_final = TRUE
            ORDER BY created_at DESC
            LIMIT $2
            "#,
        )
        .bind(room_id)
        .bind(limit as i64)
        .fetch_all(&self.pool)
        .await?;

        Ok(messages)
    }

    async fn get_message_translations(
        &self,
        message_id: &str,
    ) -> Result<Vec<TranslationRecord>, AppError> {
        let translations = sqlx::query_as::<_, TranslationRecord>(
            r#"
            SELECT message_id, target_lang, text, latency_ms, quality
            FROM message_translation
            WHERE message_id = $1
            ORDER BY target_lang
            "#,
        )
        .bind(message_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(translations)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(message_id: &str, lang: &str, text: &str, quality: f64) -> TranslationRecord {
        TranslationRecord {
            message_id: message_id.to_string(),
            target_lang: lang.to_string(),
            text: text.to_string(),
            latency_ms: 12,
            quality,
        }
    }

    #[tokio::test]
    async fn test_save_translation_twice_keeps_latest() {
        let store = InMemoryMessageStore::new();

        store
            .save_translation(&record("m1", "en", "first", 0.5))
            .await
            .unwrap();
        store
            .save_translation(&record("m1", "en", "second", 0.9))
            .await
            .unwrap();

        let translations = store.get_message_translations("m1").await.unwrap();
        assert_eq!(translations, vec![record("m1", "en", "second", 0.9)]);
    }

    #[tokio::test]
    async fn test_room_messages_newest_first_and_final_only() {
        let store = InMemoryMessageStore::new();
        let first = MessageModel::new("r1", "s1", "en", "one", true);
        let partial = MessageModel::new("r1", "s1", "en", "tw", false);
        let second = MessageModel::new("r1", "s1", "en", "two", true);
        let other_room = MessageModel::new("r2", "s1", "en", "elsewhere", true);

        for message in [&first, &partial, &second, &other_room] {
            store.create_message(message).await.unwrap();
        }

        let messages = store.get_room_messages("r1", 50).await.unwrap();
        assert_eq!(messages, vec![second.clone(), first]);

        let limited = store.get_room_messages("r1", 1).await.unwrap();
        assert_eq!(limited, vec![second]);
        assert_eq!(store.message_count().await, 4);
    }
}

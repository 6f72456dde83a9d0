use axum::{
    extract::{Path, Query, State},
    Json,
};
use std::collections::HashMap;
use tracing::{debug, instrument};

use super::types::{HistoryQuery, MessageView};
use crate::shared::{AppError, AppState};

const MAX_HISTORY: usize = 200;

/// GET /api/rooms/{room_id}/messages?limit=50
#[instrument(name = "list_room_messages", skip(state))]
pub async fn list_room_messages(
    State(state): State<AppState>,
    Path(room_id): Path<String>,
    Query(query): Query<HistoryQuery>,
) -> Result<Json<Vec<MessageView>>, AppError> {
    if state.rooms.get_room(&room_id).await?.is_none() {
        return Err(AppError::NotFound("Room not found".to_string()));
    }

    let limit = query.limit.clamp(1, MAX_HISTORY);
    let messages = state.messages.get_room_messages(&room_id, limit).await?;

    let mut names: HashMap<String, Option<String>> = HashMap::new();
    let mut views = Vec::with_capacity(messages.len());
    for message in messages {
        if !names.contains_key(&message.speaker_id) {
            let name = state
                .users
                .get_user(&message.speaker_id)
                .await?
                .map(|u| u.display_name);
            names.insert(message.speaker_id.clone(), name);
        }
        let translations = state.messages.get_message_translations(&message.id).await?;

        views.push(MessageView {
            speaker_name: names.get(&message.speaker_id).cloned().flatten(),
            id: message.id,
            speaker_id: message.speaker_id,
            source_lang: message.source_lang,
            text: message.text,
            created_at: message.created_at,
            translations,
        });
    }

    debug!(room_id = %room_id, count = views.len(), "Room history loaded");
    Ok(Json(views))
}

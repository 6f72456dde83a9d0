use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info, instrument};

use super::{
    models::{LangOverride, RoomModel},
    repository::RoomRepository,
    types::{RoomCreateRequest, RoomResponse},
};
use crate::shared::AppError;

/// Service for handling room administration
pub struct RoomService {
    repository: Arc<dyn RoomRepository>,
}

impl RoomService {
    pub fn new(repository: Arc<dyn RoomRepository>) -> Self {
        Self { repository }
    }

    /// Creates a new room with a generated ID
    #[instrument(skip(self, request))]
    pub async fn create_room(&self, request: RoomCreateRequest) -> Result<RoomResponse, AppError> {
        let name = request.name.trim();
        if name.is_empty() {
            return Err(AppError::BadRequest("Room name is required".to_string()));
        }
        let board_lang = non_empty_lang(&request.default_board_lang)?;

        let room = RoomModel::new(name.to_string(), board_lang);
        debug!(room_id = %room.id, "Generated room ID");

        self.repository.create_room(&room).await?;

        info!(room_id = %room.id, name = %room.name, "Room created successfully");
        Ok(to_response(room, Vec::new()))
    }

    /// Gets room details together with its override rules
    #[instrument(skip(self))]
    pub async fn get_room_details(&self, room_id: &str) -> Result<RoomResponse, AppError> {
        let room = self.require_room(room_id).await?;
        let overrides = self.repository.get_overrides(room_id).await?;
        Ok(to_response(room, overrides))
    }

    #[instrument(skip(self))]
    pub async fn update_board_lang(
        &self,
        room_id: &str,
        board_lang: &str,
    ) -> Result<RoomResponse, AppError> {
        let board_lang = non_empty_lang(board_lang)?;
        self.repository.update_board_lang(room_id, &board_lang).await?;
        self.get_room_details(room_id).await
    }

    /// Replaces all overrides; a speaker listed twice keeps its last rule
    #[instrument(skip(self, overrides))]
    pub async fn replace_overrides(
        &self,
        room_id: &str,
        overrides: Vec<LangOverride>,
    ) -> Result<RoomResponse, AppError> {
        self.require_room(room_id).await?;

        let mut by_speaker: HashMap<String, String> = HashMap::new();
        let mut order = Vec::new();
        for rule in overrides {
            let target_lang = non_empty_lang(&rule.target_lang)?;
            if !by_speaker.contains_key(&rule.speaker_id) {
                order.push(rule.speaker_id.clone());
            }
            by_speaker.insert(rule.speaker_id, target_lang);
        }
        let rules: Vec<LangOverride> = order
            .into_iter()
            .filter_map(|speaker| {
                let lang = by_speaker.remove(&speaker)?;
                Some(LangOverride::new(speaker, lang))
            })
            .collect();

        self.repository.replace_overrides(room_id, &rules).await?;
        self.get_room_details(room_id).await
    }

    async fn require_room(&self, room_id: &str) -> Result<RoomModel, AppError> {
        self.repository
            .get_room(room_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Room not found".to_string()))
    }
}

fn non_empty_lang(lang: &str) -> Result<String, AppError> {
    let lang = lang.trim();
    if lang.is_empty() {
        return Err(AppError::BadRequest("Language code is required".to_string()));
    }
    Ok(lang.to_string())
}

fn to_response(room: RoomModel, overrides: Vec<LangOverride>) -> RoomResponse {
    RoomResponse {
        id: room.id,
        name: room.name,
        default_board_lang: room.default_board_lang,
        overrides,
    }
}

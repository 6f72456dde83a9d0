use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;
use tracing::{debug, instrument};

use crate::room::RoomRepository;
use crate::shared::AppError;
use crate::user::UserRepository;

/// Target languages for one utterance, computed from a single read snapshot
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RoutePlan {
    /// Subtitle language of every online member the user store knows
    pub personal: BTreeMap<String, String>,
    /// Board language, or None when the room does not exist
    pub board_lang: Option<String>,
}

impl RoutePlan {
    pub fn personal_set(&self) -> BTreeSet<String> {
        self.personal.values().cloned().collect()
    }

    pub fn board_set(&self) -> BTreeSet<String> {
        self.board_lang.iter().cloned().collect()
    }

    /// Union of personal and board languages
    pub fn combined(&self) -> BTreeSet<String> {
        let mut all = self.personal_set();
        all.extend(self.board_lang.iter().cloned());
        all
    }

    pub fn is_empty(&self) -> bool {
        self.personal.is_empty() && self.board_lang.is_none()
    }
}

/// Decides which languages an utterance has to be translated into
pub struct LanguageRouter {
    users: Arc<dyn UserRepository>,
    rooms: Arc<dyn RoomRepository>,
}

impl LanguageRouter {
    pub fn new(users: Arc<dyn UserRepository>, rooms: Arc<dyn RoomRepository>) -> Self {
        Self { users, rooms }
    }

    /// Builds the route plan for `speaker_id` speaking in `room_id` to `online` members.
    /// An unknown room yields an empty plan.
    #[instrument(skip(self, online))]
    pub async fn plan(
        &self,
        room_id: &str,
        speaker_id: &str,
        online: &[String],
    ) -> Result<RoutePlan, AppError> {
        let Some(room) = self.rooms.get_room(room_id).await? else {
            debug!(room_id = %room_id, "Room not found, nothing to route");
            return Ok(RoutePlan::default());
        };

        let mut personal = BTreeMap::new();
        for member in online {
            if let Some(lang) = self.personal_lang_for(member).await? {
                personal.insert(member.clone(), lang);
            }
        }

        let board_lang = match self.users.get_user(speaker_id).await? {
            Some(speaker) => speaker.board_lang().to_string(),
            None => self
                .rooms
                .get_overrides(room_id)
                .await?
                .into_iter()
                .find(|rule| rule.speaker_id == speaker_id)
                .map(|rule| rule.target_lang)
                .unwrap_or(room.default_board_lang),
        };

        let plan = RoutePlan {
            personal,
            board_lang: Some(board_lang),
        };
        debug!(
            room_id = %room_id,
            combined = ?plan.combined(),
            "Route plan computed"
        );
        Ok(plan)
    }

    /// The language a member reads personal subtitles in
    pub async fn personal_lang_for(&self, user_id: &str) -> Result<Option<String>, AppError> {
        Ok(self
            .users
            .get_user(user_id)
            .await?
            .map(|user| user.subtitle_lang().to_string()))
    }
}

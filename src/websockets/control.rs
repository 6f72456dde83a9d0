use async_trait::async_trait;
use chrono::Utc;
use tracing::{debug, warn};

use super::messages::{ClientMessage, ServerEvent};
use super::socket::MessageHandler;

/// Answers heartbeat and language-preference pings; never touches hub membership
pub struct ControlMessageHandler;

impl ControlMessageHandler {
    fn reply_for(user_id: &str, room_id: &str, message: &str) -> ServerEvent {
        let value: serde_json::Value = match serde_json::from_str(message) {
            Ok(value) => value,
            Err(_) => return ServerEvent::error("Invalid JSON format"),
        };

        match serde_json::from_value::<ClientMessage>(value) {
            Ok(ClientMessage::Ping) => ServerEvent::Pong,
            Ok(ClientMessage::PreferredLangUpdate { preferred_lang }) => {
                debug!(user_id = %user_id, room_id = %room_id, preferred_lang = %preferred_lang, "Preferred language ping");
                ServerEvent::PreferredLangUpdated { preferred_lang }
            }
            Err(e) => {
                warn!(user_id = %user_id, room_id = %room_id, error = %e, "Unsupported client message");
                ServerEvent::error(format!("Unsupported message: {}", e))
            }
        }
    }
}

#[async_trait]
impl MessageHandler for ControlMessageHandler {
    async fn handle_message(&self, user_id: &str, room_id: &str, message: String) -> Option<String> {
        let reply = Self::reply_for(user_id, room_id, &message);
        match reply.to_wire(Utc::now()) {
            Ok(text) => Some(text),
            Err(e) => {
                warn!(error = %e, "Failed to encode control reply");
                None
            }
        }
    }
}

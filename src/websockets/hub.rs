use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::channel::ClientChannel;
use super::messages::ServerEvent;
use crate::auth::AuthVerifier;

/// Close code sent when the connect credential does not match the user
pub const AUTH_REJECTED_CLOSE_CODE: u16 = 4001;
/// Close code sent to a connection replaced by a newer one for the same user
pub const SUPERSEDED_CLOSE_CODE: u16 = 1000;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum HubError {
    #[error("credential rejected for user {0}")]
    AuthRejected(String),
}

/// Owner of all live connections, keyed room -> user -> channel
#[async_trait]
pub trait ConnectionHub: Send + Sync {
    /// Verifies the credential and installs the channel, closing any earlier
    /// channel for the same (room, user).
    async fn register(
        &self,
        channel: ClientChannel,
        room_id: &str,
        user_id: &str,
        credential: &str,
    ) -> Result<(), HubError>;

    /// Removes the mapping only if it still points at `channel_id`
    async fn unregister(&self, channel_id: Uuid, room_id: &str, user_id: &str) -> bool;

    /// Best-effort delivery to one user; false when not connected
    async fn send_to_user(&self, room_id: &str, user_id: &str, event: &ServerEvent) -> bool;

    /// Delivers to every member registered at call time, returns the delivered count
    async fn broadcast_to_room(&self, room_id: &str, event: &ServerEvent) -> usize;

    async fn room_members(&self, room_id: &str) -> Vec<String>;
}

#[derive(Default)]
struct HubState {
    rooms: HashMap<String, HashMap<String, ClientChannel>>,
    channels: HashMap<Uuid, (String, String)>,
}

impl HubState {
    fn remove_if_current(&mut self, channel_id: Uuid, room_id: &str, user_id: &str) -> bool {
        let Some(members) = self.rooms.get_mut(room_id) else {
            return false;
        };
        if members.get(user_id).map(ClientChannel::id) != Some(channel_id) {
            return false;
        }

        members.remove(user_id);
        if members.is_empty() {
            self.rooms.remove(room_id);
        }
        self.channels.remove(&channel_id);
        true
    }
}

pub struct InMemoryConnectionHub {
    verifier: Arc<dyn AuthVerifier>,
    state: RwLock<HubState>,
}

impl InMemoryConnectionHub {
    pub fn new(verifier: Arc<dyn AuthVerifier>) -> Self {
        Self {
            verifier,
            state: RwLock::new(HubState::default()),
        }
    }

    /// Total number of live channels across rooms
    pub async fn connection_count(&self) -> usize {
        self.state.read().await.channels.len()
    }

    async fn drop_dead(&self, dead: Vec<(Uuid, String, String)>) {
        if dead.is_empty() {
            return;
        }
        let mut state = self.state.write().await;
        for (channel_id, room_id, user_id) in dead {
            if state.remove_if_current(channel_id, &room_id, &user_id) {
                warn!(room_id = %room_id, user_id = %user_id, "Dropped unreachable connection");
            }
        }
    }
}

#[async_trait]
impl ConnectionHub for InMemoryConnectionHub {
    async fn register(
        &self,
        channel: ClientChannel,
        room_id: &str,
        user_id: &str,
        credential: &str,
    ) -> Result<(), HubError> {
        if !self.verifier.verify(credential, user_id).await {
            warn!(room_id = %room_id, user_id = %user_id, "Connection rejected: invalid credential");
            channel.close(AUTH_REJECTED_CLOSE_CODE, "Invalid token");
            return Err(HubError::AuthRejected(user_id.to_string()));
        }

        let mut guard = self.state.write().await;
        let state = &mut *guard;

        let members = state.rooms.entry(room_id.to_string()).or_default();
        if let Some(previous) = members.insert(user_id.to_string(), channel.clone()) {
            info!(room_id = %room_id, user_id = %user_id, "Replacing previous connection");
            previous.close(SUPERSEDED_CLOSE_CODE, "Replaced by a newer connection");
            state.channels.remove(&previous.id());
        }
        state
            .channels
            .insert(channel.id(), (room_id.to_string(), user_id.to_string()));

        let ack = ServerEvent::ConnectionEstablished {
            room_id: room_id.to_string(),
            user_id: user_id.to_string(),
        };
        match ack.to_wire(Utc::now()) {
            Ok(text) => {
                channel.send_text(text);
            }
            Err(e) => warn!(error = %e, "Failed to encode connection ack"),
        }

        info!(room_id = %room_id, user_id = %user_id, "User connected");
        Ok(())
    }

    async fn unregister(&self, channel_id: Uuid, room_id: &str, user_id: &str) -> bool {
        let removed = self
            .state
            .write()
            .await
            .remove_if_current(channel_id, room_id, user_id);

        if removed {
            info!(room_id = %room_id, user_id = %user_id, "User disconnected");
        } else {
            debug!(room_id = %room_id, user_id = %user_id, "Ignoring stale disconnect");
        }
        removed
    }

    async fn send_to_user(&self, room_id: &str, user_id: &str, event: &ServerEvent) -> bool {
        let channel = {
            let state = self.state.read().await;
            match state.rooms.get(room_id).and_then(|m| m.get(user_id)) {
                Some(channel) => channel.clone(),
                None => return false,
            }
        };

        let text = match event.to_wire(Utc::now()) {
            Ok(text) => text,
            Err(e) => {
                warn!(error = %e, "Failed to encode event");
                return false;
            }
        };

        if channel.send_text(text) {
            return true;
        }
        self.drop_dead(vec![(channel.id(), room_id.to_string(), user_id.to_string())])
            .await;
        false
    }

    async fn broadcast_to_room(&self, room_id: &str, event: &ServerEvent) -> usize {
        let text = match event.to_wire(Utc::now()) {
            Ok(text) => text,
            Err(e) => {
                warn!(error = %e, "Failed to encode event");
                return 0;
            }
        };

        let mut delivered = 0;
        let mut dead = Vec::new();
        {
            let state = self.state.read().await;
            let Some(members) = state.rooms.get(room_id) else {
                return 0;
            };
            for (user_id, channel) in members {
                if channel.send_text(text.clone()) {
                    delivered += 1;
                } else {
                    dead.push((channel.id(), room_id.to_string(), user_id.clone()));
                }
            }
        }

        self.drop_dead(dead).await;
        debug!(room_id = %room_id, delivered, "Broadcast sent");
        delivered
    }

    async fn room_members(&self, room_id: &str) -> Vec<String> {
        self.state
            .read()
            .await
            .rooms
            .get(room_id)
            .map(|members| members.keys().cloned().collect())
            .unwrap_or_default()
    }
}

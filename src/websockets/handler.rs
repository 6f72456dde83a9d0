use axum::{
    extract::{Query, State, WebSocketUpgrade},
    response::Response,
};
use serde::Deserialize;
use std::sync::Arc;
use tracing::{info, warn};

use super::channel::ClientChannel;
use super::control::ControlMessageHandler;
use super::socket::Connection;
use crate::shared::{AppError, AppState};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectParams {
    pub room_id: String,
    pub user_id: String,
    #[serde(default)]
    pub token: String,
}

/// WebSocket endpoint; the credential travels in the query string
/// GET /ws?roomId=...&userId=...&token=...
pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    Query(params): Query<ConnectParams>,
    State(state): State<AppState>,
) -> Result<Response, AppError> {
    info!(room_id = %params.room_id, user_id = %params.user_id, "WebSocket connection requested");

    if state.rooms.get_room(&params.room_id).await?.is_none() {
        warn!(room_id = %params.room_id, "Room not found, rejecting WebSocket connection");
        return Err(AppError::NotFound("Room not found".to_string()));
    }

    Ok(ws.on_upgrade(move |socket| handle_websocket_connection(socket, params, state)))
}

/// Handle the upgraded WebSocket connection
async fn handle_websocket_connection(
    socket: axum::extract::ws::WebSocket,
    params: ConnectParams,
    state: AppState,
) {
    let ConnectParams {
        room_id,
        user_id,
        token,
    } = params;

    let (channel, outbound_receiver) = ClientChannel::new();
    let channel_id = channel.id();

    // A rejected credential leaves a close frame queued on the channel
    let registered = state
        .hub
        .register(channel, &room_id, &user_id, &token)
        .await
        .is_ok();

    let connection = Connection::new(
        user_id.clone(),
        room_id.clone(),
        Box::new(socket),
        outbound_receiver,
        Arc::new(ControlMessageHandler),
    );

    match connection.run().await {
        Ok(()) => {
            info!(room_id = %room_id, user_id = %user_id, "WebSocket connection closed cleanly");
        }
        Err(e) => {
            warn!(room_id = %room_id, user_id = %user_id, error = ?e, "WebSocket connection error");
        }
    }

    if registered {
        state.hub.unregister(channel_id, &room_id, &user_id).await;
    }
}

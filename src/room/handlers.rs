use axum::{
    extract::{Path, State},
    Json,
};
use std::sync::Arc;
use tracing::{info, instrument};

use super::{
    service::RoomService,
    types::{RoomCreateRequest, RoomResponse, UpdateBoardLangRequest, UpdateOverridesRequest},
};
use crate::shared::{AppError, AppState};

/// HTTP handler for creating a new room
///
/// POST /api/rooms
#[instrument(name = "create_room", skip(state, request))]
pub async fn create_room(
    State(state): State<AppState>,
    Json(request): Json<RoomCreateRequest>,
) -> Result<Json<RoomResponse>, AppError> {
    info!(name = %request.name, "Creating new room");

    let service = RoomService::new(Arc::clone(&state.rooms));
    let room = service.create_room(request).await?;

    Ok(Json(room))
}

/// GET /api/rooms/{room_id}
#[instrument(name = "get_room", skip(state))]
pub async fn get_room(
    State(state): State<AppState>,
    Path(room_id): Path<String>,
) -> Result<Json<RoomResponse>, AppError> {
    let service = RoomService::new(Arc::clone(&state.rooms));
    Ok(Json(service.get_room_details(&room_id).await?))
}

/// PUT /api/rooms/{room_id}/board-lang
#[instrument(name = "update_board_lang", skip(state, request))]
pub async fn update_board_lang(
    State(state): State<AppState>,
    Path(room_id): Path<String>,
    Json(request): Json<UpdateBoardLangRequest>,
) -> Result<Json<RoomResponse>, AppError> {
    let service = RoomService::new(Arc::clone(&state.rooms));
    let room = service
        .update_board_lang(&room_id, &request.board_lang)
        .await?;

    info!(room_id = %room_id, board_lang = %room.default_board_lang, "Room board language changed");
    Ok(Json(room))
}

/// PUT /api/rooms/{room_id}/overrides
#[instrument(name = "update_overrides", skip(state, request))]
pub async fn update_overrides(
    State(state): State<AppState>,
    Path(room_id): Path<String>,
    Json(request): Json<UpdateOverridesRequest>,
) -> Result<Json<RoomResponse>, AppError> {
    let service = RoomService::new(Arc::clone(&state.rooms));
    let room = service
        .replace_overrides(&room_id, request.overrides)
        .await?;

    Ok(Json(room))
}

use axum::{
    extract::DefaultBodyLimit,
    middleware,
    routing::{get, post, put},
    Json, Router,
};
use serde_json::{json, Value};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::shared::AppState;
use crate::{auth, ingest, message, room, user, websockets};

// Room for the other multipart fields and boundaries around the audio part
const MULTIPART_OVERHEAD: usize = 64 * 1024;

async fn root() -> &'static str {
    "LingoRoom relay"
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

/// Assembles every route. Everything except guest login, health and the
/// websocket (which carries its own token) sits behind `jwt_auth`.
pub fn build_router(state: AppState) -> Router {
    let upload_limit = DefaultBodyLimit::max(state.config.max_audio_bytes + MULTIPART_OVERHEAD);

    let protected = Router::new()
        .route("/api/rooms", post(room::create_room))
        .route("/api/rooms/:room_id", get(room::get_room))
        .route("/api/rooms/:room_id/board-lang", put(room::update_board_lang))
        .route("/api/rooms/:room_id/overrides", put(room::update_overrides))
        .route(
            "/api/rooms/:room_id/messages",
            get(message::list_room_messages),
        )
        .route(
            "/api/users/:user_id/preferred-lang",
            put(user::update_preferred_lang),
        )
        .route("/api/users/:user_id/languages", put(user::update_languages))
        .route("/api/ingest/text", post(ingest::ingest_text))
        .route(
            "/api/speech/upload",
            post(ingest::upload_speech).layer(upload_limit),
        )
        .route(
            "/api/speech-staged/stt-only",
            post(ingest::stt_only).layer(upload_limit),
        )
        .route(
            "/api/speech-staged/translate-stt",
            post(ingest::translate_stt),
        )
        .route(
            "/api/speech-staged/transcript/:transcript_id",
            get(ingest::get_transcript).delete(ingest::cancel_transcript),
        )
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth::jwt_auth,
        ));

    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .route("/api/auth/guest", post(auth::guest_login))
        .route("/ws", get(websockets::websocket_handler))
        .merge(protected)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

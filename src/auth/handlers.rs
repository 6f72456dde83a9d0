use axum::{extract::State, Json};
use tracing::{info, instrument};

use super::{
    generators::{DisplayNameGenerator, PetNameGenerator},
    types::{AuthResponse, GuestLoginRequest},
};
use crate::shared::{AppError, AppState};
use crate::user::UserModel;

/// HTTP handler for guest login
///
/// POST /api/auth/guest
/// Creates a user and returns a JWT whose subject is the new user id
#[instrument(name = "guest_login", skip(state, request))]
pub async fn guest_login(
    State(state): State<AppState>,
    Json(request): Json<GuestLoginRequest>,
) -> Result<Json<AuthResponse>, AppError> {
    let display_name = match request.display_name.trim() {
        "" => PetNameGenerator::new().generate().await,
        name => name.to_string(),
    };

    let user = UserModel::new(
        display_name,
        request.preferred_lang,
        request.input_lang,
        request.output_lang,
    );
    state.users.create_user(&user).await?;

    let token = state.token_config.create_token(&user.id)?;

    info!(
        user_id = %user.id,
        display_name = %user.display_name,
        preferred_lang = %user.preferred_lang,
        "Guest user logged in"
    );

    Ok(Json(AuthResponse {
        user_id: user.id,
        token,
        display_name: user.display_name,
        preferred_lang: user.preferred_lang,
    }))
}

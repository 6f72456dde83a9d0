use axum::{
    extract::{Path, State},
    Extension, Json,
};
use tracing::{info, instrument, warn};

use super::types::{StatusMessage, UpdateLanguagesRequest, UpdatePreferredLangRequest};
use crate::auth::AuthClaims;
use crate::shared::{AppError, AppState};

/// Users may only change their own language settings
fn ensure_self(claims: &AuthClaims, user_id: &str) -> Result<(), AppError> {
    if claims.sub != user_id {
        warn!(caller = %claims.sub, target = %user_id, "Attempt to modify another user");
        return Err(AppError::Forbidden("Permission denied".to_string()));
    }
    Ok(())
}

/// PUT /api/users/{user_id}/preferred-lang
#[instrument(name = "update_preferred_lang", skip(state, claims, request))]
pub async fn update_preferred_lang(
    State(state): State<AppState>,
    Extension(claims): Extension<AuthClaims>,
    Path(user_id): Path<String>,
    Json(request): Json<UpdatePreferredLangRequest>,
) -> Result<Json<StatusMessage>, AppError> {
    ensure_self(&claims, &user_id)?;

    state
        .users
        .update_preferred_lang(&user_id, &request.preferred_lang)
        .await?;

    info!(user_id = %user_id, preferred_lang = %request.preferred_lang, "Preferred language updated");
    Ok(Json(StatusMessage::new(
        "Preferred language updated successfully",
    )))
}

/// PUT /api/users/{user_id}/languages
#[instrument(name = "update_languages", skip(state, claims, request))]
pub async fn update_languages(
    State(state): State<AppState>,
    Extension(claims): Extension<AuthClaims>,
    Path(user_id): Path<String>,
    Json(request): Json<UpdateLanguagesRequest>,
) -> Result<Json<StatusMessage>, AppError> {
    ensure_self(&claims, &user_id)?;

    state
        .users
        .set_languages(&user_id, &request.input_lang, &request.output_lang)
        .await?;

    info!(
        user_id = %user_id,
        input_lang = %request.input_lang,
        output_lang = %request.output_lang,
        "User languages updated"
    );
    Ok(Json(StatusMessage::new("Languages updated successfully")))
}

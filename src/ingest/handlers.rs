use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    Extension, Json,
};
use tracing::{debug, info, instrument};

use super::service::{AudioClip, IngestOutcome, StageOutcome};
use super::types::{
    IngestResponse, IngestStatus, IngestTextRequest, SpeechIngestResponse, SttOnlyResponse,
    TranscriptView, TranslateSttRequest, TranslateSttResponse,
};
use crate::auth::AuthClaims;
use crate::shared::{AppError, AppState};

const DEFAULT_LANGUAGE_CODE: &str = "zh-TW";

/// Multipart fields shared by the speech endpoints
struct SpeechForm {
    room_id: String,
    language_code: String,
    clip: AudioClip,
}

async fn read_speech_form(mut multipart: Multipart) -> Result<SpeechForm, AppError> {
    let mut room_id = None;
    let mut language_code = None;
    let mut clip = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.body_text()))?
    {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "room_id" => {
                room_id = Some(
                    field
                        .text()
                        .await
                        .map_err(|e| AppError::BadRequest(e.body_text()))?,
                )
            }
            "language_code" => {
                language_code = Some(
                    field
                        .text()
                        .await
                        .map_err(|e| AppError::BadRequest(e.body_text()))?,
                )
            }
            "audio" => {
                let content_type = field.content_type().unwrap_or_default().to_string();
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::BadRequest(e.body_text()))?;
                clip = Some(AudioClip {
                    bytes: bytes.to_vec(),
                    content_type,
                });
            }
            other => debug!(field = %other, "Ignoring unknown multipart field"),
        }
    }

    let room_id = room_id
        .filter(|id| !id.trim().is_empty())
        .ok_or_else(|| AppError::BadRequest("Missing room_id".to_string()))?;
    let clip = clip.ok_or_else(|| AppError::BadRequest("Missing audio file".to_string()))?;
    let language_code = language_code
        .filter(|code| !code.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_LANGUAGE_CODE.to_string());

    Ok(SpeechForm {
        room_id,
        language_code,
        clip,
    })
}

/// POST /api/ingest/text
#[instrument(name = "ingest_text", skip(state, claims, request), fields(room_id = %request.room_id))]
pub async fn ingest_text(
    State(state): State<AppState>,
    Extension(claims): Extension<AuthClaims>,
    Json(request): Json<IngestTextRequest>,
) -> Result<Json<IngestResponse>, AppError> {
    let outcome = state
        .ingest
        .ingest_text(
            &claims.sub,
            &request.room_id,
            &request.text,
            request.source_lang.as_deref(),
            request.is_final,
        )
        .await?;

    let response = match outcome {
        IngestOutcome::Accepted(message) => IngestResponse {
            status: if message.is_final {
                IngestStatus::Processing
            } else {
                IngestStatus::Partial
            },
            message_id: Some(message.id),
            source_lang: Some(message.source_lang),
            reason: None,
        },
        IngestOutcome::Filtered(reason) => IngestResponse {
            message_id: None,
            source_lang: None,
            status: IngestStatus::Filtered,
            reason: Some(reason.to_string()),
        },
    };

    Ok(Json(response))
}

/// POST /api/speech/upload
#[instrument(name = "upload_speech", skip(state, claims, multipart))]
pub async fn upload_speech(
    State(state): State<AppState>,
    Extension(claims): Extension<AuthClaims>,
    multipart: Multipart,
) -> Result<Json<SpeechIngestResponse>, AppError> {
    let form = read_speech_form(multipart).await?;
    let result = state
        .ingest
        .ingest_speech(&claims.sub, &form.room_id, form.clip, &form.language_code)
        .await?;

    let transcript = result.transcript;
    let response = match result.outcome {
        IngestOutcome::Accepted(message) => SpeechIngestResponse {
            message_id: Some(message.id),
            transcript: transcript.text,
            confidence: transcript.confidence,
            detected_lang: message.source_lang,
            status: IngestStatus::Processing,
            reason: None,
        },
        IngestOutcome::Filtered(reason) => SpeechIngestResponse {
            message_id: None,
            transcript: transcript.text,
            confidence: transcript.confidence,
            detected_lang: transcript.language,
            status: IngestStatus::Filtered,
            reason: Some(reason.to_string()),
        },
    };

    Ok(Json(response))
}

/// POST /api/speech-staged/stt-only
#[instrument(name = "stt_only", skip(state, claims, multipart))]
pub async fn stt_only(
    State(state): State<AppState>,
    Extension(claims): Extension<AuthClaims>,
    multipart: Multipart,
) -> Result<Json<SttOnlyResponse>, AppError> {
    let form = read_speech_form(multipart).await?;
    let outcome = state
        .ingest
        .stage_transcript(&claims.sub, &form.room_id, form.clip, &form.language_code)
        .await?;

    let response = match outcome {
        StageOutcome::Staged(staged) => {
            info!(transcript_id = %staged.id, room_id = %staged.room_id, "Transcript staged");
            SttOnlyResponse {
                transcript_id: Some(staged.id),
                transcript: staged.transcript,
                confidence: staged.confidence,
                detected_lang: staged.detected_lang,
                status: IngestStatus::AwaitingConfirmation,
                reason: None,
            }
        }
        StageOutcome::Filtered { transcript, reason } => SttOnlyResponse {
            transcript_id: None,
            transcript: transcript.text,
            confidence: transcript.confidence,
            detected_lang: transcript.language,
            status: IngestStatus::Filtered,
            reason: Some(reason.to_string()),
        },
    };

    Ok(Json(response))
}

/// POST /api/speech-staged/translate-stt
#[instrument(name = "translate_stt", skip(state, claims, request), fields(transcript_id = %request.transcript_id))]
pub async fn translate_stt(
    State(state): State<AppState>,
    Extension(claims): Extension<AuthClaims>,
    Json(request): Json<TranslateSttRequest>,
) -> Result<Json<TranslateSttResponse>, AppError> {
    let confirmed = state
        .ingest
        .confirm_transcript(
            &claims.sub,
            &request.transcript_id,
            &request.room_id,
            &request.confirmed_text,
            request.source_lang.as_deref(),
        )
        .await?;

    Ok(Json(TranslateSttResponse {
        message_id: confirmed.message.id,
        final_text: confirmed.message.text,
        source_lang: confirmed.message.source_lang,
        translations_count: confirmed.translations_count,
        status: IngestStatus::TranslationProcessing,
    }))
}

/// GET /api/speech-staged/transcript/{transcript_id}
#[instrument(name = "get_transcript", skip(state, claims))]
pub async fn get_transcript(
    State(state): State<AppState>,
    Extension(claims): Extension<AuthClaims>,
    Path(transcript_id): Path<String>,
) -> Result<Json<TranscriptView>, AppError> {
    let staged = state
        .ingest
        .get_transcript(&claims.sub, &transcript_id)
        .await?;

    Ok(Json(TranscriptView {
        transcript_id: staged.id,
        room_id: staged.room_id,
        transcript: staged.transcript,
        confidence: staged.confidence,
        detected_lang: staged.detected_lang,
    }))
}

/// DELETE /api/speech-staged/transcript/{transcript_id}
#[instrument(name = "cancel_transcript", skip(state, claims))]
pub async fn cancel_transcript(
    State(state): State<AppState>,
    Extension(claims): Extension<AuthClaims>,
    Path(transcript_id): Path<String>,
) -> Result<StatusCode, AppError> {
    state
        .ingest
        .cancel_transcript(&claims.sub, &transcript_id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

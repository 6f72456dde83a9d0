use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, instrument, warn};

use crate::config::AppConfig;
use crate::language::detect_language;
use crate::message::{MessageModel, MessageStore};
use crate::room::{RoomModel, RoomRepository};
use crate::shared::{AppError, ProviderError};
use crate::speech::{
    classify, FilterReason, SpeechProvider, SpeechTranscript, StagedTranscript, TranscriptCache,
};
use crate::translation::{TranslationJob, TranslationOrchestrator};
use crate::user::{display_name_for, UserRepository};
use crate::websockets::{ConnectionHub, ServerEvent};

/// An uploaded audio clip
#[derive(Debug, Clone)]
pub struct AudioClip {
    pub bytes: Vec<u8>,
    pub content_type: String,
}

/// Result of handing one utterance to ingestion
#[derive(Debug, Clone, PartialEq)]
pub enum IngestOutcome {
    /// Stored; final messages were submitted for translation
    Accepted(MessageModel),
    /// Judged not to be speech; nothing was stored
    Filtered(FilterReason),
}

#[derive(Debug, Clone, PartialEq)]
pub struct SpeechIngest {
    pub transcript: SpeechTranscript,
    pub outcome: IngestOutcome,
}

#[derive(Debug, Clone, PartialEq)]
pub enum StageOutcome {
    Staged(StagedTranscript),
    Filtered {
        transcript: SpeechTranscript,
        reason: FilterReason,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct ConfirmedTranscript {
    pub message: MessageModel,
    pub translations_count: usize,
}

/// Entry points that turn raw utterances into stored messages and translation jobs
pub struct IngestService {
    rooms: Arc<dyn RoomRepository>,
    users: Arc<dyn UserRepository>,
    messages: Arc<dyn MessageStore>,
    hub: Arc<dyn ConnectionHub>,
    orchestrator: Arc<TranslationOrchestrator>,
    speech: Arc<dyn SpeechProvider>,
    transcripts: Arc<TranscriptCache>,
    provider_timeout: Duration,
    max_audio_bytes: usize,
}

impl IngestService {
    pub fn new(
        rooms: Arc<dyn RoomRepository>,
        users: Arc<dyn UserRepository>,
        messages: Arc<dyn MessageStore>,
        hub: Arc<dyn ConnectionHub>,
        orchestrator: Arc<TranslationOrchestrator>,
        speech: Arc<dyn SpeechProvider>,
        config: &AppConfig,
    ) -> Self {
        Self {
            rooms,
            users,
            messages,
            hub,
            orchestrator,
            speech,
            transcripts: Arc::new(TranscriptCache::new(
                config.transcript_ttl,
                config.transcript_capacity,
            )),
            provider_timeout: config.provider_timeout,
            max_audio_bytes: config.max_audio_bytes,
        }
    }

    pub fn transcripts(&self) -> Arc<TranscriptCache> {
        Arc::clone(&self.transcripts)
    }

    /// Typed text. Only blank text is filtered; typing is taken as intended.
    #[instrument(skip(self, text))]
    pub async fn ingest_text(
        &self,
        speaker_id: &str,
        room_id: &str,
        text: &str,
        source_lang: Option<&str>,
        is_final: bool,
    ) -> Result<IngestOutcome, AppError> {
        let room = self.require_room(room_id).await?;

        let text = text.trim();
        if text.is_empty() {
            debug!(room_id = %room_id, "Blank text filtered");
            return Ok(IngestOutcome::Filtered(FilterReason::Empty));
        }

        let source_lang = match source_lang.map(str::trim) {
            Some(lang) if !lang.is_empty() => lang.to_string(),
            _ => detect_language(text).to_string(),
        };

        let message = self
            .store_and_submit(&room, speaker_id, text, &source_lang, is_final)
            .await?;
        Ok(IngestOutcome::Accepted(message))
    }

    /// One-shot speech: transcribe, filter, store and submit
    #[instrument(skip(self, clip), fields(bytes = clip.bytes.len()))]
    pub async fn ingest_speech(
        &self,
        speaker_id: &str,
        room_id: &str,
        clip: AudioClip,
        language_code: &str,
    ) -> Result<SpeechIngest, AppError> {
        let room = self.require_room(room_id).await?;
        let transcript = self.transcribe(&clip, language_code).await?;

        if let Some(reason) = classify(&transcript.text) {
            info!(room_id = %room_id, reason = %reason, "Speech transcript filtered");
            return Ok(SpeechIngest {
                transcript,
                outcome: IngestOutcome::Filtered(reason),
            });
        }

        let source_lang = resolve_source_lang(&transcript, language_code);
        let message = self
            .store_and_submit(&room, speaker_id, &transcript.text, &source_lang, true)
            .await?;

        Ok(SpeechIngest {
            transcript: SpeechTranscript {
                language: source_lang,
                ..transcript
            },
            outcome: IngestOutcome::Accepted(message),
        })
    }

    /// Staged speech: transcribe and filter, then hold the transcript for confirmation
    #[instrument(skip(self, clip), fields(bytes = clip.bytes.len()))]
    pub async fn stage_transcript(
        &self,
        speaker_id: &str,
        room_id: &str,
        clip: AudioClip,
        language_code: &str,
    ) -> Result<StageOutcome, AppError> {
        self.require_room(room_id).await?;
        let transcript = self.transcribe(&clip, language_code).await?;

        if let Some(reason) = classify(&transcript.text) {
            info!(room_id = %room_id, reason = %reason, "Staged transcript filtered");
            return Ok(StageOutcome::Filtered { transcript, reason });
        }

        let detected_lang = resolve_source_lang(&transcript, language_code);
        let staged = StagedTranscript::new(
            room_id,
            speaker_id,
            transcript.text,
            transcript.confidence,
            detected_lang,
        );
        self.transcripts.insert(staged.clone()).await;

        let preview = ServerEvent::SttPreview {
            transcript_id: staged.id.clone(),
            speaker_id: speaker_id.to_string(),
            speaker_name: display_name_for(self.users.as_ref(), speaker_id).await,
            transcript: staged.transcript.clone(),
            confidence: staged.confidence,
            detected_lang: staged.detected_lang.clone(),
            status: "awaiting_confirmation".to_string(),
        };
        self.hub.broadcast_to_room(room_id, &preview).await;

        Ok(StageOutcome::Staged(staged))
    }

    /// Turns a staged transcript, possibly edited by the speaker, into a message
    #[instrument(skip(self, confirmed_text))]
    pub async fn confirm_transcript(
        &self,
        speaker_id: &str,
        transcript_id: &str,
        room_id: &str,
        confirmed_text: &str,
        source_lang: Option<&str>,
    ) -> Result<ConfirmedTranscript, AppError> {
        let staged = self.owned_transcript(speaker_id, transcript_id).await?;
        if staged.room_id != room_id {
            warn!(transcript_id = %transcript_id, room_id = %room_id, "Transcript belongs to another room");
            return Err(AppError::Forbidden("Access denied".to_string()));
        }
        let room = self.require_room(room_id).await?;

        let text = confirmed_text.trim();
        if text.is_empty() {
            return Err(AppError::BadRequest(
                "Confirmed text cannot be empty".to_string(),
            ));
        }

        let source_lang = match source_lang.map(str::trim) {
            Some(lang) if !lang.is_empty() => lang.to_string(),
            _ => staged.detected_lang.clone(),
        };

        let translations_count = self.orchestrator.target_count(room_id, speaker_id).await?;

        // Only one confirmation may claim the transcript
        let claimed = self.transcripts.take(transcript_id).await.ok_or_else(|| {
            debug!(transcript_id = %transcript_id, "Transcript already confirmed or expired");
            AppError::NotFound("Transcript not found or expired".to_string())
        })?;

        match self
            .store_and_submit(&room, speaker_id, text, &source_lang, true)
            .await
        {
            Ok(message) => Ok(ConfirmedTranscript {
                message,
                translations_count,
            }),
            Err(e) => {
                warn!(transcript_id = %transcript_id, error = %e, "Storing confirmed transcript failed, restoring it");
                self.transcripts.insert(claimed).await;
                Err(e)
            }
        }
    }

    pub async fn get_transcript(
        &self,
        speaker_id: &str,
        transcript_id: &str,
    ) -> Result<StagedTranscript, AppError> {
        self.owned_transcript(speaker_id, transcript_id).await
    }

    pub async fn cancel_transcript(
        &self,
        speaker_id: &str,
        transcript_id: &str,
    ) -> Result<(), AppError> {
        self.owned_transcript(speaker_id, transcript_id).await?;
        self.transcripts.remove(transcript_id).await;
        debug!(transcript_id = %transcript_id, "Staged transcript cancelled");
        Ok(())
    }

    async fn owned_transcript(
        &self,
        speaker_id: &str,
        transcript_id: &str,
    ) -> Result<StagedTranscript, AppError> {
        let staged = self
            .transcripts
            .get(transcript_id)
            .await
            .ok_or_else(|| AppError::NotFound("Transcript not found or expired".to_string()))?;

        if staged.user_id != speaker_id {
            warn!(transcript_id = %transcript_id, caller = %speaker_id, "Transcript belongs to another user");
            return Err(AppError::Forbidden("Access denied".to_string()));
        }
        Ok(staged)
    }

    async fn require_room(&self, room_id: &str) -> Result<RoomModel, AppError> {
        self.rooms
            .get_room(room_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Room not found".to_string()))
    }

    async fn transcribe(
        &self,
        clip: &AudioClip,
        language_code: &str,
    ) -> Result<SpeechTranscript, AppError> {
        if !clip.content_type.starts_with("audio/") {
            return Err(AppError::BadRequest("Invalid audio file".to_string()));
        }
        if clip.bytes.len() > self.max_audio_bytes {
            return Err(AppError::BadRequest(format!(
                "Audio file too large (max {} bytes)",
                self.max_audio_bytes
            )));
        }

        let call = self
            .speech
            .transcribe(&clip.bytes, &clip.content_type, language_code);
        let result = match tokio::time::timeout(self.provider_timeout, call).await {
            Ok(result) => result,
            Err(_) => Err(ProviderError::Timeout(
                self.provider_timeout.as_millis() as u64,
            )),
        };

        result.map_err(|e| {
            warn!(provider = self.speech.name(), error = %e, "Speech recognition failed");
            AppError::Internal
        })
    }

    async fn store_and_submit(
        &self,
        room: &RoomModel,
        speaker_id: &str,
        text: &str,
        source_lang: &str,
        is_final: bool,
    ) -> Result<MessageModel, AppError> {
        let message = MessageModel::new(&room.id, speaker_id, source_lang, text, is_final);
        self.messages.create_message(&message).await?;

        if is_final {
            self.orchestrator.submit(TranslationJob {
                message_id: message.id.clone(),
                room_id: room.id.clone(),
                speaker_id: speaker_id.to_string(),
                source_lang: source_lang.to_string(),
                text: message.text.clone(),
            });
        }

        info!(
            message_id = %message.id,
            room_id = %room.id,
            source_lang = %source_lang,
            is_final,
            "Message ingested"
        );
        Ok(message)
    }
}

/// A recognizer that merely echoed the requested code did not detect anything,
/// so the language is guessed from the transcript itself
fn resolve_source_lang(transcript: &SpeechTranscript, requested: &str) -> String {
    if transcript.language.is_empty() || transcript.language == requested {
        detect_language(&transcript.text).to_string()
    } else {
        transcript.language.clone()
    }
}

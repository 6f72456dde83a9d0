use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, instrument, warn};

use super::batch::{BatchTranslator, TranslationOutcome};
use crate::language::{LanguageRouter, RoutePlan};
use crate::message::{MessageStore, TranslationRecord};
use crate::shared::AppError;
use crate::user::{display_name_for, UserRepository};
use crate::websockets::{ConnectionHub, ServerEvent};

/// A final utterance handed off for translation and delivery
#[derive(Debug, Clone, PartialEq)]
pub struct TranslationJob {
    pub message_id: String,
    pub room_id: String,
    pub speaker_id: String,
    pub source_lang: String,
    pub text: String,
}

/// What one orchestration run did, for logging and tests
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OrchestrationReport {
    pub translations: usize,
    pub degraded: usize,
    pub personal_deliveries: usize,
    pub board_recipients: usize,
}

/// Turns one final message into persisted translations and room deliveries
pub struct TranslationOrchestrator {
    hub: Arc<dyn ConnectionHub>,
    router: Arc<LanguageRouter>,
    translator: BatchTranslator,
    users: Arc<dyn UserRepository>,
    messages: Arc<dyn MessageStore>,
}

impl TranslationOrchestrator {
    pub fn new(
        hub: Arc<dyn ConnectionHub>,
        router: Arc<LanguageRouter>,
        translator: BatchTranslator,
        users: Arc<dyn UserRepository>,
        messages: Arc<dyn MessageStore>,
    ) -> Self {
        Self {
            hub,
            router,
            translator,
            users,
            messages,
        }
    }

    /// Runs the job on its own task. The caller only sees side effects.
    pub fn submit(self: &Arc<Self>, job: TranslationJob) -> JoinHandle<()> {
        let orchestrator = Arc::clone(self);
        tokio::spawn(async move {
            let message_id = job.message_id.clone();
            match orchestrator.process(job).await {
                Ok(report) => {
                    info!(
                        message_id = %message_id,
                        translations = report.translations,
                        degraded = report.degraded,
                        personal_deliveries = report.personal_deliveries,
                        board_recipients = report.board_recipients,
                        "Message translated and delivered"
                    );
                }
                Err(e) => {
                    error!(message_id = %message_id, error = %e, "Translation job failed");
                }
            }
        })
    }

    /// Number of distinct languages a message from `speaker_id` would be translated into now
    pub async fn target_count(&self, room_id: &str, speaker_id: &str) -> Result<usize, AppError> {
        let online = self.hub.room_members(room_id).await;
        let plan = self.router.plan(room_id, speaker_id, &online).await?;
        Ok(plan.combined().len())
    }

    #[instrument(skip(self, job), fields(message_id = %job.message_id, room_id = %job.room_id))]
    pub async fn process(&self, job: TranslationJob) -> Result<OrchestrationReport, AppError> {
        let online = self.hub.room_members(&job.room_id).await;
        let plan = self
            .router
            .plan(&job.room_id, &job.speaker_id, &online)
            .await?;

        let targets = plan.combined();
        if targets.is_empty() {
            debug!("No target languages, nothing to deliver");
            return Ok(OrchestrationReport::default());
        }

        let results = self
            .translator
            .translate_all(&job.text, &targets, &job.source_lang)
            .await;

        // Every translation is stored before anything is delivered
        for (target_lang, outcome) in &results {
            let record = TranslationRecord {
                message_id: job.message_id.clone(),
                target_lang: target_lang.clone(),
                text: outcome.text.clone(),
                latency_ms: outcome.latency_ms,
                quality: outcome.quality,
            };
            if let Err(e) = self.messages.save_translation(&record).await {
                warn!(target_lang = %target_lang, error = %e, "Failed to store translation");
            }
        }

        let speaker_name = display_name_for(self.users.as_ref(), &job.speaker_id).await;
        let mut report = OrchestrationReport {
            translations: results.len(),
            degraded: results.values().filter(|o| o.is_degraded()).count(),
            ..OrchestrationReport::default()
        };

        report.personal_deliveries = self
            .deliver_personal(&job, &plan, &results, &speaker_name)
            .await;

        if let Some(board_lang) = &plan.board_lang {
            let event = ServerEvent::BoardPost {
                message_id: job.message_id.clone(),
                speaker_id: job.speaker_id.clone(),
                speaker_name: speaker_name.clone(),
                target_lang: board_lang.clone(),
                text: text_for(&results, board_lang, &job.text),
                source_lang: job.source_lang.clone(),
            };
            report.board_recipients = self.hub.broadcast_to_room(&job.room_id, &event).await;
        }

        let completed = ServerEvent::TranslationCompleted {
            message_id: job.message_id.clone(),
            translations_count: results.len(),
        };
        self.hub.broadcast_to_room(&job.room_id, &completed).await;

        Ok(report)
    }

    async fn deliver_personal(
        &self,
        job: &TranslationJob,
        plan: &RoutePlan,
        results: &BTreeMap<String, TranslationOutcome>,
        speaker_name: &str,
    ) -> usize {
        let mut delivered = 0;
        for (member, lang) in &plan.personal {
            let event = ServerEvent::PersonalSubtitle {
                message_id: job.message_id.clone(),
                target_lang: lang.clone(),
                text: text_for(results, lang, &job.text),
                speaker_name: speaker_name.to_string(),
                source_lang: job.source_lang.clone(),
            };
            if self.hub.send_to_user(&job.room_id, member, &event).await {
                delivered += 1;
            }
        }
        delivered
    }

}

/// Translated text for `lang`, or the original when that language was not produced
fn text_for(
    results: &BTreeMap<String, TranslationOutcome>,
    lang: &str,
    original: &str,
) -> String {
    results
        .get(lang)
        .map(|outcome| outcome.text.clone())
        .unwrap_or_else(|| original.to_string())
}

#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc::UnboundedReceiver;

use lingoroom::{
    auth::{AuthVerifier, JwtAuthVerifier, TokenConfig},
    config::AppConfig,
    ingest::IngestService,
    language::LanguageRouter,
    message::InMemoryMessageStore,
    room::{InMemoryRoomRepository, RoomModel, RoomRepository},
    shared::AppState,
    speech::{MockSpeechProvider, SpeechProvider},
    translation::{BatchTranslator, TranslationJob, TranslationOrchestrator, TranslationProvider},
    user::{InMemoryUserRepository, UserModel, UserRepository},
    websockets::{ClientChannel, ConnectionHub, InMemoryConnectionHub, Outbound},
};

use super::mocks::{AcceptAllVerifier, CountingTranslationProvider};

pub const TEST_SECRET: &str = "integration-secret";

// ============================================================================
// Test Setup Infrastructure
// ============================================================================

/// A room wired to in-memory stores, a live hub and a recording translation backend
pub struct RelayHarness {
    pub users: Arc<InMemoryUserRepository>,
    pub rooms: Arc<InMemoryRoomRepository>,
    pub messages: Arc<InMemoryMessageStore>,
    pub hub: Arc<InMemoryConnectionHub>,
    pub provider: CountingTranslationProvider,
    pub orchestrator: Arc<TranslationOrchestrator>,
    pub ingest: Arc<IngestService>,
    pub room: RoomModel,
}

pub struct RelayHarnessBuilder {
    board_lang: String,
    provider: CountingTranslationProvider,
    speech: Arc<dyn SpeechProvider>,
    provider_timeout: Duration,
}

impl RelayHarnessBuilder {
    pub fn new() -> Self {
        Self {
            board_lang: "en".to_string(),
            provider: CountingTranslationProvider::new(),
            speech: Arc::new(MockSpeechProvider::without_latency()),
            provider_timeout: Duration::from_secs(2),
        }
    }

    pub fn with_board_lang(mut self, lang: &str) -> Self {
        self.board_lang = lang.to_string();
        self
    }

    pub fn with_provider(mut self, provider: CountingTranslationProvider) -> Self {
        self.provider = provider;
        self
    }

    pub fn with_speech(mut self, speech: Arc<dyn SpeechProvider>) -> Self {
        self.speech = speech;
        self
    }

    pub fn with_provider_timeout(mut self, timeout: Duration) -> Self {
        self.provider_timeout = timeout;
        self
    }

    pub async fn build(self) -> RelayHarness {
        let users = Arc::new(InMemoryUserRepository::new());
        let rooms = Arc::new(InMemoryRoomRepository::new());
        let messages = Arc::new(InMemoryMessageStore::new());
        let hub = Arc::new(InMemoryConnectionHub::new(Arc::new(AcceptAllVerifier)));

        let room = RoomModel::new("integration".to_string(), self.board_lang);
        rooms.create_room(&room).await.unwrap();

        let config = AppConfig {
            provider_timeout: self.provider_timeout,
            ..AppConfig::default()
        };
        let provider: Arc<dyn TranslationProvider> = Arc::new(self.provider.clone());
        let orchestrator = Arc::new(TranslationOrchestrator::new(
            hub.clone(),
            Arc::new(LanguageRouter::new(users.clone(), rooms.clone())),
            BatchTranslator::new(provider, config.provider_timeout),
            users.clone(),
            messages.clone(),
        ));
        let ingest = Arc::new(IngestService::new(
            rooms.clone(),
            users.clone(),
            messages.clone(),
            hub.clone(),
            orchestrator.clone(),
            self.speech,
            &config,
        ));

        RelayHarness {
            users,
            rooms,
            messages,
            hub,
            provider: self.provider,
            orchestrator,
            ingest,
            room,
        }
    }
}

impl RelayHarness {
    /// Creates a user with the given subtitle (`input`) and board (`output`) languages
    pub async fn add_user(&self, name: &str, input: &str, output: Option<&str>) -> UserModel {
        let user = UserModel::new(
            name.to_string(),
            input.to_string(),
            Some(input.to_string()),
            output.map(str::to_string),
        );
        self.users.create_user(&user).await.unwrap();
        user
    }

    /// Connects `user_id` to the harness room and returns its outbound queue
    pub async fn connect(&self, user_id: &str) -> UnboundedReceiver<Outbound> {
        let (channel, rx) = ClientChannel::new();
        self.hub
            .register(channel, &self.room.id, user_id, "token")
            .await
            .unwrap();
        rx
    }

    pub fn job(&self, speaker_id: &str, text: &str, source_lang: &str) -> TranslationJob {
        TranslationJob {
            message_id: uuid::Uuid::new_v4().to_string(),
            room_id: self.room.id.clone(),
            speaker_id: speaker_id.to_string(),
            source_lang: source_lang.to_string(),
            text: text.to_string(),
        }
    }
}

/// Full application state for router-level tests, with JWT-checked connections
pub fn build_app_state() -> AppState {
    let config = Arc::new(AppConfig::default());
    let token_config = TokenConfig::with_secret(TEST_SECRET, 7);

    let users: Arc<dyn UserRepository> = Arc::new(InMemoryUserRepository::new());
    let rooms: Arc<dyn RoomRepository> = Arc::new(InMemoryRoomRepository::new());
    let messages = Arc::new(InMemoryMessageStore::new());
    let verifier: Arc<dyn AuthVerifier> = Arc::new(JwtAuthVerifier::new(token_config.clone()));
    let hub: Arc<dyn ConnectionHub> = Arc::new(InMemoryConnectionHub::new(verifier));

    let orchestrator = Arc::new(TranslationOrchestrator::new(
        hub.clone(),
        Arc::new(LanguageRouter::new(users.clone(), rooms.clone())),
        BatchTranslator::new(
            Arc::new(CountingTranslationProvider::new()),
            config.provider_timeout,
        ),
        users.clone(),
        messages.clone(),
    ));
    let ingest = Arc::new(IngestService::new(
        rooms.clone(),
        users.clone(),
        messages.clone(),
        hub.clone(),
        orchestrator,
        Arc::new(MockSpeechProvider::without_latency()),
        &config,
    ));

    AppState::new(config, token_config, users, rooms, messages, hub, ingest)
}

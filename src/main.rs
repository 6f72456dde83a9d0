use std::sync::Arc;
use std::time::Duration;

use lingoroom::{
    auth::{JwtAuthVerifier, TokenConfig},
    build_router,
    config::AppConfig,
    ingest::IngestService,
    language::LanguageRouter,
    message::{InMemoryMessageStore, MessageStore, PostgresMessageStore},
    room::{InMemoryRoomRepository, PostgresRoomRepository, RoomRepository},
    shared::AppState,
    speech::{build_speech_provider, start_transcript_sweeper},
    translation::{build_translation_provider, BatchTranslator, TranslationOrchestrator},
    user::{InMemoryUserRepository, PostgresUserRepository, UserRepository},
    websockets::{ConnectionHub, InMemoryConnectionHub},
};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const TRANSCRIPT_SWEEP_INTERVAL: Duration = Duration::from_secs(30);

type Stores = (
    Arc<dyn UserRepository>,
    Arc<dyn RoomRepository>,
    Arc<dyn MessageStore>,
);

async fn connect_stores(config: &AppConfig) -> Result<Stores, Box<dyn std::error::Error>> {
    match &config.database_url {
        Some(database_url) => {
            let pool = sqlx::PgPool::connect(database_url).await?;
            sqlx::migrate!("./migrations").run(&pool).await?;
            info!("Using PostgreSQL stores");
            Ok((
                Arc::new(PostgresUserRepository::new(pool.clone())),
                Arc::new(PostgresRoomRepository::new(pool.clone())),
                Arc::new(PostgresMessageStore::new(pool)),
            ))
        }
        None => {
            info!("DATABASE_URL not set, using in-memory stores");
            Ok((
                Arc::new(InMemoryUserRepository::new()),
                Arc::new(InMemoryRoomRepository::new()),
                Arc::new(InMemoryMessageStore::new()),
            ))
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "lingoroom=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting LingoRoom relay");

    let config = Arc::new(AppConfig::from_env());
    let token_config = TokenConfig::new();
    let (users, rooms, messages) = connect_stores(&config).await?;

    let translation = build_translation_provider(&config);
    let speech = build_speech_provider(&config);
    info!(
        translation = translation.name(),
        speech = speech.name(),
        "Providers selected"
    );

    let hub: Arc<dyn ConnectionHub> = Arc::new(InMemoryConnectionHub::new(Arc::new(
        JwtAuthVerifier::new(token_config.clone()),
    )));
    let orchestrator = Arc::new(TranslationOrchestrator::new(
        hub.clone(),
        Arc::new(LanguageRouter::new(users.clone(), rooms.clone())),
        BatchTranslator::new(translation, config.provider_timeout),
        users.clone(),
        messages.clone(),
    ));
    let ingest = Arc::new(IngestService::new(
        rooms.clone(),
        users.clone(),
        messages.clone(),
        hub.clone(),
        orchestrator,
        speech,
        &config,
    ));

    tokio::spawn(start_transcript_sweeper(
        ingest.transcripts(),
        TRANSCRIPT_SWEEP_INTERVAL,
    ));

    let app_state = AppState::new(
        config.clone(),
        token_config,
        users,
        rooms,
        messages,
        hub,
        ingest,
    );
    let app = build_router(app_state);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    info!("Server running on http://{}", config.bind_addr);
    axum::serve(listener, app).await?;
    Ok(())
}

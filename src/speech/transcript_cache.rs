use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::{interval, Instant};
use tracing::{debug, info, instrument};
use uuid::Uuid;

/// A recognized transcript waiting for the speaker to confirm it
#[derive(Debug, Clone, PartialEq)]
pub struct StagedTranscript {
    pub id: String,
    pub room_id: String,
    pub user_id: String,
    pub transcript: String,
    pub confidence: f64,
    pub detected_lang: String,
    pub staged_at: Instant,
}

impl StagedTranscript {
    pub fn new(
        room_id: impl Into<String>,
        user_id: impl Into<String>,
        transcript: impl Into<String>,
        confidence: f64,
        detected_lang: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            room_id: room_id.into(),
            user_id: user_id.into(),
            transcript: transcript.into(),
            confidence,
            detected_lang: detected_lang.into(),
            staged_at: Instant::now(),
        }
    }
}

/// Bounded store of staged transcripts.
///
/// Entries expire `ttl` after staging. When full, the oldest entry is evicted
/// to make room for a new one.
pub struct TranscriptCache {
    entries: Mutex<HashMap<String, StagedTranscript>>,
    ttl: Duration,
    capacity: usize,
}

impl TranscriptCache {
    pub fn new(ttl: Duration, capacity: usize) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            ttl,
            capacity: capacity.max(1),
        }
    }

    fn is_expired(&self, entry: &StagedTranscript, now: Instant) -> bool {
        now.duration_since(entry.staged_at) >= self.ttl
    }

    /// Stores the entry and returns its id
    pub async fn insert(&self, entry: StagedTranscript) -> String {
        let now = Instant::now();
        let mut entries = self.entries.lock().await;
        entries.retain(|_, e| !self.is_expired(e, now));

        while entries.len() >= self.capacity {
            let oldest = entries
                .values()
                .min_by_key(|e| e.staged_at)
                .map(|e| e.id.clone());
            match oldest {
                Some(id) => {
                    debug!(transcript_id = %id, "Evicting oldest staged transcript");
                    entries.remove(&id);
                }
                None => break,
            }
        }

        let id = entry.id.clone();
        entries.insert(id.clone(), entry);
        id
    }

    pub async fn get(&self, id: &str) -> Option<StagedTranscript> {
        let entries = self.entries.lock().await;
        entries
            .get(id)
            .filter(|e| !self.is_expired(e, Instant::now()))
            .cloned()
    }

    /// Removes and returns a live entry
    pub async fn take(&self, id: &str) -> Option<StagedTranscript> {
        let entry = self.entries.lock().await.remove(id)?;
        if self.is_expired(&entry, Instant::now()) {
            return None;
        }
        Some(entry)
    }

    pub async fn remove(&self, id: &str) -> bool {
        self.entries.lock().await.remove(id).is_some()
    }

    /// Drops expired entries, returning how many were removed
    pub async fn purge_expired(&self) -> usize {
        let now = Instant::now();
        let mut entries = self.entries.lock().await;
        let before = entries.len();
        entries.retain(|_, e| !self.is_expired(e, now));
        before - entries.len()
    }

    pub async fn len(&self) -> usize {
        self.entries.lock().await.len()
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }
}

/// Periodically purges expired transcripts; runs until the runtime stops
#[instrument(skip(cache))]
pub async fn start_transcript_sweeper(cache: Arc<TranscriptCache>, every: Duration) {
    info!(
        sweep_interval_secs = every.as_secs(),
        ttl_secs = cache.ttl().as_secs(),
        "Starting staged transcript sweeper"
    );

    let mut ticker = interval(every);
    loop {
        ticker.tick().await;

        let purged = cache.purge_expired().await;
        if purged > 0 {
            debug!(purged, "Expired staged transcripts removed");
        }
    }
}

//! Test assertion helpers for reading what a connection received
#![allow(dead_code)] // Test utilities may not all be used in every test

use serde_json::Value;
use std::time::Duration;
use tokio::sync::mpsc::UnboundedReceiver;

use lingoroom::websockets::Outbound;

// ============================================================================
// Assertion Helpers
// ============================================================================

/// Frames drained from one client queue
pub struct ReceivedFrames {
    pub events: Vec<Value>,
    pub closes: Vec<(u16, String)>,
}

impl ReceivedFrames {
    /// Takes everything currently queued without waiting
    pub fn drain(rx: &mut UnboundedReceiver<Outbound>) -> Self {
        let mut events = Vec::new();
        let mut closes = Vec::new();
        while let Ok(frame) = rx.try_recv() {
            match frame {
                Outbound::Text(text) => events.push(serde_json::from_str(&text).unwrap()),
                Outbound::Close { code, reason } => closes.push((code, reason)),
            }
        }
        Self { events, closes }
    }

    pub fn types(&self) -> Vec<String> {
        self.events
            .iter()
            .map(|e| e["type"].as_str().unwrap_or_default().to_string())
            .collect()
    }

    pub fn of_type(&self, event_type: &str) -> Vec<&Value> {
        self.events
            .iter()
            .filter(|e| e["type"] == event_type)
            .collect()
    }

    /// The single event of `event_type`, failing if there is not exactly one
    pub fn only(&self, event_type: &str) -> &Value {
        let matching = self.of_type(event_type);
        assert_eq!(
            matching.len(),
            1,
            "expected exactly one {} event, got {:?}",
            event_type,
            self.types()
        );
        matching[0]
    }

    pub fn assert_all_timestamped(&self) {
        for event in &self.events {
            assert!(
                event["timestamp"].is_string(),
                "event without timestamp: {}",
                event
            );
        }
    }
}

/// Waits until a frame of `event_type` arrives, returning everything received up to it
pub async fn wait_for_event(
    rx: &mut UnboundedReceiver<Outbound>,
    event_type: &str,
) -> Vec<Value> {
    let mut seen = Vec::new();
    let deadline = tokio::time::timeout(Duration::from_secs(5), async {
        while let Some(frame) = rx.recv().await {
            if let Outbound::Text(text) = frame {
                let value: Value = serde_json::from_str(&text).unwrap();
                let done = value["type"] == event_type;
                seen.push(value);
                if done {
                    return;
                }
            }
        }
    })
    .await;
    assert!(deadline.is_ok(), "timed out waiting for {}", event_type);
    seen
}

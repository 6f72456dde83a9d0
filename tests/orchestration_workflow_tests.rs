use std::sync::Arc;
use std::time::Duration;

use lingoroom::{
    ingest::{AudioClip, IngestOutcome, StageOutcome},
    message::MessageStore,
    shared::AppError,
    speech::FilterReason,
};

mod utils;

use utils::*;

fn webm(len: usize) -> AudioClip {
    AudioClip {
        bytes: vec![0u8; len],
        content_type: "audio/webm".to_string(),
    }
}

#[tokio::test]
async fn test_duplicate_languages_translated_once() {
    let harness = RelayHarnessBuilder::new().build().await;
    let speaker = harness.add_user("sora", "ja", None).await;
    let ann = harness.add_user("ann", "en", None).await;
    let bo = harness.add_user("bo", "en", None).await;
    let chloe = harness.add_user("chloe", "fr", None).await;

    let _rx_ann = harness.connect(&ann.id).await;
    let _rx_bo = harness.connect(&bo.id).await;
    let _rx_chloe = harness.connect(&chloe.id).await;

    let report = harness
        .orchestrator
        .process(harness.job(&speaker.id, "こんにちは", "ja"))
        .await
        .unwrap();

    assert_eq!(harness.provider.calls_for("en").await, 1);
    assert_eq!(harness.provider.calls_for("fr").await, 1);
    assert_eq!(harness.provider.calls().await.len(), 2);
    assert_eq!(report.personal_deliveries, 3);
    assert_eq!(report.board_recipients, 3);
}

#[tokio::test]
async fn test_speaker_board_language_matches_source() {
    let harness = RelayHarnessBuilder::new().with_board_lang("en").build().await;
    let speaker = harness.add_user("sora", "ja", Some("ja")).await;
    let ann = harness.add_user("ann", "en", None).await;
    let bo = harness.add_user("bo", "fr", None).await;

    let mut rx_ann = harness.connect(&ann.id).await;
    let mut rx_bo = harness.connect(&bo.id).await;

    let job = harness.job(&speaker.id, "こんにちは", "ja");
    let message_id = job.message_id.clone();
    harness.orchestrator.process(job).await.unwrap();

    let mut calls = harness.provider.calls().await;
    calls.sort();
    assert_eq!(calls, vec!["en", "fr"]);

    let ann_frames = ReceivedFrames::drain(&mut rx_ann);
    let subtitle = ann_frames.only("personal.subtitle");
    assert_eq!(subtitle["targetLang"], "en");
    assert_eq!(subtitle["text"], "[en] こんにちは");
    assert_eq!(subtitle["speakerName"], "sora");

    let board = ann_frames.only("board.post");
    assert_eq!(board["targetLang"], "ja");
    assert_eq!(board["text"], "こんにちは");
    assert_eq!(board["speakerId"], speaker.id.as_str());
    ann_frames.assert_all_timestamped();

    let bo_frames = ReceivedFrames::drain(&mut rx_bo);
    assert_eq!(bo_frames.only("personal.subtitle")["targetLang"], "fr");
    assert_eq!(bo_frames.only("board.post")["text"], "こんにちは");

    let stored = harness
        .messages
        .get_message_translations(&message_id)
        .await
        .unwrap();
    let ja = stored.iter().find(|r| r.target_lang == "ja").unwrap();
    assert_eq!(ja.text, "こんにちは");
    assert_eq!(ja.quality, 1.0);
    assert_eq!(ja.latency_ms, 0);
    assert_eq!(stored.len(), 3);
}

#[tokio::test]
async fn test_timed_out_language_degrades_without_blocking_others() {
    let provider = CountingTranslationProvider::new().delayed_for("fr", Duration::from_millis(500));
    let harness = RelayHarnessBuilder::new()
        .with_provider(provider)
        .with_provider_timeout(Duration::from_millis(100))
        .build()
        .await;
    let speaker = harness.add_user("sora", "ja", Some("ja")).await;
    let ann = harness.add_user("ann", "en", None).await;
    let bo = harness.add_user("bo", "fr", None).await;

    let mut rx_ann = harness.connect(&ann.id).await;
    let mut rx_bo = harness.connect(&bo.id).await;

    let job = harness.job(&speaker.id, "おはよう", "ja");
    let message_id = job.message_id.clone();
    let report = harness.orchestrator.process(job).await.unwrap();
    assert_eq!(report.degraded, 1);

    let stored = harness
        .messages
        .get_message_translations(&message_id)
        .await
        .unwrap();
    let fr = stored.iter().find(|r| r.target_lang == "fr").unwrap();
    assert_eq!(fr.text, "おはよう");
    assert_eq!(fr.quality, 0.0);
    let en = stored.iter().find(|r| r.target_lang == "en").unwrap();
    assert_eq!(en.text, "[en] おはよう");
    assert!(en.quality > 0.0);

    let bo_frames = ReceivedFrames::drain(&mut rx_bo);
    assert_eq!(bo_frames.only("personal.subtitle")["text"], "おはよう");
    bo_frames.only("board.post");

    let ann_frames = ReceivedFrames::drain(&mut rx_ann);
    assert_eq!(ann_frames.only("personal.subtitle")["text"], "[en] おはよう");
    assert_eq!(
        ann_frames.only("translation.completed")["translationsCount"],
        3
    );
}

#[tokio::test]
async fn test_failed_language_stores_original_text() {
    let provider = CountingTranslationProvider::new().failing_for("fr");
    let harness = RelayHarnessBuilder::new().with_provider(provider).build().await;
    let speaker = harness.add_user("ann", "en", None).await;
    let bo = harness.add_user("bo", "fr", None).await;
    let _rx_bo = harness.connect(&bo.id).await;

    let job = harness.job(&speaker.id, "see you tomorrow", "en");
    let message_id = job.message_id.clone();
    let report = harness.orchestrator.process(job).await.unwrap();

    assert_eq!(report.translations, 2);
    assert_eq!(report.degraded, 1);
    let stored = harness
        .messages
        .get_message_translations(&message_id)
        .await
        .unwrap();
    let fr = stored.iter().find(|r| r.target_lang == "fr").unwrap();
    assert_eq!(fr.text, "see you tomorrow");
    assert_eq!(fr.quality, 0.0);
}

#[tokio::test]
async fn test_boilerplate_speech_is_filtered() {
    let harness = RelayHarnessBuilder::new()
        .with_speech(Arc::new(ScriptedSpeechProvider::new("謝謝大家", "zh-TW")))
        .build()
        .await;
    let speaker = harness.add_user("mei", "zh-TW", None).await;
    let listener = harness.add_user("ann", "en", None).await;
    let mut rx = harness.connect(&listener.id).await;

    let result = harness
        .ingest
        .ingest_speech(&speaker.id, &harness.room.id, webm(4_000), "zh-TW")
        .await
        .unwrap();

    assert_eq!(
        result.outcome,
        IngestOutcome::Filtered(FilterReason::Boilerplate)
    );
    assert_eq!(harness.messages.message_count().await, 0);

    tokio::time::sleep(Duration::from_millis(50)).await;
    let frames = ReceivedFrames::drain(&mut rx);
    assert_eq!(frames.types(), vec!["connection.established"]);
    assert!(harness.provider.calls().await.is_empty());
}

#[tokio::test]
async fn test_text_ingest_delivers_in_order() {
    let harness = RelayHarnessBuilder::new().build().await;
    let speaker = harness.add_user("ann", "en", None).await;
    let listener = harness.add_user("yuki", "ja", None).await;
    let mut rx = harness.connect(&listener.id).await;

    let outcome = harness
        .ingest
        .ingest_text(&speaker.id, &harness.room.id, "good morning", None, true)
        .await
        .unwrap();
    let IngestOutcome::Accepted(message) = outcome else {
        panic!("text should have been accepted");
    };
    assert_eq!(message.source_lang, "en");

    let events = wait_for_event(&mut rx, "translation.completed").await;
    let types: Vec<&str> = events.iter().map(|e| e["type"].as_str().unwrap()).collect();
    assert_eq!(
        types,
        vec![
            "connection.established",
            "personal.subtitle",
            "board.post",
            "translation.completed"
        ]
    );
    assert_eq!(events[1]["text"], "[ja] good morning");
    assert_eq!(events[2]["text"], "good morning");
    assert_eq!(events[3]["messageId"], message.id.as_str());
}

#[tokio::test]
async fn test_partial_text_is_stored_but_not_translated() {
    let harness = RelayHarnessBuilder::new().build().await;
    let speaker = harness.add_user("ann", "en", None).await;
    let listener = harness.add_user("yuki", "ja", None).await;
    let mut rx = harness.connect(&listener.id).await;

    let outcome = harness
        .ingest
        .ingest_text(&speaker.id, &harness.room.id, "good mor", Some("en"), false)
        .await
        .unwrap();

    assert!(matches!(outcome, IngestOutcome::Accepted(ref m) if !m.is_final));
    assert_eq!(harness.messages.message_count().await, 1);

    tokio::time::sleep(Duration::from_millis(50)).await;
    assert_eq!(
        ReceivedFrames::drain(&mut rx).types(),
        vec!["connection.established"]
    );
    assert!(harness.provider.calls().await.is_empty());
}

#[tokio::test]
async fn test_staged_transcript_confirmation() {
    let harness = RelayHarnessBuilder::new()
        .with_speech(Arc::new(ScriptedSpeechProvider::new(
            "let's start the meeting",
            "en",
        )))
        .build()
        .await;
    let speaker = harness.add_user("ann", "en", None).await;
    let listener = harness.add_user("yuki", "ja", None).await;
    let mut rx = harness.connect(&listener.id).await;

    let StageOutcome::Staged(staged) = harness
        .ingest
        .stage_transcript(&speaker.id, &harness.room.id, webm(2_000), "zh-TW")
        .await
        .unwrap()
    else {
        panic!("transcript should have been staged");
    };
    assert_eq!(staged.detected_lang, "en");

    let preview = ReceivedFrames::drain(&mut rx);
    let event = preview.only("stt.preview");
    assert_eq!(event["transcriptId"], staged.id.as_str());
    assert_eq!(event["speakerName"], "ann");
    assert_eq!(event["status"], "awaiting_confirmation");
    assert_eq!(harness.messages.message_count().await, 0);

    let confirmed = harness
        .ingest
        .confirm_transcript(
            &speaker.id,
            &staged.id,
            &harness.room.id,
            "Let's start the meeting now",
            None,
        )
        .await
        .unwrap();
    assert_eq!(confirmed.message.text, "Let's start the meeting now");
    assert_eq!(confirmed.message.source_lang, "en");
    // ja for the listener plus en on the board
    assert_eq!(confirmed.translations_count, 2);

    let events = wait_for_event(&mut rx, "translation.completed").await;
    assert_eq!(events[0]["text"], "[ja] Let's start the meeting now");

    let gone = harness.ingest.get_transcript(&speaker.id, &staged.id).await;
    assert!(matches!(gone, Err(AppError::NotFound(_))));
}

#[tokio::test]
async fn test_staged_transcript_belongs_to_its_speaker() {
    let harness = RelayHarnessBuilder::new()
        .with_speech(Arc::new(ScriptedSpeechProvider::new("quarterly numbers", "en")))
        .build()
        .await;
    let speaker = harness.add_user("ann", "en", None).await;
    let other = harness.add_user("bo", "fr", None).await;

    let StageOutcome::Staged(staged) = harness
        .ingest
        .stage_transcript(&speaker.id, &harness.room.id, webm(2_000), "en")
        .await
        .unwrap()
    else {
        panic!("transcript should have been staged");
    };

    let stolen = harness
        .ingest
        .confirm_transcript(&other.id, &staged.id, &harness.room.id, "hijack", None)
        .await;
    assert!(matches!(stolen, Err(AppError::Forbidden(_))));

    let cancel = harness.ingest.cancel_transcript(&other.id, &staged.id).await;
    assert!(matches!(cancel, Err(AppError::Forbidden(_))));

    let empty = harness
        .ingest
        .confirm_transcript(&speaker.id, &staged.id, &harness.room.id, "   ", None)
        .await;
    assert!(matches!(empty, Err(AppError::BadRequest(_))));

    harness
        .ingest
        .cancel_transcript(&speaker.id, &staged.id)
        .await
        .unwrap();
    let gone = harness.ingest.get_transcript(&speaker.id, &staged.id).await;
    assert!(matches!(gone, Err(AppError::NotFound(_))));
}

#[tokio::test]
async fn test_double_confirmation_stores_one_message() {
    let harness = RelayHarnessBuilder::new()
        .with_speech(Arc::new(ScriptedSpeechProvider::new("ship it today", "en")))
        .build()
        .await;
    let speaker = harness.add_user("ann", "en", None).await;
    let listener = harness.add_user("yuki", "ja", None).await;
    let mut rx = harness.connect(&listener.id).await;

    let StageOutcome::Staged(staged) = harness
        .ingest
        .stage_transcript(&speaker.id, &harness.room.id, webm(2_000), "en")
        .await
        .unwrap()
    else {
        panic!("transcript should have been staged");
    };

    let (first, second) = tokio::join!(
        harness.ingest.confirm_transcript(
            &speaker.id,
            &staged.id,
            &harness.room.id,
            "ship it today",
            None
        ),
        harness.ingest.confirm_transcript(
            &speaker.id,
            &staged.id,
            &harness.room.id,
            "ship it today",
            None
        ),
    );

    let results = [first, second];
    assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 1);
    assert_eq!(
        results
            .iter()
            .filter(|r| matches!(r, Err(AppError::NotFound(_))))
            .count(),
        1
    );
    assert_eq!(harness.messages.message_count().await, 1);

    wait_for_event(&mut rx, "translation.completed").await;
    tokio::time::sleep(Duration::from_millis(50)).await;
    assert!(ReceivedFrames::drain(&mut rx)
        .of_type("translation.completed")
        .is_empty());
}

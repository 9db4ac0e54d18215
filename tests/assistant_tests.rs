// Feature assistant behaviour: supersession, memoization, fallback advice
// Author: kelexine (https://github.com/kelexine)

mod common;

use common::ScriptedProvider;
use petcare_assist::cache::{ManualClock, MediaKeyStrategy, ResponseMemoizer};
use petcare_assist::config::GeminiConfig;
use petcare_assist::error::AssistError;
use petcare_assist::features::{FeatureAssistant, FeatureKind, FeatureProfile};
use petcare_assist::surface::{Delivery, Role, Surface, TurnKind};
use petcare_assist::vision::{MediaKind, MediaUpload};
use std::sync::Arc;
use std::time::Duration;

const TTL: Duration = Duration::from_secs(300);

// Tiny 1x1 PNG
const PNG_DATA: &str = "iVBORw0KGgoAAAANSUhEUgAAAAEAAAABCAYAAAAfFcSJAAAADUlEQVR42mNk+M9QDwADhgGAWjR9awAAAABJRU5ErkJggg==";

struct Harness {
    provider: Arc<ScriptedProvider>,
    clock: Arc<ManualClock>,
    memoizer: Arc<ResponseMemoizer>,
}

impl Harness {
    fn new() -> Self {
        let clock = Arc::new(ManualClock::new());
        Self {
            provider: ScriptedProvider::new(),
            memoizer: Arc::new(ResponseMemoizer::with_clock(TTL, clock.clone())),
            clock,
        }
    }

    fn assistant(&self, kind: FeatureKind) -> Arc<FeatureAssistant> {
        Arc::new(FeatureAssistant::new(
            FeatureProfile::for_kind(kind, &GeminiConfig::default()),
            self.provider.clone(),
            self.memoizer.clone(),
        ))
    }
}

#[tokio::test]
async fn test_latest_submission_wins() {
    let h = Harness::new();
    let assistant = h.assistant(FeatureKind::Symptoms);
    let surface = Arc::new(Surface::new(FeatureKind::Symptoms));

    let first_reply = h.provider.script();
    let second_reply = h.provider.script();

    let first = tokio::spawn({
        let (assistant, surface) = (assistant.clone(), surface.clone());
        async move { assistant.ask(&surface, "vomiting").await }
    });
    h.provider.wait_for_calls(1).await;

    let second = tokio::spawn({
        let (assistant, surface) = (assistant.clone(), surface.clone());
        async move { assistant.ask(&surface, "lethargic").await }
    });
    h.provider.wait_for_calls(2).await;

    second_reply.send(Ok("R2".to_string())).unwrap();
    let delivered = second.await.unwrap().unwrap();
    assert_eq!(delivered.delivered().map(|t| t.content), Some("R2".to_string()));

    // The first call was aborted; releasing its reply changes nothing
    let _ = first_reply.send(Ok("R1".to_string()));
    assert_eq!(first.await.unwrap().unwrap(), Delivery::Discarded);

    let contents: Vec<String> = surface.turns().into_iter().map(|t| t.content).collect();
    assert_eq!(contents, vec!["vomiting", "lethargic", "R2"]);
    assert!(!surface.status().is_loading);
}

#[tokio::test]
async fn test_superseded_failure_is_silent() {
    let h = Harness::new();
    let assistant = h.assistant(FeatureKind::Behavior);
    let surface = Arc::new(Surface::new(FeatureKind::Behavior));

    let first_reply = h.provider.script();
    let second_reply = h.provider.script();

    let first = tokio::spawn({
        let (assistant, surface) = (assistant.clone(), surface.clone());
        async move { assistant.ask(&surface, "barking at night").await }
    });
    h.provider.wait_for_calls(1).await;

    let second = tokio::spawn({
        let (assistant, surface) = (assistant.clone(), surface.clone());
        async move { assistant.ask(&surface, "chewing furniture").await }
    });
    h.provider.wait_for_calls(2).await;

    let _ = first_reply.send(Err(AssistError::Provider("socket closed".to_string())));
    assert_eq!(first.await.unwrap().unwrap(), Delivery::Discarded);

    second_reply.send(Ok("Redirect to chew toys".to_string())).unwrap();
    assert!(second.await.unwrap().unwrap().is_delivered());

    let turns = surface.turns();
    assert!(turns.iter().all(|t| t.kind == TurnKind::Message));
    assert_eq!(turns.last().unwrap().content, "Redirect to chew toys");
}

#[tokio::test]
async fn test_repeat_question_served_from_cache() {
    let h = Harness::new();
    let assistant = h.assistant(FeatureKind::Symptoms);
    let surface = Surface::new(FeatureKind::Symptoms);

    h.provider.answer("Rest the leg and see a vet if it persists");
    let first = assistant.ask(&surface, "Limping").await.unwrap().delivered().unwrap();

    h.clock.advance(Duration::from_secs(60));
    let second = assistant.ask(&surface, "  limping ").await.unwrap().delivered().unwrap();

    assert_eq!(h.provider.call_count(), 1);
    assert_eq!(first.content, second.content);
    assert_eq!(surface.turns().len(), 4);
    assert_eq!(h.memoizer.stats().hits, 1);
}

#[tokio::test]
async fn test_expired_entry_calls_provider_again() {
    let h = Harness::new();
    let assistant = h.assistant(FeatureKind::Symptoms);
    let surface = Surface::new(FeatureKind::Symptoms);

    h.provider.answer("first answer");
    h.provider.answer("fresh answer");

    assistant.ask(&surface, "limping").await.unwrap();
    h.clock.advance(Duration::from_secs(301));
    let reply = assistant.ask(&surface, "limping").await.unwrap().delivered().unwrap();

    assert_eq!(h.provider.call_count(), 2);
    assert_eq!(reply.content, "fresh answer");
}

#[tokio::test]
async fn test_features_do_not_share_answers() {
    let h = Harness::new();
    let symptoms = h.assistant(FeatureKind::Symptoms);
    let first_aid = h.assistant(FeatureKind::FirstAid);

    h.provider.answer("triage");
    h.provider.answer("apply pressure");

    symptoms
        .ask(&Surface::new(FeatureKind::Symptoms), "bleeding paw")
        .await
        .unwrap();
    let reply = first_aid
        .ask(&Surface::new(FeatureKind::FirstAid), "bleeding paw")
        .await
        .unwrap()
        .delivered()
        .unwrap();

    assert_eq!(h.provider.call_count(), 2);
    assert_eq!(reply.content, "apply pressure");
    assert!(reply.emergency);
}

#[tokio::test]
async fn test_failure_shows_single_advisory() {
    let h = Harness::new();
    let assistant = h.assistant(FeatureKind::FirstAid);
    let surface = Surface::new(FeatureKind::FirstAid);

    h.provider
        .fail(AssistError::Provider("HTTP 500: upstream exploded".to_string()));
    let turn = assistant
        .ask(&surface, "dog ate chocolate")
        .await
        .unwrap()
        .delivered()
        .unwrap();

    assert_eq!(turn.kind, TurnKind::Advisory);
    assert_eq!(turn.role, Role::Assistant);
    assert!(turn.content.contains("contact your veterinarian immediately"));
    assert!(!turn.content.contains("exploded"));

    let advisories = surface
        .turns()
        .iter()
        .filter(|t| t.kind == TurnKind::Advisory)
        .count();
    assert_eq!(advisories, 1);
    // Failures are not memoized
    assert!(h.memoizer.is_empty());
}

#[tokio::test]
async fn test_empty_input_makes_no_call() {
    let h = Harness::new();
    let assistant = h.assistant(FeatureKind::Behavior);
    let surface = Surface::new(FeatureKind::Behavior);

    let result = assistant.ask(&surface, "   ").await;

    assert!(matches!(result, Err(AssistError::InvalidInput(_))));
    assert_eq!(h.provider.call_count(), 0);
    assert!(surface.turns().is_empty());
    assert!(!surface.status().is_loading);
}

#[tokio::test]
async fn test_empty_input_leaves_pending_request_alone() {
    let h = Harness::new();
    let assistant = h.assistant(FeatureKind::Symptoms);
    let surface = Arc::new(Surface::new(FeatureKind::Symptoms));

    let reply = h.provider.script();
    let pending = tokio::spawn({
        let (assistant, surface) = (assistant.clone(), surface.clone());
        async move { assistant.ask(&surface, "sneezing").await }
    });
    h.provider.wait_for_calls(1).await;

    assert!(assistant.ask(&surface, "").await.is_err());

    reply.send(Ok("Likely allergies".to_string())).unwrap();
    assert!(pending.await.unwrap().unwrap().is_delivered());
}

#[tokio::test]
async fn test_deadline_expiry_becomes_advisory() {
    let h = Harness::new();
    let assistant = FeatureAssistant::new(
        FeatureProfile::for_kind(FeatureKind::Symptoms, &GeminiConfig::default()),
        h.provider.clone(),
        h.memoizer.clone(),
    )
    .with_deadline(Duration::from_millis(50));
    let surface = Surface::new(FeatureKind::Symptoms);

    // Never released
    let _held = h.provider.script();
    let turn = assistant
        .ask(&surface, "coughing")
        .await
        .unwrap()
        .delivered()
        .unwrap();

    assert_eq!(turn.kind, TurnKind::Advisory);
    assert!(!surface.status().is_loading);
}

#[tokio::test]
async fn test_media_analysis_and_cache() {
    let h = Harness::new();
    let assistant = h.assistant(FeatureKind::Media);
    let surface = Surface::new(FeatureKind::Media);
    let upload = MediaUpload {
        data: format!("data:image/png;base64,{}", PNG_DATA),
        kind: MediaKind::Image,
    };

    h.provider.answer("Relaxed posture, healthy coat");
    let first = assistant.analyze_media(&surface, &upload).await.unwrap();
    let second = assistant.analyze_media(&surface, &upload).await.unwrap();

    assert_eq!(h.provider.call_count(), 1);
    assert_eq!(first.delivered().unwrap().content, "Relaxed posture, healthy coat");
    assert!(second.is_delivered());

    let call = &h.provider.calls()[0];
    let media = call.media.as_ref().unwrap();
    assert_eq!(media.mime_type, "image/png");
    assert_eq!(media.data, PNG_DATA);
    assert!(call.prompt.contains("Analyze this pet photo"));
    assert_eq!(call.model, GeminiConfig::default().media_model);
}

#[tokio::test]
async fn test_media_failure_sets_error_flag() {
    let h = Harness::new();
    let assistant = h.assistant(FeatureKind::Media);
    let surface = Surface::new(FeatureKind::Media);

    h.provider
        .fail(AssistError::ServiceUnavailable("model overloaded".to_string()));
    let upload = MediaUpload {
        data: PNG_DATA.to_string(),
        kind: MediaKind::Image,
    };
    let advisory = assistant
        .analyze_media(&surface, &upload)
        .await
        .unwrap()
        .delivered()
        .unwrap();

    assert_eq!(advisory.content, "Failed to analyze the image. Please try again.");
    assert_eq!(
        surface.status().error.as_deref(),
        Some("Failed to analyze the image. Please try again.")
    );
    assert!(surface.turns().is_empty());
}

#[tokio::test]
async fn test_digest_keys_tell_similar_uploads_apart() {
    let h = Harness::new();
    let assistant = FeatureAssistant::new(
        FeatureProfile::for_kind(FeatureKind::Media, &GeminiConfig::default()),
        h.provider.clone(),
        h.memoizer.clone(),
    )
    .with_media_keys(MediaKeyStrategy::Digest);
    let surface = Surface::new(FeatureKind::Media);

    // Same first 100 characters, different tails
    let shared = "A".repeat(120);
    let a = MediaUpload {
        data: format!("data:image/jpeg;base64,{}QUJD", shared),
        kind: MediaKind::Image,
    };
    let b = MediaUpload {
        data: format!("data:image/jpeg;base64,{}REVG", shared),
        kind: MediaKind::Image,
    };

    h.provider.answer("first");
    h.provider.answer("second");
    assistant.analyze_media(&surface, &a).await.unwrap();
    let reply = assistant.analyze_media(&surface, &b).await.unwrap();

    assert_eq!(h.provider.call_count(), 2);
    assert_eq!(reply.delivered().unwrap().content, "second");
}

#[tokio::test]
async fn test_media_rejected_on_chat_feature() {
    let h = Harness::new();
    let assistant = h.assistant(FeatureKind::Symptoms);
    let upload = MediaUpload {
        data: PNG_DATA.to_string(),
        kind: MediaKind::Image,
    };

    let result = assistant
        .analyze_media(&Surface::new(FeatureKind::Symptoms), &upload)
        .await;
    assert!(matches!(result, Err(AssistError::InvalidInput(_))));
    assert_eq!(h.provider.call_count(), 0);
}

#[tokio::test]
async fn test_text_question_rejected_on_media_feature() {
    let h = Harness::new();
    let assistant = h.assistant(FeatureKind::Media);
    let surface = Surface::new(FeatureKind::Media);

    let result = assistant.ask(&surface, "what breed is this?").await;

    assert!(matches!(result, Err(AssistError::InvalidInput(_))));
    assert_eq!(h.provider.call_count(), 0);
    assert!(surface.turns().is_empty());
    assert!(!surface.status().is_loading);
}

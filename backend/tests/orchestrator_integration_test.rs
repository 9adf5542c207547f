//! Integration tests for the itinerary, hidden spots and briefing orchestrators
//!
//! All tests run against the scripted `StubService`, so no network access is
//! needed.

mod common;

use common::{
    gems_json, kyoto_plan_json, plan_json_with_month, plan_json_with_scores, stub_context,
    ImageMode, StubService,
};
use std::sync::Arc;
use tempfile::TempDir;
use travel_scout_backend::error::{AppError, ErrorKind};
use travel_scout_backend::orchestrator::plan_types::{AspectRatio, Confidence, GroundedText, MapSource};
use travel_scout_backend::orchestrator::{
    run_briefing, run_hidden_spots, run_itinerary, EventSink, Generation, ImageStatus,
    ScoutEvent, MAX_HIDDEN_GEMS, PREVIEW_COUNT,
};
use travel_scout_backend::services::FileService;
use travel_scout_backend::state::ScoutState;

#[tokio::test]
async fn test_kyoto_plan_fields_and_order() {
    let dir = TempDir::new().unwrap();
    let stub = Arc::new(StubService::new());
    stub.push_structured(Ok(kyoto_plan_json()));
    let ctx = stub_context(stub.clone(), dir.path());

    let outcome = run_itinerary(&ctx, Generation(1), "Kyoto, Japan", &EventSink::detached()).await;
    let plan = outcome.plan.as_ref().unwrap();

    assert_eq!(plan.confidence_level(), Confidence::High);
    assert_eq!(plan.disaster_profile.risk_score, "6/10");
    assert_eq!(plan.itinerary.len(), 3);
    assert!(plan.itinerary[0].starts_with("Day 1"));
    assert!(plan.itinerary[2].starts_with("Day 3"));
    assert_eq!(plan.weather.crowd_curve.len(), 12);
    assert_eq!(plan.weather.crowd_curve[0].month, "January");
    assert_eq!(plan.weather.crowd_curve[11].month, "December");
    assert_eq!(plan.weather.crowd_curve[3].score, 95);
    assert_eq!(plan.photography.settings.notes.as_deref(), Some("Bring a polarizer"));
    assert_eq!(plan.trip_guide.tips, vec!["Buy an ICOCA card", "Carry cash"]);

    // Structured request carries the thinking budget and the location verbatim
    let requests = stub.structured_requests.lock().unwrap();
    assert_eq!(requests.len(), 1);
    assert!(requests[0].prompt.contains("Kyoto, Japan"));
    assert!(requests[0].thinking_budget.is_some());

    assert_eq!(outcome.preview_images().len(), PREVIEW_COUNT);
}

#[tokio::test]
async fn test_preview_requests_use_distinct_styles() {
    let dir = TempDir::new().unwrap();
    let stub = Arc::new(StubService::new());
    stub.push_structured(Ok(kyoto_plan_json()));
    let ctx = stub_context(stub.clone(), dir.path());

    run_itinerary(&ctx, Generation(1), "Kyoto, Japan", &EventSink::detached()).await;

    let requests = stub.image_requests.lock().unwrap();
    assert_eq!(requests.len(), 3);
    assert!(requests.iter().all(|r| r.aspect_ratio == Some(AspectRatio::Landscape)));
    assert_ne!(requests[0].prompt, requests[1].prompt);
    assert_ne!(requests[1].prompt, requests[2].prompt);
}

#[tokio::test]
async fn test_all_previews_failing_still_resolves_plan() {
    let dir = TempDir::new().unwrap();
    let stub = Arc::new(StubService::new());
    stub.push_structured(Ok(kyoto_plan_json()));
    stub.set_image_mode(ImageMode::Fail);
    let ctx = stub_context(stub.clone(), dir.path());

    let (events, mut rx) = EventSink::channel();
    let outcome = run_itinerary(&ctx, Generation(4), "Kyoto, Japan", &events).await;

    assert!(outcome.plan.is_ok());
    assert!(outcome.preview_images().is_empty());
    assert!(outcome
        .previews
        .iter()
        .all(|status| matches!(status, ImageStatus::Failed(_))));

    // One plan event and one event per slot, all tagged with the generation
    drop(events);
    let mut plan_events = 0;
    let mut slot_events = 0;
    while let Some(event) = rx.recv().await {
        match event {
            ScoutEvent::Plan { generation, .. } => {
                assert_eq!(generation, Generation(4));
                plan_events += 1;
            }
            ScoutEvent::PreviewImage { generation, .. } => {
                assert_eq!(generation, Generation(4));
                slot_events += 1;
            }
            other => panic!("unexpected event: {:?}", other),
        }
    }
    assert_eq!(plan_events, 1);
    assert_eq!(slot_events, PREVIEW_COUNT);
}

#[tokio::test]
async fn test_short_crowd_curve_is_malformed() {
    let dir = TempDir::new().unwrap();
    let stub = Arc::new(StubService::new());
    stub.push_structured(Ok(plan_json_with_scores(&[10; 11])));
    let ctx = stub_context(stub, dir.path());

    let outcome = run_itinerary(&ctx, Generation(1), "Kyoto, Japan", &EventSink::detached()).await;
    assert_eq!(outcome.plan.unwrap_err().kind(), ErrorKind::MalformedResponse);
}

#[tokio::test]
async fn test_out_of_range_crowd_score_is_malformed() {
    let dir = TempDir::new().unwrap();
    let stub = Arc::new(StubService::new());
    let mut scores = [50u8; 12];
    scores[6] = 140;
    stub.push_structured(Ok(plan_json_with_scores(&scores)));
    let ctx = stub_context(stub, dir.path());

    let outcome = run_itinerary(&ctx, Generation(1), "Kyoto, Japan", &EventSink::detached()).await;
    assert_eq!(outcome.plan.unwrap_err().kind(), ErrorKind::MalformedResponse);
}

#[tokio::test]
async fn test_repeated_crowd_month_is_malformed() {
    let dir = TempDir::new().unwrap();
    let stub = Arc::new(StubService::new());
    stub.push_structured(Ok(plan_json_with_month("January")));
    let ctx = stub_context(stub, dir.path());

    let outcome = run_itinerary(&ctx, Generation(1), "Kyoto, Japan", &EventSink::detached()).await;
    let err = outcome.plan.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::MalformedResponse);
    assert!(err.to_string().contains("repeats month"));
}

#[tokio::test]
async fn test_unparseable_plan_is_malformed() {
    let dir = TempDir::new().unwrap();
    let stub = Arc::new(StubService::new());
    stub.push_structured(Ok("Sorry, I cannot help with that.".to_string()));
    let ctx = stub_context(stub, dir.path());

    let outcome = run_itinerary(&ctx, Generation(1), "Kyoto, Japan", &EventSink::detached()).await;
    assert_eq!(outcome.plan.unwrap_err().kind(), ErrorKind::MalformedResponse);
}

#[tokio::test]
async fn test_empty_location_makes_no_calls() {
    let dir = TempDir::new().unwrap();
    let stub = Arc::new(StubService::new());
    let ctx = stub_context(stub.clone(), dir.path());

    let outcome = run_itinerary(&ctx, Generation(1), "   ", &EventSink::detached()).await;
    assert_eq!(outcome.plan.unwrap_err().kind(), ErrorKind::InvalidInput);

    let gems = run_hidden_spots(&ctx, Generation(1), "", &EventSink::detached()).await;
    assert_eq!(gems.gems.unwrap_err().kind(), ErrorKind::InvalidInput);

    assert!(stub.structured_requests.lock().unwrap().is_empty());
    assert_eq!(stub.image_calls(), 0);
}

#[tokio::test]
async fn test_hidden_spots_truncated_to_five() {
    let dir = TempDir::new().unwrap();
    let stub = Arc::new(StubService::new());
    stub.push_structured(Ok(gems_json(8)));
    let ctx = stub_context(stub.clone(), dir.path());

    let outcome = run_hidden_spots(&ctx, Generation(1), "Lisbon", &EventSink::detached()).await;
    let gems = outcome.gems.unwrap();
    assert_eq!(gems.len(), MAX_HIDDEN_GEMS);
    assert_eq!(gems[0].name, "Spot 1");
    assert_eq!(gems[4].name, "Spot 5");
    assert_eq!(stub.image_calls(), MAX_HIDDEN_GEMS);
    assert_eq!(outcome.images.len(), MAX_HIDDEN_GEMS);
}

#[tokio::test]
async fn test_hidden_spots_three_upstream_three_results() {
    let dir = TempDir::new().unwrap();
    let stub = Arc::new(StubService::new());
    stub.push_structured(Ok(format!("```json\n{}\n```", gems_json(3))));
    stub.set_image_mode(ImageMode::Empty);
    let ctx = stub_context(stub.clone(), dir.path());

    let outcome = run_hidden_spots(&ctx, Generation(1), "Lisbon", &EventSink::detached()).await;
    assert_eq!(outcome.gems.as_ref().unwrap().len(), 3);
    // Missing images are recorded per gem without failing the list
    assert!(matches!(outcome.image_for("Spot 2"), Some(ImageStatus::Failed(_))));
    assert!(outcome.image_for("Spot 9").is_none());
}

#[tokio::test]
async fn test_hidden_spots_list_failure_skips_images() {
    let dir = TempDir::new().unwrap();
    let stub = Arc::new(StubService::new());
    stub.push_structured(Err(AppError::RateLimited("quota exhausted".to_string())));
    let ctx = stub_context(stub.clone(), dir.path());

    let outcome = run_hidden_spots(&ctx, Generation(1), "Lisbon", &EventSink::detached()).await;
    assert_eq!(outcome.gems.unwrap_err().kind(), ErrorKind::RateLimited);
    assert_eq!(stub.image_calls(), 0);
}

#[tokio::test]
async fn test_gem_list_event_precedes_gem_images() {
    let dir = TempDir::new().unwrap();
    let stub = Arc::new(StubService::new());
    stub.push_structured(Ok(gems_json(2)));
    let ctx = stub_context(stub, dir.path());

    let (events, mut rx) = EventSink::channel();
    run_hidden_spots(&ctx, Generation(2), "Lisbon", &events).await;
    drop(events);

    assert!(matches!(rx.recv().await, Some(ScoutEvent::Gems { .. })));
    let mut images = 0;
    while let Some(event) = rx.recv().await {
        assert!(matches!(event, ScoutEvent::GemImage { .. }));
        images += 1;
    }
    assert_eq!(images, 2);
}

#[tokio::test]
async fn test_briefing_returns_sources() {
    let dir = TempDir::new().unwrap();
    let stub = Arc::new(StubService::new());
    stub.push_text(Ok(GroundedText {
        text: "A coastal capital built on seven hills.".to_string(),
        sources: vec![MapSource {
            title: "Alfama".to_string(),
            uri: "https://maps.google.com/?cid=1".to_string(),
        }],
    }));
    let ctx = stub_context(stub, dir.path());

    let brief = run_briefing(&ctx, Generation(1), "Lisbon", &EventSink::detached())
        .await
        .unwrap();
    assert_eq!(brief.sources.len(), 1);
    assert_eq!(brief.sources[0].title, "Alfama");
}

#[tokio::test]
async fn test_events_drive_view_state() {
    let dir = TempDir::new().unwrap();
    let stub = Arc::new(StubService::new());
    stub.push_structured(Ok(kyoto_plan_json()));
    stub.push_structured(Ok(kyoto_plan_json()));
    let ctx = stub_context(stub, dir.path());

    let mut state = ScoutState::new("chat-model");
    let (events, mut rx) = EventSink::channel();

    let stale = state.begin_plan("Kyoto, Japan");
    run_itinerary(&ctx, stale, "Kyoto, Japan", &events).await;
    let current = state.begin_plan("Kyoto, Japan");
    run_itinerary(&ctx, current, "Kyoto, Japan", &events).await;
    drop(events);

    let mut applied = 0;
    let mut discarded = 0;
    while let Some(event) = rx.recv().await {
        if state.apply(event) {
            applied += 1;
        } else {
            discarded += 1;
        }
    }

    assert_eq!(applied, 1 + PREVIEW_COUNT);
    assert_eq!(discarded, 1 + PREVIEW_COUNT);
    assert!(state.plan.ready().is_some());
    assert_eq!(state.ready_previews().len(), PREVIEW_COUNT);
    assert!(state.chat.is_some());
}

#[tokio::test]
async fn test_plan_export_is_plain_text() {
    let dir = TempDir::new().unwrap();
    let stub = Arc::new(StubService::new());
    stub.push_structured(Ok(kyoto_plan_json()));
    let ctx = stub_context(stub, dir.path());

    let plan = run_itinerary(&ctx, Generation(1), "Kyoto, Japan", &EventSink::detached())
        .await
        .plan
        .unwrap();

    let path = FileService::save_plan(&ctx.config.export_dir, "Kyoto, Japan", &plan)
        .await
        .unwrap();
    let text = std::fs::read_to_string(&path).unwrap();
    assert!(text.contains("Kyoto, Japan"));
    assert!(text.contains("Day 2: Arashiyama bamboo grove and Tenryu-ji"));
    // The report is for reading, not for parsing back
    assert!(serde_json::from_str::<serde_json::Value>(&text).is_err());
}

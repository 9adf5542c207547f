//! Integration tests for the two-stage video pipeline
//!
//! Polling tests run with a paused clock, so the fixed interval is observed
//! exactly without real waiting.

mod common;

use common::{stub_context, test_config, ImageMode, StubService};
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;
use tokio_util::sync::CancellationToken;
use travel_scout_backend::error::{AppError, ErrorKind};
use travel_scout_backend::orchestrator::plan_types::AspectRatio;
use travel_scout_backend::orchestrator::service::{JobStatus, ServiceContext};
use travel_scout_backend::orchestrator::{run_video, EventSink, Generation, ScoutEvent, VideoPhase};
use travel_scout_backend::services::FileService;

fn done(uri: &str) -> JobStatus {
    JobStatus::Succeeded {
        video_uri: Some(uri.to_string()),
    }
}

#[tokio::test(start_paused = true)]
async fn test_polls_until_done_at_fixed_interval() {
    let dir = TempDir::new().unwrap();
    let stub = Arc::new(StubService::new());
    stub.push_poll(JobStatus::Pending)
        .push_poll(JobStatus::Pending)
        .push_poll(done("https://example.test/video.mp4"));
    let ctx = stub_context(stub.clone(), dir.path());

    let started = tokio::time::Instant::now();
    let video = run_video(
        &ctx,
        Generation(1),
        "Santorini",
        AspectRatio::Portrait,
        &CancellationToken::new(),
        &EventSink::detached(),
    )
    .await
    .unwrap();

    assert_eq!(stub.poll_calls(), 3);
    let instants = stub.poll_instants.lock().unwrap().clone();
    assert_eq!(instants[0] - started, Duration::from_secs(5));
    assert_eq!(instants[1] - instants[0], Duration::from_secs(5));
    assert_eq!(instants[2] - instants[1], Duration::from_secs(5));

    assert_eq!(
        *stub.fetched.lock().unwrap(),
        vec!["https://example.test/video.mp4".to_string()]
    );
    assert!(video.path.starts_with(std::fs::canonicalize(dir.path()).unwrap()));
    assert_eq!(video.mime_type, "video/mp4");
    assert_eq!(std::fs::read(&video.path).unwrap().len() as u64, video.size);
}

#[tokio::test(start_paused = true)]
async fn test_submission_uses_reference_image_and_aspect() {
    let dir = TempDir::new().unwrap();
    let stub = Arc::new(StubService::new());
    stub.push_poll(done("https://example.test/v.mp4"));
    let ctx = stub_context(stub.clone(), dir.path());

    run_video(
        &ctx,
        Generation(1),
        "Santorini",
        AspectRatio::Portrait,
        &CancellationToken::new(),
        &EventSink::detached(),
    )
    .await
    .unwrap();

    let images = stub.image_requests.lock().unwrap();
    assert_eq!(images.len(), 1);
    assert_eq!(images[0].aspect_ratio, Some(AspectRatio::Portrait));
    assert!(images[0].prompt.contains("9:16"));

    let videos = stub.video_requests.lock().unwrap();
    assert_eq!(videos.len(), 1);
    assert_eq!(videos[0].aspect_ratio, AspectRatio::Portrait);
    assert_eq!(videos[0].sample_count, 1);
    assert_eq!(videos[0].resolution, "720p");
    assert!(!videos[0].image.base64.starts_with("data:"));
}

#[tokio::test(start_paused = true)]
async fn test_job_failure_text_is_verbatim() {
    let dir = TempDir::new().unwrap();
    let stub = Arc::new(StubService::new());
    let message = "Video generation failed: audio could not be generated (code 3)";
    stub.push_poll(JobStatus::Pending).push_poll(JobStatus::Failed {
        message: message.to_string(),
    });
    let ctx = stub_context(stub.clone(), dir.path());

    let err = run_video(
        &ctx,
        Generation(1),
        "Santorini",
        AspectRatio::Landscape,
        &CancellationToken::new(),
        &EventSink::detached(),
    )
    .await
    .unwrap_err();

    assert!(matches!(&err, AppError::JobFailed(text) if text == message));
    assert_eq!(err.to_string(), message);
    assert!(stub.fetched.lock().unwrap().is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_success_without_uri_is_empty_result() {
    let dir = TempDir::new().unwrap();
    let stub = Arc::new(StubService::new());
    stub.push_poll(JobStatus::Succeeded { video_uri: None });
    let ctx = stub_context(stub, dir.path());

    let err = run_video(
        &ctx,
        Generation(1),
        "Santorini",
        AspectRatio::Landscape,
        &CancellationToken::new(),
        &EventSink::detached(),
    )
    .await
    .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::EmptyResult);
}

#[tokio::test(start_paused = true)]
async fn test_missing_reference_image_aborts() {
    let dir = TempDir::new().unwrap();
    let stub = Arc::new(StubService::new());
    stub.set_image_mode(ImageMode::Empty);
    let ctx = stub_context(stub.clone(), dir.path());

    let err = run_video(
        &ctx,
        Generation(1),
        "Santorini",
        AspectRatio::Landscape,
        &CancellationToken::new(),
        &EventSink::detached(),
    )
    .await
    .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::EmptyResult);
    assert!(stub.video_requests.lock().unwrap().is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_wait_budget_exceeded() {
    let dir = TempDir::new().unwrap();
    let stub = Arc::new(StubService::new());
    let mut config = test_config(dir.path());
    config.video.max_wait_secs = 12;
    let ctx = ServiceContext::new(stub.clone(), config);

    let err = run_video(
        &ctx,
        Generation(1),
        "Santorini",
        AspectRatio::Landscape,
        &CancellationToken::new(),
        &EventSink::detached(),
    )
    .await
    .unwrap_err();

    assert!(matches!(err, AppError::TimeoutExceeded(12)));
    // Polled at 5s, 10s and 15s; the 15s check is past the budget
    assert_eq!(stub.poll_calls(), 3);
}

#[tokio::test(start_paused = true)]
async fn test_cancel_stops_polling() {
    let dir = TempDir::new().unwrap();
    let stub = Arc::new(StubService::new());
    let ctx = stub_context(stub.clone(), dir.path());
    let cancel = CancellationToken::new();

    let (events, mut rx) = EventSink::channel();
    let task = {
        let ctx = ctx.clone();
        let cancel = cancel.clone();
        tokio::spawn(async move {
            run_video(
                &ctx,
                Generation(7),
                "Santorini",
                AspectRatio::Landscape,
                &cancel,
                &events,
            )
            .await
        })
    };

    tokio::time::sleep(Duration::from_secs(12)).await;
    cancel.cancel();
    let err = task.await.unwrap().unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Cancelled);
    assert_eq!(stub.poll_calls(), 2);

    let mut last = None;
    while let Some(event) = rx.recv().await {
        if let ScoutEvent::Video { generation, phase } = event {
            assert_eq!(generation, Generation(7));
            last = Some(phase);
        }
    }
    assert!(matches!(last, Some(VideoPhase::Failed(report)) if report.kind == ErrorKind::Cancelled));
}

#[tokio::test(start_paused = true)]
async fn test_phases_in_order() {
    let dir = TempDir::new().unwrap();
    let stub = Arc::new(StubService::new());
    stub.push_poll(JobStatus::Pending)
        .push_poll(done("https://example.test/v.mp4"));
    let ctx = stub_context(stub, dir.path());

    let (events, mut rx) = EventSink::channel();
    let video = run_video(
        &ctx,
        Generation(1),
        "Santorini",
        AspectRatio::Landscape,
        &CancellationToken::new(),
        &events,
    )
    .await
    .unwrap();
    drop(events);

    let mut phases = Vec::new();
    while let Some(ScoutEvent::Video { phase, .. }) = rx.recv().await {
        phases.push(phase);
    }

    assert_eq!(phases.len(), 5);
    assert_eq!(phases[0], VideoPhase::GeneratingReferenceImage);
    assert!(matches!(&phases[1], VideoPhase::Submitted { job } if job.ends_with("stub-1")));
    assert!(matches!(phases[2], VideoPhase::Polling { attempts: 1, .. }));
    assert!(matches!(phases[3], VideoPhase::Polling { attempts: 2, .. }));
    assert_eq!(phases[4], VideoPhase::Completed(video.clone()));

    let export_dir = dir.path().join("exports");
    let copy = FileService::save_video(&export_dir, "Santorini", &video)
        .await
        .unwrap();
    assert_eq!(copy.file_name().unwrap(), "santorini-drone.mp4");
    assert_eq!(std::fs::read(copy).unwrap(), std::fs::read(&video.path).unwrap());
}

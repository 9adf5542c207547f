//! Video synthesis orchestrator
//!
//! Two strictly sequential stages:
//! 1. Generate a reference still of the location in the requested aspect ratio.
//! 2. Submit a drone-motion video job seeded with that still, then poll it at
//!    a fixed interval until it reaches a terminal state.
//!
//! Polling is bounded by the configured wait budget and can be cancelled
//! through a [`CancellationToken`]. A finished video is downloaded with the
//! active credential and materialized as a local file.

use crate::error::AppError;
use crate::orchestrator::events::{EventSink, Generation, ScoutEvent, VideoPhase};
use crate::orchestrator::plan_types::{AspectRatio, ImageData};
use crate::orchestrator::prompts::{reference_image_prompt, DRONE_MOTION_PROMPT};
use crate::orchestrator::service::{
    ImageRequest, JobStatus, ServiceContext, VideoOperation, VideoRequest,
};
use crate::orchestrator::utils::{hash_location, strip_data_uri_prefix, validate_location};
use crate::services::files::{FileService, VideoResource};
use std::future::Future;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

/// Run the full two-stage pipeline
///
/// Emits a [`ScoutEvent::Video`] for every phase change, ending in either
/// `Completed` or `Failed`.
///
/// # Errors
/// * `AppError::EmptyResult` - No reference image, or the job finished without a video
/// * `AppError::JobFailed` - The job reported an error (its text is kept verbatim)
/// * `AppError::TimeoutExceeded` - Polling ran past the wait budget
/// * `AppError::Cancelled` - The token was cancelled
pub async fn run_video(
    ctx: &ServiceContext,
    generation: Generation,
    location: &str,
    aspect_ratio: AspectRatio,
    cancel: &CancellationToken,
    events: &EventSink,
) -> Result<VideoResource, AppError> {
    let emit = |phase: VideoPhase| events.emit(ScoutEvent::Video { generation, phase });

    let result = pipeline(ctx, location, aspect_ratio, cancel, &emit).await;
    match &result {
        Ok(video) => {
            tracing::info!(generation = %generation, path = %video.path.display(), "Drone video ready");
            emit(VideoPhase::Completed(video.clone()));
        }
        Err(e) => {
            tracing::warn!(generation = %generation, error = %e, "Video pipeline failed");
            emit(VideoPhase::Failed(e.report()));
        }
    }
    result
}

async fn pipeline(
    ctx: &ServiceContext,
    location: &str,
    aspect_ratio: AspectRatio,
    cancel: &CancellationToken,
    emit: &impl Fn(VideoPhase),
) -> Result<VideoResource, AppError> {
    let location = validate_location(location)?;
    tracing::debug!(
        location_hash = %hash_location(location),
        aspect_ratio = aspect_ratio.as_str(),
        "Starting video pipeline"
    );

    // Stage 1
    emit(VideoPhase::GeneratingReferenceImage);
    let image = cancellable(cancel, reference_image(ctx, location, aspect_ratio)).await?;

    // Stage 2
    let request = VideoRequest {
        model: ctx.config.models.video.clone(),
        prompt: DRONE_MOTION_PROMPT.to_string(),
        image: ImageData {
            base64: strip_data_uri_prefix(&image.base64).to_string(),
            mime_type: image.mime_type,
        },
        aspect_ratio,
        resolution: ctx.config.video.resolution.clone(),
        sample_count: 1,
    };
    let operation = cancellable(cancel, ctx.service.submit_video_job(request)).await?;
    tracing::info!(job = %operation.name, "Video job submitted");
    emit(VideoPhase::Submitted {
        job: operation.name.clone(),
    });

    let operation = poll_until_done(ctx, operation, cancel, emit).await?;
    let uri = match operation.status {
        JobStatus::Succeeded {
            video_uri: Some(uri),
        } => uri,
        JobStatus::Succeeded { video_uri: None } => {
            return Err(AppError::EmptyResult(
                "Video job finished without a video".to_string(),
            ))
        }
        JobStatus::Failed { message } => return Err(AppError::JobFailed(message)),
        JobStatus::Pending => {
            return Err(AppError::Internal(anyhow::anyhow!(
                "poll loop returned a pending job"
            )))
        }
    };

    let bytes = cancellable(cancel, ctx.service.fetch_video_bytes(&uri)).await?;
    FileService::materialize_video(&ctx.config.media_dir, &bytes).await
}

async fn reference_image(
    ctx: &ServiceContext,
    location: &str,
    aspect_ratio: AspectRatio,
) -> Result<ImageData, AppError> {
    let request = ImageRequest {
        model: ctx.config.models.image.clone(),
        prompt: reference_image_prompt(location, aspect_ratio),
        aspect_ratio: Some(aspect_ratio),
    };
    ctx.service
        .generate_image(request)
        .await?
        .ok_or_else(|| AppError::EmptyResult("No reference image was generated".to_string()))
}

/// Re-query the job until it is terminal, the budget runs out, or the token fires
async fn poll_until_done(
    ctx: &ServiceContext,
    mut operation: VideoOperation,
    cancel: &CancellationToken,
    emit: &impl Fn(VideoPhase),
) -> Result<VideoOperation, AppError> {
    let started = Instant::now();
    let poll_interval = ctx.config.poll_interval();
    let max_wait = ctx.config.max_video_wait();
    let mut attempts: u32 = 0;

    while !operation.is_terminal() {
        if started.elapsed() >= max_wait {
            tracing::warn!(job = %operation.name, attempts, "Video job exceeded wait budget");
            return Err(AppError::TimeoutExceeded(max_wait.as_secs()));
        }

        tokio::select! {
            _ = cancel.cancelled() => {
                tracing::info!(job = %operation.name, attempts, "Video polling cancelled");
                return Err(AppError::Cancelled);
            }
            _ = tokio::time::sleep(poll_interval) => {}
        }

        operation = ctx.service.poll_video_job(&operation).await?;
        attempts += 1;
        tracing::debug!(job = %operation.name, attempts, done = operation.is_terminal(), "Polled video job");
        emit(VideoPhase::Polling {
            job: operation.name.clone(),
            attempts,
        });
    }

    Ok(operation)
}

async fn cancellable<T>(
    cancel: &CancellationToken,
    future: impl Future<Output = Result<T, AppError>>,
) -> Result<T, AppError> {
    tokio::select! {
        _ = cancel.cancelled() => Err(AppError::Cancelled),
        result = future => result,
    }
}

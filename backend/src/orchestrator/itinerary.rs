//! Itinerary orchestrator
//!
//! Issues the structured travel-profile request and the three preview image
//! requests at the same time. The two streams report independently: the
//! plan event may arrive before, between, or after the image events.

use crate::error::AppError;
use crate::orchestrator::events::{EventSink, Generation, ImageStatus, ScoutEvent};
use crate::orchestrator::plan_types::{AspectRatio, ImageData, TravelPlan};
use crate::orchestrator::prompts::{
    preview_image_prompt, travel_plan_prompt, travel_plan_schema, PREVIEW_STYLES,
};
use crate::orchestrator::service::{ImageRequest, ServiceContext, StructuredRequest};
use crate::orchestrator::utils::{hash_location, parse_json_response, validate_location};
use futures_util::future::{join, join_all};

/// Number of preview slots
pub const PREVIEW_COUNT: usize = PREVIEW_STYLES.len();

/// Combined result of one itinerary run
#[derive(Debug)]
pub struct ItineraryOutcome {
    /// The plan, or why it could not be produced
    pub plan: Result<TravelPlan, AppError>,
    /// Final status of each preview slot, in slot order
    pub previews: Vec<ImageStatus>,
}

impl ItineraryOutcome {
    /// Successful previews in slot order (shorter when some failed)
    pub fn preview_images(&self) -> Vec<&ImageData> {
        self.previews.iter().filter_map(ImageStatus::image).collect()
    }
}

/// Run the itinerary orchestrator
///
/// # Arguments
/// * `ctx` - Service and configuration
/// * `generation` - Marker copied onto every emitted event
/// * `location` - Free-text place name
/// * `events` - Where plan and per-slot events are delivered
///
/// # Returns
/// * `ItineraryOutcome` - Plan result plus every slot's final status
pub async fn run_itinerary(
    ctx: &ServiceContext,
    generation: Generation,
    location: &str,
    events: &EventSink,
) -> ItineraryOutcome {
    let location = match validate_location(location) {
        Ok(location) => location,
        Err(e) => {
            events.emit(ScoutEvent::Plan {
                generation,
                location: location.to_string(),
                result: Err(e.report()),
            });
            let skipped = ImageStatus::Failed("not requested".to_string());
            for slot in 0..PREVIEW_COUNT {
                events.emit(ScoutEvent::PreviewImage {
                    generation,
                    slot,
                    status: skipped.clone(),
                });
            }
            return ItineraryOutcome {
                plan: Err(e),
                previews: vec![skipped; PREVIEW_COUNT],
            };
        }
    };

    tracing::debug!(
        location_hash = %hash_location(location),
        generation = %generation,
        "Starting itinerary orchestration"
    );

    let text = async {
        let result = generate_plan(ctx, location).await;
        events.emit(ScoutEvent::Plan {
            generation,
            location: location.to_string(),
            result: match &result {
                Ok(plan) => Ok(plan.clone()),
                Err(e) => Err(e.report()),
            },
        });
        result
    };

    let (plan, previews) = join(text, generate_previews(ctx, generation, location, events)).await;

    tracing::debug!(
        generation = %generation,
        plan_ok = plan.is_ok(),
        previews_ready = previews.iter().filter(|s| s.image().is_some()).count(),
        "Itinerary orchestration finished"
    );

    ItineraryOutcome { plan, previews }
}

/// Request and validate the full travel profile
///
/// # Errors
/// * `AppError::MalformedResponse` if the JSON does not parse or the crowd
///   curve is not twelve in-range entries; service errors pass through.
pub async fn generate_plan(ctx: &ServiceContext, location: &str) -> Result<TravelPlan, AppError> {
    let request = StructuredRequest {
        model: ctx.config.models.structured.clone(),
        prompt: travel_plan_prompt(location),
        schema: travel_plan_schema(),
        thinking_budget: Some(ctx.config.thinking_budget),
    };

    let json_response = ctx.service.generate_structured(request).await?;
    tracing::debug!(
        response_len = json_response.len(),
        "Received travel plan JSON"
    );

    let plan: TravelPlan = parse_json_response(&json_response)?;
    plan.validate().map_err(|validation_error| {
        AppError::MalformedResponse(format!("Travel plan validation failed: {}", validation_error))
    })?;

    Ok(plan)
}

/// Fire the preview requests concurrently; each slot reports on its own
async fn generate_previews(
    ctx: &ServiceContext,
    generation: Generation,
    location: &str,
    events: &EventSink,
) -> Vec<ImageStatus> {
    let requests = PREVIEW_STYLES.iter().enumerate().map(|(slot, style)| async move {
        let request = ImageRequest {
            model: ctx.config.models.image.clone(),
            prompt: preview_image_prompt(location, style),
            aspect_ratio: Some(AspectRatio::Landscape),
        };
        let status = ImageStatus::from_result(ctx.service.generate_image(request).await);
        if let ImageStatus::Failed(reason) = &status {
            tracing::warn!(slot = slot, reason = %reason, "Preview image failed");
        }
        events.emit(ScoutEvent::PreviewImage {
            generation,
            slot,
            status: status.clone(),
        });
        status
    });

    join_all(requests).await
}

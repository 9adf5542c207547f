//! Map-grounded location briefing

use crate::error::AppError;
use crate::orchestrator::events::{EventSink, Generation, ScoutEvent};
use crate::orchestrator::plan_types::LocationBrief;
use crate::orchestrator::prompts::briefing_prompt;
use crate::orchestrator::service::{ServiceContext, TextRequest};
use crate::orchestrator::utils::validate_location;

/// Short overview of a place with the map sources it was grounded on
pub async fn run_briefing(
    ctx: &ServiceContext,
    generation: Generation,
    location: &str,
    events: &EventSink,
) -> Result<LocationBrief, AppError> {
    let result = fetch_briefing(ctx, location).await;
    if let Err(e) = &result {
        tracing::warn!(generation = %generation, error = %e, "Location briefing failed");
    }
    events.emit(ScoutEvent::Briefing {
        generation,
        result: match &result {
            Ok(brief) => Ok(brief.clone()),
            Err(e) => Err(e.report()),
        },
    });
    result
}

async fn fetch_briefing(ctx: &ServiceContext, location: &str) -> Result<LocationBrief, AppError> {
    let location = validate_location(location)?;
    let brief = ctx
        .service
        .generate_text(TextRequest {
            model: ctx.config.models.text.clone(),
            prompt: briefing_prompt(location),
            maps_grounding: true,
        })
        .await?;

    if brief.text.trim().is_empty() {
        return Err(AppError::EmptyResult("Briefing had no text".to_string()));
    }
    Ok(brief)
}

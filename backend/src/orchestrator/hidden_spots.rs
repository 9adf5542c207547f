//! Hidden spots orchestrator
//!
//! Lists lesser-known places near a location, then fans out one image
//! request per place. Images are keyed by place name and reported as each
//! resolves.

use crate::error::AppError;
use crate::orchestrator::events::{EventSink, Generation, ImageStatus, ScoutEvent};
use crate::orchestrator::plan_types::HiddenGem;
use crate::orchestrator::prompts::{gem_image_prompt, hidden_gems_prompt, hidden_gems_schema};
use crate::orchestrator::service::{ImageRequest, ServiceContext, StructuredRequest};
use crate::orchestrator::utils::{parse_json_response, validate_location};
use futures_util::future::join_all;

/// Upper bound on listed places; extra entries from the service are dropped
pub const MAX_HIDDEN_GEMS: usize = 5;

/// Combined result of one hidden-spots run
#[derive(Debug)]
pub struct HiddenSpotsOutcome {
    /// The list, or why it could not be produced
    pub gems: Result<Vec<HiddenGem>, AppError>,
    /// Final image status per gem name, in list order
    pub images: Vec<(String, ImageStatus)>,
}

impl HiddenSpotsOutcome {
    /// Image status for one gem
    pub fn image_for(&self, name: &str) -> Option<&ImageStatus> {
        self.images
            .iter()
            .find(|(gem, _)| gem == name)
            .map(|(_, status)| status)
    }
}

/// Run the hidden spots orchestrator
///
/// No image request is issued when the list request fails.
pub async fn run_hidden_spots(
    ctx: &ServiceContext,
    generation: Generation,
    location: &str,
    events: &EventSink,
) -> HiddenSpotsOutcome {
    let gems = match fetch_gems(ctx, location).await {
        Ok(gems) => gems,
        Err(e) => {
            tracing::warn!(generation = %generation, error = %e, "Hidden spots request failed");
            events.emit(ScoutEvent::Gems {
                generation,
                result: Err(e.report()),
            });
            return HiddenSpotsOutcome {
                gems: Err(e),
                images: Vec::new(),
            };
        }
    };

    tracing::info!(generation = %generation, count = gems.len(), "Hidden spots listed");
    events.emit(ScoutEvent::Gems {
        generation,
        result: Ok(gems.clone()),
    });

    let location = location.trim();
    let requests = gems.iter().map(|gem| async move {
        let request = ImageRequest {
            model: ctx.config.models.image.clone(),
            prompt: gem_image_prompt(location, gem),
            aspect_ratio: None,
        };
        let status = ImageStatus::from_result(ctx.service.generate_image(request).await);
        if let ImageStatus::Failed(reason) = &status {
            tracing::warn!(gem = %gem.name, reason = %reason, "Hidden spot image failed");
        }
        events.emit(ScoutEvent::GemImage {
            generation,
            name: gem.name.clone(),
            status: status.clone(),
        });
        (gem.name.clone(), status)
    });
    let images = join_all(requests).await;

    HiddenSpotsOutcome {
        gems: Ok(gems),
        images,
    }
}

/// Request and parse the list, capped at [`MAX_HIDDEN_GEMS`]
pub async fn fetch_gems(ctx: &ServiceContext, location: &str) -> Result<Vec<HiddenGem>, AppError> {
    let location = validate_location(location)?;
    let request = StructuredRequest {
        model: ctx.config.models.text.clone(),
        prompt: hidden_gems_prompt(location, MAX_HIDDEN_GEMS),
        schema: hidden_gems_schema(),
        thinking_budget: None,
    };

    let json_response = ctx.service.generate_structured(request).await?;
    let mut gems: Vec<HiddenGem> = parse_json_response(&json_response)?;
    if gems.len() > MAX_HIDDEN_GEMS {
        tracing::debug!(returned = gems.len(), "Truncating hidden spots list");
        gems.truncate(MAX_HIDDEN_GEMS);
    }
    Ok(gems)
}

// View state for the scout
// Holds the latest results of each orchestrator and discards events from superseded runs

use crate::chat::{ChatReply, ChatSession, PendingReply};
use crate::error::{ErrorKind, ErrorReport};
use crate::orchestrator::events::{Generation, ImageStatus, ScoutEvent, VideoPhase};
use crate::orchestrator::itinerary::PREVIEW_COUNT;
use crate::orchestrator::plan_types::{AspectRatio, HiddenGem, ImageData, LocationBrief, TravelPlan};
use crate::services::FileService;
use std::collections::HashMap;

/// Lifecycle of one request-backed panel
#[derive(Debug, Clone, PartialEq)]
pub enum Phase<T> {
    /// Nothing requested yet
    Idle,
    /// Request in flight
    Loading,
    /// Result available
    Ready(T),
    /// Request failed
    Failed(ErrorReport),
}

impl<T> Default for Phase<T> {
    fn default() -> Self {
        Phase::Idle
    }
}

impl<T> Phase<T> {
    /// The result, when ready
    pub fn ready(&self) -> Option<&T> {
        match self {
            Phase::Ready(value) => Some(value),
            _ => None,
        }
    }

    /// The error, when failed
    pub fn error(&self) -> Option<&ErrorReport> {
        match self {
            Phase::Failed(report) => Some(report),
            _ => None,
        }
    }

    /// Whether the request is in flight
    pub fn is_loading(&self) -> bool {
        matches!(self, Phase::Loading)
    }

    fn from_result(result: Result<T, ErrorReport>) -> Self {
        match result {
            Ok(value) => Phase::Ready(value),
            Err(report) => Phase::Failed(report),
        }
    }
}

/// The drone video job as the view sees it
#[derive(Debug, Clone, Default)]
pub struct VideoJob {
    /// Location the job was started for
    pub location: String,
    /// Requested aspect ratio
    pub aspect_ratio: AspectRatio,
    /// Current pipeline phase
    pub phase: VideoPhase,
}

/// Main view state
/// Every action bumps its orchestrator's generation; only events carrying the latest one are applied
#[derive(Debug, Clone, Default)]
pub struct ScoutState {
    plan_generation: Generation,
    gems_generation: Generation,
    briefing_generation: Generation,
    video_generation: Generation,
    /// Location of the current plan
    pub plan_location: Option<String>,
    /// Location the latest plan request was made for
    pub plan_request: Option<String>,
    /// Location the latest hidden spots request was made for
    pub gems_request: Option<String>,
    /// Location the latest briefing request was made for
    pub briefing_request: Option<String>,
    /// Travel plan panel
    pub plan: Phase<TravelPlan>,
    /// Preview slots, in slot order
    pub previews: Vec<ImageStatus>,
    /// Hidden spots panel
    pub gems: Phase<Vec<HiddenGem>>,
    /// Hidden spot images keyed by name
    pub gem_images: HashMap<String, ImageStatus>,
    /// Briefing panel
    pub briefing: Phase<LocationBrief>,
    /// Drone video
    pub video: VideoJob,
    /// Follow-up chat bound to the current plan
    pub chat: Option<ChatSession>,
    chat_model: String,
}

impl ScoutState {
    /// Create a new state; `chat_model` is used for every session it opens
    pub fn new(chat_model: impl Into<String>) -> Self {
        Self {
            chat_model: chat_model.into(),
            ..Self::default()
        }
    }

    /// Clear the plan panel, previews and chat for a search on `location`
    /// Returns the new generation
    pub fn begin_plan(&mut self, location: &str) -> Generation {
        self.plan_generation = self.plan_generation.next();
        self.plan_request = Some(location.to_string());
        self.plan = Phase::Loading;
        self.previews = vec![ImageStatus::Pending; PREVIEW_COUNT];
        // The old conversation belongs to the old plan
        self.chat = None;
        self.plan_location = None;
        self.plan_generation
    }

    /// Clear the hidden spots panel for `location`, returning the new generation
    pub fn begin_gems(&mut self, location: &str) -> Generation {
        self.gems_generation = self.gems_generation.next();
        self.gems_request = Some(location.to_string());
        self.gems = Phase::Loading;
        self.gem_images.clear();
        self.gems_generation
    }

    /// Clear the briefing panel for `location`, returning the new generation
    pub fn begin_briefing(&mut self, location: &str) -> Generation {
        self.briefing_generation = self.briefing_generation.next();
        self.briefing_request = Some(location.to_string());
        self.briefing = Phase::Loading;
        self.briefing_generation
    }

    /// Start a video job for `location`, returning the new generation
    /// A finished video from the previous job is deleted
    pub fn begin_video(&mut self, location: &str, aspect_ratio: AspectRatio) -> Generation {
        self.video_generation = self.video_generation.next();
        self.drop_finished_video();
        self.video = VideoJob {
            location: location.trim().to_string(),
            aspect_ratio,
            phase: VideoPhase::GeneratingReferenceImage,
        };
        self.video_generation
    }

    /// Return the video job to idle, keeping its location and aspect ratio
    /// Any events still in flight for the old run are discarded afterwards
    pub fn reset_video(&mut self) {
        self.video_generation = self.video_generation.next();
        self.drop_finished_video();
        self.video.phase = VideoPhase::Idle;
    }

    fn drop_finished_video(&mut self) {
        if let VideoPhase::Completed(video) = &self.video.phase {
            FileService::remove_video(video);
        }
    }

    /// Apply an orchestrator event
    /// Returns false if the event was stale and discarded
    pub fn apply(&mut self, event: ScoutEvent) -> bool {
        match event {
            ScoutEvent::Plan {
                generation,
                location,
                result,
            } => {
                if generation != self.plan_generation {
                    return self.discard("plan", generation);
                }
                if let Ok(plan) = &result {
                    // A new plan always replaces the previous conversation
                    self.chat = Some(ChatSession::open(plan, &location, self.chat_model.clone()));
                    self.plan_location = Some(location);
                }
                self.plan = Phase::from_result(result);
            }
            ScoutEvent::PreviewImage {
                generation,
                slot,
                status,
            } => {
                if generation != self.plan_generation {
                    return self.discard("preview", generation);
                }
                match self.previews.get_mut(slot) {
                    Some(current) => *current = status,
                    None => {
                        tracing::warn!(slot, "Preview event for unknown slot");
                        return false;
                    }
                }
            }
            ScoutEvent::Gems { generation, result } => {
                if generation != self.gems_generation {
                    return self.discard("gems", generation);
                }
                if let Ok(gems) = &result {
                    self.gem_images = gems
                        .iter()
                        .map(|gem| (gem.name.clone(), ImageStatus::Pending))
                        .collect();
                }
                self.gems = Phase::from_result(result);
            }
            ScoutEvent::GemImage {
                generation,
                name,
                status,
            } => {
                if generation != self.gems_generation {
                    return self.discard("gem image", generation);
                }
                self.gem_images.insert(name, status);
            }
            ScoutEvent::Briefing { generation, result } => {
                if generation != self.briefing_generation {
                    return self.discard("briefing", generation);
                }
                self.briefing = Phase::from_result(result);
            }
            ScoutEvent::Video { generation, phase } => {
                if generation != self.video_generation {
                    // A superseded run may still finish; its file has no owner
                    if let VideoPhase::Completed(video) = &phase {
                        FileService::remove_video(video);
                    }
                    return self.discard("video", generation);
                }
                self.video.phase = phase;
            }
            ScoutEvent::ChatReply(reply) => return self.apply_chat_reply(reply),
        }
        true
    }

    fn apply_chat_reply(&mut self, reply: ChatReply) -> bool {
        match self.chat.as_mut() {
            Some(session) => session.apply_reply(reply),
            None => false,
        }
    }

    fn discard(&self, stream: &str, generation: Generation) -> bool {
        tracing::debug!(stream, generation = %generation, "Discarding stale event");
        false
    }

    /// Start a chat send on the current session
    /// No-op (None) when no plan has opened a session yet
    pub fn begin_chat(&mut self, text: &str) -> Option<PendingReply> {
        self.chat.as_mut()?.begin_send(text)
    }

    /// Ready preview images in slot order
    pub fn ready_previews(&self) -> Vec<&ImageData> {
        self.previews.iter().filter_map(ImageStatus::image).collect()
    }

    /// Whether any visible failure calls for a different API key
    pub fn needs_credential_change(&self) -> bool {
        let video_error = match &self.video.phase {
            VideoPhase::Failed(report) => Some(report),
            _ => None,
        };
        [
            self.plan.error(),
            self.gems.error(),
            self.briefing.error(),
            video_error,
        ]
        .into_iter()
        .flatten()
        .any(|report| report.kind == ErrorKind::AuthenticationFailure)
    }
}

//! Orchestrator events
//!
//! Orchestrators report progress as [`ScoutEvent`]s sent through an
//! [`EventSink`]. Each event carries the [`Generation`] of the invocation
//! that produced it so the view state can drop results from superseded runs.

use crate::chat::ChatReply;
use crate::error::{AppError, ErrorReport};
use crate::orchestrator::plan_types::{HiddenGem, ImageData, LocationBrief, TravelPlan};
use crate::services::files::VideoResource;
use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender};

/// Monotonic invocation marker, one counter per orchestrator
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Generation(pub u64);

impl Generation {
    /// The marker issued after this one
    pub fn next(self) -> Self {
        Generation(self.0 + 1)
    }
}

impl std::fmt::Display for Generation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Explicit status of one fan-out image
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ImageStatus {
    /// Request outstanding
    #[default]
    Pending,
    /// Image arrived
    Ready(ImageData),
    /// Request failed or returned no image
    Failed(String),
}

impl ImageStatus {
    /// Status for a finished request
    pub fn from_result(result: Result<Option<ImageData>, AppError>) -> Self {
        match result {
            Ok(Some(image)) => ImageStatus::Ready(image),
            Ok(None) => ImageStatus::Failed("no image in response".to_string()),
            Err(e) => ImageStatus::Failed(e.to_string()),
        }
    }

    /// The image, when ready
    pub fn image(&self) -> Option<&ImageData> {
        match self {
            ImageStatus::Ready(image) => Some(image),
            _ => None,
        }
    }

    /// Whether the request is still outstanding
    pub fn is_pending(&self) -> bool {
        matches!(self, ImageStatus::Pending)
    }
}

/// Observable phases of the video pipeline
#[derive(Debug, Clone, PartialEq, Default)]
pub enum VideoPhase {
    /// Nothing running
    #[default]
    Idle,
    /// Stage 1: producing the reference still
    GeneratingReferenceImage,
    /// Stage 2: job accepted by the service
    Submitted {
        /// Job handle
        job: String,
    },
    /// Stage 2: waiting for the job to finish
    Polling {
        /// Job handle
        job: String,
        /// Status queries issued so far
        attempts: u32,
    },
    /// Video materialized locally
    Completed(VideoResource),
    /// Pipeline stopped with an error
    Failed(ErrorReport),
}

impl VideoPhase {
    /// Stage-specific progress text for the view
    pub fn progress_text(&self) -> Option<&'static str> {
        match self {
            VideoPhase::GeneratingReferenceImage => Some("Locating and capturing reference image..."),
            VideoPhase::Submitted { .. } | VideoPhase::Polling { .. } => {
                Some("Simulating flight synthesis...")
            }
            _ => None,
        }
    }

    /// Whether a pipeline run is in flight
    pub fn is_running(&self) -> bool {
        matches!(
            self,
            VideoPhase::GeneratingReferenceImage
                | VideoPhase::Submitted { .. }
                | VideoPhase::Polling { .. }
        )
    }
}

/// Everything an orchestrator can report back to the view
#[derive(Debug, Clone)]
pub enum ScoutEvent {
    /// Travel profile finished
    Plan {
        /// Invocation marker
        generation: Generation,
        /// Location the plan was generated for
        location: String,
        /// Plan or error
        result: Result<TravelPlan, ErrorReport>,
    },
    /// One preview slot finished
    PreviewImage {
        /// Invocation marker
        generation: Generation,
        /// Slot index, 0..3
        slot: usize,
        /// Slot outcome
        status: ImageStatus,
    },
    /// Hidden spots list finished
    Gems {
        /// Invocation marker
        generation: Generation,
        /// At most five gems, or an error
        result: Result<Vec<HiddenGem>, ErrorReport>,
    },
    /// One hidden spot image finished
    GemImage {
        /// Invocation marker
        generation: Generation,
        /// Gem name (image key)
        name: String,
        /// Image outcome
        status: ImageStatus,
    },
    /// Map-grounded briefing finished
    Briefing {
        /// Invocation marker
        generation: Generation,
        /// Briefing or error
        result: Result<LocationBrief, ErrorReport>,
    },
    /// Video pipeline changed phase
    Video {
        /// Invocation marker
        generation: Generation,
        /// New phase
        phase: VideoPhase,
    },
    /// Follow-up chat request finished (answered or not)
    ChatReply(ChatReply),
}

/// Sending half handed to orchestrators
///
/// Sends never fail from the orchestrator's point of view: if the view has
/// gone away the event is dropped.
#[derive(Debug, Clone)]
pub struct EventSink {
    tx: Option<UnboundedSender<ScoutEvent>>,
}

impl EventSink {
    /// Create a connected sink and its receiver
    pub fn channel() -> (Self, UnboundedReceiver<ScoutEvent>) {
        let (tx, rx) = unbounded_channel();
        (Self { tx: Some(tx) }, rx)
    }

    /// A sink that discards everything (for callers that only want the return value)
    pub fn detached() -> Self {
        Self { tx: None }
    }

    /// Deliver an event
    pub fn emit(&self, event: ScoutEvent) {
        if let Some(tx) = &self.tx {
            if tx.send(event).is_err() {
                tracing::debug!("Event receiver dropped, discarding event");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generation_ordering() {
        let first = Generation::default();
        let second = first.next();
        assert!(second > first);
        assert_eq!(second.to_string(), "#1");
    }

    #[test]
    fn test_image_status_from_result() {
        assert!(matches!(
            ImageStatus::from_result(Ok(None)),
            ImageStatus::Failed(_)
        ));
        let image = ImageData {
            mime_type: "image/png".to_string(),
            base64: "QUJD".to_string(),
        };
        let status = ImageStatus::from_result(Ok(Some(image.clone())));
        assert_eq!(status.image(), Some(&image));
    }

    #[test]
    fn test_video_progress_text() {
        assert_eq!(VideoPhase::Idle.progress_text(), None);
        assert_eq!(
            VideoPhase::GeneratingReferenceImage.progress_text(),
            Some("Locating and capturing reference image...")
        );
        let polling = VideoPhase::Polling {
            job: "op".to_string(),
            attempts: 2,
        };
        assert_eq!(polling.progress_text(), Some("Simulating flight synthesis..."));
        assert!(polling.is_running());
    }

    #[tokio::test]
    async fn test_detached_sink_swallows_events() {
        let sink = EventSink::detached();
        sink.emit(ScoutEvent::Video {
            generation: Generation(1),
            phase: VideoPhase::Idle,
        });

        let (sink, mut rx) = EventSink::channel();
        sink.emit(ScoutEvent::Video {
            generation: Generation(2),
            phase: VideoPhase::GeneratingReferenceImage,
        });
        assert!(matches!(
            rx.recv().await,
            Some(ScoutEvent::Video { generation: Generation(2), .. })
        ));
    }
}

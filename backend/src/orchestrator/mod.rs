//! Orchestrator module
//!
//! Composes calls to the generative service into the user-facing
//! operations: the itinerary, hidden spots, the drone video pipeline and
//! the map-grounded briefing. Orchestrators are plain futures that take an
//! explicit [`ServiceContext`] and report progress through an [`EventSink`].

pub mod briefing;
pub mod events;
pub mod hidden_spots;
pub mod itinerary;
pub mod plan_types;
pub mod prompts;
pub mod service;
pub mod utils;
pub mod video;

pub use briefing::run_briefing;
pub use events::{EventSink, Generation, ImageStatus, ScoutEvent, VideoPhase};
pub use hidden_spots::{run_hidden_spots, HiddenSpotsOutcome, MAX_HIDDEN_GEMS};
pub use itinerary::{run_itinerary, ItineraryOutcome, PREVIEW_COUNT};
pub use service::{GenerativeService, ServiceContext};
pub use video::run_video;

// State management module
// Holds the view state fed by orchestrator events

pub mod app_state;

pub use app_state::{Phase, ScoutState, VideoJob};

// State management module
// Handles form inputs and the backend view state

pub mod app_state;

pub use app_state::{AppState, UiState};

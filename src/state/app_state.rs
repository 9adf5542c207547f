// Application state for the GUI
// Wraps the backend view state with form inputs and dialog state

use travel_scout_backend::orchestrator::plan_types::AspectRatio;
use travel_scout_backend::state::ScoutState;

/// Main application state
#[derive(Debug, Clone)]
pub struct AppState {
    /// Orchestrator results, fed by events
    pub scout: ScoutState,
    /// Form inputs and UI preferences
    pub ui_state: UiState,
}

/// UI-specific state
#[derive(Debug, Clone)]
pub struct UiState {
    /// Location text field
    pub location_input: String,
    /// Aspect ratio picked for the drone video
    pub aspect_ratio: AspectRatio,
    /// Chat text field
    pub chat_input: String,
    /// Replacement API key being typed, when the dialog is open
    pub credential_input: Option<String>,
    /// Whether to show the log panel
    pub log_visible: bool,
}

impl Default for UiState {
    fn default() -> Self {
        Self {
            location_input: String::new(),
            aspect_ratio: AspectRatio::Landscape,
            chat_input: String::new(),
            credential_input: None,
            log_visible: true,
        }
    }
}

impl AppState {
    /// Create a new application state
    pub fn new(chat_model: &str) -> Self {
        Self {
            scout: ScoutState::new(chat_model),
            ui_state: UiState::default(),
        }
    }

    /// Trimmed location, or None when the field is blank
    pub fn location(&self) -> Option<String> {
        let location = self.ui_state.location_input.trim();
        if location.is_empty() {
            None
        } else {
            Some(location.to_string())
        }
    }

    /// Take the chat field contents, clearing it
    /// Returns None for blank input or when there is no session to send to
    pub fn take_chat_input(&mut self) -> Option<String> {
        if self.scout.chat.is_none() || self.ui_state.chat_input.trim().is_empty() {
            return None;
        }
        Some(std::mem::take(&mut self.ui_state.chat_input))
    }

    /// Open the change-credential dialog
    pub fn open_credential_dialog(&mut self) {
        self.ui_state.credential_input = Some(String::new());
    }

    /// Close the dialog, returning the entered key if it is non-blank
    pub fn take_credential(&mut self) -> Option<String> {
        self.ui_state
            .credential_input
            .take()
            .map(|key| key.trim().to_string())
            .filter(|key| !key.is_empty())
    }
}

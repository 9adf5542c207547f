// Travel Scout GUI - Main Entry Point
// Native Rust GUI for the travel scout orchestrators

mod runtime;
mod state;
mod ui;

use eframe::egui;
use runtime::ScoutRuntime;
use state::AppState;
use std::time::Duration;
use travel_scout_backend::config::ScoutConfig;
use travel_scout_backend::orchestrator::VideoPhase;
use ui::{render_app_layout, LogOutput, UiAction};

fn main() -> eframe::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let config = ScoutConfig::from_env();
    let chat_model = config.models.chat.clone();
    let needs_key = config.api_key.trim().is_empty();
    let runtime = match ScoutRuntime::new(config) {
        Ok(runtime) => runtime,
        Err(e) => {
            tracing::error!(error = %e, "Failed to start runtime");
            eprintln!("Failed to start: {}", e);
            std::process::exit(1);
        }
    };

    // Configure window options
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("Travel Scout")
            .with_inner_size([1200.0, 800.0])
            .with_min_inner_size([900.0, 600.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Travel Scout",
        options,
        Box::new(move |_cc| {
            let mut app = TravelScoutApp::new(runtime, &chat_model);
            if needs_key {
                app.log.add_line("GEMINI_API_KEY is not set".to_string());
                app.state.open_credential_dialog();
            }
            Box::new(app)
        }),
    )
}

/// Main application struct
/// Owns the view state and the background runtime
struct TravelScoutApp {
    /// Form inputs and orchestrator results
    state: AppState,
    /// Orchestrator runtime
    runtime: ScoutRuntime,
    /// Log panel
    log: LogOutput,
}

impl TravelScoutApp {
    /// Create a new application instance
    fn new(runtime: ScoutRuntime, chat_model: &str) -> Self {
        let mut log = LogOutput::new(500); // Keep last 500 lines
        log.add_line("Travel Scout ready".to_string());
        Self {
            state: AppState::new(chat_model),
            runtime,
            log,
        }
    }

    fn handle(&mut self, action: UiAction) {
        match action {
            UiAction::SearchPlan => {
                if let Some(location) = self.state.location() {
                    self.log.add_line(format!("Planning trip to {}", location));
                    self.runtime.start_plan(&mut self.state.scout, &location);
                }
            }
            UiAction::FindGems => {
                if let Some(location) = self.state.location() {
                    self.runtime.start_gems(&mut self.state.scout, &location);
                }
            }
            UiAction::Briefing => {
                if let Some(location) = self.state.location() {
                    self.runtime.start_briefing(&mut self.state.scout, &location);
                }
            }
            UiAction::RetryPlan => {
                if let Some(location) = self.state.scout.plan_request.clone() {
                    self.log.add_line(format!("Retrying trip plan for {}", location));
                    self.runtime.start_plan(&mut self.state.scout, &location);
                }
            }
            UiAction::RetryGems => {
                if let Some(location) = self.state.scout.gems_request.clone() {
                    self.runtime.start_gems(&mut self.state.scout, &location);
                }
            }
            UiAction::RetryBriefing => {
                if let Some(location) = self.state.scout.briefing_request.clone() {
                    self.runtime.start_briefing(&mut self.state.scout, &location);
                }
            }
            UiAction::GenerateVideo => {
                if let Some(location) = self.state.location() {
                    let aspect_ratio = self.state.ui_state.aspect_ratio;
                    self.log.add_line(format!("Starting drone video ({})", aspect_ratio.as_str()));
                    self.runtime.start_video(&mut self.state.scout, &location, aspect_ratio);
                }
            }
            UiAction::RetryVideo => {
                let location = self.state.scout.video.location.clone();
                let aspect_ratio = self.state.scout.video.aspect_ratio;
                self.runtime.start_video(&mut self.state.scout, &location, aspect_ratio);
            }
            UiAction::CancelVideo => self.runtime.cancel_video(),
            UiAction::SendChat(text) => {
                if !self.runtime.send_chat(&mut self.state.scout, &text) {
                    self.log.add_line("Nothing to send".to_string());
                }
            }
            UiAction::SavePlan => match self.runtime.save_plan(&self.state.scout) {
                Ok(path) => self.log.add_line(format!("Plan saved to {}", path)),
                Err(e) => self.log.add_line(format!("Save failed: {}", e.user_message())),
            },
            UiAction::SaveVideo => match self.runtime.save_video(&self.state.scout) {
                Ok(path) => self.log.add_line(format!("Video saved to {}", path)),
                Err(e) => self.log.add_line(format!("Save failed: {}", e.user_message())),
            },
            UiAction::ChangeCredential(key) => match self.runtime.change_credential(&key) {
                Ok(()) => {
                    if matches!(self.state.scout.video.phase, VideoPhase::Failed(_)) {
                        self.state.scout.reset_video();
                    }
                    self.log.add_line("API key updated".to_string());
                }
                Err(e) => self.log.add_line(format!("Could not apply key: {}", e.user_message())),
            },
        }
    }

    fn is_busy(&self) -> bool {
        let scout = &self.state.scout;
        scout.plan.is_loading()
            || scout.gems.is_loading()
            || scout.briefing.is_loading()
            || scout.previews.iter().any(|s| s.is_pending())
            || scout.gem_images.values().any(|s| s.is_pending())
            || scout.video.phase.is_running()
            || scout.chat.as_ref().is_some_and(|c| c.is_awaiting_reply())
    }
}

impl eframe::App for TravelScoutApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        for line in self.runtime.drain(&mut self.state.scout) {
            self.log.add_line(line);
        }

        let actions = render_app_layout(ctx, &mut self.state, &mut self.log);
        for action in actions {
            self.handle(action);
        }

        // Results arrive on another thread; keep polling while anything is in flight
        if self.is_busy() {
            ctx.request_repaint_after(Duration::from_millis(200));
        }
    }
}

// Main application layout
// Handles window layout, panels, menu bar, and overall UI structure

use crate::state::AppState;
use crate::ui::components::*;
use eframe::egui;
use travel_scout_backend::chat::MessageRole;
use travel_scout_backend::orchestrator::plan_types::{AspectRatio, TravelPlan};
use travel_scout_backend::orchestrator::VideoPhase;
use travel_scout_backend::state::Phase;

/// Something the user asked for this frame
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiAction {
    /// Generate the travel plan and previews
    SearchPlan,
    /// List hidden spots
    FindGems,
    /// Fetch the map-grounded briefing
    Briefing,
    /// Re-run the plan for the location it was requested with
    RetryPlan,
    /// Re-run hidden spots for the location they were requested with
    RetryGems,
    /// Re-run the briefing for the location it was requested with
    RetryBriefing,
    /// Start the drone video for the current inputs
    GenerateVideo,
    /// Re-run the video with the job's own location and aspect ratio
    RetryVideo,
    /// Stop the running video job
    CancelVideo,
    /// Send a chat message
    SendChat(String),
    /// Export the plan
    SavePlan,
    /// Export the video
    SaveVideo,
    /// Rebuild the service with a new API key
    ChangeCredential(String),
}

/// Render the main application layout
/// Includes menu bar, chat sidebar, results area, and log output
pub fn render_app_layout(ctx: &egui::Context, state: &mut AppState, log: &mut LogOutput) -> Vec<UiAction> {
    let mut actions = Vec::new();

    render_menu_bar(ctx, state, &mut actions);
    render_search_bar(ctx, state, &mut actions);

    if state.ui_state.log_visible {
        egui::TopBottomPanel::bottom("log_panel")
            .resizable(true)
            .show(ctx, |ui| log.render(ui));
    }

    render_chat_sidebar(ctx, state, &mut actions);

    egui::CentralPanel::default().show(ctx, |ui| {
        egui::ScrollArea::vertical()
            .id_source("results_scroll")
            .auto_shrink([false; 2])
            .show(ui, |ui| {
                render_plan_section(ui, state, &mut actions);
                ui.separator();
                render_gems_section(ui, state, &mut actions);
                ui.separator();
                render_briefing_section(ui, state, &mut actions);
                ui.separator();
                render_video_section(ui, state, &mut actions);
            });
    });

    render_credential_dialog(ctx, state, &mut actions);

    actions
}

/// Render the top menu bar
fn render_menu_bar(ctx: &egui::Context, state: &mut AppState, actions: &mut Vec<UiAction>) {
    egui::TopBottomPanel::top("menu_bar").show(ctx, |ui| {
        egui::menu::bar(ui, |ui| {
            ui.menu_button("File", |ui| {
                if ui
                    .add_enabled(state.scout.plan.ready().is_some(), egui::Button::new("Save Plan"))
                    .clicked()
                {
                    actions.push(UiAction::SavePlan);
                    ui.close_menu();
                }
                let video_ready = matches!(state.scout.video.phase, VideoPhase::Completed(_));
                if ui
                    .add_enabled(video_ready, egui::Button::new("Save Video"))
                    .clicked()
                {
                    actions.push(UiAction::SaveVideo);
                    ui.close_menu();
                }
                ui.separator();
                if ui.button("Quit").clicked() {
                    ctx.send_viewport_cmd(egui::ViewportCommand::Close);
                }
            });

            ui.menu_button("View", |ui| {
                let mut dark_mode = ctx.style().visuals.dark_mode;
                if ui.checkbox(&mut dark_mode, "Dark Mode").changed() {
                    ctx.style_mut(|style| {
                        style.visuals.dark_mode = dark_mode;
                    });
                }
                ui.checkbox(&mut state.ui_state.log_visible, "Log Panel");
            });

            ui.menu_button("Settings", |ui| {
                if ui.button("Change API Key...").clicked() {
                    state.open_credential_dialog();
                    ui.close_menu();
                }
            });
        });
    });
}

/// Render the location input and action buttons
fn render_search_bar(ctx: &egui::Context, state: &mut AppState, actions: &mut Vec<UiAction>) {
    egui::TopBottomPanel::top("search_bar").show(ctx, |ui| {
        ui.add_space(6.0);
        ui.horizontal(|ui| {
            ui.label(egui::RichText::new("Location:").strong());
            let response = ui.add(
                egui::TextEdit::singleline(&mut state.ui_state.location_input)
                    .hint_text("e.g. Kyoto, Japan")
                    .desired_width(260.0),
            );
            let has_location = state.location().is_some();
            let submitted = response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));

            if (primary_button(ui, "Plan Trip", has_location).clicked() || (submitted && has_location))
                && !state.scout.plan.is_loading()
            {
                actions.push(UiAction::SearchPlan);
            }
            if ui
                .add_enabled(has_location && !state.scout.gems.is_loading(), egui::Button::new("Hidden Spots"))
                .clicked()
            {
                actions.push(UiAction::FindGems);
            }
            if ui
                .add_enabled(has_location && !state.scout.briefing.is_loading(), egui::Button::new("Briefing"))
                .clicked()
            {
                actions.push(UiAction::Briefing);
            }

            ui.separator();
            ui.radio_value(&mut state.ui_state.aspect_ratio, AspectRatio::Landscape, "16:9");
            ui.radio_value(&mut state.ui_state.aspect_ratio, AspectRatio::Portrait, "9:16");
            let video_running = state.scout.video.phase.is_running();
            if ui
                .add_enabled(has_location && !video_running, egui::Button::new("🎥 Drone Video"))
                .clicked()
            {
                actions.push(UiAction::GenerateVideo);
            }
        });
        ui.add_space(6.0);
    });
}

/// Render the follow-up chat in a side panel
fn render_chat_sidebar(ctx: &egui::Context, state: &mut AppState, actions: &mut Vec<UiAction>) {
    egui::SidePanel::right("chat_sidebar")
        .resizable(true)
        .default_width(300.0)
        .min_width(200.0)
        .show(ctx, |ui| {
            ui.add_space(8.0);
            ui.heading("Ask about this trip");
            ui.separator();

            let Some(session) = &state.scout.chat else {
                ui.vertical_centered(|ui| {
                    ui.add_space(40.0);
                    ui.label(egui::RichText::new("Generate a travel plan to start chatting").italics().weak());
                });
                return;
            };
            let awaiting = session.is_awaiting_reply();

            egui::ScrollArea::vertical()
                .id_source("chat_scroll")
                .auto_shrink([false; 2])
                .max_height(ui.available_height() - 40.0)
                .stick_to_bottom(true)
                .show(ui, |ui| {
                    for message in session.transcript() {
                        let (who, color) = match message.role {
                            MessageRole::User => ("You", ui.visuals().hyperlink_color),
                            MessageRole::Model => ("Guide", ui.visuals().text_color()),
                        };
                        ui.label(egui::RichText::new(who).strong().color(color));
                        ui.label(&message.content);
                        ui.add_space(6.0);
                    }
                    if awaiting {
                        loading_line(ui, "Thinking...");
                    }
                });

            ui.horizontal(|ui| {
                let response = ui.add_enabled(
                    !awaiting,
                    egui::TextEdit::singleline(&mut state.ui_state.chat_input).hint_text("Ask a question"),
                );
                let submitted = response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));
                if (ui.add_enabled(!awaiting, egui::Button::new("Send")).clicked() || submitted) && !awaiting {
                    if let Some(text) = state.take_chat_input() {
                        actions.push(UiAction::SendChat(text));
                    }
                }
            });
        });
}

/// Render the travel plan and the preview slots
fn render_plan_section(ui: &mut egui::Ui, state: &mut AppState, actions: &mut Vec<UiAction>) {
    ui.heading("Travel Plan");
    match &state.scout.plan {
        Phase::Idle => {
            ui.label(egui::RichText::new("Enter a location and press Plan Trip").weak());
        }
        Phase::Loading => loading_line(ui, "Researching the destination..."),
        Phase::Ready(plan) => render_plan(ui, plan),
        Phase::Failed(report) => {
            let (retry, change_credential) = error_panel(ui, report);
            if retry {
                actions.push(UiAction::RetryPlan);
            }
            if change_credential {
                state.open_credential_dialog();
            }
        }
    }

    if !state.scout.previews.is_empty() {
        ui.add_space(6.0);
        ui.label(egui::RichText::new("Previews").strong());
        for (slot, status) in state.scout.previews.iter().enumerate() {
            image_status_badge(ui, &format!("Preview {}", slot + 1), status);
        }
    }
}

fn render_plan(ui: &mut egui::Ui, plan: &TravelPlan) {
    ui.label(format!("Confidence: {:?}", plan.confidence_level()));
    ui.label(&plan.overview);

    egui::CollapsingHeader::new("Safety")
        .default_open(true)
        .show(ui, |ui| {
            let profile = &plan.disaster_profile;
            ui.label(format!("{} (risk {})", profile.zone_type, profile.risk_score));
            ui.label(&profile.details);
            for measure in &plan.safety_measures {
                ui.label(format!("• {}", measure));
            }
        });

    egui::CollapsingHeader::new("Itinerary")
        .default_open(true)
        .show(ui, |ui| {
            for (idx, day) in plan.itinerary.iter().enumerate() {
                ui.label(format!("Day {}: {}", idx + 1, day));
            }
        });

    egui::CollapsingHeader::new("Weather & Crowds").show(ui, |ui| {
        ui.label(&plan.weather.crowd_summary);
        egui::Grid::new("crowd_curve").striped(true).show(ui, |ui| {
            for entry in &plan.weather.crowd_curve {
                ui.label(&entry.month);
                ui.add(egui::ProgressBar::new(entry.score as f32 / 100.0).text(entry.score.to_string()));
                ui.end_row();
            }
        });
        ui.label(format!("Best time: {}", plan.weather.best_time));
        ui.label(format!("Forecast: {}", plan.weather.forecast));
    });

    egui::CollapsingHeader::new("Photography").show(ui, |ui| {
        let settings = &plan.photography.settings;
        ui.label(&plan.photography.guide);
        ui.label(format!(
            "ISO {} | Shutter {} | Aperture {}",
            settings.iso, settings.shutter_speed, settings.aperture
        ));
        if let Some(notes) = &settings.notes {
            ui.label(notes);
        }
    });

    egui::CollapsingHeader::new("Trip Guide").show(ui, |ui| {
        let guide = &plan.trip_guide;
        ui.label(format!("Transport: {}", guide.transport));
        for tip in &guide.tips {
            ui.label(format!("• {}", tip));
        }
        ui.label(format!("Packing: {}", guide.packing.join(", ")));
        ui.label(format!("Scam warnings: {}", guide.scam_warnings));
    });
}

/// Render hidden spots with their image slots
fn render_gems_section(ui: &mut egui::Ui, state: &mut AppState, actions: &mut Vec<UiAction>) {
    ui.heading("Hidden Spots");
    match &state.scout.gems {
        Phase::Idle => {
            ui.label(egui::RichText::new("Press Hidden Spots to find lesser-known places").weak());
        }
        Phase::Loading => loading_line(ui, "Scouting hidden spots..."),
        Phase::Ready(gems) if gems.is_empty() => {
            ui.label("No hidden spots found");
        }
        Phase::Ready(gems) => {
            for gem in gems {
                ui.group(|ui| {
                    ui.label(egui::RichText::new(&gem.name).strong());
                    ui.label(&gem.description);
                    ui.label(egui::RichText::new(&gem.location_hint).weak());
                    if let Some(status) = state.scout.gem_images.get(&gem.name) {
                        image_status_badge(ui, "Image", status);
                    }
                });
            }
        }
        Phase::Failed(report) => {
            let (retry, change_credential) = error_panel(ui, report);
            if retry {
                actions.push(UiAction::RetryGems);
            }
            if change_credential {
                state.open_credential_dialog();
            }
        }
    }
}

/// Render the map-grounded briefing
fn render_briefing_section(ui: &mut egui::Ui, state: &mut AppState, actions: &mut Vec<UiAction>) {
    ui.heading("Briefing");
    match &state.scout.briefing {
        Phase::Idle => {}
        Phase::Loading => loading_line(ui, "Checking the map..."),
        Phase::Ready(brief) => {
            ui.label(&brief.text);
            for source in &brief.sources {
                ui.hyperlink_to(source.title.as_str(), &source.uri);
            }
        }
        Phase::Failed(report) => {
            let (retry, change_credential) = error_panel(ui, report);
            if retry {
                actions.push(UiAction::RetryBriefing);
            }
            if change_credential {
                state.open_credential_dialog();
            }
        }
    }
}

/// Render the drone video job
fn render_video_section(ui: &mut egui::Ui, state: &mut AppState, actions: &mut Vec<UiAction>) {
    ui.heading("Drone Video");
    let job = &state.scout.video;
    match &job.phase {
        VideoPhase::Idle => {
            ui.label(egui::RichText::new("Pick an aspect ratio and press Drone Video").weak());
        }
        phase @ (VideoPhase::GeneratingReferenceImage
        | VideoPhase::Submitted { .. }
        | VideoPhase::Polling { .. }) => {
            ui.horizontal(|ui| {
                loading_line(ui, phase.progress_text().unwrap_or_default());
                if let VideoPhase::Polling { attempts, .. } = phase {
                    ui.label(egui::RichText::new(format!("({} checks)", attempts)).weak());
                }
                if ui.button("Cancel").clicked() {
                    actions.push(UiAction::CancelVideo);
                }
            });
        }
        VideoPhase::Completed(video) => {
            ui.label(format!("{} ({})", job.location, job.aspect_ratio.as_str()));
            ui.label(egui::RichText::new(video.path.display().to_string()).monospace());
            if ui.button("💾 Save Video").clicked() {
                actions.push(UiAction::SaveVideo);
            }
        }
        VideoPhase::Failed(report) => {
            let (retry, change_credential) = error_panel(ui, report);
            if retry {
                actions.push(UiAction::RetryVideo);
            }
            if change_credential {
                state.scout.reset_video();
                state.open_credential_dialog();
            }
        }
    }
}

/// Render the change-credential dialog when open
fn render_credential_dialog(ctx: &egui::Context, state: &mut AppState, actions: &mut Vec<UiAction>) {
    let Some(input) = state.ui_state.credential_input.as_mut() else {
        return;
    };

    let mut submit = false;
    let mut cancel = false;
    egui::Window::new("Change API Key")
        .collapsible(false)
        .resizable(false)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .show(ctx, |ui| {
            ui.label("Paste a Gemini API key with access to the image and video models.");
            ui.add(egui::TextEdit::singleline(input).password(true).desired_width(320.0));
            ui.horizontal(|ui| {
                submit = ui.button("Apply").clicked();
                cancel = ui.button("Cancel").clicked();
            });
        });

    if submit {
        if let Some(key) = state.take_credential() {
            actions.push(UiAction::ChangeCredential(key));
        }
    } else if cancel {
        state.ui_state.credential_input = None;
    }
}

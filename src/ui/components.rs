// Reusable UI components
// Provides common UI elements for the application

use eframe::egui;
use travel_scout_backend::error::ErrorReport;
use travel_scout_backend::orchestrator::ImageStatus;

/// Render an image slot status with colored text
/// Colors: Pending (gray), Ready (green), Failed (red)
pub fn image_status_badge(ui: &mut egui::Ui, label: &str, status: &ImageStatus) {
    let (text, text_color) = match status {
        ImageStatus::Pending => (format!("{}: generating...", label), egui::Color32::GRAY),
        ImageStatus::Ready(image) => (
            format!("{}: ready ({}, {} KB)", label, image.mime_type, image.base64.len() * 3 / 4 / 1024),
            egui::Color32::from_rgb(0, 200, 0), // Green
        ),
        ImageStatus::Failed(_) => (format!("{}: unavailable", label), egui::Color32::from_rgb(220, 0, 0)), // Red
    };

    let response = ui.colored_label(text_color, text);
    if let ImageStatus::Failed(reason) = status {
        response.on_hover_text(reason);
    }
}

/// Render a loading line with a spinner
pub fn loading_line(ui: &mut egui::Ui, text: &str) {
    ui.horizontal(|ui| {
        ui.spinner();
        ui.label(egui::RichText::new(text).italics().weak());
    });
}

/// Render an error with its retry and change-credential affordances
/// Returns (retry clicked, change credential clicked)
pub fn error_panel(ui: &mut egui::Ui, report: &ErrorReport) -> (bool, bool) {
    let mut retry = false;
    let mut change_credential = false;
    ui.colored_label(egui::Color32::from_rgb(220, 0, 0), &report.message);
    ui.horizontal(|ui| {
        if report.is_retryable() && ui.button("↻ Retry").clicked() {
            retry = true;
        }
        if report.needs_credential_change() && ui.button("🔑 Change credential").clicked() {
            change_credential = true;
        }
    });
    (retry, change_credential)
}

/// Render a primary action button
pub fn primary_button(ui: &mut egui::Ui, text: &str, enabled: bool) -> egui::Response {
    ui.add_enabled(enabled, egui::Button::new(egui::RichText::new(text).strong()))
}

/// Log output display area
/// Provides a scrollable text area for orchestrator progress
pub struct LogOutput {
    /// Buffer of output lines
    lines: Vec<String>,
    /// Maximum number of lines to keep (0 = unlimited)
    max_lines: usize,
    /// Whether to auto-scroll to bottom
    auto_scroll: bool,
}

impl LogOutput {
    /// Create a new log display
    pub fn new(max_lines: usize) -> Self {
        Self {
            lines: Vec::new(),
            max_lines,
            auto_scroll: true,
        }
    }

    /// Add a line to the output
    pub fn add_line(&mut self, line: String) {
        self.lines.push(line);
        if self.max_lines > 0 && self.lines.len() > self.max_lines {
            self.lines.remove(0);
        }
    }

    /// Number of buffered lines
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Whether the log is empty
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Clear all output
    pub fn clear(&mut self) {
        self.lines.clear();
    }

    /// Render the log in a scrollable area
    pub fn render(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            ui.label(egui::RichText::new(format!("Log ({})", self.len())).heading());
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                if ui.button("Clear").clicked() {
                    self.clear();
                }
                ui.checkbox(&mut self.auto_scroll, "Auto-scroll");
            });
        });
        ui.separator();

        egui::ScrollArea::vertical()
            .id_source("log_scroll")
            .auto_shrink([false; 2])
            .max_height(140.0)
            .show(ui, |ui| {
                for line in &self.lines {
                    ui.label(
                        egui::RichText::new(line)
                            .size(12.0)
                            .family(egui::FontFamily::Monospace),
                    );
                }

                if self.auto_scroll && !self.is_empty() {
                    ui.scroll_to_cursor(Some(egui::Align::BOTTOM));
                }
            });
    }
}

impl Default for LogOutput {
    fn default() -> Self {
        Self::new(1000) // Default to 1000 lines
    }
}

use anyhow::{anyhow, Result};
use egui::{Button, ColorImage, RichText, TextureHandle, TextureOptions, Ui};
use image::RgbaImage;
use std::path::PathBuf;
use std::time::Duration;

use crate::capture::countdown::countdown_label;
use crate::capture::{self, parse_interval, BoundingBox, CaptureSession, IntervalUnit, OutputDir};
use crate::logger;

use super::components::{card_frame, StatusBar, StatusMessageType};
use super::region_overlay::{OverlayOutcome, RegionOverlay};
use super::settings::AppSettings;

const ACCENT_COLOR: egui::Color32 = egui::Color32::from_rgb(0, 120, 215);

/// The main application state
pub struct AppState {
    /// Settings loaded at startup, saved on every start
    settings: AppSettings,
    /// Frequency text field
    frequency_input: String,
    /// Unit selected in the combo box
    unit: IntervalUnit,
    /// Where captures are written
    output_dir: OutputDir,
    /// Interval capture worker
    session: CaptureSession,
    /// Selection overlay while the window is full-screen
    overlay: Option<RegionOverlay>,
    /// Thumbnail of the last selection
    preview: Option<TextureHandle>,
    /// Status bar
    status_bar: StatusBar,
}

impl AppState {
    /// `output_override` replaces the saved output directory for this run
    pub fn new(output_override: Option<PathBuf>) -> Self {
        let mut settings = AppSettings::load();
        if let Some(dir) = output_override {
            settings.output_dir = dir;
        }

        Self {
            frequency_input: settings.frequency.clone(),
            unit: settings.unit,
            output_dir: OutputDir::new(settings.output_dir.clone()),
            settings,
            session: CaptureSession::new(),
            overlay: None,
            preview: None,
            status_bar: StatusBar::new("Ready".to_string(), StatusMessageType::Info),
        }
    }

    fn set_status(&mut self, message: impl Into<String>, message_type: StatusMessageType) {
        self.status_bar.set_message(message.into(), message_type);
    }

    /// Grab the screen and go full-screen with the selection overlay
    fn begin_selection(&mut self, frame: &mut eframe::Frame) {
        match capture::common::capture_screen_image() {
            Ok(screen) => {
                log::info!("Region selection started ({}x{})", screen.width(), screen.height());
                self.overlay = Some(RegionOverlay::new(screen));
                frame.set_fullscreen(true);
            }
            Err(e) => {
                logger::log_error("region selection", &e);
                self.set_status(format!("Screen capture failed: {}", e), StatusMessageType::Error);
            }
        }
    }

    fn handle_overlay_outcome(
        &mut self,
        ctx: &egui::Context,
        frame: &mut eframe::Frame,
        outcome: OverlayOutcome,
    ) {
        match outcome {
            OverlayOutcome::Pending => return,
            OverlayOutcome::Selected { region, preview } => {
                self.finish_selection(ctx, region, &preview)
            }
            OverlayOutcome::Empty => self.set_status(
                "Nothing selected; drag to cover a region",
                StatusMessageType::Warning,
            ),
            OverlayOutcome::Cancelled => {
                self.set_status("Selection cancelled", StatusMessageType::Info)
            }
        }

        self.overlay = None;
        frame.set_fullscreen(false);
    }

    fn finish_selection(&mut self, ctx: &egui::Context, region: BoundingBox, preview: &RgbaImage) {
        self.session.set_region(region);
        self.preview = Some(ctx.load_texture(
            "region_preview",
            ColorImage::from_rgba_unmultiplied(
                [preview.width() as usize, preview.height() as usize],
                preview.as_raw(),
            ),
            TextureOptions::LINEAR,
        ));

        log::info!("Region selected: {}", region);
        let note = if self.session.is_running() { " (applies from the next capture)" } else { "" };
        self.set_status(format!("Region selected: {}{}", region, note), StatusMessageType::Success);
    }

    fn start_capture(&mut self) {
        let interval = match parse_interval(&self.frequency_input, self.unit) {
            Ok(interval) => interval,
            Err(e) => {
                log::warn!("Invalid frequency: {}", e);
                self.set_status(e.to_string(), StatusMessageType::Error);
                return;
            }
        };

        match self
            .session
            .start(interval, self.output_dir.clone(), capture::create_capturer)
        {
            Ok(()) => {
                self.settings.frequency = self.frequency_input.clone();
                self.settings.unit = self.unit;
                self.settings.output_dir = self.output_dir.path().to_path_buf();
                if let Err(e) = self.settings.save() {
                    log::warn!("Failed to save settings: {}", e);
                }
                self.set_status(
                    format!("Capturing every {} {}", self.frequency_input.trim(), self.unit),
                    StatusMessageType::Success,
                );
            }
            Err(e) => self.set_status(e.to_string(), StatusMessageType::Warning),
        }
    }

    fn stop_capture(&mut self) {
        self.session.stop();
        if self.session.is_active() {
            self.set_status("Stopping after the current step", StatusMessageType::Info);
        }
    }

    /// Report a worker that exited since the last frame
    fn reap_worker(&mut self) {
        match self.session.poll_finished() {
            Some(Ok(())) => self.set_status(
                format!("Stopped after {} captures", self.session.captures_taken()),
                StatusMessageType::Info,
            ),
            Some(Err(e)) => {
                self.set_status(format!("Capture stopped: {}", e), StatusMessageType::Error)
            }
            None => {}
        }
    }

    fn show_controls(&mut self, ui: &mut Ui, frame: &mut eframe::Frame) {
        ui.vertical_centered(|ui| {
            ui.add_space(8.0);

            card_frame().show(ui, |ui| {
                ui.strong(RichText::new("Region").size(16.0).color(ACCENT_COLOR));
                ui.add_space(6.0);

                if ui.button("Select Region").clicked() {
                    self.begin_selection(frame);
                }

                match self.session.region() {
                    Some(region) => ui.label(region.to_string()),
                    None => ui.label("No region selected"),
                };

                if let Some(preview) = &self.preview {
                    ui.add_space(6.0);
                    ui.image(preview.id(), preview.size_vec2());
                }
            });

            card_frame().show(ui, |ui| {
                ui.strong(RichText::new("Schedule").size(16.0).color(ACCENT_COLOR));
                ui.add_space(6.0);

                ui.label("Frequency:");
                ui.add(egui::TextEdit::singleline(&mut self.frequency_input).desired_width(120.0));

                egui::ComboBox::from_id_source("unit_selector")
                    .selected_text(self.unit.as_str())
                    .show_ui(ui, |ui| {
                        for unit in IntervalUnit::ALL {
                            ui.selectable_value(&mut self.unit, unit, unit.as_str());
                        }
                    });

                ui.add_space(6.0);
                ui.horizontal(|ui| {
                    let idle = !self.session.is_active();
                    if ui.add_enabled(idle, Button::new("Start")).clicked() {
                        self.start_capture();
                    }
                    if ui.add_enabled(self.session.is_running(), Button::new("Stop")).clicked() {
                        self.stop_capture();
                    }
                });
            });

            card_frame().show(ui, |ui| {
                ui.label(RichText::new(countdown_label(self.session.countdown())).monospace());
                ui.label(format!("Captures written: {}", self.session.captures_taken()));
                if let Some(path) = self.session.last_saved() {
                    ui.label(format!("Last saved: {}", path.display()));
                }
                ui.label(format!("Output: {}", self.output_dir.path().display()));
            });
        });
    }
}

impl eframe::App for AppState {
    fn update(&mut self, ctx: &egui::Context, frame: &mut eframe::Frame) {
        if let Some(overlay) = self.overlay.as_mut() {
            let outcome = overlay.show(ctx);
            self.handle_overlay_outcome(ctx, frame, outcome);
            return;
        }

        self.reap_worker();

        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            self.status_bar.show(ui);
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            self.show_controls(ui, frame);
        });

        // The worker never touches the UI; poll it while it lives
        if self.session.is_active() {
            ctx.request_repaint_after(Duration::from_millis(250));
        }
    }
}

/// Run the egui application
pub fn run_app(output_override: Option<PathBuf>) -> Result<()> {
    let options = eframe::NativeOptions {
        initial_window_size: Some(egui::vec2(360.0, 560.0)),
        min_window_size: Some(egui::vec2(300.0, 420.0)),
        centered: true,
        renderer: eframe::Renderer::Wgpu,
        default_theme: eframe::Theme::Dark,
        ..Default::default()
    };

    eframe::run_native(
        crate::app_name(),
        options,
        Box::new(move |_cc| Box::new(AppState::new(output_override))),
    )
    .map_err(|e| anyhow!("Failed to run application: {}", e))?;

    Ok(())
}

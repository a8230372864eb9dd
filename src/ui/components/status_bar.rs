use egui::{Color32, RichText, Ui};

use crate::ui::components::StatusMessageType;

/// One-line status shown at the bottom of the main window
pub struct StatusBar {
    message: String,
    message_type: StatusMessageType,
}

impl StatusBar {
    pub fn new(message: String, message_type: StatusMessageType) -> Self {
        Self {
            message,
            message_type,
        }
    }

    /// Replace the status message
    pub fn set_message(&mut self, message: String, message_type: StatusMessageType) {
        self.message = message;
        self.message_type = message_type;
    }

    pub fn show(&self, ui: &mut Ui) {
        let color = match self.message_type {
            StatusMessageType::Info => Color32::from_rgb(255, 255, 255),
            StatusMessageType::Success => Color32::from_rgb(25, 170, 88),
            StatusMessageType::Warning => Color32::from_rgb(235, 165, 0),
            StatusMessageType::Error => Color32::from_rgb(209, 43, 43),
        };

        ui.horizontal(|ui| {
            ui.label(RichText::new(&self.message).color(color));

            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                ui.label(format!("v{}", crate::app_version()));
            });
        });
    }
}

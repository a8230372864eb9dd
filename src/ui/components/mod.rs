// UI component modules
pub mod status_bar;

pub use status_bar::StatusBar;

/// Status message type enum
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusMessageType {
    Info,
    Success,
    Warning,
    Error,
}

/// Create a card-style frame for UI elements
pub fn card_frame() -> egui::Frame {
    egui::Frame::none()
        .fill(egui::Color32::from_rgb(32, 34, 37))
        .rounding(egui::Rounding::same(5.0))
        .stroke(egui::Stroke::new(1.0, egui::Color32::from_rgb(54, 57, 63)))
        .inner_margin(egui::style::Margin::same(10.0))
        .outer_margin(egui::style::Margin::same(5.0))
}

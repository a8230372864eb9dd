// Import submodules
#[cfg(feature = "gui")]
pub mod components;
#[cfg(feature = "gui")]
pub mod egui_ui;
#[cfg(feature = "gui")]
pub mod region_overlay;
pub mod settings;

#[cfg(feature = "gui")]
pub use crate::ui::egui_ui::{run_app, AppState};
pub use crate::ui::settings::AppSettings;

use anyhow::Result;
use std::path::PathBuf;

/// Run the UI
pub fn run_ui(output_override: Option<PathBuf>) -> Result<()> {
    #[cfg(feature = "gui")]
    return crate::ui::egui_ui::run_app(output_override);

    #[cfg(not(feature = "gui"))]
    {
        let _ = output_override;
        println!("GUI is disabled. Rebuild with the `gui` feature to select regions.");
        Ok(())
    }
}

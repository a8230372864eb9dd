// Screen capture: region geometry, the interval loop and its output

pub mod common;
pub mod countdown;
pub mod interval;
pub mod output;
pub mod platform;
pub mod region;
pub mod session;

use anyhow::Result;
use image::RgbaImage;
use thiserror::Error;

pub use countdown::Countdown;
pub use interval::{parse_interval, IntervalUnit};
pub use output::OutputDir;
pub use region::{BoundingBox, Point, RegionSelector, Selection};
pub use session::{CaptureSession, SessionError};

/// Error types specific to screen capturing
#[derive(Error, Debug)]
pub enum CaptureError {
    #[error("Failed to enumerate monitors: {0}")]
    MonitorEnumeration(String),
    #[error("No primary monitor found")]
    NoPrimaryMonitor,
    #[error("Failed to capture screen: {0}")]
    CaptureFailed(String),
    #[error("Region {0} does not overlap the screen")]
    EmptyRegion(BoundingBox),
}

/// The trait every screen backend implements
pub trait ScreenCapture {
    /// Grab the whole primary screen
    fn capture_screen(&mut self) -> Result<RgbaImage>;

    /// Grab only `region` of the primary screen
    fn capture_region(&mut self, region: &BoundingBox) -> Result<RgbaImage> {
        let screen = self.capture_screen()?;
        Ok(region::crop_region(&screen, region)?)
    }
}

/// Creates the screen capturer for this platform
pub fn create_capturer() -> Result<Box<dyn ScreenCapture>> {
    Ok(Box::new(platform::XcapCapture::new()?))
}

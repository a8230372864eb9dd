//! Primary-monitor capture through `xcap`.
//!
//! This is the only file that talks to the OS capture APIs.

use anyhow::Result;
use image::RgbaImage;
use xcap::Monitor;

use super::{CaptureError, ScreenCapture};

/// Captures the primary monitor
pub struct XcapCapture {
    monitor: Monitor,
}

impl XcapCapture {
    pub fn new() -> Result<Self> {
        Ok(Self {
            monitor: primary_monitor()?,
        })
    }
}

impl ScreenCapture for XcapCapture {
    fn capture_screen(&mut self) -> Result<RgbaImage> {
        let image = self
            .monitor
            .capture_image()
            .map_err(|e| CaptureError::CaptureFailed(e.to_string()))?;
        Ok(image)
    }
}

fn primary_monitor() -> Result<Monitor, CaptureError> {
    let monitors =
        Monitor::all().map_err(|e| CaptureError::MonitorEnumeration(e.to_string()))?;

    let mut fallback = None;
    for monitor in monitors {
        if monitor.is_primary().unwrap_or(false) {
            return Ok(monitor);
        }
        // Some compositors never report a primary output; use the first one
        if fallback.is_none() {
            fallback = Some(monitor);
        }
    }

    fallback.ok_or(CaptureError::NoPrimaryMonitor)
}

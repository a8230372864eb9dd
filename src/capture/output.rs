//! Where captures land and what they are called

use anyhow::{Context, Result};
use chrono::{DateTime, Local, TimeZone};
use image::RgbaImage;
use std::fs;
use std::path::{Path, PathBuf};

/// Directory used when nothing else is configured, relative to the
/// working directory
pub const DEFAULT_OUTPUT_DIR: &str = "out";

/// File name for capture number `counter` taken at `taken_at`:
/// `{counter}_{YYYYMMDD_HHMMSS}.png`
pub fn capture_file_name<Tz: TimeZone>(counter: u64, taken_at: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    format!("{}_{}.png", counter, taken_at.format("%Y%m%d_%H%M%S"))
}

/// Output directory for numbered captures, created on first write
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputDir {
    path: PathBuf,
}

impl Default for OutputDir {
    fn default() -> Self {
        Self::new(DEFAULT_OUTPUT_DIR)
    }
}

impl OutputDir {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Create the directory if it does not exist yet
    pub fn ensure(&self) -> Result<()> {
        if !self.path.exists() {
            fs::create_dir_all(&self.path).with_context(|| {
                format!("Failed to create output directory {}", self.path.display())
            })?;
            log::info!("Created output directory {}", self.path.display());
        }
        Ok(())
    }

    /// Write `image` as capture number `counter` stamped with the local time
    pub fn save_capture(&self, counter: u64, image: &RgbaImage) -> Result<PathBuf> {
        self.save_capture_at(counter, &Local::now(), image)
    }

    pub fn save_capture_at<Tz: TimeZone>(
        &self,
        counter: u64,
        taken_at: &DateTime<Tz>,
        image: &RgbaImage,
    ) -> Result<PathBuf>
    where
        Tz::Offset: std::fmt::Display,
    {
        self.ensure()?;
        let path = self.path.join(capture_file_name(counter, taken_at));
        super::common::save_image_buffer(&path, image)?;
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn file_name_has_counter_and_timestamp() {
        let at = Utc.with_ymd_and_hms(2024, 3, 7, 9, 5, 1).unwrap();
        assert_eq!(capture_file_name(12, &at), "12_20240307_090501.png");
    }

    #[test]
    fn directory_is_created_on_first_save() {
        let tmp = tempfile::tempdir().unwrap();
        let out = OutputDir::new(tmp.path().join("nested").join("out"));
        assert!(!out.path().exists());

        let at = Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap();
        let path = out.save_capture_at(1, &at, &RgbaImage::new(4, 3)).unwrap();

        assert!(out.path().is_dir());
        assert_eq!(path, out.path().join("1_20240102_030405.png"));
        let saved = image::open(&path).unwrap();
        assert_eq!((saved.width(), saved.height()), (4, 3));
    }
}

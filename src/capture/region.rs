//! Region selection geometry.
//!
//! Pointer positions arrive in canvas space (egui points on the overlay) and
//! leave as a [`BoundingBox`] in screen pixels. Nothing here touches the
//! window toolkit, so the selection rules can be tested on their own.

use image::{imageops, RgbaImage};

use super::CaptureError;

/// A position on the overlay canvas
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Anchor and current corner of a drag, in canvas space.
///
/// The two corners are kept exactly as the pointer produced them; use
/// [`Selection::normalized`] or [`Selection::to_bounding_box`] before reading
/// them as a rectangle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Selection {
    pub start: Point,
    pub end: Point,
}

impl Selection {
    pub fn new(start: Point, end: Point) -> Self {
        Self { start, end }
    }

    /// Returns `(top_left, bottom_right)` so the rectangle reads the same
    /// whichever direction the user dragged.
    pub fn normalized(&self) -> (Point, Point) {
        let top_left = Point::new(self.start.x.min(self.end.x), self.start.y.min(self.end.y));
        let bottom_right = Point::new(self.start.x.max(self.end.x), self.start.y.max(self.end.y));
        (top_left, bottom_right)
    }

    /// Scale canvas points to screen pixels.
    ///
    /// `scale_x`/`scale_y` are screen pixels per canvas point on each axis.
    /// Negative canvas coordinates are clamped to the screen origin.
    pub fn to_bounding_box(&self, scale_x: f32, scale_y: f32) -> BoundingBox {
        let (top_left, bottom_right) = self.normalized();
        let px = |v: f32, scale: f32| (v * scale).round().max(0.0) as u32;

        BoundingBox {
            left: px(top_left.x, scale_x),
            top: px(top_left.y, scale_y),
            right: px(bottom_right.x, scale_x),
            bottom: px(bottom_right.y, scale_y),
        }
    }
}

/// Normalized capture rectangle in screen pixels.
///
/// `left <= right` and `top <= bottom` always hold for values built through
/// [`BoundingBox::new`] or [`Selection::to_bounding_box`]. The right and
/// bottom edges are exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoundingBox {
    pub left: u32,
    pub top: u32,
    pub right: u32,
    pub bottom: u32,
}

impl BoundingBox {
    /// Build a box from two arbitrary corners
    pub fn new(x1: u32, y1: u32, x2: u32, y2: u32) -> Self {
        Self {
            left: x1.min(x2),
            top: y1.min(y2),
            right: x1.max(x2),
            bottom: y1.max(y2),
        }
    }

    pub fn width(&self) -> u32 {
        self.right - self.left
    }

    pub fn height(&self) -> u32 {
        self.bottom - self.top
    }

    pub fn is_empty(&self) -> bool {
        self.width() == 0 || self.height() == 0
    }

    /// Intersect with a `width` x `height` screen anchored at the origin.
    pub fn clamp_to(&self, width: u32, height: u32) -> Self {
        Self {
            left: self.left.min(width),
            top: self.top.min(height),
            right: self.right.min(width),
            bottom: self.bottom.min(height),
        }
    }
}

impl std::fmt::Display for BoundingBox {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "({}, {}) {}x{}",
            self.left,
            self.top,
            self.width(),
            self.height()
        )
    }
}

/// Press/drag/release tracker behind the selection overlay
#[derive(Debug, Default)]
pub struct RegionSelector {
    /// Anchor recorded on press, `None` while no drag is in progress
    anchor: Option<Point>,
    /// Latest pointer position of the drag
    current: Option<Point>,
}

impl RegionSelector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the anchor; the rectangle starts out degenerate
    pub fn press(&mut self, pos: Point) {
        self.anchor = Some(pos);
        self.current = Some(pos);
    }

    /// Move the free corner. Ignored when no press was seen.
    pub fn drag(&mut self, pos: Point) {
        if self.anchor.is_some() {
            self.current = Some(pos);
        }
    }

    /// Rectangle to draw for the current frame
    pub fn current(&self) -> Option<Selection> {
        Some(Selection::new(self.anchor?, self.current?))
    }

    pub fn is_dragging(&self) -> bool {
        self.anchor.is_some()
    }

    /// Finish the drag and hand back the selection
    pub fn release(&mut self) -> Option<Selection> {
        let selection = self.current();
        self.cancel();
        selection
    }

    pub fn cancel(&mut self) {
        self.anchor = None;
        self.current = None;
    }
}

/// Crop `region` out of a full-screen `image`.
///
/// The region is first clamped to the image so a selection that runs off the
/// edge still yields the visible part.
pub fn crop_region(image: &RgbaImage, region: &BoundingBox) -> Result<RgbaImage, CaptureError> {
    let clamped = region.clamp_to(image.width(), image.height());
    if clamped.is_empty() {
        return Err(CaptureError::EmptyRegion(*region));
    }

    Ok(imageops::crop_imm(
        image,
        clamped.left,
        clamped.top,
        clamped.width(),
        clamped.height(),
    )
    .to_image())
}

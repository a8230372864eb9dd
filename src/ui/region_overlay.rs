use egui::{
    pos2, vec2, Align2, Color32, ColorImage, Context, CursorIcon, FontId, Key, Pos2, Rect,
    Sense, Stroke, TextureHandle, TextureOptions,
};
use image::RgbaImage;

use crate::capture::common::preview_from_screen;
use crate::capture::{BoundingBox, Point, RegionSelector};

/// grey75 at half opacity, laid over the frozen screen
const VEIL_COLOR: Color32 = Color32::from_rgba_premultiplied(96, 96, 96, 128);
const SELECTION_STROKE: Stroke = Stroke {
    width: 2.0,
    color: Color32::RED,
};

/// Result of one overlay frame
pub enum OverlayOutcome {
    /// Still selecting
    Pending,
    /// Mouse released over a non-empty rectangle
    Selected {
        region: BoundingBox,
        preview: RgbaImage,
    },
    /// Mouse released without covering any pixels
    Empty,
    /// Escape pressed
    Cancelled,
}

/// Full-window canvas the user drags a rectangle on.
///
/// The window is expected to be full-screen while this is shown. `backdrop`
/// is the screen as grabbed just before the overlay opened; canvas points are
/// scaled to its pixel size, which makes them screen pixels.
pub struct RegionOverlay {
    backdrop: RgbaImage,
    texture: Option<TextureHandle>,
    selector: RegionSelector,
}

impl RegionOverlay {
    pub fn new(backdrop: RgbaImage) -> Self {
        Self {
            backdrop,
            texture: None,
            selector: RegionSelector::new(),
        }
    }

    /// Draw the overlay and feed it this frame's pointer input
    pub fn show(&mut self, ctx: &Context) -> OverlayOutcome {
        if ctx.input(|i| i.key_pressed(Key::Escape)) {
            self.selector.cancel();
            return OverlayOutcome::Cancelled;
        }

        let texture = self
            .texture
            .get_or_insert_with(|| {
                let size = [self.backdrop.width() as usize, self.backdrop.height() as usize];
                ctx.load_texture(
                    "region_overlay_backdrop",
                    ColorImage::from_rgba_unmultiplied(size, self.backdrop.as_raw()),
                    TextureOptions::LINEAR,
                )
            })
            .clone();

        let mut outcome = OverlayOutcome::Pending;

        egui::CentralPanel::default()
            .frame(egui::Frame::none())
            .show(ctx, |ui| {
                let canvas = ui.max_rect();
                let _ = ui.allocate_rect(canvas, Sense::click_and_drag());
                ctx.output_mut(|o| o.cursor_icon = CursorIcon::Crosshair);

                let painter = ui.painter();
                painter.image(
                    texture.id(),
                    canvas,
                    Rect::from_min_max(pos2(0.0, 0.0), pos2(1.0, 1.0)),
                    Color32::WHITE,
                );
                painter.rect_filled(canvas, 0.0, VEIL_COLOR);

                let (pressed, down, released, pointer) = ui.input(|i| {
                    (
                        i.pointer.primary_pressed(),
                        i.pointer.primary_down(),
                        i.pointer.primary_released(),
                        i.pointer.interact_pos(),
                    )
                });
                let to_canvas = |p: Pos2| Point::new(p.x - canvas.min.x, p.y - canvas.min.y);

                if let Some(pos) = pointer {
                    if pressed && canvas.contains(pos) {
                        self.selector.press(to_canvas(pos));
                    } else if down {
                        self.selector.drag(to_canvas(pos));
                    }
                }

                // Only this frame's rectangle is painted; egui redraws from scratch
                if let Some(selection) = self.selector.current() {
                    let (tl, br) = selection.normalized();
                    let rect = Rect::from_min_max(
                        canvas.min + vec2(tl.x, tl.y),
                        canvas.min + vec2(br.x, br.y),
                    );
                    painter.rect_stroke(rect, 0.0, SELECTION_STROKE);

                    let (sx, sy) = self.scale(canvas);
                    let bbox = selection.to_bounding_box(sx, sy);
                    painter.text(
                        rect.left_top() - vec2(0.0, 4.0),
                        Align2::LEFT_BOTTOM,
                        format!("{} x {}", bbox.width(), bbox.height()),
                        FontId::proportional(14.0),
                        Color32::WHITE,
                    );
                }

                if released && self.selector.is_dragging() {
                    outcome = self.finish(canvas);
                }
            });

        outcome
    }

    /// Screen pixels per canvas point on each axis
    fn scale(&self, canvas: Rect) -> (f32, f32) {
        (
            self.backdrop.width() as f32 / canvas.width().max(1.0),
            self.backdrop.height() as f32 / canvas.height().max(1.0),
        )
    }

    fn finish(&mut self, canvas: Rect) -> OverlayOutcome {
        let Some(selection) = self.selector.release() else {
            return OverlayOutcome::Empty;
        };

        let (sx, sy) = self.scale(canvas);
        let region = selection
            .to_bounding_box(sx, sy)
            .clamp_to(self.backdrop.width(), self.backdrop.height());
        if region.is_empty() {
            log::debug!("Ignoring empty selection {:?}", selection);
            return OverlayOutcome::Empty;
        }

        match preview_from_screen(&self.backdrop, &region) {
            Ok(preview) => OverlayOutcome::Selected { region, preview },
            Err(e) => {
                log::warn!("Could not build preview for {}: {}", region, e);
                OverlayOutcome::Empty
            }
        }
    }
}

//! Modal crop session.
//!
//! Crop gestures run in a coordinate space of their own: the source's native
//! pixels, presented through a display rectangle aspect-fitted into the
//! available viewport. The session works in display-local coordinates
//! (origin at the fitted rectangle's top-left) and stores the resulting box
//! in integer source pixels, clamped into bounds on every update.

use serde::{Deserialize, Serialize};

use crate::block::{Block, CropBox, SourceSize};
use crate::geometry::{self, Point, Rect};

/// Padding around the fitted display rectangle, screen pixels per side.
pub const CROP_DISPLAY_PADDING: f32 = 8.0;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
enum CropDrag {
    #[default]
    Idle,
    Creating {
        start: Point,
        current: Point,
    },
    Moving {
        origin: (u32, u32),
        start: Point,
    },
}

/// Interactive crop-rectangle editor over one source.
#[derive(Debug, Clone, PartialEq)]
pub struct CropSession {
    source: SourceSize,
    display_width: f32,
    display_height: f32,
    crop: Option<CropBox>,
    drag: CropDrag,
}

/// Snapshot of a session for UI consumption.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CropDisplay {
    /// Fitted display width.
    pub width: f32,
    /// Fitted display height.
    pub height: f32,
}

impl CropSession {
    /// Open a session over a source, fitting its display rectangle into the
    /// available area (minus [`CROP_DISPLAY_PADDING`] per side).
    #[must_use]
    pub fn new(
        source: SourceSize,
        avail_width: f32,
        avail_height: f32,
        existing: Option<CropBox>,
    ) -> Self {
        #[allow(clippy::cast_precision_loss)]
        let (source_w, source_h) = (source.width as f32, source.height as f32);
        let avail_w = (avail_width - CROP_DISPLAY_PADDING * 2.0).max(1.0);
        let avail_h = (avail_height - CROP_DISPLAY_PADDING * 2.0).max(1.0);
        let (display_width, display_height) =
            geometry::fit_into(source_w, source_h, avail_w, avail_h);
        Self {
            source,
            display_width,
            display_height,
            crop: existing,
            drag: CropDrag::Idle,
        }
    }

    /// The fitted display rectangle's size.
    #[must_use]
    pub fn display(&self) -> CropDisplay {
        CropDisplay {
            width: self.display_width,
            height: self.display_height,
        }
    }

    /// Current crop box in source pixels, if any.
    #[must_use]
    pub fn crop(&self) -> Option<CropBox> {
        self.crop
    }

    /// Whether a crop gesture is in progress.
    #[must_use]
    pub fn is_dragging(&self) -> bool {
        self.drag != CropDrag::Idle
    }

    /// The crop box mapped back into display coordinates, for overlays.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn crop_display_rect(&self) -> Option<Rect> {
        let crop = self.crop?;
        let sx = self.display_width / self.source.width as f32;
        let sy = self.display_height / self.source.height as f32;
        Some(Rect::new(
            crop.x as f32 * sx,
            crop.y as f32 * sy,
            crop.width as f32 * sx,
            crop.height as f32 * sy,
        ))
    }

    /// Begin a gesture at a display-local point.
    ///
    /// A down-point inside the existing crop box starts a move (the box
    /// keeps its size); anywhere else starts a fresh rectangle.
    pub fn pointer_down(&mut self, point: Point) {
        let source_point = self.to_source(point);
        match self.crop {
            Some(crop) if crop.contains(source_point) => {
                self.drag = CropDrag::Moving {
                    origin: (crop.x, crop.y),
                    start: point,
                };
            }
            _ => {
                self.drag = CropDrag::Creating {
                    start: point,
                    current: point,
                };
                self.crop = Some(self.creating_crop(point, point));
            }
        }
    }

    /// Update the gesture with a new display-local point.
    pub fn pointer_move(&mut self, point: Point) {
        match self.drag {
            CropDrag::Idle => {}
            CropDrag::Creating { start, .. } => {
                self.drag = CropDrag::Creating {
                    start,
                    current: point,
                };
                self.crop = Some(self.creating_crop(start, point));
            }
            CropDrag::Moving { origin, start } => {
                if let Some(crop) = self.crop {
                    self.crop = Some(self.moved_crop(crop, origin, start, point));
                }
            }
        }
    }

    /// End the gesture; the crop box stays as it is.
    pub fn pointer_up(&mut self) {
        self.drag = CropDrag::Idle;
    }

    /// Drop the crop box entirely.
    pub fn clear(&mut self) {
        self.crop = None;
        self.drag = CropDrag::Idle;
    }

    /// Commit the session to the owning block: write the crop box and re-fit
    /// the block's displayed size to the new target aspect (the crop's, or
    /// the full source's when the crop was cleared).
    pub fn commit_to(&self, block: &mut Block) {
        let aspect = self.crop.map_or_else(|| self.source.aspect(), |c| c.aspect());
        refit_to_aspect(block, aspect);
        block.set_crop(self.crop);
    }

    #[allow(clippy::cast_precision_loss)]
    fn to_source(&self, point: Point) -> Point {
        Point::new(
            point.x * self.source.width as f32 / self.display_width,
            point.y * self.source.height as f32 / self.display_height,
        )
    }

    #[allow(
        clippy::cast_precision_loss,
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss
    )]
    fn creating_crop(&self, start: Point, current: Point) -> CropBox {
        let min_x = start.x.min(current.x).clamp(0.0, self.display_width);
        let min_y = start.y.min(current.y).clamp(0.0, self.display_height);
        let max_x = start.x.max(current.x).clamp(0.0, self.display_width);
        let max_y = start.y.max(current.y).clamp(0.0, self.display_height);

        let sx = self.source.width as f32 / self.display_width;
        let sy = self.source.height as f32 / self.display_height;
        let x = (min_x * sx).round() as u32;
        let y = (min_y * sy).round() as u32;
        let width = ((max_x - min_x) * sx).round() as u32;
        let height = ((max_y - min_y) * sy).round() as u32;
        // Independent rounding can overshoot by one pixel at the far edge.
        CropBox::new(
            x.min(self.source.width),
            y.min(self.source.height),
            width.min(self.source.width.saturating_sub(x)),
            height.min(self.source.height.saturating_sub(y)),
        )
    }

    #[allow(
        clippy::cast_precision_loss,
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss
    )]
    fn moved_crop(
        &self,
        crop: CropBox,
        origin: (u32, u32),
        start: Point,
        current: Point,
    ) -> CropBox {
        let sx = self.source.width as f32 / self.display_width;
        let sy = self.source.height as f32 / self.display_height;
        let dx = (current.x - start.x) * sx;
        let dy = (current.y - start.y) * sy;
        let max_x = (self.source.width - crop.width) as f32;
        let max_y = (self.source.height - crop.height) as f32;
        CropBox::new(
            (origin.0 as f32 + dx).round().clamp(0.0, max_x) as u32,
            (origin.1 as f32 + dy).round().clamp(0.0, max_y) as u32,
            crop.width,
            crop.height,
        )
    }
}

/// Re-fit a block's displayed size to a target aspect ratio, shrinking the
/// dimension the block overshoots in.
pub fn refit_to_aspect(block: &mut Block, aspect: f32) {
    if block.aspect() > aspect {
        block.width = block.height * aspect;
    } else {
        block.height = block.width / aspect;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::block::BlockKind;

    /// 100x100 source displayed 1:1 (avail minus padding is 100x200).
    fn unit_session(existing: Option<CropBox>) -> CropSession {
        CropSession::new(SourceSize::new(100, 100), 116.0, 216.0, existing)
    }

    fn image_block(w: f32, h: f32) -> Block {
        Block::new(
            BlockKind::Image {
                src: "img://fixture".into(),
                crop: None,
            },
            0.0,
            0.0,
            w,
            h,
        )
    }

    #[test]
    fn test_display_fit_subtracts_padding() {
        let session = unit_session(None);
        let display = session.display();
        assert!((display.width - 100.0).abs() < 1e-3);
        assert!((display.height - 100.0).abs() < 1e-3);
    }

    #[test]
    fn test_create_normalizes_and_clamps() {
        let mut session = unit_session(None);
        session.pointer_down(Point::new(60.0, 80.0));
        assert_eq!(session.crop(), Some(CropBox::new(60, 80, 0, 0)));

        // Dragging up-left normalizes the span.
        session.pointer_move(Point::new(10.0, 20.0));
        assert_eq!(session.crop(), Some(CropBox::new(10, 20, 50, 60)));

        // Dragging past the display edge clamps before scaling.
        session.pointer_move(Point::new(150.0, 130.0));
        assert_eq!(session.crop(), Some(CropBox::new(60, 80, 40, 20)));

        session.pointer_up();
        assert!(!session.is_dragging());
        assert_eq!(session.crop(), Some(CropBox::new(60, 80, 40, 20)));
    }

    #[test]
    fn test_down_inside_crop_moves_it() {
        let mut session = unit_session(Some(CropBox::new(10, 20, 50, 60)));
        session.pointer_down(Point::new(30.0, 40.0));
        session.pointer_move(Point::new(35.0, 10.0));
        // +5 in x; -30 in y clamps at 0.
        assert_eq!(session.crop(), Some(CropBox::new(15, 0, 50, 60)));

        // The box keeps its size against the far edge too.
        session.pointer_move(Point::new(300.0, 40.0));
        assert_eq!(session.crop(), Some(CropBox::new(50, 20, 50, 60)));
    }

    #[test]
    fn test_down_outside_crop_starts_fresh() {
        let mut session = unit_session(Some(CropBox::new(10, 20, 30, 30)));
        session.pointer_down(Point::new(80.0, 80.0));
        assert_eq!(session.crop(), Some(CropBox::new(80, 80, 0, 0)));
    }

    #[test]
    fn test_crop_never_exceeds_source() {
        // 3x3 source on a 2x2 display: half-pixel rounding would otherwise
        // push x + width past the source edge.
        let mut session = CropSession::new(SourceSize::new(3, 3), 18.0, 18.0, None);
        session.pointer_down(Point::new(1.0, 1.0));
        session.pointer_move(Point::new(2.0, 2.0));
        let crop = session.crop().unwrap();
        assert!(crop.x + crop.width <= 3);
        assert!(crop.y + crop.height <= 3);
    }

    #[test]
    fn test_commit_refits_block_to_crop_aspect() {
        let mut session = unit_session(None);
        session.crop = Some(CropBox::new(0, 0, 50, 100));
        let mut block = image_block(200.0, 100.0);
        session.commit_to(&mut block);
        // Block aspect 2.0 > crop aspect 0.5: width shrinks, height holds.
        assert!((block.height - 100.0).abs() < f32::EPSILON);
        assert!((block.width - 50.0).abs() < f32::EPSILON);
        assert_eq!(block.crop(), Some(CropBox::new(0, 0, 50, 100)));
    }

    #[test]
    fn test_commit_after_clear_refits_to_source() {
        let session = unit_session(None);
        let mut block = image_block(50.0, 100.0);
        block.set_crop(Some(CropBox::new(0, 0, 10, 10)));
        session.commit_to(&mut block);
        // Source aspect 1.0; block aspect 0.5 < 1.0: height shrinks.
        assert!((block.width - 50.0).abs() < f32::EPSILON);
        assert!((block.height - 50.0).abs() < f32::EPSILON);
        assert_eq!(block.crop(), None);
    }

    #[test]
    fn test_refit_to_feed_aspect() {
        let mut block = image_block(200.0, 100.0);
        refit_to_aspect(&mut block, 1.0);
        assert!((block.width - 100.0).abs() < f32::EPSILON);
        assert!((block.height - 100.0).abs() < f32::EPSILON);
    }
}

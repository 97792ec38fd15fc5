//! Application state container and gesture state machine.
//!
//! [`Editor`] owns the board, the camera, the selection, and the in-flight
//! drag state, and is the single `&mut` entry point for every mutation.
//! Pointer and wheel events drive the machine; batch operations (duplicate,
//! delete, flip, blend, stamp) act on the current selection. Gesture moves
//! that reference a block deleted mid-drag are skipped silently; ids are
//! never reused, so a stale id can only miss.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::block::{
    self, BlendMode, Block, BlockId, BlockKind, CropBox, SourceSize, WebcamSettings,
};
use crate::board::Board;
use crate::camera::{self, Camera, Viewport};
use crate::crop::{self, CropSession};
use crate::error::CoreResult;
use crate::geometry::{self, Point, Rect};
use crate::input::{
    DragState, PointerButton, PointerEvent, ResizeHandle, RotateSnapshot, WheelEvent,
};
use crate::selection::{self, Selection, SelectionBox};

/// Screen-pixel radius around a selection-box corner that reads as the
/// resize handle.
pub const RESIZE_HIT_RADIUS: f32 = 8.0;

/// Screen-pixel radius around a corner that reads as the rotate handle.
/// The resize zone sits inside it and wins on overlap.
pub const ROTATE_HIT_RADIUS: f32 = 24.0;

/// Divisor turning a ctrl-wheel delta into a zoom step.
pub const WHEEL_ZOOM_DIVISOR: f32 = 400.0;

/// Keyboard modifiers accompanying a pointer event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Modifiers {
    /// Additive selection (shift).
    pub shift: bool,
    /// Pan override (space hold or a dedicated pan tool).
    pub pan: bool,
}

/// What a pointer-down lands on, checked in paint order: handles of the
/// selection box first, then block bodies, then empty canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitTarget {
    /// A resize handle of the selection box.
    Resize(ResizeHandle),
    /// A rotate handle of the selection box.
    Rotate(ResizeHandle),
    /// A block body.
    Block(BlockId),
    /// Nothing.
    Empty,
}

/// Direction a stamped webcam block steps in afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StampDirection {
    /// Up and left.
    UpLeft,
    /// Straight up.
    Up,
    /// Up and right.
    UpRight,
    /// Straight left.
    Left,
    /// No movement.
    #[default]
    Stay,
    /// Straight right.
    Right,
    /// Down and left.
    DownLeft,
    /// Straight down.
    Down,
    /// Down and right.
    DownRight,
}

impl StampDirection {
    /// Unit step per axis: -1, 0 or 1.
    #[must_use]
    pub fn unit_move(self) -> (f32, f32) {
        let x = match self {
            Self::UpLeft | Self::Left | Self::DownLeft => -1.0,
            Self::UpRight | Self::Right | Self::DownRight => 1.0,
            _ => 0.0,
        };
        let y = match self {
            Self::UpLeft | Self::Up | Self::UpRight => -1.0,
            Self::DownLeft | Self::Down | Self::DownRight => 1.0,
            _ => 0.0,
        };
        (x, y)
    }
}

/// Fraction of the block's own size a stamp step covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StampOffset {
    /// One eighth.
    Eighth,
    /// One quarter.
    Quarter,
    /// One half.
    #[default]
    Half,
    /// Three quarters.
    ThreeQuarters,
    /// The full block size.
    Full,
}

impl StampOffset {
    /// The fraction as a scalar.
    #[must_use]
    pub fn fraction(self) -> f32 {
        match self {
            Self::Eighth => 0.125,
            Self::Quarter => 0.25,
            Self::Half => 0.5,
            Self::ThreeQuarters => 0.75,
            Self::Full => 1.0,
        }
    }
}

/// The whole editor state and its single mutation entry point.
#[derive(Debug, Clone, PartialEq)]
pub struct Editor {
    board: Board,
    camera: Camera,
    viewport: Viewport,
    selection: Selection,
    drag: DragState,
    webcam_settings: HashMap<String, WebcamSettings>,
    show_camera: bool,
}

impl Editor {
    /// Create an empty editor over a viewport.
    #[must_use]
    pub fn new(viewport: Viewport) -> Self {
        Self {
            board: Board::new(),
            camera: Camera::default(),
            viewport,
            selection: Selection::new(),
            drag: DragState::Idle,
            webcam_settings: HashMap::new(),
            show_camera: true,
        }
    }

    /// The board.
    #[must_use]
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// The camera.
    #[must_use]
    pub fn camera(&self) -> Camera {
        self.camera
    }

    /// Replace the camera wholesale (e.g. restoring a view).
    pub fn set_camera(&mut self, camera: Camera) {
        self.camera = camera;
    }

    /// The viewport.
    #[must_use]
    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Track a host window resize.
    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    /// The current selection.
    #[must_use]
    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    /// Select every block on the board.
    pub fn select_all(&mut self) {
        self.selection.replace(self.board.ids().to_vec());
    }

    /// Make `id` the sole selected block, if it exists.
    pub fn select_only(&mut self, id: BlockId) {
        if self.board.get(id).is_some() {
            self.selection.set_single(id);
        }
    }

    /// Drop the selection without touching any block.
    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    /// The in-flight drag state.
    #[must_use]
    pub fn drag(&self) -> &DragState {
        &self.drag
    }

    /// Whether the live camera preview is shown.
    #[must_use]
    pub fn show_camera(&self) -> bool {
        self.show_camera
    }

    /// Toggle the live camera preview.
    pub fn set_show_camera(&mut self, show: bool) {
        self.show_camera = show;
    }

    /// Per-device webcam feed settings.
    #[must_use]
    pub fn webcam_settings_map(&self) -> &HashMap<String, WebcamSettings> {
        &self.webcam_settings
    }

    /// Settings for one device, created with defaults on first access.
    pub fn webcam_settings_mut(&mut self, device_id: &str) -> &mut WebcamSettings {
        self.webcam_settings
            .entry(device_id.to_owned())
            .or_insert_with(|| WebcamSettings {
                device_id: device_id.to_owned(),
                ..WebcamSettings::default()
            })
    }

    /// The selection's derived bounding box.
    #[must_use]
    pub fn selection_box(&self) -> Option<SelectionBox> {
        selection::selection_box(&self.board, &self.selection)
    }

    /// Hit-test a screen point against handles, then block bodies.
    #[must_use]
    pub fn hit_test(&self, screen: Point) -> HitTarget {
        let canvas_point = camera::screen_to_canvas(screen, self.camera, self.viewport);
        self.hit_test_canvas(canvas_point)
    }

    // ----- pointer machine ---------------------------------------------

    /// Feed a pointer-down; decides which gesture starts.
    pub fn pointer_down(&mut self, event: &PointerEvent, modifiers: Modifiers) {
        let screen = event.position();
        if modifiers.pan || event.button != PointerButton::Primary {
            self.drag = DragState::Panning {
                last_screen: screen,
            };
        } else {
            let canvas_point = camera::screen_to_canvas(screen, self.camera, self.viewport);
            self.primary_down(canvas_point, modifiers.shift);
        }
        debug!(mode = self.drag.mode_name(), "pointer down");
    }

    /// Feed a pointer-move; advances whichever gesture is active.
    pub fn pointer_move(&mut self, event: &PointerEvent) {
        let screen = event.position();
        let canvas_point = camera::screen_to_canvas(screen, self.camera, self.viewport);
        match self.drag.clone() {
            DragState::Idle => {}
            DragState::Panning { last_screen } => {
                let dx = (screen.x - last_screen.x) / self.camera.z;
                let dy = (screen.y - last_screen.y) / self.camera.z;
                self.camera = self.camera.pan(-dx, -dy);
                self.drag = DragState::Panning {
                    last_screen: screen,
                };
            }
            DragState::RubberBand { start, .. } => {
                let probe = Rect::from_corners(start, canvas_point);
                let hits = self.board.ids_intersecting(&probe);
                self.selection.replace(hits);
                self.drag = DragState::RubberBand {
                    start,
                    current: canvas_point,
                };
            }
            DragState::Moving { start, origins } => {
                let dx = canvas_point.x - start.x;
                let dy = canvas_point.y - start.y;
                for (id, origin) in origins {
                    let _ = self.board.update(id, |b| {
                        b.x = origin.x + dx;
                        b.y = origin.y + dy;
                    });
                }
            }
            DragState::ResizingSingle { id, handle } => {
                self.resize_single(id, handle, canvas_point);
            }
            DragState::ResizingMulti {
                handle,
                start_box,
                members,
            } => {
                self.resize_multi(handle, &start_box, &members, canvas_point);
            }
            DragState::RotatingSingle {
                id,
                center,
                start_rotation,
                start_angle,
            } => {
                let delta = rotate_angle(canvas_point, center) - start_angle;
                let _ = self.board.update(id, |b| b.rotation = start_rotation + delta);
            }
            DragState::RotatingMulti {
                pivot,
                start_angle,
                members,
            } => {
                let delta = rotate_angle(canvas_point, pivot) - start_angle;
                for member in members {
                    let new_center = geometry::rotate_around(member.center, pivot, delta);
                    let _ = self.board.update(member.id, |b| {
                        b.rotation = member.rotation + delta;
                        b.x = new_center.x - b.width / 2.0;
                        b.y = new_center.y - b.height / 2.0;
                    });
                }
            }
        }
    }

    /// Feed a pointer-up; applies the final position and ends the gesture.
    pub fn pointer_up(&mut self, event: &PointerEvent) {
        if !self.drag.is_idle() {
            self.pointer_move(event);
            debug!(mode = self.drag.mode_name(), "pointer up");
        }
        self.drag = DragState::Idle;
    }

    /// Feed a wheel event: ctrl zooms about the cursor, plain pans.
    pub fn wheel(&mut self, event: &WheelEvent) {
        if event.ctrl {
            let delta_z = event.delta_y / WHEEL_ZOOM_DIVISOR;
            let cursor = Point::new(event.x, event.y);
            self.camera = self.camera.zoom_at(cursor, delta_z, self.viewport);
        } else {
            self.camera = self.camera.pan(event.delta_x, event.delta_y);
        }
    }

    // ----- block operations --------------------------------------------

    /// Place an image block fitted to the placement size, centered on `at`
    /// (canvas space) or on the viewport center.
    pub fn place_image(&mut self, src: String, natural: SourceSize, at: Option<Point>) -> BlockId {
        self.place_block(BlockKind::Image { src, crop: None }, natural, at)
    }

    /// Place a webcam block for a device, fitted like an image placement.
    pub fn place_webcam(
        &mut self,
        device_id: String,
        natural: SourceSize,
        at: Option<Point>,
    ) -> BlockId {
        self.place_block(
            BlockKind::Webcam {
                source: device_id,
                crop: None,
            },
            natural,
            at,
        )
    }

    fn place_block(&mut self, kind: BlockKind, natural: SourceSize, at: Option<Point>) -> BlockId {
        let center = at.unwrap_or_else(|| {
            camera::screen_to_canvas(self.viewport.center(), self.camera, self.viewport)
        });
        let bounds = block::placement_bounds(natural, center);
        let placed = Block::new(kind, bounds.x, bounds.y, bounds.width, bounds.height);
        let id = placed.id;
        debug!(%id, width = bounds.width, height = bounds.height, "placed block");
        self.board.insert(placed);
        id
    }

    /// Delete every selected block; returns the removed ids so the host can
    /// release feed bindings.
    pub fn delete_selection(&mut self) -> Vec<BlockId> {
        let ids = self.selection.ids().to_vec();
        self.board.remove_batch(&ids);
        self.selection.clear();
        debug!(count = ids.len(), "deleted selection");
        ids
    }

    /// Duplicate every selected block at a +16,+16 offset; the duplicates
    /// become the new selection.
    pub fn duplicate_selection(&mut self) -> Vec<BlockId> {
        let new_ids = self.board.duplicate_batch(self.selection.ids());
        self.selection.replace(new_ids.clone());
        debug!(count = new_ids.len(), "duplicated selection");
        new_ids
    }

    /// Toggle each selected block's own horizontal flip flag.
    pub fn toggle_flip_horizontal(&mut self) {
        for id in self.selection.ids().to_vec() {
            let _ = self
                .board
                .update(id, |b| b.flipped_horizontally = !b.flipped_horizontally);
        }
    }

    /// Toggle each selected block's own vertical flip flag.
    pub fn toggle_flip_vertical(&mut self) {
        for id in self.selection.ids().to_vec() {
            let _ = self
                .board
                .update(id, |b| b.flipped_vertically = !b.flipped_vertically);
        }
    }

    /// Assign a blend mode to every selected block.
    pub fn set_blend(&mut self, blend: BlendMode) {
        for id in self.selection.ids().to_vec() {
            let _ = self.board.update(id, |b| b.blend = blend);
        }
    }

    /// Commit a crop session to a block.
    ///
    /// # Errors
    ///
    /// Returns [`crate::CoreError::BlockNotFound`] if the block has been
    /// deleted since the session opened.
    pub fn apply_crop(&mut self, id: BlockId, session: &CropSession) -> CoreResult<()> {
        self.board.update(id, |b| session.commit_to(b))
    }

    /// Stamp every webcam block into a static image block.
    ///
    /// `capture` turns the block's current rendered raster into a fresh
    /// opaque image source. The stamp copies geometry, rotation and blend
    /// (flips are already baked into the capture, so they reset); the source
    /// webcam block then steps by direction x fraction of its own size and
    /// is restamped one z above the stamp. The camera pans along with
    /// whichever webcam block sits closest to the viewport center.
    pub fn stamp<F>(
        &mut self,
        direction: StampDirection,
        offset: StampOffset,
        mut capture: F,
    ) -> Vec<BlockId>
    where
        F: FnMut(&Block) -> String,
    {
        let (unit_x, unit_y) = direction.unit_move();
        let fraction = offset.fraction();
        let view_center =
            camera::screen_to_canvas(self.viewport.center(), self.camera, self.viewport);

        let webcam_ids: Vec<BlockId> = self
            .board
            .blocks()
            .filter(|b| b.is_webcam())
            .map(|b| b.id)
            .collect();

        let mut new_ids = Vec::with_capacity(webcam_ids.len());
        let mut closest: Option<(f32, (f32, f32))> = None;
        for id in webcam_ids {
            let Some(source) = self.board.get(id).cloned() else {
                continue;
            };
            let move_x = unit_x * fraction * source.width;
            let move_y = unit_y * fraction * source.height;
            let distance = source.center().distance_to(view_center);
            if closest.is_none_or(|(best, _)| distance < best) {
                closest = Some((distance, (move_x, move_y)));
            }

            let src = capture(&source);
            let mut stamped = Block::new(
                BlockKind::Image { src, crop: None },
                source.x,
                source.y,
                source.width,
                source.height,
            );
            stamped.rotation = source.rotation;
            stamped.blend = source.blend;
            let stamped_id = stamped.id;
            self.board.insert(stamped);

            let raised = block::make_z_index() + 1;
            let _ = self.board.update(id, |b| {
                b.x += move_x;
                b.y += move_y;
                b.z_index = raised;
            });
            new_ids.push(stamped_id);
        }

        if let Some((_, (dx, dy))) = closest {
            self.camera = self.camera.pan(dx, dy);
        }
        debug!(count = new_ids.len(), "stamped webcam blocks");
        new_ids
    }

    // ----- webcam feed plumbing ----------------------------------------

    /// Record a feed's frame size and re-fit its blocks to the feed (or
    /// feed-crop) aspect. Degenerate sizes are stored but never re-fit.
    pub fn set_webcam_video_size(&mut self, device_id: &str, size: SourceSize) {
        self.webcam_settings_mut(device_id).video_size = size;
        if size.width == 0 || size.height == 0 {
            return;
        }
        self.refit_webcam_blocks(device_id);
    }

    /// Replace a feed's pre-crop and re-fit its blocks.
    pub fn set_webcam_crop(&mut self, device_id: &str, crop: Option<CropBox>) {
        self.webcam_settings_mut(device_id).crop_box = crop;
        self.refit_webcam_blocks(device_id);
    }

    fn refit_webcam_blocks(&mut self, device_id: &str) {
        let Some(settings) = self.webcam_settings.get(device_id) else {
            return;
        };
        let aspect = settings
            .crop_box
            .map_or_else(|| settings.video_size.aspect(), |c| c.aspect());
        if !aspect.is_finite() || aspect <= 0.0 {
            return;
        }
        let ids: Vec<BlockId> = self
            .board
            .blocks()
            .filter(|b| b.is_webcam() && b.source_ref() == device_id)
            .map(|b| b.id)
            .collect();
        for id in ids {
            let _ = self.board.update(id, |b| crop::refit_to_aspect(b, aspect));
        }
    }

    /// Swap in restored state; selection and drag reset.
    pub fn restore(
        &mut self,
        board: Board,
        webcam_settings: HashMap<String, WebcamSettings>,
        show_camera: bool,
    ) {
        self.board = board;
        self.webcam_settings = webcam_settings;
        self.show_camera = show_camera;
        self.selection.clear();
        self.drag = DragState::Idle;
    }

    // ----- gesture internals -------------------------------------------

    fn hit_test_canvas(&self, canvas_point: Point) -> HitTarget {
        if let Some(sel_box) = self.selection_box() {
            let rect = sel_box.rect();
            let center = sel_box.center();
            let resize_radius = RESIZE_HIT_RADIUS / self.camera.z;
            let rotate_radius = ROTATE_HIT_RADIUS / self.camera.z;
            for handle in ResizeHandle::ALL {
                let corner =
                    geometry::rotate_around(handle.corner(&rect), center, sel_box.rotation);
                if canvas_point.distance_to(corner) <= resize_radius {
                    return HitTarget::Resize(handle);
                }
            }
            for handle in ResizeHandle::ALL {
                let corner =
                    geometry::rotate_around(handle.corner(&rect), center, sel_box.rotation);
                if canvas_point.distance_to(corner) <= rotate_radius {
                    return HitTarget::Rotate(handle);
                }
            }
        }
        match self.board.top_block_at(canvas_point) {
            Some(top) => HitTarget::Block(top.id),
            None => HitTarget::Empty,
        }
    }

    fn primary_down(&mut self, canvas_point: Point, shift: bool) {
        match self.hit_test_canvas(canvas_point) {
            HitTarget::Resize(handle) => self.begin_resize(handle),
            HitTarget::Rotate(_) => self.begin_rotate(canvas_point),
            HitTarget::Block(id) => {
                if shift {
                    self.selection.toggle(id);
                } else if !self.selection.contains(id) {
                    self.selection.set_single(id);
                }
                if self.selection.contains(id) {
                    self.begin_move(canvas_point);
                }
            }
            HitTarget::Empty => {
                if !shift {
                    self.selection.clear();
                }
                self.drag = DragState::RubberBand {
                    start: canvas_point,
                    current: canvas_point,
                };
            }
        }
    }

    fn begin_resize(&mut self, handle: ResizeHandle) {
        let Some(sel_box) = self.selection_box() else {
            return;
        };
        if sel_box.count == 1 {
            let Some(&id) = self.selection.ids().first() else {
                return;
            };
            self.drag = DragState::ResizingSingle { id, handle };
        } else {
            self.drag = DragState::ResizingMulti {
                handle,
                start_box: sel_box.rect(),
                members: self.member_rects(),
            };
        }
    }

    fn begin_rotate(&mut self, canvas_point: Point) {
        let Some(sel_box) = self.selection_box() else {
            return;
        };
        if sel_box.count == 1 {
            let Some(&id) = self.selection.ids().first() else {
                return;
            };
            let Some(target) = self.board.get(id) else {
                return;
            };
            let center = target.center();
            self.drag = DragState::RotatingSingle {
                id,
                center,
                start_rotation: target.rotation,
                start_angle: rotate_angle(canvas_point, center),
            };
        } else {
            let pivot = sel_box.center();
            let members = self
                .selection
                .ids()
                .iter()
                .filter_map(|&id| {
                    self.board.get(id).map(|b| RotateSnapshot {
                        id,
                        center: b.center(),
                        rotation: b.rotation,
                    })
                })
                .collect();
            self.drag = DragState::RotatingMulti {
                pivot,
                start_angle: rotate_angle(canvas_point, pivot),
                members,
            };
        }
    }

    fn begin_move(&mut self, canvas_point: Point) {
        let origins = self
            .selection
            .ids()
            .iter()
            .filter_map(|&id| self.board.get(id).map(|b| (id, Point::new(b.x, b.y))))
            .collect();
        self.drag = DragState::Moving {
            start: canvas_point,
            origins,
        };
    }

    fn member_rects(&self) -> Vec<(BlockId, Rect)> {
        self.selection
            .ids()
            .iter()
            .filter_map(|&id| self.board.get(id).map(|b| (id, b.bounds())))
            .collect()
    }

    /// Rotation-aware single-block resize. Re-derived from the current block
    /// on every move; the dragged handle's opposite corner keeps its exact
    /// rendered position throughout.
    fn resize_single(&mut self, id: BlockId, handle: ResizeHandle, canvas_point: Point) {
        let Some(target) = self.board.get(id) else {
            return;
        };
        let bounds = target.bounds();
        let center = bounds.center();
        let rotation = target.rotation;

        // Fixed corner in the unrotated frame, and where it currently renders.
        let fixed = handle.anchor(&bounds);
        let rendered_fixed = geometry::rotate_around(fixed, center, rotation);

        // Pointer into the unrotated frame; signed spans from the fixed corner.
        let local_pointer = geometry::rotate_around(canvas_point, center, -rotation);
        let (sign_x, sign_y) = handle.signs();
        let proposed_w = (local_pointer.x - fixed.x) * sign_x;
        let proposed_h = (local_pointer.y - fixed.y) * sign_y;

        let (width, height) = if target.preserves_aspect() {
            let aspect = target.aspect();
            let (w, h) = geometry::fit_to_aspect(proposed_w, proposed_h, aspect);
            block::clamp_size_locked(w, h, aspect)
        } else {
            block::clamp_size(proposed_w, proposed_h)
        };

        // New unrotated placement grows away from the fixed corner.
        let new_center = Point::new(
            fixed.x + sign_x * width / 2.0,
            fixed.y + sign_y * height / 2.0,
        );
        let top_left_x = new_center.x - width / 2.0;
        let top_left_y = new_center.y - height / 2.0;

        // Rotation happens about the new center, which drags the fixed
        // corner's rendered position; cancel that drift.
        let rendered_after = geometry::rotate_around(fixed, new_center, rotation);
        let shift_x = rendered_after.x - rendered_fixed.x;
        let shift_y = rendered_after.y - rendered_fixed.y;

        let _ = self.board.update(id, |b| {
            b.x = top_left_x - shift_x;
            b.y = top_left_y - shift_y;
            b.width = width;
            b.height = height;
        });
    }

    /// Envelope resize: a uniform scale about the fixed envelope corner,
    /// applied to every member; rotations are untouched.
    fn resize_multi(
        &mut self,
        handle: ResizeHandle,
        start_box: &Rect,
        members: &[(BlockId, Rect)],
        canvas_point: Point,
    ) {
        let anchor = handle.anchor(start_box);
        let (sign_x, sign_y) = handle.signs();
        let proposed_w = (canvas_point.x - anchor.x) * sign_x;
        let proposed_h = (canvas_point.y - anchor.y) * sign_y;

        let aspect = start_box.width / start_box.height;
        let (fit_w, fit_h) = geometry::fit_to_aspect(proposed_w, proposed_h, aspect);
        let (width, _) = block::clamp_size_locked(fit_w, fit_h, aspect);
        let scale = width / start_box.width;

        for &(id, rect) in members {
            let scaled = selection::scale_rect_about(rect, anchor, scale);
            let _ = self.board.update(id, |b| {
                b.x = scaled.x;
                b.y = scaled.y;
                b.width = scaled.width;
                b.height = scaled.height;
            });
        }
    }
}

/// Pointer angle about a center. The corner handle sits 45 degrees off the
/// block's axes; the offset cancels in deltas, so it only fixes the zero.
fn rotate_angle(point: Point, center: Point) -> f32 {
    (point.y - center.y).atan2(point.x - center.x) + std::f32::consts::FRAC_PI_4
}

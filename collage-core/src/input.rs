//! Input event types and the ephemeral drag-session state.
//!
//! Pointer and wheel events are the only inputs the gesture state machine
//! accepts. [`DragState`] is created on pointer-down, carries the gesture's
//! start snapshot for its whole duration, and is torn down on pointer-up.
//! It is never persisted.

use serde::{Deserialize, Serialize};

use crate::block::BlockId;
use crate::geometry::{Point, Rect};

/// Pointer button that initiated an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PointerButton {
    /// Left / touch contact.
    #[default]
    Primary,
    /// Right button.
    Secondary,
    /// Middle button.
    Auxiliary,
}

/// A pointer down/move/up event in screen coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointerEvent {
    /// Screen x.
    pub x: f32,
    /// Screen y.
    pub y: f32,
    /// Originating button.
    pub button: PointerButton,
    /// Host pointer id; a captured gesture ignores other pointers.
    pub pointer_id: u32,
}

impl PointerEvent {
    /// Event position as a screen-space point.
    #[must_use]
    pub fn position(&self) -> Point {
        Point::new(self.x, self.y)
    }
}

/// A wheel event in screen coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WheelEvent {
    /// Screen x of the cursor.
    pub x: f32,
    /// Screen y of the cursor.
    pub y: f32,
    /// Horizontal scroll delta.
    pub delta_x: f32,
    /// Vertical scroll delta.
    pub delta_y: f32,
    /// Ctrl (or pinch/cmd) modifier; routes the wheel to zoom.
    pub ctrl: bool,
}

/// Corner handle of the selection box used for resizing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResizeHandle {
    /// Top-left corner.
    NorthWest,
    /// Top-right corner.
    NorthEast,
    /// Bottom-right corner.
    SouthEast,
    /// Bottom-left corner.
    SouthWest,
}

impl ResizeHandle {
    /// All four handles, clockwise from top-left.
    pub const ALL: [Self; 4] = [
        Self::NorthWest,
        Self::NorthEast,
        Self::SouthEast,
        Self::SouthWest,
    ];

    /// The handle at the opposite corner.
    #[must_use]
    pub fn opposite(self) -> Self {
        match self {
            Self::NorthWest => Self::SouthEast,
            Self::NorthEast => Self::SouthWest,
            Self::SouthEast => Self::NorthWest,
            Self::SouthWest => Self::NorthEast,
        }
    }

    /// This handle's corner on an unrotated rectangle.
    #[must_use]
    pub fn corner(self, rect: &Rect) -> Point {
        match self {
            Self::NorthWest => Point::new(rect.x, rect.y),
            Self::NorthEast => Point::new(rect.x + rect.width, rect.y),
            Self::SouthEast => Point::new(rect.x + rect.width, rect.y + rect.height),
            Self::SouthWest => Point::new(rect.x, rect.y + rect.height),
        }
    }

    /// The fixed corner a drag on this handle is anchored to.
    #[must_use]
    pub fn anchor(self, rect: &Rect) -> Point {
        self.opposite().corner(rect)
    }

    /// Per-axis direction from the anchor toward this handle's corner.
    #[must_use]
    pub fn signs(self) -> (f32, f32) {
        match self {
            Self::NorthWest => (-1.0, -1.0),
            Self::NorthEast => (1.0, -1.0),
            Self::SouthEast => (1.0, 1.0),
            Self::SouthWest => (-1.0, 1.0),
        }
    }
}

/// Per-member snapshot for a multi-rotate gesture.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RotateSnapshot {
    /// Member id.
    pub id: BlockId,
    /// Member center at gesture start.
    pub center: Point,
    /// Member rotation at gesture start.
    pub rotation: f32,
}

/// The gesture state machine's current mode plus its start snapshot.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum DragState {
    /// No gesture in progress.
    #[default]
    Idle,
    /// Dragging the canvas itself.
    Panning {
        /// Last screen position, for incremental deltas.
        last_screen: Point,
    },
    /// Rubber-band selection on empty canvas.
    RubberBand {
        /// Canvas point of the pointer-down.
        start: Point,
        /// Canvas point of the latest move.
        current: Point,
    },
    /// Translating every selected block.
    Moving {
        /// Canvas point of the pointer-down.
        start: Point,
        /// Each member's (id, origin) at gesture start.
        origins: Vec<(BlockId, Point)>,
    },
    /// Corner-resizing a single (possibly rotated) block.
    ResizingSingle {
        /// Target block.
        id: BlockId,
        /// Dragged corner.
        handle: ResizeHandle,
    },
    /// Corner-resizing the multi-select envelope.
    ResizingMulti {
        /// Dragged corner.
        handle: ResizeHandle,
        /// Envelope at gesture start.
        start_box: Rect,
        /// Each member's (id, bounds) at gesture start.
        members: Vec<(BlockId, Rect)>,
    },
    /// Rotating a single block about its center.
    RotatingSingle {
        /// Target block.
        id: BlockId,
        /// Block center at gesture start.
        center: Point,
        /// Block rotation at gesture start.
        start_rotation: f32,
        /// Pointer angle at gesture start.
        start_angle: f32,
    },
    /// Rotating all selected blocks about the envelope center.
    RotatingMulti {
        /// Envelope center at gesture start.
        pivot: Point,
        /// Pointer angle at gesture start.
        start_angle: f32,
        /// Per-member start snapshots.
        members: Vec<RotateSnapshot>,
    },
}

impl DragState {
    /// Whether no gesture is in progress.
    #[must_use]
    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }

    /// Short mode name for logging.
    #[must_use]
    pub fn mode_name(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Panning { .. } => "panning",
            Self::RubberBand { .. } => "rubber-band",
            Self::Moving { .. } => "moving",
            Self::ResizingSingle { .. } => "resizing-single",
            Self::ResizingMulti { .. } => "resizing-multi",
            Self::RotatingSingle { .. } => "rotating-single",
            Self::RotatingMulti { .. } => "rotating-multi",
        }
    }
}

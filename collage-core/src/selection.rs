//! Selection membership and bounding-box algebra.
//!
//! A selection is an ordered set of block ids; batch operations iterate it
//! in stored order. The derived selection box is the handle surface for
//! transform gestures: a single selection inherits the block's own rotation,
//! a multi selection is always the axis-aligned envelope of the members'
//! unrotated extents.

use serde::{Deserialize, Serialize};

use crate::block::BlockId;
use crate::board::Board;
use crate::geometry::{Point, Rect};

/// Ordered set of selected block ids.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selection {
    ids: Vec<BlockId>,
}

impl Selection {
    /// Create an empty selection.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of selected blocks.
    #[must_use]
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Whether nothing is selected.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Selected ids in insertion order.
    #[must_use]
    pub fn ids(&self) -> &[BlockId] {
        &self.ids
    }

    /// Membership test.
    #[must_use]
    pub fn contains(&self, id: BlockId) -> bool {
        self.ids.contains(&id)
    }

    /// Clear the selection.
    pub fn clear(&mut self) {
        self.ids.clear();
    }

    /// Replace the selection with a single id.
    pub fn set_single(&mut self, id: BlockId) {
        self.ids.clear();
        self.ids.push(id);
    }

    /// Replace the selection wholesale, dropping duplicate ids.
    pub fn replace(&mut self, ids: Vec<BlockId>) {
        self.ids.clear();
        for id in ids {
            if !self.ids.contains(&id) {
                self.ids.push(id);
            }
        }
    }

    /// Add an id if not already present.
    pub fn insert(&mut self, id: BlockId) {
        if !self.ids.contains(&id) {
            self.ids.push(id);
        }
    }

    /// Toggle an id's membership.
    pub fn toggle(&mut self, id: BlockId) {
        if self.contains(id) {
            self.ids.retain(|&member| member != id);
        } else {
            self.ids.push(id);
        }
    }

    /// Drop ids that no longer exist on the board.
    pub fn prune(&mut self, board: &Board) {
        self.ids.retain(|&id| board.contains(id));
    }
}

/// The derived bounding box of a selection.
///
/// `count` distinguishes the single case (box equals the block, rotation
/// carried) from the multi case (axis-aligned envelope, rotation always 0).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SelectionBox {
    /// Left edge in canvas units.
    pub x: f32,
    /// Top edge in canvas units.
    pub y: f32,
    /// Envelope width.
    pub width: f32,
    /// Envelope height.
    pub height: f32,
    /// Rotation of the handle surface (member rotation iff `count == 1`).
    pub rotation: f32,
    /// Number of selected blocks.
    pub count: usize,
}

impl SelectionBox {
    /// The envelope as a plain rectangle.
    #[must_use]
    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }

    /// Center of the envelope.
    #[must_use]
    pub fn center(&self) -> Point {
        self.rect().center()
    }
}

/// Compute the selection box over the current board state.
///
/// Empty selections (or selections whose ids all vanished) yield `None`.
/// Multi-block envelopes bound the members' unrotated extents and never
/// rotate themselves, whatever the members' rotations are.
#[must_use]
pub fn selection_box(board: &Board, selection: &Selection) -> Option<SelectionBox> {
    let blocks: Vec<_> = selection
        .ids()
        .iter()
        .filter_map(|&id| board.get(id))
        .collect();

    match blocks.as_slice() {
        [] => None,
        [single] => Some(SelectionBox {
            x: single.x,
            y: single.y,
            width: single.width,
            height: single.height,
            rotation: single.rotation,
            count: 1,
        }),
        many => {
            let mut min_x = f32::MAX;
            let mut min_y = f32::MAX;
            let mut max_x = f32::MIN;
            let mut max_y = f32::MIN;
            for block in many {
                min_x = min_x.min(block.x);
                min_y = min_y.min(block.y);
                max_x = max_x.max(block.x + block.width);
                max_y = max_y.max(block.y + block.height);
            }
            Some(SelectionBox {
                x: min_x,
                y: min_y,
                width: max_x - min_x,
                height: max_y - min_y,
                rotation: 0.0,
                count: many.len(),
            })
        }
    }
}

/// Uniformly scale a rectangle about a fixed anchor point.
///
/// This is the member mapping for multi-select resize: the same scale and
/// anchor are applied to every member, so relative layout is preserved
/// while rotations stay untouched.
#[must_use]
pub fn scale_rect_about(rect: Rect, anchor: Point, scale: f32) -> Rect {
    Rect::new(
        anchor.x + (rect.x - anchor.x) * scale,
        anchor.y + (rect.y - anchor.y) * scale,
        rect.width * scale,
        rect.height * scale,
    )
}

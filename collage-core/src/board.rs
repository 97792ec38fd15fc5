//! Board: the block collection.
//!
//! Dual representation: an ordered sequence of ids (iteration and deletion
//! order) plus an id→block map (source of truth for attributes). The two are
//! kept in exact 1:1 correspondence; every mutation goes through `&mut self`
//! so no partially-applied state is ever observable.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::block::{make_z_index, Block, BlockId};
use crate::error::{CoreError, CoreResult};
use crate::geometry::{self, Point, Rect};

/// Position offset applied to duplicated blocks.
pub const DUPLICATE_OFFSET: f32 = 16.0;

/// The block collection: ordered id sequence + id→block map.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Board {
    sequence: Vec<BlockId>,
    map: HashMap<BlockId, Block>,
}

impl Board {
    /// Create an empty board.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of blocks.
    #[must_use]
    pub fn len(&self) -> usize {
        self.sequence.len()
    }

    /// Whether the board holds no blocks.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sequence.is_empty()
    }

    /// Whether a block with this id exists.
    #[must_use]
    pub fn contains(&self, id: BlockId) -> bool {
        self.map.contains_key(&id)
    }

    /// Ids in sequence order.
    #[must_use]
    pub fn ids(&self) -> &[BlockId] {
        &self.sequence
    }

    /// Look up a block.
    #[must_use]
    pub fn get(&self, id: BlockId) -> Option<&Block> {
        self.map.get(&id)
    }

    pub(crate) fn get_mut(&mut self, id: BlockId) -> Option<&mut Block> {
        self.map.get_mut(&id)
    }

    /// Blocks in sequence order.
    pub fn blocks(&self) -> impl Iterator<Item = &Block> {
        self.sequence.iter().filter_map(|id| self.map.get(id))
    }

    /// Blocks sorted ascending by z-order; ties keep sequence order.
    #[must_use]
    pub fn blocks_by_z(&self) -> Vec<&Block> {
        let mut sorted: Vec<&Block> = self.blocks().collect();
        sorted.sort_by_key(|block| block.z_index);
        sorted
    }

    /// Insert a block, appending its id to the sequence.
    ///
    /// Re-inserting an existing id replaces the mapped block without
    /// duplicating the sequence entry.
    pub fn insert(&mut self, block: Block) {
        let id = block.id;
        if self.map.insert(id, block).is_none() {
            self.sequence.push(id);
        }
    }

    /// Apply a partial update to one block.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::BlockNotFound`] if the id is absent.
    pub fn update<F>(&mut self, id: BlockId, f: F) -> CoreResult<()>
    where
        F: FnOnce(&mut Block),
    {
        let block = self
            .map
            .get_mut(&id)
            .ok_or_else(|| CoreError::BlockNotFound(id.to_string()))?;
        f(block);
        Ok(())
    }

    /// Remove a batch of blocks from both the sequence and the map.
    ///
    /// Ids not present are ignored; the removal is applied as one step.
    pub fn remove_batch(&mut self, ids: &[BlockId]) {
        if ids.is_empty() {
            return;
        }
        self.sequence.retain(|id| !ids.contains(id));
        for id in ids {
            self.map.remove(id);
        }
    }

    /// Duplicate a batch of blocks.
    ///
    /// Each clone gets a fresh id and z-order key and is offset by
    /// [`DUPLICATE_OFFSET`] on both axes. Returns the new ids in the order
    /// of the input ids; unknown input ids are skipped.
    pub fn duplicate_batch(&mut self, ids: &[BlockId]) -> Vec<BlockId> {
        let mut new_ids = Vec::with_capacity(ids.len());
        for &id in ids {
            let Some(source) = self.map.get(&id) else {
                continue;
            };
            let mut clone = source.clone();
            clone.id = BlockId::new();
            clone.x += DUPLICATE_OFFSET;
            clone.y += DUPLICATE_OFFSET;
            clone.z_index = make_z_index();
            new_ids.push(clone.id);
            self.insert(clone);
        }
        new_ids
    }

    /// Topmost block whose rotated bounds contain a canvas point.
    ///
    /// Ties on z-order resolve to the block later in the sequence.
    #[must_use]
    pub fn top_block_at(&self, point: Point) -> Option<&Block> {
        let mut best: Option<&Block> = None;
        for block in self.blocks() {
            if block.contains_point(point) && best.is_none_or(|b| block.z_index >= b.z_index) {
                best = Some(block);
            }
        }
        best
    }

    /// Ids of blocks whose rotated extents intersect an axis-aligned probe
    /// rectangle, in sequence order.
    #[must_use]
    pub fn ids_intersecting(&self, probe: &Rect) -> Vec<BlockId> {
        self.blocks()
            .filter(|block| {
                geometry::rect_intersects_rotated(probe, &block.bounds(), block.rotation)
            })
            .map(|block| block.id)
            .collect()
    }

    /// Union bounding rectangle over all blocks' unrotated extents.
    ///
    /// Returns `None` for an empty board.
    #[must_use]
    pub fn union_bounds(&self) -> Option<Rect> {
        let mut blocks = self.blocks();
        let first = blocks.next()?;
        let mut min_x = first.x;
        let mut min_y = first.y;
        let mut max_x = first.x + first.width;
        let mut max_y = first.y + first.height;
        for block in blocks {
            min_x = min_x.min(block.x);
            min_y = min_y.min(block.y);
            max_x = max_x.max(block.x + block.width);
            max_y = max_y.max(block.y + block.height);
        }
        Some(Rect::new(min_x, min_y, max_x - min_x, max_y - min_y))
    }

    /// Check the sequence↔map 1:1 invariant. Intended for tests and debug
    /// assertions.
    #[must_use]
    pub fn is_consistent(&self) -> bool {
        self.sequence.len() == self.map.len()
            && self.sequence.iter().all(|id| self.map.contains_key(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::block::BlockKind;

    fn image_block(x: f32, y: f32, z_index: i64) -> Block {
        let mut block = Block::new(
            BlockKind::Image {
                src: "img://fixture".into(),
                crop: None,
            },
            x,
            y,
            50.0,
            50.0,
        );
        block.z_index = z_index;
        block
    }

    #[test]
    fn test_insert_and_remove_keep_both_structures() {
        let mut board = Board::new();
        let a = image_block(0.0, 0.0, 1);
        let b = image_block(100.0, 0.0, 2);
        let (id_a, id_b) = (a.id, b.id);
        board.insert(a);
        board.insert(b);
        assert_eq!(board.len(), 2);
        assert!(board.is_consistent());

        board.remove_batch(&[id_a]);
        assert_eq!(board.len(), 1);
        assert!(!board.contains(id_a));
        assert!(board.contains(id_b));
        assert!(board.is_consistent());
    }

    #[test]
    fn test_remove_batch_is_atomic_over_all_ids() {
        let mut board = Board::new();
        let ids: Vec<BlockId> = (0..5)
            .map(|i| {
                #[allow(clippy::cast_precision_loss)]
                let block = image_block(i as f32 * 10.0, 0.0, i);
                let id = block.id;
                board.insert(block);
                id
            })
            .collect();

        board.remove_batch(&[ids[0], ids[2], ids[4]]);
        assert_eq!(board.ids(), &[ids[1], ids[3]]);
        assert!(board.is_consistent());
    }

    #[test]
    fn test_duplicate_offsets_and_preserves_originals() {
        let mut board = Board::new();
        let mut original = image_block(10.0, 20.0, 7);
        original.rotation = 0.5;
        let id = original.id;
        let snapshot = original.clone();
        board.insert(original);

        let new_ids = board.duplicate_batch(&[id]);
        assert_eq!(new_ids.len(), 1);
        let copy = board.get(new_ids[0]).unwrap();
        assert!((copy.x - (10.0 + DUPLICATE_OFFSET)).abs() < f32::EPSILON);
        assert!((copy.y - (20.0 + DUPLICATE_OFFSET)).abs() < f32::EPSILON);
        assert!((copy.rotation - 0.5).abs() < f32::EPSILON);
        assert_ne!(copy.id, id);

        // The original is untouched.
        assert_eq!(board.get(id).unwrap(), &snapshot);
        assert!(board.is_consistent());
    }

    #[test]
    fn test_update_unknown_id_errors() {
        let mut board = Board::new();
        let missing = BlockId::new();
        let result = board.update(missing, |b| b.x = 1.0);
        assert!(matches!(result, Err(CoreError::BlockNotFound(_))));
    }

    #[test]
    fn test_top_block_at_prefers_higher_z() {
        let mut board = Board::new();
        let low = image_block(0.0, 0.0, 1);
        let mut high = image_block(25.0, 25.0, 9);
        high.width = 50.0;
        let (low_id, high_id) = (low.id, high.id);
        board.insert(low);
        board.insert(high);

        // Overlap region belongs to the higher block.
        assert_eq!(board.top_block_at(Point::new(30.0, 30.0)).unwrap().id, high_id);
        // Outside the overlap the lower block still wins.
        assert_eq!(board.top_block_at(Point::new(5.0, 5.0)).unwrap().id, low_id);
        assert!(board.top_block_at(Point::new(500.0, 500.0)).is_none());
    }

    #[test]
    fn test_blocks_by_z_is_stable_for_ties() {
        let mut board = Board::new();
        let a = image_block(0.0, 0.0, 3);
        let b = image_block(10.0, 0.0, 3);
        let c = image_block(20.0, 0.0, 1);
        let (id_a, id_b, id_c) = (a.id, b.id, c.id);
        board.insert(a);
        board.insert(b);
        board.insert(c);

        let order: Vec<BlockId> = board.blocks_by_z().iter().map(|b| b.id).collect();
        assert_eq!(order, vec![id_c, id_a, id_b]);
    }

    #[test]
    fn test_union_bounds() {
        let mut board = Board::new();
        assert!(board.union_bounds().is_none());
        board.insert(image_block(100.0, 100.0, 1));
        board.insert(image_block(120.0, 100.0, 2));
        let bounds = board.union_bounds().unwrap();
        assert_eq!(bounds, Rect::new(100.0, 100.0, 70.0, 50.0));
    }

    #[test]
    fn test_ids_intersecting_corrects_for_target_rotation() {
        let mut board = Board::new();
        // Tall thin block rotated flat: covers x ∈ [-20, 70], y ∈ [40, 50].
        let mut bar = image_block(20.0, 0.0, 1);
        bar.width = 10.0;
        bar.height = 90.0;
        bar.rotation = std::f32::consts::FRAC_PI_2;
        let bar_id = bar.id;
        board.insert(bar);

        let probe = Rect::new(-15.0, 42.0, 10.0, 10.0);
        assert_eq!(board.ids_intersecting(&probe), vec![bar_id]);
        // Unrotated the probe misses the block entirely.
        assert!(!probe.intersects(&Rect::new(20.0, 0.0, 10.0, 90.0)));
    }
}

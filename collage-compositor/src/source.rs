//! Per-block rendered-content store shared by the frame pump and flatten.
//!
//! The editor core tracks geometry only; every block that should appear in a
//! flattened output needs a raster registered here. The store keeps two
//! layers per block: the decoded *base* content, and the *rendered* content
//! with the block's crop and flips already applied. Flatten reads only the
//! rendered layer. Decoded images arrive via [`RenderStore::complete_load`],
//! live webcam frames via the frame pump, and frozen stamp frames via the
//! capture/adopt pair.

use std::collections::HashMap;

use collage_core::{Block, BlockId, Board};
use tracing::warn;
use uuid::Uuid;

use crate::raster::Raster;

/// Apply a block's crop box and flip flags to its base content.
///
/// The crop acts in the content's native pixel space, so it runs before the
/// mirror transforms.
#[must_use]
pub fn render_block_content(base: &Raster, block: &Block) -> Raster {
    let mut out = match block.crop() {
        Some(crop) => base.cropped(crop),
        None => base.clone(),
    };
    if block.flipped_horizontally {
        out = out.flipped_horizontal();
    }
    if block.flipped_vertically {
        out = out.flipped_vertical();
    }
    out
}

/// Latest content for every block the compositor can draw.
#[derive(Debug, Default)]
pub struct RenderStore {
    /// Decoded source content, before any block crop or flip.
    base: HashMap<BlockId, Raster>,
    /// Content with the block's crop and flips applied; what flatten draws.
    rendered: HashMap<BlockId, Raster>,
    /// Frames frozen by a stamp capture, waiting to be adopted by the block
    /// the stamp created.
    pending: HashMap<String, Raster>,
}

impl RenderStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Rendered content for a block, if any has been registered.
    #[must_use]
    pub fn rendered(&self, id: BlockId) -> Option<&Raster> {
        self.rendered.get(&id)
    }

    /// Register already-rendered content for a block.
    ///
    /// Used by the frame pump, which re-delivers every tick and therefore
    /// keeps no base layer.
    pub fn insert_rendered(&mut self, id: BlockId, raster: Raster) {
        self.rendered.insert(id, raster);
    }

    /// Register decoded content for a block, unless the block was deleted
    /// while the decode was in flight.
    pub fn complete_load(&mut self, board: &Board, id: BlockId, raster: Raster) {
        if let Some(block) = board.get(id) {
            self.rendered.insert(id, render_block_content(&raster, block));
            self.base.insert(id, raster);
        } else {
            warn!(%id, "decoded content arrived for a deleted block, dropping");
        }
    }

    /// Re-render a block's content after its crop or flips changed.
    ///
    /// No-op for blocks without a base layer; webcam blocks self-heal on the
    /// next pump tick instead.
    pub fn refresh(&mut self, block: &Block) {
        if let Some(base) = self.base.get(&block.id) {
            self.rendered
                .insert(block.id, render_block_content(base, block));
        }
    }

    /// Make sure a block has at least a placeholder registered.
    ///
    /// Does nothing if rendered content is already present.
    pub fn ensure_placeholder(&mut self, id: BlockId, width: u32, height: u32) {
        self.rendered
            .entry(id)
            .or_insert_with(|| Raster::placeholder(width, height));
    }

    /// Freeze the current rendered frame of a block under a fresh handle.
    ///
    /// The handle becomes the source reference of the block a stamp creates;
    /// [`RenderStore::adopt`] later binds the frozen frame to that block. A
    /// block with nothing registered freezes a placeholder at its own size.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn capture(&mut self, block: &Block) -> String {
        let frame = self.rendered.get(&block.id).cloned().unwrap_or_else(|| {
            Raster::placeholder(
                block.width.round().max(1.0) as u32,
                block.height.round().max(1.0) as u32,
            )
        });
        let handle = format!("stamp://{}", Uuid::new_v4());
        self.pending.insert(handle.clone(), frame);
        handle
    }

    /// Bind a frozen stamp frame to the block that now references it.
    ///
    /// The frame becomes both the base and the rendered layer, since stamp
    /// copies start with no crop and flips baked in. Returns `false` if no
    /// capture exists under the handle.
    pub fn adopt(&mut self, id: BlockId, handle: &str) -> bool {
        if let Some(frame) = self.pending.remove(handle) {
            self.base.insert(id, frame.clone());
            self.rendered.insert(id, frame);
            true
        } else {
            warn!(%id, %handle, "no captured frame under stamp handle");
            false
        }
    }

    /// Drop all layers for a block.
    pub fn remove(&mut self, id: BlockId) {
        self.base.remove(&id);
        self.rendered.remove(&id);
    }

    /// Drop content whose block no longer exists on the board.
    pub fn prune(&mut self, board: &Board) {
        self.base.retain(|id, _| board.contains(*id));
        self.rendered.retain(|id, _| board.contains(*id));
    }

    /// Number of blocks with rendered content.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rendered.len()
    }

    /// Whether no block has rendered content.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rendered.is_empty()
    }

    /// Number of captures not yet adopted.
    #[must_use]
    pub fn pending_captures(&self) -> usize {
        self.pending.len()
    }

    /// Drop all content and pending captures.
    pub fn clear(&mut self) {
        self.base.clear();
        self.rendered.clear();
        self.pending.clear();
    }
}

#[cfg(test)]
mod tests {
    use collage_core::{BlockKind, CropBox};

    use super::*;

    fn image_block(width: f32, height: f32) -> Block {
        Block::new(
            BlockKind::Image {
                src: "img://test".to_string(),
                crop: None,
            },
            0.0,
            0.0,
            width,
            height,
        )
    }

    /// 2x2 raster with distinct corners: TL red, TR green, BL blue, BR white.
    fn corner_raster() -> Raster {
        Raster::from_raw(
            2,
            2,
            vec![
                255, 0, 0, 255, 0, 255, 0, 255, //
                0, 0, 255, 255, 255, 255, 255, 255,
            ],
        )
        .expect("valid 2x2 buffer")
    }

    #[test]
    fn test_render_block_content_crops_then_flips() {
        let mut block = image_block(10.0, 10.0);
        block.set_crop(Some(CropBox::new(1, 0, 1, 2)));
        block.flipped_vertically = true;

        // Right column (green over white), flipped to white over green.
        let content = render_block_content(&corner_raster(), &block);
        assert_eq!((content.width(), content.height()), (1, 2));
        assert_eq!(content.pixel(0, 0), Some([255, 255, 255, 255]));
        assert_eq!(content.pixel(0, 1), Some([0, 255, 0, 255]));
    }

    #[test]
    fn test_complete_load_renders_and_guards_deletion() {
        let mut store = RenderStore::new();
        let mut board = Board::new();
        let mut block = image_block(10.0, 10.0);
        block.flipped_horizontally = true;
        let live_id = block.id;
        board.insert(block);

        store.complete_load(&board, live_id, corner_raster());
        let rendered = store.rendered(live_id).expect("live block keeps its load");
        assert_eq!(
            rendered.pixel(0, 0),
            Some([0, 255, 0, 255]),
            "flip is baked into the rendered layer"
        );

        let dead_id = BlockId::new();
        store.complete_load(&board, dead_id, corner_raster());
        assert!(
            store.rendered(dead_id).is_none(),
            "load for a deleted block is dropped"
        );
    }

    #[test]
    fn test_refresh_rerenders_from_base() {
        let mut store = RenderStore::new();
        let mut board = Board::new();
        let block = image_block(10.0, 10.0);
        let id = block.id;
        board.insert(block);

        store.complete_load(&board, id, corner_raster());
        assert_eq!(store.rendered(id).map(Raster::width), Some(2));

        let mut cropped = board.get(id).expect("present").clone();
        cropped.set_crop(Some(CropBox::new(0, 0, 1, 1)));
        store.refresh(&cropped);
        let rendered = store.rendered(id).expect("still present");
        assert_eq!((rendered.width(), rendered.height()), (1, 1));
        assert_eq!(rendered.pixel(0, 0), Some([255, 0, 0, 255]));
    }

    #[test]
    fn test_ensure_placeholder_keeps_existing_content() {
        let mut store = RenderStore::new();
        let id = BlockId::new();

        store.ensure_placeholder(id, 4, 4);
        assert_eq!(store.rendered(id).map(Raster::width), Some(4));
        assert_eq!(
            store.rendered(id).and_then(|r| r.pixel(0, 0)),
            Some([32, 32, 32, 255])
        );

        store.insert_rendered(id, Raster::solid(8, 8, [255, 255, 255, 255]));
        store.ensure_placeholder(id, 4, 4);
        assert_eq!(
            store.rendered(id).map(Raster::width),
            Some(8),
            "placeholder must not overwrite real content"
        );
    }

    #[test]
    fn test_capture_and_adopt_moves_frame() {
        let mut store = RenderStore::new();
        let block = image_block(16.0, 16.0);
        store.insert_rendered(block.id, Raster::solid(16, 16, [0, 200, 0, 255]));

        let handle = store.capture(&block);
        assert!(handle.starts_with("stamp://"));
        assert_eq!(store.pending_captures(), 1);

        let stamped = BlockId::new();
        assert!(store.adopt(stamped, &handle));
        assert_eq!(store.pending_captures(), 0);
        assert_eq!(
            store.rendered(stamped).and_then(|r| r.pixel(0, 0)),
            Some([0, 200, 0, 255]),
            "adopted block sees the frozen frame"
        );

        assert!(!store.adopt(BlockId::new(), &handle), "handle is single-use");
    }

    #[test]
    fn test_capture_without_content_freezes_placeholder() {
        let mut store = RenderStore::new();
        let block = image_block(20.0, 10.0);

        let handle = store.capture(&block);
        let stamped = BlockId::new();
        store.adopt(stamped, &handle);

        let frame = store.rendered(stamped).expect("placeholder adopted");
        assert_eq!((frame.width(), frame.height()), (20, 10));
        assert_eq!(frame.pixel(0, 0), Some([32, 32, 32, 255]));
    }

    #[test]
    fn test_prune_drops_stale_content() {
        let mut store = RenderStore::new();
        let mut board = Board::new();
        let block = image_block(10.0, 10.0);
        let kept = block.id;
        board.insert(block);

        let stale = BlockId::new();
        store.insert_rendered(kept, Raster::solid(1, 1, [0, 0, 0, 255]));
        store.insert_rendered(stale, Raster::solid(1, 1, [0, 0, 0, 255]));

        store.prune(&board);
        assert!(store.rendered(kept).is_some());
        assert!(store.rendered(stale).is_none());
        assert_eq!(store.len(), 1);
    }
}

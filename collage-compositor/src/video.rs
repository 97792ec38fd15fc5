//! Live webcam plumbing: the feed boundary trait and the per-tick frame pump.
//!
//! The pump holds one binding per webcam block. Each tick copies the bound
//! feed's current frame into the block's rendered content, applying the feed
//! settings (feed-level crop, then mirror flags) followed by the block's own
//! crop and flips. Bindings for deleted blocks are dropped at the start of
//! every tick, so a stale binding can never write into the store.

use std::collections::HashMap;

use collage_core::{BlockId, Board, SourceSize, WebcamSettings};
use tracing::{debug, trace};

use crate::raster::Raster;
use crate::source::{render_block_content, RenderStore};

/// A continuously-updated video source.
///
/// Implementations return whatever frame is current at call time; the pump
/// never waits for a new one.
pub trait VideoFeed {
    /// Latest frame as an RGBA raster.
    fn frame(&self) -> Raster;

    /// Native size of the frames this feed currently delivers.
    fn frame_size(&self) -> SourceSize {
        let frame = self.frame();
        SourceSize::new(frame.width(), frame.height())
    }
}

/// Per-block feed bindings driven by a cooperative tick.
#[derive(Debug)]
pub struct FramePump {
    bindings: HashMap<BlockId, String>,
    enabled: bool,
}

impl Default for FramePump {
    fn default() -> Self {
        Self {
            bindings: HashMap::new(),
            enabled: true,
        }
    }
}

impl FramePump {
    /// Create an enabled pump with no bindings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Turn frame delivery on or off.
    ///
    /// Hosts mirror the editor's show-camera toggle here; a disabled pump
    /// keeps its bindings but ticks deliver nothing.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    /// Whether ticks currently deliver frames.
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Bind a webcam block to a feed device. Replaces any existing binding.
    pub fn bind(&mut self, id: BlockId, device_id: impl Into<String>) {
        self.bindings.insert(id, device_id.into());
    }

    /// Release a block's binding. Returns `false` if none existed.
    pub fn release(&mut self, id: BlockId) -> bool {
        self.bindings.remove(&id).is_some()
    }

    /// Whether a block currently has a binding.
    #[must_use]
    pub fn is_bound(&self, id: BlockId) -> bool {
        self.bindings.contains_key(&id)
    }

    /// Device a block is bound to, if any.
    #[must_use]
    pub fn device_for(&self, id: BlockId) -> Option<&str> {
        self.bindings.get(&id).map(String::as_str)
    }

    /// Number of live bindings.
    #[must_use]
    pub fn bound_count(&self) -> usize {
        self.bindings.len()
    }

    /// Replace all bindings with one per webcam block on the board.
    ///
    /// Used after a document restore, which recreates blocks wholesale.
    pub fn rebind(&mut self, board: &Board) {
        self.bindings.clear();
        for block in board.blocks().filter(|b| b.is_webcam()) {
            self.bindings
                .insert(block.id, block.source_ref().to_string());
        }
        debug!(count = self.bindings.len(), "rebound webcam blocks");
    }

    /// Pump one frame into every bound block's rendered content.
    ///
    /// Bindings whose block left the board are dropped first, even while the
    /// pump is disabled. Bindings whose device has no feed are left in place
    /// but skipped, so a feed that appears later resumes delivery without a
    /// rebind. Returns the number of blocks updated.
    pub fn tick<F: VideoFeed>(
        &mut self,
        board: &Board,
        settings: &HashMap<String, WebcamSettings>,
        feeds: &HashMap<String, F>,
        store: &mut RenderStore,
    ) -> usize {
        self.bindings.retain(|id, _| board.contains(*id));
        if !self.enabled {
            return 0;
        }

        let mut updated = 0;
        for (id, device) in &self.bindings {
            let Some(block) = board.get(*id) else {
                continue;
            };
            let Some(feed) = feeds.get(device) else {
                trace!(%id, %device, "no feed for bound device, skipping");
                continue;
            };

            let mut frame = feed.frame();
            if let Some(feed_settings) = settings.get(device) {
                if let Some(crop) = feed_settings.crop_box {
                    frame = frame.cropped(crop);
                }
                if feed_settings.flip_horizontal {
                    frame = frame.flipped_horizontal();
                }
                if feed_settings.flip_vertical {
                    frame = frame.flipped_vertical();
                }
            }

            store.insert_rendered(*id, render_block_content(&frame, block));
            updated += 1;
        }
        updated
    }
}

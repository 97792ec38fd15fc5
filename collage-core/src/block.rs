//! Block model: the placed visual entities composited on the canvas.
//!
//! A block is a rectangle in canvas space carrying rotation, flip flags, a
//! blend mode, and a variant payload (static image or live webcam). Width
//! and height never drop below [`MIN_BLOCK_SIZE`]; degenerate drags clamp
//! rather than error.

use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::geometry::{self, Point, Rect};

/// Smallest width/height a block may reach.
pub const MIN_BLOCK_SIZE: f32 = 1.0;

/// Largest dimension a freshly placed image block is fitted to.
pub const PLACEMENT_MAX_SIZE: f32 = 512.0;

/// Epoch for z-order stamping, milliseconds. Keeping the epoch fixed makes
/// z-order keys comparable across sessions, so reloaded boards keep stacking
/// new blocks above old ones.
pub const Z_EPOCH_MS: i64 = 1_729_536_285_367;

/// Unique block identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BlockId(Uuid);

impl BlockId {
    /// Generate a fresh random identifier.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parse an identifier from its string form.
    ///
    /// # Errors
    ///
    /// Returns an error if the string is not a valid UUID.
    pub fn parse(s: &str) -> Result<Self, uuid::Error> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

impl Default for BlockId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for BlockId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Compositing operator applied when a block is drawn over content below it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BlendMode {
    /// Standard source-over alpha compositing.
    #[default]
    Normal,
    /// Multiply source and destination channels.
    Multiply,
    /// Inverted multiply of inverted channels.
    Screen,
    /// Multiply or screen depending on the destination channel.
    Overlay,
    /// Per-channel minimum.
    Darken,
    /// Per-channel maximum.
    Lighten,
    /// Absolute per-channel difference.
    Difference,
}

/// Pixel size of a source raster (image natural size or video frame size).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SourceSize {
    /// Width in source pixels.
    pub width: u32,
    /// Height in source pixels.
    pub height: u32,
}

impl SourceSize {
    /// Create a source size.
    #[must_use]
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Width over height.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn aspect(&self) -> f32 {
        self.width as f32 / self.height as f32
    }
}

/// A crop rectangle in a source's native pixel space.
///
/// Always lies fully within the source: `x + width ≤ source width` and
/// `y + height ≤ source height`. Absence of a crop is represented by
/// `Option::None`, which is distinct from any zero-size box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CropBox {
    /// Left edge in source pixels.
    pub x: u32,
    /// Top edge in source pixels.
    pub y: u32,
    /// Width in source pixels.
    pub width: u32,
    /// Height in source pixels.
    pub height: u32,
}

impl CropBox {
    /// Create a crop box.
    #[must_use]
    pub const fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Width over height.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn aspect(&self) -> f32 {
        self.width as f32 / self.height as f32
    }

    /// Boundary-inclusive containment of a source-space point.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn contains(&self, point: Point) -> bool {
        let rect = Rect::new(
            self.x as f32,
            self.y as f32,
            self.width as f32,
            self.height as f32,
        );
        rect.contains_point(point)
    }
}

/// Variant payload of a block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum BlockKind {
    /// A static image resolved from an opaque source reference.
    Image {
        /// Opaque source handle (URL or data URI).
        src: String,
        /// Optional crop in the image's native pixel space.
        #[serde(default)]
        crop: Option<CropBox>,
    },
    /// A live webcam feed.
    Webcam {
        /// Device identifier of the feed.
        source: String,
        /// Optional crop in the feed's native pixel space.
        #[serde(default)]
        crop: Option<CropBox>,
    },
}

/// A placed visual entity on the canvas.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Block {
    /// Unique identifier, never reused.
    pub id: BlockId,
    /// Left edge in canvas units.
    pub x: f32,
    /// Top edge in canvas units.
    pub y: f32,
    /// Width in canvas units, ≥ [`MIN_BLOCK_SIZE`].
    pub width: f32,
    /// Height in canvas units, ≥ [`MIN_BLOCK_SIZE`].
    pub height: f32,
    /// Rotation in radians about the block center, stored unnormalized.
    #[serde(default)]
    pub rotation: f32,
    /// Mirror horizontally when rendering.
    #[serde(default)]
    pub flipped_horizontally: bool,
    /// Mirror vertically when rendering.
    #[serde(default)]
    pub flipped_vertically: bool,
    /// Compositing operator against content below.
    #[serde(default)]
    pub blend: BlendMode,
    /// Paint-order key; higher paints later (on top).
    pub z_index: i64,
    /// Variant payload.
    #[serde(flatten)]
    pub kind: BlockKind,
}

impl Block {
    /// Create a block with a fresh id, a fresh z-order key, no rotation, no
    /// flips, and normal blending.
    #[must_use]
    pub fn new(kind: BlockKind, x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            id: BlockId::new(),
            x,
            y,
            width,
            height,
            rotation: 0.0,
            flipped_horizontally: false,
            flipped_vertically: false,
            blend: BlendMode::default(),
            z_index: make_z_index(),
            kind,
        }
    }

    /// Set rotation (radians), builder style.
    #[must_use]
    pub fn with_rotation(mut self, rotation: f32) -> Self {
        self.rotation = rotation;
        self
    }

    /// Set blend mode, builder style.
    #[must_use]
    pub fn with_blend(mut self, blend: BlendMode) -> Self {
        self.blend = blend;
        self
    }

    /// Unrotated bounds in canvas space.
    #[must_use]
    pub fn bounds(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }

    /// Center point in canvas space.
    #[must_use]
    pub fn center(&self) -> Point {
        self.bounds().center()
    }

    /// Width over height.
    #[must_use]
    pub fn aspect(&self) -> f32 {
        self.width / self.height
    }

    /// Rotation-aware containment test for a canvas-space point.
    #[must_use]
    pub fn contains_point(&self, point: Point) -> bool {
        geometry::point_in_rotated_rect(point, &self.bounds(), self.rotation)
    }

    /// Whether interactive resizing keeps the block's aspect ratio locked.
    #[must_use]
    pub fn preserves_aspect(&self) -> bool {
        matches!(
            self.kind,
            BlockKind::Image { .. } | BlockKind::Webcam { .. }
        )
    }

    /// The variant's crop box, if any.
    #[must_use]
    pub fn crop(&self) -> Option<CropBox> {
        match &self.kind {
            BlockKind::Image { crop, .. } | BlockKind::Webcam { crop, .. } => *crop,
        }
    }

    /// Replace the variant's crop box.
    pub fn set_crop(&mut self, new_crop: Option<CropBox>) {
        match &mut self.kind {
            BlockKind::Image { crop, .. } | BlockKind::Webcam { crop, .. } => *crop = new_crop,
        }
    }

    /// The variant's source reference (image handle or device id).
    #[must_use]
    pub fn source_ref(&self) -> &str {
        match &self.kind {
            BlockKind::Image { src, .. } => src,
            BlockKind::Webcam { source, .. } => source,
        }
    }

    /// Whether this is a webcam block.
    #[must_use]
    pub fn is_webcam(&self) -> bool {
        matches!(self.kind, BlockKind::Webcam { .. })
    }
}

/// Per-device webcam feed settings, persisted across sessions.
///
/// These mirror or pre-crop the *feed* and are independent of any block's
/// own flip flags or crop box.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct WebcamSettings {
    /// Device identifier the settings belong to.
    pub device_id: String,
    /// Mirror the feed horizontally.
    #[serde(default)]
    pub flip_horizontal: bool,
    /// Mirror the feed vertically.
    #[serde(default)]
    pub flip_vertical: bool,
    /// Last known frame size of the feed.
    #[serde(default)]
    pub video_size: SourceSize,
    /// Feed-level crop applied before any block crop.
    #[serde(default)]
    pub crop_box: Option<CropBox>,
    /// Show the crop overlay on the feed preview.
    #[serde(default)]
    pub show_crop: bool,
}

/// Stamp a monotonically increasing z-order key from the current wall clock.
#[must_use]
pub fn make_z_index() -> i64 {
    let now_ms = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| i64::try_from(d.as_millis()).unwrap_or(i64::MAX))
        .unwrap_or(0);
    make_z_index_at(now_ms)
}

/// Z-order key for a given wall-clock millisecond value.
#[must_use]
#[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation)]
pub fn make_z_index_at(now_ms: i64) -> i64 {
    (((now_ms - Z_EPOCH_MS) as f64) / 100.0).round() as i64
}

/// Bounds for a freshly placed block: the source scaled so its larger
/// dimension becomes exactly [`PLACEMENT_MAX_SIZE`] (small sources scale
/// up), centered on `center`.
#[must_use]
pub fn placement_bounds(natural: SourceSize, center: Point) -> Rect {
    #[allow(clippy::cast_precision_loss)]
    let (w, h) = (natural.width as f32, natural.height as f32);
    let scale = geometry::scale_to_max(w, h, PLACEMENT_MAX_SIZE);
    let width = w * scale;
    let height = h * scale;
    Rect::new(center.x - width / 2.0, center.y - height / 2.0, width, height)
}

/// Clamp a free-form proposed size to the minimum block size.
#[must_use]
pub fn clamp_size(width: f32, height: f32) -> (f32, f32) {
    (width.max(MIN_BLOCK_SIZE), height.max(MIN_BLOCK_SIZE))
}

/// Clamp an aspect-locked proposed size to the minimum block size.
///
/// Degenerate or inverted drags collapse to the smallest box that still has
/// the exact target aspect, so the lock never drifts.
#[must_use]
pub fn clamp_size_locked(width: f32, height: f32, aspect: f32) -> (f32, f32) {
    if width < MIN_BLOCK_SIZE || height < MIN_BLOCK_SIZE {
        if aspect >= 1.0 {
            (MIN_BLOCK_SIZE * aspect, MIN_BLOCK_SIZE)
        } else {
            (MIN_BLOCK_SIZE, MIN_BLOCK_SIZE / aspect)
        }
    } else {
        (width, height)
    }
}

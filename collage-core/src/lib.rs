//! # Collage Core
//!
//! Headless editor core for an infinite-canvas image collage. Owns the
//! geometry, camera, block model, selection and gesture state machine;
//! renders nothing itself.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │                collage-core                 │
//! ├─────────────────────────────────────────────┤
//! │  Board           │  Editor                  │
//! │  - Block map     │  - Pointer state machine │
//! │  - Z ordering    │  - Hit testing           │
//! │  - Duplication   │  - Stamp / crop / place  │
//! ├─────────────────────────────────────────────┤
//! │  Camera          │  Selection               │
//! │  - Pan / zoom    │  - Membership            │
//! │  - Screen↔canvas │  - Bounding box algebra  │
//! └─────────────────────────────────────────────┘
//! ```

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod block;
pub mod board;
pub mod camera;
pub mod crop;
pub mod editor;
pub mod error;
pub mod geometry;
pub mod input;
pub mod schema;
pub mod selection;

pub use block::{
    BlendMode, Block, BlockId, BlockKind, CropBox, SourceSize, WebcamSettings, MIN_BLOCK_SIZE,
    PLACEMENT_MAX_SIZE,
};
pub use board::{Board, DUPLICATE_OFFSET};
pub use camera::{Camera, Viewport, MAX_ZOOM, MIN_ZOOM};
pub use crop::{CropDisplay, CropSession};
pub use editor::{Editor, HitTarget, Modifiers, StampDirection, StampOffset};
pub use error::{CoreError, CoreResult};
pub use geometry::{Point, Rect};
pub use input::{DragState, PointerButton, PointerEvent, ResizeHandle, WheelEvent};
pub use schema::BoardDocument;
pub use selection::{Selection, SelectionBox};

/// Collage core version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

//! # Collage Compositor
//!
//! Raster side of the collage engine: decoded-content storage, the webcam
//! frame pump, CPU blend kernels, and the flatten/export pipeline. The
//! editor core owns geometry and ordering; this crate owns pixels.
//!
//! ```text
//! ┌────────────┐  tick   ┌──────────────┐
//! │ VideoFeed  ├────────▶│  RenderStore │
//! └────────────┘         │  (per-block  │
//! ┌────────────┐ decode  │   rasters)   │
//! │image bytes ├────────▶│              │
//! └────────────┘         └──────┬───────┘
//!                               │ flatten (z-order + blend)
//!                        ┌──────▼───────┐
//!                        │   Exporter   ├──▶ JPEG ──▶ ExportSink
//!                        └──────────────┘
//! ```

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod blend;
pub mod error;
pub mod export;
pub mod image;
pub mod raster;
pub mod source;
pub mod video;

pub use blend::{composite_over, premultiply, unpremultiply};
pub use error::{CompositorError, CompositorResult};
pub use export::{
    export_filename, CollageExporter, ExportConfig, ExportSink, FileSink, MAX_EXPORT_DIMENSION,
};
pub use raster::Raster;
pub use source::{render_block_content, RenderStore};
pub use video::{FramePump, VideoFeed};

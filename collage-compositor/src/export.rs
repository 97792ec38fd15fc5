//! Board flatten and JPEG export.
//!
//! Renders every block's already-rendered content into one offscreen raster
//! honoring z-order and blend modes, merges the result over an opaque
//! background, and JPEG-encodes it for an export sink. The flatten is a
//! snapshot: it reads only the board and whatever each block's rendered
//! raster holds at call time.

use std::io::Cursor;
use std::path::PathBuf;

use chrono::{DateTime, SecondsFormat, Utc};
use collage_core::Board;
use image::ImageEncoder;
use tracing::debug;

use crate::blend;
use crate::error::{CompositorError, CompositorResult};
use crate::raster::Raster;
use crate::source::RenderStore;

/// Largest output dimension before the flatten uniformly downscales.
pub const MAX_EXPORT_DIMENSION: u32 = 4096;

/// Configuration for board export.
#[derive(Debug, Clone)]
pub struct ExportConfig {
    /// Cap on either output dimension (default: 4096).
    pub max_dimension: u32,
    /// Background color behind transparent regions, as RGB bytes.
    pub background: [u8; 3],
    /// JPEG quality 1-100 (default: 85).
    pub jpeg_quality: u8,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            max_dimension: MAX_EXPORT_DIMENSION,
            background: [0, 0, 0],
            jpeg_quality: 85,
        }
    }
}

/// Destination for finished exports.
pub trait ExportSink {
    /// Take ownership of one encoded export.
    ///
    /// # Errors
    ///
    /// Returns an error if the sink cannot store the bytes.
    fn deliver(&mut self, filename: &str, bytes: &[u8]) -> CompositorResult<()>;
}

/// Sink that writes exports into a directory.
#[derive(Debug, Clone)]
pub struct FileSink {
    dir: PathBuf,
}

impl FileSink {
    /// Create a sink writing into `dir`, which must already exist.
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

impl ExportSink for FileSink {
    fn deliver(&mut self, filename: &str, bytes: &[u8]) -> CompositorResult<()> {
        std::fs::write(self.dir.join(filename), bytes)?;
        Ok(())
    }
}

/// Flattens a board into a single raster and encodes it for export.
pub struct CollageExporter {
    config: ExportConfig,
}

impl CollageExporter {
    /// Create an exporter with the given configuration.
    #[must_use]
    pub fn new(config: ExportConfig) -> Self {
        Self { config }
    }

    /// Create an exporter with default configuration.
    #[must_use]
    pub fn with_defaults() -> Self {
        Self::new(ExportConfig::default())
    }

    /// Flatten the board into one straight-alpha raster.
    ///
    /// Blocks composite in ascending z-order with their blend modes; blocks
    /// without rendered content are skipped. The output covers the union
    /// bounding box of all blocks, uniformly downscaled if either dimension
    /// would exceed the configured cap.
    ///
    /// # Errors
    ///
    /// Returns [`CompositorError::EmptyBoard`] if the board has no blocks.
    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        clippy::cast_precision_loss
    )]
    pub fn flatten(&self, board: &Board, store: &RenderStore) -> CompositorResult<Raster> {
        let bounds = board.union_bounds().ok_or(CompositorError::EmptyBoard)?;

        let max = self.config.max_dimension.max(1) as f32;
        let scale = if bounds.width > max || bounds.height > max {
            (max / bounds.width).min(max / bounds.height)
        } else {
            1.0
        };
        let out_w = ((bounds.width * scale).round() as u32).max(1);
        let out_h = ((bounds.height * scale).round() as u32).max(1);

        // Premultiplied accumulation buffer, transparent until drawn on.
        let mut acc = vec![0u8; out_w as usize * out_h as usize * 4];

        for block in board.blocks_by_z() {
            let Some(content) = store.rendered(block.id) else {
                debug!(id = %block.id, "block has no rendered content, skipping");
                continue;
            };

            let tile_w = ((block.width * scale).round() as u32).max(1);
            let tile_h = ((block.height * scale).round() as u32).max(1);
            let tile = blend::premultiply(content.resized(tile_w, tile_h).data());

            let origin_x = ((block.x - bounds.x) * scale).round() as u32;
            let origin_y = ((block.y - bounds.y) * scale).round() as u32;
            if origin_x >= out_w || origin_y >= out_h {
                continue;
            }
            // Rounding may push the tile a pixel past the edge; clip it.
            let copy_w = tile_w.min(out_w - origin_x) as usize;
            let copy_h = tile_h.min(out_h - origin_y) as usize;

            for row in 0..copy_h {
                let dst_start =
                    ((origin_y as usize + row) * out_w as usize + origin_x as usize) * 4;
                let src_start = row * tile_w as usize * 4;
                blend::composite_over(
                    &mut acc[dst_start..dst_start + copy_w * 4],
                    &tile[src_start..src_start + copy_w * 4],
                    block.blend,
                )?;
            }
        }

        Raster::from_raw(out_w, out_h, blend::unpremultiply(&acc))
    }

    /// Merge a straight-alpha composite over the background and encode JPEG.
    ///
    /// # Errors
    ///
    /// Returns an error if JPEG encoding fails.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn to_jpeg(&self, composite: &Raster) -> CompositorResult<Vec<u8>> {
        let (width, height) = (composite.width(), composite.height());
        let bg = &self.config.background;
        let mut rgb_data = Vec::with_capacity(width as usize * height as usize * 3);
        for pixel in composite.data().chunks_exact(4) {
            let alpha = f32::from(pixel[3]) / 255.0;
            let inv = 1.0 - alpha;
            rgb_data.push((f32::from(pixel[0]).mul_add(alpha, f32::from(bg[0]) * inv)) as u8);
            rgb_data.push((f32::from(pixel[1]).mul_add(alpha, f32::from(bg[1]) * inv)) as u8);
            rgb_data.push((f32::from(pixel[2]).mul_add(alpha, f32::from(bg[2]) * inv)) as u8);
        }

        let mut buf = Cursor::new(Vec::new());
        let encoder =
            image::codecs::jpeg::JpegEncoder::new_with_quality(&mut buf, self.config.jpeg_quality);
        encoder.write_image(&rgb_data, width, height, image::ExtendedColorType::Rgb8)?;

        Ok(buf.into_inner())
    }

    /// Flatten the board and encode it as JPEG bytes.
    ///
    /// # Errors
    ///
    /// Returns an error if the board is empty or encoding fails.
    pub fn export_jpeg(&self, board: &Board, store: &RenderStore) -> CompositorResult<Vec<u8>> {
        let composite = self.flatten(board, store)?;
        self.to_jpeg(&composite)
    }

    /// Flatten, encode, and deliver to a sink under a timestamped filename.
    ///
    /// Returns the filename used.
    ///
    /// # Errors
    ///
    /// Returns an error if the board is empty, encoding fails, or the sink
    /// rejects the bytes.
    pub fn export_to<S: ExportSink>(
        &self,
        board: &Board,
        store: &RenderStore,
        sink: &mut S,
    ) -> CompositorResult<String> {
        let bytes = self.export_jpeg(board, store)?;
        let filename = export_filename(Utc::now());
        sink.deliver(&filename, &bytes)?;
        debug!(%filename, size = bytes.len(), "delivered export");
        Ok(filename)
    }
}

/// Filename for an export taken at `timestamp`: the UTC ISO-8601 instant
/// with `:` replaced by `-` (keeps the name portable), then `-collage.jpg`.
#[must_use]
pub fn export_filename(timestamp: DateTime<Utc>) -> String {
    let stamp = timestamp
        .to_rfc3339_opts(SecondsFormat::Millis, true)
        .replace(':', "-");
    format!("{stamp}-collage.jpg")
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use collage_core::{Block, BlockKind};

    use super::*;

    fn image_block(x: f32, y: f32, width: f32, height: f32, z_index: i64) -> Block {
        let mut block = Block::new(
            BlockKind::Image {
                src: "img://test".to_string(),
                crop: None,
            },
            x,
            y,
            width,
            height,
        );
        block.z_index = z_index;
        block
    }

    #[test]
    fn test_config_defaults() {
        let config = ExportConfig::default();
        assert_eq!(config.max_dimension, 4096);
        assert_eq!(config.jpeg_quality, 85);
        assert_eq!(config.background, [0, 0, 0]);
    }

    #[test]
    fn test_export_filename_format() {
        let at = Utc
            .with_ymd_and_hms(2026, 1, 15, 10, 30, 0)
            .single()
            .expect("valid timestamp");
        let name = export_filename(at);
        assert_eq!(name, "2026-01-15T10-30-00.000Z-collage.jpg");
        assert!(!name.contains(':'), "colons are not filename-safe");
    }

    #[test]
    fn test_flatten_empty_board_errors() {
        let exporter = CollageExporter::with_defaults();
        let result = exporter.flatten(&Board::new(), &RenderStore::new());
        assert!(matches!(result, Err(CompositorError::EmptyBoard)));
    }

    #[test]
    fn test_flatten_single_block_fills_bounds() {
        let mut board = Board::new();
        let block = image_block(10.0, 20.0, 4.0, 3.0, 1);
        let id = block.id;
        board.insert(block);

        let mut store = RenderStore::new();
        store.insert_rendered(id, Raster::solid(8, 8, [255, 0, 0, 255]));

        let exporter = CollageExporter::with_defaults();
        let composite = exporter.flatten(&board, &store).expect("flatten");
        assert_eq!((composite.width(), composite.height()), (4, 3));
        assert_eq!(composite.pixel(0, 0), Some([255, 0, 0, 255]));
        assert_eq!(composite.pixel(3, 2), Some([255, 0, 0, 255]));
    }

    #[test]
    fn test_flatten_skips_blocks_without_content() {
        let mut board = Board::new();
        let drawn = image_block(0.0, 0.0, 2.0, 2.0, 1);
        let drawn_id = drawn.id;
        board.insert(drawn);
        // Extends the union bounds to 4x2 but has nothing to draw.
        board.insert(image_block(2.0, 0.0, 2.0, 2.0, 2));

        let mut store = RenderStore::new();
        store.insert_rendered(drawn_id, Raster::solid(2, 2, [0, 255, 0, 255]));

        let exporter = CollageExporter::with_defaults();
        let composite = exporter.flatten(&board, &store).expect("flatten");
        assert_eq!((composite.width(), composite.height()), (4, 2));
        assert_eq!(composite.pixel(0, 0), Some([0, 255, 0, 255]));
        assert_eq!(
            composite.pixel(3, 0),
            Some([0, 0, 0, 0]),
            "undrawn area stays transparent"
        );
    }

    #[test]
    fn test_flatten_downscales_oversized_bounds() {
        let mut board = Board::new();
        let block = image_block(0.0, 0.0, 400.0, 200.0, 1);
        let id = block.id;
        board.insert(block);

        let mut store = RenderStore::new();
        store.insert_rendered(id, Raster::solid(4, 4, [10, 20, 30, 255]));

        let exporter = CollageExporter::new(ExportConfig {
            max_dimension: 100,
            ..ExportConfig::default()
        });
        let composite = exporter.flatten(&board, &store).expect("flatten");
        assert_eq!(
            (composite.width(), composite.height()),
            (100, 50),
            "scale = min(100/400, 100/200) applied to both axes"
        );
    }

    #[test]
    fn test_jpeg_export_produces_valid_bytes() {
        let mut board = Board::new();
        let block = image_block(0.0, 0.0, 16.0, 16.0, 1);
        let id = block.id;
        board.insert(block);

        let mut store = RenderStore::new();
        store.insert_rendered(id, Raster::solid(16, 16, [200, 50, 50, 255]));

        let exporter = CollageExporter::with_defaults();
        let jpeg = exporter.export_jpeg(&board, &store).expect("jpeg export");

        // JPEG magic bytes: FFD8
        assert!(jpeg.len() > 2);
        assert_eq!(jpeg[0], 0xFF);
        assert_eq!(jpeg[1], 0xD8);
    }

    #[test]
    fn test_file_sink_writes_named_export() {
        let dir = tempfile::tempdir().expect("temp dir");
        let mut sink = FileSink::new(dir.path());

        let mut board = Board::new();
        let block = image_block(0.0, 0.0, 8.0, 8.0, 1);
        let id = block.id;
        board.insert(block);

        let mut store = RenderStore::new();
        store.insert_rendered(id, Raster::solid(8, 8, [255, 255, 255, 255]));

        let exporter = CollageExporter::with_defaults();
        let filename = exporter
            .export_to(&board, &store, &mut sink)
            .expect("export");

        assert!(filename.ends_with("-collage.jpg"));
        let written = std::fs::read(dir.path().join(&filename)).expect("file exists");
        assert_eq!(written[0], 0xFF);
        assert_eq!(written[1], 0xD8);
    }
}

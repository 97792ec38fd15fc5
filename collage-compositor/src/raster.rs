//! Straight-alpha RGBA8 raster buffers.
//!
//! [`Raster`] is the unit of content the compositor moves around: decoded
//! images, copied video frames, and flatten tiles. Crop, flip and resize all
//! return fresh buffers; nothing here composites (see [`crate::blend`]).

use collage_core::CropBox;
use image::imageops::{self, FilterType};
use image::RgbaImage;

use crate::error::{CompositorError, CompositorResult};

/// A straight-alpha RGBA8 pixel buffer, row-major, 4 bytes per pixel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Raster {
    image: RgbaImage,
}

impl Raster {
    /// Build a raster from raw RGBA bytes.
    ///
    /// # Errors
    ///
    /// Returns [`CompositorError::InvalidRaster`] if `data` is not exactly
    /// `width * height * 4` bytes.
    pub fn from_raw(width: u32, height: u32, data: Vec<u8>) -> CompositorResult<Self> {
        let expected = (width as usize) * (height as usize) * 4;
        if data.len() != expected {
            return Err(CompositorError::InvalidRaster {
                expected,
                actual: data.len(),
            });
        }
        let image = RgbaImage::from_raw(width, height, data).ok_or(
            CompositorError::InvalidRaster {
                expected,
                actual: expected,
            },
        )?;
        Ok(Self { image })
    }

    /// A raster filled with one color.
    #[must_use]
    pub fn solid(width: u32, height: u32, rgba: [u8; 4]) -> Self {
        Self {
            image: RgbaImage::from_pixel(width, height, image::Rgba(rgba)),
        }
    }

    /// The dark-gray stand-in used while a feed has produced no frame yet.
    #[must_use]
    pub fn placeholder(width: u32, height: u32) -> Self {
        Self::solid(width, height, [32, 32, 32, 255])
    }

    /// Width in pixels.
    #[must_use]
    pub fn width(&self) -> u32 {
        self.image.width()
    }

    /// Height in pixels.
    #[must_use]
    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// The raw RGBA bytes.
    #[must_use]
    pub fn data(&self) -> &[u8] {
        self.image.as_raw()
    }

    /// Consume into the raw RGBA bytes.
    #[must_use]
    pub fn into_raw(self) -> Vec<u8> {
        self.image.into_raw()
    }

    /// One pixel's RGBA, or `None` outside the raster.
    #[must_use]
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        self.image.get_pixel_checked(x, y).map(|p| p.0)
    }

    /// Copy out a sub-rectangle, clamped to the raster bounds.
    #[must_use]
    pub fn cropped(&self, crop: CropBox) -> Self {
        let x = crop.x.min(self.width());
        let y = crop.y.min(self.height());
        let width = crop.width.min(self.width() - x);
        let height = crop.height.min(self.height() - y);
        Self {
            image: imageops::crop_imm(&self.image, x, y, width, height).to_image(),
        }
    }

    /// Mirror left-right.
    #[must_use]
    pub fn flipped_horizontal(&self) -> Self {
        Self {
            image: imageops::flip_horizontal(&self.image),
        }
    }

    /// Mirror top-bottom.
    #[must_use]
    pub fn flipped_vertical(&self) -> Self {
        Self {
            image: imageops::flip_vertical(&self.image),
        }
    }

    /// Resample to a new size (bilinear). Zero target dimensions are
    /// bumped to one pixel.
    #[must_use]
    pub fn resized(&self, width: u32, height: u32) -> Self {
        Self {
            image: imageops::resize(&self.image, width.max(1), height.max(1), FilterType::Triangle),
        }
    }
}

impl From<RgbaImage> for Raster {
    fn from(image: RgbaImage) -> Self {
        Self { image }
    }
}

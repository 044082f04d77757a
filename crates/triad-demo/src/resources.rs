//! Texture image loading.

use std::path::Path;

use image::DynamicImage;
use thiserror::Error;
use triad_engine::render::{ColorFormat, TextureImage};

#[derive(Debug, Error)]
pub enum ResourceLoadError {
    #[error("texture load failed: {reason}")]
    TextureLoadFailed { reason: String },
}

/// Decoded 8-bit pixels, bottom row first as GL expects.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedImage {
    pub width: u32,
    pub height: u32,
    pub format: ColorFormat,
    pub pixels: Vec<u8>,
}

impl LoadedImage {
    pub fn as_texture_image(&self) -> TextureImage<'_> {
        TextureImage::new(self.width, self.height, self.format, &self.pixels)
    }
}

/// Decodes the image at `path`. Only RGB and RGBA sources are accepted.
pub fn load_texture_image(path: &Path) -> Result<LoadedImage, ResourceLoadError> {
    let decoded = image::open(path).map_err(|e| ResourceLoadError::TextureLoadFailed {
        reason: format!("{}: {e}", path.display()),
    })?;
    let loaded = from_dynamic(decoded)?;
    log::info!(
        "loaded {} ({}x{} {:?})",
        path.display(),
        loaded.width,
        loaded.height,
        loaded.format
    );
    Ok(loaded)
}

fn from_dynamic(decoded: DynamicImage) -> Result<LoadedImage, ResourceLoadError> {
    let channels = decoded.color().channel_count();
    let format = ColorFormat::from_channels(channels).ok_or_else(|| {
        ResourceLoadError::TextureLoadFailed {
            reason: format!("unsupported channel count {channels}, expected 3 or 4"),
        }
    })?;

    // Image rows are stored top first; GL samples row 0 at v = 0.
    let flipped = decoded.flipv();
    let (width, height) = (flipped.width(), flipped.height());
    let pixels = match format {
        ColorFormat::Rgb => flipped.into_rgb8().into_raw(),
        ColorFormat::Rgba => flipped.into_rgba8().into_raw(),
    };

    Ok(LoadedImage {
        width,
        height,
        format,
        pixels,
    })
}

/// Procedural RGB checkerboard of `size`x`size` pixels in `cell`-pixel squares.
pub fn checkerboard(size: u32, cell: u32) -> LoadedImage {
    const LIGHT: [u8; 3] = [235, 235, 235];
    const DARK: [u8; 3] = [40, 40, 48];

    let cell = cell.max(1);
    let pixels = (0..size)
        .flat_map(|y| (0..size).map(move |x| (x, y)))
        .flat_map(|(x, y)| {
            if (x / cell + y / cell) % 2 == 0 {
                LIGHT
            } else {
                DARK
            }
        })
        .collect();

    LoadedImage {
        width: size,
        height: size,
        format: ColorFormat::Rgb,
        pixels,
    }
}

use std::rc::Rc;

use crate::backend::{GlBackend, TextureFilter, TextureParameter, TextureWrap};

use super::error::{CreateTextureError, ResourceError, TextureError};

/// Channel layout of 8-bit-per-channel pixel data.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum ColorFormat {
    Rgb,
    Rgba,
}

impl ColorFormat {
    #[inline]
    pub const fn bytes_per_pixel(self) -> usize {
        match self {
            ColorFormat::Rgb => 3,
            ColorFormat::Rgba => 4,
        }
    }

    /// Maps a decoder's channel count to a format. Only 3 and 4 are supported.
    pub fn from_channels(channels: u8) -> Option<Self> {
        match channels {
            3 => Some(ColorFormat::Rgb),
            4 => Some(ColorFormat::Rgba),
            _ => None,
        }
    }
}

/// Decoded pixels ready for upload: tightly packed, row-major, first row at the bottom.
#[derive(Debug, Copy, Clone)]
pub struct TextureImage<'a> {
    pub width: u32,
    pub height: u32,
    /// Mip level the pixels are uploaded to; the remaining levels are generated.
    pub mip_level: u32,
    pub format: ColorFormat,
    pub pixels: &'a [u8],
}

impl<'a> TextureImage<'a> {
    pub fn new(width: u32, height: u32, format: ColorFormat, pixels: &'a [u8]) -> Self {
        Self {
            width,
            height,
            mip_level: 0,
            format,
            pixels,
        }
    }

    /// Byte length the pixel slice must have; saturates instead of overflowing.
    pub fn expected_len(&self) -> usize {
        (self.width as usize)
            .saturating_mul(self.height as usize)
            .saturating_mul(self.format.bytes_per_pixel())
    }

    /// Dimensions and mip level must fit the driver's signed sizes.
    fn validate(&self) -> Result<(), TextureError> {
        const MAX: u32 = i32::MAX as u32;
        if self.width == 0 || self.height == 0 || self.width > MAX || self.height > MAX {
            return Err(TextureError::InvalidDimensions {
                width: self.width,
                height: self.height,
            });
        }
        if self.mip_level > MAX {
            return Err(TextureError::InvalidMipLevel(self.mip_level));
        }
        let expected = self.expected_len();
        if self.pixels.len() != expected {
            return Err(TextureError::PixelDataSize {
                expected,
                actual: self.pixels.len(),
            });
        }
        Ok(())
    }
}

/// 2D texture sampled with repeat wrapping and trilinear minification.
///
/// Sampling state is fixed at creation. Dropping deletes the GL texture.
pub struct Texture2D<B: GlBackend> {
    backend: Rc<B>,
    id: B::Texture,
    width: u32,
    height: u32,
    format: ColorFormat,
}

impl<B: GlBackend> Texture2D<B> {
    pub fn new(backend: Rc<B>, image: &TextureImage<'_>) -> Result<Self, CreateTextureError> {
        image.validate()?;

        let id = backend
            .create_texture()
            .map_err(|reason| ResourceError::new("texture", reason))?;

        backend.bind_texture_2d(id);
        backend.texture_2d_parameter(TextureParameter::WrapS(TextureWrap::Repeat));
        backend.texture_2d_parameter(TextureParameter::WrapT(TextureWrap::Repeat));
        backend.texture_2d_parameter(TextureParameter::MinFilter(TextureFilter::LinearMipmapLinear));
        backend.texture_2d_parameter(TextureParameter::MagFilter(TextureFilter::Linear));
        backend.texture_2d_image(
            image.mip_level as i32,
            image.format,
            image.width as i32,
            image.height as i32,
            image.pixels,
        );
        backend.generate_mipmap_2d();

        log::debug!(
            "texture {id:?}: {}x{} {:?} uploaded",
            image.width,
            image.height,
            image.format
        );

        Ok(Self {
            backend,
            id,
            width: image.width,
            height: image.height,
            format: image.format,
        })
    }

    /// Binds the texture to texture unit `unit`.
    ///
    /// A sampler uniform holding `n` reads the texture activated on unit `n`.
    pub fn activate_on(&self, unit: u32) {
        self.backend.active_texture_unit(unit);
        self.backend.bind_texture_2d(self.id);
    }

    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn format(&self) -> ColorFormat {
        self.format
    }
}

impl<B: GlBackend> Drop for Texture2D<B> {
    fn drop(&mut self) {
        self.backend.delete_texture(self.id);
    }
}

impl<B: GlBackend> std::fmt::Debug for Texture2D<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Texture2D")
            .field("id", &self.id)
            .field("size", &(self.width, self.height))
            .field("format", &self.format)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{GlCall, RecordingBackend};

    #[test]
    fn from_channels_accepts_only_rgb_and_rgba() {
        assert_eq!(ColorFormat::from_channels(3), Some(ColorFormat::Rgb));
        assert_eq!(ColorFormat::from_channels(4), Some(ColorFormat::Rgba));
        assert_eq!(ColorFormat::from_channels(1), None);
        assert_eq!(ColorFormat::from_channels(2), None);
    }

    #[test]
    fn creation_sets_fixed_sampling_then_uploads_and_mipmaps() {
        let backend = Rc::new(RecordingBackend::new());
        let pixels = [255u8; 3 * 5 * 2];
        let texture =
            Texture2D::new(Rc::clone(&backend), &TextureImage::new(5, 2, ColorFormat::Rgb, &pixels))
                .unwrap();

        assert_eq!(
            backend.calls(),
            vec![
                GlCall::CreateTexture(1),
                GlCall::BindTexture2d(1),
                GlCall::Texture2dParameter(TextureParameter::WrapS(TextureWrap::Repeat)),
                GlCall::Texture2dParameter(TextureParameter::WrapT(TextureWrap::Repeat)),
                GlCall::Texture2dParameter(TextureParameter::MinFilter(
                    TextureFilter::LinearMipmapLinear
                )),
                GlCall::Texture2dParameter(TextureParameter::MagFilter(TextureFilter::Linear)),
                GlCall::Texture2dImage {
                    level: 0,
                    format: ColorFormat::Rgb,
                    width: 5,
                    height: 2,
                    len: 30,
                },
                GlCall::GenerateMipmap2d,
            ]
        );
        assert_eq!(texture.size(), (5, 2));
    }

    #[test]
    fn short_pixel_data_is_rejected_before_creation() {
        let backend = Rc::new(RecordingBackend::new());
        let pixels = [0u8; 15];
        let err = Texture2D::new(Rc::clone(&backend), &TextureImage::new(2, 2, ColorFormat::Rgba, &pixels))
            .unwrap_err();

        assert_eq!(
            err,
            CreateTextureError::Invalid(TextureError::PixelDataSize { expected: 16, actual: 15 })
        );
        assert!(backend.calls().is_empty());
    }

    #[test]
    fn zero_dimensions_are_rejected() {
        let backend = Rc::new(RecordingBackend::new());
        let err = Texture2D::new(Rc::clone(&backend), &TextureImage::new(0, 4, ColorFormat::Rgb, &[]))
            .unwrap_err();
        assert_eq!(
            err,
            CreateTextureError::Invalid(TextureError::InvalidDimensions { width: 0, height: 4 })
        );
    }

    #[test]
    fn dimensions_beyond_signed_range_are_rejected() {
        let backend = Rc::new(RecordingBackend::new());
        let wide = i32::MAX as u32 + 1;
        let err = Texture2D::new(Rc::clone(&backend), &TextureImage::new(wide, 1, ColorFormat::Rgb, &[]))
            .unwrap_err();
        assert_eq!(
            err,
            CreateTextureError::Invalid(TextureError::InvalidDimensions { width: wide, height: 1 })
        );

        let deep = TextureImage {
            mip_level: u32::MAX,
            ..TextureImage::new(1, 1, ColorFormat::Rgb, &[0; 3])
        };
        assert_eq!(
            Texture2D::new(Rc::clone(&backend), &deep).unwrap_err(),
            CreateTextureError::Invalid(TextureError::InvalidMipLevel(u32::MAX))
        );

        let huge = TextureImage::new(u32::MAX, u32::MAX, ColorFormat::Rgba, &[]);
        assert_eq!(huge.expected_len(), usize::MAX);
        assert!(backend.calls().is_empty());
    }

    #[test]
    fn activate_on_selects_unit_then_binds() {
        let backend = Rc::new(RecordingBackend::new());
        let texture =
            Texture2D::new(Rc::clone(&backend), &TextureImage::new(1, 1, ColorFormat::Rgba, &[0; 4]))
                .unwrap();
        backend.take_calls();

        texture.activate_on(2);
        assert_eq!(
            backend.calls(),
            vec![GlCall::ActiveTextureUnit(2), GlCall::BindTexture2d(1)]
        );

        drop(texture);
        assert_eq!(backend.calls().last(), Some(&GlCall::DeleteTexture(1)));
    }
}

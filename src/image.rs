use alloc::vec::Vec;

#[cfg(feature = "rgb")]
use rgb::AsPixels as _;

use crate::header::Header;

/// An RGBA8 image plus the header fields that travel with it.
///
/// Pixels are always stored as `width * height` RGBA quadruples, even when
/// `channels` is 3. `channels` and `color_space` are kept as raw bytes so an
/// out-of-range value reaches the encoder and is rejected there.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Image {
    pub width: u32,
    pub height: u32,
    pub channels: u8,
    pub color_space: u8,
    pixels: Vec<u8>,
}

impl Image {
    /// Wrap an RGBA buffer. Defaults to 4 channels and color space 0.
    pub fn from_rgba(width: u32, height: u32, pixels: Vec<u8>) -> Self {
        Self {
            width,
            height,
            channels: 4,
            color_space: 0,
            pixels,
        }
    }

    pub fn with_channels(mut self, channels: u8) -> Self {
        self.channels = channels;
        self
    }

    pub fn with_color_space(mut self, color_space: u8) -> Self {
        self.color_space = color_space;
        self
    }

    pub(crate) fn decoded(header: &Header, pixels: Vec<u8>) -> Self {
        Self {
            width: header.width,
            height: header.height,
            channels: header.channels.count(),
            color_space: header.color_space,
            pixels,
        }
    }

    /// RGBA pixel bytes, row-major.
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    pub fn into_pixels(self) -> Vec<u8> {
        self.pixels
    }

    /// Reinterpret pixel data as typed RGBA pixels.
    #[cfg(feature = "rgb")]
    pub fn as_pixels(&self) -> &[rgb::RGBA8] {
        self.pixels.as_pixels()
    }

    /// Zero-copy view as an [`imgref::ImgRef`] of RGBA pixels.
    #[cfg(feature = "imgref")]
    pub fn as_imgref(&self) -> imgref::ImgRef<'_, rgb::RGBA8> {
        imgref::ImgRef::new(self.as_pixels(), self.width as usize, self.height as usize)
    }

    /// Copy into an [`imgref::ImgVec`] of RGBA pixels.
    #[cfg(feature = "imgref")]
    pub fn to_imgvec(&self) -> imgref::ImgVec<rgb::RGBA8> {
        imgref::ImgVec::new(
            self.as_pixels().to_vec(),
            self.width as usize,
            self.height as usize,
        )
    }
}

//! The fixed 14-byte `qoif` header.
//!
//! ```text
//! 0..4    magic "qoif"
//! 4..8    width  (u32 BE)
//! 8..12   height (u32 BE)
//! 12      channels (3 or 4)
//! 13      color space (high nibble must be zero)
//! ```

use crate::error::QoiError;
use crate::pixel::Channels;

pub(crate) const MAGIC: [u8; 4] = *b"qoif";
pub(crate) const HEADER_SIZE: usize = 14;
/// Zero bytes appended after the last chunk.
pub(crate) const END_MARKER: [u8; 4] = [0; 4];
pub(crate) const END_MARKER_SIZE: usize = END_MARKER.len();
/// Largest width or height the encoder accepts.
pub(crate) const MAX_ENCODE_DIMENSION: u32 = 0xffff;

/// Parsed and validated file header.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Header {
    pub width: u32,
    pub height: u32,
    pub channels: Channels,
    /// Color-space byte. Only the low nibble may be set; the codec does not interpret it.
    pub color_space: u8,
}

impl Header {
    /// Parse and validate a header from the start of a complete stream.
    ///
    /// Checks run in wire order and the first failure wins: length (header plus
    /// end marker), magic, width, height, channels, color space.
    pub fn from_bytes(data: &[u8]) -> Result<Header, QoiError> {
        if data.len() < HEADER_SIZE + END_MARKER_SIZE {
            return Err(QoiError::ShortInput { len: data.len() });
        }
        let magic = [data[0], data[1], data[2], data[3]];
        if magic != MAGIC {
            return Err(QoiError::MagicMismatch { found: magic });
        }
        let width = u32::from_be_bytes([data[4], data[5], data[6], data[7]]);
        let height = u32::from_be_bytes([data[8], data[9], data[10], data[11]]);
        if width == 0 {
            return Err(QoiError::IllegalWidth(width));
        }
        if height == 0 {
            return Err(QoiError::IllegalHeight(height));
        }
        let channels = Channels::try_from(data[12])?;
        let color_space = data[13];
        check_color_space(color_space)?;

        log::debug!(
            "qoi header: {width}x{height}, {} channels, color space {color_space:#04x}",
            channels.count()
        );
        Ok(Header {
            width,
            height,
            channels,
            color_space,
        })
    }

    /// Validate encoder parameters in the order width, height, channels, color space.
    pub(crate) fn for_encode(
        width: u32,
        height: u32,
        channels: u8,
        color_space: u8,
    ) -> Result<Header, QoiError> {
        if width == 0 || width > MAX_ENCODE_DIMENSION {
            return Err(QoiError::IllegalWidth(width));
        }
        if height == 0 || height > MAX_ENCODE_DIMENSION {
            return Err(QoiError::IllegalHeight(height));
        }
        let channels = Channels::try_from(channels)?;
        check_color_space(color_space)?;
        Ok(Header {
            width,
            height,
            channels,
            color_space,
        })
    }

    /// Serialize to the 14-byte wire form.
    pub fn to_bytes(&self) -> [u8; HEADER_SIZE] {
        let mut out = [0u8; HEADER_SIZE];
        out[0..4].copy_from_slice(&MAGIC);
        out[4..8].copy_from_slice(&self.width.to_be_bytes());
        out[8..12].copy_from_slice(&self.height.to_be_bytes());
        out[12] = self.channels.count();
        out[13] = self.color_space;
        out
    }

    /// Number of pixels, or an error if it does not fit in `usize`.
    pub(crate) fn pixel_count(&self) -> Result<usize, QoiError> {
        (self.width as usize)
            .checked_mul(self.height as usize)
            .ok_or(QoiError::DimensionsTooLarge {
                width: self.width,
                height: self.height,
            })
    }
}

fn check_color_space(color_space: u8) -> Result<(), QoiError> {
    if color_space & 0xf0 != 0 {
        return Err(QoiError::IllegalColorSpace(color_space));
    }
    Ok(())
}

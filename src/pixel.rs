use crate::error::QoiError;

/// Pixel memory layout accepted by the encoder.
#[non_exhaustive]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PixelLayout {
    /// 3 channels, 8-bit RGB. Alpha is taken as 255.
    Rgb8,
    /// 4 channels, 8-bit RGBA.
    Rgba8,
}

impl PixelLayout {
    /// Bytes per pixel for this layout.
    pub fn bytes_per_pixel(&self) -> usize {
        match self {
            Self::Rgb8 => 3,
            Self::Rgba8 => 4,
        }
    }
}

/// Channel count recorded in the file header.
///
/// Decoded pixels are always RGBA in memory; with [`Channels::Rgb`] the
/// encoder never reads source alpha and every alpha byte is 255.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Channels {
    Rgb = 3,
    Rgba = 4,
}

impl Channels {
    /// Channel count as stored in header byte 12.
    pub fn count(self) -> u8 {
        self as u8
    }

    /// Pick the narrowest channel count that loses nothing for an RGBA buffer:
    /// [`Channels::Rgb`] when every alpha byte is 255.
    pub fn detect(rgba: &[u8]) -> Channels {
        if rgba.chunks_exact(4).all(|px| px[3] == 0xff) {
            Channels::Rgb
        } else {
            Channels::Rgba
        }
    }
}

impl TryFrom<u8> for Channels {
    type Error = QoiError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            3 => Ok(Channels::Rgb),
            4 => Ok(Channels::Rgba),
            other => Err(QoiError::IllegalChannels(other)),
        }
    }
}

/// One RGBA color.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    /// Color both codec directions start from before the first pixel.
    pub const START: Color = Color::new(255, 255, 255, 255);

    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Color index slot: `(r ^ g ^ b ^ a) % 64`.
    #[inline]
    pub const fn hash(self) -> usize {
        ((self.r ^ self.g ^ self.b ^ self.a) % 64) as usize
    }

    /// Big-endian `rgba` packing used for run comparison.
    #[inline]
    pub const fn pack(self) -> u32 {
        u32::from_be_bytes([self.r, self.g, self.b, self.a])
    }

    /// Per-channel signed difference `self - prev`, without wrapping.
    #[inline]
    pub(crate) fn delta_from(self, prev: Color) -> [i16; 4] {
        [
            i16::from(self.r) - i16::from(prev.r),
            i16::from(self.g) - i16::from(prev.g),
            i16::from(self.b) - i16::from(prev.b),
            i16::from(self.a) - i16::from(prev.a),
        ]
    }

    /// Add signed deltas modulo 256.
    #[inline]
    pub(crate) fn wrapping_add(self, dr: i8, dg: i8, db: i8, da: i8) -> Color {
        Color {
            r: self.r.wrapping_add_signed(dr),
            g: self.g.wrapping_add_signed(dg),
            b: self.b.wrapping_add_signed(db),
            a: self.a.wrapping_add_signed(da),
        }
    }

    pub fn to_array(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

impl From<[u8; 4]> for Color {
    fn from([r, g, b, a]: [u8; 4]) -> Self {
        Color { r, g, b, a }
    }
}

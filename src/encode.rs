//! Pixel stream encoder.

use alloc::vec;
use alloc::vec::Vec;
use enough::Stop;

use crate::chunk::{Chunk, ChunkWriter, RUN_MAX, fits};
use crate::error::QoiError;
use crate::header::{END_MARKER_SIZE, HEADER_SIZE, Header};
use crate::image::Image;
use crate::index::ColorIndex;
use crate::limits::Limits;
use crate::pixel::{Channels, Color, PixelLayout};

/// Encode configuration.
#[derive(Clone, Debug)]
pub struct EncodeRequest<'a> {
    channels: u8,
    color_space: u8,
    limits: Option<&'a Limits>,
}

impl<'a> EncodeRequest<'a> {
    /// Channel count to record in the header (3 or 4; anything else fails on encode).
    pub fn new(channels: u8) -> Self {
        Self {
            channels,
            color_space: 0,
            limits: None,
        }
    }

    /// 3-channel output: source alpha is never read.
    pub fn rgb() -> Self {
        Self::new(Channels::Rgb.count())
    }

    pub fn rgba() -> Self {
        Self::new(Channels::Rgba.count())
    }

    pub fn color_space(mut self, color_space: u8) -> Self {
        self.color_space = color_space;
        self
    }

    pub fn with_limits(mut self, limits: &'a Limits) -> Self {
        self.limits = Some(limits);
        self
    }

    /// Encode `width * height` pixels of `layout` into a complete stream.
    pub fn encode(
        &self,
        pixels: &[u8],
        width: u32,
        height: u32,
        layout: PixelLayout,
        stop: impl Stop,
    ) -> Result<Vec<u8>, QoiError> {
        let header = Header::for_encode(width, height, self.channels, self.color_space)?;
        if let Some(limits) = self.limits {
            limits.check(width, height)?;
        }
        encode_pixels(pixels, &header, layout, self.limits, &stop)
    }
}

impl Image {
    /// Encode with this image's channel count and color space.
    pub fn encode(&self, stop: impl Stop) -> Result<Vec<u8>, QoiError> {
        EncodeRequest::new(self.channels)
            .color_space(self.color_space)
            .encode(self.pixels(), self.width, self.height, PixelLayout::Rgba8, stop)
    }
}

fn encode_pixels(
    pixels: &[u8],
    header: &Header,
    layout: PixelLayout,
    limits: Option<&Limits>,
    stop: &dyn Stop,
) -> Result<Vec<u8>, QoiError> {
    let too_large = QoiError::DimensionsTooLarge {
        width: header.width,
        height: header.height,
    };
    let count = header.pixel_count()?;
    let bpp = layout.bytes_per_pixel();
    let expected = count.checked_mul(bpp).ok_or(too_large)?;
    if pixels.len() < expected {
        return Err(QoiError::BufferTooSmall {
            needed: expected,
            actual: pixels.len(),
        });
    }

    // One tag byte plus one literal per channel bounds every pixel, runs included.
    let worst_case = count
        .checked_mul(usize::from(header.channels.count()) + 1)
        .and_then(|n| n.checked_add(HEADER_SIZE + END_MARKER_SIZE))
        .ok_or(QoiError::DimensionsTooLarge {
            width: header.width,
            height: header.height,
        })?;
    if let Some(limits) = limits {
        limits.check_memory(worst_case)?;
    }
    stop.check()?;

    let mut out = vec![0u8; worst_case];
    out[..HEADER_SIZE].copy_from_slice(&header.to_bytes());

    let read_alpha = header.channels == Channels::Rgba && layout == PixelLayout::Rgba8;
    let last = count - 1;
    let mut writer = ChunkWriter::new(&mut out, HEADER_SIZE);
    let mut encoder = PixelEncoder::new();
    let row_bytes = header.width as usize * bpp;
    for (y, row) in pixels[..expected].chunks_exact(row_bytes).enumerate() {
        if y % 16 == 0 {
            stop.check()?;
        }
        let row_start = y * header.width as usize;
        for (x, px) in row.chunks_exact(bpp).enumerate() {
            let a = if read_alpha { px[3] } else { 255 };
            let color = Color::new(px[0], px[1], px[2], a);
            encoder.push(color, row_start + x == last, &mut writer);
        }
    }

    // end marker bytes are already zero
    let len = writer.position() + END_MARKER_SIZE;
    out.truncate(len);
    log::debug!(
        "qoi encode: {}x{} {} channels -> {len} bytes",
        header.width,
        header.height,
        header.channels.count()
    );
    Ok(out)
}

/// Encoder state carried from pixel to pixel.
struct PixelEncoder {
    index: ColorIndex,
    prev: Color,
    run: u16,
}

impl PixelEncoder {
    fn new() -> Self {
        Self {
            index: ColorIndex::new(),
            prev: Color::START,
            run: 0,
        }
    }

    fn push(&mut self, px: Color, is_last: bool, out: &mut ChunkWriter<'_>) {
        let same = px.pack() == self.prev.pack();
        if same {
            self.run += 1;
        }
        if self.run > 0 && (self.run == RUN_MAX || !same || is_last) {
            Chunk::run(self.run).write(out);
            self.run = 0;
        }

        if !same {
            let chunk = if self.index.probe(px) {
                Chunk::Index {
                    slot: px.hash() as u8,
                }
            } else {
                self.index.store(px);
                delta_chunk(px, self.prev)
            };
            chunk.write(out);
        }
        self.prev = px;
    }
}

/// Smallest literal or delta chunk that turns `prev` into `px`.
fn delta_chunk(px: Color, prev: Color) -> Chunk {
    let [dr, dg, db, da] = px.delta_from(prev);
    if [dr, dg, db, da].iter().all(|&d| fits(d, 5)) {
        let (r, g, b, a) = (dr as i8, dg as i8, db as i8, da as i8);
        if da == 0 && fits(dr, 2) && fits(dg, 2) && fits(db, 2) {
            Chunk::Diff8 {
                dr: r,
                dg: g,
                db: b,
            }
        } else if da == 0 && fits(dg, 4) && fits(db, 4) {
            Chunk::Diff16 {
                dr: r,
                dg: g,
                db: b,
            }
        } else {
            Chunk::Diff24 {
                dr: r,
                dg: g,
                db: b,
                da: a,
            }
        }
    } else {
        Chunk::Color {
            r: (dr != 0).then_some(px.r),
            g: (dg != 0).then_some(px.g),
            b: (db != 0).then_some(px.b),
            a: (da != 0).then_some(px.a),
        }
    }
}

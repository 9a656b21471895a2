//! Pixel stream decoder.

use alloc::vec::Vec;
use enough::Stop;

use crate::chunk::{Chunk, ChunkReader};
use crate::error::QoiError;
use crate::events::{DecodeEvent, EventSink, NoEvents};
use crate::header::Header;
use crate::image::Image;
use crate::index::ColorIndex;
use crate::limits::Limits;
use crate::pixel::Color;

/// Decode configuration.
///
/// Without [`Limits`] the output buffer is sized from the header alone, so an
/// 18-byte stream can request gigabytes. Set [`with_limits`](Self::with_limits)
/// for untrusted input.
#[derive(Clone, Debug)]
pub struct DecodeRequest<'a> {
    data: &'a [u8],
    limits: Option<&'a Limits>,
}

impl<'a> DecodeRequest<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, limits: None }
    }

    pub fn with_limits(mut self, limits: &'a Limits) -> Self {
        self.limits = Some(limits);
        self
    }

    /// Decode to an RGBA8 [`Image`].
    pub fn decode(self, stop: impl Stop) -> Result<Image, QoiError> {
        let header = self.header()?;
        let pixels = decode_pixels(self.data, &header, self.limits, &stop)?;
        Ok(Image::decoded(&header, pixels))
    }

    /// Run the decoder without producing pixels, reporting the header and
    /// every consumed chunk to `sink`.
    ///
    /// Stops at the end marker instead of padding the image out, so a short
    /// stream reports the same chunks [`decode`](Self::decode) consumes.
    pub fn decode_with_events<S: EventSink>(
        self,
        mut sink: S,
        stop: impl Stop,
    ) -> Result<Header, QoiError> {
        let header = self.header()?;
        sink.event(DecodeEvent::Header(header));
        let mut stream = PixelStream::new(self.data, &header);
        'rows: for y in 0..header.height {
            if y % 16 == 0 {
                stop.check()?;
            }
            for _ in 0..header.width {
                if stream.is_exhausted() {
                    break 'rows;
                }
                stream.next_pixel(&mut sink);
            }
        }
        Ok(header)
    }

    fn header(&self) -> Result<Header, QoiError> {
        let header = Header::from_bytes(self.data)?;
        if let Some(limits) = self.limits {
            limits.check(header.width, header.height)?;
        }
        Ok(header)
    }
}

fn decode_pixels(
    data: &[u8],
    header: &Header,
    limits: Option<&Limits>,
    stop: &dyn Stop,
) -> Result<Vec<u8>, QoiError> {
    let out_bytes = header
        .pixel_count()?
        .checked_mul(4)
        .ok_or(QoiError::DimensionsTooLarge {
            width: header.width,
            height: header.height,
        })?;
    if let Some(limits) = limits {
        limits.check_memory(out_bytes)?;
    }
    stop.check()?;

    let mut out = Vec::with_capacity(out_bytes);
    let mut stream = PixelStream::new(data, header);
    for y in 0..header.height {
        if y % 16 == 0 {
            stop.check()?;
        }
        for _ in 0..header.width {
            out.extend_from_slice(&stream.next_pixel(&mut NoEvents).to_array());
        }
    }
    Ok(out)
}

/// Decoder state machine. One instance per decode call.
pub(crate) struct PixelStream<'a> {
    reader: ChunkReader<'a>,
    index: ColorIndex,
    color: Color,
    /// Pixels still owed by the current run, not counting the one that started it.
    run: u16,
    truncated: bool,
}

impl<'a> PixelStream<'a> {
    pub(crate) fn new(data: &'a [u8], header: &Header) -> Self {
        Self {
            reader: ChunkReader::new(data),
            index: ColorIndex::for_decode(header.channels),
            color: Color::START,
            run: 0,
            truncated: false,
        }
    }

    /// No run pending and no chunk left: every further pixel repeats the last color.
    pub(crate) fn is_exhausted(&self) -> bool {
        self.run == 0 && !self.reader.has_chunk()
    }

    /// Produce the next pixel in row-major order.
    ///
    /// Once the end marker is reached the last color repeats for every
    /// remaining pixel; a short chunk stream is not an error.
    pub(crate) fn next_pixel<S: EventSink>(&mut self, events: &mut S) -> Color {
        if self.run > 0 {
            self.run -= 1;
        } else if self.reader.has_chunk() {
            let chunk = Chunk::read(&mut self.reader);
            events.event(DecodeEvent::Chunk(chunk));
            self.apply(chunk);
            self.index.store(self.color);
        } else if !self.truncated {
            self.truncated = true;
            log::trace!("qoi chunk stream ended before the last pixel; repeating last color");
        }
        self.color
    }

    fn apply(&mut self, chunk: Chunk) {
        let c = self.color;
        match chunk {
            Chunk::Index { slot } => self.color = self.index.lookup(slot),
            Chunk::Run8 { len } => self.run = u16::from(len) - 1,
            Chunk::Run16 { len } => self.run = len - 1,
            Chunk::Diff8 { dr, dg, db } | Chunk::Diff16 { dr, dg, db } => {
                self.color = c.wrapping_add(dr, dg, db, 0);
            }
            Chunk::Diff24 { dr, dg, db, da } => self.color = c.wrapping_add(dr, dg, db, da),
            Chunk::Color { r, g, b, a } => {
                self.color = Color::new(
                    r.unwrap_or(c.r),
                    g.unwrap_or(c.g),
                    b.unwrap_or(c.b),
                    a.unwrap_or(c.a),
                );
            }
        }
    }
}

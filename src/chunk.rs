//! Chunk grammar: tags, signed bit fields, and byte-level read/write.
//!
//! | tag        | bytes | payload                                      |
//! |------------|-------|----------------------------------------------|
//! | `00xxxxxx` | 1     | color index slot                             |
//! | `010xxxxx` | 1     | run of 1..=32 pixels (field = len - 1)       |
//! | `011xxxxx` | 2     | run of 33..=8224 pixels (13-bit len - 33)    |
//! | `10rrggbb` | 1     | r,g,b deltas in [-2, 1]                      |
//! | `110rrrrr` | 2     | r in [-16, 15], g,b in [-8, 7]               |
//! | `1110rrrr` | 3     | r,g,b,a deltas in [-16, 15], 5 bits each     |
//! | `1111rgba` | 1..=5 | literal byte for each flagged channel        |

use core::fmt;

use crate::header::{END_MARKER_SIZE, HEADER_SIZE};

pub(crate) const TAG_INDEX: u8 = 0x00;
pub(crate) const TAG_RUN_8: u8 = 0x40;
pub(crate) const TAG_RUN_16: u8 = 0x60;
pub(crate) const TAG_DIFF_8: u8 = 0x80;
pub(crate) const TAG_DIFF_16: u8 = 0xc0;
pub(crate) const TAG_DIFF_24: u8 = 0xe0;
pub(crate) const TAG_COLOR: u8 = 0xf0;

/// Longest run a `RUN_8` chunk covers.
pub(crate) const RUN_8_MAX: u16 = 32;
/// Longest run a `RUN_16` chunk covers.
pub(crate) const RUN_MAX: u16 = 0x2020;

/// One decoded or to-be-encoded chunk.
///
/// Run lengths count every pixel the run covers, including the first.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Chunk {
    Index {
        slot: u8,
    },
    Run8 {
        len: u8,
    },
    Run16 {
        len: u16,
    },
    Diff8 {
        dr: i8,
        dg: i8,
        db: i8,
    },
    Diff16 {
        dr: i8,
        dg: i8,
        db: i8,
    },
    Diff24 {
        dr: i8,
        dg: i8,
        db: i8,
        da: i8,
    },
    /// Literal channels; `None` keeps the previous value.
    Color {
        r: Option<u8>,
        g: Option<u8>,
        b: Option<u8>,
        a: Option<u8>,
    },
}

/// Bias added to a `bits`-wide signed field: fields hold `delta + 2^(bits-1)`.
#[inline]
const fn bias(bits: u32) -> i8 {
    1 << (bits - 1)
}

/// Pack a delta in `[-2^(bits-1), 2^(bits-1))` into an unsigned field.
#[inline]
const fn to_field(delta: i8, bits: u32) -> u8 {
    (delta + bias(bits)) as u8
}

/// Unpack an unsigned `bits`-wide field into its signed delta.
#[inline]
const fn from_field(field: u8, bits: u32) -> i8 {
    field as i8 - bias(bits)
}

/// True when `delta` fits a signed field of `bits` width.
#[inline]
pub(crate) const fn fits(delta: i16, bits: u32) -> bool {
    let half = 1i16 << (bits - 1);
    delta >= -half && delta < half
}

impl Chunk {
    /// Run chunk covering `len` pixels, `1..=RUN_MAX`.
    pub(crate) fn run(len: u16) -> Chunk {
        debug_assert!((1..=RUN_MAX).contains(&len));
        if len <= RUN_8_MAX {
            Chunk::Run8 { len: len as u8 }
        } else {
            Chunk::Run16 { len }
        }
    }

    /// Read one chunk. The caller guarantees the tag byte lies before the end
    /// marker, so every payload byte is inside the buffer.
    pub(crate) fn read(src: &mut ChunkReader<'_>) -> Chunk {
        let b1 = src.next_byte();
        match b1 {
            0x00..=0x3f => Chunk::Index { slot: b1 & 0x3f },
            0x40..=0x5f => Chunk::Run8 {
                len: (b1 & 0x1f) + 1,
            },
            0x60..=0x7f => {
                let b2 = src.next_byte();
                Chunk::Run16 {
                    len: ((u16::from(b1 & 0x1f) << 8) | u16::from(b2)) + RUN_8_MAX + 1,
                }
            }
            0x80..=0xbf => Chunk::Diff8 {
                dr: from_field((b1 >> 4) & 0x03, 2),
                dg: from_field((b1 >> 2) & 0x03, 2),
                db: from_field(b1 & 0x03, 2),
            },
            0xc0..=0xdf => {
                let b2 = src.next_byte();
                Chunk::Diff16 {
                    dr: from_field(b1 & 0x1f, 5),
                    dg: from_field(b2 >> 4, 4),
                    db: from_field(b2 & 0x0f, 4),
                }
            }
            0xe0..=0xef => {
                let b2 = src.next_byte();
                let b3 = src.next_byte();
                Chunk::Diff24 {
                    dr: from_field(((b1 & 0x0f) << 1) | (b2 >> 7), 5),
                    dg: from_field((b2 & 0x7c) >> 2, 5),
                    db: from_field(((b2 & 0x03) << 3) | (b3 >> 5), 5),
                    da: from_field(b3 & 0x1f, 5),
                }
            }
            0xf0..=0xff => {
                let mut literal = |bit: u8| (b1 & bit != 0).then(|| src.next_byte());
                let r = literal(0x08);
                let g = literal(0x04);
                let b = literal(0x02);
                let a = literal(0x01);
                Chunk::Color { r, g, b, a }
            }
        }
    }

    pub(crate) fn write(self, out: &mut ChunkWriter<'_>) {
        match self {
            Chunk::Index { slot } => out.push(TAG_INDEX | (slot & 0x3f)),
            Chunk::Run8 { len } => out.push(TAG_RUN_8 | (len - 1)),
            Chunk::Run16 { len } => {
                let field = len - RUN_8_MAX - 1;
                out.push(TAG_RUN_16 | (field >> 8) as u8);
                out.push(field as u8);
            }
            Chunk::Diff8 { dr, dg, db } => {
                out.push(
                    TAG_DIFF_8 | (to_field(dr, 2) << 4) | (to_field(dg, 2) << 2) | to_field(db, 2),
                );
            }
            Chunk::Diff16 { dr, dg, db } => {
                out.push(TAG_DIFF_16 | to_field(dr, 5));
                out.push((to_field(dg, 4) << 4) | to_field(db, 4));
            }
            Chunk::Diff24 { dr, dg, db, da } => {
                let (r, g, b, a) = (
                    to_field(dr, 5),
                    to_field(dg, 5),
                    to_field(db, 5),
                    to_field(da, 5),
                );
                out.push(TAG_DIFF_24 | (r >> 1));
                out.push((r << 7) | (g << 2) | (b >> 3));
                out.push((b << 5) | a);
            }
            Chunk::Color { r, g, b, a } => {
                let flags = (u8::from(r.is_some()) << 3)
                    | (u8::from(g.is_some()) << 2)
                    | (u8::from(b.is_some()) << 1)
                    | u8::from(a.is_some());
                out.push(TAG_COLOR | flags);
                for value in [r, g, b, a].into_iter().flatten() {
                    out.push(value);
                }
            }
        }
    }
}

impl fmt::Display for Chunk {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Chunk::Index { slot } => write!(f, "INDEX slot={slot}"),
            Chunk::Run8 { len } => write!(f, "RUN_8 len={len}"),
            Chunk::Run16 { len } => write!(f, "RUN_16 len={len}"),
            Chunk::Diff8 { dr, dg, db } => write!(f, "DIFF_8 r={dr} g={dg} b={db}"),
            Chunk::Diff16 { dr, dg, db } => write!(f, "DIFF_16 r={dr} g={dg} b={db}"),
            Chunk::Diff24 { dr, dg, db, da } => {
                write!(f, "DIFF_24 r={dr} g={dg} b={db} a={da}")
            }
            Chunk::Color { r, g, b, a } => {
                f.write_str("COLOR")?;
                for (name, value) in [("r", r), ("g", g), ("b", b), ("a", a)] {
                    if let Some(value) = value {
                        write!(f, " {name}={value}")?;
                    }
                }
                Ok(())
            }
        }
    }
}

/// Cursor over the chunk region of a stream (after the header, before the end marker).
pub(crate) struct ChunkReader<'a> {
    data: &'a [u8],
    pos: usize,
    end: usize,
}

impl<'a> ChunkReader<'a> {
    /// `data` is a whole stream already validated to hold a header and end marker.
    pub(crate) fn new(data: &'a [u8]) -> Self {
        Self {
            data,
            pos: HEADER_SIZE,
            end: data.len().saturating_sub(END_MARKER_SIZE),
        }
    }

    /// Whether another chunk tag starts before the end marker.
    #[inline]
    pub(crate) fn has_chunk(&self) -> bool {
        self.pos < self.end
    }

    /// Next byte; zero past the end of the buffer.
    #[inline]
    fn next_byte(&mut self) -> u8 {
        let byte = self.data.get(self.pos).copied().unwrap_or(0);
        self.pos += 1;
        byte
    }
}

/// Writes chunks into a buffer preallocated for the worst case.
pub(crate) struct ChunkWriter<'a> {
    buf: &'a mut [u8],
    pos: usize,
}

impl<'a> ChunkWriter<'a> {
    pub(crate) fn new(buf: &'a mut [u8], pos: usize) -> Self {
        Self { buf, pos }
    }

    #[inline]
    fn push(&mut self, byte: u8) {
        self.buf[self.pos] = byte;
        self.pos += 1;
    }

    /// Bytes written so far, counted from the start of the buffer.
    pub(crate) fn position(&self) -> usize {
        self.pos
    }
}

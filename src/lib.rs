//! # zenqoi
//!
//! Lossless `qoif` image codec: RGBA8 pixels to a compact chunk stream and back.
//!
//! ## Format
//!
//! A 14-byte big-endian header (`qoif`, width, height, channels, color space),
//! a chunk stream, and four zero bytes. Each pixel is one of: a reference into
//! a 64-slot color cache, a run, a small per-channel delta (1–3 bytes), or a
//! literal of only the channels that changed. See [`Chunk`] for the bit layout.
//!
//! ## Decoding is lenient about short streams
//!
//! If the chunk stream reaches the end marker before every declared pixel has
//! been produced, the decoder repeats the last color for the rest of the image
//! instead of failing. The format has no checksum; corrupt chunks that still
//! parse decode silently to different pixels.
//!
//! ## Non-Goals
//!
//! - Streaming or incremental encode of partial images
//! - Multi-threaded tiling
//! - Color-space conversion (the color-space byte is carried, not interpreted)
//!
//! ## Usage
//!
//! ```no_run
//! use zenqoi::{DecodeEvent, DecodeRequest, EncodeRequest, PixelLayout};
//! use enough::Unstoppable;
//!
//! let rgba: Vec<u8> = vec![255, 0, 0, 255, 0, 255, 0, 255];
//! let encoded = EncodeRequest::rgba()
//!     .encode(&rgba, 2, 1, PixelLayout::Rgba8, Unstoppable)?;
//!
//! let image = DecodeRequest::new(&encoded).decode(Unstoppable)?;
//! assert_eq!(image.pixels(), &rgba[..]);
//!
//! // Dump the chunk stream, one line per chunk
//! zenqoi::decode_with_events(&encoded, |event: DecodeEvent| println!("{event}"), Unstoppable)?;
//! # Ok::<(), zenqoi::QoiError>(())
//! ```

#![cfg_attr(not(feature = "std"), no_std)]
#![forbid(unsafe_code)]

extern crate alloc;

mod chunk;
mod decode;
mod encode;
mod error;
mod events;
mod header;
mod image;
mod index;
mod limits;
mod pixel;

use alloc::vec::Vec;

// Re-exports
pub use chunk::Chunk;
pub use decode::DecodeRequest;
pub use encode::EncodeRequest;
pub use enough::{Stop, Unstoppable};
pub use error::QoiError;
pub use events::{DecodeEvent, EventSink, NoEvents};
pub use header::Header;
pub use image::Image;
pub use limits::Limits;
pub use pixel::{Channels, Color, PixelLayout};

/// Decode a complete `qoif` stream to RGBA8.
pub fn decode(data: &[u8], stop: impl Stop) -> Result<Image, QoiError> {
    DecodeRequest::new(data).decode(stop)
}

/// Decode `data`, reporting the header and each chunk to `sink` instead of
/// producing pixels. Returns the header.
pub fn decode_with_events<S: EventSink>(
    data: &[u8],
    sink: S,
    stop: impl Stop,
) -> Result<Header, QoiError> {
    DecodeRequest::new(data).decode_with_events(sink, stop)
}

/// Encode an image using its own channel count and color space.
pub fn encode(image: &Image, stop: impl Stop) -> Result<Vec<u8>, QoiError> {
    image.encode(stop)
}

/// Validate and return the header without decoding pixels.
pub fn probe(data: &[u8]) -> Result<Header, QoiError> {
    Header::from_bytes(data)
}

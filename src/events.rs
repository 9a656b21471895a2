//! Per-chunk decoder events for diagnostic dumpers.

use core::fmt;

use crate::chunk::Chunk;
use crate::header::Header;

/// Something the decoder consumed: the header once, then one event per chunk.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DecodeEvent {
    Header(Header),
    Chunk(Chunk),
}

impl fmt::Display for DecodeEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DecodeEvent::Header(h) => write!(
                f,
                "HEADER width={} height={} channels={} color_space={}",
                h.width,
                h.height,
                h.channels.count(),
                h.color_space
            ),
            DecodeEvent::Chunk(chunk) => fmt::Display::fmt(chunk, f),
        }
    }
}

/// Receives [`DecodeEvent`]s. Implemented for every `FnMut(DecodeEvent)`.
pub trait EventSink {
    fn event(&mut self, event: DecodeEvent);
}

impl<F: FnMut(DecodeEvent)> EventSink for F {
    #[inline]
    fn event(&mut self, event: DecodeEvent) {
        self(event)
    }
}

/// Sink that drops everything; plain decoding uses it.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoEvents;

impl EventSink for NoEvents {
    #[inline(always)]
    fn event(&mut self, _event: DecodeEvent) {}
}

//! 64-slot direct-mapped color cache.
//!
//! A slot is addressed by [`Color::hash`]; every store overwrites whatever the
//! slot held. Each encode or decode call owns a fresh index.

use crate::pixel::{Channels, Color};

pub(crate) const INDEX_SLOTS: usize = 64;

#[derive(Clone, Debug)]
pub(crate) struct ColorIndex {
    slots: [Color; INDEX_SLOTS],
}

impl ColorIndex {
    /// All slots zeroed (encoder start state).
    pub(crate) fn new() -> Self {
        Self {
            slots: [Color::default(); INDEX_SLOTS],
        }
    }

    /// Decoder start state: zeroed, with alpha preset to 255 for 3-channel streams.
    pub(crate) fn for_decode(channels: Channels) -> Self {
        let alpha = match channels {
            Channels::Rgb => 255,
            Channels::Rgba => 0,
        };
        Self {
            slots: [Color::new(0, 0, 0, alpha); INDEX_SLOTS],
        }
    }

    #[inline]
    pub(crate) fn lookup(&self, slot: u8) -> Color {
        self.slots[usize::from(slot) % INDEX_SLOTS]
    }

    #[inline]
    pub(crate) fn store(&mut self, color: Color) {
        self.slots[color.hash()] = color;
    }

    /// True iff the slot for `color` holds exactly `color`.
    #[inline]
    pub(crate) fn probe(&self, color: Color) -> bool {
        self.slots[color.hash()] == color
    }
}

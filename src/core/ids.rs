//! Identifier types for cards, pairs, and artwork.
//!
//! ## Card Layout
//!
//! Cards live in a flat slot list owned by the arbiter. A `CardIndex` is the
//! slot position, stable for the lifetime of one board:
//!
//! ```
//! use concentration::core::{CardIndex, PairKey};
//!
//! let slot = CardIndex::new(3);
//! assert_eq!(slot.index(), 3);
//!
//! // Two slots share each pair key.
//! assert_eq!(PairKey::new(1), PairKey::new(1));
//! ```

use serde::{Deserialize, Serialize};

/// Position of a card in the board's slot list.
///
/// Indices are only meaningful for the board they were issued on.
/// Reconfiguring the board invalidates all previously held indices.
/// A board holds at most `u16::MAX * u16::MAX` cards, which fits in `u32`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CardIndex(pub u32);

impl CardIndex {
    /// Create a card index.
    #[must_use]
    pub const fn new(index: u32) -> Self {
        Self(index)
    }

    /// Get the slot position as a `usize` for indexing.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl std::fmt::Display for CardIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Card({})", self.0)
    }
}

/// Matching identifier shared by exactly two cards of a board.
///
/// Keys are dealt as `0..pair_count`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PairKey(pub u32);

impl PairKey {
    /// Create a pair key.
    #[must_use]
    pub const fn new(key: u32) -> Self {
        Self(key)
    }

    /// Get the raw key value.
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl std::fmt::Display for PairKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Pair({})", self.0)
    }
}

/// Opaque handle to a sprite owned by the renderer.
///
/// The engine never interprets sprite handles, it only hands them to cards.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SpriteId(pub u32);

impl SpriteId {
    /// Create a sprite handle.
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }
}

//! Serializable view of a board, for logs and assertions.

use serde::{Deserialize, Serialize};

use crate::cards::Card;
use crate::core::{CardIndex, PairKey};

/// One card as seen from outside.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardSnapshot {
    pub pair_key: PairKey,
    pub face_up: bool,
    pub matched: bool,
    pub animating: bool,
}

impl From<&Card> for CardSnapshot {
    fn from(card: &Card) -> Self {
        Self {
            pair_key: card.pair_key(),
            face_up: card.is_face_up(),
            matched: card.is_matched(),
            animating: card.is_animating(),
        }
    }
}

/// Full observable state of a [`MatchArbiter`](super::MatchArbiter).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardSnapshot {
    pub epoch: u64,
    pub columns: u16,
    pub rows: u16,
    pub cards: Vec<CardSnapshot>,
    /// Face-up cards waiting for a partner, in completion order.
    pub pending: Vec<CardIndex>,
    /// Cards under comparison lock, sorted.
    pub locked: Vec<CardIndex>,
    pub score: u32,
    pub comparing: bool,
    pub previewing: bool,
    pub game_over: bool,
}

impl BoardSnapshot {
    /// Number of matched cards.
    #[must_use]
    pub fn matched_count(&self) -> usize {
        self.cards.iter().filter(|c| c.matched).count()
    }

    /// Render as a single JSON line.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

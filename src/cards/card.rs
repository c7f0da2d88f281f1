//! A single card: identity, face state, and its flip transition.
//!
//! ## State Machine
//!
//! ```text
//!  FaceDown ──flip_to_face──▶ Flipping(to face) ──complete──▶ FaceUp
//!     ▲                                                          │
//!     └──complete── Flipping(to back) ◀──flip_to_back────────────┤
//!                                                                │
//!                                          force_matched ──▶ Matched (terminal)
//! ```
//!
//! A card never looks at other cards or at the score. It only reports, via
//! [`Card::advance`], when a flip has finished.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::warn;

use super::flip::{FlipTransition, BACK_ANGLE, FACE_ANGLE};
use crate::core::{CardArt, PairKey};

/// Where a card is in its lifecycle.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum CardState {
    FaceDown,
    FaceUp,
    /// Mid-flip. The transition knows which way it is going.
    Flipping(FlipTransition),
    /// Face-up for good. No transition ever leaves this state.
    Matched,
}

/// Notification raised exactly once when a flip finishes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlipCompleted {
    /// Face state the card ended in.
    pub face_up: bool,
}

/// A card on the board.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Card {
    pair_key: PairKey,
    art: CardArt,
    flip_duration: Duration,
    state: CardState,
}

impl Card {
    /// Create a face-down card.
    #[must_use]
    pub fn new(pair_key: PairKey, art: CardArt, flip_duration: Duration) -> Self {
        Self {
            pair_key,
            art,
            flip_duration,
            state: CardState::FaceDown,
        }
    }

    /// Re-deal this card: new identity, face-down, no transition.
    pub fn initialize(&mut self, pair_key: PairKey, art: CardArt) {
        self.pair_key = pair_key;
        self.art = art;
        self.state = CardState::FaceDown;
    }

    #[must_use]
    pub fn pair_key(&self) -> PairKey {
        self.pair_key
    }

    #[must_use]
    pub fn art(&self) -> CardArt {
        self.art
    }

    #[must_use]
    pub fn state(&self) -> CardState {
        self.state
    }

    /// Logical face state. A flipping card keeps its old face until the flip
    /// completes.
    #[must_use]
    pub fn is_face_up(&self) -> bool {
        match self.state {
            CardState::FaceUp | CardState::Matched => true,
            CardState::FaceDown => false,
            CardState::Flipping(flip) => !flip.to_face(),
        }
    }

    #[must_use]
    pub fn is_matched(&self) -> bool {
        matches!(self.state, CardState::Matched)
    }

    #[must_use]
    pub fn is_animating(&self) -> bool {
        matches!(self.state, CardState::Flipping(_))
    }

    /// Start flipping face-up. Returns false (and does nothing) unless the
    /// card is resting face-down.
    pub fn flip_to_face(&mut self) -> bool {
        if self.state != CardState::FaceDown {
            return false;
        }
        self.state = CardState::Flipping(FlipTransition::new(true, self.flip_duration));
        true
    }

    /// Start flipping face-down. Returns false (and does nothing) unless the
    /// card is resting face-up and unmatched.
    pub fn flip_to_back(&mut self) -> bool {
        if self.state != CardState::FaceUp {
            return false;
        }
        self.state = CardState::Flipping(FlipTransition::new(false, self.flip_duration));
        true
    }

    /// Force a resting face without animation, cancelling any flip.
    ///
    /// A cancelled flip never reports completion. Matched cards are left alone.
    pub fn set_face_instant(&mut self, face_up: bool) {
        if self.is_matched() {
            return;
        }
        self.state = if face_up {
            CardState::FaceUp
        } else {
            CardState::FaceDown
        };
    }

    /// Mark this card as matched. Requires it to be resting face-up.
    ///
    /// Returns whether the card is matched afterwards.
    pub fn force_matched(&mut self) -> bool {
        match self.state {
            CardState::FaceUp | CardState::Matched => {
                self.state = CardState::Matched;
                true
            }
            other => {
                warn!(pair = %self.pair_key, state = ?other, "refusing to match a card that is not face-up");
                false
            }
        }
    }

    /// Time until the running flip completes, if one is running.
    #[must_use]
    pub fn remaining(&self) -> Option<Duration> {
        match self.state {
            CardState::Flipping(flip) => Some(flip.remaining()),
            _ => None,
        }
    }

    /// Advance the running flip by `dt`.
    ///
    /// Returns the completion notification on the call that finishes the
    /// flip, and `None` on every other call.
    pub fn advance(&mut self, dt: Duration) -> Option<FlipCompleted> {
        let CardState::Flipping(mut flip) = self.state else {
            return None;
        };

        if flip.advance(dt) {
            let face_up = flip.to_face();
            self.state = if face_up {
                CardState::FaceUp
            } else {
                CardState::FaceDown
            };
            Some(FlipCompleted { face_up })
        } else {
            self.state = CardState::Flipping(flip);
            None
        }
    }

    /// Rotation about the vertical axis, in degrees.
    #[must_use]
    pub fn rotation_degrees(&self) -> f32 {
        match self.state {
            CardState::FaceDown => BACK_ANGLE,
            CardState::FaceUp | CardState::Matched => FACE_ANGLE,
            CardState::Flipping(flip) => flip.angle(),
        }
    }

    /// Whether the face sprite is the visible side right now.
    #[must_use]
    pub fn showing_face(&self) -> bool {
        match self.state {
            CardState::FaceDown => false,
            CardState::FaceUp | CardState::Matched => true,
            CardState::Flipping(flip) => flip.showing_face(),
        }
    }
}

//! Arbiter phases and the timers that suspend them.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::core::CardIndex;

/// Countdown on the arbiter's timeline.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Timer {
    remaining: Duration,
}

impl Timer {
    #[must_use]
    pub fn new(duration: Duration) -> Self {
        Self {
            remaining: duration,
        }
    }

    /// Count down by `dt`. Returns true once expired.
    pub fn advance(&mut self, dt: Duration) -> bool {
        self.remaining = self.remaining.saturating_sub(dt);
        self.is_expired()
    }

    #[must_use]
    pub fn remaining(&self) -> Duration {
        self.remaining
    }

    #[must_use]
    pub fn is_expired(&self) -> bool {
        self.remaining.is_zero()
    }
}

/// Where the preview phase is.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum PreviewStep {
    /// All cards shown, waiting out the hold.
    Holding(Timer),
    /// Cards flipping back; counts flips still running.
    Hiding { outstanding: usize },
}

/// Where a mismatched pair is in its resolution.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum CompareStep {
    /// Both cards shown, waiting out the reveal delay.
    Revealing(Timer),
    /// Both cards flipping back; holds the ones still running.
    Hiding { waiting: SmallVec<[CardIndex; 2]> },
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct Comparison {
    pub pair: [CardIndex; 2],
    pub step: CompareStep,
}

/// Top-level arbiter state. `Comparing` and `Preview` are the global locks.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum Phase {
    Idle,
    Preview(PreviewStep),
    Comparing(Comparison),
    GameOver,
}

impl Phase {
    /// Time until this phase's timer fires, if it is waiting on one.
    pub fn deadline(&self) -> Option<Duration> {
        match self {
            Phase::Preview(PreviewStep::Holding(timer)) => Some(timer.remaining()),
            Phase::Comparing(Comparison {
                step: CompareStep::Revealing(timer),
                ..
            }) => Some(timer.remaining()),
            _ => None,
        }
    }

    /// Count the phase's timer down by `dt`.
    pub fn advance_timer(&mut self, dt: Duration) {
        match self {
            Phase::Preview(PreviewStep::Holding(timer))
            | Phase::Comparing(Comparison {
                step: CompareStep::Revealing(timer),
                ..
            }) => {
                timer.advance(dt);
            }
            _ => {}
        }
    }
}

/// Why a flip request was ignored.
///
/// Rejections are normal flow control, not errors: the request simply has no
/// effect on the board.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FlipRejection {
    /// The show-all preview is running.
    Previewing,
    /// A pair is being compared.
    Comparing,
    /// Every pair is already matched.
    GameOver,
    /// No card at that index on the current board.
    UnknownCard,
    Matched,
    FaceUp,
    /// The card is mid-flip.
    Animating,
    /// The card is part of the pair under comparison.
    Locked,
    /// Two cards are already picked this turn.
    TurnFull,
}

impl std::fmt::Display for FlipRejection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let reason = match self {
            FlipRejection::Previewing => "preview in progress",
            FlipRejection::Comparing => "comparison in progress",
            FlipRejection::GameOver => "game is over",
            FlipRejection::UnknownCard => "no such card",
            FlipRejection::Matched => "card already matched",
            FlipRejection::FaceUp => "card already face-up",
            FlipRejection::Animating => "card is flipping",
            FlipRejection::Locked => "card is locked for comparison",
            FlipRejection::TurnFull => "two cards already picked",
        };
        f.write_str(reason)
    }
}

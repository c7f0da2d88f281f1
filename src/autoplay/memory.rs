//! A player with perfect memory of every card it has seen face-up.

use std::time::Duration;

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use tracing::trace;

use crate::arbiter::MatchArbiter;
use crate::core::{CardIndex, GameRng, PairKey};

/// Remembers revealed cards and uses them to pick pairs.
///
/// The player only learns a card's key once its face has been visible, so it
/// waits for each pick to turn over before choosing the next one.
#[derive(Clone, Debug)]
pub struct MemoryPlayer {
    seen: FxHashMap<CardIndex, PairKey>,
    epoch: u64,
    rng: GameRng,
}

impl MemoryPlayer {
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            seen: FxHashMap::default(),
            epoch: 0,
            rng: GameRng::new(seed),
        }
    }

    /// Number of unmatched cards currently remembered.
    #[must_use]
    pub fn remembered(&self) -> usize {
        self.seen.len()
    }

    /// Look at the board and remember any visible faces.
    pub fn observe(&mut self, arbiter: &MatchArbiter) {
        if arbiter.epoch() != self.epoch {
            self.seen.clear();
            self.epoch = arbiter.epoch();
        }
        for (i, card) in arbiter.cards().iter().enumerate() {
            let index = CardIndex::new(i as u32);
            if card.is_matched() {
                self.seen.remove(&index);
            } else if card.showing_face() {
                self.seen.insert(index, card.pair_key());
            }
        }
    }

    /// Pick the next card to flip, or `None` if there is nothing to do yet.
    pub fn choose(&mut self, arbiter: &MatchArbiter) -> Option<CardIndex> {
        if !arbiter.accepting_flips() || arbiter.epoch() != self.epoch {
            return None;
        }

        let turn = arbiter.current_turn();
        if turn
            .iter()
            .any(|&c| arbiter.card(c).is_some_and(|card| card.is_animating()))
        {
            return None;
        }

        let eligible: Vec<CardIndex> = arbiter
            .cards()
            .iter()
            .enumerate()
            .filter(|(_, card)| !card.is_matched() && !card.is_face_up() && !card.is_animating())
            .map(|(i, _)| CardIndex::new(i as u32))
            .filter(|&c| !arbiter.is_locked(c))
            .collect();

        let pick = match turn.first() {
            Some(first) => {
                let partner = self
                    .seen
                    .get(first)
                    .and_then(|&key| self.known_with_key(key, &eligible, *first));
                partner.or_else(|| self.explore(&eligible))
            }
            None => self.known_pair(&eligible).or_else(|| self.explore(&eligible)),
        };
        trace!(?pick, remembered = self.seen.len(), "player choice");
        pick
    }

    fn known_with_key(&self, key: PairKey, eligible: &[CardIndex], exclude: CardIndex) -> Option<CardIndex> {
        eligible
            .iter()
            .copied()
            .find(|&c| c != exclude && self.seen.get(&c) == Some(&key))
    }

    /// First card of a pair whose both halves have been seen.
    fn known_pair(&self, eligible: &[CardIndex]) -> Option<CardIndex> {
        eligible.iter().copied().find(|&c| {
            self.seen
                .get(&c)
                .is_some_and(|&key| self.known_with_key(key, eligible, c).is_some())
        })
    }

    /// A card never seen, or any eligible card if all have been seen.
    fn explore(&mut self, eligible: &[CardIndex]) -> Option<CardIndex> {
        let unseen: SmallVec<[CardIndex; 16]> = eligible
            .iter()
            .copied()
            .filter(|c| !self.seen.contains_key(c))
            .collect();
        if unseen.is_empty() {
            self.rng.choose(eligible).copied()
        } else {
            self.rng.choose(&unseen).copied()
        }
    }
}

/// Outcome of [`play_to_completion`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayReport {
    pub finished: bool,
    pub score: u32,
    pub flips: u32,
    pub steps: u32,
    pub elapsed_ms: u64,
}

/// Let `player` play `arbiter` until game over or `max_steps` ticks of `step`.
pub fn play_to_completion(
    arbiter: &mut MatchArbiter,
    player: &mut MemoryPlayer,
    step: Duration,
    max_steps: u32,
) -> PlayReport {
    let mut flips = 0;
    let mut steps = 0;
    let mut elapsed = Duration::ZERO;

    while !arbiter.is_game_over() && steps < max_steps {
        player.observe(arbiter);
        if let Some(card) = player.choose(arbiter) {
            if arbiter.request_flip(card).is_ok() {
                flips += 1;
                // A second pick may be possible in the same instant.
                continue;
            }
        }
        arbiter.advance(step);
        elapsed += step;
        steps += 1;
    }
    player.observe(arbiter);

    PlayReport {
        finished: arbiter.is_game_over(),
        score: arbiter.score(),
        flips,
        steps,
        elapsed_ms: elapsed.as_millis() as u64,
    }
}

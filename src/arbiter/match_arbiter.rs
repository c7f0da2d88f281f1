//! The flip/compare arbiter.

use std::collections::VecDeque;
use std::time::Duration;

use rustc_hash::FxHashSet;
use smallvec::SmallVec;
use tracing::{debug, info, instrument, trace};

use super::phase::{CompareStep, Comparison, FlipRejection, Phase, PreviewStep, Timer};
use super::snapshot::{BoardSnapshot, CardSnapshot};
use crate::board::BoardDimensions;
use crate::cards::{deal_pair_keys, Card};
use crate::context::{Cue, GameContext};
use crate::core::{CardArt, CardIndex, GameRng, GameRngState, MatchConfig};

/// A flip completion waiting to be processed, tagged with the board it
/// belongs to.
#[derive(Clone, Copy, Debug)]
struct Completion {
    epoch: u64,
    card: CardIndex,
    face_up: bool,
}

/// Owns the board and runs the flip/compare protocol.
///
/// ## Protocol
///
/// 1. [`request_flip`](Self::request_flip) checks the guards and starts a
///    flip-to-face.
/// 2. [`advance`](Self::advance) moves the timeline. Each finished flip is
///    queued in `pending` in completion order.
/// 3. When two cards are pending they are drained, locked, and compared in
///    the same step, so no request can slip in between.
/// 4. A match resolves immediately. A mismatch waits out the reveal delay,
///    flips both cards back, then applies the penalty.
/// 5. When every card is matched, game over is signalled once.
///
/// All timing is virtual: nothing happens between calls to `advance`.
#[derive(Debug)]
pub struct MatchArbiter {
    config: MatchConfig,
    context: GameContext,
    rng: GameRng,
    /// RNG state the current board was dealt from.
    deal_state: GameRngState,
    dimensions: BoardDimensions,
    cards: Vec<Card>,
    /// Incremented on every reconfiguration; stale completions are dropped.
    epoch: u64,
    /// Cards flipping face-up for the current turn, in request order.
    picks: SmallVec<[CardIndex; 2]>,
    /// Face-up cards awaiting comparison, in completion order.
    pending: SmallVec<[CardIndex; 2]>,
    locked: FxHashSet<CardIndex>,
    phase: Phase,
    inbox: VecDeque<Completion>,
    score: u32,
}

impl MatchArbiter {
    /// Create an arbiter and deal a board of the configured size.
    pub fn new(config: MatchConfig, context: GameContext) -> Self {
        let rng = GameRng::new(config.seed);
        let deal_state = rng.state();
        let mut arbiter = Self {
            config,
            context,
            rng,
            deal_state,
            dimensions: BoardDimensions::new(1, 1),
            cards: Vec::new(),
            epoch: 0,
            picks: SmallVec::new(),
            pending: SmallVec::new(),
            locked: FxHashSet::default(),
            phase: Phase::Idle,
            inbox: VecDeque::new(),
            score: 0,
        };
        arbiter.new_game();
        arbiter
    }

    /// Deal a fresh board with the configured size.
    pub fn new_game(&mut self) {
        let (columns, rows) = (self.config.columns, self.config.rows);
        self.configure_board(i32::from(columns), i32::from(rows));
    }

    /// Deal a fresh board.
    ///
    /// Clamps both sides to at least 1 and drops the last slot of an odd
    /// board. Resets every queue, lock, and the score, and invalidates any
    /// flip still running on the previous board.
    #[instrument(skip(self), fields(epoch = self.epoch + 1))]
    pub fn configure_board(&mut self, columns: i32, rows: i32) {
        let dims = BoardDimensions::new(columns, rows);
        self.context.configure_layout(dims.columns(), dims.rows());

        self.epoch += 1;
        self.dimensions = dims;
        self.picks.clear();
        self.pending.clear();
        self.locked.clear();
        self.inbox.clear();
        self.phase = Phase::Idle;

        self.deal_state = self.rng.state();
        let keys = deal_pair_keys(dims.pair_count(), &mut self.rng);
        let flip_duration = self.config.flip_duration();
        let artwork = &self.config.artwork;
        self.cards = keys
            .into_iter()
            .map(|key| {
                let art = CardArt {
                    face: artwork.face_for(key),
                    back: artwork.back,
                };
                Card::new(key, art, flip_duration)
            })
            .collect();

        self.score = 0;
        self.context.report_score(self.score);
        self.context.refresh_layout();

        info!(
            columns = dims.columns(),
            rows = dims.rows(),
            pairs = dims.pair_count(),
            "board dealt"
        );

        if let Some(hold) = self.config.preview() {
            self.start_preview(hold);
        }
    }

    /// Deal the current board again with the same pair-key placement.
    ///
    /// Everything else resets as in [`configure_board`](Self::configure_board).
    pub fn replay_board(&mut self) {
        self.rng = GameRng::from_state(&self.deal_state);
        let dims = self.dimensions;
        self.configure_board(i32::from(dims.columns()), i32::from(dims.rows()));
    }

    /// RNG state the current board was dealt from.
    #[must_use]
    pub fn deal_state(&self) -> &GameRngState {
        &self.deal_state
    }

    fn start_preview(&mut self, hold: Duration) {
        if self.cards.is_empty() {
            return;
        }
        for card in &mut self.cards {
            card.set_face_instant(true);
        }
        self.phase = Phase::Preview(PreviewStep::Holding(Timer::new(hold)));
        debug!(?hold, "preview started");
    }

    /// Ask to flip a card face-up.
    ///
    /// Rejected requests leave the board untouched.
    pub fn request_flip(&mut self, index: CardIndex) -> Result<(), FlipRejection> {
        let result = self.check_flip(index);
        match result {
            Ok(()) => {
                self.cards[index.index()].flip_to_face();
                self.picks.push(index);
                self.context.cue(Cue::Flip);
                debug!(card = %index, "flip accepted");
            }
            Err(reason) => {
                debug!(card = %index, %reason, "flip rejected");
            }
        }
        result
    }

    fn check_flip(&self, index: CardIndex) -> Result<(), FlipRejection> {
        match self.phase {
            Phase::Preview(_) => return Err(FlipRejection::Previewing),
            Phase::Comparing(_) => return Err(FlipRejection::Comparing),
            Phase::GameOver => return Err(FlipRejection::GameOver),
            Phase::Idle => {}
        }

        let card = self.cards.get(index.index()).ok_or(FlipRejection::UnknownCard)?;
        if card.is_matched() {
            return Err(FlipRejection::Matched);
        }
        if card.is_animating() {
            return Err(FlipRejection::Animating);
        }
        if card.is_face_up() {
            return Err(FlipRejection::FaceUp);
        }
        if self.locked.contains(&index) {
            return Err(FlipRejection::Locked);
        }
        if self.picks.len() + self.pending.len() >= 2 {
            return Err(FlipRejection::TurnFull);
        }
        Ok(())
    }

    /// Move the timeline forward by `dt`.
    ///
    /// Steps from deadline to deadline, so the outcome does not depend on how
    /// a span of time is split across calls.
    pub fn advance(&mut self, dt: Duration) {
        let mut remaining = dt;
        loop {
            self.process_inbox();
            self.fire_timers();

            let step = match self.next_deadline() {
                Some(step) if step <= remaining => step,
                _ => break,
            };
            self.tick(step);
            remaining -= step;
        }
        self.tick(remaining);
    }

    /// Time until the next flip completion or timer, if anything is running.
    #[must_use]
    pub fn next_deadline(&self) -> Option<Duration> {
        let flips = self.cards.iter().filter_map(Card::remaining);
        flips.chain(self.phase.deadline()).min()
    }

    fn tick(&mut self, dt: Duration) {
        // Picks first, in request order, so simultaneous completions queue
        // in the order the player chose them.
        let picks = self.picks.clone();
        for &index in &picks {
            self.tick_card(index, dt);
        }
        for i in 0..self.cards.len() {
            let index = CardIndex::new(i as u32);
            if !picks.contains(&index) {
                self.tick_card(index, dt);
            }
        }
        self.phase.advance_timer(dt);
    }

    fn tick_card(&mut self, index: CardIndex, dt: Duration) {
        if let Some(done) = self.cards[index.index()].advance(dt) {
            self.inbox.push_back(Completion {
                epoch: self.epoch,
                card: index,
                face_up: done.face_up,
            });
        }
    }

    fn process_inbox(&mut self) {
        while let Some(done) = self.inbox.pop_front() {
            if done.epoch != self.epoch {
                trace!(card = %done.card, epoch = done.epoch, "dropping stale completion");
                continue;
            }
            if done.face_up {
                self.on_face_up(done.card);
            } else {
                self.on_face_down(done.card);
            }
        }
    }

    fn on_face_up(&mut self, index: CardIndex) {
        let Some(pos) = self.picks.iter().position(|&c| c == index) else {
            return;
        };
        self.picks.remove(pos);
        self.pending.push(index);
        trace!(card = %index, pending = self.pending.len(), "card queued");

        if self.pending.len() == 2 {
            self.begin_comparison();
        }
    }

    fn on_face_down(&mut self, index: CardIndex) {
        match &mut self.phase {
            Phase::Comparing(Comparison {
                step: CompareStep::Hiding { waiting },
                ..
            }) => {
                waiting.retain(|c| *c != index);
                if waiting.is_empty() {
                    self.finish_mismatch();
                }
            }
            Phase::Preview(PreviewStep::Hiding { outstanding }) => {
                *outstanding = outstanding.saturating_sub(1);
                if *outstanding == 0 {
                    self.phase = Phase::Idle;
                    debug!("preview finished");
                }
            }
            _ => {}
        }
    }

    /// Drain the pending pair and take the comparison lock in one step.
    fn begin_comparison(&mut self) {
        let a = self.pending.remove(0);
        let b = self.pending.remove(0);
        self.locked.insert(a);
        self.locked.insert(b);

        let key_a = self.cards[a.index()].pair_key();
        let key_b = self.cards[b.index()].pair_key();

        if key_a == key_b {
            self.cards[a.index()].force_matched();
            self.cards[b.index()].force_matched();
            self.score = self.score.saturating_add(self.config.match_reward);
            self.context.report_score(self.score);
            self.context.cue(Cue::Match);
            info!(first = %a, second = %b, pair = %key_a, score = self.score, "match");
            self.unlock([a, b]);
        } else {
            self.context.cue(Cue::Mismatch);
            info!(first = %a, second = %b, "mismatch");
            self.phase = Phase::Comparing(Comparison {
                pair: [a, b],
                step: CompareStep::Revealing(Timer::new(self.config.reveal_delay())),
            });
        }
    }

    fn fire_timers(&mut self) {
        match &self.phase {
            Phase::Preview(PreviewStep::Holding(timer)) if timer.is_expired() => {
                let outstanding = self
                    .cards
                    .iter_mut()
                    .map(Card::flip_to_back)
                    .filter(|&started| started)
                    .count();
                if outstanding == 0 {
                    self.phase = Phase::Idle;
                } else {
                    self.phase = Phase::Preview(PreviewStep::Hiding { outstanding });
                }
            }
            Phase::Comparing(Comparison {
                pair,
                step: CompareStep::Revealing(timer),
            }) if timer.is_expired() => {
                let pair = *pair;
                let waiting: SmallVec<[CardIndex; 2]> = pair
                    .into_iter()
                    .filter(|&c| self.cards[c.index()].flip_to_back())
                    .collect();

                if waiting.is_empty() {
                    self.finish_mismatch();
                } else {
                    self.phase = Phase::Comparing(Comparison {
                        pair,
                        step: CompareStep::Hiding { waiting },
                    });
                }
            }
            _ => {}
        }
    }

    fn finish_mismatch(&mut self) {
        let Phase::Comparing(Comparison { pair, .. }) = &self.phase else {
            return;
        };
        let pair = *pair;
        self.score = self.score.saturating_sub(self.config.mismatch_penalty);
        self.context.report_score(self.score);
        debug!(score = self.score, "mismatch penalty applied");
        self.unlock(pair);
    }

    /// Release the comparison lock and check for the end of the game.
    fn unlock(&mut self, pair: [CardIndex; 2]) {
        for card in pair {
            self.locked.remove(&card);
        }
        self.phase = Phase::Idle;

        if !self.cards.is_empty() && self.cards.iter().all(Card::is_matched) {
            self.phase = Phase::GameOver;
            self.context.cue(Cue::GameOver);
            self.context.hand_off(self.score);
            info!(score = self.score, "game over");
        }
    }

    // === Queries ===

    #[must_use]
    pub fn config(&self) -> &MatchConfig {
        &self.config
    }

    #[must_use]
    pub fn dimensions(&self) -> BoardDimensions {
        self.dimensions
    }

    #[must_use]
    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    #[must_use]
    pub fn card(&self, index: CardIndex) -> Option<&Card> {
        self.cards.get(index.index())
    }

    #[must_use]
    pub fn score(&self) -> u32 {
        self.score
    }

    #[must_use]
    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    #[must_use]
    pub fn is_comparing(&self) -> bool {
        matches!(self.phase, Phase::Comparing(_))
    }

    #[must_use]
    pub fn is_previewing(&self) -> bool {
        matches!(self.phase, Phase::Preview(_))
    }

    #[must_use]
    pub fn is_game_over(&self) -> bool {
        matches!(self.phase, Phase::GameOver)
    }

    #[must_use]
    pub fn is_locked(&self, index: CardIndex) -> bool {
        self.locked.contains(&index)
    }

    /// Face-up cards waiting for a partner.
    #[must_use]
    pub fn pending(&self) -> &[CardIndex] {
        &self.pending
    }

    /// Cards picked this turn: pending ones first, then ones still flipping.
    #[must_use]
    pub fn current_turn(&self) -> SmallVec<[CardIndex; 2]> {
        self.pending.iter().chain(self.picks.iter()).copied().collect()
    }

    /// Whether a request for an eligible card would be accepted right now.
    #[must_use]
    pub fn accepting_flips(&self) -> bool {
        matches!(self.phase, Phase::Idle) && self.picks.len() + self.pending.len() < 2
    }

    /// Capture the observable state.
    #[must_use]
    pub fn snapshot(&self) -> BoardSnapshot {
        let mut locked: Vec<CardIndex> = self.locked.iter().copied().collect();
        locked.sort();
        BoardSnapshot {
            epoch: self.epoch,
            columns: self.dimensions.columns(),
            rows: self.dimensions.rows(),
            cards: self.cards.iter().map(CardSnapshot::from).collect(),
            pending: self.pending.to_vec(),
            locked,
            score: self.score,
            comparing: self.is_comparing(),
            previewing: self.is_previewing(),
            game_over: self.is_game_over(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FLIP: Duration = Duration::from_millis(400);
    const REVEAL: Duration = Duration::from_millis(800);

    fn config() -> MatchConfig {
        MatchConfig::default()
            .with_board(2, 2)
            .with_flip_duration(FLIP)
            .with_reveal_delay(REVEAL)
            .with_scoring(100, 10)
    }

    fn arbiter() -> MatchArbiter {
        MatchArbiter::new(config(), GameContext::new())
    }

    /// Two indices sharing a key and one that does not match the first.
    fn pair_and_other(arbiter: &MatchArbiter) -> (CardIndex, CardIndex, CardIndex) {
        let cards = arbiter.cards();
        let a = 0;
        let b = (1..cards.len())
            .find(|&i| cards[i].pair_key() == cards[a].pair_key())
            .unwrap();
        let c = (1..cards.len()).find(|&i| i != b).unwrap();
        (
            CardIndex::new(a as u32),
            CardIndex::new(b as u32),
            CardIndex::new(c as u32),
        )
    }

    #[test]
    fn test_new_deals_configured_board() {
        let arb = arbiter();
        assert_eq!(arb.cards().len(), 4);
        assert_eq!(arb.score(), 0);
        assert!(arb.accepting_flips());
        assert_eq!(arb.next_deadline(), None);
    }

    #[test]
    fn test_flip_queues_after_completion() {
        let mut arb = arbiter();
        let (a, _, _) = pair_and_other(&arb);

        arb.request_flip(a).unwrap();
        assert!(arb.pending().is_empty());
        assert_eq!(arb.next_deadline(), Some(FLIP));

        arb.advance(FLIP);
        assert_eq!(arb.pending(), &[a]);
        assert!(arb.card(a).unwrap().is_face_up());
    }

    #[test]
    fn test_unknown_card_rejected() {
        let mut arb = arbiter();
        assert_eq!(arb.request_flip(CardIndex::new(99)), Err(FlipRejection::UnknownCard));
    }

    #[test]
    fn test_animating_card_rejected() {
        let mut arb = arbiter();
        arb.request_flip(CardIndex::new(0)).unwrap();
        assert_eq!(arb.request_flip(CardIndex::new(0)), Err(FlipRejection::Animating));
    }

    #[test]
    fn test_face_up_card_rejected() {
        let mut arb = arbiter();
        arb.request_flip(CardIndex::new(0)).unwrap();
        arb.advance(FLIP);
        assert_eq!(arb.request_flip(CardIndex::new(0)), Err(FlipRejection::FaceUp));
    }

    #[test]
    fn test_third_pick_rejected_while_two_flipping() {
        let mut arb = arbiter();
        arb.request_flip(CardIndex::new(0)).unwrap();
        arb.request_flip(CardIndex::new(1)).unwrap();
        assert!(!arb.accepting_flips());
        assert_eq!(arb.request_flip(CardIndex::new(2)), Err(FlipRejection::TurnFull));
    }

    #[test]
    fn test_match_resolves_in_same_step() {
        let mut arb = arbiter();
        let (a, b, _) = pair_and_other(&arb);

        arb.request_flip(a).unwrap();
        arb.request_flip(b).unwrap();
        arb.advance(FLIP);

        assert!(arb.card(a).unwrap().is_matched());
        assert!(arb.card(b).unwrap().is_matched());
        assert!(!arb.is_comparing());
        assert!(!arb.is_locked(a));
        assert_eq!(arb.score(), 100);
    }

    #[test]
    fn test_mismatch_holds_then_hides() {
        let mut arb = arbiter();
        let (a, _, c) = pair_and_other(&arb);

        arb.request_flip(a).unwrap();
        arb.request_flip(c).unwrap();
        arb.advance(FLIP);

        assert!(arb.is_comparing());
        assert!(arb.is_locked(a) && arb.is_locked(c));
        assert_eq!(arb.next_deadline(), Some(REVEAL));

        arb.advance(REVEAL);
        assert!(arb.is_comparing(), "still flipping back");
        assert!(arb.card(a).unwrap().is_animating());

        arb.advance(FLIP);
        assert!(!arb.is_comparing());
        assert!(!arb.card(a).unwrap().is_face_up());
        assert!(!arb.card(c).unwrap().is_face_up());
        assert!(arb.locked.is_empty());
        assert_eq!(arb.score(), 0);
    }

    #[test]
    fn test_advance_in_one_call_matches_many_small_calls() {
        let mut coarse = arbiter();
        let mut fine = arbiter();
        let (a, _, c) = pair_and_other(&coarse);

        for arb in [&mut coarse, &mut fine] {
            arb.request_flip(a).unwrap();
            arb.request_flip(c).unwrap();
        }

        coarse.advance(FLIP + REVEAL + FLIP);
        for _ in 0..160 {
            fine.advance(Duration::from_millis(10));
        }

        assert_eq!(coarse.snapshot(), fine.snapshot());
        assert!(!coarse.is_comparing());
    }

    #[test]
    fn test_reconfigure_mid_flip_invalidates_old_board() {
        let mut arb = arbiter();
        arb.request_flip(CardIndex::new(0)).unwrap();
        arb.advance(FLIP / 2);

        let epoch = arb.epoch();
        arb.configure_board(3, 2);
        assert_eq!(arb.epoch(), epoch + 1);
        assert_eq!(arb.cards().len(), 6);
        assert!(arb.cards().iter().all(|c| !c.is_face_up() && !c.is_animating()));

        arb.advance(FLIP);
        assert!(arb.pending().is_empty());
        assert!(arb.current_turn().is_empty());
    }

    #[test]
    fn test_stale_completion_is_dropped() {
        let mut arb = arbiter();
        arb.inbox.push_back(Completion {
            epoch: arb.epoch() - 1,
            card: CardIndex::new(0),
            face_up: true,
        });
        arb.advance(Duration::ZERO);
        assert!(arb.pending().is_empty());
    }

    #[test]
    fn test_preview_blocks_until_hidden() {
        let config = config().with_preview(Duration::from_secs(1));
        let mut arb = MatchArbiter::new(config, GameContext::new());

        assert!(arb.is_previewing());
        assert!(arb.cards().iter().all(Card::is_face_up));
        assert_eq!(arb.request_flip(CardIndex::new(0)), Err(FlipRejection::Previewing));

        arb.advance(Duration::from_secs(1));
        assert!(arb.is_previewing());
        assert!(arb.cards().iter().all(Card::is_animating));

        arb.advance(FLIP);
        assert!(!arb.is_previewing());
        assert!(arb.cards().iter().all(|c| !c.is_face_up()));
        assert!(arb.request_flip(CardIndex::new(0)).is_ok());
    }

    #[test]
    fn test_single_slot_board_is_empty() {
        let mut arb = arbiter();
        arb.configure_board(1, 1);
        assert!(arb.cards().is_empty());
        assert!(!arb.is_game_over());
        assert_eq!(arb.request_flip(CardIndex::new(0)), Err(FlipRejection::UnknownCard));
    }

    #[test]
    fn test_zero_duration_flips_resolve_on_next_advance() {
        let config = config()
            .with_flip_duration(Duration::ZERO)
            .with_reveal_delay(Duration::ZERO);
        let mut arb = MatchArbiter::new(config, GameContext::new());
        let (a, _, c) = pair_and_other(&arb);

        arb.request_flip(a).unwrap();
        arb.request_flip(c).unwrap();
        arb.advance(Duration::ZERO);

        assert!(!arb.is_comparing());
        assert!(!arb.card(a).unwrap().is_face_up());
    }

    #[test]
    fn test_preview_ends_on_board_past_u16_indices() {
        let config = config().with_preview(Duration::from_millis(100));
        let mut arb = MatchArbiter::new(config, GameContext::new());
        arb.configure_board(300, 300);
        assert_eq!(arb.cards().len(), 90_000);

        arb.advance(Duration::from_millis(100) + FLIP);
        assert!(!arb.is_previewing());
        assert!(arb.cards().iter().all(|c| !c.is_animating() && !c.is_face_up()));

        let last = CardIndex::new(89_999);
        arb.request_flip(last).unwrap();
        arb.advance(FLIP);
        assert_eq!(arb.pending(), &[last]);
    }

    #[test]
    fn test_instant_preview_on_large_board_terminates() {
        let config = config()
            .with_flip_duration(Duration::ZERO)
            .with_preview(Duration::from_millis(100));
        let mut arb = MatchArbiter::new(config, GameContext::new());
        arb.configure_board(300, 300);

        arb.advance(Duration::from_millis(100));
        assert!(!arb.is_previewing());
        assert_eq!(arb.next_deadline(), None);
    }

    #[test]
    fn test_replay_board_deals_same_keys() {
        let config = config().with_board(4, 4);
        let mut arb = MatchArbiter::new(config, GameContext::new());
        let keys: Vec<_> = arb.cards().iter().map(Card::pair_key).collect();
        let state = arb.deal_state().clone();

        let (a, b, _) = pair_and_other(&arb);
        arb.request_flip(a).unwrap();
        arb.request_flip(b).unwrap();
        arb.advance(FLIP);
        assert_eq!(arb.score(), 100);

        let epoch = arb.epoch();
        arb.replay_board();
        let replayed: Vec<_> = arb.cards().iter().map(Card::pair_key).collect();

        assert_eq!(replayed, keys);
        assert_eq!(arb.deal_state(), &state);
        assert_eq!(arb.epoch(), epoch + 1);
        assert_eq!(arb.score(), 0);
        assert!(arb.cards().iter().all(|c| !c.is_matched() && !c.is_face_up()));

        // A fresh deal moves on from the replayed state
        arb.new_game();
        assert_ne!(arb.deal_state(), &state);
    }
}

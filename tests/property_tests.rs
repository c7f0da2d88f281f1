//! Property tests for dealing and the flip/compare protocol.
//!
//! Random boards and random request timelines are thrown at the arbiter;
//! the invariants below must hold after every single step.

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use proptest::prelude::*;
use rustc_hash::FxHashMap;

use concentration::autoplay::play_to_completion;
use concentration::{
    CardIndex, GameContext, MatchArbiter, MatchConfig, MemoryPlayer, Scene, SessionSink,
};

#[derive(Clone, Copy, Debug)]
enum Op {
    Flip(u32),
    Wait(u64),
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        (0u32..16).prop_map(Op::Flip),
        (0u64..1_500).prop_map(Op::Wait),
    ]
}

/// Counts game-over hand-offs.
#[derive(Default)]
struct HandOffs {
    final_scores: Vec<u32>,
    transitions: Vec<Scene>,
}

impl SessionSink for HandOffs {
    fn set_final_score(&mut self, score: u32) {
        self.final_scores.push(score);
    }

    fn request_scene_transition(&mut self, target: Scene) {
        self.transitions.push(target);
    }
}

fn config(seed: u64) -> MatchConfig {
    MatchConfig::default()
        .with_board(4, 4)
        .with_flip_duration(Duration::from_millis(300))
        .with_reveal_delay(Duration::from_millis(500))
        .with_seed(seed)
}

fn apply(arbiter: &mut MatchArbiter, op: Op) {
    match op {
        Op::Flip(i) => {
            let _ = arbiter.request_flip(CardIndex::new(i));
        }
        Op::Wait(ms) => arbiter.advance(Duration::from_millis(ms)),
    }
}

fn check_invariants(arbiter: &MatchArbiter) -> Result<(), TestCaseError> {
    let snap = arbiter.snapshot();
    prop_assert!(snap.pending.len() <= 2);
    prop_assert!(arbiter.current_turn().len() <= 2);
    prop_assert!(snap.locked.len() <= 2);
    for card in &snap.cards {
        if card.matched {
            prop_assert!(card.face_up, "matched card must stay face-up");
            prop_assert!(!card.animating);
        }
    }
    if snap.game_over {
        prop_assert_eq!(snap.matched_count(), snap.cards.len());
    }
    Ok(())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    /// Property: every key in 0..pairs appears exactly twice, for any requested size.
    #[test]
    fn prop_pairing_correctness(
        columns in -4i32..14,
        rows in -4i32..14,
        seed in any::<u64>(),
    ) {
        let mut arbiter = MatchArbiter::new(config(seed), GameContext::new());
        arbiter.configure_board(columns, rows);

        let slots = (columns.max(1) * rows.max(1)) as usize;
        let pair_count = slots / 2;
        prop_assert_eq!(arbiter.cards().len(), pair_count * 2);
        prop_assert_eq!(arbiter.dimensions().pair_count(), pair_count);

        let mut counts: FxHashMap<u32, usize> = FxHashMap::default();
        for card in arbiter.cards() {
            *counts.entry(card.pair_key().raw()).or_default() += 1;
        }
        prop_assert_eq!(counts.len(), pair_count);
        for key in 0..pair_count as u32 {
            prop_assert_eq!(counts.get(&key).copied(), Some(2));
        }
    }

    /// Property: queue and lock bounds hold after every step of random play.
    #[test]
    fn prop_random_play_keeps_bounds(
        seed in any::<u64>(),
        ops in prop::collection::vec(op(), 1..120),
    ) {
        let mut arbiter = MatchArbiter::new(config(seed), GameContext::new());
        for op in ops {
            apply(&mut arbiter, op);
            check_invariants(&arbiter)?;
        }
    }

    /// Property: a rejected request never changes the board.
    #[test]
    fn prop_rejections_are_noops(
        seed in any::<u64>(),
        ops in prop::collection::vec(op(), 1..80),
    ) {
        let mut arbiter = MatchArbiter::new(config(seed), GameContext::new());
        for op in ops {
            if let Op::Flip(i) = op {
                let before = arbiter.snapshot();
                if arbiter.request_flip(CardIndex::new(i)).is_err() {
                    prop_assert_eq!(arbiter.snapshot(), before);
                }
            } else {
                apply(&mut arbiter, op);
            }
        }
    }

    /// Property: how time is split across calls does not change the outcome.
    #[test]
    fn prop_advance_split_invariance(
        seed in any::<u64>(),
        steps in prop::collection::vec((0u32..16, 0u64..1_500, 0u64..100), 1..40),
    ) {
        let mut coarse = MatchArbiter::new(config(seed), GameContext::new());
        let mut fine = MatchArbiter::new(config(seed), GameContext::new());

        for (card, wait, percent) in steps {
            let a = coarse.request_flip(CardIndex::new(card));
            let b = fine.request_flip(CardIndex::new(card));
            prop_assert_eq!(a, b);

            let first = wait * percent / 100;
            coarse.advance(Duration::from_millis(wait));
            fine.advance(Duration::from_millis(first));
            fine.advance(Duration::from_millis(wait - first));

            prop_assert_eq!(coarse.snapshot(), fine.snapshot());
        }
    }

    /// Property: the score never underflows, whatever the penalty.
    #[test]
    fn prop_score_floors_at_zero(
        seed in any::<u64>(),
        penalty in 1u32..=u32::MAX,
        rounds in 1usize..12,
    ) {
        let config = config(seed).with_scoring(50, penalty);
        let mut arbiter = MatchArbiter::new(config, GameContext::new());
        let cycle = Duration::from_millis(300 + 500 + 300);

        for _ in 0..rounds {
            let cards = arbiter.cards();
            let a = 0;
            let Some(b) = (1..cards.len()).find(|&i| cards[i].pair_key() != cards[a].pair_key()) else {
                break;
            };
            let before = arbiter.score();
            arbiter.request_flip(CardIndex::new(a as u32)).unwrap();
            arbiter.request_flip(CardIndex::new(b as u32)).unwrap();
            arbiter.advance(cycle);

            prop_assert_eq!(arbiter.score(), before.saturating_sub(penalty));
            prop_assert!(!arbiter.is_comparing());
        }
    }

    /// Property: clearing any board hands off exactly once, with the final score.
    #[test]
    fn prop_game_over_exactly_once(
        seed in any::<u64>(),
        player_seed in any::<u64>(),
        columns in 1u16..7,
        rows in 1u16..7,
    ) {
        prop_assume!(columns * rows >= 2);
        let sink = Rc::new(RefCell::new(HandOffs::default()));
        let config = config(seed).with_board(columns, rows);
        let context = GameContext::new().with_session(Rc::clone(&sink));
        let mut arbiter = MatchArbiter::new(config, context);
        let mut player = MemoryPlayer::new(player_seed);

        let report = play_to_completion(&mut arbiter, &mut player, Duration::from_millis(50), 100_000);
        prop_assert!(report.finished);

        // Keep the clock running past the end
        arbiter.advance(Duration::from_secs(30));

        let sink = sink.borrow();
        prop_assert_eq!(&sink.transitions, &vec![Scene::GameOver]);
        prop_assert_eq!(&sink.final_scores, &vec![arbiter.score()]);
        prop_assert!(arbiter.cards().iter().all(|c| c.is_matched()));
    }
}

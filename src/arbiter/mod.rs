//! Turn/flip arbitration.
//!
//! The arbiter accepts flip requests, serializes finished flips into pairs,
//! runs the reveal-compare-resolve cycle, keeps score, and detects the end of
//! the game.
//!
//! ## Example
//!
//! ```
//! use std::time::Duration;
//! use concentration::arbiter::MatchArbiter;
//! use concentration::context::GameContext;
//! use concentration::core::{CardIndex, MatchConfig};
//!
//! let config = MatchConfig::default().with_board(2, 2);
//! let mut arbiter = MatchArbiter::new(config, GameContext::new());
//!
//! arbiter.request_flip(CardIndex::new(0)).unwrap();
//! arbiter.advance(Duration::from_secs(1));
//! assert_eq!(arbiter.pending(), &[CardIndex::new(0)]);
//! ```

mod match_arbiter;
mod phase;
mod snapshot;

pub use match_arbiter::MatchArbiter;
pub use phase::{FlipRejection, Timer};
pub use snapshot::{BoardSnapshot, CardSnapshot};

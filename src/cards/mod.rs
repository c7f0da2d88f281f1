//! Cards: the flip transition, the per-card state machine, and dealing.
//!
//! ## Key Types
//!
//! - `Card`: identity, face state, and running flip
//! - `FlipTransition`: the two-phase rotation
//! - `FlipCompleted`: the one-shot completion notification
//! - `deal_pair_keys`: uniform shuffled pair assignment

pub mod card;
pub mod deal;
pub mod flip;

pub use card::{Card, CardState, FlipCompleted};
pub use deal::deal_pair_keys;
pub use flip::FlipTransition;

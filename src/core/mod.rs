//! Core types: identifiers, RNG, configuration, errors.
//!
//! Everything here is independent of the flip/compare protocol and is shared
//! by the card, board, and session layers.

pub mod ids;
pub mod rng;
pub mod config;
pub mod error;

pub use ids::{CardIndex, PairKey, SpriteId};
pub use rng::{GameRng, GameRngState};
pub use config::{Artwork, CardArt, MatchConfig};
pub use error::{ConfigError, SettingsError};

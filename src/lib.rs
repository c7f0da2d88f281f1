//! # concentration
//!
//! A memory-matching card game engine built around a deterministic
//! flip/compare arbiter.
//!
//! ## Design Principles
//!
//! 1. **Virtual Time**: Flip transitions and reveal delays are explicit state
//!    advanced by `MatchArbiter::advance`. Nothing runs between calls, so
//!    every game is reproducible from its seed and input timeline.
//!
//! 2. **Injected Collaborators**: Layout, audio, score display, and session
//!    hand-off are traits bundled in a `GameContext`. Any of them may be
//!    missing; the protocol never waits on one.
//!
//! 3. **Rejections Are Values**: Ineligible flips return a `FlipRejection`
//!    and leave the board untouched.
//!
//! ## Modules
//!
//! - `core`: Identifiers, RNG, configuration, errors
//! - `cards`: Card state machine, flip transition, dealing
//! - `board`: Board size normalization and grid layout
//! - `context`: Collaborator traits and `GameContext`
//! - `arbiter`: The flip/compare protocol
//! - `session`: Scenes, music, volume settings, game-over screen
//! - `autoplay`: Memory-based player for headless games

pub mod core;
pub mod cards;
pub mod board;
pub mod context;
pub mod arbiter;
pub mod session;
pub mod autoplay;

// Re-export commonly used types
pub use crate::core::{
    CardIndex, PairKey, SpriteId,
    GameRng, GameRngState,
    Artwork, CardArt, MatchConfig,
    ConfigError, SettingsError,
};

pub use crate::cards::{Card, CardState, FlipCompleted, FlipTransition};

pub use crate::board::{BoardDimensions, GridLayout};

pub use crate::context::{AudioCues, BoardLayout, GameContext, ScoreDisplay, SessionSink};

pub use crate::arbiter::{BoardSnapshot, CardSnapshot, FlipRejection, MatchArbiter};

pub use crate::session::{
    GameOverAction, GameOverScreen, ScoreLabel,
    Scene, Session, SettingsStore, VolumeChannel, VolumeSettings,
};

pub use crate::autoplay::{MemoryPlayer, PlayReport};

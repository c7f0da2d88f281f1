//! Match configuration.
//!
//! Everything the arbiter needs to run a board: its size, scoring, timings,
//! artwork, and the deal seed. Timings are stored as milliseconds so the
//! config reads naturally from TOML:
//!
//! ```toml
//! columns = 4
//! rows = 3
//! match_reward = 100
//! mismatch_penalty = 10
//! flip_duration_ms = 400
//! reveal_delay_ms = 800
//! preview_ms = 1500
//! seed = 7
//! ```

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::error::ConfigError;
use super::ids::{PairKey, SpriteId};

/// Sprites handed to cards at deal time.
///
/// A card's face is `faces[pair_key % faces.len()]`; all cards share `back`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Artwork {
    /// Face sprites, cycled by pair key.
    #[serde(default)]
    pub faces: Vec<SpriteId>,

    /// Back sprite shared by every card.
    #[serde(default)]
    pub back: SpriteId,
}

impl Artwork {
    /// Create artwork from face sprites and a back sprite.
    pub fn new(faces: Vec<SpriteId>, back: SpriteId) -> Self {
        Self { faces, back }
    }

    /// Face sprite for a pair key. `None` if no face sprites are configured.
    #[must_use]
    pub fn face_for(&self, key: PairKey) -> Option<SpriteId> {
        if self.faces.is_empty() {
            return None;
        }
        Some(self.faces[key.raw() as usize % self.faces.len()])
    }
}

/// Per-card art resolved at deal time.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardArt {
    pub face: Option<SpriteId>,
    pub back: SpriteId,
}

/// Match configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchConfig {
    /// Columns of the board used when a session starts a new game.
    pub columns: u16,

    /// Rows of the board used when a session starts a new game.
    pub rows: u16,

    /// Points added for each matched pair.
    pub match_reward: u32,

    /// Points removed for each mismatch (score never drops below zero).
    pub mismatch_penalty: u32,

    /// Length of one flip transition.
    pub flip_duration_ms: u64,

    /// How long a mismatched pair stays visible before flipping back.
    pub reveal_delay_ms: u64,

    /// Length of the show-all preview at board setup (0 = no preview).
    pub preview_ms: u64,

    /// Seed for dealing pair keys.
    pub seed: u64,

    /// Card artwork.
    pub artwork: Artwork,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            columns: 4,
            rows: 3,
            match_reward: 100,
            mismatch_penalty: 10,
            flip_duration_ms: 400,
            reveal_delay_ms: 800,
            preview_ms: 0,
            seed: 42,
            artwork: Artwork::default(),
        }
    }
}

impl MatchConfig {
    /// Parse a config from TOML. Missing keys take their defaults.
    pub fn from_toml_str(raw: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(raw)?)
    }

    /// Load a config from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&raw)
    }

    /// Flip transition duration.
    #[must_use]
    pub fn flip_duration(&self) -> Duration {
        Duration::from_millis(self.flip_duration_ms)
    }

    /// Mismatch reveal delay.
    #[must_use]
    pub fn reveal_delay(&self) -> Duration {
        Duration::from_millis(self.reveal_delay_ms)
    }

    /// Preview hold, if the preview phase is enabled.
    #[must_use]
    pub fn preview(&self) -> Option<Duration> {
        (self.preview_ms > 0).then(|| Duration::from_millis(self.preview_ms))
    }

    /// Set the default board size.
    #[must_use]
    pub fn with_board(mut self, columns: u16, rows: u16) -> Self {
        self.columns = columns;
        self.rows = rows;
        self
    }

    /// Set match reward and mismatch penalty.
    #[must_use]
    pub fn with_scoring(mut self, match_reward: u32, mismatch_penalty: u32) -> Self {
        self.match_reward = match_reward;
        self.mismatch_penalty = mismatch_penalty;
        self
    }

    /// Set the flip transition duration.
    ///
    /// Timings are stored in whole milliseconds; sub-millisecond parts round up.
    #[must_use]
    pub fn with_flip_duration(mut self, duration: Duration) -> Self {
        self.flip_duration_ms = millis_ceil(duration);
        self
    }

    /// Set the mismatch reveal delay.
    #[must_use]
    pub fn with_reveal_delay(mut self, delay: Duration) -> Self {
        self.reveal_delay_ms = millis_ceil(delay);
        self
    }

    /// Enable the preview phase with the given hold. Any non-zero hold
    /// enables it.
    #[must_use]
    pub fn with_preview(mut self, hold: Duration) -> Self {
        self.preview_ms = millis_ceil(hold);
        self
    }

    /// Set the deal seed.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Set the card artwork.
    #[must_use]
    pub fn with_artwork(mut self, artwork: Artwork) -> Self {
        self.artwork = artwork;
        self
    }
}

/// Whole milliseconds, rounded up so a non-zero duration never becomes 0.
fn millis_ceil(duration: Duration) -> u64 {
    let partial = duration.subsec_nanos() % 1_000_000 != 0;
    let ms = duration.as_millis() + u128::from(partial);
    u64::try_from(ms).unwrap_or(u64::MAX)
}

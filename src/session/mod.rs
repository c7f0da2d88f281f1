//! Everything that outlives a single board: scenes, music, volume settings,
//! and the screens around a game.

pub mod game_over;
pub mod scene;
pub mod store;
pub mod volume;

pub use game_over::{GameOverAction, GameOverScreen, ScoreLabel};
pub use scene::{AudioBackend, MusicTrack, NavAction, Scene, Session, SoundEffect};
pub use store::{JsonFileStore, MemoryStore, SettingsStore};
pub use volume::{VolumeChannel, VolumeSettings, MUSIC_VOLUME_KEY, SFX_VOLUME_KEY};

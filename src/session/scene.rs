//! Session: scene navigation, music, volume, and the hand-off of the final
//! score between scenes.
//!
//! One `Session` outlives every board. The arbiter reaches it through
//! [`SessionSink`] and [`AudioCues`], usually as an `Rc<RefCell<Session>>`
//! shared with whatever drives navigation.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::store::SettingsStore;
use super::volume::{VolumeChannel, VolumeSettings};
use crate::context::{AudioCues, SessionSink};
use crate::core::SettingsError;

/// Top-level views of the game.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Scene {
    #[default]
    MainMenu,
    Game,
    GameOver,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MusicTrack {
    MainMenu,
    Game,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SoundEffect {
    Flip,
    Match,
    Mismatch,
    GameOver,
}

/// Navigation requests from menu buttons.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NavAction {
    PlayGame,
    MainMenu,
    GameOver,
    Quit,
}

/// Plays sounds. Every method defaults to doing nothing, so a backend only
/// implements what it supports.
pub trait AudioBackend {
    fn play_sfx(&mut self, _effect: SoundEffect, _volume: f32) {}

    fn play_music(&mut self, _track: MusicTrack, _looping: bool) {}

    fn stop_music(&mut self) {}

    fn set_music_volume(&mut self, _volume: f32) {}
}

/// Long-lived game session.
pub struct Session {
    scene: Scene,
    final_score: u32,
    volumes: VolumeSettings,
    store: Box<dyn SettingsStore>,
    backend: Option<Box<dyn AudioBackend>>,
    now_playing: Option<MusicTrack>,
    settings_open: bool,
    quit_requested: bool,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("scene", &self.scene)
            .field("final_score", &self.final_score)
            .field("volumes", &self.volumes)
            .field("now_playing", &self.now_playing)
            .field("settings_open", &self.settings_open)
            .field("quit_requested", &self.quit_requested)
            .finish_non_exhaustive()
    }
}

impl Session {
    /// Start a session on the main menu, with volumes read from `store`.
    pub fn new(store: impl SettingsStore + 'static) -> Self {
        let volumes = VolumeSettings::load(&store);
        let mut session = Self {
            scene: Scene::MainMenu,
            final_score: 0,
            volumes,
            store: Box::new(store),
            backend: None,
            now_playing: None,
            settings_open: false,
            quit_requested: false,
        };
        session.play_music(MusicTrack::MainMenu);
        session
    }

    /// Attach an audio backend and bring it up to date with the session.
    #[must_use]
    pub fn with_backend(mut self, backend: impl AudioBackend + 'static) -> Self {
        let mut backend: Box<dyn AudioBackend> = Box::new(backend);
        backend.set_music_volume(self.volumes.get(VolumeChannel::Music));
        if let Some(track) = self.now_playing {
            backend.play_music(track, true);
        }
        self.backend = Some(backend);
        self
    }

    #[must_use]
    pub fn scene(&self) -> Scene {
        self.scene
    }

    #[must_use]
    pub fn final_score(&self) -> u32 {
        self.final_score
    }

    #[must_use]
    pub fn now_playing(&self) -> Option<MusicTrack> {
        self.now_playing
    }

    #[must_use]
    pub fn quit_requested(&self) -> bool {
        self.quit_requested
    }

    // === Scenes ===

    /// Switch scenes. Menu and game scenes start their music, the game-over
    /// scene stops it. The settings panel is closed by every switch.
    pub fn load_scene(&mut self, scene: Scene) {
        info!(from = ?self.scene, to = ?scene, "scene transition");
        self.scene = scene;
        self.settings_open = false;
        match scene {
            Scene::MainMenu => self.play_music(MusicTrack::MainMenu),
            Scene::Game => self.play_music(MusicTrack::Game),
            Scene::GameOver => self.stop_music(),
        }
    }

    pub fn navigate(&mut self, action: NavAction) {
        match action {
            NavAction::PlayGame => self.load_scene(Scene::Game),
            NavAction::MainMenu => self.load_scene(Scene::MainMenu),
            NavAction::GameOver => self.load_scene(Scene::GameOver),
            NavAction::Quit => self.quit(),
        }
    }

    pub fn quit(&mut self) {
        info!("quit requested");
        self.quit_requested = true;
    }

    // === Music ===

    /// Start a looping track unless it is already playing.
    pub fn play_music(&mut self, track: MusicTrack) {
        if self.now_playing == Some(track) {
            return;
        }
        self.now_playing = Some(track);
        if let Some(backend) = self.backend.as_mut() {
            backend.play_music(track, true);
        }
    }

    pub fn stop_music(&mut self) {
        if self.now_playing.take().is_some() {
            if let Some(backend) = self.backend.as_mut() {
                backend.stop_music();
            }
        }
    }

    fn play_sfx(&mut self, effect: SoundEffect) {
        let volume = self.volumes.get(VolumeChannel::Sfx);
        if let Some(backend) = self.backend.as_mut() {
            backend.play_sfx(effect, volume);
        }
    }

    // === Volume ===

    #[must_use]
    pub fn volume(&self, channel: VolumeChannel) -> f32 {
        self.volumes.get(channel)
    }

    /// Set a volume level (clamped to `[0, 1]`) without persisting it.
    pub fn set_volume(&mut self, channel: VolumeChannel, value: f32) {
        self.volumes.set(channel, value);
        if channel == VolumeChannel::Music {
            let music = self.volumes.get(VolumeChannel::Music);
            if let Some(backend) = self.backend.as_mut() {
                backend.set_music_volume(music);
            }
        }
    }

    /// Persist both volume levels.
    pub fn save_volumes(&mut self) -> Result<(), SettingsError> {
        self.volumes.save(&mut *self.store)
    }

    /// Slider callback: apply the new level and persist immediately.
    pub fn on_volume_changed(&mut self, channel: VolumeChannel, value: f32) -> Result<(), SettingsError> {
        self.set_volume(channel, value);
        self.save_volumes()
    }

    // === Settings panel ===

    #[must_use]
    pub fn settings_open(&self) -> bool {
        self.settings_open
    }

    pub fn toggle_settings(&mut self) {
        self.settings_open = !self.settings_open;
    }

    pub fn open_settings(&mut self) {
        self.settings_open = true;
    }

    pub fn close_settings(&mut self) {
        self.settings_open = false;
    }
}

impl SessionSink for Session {
    fn set_final_score(&mut self, score: u32) {
        debug!(score, "final score recorded");
        self.final_score = score;
    }

    fn request_scene_transition(&mut self, target: Scene) {
        self.load_scene(target);
    }
}

impl AudioCues for Session {
    fn play_flip(&mut self) {
        self.play_sfx(SoundEffect::Flip);
    }

    fn play_match(&mut self) {
        self.play_sfx(SoundEffect::Match);
    }

    fn play_mismatch(&mut self) {
        self.play_sfx(SoundEffect::Mismatch);
    }

    fn play_game_over(&mut self) {
        self.play_sfx(SoundEffect::GameOver);
    }
}

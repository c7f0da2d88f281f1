//! Music and sound-effect volume levels.

use serde::{Deserialize, Serialize};

use super::store::SettingsStore;
use crate::core::SettingsError;

/// Store key for the music level.
pub const MUSIC_VOLUME_KEY: &str = "MusicVolume";

/// Store key for the sound-effect level.
pub const SFX_VOLUME_KEY: &str = "SFXVolume";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VolumeChannel {
    Music,
    Sfx,
}

impl VolumeChannel {
    /// Key this channel is persisted under.
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            VolumeChannel::Music => MUSIC_VOLUME_KEY,
            VolumeChannel::Sfx => SFX_VOLUME_KEY,
        }
    }
}

/// Volume levels in `[0, 1]`. Both default to full volume.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct VolumeSettings {
    music: f32,
    sfx: f32,
}

impl Default for VolumeSettings {
    fn default() -> Self {
        Self {
            music: 1.0,
            sfx: 1.0,
        }
    }
}

impl VolumeSettings {
    /// Read both levels, falling back to 1.0 for missing keys.
    pub fn load(store: &dyn SettingsStore) -> Self {
        let mut settings = Self::default();
        for channel in [VolumeChannel::Music, VolumeChannel::Sfx] {
            if let Some(value) = store.get_f32(channel.key()) {
                settings.set(channel, value);
            }
        }
        settings
    }

    /// Write both levels and persist the store.
    pub fn save(&self, store: &mut dyn SettingsStore) -> Result<(), SettingsError> {
        store.set_f32(MUSIC_VOLUME_KEY, self.music);
        store.set_f32(SFX_VOLUME_KEY, self.sfx);
        store.persist()
    }

    #[must_use]
    pub fn get(&self, channel: VolumeChannel) -> f32 {
        match channel {
            VolumeChannel::Music => self.music,
            VolumeChannel::Sfx => self.sfx,
        }
    }

    /// Set a level, clamped to `[0, 1]`. NaN is treated as silence.
    pub fn set(&mut self, channel: VolumeChannel, value: f32) {
        let value = if value.is_nan() { 0.0 } else { value.clamp(0.0, 1.0) };
        match channel {
            VolumeChannel::Music => self.music = value,
            VolumeChannel::Sfx => self.sfx = value,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::store::MemoryStore;

    #[test]
    fn test_defaults_to_full_volume() {
        let store = MemoryStore::new();
        let volumes = VolumeSettings::load(&store);
        assert_eq!(volumes.get(VolumeChannel::Music), 1.0);
        assert_eq!(volumes.get(VolumeChannel::Sfx), 1.0);
    }

    #[test]
    fn test_set_clamps() {
        let mut volumes = VolumeSettings::default();
        volumes.set(VolumeChannel::Music, 1.7);
        volumes.set(VolumeChannel::Sfx, -0.2);
        assert_eq!(volumes.get(VolumeChannel::Music), 1.0);
        assert_eq!(volumes.get(VolumeChannel::Sfx), 0.0);

        volumes.set(VolumeChannel::Sfx, f32::NAN);
        assert_eq!(volumes.get(VolumeChannel::Sfx), 0.0);
    }

    #[test]
    fn test_save_and_load() {
        let mut store = MemoryStore::new();
        let mut volumes = VolumeSettings::default();
        volumes.set(VolumeChannel::Music, 0.3);
        volumes.save(&mut store).unwrap();

        assert_eq!(store.get_f32(MUSIC_VOLUME_KEY), Some(0.3));
        assert_eq!(store.persist_count(), 1);

        let loaded = VolumeSettings::load(&store);
        assert_eq!(loaded, volumes);
    }

    #[test]
    fn test_load_clamps_out_of_range_values() {
        let mut store = MemoryStore::new();
        store.set_f32(SFX_VOLUME_KEY, 4.0);
        assert_eq!(VolumeSettings::load(&store).get(VolumeChannel::Sfx), 1.0);
    }
}

//! Error types.
//!
//! The flip/compare protocol itself never fails: bad board sizes are clamped
//! and ineligible flips are rejected as normal flow (see
//! [`FlipRejection`](crate::arbiter::FlipRejection)). Errors only come from the
//! edges that touch the filesystem.

use std::path::PathBuf;

use thiserror::Error;

/// Failure to load a [`MatchConfig`](super::MatchConfig).
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Failure to read or persist the settings store.
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("settings io error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("settings file is not valid json: {0}")]
    Json(#[from] serde_json::Error),
}

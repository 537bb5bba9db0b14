//! Player settings kept between runs.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::engine::{DEFAULT_SPEED, SPEED_RANGE, Speed};

pub const SETTINGS_FILE: &str = "snake.settings.json";

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to read {path}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to write {path}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("malformed settings in {path}")]
    Malformed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// Cells per second.
    pub speed: u32,
    pub fullscreen: bool,
}

impl Default for Settings {
    fn default() -> Self { Self { speed: DEFAULT_SPEED, fullscreen: true } }
}

impl Settings {
    /// Stored speed clamped into the playable range.
    pub fn speed(&self) -> Speed {
        let v = self.speed.clamp(*SPEED_RANGE.start(), *SPEED_RANGE.end());
        Speed::new(v).unwrap_or_default()
    }

    /// Takes over `speed`; true when it differs from what was stored.
    pub fn remember_speed(&mut self, speed: Speed) -> bool {
        if self.speed == speed.get() {
            return false;
        }
        self.speed = speed.get();
        true
    }
}

pub fn settings_path(dir: &Path) -> PathBuf { dir.join(SETTINGS_FILE) }

/// `Ok(None)` when nothing has been saved yet.
pub fn load(dir: &Path) -> Result<Option<Settings>, SettingsError> {
    let path = settings_path(dir);
    let text = match fs::read_to_string(&path) {
        Ok(text) => text,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(source) => return Err(SettingsError::Read { path, source }),
    };
    serde_json::from_str(&text)
        .map(Some)
        .map_err(|source| SettingsError::Malformed { path, source })
}

pub fn save(dir: &Path, settings: &Settings) -> Result<(), SettingsError> {
    let path = settings_path(dir);
    let text = serde_json::to_string_pretty(settings)
        .map_err(|source| SettingsError::Malformed { path: path.clone(), source })?;
    fs::create_dir_all(dir)
        .and_then(|_| fs::write(&path, text))
        .map_err(|source| SettingsError::Write { path, source })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_is_not_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load(dir.path()).unwrap().is_none());
    }

    #[test]
    fn saved_settings_load_back() {
        let dir = tempfile::tempdir().unwrap();
        let s = Settings { speed: 12, fullscreen: false };
        save(dir.path(), &s).unwrap();
        assert_eq!(load(dir.path()).unwrap(), Some(s));
    }

    #[test]
    fn missing_fields_take_defaults() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(settings_path(dir.path()), r#"{ "speed": 5 }"#).unwrap();
        let s = load(dir.path()).unwrap().unwrap();
        assert_eq!(s.speed, 5);
        assert!(s.fullscreen);
    }

    #[test]
    fn garbage_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(settings_path(dir.path()), "speed=5").unwrap();
        assert!(matches!(load(dir.path()), Err(SettingsError::Malformed { .. })));
    }

    #[test]
    fn out_of_range_speed_is_clamped() {
        assert_eq!(Settings { speed: 0, fullscreen: true }.speed().get(), *SPEED_RANGE.start());
        assert_eq!(Settings { speed: 500, fullscreen: true }.speed().get(), *SPEED_RANGE.end());
    }

    #[test]
    fn only_a_changed_speed_needs_saving() {
        let dir = tempfile::tempdir().unwrap();
        let mut s = Settings { speed: 8, fullscreen: true };
        assert!(!s.remember_speed(Speed::new(8).unwrap()));
        assert!(s.remember_speed(Speed::new(9).unwrap()));
        save(dir.path(), &s).unwrap();
        assert_eq!(load(dir.path()).unwrap().map(|s| s.speed), Some(9));
        assert!(!s.remember_speed(Speed::new(9).unwrap()));
    }
}

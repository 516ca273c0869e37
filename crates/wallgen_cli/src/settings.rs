//! Versioned settings file.
//!
//! Stored as `{ "version": 1, "state": { ... } }`. Anything that does not
//! match the current version, or does not parse, is deleted on load and
//! treated as absent.
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use wallgen::prelude::GeneratorState;

pub const SETTINGS_VERSION: u32 = 1;

const APP_DIR: &str = "wallgen";
const FILE_NAME: &str = "settings.json";

#[derive(Debug, Serialize, Deserialize)]
struct StoredSettings {
    version: u32,
    state: GeneratorState,
}

/// Settings file at a fixed path.
#[derive(Debug, Clone)]
pub struct SettingsStore {
    path: PathBuf,
}

impl SettingsStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `<config dir>/wallgen/settings.json`, if the platform has a config dir.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(APP_DIR).join(FILE_NAME))
    }

    /// Store at [`SettingsStore::default_path`].
    pub fn open_default() -> anyhow::Result<Self> {
        Self::default_path()
            .map(Self::new)
            .context("no configuration directory on this platform")
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Saved state, or `None` if nothing usable is stored.
    ///
    /// The seed is never restored. Custom color lists shorter than two fall
    /// back to the defaults.
    pub fn load(&self) -> Option<GeneratorState> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => return None,
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "could not read settings");
                return None;
            }
        };

        let stored = match serde_json::from_str::<StoredSettings>(&raw) {
            Ok(stored) if stored.version == SETTINGS_VERSION => stored,
            Ok(stored) => {
                warn!(
                    found = stored.version,
                    expected = SETTINGS_VERSION,
                    "discarding settings from another version"
                );
                self.discard();
                return None;
            }
            Err(e) => {
                warn!(error = %e, "discarding unreadable settings");
                self.discard();
                return None;
            }
        };

        let mut state = stored.state;
        state.seed = None;
        if state.custom_colors.len() < 2 {
            state.custom_colors = GeneratorState::default().custom_colors;
        }
        debug!(path = %self.path.display(), "loaded settings");
        Some(state)
    }

    /// Persist `state` without its seed.
    pub fn save(&self, state: &GeneratorState) -> anyhow::Result<()> {
        if let Some(dir) = self.path.parent() {
            fs::create_dir_all(dir)
                .with_context(|| format!("creating settings directory {}", dir.display()))?;
        }
        let stored = StoredSettings {
            version: SETTINGS_VERSION,
            state: GeneratorState {
                seed: None,
                ..state.clone()
            },
        };
        let json = serde_json::to_string_pretty(&stored)?;
        fs::write(&self.path, json)
            .with_context(|| format!("writing settings to {}", self.path.display()))?;
        debug!(path = %self.path.display(), "saved settings");
        Ok(())
    }

    /// Remove the stored file, if any.
    pub fn clear(&self) -> anyhow::Result<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e)
                .with_context(|| format!("removing settings file {}", self.path.display())),
        }
    }

    fn discard(&self) {
        if let Err(e) = self.clear() {
            warn!(error = %e, "could not remove stale settings");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wallgen::prelude::{GeneratorMode, ResolutionPreset};

    fn store() -> (tempfile::TempDir, SettingsStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = SettingsStore::new(dir.path().join("nested").join(FILE_NAME));
        (dir, store)
    }

    #[test]
    fn missing_file_loads_nothing() {
        let (_dir, store) = store();
        assert_eq!(store.load(), None);
    }

    #[test]
    fn save_then_load_drops_seed() {
        let (_dir, store) = store();
        let state = GeneratorState {
            mode: GeneratorMode::Themes,
            palette: "gruvboxDark".into(),
            resolution: ResolutionPreset::Qhd,
            overlap: 10,
            seed: Some(1234),
            ..Default::default()
        };
        store.save(&state).unwrap();

        let raw = fs::read_to_string(store.path()).unwrap();
        assert!(raw.contains("\"version\": 1"));
        assert!(raw.contains("\"customColors\""));
        assert!(!raw.contains("1234"));

        let loaded = store.load().unwrap();
        assert_eq!(loaded, GeneratorState { seed: None, ..state });
    }

    #[test]
    fn version_mismatch_deletes_the_file() {
        let (_dir, store) = store();
        store.save(&GeneratorState::default()).unwrap();
        let raw = fs::read_to_string(store.path())
            .unwrap()
            .replace("\"version\": 1", "\"version\": 0");
        fs::write(store.path(), raw).unwrap();

        assert_eq!(store.load(), None);
        assert!(!store.path().exists());
    }

    #[test]
    fn garbage_is_discarded() {
        let (_dir, store) = store();
        fs::create_dir_all(store.path().parent().unwrap()).unwrap();
        fs::write(store.path(), "{not json").unwrap();
        assert_eq!(store.load(), None);
        assert!(!store.path().exists());
    }

    #[test]
    fn partial_state_merges_with_defaults() {
        let (_dir, store) = store();
        fs::create_dir_all(store.path().parent().unwrap()).unwrap();
        fs::write(
            store.path(),
            r##"{"version":1,"state":{"shapeCount":11,"customColors":["#ffffff"],"seed":5}}"##,
        )
        .unwrap();

        let loaded = store.load().unwrap();
        assert_eq!(loaded.shape_count, 11);
        assert_eq!(loaded.custom_colors, GeneratorState::default().custom_colors);
        assert_eq!(loaded.seed, None);
        assert_eq!(loaded.resolution, ResolutionPreset::FourK);
    }

    #[test]
    fn clear_is_idempotent() {
        let (_dir, store) = store();
        store.save(&GeneratorState::default()).unwrap();
        store.clear().unwrap();
        store.clear().unwrap();
        assert!(!store.path().exists());
    }
}

//! Client-local preferences. Only the voice toggle is persisted.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Preferences {
    pub voice_enabled: bool,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            voice_enabled: true,
        }
    }
}

impl Preferences {
    /// `<config_dir>/kouki/preferences.json`, if the platform has a config dir.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("kouki").join("preferences.json"))
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let raw = std::fs::read_to_string(path.as_ref()).with_context(|| {
            format!("Failed to read preferences: {}", path.as_ref().display())
        })?;
        serde_json::from_str(&raw).context("Failed to parse preferences")
    }

    /// Load the stored preferences, or `fallback` when nothing valid is stored.
    pub fn load_or(path: Option<&Path>, fallback: Preferences) -> Self {
        match path.map(Self::load) {
            Some(Ok(prefs)) => prefs,
            Some(Err(e)) => {
                tracing::debug!("No stored preferences ({}), using fallback", e);
                fallback
            }
            None => fallback,
        }
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        let raw = serde_json::to_string_pretty(self)?;
        std::fs::write(path, raw)
            .with_context(|| format!("Failed to write preferences: {}", path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("preferences.json");

        Preferences {
            voice_enabled: false,
        }
        .save(&path)
        .unwrap();

        let loaded = Preferences::load(&path).unwrap();
        assert!(!loaded.voice_enabled);
        let raw = std::fs::read_to_string(&path).unwrap();
        assert!(raw.contains("voiceEnabled"));
    }

    #[test]
    fn test_missing_file_uses_fallback() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.json");
        let prefs = Preferences::load_or(
            Some(&path),
            Preferences {
                voice_enabled: false,
            },
        );
        assert!(!prefs.voice_enabled);
        assert!(Preferences::load_or(None, Preferences::default()).voice_enabled);
    }
}

//! Preferences persisted as a JSON file.

use std::path::{Path, PathBuf};

use minesync_session::{Identity, IdentityStore, Preferences};
use tracing::debug;

use crate::MinesyncError;

/// [`Preferences`] backed by a file on disk.
///
/// A missing file reads as defaults; every change is written through.
#[derive(Debug)]
pub struct PreferencesFile {
    path: PathBuf,
    prefs: Preferences,
}

impl PreferencesFile {
    /// Opens the preferences at `path`.
    ///
    /// # Errors
    /// [`MinesyncError::Io`] if the file exists but cannot be read,
    /// [`MinesyncError::Json`] if it is corrupt.
    pub fn load(path: impl Into<PathBuf>) -> Result<Self, MinesyncError> {
        let path = path.into();
        let prefs = match std::fs::read_to_string(&path) {
            Ok(text) => serde_json::from_str(&text).map_err(|source| MinesyncError::Json {
                path: path.clone(),
                source,
            })?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "no preferences yet");
                Preferences::default()
            }
            Err(source) => return Err(MinesyncError::Io { path, source }),
        };
        Ok(Self { path, prefs })
    }

    /// Writes the current preferences, creating parent directories.
    pub fn save(&self) -> Result<(), MinesyncError> {
        let io_err = |source| MinesyncError::Io {
            path: self.path.clone(),
            source,
        };
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(io_err)?;
        }
        let text = serde_json::to_string_pretty(&self.prefs).map_err(|source| MinesyncError::Json {
            path: self.path.clone(),
            source,
        })?;
        std::fs::write(&self.path, text).map_err(io_err)?;
        debug!(path = %self.path.display(), "preferences saved");
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn preferences(&self) -> &Preferences {
        &self.prefs
    }

    /// Explosion volume, clamped to `0.0..=1.0`.
    pub fn volume(&self) -> f32 {
        self.prefs.volume()
    }

    /// Stores a new volume.
    pub fn set_volume(&mut self, volume: f32) -> Result<(), MinesyncError> {
        self.prefs.audio_volume = volume;
        self.prefs.audio_volume = self.prefs.volume();
        self.save()
    }
}

impl IdentityStore for PreferencesFile {
    type Error = MinesyncError;

    fn load_identity(&self) -> Result<Option<Identity>, MinesyncError> {
        Ok(self.prefs.identity.clone())
    }

    fn save_identity(&mut self, identity: &Identity) -> Result<(), MinesyncError> {
        self.prefs.identity = Some(identity.clone());
        self.save()
    }

    fn clear_identity(&mut self) -> Result<(), MinesyncError> {
        self.prefs.identity = None;
        self.save()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_reads_as_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let prefs = PreferencesFile::load(dir.path().join("prefs.json")).unwrap();
        assert_eq!(prefs.preferences(), &Preferences::default());
    }

    #[test]
    fn test_identity_survives_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("prefs.json");

        let mut prefs = PreferencesFile::load(&path).unwrap();
        let alice = Identity::new("Alice", "#00ff00").unwrap();
        prefs.save_identity(&alice).unwrap();
        prefs.set_volume(0.25).unwrap();

        let reloaded = PreferencesFile::load(&path).unwrap();
        assert_eq!(reloaded.load_identity().unwrap(), Some(alice));
        assert_eq!(reloaded.volume(), 0.25);
    }

    #[test]
    fn test_clear_identity_keeps_volume() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("prefs.json");

        let mut prefs = PreferencesFile::load(&path).unwrap();
        prefs.save_identity(&Identity::new("Bob", "#f00").unwrap()).unwrap();
        prefs.set_volume(0.9).unwrap();
        prefs.clear_identity().unwrap();

        let reloaded = PreferencesFile::load(&path).unwrap();
        assert_eq!(reloaded.load_identity().unwrap(), None);
        assert_eq!(reloaded.volume(), 0.9);
    }

    #[test]
    fn test_corrupt_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("prefs.json");
        std::fs::write(&path, "{ nope").unwrap();
        assert!(matches!(
            PreferencesFile::load(&path),
            Err(MinesyncError::Json { .. })
        ));
    }

    #[test]
    fn test_invalid_stored_identity_is_rejected_at_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("prefs.json");

        std::fs::write(&path, r##"{"identity":{"name":"","color":"#fff"}}"##).unwrap();
        assert!(matches!(PreferencesFile::load(&path), Err(MinesyncError::Json { .. })));

        std::fs::write(&path, r##"{"identity":{"name":"Alice","color":"a b"}}"##).unwrap();
        assert!(matches!(PreferencesFile::load(&path), Err(MinesyncError::Json { .. })));

        std::fs::write(&path, r##"{"identity":{"name":" Alice ","color":"#0f0"}}"##).unwrap();
        let prefs = PreferencesFile::load(&path).unwrap();
        assert_eq!(prefs.load_identity().unwrap().unwrap().name(), "Alice");
    }
}

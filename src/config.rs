//! Process configuration.
//!
//! Two environment inputs drive everything stateful: `profile` points at the
//! browser profile directory that owns the History/Favicons store, and
//! `alfred_workflow_cache` names the writable cache directory (Alfred exports
//! both to workflow processes). The value is built once in `main` and passed
//! by reference into the icon cache; there are no ambient globals.

use std::path::PathBuf;

use crate::error::WinhopError;

#[derive(Debug, Clone)]
pub struct Config {
    /// Browser profile directory holding the live History/Favicons pair.
    pub profile_dir: PathBuf,
    /// Writable directory for database snapshots and cached favicon files.
    pub cache_dir: PathBuf,
}

impl Config {
    pub fn from_env() -> Self {
        let profile = std::env::var("profile").unwrap_or_default();
        let profile_dir = PathBuf::from(shellexpand::tilde(&profile).as_ref());

        let cache_dir = std::env::var("alfred_workflow_cache")
            .ok()
            .filter(|value| !value.is_empty())
            .map(|value| PathBuf::from(shellexpand::tilde(&value).as_ref()))
            .unwrap_or_else(|| {
                dirs::cache_dir()
                    .unwrap_or_else(std::env::temp_dir)
                    .join("winhop")
            });

        Config {
            profile_dir,
            cache_dir,
        }
    }

    /// Create the cache directory if it does not exist yet.
    pub fn ensure_cache_dir(&self) -> Result<(), WinhopError> {
        std::fs::create_dir_all(&self.cache_dir).map_err(|err| {
            WinhopError::Config(format!(
                "cannot create cache directory {}: {err}",
                self.cache_dir.display()
            ))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ensure_cache_dir_creates_missing_directories() {
        let tmp = tempfile::tempdir().unwrap();
        let config = Config {
            profile_dir: tmp.path().join("profile"),
            cache_dir: tmp.path().join("nested").join("cache"),
        };
        config.ensure_cache_dir().unwrap();
        assert!(config.cache_dir.is_dir());
        // Idempotent on an existing directory.
        config.ensure_cache_dir().unwrap();
    }
}

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::app_dirs::AppDirs;
use crate::arena::TargetSize;
use crate::session::{SessionConfig, DEFAULT_ROUND_SECS};

pub const MIN_ROUND_SECS: u32 = 1;
pub const MAX_ROUND_SECS: u32 = 600;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub round_secs: u32,
    pub target_width: u16,
    pub target_height: u16,
    pub record_history: bool,
}

impl Default for Config {
    fn default() -> Self {
        let size = TargetSize::default();
        Self {
            round_secs: DEFAULT_ROUND_SECS,
            target_width: size.width,
            target_height: size.height,
            record_history: true,
        }
    }
}

impl Config {
    /// Session parameters with out-of-range values clamped
    pub fn session_config(&self) -> SessionConfig {
        SessionConfig {
            round_secs: self.round_secs.clamp(MIN_ROUND_SECS, MAX_ROUND_SECS),
            target_size: TargetSize {
                width: self.target_width.max(1),
                height: self.target_height.max(1),
            },
        }
    }
}

pub trait ConfigStore {
    fn load(&self) -> Config;
    fn save(&self, cfg: &Config) -> crate::error::Result<()>;
}

#[derive(Debug, Clone)]
pub struct FileConfigStore {
    path: PathBuf,
}

impl FileConfigStore {
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        Self {
            path: AppDirs::config_path(),
        }
    }

    pub fn with_path<P: AsRef<Path>>(p: P) -> Self {
        Self {
            path: p.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Default for FileConfigStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigStore for FileConfigStore {
    fn load(&self) -> Config {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(_) => return Config::default(),
        };

        match serde_json::from_slice::<Config>(&bytes) {
            Ok(cfg) => cfg,
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "ignoring malformed config");
                Config::default()
            }
        }
    }

    fn save(&self, cfg: &Config) -> crate::error::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let data = serde_json::to_vec_pretty(cfg)?;
        fs::write(&self.path, data)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_missing_file_loads_defaults() {
        let dir = tempdir().unwrap();
        let store = FileConfigStore::with_path(dir.path().join("absent.json"));

        assert_eq!(store.load(), Config::default());
    }

    #[test]
    fn test_save_and_load_custom_config() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("config.json");
        let store = FileConfigStore::with_path(&path);
        let cfg = Config {
            round_secs: 45,
            target_width: 6,
            target_height: 2,
            record_history: false,
        };

        store.save(&cfg).unwrap();

        assert_eq!(store.load(), cfg);
    }

    #[test]
    fn test_malformed_file_loads_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, b"{ not json").unwrap();

        assert_eq!(FileConfigStore::with_path(&path).load(), Config::default());
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, br#"{ "round_secs": 10 }"#).unwrap();

        let cfg = FileConfigStore::with_path(&path).load();
        assert_eq!(cfg.round_secs, 10);
        assert_eq!(cfg.target_width, Config::default().target_width);
        assert!(cfg.record_history);
    }

    #[test]
    fn test_session_config_clamps() {
        let cfg = Config {
            round_secs: 0,
            target_width: 0,
            target_height: 0,
            record_history: true,
        };
        let sc = cfg.session_config();

        assert_eq!(sc.round_secs, MIN_ROUND_SECS);
        assert_eq!(sc.target_size.width, 1);
        assert_eq!(sc.target_size.height, 1);

        let long = Config {
            round_secs: 10_000,
            ..Config::default()
        };
        assert_eq!(long.session_config().round_secs, MAX_ROUND_SECS);
    }

    #[test]
    fn test_default_session_is_thirty_seconds() {
        assert_eq!(Config::default().session_config().round_secs, 30);
    }
}

//! Client Configuration
//!
//! JSON file next to the database. Every field has a default, so a missing
//! file or a partial one is fine.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use board_dragdrop::DragSession;

use crate::gateway::TogglePersistence;
use crate::reducer::ReducerSettings;

pub const CONFIG_FILE_NAME: &str = "kanban_config.json";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to access config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    pub dir: PathBuf,
    pub app_name: String,
    pub max_files: usize,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("logs"),
            app_name: "kanban".to_string(),
            max_files: 7,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct KanbanConfig {
    /// SQLite file; `":memory:"` keeps everything in process
    pub db_path: PathBuf,
    pub log: LogConfig,
    pub reducer: ReducerSettings,
    pub toggle_persistence: TogglePersistence,
    /// Pointer travel before a press turns into a drag
    pub drag_threshold_px: i32,
}

impl Default for KanbanConfig {
    fn default() -> Self {
        Self {
            db_path: PathBuf::from("kanban.db"),
            log: LogConfig::default(),
            reducer: ReducerSettings::default(),
            toggle_persistence: TogglePersistence::default(),
            drag_threshold_px: board_dragdrop::DRAG_THRESHOLD_PX,
        }
    }
}

impl KanbanConfig {
    /// Read the config at `path`; a missing file yields the defaults
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                log::info!("No config at {:?}, using defaults", path);
                return Ok(Self::default());
            }
            Err(source) => {
                return Err(ConfigError::Io { path: path.to_path_buf(), source });
            }
        };

        serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Drag session for board items, gated by the configured threshold
    pub fn drag_session(&self) -> DragSession<String> {
        DragSession::with_threshold(self.drag_threshold_px)
    }

    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let io_err = |source| ConfigError::Io { path: path.to_path_buf(), source };

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(io_err)?;
        }
        let content = serde_json::to_string_pretty(self).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        std::fs::write(path, content).map_err(io_err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reducer::EmptyColumnPolicy;

    #[test]
    fn test_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = KanbanConfig::load(&dir.path().join(CONFIG_FILE_NAME)).unwrap();
        assert_eq!(config, KanbanConfig::default());
        assert_eq!(config.toggle_persistence, TogglePersistence::FullOverwrite);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        std::fs::write(
            &path,
            r#"{
                "db_path": "boards.db",
                "reducer": { "empty_column": "placeholder" },
                "toggle_persistence": "narrow_then_full"
            }"#,
        )
        .unwrap();

        let config = KanbanConfig::load(&path).unwrap();
        assert_eq!(config.db_path, PathBuf::from("boards.db"));
        assert_eq!(config.reducer.empty_column, EmptyColumnPolicy::Placeholder);
        assert_eq!(config.reducer.placeholder_text, "New task");
        assert_eq!(config.toggle_persistence, TogglePersistence::NarrowThenFull);
        assert_eq!(config.log, LogConfig::default());
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join(CONFIG_FILE_NAME);

        let mut config = KanbanConfig::default();
        config.log.max_files = 3;
        config.drag_threshold_px = 8;
        config.save(&path).unwrap();

        assert_eq!(KanbanConfig::load(&path).unwrap(), config);
    }

    #[test]
    fn test_invalid_json_is_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        std::fs::write(&path, "{ not json").unwrap();

        let err = KanbanConfig::load(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }
}

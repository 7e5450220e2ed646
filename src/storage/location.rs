//! Snapshot file location detection and management

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Directory under the home directory holding taskmgr files
const HOME_DIR: &str = ".taskmgr";

/// Snapshot file name
const SNAPSHOT_FILE: &str = "tasks.json";

/// Config file name
const CONFIG_FILE: &str = "config.yaml";

/// Errors related to snapshot location
#[derive(Debug, Error)]
pub enum LocationError {
    #[error("Failed to access home directory")]
    NoHomeDirectory,
    #[error("Snapshot path has no parent directory: {0}")]
    NoParent(PathBuf),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Where the command-line front end keeps its snapshot and config
#[derive(Debug, Clone)]
pub struct SnapshotLocation {
    /// The JSON snapshot file
    pub snapshot: PathBuf,
    /// The YAML config file
    pub config: PathBuf,
}

impl SnapshotLocation {
    /// Default location (~/.taskmgr)
    pub fn global() -> Result<Self, LocationError> {
        let home = dirs::home_dir().ok_or(LocationError::NoHomeDirectory)?;
        Ok(Self::in_dir(&home.join(HOME_DIR)))
    }

    /// Snapshot and config inside a given directory
    pub fn in_dir(dir: &Path) -> Self {
        SnapshotLocation {
            snapshot: dir.join(SNAPSHOT_FILE),
            config: dir.join(CONFIG_FILE),
        }
    }

    /// Resolve the location from optional overrides, defaulting to ~/.taskmgr
    pub fn resolve(
        snapshot: Option<PathBuf>,
        config: Option<PathBuf>,
    ) -> Result<Self, LocationError> {
        let mut location = match &snapshot {
            Some(path) => {
                let dir = path
                    .parent()
                    .ok_or_else(|| LocationError::NoParent(path.clone()))?;
                SnapshotLocation {
                    snapshot: path.clone(),
                    config: dir.join(CONFIG_FILE),
                }
            }
            None => Self::global()?,
        };

        if let Some(config) = config {
            location.config = config;
        }

        Ok(location)
    }

    /// Check if the snapshot file exists
    pub fn exists(&self) -> bool {
        self.snapshot.exists()
    }

    /// Read the snapshot, or `None` when there is none yet
    pub fn read(&self) -> Result<Option<String>, LocationError> {
        if !self.exists() {
            return Ok(None);
        }
        Ok(Some(std::fs::read_to_string(&self.snapshot)?))
    }

    /// Write the snapshot, creating its directory if needed
    pub fn write(&self, content: &str) -> Result<(), LocationError> {
        if let Some(dir) = self.snapshot.parent()
            && !dir.as_os_str().is_empty()
            && !dir.exists()
        {
            std::fs::create_dir_all(dir)?;
        }
        std::fs::write(&self.snapshot, content)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_global_location() {
        let loc = SnapshotLocation::global().unwrap();
        assert!(loc.snapshot.ends_with(".taskmgr/tasks.json"));
        assert!(loc.config.ends_with(".taskmgr/config.yaml"));
    }

    #[test]
    fn test_resolve_with_file_override() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("mine.json");

        let loc = SnapshotLocation::resolve(Some(path.clone()), None).unwrap();
        assert_eq!(loc.snapshot, path);
        assert_eq!(loc.config, temp.path().join("config.yaml"));
    }

    #[test]
    fn test_resolve_with_config_override() {
        let temp = TempDir::new().unwrap();
        let config = temp.path().join("other.yaml");

        let loc =
            SnapshotLocation::resolve(Some(temp.path().join("t.json")), Some(config.clone()))
                .unwrap();
        assert_eq!(loc.config, config);
    }

    #[test]
    fn test_read_missing() {
        let temp = TempDir::new().unwrap();
        let loc = SnapshotLocation::in_dir(temp.path());
        assert!(!loc.exists());
        assert!(loc.read().unwrap().is_none());
    }

    #[test]
    fn test_write_creates_directory() {
        let temp = TempDir::new().unwrap();
        let loc = SnapshotLocation::in_dir(&temp.path().join("nested").join("dir"));

        loc.write("{}").unwrap();
        assert!(loc.exists());
        assert_eq!(loc.read().unwrap().as_deref(), Some("{}"));
    }
}

//! Platform-aware data storage directory management
//!
//! | Type | Windows | macOS | Linux |
//! |------|---------|-------|-------|
//! | Data | `%APPDATA%\Taskboard\` | `~/Library/Application Support/Taskboard/` | `$XDG_DATA_HOME/taskboard/` |

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use directories::ProjectDirs;

use super::config::AppConfig;
use super::constants::{APP_DOT_FOLDER, APP_NAME};

/// Data subdirectories
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataSubdir {
    Sqlite,
    Keys,
}

impl DataSubdir {
    pub const fn as_str(&self) -> &'static str {
        match self {
            DataSubdir::Sqlite => "sqlite",
            DataSubdir::Keys => "keys",
        }
    }

    pub const fn all() -> &'static [DataSubdir] {
        &[DataSubdir::Sqlite, DataSubdir::Keys]
    }
}

/// Application storage manager
#[derive(Debug, Clone)]
pub struct AppStorage {
    data_dir: PathBuf,
}

impl AppStorage {
    /// Initialize storage with the configured or platform-appropriate data directory
    pub async fn init(config: &AppConfig) -> Result<Self> {
        let data_dir = Self::resolve_data_dir(config.data_dir.as_deref());

        Self::ensure_directories(&data_dir).await?;

        // canonicalize requires the path to exist
        let data_dir = data_dir.canonicalize().unwrap_or(data_dir);

        tracing::debug!(data_dir = %data_dir.display(), "Storage initialized");
        Ok(Self { data_dir })
    }

    /// Resolve data directory from an explicit override or the platform default
    pub fn resolve_data_dir(explicit: Option<&Path>) -> PathBuf {
        if let Some(dir) = explicit {
            return dir.to_path_buf();
        }

        if let Some(proj_dirs) = ProjectDirs::from("", "", APP_NAME) {
            return proj_dirs.data_dir().to_path_buf();
        }

        let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
        cwd.join(APP_DOT_FOLDER)
    }

    async fn ensure_directories(data_dir: &Path) -> Result<()> {
        tokio::fs::create_dir_all(data_dir)
            .await
            .with_context(|| format!("Failed to create data directory: {}", data_dir.display()))?;

        for subdir in DataSubdir::all() {
            let path = data_dir.join(subdir.as_str());
            tokio::fs::create_dir_all(&path).await.with_context(|| {
                format!(
                    "Failed to create {} directory: {}",
                    subdir.as_str(),
                    path.display()
                )
            })?;
        }

        Ok(())
    }

    /// Get the data directory path
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Get path to a file within a subdirectory
    pub fn subdir_path(&self, subdir: DataSubdir, filename: &str) -> PathBuf {
        self.data_dir.join(subdir.as_str()).join(filename)
    }

    /// Create AppStorage for testing with a specific data directory
    #[cfg(test)]
    pub fn init_for_test(data_dir: PathBuf) -> Self {
        Self { data_dir }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_data_dir_explicit_wins() {
        let path = AppStorage::resolve_data_dir(Some(Path::new("/srv/taskboard")));
        assert_eq!(path, PathBuf::from("/srv/taskboard"));
    }

    #[test]
    fn test_resolve_data_dir_fallback() {
        let path = AppStorage::resolve_data_dir(None);
        assert!(!path.as_os_str().is_empty());
    }

    #[tokio::test]
    async fn test_ensure_directories_creates_subdirs() {
        let temp = tempfile::tempdir().unwrap();
        let root = temp.path().join("data");
        AppStorage::ensure_directories(&root).await.unwrap();

        for subdir in DataSubdir::all() {
            assert!(root.join(subdir.as_str()).is_dir());
        }

        let storage = AppStorage::init_for_test(root.clone());
        assert_eq!(
            storage.subdir_path(DataSubdir::Keys, "jwt.key"),
            root.join("keys").join("jwt.key")
        );
    }
}

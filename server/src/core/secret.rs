//! Signing key management
//!
//! The JWT signing key is taken from `TASKBOARD_JWT_SECRET` when set, otherwise a
//! random key is generated once and persisted (hex, mode 0600) under the data
//! directory so tokens survive restarts.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use super::constants::{ENV_JWT_SECRET, JWT_KEY_FILENAME, JWT_KEY_LENGTH};
use super::storage::{AppStorage, DataSubdir};
use crate::utils::crypto;

/// Where the signing key was loaded from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SecretBackend {
    Env,
    File(PathBuf),
}

impl SecretBackend {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Env => "environment",
            Self::File(_) => "file",
        }
    }
}

/// Holds the process-wide signing key
pub struct SecretManager {
    backend: SecretBackend,
    jwt_signing_key: Vec<u8>,
}

impl std::fmt::Debug for SecretManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SecretManager")
            .field("backend", &self.backend)
            .field("jwt_signing_key", &"[REDACTED]")
            .finish()
    }
}

impl SecretManager {
    pub async fn init(storage: &AppStorage) -> Result<Self> {
        if let Ok(value) = std::env::var(ENV_JWT_SECRET)
            && !value.trim().is_empty()
        {
            tracing::debug!("Using JWT signing key from environment");
            return Ok(Self {
                backend: SecretBackend::Env,
                jwt_signing_key: value.trim().as_bytes().to_vec(),
            });
        }

        let path = storage.subdir_path(DataSubdir::Keys, JWT_KEY_FILENAME);
        let jwt_signing_key = Self::load_or_create(&path).await?;
        Ok(Self {
            backend: SecretBackend::File(path),
            jwt_signing_key,
        })
    }

    pub fn backend(&self) -> &SecretBackend {
        &self.backend
    }

    pub fn jwt_signing_key(&self) -> &[u8] {
        &self.jwt_signing_key
    }

    async fn load_or_create(path: &Path) -> Result<Vec<u8>> {
        match tokio::fs::read_to_string(path).await {
            Ok(contents) => match hex::decode(contents.trim()) {
                Ok(key) if key.len() == JWT_KEY_LENGTH => {
                    tracing::debug!(path = %path.display(), "Loaded JWT signing key");
                    return Ok(key);
                }
                _ => {
                    tracing::warn!(
                        path = %path.display(),
                        "Stored JWT signing key has invalid format, regenerating"
                    );
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => {
                return Err(e)
                    .with_context(|| format!("Failed to read signing key: {}", path.display()));
            }
        }

        let key = crypto::generate_key(JWT_KEY_LENGTH);
        Self::atomic_write(path, &hex::encode(&key)).await?;
        tracing::debug!(path = %path.display(), "Created new JWT signing key");
        Ok(key)
    }

    async fn atomic_write(path: &Path, contents: &str) -> Result<()> {
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        let tmp_path = path.with_extension("key.tmp");
        tokio::fs::write(&tmp_path, contents)
            .await
            .with_context(|| format!("Failed to write {}", tmp_path.display()))?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            tokio::fs::set_permissions(&tmp_path, std::fs::Permissions::from_mode(0o600)).await?;
        }

        tokio::fs::rename(&tmp_path, path)
            .await
            .with_context(|| format!("Failed to persist {}", path.display()))?;
        Ok(())
    }
}

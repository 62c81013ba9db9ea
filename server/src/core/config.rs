use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::utils::file::expand_path;

use super::cli::CliConfig;
use super::constants::{
    APP_DOT_FOLDER, CONFIG_FILE_NAME, DEFAULT_HOST, DEFAULT_PORT, DEFAULT_TOKEN_TTL_HOURS,
};

// =============================================================================
// File Config Structs (JSON)
// =============================================================================

/// Server configuration section
#[derive(Debug, Default, Clone, Deserialize)]
pub struct ServerFileConfig {
    pub host: Option<String>,
    pub port: Option<u16>,
}

/// Authentication configuration section
#[derive(Debug, Default, Clone, Deserialize)]
pub struct AuthFileConfig {
    pub token_ttl_hours: Option<u32>,
    pub admin_email: Option<String>,
}

/// Storage configuration section
#[derive(Debug, Default, Clone, Deserialize)]
pub struct StorageFileConfig {
    pub data_dir: Option<String>,
}

/// File-based configuration (JSON)
#[derive(Debug, Default, Deserialize)]
pub struct FileConfig {
    pub server: Option<ServerFileConfig>,
    pub auth: Option<AuthFileConfig>,
    pub storage: Option<StorageFileConfig>,
    pub debug: Option<bool>,
    #[serde(flatten)]
    pub extra: serde_json::Value,
}

impl FileConfig {
    /// Load configuration from a JSON file
    fn load_from_file(path: &Path) -> Result<Self> {
        tracing::debug!(path = %path.display(), "Loading config file");
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config: Self = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
        tracing::trace!(config = ?config, "Parsed config file");
        Ok(config)
    }

    /// Warn about unknown fields in the config
    fn warn_unknown_fields(&self) {
        if let serde_json::Value::Object(map) = &self.extra
            && !map.is_empty()
        {
            let keys_str: String = map
                .keys()
                .map(|k| k.as_str())
                .collect::<Vec<_>>()
                .join(", ");
            tracing::warn!(
                fields = %keys_str,
                "Unknown fields in config file (possible typos)"
            );
        }
    }

    /// Merge another FileConfig into this one (other takes precedence)
    fn merge(&mut self, other: FileConfig) {
        if let Some(server) = other.server {
            let current = self.server.get_or_insert_with(ServerFileConfig::default);
            if server.host.is_some() {
                tracing::trace!(host = ?server.host, "Merging server.host");
                current.host = server.host;
            }
            if server.port.is_some() {
                tracing::trace!(port = ?server.port, "Merging server.port");
                current.port = server.port;
            }
        }

        if let Some(auth) = other.auth {
            let current = self.auth.get_or_insert_with(AuthFileConfig::default);
            if auth.token_ttl_hours.is_some() {
                tracing::trace!(ttl = ?auth.token_ttl_hours, "Merging auth.token_ttl_hours");
                current.token_ttl_hours = auth.token_ttl_hours;
            }
            if auth.admin_email.is_some() {
                tracing::trace!(email = ?auth.admin_email, "Merging auth.admin_email");
                current.admin_email = auth.admin_email;
            }
        }

        if let Some(storage) = other.storage {
            let current = self.storage.get_or_insert_with(StorageFileConfig::default);
            if storage.data_dir.is_some() {
                tracing::trace!(data_dir = ?storage.data_dir, "Merging storage.data_dir");
                current.data_dir = storage.data_dir;
            }
        }

        if other.debug.is_some() {
            tracing::trace!(debug = ?other.debug, "Merging debug");
            self.debug = other.debug;
        }
    }
}

// =============================================================================
// Runtime Config Structs (final merged configuration)
// =============================================================================

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

/// Authentication configuration
#[derive(Debug, Clone)]
pub struct AuthConfig {
    pub token_ttl_hours: u32,
    /// Email for the bootstrap administrator (env var takes precedence)
    pub admin_email: Option<String>,
}

/// Final merged application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub auth: AuthConfig,
    /// Explicit data directory, otherwise the platform default is used
    pub data_dir: Option<PathBuf>,
    pub debug: bool,
}

impl AppConfig {
    /// Load configuration from all sources
    ///
    /// Priority (lowest to highest):
    /// 1. Defaults
    /// 2. Profile directory config (~/.taskboard/taskboard.json)
    /// 3. Local directory config OR CLI-specified config path
    /// 4. CLI arguments (which include env var fallbacks via clap)
    pub fn load(cli: &CliConfig) -> Result<Self> {
        tracing::debug!("Loading application configuration");
        tracing::trace!(cli = ?cli, "CLI config");

        let mut file_config = FileConfig::default();
        let mut found_configs: Vec<String> = Vec::new();

        if let Some(profile_path) = get_profile_config_path()
            && profile_path.exists()
        {
            let profile_config = FileConfig::load_from_file(&profile_path)?;
            profile_config.warn_unknown_fields();
            file_config.merge(profile_config);
            found_configs.push(profile_path.display().to_string());
        }

        let overlay_path = if let Some(ref path) = cli.config {
            let expanded = expand_path(&path.to_string_lossy());
            if !expanded.exists() {
                anyhow::bail!("Config file not found: {}", expanded.display());
            }
            Some(expanded)
        } else {
            let local = PathBuf::from(CONFIG_FILE_NAME);
            if local.exists() { Some(local) } else { None }
        };

        if let Some(path) = overlay_path {
            let overlay_config = FileConfig::load_from_file(&path)?;
            overlay_config.warn_unknown_fields();
            file_config.merge(overlay_config);
            found_configs.push(path.display().to_string());
        }

        tracing::debug!(configs = ?found_configs, "Config files loaded");

        Self::from_layers(cli, file_config)
    }

    /// Layer defaults, merged file config and CLI/env overrides
    fn from_layers(cli: &CliConfig, file_config: FileConfig) -> Result<Self> {
        let file_server = file_config.server.unwrap_or_default();
        let file_auth = file_config.auth.unwrap_or_default();
        let file_storage = file_config.storage.unwrap_or_default();

        let host = cli
            .host
            .clone()
            .or(file_server.host)
            .unwrap_or_else(|| DEFAULT_HOST.to_string());
        let port = cli.port.or(file_server.port).unwrap_or(DEFAULT_PORT);

        let token_ttl_hours = cli
            .token_ttl_hours
            .or(file_auth.token_ttl_hours)
            .unwrap_or(DEFAULT_TOKEN_TTL_HOURS);

        let data_dir = cli
            .data_dir
            .as_ref()
            .map(|p| expand_path(&p.to_string_lossy()))
            .or_else(|| file_storage.data_dir.as_deref().map(expand_path));

        let config = Self {
            server: ServerConfig { host, port },
            auth: AuthConfig {
                token_ttl_hours,
                admin_email: file_auth.admin_email,
            },
            data_dir,
            debug: cli.debug || file_config.debug.unwrap_or(false),
        };

        config.validate()?;
        tracing::debug!(
            host = %config.server.host,
            port = config.server.port,
            token_ttl_hours = config.auth.token_ttl_hours,
            debug = config.debug,
            "Configuration loaded"
        );
        Ok(config)
    }

    /// Validate the configuration for consistency and correctness
    fn validate(&self) -> Result<()> {
        if self.server.host.is_empty() {
            anyhow::bail!("Configuration error: server.host must not be empty");
        }
        if self.server.port == 0 {
            anyhow::bail!("Configuration error: server.port must be greater than 0");
        }
        if self.auth.token_ttl_hours == 0 {
            anyhow::bail!("Configuration error: auth.token_ttl_hours must be greater than 0");
        }
        Ok(())
    }
}

/// Get the profile config path (~/.taskboard/taskboard.json)
fn get_profile_config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(APP_DOT_FOLDER).join(CONFIG_FILE_NAME))
}

/// Check if host binds to all network interfaces
pub(crate) fn is_all_interfaces(host: &str) -> bool {
    matches!(host, "0.0.0.0" | "::" | "[::]")
}

//! Configuration service implementation.
//!
//! Loads `ClientConfig` from `config.toml` and applies environment overrides.

use crate::paths::TutorPaths;
use std::path::{Path, PathBuf};
use tutor_core::config::ClientConfig;
use tutor_core::error::Result;

/// Overrides `base_url`.
pub const ENV_BASE_URL: &str = "TUTOR_BASE_URL";

/// Overrides `session_cookie`.
pub const ENV_SESSION_COOKIE: &str = "TUTOR_SESSION_COOKIE";

/// Loads the client configuration.
///
/// A missing file is not an error: defaults are used. A file that exists but
/// does not parse is reported, so a typo never silently points the client at
/// the default server.
#[derive(Debug, Clone)]
pub struct ConfigService {
    path: PathBuf,
}

impl ConfigService {
    /// Uses the platform config file (`~/.config/tutor/config.toml`).
    pub fn new() -> Result<Self> {
        Ok(Self {
            path: TutorPaths::config_file()?,
        })
    }

    /// Uses an explicit config file path.
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the file and applies environment overrides.
    pub fn load(&self) -> Result<ClientConfig> {
        let mut config = self.load_file()?;
        apply_overrides(&mut config, |key| std::env::var(key).ok());
        Ok(config)
    }

    fn load_file(&self) -> Result<ClientConfig> {
        if !self.path.exists() {
            tracing::info!(
                "[ConfigService] No config file at {:?}, using defaults",
                self.path
            );
            return Ok(ClientConfig::default());
        }
        let content = std::fs::read_to_string(&self.path)?;
        let config: ClientConfig = toml::from_str(&content)?;
        tracing::debug!("[ConfigService] Loaded config from {:?}", self.path);
        Ok(config)
    }

    /// Writes `config` to the file, creating parent directories.
    pub fn save(&self, config: &ClientConfig) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(config)?;
        std::fs::write(&self.path, content)?;
        Ok(())
    }
}

fn apply_overrides<F>(config: &mut ClientConfig, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(base_url) = lookup(ENV_BASE_URL).filter(|v| !v.trim().is_empty()) {
        tracing::debug!("[ConfigService] {} overrides base_url", ENV_BASE_URL);
        config.base_url = base_url;
    }
    if let Some(cookie) = lookup(ENV_SESSION_COOKIE).filter(|v| !v.trim().is_empty()) {
        config.session_cookie = Some(cookie);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_yields_defaults() {
        let dir = TempDir::new().unwrap();
        let service = ConfigService::with_path(dir.path().join("config.toml"));
        let config = service.load_file().unwrap();
        assert_eq!(config, ClientConfig::default());
    }

    #[test]
    fn test_save_then_load() {
        let dir = TempDir::new().unwrap();
        let service = ConfigService::with_path(dir.path().join("nested").join("config.toml"));
        let mut config = ClientConfig::default();
        config.base_url = "https://tutor.example.org".to_string();
        config.session_cookie = Some("session=abc".to_string());
        service.save(&config).unwrap();
        assert_eq!(service.load_file().unwrap(), config);
    }

    #[test]
    fn test_invalid_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "base_url = [").unwrap();
        let err = ConfigService::with_path(path).load_file().unwrap_err();
        assert!(matches!(err, tutor_core::TutorError::Serialization { .. }));
    }

    #[test]
    fn test_env_overrides() {
        let mut config = ClientConfig::default();
        apply_overrides(&mut config, |key| match key {
            ENV_BASE_URL => Some("http://localhost:9000".to_string()),
            ENV_SESSION_COOKIE => Some("  ".to_string()),
            _ => None,
        });
        assert_eq!(config.base_url, "http://localhost:9000");
        assert_eq!(config.session_cookie, None);
    }
}

//! Unified path management for tutor configuration files.
//!
//! Paths are resolved with the `dirs` crate so every platform gets its
//! conventional location.
//!
//! # Directory Structure
//!
//! ```text
//! ~/.config/tutor/             # Config directory
//! ├── config.toml              # Client configuration
//! └── preferences.toml         # Sidebar and theme preferences
//!
//! ~/.local/share/tutor/        # Data directory
//! └── logs/                    # Application logs
//!     └── tutor.log.YYYY-MM-DD
//! ```

use std::path::PathBuf;

const APP_DIR: &str = "tutor";

/// Errors that can occur during path resolution.
#[derive(Debug)]
pub enum PathError {
    /// Home directory could not be determined.
    HomeDirNotFound,
}

impl std::fmt::Display for PathError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PathError::HomeDirNotFound => write!(f, "Cannot find home directory"),
        }
    }
}

impl std::error::Error for PathError {}

impl From<PathError> for tutor_core::TutorError {
    fn from(err: PathError) -> Self {
        tutor_core::TutorError::config(err.to_string())
    }
}

/// Unified path management for tutor.
pub struct TutorPaths;

impl TutorPaths {
    /// Returns the tutor configuration directory (e.g. `~/.config/tutor/`).
    pub fn config_dir() -> Result<PathBuf, PathError> {
        dirs::config_dir()
            .map(|d| d.join(APP_DIR))
            .ok_or(PathError::HomeDirNotFound)
    }

    /// Returns the tutor data directory (e.g. `~/.local/share/tutor/`).
    pub fn data_dir() -> Result<PathBuf, PathError> {
        dirs::data_dir()
            .map(|d| d.join(APP_DIR))
            .ok_or(PathError::HomeDirNotFound)
    }

    /// Returns the path to the main configuration file.
    pub fn config_file() -> Result<PathBuf, PathError> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    /// Returns the path to the UI preferences file.
    pub fn preferences_file() -> Result<PathBuf, PathError> {
        Ok(Self::config_dir()?.join("preferences.toml"))
    }

    /// Returns the directory rolling log files are written to.
    pub fn log_dir() -> Result<PathBuf, PathError> {
        Ok(Self::data_dir()?.join("logs"))
    }
}

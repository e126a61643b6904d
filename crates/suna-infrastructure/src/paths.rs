//! Path resolution for the on-disk store.
//!
//! All engine state lives in a single JSON file under the platform config
//! directory:
//!
//! ```text
//! ~/.config/suna/              # Config directory (XDG on Linux/macOS)
//! └── store.json               # Key-value store backing the engine
//! ```

use std::path::PathBuf;

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

/// Path management for suna.
pub struct SunaPaths;

impl SunaPaths {
    /// Returns the suna configuration directory.
    ///
    /// # Returns
    ///
    /// - `Ok(PathBuf)`: Path to config directory (e.g., `~/.config/suna/`)
    /// - `Err(PathError::HomeDirNotFound)`: Could not determine directory
    pub fn config_dir() -> Result<PathBuf, PathError> {
        dirs::config_dir()
            .map(|dir| dir.join("suna"))
            .ok_or(PathError::HomeDirNotFound)
    }

    /// Returns the path to the key-value store file.
    pub fn store_file() -> Result<PathBuf, PathError> {
        Ok(Self::config_dir()?.join("store.json"))
    }
}

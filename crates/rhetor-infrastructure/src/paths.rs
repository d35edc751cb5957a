//! Path management for rhetor configuration files.
//!
//! # Directory Structure
//!
//! ```text
//! ~/.config/rhetor/            # Config directory
//! ├── progress.toml            # Cumulative progress (points, badges)
//! └── challenges/              # User-defined challenge catalog
//!     └── *.toml
//! ```

use rhetor_core::error::{Result, RhetorError};
use std::path::PathBuf;

/// Unified path resolution for rhetor.
pub struct RhetorPaths;

impl RhetorPaths {
    /// Returns the rhetor configuration directory
    /// (e.g. `~/.config/rhetor/`).
    pub fn config_dir() -> Result<PathBuf> {
        dirs::config_dir()
            .map(|dir| dir.join("rhetor"))
            .ok_or_else(|| RhetorError::config("Cannot determine config directory"))
    }

    /// Returns the progress file path.
    pub fn progress_file() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("progress.toml"))
    }

    /// Returns the user challenge catalog directory.
    pub fn challenges_dir() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("challenges"))
    }
}

//! Unified path management for voyago durable state.
//!
//! All slice records live as individual files under one state directory.
//! This ensures consistency across all platforms (Linux, macOS, Windows).

use std::path::PathBuf;

use voyago_core::VoyagoError;
use voyago_core::error::Result;

/// Unified path management for voyago.
///
/// # Directory Structure
///
/// ```text
/// ~/.config/voyago/            # Config directory (platform dependent)
/// └── state/                   # Durable slice records (FileKeyValueStore)
///     ├── user.json
///     ├── userPreferences.json
///     ├── theme.json
///     └── checklist.json
/// ```
pub struct VoyagoPaths;

impl VoyagoPaths {
    /// Returns the voyago configuration directory.
    ///
    /// # Returns
    ///
    /// - `Ok(PathBuf)`: Path to config directory (e.g., `~/.config/voyago/`)
    /// - `Err`: Could not determine the platform config directory
    pub fn config_dir() -> Result<PathBuf> {
        dirs::config_dir()
            .map(|dir| dir.join("voyago"))
            .ok_or_else(|| VoyagoError::io("cannot determine the platform config directory"))
    }

    /// Returns the directory holding the durable slice records.
    pub fn state_dir() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("state"))
    }
}

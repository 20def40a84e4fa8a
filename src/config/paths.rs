//! Path management for costshare
//!
//! Provides XDG-compliant path resolution for configuration, the draft, and
//! committed statements.
//!
//! ## Path Resolution Order
//!
//! 1. `COSTSHARE_DATA_DIR` environment variable (if set)
//! 2. Unix (Linux/macOS): `$XDG_CONFIG_HOME/costshare` or `~/.config/costshare`
//! 3. Windows: `%APPDATA%\costshare`

use std::path::PathBuf;

use crate::error::CostshareError;
use crate::models::StatementId;

/// Environment variable overriding the base directory
pub const DATA_DIR_ENV: &str = "COSTSHARE_DATA_DIR";

/// Manages all paths used by costshare
#[derive(Debug, Clone)]
pub struct CostsharePaths {
    base_dir: PathBuf,
}

impl CostsharePaths {
    /// Resolve the base directory from the environment
    ///
    /// # Errors
    ///
    /// Returns an error if neither the override nor a home directory is set.
    pub fn new() -> Result<Self, CostshareError> {
        let base_dir = match std::env::var(DATA_DIR_ENV) {
            Ok(custom) if !custom.trim().is_empty() => PathBuf::from(custom),
            _ => resolve_default_path()?,
        };

        Ok(Self { base_dir })
    }

    /// Create paths under a custom base directory (useful for testing)
    pub fn with_base_dir(base_dir: PathBuf) -> Self {
        Self { base_dir }
    }

    pub fn base_dir(&self) -> &PathBuf {
        &self.base_dir
    }

    /// ~/.config/costshare/data/
    pub fn data_dir(&self) -> PathBuf {
        self.base_dir.join("data")
    }

    /// ~/.config/costshare/data/statements/
    pub fn statements_dir(&self) -> PathBuf {
        self.data_dir().join("statements")
    }

    pub fn settings_file(&self) -> PathBuf {
        self.base_dir.join("config.json")
    }

    pub fn audit_log(&self) -> PathBuf {
        self.base_dir.join("audit.log")
    }

    /// The single draft slot
    pub fn draft_file(&self) -> PathBuf {
        self.data_dir().join("draft.json")
    }

    pub fn statement_file(&self, id: StatementId) -> PathBuf {
        self.statements_dir().join(format!("{}.json", id.as_uuid()))
    }

    /// Create the base, data and statements directories
    pub fn ensure_directories(&self) -> Result<(), CostshareError> {
        std::fs::create_dir_all(self.statements_dir()).map_err(|e| {
            CostshareError::Io(format!(
                "Failed to create data directory {}: {}",
                self.statements_dir().display(),
                e
            ))
        })
    }

    /// Whether `costshare init` has been run (config file exists)
    pub fn is_initialized(&self) -> bool {
        self.settings_file().exists()
    }
}

#[cfg(not(windows))]
fn resolve_default_path() -> Result<PathBuf, CostshareError> {
    let config_base = match std::env::var("XDG_CONFIG_HOME") {
        Ok(xdg) if !xdg.is_empty() => PathBuf::from(xdg),
        _ => {
            let home = std::env::var("HOME").map_err(|_| {
                CostshareError::Config(format!(
                    "Could not determine home directory; set {}",
                    DATA_DIR_ENV
                ))
            })?;
            PathBuf::from(home).join(".config")
        }
    };
    Ok(config_base.join("costshare"))
}

#[cfg(windows)]
fn resolve_default_path() -> Result<PathBuf, CostshareError> {
    let appdata = std::env::var("APPDATA")
        .map_err(|_| CostshareError::Config("Could not determine APPDATA directory".into()))?;
    Ok(PathBuf::from(appdata).join("costshare"))
}

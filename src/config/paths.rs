//! Where cashplan keeps its files
//!
//! The base directory is `$CASHPLAN_DATA_DIR` when set. Otherwise it is
//! `$XDG_CONFIG_HOME/cashplan` (falling back to `~/.config/cashplan`) on
//! Unix and `%APPDATA%\cashplan` on Windows.
//!
//! ```text
//! <base>/config.json        settings
//! <base>/audit.log          JSONL audit trail
//! <base>/data/buckets.json
//! <base>/data/goals.json    goals and their payments
//! <base>/data/ledger.json
//! ```

use std::path::{Path, PathBuf};

use crate::error::CashplanError;

/// Environment variable that overrides the base directory
pub const DATA_DIR_ENV: &str = "CASHPLAN_DATA_DIR";

const APP_DIR: &str = "cashplan";

#[derive(Debug, Clone)]
pub struct CashplanPaths {
    base_dir: PathBuf,
}

impl CashplanPaths {
    /// Resolve the base directory from the environment
    pub fn new() -> Result<Self, CashplanError> {
        let base_dir = match std::env::var_os(DATA_DIR_ENV) {
            Some(dir) if !dir.is_empty() => PathBuf::from(dir),
            _ => platform_config_dir()?.join(APP_DIR),
        };
        Ok(Self { base_dir })
    }

    /// Use an explicit base directory, as tests do
    pub fn with_base_dir(base_dir: PathBuf) -> Self {
        Self { base_dir }
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Settings and the audit log live directly in the base directory
    pub fn config_dir(&self) -> PathBuf {
        self.base_dir.clone()
    }

    pub fn data_dir(&self) -> PathBuf {
        self.base_dir.join("data")
    }

    pub fn settings_file(&self) -> PathBuf {
        self.base_dir.join("config.json")
    }

    pub fn audit_log(&self) -> PathBuf {
        self.base_dir.join("audit.log")
    }

    pub fn buckets_file(&self) -> PathBuf {
        self.data_dir().join("buckets.json")
    }

    pub fn goals_file(&self) -> PathBuf {
        self.data_dir().join("goals.json")
    }

    pub fn ledger_file(&self) -> PathBuf {
        self.data_dir().join("ledger.json")
    }

    /// Create the base and data directories if they are missing
    pub fn ensure_directories(&self) -> Result<(), CashplanError> {
        let data_dir = self.data_dir();
        std::fs::create_dir_all(&data_dir).map_err(|e| {
            CashplanError::Io(format!("Failed to create {}: {}", data_dir.display(), e))
        })
    }

    /// `cashplan init` has run when the settings file exists
    pub fn is_initialized(&self) -> bool {
        self.settings_file().exists()
    }
}

#[cfg(not(windows))]
fn platform_config_dir() -> Result<PathBuf, CashplanError> {
    if let Some(xdg) = std::env::var_os("XDG_CONFIG_HOME").filter(|v| !v.is_empty()) {
        return Ok(PathBuf::from(xdg));
    }
    std::env::var_os("HOME")
        .map(|home| PathBuf::from(home).join(".config"))
        .ok_or_else(|| CashplanError::Config("HOME environment variable not set".into()))
}

#[cfg(windows)]
fn platform_config_dir() -> Result<PathBuf, CashplanError> {
    std::env::var_os("APPDATA")
        .map(PathBuf::from)
        .ok_or_else(|| CashplanError::Config("Could not determine APPDATA directory".into()))
}

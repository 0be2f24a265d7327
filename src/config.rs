//! Caller-owned monitor configuration
//!
//! The sampling core carries no configuration state of its own; the caller
//! owns the poll interval and display unit and hands them to the facade.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{Error, Result};
use crate::units::{SpeedUnit, UpdateInterval};

/// Polling and display preferences.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonitorConfig {
    /// Poll period
    #[serde(default)]
    pub interval: UpdateInterval,
    /// Unit for rendered rates
    #[serde(default)]
    pub unit: SpeedUnit,
}

impl MonitorConfig {
    /// Load configuration from a TOML file.
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        toml::from_str(&contents).map_err(|e| Error::Parse(format!("failed to parse config: {}", e)))
    }

    /// Save configuration to a TOML file.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        let contents = toml::to_string_pretty(self)
            .map_err(|e| Error::Parse(format!("failed to serialize config: {}", e)))?;
        std::fs::write(path, contents)?;
        Ok(())
    }
}

//! TOML-based engine configuration.
//!
//! Every field has a default, so an empty document is a valid configuration:
//!
//! ```toml
//! default_task_minutes = 60
//! horizon_days = 7
//! include_completed_tasks = false
//!
//! [activity_window]
//! start_hour = 8
//! end_hour = 22
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{EngineError, Result};
use crate::freeslot::ActivityWindow;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Duration given to tasks with no estimate.
    #[serde(default = "default_task_minutes")]
    pub default_task_minutes: i64,
    /// Days searched by free-slot search when the caller does not say.
    #[serde(default = "default_horizon_days")]
    pub horizon_days: i64,
    /// Whether completed tasks still occupy their time.
    #[serde(default)]
    pub include_completed_tasks: bool,
    #[serde(default)]
    pub activity_window: ActivityWindow,
}

fn default_task_minutes() -> i64 {
    60
}

fn default_horizon_days() -> i64 {
    7
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            default_task_minutes: default_task_minutes(),
            horizon_days: default_horizon_days(),
            include_completed_tasks: false,
            activity_window: ActivityWindow::default(),
        }
    }
}

impl EngineConfig {
    /// Parse and validate a TOML document.
    ///
    /// # Errors
    /// Returns `EngineError::Config` for malformed TOML, an invalid activity
    /// window, or a non-positive default task duration.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: EngineConfig =
            toml::from_str(text).map_err(|e| EngineError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Read and validate a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|e| EngineError::Config(format!("{}: {}", path.display(), e)))?;
        Self::from_toml_str(&text)
    }

    pub fn validate(&self) -> Result<()> {
        if self.default_task_minutes <= 0 {
            return Err(EngineError::Config(format!(
                "default_task_minutes must be positive, got {}",
                self.default_task_minutes
            )));
        }
        Ok(())
    }

    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string(self).map_err(|e| EngineError::Config(e.to_string()))
    }
}

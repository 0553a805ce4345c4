use crate::error::{GridError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Tunables for a grid instance. Every field has a default, so an empty
/// YAML document is a valid config.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    pub page_size: usize,
    /// Quiet period before the filter change callback fires.
    pub debounce_ms: u64,
    pub refresh_interval_secs: u64,
    /// How many facet chips a text column offers.
    pub facet_limit: usize,
    pub multi_sort: bool,
    /// Jump back to the first page whenever filters or the global query change.
    pub reset_page_on_filter_change: bool,
}

impl Default for GridConfig {
    fn default() -> Self {
        GridConfig {
            page_size: 10,
            debounce_ms: 150,
            refresh_interval_secs: 30,
            facet_limit: 10,
            multi_sort: false,
            reset_page_on_filter_change: false,
        }
    }
}

impl GridConfig {
    /// Parse a config from YAML
    pub fn from_yaml_str(content: &str) -> Result<Self> {
        let config: GridConfig = serde_yaml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a config file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&content)
    }

    fn validate(&self) -> Result<()> {
        if self.page_size == 0 {
            return Err(GridError::Config("page_size must be at least 1".into()));
        }
        if self.refresh_interval_secs == 0 {
            return Err(GridError::Config(
                "refresh_interval_secs must be at least 1".into(),
            ));
        }
        Ok(())
    }

    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.refresh_interval_secs)
    }
}

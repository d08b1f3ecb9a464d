//! Runtime settings of the visualizer, read from an optional TOML file.
//!
//! ```toml
//! rows = 50
//! steps_per_second = 60
//! path_delay_ms = 30
//! log_level = "warn"
//! log_file = "pathfinding-visualizer.log"
//! ```

use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use log::info;
use serde::Deserialize;

use crate::error::ConfigError;
use crate::pathing_grid::MAX_ROWS;
use crate::DEFAULT_ROWS;

/// Environment variable naming an explicit config file.
pub const CONFIG_ENV: &str = "PATHFINDING_VISUALIZER_CONFIG";

/// Config file picked up from the working directory when [CONFIG_ENV] is unset.
pub const DEFAULT_CONFIG_FILE: &str = "pathfinding-visualizer.toml";

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct VisualizerConfig {
    /// Rows (and columns) of the grid.
    pub rows: usize,
    /// Search steps rendered per second. 0 runs searches unthrottled.
    pub steps_per_second: u32,
    /// Pause between drawing consecutive cells of a found path.
    pub path_delay_ms: u64,
    /// `env_logger` filter used when `RUST_LOG` is unset.
    pub log_level: String,
    /// Log destination. Logging to the terminal would draw over the grid, so by default only
    /// warnings are written to stderr.
    pub log_file: Option<PathBuf>,
}

impl Default for VisualizerConfig {
    fn default() -> Self {
        VisualizerConfig {
            rows: DEFAULT_ROWS,
            steps_per_second: 60,
            path_delay_ms: 30,
            log_level: "warn".to_owned(),
            log_file: None,
        }
    }
}

impl VisualizerConfig {
    /// Loads the file named by [CONFIG_ENV], else [DEFAULT_CONFIG_FILE] if it exists, else the
    /// defaults.
    pub fn load() -> Result<VisualizerConfig, ConfigError> {
        if let Some(path) = env::var_os(CONFIG_ENV) {
            return VisualizerConfig::from_file(Path::new(&path));
        }
        let default_path = Path::new(DEFAULT_CONFIG_FILE);
        if default_path.exists() {
            return VisualizerConfig::from_file(default_path);
        }
        Ok(VisualizerConfig::default())
    }

    pub fn from_file(path: &Path) -> Result<VisualizerConfig, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_owned(),
            source,
        })?;
        let config = VisualizerConfig::from_toml_str(&contents)?;
        info!("Loaded config from {}", path.display());
        Ok(config)
    }

    pub fn from_toml_str(contents: &str) -> Result<VisualizerConfig, ConfigError> {
        let config: VisualizerConfig = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.rows == 0 {
            return Err(ConfigError::Invalid("rows must be at least 1".to_owned()));
        }
        if self.rows > MAX_ROWS {
            return Err(ConfigError::Invalid(format!(
                "rows must be at most {MAX_ROWS}, got {}",
                self.rows
            )));
        }
        Ok(())
    }

    pub fn path_delay(&self) -> Duration {
        Duration::from_millis(self.path_delay_ms)
    }
}

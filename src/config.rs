//! Planner tuning.
//!
//! Every field has a default, so a config file only needs the keys it
//! overrides.

use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::plan::strategy::STRATEGY_COUNT;

/// Errors that can occur while loading a config file.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Tunable constants for the turn planner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlannerConfig {
    /// Below this much time left, no further orders are issued this turn.
    pub min_turn_time_ms: u64,
    /// Below this much time left, new goals use the cheap Scatter handler.
    pub critical_time_ms: u64,
    /// Battlefield signals count objects within this many attack radii of
    /// the friendly centroid.
    pub signal_range_multiple: f64,
    /// Cap on cells expanded by one local path search.
    pub search_node_limit: usize,
    /// Starting weight per strategy, in enumeration order.
    pub initial_weights: [f64; STRATEGY_COUNT],
}

impl Default for PlannerConfig {
    fn default() -> Self {
        PlannerConfig {
            min_turn_time_ms: 10,
            critical_time_ms: 50,
            signal_range_multiple: 3.0,
            search_node_limit: 2000,
            // Fight, Scout, GatherFood, Scatter, Condense, Retreat, SpreadOut
            initial_weights: [0.4, 0.6, 1.0, 0.2, 0.3, 0.2, 0.5],
        }
    }
}

impl PlannerConfig {
    /// Parses a JSON config, filling unspecified fields with defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: PlannerConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads and parses a JSON config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if let Some(w) = self
            .initial_weights
            .iter()
            .find(|w| !w.is_finite() || **w < 0.0)
        {
            return Err(ConfigError::Invalid(format!(
                "initial weights must be finite and non-negative, got {}",
                w
            )));
        }
        if !(self.signal_range_multiple > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "signal_range_multiple must be positive, got {}",
                self.signal_range_multiple
            )));
        }
        if self.critical_time_ms < self.min_turn_time_ms {
            return Err(ConfigError::Invalid(
                "critical_time_ms must not be below min_turn_time_ms".to_string(),
            ));
        }
        Ok(())
    }

    pub const fn min_turn_time(&self) -> Duration {
        Duration::from_millis(self.min_turn_time_ms)
    }

    pub const fn critical_time(&self) -> Duration {
        Duration::from_millis(self.critical_time_ms)
    }
}

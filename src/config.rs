//! Configuration for the prover and the constraint scheduler.

use crate::errors::ConfigError;
use serde::Deserialize;
use std::path::Path;

/// Top-level prover configuration, loadable from TOML.
///
/// ```toml
/// [scheduler]
/// max_task_weight = 750
/// reduce_transitive_edges = false
/// ```
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
pub struct ProverConfig {
    /// Settings for the constraint dependency scheduler.
    #[serde(default)]
    pub scheduler: SchedulerConfig,
}

impl ProverConfig {
    /// Parses a configuration from a TOML string. Missing keys take defaults.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(s)?)
    }

    /// Loads a configuration from a TOML file.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path.as_ref())?;
        Self::from_toml_str(&contents)
    }
}

/// Settings for the constraint dependency scheduler.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct SchedulerConfig {
    /// Cumulative node weight after which a task is closed. A task may
    /// exceed this by the weight of its last node.
    #[serde(default = "SchedulerConfig::default_max_task_weight")]
    pub max_task_weight: usize,
    /// Remove parent edges already implied by another parent. Slows down
    /// graph construction; level membership may change, never correctness.
    #[serde(default)]
    pub reduce_transitive_edges: bool,
}

impl SchedulerConfig {
    /// Default task weight bound.
    pub const DEFAULT_MAX_TASK_WEIGHT: usize = 750;

    fn default_max_task_weight() -> usize {
        Self::DEFAULT_MAX_TASK_WEIGHT
    }
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            max_task_weight: Self::default_max_task_weight(),
            reduce_transitive_edges: false,
        }
    }
}

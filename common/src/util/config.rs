use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("routing.base_cost must be at least 1")]
    ZeroBaseCost,
    #[error("routing.max_expansions must be at least 1")]
    ZeroExpansionBudget,
    #[error("output.image_scale must be between 1 and 64, got {0}")]
    ImageScale(u32),
}

#[derive(Debug, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub routing: RoutingConfig,
    #[serde(default)]
    pub input: InputConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

impl Config {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.routing.base_cost == 0 {
            return Err(ConfigError::ZeroBaseCost);
        }
        if self.routing.max_expansions == 0 {
            return Err(ConfigError::ZeroExpansionBudget);
        }
        if !(1..=64).contains(&self.output.image_scale) {
            return Err(ConfigError::ImageScale(self.output.image_scale));
        }
        Ok(())
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct RoutingConfig {
    /// Cost of one grid step.
    #[serde(default = "default_base_cost")]
    pub base_cost: u32,
    /// Extra cost whenever a path changes direction.
    #[serde(default = "default_bend_penalty")]
    pub bend_penalty: u32,
    #[serde(default = "default_max_expansions")]
    pub max_expansions: u64,
    /// Threshold rounds allowed to IDA*.
    #[serde(default = "default_ida_max_iterations")]
    pub ida_max_iterations: u64,
    /// Wall-clock limit per search, 0 disables it.
    #[serde(default = "default_time_limit_ms")]
    pub time_limit_ms: u64,
    #[serde(default = "default_algorithm")]
    pub algorithm: String,
}

impl RoutingConfig {
    pub fn time_limit(&self) -> Option<Duration> {
        (self.time_limit_ms > 0).then(|| Duration::from_millis(self.time_limit_ms))
    }
}

impl Default for RoutingConfig {
    fn default() -> Self {
        Self {
            base_cost: default_base_cost(),
            bend_penalty: default_bend_penalty(),
            max_expansions: default_max_expansions(),
            ida_max_iterations: default_ida_max_iterations(),
            time_limit_ms: default_time_limit_ms(),
            algorithm: default_algorithm(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct InputConfig {
    #[serde(default = "default_layout_file")]
    pub layout_file: String,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            layout_file: default_layout_file(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct OutputConfig {
    #[serde(default)]
    pub image_file: Option<String>,
    /// Pixels per grid cell.
    #[serde(default = "default_image_scale")]
    pub image_scale: u32,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            image_file: None,
            image_scale: default_image_scale(),
        }
    }
}

fn default_base_cost() -> u32 {
    1
}

fn default_bend_penalty() -> u32 {
    1
}

fn default_max_expansions() -> u64 {
    2_000_000
}

fn default_ida_max_iterations() -> u64 {
    10_000
}

fn default_time_limit_ms() -> u64 {
    5_000
}

fn default_algorithm() -> String {
    "astar".to_string()
}

fn default_layout_file() -> String {
    "inputs/layout.toml".to_string()
}

fn default_image_scale() -> u32 {
    16
}

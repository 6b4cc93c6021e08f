use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Default)]
pub struct Config {
    #[serde(default)]
    pub tracker: TrackerConfig,
    #[serde(default)]
    pub smoothing: SmoothingConfig,
    #[serde(default)]
    pub slider: SliderConfig,
    #[serde(default)]
    pub actions: ActionsConfig,
    #[serde(default)]
    pub queue: QueueConfig,
}

/// How to launch the gesture tracker process.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct TrackerConfig {
    #[serde(default = "default_tracker_command")]
    pub command: String,
    #[serde(default)]
    pub args: Vec<String>,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            command: default_tracker_command(),
            args: Vec::new(),
        }
    }
}

fn default_tracker_command() -> String {
    "handtrackd".to_string()
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct SmoothingConfig {
    /// Period of the convergence/fade tick.
    #[serde(default = "default_tick_ms")]
    pub tick_ms: u64,
    /// Volume units moved toward the target per tick.
    #[serde(default = "default_volume_step")]
    pub volume_step: i32,
    /// Rate units moved toward the target per tick.
    #[serde(default = "default_rate_step")]
    pub rate_step: f32,
}

impl Default for SmoothingConfig {
    fn default() -> Self {
        Self {
            tick_ms: default_tick_ms(),
            volume_step: default_volume_step(),
            rate_step: default_rate_step(),
        }
    }
}

fn default_tick_ms() -> u64 {
    50
}

fn default_volume_step() -> i32 {
    2
}

fn default_rate_step() -> f32 {
    0.05
}

/// Slider-mode gains and dead-zones. Empirically chosen values; tune here,
/// they are not a contract.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct SliderConfig {
    #[serde(default = "default_rate_dead_zone_px")]
    pub rate_dead_zone_px: i32,
    #[serde(default = "default_rate_gain")]
    pub rate_gain: f32,
    #[serde(default = "default_volume_dead_zone_px")]
    pub volume_dead_zone_px: i32,
    #[serde(default = "default_volume_gain")]
    pub volume_gain: f32,
}

impl Default for SliderConfig {
    fn default() -> Self {
        Self {
            rate_dead_zone_px: default_rate_dead_zone_px(),
            rate_gain: default_rate_gain(),
            volume_dead_zone_px: default_volume_dead_zone_px(),
            volume_gain: default_volume_gain(),
        }
    }
}

fn default_rate_dead_zone_px() -> i32 {
    15
}

fn default_rate_gain() -> f32 {
    0.005
}

fn default_volume_dead_zone_px() -> i32 {
    10
}

fn default_volume_gain() -> f32 {
    0.75
}

/// Step sizes applied when the producer sends pre-mapped action lines.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct ActionsConfig {
    #[serde(default = "default_action_volume_step")]
    pub volume_step: i32,
    #[serde(default = "default_action_rate_step")]
    pub rate_step: f32,
}

impl Default for ActionsConfig {
    fn default() -> Self {
        Self {
            volume_step: default_action_volume_step(),
            rate_step: default_action_rate_step(),
        }
    }
}

fn default_action_volume_step() -> i32 {
    8
}

fn default_action_rate_step() -> f32 {
    0.25
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct QueueConfig {
    /// Bound on the reader-thread to control-loop channel.
    #[serde(default = "default_capacity")]
    pub capacity: usize,
    /// Lines consumed per tick, so a backlog cannot starve the tick work.
    #[serde(default = "default_max_lines_per_tick")]
    pub max_lines_per_tick: usize,
}

impl Default for QueueConfig {
    fn default() -> Self {
        Self {
            capacity: default_capacity(),
            max_lines_per_tick: default_max_lines_per_tick(),
        }
    }
}

fn default_capacity() -> usize {
    256
}

fn default_max_lines_per_tick() -> usize {
    16
}

pub fn load_config(path: Option<PathBuf>) -> Result<Config> {
    let config_path = path.unwrap_or_else(default_config_path);

    if !config_path.exists() {
        tracing::info!("Config file not found at {:?}, using defaults", config_path);
        return Ok(Config::default());
    }

    tracing::info!("Loading config from {:?}", config_path);
    let config_str = std::fs::read_to_string(&config_path)
        .map_err(|e| anyhow::anyhow!("Failed to read config file: {}", e))?;

    let config: Config = toml::from_str(&config_str)
        .map_err(|e| anyhow::anyhow!("Failed to parse config file: {}", e))?;

    Ok(config)
}

fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("handctl")
        .join("config.toml")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();

        assert_eq!(config.tracker.command, "handtrackd");
        assert_eq!(config.smoothing.tick_ms, 50);
        assert_eq!(config.smoothing.volume_step, 2);
        assert_eq!(config.smoothing.rate_step, 0.05);
        assert_eq!(config.slider.rate_dead_zone_px, 15);
        assert_eq!(config.slider.rate_gain, 0.005);
        assert_eq!(config.slider.volume_dead_zone_px, 10);
        assert_eq!(config.slider.volume_gain, 0.75);
        assert_eq!(config.actions.volume_step, 8);
        assert_eq!(config.actions.rate_step, 0.25);
        assert_eq!(config.queue.capacity, 256);
        assert_eq!(config.queue.max_lines_per_tick, 16);
    }

    #[test]
    fn test_config_toml_round_trip() {
        let config = Config::default();
        let toml_str = toml::to_string(&config).unwrap();
        let parsed: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(config, parsed);
    }

    #[test]
    fn test_partial_config_fills_defaults() {
        let toml_str = r#"
            [slider]
            rate_gain = 0.01

            [queue]
            max_lines_per_tick = 4
        "#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.slider.rate_gain, 0.01);
        assert_eq!(config.slider.rate_dead_zone_px, 15);
        assert_eq!(config.queue.max_lines_per_tick, 4);
        assert_eq!(config.queue.capacity, 256);
    }
}

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Default)]
pub struct Config {
    #[serde(default)]
    pub source: SourceConfig,
    #[serde(default)]
    pub classify: ClassifyConfig,
    #[serde(default)]
    pub debounce: DebounceConfig,
    #[serde(default)]
    pub gating: GatingConfig,
}

/// How to reach the external landmark model: a command whose stdout carries
/// one JSON frame record per line.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct SourceConfig {
    #[serde(default = "default_source_command")]
    pub command: String,
    #[serde(default = "default_source_args")]
    pub args: Vec<String>,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            command: default_source_command(),
            args: default_source_args(),
        }
    }
}

fn default_source_command() -> String {
    "python3".to_string()
}

fn default_source_args() -> Vec<String> {
    vec!["-u".to_string(), "hand_landmarker.py".to_string()]
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct ClassifyConfig {
    /// "basic" (finger counts only) or "pointing" (adds Pointing Up/Down
    /// and Thumbs Up).
    #[serde(default = "default_vocabulary")]
    pub vocabulary: String,
    /// Scale on the index joint spacing used as the pointing tolerance band.
    #[serde(default = "default_pointing_buffer_scale")]
    pub pointing_buffer_scale: f32,
}

impl Default for ClassifyConfig {
    fn default() -> Self {
        Self {
            vocabulary: default_vocabulary(),
            pointing_buffer_scale: default_pointing_buffer_scale(),
        }
    }
}

fn default_vocabulary() -> String {
    "basic".to_string()
}

fn default_pointing_buffer_scale() -> f32 {
    0.5
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct DebounceConfig {
    /// Minimum dwell time before a changed raw gesture may update the
    /// displayed gesture.
    #[serde(default = "default_cooldown_ms")]
    pub cooldown_ms: u64,
}

impl Default for DebounceConfig {
    fn default() -> Self {
        Self {
            cooldown_ms: default_cooldown_ms(),
        }
    }
}

fn default_cooldown_ms() -> u64 {
    500
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct GatingConfig {
    #[serde(default)]
    pub enabled: bool,
    /// Fraction of the frame treated as inactive border on every edge.
    #[serde(default = "default_edge_margin")]
    pub edge_margin: f32,
    /// A hand that moved more than this many pixels since the previous
    /// frame is not considered still.
    #[serde(default = "default_motion_threshold_px")]
    pub motion_threshold_px: i32,
}

impl Default for GatingConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            edge_margin: default_edge_margin(),
            motion_threshold_px: default_motion_threshold_px(),
        }
    }
}

fn default_edge_margin() -> f32 {
    0.1
}

fn default_motion_threshold_px() -> i32 {
    10
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
        .join("handtrackd")
        .join("config.toml")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();

        assert_eq!(config.source.command, "python3");
        assert_eq!(config.classify.vocabulary, "basic");
        assert_eq!(config.classify.pointing_buffer_scale, 0.5);
        assert_eq!(config.debounce.cooldown_ms, 500);
        assert!(!config.gating.enabled);
        assert_eq!(config.gating.edge_margin, 0.1);
        assert_eq!(config.gating.motion_threshold_px, 10);
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
            [debounce]
            cooldown_ms = 250

            [gating]
            enabled = true
        "#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.debounce.cooldown_ms, 250);
        assert!(config.gating.enabled);
        assert_eq!(config.gating.motion_threshold_px, 10);
        assert_eq!(config.classify.vocabulary, "basic");
    }
}

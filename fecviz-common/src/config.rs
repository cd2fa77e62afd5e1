use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisplayConfig {
    #[serde(default = "default_theme")]
    pub theme: String,
}

fn default_theme() -> String {
    "dark".into()
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self { theme: default_theme() }
    }
}

/// How the scale cache derives a dataset signature.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum CachePolicy {
    /// xxh3 over every record; equal signatures mean equal data.
    #[default]
    ContentHash,
    /// First record plus record count. Distinct datasets sharing both collide.
    FirstRecord,
}

/// What identifies a bar across renders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum JoinKeyPolicy {
    #[default]
    BinIndex,
    /// Rounded pixel height; bins of equal height are treated as the same bar.
    ScaledHeight,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistogramConfig {
    #[serde(default = "default_width")]
    pub width: f64,
    #[serde(default = "default_height")]
    pub height: f64,
    #[serde(default = "default_margin_bottom")]
    pub margin_bottom: f64,
    #[serde(default = "default_thresholds")]
    pub thresholds: Vec<f64>, // 0 is prepended when building bins
    #[serde(default = "default_bar_width")]
    pub bar_width: f64,
    #[serde(default = "default_bar_fill")]
    pub bar_fill: String,
    #[serde(default = "default_transition_ms")]
    pub transition_ms: u64,
    #[serde(default)]
    pub cache_policy: CachePolicy,
    #[serde(default)]
    pub join_key: JoinKeyPolicy,
}

fn default_width() -> f64 {
    330.0
}
fn default_height() -> f64 {
    450.0
}
fn default_margin_bottom() -> f64 {
    20.0 // room for axis ticks
}
fn default_thresholds() -> Vec<f64> {
    vec![50.0, 200.0, 500.0, 1000.0, 10000.0, 50000.0, 100000.0, 1000000.0]
}
fn default_bar_width() -> f64 {
    35.0
}
fn default_bar_fill() -> String {
    "#ff9933".into()
}
fn default_transition_ms() -> u64 {
    500
}

impl Default for HistogramConfig {
    fn default() -> Self {
        Self {
            width: default_width(),
            height: default_height(),
            margin_bottom: default_margin_bottom(),
            thresholds: default_thresholds(),
            bar_width: default_bar_width(),
            bar_fill: default_bar_fill(),
            transition_ms: default_transition_ms(),
            cache_policy: CachePolicy::default(),
            join_key: JoinKeyPolicy::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportConfig {
    #[serde(default = "default_output_dir")]
    pub output_dir: String,
}

fn default_output_dir() -> String {
    ".".into()
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self { output_dir: default_output_dir() }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub display: DisplayConfig,
    #[serde(default)]
    pub histogram: HistogramConfig,
    #[serde(default)]
    pub export: ExportConfig,
}

impl Config {
    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("fecviz")
            .join("config.toml")
    }

    pub fn load() -> crate::Result<Self> {
        let path = if let Ok(env_path) = std::env::var("FECVIZ_CONFIG") {
            PathBuf::from(env_path) // $FECVIZ_CONFIG overrides default config path
        } else {
            Self::config_path()
        };
        if !path.exists() {
            return Ok(Self::default());
        }
        Self::from_toml(&std::fs::read_to_string(&path)?)
    }

    pub fn from_toml(content: &str) -> crate::Result<Self> {
        Ok(toml::from_str(content)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_toml_gives_defaults() {
        let cfg = Config::from_toml("").unwrap();
        assert_eq!(cfg.histogram.height, 450.0);
        assert_eq!(cfg.histogram.width, 330.0);
        assert_eq!(cfg.histogram.thresholds.len(), 8);
        assert_eq!(cfg.histogram.cache_policy, CachePolicy::ContentHash);
        assert_eq!(cfg.histogram.join_key, JoinKeyPolicy::BinIndex);
        assert_eq!(cfg.display.theme, "dark");
    }

    #[test]
    fn legacy_policies_parse() {
        let cfg = Config::from_toml(
            "[histogram]\ncache_policy = \"first-record\"\njoin_key = \"scaled-height\"\ntransition_ms = 250\n",
        )
        .unwrap();
        assert_eq!(cfg.histogram.cache_policy, CachePolicy::FirstRecord);
        assert_eq!(cfg.histogram.join_key, JoinKeyPolicy::ScaledHeight);
        assert_eq!(cfg.histogram.transition_ms, 250);
        assert_eq!(cfg.histogram.bar_fill, "#ff9933");
    }

    #[test]
    fn unknown_policy_is_an_error() {
        assert!(Config::from_toml("[histogram]\ncache_policy = \"nope\"\n").is_err());
    }
}

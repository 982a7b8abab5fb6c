//! Configuration management for kline.
//!
//! Loads configuration from TOML files with support for per-timeframe indicator parameters.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use kline_core::Timeframe;

/// Configuration errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),
    #[error("Failed to parse config file: {0}")]
    ParseError(#[from] toml::de::Error),
    #[error("Failed to serialize config: {0}")]
    WriteError(#[from] toml::ser::Error),
}

/// Root configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub general: GeneralConfig,
    pub data: DataConfig,
    pub chart: ChartConfig,
    pub indicators: IndicatorsConfig,
}

impl Config {
    /// Load configuration from a file path.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Load configuration from default locations.
    ///
    /// Searches in order:
    /// 1. `./kline.toml`
    /// 2. `~/.config/kline/config.toml`
    ///
    /// Returns default config if no file found.
    pub fn load_default() -> Self {
        if let Ok(config) = Self::load(Self::default_path()) {
            return config;
        }

        if let Some(config_dir) = dirs::config_dir() {
            let config_path = config_dir.join("kline").join("config.toml");
            if let Ok(config) = Self::load(&config_path) {
                return config;
            }
        }

        Self::default()
    }

    /// Save configuration to a file path.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let content = toml::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    /// Get the default config file path.
    pub fn default_path() -> PathBuf {
        PathBuf::from("kline.toml")
    }

    /// Indicator parameters for a timeframe, with any override merged in.
    pub fn indicators_for_timeframe(&self, timeframe: Timeframe) -> IndicatorParams {
        self.indicators
            .timeframes
            .get(timeframe.label())
            .map(|tf| self.indicators.default.merge(tf))
            .unwrap_or_else(|| self.indicators.default.clone())
    }
}

/// General application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Instrument shown on startup, as `<code>.<market>`.
    pub default_instrument: String,
    /// Timeframe shown on startup.
    pub default_timeframe: Timeframe,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            default_instrument: "2330.tw".to_string(),
            default_timeframe: Timeframe::Day1,
        }
    }
}

/// Where bar files live.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DataConfig {
    /// Root of the `<market>/day_k` and `<market>/min_k` tree.
    /// Defaults to ~/.local/share/kline
    pub root: Option<PathBuf>,
}

impl DataConfig {
    /// Get the data root, using default if not specified.
    pub fn get_root(&self) -> PathBuf {
        self.root.clone().unwrap_or_else(|| {
            dirs::data_local_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("kline")
        })
    }
}

/// Chart geometry defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartConfig {
    /// Bar width restored by zoom reset; forced odd.
    pub default_bar_width: u32,
    /// Height of each subsidiary pane as a percentage of the chart.
    pub subsidiary_height_percent: u32,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            default_bar_width: 11,
            subsidiary_height_percent: 20,
        }
    }
}

/// Subsidiary pane contents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaneIndicator {
    Volume,
    Kd,
    Macd,
}

/// Stochastic oscillator parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StochasticParams {
    pub period: usize,
    pub rsv_weight: usize,
    pub k_weight: usize,
}

impl Default for StochasticParams {
    fn default() -> Self {
        Self {
            period: 9,
            rsv_weight: 3,
            k_weight: 3,
        }
    }
}

/// MACD parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MacdParams {
    pub short_period: usize,
    pub long_period: usize,
    pub signal_period: usize,
}

impl Default for MacdParams {
    fn default() -> Self {
        Self {
            short_period: 12,
            long_period: 26,
            signal_period: 9,
        }
    }
}

/// Indicator configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct IndicatorsConfig {
    /// Default indicator parameters.
    pub default: IndicatorParams,
    /// Per-timeframe overrides, keyed by timeframe label.
    pub timeframes: HashMap<String, IndicatorOverride>,
}

/// Indicator parameters (full config with all fields).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IndicatorParams {
    /// Moving averages overlaid on the main pane.
    pub ma_periods: Vec<usize>,
    pub stochastic: StochasticParams,
    pub macd: MacdParams,
    /// Subsidiary panes, top to bottom.
    pub subsidiary: Vec<PaneIndicator>,
}

impl Default for IndicatorParams {
    fn default() -> Self {
        Self {
            ma_periods: vec![5, 22],
            stochastic: StochasticParams::default(),
            macd: MacdParams::default(),
            subsidiary: vec![PaneIndicator::Volume, PaneIndicator::Kd, PaneIndicator::Macd],
        }
    }
}

impl IndicatorParams {
    /// Merge with an override, using override values where present.
    pub fn merge(&self, override_config: &IndicatorOverride) -> Self {
        Self {
            ma_periods: override_config.ma_periods.clone().unwrap_or_else(|| self.ma_periods.clone()),
            stochastic: override_config.stochastic.unwrap_or(self.stochastic),
            macd: override_config.macd.unwrap_or(self.macd),
            subsidiary: override_config.subsidiary.clone().unwrap_or_else(|| self.subsidiary.clone()),
        }
    }
}

/// Indicator override (all fields optional for partial overrides).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct IndicatorOverride {
    pub ma_periods: Option<Vec<usize>>,
    pub stochastic: Option<StochasticParams>,
    pub macd: Option<MacdParams>,
    pub subsidiary: Option<Vec<PaneIndicator>>,
}

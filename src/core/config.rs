//! Configuration management

use crate::core::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub endpoints: EndpointsConfig,
    #[serde(default)]
    pub feed: FeedConfig,
    #[serde(default)]
    pub tariff: TariffConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            general: GeneralConfig::default(),
            endpoints: EndpointsConfig::default(),
            feed: FeedConfig::default(),
            tariff: TariffConfig::default(),
        }
    }
}

impl Config {
    /// Get the configuration file path
    pub fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| Error::Config("Could not determine config directory".to_string()))?;

        let app_config_dir = config_dir.join("waterflow-monitor");

        if !app_config_dir.exists() {
            fs::create_dir_all(&app_config_dir)?;
        }

        Ok(app_config_dir.join("config.toml"))
    }

    /// Load configuration from disk
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;

        if !path.exists() {
            let config = Self::default();
            config.save()?;
            return Ok(config);
        }

        let content = fs::read_to_string(&path)?;
        let config: Config = toml::from_str(&content)
            .map_err(|e| Error::Config(format!("Failed to parse config: {}", e)))?;

        Ok(config)
    }

    /// Save configuration to disk
    pub fn save(&self) -> Result<()> {
        let path = Self::config_path()?;
        let content = toml::to_string_pretty(self)
            .map_err(|e| Error::Serialization(e.to_string()))?;
        fs::write(path, content)?;
        Ok(())
    }
}

/// General application settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Language: "auto", "en", "ko"
    #[serde(default = "default_language")]
    pub language: String,
    /// Feed refresh interval in seconds (valid range 2-10)
    #[serde(default = "default_refresh_rate")]
    pub refresh_rate_secs: u64,
    /// Trailing window of readings kept in memory per endpoint, in seconds
    #[serde(default = "default_retention_window")]
    pub retention_window_secs: i64,
    /// Persist the current batch of readings every N ticks
    #[serde(default = "default_persist_every")]
    pub persist_every_ticks: u32,
    /// Recompute today's usage statistics every N ticks
    #[serde(default = "default_stats_every")]
    pub stats_update_every_ticks: u32,
    /// Days of raw reading history to keep in the store
    #[serde(default = "default_keep_days")]
    pub history_keep_days: u32,
}

fn default_language() -> String { "auto".to_string() }
fn default_refresh_rate() -> u64 { 2 }
fn default_retention_window() -> i64 { 600 }
fn default_persist_every() -> u32 { 10 }
fn default_stats_every() -> u32 { 60 }
fn default_keep_days() -> u32 { 90 }

impl GeneralConfig {
    /// Refresh interval clamped to the supported 2-10 second range
    pub fn clamped_refresh_secs(&self) -> u64 {
        self.refresh_rate_secs.clamp(2, 10)
    }
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            language: default_language(),
            refresh_rate_secs: default_refresh_rate(),
            retention_window_secs: default_retention_window(),
            persist_every_ticks: default_persist_every(),
            stats_update_every_ticks: default_stats_every(),
            history_keep_days: default_keep_days(),
        }
    }
}

/// The fixed set of known measurement endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EndpointsConfig {
    #[serde(default = "default_endpoint_ids")]
    pub ids: Vec<String>,
}

fn default_endpoint_ids() -> Vec<String> {
    (1..=16).map(|i| format!("EP_{}", i)).collect()
}

impl Default for EndpointsConfig {
    fn default() -> Self {
        Self {
            ids: default_endpoint_ids(),
        }
    }
}

/// Flow data source settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedConfig {
    /// Source mode: "synthetic" or "replay"
    #[serde(default = "default_feed_mode")]
    pub mode: String,
    /// Lower bound of generated flow rates
    #[serde(default = "default_min_flow")]
    pub min_flow: f64,
    /// Upper bound of generated flow rates
    #[serde(default = "default_max_flow")]
    pub max_flow: f64,
    /// Optional RNG seed for reproducible synthetic data
    #[serde(default)]
    pub seed: Option<u64>,
    /// How far back the replay source reads stored history, in seconds
    #[serde(default = "default_replay_window")]
    pub replay_window_secs: i64,
}

fn default_feed_mode() -> String { "synthetic".to_string() }
fn default_min_flow() -> f64 { 10.0 }
fn default_max_flow() -> f64 { 100.0 }
fn default_replay_window() -> i64 { 3600 }

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            mode: default_feed_mode(),
            min_flow: default_min_flow(),
            max_flow: default_max_flow(),
            seed: None,
            replay_window_secs: default_replay_window(),
        }
    }
}

/// Tariff settings: the active selection plus the seeded schedule table
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TariffConfig {
    /// Active region for billing estimates
    #[serde(default = "default_region")]
    pub region: String,
    /// Active usage class for billing estimates
    #[serde(default = "default_usage_class")]
    pub usage_class: String,
    /// Rate schedules indexed by (region, usage class)
    #[serde(default = "default_schedules")]
    pub schedules: Vec<ScheduleConfig>,
}

fn default_region() -> String { "seoul".to_string() }
fn default_usage_class() -> String { "household".to_string() }

impl Default for TariffConfig {
    fn default() -> Self {
        Self {
            region: default_region(),
            usage_class: default_usage_class(),
            schedules: default_schedules(),
        }
    }
}

/// One (region, usage class) rate schedule as configured
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleConfig {
    pub region: String,
    pub usage_class: String,
    /// Supply charge per unit, applied to all consumption
    pub base_rate: f64,
    /// Surcharge brackets; the last tier's upper bound is unbounded
    pub tiers: Vec<TierConfig>,
    /// Flat levy per unit, applied to all consumption
    pub levy_rate: f64,
}

/// One surcharge bracket: a capacity and its per-unit rate
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct TierConfig {
    /// Units this tier covers; `inf` marks the terminal open-ended tier
    pub upper_bound: f64,
    pub rate: f64,
}

fn tier(upper_bound: f64, rate: f64) -> TierConfig {
    TierConfig { upper_bound, rate }
}

fn default_schedules() -> Vec<ScheduleConfig> {
    vec![
        ScheduleConfig {
            region: "seoul".to_string(),
            usage_class: "household".to_string(),
            base_rate: 580.0,
            tiers: vec![
                tier(30.0, 400.0),
                tier(50.0, 930.0),
                tier(f64::INFINITY, 1420.0),
            ],
            levy_rate: 170.0,
        },
        ScheduleConfig {
            region: "seoul".to_string(),
            usage_class: "general".to_string(),
            base_rate: 1270.0,
            tiers: vec![
                tier(30.0, 500.0),
                tier(50.0, 1000.0),
                tier(100.0, 1520.0),
                tier(200.0, 1830.0),
                tier(1000.0, 1920.0),
                tier(f64::INFINITY, 2030.0),
            ],
            levy_rate: 170.0,
        },
        ScheduleConfig {
            region: "busan".to_string(),
            usage_class: "household".to_string(),
            base_rate: 790.0,
            tiers: vec![
                tier(10.0, 490.0),
                tier(20.0, 630.0),
                tier(30.0, 570.0),
                tier(f64::INFINITY, 940.0),
            ],
            levy_rate: 151.3,
        },
        ScheduleConfig {
            region: "busan".to_string(),
            usage_class: "general".to_string(),
            base_rate: 1350.0,
            tiers: vec![
                tier(50.0, 1160.0),
                tier(100.0, 1720.0),
                tier(300.0, 2020.0),
                tier(f64::INFINITY, 2110.0),
            ],
            levy_rate: 151.3,
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_has_sixteen_endpoints() {
        let config = Config::default();
        assert_eq!(config.endpoints.ids.len(), 16);
        assert_eq!(config.endpoints.ids[0], "EP_1");
        assert_eq!(config.endpoints.ids[15], "EP_16");
    }

    #[test]
    fn default_schedules_cover_both_regions_and_classes() {
        let config = TariffConfig::default();
        assert_eq!(config.schedules.len(), 4);

        for schedule in &config.schedules {
            let last = schedule.tiers.last().unwrap();
            assert!(last.upper_bound.is_infinite());
        }
    }

    #[test]
    fn refresh_rate_is_clamped_to_slider_range() {
        let mut general = GeneralConfig::default();
        general.refresh_rate_secs = 1;
        assert_eq!(general.clamped_refresh_secs(), 2);
        general.refresh_rate_secs = 60;
        assert_eq!(general.clamped_refresh_secs(), 10);
        general.refresh_rate_secs = 5;
        assert_eq!(general.clamped_refresh_secs(), 5);
    }

    #[test]
    fn config_roundtrips_through_toml() {
        let config = Config::default();
        let text = toml::to_string_pretty(&config).unwrap();
        let parsed: Config = toml::from_str(&text).unwrap();

        assert_eq!(parsed.endpoints.ids, config.endpoints.ids);
        assert_eq!(parsed.tariff.schedules.len(), 4);
        // Infinite tier bounds must survive serialization
        let last = parsed.tariff.schedules[0].tiers.last().unwrap();
        assert!(last.upper_bound.is_infinite());
    }
}

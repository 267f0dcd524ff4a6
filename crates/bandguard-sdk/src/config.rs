//! Configuration types for RuleEvaluator

use crate::error::{Result, SdkError};
use bandguard_repository::CacheConfig;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Main engine configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Tenant configuration cache settings
    pub cache: CacheSettings,

    /// Reject global rule configurations with overlapping or unordered bands
    pub strict_band_layout: bool,
}

/// Tenant configuration cache settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheSettings {
    /// Entry lifetime in milliseconds
    pub ttl_ms: u64,

    /// Background sweep interval in milliseconds
    pub sweep_interval_ms: u64,
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            ttl_ms: 300_000,
            sweep_interval_ms: 60_000,
        }
    }
}

impl CacheSettings {
    pub fn to_cache_config(&self) -> CacheConfig {
        CacheConfig::new()
            .with_ttl(Duration::from_millis(self.ttl_ms))
            .with_sweep_interval(Duration::from_millis(self.sweep_interval_ms))
    }
}

impl EngineConfig {
    /// Create a new engine configuration
    pub fn new() -> Self {
        Self {
            cache: CacheSettings::default(),
            strict_band_layout: true,
        }
    }

    /// Set the cache entry lifetime
    pub fn with_cache_ttl(mut self, ttl: Duration) -> Self {
        self.cache.ttl_ms = saturating_millis(ttl);
        self
    }

    /// Set the cache sweep interval
    pub fn with_sweep_interval(mut self, interval: Duration) -> Self {
        self.cache.sweep_interval_ms = saturating_millis(interval);
        self
    }

    /// Enable or disable the band layout check for global configurations
    pub fn strict_band_layout(mut self, strict: bool) -> Self {
        self.strict_band_layout = strict;
        self
    }

    /// Load configuration from `.env`, `config/bandguard.*` and `BANDGUARD_*`
    /// environment variables
    ///
    /// Nested keys use a double underscore, e.g. `BANDGUARD_CACHE__TTL_MS=120000`.
    pub fn load() -> Result<Self> {
        // Load .env file if exists
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/bandguard").required(false))
            .add_source(
                config::Environment::with_prefix("BANDGUARD")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| SdkError::ConfigError(format!("Failed to read config: {}", e)))?;

        Self::from_config(config)
    }

    /// Build from an already assembled [`config::Config`]
    pub fn from_config(config: config::Config) -> Result<Self> {
        let engine_config: Self = config
            .try_deserialize()
            .map_err(|e| SdkError::ConfigError(format!("Failed to deserialize config: {}", e)))?;

        engine_config.validate()?;
        tracing::debug!(?engine_config, "Loaded engine configuration");
        Ok(engine_config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        self.cache.to_cache_config().validate()?;
        Ok(())
    }
}

// Sub-millisecond durations round up so they never collapse to zero
fn saturating_millis(duration: Duration) -> u64 {
    let millis = duration.as_nanos().div_ceil(1_000_000);
    u64::try_from(millis).unwrap_or(u64::MAX)
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use config::{Config, File, FileFormat};

    fn from_yaml(yaml: &str) -> Result<EngineConfig> {
        let config = Config::builder()
            .add_source(File::from_str(yaml, FileFormat::Yaml))
            .build()
            .unwrap();
        EngineConfig::from_config(config)
    }

    #[test]
    fn test_engine_config_default() {
        let config = EngineConfig::default();

        assert_eq!(config.cache.ttl_ms, 300_000);
        assert_eq!(config.cache.sweep_interval_ms, 60_000);
        assert!(config.strict_band_layout);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_to_cache_config() {
        let cache = CacheSettings {
            ttl_ms: 30_000,
            sweep_interval_ms: 500,
        }
        .to_cache_config();

        assert_eq!(cache.default_ttl, Duration::from_secs(30));
        assert_eq!(cache.sweep_interval, Duration::from_millis(500));
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let config = from_yaml("cache:\n  ttl_ms: 120000\n").unwrap();

        assert_eq!(config.cache.ttl_ms, 120_000);
        assert_eq!(config.cache.sweep_interval_ms, 60_000);
        assert!(config.strict_band_layout);
    }

    #[test]
    fn test_empty_source_is_default() {
        assert_eq!(from_yaml("{}").unwrap(), EngineConfig::default());
    }

    #[test]
    fn test_zero_ttl_rejected() {
        let err = from_yaml("cache:\n  ttl_ms: 0\n").unwrap_err();
        assert!(err.to_string().contains("ttl must be greater than zero"));

        let err = EngineConfig::new()
            .with_sweep_interval(Duration::ZERO)
            .validate()
            .unwrap_err();
        assert!(err.to_string().contains("sweep interval"));
    }

    #[test]
    fn test_negative_ttl_fails_to_deserialize() {
        let err = from_yaml("cache:\n  ttl_ms: -5\n").unwrap_err();
        assert!(matches!(err, SdkError::ConfigError(_)));
    }

    #[test]
    fn test_sub_second_durations_are_kept() {
        let config = EngineConfig::new()
            .with_cache_ttl(Duration::from_millis(500))
            .with_sweep_interval(Duration::from_micros(1));

        assert_eq!(config.cache.ttl_ms, 500);
        assert_eq!(config.cache.sweep_interval_ms, 1);
        assert!(config.validate().is_ok());
        assert_eq!(
            config.cache.to_cache_config().default_ttl,
            Duration::from_millis(500)
        );
    }

    #[test]
    fn test_builder_style_setters() {
        let config = EngineConfig::new()
            .with_cache_ttl(Duration::from_secs(10))
            .with_sweep_interval(Duration::from_secs(2))
            .strict_band_layout(false);

        assert_eq!(config.cache.ttl_ms, 10_000);
        assert_eq!(config.cache.sweep_interval_ms, 2_000);
        assert!(!config.strict_band_layout);
    }
}

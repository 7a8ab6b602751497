use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const ENV_SEED: &str = "KLONDIKE_SEED";
pub const ENV_RECYCLE_COUNTS: &str = "KLONDIKE_RECYCLE_COUNTS";
pub const ENV_TICK_MS: &str = "KLONDIKE_TICK_MS";

pub const MIN_TICK_MS: u64 = 10;
pub const MAX_TICK_MS: u64 = 60_000;

/// Engine settings. `seed` drives the sequence of deals; `None` draws one
/// from the OS-seeded thread RNG.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct EngineConfig {
    pub seed: Option<u64>,
    /// Whether turning the waste back into the stock increments the move counter
    pub recycle_counts_as_move: bool,
    /// Period of the elapsed-time tick delivered to a tick listener
    pub tick_interval_ms: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            seed: None,
            recycle_counts_as_move: true,
            tick_interval_ms: 1_000,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueSource {
    Default,
    Env,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConfigSources {
    pub seed: ValueSource,
    pub recycle_counts_as_move: ValueSource,
    pub tick_interval_ms: ValueSource,
}

impl Default for ConfigSources {
    fn default() -> Self {
        Self {
            seed: ValueSource::Default,
            recycle_counts_as_move: ValueSource::Default,
            tick_interval_ms: ValueSource::Default,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ConfigResolved {
    pub config: EngineConfig,
    pub sources: ConfigSources,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid value for {key}: {value:?}")]
    InvalidValue { key: &'static str, value: String },
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

impl EngineConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(MIN_TICK_MS..=MAX_TICK_MS).contains(&self.tick_interval_ms) {
            return Err(ConfigError::Invalid(format!(
                "tick_interval_ms must be between {} and {}",
                MIN_TICK_MS, MAX_TICK_MS
            )));
        }
        Ok(())
    }

    /// Tick period, clamped to the supported range for unvalidated configs.
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms.clamp(MIN_TICK_MS, MAX_TICK_MS))
    }

    /// Defaults overridden by `KLONDIKE_*` environment variables.
    pub fn from_env() -> Result<ConfigResolved, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`EngineConfig::from_env`] with an explicit variable lookup.
    /// Empty values are treated as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<ConfigResolved, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut cfg = EngineConfig::default();
        let mut sources = ConfigSources::default();
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(seed) = var(ENV_SEED) {
            cfg.seed = Some(seed.trim().parse().map_err(|_| ConfigError::InvalidValue {
                key: ENV_SEED,
                value: seed.clone(),
            })?);
            sources.seed = ValueSource::Env;
        }
        if let Some(flag) = var(ENV_RECYCLE_COUNTS) {
            cfg.recycle_counts_as_move =
                parse_bool(&flag).ok_or_else(|| ConfigError::InvalidValue {
                    key: ENV_RECYCLE_COUNTS,
                    value: flag.clone(),
                })?;
            sources.recycle_counts_as_move = ValueSource::Env;
        }
        if let Some(ms) = var(ENV_TICK_MS) {
            cfg.tick_interval_ms = ms.trim().parse().map_err(|_| ConfigError::InvalidValue {
                key: ENV_TICK_MS,
                value: ms.clone(),
            })?;
            sources.tick_interval_ms = ValueSource::Env;
        }

        cfg.validate()?;
        Ok(ConfigResolved {
            config: cfg,
            sources,
        })
    }
}

fn parse_bool(s: &str) -> Option<bool> {
    match s.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "on" | "yes" => Some(true),
        "0" | "false" | "off" | "no" => Some(false),
        _ => None,
    }
}

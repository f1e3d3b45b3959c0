// Configuration loading and parsing (engine.toml).

use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::valuation::StatBasis;

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("failed to parse config file {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("validation error for field `{field}`: {message}")]
    ValidationError { field: String, message: String },
}

// ---------------------------------------------------------------------------
// engine.toml structs
// ---------------------------------------------------------------------------

pub const DEFAULT_HITTER_BASELINE_PA: f64 = 600.0;
pub const DEFAULT_PITCHER_BASELINE_IP: f64 = 180.0;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub league: LeagueSection,
    pub playing_time: PlayingTimeConfig,
    pub aggregation: AggregationConfig,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct LeagueSection {
    /// Season year. Falls back to the league payload's `seasonId`.
    pub season: Option<u16>,
    /// Explicit canonical projection set id, e.g. `"102025"`.
    pub projection_set_id: Option<String>,
}

/// Full-season reference workloads for the weighted projection.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct PlayingTimeConfig {
    pub hitter_baseline_pa: f64,
    pub pitcher_baseline_ip: f64,
}

impl Default for PlayingTimeConfig {
    fn default() -> Self {
        PlayingTimeConfig {
            hitter_baseline_pa: DEFAULT_HITTER_BASELINE_PA,
            pitcher_baseline_ip: DEFAULT_PITCHER_BASELINE_IP,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct AggregationConfig {
    pub basis: StatBasis,
    pub parallel: bool,
}

impl Default for AggregationConfig {
    fn default() -> Self {
        AggregationConfig {
            basis: StatBasis::Projected,
            parallel: true,
        }
    }
}

impl EngineConfig {
    /// Canonical projection set id: the explicit id if configured, otherwise
    /// `"10" + season` using the configured season or `fallback_season`.
    pub fn projection_set_id(&self, fallback_season: Option<u16>) -> Option<String> {
        if let Some(id) = &self.league.projection_set_id {
            return Some(id.clone());
        }
        self.league
            .season
            .or(fallback_season)
            .map(|season| format!("10{season}"))
    }
}

// ---------------------------------------------------------------------------
// Loading logic
// ---------------------------------------------------------------------------

/// Load and validate an engine config file.
pub fn load_config_from(path: &Path) -> Result<EngineConfig, ConfigError> {
    let text = read_file(path)?;
    let config: EngineConfig = toml::from_str(&text).map_err(|e| ConfigError::ParseError {
        path: path.to_path_buf(),
        source: e,
    })?;
    validate(&config)?;
    Ok(config)
}

/// Parse and validate config text that did not come from a file.
pub fn parse_config(text: &str) -> Result<EngineConfig, ConfigError> {
    let config: EngineConfig = toml::from_str(text).map_err(|e| ConfigError::ParseError {
        path: PathBuf::from("<inline>"),
        source: e,
    })?;
    validate(&config)?;
    Ok(config)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn read_file(path: &Path) -> Result<String, ConfigError> {
    std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
        path: path.to_path_buf(),
    })
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

pub fn validate(config: &EngineConfig) -> Result<(), ConfigError> {
    let pt = &config.playing_time;
    let baselines: &[(&str, f64)] = &[
        ("playing_time.hitter_baseline_pa", pt.hitter_baseline_pa),
        ("playing_time.pitcher_baseline_ip", pt.pitcher_baseline_ip),
    ];
    for (name, val) in baselines {
        if !val.is_finite() || *val <= 0.0 {
            return Err(ConfigError::ValidationError {
                field: name.to_string(),
                message: format!("must be a finite number > 0, got {val}"),
            });
        }
    }

    if let Some(id) = &config.league.projection_set_id {
        if id.trim().is_empty() {
            return Err(ConfigError::ValidationError {
                field: "league.projection_set_id".into(),
                message: "must not be empty".into(),
            });
        }
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------

//! Configuration loading from TOML.
//!
//! `config.toml` is deserialized into [`AppConfig`]. The engine itself never
//! reads it: callers turn it into an [`EngineSettings`] value for a given
//! round and pass that explicitly.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;

use crate::generators::GeneratorConfig;
use crate::types::{OddsTable, ProbabilityTable, DEFAULT_PORTFOLIO_SIZE, MAX_STAKE};

/// Top-level application configuration.
#[derive(Debug, Deserialize, Clone, Default, PartialEq)]
pub struct AppConfig {
    #[serde(default)]
    pub engine: EngineConfig,
    #[serde(default)]
    pub generator: GeneratorSection,
}

#[derive(Debug, Deserialize, Clone, Default, PartialEq)]
pub struct EngineConfig {
    #[serde(default)]
    pub use_logit_model: bool,
    #[serde(default)]
    pub custom_odds_mode: bool,
    /// Replacement odds table, only read in custom-odds mode.
    #[serde(default)]
    pub custom_odds: Option<OddsTable>,
    /// Per-slot probability overrides, only read in custom-odds mode.
    #[serde(default)]
    pub custom_probs: Option<ProbabilityTable>,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct GeneratorSection {
    #[serde(default = "default_bet_count")]
    pub bet_count: usize,
    /// Round-independent part of the max stake; see [`max_bet_for_round`].
    #[serde(default)]
    pub base_max_bet: Option<i64>,
    /// Seed for the random generator; entropy when absent.
    #[serde(default)]
    pub seed: Option<u64>,
}

impl Default for GeneratorSection {
    fn default() -> Self {
        Self {
            bet_count: default_bet_count(),
            base_max_bet: None,
            seed: None,
        }
    }
}

fn default_bet_count() -> usize {
    DEFAULT_PORTFOLIO_SIZE
}

impl AppConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: &str) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {path}"))?;
        let config: AppConfig = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {path}"))?;
        Ok(config)
    }

    /// Generator configuration for `round`.
    pub fn generator_config(&self, round: u32) -> GeneratorConfig {
        GeneratorConfig {
            bet_count: self.generator.bet_count,
            max_bet: self
                .generator
                .base_max_bet
                .and_then(|base| max_bet_for_round(base, round)),
            round,
        }
    }
}

// ---------------------------------------------------------------------------
// Engine settings
// ---------------------------------------------------------------------------

/// The immutable settings every engine entry point takes.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EngineSettings {
    pub use_logit_model: bool,
    pub custom_odds_mode: bool,
    pub custom_odds: Option<OddsTable>,
    pub custom_probs: Option<ProbabilityTable>,
    /// Max stake for the round, `None` when unset.
    pub max_bet: Option<u32>,
}

impl EngineSettings {
    pub fn from_config(config: &AppConfig, round: u32) -> Self {
        Self {
            use_logit_model: config.engine.use_logit_model,
            custom_odds_mode: config.engine.custom_odds_mode,
            custom_odds: config.engine.custom_odds,
            custom_probs: config.engine.custom_probs,
            max_bet: config
                .generator
                .base_max_bet
                .and_then(|base| max_bet_for_round(base, round)),
        }
    }
}

/// Max stake grows by 2 NP per round: `base + 2 * round`, capped at the
/// stake limit. Anything below 1 means no max stake.
pub fn max_bet_for_round(base: i64, round: u32) -> Option<u32> {
    let value = base.saturating_add(2 * i64::from(round));
    if value < 1 {
        return None;
    }
    u32::try_from(value.min(i64::from(MAX_STAKE))).ok()
}

/// Inverse of [`max_bet_for_round`].
pub fn base_max_bet(max_bet: u32, round: u32) -> i64 {
    i64::from(max_bet) - 2 * i64::from(round)
}

//! Portfolio generators: deterministic construction strategies built on the
//! ranking helper, plus one seeded random strategy.
//!
//! Every generator returns a freshly built [`Portfolio`]; nothing here ever
//! touches a caller's existing portfolio.

pub mod bustproof;
pub mod ranking;

use rand::Rng;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;
use tracing::info;

use crate::codec::{self, Mask};
use crate::types::{
    EngineError, OddsTable, Portfolio, ProbabilityTable, RoundData, Wager,
    DEFAULT_PORTFOLIO_SIZE, MAX_PORTFOLIO_SIZE, UNSET_STAKE,
};

pub use ranking::{rank, RankTable, RankedBet};

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Generator configuration (defaults; overridden by config.toml at runtime).
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratorConfig {
    /// Wagers per generated portfolio (10 or 15).
    pub bet_count: usize,
    /// Per-wager stake ceiling; `None` leaves generated stakes unset.
    pub max_bet: Option<u32>,
    /// Round the portfolio is built for, used in labels.
    pub round: u32,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            bet_count: DEFAULT_PORTFOLIO_SIZE,
            max_bet: None,
            round: 0,
        }
    }
}

// ---------------------------------------------------------------------------
// Strategy selection
// ---------------------------------------------------------------------------

/// Named strategies reachable without extra input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Strategy {
    MaxTer,
    Gambit,
    Bustproof,
    Crazy,
    Winning,
}

impl FromStr for Strategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "max-ter" | "maxter" => Ok(Self::MaxTer),
            "gambit" => Ok(Self::Gambit),
            "bustproof" => Ok(Self::Bustproof),
            "crazy" => Ok(Self::Crazy),
            "winning" => Ok(Self::Winning),
            other => Err(format!(
                "unknown strategy '{other}' (expected max-ter, gambit, bustproof, crazy or winning)"
            )),
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::MaxTer => "max-ter",
            Self::Gambit => "gambit",
            Self::Bustproof => "bustproof",
            Self::Crazy => "crazy",
            Self::Winning => "winning",
        };
        f.write_str(name)
    }
}

// ---------------------------------------------------------------------------
// Generator
// ---------------------------------------------------------------------------

/// A generated portfolio and its display label.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GeneratedPortfolio {
    pub label: String,
    pub portfolio: Portfolio,
}

/// Builds portfolios against one odds table and one probability table.
#[derive(Debug, Clone)]
pub struct Generator {
    odds: OddsTable,
    probabilities: ProbabilityTable,
    config: GeneratorConfig,
}

impl Generator {
    pub fn new(
        odds: OddsTable,
        probabilities: ProbabilityTable,
        config: GeneratorConfig,
    ) -> Result<Self, EngineError> {
        if config.bet_count > MAX_PORTFOLIO_SIZE {
            return Err(EngineError::PortfolioTooLarge(config.bet_count));
        }
        Ok(Self {
            odds,
            probabilities,
            config,
        })
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    pub fn odds(&self) -> &OddsTable {
        &self.odds
    }

    /// Run a named strategy. `rng` only feeds [`Strategy::Crazy`].
    pub fn generate<R: Rng + ?Sized>(
        &self,
        strategy: Strategy,
        round: &RoundData,
        rng: &mut R,
    ) -> Result<GeneratedPortfolio, EngineError> {
        let generated = match strategy {
            Strategy::MaxTer => self.max_ter(),
            Strategy::Gambit => self.gambit(),
            Strategy::Bustproof => self.bustproof(),
            Strategy::Crazy => self.random_crazy(rng),
            Strategy::Winning => self.winning_replay(round),
        }?;
        info!(
            strategy = %strategy,
            label = %generated.label,
            active = generated.portfolio.active().count(),
            "Portfolio generated"
        );
        Ok(generated)
    }

    fn rank_candidates(&self, candidates: &[&[u8]; 5]) -> RankTable {
        rank(candidates, &self.odds, &self.probabilities, self.config.max_bet)
    }

    /// Max bet as shown in labels; the raw sentinel when unset.
    fn max_bet_label(&self) -> i64 {
        self.config.max_bet.map(i64::from).unwrap_or(UNSET_STAKE)
    }

    /// Turn ranked picks into a portfolio of exactly `bet_count` wagers,
    /// padding with empty wagers when there are too few.
    fn fill(
        &self,
        ranked: impl IntoIterator<Item = (Mask, Option<u32>)>,
    ) -> Result<Portfolio, EngineError> {
        let mut wagers = Vec::with_capacity(self.config.bet_count);
        for (mask, stake) in ranked.into_iter().take(self.config.bet_count) {
            wagers.push(Wager::new(codec::decode(mask), stake)?);
        }
        wagers.resize(self.config.bet_count, Wager::default());
        Portfolio::from_wagers(wagers)
    }
}

/// Indices of `values` in ascending order, ties kept in index order.
pub fn sorted_indices<T: PartialOrd>(values: &[T]) -> Vec<usize> {
    let mut indices: Vec<usize> = (0..values.len()).collect();
    indices.sort_by(|&a, &b| {
        values[a]
            .partial_cmp(&values[b])
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    indices
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

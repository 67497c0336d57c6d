//! One-shot round calculation.
//!
//! Runs both probability models, picks the used table, values every wager
//! and builds the payout distributions for one round and one portfolio.
//! Everything is recomputed from the inputs on each call.

use serde::Serialize;
use std::collections::BTreeMap;
use tracing::{debug, info, warn};

use crate::codec::{self, Mask};
use crate::config::EngineSettings;
use crate::generators::{Generator, GeneratorConfig};
use crate::payout;
use crate::probability::{
    effective_odds, food_affinities, used_probabilities, FoodAffinities, LegacyProbabilities,
    LogitProbabilities, ProbabilityModel,
};
use crate::types::{
    EngineError, OddsTable, PayoutTables, Portfolio, ProbabilityTable, RoundData,
    ARENA_COUNT, EMPTY_PROBABILITIES, NEUTRAL_ODDS, SLOTS_PER_ARENA,
};
use crate::valuation::{self, PortfolioSummary, WagerValuation};

/// Everything derived from one round and one portfolio.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoundCalculation {
    /// False when the round lacked the data to calculate anything.
    pub calculated: bool,
    pub legacy: LegacyProbabilities,
    /// `None` when the logit model could not run on this round.
    pub logit: Option<LogitProbabilities>,
    pub model: ProbabilityModel,
    pub used: ProbabilityTable,
    pub food_affinities: FoodAffinities,
    pub arena_ratios: [f64; ARENA_COUNT],
    pub odds: OddsTable,
    pub valuations: BTreeMap<usize, WagerValuation>,
    pub payout_tables: PayoutTables,
    /// Encoded Winning Combination, 0 while the round is running.
    pub winning_mask: Mask,
    pub summary: PortfolioSummary,
}

impl Default for RoundCalculation {
    fn default() -> Self {
        Self {
            calculated: false,
            legacy: LegacyProbabilities::default(),
            logit: None,
            model: ProbabilityModel::default(),
            used: EMPTY_PROBABILITIES,
            food_affinities: [[(0, 0); SLOTS_PER_ARENA]; ARENA_COUNT],
            arena_ratios: [0.0; ARENA_COUNT],
            odds: NEUTRAL_ODDS,
            valuations: BTreeMap::new(),
            payout_tables: PayoutTables::default(),
            winning_mask: 0,
            summary: PortfolioSummary::default(),
        }
    }
}

/// Stateless calculator bound to one set of engine settings.
#[derive(Debug, Clone, Default)]
pub struct RoundCalculator {
    settings: EngineSettings,
}

impl RoundCalculator {
    pub fn new(settings: EngineSettings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &EngineSettings {
        &self.settings
    }

    /// Calculate everything for `round` and `portfolio`. Rounds missing
    /// competitors or odds yield [`RoundCalculation::default`].
    pub fn calculate(&self, round: &RoundData, portfolio: &Portfolio) -> RoundCalculation {
        if !round.is_valid() || round.opening_odds_table().is_none() {
            warn!(round = round.round, "Round data incomplete, skipping calculation");
            return RoundCalculation::default();
        }
        let Some(odds) = effective_odds(round, &self.settings) else {
            warn!(round = round.round, "No usable odds table, skipping calculation");
            return RoundCalculation::default();
        };

        let legacy = LegacyProbabilities::compute(round);
        let logit = match LogitProbabilities::compute(round) {
            Ok(logit) => Some(logit),
            Err(e) => {
                warn!(round = round.round, error = %e, "Logit model unavailable, using legacy");
                None
            }
        };
        let (model, used) = used_probabilities(round, &self.settings, &legacy, logit.as_ref());

        let valuations = valuation::value_portfolio(portfolio, &odds, &used);
        let payout_tables = payout::payout_tables(portfolio, &valuations, &used);
        let winning_mask = codec::encode(&round.winning_selection());
        let summary = valuation::summarize(portfolio, &valuations, winning_mask);

        debug!(
            round = round.round,
            odds_rows = payout_tables.odds.len(),
            winnings_rows = payout_tables.winnings.len(),
            "Payout tables built"
        );
        info!(
            round = round.round,
            model = ?model,
            wagers = summary.enabled_wagers,
            total_stake = summary.total_stake,
            expected_ratio = summary.total_expected_ratio,
            "Round calculated"
        );

        RoundCalculation {
            calculated: true,
            food_affinities: food_affinities(round),
            arena_ratios: valuation::arena_ratios(&odds),
            legacy,
            logit,
            model,
            used,
            odds,
            valuations,
            payout_tables,
            winning_mask,
            summary,
        }
    }

    /// A generator over this round's effective odds and used table.
    pub fn generator(
        &self,
        round: &RoundData,
        config: GeneratorConfig,
    ) -> Result<Generator, EngineError> {
        let calculation = self.calculate(round, &Portfolio::default());
        if !calculation.calculated {
            return Err(EngineError::MissingRoundData);
        }
        Generator::new(calculation.odds, calculation.used, config)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

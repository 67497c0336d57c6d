//! Per-arena win probability models.
//!
//! Two independent estimators feed the engine: the legacy odds-implied
//! interval model and the logit regression model. Which table is "used"
//! downstream is decided here from the explicit [`EngineSettings`].

pub mod legacy;
pub mod logit;
pub mod tables;

pub use legacy::LegacyProbabilities;
pub use logit::LogitProbabilities;

use serde::{Deserialize, Serialize};

use crate::config::EngineSettings;
use crate::types::{
    normalize_odds_table, OddsTable, ProbabilityTable, RoundData, ARENA_COUNT, SLOTS_PER_ARENA,
};

/// Which estimator produced the used probability table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProbabilityModel {
    #[default]
    Legacy,
    Logit,
    Custom,
}

/// `(favorite, allergy)` per arena and slot (`[arena][slot - 1]`).
/// Allergy counts are zero or negative.
pub type FoodAffinities = [[(i32, i32); SLOTS_PER_ARENA]; ARENA_COUNT];

/// Sum each competitor's favorite and allergy weights over the foods served
/// in its arena. Rounds without food data read as all zeros.
pub fn food_affinities(round: &RoundData) -> FoodAffinities {
    let mut affinities = [[(0, 0); SLOTS_PER_ARENA]; ARENA_COUNT];
    let (Some(pirates), Some(foods)) = (round.pirate_table(), round.food_table()) else {
        return affinities;
    };

    for arena in 0..ARENA_COUNT {
        for (slot, &competitor) in pirates[arena].iter().enumerate() {
            let (favorite, allergy) = &mut affinities[arena][slot];
            for &food in &foods[arena] {
                *favorite += i32::from(tables::favorite_weight(competitor, food));
                *allergy -= i32::from(tables::allergy_weight(competitor, food));
            }
        }
    }
    affinities
}

/// Pick the used table: custom probabilities when custom-odds mode carries
/// them, then logit if enabled and available, then legacy.
///
/// Custom probabilities override the legacy estimate slot by slot (entries
/// `<= 0` keep the legacy value) and are renormalized per arena.
pub fn used_probabilities(
    round: &RoundData,
    settings: &EngineSettings,
    legacy: &LegacyProbabilities,
    logit: Option<&LogitProbabilities>,
) -> (ProbabilityModel, ProbabilityTable) {
    if settings.custom_odds_mode {
        if let Some(overrides) = &settings.custom_probs {
            let custom = LegacyProbabilities::compute_with_overrides(round, overrides);
            return (ProbabilityModel::Custom, custom.used);
        }
    }
    match logit {
        Some(logit) if settings.use_logit_model => (ProbabilityModel::Logit, logit.used),
        _ => (ProbabilityModel::Legacy, legacy.used),
    }
}

/// The odds every valuation runs against: custom odds in custom-odds mode,
/// otherwise the round's current odds. `None` when neither is usable.
pub fn effective_odds(round: &RoundData, settings: &EngineSettings) -> Option<OddsTable> {
    if settings.custom_odds_mode {
        if let Some(custom) = settings.custom_odds {
            return Some(normalize_odds_table(custom));
        }
    }
    round.current_odds_table()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

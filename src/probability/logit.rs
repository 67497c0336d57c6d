//! Multinomial logit model over food affinities and seat position.

use serde::Serialize;
use tracing::debug;

use super::tables::logit_coefficients;
use super::{food_affinities, FoodAffinities};
use crate::types::{EngineError, ProbabilityTable, RoundData, EMPTY_PROBABILITIES, SLOTS_PER_ARENA};

/// Raw softmax output and the table the engine uses. The model is already
/// normalized, so both tables are identical.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LogitProbabilities {
    pub prob: ProbabilityTable,
    pub used: ProbabilityTable,
}

impl Default for LogitProbabilities {
    fn default() -> Self {
        Self {
            prob: EMPTY_PROBABILITIES,
            used: EMPTY_PROBABILITIES,
        }
    }
}

impl LogitProbabilities {
    /// Run the model on a round. Rounds without a competitor table yield the
    /// empty tables; a competitor id with no coefficients is an error.
    pub fn compute(round: &RoundData) -> Result<Self, EngineError> {
        let Some(pirates) = round.pirate_table() else {
            return Ok(Self::default());
        };
        let affinities = food_affinities(round);
        let mut prob = EMPTY_PROBABILITIES;

        for (arena, competitors) in pirates.iter().enumerate() {
            let strengths = arena_strengths(competitors, &affinities, arena)?;
            let capabilities = strengths.map(f64::exp);
            let total: f64 = capabilities.iter().sum();
            for (i, capability) in capabilities.iter().enumerate() {
                prob[arena][i + 1] = capability / total;
            }
            debug!(arena, ?strengths, "Logit strengths computed");
        }

        Ok(Self { prob, used: prob })
    }
}

fn arena_strengths(
    competitors: &[u32; SLOTS_PER_ARENA],
    affinities: &FoodAffinities,
    arena: usize,
) -> Result<[f64; SLOTS_PER_ARENA], EngineError> {
    let mut strengths = [0.0; SLOTS_PER_ARENA];
    for (i, &id) in competitors.iter().enumerate() {
        let coefficients = logit_coefficients(id).ok_or(EngineError::UnknownCompetitor(id))?;
        let (favorite, allergy) = affinities[arena][i];
        let mut strength = coefficients.intercept
            + coefficients.favorite * f64::from(favorite)
            + coefficients.allergy * f64::from(allergy);
        // Slot 1 is the baseline seat.
        if i > 0 {
            strength += coefficients.slot[i - 1];
        }
        strengths[i] = strength;
    }
    Ok(strengths)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

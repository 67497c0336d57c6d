//! Odds-implied probability intervals with iterative rectification.
//!
//! Every opening price brackets a competitor's win chance. The brackets are
//! tightened against each other, a point estimate is taken inside each one,
//! and the estimates are nudged until they sum to one wherever that can be
//! done without leaving the brackets.

use serde::Serialize;
use tracing::debug;

use crate::types::{
    OddsTable, ProbabilityTable, RoundData, ARENA_COUNT, EMPTY_PROBABILITIES, MAX_ODDS, MIN_ODDS,
    SLOTS_PER_ARENA,
};

/// Point estimate used for longshots quoted at the maximum price.
const LONGSHOT_ESTIMATE: f64 = 0.05;

/// The four tables produced by the legacy model.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LegacyProbabilities {
    pub min: ProbabilityTable,
    pub max: ProbabilityTable,
    pub std: ProbabilityTable,
    pub used: ProbabilityTable,
}

impl Default for LegacyProbabilities {
    fn default() -> Self {
        Self {
            min: EMPTY_PROBABILITIES,
            max: EMPTY_PROBABILITIES,
            std: EMPTY_PROBABILITIES,
            used: EMPTY_PROBABILITIES,
        }
    }
}

impl LegacyProbabilities {
    /// Run the model on a round's opening odds. Rounds without opening odds
    /// yield the empty tables.
    pub fn compute(round: &RoundData) -> Self {
        match round.opening_odds_table() {
            Some(opening) => Self::from_opening_odds(&opening),
            None => Self::default(),
        }
    }

    /// Run the model, then replace `std` with every positive entry of
    /// `overrides` before normalizing into `used`.
    pub fn compute_with_overrides(round: &RoundData, overrides: &ProbabilityTable) -> Self {
        let mut tables = Self::compute(round);
        if round.opening_odds_table().is_none() {
            return tables;
        }
        for arena in 0..ARENA_COUNT {
            let mut estimates = tables.std[arena];
            for slot in 1..=SLOTS_PER_ARENA {
                let value = overrides[arena][slot];
                if value > 0.0 {
                    estimates[slot] = value;
                }
            }
            tables.used[arena] = normalized(&estimates);
        }
        tables
    }

    pub fn from_opening_odds(opening: &OddsTable) -> Self {
        let mut tables = Self::default();

        for (arena, odds) in opening.iter().enumerate() {
            let (min, max) = bounds(odds);
            let mut std = [1.0; SLOTS_PER_ARENA + 1];
            for slot in 1..=SLOTS_PER_ARENA {
                std[slot] = if odds[slot] == MAX_ODDS {
                    LONGSHOT_ESTIMATE
                } else {
                    (min[slot] + max[slot]) / 2.0
                };
            }

            let level = rectify(odds, &min, &max, &mut std);
            debug!(arena, rectified_at = ?level, "Legacy estimates computed");

            tables.min[arena] = min;
            tables.max[arena] = max;
            tables.std[arena] = std;
            tables.used[arena] = normalized(&std);
        }

        tables
    }
}

/// Initial brackets per slot, tightened so each bound is consistent with
/// the rest of the arena summing to one.
fn bounds(odds: &[u32; SLOTS_PER_ARENA + 1]) -> ([f64; 5], [f64; 5]) {
    let mut min = [1.0; SLOTS_PER_ARENA + 1];
    let mut max = [1.0; SLOTS_PER_ARENA + 1];

    for slot in 1..=SLOTS_PER_ARENA {
        let price = f64::from(odds[slot]);
        (min[slot], max[slot]) = match odds[slot] {
            MAX_ODDS => (0.0, 1.0 / price),
            MIN_ODDS => (1.0 / 3.0, 1.0),
            _ => (1.0 / (1.0 + price), 1.0 / price),
        };
    }

    let min_sum: f64 = min[1..].iter().sum();
    let max_sum: f64 = max[1..].iter().sum();

    let (orig_min, orig_max) = (min, max);
    for slot in 1..=SLOTS_PER_ARENA {
        min[slot] = orig_min[slot].max(1.0 + orig_max[slot] - max_sum);
        max[slot] = orig_max[slot].min(1.0 + orig_min[slot] - min_sum);
    }

    (min, max)
}

/// Spread the shortfall across the group of favourites priced at or below
/// some level, trying ever wider groups. Returns the level that was applied,
/// or `None` if the estimates already summed to one or no level fit.
fn rectify(
    odds: &[u32; SLOTS_PER_ARENA + 1],
    min: &[f64; 5],
    max: &[f64; 5],
    std: &mut [f64; 5],
) -> Option<u32> {
    for level in MIN_ODDS..=MAX_ODDS {
        let total: f64 = std[1..].iter().sum();
        if total == 1.0 {
            return None;
        }

        let group: Vec<usize> = (1..=SLOTS_PER_ARENA)
            .filter(|&slot| odds[slot] <= level)
            .collect();
        let count = group.len();
        let deficit: f64 = group.iter().map(|&slot| std[slot] - min[slot]).sum();
        let capacity = group
            .iter()
            .map(|&slot| max[slot] - min[slot])
            .fold(1.0, f64::min);

        if total - deficit > 1.0 || count == 0 || deficit + 1.0 - total > capacity * count as f64 {
            continue;
        }

        let share = (deficit + 1.0 - total) / count as f64;
        for &slot in &group {
            std[slot] = min[slot] + share;
        }
        return Some(level);
    }
    None
}

/// Scale slots 1..=4 to sum to one; slot 0 stays 1. Degenerate estimates
/// with no positive mass read as a uniform arena.
fn normalized(estimates: &[f64; SLOTS_PER_ARENA + 1]) -> [f64; SLOTS_PER_ARENA + 1] {
    let sum: f64 = estimates[1..].iter().sum();
    let mut used = [1.0; SLOTS_PER_ARENA + 1];
    for slot in 1..=SLOTS_PER_ARENA {
        used[slot] = if sum > 0.0 {
            estimates[slot] / sum
        } else {
            1.0 / SLOTS_PER_ARENA as f64
        };
    }
    used
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

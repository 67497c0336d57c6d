//! Exact payout distribution of a portfolio.
//!
//! Wagers overlap arbitrarily, so their per-wager probabilities cannot simply
//! be added. Instead the outcome space is cut into disjoint outcome classes:
//! each class is a mask admitting a per-arena subset of competitors, and
//! every winning combination inside a class pays the same total. Arenas are
//! independent, so a class's probability is a product of per-arena sums.
//!
//! The partition grows with the number of distinct wager masks (at most
//! five splits per merge), never with the 1024 raw outcomes.

use std::collections::BTreeMap;
use tracing::debug;

use crate::codec::{self, Mask, ARENA_FIELDS, FULL_MASK};
use crate::types::{
    PayoutEntry, PayoutTables, Portfolio, ProbabilityTable, ARENA_COUNT, SLOTS_PER_ARENA,
};
use crate::valuation::WagerValuation;

/// A disjoint slice of the outcome space and what it pays.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutcomeClass {
    pub mask: Mask,
    pub value: u64,
}

/// Sum the values of wagers sharing a mask. Masks keep the order in which
/// they first appear so repeated runs split the space identically.
pub fn merge(wagers: impl IntoIterator<Item = (Mask, u64)>) -> Vec<(Mask, u64)> {
    let mut merged: Vec<(Mask, u64)> = Vec::new();
    for (mask, value) in wagers {
        if mask == 0 {
            continue;
        }
        match merged.iter_mut().find(|(existing, _)| *existing == mask) {
            Some((_, total)) => *total += value,
            None => merged.push((mask, value)),
        }
    }
    merged
}

/// Split the full outcome space into disjoint classes, each valued at the sum
/// of every merged wager whose mask contains it.
pub fn expand(merged: &[(Mask, u64)]) -> Vec<OutcomeClass> {
    let mut partition = vec![OutcomeClass {
        mask: FULL_MASK,
        value: 0,
    }];

    for &(bet, value) in merged {
        let mut next = Vec::with_capacity(partition.len() + ARENA_COUNT);

        for class in partition {
            let common = bet & class.mask;
            if !codec::is_doable(common) {
                next.push(class);
                continue;
            }

            next.push(OutcomeClass {
                mask: common,
                value: class.value + value,
            });

            // Peel off, arena by arena, the part of the class the wager
            // rejects. Each peeled piece narrows `remaining` so later pieces
            // stay disjoint from it.
            let mut remaining = class.mask;
            for field in ARENA_FIELDS {
                let rest = remaining ^ (common & field);
                if codec::is_doable(rest) {
                    next.push(OutcomeClass {
                        mask: rest,
                        value: class.value,
                    });
                    remaining = (remaining & !field) | (common & field);
                }
            }
        }

        partition = next;
    }

    partition
}

/// Probability that the winning combination falls inside `mask`.
pub fn class_probability(mask: Mask, probabilities: &ProbabilityTable) -> f64 {
    (0..ARENA_COUNT)
        .map(|arena| {
            let bits = codec::field(mask, arena);
            (0..SLOTS_PER_ARENA)
                .filter(|slot| bits & (0b1000 >> slot) != 0)
                .map(|slot| probabilities[arena][slot + 1])
                .sum::<f64>()
        })
        .product()
}

/// Group classes by value into a sorted distribution with running
/// cumulative and tail probabilities.
pub fn accumulate(classes: &[OutcomeClass], probabilities: &ProbabilityTable) -> Vec<PayoutEntry> {
    let mut by_value: BTreeMap<u64, f64> = BTreeMap::new();
    for class in classes {
        *by_value.entry(class.value).or_insert(0.0) += class_probability(class.mask, probabilities);
    }

    let mut cumulative = 0.0;
    let mut tail = 1.0;
    by_value
        .into_iter()
        .map(|(value, probability)| {
            cumulative += probability;
            let entry = PayoutEntry {
                value,
                probability,
                cumulative,
                tail,
            };
            tail -= probability;
            entry
        })
        .collect()
}

/// Distribution of the total value won by a set of acceptance masks.
/// With nothing to win the distribution is a certain zero.
pub fn distribution(
    wagers: impl IntoIterator<Item = (Mask, u64)>,
    probabilities: &ProbabilityTable,
) -> Vec<PayoutEntry> {
    let merged = merge(wagers);
    if merged.is_empty() {
        return vec![PayoutEntry {
            value: 0,
            probability: 1.0,
            cumulative: 1.0,
            tail: 1.0,
        }];
    }
    let classes = expand(&merged);
    debug!(
        merged = merged.len(),
        classes = classes.len(),
        "Outcome space partitioned"
    );
    accumulate(&classes, probabilities)
}

/// Both distributions for a portfolio: valued by total odds, and by capped
/// payoff. Inactive wagers take no part.
pub fn payout_tables(
    portfolio: &Portfolio,
    valuations: &BTreeMap<usize, WagerValuation>,
    probabilities: &ProbabilityTable,
) -> PayoutTables {
    let accepted: Vec<(Mask, WagerValuation)> = portfolio
        .active()
        .filter_map(|(index, wager)| {
            valuations
                .get(&index)
                .map(|value| (codec::acceptance_mask(&wager.selection), *value))
        })
        .collect();

    PayoutTables {
        odds: distribution(accepted.iter().map(|(m, v)| (*m, v.odds)), probabilities),
        winnings: distribution(accepted.iter().map(|(m, v)| (*m, v.payoff)), probabilities),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

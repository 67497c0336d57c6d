//! Payout distributions checked against brute-force enumeration.

use std::collections::BTreeMap;

use approx::assert_relative_eq;
use foodclub::codec::{self, Mask};
use foodclub::config::EngineSettings;
use foodclub::engine::RoundCalculator;
use foodclub::payout;
use foodclub::types::{PayoutEntry, Portfolio, ProbabilityTable, Selection, Wager};

use crate::load_fixture_round;

/// Every concrete winning combination with its probability.
fn all_outcomes(probabilities: &ProbabilityTable) -> Vec<(Mask, f64)> {
    let mut outcomes = Vec::with_capacity(1024);
    for code in 0..1024usize {
        let mut picks = [0u8; 5];
        let mut rest = code;
        for pick in picks.iter_mut() {
            *pick = (rest % 4) as u8 + 1;
            rest /= 4;
        }
        let selection = Selection::new(picks).unwrap();
        let probability: f64 = picks
            .iter()
            .enumerate()
            .map(|(arena, &slot)| probabilities[arena][slot as usize])
            .product();
        outcomes.push((codec::encode(&selection), probability));
    }
    outcomes
}

fn brute_force(wagers: &[(Mask, u64)], probabilities: &ProbabilityTable) -> BTreeMap<u64, f64> {
    let mut by_value = BTreeMap::new();
    for (outcome, probability) in all_outcomes(probabilities) {
        let value: u64 = wagers
            .iter()
            .filter(|(accepted, _)| outcome & accepted == outcome)
            .map(|(_, value)| value)
            .sum();
        *by_value.entry(value).or_insert(0.0) += probability;
    }
    by_value
}

fn assert_matches(entries: &[PayoutEntry], expected: &BTreeMap<u64, f64>) {
    let nonzero: Vec<&PayoutEntry> = entries.iter().filter(|e| e.probability > 0.0).collect();
    assert_eq!(nonzero.len(), expected.len());
    for (entry, (&value, &probability)) in nonzero.iter().zip(expected) {
        assert_eq!(entry.value, value);
        assert_relative_eq!(entry.probability, probability, epsilon = 1e-12);
    }
}

fn make_overlapping_portfolio() -> Portfolio {
    let picks = [
        [1, 0, 0, 0, 0],
        [1, 3, 0, 0, 0],
        [1, 3, 2, 0, 0],
        [0, 3, 0, 0, 4],
        [0, 0, 0, 0, 4],
        [2, 0, 0, 1, 0],
        [1, 0, 0, 0, 0],
        [4, 4, 4, 4, 4],
    ];
    Portfolio::from_wagers(
        picks
            .into_iter()
            .map(|p| Wager::new(Selection::new(p).unwrap(), Some(3_000)).unwrap()),
    )
    .unwrap()
}

#[test]
fn test_distribution_matches_enumeration() {
    let round = load_fixture_round();
    let portfolio = make_overlapping_portfolio();
    let calc = RoundCalculator::default().calculate(&round, &portfolio);
    assert!(calc.calculated);

    let accepted: Vec<(Mask, u64, u64)> = portfolio
        .active()
        .map(|(index, wager)| {
            let value = &calc.valuations[&index];
            (codec::acceptance_mask(&wager.selection), value.odds, value.payoff)
        })
        .collect();

    let by_odds: Vec<(Mask, u64)> = accepted.iter().map(|&(m, o, _)| (m, o)).collect();
    let by_payoff: Vec<(Mask, u64)> = accepted.iter().map(|&(m, _, p)| (m, p)).collect();

    assert_matches(&calc.payout_tables.odds, &brute_force(&by_odds, &calc.used));
    assert_matches(&calc.payout_tables.winnings, &brute_force(&by_payoff, &calc.used));
}

#[test]
fn test_distribution_totals_one_under_logit() {
    let round = load_fixture_round();
    let settings = EngineSettings {
        use_logit_model: true,
        ..Default::default()
    };
    let calc = RoundCalculator::new(settings).calculate(&round, &make_overlapping_portfolio());
    let entries = &calc.payout_tables.winnings;

    let total: f64 = entries.iter().map(|e| e.probability).sum();
    assert_relative_eq!(total, 1.0, epsilon = 1e-9);
    assert_relative_eq!(entries.last().unwrap().cumulative, 1.0, epsilon = 1e-9);
    assert_relative_eq!(entries[0].tail, 1.0);
    for pair in entries.windows(2) {
        assert!(pair[0].value < pair[1].value);
        assert_relative_eq!(pair[1].tail, pair[0].tail - pair[0].probability, epsilon = 1e-12);
    }
}

#[test]
fn test_worked_example() {
    let mut probabilities = [[1.0, 0.25, 0.25, 0.25, 0.25]; 5];
    probabilities[0] = [1.0, 0.5, 0.2, 0.2, 0.1];

    let a = codec::acceptance_mask(&Selection::new([1, 0, 0, 0, 0]).unwrap());
    let b = codec::acceptance_mask(&Selection::new([2, 0, 0, 0, 0]).unwrap());
    let c = codec::acceptance_mask(&Selection::new([3, 0, 0, 0, 0]).unwrap());
    let entries = payout::distribution([(a, 0), (b, 4), (c, 9)], &probabilities);

    let rows: Vec<(u64, f64)> = entries.iter().map(|e| (e.value, e.probability)).collect();
    assert_eq!(rows.len(), 3);
    assert_eq!(rows[0].0, 0);
    assert_relative_eq!(rows[0].1, 0.6, epsilon = 1e-12);
    assert_eq!(rows[1].0, 4);
    assert_relative_eq!(rows[1].1, 0.2, epsilon = 1e-12);
    assert_eq!(rows[2].0, 9);
    assert_relative_eq!(rows[2].1, 0.2, epsilon = 1e-12);
}

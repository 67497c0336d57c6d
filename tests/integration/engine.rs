//! Round calculation over the fixture round.

use approx::assert_relative_eq;
use foodclub::config::{AppConfig, EngineSettings};
use foodclub::engine::RoundCalculator;
use foodclub::probability::ProbabilityModel;
use foodclub::storage;
use foodclub::types::{Portfolio, RoundData, Selection, Wager};

use crate::{fixture_path, load_fixture_round};

fn make_portfolio() -> Portfolio {
    Portfolio::from_wagers([
        Wager::new(Selection::new([1, 3, 0, 0, 0]).unwrap(), Some(1_000)).unwrap(),
        Wager::new(Selection::new([1, 0, 2, 1, 0]).unwrap(), Some(500)).unwrap(),
        Wager::new(Selection::new([2, 0, 0, 0, 0]).unwrap(), Some(2_000)).unwrap(),
        Wager::unplaced(Selection::new([0, 0, 0, 0, 4]).unwrap()),
    ])
    .unwrap()
}

#[test]
fn test_fixture_loads() {
    let round = load_fixture_round();
    assert_eq!(round.round, 9112);
    assert!(round.is_valid());
    assert!(round.is_concluded());
    assert!(round.food_table().is_some());
    assert!(round.last_change.is_some());
    assert!(storage::load_round(&fixture_path("missing.json")).is_err());
}

#[test]
fn test_used_tables_are_normalized() {
    let round = load_fixture_round();
    for use_logit_model in [false, true] {
        let settings = EngineSettings {
            use_logit_model,
            ..Default::default()
        };
        let calc = RoundCalculator::new(settings).calculate(&round, &Portfolio::default());
        assert!(calc.calculated);
        for arena in calc.used {
            assert_eq!(arena[0], 1.0);
            let total: f64 = arena[1..].iter().sum();
            assert_relative_eq!(total, 1.0, epsilon = 1e-9);
            assert!(arena[1..].iter().all(|&p| (0.0..=1.0).contains(&p)));
        }
    }
}

#[test]
fn test_summary_against_winning_combination() {
    let round = load_fixture_round();
    let calc = RoundCalculator::default().calculate(&round, &make_portfolio());

    assert_eq!(calc.summary.enabled_wagers, 4);
    assert_eq!(calc.summary.total_stake, 3_500);
    // Winners [1, 3, 2, 1, 4]: wagers 1 (2 x 3), 2 (2 x 3 x 2) and 4 (5) win.
    assert_eq!(calc.summary.winning_odds, 6 + 12 + 5);
    assert_eq!(calc.summary.winning_payoff, 6_000 + 6_000);

    // An unset stake pays nothing but still has odds.
    let unplaced = &calc.valuations[&4];
    assert_eq!(unplaced.odds, 5);
    assert_eq!(unplaced.payoff, 0);
}

#[test]
fn test_empty_portfolio_distribution() {
    let round = load_fixture_round();
    let calc = RoundCalculator::default().calculate(&round, &Portfolio::empty(10).unwrap());
    assert_eq!(calc.payout_tables.odds.len(), 1);
    assert_eq!(calc.payout_tables.odds[0].value, 0);
    assert_relative_eq!(calc.payout_tables.odds[0].probability, 1.0);
    assert_eq!(calc.summary.enabled_wagers, 0);
}

#[test]
fn test_calculation_is_deterministic() {
    let round = load_fixture_round();
    let calculator = RoundCalculator::default();
    let first = calculator.calculate(&round, &make_portfolio());
    let second = calculator.calculate(&round, &make_portfolio());
    assert_eq!(first, second);
    assert_eq!(
        serde_json::to_string(&first).unwrap(),
        serde_json::to_string(&second).unwrap()
    );
}

#[test]
fn test_settings_from_default_config() {
    let round = load_fixture_round();
    let settings = EngineSettings::from_config(&AppConfig::default(), round.round);
    let calc = RoundCalculator::new(settings).calculate(&round, &make_portfolio());
    assert_eq!(calc.model, ProbabilityModel::Legacy);
}

#[test]
fn test_missing_round_degrades() {
    let round = RoundData {
        round: 9112,
        ..Default::default()
    };
    let calc = RoundCalculator::default().calculate(&round, &make_portfolio());
    assert!(!calc.calculated);
    assert!(calc.valuations.is_empty());
}

//! Generators driven from a calculated fixture round.

use std::collections::HashSet;

use foodclub::codec::{self, Mask};
use foodclub::config::{max_bet_for_round, EngineSettings};
use foodclub::engine::RoundCalculator;
use foodclub::generators::{GeneratorConfig, Strategy};
use foodclub::storage;
use foodclub::types::{EngineError, Selection, MAX_STAKE};
use foodclub::valuation::{self, selection_odds};
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::load_fixture_round;

fn make_config(max_bet: Option<u32>) -> GeneratorConfig {
    GeneratorConfig {
        max_bet,
        round: 9112,
        ..Default::default()
    }
}

fn active_masks(portfolio: &foodclub::types::Portfolio) -> Vec<Mask> {
    portfolio
        .active()
        .map(|(_, w)| codec::encode(&w.selection))
        .collect()
}

#[test]
fn test_every_strategy_builds_a_valid_portfolio() {
    let round = load_fixture_round();
    let calculator = RoundCalculator::default();
    let generator = calculator.generator(&round, make_config(Some(8_000))).unwrap();
    let mut rng = StdRng::seed_from_u64(9112);

    for strategy in [
        Strategy::MaxTer,
        Strategy::Gambit,
        Strategy::Bustproof,
        Strategy::Crazy,
        Strategy::Winning,
    ] {
        let generated = generator.generate(strategy, &round, &mut rng).unwrap();
        let portfolio = &generated.portfolio;
        assert_eq!(portfolio.len(), 10, "{strategy}");
        assert!(portfolio.has_active_wagers(), "{strategy}");
        assert!(valuation::duplicate_masks(portfolio).is_empty(), "{strategy}");
        for (_, wager) in portfolio.active() {
            if let Some(stake) = wager.stake {
                assert!((1..=MAX_STAKE).contains(&stake));
            }
        }

        let calc = calculator.calculate(&round, portfolio);
        let total: f64 = calc.payout_tables.odds.iter().map(|e| e.probability).sum();
        assert!((total - 1.0).abs() < 1e-9, "{strategy}");
    }
}

#[test]
fn test_bustproof_on_fixture_never_busts() {
    let round = load_fixture_round();
    let generator = RoundCalculator::default()
        .generator(&round, make_config(Some(10_000)))
        .unwrap();
    let generated = generator.bustproof().unwrap();
    assert_eq!(generated.label, "Bustproof Set (round 9112)");

    // Arenas 0, 1 and 3 pay over a fair book in the fixture.
    let ratios = valuation::arena_ratios(generator.odds());
    let positive: Vec<usize> = (0..5).filter(|&a| ratios[a] > 0.0).collect();
    assert_eq!(positive, vec![0, 1, 3]);

    let masks = active_masks(&generated.portfolio);
    assert_eq!(masks.len(), 10);
    let mut busts = 0;
    for a in 1..=4u8 {
        for b in 1..=4u8 {
            for d in 1..=4u8 {
                let outcome = codec::encode(&Selection::new([a, b, 1, d, 1]).unwrap())
                    | codec::ARENA_FIELDS[2]
                    | codec::ARENA_FIELDS[4];
                if !masks.iter().any(|&m| codec::wins(m, outcome)) {
                    busts += 1;
                }
            }
        }
    }
    assert_eq!(busts, 0);

    // Equalized stakes: every winning wager returns about the same.
    let returns: Vec<u64> = generated
        .portfolio
        .active()
        .map(|(_, w)| u64::from(w.stake.unwrap()) * selection_odds(&w.selection, generator.odds()))
        .collect();
    let lowest = *returns.iter().min().unwrap();
    let highest = *returns.iter().max().unwrap();
    assert!(highest - lowest < 200);
}

#[test]
fn test_winning_replay_contains_the_winner() {
    let round = load_fixture_round();
    let generator = RoundCalculator::default()
        .generator(&round, make_config(None))
        .unwrap();
    let generated = generator.winning_replay(&round).unwrap();
    let calc = RoundCalculator::default().calculate(&round, &generated.portfolio);

    // Every gambit wager is a subset of the winning combination, so all win.
    assert_eq!(calc.summary.enabled_wagers, 10);
    let winning = calc.winning_mask;
    assert_eq!(winning, codec::encode(&Selection::new([1, 3, 2, 1, 4]).unwrap()));
    for mask in active_masks(&generated.portfolio) {
        assert!(codec::wins(mask, winning));
    }

    let mut running = load_fixture_round();
    running.winners = Some(vec![0; 5]);
    assert_eq!(
        generator.winning_replay(&running),
        Err(EngineError::RoundNotConcluded(9112))
    );
}

#[test]
fn test_ten_bet_around_fixed_picks() {
    let round = load_fixture_round();
    let generator = RoundCalculator::default()
        .generator(&round, make_config(max_bet_for_round(-10_000, 9112)))
        .unwrap();
    let fixed = Selection::new([1, 0, 0, 1, 0]).unwrap();
    let generated = generator.ten_bet(&fixed).unwrap();
    assert_eq!(generated.label, "Custom Ten-bet Set (8224 NP)");

    let fixed_mask = codec::encode(&fixed);
    let masks = active_masks(&generated.portfolio);
    assert_eq!(masks.len(), 10);
    assert_eq!(masks.iter().collect::<HashSet<_>>().len(), 10);
    assert!(masks.iter().all(|m| m & fixed_mask == fixed_mask));
}

#[test]
fn test_custom_odds_drive_generation() {
    let round = load_fixture_round();
    let settings = EngineSettings {
        custom_odds_mode: true,
        custom_odds: Some([[1, 13, 13, 13, 13]; 5]),
        ..Default::default()
    };
    let generator = RoundCalculator::new(settings)
        .generator(&round, make_config(None))
        .unwrap();
    assert_eq!(generator.odds()[2], [1, 13, 13, 13, 13]);
    // Every arena pays over a fair book, so three arenas are hedged.
    assert_eq!(active_masks(&generator.bustproof().unwrap().portfolio).len(), 10);
}

#[test]
fn test_generated_portfolio_survives_storage() {
    let round = load_fixture_round();
    let generator = RoundCalculator::default()
        .generator(&round, make_config(Some(2_500)))
        .unwrap();
    let generated = generator.max_ter().unwrap();

    let mut path = std::env::temp_dir();
    path.push(format!("foodclub_generated_{}.json", uuid::Uuid::new_v4()));
    let path = path.to_string_lossy().to_string();

    storage::save_portfolio(&generated.portfolio, &path).unwrap();
    let loaded = storage::load_portfolio(&path).unwrap().unwrap();
    assert_eq!(loaded, generated.portfolio);
    std::fs::remove_file(&path).unwrap();
}

//! Per-wager display metrics, arena ratios and portfolio summaries.
//!
//! These numbers treat a wildcard arena as a factor of 1 in both the odds and
//! the probability product. That is a display and ranking approximation; the
//! exact aggregate distribution comes from [`crate::payout`].

use serde::Serialize;
use std::collections::{BTreeMap, HashSet};
use tracing::debug;

use crate::codec::{self, Mask};
use crate::types::{
    OddsTable, Portfolio, ProbabilityTable, Selection, Wager, ARENA_COUNT, MAX_STAKE, PAYOFF_CAP,
};

// ---------------------------------------------------------------------------
// Wager valuation
// ---------------------------------------------------------------------------

/// Metrics for one wager against an odds and probability table.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct WagerValuation {
    pub mask: Mask,
    /// Product of picked odds; 0 for an inactive wager.
    pub odds: u64,
    /// Product of picked probabilities; 0 for an inactive wager.
    pub probability: f64,
    /// `min(1_000_000, stake * odds)`.
    pub payoff: u64,
    pub expected_ratio: f64,
    pub net_expected: f64,
    /// Largest stake whose payoff does not exceed the cap.
    pub cap_stake: u64,
}

/// Odds product over the picked arenas, 1 for an empty selection.
pub fn selection_odds(selection: &Selection, odds: &OddsTable) -> u64 {
    selection
        .picks()
        .iter()
        .enumerate()
        .filter(|(_, &slot)| slot > 0)
        .map(|(arena, &slot)| u64::from(odds[arena][slot as usize]))
        .product()
}

/// Probability product over the picked arenas, 1 for an empty selection.
pub fn selection_probability(selection: &Selection, probabilities: &ProbabilityTable) -> f64 {
    selection
        .picks()
        .iter()
        .enumerate()
        .filter(|(_, &slot)| slot > 0)
        .map(|(arena, &slot)| probabilities[arena][slot as usize])
        .product()
}

/// Value a single wager. An unset stake counts as 0.
pub fn value_wager(
    wager: &Wager,
    odds: &OddsTable,
    probabilities: &ProbabilityTable,
) -> WagerValuation {
    let mask = codec::encode(&wager.selection);
    let (total_odds, probability) = if mask == 0 {
        (0, 0.0)
    } else {
        (
            selection_odds(&wager.selection, odds),
            selection_probability(&wager.selection, probabilities),
        )
    };

    let stake = u64::from(wager.stake.unwrap_or(0));
    let payoff = (stake * total_odds).min(PAYOFF_CAP);

    WagerValuation {
        mask,
        odds: total_odds,
        probability,
        payoff,
        expected_ratio: total_odds as f64 * probability,
        net_expected: payoff as f64 * probability - stake as f64,
        cap_stake: PAYOFF_CAP / total_odds.max(1),
    }
}

/// Value every wager of a portfolio, keyed by wager index.
pub fn value_portfolio(
    portfolio: &Portfolio,
    odds: &OddsTable,
    probabilities: &ProbabilityTable,
) -> BTreeMap<usize, WagerValuation> {
    portfolio
        .iter()
        .map(|(index, wager)| (index, value_wager(wager, odds, probabilities)))
        .collect()
}

/// Bookmaker overlay per arena: `1 / Σ(1/odds) - 1`. Positive means the
/// arena pays more than a fair book.
pub fn arena_ratios(odds: &OddsTable) -> [f64; ARENA_COUNT] {
    odds.map(|arena| {
        let implied: f64 = arena[1..].iter().map(|&o| 1.0 / f64::from(o.max(1))).sum();
        1.0 / implied - 1.0
    })
}

// ---------------------------------------------------------------------------
// Portfolio summary
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct PortfolioSummary {
    pub enabled_wagers: usize,
    pub total_stake: u64,
    pub total_expected_ratio: f64,
    pub total_net_expected: f64,
    pub winning_odds: u64,
    pub winning_payoff: u64,
}

/// Totals over active wagers, plus what they collect against `winning`.
/// A zero winning mask (round still running) collects nothing.
pub fn summarize(
    portfolio: &Portfolio,
    valuations: &BTreeMap<usize, WagerValuation>,
    winning: Mask,
) -> PortfolioSummary {
    let mut summary = PortfolioSummary::default();

    for (index, wager) in portfolio.active() {
        let Some(value) = valuations.get(&index) else {
            continue;
        };
        let stake = u64::from(wager.stake.unwrap_or(0));
        summary.enabled_wagers += 1;
        summary.total_stake += stake;
        summary.total_expected_ratio += value.expected_ratio;
        summary.total_net_expected += value.net_expected;

        if codec::is_subset(value.mask, winning) {
            summary.winning_odds += value.odds;
            summary.winning_payoff += (value.odds * stake).min(PAYOFF_CAP);
        }
    }

    debug!(
        enabled = summary.enabled_wagers,
        total_stake = summary.total_stake,
        winning_odds = summary.winning_odds,
        "Portfolio summarized"
    );
    summary
}

/// Masks that appear more than once among active wagers, each listed once.
pub fn duplicate_masks(portfolio: &Portfolio) -> Vec<Mask> {
    let mut seen = HashSet::new();
    let mut duplicates = Vec::new();
    for (_, wager) in portfolio.active() {
        let mask = codec::encode(&wager.selection);
        if !seen.insert(mask) && !duplicates.contains(&mask) {
            duplicates.push(mask);
        }
    }
    duplicates
}

// ---------------------------------------------------------------------------
// Stake helpers
// ---------------------------------------------------------------------------

/// Stake for a generated wager: unset without a max bet, otherwise the
/// smallest of the max bet, the wager's cap and the stake limit.
pub fn determine_bet_amount(max_bet: Option<u32>, cap: u64) -> Option<u32> {
    let max_bet = max_bet?;
    let cap = u32::try_from(cap).unwrap_or(u32::MAX);
    Some(max_bet.min(cap).min(MAX_STAKE).max(1))
}

/// Stake that first reaches the payoff cap at `odds`.
pub fn cap_crossing_stake(odds: u64) -> u64 {
    PAYOFF_CAP.div_ceil(odds.max(1))
}

/// A copy of `portfolio` with every active wager staked at `value`, or at
/// [`determine_bet_amount`] of its cap-crossing stake when `capped`.
/// Inactive wagers are left unset.
pub fn with_uniform_stake(
    portfolio: &Portfolio,
    value: Option<u32>,
    capped: bool,
    odds: &OddsTable,
) -> Portfolio {
    portfolio.map_wagers(|wager| {
        let stake = if !wager.is_active() {
            None
        } else if capped {
            let total_odds = selection_odds(&wager.selection, odds);
            determine_bet_amount(value, cap_crossing_stake(total_odds))
        } else {
            value.map(|v| v.clamp(1, MAX_STAKE))
        };
        Wager {
            selection: wager.selection,
            stake,
        }
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

//! Candidate ranking and the ranking-driven generators.
//!
//! `rank` walks the cartesian product of per-arena candidate slots (arena 0
//! outermost) and scores every non-empty selection. Every generator except
//! bustproof is a different slice of that table.

use rand::seq::SliceRandom;
use rand::Rng;
use serde::Serialize;
use std::collections::HashMap;

use super::{GeneratedPortfolio, Generator};
use crate::codec::{self, Mask};
use crate::types::{
    EngineError, OddsTable, Portfolio, ProbabilityTable, RoundData, Selection, ARENA_COUNT,
    PAYOFF_CAP,
};
use crate::valuation::{
    cap_crossing_stake, determine_bet_amount, selection_odds, selection_probability,
};

/// Wildcard plus every competitor.
const ANY_PICK: &[u8] = &[0, 1, 2, 3, 4];
/// Every competitor, no wildcard.
const FULL_PICK: &[u8] = &[1, 2, 3, 4];

// ---------------------------------------------------------------------------
// Ranking
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RankedBet {
    pub mask: Mask,
    /// Stake at which the payoff first reaches the cap.
    pub cap: u64,
    pub total_odds: u64,
    pub win_chance: f64,
    pub metric: f64,
}

/// Ranked candidates in the order the cartesian walk first produced them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RankTable {
    entries: Vec<RankedBet>,
}

impl RankTable {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, mask: Mask) -> Option<&RankedBet> {
        self.entries.iter().find(|bet| bet.mask == mask)
    }

    pub fn iter(&self) -> impl Iterator<Item = &RankedBet> {
        self.entries.iter()
    }

    /// Highest metric first; ties keep walk order.
    pub fn by_metric(&self) -> Vec<RankedBet> {
        self.sorted_desc(|bet| bet.metric)
    }

    /// Highest total odds first; ties keep walk order.
    pub fn by_odds(&self) -> Vec<RankedBet> {
        self.sorted_desc(|bet| bet.total_odds as f64)
    }

    fn sorted_desc(&self, key: impl Fn(&RankedBet) -> f64) -> Vec<RankedBet> {
        let mut sorted = self.entries.clone();
        sorted.sort_by(|a, b| {
            key(b)
                .partial_cmp(&key(a))
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        sorted
    }
}

/// Score every selection in the product of `candidates`.
///
/// With a max bet the metric is the expected net return of staking
/// `min(max_bet, cap)`; without one it is the expected ratio.
pub fn rank(
    candidates: &[&[u8]; ARENA_COUNT],
    odds: &OddsTable,
    probabilities: &ProbabilityTable,
    max_bet: Option<u32>,
) -> RankTable {
    let combinations: usize = candidates.iter().map(|slots| slots.len()).product();
    let mut entries: Vec<RankedBet> = Vec::new();
    let mut positions: HashMap<Mask, usize> = HashMap::new();

    for code in 0..combinations {
        let mut picks = [0u8; ARENA_COUNT];
        let mut rest = code;
        for arena in (0..ARENA_COUNT).rev() {
            let slots = candidates[arena];
            picks[arena] = slots[rest % slots.len()];
            rest /= slots.len();
        }
        let Ok(selection) = Selection::new(picks) else {
            continue;
        };
        let mask = codec::encode(&selection);
        if mask == 0 {
            continue;
        }

        let total_odds = selection_odds(&selection, odds).max(1);
        let win_chance = selection_probability(&selection, probabilities);
        let cap = cap_crossing_stake(total_odds);
        let metric = match max_bet {
            Some(max_bet) => {
                let max_bet = u64::from(max_bet);
                let winnings = (max_bet * total_odds).min(PAYOFF_CAP) as f64;
                let stake = cap.min(max_bet).max(1) as f64;
                (win_chance * winnings / stake - 1.0) * stake
            }
            None => total_odds as f64 * win_chance,
        };

        let bet = RankedBet {
            mask,
            cap,
            total_odds,
            win_chance,
            metric,
        };
        match positions.get(&mask) {
            Some(&at) => entries[at] = bet,
            None => {
                positions.insert(mask, entries.len());
                entries.push(bet);
            }
        }
    }

    RankTable { entries }
}

// ---------------------------------------------------------------------------
// Ranking-driven generators
// ---------------------------------------------------------------------------

impl Generator {
    fn staked(&self, bet: &RankedBet) -> (Mask, Option<u32>) {
        (bet.mask, determine_bet_amount(self.config.max_bet, bet.cap))
    }

    /// The `bet_count` best selections by metric over the whole space.
    pub fn max_ter(&self) -> Result<GeneratedPortfolio, EngineError> {
        let table = self.rank_candidates(&[ANY_PICK; ARENA_COUNT]);
        let ranked = table.by_metric();
        Ok(GeneratedPortfolio {
            label: format!("Max TER Set ({} NP)", self.max_bet_label()),
            portfolio: self.fill(ranked.iter().map(|bet| self.staked(bet)))?,
        })
    }

    /// Best selections by metric that all contain the 1 to 3 picks of
    /// `fixed`. Stops early when the candidates run out.
    pub fn ten_bet(&self, fixed: &Selection) -> Result<GeneratedPortfolio, EngineError> {
        let picked = fixed.pick_count();
        if !(1..=3).contains(&picked) {
            return Err(EngineError::InvalidPickCount {
                expected: "1 to 3".to_string(),
                actual: picked,
            });
        }
        let fixed_mask = codec::encode(fixed);

        let table = self.rank_candidates(&[ANY_PICK; ARENA_COUNT]);
        let ranked = table.by_metric();
        let matching = ranked
            .iter()
            .filter(|bet| bet.mask & fixed_mask == fixed_mask)
            .map(|bet| self.staked(bet));
        Ok(GeneratedPortfolio {
            label: format!("Custom Ten-bet Set ({} NP)", self.max_bet_label()),
            portfolio: self.fill(matching)?,
        })
    }

    /// Gambit around the full selection with the best metric.
    pub fn gambit(&self) -> Result<GeneratedPortfolio, EngineError> {
        let table = self.rank_candidates(&[FULL_PICK; ARENA_COUNT]);
        let best = table
            .by_metric()
            .first()
            .map(|bet| codec::decode(bet.mask))
            .ok_or(EngineError::MissingRoundData)?;
        self.gambit_with(&best)
    }

    /// The full selection `picks` and its highest-odds subsets, each arena
    /// either kept or wildcarded. Every wager is a subset of `picks`.
    pub fn gambit_with(&self, picks: &Selection) -> Result<GeneratedPortfolio, EngineError> {
        Ok(GeneratedPortfolio {
            label: format!("Custom Gambit Set ({} NP)", self.max_bet_label()),
            portfolio: self.gambit_portfolio(picks, true)?,
        })
    }

    /// Gambit around the round's actual result, stakes left unset.
    pub fn winning_replay(&self, round: &RoundData) -> Result<GeneratedPortfolio, EngineError> {
        if !round.is_concluded() {
            return Err(EngineError::RoundNotConcluded(round.round));
        }
        Ok(GeneratedPortfolio {
            label: format!("Winning Gambit Set (round {})", round.round),
            portfolio: self.gambit_portfolio(&round.winning_selection(), false)?,
        })
    }

    /// `bet_count` full selections drawn in random order.
    pub fn random_crazy<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
    ) -> Result<GeneratedPortfolio, EngineError> {
        let table = self.rank_candidates(&[FULL_PICK; ARENA_COUNT]);
        let mut pool: Vec<&RankedBet> = table.iter().collect();
        pool.shuffle(rng);
        Ok(GeneratedPortfolio {
            label: format!("Crazy Set ({} NP)", self.max_bet_label()),
            portfolio: self.fill(pool.into_iter().map(|bet| self.staked(bet)))?,
        })
    }

    fn gambit_portfolio(
        &self,
        picks: &Selection,
        with_stakes: bool,
    ) -> Result<Portfolio, EngineError> {
        let picked = picks.pick_count();
        if picked != ARENA_COUNT {
            return Err(EngineError::InvalidPickCount {
                expected: ARENA_COUNT.to_string(),
                actual: picked,
            });
        }
        let columns = picks.picks().map(|slot| [0, slot]);
        let candidates: [&[u8]; ARENA_COUNT] = std::array::from_fn(|arena| &columns[arena][..]);

        let table = self.rank_candidates(&candidates);
        let ranked = table.by_odds();
        self.fill(ranked.iter().map(|bet| {
            let (mask, stake) = self.staked(bet);
            (mask, stake.filter(|_| with_stakes))
        }))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

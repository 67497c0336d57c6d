//! Shared types for the Food Club engine.
//!
//! These types form the data model used across all modules: the read-only
//! round record, selections, wagers, portfolios, and the fixed-size odds and
//! probability tables. Every table is indexed `[arena][slot]` with slot 0
//! reserved for the wildcard convention.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Number of independent arenas in a round.
pub const ARENA_COUNT: usize = 5;
/// Competitors per arena.
pub const SLOTS_PER_ARENA: usize = 4;
/// Foods served in each arena.
pub const FOODS_PER_ARENA: usize = 10;

/// Lowest and highest odds a competitor can be quoted at.
pub const MIN_ODDS: u32 = 2;
pub const MAX_ODDS: u32 = 13;

/// Largest stake a single wager accepts.
pub const MAX_STAKE: u32 = 500_000;
/// Hard cap on the payoff of a single wager.
pub const PAYOFF_CAP: u64 = 1_000_000;
/// Raw stake value meaning "not placed".
pub const UNSET_STAKE: i64 = -1000;

/// Portfolio sizes.
pub const DEFAULT_PORTFOLIO_SIZE: usize = 10;
pub const MAX_PORTFOLIO_SIZE: usize = 15;

/// Odds per arena. Slot 0 is the wildcard and always holds 1.
pub type OddsTable = [[u32; SLOTS_PER_ARENA + 1]; ARENA_COUNT];

/// Probabilities per arena. Slot 0 is the wildcard and always holds 1.
pub type ProbabilityTable = [[f64; SLOTS_PER_ARENA + 1]; ARENA_COUNT];

/// A probability table carrying nothing but the wildcard convention.
pub const EMPTY_PROBABILITIES: ProbabilityTable = [[1.0, 0.0, 0.0, 0.0, 0.0]; ARENA_COUNT];

/// An odds table where every slot is treated as 1.
pub const NEUTRAL_ODDS: OddsTable = [[1; SLOTS_PER_ARENA + 1]; ARENA_COUNT];

/// Map an odds value into the valid domain. Anything outside `2..=13`
/// (including 0) reads as 1 so downstream divisions stay finite.
pub fn sanitize_odds(value: u32) -> u32 {
    if (MIN_ODDS..=MAX_ODDS).contains(&value) {
        value
    } else {
        1
    }
}

// ---------------------------------------------------------------------------
// Round data
// ---------------------------------------------------------------------------

/// One round as published upstream. Immutable once fetched.
///
/// Every field is optional on the wire: very old rounds lack foods, rounds
/// in progress have no winners, and a default record stands for "no data".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoundData {
    #[serde(default)]
    pub round: u32,
    /// Competitor ids, `[arena][slot - 1]`.
    #[serde(default)]
    pub pirates: Vec<Vec<u32>>,
    /// `[arena][slot]`, slot 0 unused.
    #[serde(default)]
    pub opening_odds: Vec<Vec<u32>>,
    /// `[arena][slot]`, slot 0 unused.
    #[serde(default)]
    pub current_odds: Vec<Vec<u32>>,
    /// Food ids, `[arena][0..10]`.
    #[serde(default)]
    pub foods: Option<Vec<Vec<u32>>>,
    /// Winning slot per arena, 0 until the round ends.
    #[serde(default)]
    pub winners: Option<Vec<u8>>,
    #[serde(default)]
    pub timestamp: Option<DateTime<Utc>>,
    #[serde(default)]
    pub start: Option<DateTime<Utc>>,
    #[serde(default)]
    pub last_change: Option<DateTime<Utc>>,
}

impl RoundData {
    /// Whether the record carries enough to run the engine at all.
    pub fn is_valid(&self) -> bool {
        self.round != 0
            && self
                .pirates
                .first()
                .and_then(|arena| arena.first())
                .is_some_and(|&id| id != 0)
    }

    /// Competitor ids as a fixed table, or `None` if the shape is off.
    pub fn pirate_table(&self) -> Option<[[u32; SLOTS_PER_ARENA]; ARENA_COUNT]> {
        fixed_rows(&self.pirates)
    }

    /// Food ids as a fixed table, or `None` for rounds without food data.
    pub fn food_table(&self) -> Option<[[u32; FOODS_PER_ARENA]; ARENA_COUNT]> {
        self.foods.as_deref().and_then(fixed_rows)
    }

    /// Opening odds with slot 0 forced to 1 and values sanitized.
    pub fn opening_odds_table(&self) -> Option<OddsTable> {
        fixed_rows(&self.opening_odds).map(normalize_odds_table)
    }

    /// Current odds with slot 0 forced to 1 and values sanitized.
    pub fn current_odds_table(&self) -> Option<OddsTable> {
        fixed_rows(&self.current_odds).map(normalize_odds_table)
    }

    /// The winning combination, empty while the round is running.
    pub fn winning_selection(&self) -> Selection {
        let Some(winners) = self.winners.as_deref() else {
            return Selection::EMPTY;
        };
        let mut picks = [0u8; ARENA_COUNT];
        for (pick, &winner) in picks.iter_mut().zip(winners) {
            *pick = winner;
        }
        Selection::new(picks).unwrap_or(Selection::EMPTY)
    }

    /// Every arena has a declared winner.
    pub fn is_concluded(&self) -> bool {
        self.winning_selection().pick_count() == ARENA_COUNT
    }

    /// Percentage (0 to 100) of the 24-hour round that has elapsed at `now`.
    pub fn round_progress(&self, now: DateTime<Utc>) -> f64 {
        let Some(start) = self.start else {
            return 0.0;
        };
        let total = Duration::days(1).num_milliseconds() as f64;
        let elapsed = (now - start).num_milliseconds() as f64;
        (100.0 * elapsed / total).clamp(0.0, 100.0)
    }
}

fn fixed_rows<const N: usize>(rows: &[Vec<u32>]) -> Option<[[u32; N]; ARENA_COUNT]> {
    if rows.len() < ARENA_COUNT {
        return None;
    }
    let mut table = [[0u32; N]; ARENA_COUNT];
    for (target, row) in table.iter_mut().zip(rows) {
        if row.len() < N {
            return None;
        }
        target.copy_from_slice(&row[..N]);
    }
    Some(table)
}

/// Force the wildcard slot to 1 and sanitize the competitor slots.
pub fn normalize_odds_table(mut table: OddsTable) -> OddsTable {
    for arena in table.iter_mut() {
        arena[0] = 1;
        for odds in arena.iter_mut().skip(1) {
            *odds = sanitize_odds(*odds);
        }
    }
    table
}

impl fmt::Display for RoundData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Round {}", self.round)?;
        if self.is_concluded() {
            write!(f, " (winners: {})", self.winning_selection())?;
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Selection
// ---------------------------------------------------------------------------

/// A 5-slot pick vector: 0 is "no preference", 1 to 4 a specific competitor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "[u8; 5]", into = "[u8; 5]")]
pub struct Selection([u8; ARENA_COUNT]);

impl Selection {
    pub const EMPTY: Selection = Selection([0; ARENA_COUNT]);

    /// Build a selection, rejecting any entry outside `0..=4`.
    pub fn new(picks: [u8; ARENA_COUNT]) -> Result<Self, EngineError> {
        for (arena, &slot) in picks.iter().enumerate() {
            if slot as usize > SLOTS_PER_ARENA {
                return Err(EngineError::InvalidSelection { arena, slot });
            }
        }
        Ok(Self(picks))
    }

    /// Wrap picks the caller has already range-checked.
    pub(crate) const fn from_checked(picks: [u8; ARENA_COUNT]) -> Self {
        Self(picks)
    }

    /// A selection naming exactly one competitor.
    pub fn single(arena: usize, slot: u8) -> Result<Self, EngineError> {
        Self::EMPTY.with_pick(arena, slot)
    }

    /// Copy of this selection with `arena` set to `slot`.
    pub fn with_pick(mut self, arena: usize, slot: u8) -> Result<Self, EngineError> {
        if arena >= ARENA_COUNT || slot as usize > SLOTS_PER_ARENA {
            return Err(EngineError::InvalidSelection { arena, slot });
        }
        self.0[arena] = slot;
        Ok(self)
    }

    pub fn picks(&self) -> [u8; ARENA_COUNT] {
        self.0
    }

    pub fn pick(&self, arena: usize) -> u8 {
        self.0[arena]
    }

    /// No arena has a pick.
    pub fn is_empty(&self) -> bool {
        self.0.iter().all(|&slot| slot == 0)
    }

    /// Number of arenas with a specific pick.
    pub fn pick_count(&self) -> usize {
        self.0.iter().filter(|&&slot| slot != 0).count()
    }
}

impl TryFrom<[u8; ARENA_COUNT]> for Selection {
    type Error = EngineError;

    fn try_from(picks: [u8; ARENA_COUNT]) -> Result<Self, Self::Error> {
        Selection::new(picks)
    }
}

impl From<Selection> for [u8; ARENA_COUNT] {
    fn from(selection: Selection) -> Self {
        selection.0
    }
}

impl fmt::Display for Selection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.0.iter().map(|slot| slot.to_string()).collect();
        write!(f, "{}", parts.join("-"))
    }
}

// ---------------------------------------------------------------------------
// Wager & portfolio
// ---------------------------------------------------------------------------

/// A selection plus an optional stake (`None` = not placed).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "RawWager")]
pub struct Wager {
    pub selection: Selection,
    pub stake: Option<u32>,
}

/// Wire shape of a [`Wager`] before the stake range is checked.
#[derive(Deserialize)]
struct RawWager {
    selection: Selection,
    #[serde(default)]
    stake: Option<u32>,
}

impl TryFrom<RawWager> for Wager {
    type Error = EngineError;

    fn try_from(raw: RawWager) -> Result<Self, Self::Error> {
        Wager::new(raw.selection, raw.stake)
    }
}

impl Wager {
    /// Build a wager, validating the stake range `1..=500_000`.
    pub fn new(selection: Selection, stake: Option<u32>) -> Result<Self, EngineError> {
        if let Some(amount) = stake {
            if amount == 0 || amount > MAX_STAKE {
                return Err(EngineError::InvalidStake(i64::from(amount)));
            }
        }
        Ok(Self { selection, stake })
    }

    /// A wager without a stake.
    pub fn unplaced(selection: Selection) -> Self {
        Self {
            selection,
            stake: None,
        }
    }

    /// Build from the raw integer convention where `-1000` means unset.
    pub fn from_raw(selection: Selection, raw_stake: i64) -> Result<Self, EngineError> {
        if raw_stake == UNSET_STAKE {
            return Ok(Self::unplaced(selection));
        }
        let stake = u32::try_from(raw_stake).map_err(|_| EngineError::InvalidStake(raw_stake))?;
        Self::new(selection, Some(stake))
    }

    /// Stake in the raw integer convention.
    pub fn raw_stake(&self) -> i64 {
        self.stake.map(i64::from).unwrap_or(UNSET_STAKE)
    }

    /// Whether the wager picks anything at all.
    pub fn is_active(&self) -> bool {
        !self.selection.is_empty()
    }
}

/// Wagers keyed by their 1-based position.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(
    try_from = "BTreeMap<usize, Wager>",
    into = "BTreeMap<usize, Wager>"
)]
pub struct Portfolio {
    wagers: BTreeMap<usize, Wager>,
}

impl Portfolio {
    /// A portfolio of `size` empty wagers.
    pub fn empty(size: usize) -> Result<Self, EngineError> {
        if size > MAX_PORTFOLIO_SIZE {
            return Err(EngineError::PortfolioTooLarge(size));
        }
        let wagers = (1..=size).map(|index| (index, Wager::default())).collect();
        Ok(Self { wagers })
    }

    /// Number the given wagers from 1 in iteration order.
    pub fn from_wagers(wagers: impl IntoIterator<Item = Wager>) -> Result<Self, EngineError> {
        let wagers: BTreeMap<usize, Wager> = wagers
            .into_iter()
            .enumerate()
            .map(|(i, wager)| (i + 1, wager))
            .collect();
        if wagers.len() > MAX_PORTFOLIO_SIZE {
            return Err(EngineError::PortfolioTooLarge(wagers.len()));
        }
        Ok(Self { wagers })
    }

    /// Place `wager` at the 1-based `index`.
    pub fn set(&mut self, index: usize, wager: Wager) -> Result<(), EngineError> {
        if index == 0 || index > MAX_PORTFOLIO_SIZE {
            return Err(EngineError::PortfolioTooLarge(index));
        }
        self.wagers.insert(index, wager);
        Ok(())
    }

    pub fn get(&self, index: usize) -> Option<&Wager> {
        self.wagers.get(&index)
    }

    pub fn len(&self) -> usize {
        self.wagers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.wagers.is_empty()
    }

    /// All wagers in index order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &Wager)> {
        self.wagers.iter().map(|(&index, wager)| (index, wager))
    }

    /// Only wagers that pick something.
    pub fn active(&self) -> impl Iterator<Item = (usize, &Wager)> {
        self.iter().filter(|(_, wager)| wager.is_active())
    }

    pub fn has_active_wagers(&self) -> bool {
        self.active().next().is_some()
    }

    /// A new portfolio with every wager replaced by `f(wager)`, indices kept.
    pub fn map_wagers(&self, mut f: impl FnMut(&Wager) -> Wager) -> Portfolio {
        let wagers = self
            .wagers
            .iter()
            .map(|(&index, wager)| (index, f(wager)))
            .collect();
        Portfolio { wagers }
    }

    /// Index → stake mapping.
    pub fn stakes(&self) -> BTreeMap<usize, Option<u32>> {
        self.iter().map(|(index, wager)| (index, wager.stake)).collect()
    }
}

impl TryFrom<BTreeMap<usize, Wager>> for Portfolio {
    type Error = EngineError;

    fn try_from(wagers: BTreeMap<usize, Wager>) -> Result<Self, Self::Error> {
        if let Some(&bad) = wagers
            .keys()
            .find(|&&index| index == 0 || index > MAX_PORTFOLIO_SIZE)
        {
            return Err(EngineError::PortfolioTooLarge(bad));
        }
        Ok(Self { wagers })
    }
}

impl From<Portfolio> for BTreeMap<usize, Wager> {
    fn from(portfolio: Portfolio) -> Self {
        portfolio.wagers
    }
}

// ---------------------------------------------------------------------------
// Payout distribution
// ---------------------------------------------------------------------------

/// One row of a payout distribution, rows sorted ascending by `value`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PayoutEntry {
    pub value: u64,
    pub probability: f64,
    /// Probability of winning at most `value`.
    pub cumulative: f64,
    /// Probability of winning at least `value`.
    pub tail: f64,
}

/// The two distributions computed per portfolio: total odds won, and
/// capped payoff won.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PayoutTables {
    pub odds: Vec<PayoutEntry>,
    pub winnings: Vec<PayoutEntry>,
}

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Domain-specific error types for the engine.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum EngineError {
    #[error("Invalid selection: arena {arena} cannot pick slot {slot}")]
    InvalidSelection { arena: usize, slot: u8 },

    #[error("Invalid stake: {0} (expected 1..=500000 or -1000 for unset)")]
    InvalidStake(i64),

    #[error("Portfolio index or size out of range: {0}")]
    PortfolioTooLarge(usize),

    #[error("Unknown competitor id: {0}")]
    UnknownCompetitor(u32),

    #[error("Round data is missing or incomplete")]
    MissingRoundData,

    #[error("No arena has a positive ratio")]
    NoPositiveArenas,

    #[error("Round {0} has not concluded")]
    RoundNotConcluded(u32),

    #[error("Invalid pick count: expected {expected}, got {actual}")]
    InvalidPickCount { expected: String, actual: usize },
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

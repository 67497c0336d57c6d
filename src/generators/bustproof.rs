//! Bustproof construction: hedge the best arenas so that some wager wins
//! whatever happens in them.

use tracing::debug;

use super::{sorted_indices, GeneratedPortfolio, Generator};
use crate::codec::{self, Mask};
use crate::types::{EngineError, Portfolio, Wager, DEFAULT_PORTFOLIO_SIZE};
use crate::valuation::{arena_ratios, selection_odds};

impl Generator {
    /// Wagers over the (up to) three best arenas by ratio whose union
    /// covers every outcome of those arenas. With a max bet, stakes are
    /// scaled as `floor(max_bet * min_odds / odds)` so every winning branch
    /// pays about the same.
    pub fn bustproof(&self) -> Result<GeneratedPortfolio, EngineError> {
        let ratios = arena_ratios(&self.odds);
        let positive = ratios.iter().filter(|&&ratio| ratio > 0.0).count();
        if positive == 0 {
            return Err(EngineError::NoPositiveArenas);
        }

        let mut arenas = sorted_indices(&ratios);
        arenas.reverse();
        let (best, second, third) = (arenas[0], arenas[1], arenas[2]);

        let masks: Vec<Mask> = match positive {
            1 => (1..=4).map(|slot| codec::slot_bit(best, slot)).collect(),
            2 => {
                let [fourth_in_best, third_in_best, second_in_best, best_in_best] =
                    self.ranked_slots(best);
                let anchor = codec::slot_bit(best, best_in_best);
                let mut masks: Vec<Mask> = [second_in_best, third_in_best, fourth_in_best]
                    .iter()
                    .map(|&slot| codec::slot_bit(best, slot))
                    .collect();
                masks.extend((1..=4).map(|slot| anchor | codec::slot_bit(second, slot)));
                masks
            }
            _ => {
                let [fourth_in_best, third_in_best, second_in_best, best_in_best] =
                    self.ranked_slots(best);
                let runners_up = self.ranked_slots(second);
                let anchor = codec::slot_bit(best, best_in_best);
                let double_anchor = anchor | codec::slot_bit(second, runners_up[3]);

                let mut masks: Vec<Mask> = [second_in_best, third_in_best, fourth_in_best]
                    .iter()
                    .map(|&slot| codec::slot_bit(best, slot))
                    .collect();
                masks.extend(
                    runners_up[..3]
                        .iter()
                        .map(|&slot| anchor | codec::slot_bit(second, slot)),
                );
                masks.extend((1..=4).map(|slot| double_anchor | codec::slot_bit(third, slot)));
                masks
            }
        };

        let stakes = self.equalized_stakes(&masks);
        debug!(positive, best, wagers = masks.len(), "Bustproof set built");

        let mut portfolio = Portfolio::empty(DEFAULT_PORTFOLIO_SIZE)?;
        for (index, (&mask, stake)) in masks.iter().zip(stakes).enumerate() {
            portfolio.set(index + 1, Wager::new(codec::decode(mask), stake)?)?;
        }

        Ok(GeneratedPortfolio {
            label: format!("Bustproof Set (round {})", self.config.round),
            portfolio,
        })
    }

    /// Slots of `arena` from highest odds to lowest:
    /// `[fourth best, third best, second best, best]`.
    fn ranked_slots(&self, arena: usize) -> [u8; 4] {
        let mut order = sorted_indices(&self.odds[arena]);
        order.reverse();
        // The wildcard column always holds odds 1, so it sorts last.
        [order[0], order[1], order[2], order[3]].map(|slot| slot as u8)
    }

    fn equalized_stakes(&self, masks: &[Mask]) -> Vec<Option<u32>> {
        let Some(max_bet) = self.config.max_bet else {
            return vec![None; masks.len()];
        };
        let odds: Vec<u64> = masks
            .iter()
            .map(|&mask| selection_odds(&codec::decode(mask), &self.odds).max(1))
            .collect();
        let lowest = odds.iter().copied().min().unwrap_or(1);
        odds.iter()
            .map(|&o| {
                let stake = u64::from(max_bet) * lowest / o;
                // A stake of 0 is not placeable; the smallest bet is 1.
                Some(u32::try_from(stake).unwrap_or(u32::MAX).max(1))
            })
            .collect()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

//! Bitmask codec between selections and 20-bit acceptance masks.
//!
//! The 20 bits are the 20 competitors in arena-by-arena order, most
//! significant first: competitor `slot` of `arena` is bit
//! `19 - (slot - 1 + arena * 4)`. A set bit means "accepts this competitor".
//!
//! Two mask forms exist. [`encode`] leaves wildcard arenas empty and is what
//! generators and duplicate checks compare. [`acceptance_mask`] fills
//! wildcard arenas completely and is what the payout engine intersects.

use crate::types::{Selection, ARENA_COUNT, SLOTS_PER_ARENA};

pub type Mask = u32;

/// Accepts every competitor.
pub const FULL_MASK: Mask = 0xFFFFF;

/// `ARENA_FIELDS[a]` covers exactly the four competitors of arena `a`.
pub const ARENA_FIELDS: [Mask; ARENA_COUNT] = [0xF0000, 0xF000, 0xF00, 0xF0, 0xF];

/// `SLOT_COLUMNS[i]` covers slot `i + 1` in every arena.
pub const SLOT_COLUMNS: [Mask; SLOTS_PER_ARENA] = [0x88888, 0x44444, 0x22222, 0x11111];

/// The single bit for `slot` (1..=4) of `arena`; 0 for the wildcard.
pub fn slot_bit(arena: usize, slot: u8) -> Mask {
    if slot == 0 {
        return 0;
    }
    1 << (19 - (slot as usize - 1 + arena * SLOTS_PER_ARENA))
}

/// Encode a selection; wildcard arenas contribute no bits.
pub fn encode(selection: &Selection) -> Mask {
    selection
        .picks()
        .iter()
        .enumerate()
        .fold(0, |mask, (arena, &slot)| mask | slot_bit(arena, slot))
}

/// Encode a selection with wildcard arenas accepting all four competitors.
///
/// An empty selection yields [`FULL_MASK`]; callers skip inactive wagers.
pub fn acceptance_mask(selection: &Selection) -> Mask {
    selection
        .picks()
        .iter()
        .enumerate()
        .fold(0, |mask, (arena, &slot)| {
            let accepted = if slot == 0 {
                ARENA_FIELDS[arena]
            } else {
                slot_bit(arena, slot)
            };
            mask | accepted
        })
}

/// The 4-bit field of `arena`, shifted down so slot 1 is bit 3.
pub fn field(mask: Mask, arena: usize) -> Mask {
    (mask >> ((ARENA_COUNT - 1 - arena) * SLOTS_PER_ARENA)) & 0xF
}

/// Decode a mask with at most one bit per arena back into a selection.
///
/// Outcome-class masks with several bits in a field must never be decoded.
pub fn decode(mask: Mask) -> Selection {
    let mut picks = [0u8; ARENA_COUNT];
    for (arena, pick) in picks.iter_mut().enumerate() {
        let bits = field(mask, arena);
        debug_assert!(
            bits.count_ones() <= 1,
            "arena {arena} field {bits:#06b} has more than one bit set"
        );
        if bits != 0 {
            *pick = (SLOTS_PER_ARENA as u32 - bits.trailing_zeros()) as u8;
        }
    }
    Selection::from_checked(picks)
}

/// Whether the mask admits at least one concrete winning combination.
pub fn is_doable(mask: Mask) -> bool {
    ARENA_FIELDS.iter().all(|&field| mask & field != 0)
}

/// `inner` accepts nothing `outer` rejects.
pub fn is_subset(inner: Mask, outer: Mask) -> bool {
    inner & outer == inner
}

/// A non-empty encoded wager wins when every pick is in the winning mask.
pub fn wins(bet: Mask, winning: Mask) -> bool {
    bet != 0 && is_subset(bet, winning)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn sel(picks: [u8; 5]) -> Selection {
        Selection::new(picks).unwrap()
    }

    #[test]
    fn test_slot_bits_layout() {
        assert_eq!(slot_bit(0, 1), 1 << 19);
        assert_eq!(slot_bit(0, 4), 1 << 16);
        assert_eq!(slot_bit(4, 4), 1);
        assert_eq!(slot_bit(2, 0), 0);
        let column: Mask = (0..ARENA_COUNT).map(|a| slot_bit(a, 1)).sum();
        assert_eq!(column, SLOT_COLUMNS[0]);
    }

    #[test]
    fn test_encode_leaves_wildcards_empty() {
        assert_eq!(encode(&Selection::EMPTY), 0);
        assert_eq!(encode(&sel([1, 0, 0, 0, 0])), 0x80000);
        assert_eq!(encode(&sel([1, 2, 3, 4, 1])), 0x84218);
    }

    #[test]
    fn test_acceptance_mask_fills_wildcards() {
        assert_eq!(acceptance_mask(&sel([1, 0, 0, 0, 0])), 0x8FFFF);
        assert_eq!(acceptance_mask(&Selection::EMPTY), FULL_MASK);
        let full = sel([1, 2, 3, 4, 1]);
        assert_eq!(acceptance_mask(&full), encode(&full));
    }

    #[test]
    fn test_decode_inverts_encode_for_every_selection() {
        for code in 0..5u32.pow(5) {
            let mut picks = [0u8; 5];
            let mut rest = code;
            for pick in picks.iter_mut() {
                *pick = (rest % 5) as u8;
                rest /= 5;
            }
            let s = sel(picks);
            assert_eq!(decode(encode(&s)), s, "roundtrip failed for {s}");
        }
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "more than one bit")]
    fn test_decode_rejects_partial_fields() {
        decode(0xC0000 | 0x0FFFF);
    }

    #[test]
    fn test_is_doable() {
        assert!(is_doable(FULL_MASK));
        assert!(is_doable(0x84218));
        assert!(!is_doable(0x80000));
        assert!(!is_doable(0));
    }

    #[test]
    fn test_field_extraction() {
        let m = encode(&sel([1, 2, 3, 4, 0]));
        assert_eq!(field(m, 0), 0b1000);
        assert_eq!(field(m, 1), 0b0100);
        assert_eq!(field(m, 2), 0b0010);
        assert_eq!(field(m, 3), 0b0001);
        assert_eq!(field(m, 4), 0);
    }

    #[test]
    fn test_wins_requires_every_pick() {
        let winning = encode(&sel([1, 2, 3, 4, 1]));
        assert!(wins(encode(&sel([1, 0, 0, 0, 0])), winning));
        assert!(wins(encode(&sel([1, 2, 0, 4, 0])), winning));
        assert!(!wins(encode(&sel([2, 0, 0, 0, 0])), winning));
        assert!(!wins(0, winning));
    }
}

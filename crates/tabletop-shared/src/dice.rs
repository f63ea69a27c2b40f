//! Die table and dice resolution.
//!
//! An attribute's base value selects a die from a closed table
//! (1→d4, 2→d6, 3→d8, 4→d10, 5→d12). Anything outside 1..=5 falls back to
//! the d4. A roll is one uniform draw on that die plus an optional flat skill
//! bonus; there are no caps, criticals or re-rolls.
//!
//! The random source is the [`DieRoller`] trait so callers can plug in a
//! real generator ([`RngRoller`]) or a deterministic one in tests.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::constants::DEFAULT_ATTRIBUTE_VALUE;

/// One of the five dice an attribute can map to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Die {
    D4,
    D6,
    D8,
    D10,
    D12,
}

impl Die {
    /// Look up the die for an attribute base value.
    pub fn for_value(value: i64) -> Self {
        match value {
            1 => Self::D4,
            2 => Self::D6,
            3 => Self::D8,
            4 => Self::D10,
            5 => Self::D12,
            _ => Self::D4,
        }
    }

    pub fn sides(&self) -> u32 {
        match self {
            Self::D4 => 4,
            Self::D6 => 6,
            Self::D8 => 8,
            Self::D10 => 10,
            Self::D12 => 12,
        }
    }

    /// Dice notation as stored in `attributes.dice_type`, e.g. `"1d8"`.
    pub fn notation(&self) -> String {
        format!("1d{}", self.sides())
    }
}

impl std::fmt::Display for Die {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "d{}", self.sides())
    }
}

/// Source of die faces.
pub trait DieRoller {
    /// Return a face in `1..=die.sides()`.
    fn roll(&mut self, die: Die) -> u32;
}

/// Adapts any `rand` generator into a [`DieRoller`].
pub struct RngRoller<R>(pub R);

impl<R: Rng> DieRoller for RngRoller<R> {
    fn roll(&mut self, die: Die) -> u32 {
        self.0.gen_range(1..=die.sides())
    }
}

impl RngRoller<rand::rngs::ThreadRng> {
    pub fn thread() -> Self {
        Self(rand::thread_rng())
    }
}

/// The full result of one roll.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RollOutcome {
    pub die: Die,
    /// Face shown by the die.
    pub natural: u32,
    pub bonus: i64,
    pub total: i64,
}

/// Roll against an attribute value with an optional skill bonus.
///
/// `attribute_value` is the character's recorded value, `None` when the
/// character has none (treated as base value 1). `skill_bonus` is `None`
/// when no skill was named or the character lacks it.
///
/// The total saturates at the `i64` bounds instead of wrapping.
pub fn resolve_roll<D: DieRoller + ?Sized>(
    attribute_value: Option<i64>,
    skill_bonus: Option<i64>,
    roller: &mut D,
) -> RollOutcome {
    let die = Die::for_value(attribute_value.unwrap_or(DEFAULT_ATTRIBUTE_VALUE));
    let natural = roller.roll(die);
    let bonus = skill_bonus.unwrap_or(0);

    RollOutcome {
        die,
        natural,
        bonus,
        total: i64::from(natural).saturating_add(bonus),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    /// Always shows the same face, clamped to the die.
    struct FixedRoller(u32);

    impl DieRoller for FixedRoller {
        fn roll(&mut self, die: Die) -> u32 {
            self.0.clamp(1, die.sides())
        }
    }

    /// Records which dice were asked for.
    #[derive(Default)]
    struct RecordingRoller(Vec<Die>);

    impl DieRoller for RecordingRoller {
        fn roll(&mut self, die: Die) -> u32 {
            self.0.push(die);
            1
        }
    }

    #[test]
    fn test_die_table() {
        assert_eq!(Die::for_value(1).sides(), 4);
        assert_eq!(Die::for_value(2).sides(), 6);
        assert_eq!(Die::for_value(3).sides(), 8);
        assert_eq!(Die::for_value(4).sides(), 10);
        assert_eq!(Die::for_value(5).sides(), 12);
    }

    #[test]
    fn test_out_of_range_falls_back_to_d4() {
        for value in [0, -1, 6, 7, 100, i64::MIN, i64::MAX] {
            assert_eq!(Die::for_value(value), Die::D4, "value {value}");
        }
    }

    #[test]
    fn test_notation() {
        assert_eq!(Die::D4.notation(), "1d4");
        assert_eq!(Die::D12.notation(), "1d12");
        assert_eq!(Die::D10.to_string(), "d10");
    }

    #[test]
    fn test_missing_attribute_rolls_d4() {
        let mut roller = RecordingRoller::default();
        let outcome = resolve_roll(None, Some(2), &mut roller);
        assert_eq!(roller.0, vec![Die::D4]);
        assert_eq!(outcome.die, Die::D4);
        assert_eq!(outcome.total, 3);
    }

    #[test]
    fn test_missing_skill_adds_nothing() {
        let outcome = resolve_roll(Some(3), None, &mut FixedRoller(5));
        assert_eq!(outcome.die, Die::D8);
        assert_eq!(outcome.bonus, 0);
        assert_eq!(outcome.total, 5);
    }

    #[test]
    fn test_boundaries_include_bonus() {
        for value in 1..=5 {
            let sides = Die::for_value(value).sides();

            let low = resolve_roll(Some(value), Some(3), &mut FixedRoller(1));
            assert_eq!(low.total, 4);

            let high = resolve_roll(Some(value), Some(3), &mut FixedRoller(u32::MAX));
            assert_eq!(high.total, i64::from(sides) + 3);
        }
    }

    #[test]
    fn test_negative_bonus_is_not_capped() {
        let outcome = resolve_roll(Some(1), Some(-5), &mut FixedRoller(1));
        assert_eq!(outcome.total, -4);
    }

    #[test]
    fn test_extreme_bonus_saturates() {
        let outcome = resolve_roll(Some(1), Some(i64::MAX), &mut FixedRoller(1));
        assert_eq!(outcome.total, i64::MAX);

        let outcome = resolve_roll(Some(1), Some(i64::MIN), &mut FixedRoller(4));
        assert_eq!(outcome.total, i64::MIN + 4);
    }

    #[test]
    fn test_rng_roller_stays_in_range_and_covers_faces() {
        let mut roller = RngRoller(StdRng::seed_from_u64(7));

        for value in 1..=5 {
            let sides = Die::for_value(value).sides();
            let mut seen = vec![false; sides as usize];

            for _ in 0..2_000 {
                let outcome = resolve_roll(Some(value), Some(2), &mut roller);
                assert!(outcome.total >= 3 && outcome.total <= i64::from(sides) + 2);
                seen[(outcome.natural - 1) as usize] = true;
            }

            assert!(seen.iter().all(|s| *s), "every face of d{sides} shows up");
        }
    }
}

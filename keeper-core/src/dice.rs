//! Dice helpers for initiative, movement and attribute rolls
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Roll a single d6.
pub fn d6<R: Rng>(rng: &mut R) -> i32 {
    rng.gen_range(1..=6)
}

/// Roll a d100 (1..=100).
pub fn d100<R: Rng>(rng: &mut R) -> i32 {
    rng.gen_range(1..=100)
}

/// Sum of `count` dice with the given number of sides.
pub fn roll_dice<R: Rng>(rng: &mut R, count: u32, sides: i32) -> i32 {
    (0..count).map(|_| rng.gen_range(1..=sides)).sum()
}

/// Attribute roll formulas used by the creation wizard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RollFormula {
    /// 3d6 x 5 (STR, CON, DEX, APP, POW)
    ThreeD6Times5,
    /// (2d6 + 6) x 5 (SIZ, INT, EDU)
    TwoD6Plus6Times5,
}

impl RollFormula {
    pub fn roll<R: Rng>(self, rng: &mut R) -> i32 {
        match self {
            Self::ThreeD6Times5 => roll_dice(rng, 3, 6) * 5,
            Self::TwoD6Plus6Times5 => (roll_dice(rng, 2, 6) + 6) * 5,
        }
    }

    /// Lowest value the formula can produce.
    #[must_use]
    pub const fn min(self) -> i32 {
        match self {
            Self::ThreeD6Times5 => 15,
            Self::TwoD6Plus6Times5 => 40,
        }
    }

    /// Highest value the formula can produce.
    #[must_use]
    pub const fn max(self) -> i32 {
        match self {
            Self::ThreeD6Times5 | Self::TwoD6Plus6Times5 => 90,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha20Rng;

    #[test]
    fn rolls_stay_in_range() {
        let mut rng = ChaCha20Rng::seed_from_u64(7);
        for _ in 0..500 {
            let v = d6(&mut rng);
            assert!((1..=6).contains(&v));
            let v = d100(&mut rng);
            assert!((1..=100).contains(&v));
        }
    }

    #[test]
    fn formulas_respect_bounds() {
        let mut rng = ChaCha20Rng::seed_from_u64(11);
        for _ in 0..500 {
            for formula in [RollFormula::ThreeD6Times5, RollFormula::TwoD6Plus6Times5] {
                let v = formula.roll(&mut rng);
                assert!(v >= formula.min(), "{v} below min for {formula:?}");
                assert!(v <= formula.max(), "{v} above max for {formula:?}");
                assert_eq!(v % 5, 0, "attribute rolls are multiples of 5");
            }
        }
    }
}

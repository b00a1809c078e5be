//! Trail weight arithmetic.
//!
//! A `Weight` is a pair `(integer, log_part)`. Each active tryte of a
//! differential trail contributes one of three amounts to a trail's total
//! weight: `2` (an integer unit), `LOG = -log3(2/27)` (a fractional unit
//! arising from a uniform-probability transition), or `3`. Keeping the two
//! parts separate avoids ever doing floating point arithmetic on the hot
//! comparison path used to prune tree traversals: ordering two weights is
//! done with exact scaled-integer multiplication, never `f64::partial_cmp`.
//!
//! # Representation
//!
//! `total(w) = w.integer + w.log_part * LOG`. Comparisons scale both sides
//! by `LOG_SCALE` and round `LOG` once to `LOG_COEFF`, so `w1 < w2` becomes
//! the exact integer comparison
//! `w1.integer * LOG_SCALE + w1.log_part * LOG_COEFF < w2.integer * LOG_SCALE + w2.log_part * LOG_COEFF`.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::ops::{Add, AddAssign, Sub, SubAssign};

/// `-log3(2/27)`, the fractional weight of a uniform 3-to-1 Sbox transition.
pub const LOG: f64 = 2.369_070_246_428_542_7;

/// Fixed-point scale applied to the integer part of a [`Weight`] when
/// comparing two weights exactly.
pub const LOG_SCALE: i128 = 1_000_000;

/// `round(LOG * LOG_SCALE)`, the fixed-point coefficient for the log part.
pub const LOG_COEFF: i128 = 2_369_070;

/// A trail weight: an integer number of 2-unit/3-unit contributions plus a
/// count of `LOG`-unit contributions.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Weight {
    pub integer: i64,
    pub log_part: i64,
}

impl Weight {
    pub const ZERO: Weight = Weight { integer: 0, log_part: 0 };

    #[inline]
    pub const fn new(integer: i64, log_part: i64) -> Self {
        Weight { integer, log_part }
    }

    /// Weight contribution of a single active tryte under DDT value `ddt`
    /// (27 = 3-to-1 certain transition, 3 = weight-2, 2 = weight-LOG, 1 =
    /// weight-3). `ddt == 0` has no transition and is never queried.
    pub const fn from_ddt_value(ddt: u8) -> Self {
        match ddt {
            27 => Weight::ZERO,
            3 => Weight::new(2, 0),
            2 => Weight::new(0, 1),
            1 => Weight::new(3, 0),
            _ => panic!("ddt value has no associated weight"),
        }
    }

    /// Weight of `count` active trytes counted at 2 units each (used for
    /// `wMinRev`/`wMinDir`, which are always pure integer weights).
    #[inline]
    pub const fn from_active_trytes(count: u32) -> Self {
        Weight::new(2 * count as i64, 0)
    }

    #[inline]
    fn scaled(self) -> i128 {
        self.integer as i128 * LOG_SCALE + self.log_part as i128 * LOG_COEFF
    }

    /// Approximate value as a float, for reporting only — never used in
    /// pruning comparisons.
    pub fn as_f64(self) -> f64 {
        self.integer as f64 + self.log_part as f64 * LOG
    }
}

impl Add for Weight {
    type Output = Weight;
    fn add(self, rhs: Weight) -> Weight {
        Weight::new(self.integer + rhs.integer, self.log_part + rhs.log_part)
    }
}

impl AddAssign for Weight {
    fn add_assign(&mut self, rhs: Weight) {
        *self = *self + rhs;
    }
}

impl Sub for Weight {
    type Output = Weight;
    fn sub(self, rhs: Weight) -> Weight {
        let out = Weight::new(self.integer - rhs.integer, self.log_part - rhs.log_part);
        debug_assert!(
            out.integer >= 0 && out.log_part >= 0,
            "weight subtraction underflowed an unreachable precondition"
        );
        out
    }
}

impl SubAssign for Weight {
    fn sub_assign(&mut self, rhs: Weight) {
        *self = *self - rhs;
    }
}

impl std::ops::Mul<i64> for Weight {
    type Output = Weight;
    fn mul(self, rhs: i64) -> Weight {
        Weight::new(self.integer * rhs, self.log_part * rhs)
    }
}

impl PartialOrd for Weight {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Weight {
    fn cmp(&self, other: &Self) -> Ordering {
        self.scaled().cmp(&other.scaled())
    }
}

impl fmt::Display for Weight {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:x}:{:x}", self.integer, self.log_part)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ordering_matches_float_approximation() {
        let a = Weight::new(2, 0);
        let b = Weight::new(0, 1);
        let c = Weight::new(3, 0);
        assert!(a < c);
        assert!(b < a);
        assert!(a.as_f64() < c.as_f64());
        assert!(b.as_f64() < a.as_f64());
    }

    #[test]
    fn addition_is_componentwise() {
        let a = Weight::new(2, 1);
        let b = Weight::new(0, 1);
        assert_eq!(a + b, Weight::new(2, 2));
    }

    #[test]
    fn from_ddt_matches_spec_table() {
        assert_eq!(Weight::from_ddt_value(27), Weight::ZERO);
        assert_eq!(Weight::from_ddt_value(3), Weight::new(2, 0));
        assert_eq!(Weight::from_ddt_value(2), Weight::new(0, 1));
        assert_eq!(Weight::from_ddt_value(1), Weight::new(3, 0));
    }
}

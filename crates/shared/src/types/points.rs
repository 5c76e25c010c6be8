//! Integer score unit.
//!
//! CRITICAL: Never use floating-point for scores. Every amount that moves
//! between players is a whole number of units, so equality checks (the
//! zero-sum rule in particular) are exact.
//!
//! Arithmetic saturates at the `i64` bounds and never panics. Sums are
//! accumulated in `i128`, so a sum is zero only when the exact sum is.

use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Neg, Sub, SubAssign};

use serde::{Deserialize, Serialize};

/// A signed amount of score units won (positive) or lost (negative).
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Points(i64);

impl Points {
    /// Zero units.
    pub const ZERO: Self = Self(0);

    /// Creates a new amount.
    #[must_use]
    pub const fn new(value: i64) -> Self {
        Self(value)
    }

    /// Returns the raw signed value.
    #[must_use]
    pub const fn value(self) -> i64 {
        self.0
    }

    /// Returns the magnitude, regardless of direction.
    #[must_use]
    pub const fn magnitude(self) -> u64 {
        self.0.unsigned_abs()
    }

    /// Adds, returning `None` on overflow.
    #[must_use]
    pub const fn checked_add(self, rhs: Self) -> Option<Self> {
        match self.0.checked_add(rhs.0) {
            Some(value) => Some(Self(value)),
            None => None,
        }
    }

    /// Clamps an exact wide value into range.
    fn saturating_from_i128(value: i128) -> Self {
        Self(i64::try_from(value).unwrap_or(if value < 0 { i64::MIN } else { i64::MAX }))
    }

    /// Returns true if the amount is zero.
    #[must_use]
    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }

    /// Returns true if the amount is a win.
    #[must_use]
    pub const fn is_positive(self) -> bool {
        self.0 > 0
    }

    /// Returns true if the amount is a loss.
    #[must_use]
    pub const fn is_negative(self) -> bool {
        self.0 < 0
    }
}

impl From<i64> for Points {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

impl From<Points> for i64 {
    fn from(points: Points) -> Self {
        points.0
    }
}

impl Add for Points {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self(self.0.saturating_add(rhs.0))
    }
}

impl AddAssign for Points {
    fn add_assign(&mut self, rhs: Self) {
        self.0 = self.0.saturating_add(rhs.0);
    }
}

impl Sub for Points {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self(self.0.saturating_sub(rhs.0))
    }
}

impl SubAssign for Points {
    fn sub_assign(&mut self, rhs: Self) {
        self.0 = self.0.saturating_sub(rhs.0);
    }
}

impl Neg for Points {
    type Output = Self;

    fn neg(self) -> Self {
        Self(self.0.saturating_neg())
    }
}

impl Sum for Points {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        let exact = iter.fold(0_i128, |acc, p| acc + i128::from(p.0));
        Self::saturating_from_i128(exact)
    }
}

impl<'a> Sum<&'a Points> for Points {
    fn sum<I: Iterator<Item = &'a Points>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

impl fmt::Display for Points {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0 > 0 {
            write!(f, "+{}", self.0)
        } else {
            write!(f, "{}", self.0)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_points_arithmetic() {
        let a = Points::new(15);
        let b = Points::new(-25);
        assert_eq!(a + b, Points::new(-10));
        assert_eq!(a - b, Points::new(40));
        assert_eq!(-b, Points::new(25));

        let mut c = Points::ZERO;
        c += a;
        c -= Points::new(5);
        assert_eq!(c, Points::new(10));
    }

    #[test]
    fn test_points_sum() {
        let amounts = [Points::new(15), Points::new(10), Points::new(-10), Points::new(-15)];
        let total: Points = amounts.iter().sum();
        assert!(total.is_zero());
        let owned: Points = amounts.into_iter().sum();
        assert_eq!(owned, total);
    }

    #[test]
    fn test_points_sign_helpers() {
        assert!(Points::new(3).is_positive());
        assert!(Points::new(-3).is_negative());
        assert!(!Points::ZERO.is_positive());
        assert!(!Points::ZERO.is_negative());
        assert_eq!(Points::new(-30).magnitude(), 30);
        assert_eq!(Points::new(i64::MIN).magnitude(), 9_223_372_036_854_775_808);
    }

    #[test]
    fn test_points_arithmetic_saturates() {
        assert_eq!(Points::new(i64::MAX) + Points::new(1), Points::new(i64::MAX));
        assert_eq!(Points::new(i64::MIN) - Points::new(1), Points::new(i64::MIN));
        assert_eq!(-Points::new(i64::MIN), Points::new(i64::MAX));
        assert_eq!(Points::new(i64::MAX).checked_add(Points::new(1)), None);
        assert_eq!(Points::new(2).checked_add(Points::new(3)), Some(Points::new(5)));

        let mut total = Points::new(i64::MAX);
        total += Points::new(i64::MAX);
        assert_eq!(total, Points::new(i64::MAX));
    }

    #[test]
    fn test_points_sum_is_exact_before_clamping() {
        let wrapping = [Points::new(i64::MAX), Points::new(i64::MAX), Points::new(2)];
        let sum: Points = wrapping.iter().sum();
        assert!(!sum.is_zero());
        assert_eq!(sum, Points::new(i64::MAX));

        // Step-wise saturation would lose the 1 and report zero.
        let cancelling = [Points::new(i64::MAX), Points::new(1), Points::new(-i64::MAX)];
        let sum: Points = cancelling.iter().sum();
        assert_eq!(sum, Points::new(1));
    }

    #[test]
    fn test_points_display() {
        assert_eq!(Points::new(20).to_string(), "+20");
        assert_eq!(Points::new(-60).to_string(), "-60");
        assert_eq!(Points::ZERO.to_string(), "0");
    }

    #[test]
    fn test_points_serde_transparent() {
        assert_eq!(serde_json::to_string(&Points::new(-35)).unwrap(), "-35");
        let parsed: Points = serde_json::from_str("25").unwrap();
        assert_eq!(parsed, Points::new(25));
        assert!(serde_json::from_str::<Points>("12.5").is_err());
    }
}

use std::cmp::Ordering;
use std::fmt;

use super::{add, arith::subtract_magnitude, compare, normalize};

/// Decimal magnitude with a sign flag
///
/// Zero is never negative.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedDecimal {
    negative: bool,
    magnitude: String,
}

impl SignedDecimal {
    /// Non-negative value
    pub fn non_negative(magnitude: &str) -> Self {
        Self {
            negative: false,
            magnitude: normalize(magnitude).to_string(),
        }
    }

    /// Whether the value is below zero
    pub fn is_negative(&self) -> bool {
        self.negative
    }

    /// Absolute value as a decimal string
    pub fn magnitude(&self) -> &str {
        &self.magnitude
    }

    /// `-self`
    pub fn negate(self) -> Self {
        let negative = !self.negative && self.magnitude != "0";
        Self {
            negative,
            magnitude: self.magnitude,
        }
    }

    /// `self - rhs` for a non-negative `rhs`
    pub fn sub(&self, rhs: &str) -> Self {
        if self.negative {
            // -(|self| + rhs)
            Self::non_negative(&add(&self.magnitude, rhs)).negate()
        } else {
            subtract(&self.magnitude, rhs)
        }
    }

    /// The value as an unsigned string, or `None` when negative
    pub fn into_unsigned(self) -> Option<String> {
        if self.negative {
            None
        } else {
            Some(self.magnitude)
        }
    }
}

impl fmt::Display for SignedDecimal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.negative {
            write!(f, "-{}", self.magnitude)
        } else {
            write!(f, "{}", self.magnitude)
        }
    }
}

/// `a - b`; when `a < b` the operands are swapped and the result negated
pub fn subtract(a: &str, b: &str) -> SignedDecimal {
    if compare(a, b) == Ordering::Less {
        return subtract(b, a).negate();
    }
    SignedDecimal::non_negative(&subtract_magnitude(a, b))
}

//! Decimal-string big integers
//!
//! Operands are most-significant-digit-first ASCII strings with no width limit:
//! - Unsigned add / schoolbook multiply / power-of-ten shift
//! - Ordering by magnitude
//! - Signed subtraction (negative results carry a sign flag)

mod arith;
mod signed;

pub use arith::{add, multiply, shift};
pub use signed::{subtract, SignedDecimal};

use rand::Rng;
use std::cmp::Ordering;

/// Whether `s` is a non-empty run of ASCII digits
pub fn is_decimal(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}

/// Strip leading zeros (`""` and `"000"` become `"0"`)
pub fn normalize(s: &str) -> &str {
    let trimmed = s.trim_start_matches('0');
    if trimmed.is_empty() {
        "0"
    } else {
        trimmed
    }
}

/// Compare two decimal strings by value
pub fn compare(a: &str, b: &str) -> Ordering {
    let a = normalize(a);
    let b = normalize(b);
    a.len().cmp(&b.len()).then_with(|| a.cmp(b))
}

/// Random operand with exactly `digits` digits (no leading zero)
pub fn random_operand<R: Rng + ?Sized>(digits: usize, rng: &mut R) -> String {
    if digits == 0 {
        return "0".to_string();
    }
    let mut out = String::with_capacity(digits);
    out.push(char::from(b'0' + rng.gen_range(1..=9u8)));
    for _ in 1..digits {
        out.push(char::from(b'0' + rng.gen_range(0..=9u8)));
    }
    out
}

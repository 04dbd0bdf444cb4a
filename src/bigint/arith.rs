//! Unsigned digit-wise arithmetic

use super::normalize;

fn digits(s: &str) -> impl DoubleEndedIterator<Item = u32> + ExactSizeIterator + '_ {
    s.bytes().map(|b| u32::from(b - b'0'))
}

fn from_digits(digits: impl DoubleEndedIterator<Item = u32>) -> String {
    let text: String = digits.map(|d| char::from(b'0' + d as u8)).collect();
    normalize(&text).to_string()
}

/// `a + b`
pub fn add(a: &str, b: &str) -> String {
    let mut lhs = digits(normalize(a)).rev();
    let mut rhs = digits(normalize(b)).rev();
    let mut out = Vec::with_capacity(a.len().max(b.len()) + 1);
    let mut carry = 0;

    loop {
        let (x, y) = (lhs.next(), rhs.next());
        if x.is_none() && y.is_none() && carry == 0 {
            break;
        }
        let sum = x.unwrap_or(0) + y.unwrap_or(0) + carry;
        out.push(sum % 10);
        carry = sum / 10;
    }

    from_digits(out.into_iter().rev())
}

/// `a - b` for `a >= b`
pub(crate) fn subtract_magnitude(a: &str, b: &str) -> String {
    let a = normalize(a);
    let mut rhs = digits(normalize(b)).rev();
    let mut out = Vec::with_capacity(a.len());
    let mut borrow = 0i32;

    for x in digits(a).rev() {
        let mut diff = x as i32 - borrow - rhs.next().map_or(0, |y| y as i32);
        if diff < 0 {
            diff += 10;
            borrow = 1;
        } else {
            borrow = 0;
        }
        out.push(diff as u32);
    }
    debug_assert_eq!(borrow, 0, "subtract_magnitude called with a < b");

    from_digits(out.into_iter().rev())
}

/// Schoolbook long multiplication, O(len(a) × len(b))
pub fn multiply(a: &str, b: &str) -> String {
    let a = normalize(a);
    let b = normalize(b);
    if a == "0" || b == "0" {
        return "0".to_string();
    }

    let mut acc = vec![0u32; a.len() + b.len()];
    for (i, x) in digits(a).enumerate().rev() {
        for (j, y) in digits(b).enumerate().rev() {
            let sum = x * y + acc[i + j + 1];
            acc[i + j] += sum / 10;
            acc[i + j + 1] = sum % 10;
        }
    }

    from_digits(acc.into_iter())
}

/// `a × 10^places`
pub fn shift(a: &str, places: usize) -> String {
    let a = normalize(a);
    if a == "0" {
        return "0".to_string();
    }
    let mut out = String::with_capacity(a.len() + places);
    out.push_str(a);
    out.extend(std::iter::repeat('0').take(places));
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_with_carry() {
        assert_eq!(add("999", "1"), "1000");
        assert_eq!(add("0", "0"), "0");
        assert_eq!(add("007", "05"), "12");
        assert_eq!(add("12345678901234567890", "98765432109876543210"), "111111111011111111100");
    }

    #[test]
    fn test_subtract_magnitude_borrows() {
        assert_eq!(subtract_magnitude("1000", "1"), "999");
        assert_eq!(subtract_magnitude("512", "512"), "0");
        assert_eq!(subtract_magnitude("100", "099"), "1");
    }

    #[test]
    fn test_multiply_schoolbook() {
        assert_eq!(multiply("123", "456"), "56088");
        assert_eq!(multiply("0", "456"), "0");
        assert_eq!(multiply("99", "99"), "9801");
        assert_eq!(multiply("000012", "10"), "120");
        assert_eq!(multiply("7", "123456789"), "864197523");
    }

    #[test]
    fn test_shift() {
        assert_eq!(shift("12", 3), "12000");
        assert_eq!(shift("0", 3), "0");
        assert_eq!(shift("7", 0), "7");
    }
}

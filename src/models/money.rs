//! Yen type for representing currency amounts
//!
//! Yen has no minor unit, so amounts are whole numbers stored as i64.
//! Arithmetic saturates at the i64 bounds instead of overflowing.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, AddAssign, Neg, Sub, SubAssign};

/// A whole-yen monetary amount
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Yen(i64);

impl Yen {
    /// Create a Yen amount from a whole number of yen
    ///
    /// # Examples
    /// ```
    /// use expense_split::models::Yen;
    /// let amount = Yen::new(1050);
    /// assert_eq!(amount.value(), 1050);
    /// ```
    pub const fn new(yen: i64) -> Self {
        Self(yen)
    }

    /// Create a zero amount
    pub const fn zero() -> Self {
        Self(0)
    }

    /// Get the amount as a plain integer
    pub const fn value(&self) -> i64 {
        self.0
    }

    /// Check if the amount is zero
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Check if the amount is negative
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Get the absolute value
    pub const fn abs(&self) -> Self {
        Self(self.0.saturating_abs())
    }

    /// Clamp a wide intermediate into range
    pub fn saturating_from_i128(value: i128) -> Self {
        Self(value.clamp(i64::MIN as i128, i64::MAX as i128) as i64)
    }

    /// Parse a decorated amount as shown by the accounting page
    ///
    /// Every character that is not an ASCII digit or `-` is dropped first, so
    /// `"¥-1,234"` and `"-1,234円"` both read as -1234. Returns `None` when
    /// nothing numeric is left or the remainder is not a valid integer.
    /// Integers beyond the i64 range saturate to the nearest bound.
    ///
    /// # Examples
    /// ```
    /// use expense_split::models::Yen;
    /// assert_eq!(Yen::parse_lenient("10,000"), Some(Yen::new(10000)));
    /// assert_eq!(Yen::parse_lenient("円"), None);
    /// assert_eq!(Yen::parse_lenient("99999999999999999999"), Some(Yen::new(i64::MAX)));
    /// ```
    pub fn parse_lenient(s: &str) -> Option<Self> {
        let cleaned: String = s
            .chars()
            .filter(|c| c.is_ascii_digit() || *c == '-')
            .collect();

        let (negative, digits) = match cleaned.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, cleaned.as_str()),
        };
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }

        let magnitude = digits.parse::<i128>().unwrap_or(i128::MAX);
        let value = if negative { -magnitude } else { magnitude };
        Some(Self::saturating_from_i128(value))
    }

    /// Format with a currency symbol and thousands separators
    pub fn format_with_symbol(&self, symbol: &str) -> String {
        let grouped = group_thousands(self.0.unsigned_abs());
        if self.is_negative() {
            format!("-{}{}", symbol, grouped)
        } else {
            format!("{}{}", symbol, grouped)
        }
    }
}

/// Insert `,` every three digits from the right
fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

impl Default for Yen {
    fn default() -> Self {
        Self::zero()
    }
}

impl fmt::Display for Yen {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_with_symbol("¥"))
    }
}

impl From<i64> for Yen {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

impl Add for Yen {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self(self.0.saturating_add(other.0))
    }
}

impl AddAssign for Yen {
    fn add_assign(&mut self, other: Self) {
        self.0 = self.0.saturating_add(other.0);
    }
}

impl Sub for Yen {
    type Output = Self;

    fn sub(self, other: Self) -> Self {
        Self(self.0.saturating_sub(other.0))
    }
}

impl SubAssign for Yen {
    fn sub_assign(&mut self, other: Self) {
        self.0 = self.0.saturating_sub(other.0);
    }
}

impl Neg for Yen {
    type Output = Self;

    fn neg(self) -> Self {
        Self(self.0.saturating_neg())
    }
}

impl std::iter::Sum for Yen {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Yen::zero(), |acc, m| acc + m)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", Yen::new(1050)), "¥1,050");
        assert_eq!(format!("{}", Yen::new(0)), "¥0");
        assert_eq!(format!("{}", Yen::new(-5000)), "-¥5,000");
        assert_eq!(format!("{}", Yen::new(999)), "¥999");
        assert_eq!(format!("{}", Yen::new(1234567)), "¥1,234,567");
    }

    #[test]
    fn test_format_with_symbol() {
        assert_eq!(Yen::new(12000).format_with_symbol(""), "12,000");
        assert_eq!(Yen::new(-12000).format_with_symbol("$"), "-$12,000");
    }

    #[test]
    fn test_arithmetic() {
        let a = Yen::new(1000);
        let b = Yen::new(500);

        assert_eq!((a + b).value(), 1500);
        assert_eq!((a - b).value(), 500);
        assert_eq!((-a).value(), -1000);
    }

    #[test]
    fn test_parse_lenient_strips_decoration() {
        assert_eq!(Yen::parse_lenient("10,000"), Some(Yen::new(10000)));
        assert_eq!(Yen::parse_lenient("¥-3,980"), Some(Yen::new(-3980)));
        assert_eq!(Yen::parse_lenient(" -1,200円 "), Some(Yen::new(-1200)));
        assert_eq!(Yen::parse_lenient("¥0"), Some(Yen::zero()));
    }

    #[test]
    fn test_parse_lenient_rejects_garbage() {
        assert_eq!(Yen::parse_lenient(""), None);
        assert_eq!(Yen::parse_lenient("円"), None);
        assert_eq!(Yen::parse_lenient("-"), None);
        assert_eq!(Yen::parse_lenient("1-2"), None);
        assert_eq!(Yen::parse_lenient("--5"), None);
    }

    #[test]
    fn test_parse_lenient_saturates_out_of_range() {
        assert_eq!(
            Yen::parse_lenient("99,999,999,999,999,999,999"),
            Some(Yen::new(i64::MAX))
        );
        assert_eq!(
            Yen::parse_lenient("-99999999999999999999"),
            Some(Yen::new(i64::MIN))
        );
        assert_eq!(
            Yen::parse_lenient(&"9".repeat(60)),
            Some(Yen::new(i64::MAX))
        );
        assert_eq!(
            Yen::parse_lenient("9223372036854775807"),
            Some(Yen::new(i64::MAX))
        );
    }

    #[test]
    fn test_arithmetic_saturates() {
        let max = Yen::new(i64::MAX);
        let min = Yen::new(i64::MIN);

        assert_eq!(max + Yen::new(1), max);
        assert_eq!(min - Yen::new(1), min);
        assert_eq!(-min, max);
        assert_eq!(min.abs(), max);

        let mut acc = max;
        acc += max;
        assert_eq!(acc, max);
        acc -= Yen::new(1);
        assert_eq!(acc.value(), i64::MAX - 1);
    }

    #[test]
    fn test_sum() {
        let total: Yen = vec![Yen::new(100), Yen::new(200), Yen::new(-50)]
            .into_iter()
            .sum();
        assert_eq!(total.value(), 250);
    }

    #[test]
    fn test_serialization() {
        let m = Yen::new(1050);
        let json = serde_json::to_string(&m).unwrap();
        assert_eq!(json, "1050");
    }
}

//! Fixed-point quantities for floor area and consumption shares
//!
//! Stores values in hundredths (0.01 m², 0.01 %) as an unsigned integer so
//! that proration stays in integer arithmetic.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Add;

/// A non-negative quantity with two decimal places
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Measure(u64);

impl Measure {
    /// The largest valid consumption share (100.00 %)
    pub const FULL_PERCENT: Measure = Measure(100_00);

    /// Create a measure from hundredths
    pub const fn from_hundredths(hundredths: u64) -> Self {
        Self(hundredths)
    }

    /// Create a measure from a whole number
    pub const fn from_whole(whole: u64) -> Self {
        Self(whole * 100)
    }

    pub const fn zero() -> Self {
        Self(0)
    }

    /// Get the raw value in hundredths
    pub const fn hundredths(&self) -> u64 {
        self.0
    }

    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Parse a decimal string such as "72.5" or "72,50"
    pub fn parse(s: &str) -> Result<Self, MeasureParseError> {
        let s = s.trim();
        let invalid = || MeasureParseError::InvalidFormat(s.to_string());

        if s.is_empty() || s.starts_with('-') {
            return Err(invalid());
        }

        let value = if let Some(pos) = s.find(['.', ',']) {
            let (whole_str, frac_str) = (&s[..pos], &s[pos + 1..]);
            let whole: u64 = if whole_str.is_empty() {
                0
            } else {
                whole_str.parse().map_err(|_| invalid())?
            };
            let frac: u64 = match frac_str.len() {
                0 => 0,
                1 => frac_str.parse::<u64>().map_err(|_| invalid())? * 10,
                2 => frac_str.parse().map_err(|_| invalid())?,
                _ => return Err(invalid()),
            };
            whole
                .checked_mul(100)
                .and_then(|w| w.checked_add(frac))
                .ok_or_else(invalid)?
        } else {
            s.parse::<u64>()
                .map_err(|_| invalid())?
                .checked_mul(100)
                .ok_or_else(invalid)?
        };

        Ok(Self(value))
    }
}

impl fmt::Display for Measure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:02}", self.0 / 100, self.0 % 100)
    }
}

impl Add for Measure {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self(self.0.saturating_add(other.0))
    }
}

impl std::iter::Sum for Measure {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Measure::zero(), |acc, m| acc + m)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MeasureParseError {
    InvalidFormat(String),
}

impl fmt::Display for MeasureParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MeasureParseError::InvalidFormat(s) => write!(f, "Invalid quantity: {}", s),
        }
    }
}

impl std::error::Error for MeasureParseError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse() {
        assert_eq!(Measure::parse("72.5").unwrap().hundredths(), 7250);
        assert_eq!(Measure::parse("72,50").unwrap().hundredths(), 7250);
        assert_eq!(Measure::parse("50").unwrap().hundredths(), 5000);
        assert_eq!(Measure::parse("0.01").unwrap().hundredths(), 1);
    }

    #[test]
    fn test_parse_rejects_negative_and_extra_precision() {
        assert!(Measure::parse("-1").is_err());
        assert!(Measure::parse("1.234").is_err());
        assert!(Measure::parse("").is_err());
    }

    #[test]
    fn test_parse_rejects_out_of_range() {
        assert!(Measure::parse("200000000000000000").is_err());
        assert!(Measure::parse("200000000000000000.50").is_err());
        assert!(Measure::parse("18446744073709551616").is_err());
        assert_eq!(
            Measure::parse("184467440737095516.15").unwrap().hundredths(),
            u64::MAX
        );
    }

    #[test]
    fn test_display() {
        assert_eq!(Measure::from_hundredths(7250).to_string(), "72.50");
        assert_eq!(Measure::from_whole(3).to_string(), "3.00");
    }

    #[test]
    fn test_sum() {
        let total: Measure = [Measure::from_whole(50), Measure::from_hundredths(2550)]
            .into_iter()
            .sum();
        assert_eq!(total.hundredths(), 7550);
    }
}

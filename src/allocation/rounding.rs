//! Integer proration and rounding
//!
//! All shares are computed as `amount * weight / total` in 128-bit integers
//! with the multiplication done first, so results are identical on every
//! platform and no input can overflow.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::models::Money;

/// How raw shares are turned into whole cents
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoundingPolicy {
    /// Round every unit's share half away from zero on its own.
    /// Shares may not add up to the cost item amount.
    #[default]
    PerUnit,
    /// Floor every share, then give the leftover cents to the units with
    /// the largest remainders. Shares always add up to the amount.
    LargestRemainder,
}

impl RoundingPolicy {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "per_unit" | "unit" | "none" => Some(Self::PerUnit),
            "largest_remainder" | "remainder" | "reconcile" => Some(Self::LargestRemainder),
            _ => None,
        }
    }

    /// Split `amount` over `weights` according to this policy
    pub fn split(&self, amount: Money, weights: &[u64]) -> Vec<Money> {
        match self {
            Self::PerUnit => {
                let total = weights.iter().map(|&weight| u128::from(weight)).sum();
                weights
                    .iter()
                    .map(|&weight| prorate(amount, weight, total))
                    .collect()
            }
            Self::LargestRemainder => split_largest_remainder(amount, weights),
        }
    }
}

impl fmt::Display for RoundingPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PerUnit => write!(f, "per_unit"),
            Self::LargestRemainder => write!(f, "largest_remainder"),
        }
    }
}

/// `amount * weight / total`, rounded to the nearest cent, ties away from zero
///
/// Returns zero when `total` is zero. Results beyond the range of `Money`
/// saturate.
pub fn prorate(amount: Money, weight: u64, total: u128) -> Money {
    if total == 0 {
        return Money::zero();
    }

    // |cents| * weight < 2^127, so the product always fits
    let magnitude = u128::from(amount.cents().unsigned_abs()) * u128::from(weight);
    let mut quotient = magnitude / total;
    let remainder = magnitude % total;
    if remainder >= total - remainder {
        quotient += 1;
    }

    let rounded = i128::try_from(quotient).unwrap_or(i128::MAX);
    let signed = if amount.is_negative() { -rounded } else { rounded };
    Money::from_cents(saturate(signed))
}

/// Largest-remainder split: the result always sums to `amount` when the
/// weights are not all zero. Ties go to the earlier position.
pub fn split_largest_remainder(amount: Money, weights: &[u64]) -> Vec<Money> {
    let total: i128 = weights.iter().map(|&weight| i128::from(weight)).sum();
    if total == 0 {
        return vec![Money::zero(); weights.len()];
    }

    let mut floors = Vec::with_capacity(weights.len());
    let mut remainders = Vec::with_capacity(weights.len());

    for &weight in weights {
        let numerator = i128::from(amount.cents()) * i128::from(weight);
        floors.push(numerator.div_euclid(total));
        remainders.push(numerator.rem_euclid(total));
    }

    let leftover = i128::from(amount.cents()) - floors.iter().sum::<i128>();

    let mut order: Vec<usize> = (0..weights.len()).collect();
    order.sort_by(|&a, &b| remainders[b].cmp(&remainders[a]));

    let leftover = usize::try_from(leftover.max(0)).unwrap_or(usize::MAX);
    for &index in order.iter().take(leftover) {
        floors[index] += 1;
    }

    floors
        .into_iter()
        .map(|cents| Money::from_cents(saturate(cents)))
        .collect()
}

fn saturate(cents: i128) -> i64 {
    i64::try_from(cents).unwrap_or(if cents < 0 { i64::MIN } else { i64::MAX })
}

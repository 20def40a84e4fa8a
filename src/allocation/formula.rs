//! Distribution formula resolvers
//!
//! Each distribution key maps a unit to an integer weight and the eligible
//! unit set to a denominator. A unit's raw share is
//! `amount * weight / denominator`.

use crate::models::{DistributionKey, Measure, Money, UnitDistributionData};

/// The four denominators, computed once over the eligible unit set
///
/// Sums are kept in u128 so that no unit count or area can overflow them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Denominators {
    /// Σ area, in hundredths of m²
    pub area: u128,
    pub persons: u128,
    /// Count of eligible units
    pub units: u128,
    /// Σ heating share, in hundredths of a percent
    pub consumption: u128,
}

impl Denominators {
    pub fn over<'a, I>(units: I) -> Self
    where
        I: IntoIterator<Item = &'a UnitDistributionData>,
    {
        units.into_iter().fold(Self::default(), |acc, unit| Self {
            area: acc.area + u128::from(unit.area.hundredths()),
            persons: acc.persons + u128::from(unit.persons),
            units: acc.units + 1,
            consumption: acc.consumption + u128::from(unit.heating_share.hundredths()),
        })
    }

    pub fn for_key(&self, key: DistributionKey) -> u128 {
        match key {
            DistributionKey::Area => self.area,
            DistributionKey::Persons => self.persons,
            DistributionKey::Units => self.units,
            DistributionKey::Consumption => self.consumption,
        }
    }
}

/// The weight a unit carries under a key
pub fn weight(key: DistributionKey, unit: &UnitDistributionData) -> u64 {
    match key {
        DistributionKey::Area => unit.area.hundredths(),
        DistributionKey::Persons => u64::from(unit.persons),
        DistributionKey::Units => 1,
        DistributionKey::Consumption => unit.heating_share.hundredths(),
    }
}

/// Human-readable trace of `amount * weight / total` for a key
///
/// Amounts are written as plain decimals; the caller's currency symbol is
/// applied by the display layer.
pub fn describe(key: DistributionKey, amount: Money, weight: u64, total: u128) -> String {
    let amount = amount.format_with_symbol("");
    if total == 0 {
        return format!("{} not allocated: total {} is 0", amount, dimension_name(key));
    }

    match key {
        DistributionKey::Area => format!(
            "{} × {} m² / {} m²",
            amount,
            Measure::from_hundredths(weight),
            hundredths(total)
        ),
        DistributionKey::Persons => {
            format!("{} × {} persons / {} persons", amount, weight, total)
        }
        DistributionKey::Units => format!("{} / {} units", amount, total),
        DistributionKey::Consumption => format!(
            "{} × {}% / {}%",
            amount,
            Measure::from_hundredths(weight),
            hundredths(total)
        ),
    }
}

/// Format a summed measure, which may exceed the range of `Measure`
fn hundredths(value: u128) -> String {
    format!("{}.{:02}", value / 100, value % 100)
}

fn dimension_name(key: DistributionKey) -> &'static str {
    match key {
        DistributionKey::Area => "area",
        DistributionKey::Persons => "persons",
        DistributionKey::Units => "unit count",
        DistributionKey::Consumption => "consumption share",
    }
}

//! Unit distribution data
//!
//! One rental unit's facts for the billing period: the dimensions the
//! distribution keys read, the prepayments already collected, and occupancy.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::{TenantId, UnitId};
use super::measure::Measure;
use super::money::Money;

/// One unit's facts for the period
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitDistributionData {
    pub unit_id: UnitId,

    /// Display label such as "EG links" or "3"
    pub unit_number: String,

    #[serde(default)]
    pub tenant_name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tenant_id: Option<TenantId>,

    /// Floor area in m²
    #[serde(default)]
    pub area: Measure,

    /// Household size
    #[serde(default)]
    pub persons: u32,

    /// Consumption weight, 0.00 to 100.00 percent
    #[serde(default)]
    pub heating_share: Measure,

    /// Advance payments already collected for the period
    #[serde(default)]
    pub prepayments: Money,

    #[serde(default)]
    pub is_vacant: bool,
}

impl UnitDistributionData {
    /// Largest floor area a single unit may declare (1 km²)
    pub const MAX_AREA: Measure = Measure::from_whole(1_000_000);

    /// Create an occupied unit with no dimensions set
    pub fn new(unit_number: impl Into<String>, tenant_name: impl Into<String>) -> Self {
        Self {
            unit_id: UnitId::new(),
            unit_number: unit_number.into(),
            tenant_name: tenant_name.into(),
            tenant_id: None,
            area: Measure::zero(),
            persons: 0,
            heating_share: Measure::zero(),
            prepayments: Money::zero(),
            is_vacant: false,
        }
    }

    /// Create a vacant unit
    pub fn vacant(unit_number: impl Into<String>) -> Self {
        Self {
            is_vacant: true,
            ..Self::new(unit_number, "")
        }
    }

    pub fn with_area(mut self, area: Measure) -> Self {
        self.area = area;
        self
    }

    pub fn with_persons(mut self, persons: u32) -> Self {
        self.persons = persons;
        self
    }

    pub fn with_heating_share(mut self, share: Measure) -> Self {
        self.heating_share = share;
        self
    }

    pub fn with_prepayments(mut self, prepayments: Money) -> Self {
        self.prepayments = prepayments;
        self
    }

    /// Label used in listings: unit number plus tenant, or "(vacant)"
    pub fn label(&self) -> String {
        if self.is_vacant {
            format!("{} (vacant)", self.unit_number)
        } else if self.tenant_name.is_empty() {
            self.unit_number.clone()
        } else {
            format!("{} ({})", self.unit_number, self.tenant_name)
        }
    }

    pub fn validate(&self) -> Result<(), UnitValidationError> {
        if self.unit_number.trim().is_empty() {
            return Err(UnitValidationError::EmptyUnitNumber);
        }
        if self.area > Self::MAX_AREA {
            return Err(UnitValidationError::AreaTooLarge(self.area));
        }
        if self.heating_share > Measure::FULL_PERCENT {
            return Err(UnitValidationError::HeatingShareOutOfRange(self.heating_share));
        }
        if self.prepayments.is_negative() {
            return Err(UnitValidationError::NegativePrepayments(self.prepayments));
        }
        Ok(())
    }
}

impl fmt::Display for UnitDistributionData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Partial update to a single unit's fields
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tenant_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub area: Option<Measure>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub persons: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub heating_share: Option<Measure>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prepayments: Option<Money>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_vacant: Option<bool>,
}

impl UnitPatch {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Apply the set fields to a unit, leaving the rest untouched
    pub fn apply_to(&self, unit: &mut UnitDistributionData) {
        if let Some(number) = &self.unit_number {
            unit.unit_number = number.clone();
        }
        if let Some(tenant) = &self.tenant_name {
            unit.tenant_name = tenant.clone();
        }
        if let Some(area) = self.area {
            unit.area = area;
        }
        if let Some(persons) = self.persons {
            unit.persons = persons;
        }
        if let Some(share) = self.heating_share {
            unit.heating_share = share;
        }
        if let Some(prepayments) = self.prepayments {
            unit.prepayments = prepayments;
        }
        if let Some(vacant) = self.is_vacant {
            unit.is_vacant = vacant;
        }
    }
}

/// Validation errors for unit data
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UnitValidationError {
    EmptyUnitNumber,
    AreaTooLarge(Measure),
    HeatingShareOutOfRange(Measure),
    NegativePrepayments(Money),
}

impl fmt::Display for UnitValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyUnitNumber => write!(f, "Unit number cannot be empty"),
            Self::AreaTooLarge(area) => write!(
                f,
                "Area must be at most {} m², got {} m²",
                UnitDistributionData::MAX_AREA,
                area
            ),
            Self::HeatingShareOutOfRange(share) => {
                write!(f, "Heating share must be between 0 and 100 percent, got {}", share)
            }
            Self::NegativePrepayments(amount) => {
                write!(f, "Prepayments cannot be negative: {}", amount)
            }
        }
    }
}

impl std::error::Error for UnitValidationError {}

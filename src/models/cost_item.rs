//! Cost item model
//!
//! A cost item is one line of shared building expense for the billing period,
//! together with the distribution key that decides how it is split.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::CostItemId;
use super::money::Money;

/// The rule by which a shared cost is divided among units
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DistributionKey {
    /// By floor area (m²)
    Area,
    /// By household size
    Persons,
    /// Flat split per unit
    Units,
    /// By metered or estimated consumption share
    Consumption,
}

impl DistributionKey {
    /// All keys in display order
    pub fn all() -> &'static [DistributionKey] {
        &[
            DistributionKey::Area,
            DistributionKey::Persons,
            DistributionKey::Units,
            DistributionKey::Consumption,
        ]
    }

    /// Parse a key from a string (English or German names)
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "area" | "flaeche" | "fläche" | "wohnflaeche" | "wohnfläche" | "m2" => Some(Self::Area),
            "persons" | "person" | "personen" => Some(Self::Persons),
            "units" | "unit" | "einheiten" | "wohneinheiten" => Some(Self::Units),
            "consumption" | "verbrauch" | "heating" => Some(Self::Consumption),
            _ => None,
        }
    }

    /// Whether every eligible unit must carry a positive value for this key
    /// before allocation may run
    pub fn requires_dimension(&self) -> bool {
        matches!(self, Self::Area | Self::Persons)
    }
}

impl fmt::Display for DistributionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Area => write!(f, "area"),
            Self::Persons => write!(f, "persons"),
            Self::Units => write!(f, "units"),
            Self::Consumption => write!(f, "consumption"),
        }
    }
}

/// One line item of shared expense for the period
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CostItem {
    pub id: CostItemId,

    /// Display label
    pub name: String,

    /// Total cost for the whole building and period
    pub amount: Money,

    pub distribution_key: DistributionKey,

    /// Inactive items are excluded from allocation entirely
    #[serde(default = "default_active")]
    pub is_active: bool,

    /// User-added item; only custom items may be removed
    #[serde(default)]
    pub is_custom: bool,
}

fn default_active() -> bool {
    true
}

impl CostItem {
    /// Create a built-in cost item
    pub fn new(name: impl Into<String>, amount: Money, distribution_key: DistributionKey) -> Self {
        Self {
            id: CostItemId::new(),
            name: name.into(),
            amount,
            distribution_key,
            is_active: true,
            is_custom: false,
        }
    }

    /// Create a user-defined cost item
    pub fn custom(name: impl Into<String>, amount: Money, distribution_key: DistributionKey) -> Self {
        Self {
            is_custom: true,
            ..Self::new(name, amount, distribution_key)
        }
    }

    /// Whether this item takes part in allocation
    pub fn is_allocatable(&self) -> bool {
        self.is_active && self.amount.is_positive()
    }

    pub fn validate(&self) -> Result<(), CostItemValidationError> {
        if self.name.trim().is_empty() {
            return Err(CostItemValidationError::EmptyName);
        }
        if self.amount.is_negative() {
            return Err(CostItemValidationError::NegativeAmount(self.amount));
        }
        Ok(())
    }
}

impl fmt::Display for CostItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}, by {})", self.name, self.amount, self.distribution_key)
    }
}

/// The standard operating-cost categories every new draft starts with
pub fn default_cost_items() -> Vec<CostItem> {
    use DistributionKey::*;

    [
        ("Grundsteuer", Area),
        ("Wasserversorgung", Persons),
        ("Entwässerung", Persons),
        ("Heizkosten", Consumption),
        ("Warmwasser", Consumption),
        ("Aufzug", Units),
        ("Straßenreinigung", Area),
        ("Müllbeseitigung", Persons),
        ("Gebäudereinigung", Area),
        ("Gartenpflege", Area),
        ("Beleuchtung", Area),
        ("Schornsteinreinigung", Units),
        ("Versicherung", Area),
        ("Hauswart", Area),
        ("Antenne/Kabel", Units),
    ]
    .into_iter()
    .map(|(name, key)| CostItem::new(name, Money::zero(), key))
    .collect()
}

/// Validation errors for cost items
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CostItemValidationError {
    EmptyName,
    NegativeAmount(Money),
}

impl fmt::Display for CostItemValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyName => write!(f, "Cost item name cannot be empty"),
            Self::NegativeAmount(amount) => {
                write!(f, "Cost item amount cannot be negative: {}", amount)
            }
        }
    }
}

impl std::error::Error for CostItemValidationError {}

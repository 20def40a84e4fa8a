//! Building reference and committed statement records
//!
//! A statement record is the frozen copy of a finished draft, handed to the
//! statement store and to document generation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::cost_item::CostItem;
use super::ids::{BuildingId, StatementId};
use super::money::Money;
use super::period::BillingPeriod;
use super::result::CalculationResult;
use super::unit::UnitDistributionData;

/// The building a draft is being prepared for
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildingRef {
    pub id: BuildingId,
    pub name: String,
}

impl BuildingRef {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: BuildingId::new(),
            name: name.into(),
        }
    }
}

impl fmt::Display for BuildingRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// A committed operating-cost statement
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatementRecord {
    pub id: StatementId,
    pub building: BuildingRef,
    pub period: BillingPeriod,
    pub vacancy_costs_to_landlord: bool,
    pub total_costs: Money,
    pub cost_items: Vec<CostItem>,
    pub units: Vec<UnitDistributionData>,
    pub results: Vec<CalculationResult>,
    pub committed_at: DateTime<Utc>,
}

impl StatementRecord {
    /// Sum of all unit balances
    pub fn total_balance(&self) -> Money {
        self.results.iter().map(|r| r.result).sum()
    }
}

impl fmt::Display for StatementRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} ({}, {} units, total {})",
            self.id,
            self.building,
            self.period,
            self.results.len(),
            self.total_costs
        )
    }
}

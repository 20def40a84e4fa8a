//! Calculation result model
//!
//! Per-unit engine output: the allocated cost share, the prepayments, and
//! the resulting balance, with a line-by-line breakdown.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::cost_item::DistributionKey;
use super::ids::{CostItemId, UnitId};
use super::money::Money;

/// One cost item's contribution to a unit's share
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CostBreakdownEntry {
    pub cost_item_id: CostItemId,
    pub cost_item_name: String,
    /// The cost item's amount for the whole building
    pub total_amount: Money,
    /// This unit's rounded share
    pub share: Money,
    pub distribution_key: DistributionKey,
    /// Human-readable trace of the computation
    pub formula: String,
}

impl CostBreakdownEntry {
    /// True when money was charged to the building but nothing landed here
    pub fn is_zero_share(&self) -> bool {
        self.share.is_zero() && self.total_amount.is_positive()
    }
}

/// Balance direction of a result
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Balance {
    /// Tenant receives money back
    Credit,
    /// Tenant owes money
    Due,
    Settled,
}

/// Engine output for one unit
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalculationResult {
    pub unit_id: UnitId,
    pub unit_number: String,
    pub tenant_name: String,

    /// Sum of the breakdown shares
    pub cost_share: Money,

    pub prepayments: Money,

    /// `prepayments - cost_share`: positive is a credit, negative is due
    pub result: Money,

    /// One entry per allocated cost item, in cost item order
    pub cost_breakdown: Vec<CostBreakdownEntry>,
}

impl CalculationResult {
    pub fn balance(&self) -> Balance {
        if self.result.is_positive() {
            Balance::Credit
        } else if self.result.is_negative() {
            Balance::Due
        } else {
            Balance::Settled
        }
    }

    pub fn is_credit(&self) -> bool {
        self.balance() == Balance::Credit
    }

    pub fn is_due(&self) -> bool {
        self.balance() == Balance::Due
    }
}

impl fmt::Display for CalculationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self.balance() {
            Balance::Credit => "credit",
            Balance::Due => "due",
            Balance::Settled => "settled",
        };
        write!(
            f,
            "{}: share {} | prepaid {} | {} {}",
            self.unit_number,
            self.cost_share,
            self.prepayments,
            label,
            self.result.abs()
        )
    }
}

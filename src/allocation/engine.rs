//! Allocation engine
//!
//! Splits every active cost item over the eligible units and produces one
//! calculation result per input unit, in input order. The engine is pure:
//! it reads its arguments and returns new data.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::models::{
    CalculationResult, CostBreakdownEntry, CostItem, CostItemId, DistributionKey, Money,
    UnitDistributionData,
};

use super::formula::{self, Denominators};
use super::rounding::RoundingPolicy;

/// Allocate with the default per-unit rounding
///
/// `vacancy_costs_to_landlord` removes vacant units from every denominator
/// and returns their prepayments in full.
pub fn allocate(
    cost_items: &[CostItem],
    units: &[UnitDistributionData],
    vacancy_costs_to_landlord: bool,
) -> Vec<CalculationResult> {
    AllocationEngine::new(vacancy_costs_to_landlord)
        .run(cost_items, units)
        .results
}

/// Rounding audit for one allocated cost item
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CostItemAudit {
    pub cost_item_id: CostItemId,
    pub cost_item_name: String,
    pub distribution_key: DistributionKey,
    pub total_amount: Money,
    /// Sum of the rounded shares over all units
    pub allocated: Money,
    /// `allocated - total_amount`
    pub drift: Money,
    /// The key's denominator was zero, so nothing was allocated
    pub unallocated: bool,
}

/// Non-fatal conditions found while allocating
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AllocationWarning {
    /// A cost item's key has a zero base over the eligible units
    ZeroDenominator {
        cost_item_id: CostItemId,
        cost_item_name: String,
        distribution_key: DistributionKey,
        amount: Money,
    },
}

impl AllocationWarning {
    /// The warning text with amounts in the given currency symbol
    pub fn message(&self, symbol: &str) -> String {
        match self {
            Self::ZeroDenominator {
                cost_item_name,
                distribution_key,
                amount,
                ..
            } => format!(
                "'{}' ({}) was not allocated: no eligible unit has a {} value",
                cost_item_name,
                amount.format_with_symbol(symbol),
                distribution_key
            ),
        }
    }
}

impl std::fmt::Display for AllocationWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message(""))
    }
}

/// Per cost item drift and unallocated amounts of one run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllocationReport {
    pub items: Vec<CostItemAudit>,
    pub warnings: Vec<AllocationWarning>,
}

impl AllocationReport {
    /// Net rounding drift over all allocated items
    pub fn total_drift(&self) -> Money {
        self.items
            .iter()
            .filter(|item| !item.unallocated)
            .map(|item| item.drift)
            .sum()
    }

    /// Money that no unit was charged for because of zero denominators
    pub fn unallocated_amount(&self) -> Money {
        self.items
            .iter()
            .filter(|item| item.unallocated)
            .map(|item| item.total_amount)
            .sum()
    }

    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }
}

/// The output of one engine run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Allocation {
    pub results: Vec<CalculationResult>,
    pub report: AllocationReport,
}

/// Configured allocation engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AllocationEngine {
    vacancy_costs_to_landlord: bool,
    rounding: RoundingPolicy,
}

impl AllocationEngine {
    pub fn new(vacancy_costs_to_landlord: bool) -> Self {
        Self {
            vacancy_costs_to_landlord,
            rounding: RoundingPolicy::default(),
        }
    }

    pub fn with_rounding(mut self, rounding: RoundingPolicy) -> Self {
        self.rounding = rounding;
        self
    }

    /// Whether a unit takes part in the denominators under this policy
    pub fn is_eligible(&self, unit: &UnitDistributionData) -> bool {
        !(self.vacancy_costs_to_landlord && unit.is_vacant)
    }

    /// The eligible subset of `units`, in input order
    pub fn eligible_units<'a>(
        &self,
        units: &'a [UnitDistributionData],
    ) -> Vec<&'a UnitDistributionData> {
        units.iter().filter(|unit| self.is_eligible(unit)).collect()
    }

    pub fn run(&self, cost_items: &[CostItem], units: &[UnitDistributionData]) -> Allocation {
        let eligible = self.eligible_units(units);
        let denominators = Denominators::over(eligible.iter().copied());

        debug!(
            units = units.len(),
            eligible = eligible.len(),
            rounding = %self.rounding,
            "running allocation"
        );

        let mut report = AllocationReport::default();

        // shares[item][eligible position]
        let allocatable: Vec<&CostItem> =
            cost_items.iter().filter(|item| item.is_allocatable()).collect();
        let mut shares: Vec<Vec<Money>> = Vec::with_capacity(allocatable.len());

        for item in &allocatable {
            let key = item.distribution_key;
            let total = denominators.for_key(key);
            let weights: Vec<u64> = eligible
                .iter()
                .map(|unit| formula::weight(key, unit))
                .collect();

            let item_shares = if total == 0 {
                warn!(
                    cost_item = %item.name,
                    key = %key,
                    amount = item.amount.cents(),
                    "distribution base is zero, cost item left unallocated"
                );
                report.warnings.push(AllocationWarning::ZeroDenominator {
                    cost_item_id: item.id,
                    cost_item_name: item.name.clone(),
                    distribution_key: key,
                    amount: item.amount,
                });
                vec![Money::zero(); eligible.len()]
            } else {
                self.rounding.split(item.amount, &weights)
            };

            let allocated: Money = item_shares.iter().sum();
            report.items.push(CostItemAudit {
                cost_item_id: item.id,
                cost_item_name: item.name.clone(),
                distribution_key: key,
                total_amount: item.amount,
                allocated,
                drift: allocated - item.amount,
                unallocated: total == 0,
            });
            shares.push(item_shares);
        }

        let mut position = 0;
        let results = units
            .iter()
            .map(|unit| {
                if !self.is_eligible(unit) {
                    return vacancy_result(unit);
                }

                let cost_breakdown: Vec<CostBreakdownEntry> = allocatable
                    .iter()
                    .zip(&shares)
                    .map(|(item, item_shares)| {
                        let key = item.distribution_key;
                        CostBreakdownEntry {
                            cost_item_id: item.id,
                            cost_item_name: item.name.clone(),
                            total_amount: item.amount,
                            share: item_shares[position],
                            distribution_key: key,
                            formula: formula::describe(
                                key,
                                item.amount,
                                formula::weight(key, unit),
                                denominators.for_key(key),
                            ),
                        }
                    })
                    .collect();
                position += 1;

                let cost_share: Money = cost_breakdown.iter().map(|entry| entry.share).sum();
                CalculationResult {
                    unit_id: unit.unit_id,
                    unit_number: unit.unit_number.clone(),
                    tenant_name: unit.tenant_name.clone(),
                    cost_share,
                    prepayments: unit.prepayments,
                    result: unit.prepayments - cost_share,
                    cost_breakdown,
                }
            })
            .collect();

        Allocation { results, report }
    }
}

/// Result row for a vacant unit whose costs the landlord carries
fn vacancy_result(unit: &UnitDistributionData) -> CalculationResult {
    CalculationResult {
        unit_id: unit.unit_id,
        unit_number: unit.unit_number.clone(),
        tenant_name: unit.tenant_name.clone(),
        cost_share: Money::zero(),
        prepayments: unit.prepayments,
        result: unit.prepayments,
        cost_breakdown: Vec::new(),
    }
}

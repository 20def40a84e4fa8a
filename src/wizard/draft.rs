//! The in-progress billing draft
//!
//! `BillingDraft` holds everything the wizard collects before a statement is
//! committed: building, period, cost items, unit data, vacancy policy and
//! options. It also caches the last allocation outcome. Every mutation drops
//! that cache, so results are always derived from the current inputs.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::{debug, info};

use crate::allocation::{AllocationEngine, AllocationReport, RoundingPolicy};
use crate::error::{CostshareError, CostshareResult};
use crate::models::{
    default_cost_items, BillingPeriod, BuildingRef, CalculationResult, CostItem, CostItemId,
    DistributionKey, Money, StatementId, StatementRecord, UnitDistributionData, UnitId,
    UnitPatch, MAX_PERIOD_DAYS,
};

use super::validation::{self, ValidationIssue, WizardStep};

/// Current draft schema version
pub const DRAFT_SCHEMA_VERSION: u32 = 1;

/// Draft-level options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DraftOptions {
    #[serde(default)]
    pub rounding: RoundingPolicy,

    #[serde(default = "default_max_period_days")]
    pub max_period_days: i64,

    /// Vacancy policy a reset draft starts with
    #[serde(default = "default_true")]
    pub default_vacancy_costs_to_landlord: bool,
}

fn default_max_period_days() -> i64 {
    MAX_PERIOD_DAYS
}

fn default_true() -> bool {
    true
}

fn default_schema_version() -> u32 {
    DRAFT_SCHEMA_VERSION
}

impl Default for DraftOptions {
    fn default() -> Self {
        Self {
            rounding: RoundingPolicy::default(),
            max_period_days: default_max_period_days(),
            default_vacancy_costs_to_landlord: true,
        }
    }
}

/// The cached result of the last allocation run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllocationOutcome {
    pub results: Vec<CalculationResult>,
    /// Σ of the allocated cost items' amounts
    pub total_costs: Money,
    pub report: AllocationReport,
    pub computed_at: DateTime<Utc>,
}

/// Aggregate figures over an outcome
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DraftTotals {
    pub total_costs: Money,
    pub total_cost_shares: Money,
    pub total_prepayments: Money,
    pub total_balance: Money,
    pub credit_count: usize,
    pub due_count: usize,
}

impl AllocationOutcome {
    pub fn totals(&self) -> DraftTotals {
        DraftTotals {
            total_costs: self.total_costs,
            total_cost_shares: self.results.iter().map(|r| r.cost_share).sum(),
            total_prepayments: self.results.iter().map(|r| r.prepayments).sum(),
            total_balance: self.results.iter().map(|r| r.result).sum(),
            credit_count: self.results.iter().filter(|r| r.is_credit()).count(),
            due_count: self.results.iter().filter(|r| r.is_due()).count(),
        }
    }
}

/// Editable draft of one operating-cost statement
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BillingDraft {
    #[serde(default = "default_schema_version")]
    schema_version: u32,

    #[serde(default)]
    building: Option<BuildingRef>,

    #[serde(default)]
    period: Option<BillingPeriod>,

    #[serde(default)]
    cost_items: Vec<CostItem>,

    #[serde(default)]
    units: Vec<UnitDistributionData>,

    #[serde(default = "default_true")]
    vacancy_costs_to_landlord: bool,

    #[serde(default)]
    options: DraftOptions,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    outcome: Option<AllocationOutcome>,

    updated_at: DateTime<Utc>,
}

impl BillingDraft {
    /// A fresh draft with default options
    pub fn new(today: NaiveDate) -> Self {
        Self::with_options(today, DraftOptions::default())
    }

    /// A fresh draft: seed cost items, last year's period, no units
    pub fn with_options(today: NaiveDate, options: DraftOptions) -> Self {
        Self {
            schema_version: DRAFT_SCHEMA_VERSION,
            building: None,
            period: Some(BillingPeriod::previous_year(today)),
            cost_items: default_cost_items(),
            units: Vec::new(),
            vacancy_costs_to_landlord: options.default_vacancy_costs_to_landlord,
            options,
            outcome: None,
            updated_at: Utc::now(),
        }
    }

    pub fn schema_version(&self) -> u32 {
        self.schema_version
    }

    pub fn building(&self) -> Option<&BuildingRef> {
        self.building.as_ref()
    }

    pub fn period(&self) -> Option<&BillingPeriod> {
        self.period.as_ref()
    }

    pub fn cost_items(&self) -> &[CostItem] {
        &self.cost_items
    }

    pub fn units(&self) -> &[UnitDistributionData] {
        &self.units
    }

    pub fn vacancy_costs_to_landlord(&self) -> bool {
        self.vacancy_costs_to_landlord
    }

    pub fn options(&self) -> &DraftOptions {
        &self.options
    }

    /// The last allocation outcome, if inputs have not changed since
    pub fn outcome(&self) -> Option<&AllocationOutcome> {
        self.outcome.as_ref()
    }

    pub fn results(&self) -> &[CalculationResult] {
        self.outcome
            .as_ref()
            .map(|outcome| outcome.results.as_slice())
            .unwrap_or(&[])
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Σ of the active cost items' amounts
    pub fn total_costs(&self) -> Money {
        self.cost_items
            .iter()
            .filter(|item| item.is_allocatable())
            .map(|item| item.amount)
            .sum()
    }

    /// Find a cost item by name (case-insensitive) or ID
    pub fn find_cost_item(&self, reference: &str) -> Option<&CostItem> {
        let needle = reference.trim().to_lowercase();
        self.cost_items
            .iter()
            .find(|item| item.name.to_lowercase() == needle)
            .or_else(|| self.cost_items.iter().find(|item| item.id.matches(reference)))
    }

    /// Find a unit by unit number or ID
    pub fn find_unit(&self, reference: &str) -> Option<&UnitDistributionData> {
        let needle = reference.trim();
        self.units
            .iter()
            .find(|unit| unit.unit_number.eq_ignore_ascii_case(needle))
            .or_else(|| self.units.iter().find(|unit| unit.unit_id.matches(reference)))
    }

    /// Select the building. Units and results are dropped when it changes.
    pub fn select_building(&mut self, building: BuildingRef) {
        let changed = self
            .building
            .as_ref()
            .map(|current| current.id != building.id)
            .unwrap_or(true);
        if changed && self.building.is_some() {
            debug!(building = %building.name, "building changed, clearing unit data");
            self.units.clear();
        }
        self.building = Some(building);
        self.invalidate();
    }

    /// Set the billing period; rejected unless start < end and the span is
    /// within the configured maximum
    pub fn set_period(&mut self, start: NaiveDate, end: NaiveDate) -> CostshareResult<()> {
        let period = BillingPeriod::new(start, end, self.options.max_period_days)
            .map_err(|e| CostshareError::Validation(e.to_string()))?;
        self.period = Some(period);
        self.invalidate();
        Ok(())
    }

    /// Insert a cost item or replace the one with the same ID.
    ///
    /// A replaced item keeps its provenance flag.
    pub fn upsert_cost_item(&mut self, mut item: CostItem) -> CostshareResult<()> {
        item.validate()
            .map_err(|e| CostshareError::Validation(e.to_string()))?;

        let duplicate_name = self.cost_items.iter().any(|existing| {
            existing.id != item.id && existing.name.eq_ignore_ascii_case(item.name.trim())
        });
        if duplicate_name {
            return Err(CostshareError::Duplicate {
                entity_type: "Cost item",
                identifier: item.name,
            });
        }

        item.name = item.name.trim().to_string();
        match self.cost_items.iter_mut().find(|existing| existing.id == item.id) {
            Some(existing) => {
                item.is_custom = existing.is_custom;
                *existing = item;
            }
            None => self.cost_items.push(item),
        }

        self.invalidate();
        Ok(())
    }

    /// Add a user-defined cost item
    pub fn add_custom_cost_item(
        &mut self,
        name: impl Into<String>,
        amount: Money,
        distribution_key: DistributionKey,
    ) -> CostshareResult<CostItemId> {
        let item = CostItem::custom(name, amount, distribution_key);
        let id = item.id;
        self.upsert_cost_item(item)?;
        Ok(id)
    }

    /// Remove a custom cost item. Built-in items can only be deactivated.
    pub fn remove_cost_item(&mut self, id: CostItemId) -> CostshareResult<CostItem> {
        let index = self
            .cost_items
            .iter()
            .position(|item| item.id == id)
            .ok_or_else(|| CostshareError::cost_item_not_found(id.to_string()))?;

        if !self.cost_items[index].is_custom {
            return Err(CostshareError::Validation(format!(
                "'{}' is a built-in cost item and cannot be removed; deactivate it instead",
                self.cost_items[index].name
            )));
        }

        let removed = self.cost_items.remove(index);
        self.invalidate();
        Ok(removed)
    }

    pub fn set_cost_item_active(&mut self, id: CostItemId, active: bool) -> CostshareResult<()> {
        let item = self
            .cost_items
            .iter_mut()
            .find(|item| item.id == id)
            .ok_or_else(|| CostshareError::cost_item_not_found(id.to_string()))?;
        item.is_active = active;
        self.invalidate();
        Ok(())
    }

    /// Replace the working unit list
    pub fn set_unit_distributions(
        &mut self,
        units: Vec<UnitDistributionData>,
    ) -> CostshareResult<()> {
        let mut seen = HashSet::new();
        for unit in &units {
            unit.validate().map_err(|e| {
                CostshareError::Validation(format!("Unit {}: {}", unit.unit_number, e))
            })?;
            if !seen.insert(unit.unit_id) {
                return Err(CostshareError::Duplicate {
                    entity_type: "Unit",
                    identifier: unit.unit_id.to_string(),
                });
            }
        }

        self.units = units;
        self.invalidate();
        Ok(())
    }

    /// Apply a partial update to one unit
    pub fn update_unit_distribution(
        &mut self,
        unit_id: UnitId,
        patch: &UnitPatch,
    ) -> CostshareResult<&UnitDistributionData> {
        let index = self
            .units
            .iter()
            .position(|unit| unit.unit_id == unit_id)
            .ok_or_else(|| CostshareError::unit_not_found(unit_id.to_string()))?;

        let mut updated = self.units[index].clone();
        patch.apply_to(&mut updated);
        updated.validate().map_err(|e| {
            CostshareError::Validation(format!("Unit {}: {}", updated.unit_number, e))
        })?;

        self.units[index] = updated;
        self.invalidate();
        Ok(&self.units[index])
    }

    pub fn set_vacancy_policy(&mut self, vacancy_costs_to_landlord: bool) {
        self.vacancy_costs_to_landlord = vacancy_costs_to_landlord;
        self.invalidate();
    }

    pub fn set_rounding_policy(&mut self, rounding: RoundingPolicy) {
        self.options.rounding = rounding;
        self.invalidate();
    }

    /// Issues blocking one step
    pub fn issues_for(&self, step: WizardStep) -> Vec<ValidationIssue> {
        validation::issues_for(self, step)
    }

    pub fn is_step_valid(&self, step: WizardStep) -> bool {
        self.issues_for(step).is_empty()
    }

    /// Issues blocking allocation
    pub fn readiness(&self) -> Vec<ValidationIssue> {
        validation::readiness(self)
    }

    /// Validate the draft, run the allocation engine, and cache the outcome
    pub fn run_allocation(&mut self) -> CostshareResult<&AllocationOutcome> {
        let issues = self.readiness();
        if !issues.is_empty() {
            return Err(CostshareError::NotReady(issues));
        }

        let allocation = AllocationEngine::new(self.vacancy_costs_to_landlord)
            .with_rounding(self.options.rounding)
            .run(&self.cost_items, &self.units);

        info!(
            units = allocation.results.len(),
            warnings = allocation.report.warnings.len(),
            drift = allocation.report.total_drift().cents(),
            "allocation complete"
        );

        let outcome = AllocationOutcome {
            results: allocation.results,
            total_costs: self.total_costs(),
            report: allocation.report,
            computed_at: Utc::now(),
        };
        Ok(self.outcome.insert(outcome))
    }

    /// Discard everything and start over, keeping the options
    pub fn reset(&mut self, today: NaiveDate) {
        *self = Self::with_options(today, self.options);
    }

    /// Freeze the draft into a statement record.
    ///
    /// Requires every step, including computed results, to be valid.
    pub fn to_statement(&self, id: StatementId) -> CostshareResult<StatementRecord> {
        let mut issues = self.readiness();
        issues.extend(self.issues_for(WizardStep::Confirm));

        let (building, period, outcome) = match (&self.building, &self.period, &self.outcome) {
            (Some(building), Some(period), Some(outcome)) if issues.is_empty() => {
                (building, period, outcome)
            }
            _ => return Err(CostshareError::NotReady(issues)),
        };

        Ok(StatementRecord {
            id,
            building: building.clone(),
            period: *period,
            vacancy_costs_to_landlord: self.vacancy_costs_to_landlord,
            total_costs: outcome.total_costs,
            cost_items: self.cost_items.clone(),
            units: self.units.clone(),
            results: outcome.results.clone(),
            committed_at: Utc::now(),
        })
    }

    fn invalidate(&mut self) {
        self.outcome = None;
        self.updated_at = Utc::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Measure;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 19).unwrap()
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn unit(number: &str, prepayments: i64) -> UnitDistributionData {
        UnitDistributionData::new(number, format!("Tenant {}", number))
            .with_area(Measure::from_whole(50))
            .with_persons(2)
            .with_prepayments(Money::from_cents(prepayments))
    }

    fn ready_draft() -> BillingDraft {
        let mut draft = BillingDraft::new(today());
        draft.select_building(BuildingRef::new("Lindenweg 4"));
        let heating = draft.find_cost_item("Heizkosten").unwrap().clone();
        draft
            .upsert_cost_item(CostItem {
                amount: Money::from_cents(100000),
                distribution_key: DistributionKey::Area,
                ..heating
            })
            .unwrap();
        draft
            .set_unit_distributions(vec![unit("A", 60000), unit("B", 40000)])
            .unwrap();
        draft
    }

    #[test]
    fn test_new_draft_defaults() {
        let draft = BillingDraft::new(today());
        let period = draft.period().unwrap();

        assert_eq!(period.start, date(2025, 1, 1));
        assert_eq!(period.end, date(2025, 12, 31));
        assert_eq!(draft.cost_items().len(), 15);
        assert!(draft.units().is_empty());
        assert!(draft.vacancy_costs_to_landlord());
        assert!(draft.outcome().is_none());
    }

    #[test]
    fn test_set_period_validation() {
        let mut draft = BillingDraft::new(today());

        assert!(draft.set_period(date(2025, 12, 31), date(2025, 1, 1)).is_err());
        assert!(draft.set_period(date(2024, 1, 1), date(2025, 1, 2)).is_err());
        assert_eq!(draft.period().unwrap().start, date(2025, 1, 1));

        draft.set_period(date(2024, 1, 1), date(2025, 1, 1)).unwrap();
        assert_eq!(draft.period().unwrap().end, date(2025, 1, 1));
    }

    #[test]
    fn test_run_allocation_concrete_scenario() {
        let mut draft = ready_draft();
        let outcome = draft.run_allocation().unwrap();

        assert_eq!(outcome.total_costs.cents(), 100000);
        assert_eq!(outcome.results[0].cost_share.cents(), 50000);
        assert_eq!(outcome.results[0].result.cents(), 10000);
        assert_eq!(outcome.results[1].result.cents(), -10000);

        let totals = outcome.totals();
        assert_eq!(totals.total_cost_shares.cents(), 100000);
        assert_eq!(totals.total_prepayments.cents(), 100000);
        assert!(totals.total_balance.is_zero());
        assert_eq!(totals.credit_count, 1);
        assert_eq!(totals.due_count, 1);
        assert!(draft.is_step_valid(WizardStep::Confirm));
    }

    #[test]
    fn test_run_allocation_blocked_with_all_issues() {
        let mut draft = BillingDraft::new(today());
        let err = draft.run_allocation().unwrap_err();

        assert_eq!(err.issues().len(), 3);
        assert!(draft.outcome().is_none());
    }

    #[test]
    fn test_missing_persons_blocks_allocation() {
        let mut draft = ready_draft();
        draft
            .add_custom_cost_item("Müll", Money::from_cents(5000), DistributionKey::Persons)
            .unwrap();
        let unit_id = draft.units()[0].unit_id;
        draft
            .update_unit_distribution(
                unit_id,
                &UnitPatch {
                    persons: Some(0),
                    ..Default::default()
                },
            )
            .unwrap();

        let err = draft.run_allocation().unwrap_err();
        assert!(matches!(
            err.issues(),
            [ValidationIssue::MissingDimension {
                distribution_key: DistributionKey::Persons,
                ..
            }]
        ));
    }

    #[test]
    fn test_every_mutation_invalidates_results() {
        let mut draft = ready_draft();
        draft.run_allocation().unwrap();
        draft.set_vacancy_policy(false);
        assert!(draft.outcome().is_none());

        draft.run_allocation().unwrap();
        let unit_id = draft.units()[1].unit_id;
        draft
            .update_unit_distribution(
                unit_id,
                &UnitPatch {
                    prepayments: Some(Money::from_cents(1)),
                    ..Default::default()
                },
            )
            .unwrap();
        assert!(draft.results().is_empty());

        draft.run_allocation().unwrap();
        draft.set_rounding_policy(RoundingPolicy::LargestRemainder);
        assert!(draft.outcome().is_none());
    }

    #[test]
    fn test_run_allocation_is_repeatable() {
        let mut draft = ready_draft();
        let first = draft.run_allocation().unwrap().results.clone();
        let second = draft.run_allocation().unwrap().results.clone();
        assert_eq!(first, second);
    }

    #[test]
    fn test_builtin_items_cannot_be_removed() {
        let mut draft = BillingDraft::new(today());
        let builtin = draft.find_cost_item("aufzug").unwrap().id;

        let err = draft.remove_cost_item(builtin).unwrap_err();
        assert!(err.is_validation());

        draft.set_cost_item_active(builtin, false).unwrap();
        assert!(!draft.find_cost_item("Aufzug").unwrap().is_active);

        let custom = draft
            .add_custom_cost_item("Winterdienst", Money::from_cents(12000), DistributionKey::Area)
            .unwrap();
        let removed = draft.remove_cost_item(custom).unwrap();
        assert_eq!(removed.name, "Winterdienst");
        assert!(draft.find_cost_item("Winterdienst").is_none());
    }

    #[test]
    fn test_upsert_keeps_provenance_and_rejects_duplicates() {
        let mut draft = BillingDraft::new(today());
        let mut item = draft.find_cost_item("Grundsteuer").unwrap().clone();
        item.is_custom = true;
        item.amount = Money::from_cents(4200);
        draft.upsert_cost_item(item).unwrap();

        let stored = draft.find_cost_item("Grundsteuer").unwrap();
        assert!(!stored.is_custom);
        assert_eq!(stored.amount.cents(), 4200);

        let err = draft
            .add_custom_cost_item("grundsteuer", Money::from_cents(1), DistributionKey::Area)
            .unwrap_err();
        assert!(matches!(err, CostshareError::Duplicate { .. }));
    }

    #[test]
    fn test_unit_updates_are_validated() {
        let mut draft = ready_draft();
        let unit_id = draft.units()[0].unit_id;

        let err = draft
            .update_unit_distribution(
                unit_id,
                &UnitPatch {
                    heating_share: Some(Measure::from_whole(101)),
                    ..Default::default()
                },
            )
            .unwrap_err();
        assert!(err.is_validation());
        assert!(draft.units()[0].heating_share.is_zero());

        let err = draft
            .update_unit_distribution(UnitId::new(), &UnitPatch::default())
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_duplicate_unit_ids_rejected() {
        let mut draft = BillingDraft::new(today());
        let a = unit("A", 0);
        let mut b = unit("B", 0);
        b.unit_id = a.unit_id;

        assert!(draft.set_unit_distributions(vec![a, b]).is_err());
    }

    #[test]
    fn test_changing_building_clears_units() {
        let mut draft = ready_draft();
        let same = draft.building().unwrap().clone();
        draft.select_building(same);
        assert_eq!(draft.units().len(), 2);

        draft.select_building(BuildingRef::new("Birkenallee 9"));
        assert!(draft.units().is_empty());
    }

    #[test]
    fn test_reset_restores_defaults_but_keeps_options() {
        let mut draft = ready_draft();
        draft.set_rounding_policy(RoundingPolicy::LargestRemainder);
        draft.run_allocation().unwrap();

        draft.reset(today());

        assert!(draft.building().is_none());
        assert!(draft.units().is_empty());
        assert!(draft.outcome().is_none());
        assert_eq!(draft.total_costs(), Money::zero());
        assert_eq!(draft.options().rounding, RoundingPolicy::LargestRemainder);
    }

    #[test]
    fn test_to_statement_requires_results() {
        let mut draft = ready_draft();
        let err = draft.to_statement(StatementId::new()).unwrap_err();
        assert_eq!(err.issues(), &[ValidationIssue::NoResults]);

        draft.run_allocation().unwrap();
        let id = StatementId::new();
        let record = draft.to_statement(id).unwrap();

        assert_eq!(record.id, id);
        assert_eq!(record.building.name, "Lindenweg 4");
        assert_eq!(record.results.len(), 2);
        assert_eq!(record.total_costs.cents(), 100000);
        assert!(record.total_balance().is_zero());
    }

    #[test]
    fn test_draft_survives_serialization() {
        let mut draft = ready_draft();
        draft.run_allocation().unwrap();

        let json = serde_json::to_string(&draft).unwrap();
        let restored: BillingDraft = serde_json::from_str(&json).unwrap();

        assert_eq!(restored, draft);
    }
}

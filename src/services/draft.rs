//! Draft service
//!
//! Loads the stored draft, applies one change, saves it back and records the
//! change in the audit log. Each call is a full load/modify/save cycle, so
//! concurrent writers resolve as last write wins.

use std::path::Path;

use chrono::{Local, NaiveDate};
use tracing::info;

use crate::allocation::RoundingPolicy;
use crate::audit::{EntityType, Operation};
use crate::config::Settings;
use crate::error::{CostshareError, CostshareResult};
use crate::import::{import_units_file, UnitImport};
use crate::models::{
    BuildingRef, CostItem, DistributionKey, Money, StatementId, StatementRecord,
    UnitDistributionData, UnitPatch,
};
use crate::storage::{DraftStore, Storage};
use crate::wizard::{AllocationOutcome, BillingDraft};

const DRAFT_ENTITY_ID: &str = "draft";

/// Changes to apply to a cost item
#[derive(Debug, Clone, Default)]
pub struct CostItemChange {
    pub name: Option<String>,
    pub amount: Option<Money>,
    pub distribution_key: Option<DistributionKey>,
}

/// Service for editing the billing draft
pub struct DraftService<'a> {
    storage: &'a Storage,
    settings: &'a Settings,
    today: NaiveDate,
}

impl<'a> DraftService<'a> {
    pub fn new(storage: &'a Storage, settings: &'a Settings) -> Self {
        Self {
            storage,
            settings,
            today: Local::now().date_naive(),
        }
    }

    /// Pin "today", which decides the default billing period
    pub fn with_today(mut self, today: NaiveDate) -> Self {
        self.today = today;
        self
    }

    /// The stored draft, or a fresh one
    pub fn load(&self) -> CostshareResult<BillingDraft> {
        self.storage.load_draft_or_new(self.settings, self.today)
    }

    fn save(&self, draft: &BillingDraft) -> CostshareResult<()> {
        self.storage.draft.save(draft)
    }

    /// Discard the draft and start a fresh one from the settings
    pub fn reset(&self) -> CostshareResult<BillingDraft> {
        let draft = BillingDraft::with_options(self.today, self.settings.draft_options());
        self.save(&draft)?;
        self.storage.log_event(
            Operation::Reset,
            EntityType::Draft,
            DRAFT_ENTITY_ID,
            "draft discarded",
        )?;
        Ok(draft)
    }

    pub fn select_building(&self, name: &str) -> CostshareResult<BillingDraft> {
        let name = name.trim();
        if name.is_empty() {
            return Err(CostshareError::Validation(
                "Building name cannot be empty".into(),
            ));
        }

        let mut draft = self.load()?;
        let before = draft.building().cloned();

        // Re-selecting the same name keeps the building identity and its units
        let building = match &before {
            Some(current) if current.name.eq_ignore_ascii_case(name) => current.clone(),
            _ => BuildingRef::new(name),
        };
        draft.select_building(building.clone());
        self.save(&draft)?;

        self.storage.log_update(
            EntityType::Building,
            building.id.to_string(),
            Some(building.name.clone()),
            &before,
            &Some(building),
        )?;
        Ok(draft)
    }

    pub fn set_period(&self, start: NaiveDate, end: NaiveDate) -> CostshareResult<BillingDraft> {
        let mut draft = self.load()?;
        let before = draft.period().copied();

        draft.set_period(start, end)?;
        self.save(&draft)?;

        self.storage.log_update(
            EntityType::Period,
            DRAFT_ENTITY_ID,
            None,
            &before,
            &draft.period().copied(),
        )?;
        Ok(draft)
    }

    pub fn set_vacancy_policy(&self, to_landlord: bool) -> CostshareResult<BillingDraft> {
        let mut draft = self.load()?;
        let before = draft.vacancy_costs_to_landlord();

        draft.set_vacancy_policy(to_landlord);
        self.save(&draft)?;

        self.storage.log_update(
            EntityType::Options,
            DRAFT_ENTITY_ID,
            Some("vacancy_costs_to_landlord".into()),
            &before,
            &to_landlord,
        )?;
        Ok(draft)
    }

    pub fn set_rounding_policy(&self, rounding: RoundingPolicy) -> CostshareResult<BillingDraft> {
        let mut draft = self.load()?;
        let before = draft.options().rounding;

        draft.set_rounding_policy(rounding);
        self.save(&draft)?;

        self.storage.log_update(
            EntityType::Options,
            DRAFT_ENTITY_ID,
            Some("rounding".into()),
            &before,
            &rounding,
        )?;
        Ok(draft)
    }

    fn find_cost_item(draft: &BillingDraft, reference: &str) -> CostshareResult<CostItem> {
        draft
            .find_cost_item(reference)
            .cloned()
            .ok_or_else(|| CostshareError::cost_item_not_found(reference))
    }

    pub fn add_cost_item(
        &self,
        name: &str,
        amount: Money,
        key: DistributionKey,
    ) -> CostshareResult<CostItem> {
        let mut draft = self.load()?;
        let id = draft.add_custom_cost_item(name.trim(), amount, key)?;
        self.save(&draft)?;

        let item = draft
            .cost_items()
            .iter()
            .find(|item| item.id == id)
            .cloned()
            .ok_or_else(|| CostshareError::cost_item_not_found(id.to_string()))?;
        self.storage.log_create(
            EntityType::CostItem,
            item.id.to_string(),
            Some(item.name.clone()),
            &item,
        )?;
        Ok(item)
    }

    pub fn update_cost_item(
        &self,
        reference: &str,
        change: CostItemChange,
    ) -> CostshareResult<CostItem> {
        let mut draft = self.load()?;
        let before = Self::find_cost_item(&draft, reference)?;

        let mut item = before.clone();
        if let Some(name) = change.name {
            item.name = name;
        }
        if let Some(amount) = change.amount {
            item.amount = amount;
        }
        if let Some(key) = change.distribution_key {
            item.distribution_key = key;
        }

        draft.upsert_cost_item(item)?;
        self.save(&draft)?;

        let after = draft
            .cost_items()
            .iter()
            .find(|item| item.id == before.id)
            .cloned()
            .ok_or_else(|| CostshareError::cost_item_not_found(before.id.to_string()))?;
        self.storage.log_update(
            EntityType::CostItem,
            after.id.to_string(),
            Some(after.name.clone()),
            &before,
            &after,
        )?;
        Ok(after)
    }

    pub fn set_cost_item_active(&self, reference: &str, active: bool) -> CostshareResult<CostItem> {
        let mut draft = self.load()?;
        let before = Self::find_cost_item(&draft, reference)?;

        draft.set_cost_item_active(before.id, active)?;
        self.save(&draft)?;

        let after = CostItem {
            is_active: active,
            ..before.clone()
        };
        self.storage.log_update(
            EntityType::CostItem,
            after.id.to_string(),
            Some(after.name.clone()),
            &before,
            &after,
        )?;
        Ok(after)
    }

    pub fn remove_cost_item(&self, reference: &str) -> CostshareResult<CostItem> {
        let mut draft = self.load()?;
        let item = Self::find_cost_item(&draft, reference)?;

        let removed = draft.remove_cost_item(item.id)?;
        self.save(&draft)?;

        self.storage.log_delete(
            EntityType::CostItem,
            removed.id.to_string(),
            Some(removed.name.clone()),
            &removed,
        )?;
        Ok(removed)
    }

    /// Replace the unit list from a CSV or JSON file
    ///
    /// Nothing is changed when any row fails; the parse result is returned
    /// either way so the caller can show the row errors.
    pub fn import_units(&self, path: &Path) -> CostshareResult<(BillingDraft, UnitImport)> {
        let import = import_units_file(path)?;
        let mut draft = self.load()?;

        if import.has_errors() || import.rows.is_empty() {
            return Ok((draft, import));
        }

        let before = draft.units().to_vec();
        let units = import.clone().merge_with(&before);
        draft.set_unit_distributions(units)?;
        self.save(&draft)?;

        info!(units = draft.units().len(), path = %path.display(), "units imported");
        self.storage.log_update(
            EntityType::Unit,
            DRAFT_ENTITY_ID,
            Some(format!("import {}", path.display())),
            &before,
            &draft.units().to_vec(),
        )?;
        Ok((draft, import))
    }

    pub fn update_unit(
        &self,
        reference: &str,
        patch: &UnitPatch,
    ) -> CostshareResult<UnitDistributionData> {
        if patch.is_empty() {
            return Err(CostshareError::Validation(
                "Nothing to change; pass at least one field".into(),
            ));
        }

        let mut draft = self.load()?;
        let before = draft
            .find_unit(reference)
            .cloned()
            .ok_or_else(|| CostshareError::unit_not_found(reference))?;

        let after = draft.update_unit_distribution(before.unit_id, patch)?.clone();
        self.save(&draft)?;

        self.storage.log_update(
            EntityType::Unit,
            after.unit_id.to_string(),
            Some(after.unit_number.clone()),
            &before,
            &after,
        )?;
        Ok(after)
    }

    pub fn clear_units(&self) -> CostshareResult<usize> {
        let mut draft = self.load()?;
        let removed = draft.units().to_vec();

        draft.set_unit_distributions(Vec::new())?;
        self.save(&draft)?;

        if !removed.is_empty() {
            self.storage.log_delete(
                EntityType::Unit,
                DRAFT_ENTITY_ID,
                Some(format!("{} units", removed.len())),
                &removed,
            )?;
        }
        Ok(removed.len())
    }

    /// Validate and run the allocation, storing the results in the draft
    pub fn calculate(&self) -> CostshareResult<(BillingDraft, AllocationOutcome)> {
        let mut draft = self.load()?;
        let outcome = draft.run_allocation()?.clone();
        self.save(&draft)?;

        let symbol = self.settings.currency_symbol.as_str();
        self.storage.log_event(
            Operation::Calculate,
            EntityType::Allocation,
            DRAFT_ENTITY_ID,
            format!(
                "{} units, total {}, drift {}",
                outcome.results.len(),
                outcome.total_costs.format_with_symbol(symbol),
                outcome.report.total_drift().format_with_symbol(symbol)
            ),
        )?;
        Ok((draft, outcome))
    }

    /// Freeze the calculated draft into a statement record
    ///
    /// The draft is discarded afterwards unless `keep_draft` is set.
    pub fn commit(&self, keep_draft: bool) -> CostshareResult<StatementRecord> {
        let draft = self.load()?;
        let record = draft.to_statement(StatementId::new())?;

        self.storage.statements.insert(&record)?;
        self.storage.log_event(
            Operation::Commit,
            EntityType::Statement,
            record.id.to_string(),
            format!("{}, {}", record.building, record.period),
        )?;

        if !keep_draft {
            self.storage.draft.clear()?;
        }
        Ok(record)
    }
}

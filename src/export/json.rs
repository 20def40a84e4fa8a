//! JSON export of calculated statements
//!
//! The same `StatementExport` document backs the JSON and YAML formats.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::io::Write;

use crate::allocation::{AllocationReport, RoundingPolicy};
use crate::error::{CostshareError, CostshareResult};
use crate::models::{
    BillingPeriod, BuildingRef, CalculationResult, CostItem, Money, StatementId, StatementRecord,
};
use crate::wizard::{BillingDraft, ValidationIssue};

/// Current export schema version
pub const EXPORT_SCHEMA_VERSION: &str = "1.0.0";

/// Where the exported results come from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportSource {
    /// Uncommitted results of the working draft
    Draft,
    Committed,
}

/// Aggregates over the exported results
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportSummary {
    pub unit_count: usize,
    pub total_costs: Money,
    pub total_cost_shares: Money,
    pub total_prepayments: Money,
    pub total_balance: Money,
}

impl ExportSummary {
    fn over(total_costs: Money, results: &[CalculationResult]) -> Self {
        Self {
            unit_count: results.len(),
            total_costs,
            total_cost_shares: results.iter().map(|r| r.cost_share).sum(),
            total_prepayments: results.iter().map(|r| r.prepayments).sum(),
            total_balance: results.iter().map(|r| r.result).sum(),
        }
    }
}

/// A self-describing export of one statement's results
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatementExport {
    pub schema_version: String,
    pub exported_at: DateTime<Utc>,
    pub app_version: String,
    pub source: ExportSource,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub statement_id: Option<StatementId>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub building: Option<BuildingRef>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub period: Option<BillingPeriod>,

    pub vacancy_costs_to_landlord: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rounding: Option<RoundingPolicy>,

    /// Cost items that took part in the allocation
    pub cost_items: Vec<CostItem>,

    pub results: Vec<CalculationResult>,

    /// Drift and zero-denominator audit, present for draft exports
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub report: Option<AllocationReport>,

    pub summary: ExportSummary,
}

impl StatementExport {
    /// Export the draft's current results; fails if none are computed
    pub fn from_draft(draft: &BillingDraft) -> CostshareResult<Self> {
        let outcome = draft
            .outcome()
            .ok_or_else(|| CostshareError::NotReady(vec![ValidationIssue::NoResults]))?;

        Ok(Self {
            schema_version: EXPORT_SCHEMA_VERSION.to_string(),
            exported_at: Utc::now(),
            app_version: env!("CARGO_PKG_VERSION").to_string(),
            source: ExportSource::Draft,
            statement_id: None,
            building: draft.building().cloned(),
            period: draft.period().copied(),
            vacancy_costs_to_landlord: draft.vacancy_costs_to_landlord(),
            rounding: Some(draft.options().rounding),
            cost_items: allocated_items(draft.cost_items()),
            results: outcome.results.clone(),
            report: Some(outcome.report.clone()),
            summary: ExportSummary::over(outcome.total_costs, &outcome.results),
        })
    }

    pub fn from_record(record: &StatementRecord) -> Self {
        Self {
            schema_version: EXPORT_SCHEMA_VERSION.to_string(),
            exported_at: Utc::now(),
            app_version: env!("CARGO_PKG_VERSION").to_string(),
            source: ExportSource::Committed,
            statement_id: Some(record.id),
            building: Some(record.building.clone()),
            period: Some(record.period),
            vacancy_costs_to_landlord: record.vacancy_costs_to_landlord,
            rounding: None,
            cost_items: allocated_items(&record.cost_items),
            results: record.results.clone(),
            report: None,
            summary: ExportSummary::over(record.total_costs, &record.results),
        }
    }

    /// Check the document is one this version understands
    pub fn validate(&self) -> Result<(), String> {
        let major = |v: &str| v.split('.').next().map(str::to_string);
        if major(&self.schema_version) != major(EXPORT_SCHEMA_VERSION) {
            return Err(format!(
                "Unsupported export schema version {} (expected {})",
                self.schema_version, EXPORT_SCHEMA_VERSION
            ));
        }
        if self.summary.unit_count != self.results.len() {
            return Err(format!(
                "Summary lists {} units but {} results are present",
                self.summary.unit_count,
                self.results.len()
            ));
        }
        Ok(())
    }
}

fn allocated_items(items: &[CostItem]) -> Vec<CostItem> {
    items
        .iter()
        .filter(|item| item.is_allocatable())
        .cloned()
        .collect()
}

pub fn export_statement_json<W: Write>(
    export: &StatementExport,
    writer: &mut W,
) -> CostshareResult<()> {
    serde_json::to_writer_pretty(&mut *writer, export)
        .map_err(|e| CostshareError::Export(e.to_string()))?;
    writeln!(writer).map_err(|e| CostshareError::Export(e.to_string()))?;
    Ok(())
}

/// Read back a JSON export
pub fn read_statement_json(json_str: &str) -> CostshareResult<StatementExport> {
    let export: StatementExport =
        serde_json::from_str(json_str).map_err(|e| CostshareError::Import(e.to_string()))?;
    export.validate().map_err(CostshareError::Import)?;
    Ok(export)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::models::{DistributionKey, Measure, UnitDistributionData};
    use chrono::NaiveDate;

    pub(crate) fn calculated_draft() -> BillingDraft {
        let mut draft = BillingDraft::new(NaiveDate::from_ymd_opt(2026, 4, 1).unwrap());
        draft.select_building(BuildingRef::new("Hafenstraße 7"));
        draft
            .add_custom_cost_item("Heizung", Money::from_cents(100000), DistributionKey::Area)
            .unwrap();
        draft
            .set_unit_distributions(vec![
                UnitDistributionData::new("A", "Anna, Meyer")
                    .with_area(Measure::from_whole(50))
                    .with_persons(2)
                    .with_prepayments(Money::from_cents(60000)),
                UnitDistributionData::new("B", "Ben")
                    .with_area(Measure::from_whole(50))
                    .with_persons(2)
                    .with_prepayments(Money::from_cents(40000)),
                UnitDistributionData::vacant("C").with_prepayments(Money::from_cents(20000)),
            ])
            .unwrap();
        draft.run_allocation().unwrap();
        draft
    }

    #[test]
    fn test_draft_export() {
        let export = StatementExport::from_draft(&calculated_draft()).unwrap();

        assert_eq!(export.source, ExportSource::Draft);
        assert_eq!(export.cost_items.len(), 1);
        assert_eq!(export.summary.unit_count, 3);
        assert_eq!(export.summary.total_costs.cents(), 100000);
        assert_eq!(export.summary.total_balance.cents(), 20000);
        assert!(export.report.is_some());
    }

    #[test]
    fn test_export_requires_results() {
        let draft = BillingDraft::new(NaiveDate::from_ymd_opt(2026, 4, 1).unwrap());
        let err = StatementExport::from_draft(&draft).unwrap_err();
        assert_eq!(err.issues(), &[ValidationIssue::NoResults]);
    }

    #[test]
    fn test_json_read_back() {
        let export = StatementExport::from_draft(&calculated_draft()).unwrap();
        let mut buffer = Vec::new();
        export_statement_json(&export, &mut buffer).unwrap();

        let json = String::from_utf8(buffer).unwrap();
        assert!(json.contains("\"source\": \"draft\""));

        let read = read_statement_json(&json).unwrap();
        assert_eq!(read.results, export.results);
    }

    #[test]
    fn test_record_export() {
        let draft = calculated_draft();
        let record = draft.to_statement(StatementId::new()).unwrap();
        let export = StatementExport::from_record(&record);

        assert_eq!(export.source, ExportSource::Committed);
        assert_eq!(export.statement_id, Some(record.id));
        assert!(export.report.is_none());
    }

    #[test]
    fn test_rejects_foreign_schema() {
        let mut export = StatementExport::from_draft(&calculated_draft()).unwrap();
        export.schema_version = "2.0.0".into();
        let json = serde_json::to_string(&export).unwrap();

        assert!(read_statement_json(&json).is_err());
    }
}

//! Committed statement storage
//!
//! One JSON file per statement under data/statements/. Records are written
//! once and never edited.

use std::path::PathBuf;

use tracing::info;

use crate::error::{CostshareError, CostshareResult};
use crate::models::{StatementId, StatementRecord};

use super::file_io::{list_json_files, read_json_required, write_json_atomic};

/// Repository for committed statements
pub struct StatementStore {
    dir: PathBuf,
}

impl StatementStore {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    fn file_for(&self, id: StatementId) -> PathBuf {
        self.dir.join(format!("{}.json", id.as_uuid()))
    }

    /// Persist a new record; an existing ID is refused
    pub fn insert(&self, record: &StatementRecord) -> CostshareResult<()> {
        let path = self.file_for(record.id);
        if path.exists() {
            return Err(CostshareError::Duplicate {
                entity_type: "Statement",
                identifier: record.id.to_string(),
            });
        }

        write_json_atomic(&path, record)?;
        info!(statement = %record.id, building = %record.building, "statement committed");
        Ok(())
    }

    /// All records, oldest commit first
    pub fn list(&self) -> CostshareResult<Vec<StatementRecord>> {
        let mut records = list_json_files(&self.dir)?
            .into_iter()
            .map(read_json_required::<StatementRecord, _>)
            .collect::<CostshareResult<Vec<_>>>()?;
        records.sort_by_key(|record| record.committed_at);
        Ok(records)
    }

    /// Find a record by full ID, display ID, or ID prefix
    pub fn get(&self, reference: &str) -> CostshareResult<StatementRecord> {
        if let Ok(id) = StatementId::parse(reference) {
            let path = self.file_for(id);
            if path.exists() {
                return read_json_required(path);
            }
        }

        let mut matches: Vec<_> = self
            .list()?
            .into_iter()
            .filter(|record| record.id.matches(reference))
            .collect();

        match matches.len() {
            0 => Err(CostshareError::statement_not_found(reference)),
            1 => Ok(matches.remove(0)),
            n => Err(CostshareError::Validation(format!(
                "'{}' matches {} statements; use a longer ID",
                reference, n
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{BillingPeriod, BuildingRef, Money};
    use chrono::{Duration, Utc};
    use tempfile::TempDir;

    fn record(offset_minutes: i64) -> StatementRecord {
        StatementRecord {
            id: StatementId::new(),
            building: BuildingRef::new("Ringstraße 12"),
            period: BillingPeriod::calendar_year(2025).unwrap(),
            vacancy_costs_to_landlord: true,
            total_costs: Money::from_cents(120000),
            cost_items: Vec::new(),
            units: Vec::new(),
            results: Vec::new(),
            committed_at: Utc::now() + Duration::minutes(offset_minutes),
        }
    }

    #[test]
    fn test_insert_and_list_in_commit_order() {
        let temp_dir = TempDir::new().unwrap();
        let store = StatementStore::new(temp_dir.path().join("statements"));

        let later = record(10);
        let earlier = record(0);
        store.insert(&later).unwrap();
        store.insert(&earlier).unwrap();

        let listed = store.list().unwrap();
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0].id, earlier.id);
        assert_eq!(listed[1].id, later.id);
    }

    #[test]
    fn test_insert_refuses_overwrite() {
        let temp_dir = TempDir::new().unwrap();
        let store = StatementStore::new(temp_dir.path().to_path_buf());
        let rec = record(0);

        store.insert(&rec).unwrap();
        assert!(matches!(
            store.insert(&rec),
            Err(CostshareError::Duplicate { .. })
        ));
    }

    #[test]
    fn test_get_by_reference() {
        let temp_dir = TempDir::new().unwrap();
        let store = StatementStore::new(temp_dir.path().to_path_buf());
        let rec = record(0);
        store.insert(&rec).unwrap();

        assert_eq!(store.get(&rec.id.as_uuid().to_string()).unwrap().id, rec.id);
        assert_eq!(store.get(&rec.id.to_string()).unwrap().id, rec.id);
        assert!(store.get("stm-zzzzzzzz").unwrap_err().is_not_found());
    }

    #[test]
    fn test_empty_store() {
        let temp_dir = TempDir::new().unwrap();
        let store = StatementStore::new(temp_dir.path().join("missing"));
        assert!(store.list().unwrap().is_empty());
    }
}

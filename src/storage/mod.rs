//! Storage layer for costshare
//!
//! JSON file storage with atomic writes: one draft slot plus the committed
//! statement archive.

pub mod draft;
pub mod file_io;
pub mod statements;

pub use draft::{DraftStore, JsonDraftStore, MemoryDraftStore};
pub use file_io::{read_json_optional, read_json_required, write_json_atomic};
pub use statements::StatementStore;

use chrono::NaiveDate;
use serde::Serialize;

use crate::audit::{AuditEntry, AuditLogger, EntityType, Operation};
use crate::config::{paths::CostsharePaths, settings::Settings};
use crate::error::CostshareError;
use crate::wizard::BillingDraft;

/// Storage coordinator giving access to the draft and statement stores
pub struct Storage {
    paths: CostsharePaths,
    pub draft: JsonDraftStore,
    pub statements: StatementStore,
    audit: AuditLogger,
}

impl Storage {
    pub fn new(paths: CostsharePaths) -> Result<Self, CostshareError> {
        paths.ensure_directories()?;

        Ok(Self {
            draft: JsonDraftStore::new(paths.draft_file()),
            statements: StatementStore::new(paths.statements_dir()),
            audit: AuditLogger::new(paths.audit_log()),
            paths,
        })
    }

    pub fn paths(&self) -> &CostsharePaths {
        &self.paths
    }

    /// The stored draft, or a fresh one built from the settings
    pub fn load_draft_or_new(
        &self,
        settings: &Settings,
        today: NaiveDate,
    ) -> Result<BillingDraft, CostshareError> {
        Ok(self
            .draft
            .load()?
            .unwrap_or_else(|| BillingDraft::with_options(today, settings.draft_options())))
    }

    pub fn is_initialized(&self) -> bool {
        self.paths.is_initialized()
    }

    pub fn audit(&self) -> &AuditLogger {
        &self.audit
    }

    pub fn log_create<T: Serialize>(
        &self,
        entity_type: EntityType,
        entity_id: impl Into<String>,
        entity_name: Option<String>,
        entity: &T,
    ) -> Result<(), CostshareError> {
        self.audit
            .log(&AuditEntry::create(entity_type, entity_id, entity_name, entity))
    }

    /// Log an update; nothing is written when the two states are equal
    pub fn log_update<T: Serialize>(
        &self,
        entity_type: EntityType,
        entity_id: impl Into<String>,
        entity_name: Option<String>,
        before: &T,
        after: &T,
    ) -> Result<(), CostshareError> {
        let entry = AuditEntry::update(entity_type, entity_id, entity_name, before, after);
        if entry.diff_summary.is_none() {
            return Ok(());
        }
        self.audit.log(&entry)
    }

    pub fn log_delete<T: Serialize>(
        &self,
        entity_type: EntityType,
        entity_id: impl Into<String>,
        entity_name: Option<String>,
        entity: &T,
    ) -> Result<(), CostshareError> {
        self.audit
            .log(&AuditEntry::delete(entity_type, entity_id, entity_name, entity))
    }

    pub fn log_event(
        &self,
        operation: Operation,
        entity_type: EntityType,
        entity_id: impl Into<String>,
        summary: impl Into<String>,
    ) -> Result<(), CostshareError> {
        self.audit
            .log(&AuditEntry::event(operation, entity_type, entity_id, summary))
    }
}

/// First-run setup: directories plus a default config file
pub fn initialize_storage(paths: &CostsharePaths) -> Result<Settings, CostshareError> {
    paths.ensure_directories()?;

    let settings = Settings::load_or_create(paths)?;
    if !paths.settings_file().exists() {
        settings.save(paths)?;
    }
    Ok(settings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_storage_creation() {
        let temp_dir = TempDir::new().unwrap();
        let paths = CostsharePaths::with_base_dir(temp_dir.path().to_path_buf());
        let storage = Storage::new(paths).unwrap();

        assert!(temp_dir.path().join("data").join("statements").exists());
        assert!(!storage.is_initialized());
    }

    #[test]
    fn test_unchanged_update_not_logged() {
        let temp_dir = TempDir::new().unwrap();
        let paths = CostsharePaths::with_base_dir(temp_dir.path().to_path_buf());
        let storage = Storage::new(paths).unwrap();
        let state = serde_json::json!({"persons": 2});

        storage
            .log_update(EntityType::Unit, "unit-1", None, &state, &state)
            .unwrap();
        storage
            .log_update(
                EntityType::Unit,
                "unit-1",
                None,
                &state,
                &serde_json::json!({"persons": 3}),
            )
            .unwrap();

        let entries = storage.audit().read_all().unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].diff_summary.as_deref(), Some("persons: 2 -> 3"));
    }

    #[test]
    fn test_initialize_storage_is_idempotent() {
        let temp_dir = TempDir::new().unwrap();
        let paths = CostsharePaths::with_base_dir(temp_dir.path().to_path_buf());

        let mut settings = initialize_storage(&paths).unwrap();
        assert!(paths.is_initialized());

        settings.currency_symbol = "EUR".into();
        settings.save(&paths).unwrap();
        let again = initialize_storage(&paths).unwrap();
        assert_eq!(again.currency_symbol, "EUR");
    }

    #[test]
    fn test_fresh_draft_uses_settings() {
        let temp_dir = TempDir::new().unwrap();
        let paths = CostsharePaths::with_base_dir(temp_dir.path().to_path_buf());
        let storage = Storage::new(paths).unwrap();
        let settings = Settings {
            vacancy_costs_to_landlord: false,
            ..Settings::default()
        };
        let today = NaiveDate::from_ymd_opt(2026, 5, 1).unwrap();

        let draft = storage.load_draft_or_new(&settings, today).unwrap();
        assert!(!draft.vacancy_costs_to_landlord());
        assert_eq!(draft.period().unwrap().start.to_string(), "2025-01-01");
    }
}

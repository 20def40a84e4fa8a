//! Statement service
//!
//! Read access to committed statements and export of either a committed
//! statement or the draft's current results.

use crate::error::{CostshareError, CostshareResult};
use crate::export::StatementExport;
use crate::models::StatementRecord;
use crate::storage::{DraftStore, Storage};
use crate::wizard::ValidationIssue;

pub struct StatementService<'a> {
    storage: &'a Storage,
}

impl<'a> StatementService<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// All committed statements, oldest first
    pub fn list(&self) -> CostshareResult<Vec<StatementRecord>> {
        self.storage.statements.list()
    }

    /// Find a statement by full ID or unique ID prefix
    pub fn get(&self, reference: &str) -> CostshareResult<StatementRecord> {
        self.storage.statements.get(reference)
    }

    /// Build an export document
    ///
    /// With a reference the committed statement is exported, otherwise the
    /// stored draft's results, which must have been calculated.
    pub fn export(&self, reference: Option<&str>) -> CostshareResult<StatementExport> {
        match reference {
            Some(reference) => Ok(StatementExport::from_record(&self.get(reference)?)),
            None => match self.storage.draft.load()? {
                Some(draft) => StatementExport::from_draft(&draft),
                None => Err(CostshareError::NotReady(vec![ValidationIssue::NoResults])),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CostsharePaths;
    use crate::export::json::tests::calculated_draft;
    use crate::export::ExportSource;
    use crate::models::StatementId;
    use tempfile::TempDir;

    fn setup() -> (TempDir, Storage) {
        let temp_dir = TempDir::new().unwrap();
        let paths = CostsharePaths::with_base_dir(temp_dir.path().to_path_buf());
        let storage = Storage::new(paths).unwrap();
        (temp_dir, storage)
    }

    #[test]
    fn test_export_without_draft() {
        let (_temp, storage) = setup();
        let service = StatementService::new(&storage);

        let err = service.export(None).unwrap_err();
        assert_eq!(err.issues(), &[ValidationIssue::NoResults]);
    }

    #[test]
    fn test_export_draft_and_committed() {
        let (_temp, storage) = setup();
        let draft = calculated_draft();
        storage.draft.save(&draft).unwrap();
        let record = draft.to_statement(StatementId::new()).unwrap();
        storage.statements.insert(&record).unwrap();

        let service = StatementService::new(&storage);
        assert_eq!(service.export(None).unwrap().source, ExportSource::Draft);

        let committed = service.export(Some(&record.id.to_string())).unwrap();
        assert_eq!(committed.source, ExportSource::Committed);
        assert_eq!(committed.statement_id, Some(record.id));
        assert_eq!(service.list().unwrap().len(), 1);
    }
}

//! Draft persistence
//!
//! There is exactly one draft slot. Saving replaces the whole draft, so the
//! last writer wins.

use std::path::PathBuf;
use std::sync::RwLock;

use tracing::debug;

use crate::error::{CostshareError, CostshareResult};
use crate::wizard::{BillingDraft, DRAFT_SCHEMA_VERSION};

use super::file_io::{read_json_optional, remove_if_exists, write_json_atomic};

/// Storage for the single active draft
pub trait DraftStore {
    /// The stored draft, if one exists
    fn load(&self) -> CostshareResult<Option<BillingDraft>>;

    /// Replace the stored draft
    fn save(&self, draft: &BillingDraft) -> CostshareResult<()>;

    /// Delete the stored draft
    fn clear(&self) -> CostshareResult<()>;
}

/// Draft kept in a JSON file (data/draft.json)
pub struct JsonDraftStore {
    path: PathBuf,
}

impl JsonDraftStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &PathBuf {
        &self.path
    }
}

impl DraftStore for JsonDraftStore {
    fn load(&self) -> CostshareResult<Option<BillingDraft>> {
        let draft: Option<BillingDraft> = read_json_optional(&self.path)?;
        if let Some(draft) = &draft {
            if draft.schema_version() > DRAFT_SCHEMA_VERSION {
                return Err(CostshareError::Storage(format!(
                    "Draft schema version {} is newer than supported version {}",
                    draft.schema_version(),
                    DRAFT_SCHEMA_VERSION
                )));
            }
        }
        Ok(draft)
    }

    fn save(&self, draft: &BillingDraft) -> CostshareResult<()> {
        debug!(path = %self.path.display(), "saving draft");
        write_json_atomic(&self.path, draft)
    }

    fn clear(&self) -> CostshareResult<()> {
        remove_if_exists(&self.path)?;
        Ok(())
    }
}

/// In-memory draft slot, for tests and embedding
#[derive(Default)]
pub struct MemoryDraftStore {
    slot: RwLock<Option<BillingDraft>>,
}

impl MemoryDraftStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl DraftStore for MemoryDraftStore {
    fn load(&self) -> CostshareResult<Option<BillingDraft>> {
        let slot = self.slot.read().map_err(|e| {
            CostshareError::Storage(format!("Failed to acquire read lock: {}", e))
        })?;
        Ok(slot.clone())
    }

    fn save(&self, draft: &BillingDraft) -> CostshareResult<()> {
        let mut slot = self.slot.write().map_err(|e| {
            CostshareError::Storage(format!("Failed to acquire write lock: {}", e))
        })?;
        *slot = Some(draft.clone());
        Ok(())
    }

    fn clear(&self) -> CostshareResult<()> {
        let mut slot = self.slot.write().map_err(|e| {
            CostshareError::Storage(format!("Failed to acquire write lock: {}", e))
        })?;
        *slot = None;
        Ok(())
    }
}

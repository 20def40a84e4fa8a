//! Unit data import
//!
//! Reads unit distribution data from CSV or JSON files and merges it into
//! the working unit list. Existing units keep their IDs when a row names
//! them by `unit_id` or by unit number.

pub mod csv;
pub mod json;

use std::fs::File;
use std::path::Path;

use tracing::debug;

use crate::error::{CostshareError, CostshareResult};
use crate::models::{UnitDistributionData, UnitId};

/// One successfully parsed row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportedRow {
    pub unit: UnitDistributionData,
    /// The ID given in the file, if any
    pub explicit_id: Option<UnitId>,
}

/// Parse result: good rows plus per-row errors as (line or entry, message)
#[derive(Debug, Clone, Default)]
pub struct UnitImport {
    pub rows: Vec<ImportedRow>,
    pub errors: Vec<(usize, String)>,
}

impl UnitImport {
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Build the new unit list, reusing IDs of matching existing units
    ///
    /// A row with an explicit ID keeps it. Otherwise a unit with the same
    /// unit number (case-insensitive) lends its ID. Remaining rows get new
    /// IDs.
    pub fn merge_with(self, existing: &[UnitDistributionData]) -> Vec<UnitDistributionData> {
        self.rows
            .into_iter()
            .map(|row| {
                let mut unit = row.unit;
                unit.unit_id = row.explicit_id.unwrap_or_else(|| {
                    existing
                        .iter()
                        .find(|e| e.unit_number.eq_ignore_ascii_case(&unit.unit_number))
                        .map(|e| e.unit_id)
                        .unwrap_or(unit.unit_id)
                });
                unit
            })
            .collect()
    }
}

/// Supported import formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportFormat {
    Csv,
    Json,
}

impl ImportFormat {
    /// Pick the format from the file extension
    pub fn from_path(path: &Path) -> CostshareResult<Self> {
        match path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_lowercase())
            .as_deref()
        {
            Some("csv") | Some("txt") => Ok(Self::Csv),
            Some("json") => Ok(Self::Json),
            _ => Err(CostshareError::Import(format!(
                "Cannot tell the format of {}; use a .csv or .json file",
                path.display()
            ))),
        }
    }
}

/// Read and parse a unit file
pub fn import_units_file(path: &Path) -> CostshareResult<UnitImport> {
    let format = ImportFormat::from_path(path)?;
    let file = File::open(path).map_err(|e| {
        CostshareError::Import(format!("Failed to open {}: {}", path.display(), e))
    })?;

    let import = match format {
        ImportFormat::Csv => csv::parse_units(file)?,
        ImportFormat::Json => json::parse_units(file)?,
    };

    debug!(
        path = %path.display(),
        rows = import.rows.len(),
        errors = import.errors.len(),
        "parsed unit import"
    );
    Ok(import)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_merge_keeps_existing_ids() {
        let existing = vec![
            UnitDistributionData::new("A", "Anna"),
            UnitDistributionData::new("B", "Ben"),
        ];
        let explicit = UnitId::new();
        let import = UnitImport {
            rows: vec![
                ImportedRow {
                    unit: UnitDistributionData::new("a", "Anna K."),
                    explicit_id: None,
                },
                ImportedRow {
                    unit: UnitDistributionData::new("B", "Ben"),
                    explicit_id: Some(explicit),
                },
                ImportedRow {
                    unit: UnitDistributionData::new("C", "Cem"),
                    explicit_id: None,
                },
            ],
            errors: Vec::new(),
        };

        let merged = import.merge_with(&existing);
        assert_eq!(merged[0].unit_id, existing[0].unit_id);
        assert_eq!(merged[0].tenant_name, "Anna K.");
        assert_eq!(merged[1].unit_id, explicit);
        assert!(existing.iter().all(|e| e.unit_id != merged[2].unit_id));
    }

    #[test]
    fn test_import_file_by_extension() {
        let temp_dir = TempDir::new().unwrap();
        let csv_path = temp_dir.path().join("units.CSV");
        std::fs::write(&csv_path, "unit_number,area\nA,50\n").unwrap();
        let json_path = temp_dir.path().join("units.json");
        std::fs::write(&json_path, r#"[{"unit_number": "A"}]"#).unwrap();

        assert_eq!(import_units_file(&csv_path).unwrap().rows.len(), 1);
        assert_eq!(import_units_file(&json_path).unwrap().rows.len(), 1);
        assert!(import_units_file(&temp_dir.path().join("units.xlsx")).is_err());
    }
}

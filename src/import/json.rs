//! Unit data import from JSON
//!
//! Expects an array of unit objects in the stored draft format. `unit_id`
//! may be left out; measures are hundredths and money is cents.

use std::io::Read;

use serde::Deserialize;

use crate::error::{CostshareError, CostshareResult};
use crate::models::{Measure, Money, TenantId, UnitDistributionData, UnitId};

use super::{ImportedRow, UnitImport};

#[derive(Debug, Deserialize)]
struct JsonUnit {
    #[serde(default)]
    unit_id: Option<UnitId>,
    unit_number: String,
    #[serde(default)]
    tenant_name: String,
    #[serde(default)]
    tenant_id: Option<TenantId>,
    #[serde(default)]
    area: Measure,
    #[serde(default)]
    persons: u32,
    #[serde(default)]
    heating_share: Measure,
    #[serde(default)]
    prepayments: Money,
    #[serde(default)]
    is_vacant: bool,
}

pub fn parse_units<R: Read>(reader: R) -> CostshareResult<UnitImport> {
    let records: Vec<JsonUnit> = serde_json::from_reader(reader)
        .map_err(|e| CostshareError::Import(format!("Invalid unit JSON: {}", e)))?;

    let mut import = UnitImport::default();
    for (idx, record) in records.into_iter().enumerate() {
        let unit = UnitDistributionData {
            unit_id: record.unit_id.unwrap_or_default(),
            unit_number: record.unit_number,
            tenant_name: record.tenant_name,
            tenant_id: record.tenant_id,
            area: record.area,
            persons: record.persons,
            heating_share: record.heating_share,
            prepayments: record.prepayments,
            is_vacant: record.is_vacant,
        };

        match unit.validate() {
            Ok(()) => import.rows.push(ImportedRow {
                unit,
                explicit_id: record.unit_id,
            }),
            // Entries are numbered from 1
            Err(e) => import.errors.push((idx + 1, e.to_string())),
        }
    }

    Ok(import)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_json_units() {
        let data = r#"[
            {"unit_number": "A", "tenant_name": "Anna", "area": 5000, "persons": 2, "prepayments": 60000},
            {"unit_number": "C", "is_vacant": true, "prepayments": 20000}
        ]"#;

        let import = parse_units(data.as_bytes()).unwrap();
        assert!(import.errors.is_empty());
        assert_eq!(import.rows[0].unit.area.hundredths(), 5000);
        assert!(import.rows[0].explicit_id.is_none());
        assert!(import.rows[1].unit.is_vacant);
    }

    #[test]
    fn test_invalid_entries_reported() {
        let data = r#"[{"unit_number": ""}, {"unit_number": "B", "prepayments": -1}]"#;

        let import = parse_units(data.as_bytes()).unwrap();
        assert!(import.rows.is_empty());
        assert_eq!(import.errors.len(), 2);
        assert_eq!(import.errors[1].0, 2);
    }

    #[test]
    fn test_malformed_json() {
        assert!(parse_units("{not json".as_bytes()).is_err());
    }
}

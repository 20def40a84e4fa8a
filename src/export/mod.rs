//! Export module for costshare
//!
//! - CSV: per-unit results or per-item breakdown (spreadsheet-compatible)
//! - JSON: machine-readable statement document
//! - YAML: the same document, human-readable

pub mod csv;
pub mod json;
pub mod yaml;

pub use self::csv::{export_breakdown_csv, export_results_csv};
pub use json::{
    export_statement_json, read_statement_json, ExportSource, ExportSummary, StatementExport,
    EXPORT_SCHEMA_VERSION,
};
pub use yaml::{export_statement_yaml, read_statement_yaml};

use std::io::Write;

use crate::error::CostshareResult;

/// Export formats offered by the CLI
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Csv,
    Json,
    Yaml,
}

impl ExportFormat {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "csv" => Some(Self::Csv),
            "json" => Some(Self::Json),
            "yaml" | "yml" => Some(Self::Yaml),
            _ => None,
        }
    }
}

/// Write a statement export in the given format
///
/// `breakdown` switches CSV output to one row per unit and cost item; the
/// JSON and YAML documents always carry the full breakdown.
pub fn write_export<W: Write>(
    export: &StatementExport,
    format: ExportFormat,
    breakdown: bool,
    writer: &mut W,
) -> CostshareResult<()> {
    match format {
        ExportFormat::Csv if breakdown => export_breakdown_csv(&export.results, writer),
        ExportFormat::Csv => export_results_csv(&export.results, writer),
        ExportFormat::Json => export_statement_json(export, writer),
        ExportFormat::Yaml => export_statement_yaml(export, writer),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::json::tests::calculated_draft;

    #[test]
    fn test_format_parse() {
        assert_eq!(ExportFormat::parse("YML"), Some(ExportFormat::Yaml));
        assert_eq!(ExportFormat::parse(" csv "), Some(ExportFormat::Csv));
        assert_eq!(ExportFormat::parse("pdf"), None);
    }

    #[test]
    fn test_write_export_dispatch() {
        let export = StatementExport::from_draft(&calculated_draft()).unwrap();

        let mut csv_out = Vec::new();
        write_export(&export, ExportFormat::Csv, false, &mut csv_out).unwrap();
        assert!(String::from_utf8(csv_out).unwrap().starts_with("unit_id,"));

        let mut breakdown = Vec::new();
        write_export(&export, ExportFormat::Csv, true, &mut breakdown).unwrap();
        assert!(String::from_utf8(breakdown).unwrap().starts_with("unit_number,"));

        let mut yaml = Vec::new();
        write_export(&export, ExportFormat::Yaml, false, &mut yaml).unwrap();
        assert!(String::from_utf8(yaml).unwrap().starts_with("# Operating-cost statement"));
    }
}

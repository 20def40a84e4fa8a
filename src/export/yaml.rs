//! YAML export of calculated statements

use std::io::Write;

use crate::error::{CostshareError, CostshareResult};
use crate::export::json::StatementExport;

pub fn export_statement_yaml<W: Write>(
    export: &StatementExport,
    writer: &mut W,
) -> CostshareResult<()> {
    let header = match &export.building {
        Some(building) => format!("# Operating-cost statement: {}", building),
        None => "# Operating-cost statement".to_string(),
    };
    writeln!(writer, "{}", header).map_err(|e| CostshareError::Export(e.to_string()))?;
    if let Some(period) = &export.period {
        writeln!(writer, "# Period: {}", period)
            .map_err(|e| CostshareError::Export(e.to_string()))?;
    }
    writeln!(writer, "# Generated: {}", export.exported_at)
        .map_err(|e| CostshareError::Export(e.to_string()))?;
    writeln!(writer).map_err(|e| CostshareError::Export(e.to_string()))?;

    serde_yaml::to_writer(writer, export).map_err(|e| CostshareError::Export(e.to_string()))
}

/// Read back a YAML export
pub fn read_statement_yaml(yaml_str: &str) -> CostshareResult<StatementExport> {
    let export: StatementExport =
        serde_yaml::from_str(yaml_str).map_err(|e| CostshareError::Import(e.to_string()))?;
    export.validate().map_err(CostshareError::Import)?;
    Ok(export)
}

//! CSV export of calculation results
//!
//! Two layouts: one row per unit, or one row per unit and cost item with
//! the formula trace. Amounts are plain decimals without a currency symbol
//! so spreadsheets read them as numbers.

use std::io::Write;

use crate::error::{CostshareError, CostshareResult};
use crate::models::{Balance, CalculationResult, Money};

fn decimal(amount: Money) -> String {
    amount.format_with_symbol("")
}

fn balance_label(result: &CalculationResult) -> &'static str {
    match result.balance() {
        Balance::Credit => "credit",
        Balance::Due => "due",
        Balance::Settled => "settled",
    }
}

/// One row per unit
pub fn export_results_csv<W: Write>(
    results: &[CalculationResult],
    writer: &mut W,
) -> CostshareResult<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);

    csv_writer
        .write_record([
            "unit_id",
            "unit_number",
            "tenant_name",
            "cost_share",
            "prepayments",
            "result",
            "balance",
        ])
        .map_err(|e| CostshareError::Export(e.to_string()))?;

    for result in results {
        csv_writer
            .write_record([
                result.unit_id.as_uuid().to_string(),
                result.unit_number.clone(),
                result.tenant_name.clone(),
                decimal(result.cost_share),
                decimal(result.prepayments),
                decimal(result.result),
                balance_label(result).to_string(),
            ])
            .map_err(|e| CostshareError::Export(e.to_string()))?;
    }

    csv_writer
        .flush()
        .map_err(|e| CostshareError::Export(e.to_string()))
}

/// One row per unit and allocated cost item
pub fn export_breakdown_csv<W: Write>(
    results: &[CalculationResult],
    writer: &mut W,
) -> CostshareResult<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);

    csv_writer
        .write_record([
            "unit_number",
            "tenant_name",
            "cost_item",
            "distribution_key",
            "total_amount",
            "share",
            "formula",
        ])
        .map_err(|e| CostshareError::Export(e.to_string()))?;

    for result in results {
        for entry in &result.cost_breakdown {
            csv_writer
                .write_record([
                    result.unit_number.clone(),
                    result.tenant_name.clone(),
                    entry.cost_item_name.clone(),
                    entry.distribution_key.to_string(),
                    decimal(entry.total_amount),
                    decimal(entry.share),
                    entry.formula.clone(),
                ])
                .map_err(|e| CostshareError::Export(e.to_string()))?;
        }
    }

    csv_writer
        .flush()
        .map_err(|e| CostshareError::Export(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::json::tests::calculated_draft;

    #[test]
    fn test_results_csv() {
        let draft = calculated_draft();
        let mut buffer = Vec::new();
        export_results_csv(draft.results(), &mut buffer).unwrap();

        let output = String::from_utf8(buffer).unwrap();
        let lines: Vec<&str> = output.lines().collect();

        assert_eq!(lines.len(), 4);
        assert!(lines[0].starts_with("unit_id,unit_number"));
        assert!(lines[1].ends_with("A,\"Anna, Meyer\",500.00,600.00,100.00,credit"));
        assert!(lines[2].ends_with("B,Ben,500.00,400.00,-100.00,due"));
        assert!(lines[3].ends_with("C,,0.00,200.00,200.00,credit"));
    }

    #[test]
    fn test_breakdown_csv() {
        let draft = calculated_draft();
        let mut buffer = Vec::new();
        export_breakdown_csv(draft.results(), &mut buffer).unwrap();

        let output = String::from_utf8(buffer).unwrap();
        let lines: Vec<&str> = output.lines().collect();

        // Vacant C has no breakdown rows
        assert_eq!(lines.len(), 3);
        assert!(lines[2].starts_with("B,Ben,Heizung,area,1000.00,500.00,"));
        assert!(lines[2].contains("50.00 m² / 100.00 m²"));
    }
}

//! Calculation result display formatting

use crate::allocation::AllocationReport;
use crate::models::{Balance, CalculationResult, Money, StatementRecord};
use crate::wizard::AllocationOutcome;

use super::draft::width;

fn balance_text(result: &CalculationResult, symbol: &str) -> String {
    match result.balance() {
        Balance::Credit => format!("credit {}", result.result.format_with_symbol(symbol)),
        Balance::Due => format!("due {}", result.result.abs().format_with_symbol(symbol)),
        Balance::Settled => "settled".to_string(),
    }
}

/// One line per unit with share, prepayments and balance
pub fn format_results_table(results: &[CalculationResult], symbol: &str) -> String {
    if results.is_empty() {
        return "No results. Run `costshare calculate` first.".to_string();
    }

    let labels: Vec<String> = results
        .iter()
        .map(|r| {
            if r.tenant_name.is_empty() {
                r.unit_number.clone()
            } else {
                format!("{} ({})", r.unit_number, r.tenant_name)
            }
        })
        .collect();
    let label_width = width(labels.iter().map(String::as_str), 4);

    let mut output = String::new();
    output.push_str(&format!(
        "{:<w$}  {:>12}  {:>12}  {}\n",
        "Unit",
        "Cost share",
        "Prepaid",
        "Balance",
        w = label_width,
    ));
    output.push_str(&format!(
        "{:-<w$}  {:->12}  {:->12}  {:-<16}\n",
        "",
        "",
        "",
        "",
        w = label_width,
    ));

    for (label, result) in labels.iter().zip(results) {
        output.push_str(&format!(
            "{:<w$}  {:>12}  {:>12}  {}\n",
            label,
            result.cost_share.format_with_symbol(symbol),
            result.prepayments.format_with_symbol(symbol),
            balance_text(result, symbol),
            w = label_width,
        ));
    }

    let share: Money = results.iter().map(|r| r.cost_share).sum();
    let prepaid: Money = results.iter().map(|r| r.prepayments).sum();
    let balance: Money = results.iter().map(|r| r.result).sum();
    output.push_str(&format!(
        "{:-<w$}  {:->12}  {:->12}  {:-<16}\n",
        "",
        "",
        "",
        "",
        w = label_width,
    ));
    output.push_str(&format!(
        "{:<w$}  {:>12}  {:>12}  {}\n",
        "TOTAL",
        share.format_with_symbol(symbol),
        prepaid.format_with_symbol(symbol),
        balance.format_with_symbol(symbol),
        w = label_width,
    ));

    output
}

/// Per-unit breakdown with formula traces
pub fn format_breakdown(results: &[CalculationResult], symbol: &str) -> String {
    let mut output = String::new();

    for result in results {
        output.push_str(&format!("{}\n", result.unit_number));
        if result.cost_breakdown.is_empty() {
            output.push_str("  (not allocated)\n");
        }
        for entry in &result.cost_breakdown {
            output.push_str(&format!(
                "  {:<24} {:>12}   {}\n",
                entry.cost_item_name,
                entry.share.format_with_symbol(symbol),
                entry.formula
            ));
        }
        output.push_str(&format!(
            "  {:<24} {:>12}\n\n",
            "Cost share",
            result.cost_share.format_with_symbol(symbol)
        ));
    }

    output
}

/// Rounding drift and unallocated items, empty when there is nothing to say
pub fn format_report(report: &AllocationReport, symbol: &str) -> String {
    let mut output = String::new();

    for warning in &report.warnings {
        output.push_str(&format!("Warning: {}\n", warning.message(symbol)));
    }

    let drifting: Vec<_> = report
        .items
        .iter()
        .filter(|item| !item.unallocated && !item.drift.is_zero())
        .collect();
    if !drifting.is_empty() {
        output.push_str("Rounding drift (allocated minus invoiced):\n");
        for item in drifting {
            output.push_str(&format!(
                "  {:<24} {:>10}\n",
                item.cost_item_name,
                item.drift.format_with_symbol(symbol)
            ));
        }
    }

    output
}

/// Totals line shown after `calculate`
pub fn format_outcome_summary(outcome: &AllocationOutcome, symbol: &str) -> String {
    let totals = outcome.totals();
    format!(
        "Allocated {} over {} units: {} credits, {} payments due.",
        totals.total_costs.format_with_symbol(symbol),
        outcome.results.len(),
        totals.credit_count,
        totals.due_count
    )
}

pub fn format_statement_list(records: &[StatementRecord], symbol: &str) -> String {
    if records.is_empty() {
        return "No committed statements.".to_string();
    }

    let building_width = width(records.iter().map(|r| r.building.name.as_str()), 8);

    let mut output = String::new();
    output.push_str(&format!(
        "{:<12}  {:<bw$}  {:<24}  {:>5}  {:>12}  {}\n",
        "ID",
        "Building",
        "Period",
        "Units",
        "Total",
        "Committed",
        bw = building_width,
    ));
    for record in records {
        output.push_str(&format!(
            "{:<12}  {:<bw$}  {:<24}  {:>5}  {:>12}  {}\n",
            record.id.to_string(),
            record.building.name,
            record.period.to_string(),
            record.results.len(),
            record.total_costs.format_with_symbol(symbol),
            record.committed_at.format("%Y-%m-%d %H:%M"),
            bw = building_width,
        ));
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::allocation::AllocationEngine;
    use crate::export::json::tests::calculated_draft;
    use crate::models::{CostItem, DistributionKey, UnitDistributionData};

    #[test]
    fn test_results_table() {
        let draft = calculated_draft();
        let table = format_results_table(draft.results(), "€");

        assert!(table.contains("A (Anna, Meyer)"));
        assert!(table.contains("credit €100.00"));
        assert!(table.contains("due €100.00"));
        assert!(table.contains("TOTAL"));
        assert!(table.trim_end().ends_with("€200.00"));
    }

    #[test]
    fn test_breakdown_shows_formulas() {
        let draft = calculated_draft();
        let text = format_breakdown(draft.results(), "€");

        assert!(text.contains("1000.00 × 50.00 m² / 100.00 m²"));
        assert!(text.contains("C\n  (not allocated)"));
    }

    #[test]
    fn test_configured_symbol_replaces_default() {
        let draft = calculated_draft();
        let results = draft.results();
        let outcome = draft.outcome().unwrap();

        let text = [
            format_results_table(results, "CHF "),
            format_breakdown(results, "CHF "),
            format_outcome_summary(outcome, "CHF "),
        ]
        .concat();

        assert!(!text.contains('€'));
        assert!(text.contains("credit CHF 100.00"));
        assert!(text.contains("Allocated CHF 1000.00"));
    }

    #[test]
    fn test_report_warning_uses_symbol() {
        let units = vec![UnitDistributionData::new("A", "Tenant")];
        let items = vec![CostItem::new(
            "Heizkosten",
            Money::from_cents(50000),
            DistributionKey::Consumption,
        )];
        let allocation = AllocationEngine::new(true).run(&items, &units);

        let report = format_report(&allocation.report, "$");
        assert!(report.contains("'Heizkosten' ($500.00) was not allocated"));
        assert!(!report.contains('€'));
    }

    #[test]
    fn test_clean_report_is_empty() {
        let draft = calculated_draft();
        let report = &draft.outcome().unwrap().report;
        assert!(format_report(report, "€").is_empty());
    }

    #[test]
    fn test_outcome_summary() {
        let draft = calculated_draft();
        let line = format_outcome_summary(draft.outcome().unwrap(), "€");
        assert_eq!(
            line,
            "Allocated €1000.00 over 3 units: 2 credits, 1 payments due."
        );
    }
}

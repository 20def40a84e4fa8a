//! Calculation, results, export and commit commands

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

use crate::config::Settings;
use crate::display::{
    format_breakdown, format_issues, format_outcome_summary, format_period, format_report,
    format_results_table, format_statement_list,
};
use crate::error::{CostshareError, CostshareResult};
use crate::export::{write_export, ExportFormat};
use crate::services::{DraftService, StatementService};
use crate::storage::Storage;

/// Run the allocation on the draft
pub fn handle_calculate(storage: &Storage, settings: &Settings) -> CostshareResult<()> {
    let service = DraftService::new(storage, settings);
    let symbol = settings.currency_symbol.as_str();

    let (_, outcome) = match service.calculate() {
        Ok(calculated) => calculated,
        Err(CostshareError::NotReady(issues)) => {
            eprintln!("{}", format_issues(&issues).trim_end());
            return Err(CostshareError::NotReady(issues));
        }
        Err(e) => return Err(e),
    };

    print!("{}", format_results_table(&outcome.results, symbol));
    println!();
    println!("{}", format_outcome_summary(&outcome, symbol));

    let report = format_report(&outcome.report, symbol);
    if !report.is_empty() {
        println!();
        print!("{}", report);
    }
    Ok(())
}

/// Show the results of the draft or of a committed statement
pub fn handle_results(
    storage: &Storage,
    settings: &Settings,
    statement: Option<String>,
    breakdown: bool,
) -> CostshareResult<()> {
    let symbol = settings.currency_symbol.as_str();

    let results = match statement {
        Some(reference) => StatementService::new(storage).get(&reference)?.results,
        None => DraftService::new(storage, settings)
            .load()?
            .results()
            .to_vec(),
    };

    if breakdown {
        print!("{}", format_breakdown(&results, symbol));
    } else {
        print!("{}", format_results_table(&results, symbol));
    }
    Ok(())
}

/// Export results to a file or stdout
pub fn handle_export(
    storage: &Storage,
    format: &str,
    output: Option<PathBuf>,
    statement: Option<String>,
    breakdown: bool,
) -> CostshareResult<()> {
    let format = ExportFormat::parse(format).ok_or_else(|| {
        CostshareError::Validation(format!(
            "Invalid export format: '{}'. Use csv, json or yaml",
            format
        ))
    })?;
    let export = StatementService::new(storage).export(statement.as_deref())?;

    match output {
        Some(path) => {
            let file = File::create(&path).map_err(|e| {
                CostshareError::Export(format!("Failed to create file {}: {}", path.display(), e))
            })?;
            let mut writer = BufWriter::new(file);
            write_export(&export, format, breakdown, &mut writer)?;
            writer
                .flush()
                .map_err(|e| CostshareError::Export(e.to_string()))?;
            eprintln!(
                "Exported {} units to {}",
                export.summary.unit_count,
                path.display()
            );
        }
        None => {
            let stdout = io::stdout();
            let mut writer = stdout.lock();
            write_export(&export, format, breakdown, &mut writer)?;
        }
    }
    Ok(())
}

/// Commit the calculated draft as a statement
pub fn handle_commit(storage: &Storage, settings: &Settings, keep: bool) -> CostshareResult<()> {
    let service = DraftService::new(storage, settings);

    let record = match service.commit(keep) {
        Ok(record) => record,
        Err(CostshareError::NotReady(issues)) => {
            eprintln!("{}", format_issues(&issues).trim_end());
            return Err(CostshareError::NotReady(issues));
        }
        Err(e) => return Err(e),
    };

    println!("Committed statement {}", record.id);
    println!("  Building: {}", record.building);
    println!(
        "  Period:   {}",
        format_period(&record.period, &settings.date_format)
    );
    println!(
        "  Total:    {}",
        record
            .total_costs
            .format_with_symbol(&settings.currency_symbol)
    );
    if !keep {
        println!("The draft has been cleared.");
    }
    Ok(())
}

pub fn handle_statements(storage: &Storage, settings: &Settings) -> CostshareResult<()> {
    let records = StatementService::new(storage).list()?;
    println!(
        "{}",
        format_statement_list(&records, &settings.currency_symbol).trim_end()
    );
    Ok(())
}

/// Show the most recent audit entries
pub fn handle_audit(storage: &Storage, limit: usize) -> CostshareResult<()> {
    let entries = storage.audit().read_recent(limit)?;
    if entries.is_empty() {
        println!("Audit log is empty.");
        return Ok(());
    }

    for entry in entries {
        println!("{}", entry.format_human_readable());
    }
    Ok(())
}

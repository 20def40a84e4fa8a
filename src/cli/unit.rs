//! Unit CLI commands
//!
//! Units are seeded from a file and then corrected one field at a time.

use std::path::PathBuf;

use clap::Subcommand;

use crate::config::Settings;
use crate::display::format_unit_list;
use crate::error::{CostshareError, CostshareResult};
use crate::models::{Measure, Money, UnitPatch};
use crate::services::DraftService;
use crate::storage::Storage;

/// Unit subcommands
#[derive(Subcommand)]
pub enum UnitCommands {
    /// List the draft's units
    List,
    /// Replace the unit list from a CSV or JSON file
    Import {
        /// Path to the file (.csv or .json)
        file: PathBuf,
    },
    /// Change fields of one unit
    Set {
        /// Unit number or ID
        unit: String,
        /// New unit number
        #[arg(long)]
        number: Option<String>,
        /// Tenant name
        #[arg(short, long)]
        tenant: Option<String>,
        /// Floor area in m² (e.g., "72.5")
        #[arg(short, long)]
        area: Option<String>,
        /// Number of persons
        #[arg(short, long)]
        persons: Option<u32>,
        /// Heating consumption share in percent
        #[arg(long)]
        heating: Option<String>,
        /// Prepayments collected in the period
        #[arg(long)]
        prepayments: Option<String>,
        /// Mark the unit vacant
        #[arg(long, conflicts_with = "occupied")]
        vacant: bool,
        /// Mark the unit occupied
        #[arg(long)]
        occupied: bool,
    },
    /// Remove all units from the draft
    Clear,
}

fn parse_measure(value: &str, field: &str) -> CostshareResult<Measure> {
    Measure::parse(value).map_err(|e| {
        CostshareError::Validation(format!("Invalid {}: '{}'. Error: {}", field, value, e))
    })
}

/// Handle a unit command
pub fn handle_unit_command(
    storage: &Storage,
    settings: &Settings,
    cmd: UnitCommands,
) -> CostshareResult<()> {
    let service = DraftService::new(storage, settings);
    let symbol = settings.currency_symbol.as_str();

    match cmd {
        UnitCommands::List => {
            let draft = service.load()?;
            print!("{}", format_unit_list(draft.units(), symbol));
        }

        UnitCommands::Import { file } => {
            let (draft, import) = service.import_units(&file)?;

            if import.has_errors() {
                for (line, message) in &import.errors {
                    eprintln!("  line {}: {}", line, message);
                }
                return Err(CostshareError::Import(format!(
                    "{} of {} rows failed; nothing was imported",
                    import.errors.len(),
                    import.errors.len() + import.rows.len()
                )));
            }
            if import.rows.is_empty() {
                println!("No units found in {}.", file.display());
                return Ok(());
            }

            println!("Imported {} units from {}", draft.units().len(), file.display());
        }

        UnitCommands::Set {
            unit,
            number,
            tenant,
            area,
            persons,
            heating,
            prepayments,
            vacant,
            occupied,
        } => {
            let patch = UnitPatch {
                unit_number: number,
                tenant_name: tenant,
                area: area.as_deref().map(|a| parse_measure(a, "area")).transpose()?,
                persons,
                heating_share: heating
                    .as_deref()
                    .map(|h| parse_measure(h.trim_end_matches('%'), "heating share"))
                    .transpose()?,
                prepayments: prepayments
                    .as_deref()
                    .map(|p| {
                        Money::parse(p).map_err(|e| {
                            CostshareError::Validation(format!(
                                "Invalid prepayments: '{}'. Error: {}",
                                p, e
                            ))
                        })
                    })
                    .transpose()?,
                is_vacant: match (vacant, occupied) {
                    (true, _) => Some(true),
                    (_, true) => Some(false),
                    _ => None,
                },
            };

            let updated = service.update_unit(&unit, &patch)?;
            println!("Updated unit {}", updated.label());
        }

        UnitCommands::Clear => {
            let removed = service.clear_units()?;
            println!("Removed {} units.", removed);
        }
    }

    Ok(())
}

//! Draft CLI commands
//!
//! Building, period and policy steps of the billing wizard, plus overview
//! and readiness checks.

use clap::Subcommand;

use crate::allocation::RoundingPolicy;
use crate::config::Settings;
use crate::display::{format_draft_summary, format_issues, format_period};
use crate::error::{CostshareError, CostshareResult};
use crate::models::BillingPeriod;
use crate::services::DraftService;
use crate::storage::Storage;
use crate::wizard::WizardStep;

/// Draft subcommands
#[derive(Subcommand)]
pub enum DraftCommands {
    /// Show the draft overview
    Show,
    /// Discard the draft and start over
    Reset,
    /// Select the building the statement is for
    Building {
        /// Building name
        name: String,
    },
    /// Set the billing period
    Period {
        /// A year ("2025") or a date range ("2025-01-01..2025-12-31")
        range: String,
    },
    /// Choose who bears the costs of vacant units
    Vacancy {
        /// "landlord" (vacant units are skipped) or "shared" (vacant units take part)
        policy: String,
    },
    /// Choose how shares are rounded to cents
    Rounding {
        /// per_unit or largest_remainder
        policy: String,
    },
    /// List the issues blocking the calculation
    Check {
        /// Only check one step (setup, costs, units, confirm)
        #[arg(short, long)]
        step: Option<String>,
    },
}

/// Handle a draft command
pub fn handle_draft_command(
    storage: &Storage,
    settings: &Settings,
    cmd: DraftCommands,
) -> CostshareResult<()> {
    let service = DraftService::new(storage, settings);
    let symbol = settings.currency_symbol.as_str();

    match cmd {
        DraftCommands::Show => {
            let draft = service.load()?;
            print!("{}", format_draft_summary(&draft, symbol));
        }

        DraftCommands::Reset => {
            let draft = service.reset()?;
            println!("Draft reset.");
            if let Some(period) = draft.period() {
                println!("  Period: {}", format_period(period, &settings.date_format));
            }
        }

        DraftCommands::Building { name } => {
            let draft = service.select_building(&name)?;
            if let Some(building) = draft.building() {
                println!("Building: {}", building.name);
            }
        }

        DraftCommands::Period { range } => {
            let period = BillingPeriod::parse(&range, settings.max_period_days)
                .map_err(|e| CostshareError::Validation(e.to_string()))?;
            let draft = service.set_period(period.start, period.end)?;
            if let Some(period) = draft.period() {
                println!(
                    "Period: {} ({} days)",
                    format_period(period, &settings.date_format),
                    period.days()
                );
            }
        }

        DraftCommands::Vacancy { policy } => {
            let to_landlord = match policy.trim().to_lowercase().as_str() {
                "landlord" | "vermieter" => true,
                "shared" | "tenants" | "umlage" => false,
                _ => {
                    return Err(CostshareError::Validation(format!(
                        "Invalid vacancy policy: '{}'. Use 'landlord' or 'shared'",
                        policy
                    )))
                }
            };
            service.set_vacancy_policy(to_landlord)?;
            if to_landlord {
                println!("Vacant units are left out; the landlord bears their costs.");
            } else {
                println!("Vacant units take part in the allocation.");
            }
        }

        DraftCommands::Rounding { policy } => {
            let rounding = RoundingPolicy::parse(&policy).ok_or_else(|| {
                CostshareError::Validation(format!(
                    "Invalid rounding policy: '{}'. Use per_unit or largest_remainder",
                    policy
                ))
            })?;
            service.set_rounding_policy(rounding)?;
            println!("Rounding: {}", rounding);
        }

        DraftCommands::Check { step } => {
            let draft = service.load()?;
            let issues = match step {
                Some(step) => {
                    let step = WizardStep::parse(&step).ok_or_else(|| {
                        CostshareError::Validation(format!(
                            "Unknown step: '{}'. Steps: setup, costs, units, confirm",
                            step
                        ))
                    })?;
                    draft.issues_for(step)
                }
                None => draft.readiness(),
            };
            println!("{}", format_issues(&issues).trim_end());
        }
    }

    Ok(())
}

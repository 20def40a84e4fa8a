//! Cost item CLI commands

use clap::Subcommand;

use crate::config::Settings;
use crate::display::format_cost_item_list;
use crate::error::{CostshareError, CostshareResult};
use crate::models::{DistributionKey, Money};
use crate::services::{CostItemChange, DraftService};
use crate::storage::Storage;

/// Cost item subcommands
#[derive(Subcommand)]
pub enum CostCommands {
    /// List cost items
    List {
        /// Include inactive items and items without an amount
        #[arg(short, long)]
        all: bool,
    },
    /// Add a custom cost item
    Add {
        /// Item name
        name: String,
        /// Total amount for the period (e.g., "1234.56")
        amount: String,
        /// Distribution key (area, persons, units, consumption)
        #[arg(short, long, default_value = "area")]
        key: String,
    },
    /// Change a cost item's amount, key or name
    Set {
        /// Item name or ID
        item: String,
        /// New amount
        #[arg(short, long)]
        amount: Option<String>,
        /// New distribution key
        #[arg(short, long)]
        key: Option<String>,
        /// New name
        #[arg(short, long)]
        name: Option<String>,
    },
    /// Remove a custom cost item
    Remove {
        /// Item name or ID
        item: String,
    },
    /// Include a cost item in the allocation
    Enable {
        /// Item name or ID
        item: String,
    },
    /// Exclude a cost item from the allocation
    Disable {
        /// Item name or ID
        item: String,
    },
}

fn parse_amount(amount: &str) -> CostshareResult<Money> {
    Money::parse(amount).map_err(|e| {
        CostshareError::Validation(format!(
            "Invalid amount: '{}'. Use format like '1234.56'. Error: {}",
            amount, e
        ))
    })
}

fn parse_key(key: &str) -> CostshareResult<DistributionKey> {
    DistributionKey::parse(key).ok_or_else(|| {
        CostshareError::Validation(format!(
            "Invalid distribution key: '{}'. Valid keys: area, persons, units, consumption",
            key
        ))
    })
}

/// Handle a cost item command
pub fn handle_cost_command(
    storage: &Storage,
    settings: &Settings,
    cmd: CostCommands,
) -> CostshareResult<()> {
    let service = DraftService::new(storage, settings);
    let symbol = settings.currency_symbol.as_str();

    match cmd {
        CostCommands::List { all } => {
            let draft = service.load()?;
            print!("{}", format_cost_item_list(draft.cost_items(), symbol, all));
        }

        CostCommands::Add { name, amount, key } => {
            let item = service.add_cost_item(&name, parse_amount(&amount)?, parse_key(&key)?)?;
            println!("Added cost item: {}", item.name);
            println!("  Amount: {}", item.amount.format_with_symbol(symbol));
            println!("  Key:    {}", item.distribution_key);
            println!("  ID:     {}", item.id);
        }

        CostCommands::Set {
            item,
            amount,
            key,
            name,
        } => {
            let change = CostItemChange {
                name,
                amount: amount.as_deref().map(parse_amount).transpose()?,
                distribution_key: key.as_deref().map(parse_key).transpose()?,
            };
            if change.name.is_none() && change.amount.is_none() && change.distribution_key.is_none()
            {
                println!("No changes specified. Use --amount, --key or --name.");
                return Ok(());
            }

            let updated = service.update_cost_item(&item, change)?;
            println!(
                "Updated {}: {} by {}",
                updated.name,
                updated.amount.format_with_symbol(symbol),
                updated.distribution_key
            );
        }

        CostCommands::Remove { item } => {
            let removed = service.remove_cost_item(&item)?;
            println!("Removed cost item: {}", removed.name);
        }

        CostCommands::Enable { item } => {
            let updated = service.set_cost_item_active(&item, true)?;
            println!("Enabled: {}", updated.name);
        }

        CostCommands::Disable { item } => {
            let updated = service.set_cost_item_active(&item, false)?;
            println!("Disabled: {}", updated.name);
        }
    }

    Ok(())
}

use anyhow::Result;
use clap::{Parser, Subcommand};

use costshare_cli::cli::{
    handle_audit, handle_calculate, handle_commit, handle_cost_command, handle_draft_command,
    handle_export, handle_results, handle_statements, handle_unit_command, CostCommands,
    DraftCommands, UnitCommands,
};
use costshare_cli::config::{CostsharePaths, Settings};
use costshare_cli::logging;
use costshare_cli::storage::{initialize_storage, Storage};

#[derive(Parser)]
#[command(
    name = "costshare",
    author = "Kaylee Beyene",
    version,
    about = "Operating-cost statements for rental buildings",
    long_about = "costshare splits a building's operating costs across its units by \
                  area, persons, units or metered consumption, and settles each \
                  unit's share against its prepayments."
)]
struct Cli {
    /// Show debug logging on stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the data directory and default configuration
    Init,

    /// Show current configuration and paths
    Config,

    /// Building, period and policy settings of the draft
    #[command(subcommand)]
    Draft(DraftCommands),

    /// Cost item management
    #[command(subcommand)]
    Cost(CostCommands),

    /// Unit data management
    #[command(subcommand)]
    Unit(UnitCommands),

    /// Run the allocation on the draft
    #[command(alias = "calc")]
    Calculate,

    /// Show calculated results
    Results {
        /// Show the per cost item breakdown
        #[arg(short, long)]
        breakdown: bool,
        /// Show a committed statement instead of the draft
        #[arg(short, long)]
        statement: Option<String>,
    },

    /// Export results as csv, json or yaml
    Export {
        /// Export format (csv, json, yaml)
        format: String,
        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<std::path::PathBuf>,
        /// CSV with one row per unit and cost item
        #[arg(short, long)]
        breakdown: bool,
        /// Export a committed statement instead of the draft
        #[arg(short, long)]
        statement: Option<String>,
    },

    /// Commit the calculated draft as a statement
    Commit {
        /// Keep the draft after committing
        #[arg(long)]
        keep: bool,
    },

    /// List committed statements
    Statements,

    /// Show recent audit log entries
    Audit {
        /// Number of entries to show
        #[arg(short, long, default_value = "20")]
        limit: usize,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    // Initialize paths and settings
    let paths = CostsharePaths::new()?;
    let settings = Settings::load_or_create(&paths)?;

    let storage = Storage::new(paths.clone())?;

    match cli.command {
        Some(Commands::Init) => {
            println!("Initializing costshare at: {}", paths.base_dir().display());
            initialize_storage(&paths)?;
            println!("Initialization complete!");
            println!();
            println!("Next steps:");
            println!("  costshare draft building <name>");
            println!("  costshare cost set <item> --amount <amount>");
            println!("  costshare unit import <file>");
            println!("  costshare calculate");
        }
        Some(Commands::Config) => {
            println!("costshare Configuration");
            println!("=======================");
            println!("Base directory:   {}", paths.base_dir().display());
            println!("Settings file:    {}", paths.settings_file().display());
            println!("Draft file:       {}", paths.draft_file().display());
            println!("Statements:       {}", paths.statements_dir().display());
            println!("Audit log:        {}", paths.audit_log().display());
            println!();
            println!("Settings:");
            println!("  Currency symbol:  {}", settings.currency_symbol);
            println!("  Date format:      {}", settings.date_format);
            println!(
                "  Vacancy costs:    {}",
                if settings.vacancy_costs_to_landlord {
                    "landlord"
                } else {
                    "shared"
                }
            );
            println!("  Rounding:         {}", settings.rounding);
            println!("  Max period days:  {}", settings.max_period_days);
        }
        Some(Commands::Draft(cmd)) => handle_draft_command(&storage, &settings, cmd)?,
        Some(Commands::Cost(cmd)) => handle_cost_command(&storage, &settings, cmd)?,
        Some(Commands::Unit(cmd)) => handle_unit_command(&storage, &settings, cmd)?,
        Some(Commands::Calculate) => handle_calculate(&storage, &settings)?,
        Some(Commands::Results {
            breakdown,
            statement,
        }) => handle_results(&storage, &settings, statement, breakdown)?,
        Some(Commands::Export {
            format,
            output,
            breakdown,
            statement,
        }) => handle_export(&storage, &format, output, statement, breakdown)?,
        Some(Commands::Commit { keep }) => handle_commit(&storage, &settings, keep)?,
        Some(Commands::Statements) => handle_statements(&storage, &settings)?,
        Some(Commands::Audit { limit }) => handle_audit(&storage, limit)?,
        None => {
            println!("costshare - operating-cost statements for rental buildings");
            println!();
            println!("Run 'costshare --help' for usage information.");
        }
    }

    Ok(())
}

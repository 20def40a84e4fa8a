//! CLI command handlers
//!
//! Bridges the clap argument parsing with the service layer. Handlers print
//! to stdout and return errors for `main` to report.

pub mod cost;
pub mod draft;
pub mod statement;
pub mod unit;

pub use cost::{handle_cost_command, CostCommands};
pub use draft::{handle_draft_command, DraftCommands};
pub use statement::{
    handle_audit, handle_calculate, handle_commit, handle_export, handle_results,
    handle_statements,
};
pub use unit::{handle_unit_command, UnitCommands};

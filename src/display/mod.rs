//! Display formatting for terminal output
//!
//! Every formatter returns a `String`; printing is left to the CLI.

pub mod draft;
pub mod results;

pub use draft::{
    format_cost_item_list, format_draft_summary, format_issues, format_period, format_unit_list,
};
pub use results::{
    format_breakdown, format_outcome_summary, format_report, format_results_table,
    format_statement_list,
};

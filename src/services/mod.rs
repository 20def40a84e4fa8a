//! Service layer for costshare
//!
//! Services sit between the CLI and storage: they load the draft, apply a
//! change, persist it, and write the audit trail.

pub mod draft;
pub mod statement;

pub use draft::{CostItemChange, DraftService};
pub use statement::StatementService;

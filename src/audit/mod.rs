//! Audit log of draft mutations
//!
//! Every change the CLI makes to the draft, each allocation run and each
//! commit is appended to `audit.log` with before/after values.
//!
//! - `AuditEntry`: one logged operation
//! - `AuditLogger`: JSONL append and read-back
//! - `generate_diff`: readable summary of what changed between two states

mod diff;
mod entry;
mod logger;

pub use diff::generate_diff;
pub use entry::{AuditEntry, EntityType, Operation};
pub use logger::AuditLogger;

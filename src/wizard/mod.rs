//! Billing wizard state
//!
//! The draft accumulates engine inputs across the wizard steps, enforces
//! step completeness before allocation may run, and caches the last
//! results until an input changes.

pub mod draft;
pub mod validation;

pub use draft::{AllocationOutcome, BillingDraft, DraftOptions, DraftTotals, DRAFT_SCHEMA_VERSION};
pub use validation::{issues_for, readiness, ValidationIssue, WizardStep};

//! Operating-cost allocation
//!
//! Pure computation: cost items and unit data in, per-unit calculation
//! results out. Nothing in this module performs I/O.
//!
//! - `rounding`: integer proration and the rounding policies
//! - `formula`: one weight/denominator rule per distribution key
//! - `engine`: composes the formulas across cost items and units

pub mod engine;
pub mod formula;
pub mod rounding;

pub use engine::{
    allocate, Allocation, AllocationEngine, AllocationReport, AllocationWarning, CostItemAudit,
};
pub use formula::Denominators;
pub use rounding::RoundingPolicy;

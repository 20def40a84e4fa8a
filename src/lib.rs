//! costshare - operating-cost statements for rental buildings
//!
//! This library splits a building's shared operating costs (property tax,
//! water, heating, cleaning, ...) across its rental units by a distribution
//! key per cost item, and settles each unit's share against the advance
//! payments it made during the billing period.
//!
//! # Architecture
//!
//! The crate is organized into the following modules:
//!
//! - `models`: Core data (money, measures, cost items, units, periods, results)
//! - `allocation`: Distribution formulas, rounding, and the allocation engine
//! - `wizard`: The billing draft and its step validation
//! - `storage`: JSON file storage for the draft and committed statements
//! - `config`: Configuration and path management
//! - `audit`: Audit logging of draft changes
//! - `import` / `export`: Unit data in, results out
//! - `services`: Load, change, save, audit
//! - `display` / `cli`: Terminal front end
//! - `logging`: Diagnostic log setup
//! - `error`: Custom error types
//!
//! # Example
//!
//! ```rust,ignore
//! use costshare_cli::models::{CostItem, DistributionKey, Money, UnitDistributionData};
//!
//! let items = vec![CostItem::new("Grundsteuer", Money::from_cents(120000), DistributionKey::Units)];
//! let units = vec![UnitDistributionData::new("EG", "Meyer"), UnitDistributionData::new("OG", "Kaya")];
//! let results = costshare_cli::allocation::allocate(&items, &units, true);
//! ```

pub mod allocation;
pub mod audit;
pub mod cli;
pub mod config;
pub mod display;
pub mod error;
pub mod export;
pub mod import;
pub mod logging;
pub mod models;
pub mod services;
pub mod storage;
pub mod wizard;

pub use error::{CostshareError, CostshareResult};

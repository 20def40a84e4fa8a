//! Core data models for costshare
//!
//! This module contains the plain data the allocation engine consumes and
//! produces: cost items, unit distribution data, billing periods, and
//! calculation results.

pub mod cost_item;
pub mod ids;
pub mod measure;
pub mod money;
pub mod period;
pub mod result;
pub mod statement;
pub mod unit;

pub use cost_item::{default_cost_items, CostItem, DistributionKey};
pub use ids::{BuildingId, CostItemId, StatementId, TenantId, UnitId};
pub use measure::Measure;
pub use money::Money;
pub use period::{BillingPeriod, PeriodError, MAX_PERIOD_DAYS};
pub use result::{Balance, CalculationResult, CostBreakdownEntry};
pub use statement::{BuildingRef, StatementRecord};
pub use unit::{UnitDistributionData, UnitPatch};

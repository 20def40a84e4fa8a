//! Custom error types for costshare
//!
//! This module defines the error hierarchy for the application using thiserror
//! for ergonomic error definitions.

use thiserror::Error;

use crate::wizard::ValidationIssue;

/// The main error type for costshare operations
#[derive(Error, Debug)]
pub enum CostshareError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// File I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(String),

    /// Validation errors for data models
    #[error("Validation error: {0}")]
    Validation(String),

    /// Entity not found errors
    #[error("{entity_type} not found: {identifier}")]
    NotFound {
        entity_type: &'static str,
        identifier: String,
    },

    /// Duplicate entity errors
    #[error("{entity_type} already exists: {identifier}")]
    Duplicate {
        entity_type: &'static str,
        identifier: String,
    },

    /// The draft is not ready for allocation or commit
    #[error("Draft is not ready: {}", format_issues(.0))]
    NotReady(Vec<ValidationIssue>),

    /// Storage errors
    #[error("Storage error: {0}")]
    Storage(String),

    /// Import errors
    #[error("Import error: {0}")]
    Import(String),

    /// Export errors
    #[error("Export error: {0}")]
    Export(String),
}

fn format_issues(issues: &[ValidationIssue]) -> String {
    issues
        .iter()
        .map(|issue| issue.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

impl CostshareError {
    /// Create a "not found" error for cost items
    pub fn cost_item_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Cost item",
            identifier: identifier.into(),
        }
    }

    /// Create a "not found" error for units
    pub fn unit_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Unit",
            identifier: identifier.into(),
        }
    }

    /// Create a "not found" error for committed statements
    pub fn statement_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Statement",
            identifier: identifier.into(),
        }
    }

    /// Check if this is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Check if this is a validation error
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    /// The collected validation issues, if the draft was not ready
    pub fn issues(&self) -> &[ValidationIssue] {
        match self {
            Self::NotReady(issues) => issues,
            _ => &[],
        }
    }
}

impl From<std::io::Error> for CostshareError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<serde_json::Error> for CostshareError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err.to_string())
    }
}

impl From<csv::Error> for CostshareError {
    fn from(err: csv::Error) -> Self {
        Self::Import(err.to_string())
    }
}

/// Result type alias for costshare operations
pub type CostshareResult<T> = Result<T, CostshareError>;

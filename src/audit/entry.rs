//! Audit entry data structures

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Kinds of audited operations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Operation {
    Create,
    Update,
    Delete,
    /// Allocation was run and results stored
    Calculate,
    /// The draft was frozen into a statement
    Commit,
    /// The draft was discarded
    Reset,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operation::Create => write!(f, "CREATE"),
            Operation::Update => write!(f, "UPDATE"),
            Operation::Delete => write!(f, "DELETE"),
            Operation::Calculate => write!(f, "CALCULATE"),
            Operation::Commit => write!(f, "COMMIT"),
            Operation::Reset => write!(f, "RESET"),
        }
    }
}

/// The part of the draft an operation touched
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityType {
    Draft,
    Building,
    Period,
    CostItem,
    Unit,
    /// Draft options and the vacancy policy
    Options,
    Allocation,
    Statement,
}

impl fmt::Display for EntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityType::Draft => write!(f, "Draft"),
            EntityType::Building => write!(f, "Building"),
            EntityType::Period => write!(f, "Period"),
            EntityType::CostItem => write!(f, "CostItem"),
            EntityType::Unit => write!(f, "Unit"),
            EntityType::Options => write!(f, "Options"),
            EntityType::Allocation => write!(f, "Allocation"),
            EntityType::Statement => write!(f, "Statement"),
        }
    }
}

/// A single audit log entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditEntry {
    pub timestamp: DateTime<Utc>,

    pub operation: Operation,

    pub entity_type: EntityType,

    pub entity_id: String,

    /// Human-readable label (cost item name, unit number, ...)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entity_name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub before: Option<serde_json::Value>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub after: Option<serde_json::Value>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub diff_summary: Option<String>,
}

impl AuditEntry {
    fn new(
        operation: Operation,
        entity_type: EntityType,
        entity_id: impl Into<String>,
        entity_name: Option<String>,
    ) -> Self {
        Self {
            timestamp: Utc::now(),
            operation,
            entity_type,
            entity_id: entity_id.into(),
            entity_name,
            before: None,
            after: None,
            diff_summary: None,
        }
    }

    pub fn create<T: Serialize>(
        entity_type: EntityType,
        entity_id: impl Into<String>,
        entity_name: Option<String>,
        entity: &T,
    ) -> Self {
        Self {
            after: serde_json::to_value(entity).ok(),
            ..Self::new(Operation::Create, entity_type, entity_id, entity_name)
        }
    }

    /// An update entry; the diff summary is derived from the two states
    pub fn update<T: Serialize>(
        entity_type: EntityType,
        entity_id: impl Into<String>,
        entity_name: Option<String>,
        before: &T,
        after: &T,
    ) -> Self {
        let before = serde_json::to_value(before).ok();
        let after = serde_json::to_value(after).ok();
        let diff_summary = match (&before, &after) {
            (Some(b), Some(a)) => super::diff::generate_diff(b, a),
            _ => None,
        };
        Self {
            before,
            after,
            diff_summary,
            ..Self::new(Operation::Update, entity_type, entity_id, entity_name)
        }
    }

    pub fn delete<T: Serialize>(
        entity_type: EntityType,
        entity_id: impl Into<String>,
        entity_name: Option<String>,
        entity: &T,
    ) -> Self {
        Self {
            before: serde_json::to_value(entity).ok(),
            ..Self::new(Operation::Delete, entity_type, entity_id, entity_name)
        }
    }

    /// An entry with only a free-text summary
    pub fn event(
        operation: Operation,
        entity_type: EntityType,
        entity_id: impl Into<String>,
        summary: impl Into<String>,
    ) -> Self {
        Self {
            diff_summary: Some(summary.into()),
            ..Self::new(operation, entity_type, entity_id, None)
        }
    }

    pub fn format_human_readable(&self) -> String {
        let mut output = format!(
            "[{}] {} {} {}",
            self.timestamp.format("%Y-%m-%d %H:%M:%S UTC"),
            self.operation,
            self.entity_type,
            self.entity_id
        );

        if let Some(name) = &self.entity_name {
            output.push_str(&format!(" ({})", name));
        }

        if let Some(diff) = &self.diff_summary {
            output.push_str(&format!("\n  {}", diff));
        }

        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_update_derives_diff() {
        let before = json!({"name": "Grundsteuer", "amount": 0});
        let after = json!({"name": "Grundsteuer", "amount": 45000});

        let entry = AuditEntry::update(
            EntityType::CostItem,
            "cost-1234abcd",
            Some("Grundsteuer".to_string()),
            &before,
            &after,
        );

        assert_eq!(entry.operation, Operation::Update);
        assert_eq!(entry.diff_summary.as_deref(), Some("amount: 0 -> 45000"));
    }

    #[test]
    fn test_unchanged_update_has_no_diff() {
        let state = json!({"persons": 2});
        let entry = AuditEntry::update(EntityType::Unit, "unit-1", None, &state, &state);
        assert!(entry.diff_summary.is_none());
    }

    #[test]
    fn test_create_and_delete_entries() {
        let data = json!({"name": "Winterdienst"});
        let created = AuditEntry::create(EntityType::CostItem, "cost-1", None, &data);
        let deleted = AuditEntry::delete(EntityType::CostItem, "cost-1", None, &data);

        assert!(created.before.is_none() && created.after.is_some());
        assert!(deleted.before.is_some() && deleted.after.is_none());
    }

    #[test]
    fn test_serialization() {
        let entry = AuditEntry::event(
            Operation::Calculate,
            EntityType::Allocation,
            "draft",
            "3 units, total €1200.00",
        );

        let json = serde_json::to_string(&entry).unwrap();
        assert!(json.contains(r#""operation":"calculate""#));
        assert!(json.contains(r#""entity_type":"allocation""#));

        let deserialized: AuditEntry = serde_json::from_str(&json).unwrap();
        assert_eq!(deserialized.operation, Operation::Calculate);
    }

    #[test]
    fn test_human_readable_format() {
        let entry = AuditEntry::event(
            Operation::Commit,
            EntityType::Statement,
            "stm-0badcafe",
            "Lindenweg 4, 2025",
        );

        let formatted = entry.format_human_readable();
        assert!(formatted.contains("COMMIT Statement stm-0badcafe"));
        assert!(formatted.contains("Lindenweg 4, 2025"));
    }
}

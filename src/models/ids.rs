//! Strongly-typed ID wrappers for all entity types
//!
//! Using newtype wrappers prevents accidentally mixing up a unit ID with a
//! cost item ID at compile time.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Macro to generate ID newtype wrappers
macro_rules! define_id {
    ($name:ident, $display_prefix:literal) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(Uuid);

        impl $name {
            /// Create a new random ID
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }

            pub fn from_uuid(uuid: Uuid) -> Self {
                Self(uuid)
            }

            pub fn as_uuid(&self) -> &Uuid {
                &self.0
            }

            pub fn parse(s: &str) -> Result<Self, uuid::Error> {
                Ok(Self(Uuid::parse_str(s)?))
            }

            /// Check whether a user-supplied reference names this ID
            ///
            /// Matches the full UUID, the short display form, or a bare
            /// UUID prefix of at least 4 characters.
            pub fn matches(&self, reference: &str) -> bool {
                let reference = reference.trim().to_lowercase();
                let full = self.0.to_string();
                let bare = reference
                    .strip_prefix($display_prefix)
                    .unwrap_or(reference.as_str());
                bare.len() >= 4 && full.starts_with(bare)
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}{}", $display_prefix, &self.0.to_string()[..8])
            }
        }

        impl From<Uuid> for $name {
            fn from(uuid: Uuid) -> Self {
                Self(uuid)
            }
        }

        impl FromStr for $name {
            type Err = uuid::Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                if let Ok(uuid) = Uuid::parse_str(s) {
                    return Ok(Self(uuid));
                }
                let s = s.strip_prefix($display_prefix).unwrap_or(s);
                Ok(Self(Uuid::parse_str(s)?))
            }
        }
    };
}

define_id!(CostItemId, "cost-");
define_id!(UnitId, "unit-");
define_id!(TenantId, "ten-");
define_id!(BuildingId, "bld-");
define_id!(StatementId, "stm-");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_display() {
        let id = UnitId::new();
        let display = id.to_string();
        assert!(display.starts_with("unit-"));
        assert_eq!(display.len(), 13);
    }

    #[test]
    fn test_id_serialization() {
        let id = CostItemId::new();
        let json = serde_json::to_string(&id).unwrap();
        let deserialized: CostItemId = serde_json::from_str(&json).unwrap();
        assert_eq!(id, deserialized);
    }

    #[test]
    fn test_matches_display_and_full_forms() {
        let uuid_str = "550e8400-e29b-41d4-a716-446655440000";
        let id = CostItemId::parse(uuid_str).unwrap();

        assert!(id.matches(uuid_str));
        assert!(id.matches("cost-550e8400"));
        assert!(id.matches("550e"));
        assert!(!id.matches("550"));
        assert!(!id.matches("cost-deadbeef"));
    }
}

//! Fallback rules for the optional fields of a [`ResourcePlanRecord`].
//!
//! Each field has exactly one resolution order and it lives here, so callers
//! never chain fallbacks inline.

use crate::model::ResourcePlanRecord;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

pub const UNASSIGNED_BUSINESS_UNIT: &str = "Unassigned";
pub const UNKNOWN_ROLE: &str = "unknown";

/// `business_unit_name`, else `"Unassigned"`.
pub fn business_unit_of(record: &ResourcePlanRecord) -> &str {
    record
        .business_unit_name
        .as_deref()
        .unwrap_or(UNASSIGNED_BUSINESS_UNIT)
}

/// `project_role_id`, else `position_id`, else `"unknown"`.
pub fn role_key_of(record: &ResourcePlanRecord) -> String {
    record
        .project_role_id
        .or(record.position_id)
        .map(|id| id.to_string())
        .unwrap_or_else(|| UNKNOWN_ROLE.to_string())
}

/// `project_role_name`, else `position_name`, else the resolved role key.
pub fn role_name_of(record: &ResourcePlanRecord, role_key: &str) -> String {
    record
        .project_role_name
        .as_deref()
        .or(record.position_name.as_deref())
        .unwrap_or(role_key)
        .to_string()
}

/// What to do when records sharing a role key disagree on the display name.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NamePolicy {
    /// Keep the name seen on the first record for the key.
    #[default]
    FirstSeen,
    /// Replace with the name on the most recent record.
    LastSeen,
}

impl NamePolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            NamePolicy::FirstSeen => "first_seen",
            NamePolicy::LastSeen => "last_seen",
        }
    }

    /// Applies the policy to `current`. Returns true when the names differed.
    pub fn reconcile(&self, current: &mut String, incoming: &str) -> bool {
        if current == incoming {
            return false;
        }
        if *self == NamePolicy::LastSeen {
            *current = incoming.to_string();
        }
        true
    }
}

impl FromStr for NamePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "first_seen" | "first" => Ok(NamePolicy::FirstSeen),
            "last_seen" | "last" => Ok(NamePolicy::LastSeen),
            other => Err(format!("unknown name policy '{other}'")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn project_role_wins_over_position() {
        let record = ResourcePlanRecord::new(1, 1, 2025, 1, 1.0)
            .with_project_role(7, "Tech Lead")
            .with_position(3, "Engineer");
        let key = role_key_of(&record);
        assert_eq!(key, "7");
        assert_eq!(role_name_of(&record, &key), "Tech Lead");
    }

    #[test]
    fn missing_fields_fall_back() {
        let record = ResourcePlanRecord::new(1, 1, 2025, 1, 1.0);
        let key = role_key_of(&record);
        assert_eq!(key, UNKNOWN_ROLE);
        assert_eq!(role_name_of(&record, &key), UNKNOWN_ROLE);
        assert_eq!(business_unit_of(&record), UNASSIGNED_BUSINESS_UNIT);

        let mut named_only = ResourcePlanRecord::new(2, 1, 2025, 1, 1.0).with_position(4, "QA");
        named_only.position_name = None;
        let key = role_key_of(&named_only);
        assert_eq!(role_name_of(&named_only, &key), "4");
    }

    #[test]
    fn name_policies() {
        let mut name = "PM".to_string();
        assert!(NamePolicy::FirstSeen.reconcile(&mut name, "Project Manager"));
        assert_eq!(name, "PM");
        assert!(NamePolicy::LastSeen.reconcile(&mut name, "Project Manager"));
        assert_eq!(name, "Project Manager");
        assert!(!NamePolicy::LastSeen.reconcile(&mut name, "Project Manager"));
    }
}

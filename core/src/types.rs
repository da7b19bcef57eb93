//! Shared primitive types used across the entire pipeline.

use serde::{Deserialize, Serialize};

/// The canonical run identifier.
pub type RunId = String;

/// A calendar month bucket, rendered `YYYY-MM`.
/// `None` wherever it appears means the creation date was missing or unparseable.
pub type MonthLabel = String;

/// The two role categories that earn a bonus.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum RoleCategory {
    Engineer,
    Planner,
}

impl RoleCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            RoleCategory::Engineer => "engineer",
            RoleCategory::Planner  => "planner",
        }
    }
}

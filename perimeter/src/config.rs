//! Engine configuration.

use serde::{Deserialize, Serialize};

/// How failing elements of a `list_of` field are reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ListItemPolicy {
    /// One `invalid list item` violation per field, however many elements fail.
    #[default]
    PerField,
    /// One violation per failing element, keyed by its index under the list field.
    PerIndex,
}

/// What the registry does when a name is registered twice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DuplicatePolicy {
    /// Identical redefinitions are no-ops; differing ones are rejected.
    #[default]
    Reject,
    /// Last write wins.
    Replace,
}

/// Configuration shared by a registry and the validations run against it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ValidationConfig {
    /// List item reporting granularity.
    #[serde(default)]
    pub list_items: ListItemPolicy,
    /// Duplicate contract name handling.
    #[serde(default)]
    pub duplicates: DuplicatePolicy,
}

impl ValidationConfig {
    /// Creates the default config.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the list item reporting policy.
    #[must_use]
    pub const fn with_list_items(mut self, policy: ListItemPolicy) -> Self {
        self.list_items = policy;
        self
    }

    /// Sets the duplicate contract policy.
    #[must_use]
    pub const fn with_duplicates(mut self, policy: DuplicatePolicy) -> Self {
        self.duplicates = policy;
        self
    }
}

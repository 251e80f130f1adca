//! Per-query sort requests.
//!
//! The caller lists the sort keys it wants before compiling: property keys,
//! or [`MAIN_SUBJECT`] for the result entities themselves. Builders consult
//! the table to decide whether a join variable needs order-by data.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Sort key of the query's result entities.
pub const MAIN_SUBJECT: &str = "";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
    Random,
}

/// One sort requested by the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestedSort {
    pub key: String,
    #[serde(default)]
    pub direction: SortDirection,
}

impl RequestedSort {
    pub fn new(key: impl Into<String>, direction: SortDirection) -> Self {
        Self {
            key: key.into(),
            direction,
        }
    }

    pub fn main_subject(direction: SortDirection) -> Self {
        Self::new(MAIN_SUBJECT, direction)
    }
}

/// Requested sort keys of one query. Written once before compilation and
/// read-only afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SortKeyTable {
    keys: BTreeMap<String, SortDirection>,
}

impl SortKeyTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the table from the caller's requests. A key requested twice
    /// keeps its first direction.
    pub fn from_requested<'a>(requested: impl IntoIterator<Item = &'a RequestedSort>) -> Self {
        let mut keys = BTreeMap::new();
        for sort in requested {
            keys.entry(sort.key.clone()).or_insert(sort.direction);
        }
        Self { keys }
    }

    pub fn contains(&self, key: &str) -> bool {
        self.keys.contains_key(key)
    }

    pub fn direction(&self, key: &str) -> Option<SortDirection> {
        self.keys.get(key).copied()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, SortDirection)> {
        self.keys.iter().map(|(key, direction)| (key.as_str(), *direction))
    }
}

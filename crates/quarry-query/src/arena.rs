//! Named sub-queries registered during a compile.
//!
//! Hierarchy closures (subcategories, subproperties) are expanded by the
//! executor, not by the compiler. Conditions reference them through a
//! [`SubqueryId`] allocated here; the arena belongs to one top-level compile.

use crate::value::{CategoryId, PropertyId, PropertyRef};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SubqueryId(usize);

impl SubqueryId {
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for SubqueryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A sub-query the executor expands separately.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Subquery {
    /// The categories plus all their subcategories down to `depth` levels.
    CategoryHierarchy {
        categories: Vec<CategoryId>,
        depth: u32,
    },
    /// The property plus all its subproperties down to `depth` levels.
    PropertyHierarchy {
        property: PropertyRef,
        id: PropertyId,
        depth: u32,
    },
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubqueryArena {
    entries: Vec<Subquery>,
}

impl SubqueryArena {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `subquery`, reusing the id of an identical earlier entry.
    pub fn alloc(&mut self, subquery: Subquery) -> SubqueryId {
        if let Some(index) = self.entries.iter().position(|entry| *entry == subquery) {
            return SubqueryId(index);
        }
        self.entries.push(subquery);
        SubqueryId(self.entries.len() - 1)
    }

    pub fn get(&self, id: SubqueryId) -> Option<&Subquery> {
        self.entries.get(id.0)
    }

    pub fn iter(&self) -> impl Iterator<Item = (SubqueryId, &Subquery)> {
        self.entries
            .iter()
            .enumerate()
            .map(|(index, entry)| (SubqueryId(index), entry))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Drop every entry allocated after the first `len`. Ids below `len` stay
    /// valid.
    pub fn truncate(&mut self, len: usize) {
        self.entries.truncate(len);
    }
}

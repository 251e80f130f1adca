//! Query descriptions: the parsed, backend-neutral query tree.
//!
//! Descriptions are produced by the query-language parser and consumed
//! read-only by the condition compiler.

use crate::value::{Comparator, DataValue, EntityRef, PropertyRef};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Description {
    /// Matches every entity.
    Thing,
    /// Matches entities in the given namespace.
    Namespace { namespace: i32 },
    /// Matches members of any of the categories, including subcategories.
    Class { categories: Vec<EntityRef> },
    /// A stored query, expanded by substitution.
    Concept { concept: EntityRef },
    /// Comparison of the current entity against a literal.
    Value {
        property: PropertyRef,
        comparator: Comparator,
        value: DataValue,
    },
    /// Entities with at least one `property` value satisfying `description`.
    SomeProperty {
        property: PropertyRef,
        description: Box<Description>,
    },
    Conjunction { children: Vec<Description> },
    Disjunction { children: Vec<Description> },
}

impl Description {
    pub fn namespace(namespace: i32) -> Self {
        Self::Namespace { namespace }
    }

    /// Category membership; duplicate categories are dropped.
    pub fn class(categories: impl IntoIterator<Item = EntityRef>) -> Self {
        let mut unique: Vec<EntityRef> = Vec::new();
        for category in categories {
            if !unique.contains(&category) {
                unique.push(category);
            }
        }
        Self::Class { categories: unique }
    }

    pub fn concept(concept: EntityRef) -> Self {
        Self::Concept { concept }
    }

    pub fn value(property: PropertyRef, comparator: Comparator, value: impl Into<DataValue>) -> Self {
        Self::Value {
            property,
            comparator,
            value: value.into(),
        }
    }

    pub fn some_property(property: PropertyRef, description: Description) -> Self {
        Self::SomeProperty {
            property,
            description: Box::new(description),
        }
    }

    pub fn and(children: impl IntoIterator<Item = Description>) -> Self {
        Self::Conjunction {
            children: children.into_iter().collect(),
        }
    }

    pub fn or(children: impl IntoIterator<Item = Description>) -> Self {
        Self::Disjunction {
            children: children.into_iter().collect(),
        }
    }

    pub fn kind(&self) -> DescriptionKind {
        match self {
            Self::Thing => DescriptionKind::Thing,
            Self::Namespace { .. } => DescriptionKind::Namespace,
            Self::Class { .. } => DescriptionKind::Class,
            Self::Concept { .. } => DescriptionKind::Concept,
            Self::Value { .. } => DescriptionKind::Value,
            Self::SomeProperty { .. } => DescriptionKind::SomeProperty,
            Self::Conjunction { .. } => DescriptionKind::Conjunction,
            Self::Disjunction { .. } => DescriptionKind::Disjunction,
        }
    }

    /// Nesting depth of the tree; leaves have depth 1.
    pub fn depth(&self) -> usize {
        match self {
            Self::SomeProperty { description, .. } => 1 + description.depth(),
            Self::Conjunction { children } | Self::Disjunction { children } => {
                1 + children.iter().map(Self::depth).max().unwrap_or(0)
            }
            _ => 1,
        }
    }
}

/// Variant tag of a [`Description`], used by the builder registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DescriptionKind {
    Thing,
    Namespace,
    Class,
    Concept,
    Value,
    SomeProperty,
    Conjunction,
    Disjunction,
}

impl DescriptionKind {
    /// Every kind; a complete builder registry covers all of them.
    pub const ALL: [DescriptionKind; 8] = [
        Self::Thing,
        Self::Namespace,
        Self::Class,
        Self::Concept,
        Self::Value,
        Self::SomeProperty,
        Self::Conjunction,
        Self::Disjunction,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Thing => "thing",
            Self::Namespace => "namespace",
            Self::Class => "class",
            Self::Concept => "concept",
            Self::Value => "value",
            Self::SomeProperty => "some_property",
            Self::Conjunction => "conjunction",
            Self::Disjunction => "disjunction",
        }
    }
}

impl fmt::Display for DescriptionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

//! Graph-pattern fragments.

use super::filter::FilterExpr;
use crate::arena::SubqueryId;
use crate::value::{CategoryId, PropertyRef, ResourceRef, Variable};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Subject or object position of a triple.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Term {
    Variable { variable: Variable },
    Resource { resource: ResourceRef },
}

impl From<Variable> for Term {
    fn from(variable: Variable) -> Self {
        Self::Variable { variable }
    }
}

impl From<ResourceRef> for Term {
    fn from(resource: ResourceRef) -> Self {
        Self::Resource { resource }
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Variable { variable } => variable.fmt(f),
            Self::Resource { resource } => resource.fmt(f),
        }
    }
}

/// `subject property object`, with an optional subproperty closure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TriplePattern {
    pub subject: Term,
    pub property: PropertyRef,
    pub object: Term,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hierarchy: Option<SubqueryId>,
}

impl fmt::Display for TriplePattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.hierarchy {
            Some(id) => write!(
                f,
                "{} hierarchy-of{}({}) {} .",
                self.subject, id, self.property, self.object
            ),
            None => write!(f, "{} {} {} .", self.subject, self.property, self.object),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PatternElement {
    Triple(TriplePattern),
    /// `subject` has at least one inline value for `property`.
    HasValue {
        subject: Variable,
        property: PropertyRef,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        hierarchy: Option<SubqueryId>,
    },
    InNamespace {
        subject: Variable,
        namespace: i32,
    },
    /// `subject` is a member of one of `categories`; with `hierarchy` set the
    /// membership is transitive over subcategories.
    InCategory {
        subject: Variable,
        categories: Vec<CategoryId>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        hierarchy: Option<SubqueryId>,
    },
    /// Binds `sort_variable` to the sort key of the page bound to `subject`.
    SortKey {
        subject: Variable,
        sort_variable: Variable,
    },
    Filter {
        filter: FilterExpr,
    },
    Union {
        groups: Vec<GraphPattern>,
    },
}

impl fmt::Display for PatternElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Triple(triple) => triple.fmt(f),
            Self::HasValue {
                subject,
                property,
                hierarchy,
            } => match hierarchy {
                Some(id) => write!(f, "{} hierarchy-of{}({}) [] .", subject, id, property),
                None => write!(f, "{} {} [] .", subject, property),
            },
            Self::InNamespace { subject, namespace } => {
                write!(f, "{} swivt:wikiNamespace {} .", subject, namespace)
            }
            Self::InCategory {
                subject,
                categories,
                hierarchy,
            } => {
                let ids = categories
                    .iter()
                    .map(ToString::to_string)
                    .collect::<Vec<_>>()
                    .join(", ");
                match hierarchy {
                    Some(id) => write!(f, "{} rdf:type hierarchy-of{}({}) .", subject, id, ids),
                    None => write!(f, "{} rdf:type category({}) .", subject, ids),
                }
            }
            Self::SortKey {
                subject,
                sort_variable,
            } => write!(f, "{} swivt:wikiPageSortKey {} .", subject, sort_variable),
            Self::Filter { filter } => write!(f, "FILTER( {} )", filter),
            Self::Union { groups } => {
                for (i, group) in groups.iter().enumerate() {
                    if i > 0 {
                        f.write_str(" UNION ")?;
                    }
                    write!(f, "{{ {} }}", group)?;
                }
                Ok(())
            }
        }
    }
}

/// Ordered list of pattern elements, all joined on shared variables.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphPattern {
    pub elements: Vec<PatternElement>,
}

impl GraphPattern {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn push(&mut self, element: PatternElement) {
        self.elements.push(element);
    }

    /// Append `other`'s elements after this pattern's.
    pub fn append(&mut self, other: GraphPattern) {
        self.elements.extend(other.elements);
    }

    /// Append `filter` as a trailing `FILTER(...)`; empty filters add nothing.
    pub fn push_filter(&mut self, filter: FilterExpr) {
        if !filter.is_empty() {
            self.elements.push(PatternElement::Filter { filter });
        }
    }
}

impl From<PatternElement> for GraphPattern {
    fn from(element: PatternElement) -> Self {
        Self {
            elements: vec![element],
        }
    }
}

impl fmt::Display for GraphPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, element) in self.elements.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            element.fmt(f)?;
        }
        Ok(())
    }
}

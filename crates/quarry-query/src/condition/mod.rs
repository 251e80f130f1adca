//! The condition algebra produced by the compiler.
//!
//! A [`Condition`] is one of six shapes ([`ConditionKind`]) plus the side
//! channels every shape carries: vocabulary namespaces, weak (best-effort)
//! conditions, sort variables and a safety flag. Composite builders merge
//! side channels by union.

mod filter;
mod pattern;

pub use filter::{CompareOp, FilterAtom, FilterExpr, Operand};
pub use pattern::{GraphPattern, PatternElement, Term, TriplePattern};

use crate::value::{ResourceRef, Variable, Vocabulary};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ConditionKind {
    /// No constraint.
    True,
    /// Unsatisfiable.
    False,
    /// A graph pattern on the join variable.
    Where { pattern: GraphPattern },
    /// A post-filter introducing no bindings.
    Filter { filter: FilterExpr },
    /// The join variable is bound to exactly `value`; `pattern` still applies.
    Singleton {
        value: ResourceRef,
        pattern: GraphPattern,
    },
    /// Two or more alternatives, any of which may match.
    Alternatives { branches: Vec<Condition> },
}

/// Information accumulated alongside a condition's shape.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SideChannels {
    /// Vocabulary prefixes referenced by the condition, prefix to URI.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub namespaces: BTreeMap<String, String>,
    /// Best-effort conditions the executor may drop under resource limits.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub weak: Vec<Condition>,
    /// Sort key to the variable carrying its sort value.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub order_variables: BTreeMap<String, Variable>,
    /// At least one clause selects entities rather than merely filtering.
    #[serde(default)]
    pub safe: bool,
}

impl SideChannels {
    /// Union `other` into `self`; on an order key collision the existing
    /// variable is kept. Weak conditions already present are not repeated.
    pub fn absorb(&mut self, other: SideChannels) {
        for (prefix, uri) in other.namespaces {
            self.namespaces.entry(prefix).or_insert(uri);
        }
        for weak in other.weak {
            if !self.weak.contains(&weak) {
                self.weak.push(weak);
            }
        }
        for (key, variable) in other.order_variables {
            self.order_variables.entry(key).or_insert(variable);
        }
        self.safe |= other.safe;
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Condition {
    #[serde(flatten)]
    pub kind: ConditionKind,
    #[serde(flatten)]
    pub side: SideChannels,
}

impl Condition {
    pub fn new(kind: ConditionKind) -> Self {
        Self {
            kind,
            side: SideChannels::default(),
        }
    }

    pub fn unconstrained() -> Self {
        Self::new(ConditionKind::True)
    }

    pub fn unsatisfiable() -> Self {
        Self::new(ConditionKind::False)
    }

    pub fn where_pattern(pattern: GraphPattern) -> Self {
        Self::new(ConditionKind::Where { pattern })
    }

    pub fn filter(filter: FilterExpr) -> Self {
        Self::new(ConditionKind::Filter { filter })
    }

    pub fn singleton(value: ResourceRef, pattern: GraphPattern) -> Self {
        Self::new(ConditionKind::Singleton { value, pattern })
    }

    pub fn alternatives(branches: Vec<Condition>) -> Self {
        Self::new(ConditionKind::Alternatives { branches })
    }

    pub fn with_safe(mut self, safe: bool) -> Self {
        self.side.safe = safe;
        self
    }

    pub fn with_side_channels(mut self, side: SideChannels) -> Self {
        self.side = side;
        self
    }

    /// Record `vocabulary` as referenced by this condition.
    pub fn add_vocabulary(&mut self, vocabulary: &Vocabulary) {
        self.side
            .namespaces
            .entry(vocabulary.prefix.clone())
            .or_insert_with(|| vocabulary.uri.clone());
    }

    pub fn is_true(&self) -> bool {
        matches!(self.kind, ConditionKind::True)
    }

    pub fn is_false(&self) -> bool {
        matches!(self.kind, ConditionKind::False)
    }

    pub fn is_safe(&self) -> bool {
        self.side.safe
    }

    pub fn namespaces(&self) -> &BTreeMap<String, String> {
        &self.side.namespaces
    }

    pub fn weak(&self) -> &[Condition] {
        &self.side.weak
    }

    pub fn order_variables(&self) -> &BTreeMap<String, Variable> {
        &self.side.order_variables
    }

    pub fn singleton_value(&self) -> Option<&ResourceRef> {
        match &self.kind {
            ConditionKind::Singleton { value, .. } => Some(value),
            _ => None,
        }
    }

    /// Standalone group pattern equivalent to this condition on
    /// `join_variable`, for nesting inside a union. `None` for `False`,
    /// which has no pattern form.
    pub fn to_group(&self, join_variable: &Variable) -> Option<GraphPattern> {
        match &self.kind {
            ConditionKind::True => Some(GraphPattern::new()),
            ConditionKind::False => None,
            ConditionKind::Where { pattern } => Some(pattern.clone()),
            ConditionKind::Filter { filter } => {
                let mut group = GraphPattern::new();
                group.push_filter(filter.clone());
                Some(group)
            }
            ConditionKind::Singleton { value, pattern } => {
                let mut group = pattern.clone();
                group.push_filter(FilterExpr::from(FilterAtom::binds(join_variable, value)));
                Some(group)
            }
            ConditionKind::Alternatives { branches } => Some(GraphPattern::from(
                PatternElement::Union {
                    groups: branches
                        .iter()
                        .filter_map(|branch| branch.to_group(join_variable))
                        .collect(),
                },
            )),
        }
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            ConditionKind::True => f.write_str("TRUE"),
            ConditionKind::False => f.write_str("FALSE"),
            ConditionKind::Where { pattern } => write!(f, "WHERE {{ {} }}", pattern),
            ConditionKind::Filter { filter } => write!(f, "FILTER( {} )", filter),
            ConditionKind::Singleton { value, pattern } => {
                if pattern.is_empty() {
                    write!(f, "SINGLETON {}", value)
                } else {
                    write!(f, "SINGLETON {} {{ {} }}", value, pattern)
                }
            }
            ConditionKind::Alternatives { branches } => {
                for (i, branch) in branches.iter().enumerate() {
                    if i > 0 {
                        f.write_str(" UNION ")?;
                    }
                    write!(f, "{{ {} }}", branch)?;
                }
                Ok(())
            }
        }
    }
}

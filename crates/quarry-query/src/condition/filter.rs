//! Post-filter expressions.
//!
//! A [`FilterExpr`] is a conjunction of atomic predicates. There is no
//! disjunctive form: alternatives are carried as separate conditions.

use crate::value::{quote, DataValue, ResourceRef, Variable};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Relational operator of a comparison predicate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompareOp {
    Eq,
    Less,
    Greater,
    Leq,
    Geq,
    Neq,
}

impl CompareOp {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Eq => "=",
            Self::Less => "<",
            Self::Greater => ">",
            Self::Leq => "<=",
            Self::Geq => ">=",
            Self::Neq => "!=",
        }
    }
}

impl fmt::Display for CompareOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One side of a comparison.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Operand {
    Variable { variable: Variable },
    /// A physical field of the entity bound to `variable`, e.g. its index
    /// value or sort key.
    Field { field: String, variable: Variable },
    Value { value: DataValue },
    /// A plain string, as opposed to a typed literal.
    Text { text: String },
}

impl Operand {
    pub fn variable(variable: Variable) -> Self {
        Self::Variable { variable }
    }

    pub fn field(field: impl Into<String>, variable: Variable) -> Self {
        Self::Field {
            field: field.into(),
            variable,
        }
    }

    pub fn value(value: DataValue) -> Self {
        Self::Value { value }
    }

    pub fn text(text: impl Into<String>) -> Self {
        Self::Text { text: text.into() }
    }
}

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Variable { variable } => variable.fmt(f),
            Self::Field { field, variable } => write!(f, "{}({})", field, variable),
            Self::Value { value } => value.fmt(f),
            Self::Text { text } => f.write_str(&quote(text)),
        }
    }
}

/// An atomic filter predicate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FilterAtom {
    Compare {
        left: Operand,
        op: CompareOp,
        right: Operand,
    },
    /// Anchored regular-expression match (or non-match when `negated`).
    Regex {
        operand: Operand,
        pattern: String,
        negated: bool,
    },
}

impl FilterAtom {
    pub fn compare(left: Operand, op: CompareOp, right: Operand) -> Self {
        Self::Compare { left, op, right }
    }

    /// `variable = resource`
    pub fn binds(variable: &Variable, resource: &ResourceRef) -> Self {
        Self::compare(
            Operand::variable(variable.clone()),
            CompareOp::Eq,
            Operand::value(DataValue::Page(resource.clone())),
        )
    }
}

impl fmt::Display for FilterAtom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Compare { left, op, right } => write!(f, "{} {} {}", left, op, right),
            Self::Regex {
                operand,
                pattern,
                negated,
            } => {
                if *negated {
                    f.write_str("!")?;
                }
                write!(f, "regex({}, {}, \"s\")", operand, quote(pattern))
            }
        }
    }
}

/// Conjunction of atomic predicates, rendered joined by `&&`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FilterExpr {
    atoms: Vec<FilterAtom>,
}

impl FilterExpr {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn atoms(&self) -> &[FilterAtom] {
        &self.atoms
    }

    pub fn is_empty(&self) -> bool {
        self.atoms.is_empty()
    }

    pub fn len(&self) -> usize {
        self.atoms.len()
    }

    pub fn push(&mut self, atom: FilterAtom) {
        self.atoms.push(atom);
    }

    /// Append all of `other`'s predicates (`self && other`).
    pub fn and(&mut self, other: FilterExpr) {
        self.atoms.extend(other.atoms);
    }
}

impl From<FilterAtom> for FilterExpr {
    fn from(atom: FilterAtom) -> Self {
        Self { atoms: vec![atom] }
    }
}

impl FromIterator<FilterAtom> for FilterExpr {
    fn from_iter<I: IntoIterator<Item = FilterAtom>>(iter: I) -> Self {
        Self {
            atoms: iter.into_iter().collect(),
        }
    }
}

impl fmt::Display for FilterExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, atom) in self.atoms.iter().enumerate() {
            if i > 0 {
                f.write_str(" && ")?;
            }
            atom.fmt(f)?;
        }
        Ok(())
    }
}

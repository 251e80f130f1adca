//! Builder for value comparisons.

use super::{CompoundConditionBuilder, ConditionBuilder, OrderByProperty};
use crate::condition::{CompareOp, Condition, FilterAtom, FilterExpr, GraphPattern, Operand};
use crate::description::{Description, DescriptionKind};
use crate::error::{CompileError, CompileResult};
use crate::value::{Comparator, DataValue, PropertyRef, ValueType, Variable};
use tracing::{debug, warn};

/// Compiles `Value` descriptions.
///
/// - `EQ` on a page binds the join variable to that page (a singleton)
/// - `LIKE`/`NOT_LIKE` on text become anchored regex filters
/// - relational comparators filter on the index field, or on the sort key
///   when the literal is a page
/// - `UNKNOWN`, and `LIKE`/`NOT_LIKE` on non-text literals, match everything
pub struct ValueConditionBuilder;

impl ConditionBuilder for ValueConditionBuilder {
    fn name(&self) -> &'static str {
        "value"
    }

    fn handles(&self, kind: DescriptionKind) -> bool {
        kind == DescriptionKind::Value
    }

    fn build_condition(
        &self,
        description: &Description,
        compiler: &mut CompoundConditionBuilder,
        join_variable: &Variable,
        order_by: Option<&OrderByProperty>,
    ) -> CompileResult<Condition> {
        let Description::Value {
            property,
            comparator,
            value,
        } = description
        else {
            return Err(CompileError::UnexpectedDescription {
                builder: self.name(),
                kind: description.kind(),
            });
        };

        let value_type = value.value_type();
        let mut condition = match (*comparator, value) {
            (Comparator::Unknown, _) => lenient(compiler, *comparator, value_type),
            (Comparator::Like | Comparator::NotLike, DataValue::Text(text)) => {
                let fields = compiler.value_fields(property, value_type);
                Condition::filter(FilterExpr::from(FilterAtom::Regex {
                    operand: Operand::field(fields.index_field, join_variable.clone()),
                    pattern: like_pattern_to_regex(text),
                    negated: *comparator == Comparator::NotLike,
                }))
            }
            (Comparator::Like | Comparator::NotLike, _) => {
                lenient(compiler, *comparator, value_type)
            }
            (Comparator::Eq, DataValue::Page(resource)) => {
                Condition::singleton(resource.clone(), GraphPattern::new()).with_safe(true)
            }
            (Comparator::Eq, _) => compare(compiler, property, CompareOp::Eq, value, join_variable),
            (Comparator::Less, _) => {
                compare(compiler, property, CompareOp::Less, value, join_variable)
            }
            (Comparator::Greater, _) => {
                compare(compiler, property, CompareOp::Greater, value, join_variable)
            }
            (Comparator::Leq, _) => compare(compiler, property, CompareOp::Leq, value, join_variable),
            (Comparator::Geq, _) => compare(compiler, property, CompareOp::Geq, value, join_variable),
            (Comparator::Neq, _) => compare(compiler, property, CompareOp::Neq, value, join_variable),
        };

        if !condition.is_true() {
            if let Some(vocabulary) = value.as_resource().and_then(|resource| resource.vocabulary()) {
                condition.add_vocabulary(vocabulary);
            }
        }
        compiler.add_order_by_data(&mut condition, join_variable, order_by, value_type);
        Ok(condition)
    }
}

/// Filter comparing a field of `join_variable` against `value`.
///
/// Pages compare on their sort key, never on identity.
fn compare(
    compiler: &CompoundConditionBuilder,
    property: &PropertyRef,
    op: CompareOp,
    value: &DataValue,
    join_variable: &Variable,
) -> Condition {
    let fields = compiler.value_fields(property, value.value_type());
    let atom = match value.as_resource() {
        Some(resource) => FilterAtom::compare(
            Operand::field(fields.sort_field, join_variable.clone()),
            op,
            Operand::text(resource.sort_key()),
        ),
        None => FilterAtom::compare(
            Operand::field(fields.index_field, join_variable.clone()),
            op,
            Operand::value(value.clone()),
        ),
    };
    Condition::filter(FilterExpr::from(atom))
}

fn lenient(
    compiler: &CompoundConditionBuilder,
    comparator: Comparator,
    value_type: ValueType,
) -> Condition {
    if compiler.config().warn_on_lenient_comparators {
        warn!(?comparator, ?value_type, "Comparator has no effect, matching all values");
    } else {
        debug!(?comparator, ?value_type, "Comparator has no effect, matching all values");
    }
    Condition::unconstrained()
}

/// Translate a wiki wildcard pattern into an anchored regular expression.
///
/// `*` matches any run of characters and `?` any single character; every
/// other character matches itself.
pub fn like_pattern_to_regex(pattern: &str) -> String {
    let mut regex = String::with_capacity(pattern.len() + 2);
    regex.push('^');
    let mut buf = [0u8; 4];
    for c in pattern.chars() {
        match c {
            '*' => regex.push_str(".*"),
            '?' => regex.push('.'),
            other => regex.push_str(&regex::escape(other.encode_utf8(&mut buf))),
        }
    }
    regex.push('$');
    regex
}

//! Builder for namespace restrictions.

use super::{CompoundConditionBuilder, ConditionBuilder, OrderByProperty};
use crate::condition::{Condition, GraphPattern, PatternElement};
use crate::description::{Description, DescriptionKind};
use crate::error::{CompileError, CompileResult};
use crate::value::{ValueType, Variable};

pub struct NamespaceConditionBuilder;

impl ConditionBuilder for NamespaceConditionBuilder {
    fn name(&self) -> &'static str {
        "namespace"
    }

    fn handles(&self, kind: DescriptionKind) -> bool {
        kind == DescriptionKind::Namespace
    }

    fn build_condition(
        &self,
        description: &Description,
        compiler: &mut CompoundConditionBuilder,
        join_variable: &Variable,
        order_by: Option<&OrderByProperty>,
    ) -> CompileResult<Condition> {
        let Description::Namespace { namespace } = description else {
            return Err(CompileError::UnexpectedDescription {
                builder: self.name(),
                kind: description.kind(),
            });
        };

        let mut condition = Condition::where_pattern(GraphPattern::from(
            PatternElement::InNamespace {
                subject: join_variable.clone(),
                namespace: *namespace,
            },
        ))
        .with_safe(true);
        compiler.add_order_by_data(&mut condition, join_variable, order_by, ValueType::Page);
        Ok(condition)
    }
}

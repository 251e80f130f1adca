//! Builder for existential property restrictions.

use super::{CompoundConditionBuilder, ConditionBuilder, OrderByProperty};
use crate::arena::Subquery;
use crate::condition::{Condition, GraphPattern, PatternElement, TriplePattern};
use crate::description::{Description, DescriptionKind};
use crate::error::{CompileError, CompileResult};
use crate::value::{ValueType, Variable};
use tracing::debug;

/// Compiles `SomeProperty` descriptions.
///
/// Page-valued properties join the current entity to a fresh variable for the
/// property's value and compile the inner description against it; the
/// relation is reversed for inverse properties. Inline values have no entity
/// of their own, so the inner description applies to the current variable
/// and the property only has to be present.
pub struct SomePropertyConditionBuilder;

impl ConditionBuilder for SomePropertyConditionBuilder {
    fn name(&self) -> &'static str {
        "some_property"
    }

    fn handles(&self, kind: DescriptionKind) -> bool {
        kind == DescriptionKind::SomeProperty
    }

    fn build_condition(
        &self,
        description: &Description,
        compiler: &mut CompoundConditionBuilder,
        join_variable: &Variable,
        order_by: Option<&OrderByProperty>,
    ) -> CompileResult<Condition> {
        let Description::SomeProperty {
            property,
            description: inner,
        } = description
        else {
            return Err(CompileError::UnexpectedDescription {
                builder: self.name(),
                kind: description.kind(),
            });
        };

        let Some(info) = compiler.resolver().resolve_property(property) else {
            debug!(%property, "Property does not resolve, no entity can match");
            return Ok(Condition::unsatisfiable());
        };

        let checkpoint = compiler.subquery_checkpoint();
        let depth = compiler.config().property_hierarchy_depth;
        let hierarchy = (depth > 0).then(|| {
            compiler.register_subquery(Subquery::PropertyHierarchy {
                property: property.clone(),
                id: info.id,
                depth,
            })
        });
        let inner_order_by = OrderByProperty::new(property.key.clone(), info.value_type);

        let (mut pattern, value_variable) = if info.value_type.is_resource() {
            let value_variable = compiler.next_variable();
            let (subject, object) = if property.inverse {
                (value_variable.clone(), join_variable.clone())
            } else {
                (join_variable.clone(), value_variable.clone())
            };
            let triple = PatternElement::Triple(TriplePattern {
                subject: subject.into(),
                property: property.clone(),
                object: object.into(),
                hierarchy,
            });
            (GraphPattern::from(triple), value_variable)
        } else {
            let has_value = PatternElement::HasValue {
                subject: join_variable.clone(),
                property: property.clone(),
                hierarchy,
            };
            (GraphPattern::from(has_value), join_variable.clone())
        };

        let inner_condition = compiler.compile(inner, &value_variable, Some(&inner_order_by))?;
        let Some(group) = inner_condition.to_group(&value_variable) else {
            compiler.rollback_subqueries(checkpoint);
            return Ok(Condition::unsatisfiable());
        };
        pattern.append(group);

        let mut condition = Condition::where_pattern(pattern)
            .with_side_channels(inner_condition.side)
            .with_safe(true);
        if let Some(vocabulary) = &property.vocabulary {
            condition.add_vocabulary(vocabulary);
        }
        compiler.add_order_by_data(&mut condition, join_variable, order_by, ValueType::Page);
        Ok(condition)
    }
}

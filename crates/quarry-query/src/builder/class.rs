//! Builder for category membership.

use super::{CompoundConditionBuilder, ConditionBuilder, OrderByProperty};
use crate::arena::Subquery;
use crate::condition::{Condition, GraphPattern, PatternElement};
use crate::description::{Description, DescriptionKind};
use crate::error::{CompileError, CompileResult};
use crate::value::{ValueType, Variable};
use tracing::debug;

/// Compiles `Class` descriptions to an `InCategory` pattern.
///
/// Categories that do not resolve are dropped; if none resolve the
/// description cannot match anything. With a non-zero hierarchy depth the
/// id list is also registered as a hierarchy sub-query for the executor to
/// expand.
pub struct ClassConditionBuilder;

impl ConditionBuilder for ClassConditionBuilder {
    fn name(&self) -> &'static str {
        "class"
    }

    fn handles(&self, kind: DescriptionKind) -> bool {
        kind == DescriptionKind::Class
    }

    fn build_condition(
        &self,
        description: &Description,
        compiler: &mut CompoundConditionBuilder,
        join_variable: &Variable,
        order_by: Option<&OrderByProperty>,
    ) -> CompileResult<Condition> {
        let Description::Class { categories } = description else {
            return Err(CompileError::UnexpectedDescription {
                builder: self.name(),
                kind: description.kind(),
            });
        };

        let mut ids = Vec::with_capacity(categories.len());
        for category in categories {
            match compiler.resolver().resolve_category(category) {
                Some(id) if !ids.contains(&id) => ids.push(id),
                Some(_) => {}
                None => debug!(%category, "Dropping unresolved category"),
            }
        }

        if ids.is_empty() {
            return Ok(Condition::unsatisfiable());
        }

        let depth = compiler.config().category_hierarchy_depth;
        let hierarchy = (depth > 0).then(|| {
            compiler.register_subquery(Subquery::CategoryHierarchy {
                categories: ids.clone(),
                depth,
            })
        });

        let mut condition = Condition::where_pattern(GraphPattern::from(
            PatternElement::InCategory {
                subject: join_variable.clone(),
                categories: ids,
                hierarchy,
            },
        ))
        .with_safe(true);
        compiler.add_order_by_data(&mut condition, join_variable, order_by, ValueType::Page);
        Ok(condition)
    }
}

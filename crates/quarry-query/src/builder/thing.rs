//! Builder for `Thing`, which matches every entity.

use super::{CompoundConditionBuilder, ConditionBuilder, OrderByProperty};
use crate::condition::Condition;
use crate::description::{Description, DescriptionKind};
use crate::error::CompileResult;
use crate::value::Variable;

pub struct ThingConditionBuilder;

impl ConditionBuilder for ThingConditionBuilder {
    fn name(&self) -> &'static str {
        "thing"
    }

    fn handles(&self, kind: DescriptionKind) -> bool {
        kind == DescriptionKind::Thing
    }

    fn build_condition(
        &self,
        _description: &Description,
        compiler: &mut CompoundConditionBuilder,
        join_variable: &Variable,
        order_by: Option<&OrderByProperty>,
    ) -> CompileResult<Condition> {
        Ok(compiler.build_true_condition(join_variable, order_by))
    }
}

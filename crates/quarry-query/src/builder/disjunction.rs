//! Builder for disjunctions.

use super::{CompoundConditionBuilder, ConditionBuilder, OrderByProperty};
use crate::condition::{Condition, SideChannels};
use crate::description::{Description, DescriptionKind};
use crate::error::{CompileError, CompileResult};
use crate::value::Variable;
use tracing::trace;

/// Compiles `Disjunction` descriptions into a list of alternatives.
///
/// A `True` child absorbs the disjunction, `False` children are dropped, and
/// a single surviving alternative is returned as is.
pub struct DisjunctionConditionBuilder;

impl ConditionBuilder for DisjunctionConditionBuilder {
    fn name(&self) -> &'static str {
        "disjunction"
    }

    fn handles(&self, kind: DescriptionKind) -> bool {
        kind == DescriptionKind::Disjunction
    }

    fn build_condition(
        &self,
        description: &Description,
        compiler: &mut CompoundConditionBuilder,
        join_variable: &Variable,
        order_by: Option<&OrderByProperty>,
    ) -> CompileResult<Condition> {
        let Description::Disjunction { children } = description else {
            return Err(CompileError::UnexpectedDescription {
                builder: self.name(),
                kind: description.kind(),
            });
        };

        let checkpoint = compiler.subquery_checkpoint();
        let mut branches = Vec::with_capacity(children.len());
        for child in children {
            let condition = compiler.compile(child, join_variable, order_by)?;
            if condition.is_true() {
                compiler.rollback_subqueries(checkpoint);
                return Ok(compiler.build_true_condition(join_variable, order_by));
            }
            if !condition.is_false() {
                branches.push(condition);
            }
        }

        trace!(
            children = children.len(),
            alternatives = branches.len(),
            "Collected disjunction alternatives"
        );

        let mut condition = match branches.len() {
            0 => return Ok(Condition::unsatisfiable()),
            1 => branches.remove(0),
            _ => {
                let mut side = SideChannels::default();
                for branch in &branches {
                    side.absorb(branch.side.clone());
                }
                Condition::alternatives(branches).with_side_channels(side)
            }
        };
        compiler.add_requested_order_by(&mut condition, join_variable, order_by);
        Ok(condition)
    }
}

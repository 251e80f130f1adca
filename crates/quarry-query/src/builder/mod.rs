//! Condition builders.
//!
//! Each builder compiles one kind of [`Description`] into a [`Condition`].
//! The [`CompoundConditionBuilder`] owns the ordered registry of builders and
//! is the single recursive entry point: composite builders call back into it
//! for their children.
//!
//! Follows the registry pattern of the query syntax parsers:
//! - `can_build_condition_for()` selects a builder, first match wins
//! - `build_condition()` does the work
//! - `handles()` lets the registry check, when it is built, that every
//!   description kind is covered

mod class;
mod compound;
mod concept;
mod conjunction;
mod disjunction;
mod namespace;
mod order_by;
mod some_property;
mod thing;
mod value;

pub use class::ClassConditionBuilder;
pub use compound::{CompoundConditionBuilder, CompoundConditionBuilderBuilder};
pub use concept::ConceptConditionBuilder;
pub use conjunction::ConjunctionConditionBuilder;
pub use disjunction::DisjunctionConditionBuilder;
pub use namespace::NamespaceConditionBuilder;
pub use order_by::OrderByProperty;
pub use some_property::SomePropertyConditionBuilder;
pub use thing::ThingConditionBuilder;
pub use value::{like_pattern_to_regex, ValueConditionBuilder};

use crate::condition::Condition;
use crate::description::{Description, DescriptionKind};
use crate::error::CompileResult;
use crate::value::Variable;

/// Compiles descriptions of one kind into conditions.
pub trait ConditionBuilder: Send + Sync {
    /// Unique name for this builder
    fn name(&self) -> &'static str;

    /// Whether this builder may build some descriptions of `kind`.
    fn handles(&self, kind: DescriptionKind) -> bool;

    /// Whether this builder builds `description`. Defaults to `handles()`
    /// on the description's kind; override to narrow the match.
    fn can_build_condition_for(&self, description: &Description) -> bool {
        self.handles(description.kind())
    }

    /// Build the condition for `description` on `join_variable`.
    ///
    /// `order_by` names the sort key to record for `join_variable`, if the
    /// caller wants one.
    fn build_condition(
        &self,
        description: &Description,
        compiler: &mut CompoundConditionBuilder,
        join_variable: &Variable,
        order_by: Option<&OrderByProperty>,
    ) -> CompileResult<Condition>;
}

#[cfg(test)]
pub(crate) mod test_support;

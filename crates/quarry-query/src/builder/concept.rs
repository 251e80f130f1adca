//! Builder for concepts, which are expanded like macros.

use super::{CompoundConditionBuilder, ConditionBuilder, OrderByProperty};
use crate::condition::Condition;
use crate::description::{Description, DescriptionKind};
use crate::error::{CompileError, CompileResult};
use crate::value::Variable;
use tracing::{debug, warn};

/// Compiles a concept by compiling its stored definition in its place.
pub struct ConceptConditionBuilder;

impl ConditionBuilder for ConceptConditionBuilder {
    fn name(&self) -> &'static str {
        "concept"
    }

    fn handles(&self, kind: DescriptionKind) -> bool {
        kind == DescriptionKind::Concept
    }

    fn build_condition(
        &self,
        description: &Description,
        compiler: &mut CompoundConditionBuilder,
        join_variable: &Variable,
        order_by: Option<&OrderByProperty>,
    ) -> CompileResult<Condition> {
        let Description::Concept { concept } = description else {
            return Err(CompileError::UnexpectedDescription {
                builder: self.name(),
                kind: description.kind(),
            });
        };

        let Some(definition) = compiler.concepts().lookup_concept(concept) else {
            debug!(%concept, "Concept has no definition");
            return Ok(Condition::unsatisfiable());
        };

        if !compiler.enter_concept(concept) {
            warn!(%concept, "Concept definition refers back to itself");
            return Ok(Condition::unsatisfiable());
        }
        let condition = compiler.compile(&definition, join_variable, order_by);
        compiler.leave_concept();
        condition
    }
}

#[cfg(test)]
mod tests {
    use crate::builder::test_support::compiler;
    use crate::condition::ConditionKind;
    use crate::description::Description;
    use crate::value::{EntityRef, Variable};

    #[test]
    fn test_concept_expands_definition() {
        let mut compiler = compiler();
        let expanded = compiler
            .compile(
                &Description::concept(EntityRef::concept("Big cities")),
                &Variable::new("result"),
                None,
            )
            .unwrap();

        assert!(matches!(expanded.kind, ConditionKind::Where { .. }));
        assert_eq!(
            expanded.to_string(),
            "WHERE { ?result rdf:type hierarchy-of#0(5) . FILTER( index(?result) >= 1000000 ) }"
        );
    }

    #[test]
    fn test_missing_concept_is_false() {
        let condition = compiler()
            .compile(
                &Description::concept(EntityRef::concept("Unknown")),
                &Variable::new("result"),
                None,
            )
            .unwrap();
        assert!(condition.is_false());
    }

    #[test]
    fn test_self_referencing_concept_is_false() {
        let condition = compiler()
            .compile(
                &Description::concept(EntityRef::concept("Loop")),
                &Variable::new("result"),
                None,
            )
            .unwrap();
        assert!(condition.is_false());
    }

    #[test]
    fn test_concept_may_be_used_twice() {
        let big = Description::concept(EntityRef::concept("Big cities"));
        let condition = compiler()
            .compile(
                &Description::and([big.clone(), big]),
                &Variable::new("result"),
                None,
            )
            .unwrap();
        assert!(!condition.is_false());
    }
}

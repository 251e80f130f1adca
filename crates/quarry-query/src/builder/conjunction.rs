//! Builder for conjunctions.

use super::{CompoundConditionBuilder, ConditionBuilder, OrderByProperty};
use crate::condition::{
    Condition, ConditionKind, FilterExpr, GraphPattern, PatternElement, SideChannels,
};
use crate::description::{Description, DescriptionKind};
use crate::error::{CompileError, CompileResult};
use crate::value::{ResourceRef, Variable};
use std::ops::ControlFlow;
use tracing::debug;

/// Compiles `Conjunction` descriptions by merging the children's conditions
/// on the shared join variable.
///
/// An unsatisfiable child, or two children binding the variable to different
/// resources, make the whole conjunction `False`.
pub struct ConjunctionConditionBuilder;

impl ConditionBuilder for ConjunctionConditionBuilder {
    fn name(&self) -> &'static str {
        "conjunction"
    }

    fn handles(&self, kind: DescriptionKind) -> bool {
        kind == DescriptionKind::Conjunction
    }

    fn build_condition(
        &self,
        description: &Description,
        compiler: &mut CompoundConditionBuilder,
        join_variable: &Variable,
        order_by: Option<&OrderByProperty>,
    ) -> CompileResult<Condition> {
        let Description::Conjunction { children } = description else {
            return Err(CompileError::UnexpectedDescription {
                builder: self.name(),
                kind: description.kind(),
            });
        };

        match children.as_slice() {
            [] => return Ok(compiler.build_true_condition(join_variable, order_by)),
            [only] => return compiler.compile(only, join_variable, order_by),
            _ => {}
        }

        let checkpoint = compiler.subquery_checkpoint();
        let mut fold = ConjunctionFold::default();
        for child in children {
            let condition = compiler.compile(child, join_variable, None)?;
            fold = match fold.absorb(condition, join_variable) {
                ControlFlow::Continue(fold) => fold,
                ControlFlow::Break(()) => {
                    compiler.rollback_subqueries(checkpoint);
                    return Ok(Condition::unsatisfiable());
                }
            };
        }

        let mut condition = fold.finish();
        compiler.add_requested_order_by(&mut condition, join_variable, order_by);
        Ok(condition)
    }
}

/// Running state of a conjunction merge.
#[derive(Debug, Default)]
struct ConjunctionFold {
    pattern: GraphPattern,
    filter: FilterExpr,
    singleton: Option<ResourceRef>,
    side: SideChannels,
}

impl ConjunctionFold {
    /// Merge one child's condition. Breaks when the conjunction can no longer
    /// match anything.
    fn absorb(mut self, condition: Condition, join_variable: &Variable) -> ControlFlow<(), Self> {
        match condition.kind {
            ConditionKind::False => return ControlFlow::Break(()),
            ConditionKind::True => {}
            ConditionKind::Where { pattern } => self.pattern.append(pattern),
            ConditionKind::Filter { filter } => self.filter.and(filter),
            ConditionKind::Singleton { value, pattern } => {
                if let Some(bound) = &self.singleton {
                    if bound.canonical() != value.canonical() {
                        debug!(%bound, conflicting = %value, "Conflicting bindings in conjunction");
                        return ControlFlow::Break(());
                    }
                } else {
                    self.singleton = Some(value);
                }
                self.pattern.append(pattern);
            }
            ConditionKind::Alternatives { ref branches } => {
                let groups = branches
                    .iter()
                    .filter_map(|branch| branch.to_group(join_variable))
                    .collect();
                self.pattern.push(PatternElement::Union { groups });
            }
        }
        self.side.absorb(condition.side);
        ControlFlow::Continue(self)
    }

    fn finish(self) -> Condition {
        let Self {
            mut pattern,
            filter,
            singleton,
            side,
        } = self;

        let kind = match singleton {
            Some(value) => {
                pattern.push_filter(filter);
                ConditionKind::Singleton { value, pattern }
            }
            None if pattern.is_empty() && filter.is_empty() => ConditionKind::True,
            None if pattern.is_empty() => ConditionKind::Filter { filter },
            None => {
                pattern.push_filter(filter);
                ConditionKind::Where { pattern }
            }
        };
        Condition::new(kind).with_side_channels(side)
    }
}

#[cfg(test)]
mod tests {
    use crate::builder::test_support::{compiler, compiler_with};
    use crate::builder::OrderByProperty;
    use crate::condition::ConditionKind;
    use crate::description::Description;
    use crate::sort::{RequestedSort, SortDirection, SortKeyTable, MAIN_SUBJECT};
    use crate::value::{
        Comparator, DataValue, EntityRef, PropertyRef, ResourceRef, ValueType, Variable, Vocabulary,
    };
    use quarry_config::CompilerConfig;

    fn result() -> Variable {
        Variable::new("result")
    }

    fn age(comparator: Comparator, n: f64) -> Description {
        Description::value(PropertyRef::new("Age"), comparator, DataValue::Number(n))
    }

    fn named(property: &str, title: &str) -> Description {
        Description::value(PropertyRef::new(property), Comparator::Eq, ResourceRef::page(title))
    }

    #[test]
    fn test_empty_conjunction_is_true() {
        let condition = compiler()
            .compile(&Description::and([]), &result(), None)
            .unwrap();
        assert_eq!(condition.kind, ConditionKind::True);
    }

    #[test]
    fn test_empty_conjunction_keeps_order_by() {
        let mut compiler = compiler();
        let sort_keys =
            SortKeyTable::from_requested(&[RequestedSort::main_subject(SortDirection::Asc)]);
        let condition = compiler
            .compile_root(&Description::and([]), &result(), sort_keys)
            .unwrap();

        assert!(condition.is_true());
        assert_eq!(condition.order_variables()[MAIN_SUBJECT], Variable::new("resultsk"));
    }

    #[test]
    fn test_single_child_is_compiled_directly() {
        let condition = compiler()
            .compile(&Description::and([age(Comparator::Geq, 18.0)]), &result(), None)
            .unwrap();
        assert_eq!(condition.to_string(), "FILTER( index(?result) >= 18 )");
    }

    #[test]
    fn test_filters_merge_into_one() {
        let description = Description::and([age(Comparator::Geq, 18.0), age(Comparator::Leq, 65.0)]);
        let condition = compiler().compile(&description, &result(), None).unwrap();

        insta::assert_snapshot!(
            condition.to_string(),
            @"FILTER( index(?result) >= 18 && index(?result) <= 65 )"
        );
        assert!(!condition.is_safe());
    }

    #[test]
    fn test_patterns_then_trailing_filter() {
        let description = Description::and([
            age(Comparator::Less, 30.0),
            Description::namespace(EntityRef::MAIN_NAMESPACE),
            Description::class([EntityRef::category("Cities")]),
        ]);
        let condition = compiler_with(CompilerConfig {
            category_hierarchy_depth: 0,
            ..Default::default()
        })
        .compile(&description, &result(), None)
        .unwrap();

        insta::assert_snapshot!(
            condition.to_string(),
            @"WHERE { ?result swivt:wikiNamespace 0 . ?result rdf:type category(5) . FILTER( index(?result) < 30 ) }"
        );
        assert!(condition.is_safe());
    }

    #[test]
    fn test_true_children_are_skipped() {
        let description = Description::and([Description::Thing, age(Comparator::Geq, 18.0)]);
        let condition = compiler().compile(&description, &result(), None).unwrap();
        assert_eq!(condition.to_string(), "FILTER( index(?result) >= 18 )");
    }

    #[test]
    fn test_all_true_children_give_true() {
        let description = Description::and([Description::Thing, Description::Thing]);
        let condition = compiler().compile(&description, &result(), None).unwrap();
        assert!(condition.is_true());
    }

    #[test]
    fn test_false_child_poisons_conjunction() {
        let description = Description::and([
            age(Comparator::Geq, 18.0),
            Description::class([EntityRef::category("Nowhere")]),
            Description::namespace(0),
        ]);
        let condition = compiler().compile(&description, &result(), None).unwrap();
        assert!(condition.is_false());
        assert!(condition.order_variables().is_empty());
    }

    #[test]
    fn test_conflicting_singletons_are_false() {
        let description = Description::and([named("Name", "Alice"), named("Has spouse", "Bob")]);
        let condition = compiler().compile(&description, &result(), None).unwrap();
        assert!(condition.is_false());
    }

    #[test]
    fn test_agreeing_singletons_merge() {
        let description = Description::and([
            named("Name", "Ada Lovelace"),
            age(Comparator::Geq, 18.0),
            // Same page, spelled with an underscore
            named("Has spouse", "Ada_Lovelace"),
        ]);
        let condition = compiler().compile(&description, &result(), None).unwrap();

        assert_eq!(
            condition.singleton_value(),
            Some(&ResourceRef::page("Ada Lovelace"))
        );
        assert_eq!(
            condition.to_string(),
            "SINGLETON wiki:Ada_Lovelace { FILTER( index(?result) >= 18 ) }"
        );
        assert!(condition.is_safe());
    }

    #[test]
    fn test_nested_disjunction_becomes_union() {
        let description = Description::and([
            Description::namespace(0),
            Description::or([age(Comparator::Less, 10.0), age(Comparator::Greater, 90.0)]),
        ]);
        let condition = compiler().compile(&description, &result(), None).unwrap();

        insta::assert_snapshot!(
            condition.to_string(),
            @"WHERE { ?result swivt:wikiNamespace 0 . { FILTER( index(?result) < 10 ) } UNION { FILTER( index(?result) > 90 ) } }"
        );
    }

    #[test]
    fn test_side_channels_are_merged() {
        let foaf = Vocabulary::new("foaf", "http://xmlns.com/foaf/0.1/");
        let dc = Vocabulary::new("dc", "http://purl.org/dc/terms/");
        let description = Description::and([
            Description::value(
                PropertyRef::new("Type"),
                Comparator::Eq,
                ResourceRef::external(foaf, "Person"),
            ),
            Description::some_property(
                PropertyRef::new("Has child").imported_from(dc),
                Description::Thing,
            ),
        ]);
        let condition = compiler().compile(&description, &result(), None).unwrap();

        let prefixes: Vec<_> = condition.namespaces().keys().cloned().collect();
        assert_eq!(prefixes, vec!["dc".to_string(), "foaf".to_string()]);
        assert!(condition.is_safe());
    }

    #[test]
    fn test_order_by_applies_to_whole_conjunction() {
        let mut compiler = compiler();
        let sort_keys =
            SortKeyTable::from_requested(&[RequestedSort::new("Age", SortDirection::Desc)]);
        compiler
            .compile_root(&Description::Thing, &result(), sort_keys)
            .unwrap();

        let order_by = OrderByProperty::new("Age", ValueType::Number);
        let condition = compiler
            .compile(
                &Description::and([age(Comparator::Geq, 18.0), age(Comparator::Leq, 65.0)]),
                &Variable::new("v3"),
                Some(&order_by),
            )
            .unwrap();

        assert_eq!(condition.order_variables()["Age"], Variable::new("v3"));
        assert!(condition.weak().is_empty());
    }

    #[test]
    fn test_unsatisfiable_conjunction_registers_no_subqueries() {
        let mut compiler = compiler();
        compiler
            .compile(&Description::class([EntityRef::category("Capitals")]), &result(), None)
            .unwrap();

        let description = Description::and([
            Description::class([EntityRef::category("Cities")]),
            Description::class([EntityRef::category("Nowhere")]),
        ]);
        let condition = compiler.compile(&description, &result(), None).unwrap();

        assert!(condition.is_false());
        assert_eq!(compiler.subqueries().len(), 1);
    }
}

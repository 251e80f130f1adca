//! Property tests for the conjunction/disjunction merge algebra.
//!
//! Leaves are drawn from a fixed catalog so that the shape each one compiles
//! to is known in advance.

use proptest::prelude::*;
use quarry_query::{
    Comparator, Condition, ConditionKind, CompilerConfig, DataValue, Description, EntityRef,
    InMemoryCatalog, PatternElement, PropertyRef, QueryCompiler, ResourceRef, ValueType,
};
use std::sync::Arc;

fn compiler() -> QueryCompiler {
    let catalog = InMemoryCatalog::new()
        .with_category(EntityRef::category("Cities"), 5)
        .with_category(EntityRef::category("Capitals"), 7)
        .with_property("Age", ValueType::Number)
        .with_property("Name", ValueType::Page);
    // Without hierarchy ids the rendering of a clause does not depend on the
    // order it was compiled in.
    let config = CompilerConfig {
        category_hierarchy_depth: 0,
        property_hierarchy_depth: 0,
        ..Default::default()
    };
    QueryCompiler::with_catalog(Arc::new(catalog), config).unwrap()
}

fn compile(description: &Description) -> Condition {
    compiler().compile(description, &[]).unwrap().condition
}

// ============================================================================
// GENERATORS
// ============================================================================

fn comparator_strategy() -> impl Strategy<Value = Comparator> {
    prop::sample::select(vec![
        Comparator::Eq,
        Comparator::Less,
        Comparator::Greater,
        Comparator::Leq,
        Comparator::Geq,
        Comparator::Neq,
    ])
}

/// Leaves that never compile to `False` and never bind conflicting values.
fn satisfiable_leaf() -> impl Strategy<Value = Description> {
    prop_oneof![
        Just(Description::Thing),
        (0i32..4).prop_map(Description::namespace),
        prop::sample::select(vec!["Cities", "Capitals"])
            .prop_map(|title| Description::class([EntityRef::category(title)])),
        (comparator_strategy(), 0u8..100).prop_map(|(comparator, n)| {
            Description::value(PropertyRef::new("Age"), comparator, DataValue::Number(n.into()))
        }),
        Just(Description::value(
            PropertyRef::new("Name"),
            Comparator::Eq,
            ResourceRef::page("Alice"),
        )),
    ]
}

fn unsatisfiable_leaf() -> impl Strategy<Value = Description> {
    prop_oneof![
        Just(Description::class([EntityRef::category("Nowhere")])),
        Just(Description::class([])),
        Just(Description::or([])),
    ]
}

/// Rendered atomic clauses of a condition, sorted.
fn clause_set(condition: &Condition) -> Vec<String> {
    fn pattern_clauses(elements: &[PatternElement], out: &mut Vec<String>) {
        for element in elements {
            match element {
                PatternElement::Filter { filter } => {
                    out.extend(filter.atoms().iter().map(ToString::to_string))
                }
                other => out.push(other.to_string()),
            }
        }
    }

    let mut clauses = Vec::new();
    match &condition.kind {
        ConditionKind::True | ConditionKind::False => {}
        ConditionKind::Where { pattern } => pattern_clauses(&pattern.elements, &mut clauses),
        ConditionKind::Filter { filter } => {
            clauses.extend(filter.atoms().iter().map(ToString::to_string))
        }
        ConditionKind::Singleton { value, pattern } => {
            clauses.push(format!("= {}", value));
            pattern_clauses(&pattern.elements, &mut clauses);
        }
        ConditionKind::Alternatives { branches } => {
            clauses.extend(branches.iter().map(ToString::to_string))
        }
    }
    clauses.sort();
    clauses
}

// ============================================================================
// SHORT-CIRCUIT
// ============================================================================

proptest! {
    #[test]
    fn conjunction_with_false_child_is_false(
        children in prop::collection::vec(satisfiable_leaf(), 0..6),
        poison in unsatisfiable_leaf(),
        at in any::<prop::sample::Index>(),
    ) {
        let mut children = children;
        let index = at.index(children.len() + 1);
        children.insert(index, poison);

        let condition = compile(&Description::and(children));
        prop_assert!(condition.is_false(), "got {}", condition);
    }
}

// ============================================================================
// ABSORPTION
// ============================================================================

proptest! {
    #[test]
    fn disjunction_with_true_child_is_true(
        children in prop::collection::vec(
            prop_oneof![satisfiable_leaf(), unsatisfiable_leaf()],
            0..6,
        ),
        at in any::<prop::sample::Index>(),
    ) {
        let mut children = children;
        let index = at.index(children.len() + 1);
        children.insert(index, Description::Thing);

        let condition = compile(&Description::or(children));
        prop_assert!(condition.is_true(), "got {}", condition);
    }

    #[test]
    fn disjunction_drops_false_children(
        children in prop::collection::vec(satisfiable_leaf(), 1..4),
        poison in unsatisfiable_leaf(),
    ) {
        let mut with_poison = children.clone();
        with_poison.push(poison);

        prop_assert_eq!(
            compile(&Description::or(with_poison)),
            compile(&Description::or(children))
        );
    }
}

// ============================================================================
// REORDERING
// ============================================================================

proptest! {
    #[test]
    fn conjunction_clause_set_ignores_child_order(
        (children, shuffled) in prop::collection::vec(satisfiable_leaf(), 2..7)
            .prop_flat_map(|children| {
                let shuffled = Just(children.clone()).prop_shuffle();
                (Just(children), shuffled)
            }),
    ) {
        let original = compile(&Description::and(children));
        let reordered = compile(&Description::and(shuffled));

        prop_assert_eq!(original.is_safe(), reordered.is_safe());
        prop_assert_eq!(
            std::mem::discriminant(&original.kind),
            std::mem::discriminant(&reordered.kind)
        );
        prop_assert_eq!(clause_set(&original), clause_set(&reordered));
    }
}

// ============================================================================
// SINGLETON CONFLICTS
// ============================================================================

proptest! {
    #[test]
    fn distinct_bindings_conflict(a in "[A-Z][a-z]{1,8}", b in "[A-Z][a-z]{1,8}") {
        let bind = |title: &str| {
            Description::value(PropertyRef::new("Name"), Comparator::Eq, ResourceRef::page(title))
        };
        let condition = compile(&Description::and([bind(a.as_str()), bind(b.as_str())]));

        if a == b {
            prop_assert_eq!(condition.singleton_value(), Some(&ResourceRef::page(a.as_str())));
        } else {
            prop_assert!(condition.is_false());
        }
    }
}

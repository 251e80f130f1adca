//! Shared fixtures for builder tests.

use super::CompoundConditionBuilder;
use crate::catalog::InMemoryCatalog;
use crate::description::Description;
use crate::value::{Comparator, EntityRef, PropertyRef, ValueType};
use quarry_config::CompilerConfig;
use std::sync::Arc;

/// Categories `Cities` (5) and `Capitals` (7); page properties
/// `Has spouse`, `Name`, `Located in`, `Has child`; inline properties `Age`,
/// `Population`, `Nickname`; concepts `Big cities` and the self-referencing
/// `Loop`.
pub(crate) fn catalog() -> InMemoryCatalog {
    InMemoryCatalog::new()
        .with_category(EntityRef::category("Cities"), 5)
        .with_category(EntityRef::category("Capitals"), 7)
        .with_property("Has spouse", ValueType::Page)
        .with_property("Name", ValueType::Page)
        .with_property("Located in", ValueType::Page)
        .with_property("Has child", ValueType::Page)
        .with_property("Age", ValueType::Number)
        .with_property("Population", ValueType::Number)
        .with_property("Nickname", ValueType::Text)
        .with_concept(
            EntityRef::concept("Big cities"),
            Description::and([
                Description::class([EntityRef::category("Cities")]),
                Description::value(
                    PropertyRef::new("Population"),
                    Comparator::Geq,
                    crate::value::DataValue::Number(1_000_000.0),
                ),
            ]),
        )
        .with_concept(
            EntityRef::concept("Loop"),
            Description::concept(EntityRef::concept("Loop")),
        )
}

pub(crate) fn compiler_with(config: CompilerConfig) -> CompoundConditionBuilder {
    let catalog = Arc::new(catalog());
    CompoundConditionBuilder::builder(catalog.clone(), catalog)
        .with_default_builders()
        .with_config(config)
        .build()
        .expect("default registry is complete")
}

pub(crate) fn compiler() -> CompoundConditionBuilder {
    compiler_with(CompilerConfig::default())
}

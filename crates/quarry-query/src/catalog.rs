//! Collaborators the compiler consults while building conditions.
//!
//! Identifier resolution and concept lookup are backed by the storage layer
//! in production. [`InMemoryCatalog`] implements them over plain maps for
//! embedding and tests.

use crate::description::Description;
use crate::value::{CategoryId, EntityRef, PropertyId, PropertyRef, ValueType};
use std::collections::HashMap;

/// Storage location and type of a resolved property.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PropertyInfo {
    pub id: PropertyId,
    pub value_type: ValueType,
}

/// Resolves categories and properties to their internal ids.
pub trait EntityResolver: Send + Sync {
    fn resolve_category(&self, category: &EntityRef) -> Option<CategoryId>;

    fn resolve_property(&self, property: &PropertyRef) -> Option<PropertyInfo>;
}

/// Source of concept definitions.
pub trait ConceptStore: Send + Sync {
    /// The stored query defining `concept`, if any.
    fn lookup_concept(&self, concept: &EntityRef) -> Option<Description>;
}

/// Physical fields to compare and sort on for a property's values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValueFields {
    pub index_field: String,
    pub sort_field: String,
}

pub trait ValueHandler: Send + Sync {
    fn fields(&self, property: &PropertyRef, value_type: ValueType) -> ValueFields;
}

/// Compares on `index` and sorts on `sortkey` for every property and type.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultValueHandler;

impl ValueHandler for DefaultValueHandler {
    fn fields(&self, _property: &PropertyRef, _value_type: ValueType) -> ValueFields {
        ValueFields {
            index_field: "index".to_string(),
            sort_field: "sortkey".to_string(),
        }
    }
}

/// Map-backed resolver and concept store.
#[derive(Debug, Clone, Default)]
pub struct InMemoryCatalog {
    categories: HashMap<EntityRef, CategoryId>,
    properties: HashMap<String, PropertyInfo>,
    concepts: HashMap<EntityRef, Description>,
    next_id: u64,
}

impl InMemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a category under an explicit id.
    pub fn with_category(mut self, category: EntityRef, id: u64) -> Self {
        self.categories.insert(category, CategoryId(id));
        self
    }

    /// Register a property, allocating its id.
    pub fn with_property(mut self, key: impl Into<String>, value_type: ValueType) -> Self {
        self.next_id += 1;
        self.properties.insert(
            key.into(),
            PropertyInfo {
                id: PropertyId(self.next_id),
                value_type,
            },
        );
        self
    }

    pub fn with_concept(mut self, concept: EntityRef, definition: Description) -> Self {
        self.concepts.insert(concept, definition);
        self
    }
}

impl EntityResolver for InMemoryCatalog {
    fn resolve_category(&self, category: &EntityRef) -> Option<CategoryId> {
        self.categories.get(category).copied()
    }

    fn resolve_property(&self, property: &PropertyRef) -> Option<PropertyInfo> {
        self.properties.get(&property.key).copied()
    }
}

impl ConceptStore for InMemoryCatalog {
    fn lookup_concept(&self, concept: &EntityRef) -> Option<Description> {
        self.concepts.get(concept).cloned()
    }
}

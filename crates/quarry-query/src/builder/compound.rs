//! The recursive compile driver and its builder registry.

use super::order_by::{attach_order_by, OrderByProperty};
use super::{
    ClassConditionBuilder, ConceptConditionBuilder, ConditionBuilder,
    ConjunctionConditionBuilder, DisjunctionConditionBuilder, NamespaceConditionBuilder,
    SomePropertyConditionBuilder, ThingConditionBuilder, ValueConditionBuilder,
};
use crate::arena::{Subquery, SubqueryArena, SubqueryId};
use crate::catalog::{
    ConceptStore, DefaultValueHandler, EntityResolver, ValueFields, ValueHandler,
};
use crate::condition::Condition;
use crate::description::{Description, DescriptionKind};
use crate::error::{CompileError, CompileResult};
use crate::sort::{SortKeyTable, MAIN_SUBJECT};
use crate::value::{EntityRef, PropertyRef, ValueType, Variable};
use quarry_config::CompilerConfig;
use std::sync::Arc;
use tracing::{debug, trace};

/// Dispatches descriptions to registered builders and holds the state of
/// one top-level compile: fresh-variable counter, sub-query arena, sort keys
/// and the concepts currently being expanded.
pub struct CompoundConditionBuilder {
    builders: Vec<Arc<dyn ConditionBuilder>>,
    resolver: Arc<dyn EntityResolver>,
    concepts: Arc<dyn ConceptStore>,
    value_handler: Arc<dyn ValueHandler>,
    config: CompilerConfig,
    sort_keys: SortKeyTable,
    subqueries: SubqueryArena,
    variable_counter: usize,
    expanding_concepts: Vec<EntityRef>,
}

impl CompoundConditionBuilder {
    pub fn builder(
        resolver: Arc<dyn EntityResolver>,
        concepts: Arc<dyn ConceptStore>,
    ) -> CompoundConditionBuilderBuilder {
        CompoundConditionBuilderBuilder::new(resolver, concepts)
    }

    /// Compile a whole query rooted at `join_variable`.
    ///
    /// Resets the per-query state and installs `sort_keys` first; a sort on
    /// [`MAIN_SUBJECT`] is applied to the root.
    pub fn compile_root(
        &mut self,
        description: &Description,
        join_variable: &Variable,
        sort_keys: SortKeyTable,
    ) -> CompileResult<Condition> {
        self.reset();
        self.sort_keys = sort_keys;

        let order_by = self
            .sort_keys
            .contains(MAIN_SUBJECT)
            .then(OrderByProperty::main_subject);

        debug!(
            root = %description.kind(),
            depth = description.depth(),
            sort_keys = self.sort_keys.len(),
            "Compiling query description"
        );
        self.compile(description, join_variable, order_by.as_ref())
    }

    /// Compile `description` on `join_variable` with the first registered
    /// builder that accepts it.
    pub fn compile(
        &mut self,
        description: &Description,
        join_variable: &Variable,
        order_by: Option<&OrderByProperty>,
    ) -> CompileResult<Condition> {
        let builder = self
            .builders
            .iter()
            .find(|builder| builder.can_build_condition_for(description))
            .cloned()
            .ok_or_else(|| CompileError::NoBuilder {
                kind: description.kind(),
                tried: self.builder_names(),
            })?;

        trace!(
            builder = builder.name(),
            kind = %description.kind(),
            join = %join_variable,
            "Building condition"
        );
        builder.build_condition(description, self, join_variable, order_by)
    }

    /// A `True` condition that still carries order-by data for
    /// `join_variable`, so unconstrained branches can be sorted.
    pub fn build_true_condition(
        &self,
        join_variable: &Variable,
        order_by: Option<&OrderByProperty>,
    ) -> Condition {
        let mut condition = Condition::unconstrained();
        self.add_requested_order_by(&mut condition, join_variable, order_by);
        condition
    }

    /// Record sort data for a condition that does not know the type of its
    /// join variable's values; the requested sort supplies it.
    pub fn add_requested_order_by(
        &self,
        condition: &mut Condition,
        join_variable: &Variable,
        order_by: Option<&OrderByProperty>,
    ) {
        let value_type = order_by.map_or(ValueType::Page, |order_by| order_by.value_type);
        self.add_order_by_data(condition, join_variable, order_by, value_type);
    }

    /// Record sort data for `join_variable` whose values are of `value_type`.
    pub fn add_order_by_data(
        &self,
        condition: &mut Condition,
        join_variable: &Variable,
        order_by: Option<&OrderByProperty>,
        value_type: ValueType,
    ) {
        attach_order_by(
            condition,
            join_variable,
            order_by,
            value_type,
            &self.sort_keys,
            &self.config.sort_key_suffix,
        );
    }

    /// Allocate a fresh join variable.
    pub fn next_variable(&mut self) -> Variable {
        self.variable_counter += 1;
        Variable::new(format!(
            "{}{}",
            self.config.variable_prefix, self.variable_counter
        ))
    }

    pub fn register_subquery(&mut self, subquery: Subquery) -> SubqueryId {
        self.subqueries.alloc(subquery)
    }

    /// Position in the arena to roll back to if the condition being built
    /// turns out to be discarded.
    pub fn subquery_checkpoint(&self) -> usize {
        self.subqueries.len()
    }

    /// Forget sub-queries registered since `checkpoint`.
    pub fn rollback_subqueries(&mut self, checkpoint: usize) {
        if self.subqueries.len() > checkpoint {
            trace!(
                discarded = self.subqueries.len() - checkpoint,
                "Discarding sub-queries of dropped condition"
            );
            self.subqueries.truncate(checkpoint);
        }
    }

    pub fn subqueries(&self) -> &SubqueryArena {
        &self.subqueries
    }

    /// Hand the arena of the finished compile to the caller.
    pub fn take_subqueries(&mut self) -> SubqueryArena {
        std::mem::take(&mut self.subqueries)
    }

    pub fn resolver(&self) -> &dyn EntityResolver {
        self.resolver.as_ref()
    }

    pub fn concepts(&self) -> &dyn ConceptStore {
        self.concepts.as_ref()
    }

    pub fn value_fields(&self, property: &PropertyRef, value_type: ValueType) -> ValueFields {
        self.value_handler.fields(property, value_type)
    }

    pub fn sort_keys(&self) -> &SortKeyTable {
        &self.sort_keys
    }

    pub fn config(&self) -> &CompilerConfig {
        &self.config
    }

    pub fn builder_names(&self) -> Vec<&'static str> {
        self.builders.iter().map(|builder| builder.name()).collect()
    }

    /// Mark `concept` as being expanded. Returns `false` if it already is,
    /// i.e. the concept's definition refers back to itself.
    pub(crate) fn enter_concept(&mut self, concept: &EntityRef) -> bool {
        if self.expanding_concepts.contains(concept) {
            return false;
        }
        self.expanding_concepts.push(concept.clone());
        true
    }

    pub(crate) fn leave_concept(&mut self) {
        self.expanding_concepts.pop();
    }

    fn reset(&mut self) {
        self.variable_counter = 0;
        self.subqueries.clear();
        self.expanding_concepts.clear();
        self.sort_keys = SortKeyTable::new();
    }
}

/// Builder for ergonomic registry construction
pub struct CompoundConditionBuilderBuilder {
    builders: Vec<Arc<dyn ConditionBuilder>>,
    resolver: Arc<dyn EntityResolver>,
    concepts: Arc<dyn ConceptStore>,
    value_handler: Arc<dyn ValueHandler>,
    config: CompilerConfig,
}

impl CompoundConditionBuilderBuilder {
    pub fn new(resolver: Arc<dyn EntityResolver>, concepts: Arc<dyn ConceptStore>) -> Self {
        Self {
            builders: Vec::new(),
            resolver,
            concepts,
            value_handler: Arc::new(DefaultValueHandler),
            config: CompilerConfig::default(),
        }
    }

    /// Register a builder after those already registered.
    pub fn with_builder(mut self, builder: impl ConditionBuilder + 'static) -> Self {
        self.builders.push(Arc::new(builder));
        self
    }

    /// Register the builders for every description kind.
    pub fn with_default_builders(self) -> Self {
        self.with_builder(ThingConditionBuilder)
            .with_builder(NamespaceConditionBuilder)
            .with_builder(ClassConditionBuilder)
            .with_builder(ConceptConditionBuilder)
            .with_builder(ValueConditionBuilder)
            .with_builder(SomePropertyConditionBuilder)
            .with_builder(ConjunctionConditionBuilder)
            .with_builder(DisjunctionConditionBuilder)
    }

    pub fn with_value_handler(mut self, value_handler: Arc<dyn ValueHandler>) -> Self {
        self.value_handler = value_handler;
        self
    }

    pub fn with_config(mut self, config: CompilerConfig) -> Self {
        self.config = config;
        self
    }

    /// Validate the configuration and check that every description kind has
    /// a builder.
    pub fn build(self) -> CompileResult<CompoundConditionBuilder> {
        self.config.validate()?;

        for kind in DescriptionKind::ALL {
            if !self.builders.iter().any(|builder| builder.handles(kind)) {
                return Err(CompileError::MissingBuilder { kind });
            }
        }

        Ok(CompoundConditionBuilder {
            builders: self.builders,
            resolver: self.resolver,
            concepts: self.concepts,
            value_handler: self.value_handler,
            config: self.config,
            sort_keys: SortKeyTable::new(),
            subqueries: SubqueryArena::new(),
            variable_counter: 0,
            expanding_concepts: Vec::new(),
        })
    }
}

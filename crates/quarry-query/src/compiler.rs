//! Query-level entry point.

use crate::arena::SubqueryArena;
use crate::builder::CompoundConditionBuilder;
use crate::catalog::{ConceptStore, EntityResolver};
use crate::condition::Condition;
use crate::description::Description;
use crate::error::CompileResult;
use crate::sort::{RequestedSort, SortKeyTable};
use crate::value::Variable;
use quarry_config::CompilerConfig;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::debug;

/// Everything the executor needs to run one query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompiledQuery {
    pub condition: Condition,
    /// Hierarchy closures referenced from `condition` by id.
    pub subqueries: SubqueryArena,
    pub sort_keys: SortKeyTable,
    /// Variable the result entities are bound to.
    pub result_variable: Variable,
}

impl CompiledQuery {
    /// The query cannot match anything; the executor may skip it.
    pub fn is_empty(&self) -> bool {
        self.condition.is_false()
    }

    /// Pretty-printed JSON form, for handing to an out-of-process executor
    /// or for inspection.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

/// Compiles query descriptions, one at a time, with a fixed builder registry.
///
/// ```rust
/// use quarry_query::{
///     Comparator, DataValue, Description, InMemoryCatalog, PropertyRef, QueryCompiler,
///     ValueType,
/// };
/// use std::sync::Arc;
///
/// let catalog = Arc::new(InMemoryCatalog::new().with_property("Age", ValueType::Number));
/// let mut compiler = QueryCompiler::with_catalog(catalog, Default::default())?;
///
/// let query = compiler.compile(
///     &Description::value(PropertyRef::new("Age"), Comparator::Geq, DataValue::Number(18.0)),
///     &[],
/// )?;
/// assert_eq!(query.condition.to_string(), "FILTER( index(?result) >= 18 )");
/// # Ok::<(), quarry_query::CompileError>(())
/// ```
pub struct QueryCompiler {
    driver: CompoundConditionBuilder,
}

impl QueryCompiler {
    pub fn new(driver: CompoundConditionBuilder) -> Self {
        Self { driver }
    }

    /// Compiler with the default builders over a catalog that both resolves
    /// identifiers and stores concepts.
    pub fn with_catalog<C>(catalog: Arc<C>, config: CompilerConfig) -> CompileResult<Self>
    where
        C: EntityResolver + ConceptStore + 'static,
    {
        let driver = CompoundConditionBuilder::builder(catalog.clone(), catalog)
            .with_default_builders()
            .with_config(config)
            .build()?;
        Ok(Self::new(driver))
    }

    /// Compile `description`, sorting on `requested_sorts`.
    pub fn compile(
        &mut self,
        description: &Description,
        requested_sorts: &[RequestedSort],
    ) -> CompileResult<CompiledQuery> {
        let sort_keys = SortKeyTable::from_requested(requested_sorts);
        let result_variable = Variable::new(self.driver.config().result_variable.as_str());

        let condition =
            self.driver
                .compile_root(description, &result_variable, sort_keys.clone())?;
        let subqueries = self.driver.take_subqueries();

        debug!(
            condition = %condition,
            subqueries = subqueries.len(),
            sorted = condition.order_variables().len(),
            "Compiled query"
        );

        Ok(CompiledQuery {
            condition,
            subqueries,
            sort_keys,
            result_variable,
        })
    }

    pub fn driver(&self) -> &CompoundConditionBuilder {
        &self.driver
    }
}

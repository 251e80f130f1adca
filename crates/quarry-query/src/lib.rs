//! # Quarry Query
//!
//! Compiles backend-neutral query descriptions into conditions for a
//! graph-pattern executor.
//!
//! ## Pipeline
//!
//! ```text
//! Description ──▶ CompoundConditionBuilder ──▶ Condition ──▶ executor
//!                  │ thing, namespace, class,      + sub-queries
//!                  │ concept, value, some_property, + sort keys
//!                  │ conjunction, disjunction
//! ```
//!
//! - **Descriptions** are the parsed query tree ([`Description`]).
//! - **Builders** compile one description kind each and are looked up in an
//!   ordered registry ([`CompoundConditionBuilder`]).
//! - **Conditions** are `True`, `False`, a graph pattern, a post-filter, a
//!   singleton binding or a set of alternatives, plus side channels
//!   ([`Condition`]).
//!
//! Unsatisfiable queries compile to `False` rather than failing; errors are
//! reserved for integration mistakes such as an incomplete registry.

pub mod arena;
pub mod builder;
pub mod catalog;
pub mod compiler;
pub mod condition;
pub mod description;
pub mod error;
pub mod sort;
pub mod value;

pub use arena::{Subquery, SubqueryArena, SubqueryId};
pub use builder::{
    like_pattern_to_regex, CompoundConditionBuilder, ConditionBuilder, OrderByProperty,
};
pub use catalog::{
    ConceptStore, DefaultValueHandler, EntityResolver, InMemoryCatalog, PropertyInfo,
    ValueFields, ValueHandler,
};
pub use compiler::{CompiledQuery, QueryCompiler};
pub use condition::{
    CompareOp, Condition, ConditionKind, FilterAtom, FilterExpr, GraphPattern, Operand,
    PatternElement, SideChannels, Term, TriplePattern,
};
pub use description::{Description, DescriptionKind};
pub use error::{CompileError, CompileResult};
pub use sort::{RequestedSort, SortDirection, SortKeyTable, MAIN_SUBJECT};
pub use value::{
    CategoryId, Comparator, DataValue, EntityRef, PropertyId, PropertyRef, ResourceRef,
    ValueType, Variable, Vocabulary,
};

pub use quarry_config::CompilerConfig;

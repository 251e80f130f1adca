//! Error types for condition compilation
//!
//! Unsatisfiable queries are not errors: they compile to
//! [`ConditionKind::False`](crate::condition::ConditionKind::False). The
//! errors here signal integration mistakes that must not be papered over.

use crate::description::DescriptionKind;
use quarry_config::ConfigError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CompileError {
    /// No registered builder accepted a description.
    #[error("No condition builder for {kind} description (tried: {tried:?})")]
    NoBuilder {
        kind: DescriptionKind,
        tried: Vec<&'static str>,
    },

    /// The registry leaves a description kind uncovered.
    #[error("No condition builder registered for {kind} descriptions")]
    MissingBuilder { kind: DescriptionKind },

    /// A builder was handed a description it does not build.
    #[error("Builder '{builder}' cannot build {kind} descriptions")]
    UnexpectedDescription {
        builder: &'static str,
        kind: DescriptionKind,
    },

    #[error("Invalid compiler configuration: {0}")]
    Config(#[from] ConfigError),
}

/// Result type for compilation
pub type CompileResult<T> = Result<T, CompileError>;

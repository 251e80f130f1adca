//! # Quarry Configuration
//!
//! Typed configuration for the condition compiler, loaded from TOML, YAML
//! or JSON files and validated before use.
//!
//! ```rust,no_run
//! use quarry_config::ConfigLoader;
//!
//! let config = ConfigLoader::load_from_file("quarry.toml")?;
//! assert!(config.compiler.category_hierarchy_depth <= 100);
//! # Ok::<(), quarry_config::ConfigError>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod components;
mod error;
mod loader;

pub use components::*;
pub use error::{ConfigError, ConfigResult};
pub use loader::{ConfigFormat, ConfigLoader, QuarryConfig};

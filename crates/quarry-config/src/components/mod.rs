//! Configuration components
//!
//! One module per configurable subsystem.

pub mod compiler;

pub use compiler::*;

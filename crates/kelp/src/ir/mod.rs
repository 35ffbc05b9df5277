//! Declaration model for kelp modules.
//!
//! This module defines the typed declarations (structs, functions, externs)
//! that sit between the parsed AST and the emitted WebAssembly text, plus the
//! builder that partitions an AST into them.

mod types;
pub use types::*;

pub mod builder;
pub use builder::build_module_info;

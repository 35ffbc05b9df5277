//! Code generation: emits WebAssembly text from the declaration model.
//!
//! # Overview
//!
//! This module walks a [`ModuleInfo`] and builds a single `(module ...)`
//! [`SExpr`] tree, which is then rendered to canonical text.
//!
//! ```text
//!        ModuleInfo
//!            │
//!            ▼
//!   generate_module()
//!     ├─ types::generate_struct_type()   (type $S (struct (field $f T)...))
//!     ├─ types::generate_import()        (import "env" "f" (func $f ...))
//!     ├─ function::generate_function()   (func $f (param ...) (result T)? (local ...) ...)
//!     │    └─ instruction::lower_statement / lower_expression
//!     ├─ export::generate_exports()      (export "f" (func $f))
//!     └─ export::generate_start()        (start $main)
//!            │
//!            ▼
//!      SExpr ──► to_text() ──► WebAssembly text
//! ```
//!
//! # Sub-modules
//!
//! - **`module`**: top-level clause ordering
//! - **`types`**: struct type clauses, import clauses, `unit` result suppression
//! - **`function`**: function clauses and `let` local collection
//! - **`instruction`**: statement and expression lowering
//! - **`export`**: export clauses and the start marker
//!
//! # Key Design Decisions
//!
//! 1. **Left folds for variable-arity operators**: `a + b + c` lowers to
//!    `(i32.add (i32.add a b) c)`. The nesting is part of the output format.
//!
//! 2. **Single argument list per call**: calls with zero or several argument
//!    lists, or whose callee is not a plain name, fail the whole compilation.
//!
//! 3. **Entry point by name**: `main` is located after the model is built and
//!    emitted as `(start $main)` last; it is exported only when public.

pub mod export;
pub mod function;
pub mod instruction;
pub mod module;
pub mod types;

use crate::error::LoweringError;
use crate::ir::*;
use crate::sexpr::SExpr;
use tracing::debug;

/// Import module name used when none is configured.
pub const DEFAULT_IMPORT_MODULE: &str = "env";

/// Orchestrates emission of WebAssembly text from the declaration model.
///
/// # Example
///
/// ```ignore
/// let codegen = CodeGenerator::new("env");
/// let wat = codegen.generate_wat(&module_info)?;
/// ```
pub struct CodeGenerator<'a> {
    import_module: &'a str,
}

impl<'a> CodeGenerator<'a> {
    /// Create a code generator that places all imports under `import_module`.
    pub fn new(import_module: &'a str) -> Self {
        CodeGenerator { import_module }
    }

    /// Build the `(module ...)` tree.
    pub fn generate_module(&self, info: &ModuleInfo) -> Result<SExpr, LoweringError> {
        module::generate_module(info, self.import_module)
    }

    /// Build and render the module as canonical WebAssembly text.
    pub fn generate_wat(&self, info: &ModuleInfo) -> Result<String, LoweringError> {
        let wat = self.generate_module(info)?.to_text();
        debug!(bytes = wat.len(), "emitted WebAssembly text");
        Ok(wat)
    }
}

impl Default for CodeGenerator<'_> {
    fn default() -> Self {
        CodeGenerator::new(DEFAULT_IMPORT_MODULE)
    }
}

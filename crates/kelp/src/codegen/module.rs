//! Module-level code generation.
//!
//! Assembles the top-level clauses in a fixed order:
//! types, imports, functions, exports, then the start marker.

use crate::error::LoweringError;
use crate::ir::*;
use crate::sexpr::SExpr;

/// Generate the complete `(module ...)` node.
pub fn generate_module(info: &ModuleInfo, import_module: &str) -> Result<SExpr, LoweringError> {
    let mut clauses = vec![SExpr::atom("module")];

    clauses.extend(info.structs.iter().map(super::types::generate_struct_type));

    clauses.extend(
        info.externs
            .iter()
            .map(|e| super::types::generate_import(e, import_module)),
    );

    for func in &info.functions {
        clauses.push(super::function::generate_function(func)?);
    }

    clauses.extend(super::export::generate_exports(info));
    clauses.extend(super::export::generate_start(info));

    Ok(SExpr::List(clauses))
}

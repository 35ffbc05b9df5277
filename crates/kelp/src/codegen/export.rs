//! Export and start clause generation.
//!
//! Public functions are exported under their own name. A function named
//! `main` becomes the start function whether or not it is exported.

use crate::ir::*;
use crate::sexpr::SExpr;

/// `(export "name" (func $name))` for every public function, in declaration order.
pub fn generate_exports(info: &ModuleInfo) -> Vec<SExpr> {
    info.public_functions()
        .map(|f| {
            SExpr::clause(
                "export",
                [
                    SExpr::string(&f.name),
                    SExpr::clause("func", [SExpr::ident(&f.name)]),
                ],
            )
        })
        .collect()
}

/// `(start $main)` when the module has an entry point.
pub fn generate_start(info: &ModuleInfo) -> Option<SExpr> {
    info.entry_point()
        .map(|f| SExpr::clause("start", [SExpr::ident(&f.name)]))
}

//! Type and import clause generation.
//!
//! Struct declarations become GC `type` clauses; extern declarations become
//! function `import` clauses. A `unit` return type produces no `result` clause.

use crate::ir::*;
use crate::sexpr::SExpr;

/// `(type $Name (struct (field $a T) ...))`, fields in declaration order.
pub fn generate_struct_type(def: &StructDefinition) -> SExpr {
    let fields = def
        .fields
        .iter()
        .map(|f| SExpr::clause("field", [SExpr::ident(&f.name), SExpr::atom(&f.ty)]));

    SExpr::clause(
        "type",
        [SExpr::ident(&def.name), SExpr::clause("struct", fields)],
    )
}

/// `(import "<module>" "<name>" (func $<name> (param T)... (result R)?))`
///
/// Import parameters are type-only; their names only matter to the loader.
pub fn generate_import(def: &ExternDefinition, import_module: &str) -> SExpr {
    let mut func = vec![SExpr::atom("func"), SExpr::ident(&def.import_name)];
    func.extend(
        def.parameters
            .iter()
            .map(|p| SExpr::clause("param", [SExpr::atom(&p.ty)])),
    );
    func.extend(result_clause(def.result_type()));

    SExpr::clause(
        "import",
        [
            SExpr::string(import_module),
            SExpr::string(&def.import_name),
            SExpr::List(func),
        ],
    )
}

/// `(result T)`, or nothing for `unit`.
pub fn result_clause(ty: Option<&str>) -> Option<SExpr> {
    ty.map(|t| SExpr::clause("result", [SExpr::atom(t)]))
}

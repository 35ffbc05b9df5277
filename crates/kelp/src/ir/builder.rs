//! # IR Builder
//!
//! Translates a parsed [`Program`] into a [`ModuleInfo`] (the declaration model).
//!
//! ```text
//! Program.toplevels
//!      ├── StructDef   ─► StructDefinition
//!      ├── FuncDef     ─► FunctionDefinition
//!      └── ExternFunc  ─► ExternDefinition
//!                          ─► ModuleInfo ──► codegen
//! ```
//!
//! Declarations are partitioned by kind; relative source order is kept within
//! each collection. No validation happens here: the parser already rejected
//! anything malformed, and shape errors in bodies surface during lowering.

use super::types::*;
use crate::ast::{ExternDecl, FuncDecl, Program, StructDecl, TopLevel, TypedName};
use tracing::debug;

/// Build the declaration model from a parsed program.
pub fn build_module_info(program: &Program) -> ModuleInfo {
    let mut info = ModuleInfo::default();

    for toplevel in &program.toplevels {
        match toplevel {
            TopLevel::StructDef(decl) => info.structs.push(build_struct(decl)),
            TopLevel::FuncDef(decl) => info.functions.push(build_function(decl)),
            TopLevel::ExternFunc(decl) => info.externs.push(build_extern(decl)),
        }
    }

    debug!(
        structs = info.structs.len(),
        functions = info.functions.len(),
        externs = info.externs.len(),
        "built declaration model"
    );
    info
}

fn build_struct(decl: &StructDecl) -> StructDefinition {
    StructDefinition {
        name: decl.name.clone(),
        fields: decl
            .fields
            .iter()
            .map(|f| FieldDefinition {
                name: f.name.clone(),
                ty: f.ty.name.clone(),
            })
            .collect(),
    }
}

fn build_function(decl: &FuncDecl) -> FunctionDefinition {
    FunctionDefinition {
        visibility: if decl.is_public {
            Visibility::Public
        } else {
            Visibility::Private
        },
        name: decl.name.clone(),
        parameters: build_parameters(&decl.params),
        return_type: decl.return_type.name.clone(),
        body: decl.body.clone(),
    }
}

fn build_extern(decl: &ExternDecl) -> ExternDefinition {
    ExternDefinition {
        host_binding_name: decl.external_name.clone(),
        import_name: decl.import_name.clone(),
        parameters: build_parameters(&decl.params),
        return_type: decl.return_type.name.clone(),
    }
}

fn build_parameters(params: &[TypedName]) -> Vec<ParameterDefinition> {
    params
        .iter()
        .map(|p| ParameterDefinition {
            name: p.name.clone(),
            ty: p.ty.name.clone(),
        })
        .collect()
}

//! Declaration model.
//!
//! Plain data extracted from the AST: struct, function and extern
//! declarations. Function bodies keep the AST's [`Statement`] nodes and are
//! lowered during emission.

use crate::ast::Statement;

/// Type name meaning "no value". Suppresses result clauses wherever it appears
/// in a return position.
pub const UNIT_TYPE: &str = "unit";

/// Name of the function that becomes the module's start function.
pub const ENTRY_POINT_NAME: &str = "main";

/// Whether a function is part of the module's external interface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    Public,
    Private,
}

/// A named, typed struct field. Field order fixes the struct layout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDefinition {
    pub name: String,
    pub ty: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StructDefinition {
    pub name: String,
    pub fields: Vec<FieldDefinition>,
}

/// A named, typed function or extern parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParameterDefinition {
    pub name: String,
    pub ty: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionDefinition {
    pub visibility: Visibility,
    pub name: String,
    pub parameters: Vec<ParameterDefinition>,
    /// A type name, or [`UNIT_TYPE`] for no result.
    pub return_type: String,
    pub body: Vec<Statement>,
}

impl FunctionDefinition {
    pub fn is_public(&self) -> bool {
        self.visibility == Visibility::Public
    }

    /// The result type, or `None` when the function returns `unit`.
    pub fn result_type(&self) -> Option<&str> {
        result_type(&self.return_type)
    }
}

/// A host function imported into the module.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExternDefinition {
    /// Host-side name the loader forwards to (e.g. `console.log`).
    pub host_binding_name: String,
    /// Name the module imports under; also the key in the loader's import object.
    pub import_name: String,
    pub parameters: Vec<ParameterDefinition>,
    pub return_type: String,
}

impl ExternDefinition {
    pub fn result_type(&self) -> Option<&str> {
        result_type(&self.return_type)
    }
}

fn result_type(ty: &str) -> Option<&str> {
    if ty == UNIT_TYPE {
        None
    } else {
        Some(ty)
    }
}

/// All declarations of one compilation unit, partitioned by kind, each in
/// source order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ModuleInfo {
    pub structs: Vec<StructDefinition>,
    pub functions: Vec<FunctionDefinition>,
    pub externs: Vec<ExternDefinition>,
}

impl ModuleInfo {
    /// The function that runs at instantiation: the first one named `main`.
    pub fn entry_point(&self) -> Option<&FunctionDefinition> {
        self.functions.iter().find(|f| f.name == ENTRY_POINT_NAME)
    }

    /// Functions that make up the external interface, in declaration order.
    pub fn public_functions(&self) -> impl Iterator<Item = &FunctionDefinition> {
        self.functions.iter().filter(|f| f.is_public())
    }
}

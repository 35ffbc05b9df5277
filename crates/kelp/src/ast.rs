//! Abstract syntax tree produced by the kelp parser.
//!
//! Top-level declarations are a closed tagged variant ([`TopLevel`]); statements
//! and expressions are shared with the declaration model, which keeps function
//! bodies as-is and lowers them lazily during emission.

use std::fmt;

/// A parsed kelp program: top-level declarations in source order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Program {
    pub toplevels: Vec<TopLevel>,
}

/// A top-level declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TopLevel {
    /// `struct Name { field: Type, ... }`
    StructDef(StructDecl),
    /// `[pub] fn name(param: Type, ...) -> Type { ... }`
    FuncDef(FuncDecl),
    /// `import host.binding as fn name(param: Type, ...) -> Type;`
    ExternFunc(ExternDecl),
}

/// A type reference as written in source (`i32`, `unit`, a struct name, ...).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeRef {
    pub name: String,
}

impl TypeRef {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    /// The `unit` type, used when a function omits its return type.
    pub fn unit() -> Self {
        Self::new("unit")
    }
}

/// `name: Type`, used for struct fields and parameters alike.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypedName {
    pub name: String,
    pub ty: TypeRef,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StructDecl {
    pub name: String,
    pub fields: Vec<TypedName>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FuncDecl {
    pub is_public: bool,
    pub name: String,
    pub params: Vec<TypedName>,
    pub return_type: TypeRef,
    pub body: Vec<Statement>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExternDecl {
    /// Dotted host path, e.g. `console.log`.
    pub external_name: String,
    pub import_name: String,
    pub params: Vec<TypedName>,
    pub return_type: TypeRef,
}

/// A statement inside a function body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Statement {
    /// `let name = expr;`
    Let { name: String, expr: Expression },
    /// `return expr;`
    Return { expr: Expression },
    /// A bare expression statement. Only calls are accepted by the parser.
    Expr { expr: Expression },
}

/// An expression node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expression {
    /// `o0 + o1 + ... + ok`, left-associative.
    Sum { operands: Vec<Expression> },
    /// `o0 * o1 * ... * ok`, left-associative.
    Product { operands: Vec<Expression> },
    /// `receiver.a.b...`
    FieldAccess {
        receiver: Box<Expression>,
        accessors: Vec<String>,
    },
    /// `callee(args)(args)...`
    Call {
        callee: Box<Expression>,
        argument_lists: Vec<Vec<Expression>>,
    },
    VariableRef { name: String },
    IntegerConstant { value: i64 },
}

impl Expression {
    pub fn var(name: impl Into<String>) -> Self {
        Expression::VariableRef { name: name.into() }
    }

    pub fn int(value: i64) -> Self {
        Expression::IntegerConstant { value }
    }

    /// Short kind name used in diagnostics.
    pub fn kind(&self) -> ExprKind {
        match self {
            Expression::Sum { .. } => ExprKind::Sum,
            Expression::Product { .. } => ExprKind::Product,
            Expression::FieldAccess { .. } => ExprKind::FieldAccess,
            Expression::Call { .. } => ExprKind::Call,
            Expression::VariableRef { .. } => ExprKind::VariableRef,
            Expression::IntegerConstant { .. } => ExprKind::IntegerConstant,
        }
    }
}

/// Discriminant of [`Expression`], without payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExprKind {
    Sum,
    Product,
    FieldAccess,
    Call,
    VariableRef,
    IntegerConstant,
}

impl fmt::Display for ExprKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ExprKind::Sum => "sum",
            ExprKind::Product => "product",
            ExprKind::FieldAccess => "field access",
            ExprKind::Call => "call",
            ExprKind::VariableRef => "variable reference",
            ExprKind::IntegerConstant => "integer constant",
        };
        f.write_str(name)
    }
}

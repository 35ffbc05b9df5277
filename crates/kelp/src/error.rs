//! Error taxonomy for the compilation pipeline.
//!
//! Every failure is fatal: a compilation either produces its artifact or
//! nothing at all.

use crate::ast::ExprKind;
use std::fmt;
use thiserror::Error;

/// Top-level compilation failure, one variant per pipeline stage.
#[derive(Error, Debug)]
pub enum CompileError {
    #[error(transparent)]
    Parse(#[from] ParseFailure),

    #[error("lowering failed: {0}")]
    Lowering(#[from] LoweringError),

    /// Message from the IR toolchain, not interpreted.
    #[error("toolchain rejected module: {0}")]
    Toolchain(String),
}

/// A single parser diagnostic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub line: usize,
    pub column: usize,
    pub message: String,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}: {}", self.line, self.column, self.message)
    }
}

/// The source text could not be parsed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("failed to parse the source code{}", list_diagnostics(.diagnostics))]
pub struct ParseFailure {
    pub diagnostics: Vec<Diagnostic>,
}

impl ParseFailure {
    /// A failure with a single diagnostic.
    pub fn at(line: usize, column: usize, message: impl Into<String>) -> Self {
        Self {
            diagnostics: vec![Diagnostic {
                line,
                column,
                message: message.into(),
            }],
        }
    }
}

fn list_diagnostics(diagnostics: &[Diagnostic]) -> String {
    diagnostics.iter().map(|d| format!("\n  {d}")).collect()
}

/// A statement or expression has a shape the lowering does not support.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LoweringError {
    #[error("unsupported callee kind: {kind} (only plain function names can be called)")]
    UnsupportedCallee { kind: ExprKind },

    #[error("call to `{callee}` has no argument list")]
    MissingArgumentList { callee: String },

    #[error("call to `{callee}` has {lists} argument lists; curried calls are not supported")]
    CurriedCall { callee: String, lists: usize },

    #[error("{kind} has no operands")]
    EmptyOperands { kind: ExprKind },

    #[error("local `{name}` is declared more than once in function `{function}`")]
    DuplicateLocal { function: String, name: String },
}

//! S-expression nodes for WebAssembly text.
//!
//! Emission builds a tree of [`SExpr`] nodes; [`SExpr::to_text`] renders it in
//! the canonical form: `(` + children joined by single spaces + `)`, atoms
//! verbatim, no trailing whitespace.

use std::fmt;

/// A WebAssembly text node: either a single token or a parenthesized list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SExpr {
    Atom(String),
    List(Vec<SExpr>),
}

impl SExpr {
    pub fn atom(token: impl Into<String>) -> Self {
        SExpr::Atom(token.into())
    }

    /// `$name`
    pub fn ident(name: &str) -> Self {
        SExpr::Atom(format!("${name}"))
    }

    /// `"name"`
    pub fn string(value: &str) -> Self {
        SExpr::Atom(format!("\"{value}\""))
    }

    /// A list whose first element is the clause keyword.
    pub fn clause(keyword: &str, args: impl IntoIterator<Item = SExpr>) -> Self {
        let mut items = vec![SExpr::atom(keyword)];
        items.extend(args);
        SExpr::List(items)
    }

    /// Render to canonical text.
    pub fn to_text(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for SExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SExpr::Atom(token) => f.write_str(token),
            SExpr::List(items) => {
                f.write_str("(")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(" ")?;
                    }
                    write!(f, "{item}")?;
                }
                f.write_str(")")
            }
        }
    }
}

//! Function clause generation.
//!
//! Produces `(func $name (param $p T)... (result R)? (local $l i32)... body...)`.
//! Every `let` contributes one `i32` local, declared ahead of all statement code
//! in first-occurrence order.

use super::instruction::lower_statement;
use super::types::result_clause;
use crate::ast::Statement;
use crate::error::LoweringError;
use crate::ir::*;
use crate::sexpr::SExpr;
use std::collections::HashSet;

/// Representation of every `let` local. The language has a single numeric type.
pub const LOCAL_TYPE: &str = "i32";

/// Generate the complete function clause.
pub fn generate_function(def: &FunctionDefinition) -> Result<SExpr, LoweringError> {
    let mut items = vec![SExpr::atom("func"), SExpr::ident(&def.name)];

    for p in &def.parameters {
        items.push(SExpr::clause(
            "param",
            [SExpr::ident(&p.name), SExpr::atom(&p.ty)],
        ));
    }
    items.extend(result_clause(def.result_type()));
    items.extend(collect_locals(def)?);

    for stmt in &def.body {
        items.push(lower_statement(stmt)?);
    }

    Ok(SExpr::List(items))
}

/// `(local $name i32)` for each `let` in the body.
///
/// A name bound twice by `let` in the same function is rejected.
pub fn collect_locals(def: &FunctionDefinition) -> Result<Vec<SExpr>, LoweringError> {
    let mut seen = HashSet::new();
    let mut locals = Vec::new();

    for stmt in &def.body {
        if let Statement::Let { name, .. } = stmt {
            if !seen.insert(name.as_str()) {
                return Err(LoweringError::DuplicateLocal {
                    function: def.name.clone(),
                    name: name.clone(),
                });
            }
            locals.push(SExpr::clause(
                "local",
                [SExpr::ident(name), SExpr::atom(LOCAL_TYPE)],
            ));
        }
    }

    Ok(locals)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::Expression;

    fn add_function() -> FunctionDefinition {
        FunctionDefinition {
            visibility: Visibility::Private,
            name: "foo".to_string(),
            parameters: vec![
                ParameterDefinition {
                    name: "a".to_string(),
                    ty: "i32".to_string(),
                },
                ParameterDefinition {
                    name: "b".to_string(),
                    ty: "i32".to_string(),
                },
            ],
            return_type: "i32".to_string(),
            body: vec![
                Statement::Let {
                    name: "c".to_string(),
                    expr: Expression::Sum {
                        operands: vec![Expression::var("a"), Expression::var("b")],
                    },
                },
                Statement::Return {
                    expr: Expression::var("c"),
                },
            ],
        }
    }

    #[test]
    fn generate_add_function() {
        let code = generate_function(&add_function()).unwrap().to_text();
        println!("Generated function:\n{}", code);
        assert_eq!(
            code,
            "(func $foo (param $a i32) (param $b i32) (result i32) (local $c i32) \
             (local.set $c (i32.add (local.get $a) (local.get $b))) (return (local.get $c)))"
        );
    }

    #[test]
    fn unit_function_has_no_result() {
        let def = FunctionDefinition {
            visibility: Visibility::Private,
            name: "noop".to_string(),
            parameters: Vec::new(),
            return_type: UNIT_TYPE.to_string(),
            body: Vec::new(),
        };
        assert_eq!(generate_function(&def).unwrap().to_text(), "(func $noop)");
    }

    #[test]
    fn locals_precede_statements_in_first_occurrence_order() {
        let mut def = add_function();
        def.body = vec![
            Statement::Let {
                name: "y".to_string(),
                expr: Expression::int(1),
            },
            Statement::Let {
                name: "x".to_string(),
                expr: Expression::var("y"),
            },
            Statement::Return {
                expr: Expression::var("x"),
            },
        ];
        let code = generate_function(&def).unwrap().to_text();
        assert!(code.contains(
            "(result i32) (local $y i32) (local $x i32) (local.set $y (i32.const 1))"
        ));
    }

    #[test]
    fn duplicate_let_is_rejected() {
        let mut def = add_function();
        def.body.push(Statement::Let {
            name: "c".to_string(),
            expr: Expression::int(0),
        });
        assert_eq!(
            generate_function(&def).unwrap_err(),
            LoweringError::DuplicateLocal {
                function: "foo".to_string(),
                name: "c".to_string(),
            }
        );
    }
}

//! Statement and expression lowering.
//!
//! Converts function-body AST nodes into WebAssembly text clauses. Lowering
//! is all-or-nothing: the first unsupported shape aborts with a
//! [`LoweringError`] naming the construct.

use crate::ast::{ExprKind, Expression, Statement};
use crate::error::LoweringError;
use crate::sexpr::SExpr;

/// Lower a single statement.
///
/// - `let x = e;` → `(local.set $x e)`
/// - `return e;` → `(return e)`
/// - `f(...);` → the call clause as-is
pub fn lower_statement(stmt: &Statement) -> Result<SExpr, LoweringError> {
    match stmt {
        Statement::Let { name, expr } => Ok(SExpr::clause(
            "local.set",
            [SExpr::ident(name), lower_expression(expr)?],
        )),
        Statement::Return { expr } => Ok(SExpr::clause("return", [lower_expression(expr)?])),
        Statement::Expr { expr } => lower_expression(expr),
    }
}

/// Lower a single expression.
pub fn lower_expression(expr: &Expression) -> Result<SExpr, LoweringError> {
    match expr {
        Expression::Sum { operands } => fold_binop("i32.add", ExprKind::Sum, operands),
        Expression::Product { operands } => fold_binop("i32.mul", ExprKind::Product, operands),

        // a.b.c → (struct.get $c (struct.get $b a)), receiver innermost
        Expression::FieldAccess {
            receiver,
            accessors,
        } => accessors
            .iter()
            .try_fold(
                lower_expression(receiver)?,
                |acc, field| -> Result<SExpr, LoweringError> {
                    Ok(SExpr::clause("struct.get", [SExpr::ident(field), acc]))
                },
            ),

        Expression::Call {
            callee,
            argument_lists,
        } => lower_call(callee, argument_lists),

        Expression::VariableRef { name } => Ok(SExpr::clause("local.get", [SExpr::ident(name)])),

        Expression::IntegerConstant { value } => {
            Ok(SExpr::clause("i32.const", [SExpr::atom(value.to_string())]))
        }
    }
}

/// Left fold `[o0, o1, ..., ok]` into `op(...op(op(o0, o1), o2)..., ok)`.
/// A single operand is returned unwrapped.
fn fold_binop(op: &str, kind: ExprKind, operands: &[Expression]) -> Result<SExpr, LoweringError> {
    let (first, rest) = operands
        .split_first()
        .ok_or(LoweringError::EmptyOperands { kind })?;

    rest.iter().try_fold(
        lower_expression(first)?,
        |acc, operand| -> Result<SExpr, LoweringError> {
            Ok(SExpr::clause(op, [acc, lower_expression(operand)?]))
        },
    )
}

fn lower_call(
    callee: &Expression,
    argument_lists: &[Vec<Expression>],
) -> Result<SExpr, LoweringError> {
    let Expression::VariableRef { name } = callee else {
        return Err(LoweringError::UnsupportedCallee {
            kind: callee.kind(),
        });
    };

    let args = match argument_lists {
        [] => {
            return Err(LoweringError::MissingArgumentList {
                callee: name.clone(),
            })
        }
        [args] => args,
        lists => {
            return Err(LoweringError::CurriedCall {
                callee: name.clone(),
                lists: lists.len(),
            })
        }
    };

    let mut items = vec![SExpr::atom("call"), SExpr::ident(name)];
    for arg in args {
        items.push(lower_expression(arg)?);
    }
    Ok(SExpr::List(items))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(expr: &Expression) -> String {
        lower_expression(expr).unwrap().to_text()
    }

    #[test]
    fn constants_and_variables() {
        assert_eq!(text(&Expression::int(42)), "(i32.const 42)");
        assert_eq!(text(&Expression::int(-7)), "(i32.const -7)");
        assert_eq!(text(&Expression::var("x")), "(local.get $x)");
    }

    #[test]
    fn single_operand_sum_is_unwrapped() {
        let expr = Expression::Sum {
            operands: vec![Expression::var("a")],
        };
        assert_eq!(text(&expr), "(local.get $a)");
    }

    #[test]
    fn sum_folds_left() {
        let expr = Expression::Sum {
            operands: vec![
                Expression::var("a"),
                Expression::var("b"),
                Expression::var("c"),
            ],
        };
        assert_eq!(
            text(&expr),
            "(i32.add (i32.add (local.get $a) (local.get $b)) (local.get $c))"
        );
    }

    #[test]
    fn product_with_k_operands_has_k_minus_one_clauses() {
        let operands: Vec<Expression> = (1..=5).map(Expression::int).collect();
        let out = text(&Expression::Product { operands });
        println!("{out}");
        assert_eq!(out.matches("i32.mul").count(), 4);
        assert!(out.starts_with("(i32.mul (i32.mul (i32.mul (i32.mul (i32.const 1) (i32.const 2))"));
        assert!(out.ends_with("(i32.const 5))"));
    }

    #[test]
    fn nested_sum_of_products() {
        let expr = Expression::Sum {
            operands: vec![
                Expression::Product {
                    operands: vec![Expression::var("a"), Expression::int(2)],
                },
                Expression::int(1),
            ],
        };
        assert_eq!(
            text(&expr),
            "(i32.add (i32.mul (local.get $a) (i32.const 2)) (i32.const 1))"
        );
    }

    #[test]
    fn empty_operands_fail() {
        let err = lower_expression(&Expression::Sum {
            operands: Vec::new(),
        })
        .unwrap_err();
        assert_eq!(
            err,
            LoweringError::EmptyOperands {
                kind: ExprKind::Sum
            }
        );
    }

    #[test]
    fn field_access_chain_nests_receiver_innermost() {
        let expr = Expression::FieldAccess {
            receiver: Box::new(Expression::var("p")),
            accessors: vec!["b".to_string(), "c".to_string()],
        };
        assert_eq!(
            text(&expr),
            "(struct.get $c (struct.get $b (local.get $p)))"
        );
    }

    #[test]
    fn call_lowers_arguments_in_order() {
        let expr = Expression::Call {
            callee: Box::new(Expression::var("foo")),
            argument_lists: vec![vec![Expression::int(1), Expression::int(2)]],
        };
        assert_eq!(text(&expr), "(call $foo (i32.const 1) (i32.const 2))");
    }

    #[test]
    fn call_with_empty_argument_list() {
        let expr = Expression::Call {
            callee: Box::new(Expression::var("tick")),
            argument_lists: vec![Vec::new()],
        };
        assert_eq!(text(&expr), "(call $tick)");
    }

    #[test]
    fn curried_call_fails() {
        let expr = Expression::Call {
            callee: Box::new(Expression::var("f")),
            argument_lists: vec![vec![Expression::int(1)], vec![Expression::int(2)]],
        };
        assert_eq!(
            lower_expression(&expr).unwrap_err(),
            LoweringError::CurriedCall {
                callee: "f".to_string(),
                lists: 2,
            }
        );
    }

    #[test]
    fn call_without_argument_list_fails() {
        let expr = Expression::Call {
            callee: Box::new(Expression::var("f")),
            argument_lists: Vec::new(),
        };
        assert!(matches!(
            lower_expression(&expr),
            Err(LoweringError::MissingArgumentList { .. })
        ));
    }

    #[test]
    fn non_name_callee_fails() {
        let expr = Expression::Call {
            callee: Box::new(Expression::FieldAccess {
                receiver: Box::new(Expression::var("obj")),
                accessors: vec!["method".to_string()],
            }),
            argument_lists: vec![Vec::new()],
        };
        assert_eq!(
            lower_expression(&expr).unwrap_err(),
            LoweringError::UnsupportedCallee {
                kind: ExprKind::FieldAccess
            }
        );
    }

    #[test]
    fn error_inside_nested_expression_propagates() {
        let bad_call = Expression::Call {
            callee: Box::new(Expression::int(3)),
            argument_lists: vec![Vec::new()],
        };
        let stmt = Statement::Return {
            expr: Expression::Sum {
                operands: vec![Expression::int(1), bad_call],
            },
        };
        assert!(matches!(
            lower_statement(&stmt),
            Err(LoweringError::UnsupportedCallee {
                kind: ExprKind::IntegerConstant
            })
        ));
    }

    #[test]
    fn statements() {
        let let_stmt = Statement::Let {
            name: "c".to_string(),
            expr: Expression::int(1),
        };
        assert_eq!(
            lower_statement(&let_stmt).unwrap().to_text(),
            "(local.set $c (i32.const 1))"
        );

        let ret = Statement::Return {
            expr: Expression::var("c"),
        };
        assert_eq!(
            lower_statement(&ret).unwrap().to_text(),
            "(return (local.get $c))"
        );

        let call = Statement::Expr {
            expr: Expression::Call {
                callee: Box::new(Expression::var("println")),
                argument_lists: vec![vec![Expression::int(42)]],
            },
        };
        assert_eq!(
            lower_statement(&call).unwrap().to_text(),
            "(call $println (i32.const 42))"
        );
    }
}

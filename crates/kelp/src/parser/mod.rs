//! kelp source parser.
//!
//! This module wraps a `pest` grammar (`grammar.pest`) and walks the resulting
//! pair tree into the typed [`Program`] AST.

use crate::ast::*;
use crate::error::{Diagnostic, ParseFailure};
use pest::error::{ErrorVariant, LineColLocation};
use pest::iterators::{Pair, Pairs};
use pest::{Parser, Span};
use pest_derive::Parser;

#[derive(Parser)]
#[grammar = "parser/grammar.pest"]
struct KelpParser;

/// Parse kelp source text into a [`Program`].
pub fn parse_program(source: &str) -> Result<Program, ParseFailure> {
    let mut pairs = KelpParser::parse(Rule::program, source).map_err(to_failure)?;
    let Some(program) = pairs.next() else {
        return Ok(Program::default());
    };

    let mut toplevels = Vec::new();
    for pair in program.into_inner() {
        match pair.as_rule() {
            Rule::struct_def => toplevels.push(TopLevel::StructDef(build_struct(pair)?)),
            Rule::func_def => toplevels.push(TopLevel::FuncDef(build_func(pair)?)),
            Rule::extern_func => toplevels.push(TopLevel::ExternFunc(build_extern(pair)?)),
            _ => {}
        }
    }
    Ok(Program { toplevels })
}

fn to_failure(err: pest::error::Error<Rule>) -> ParseFailure {
    let (line, column) = match err.line_col {
        LineColLocation::Pos(pos) => pos,
        LineColLocation::Span(start, _) => start,
    };
    ParseFailure::at(line, column, err.variant.message())
}

/// A diagnostic located at `span`.
fn failure_at(span: Span<'_>, message: String) -> ParseFailure {
    to_failure(pest::error::Error::new_from_span(
        ErrorVariant::CustomError { message },
        span,
    ))
}

/// Next child of a node the grammar guarantees to have one.
fn child<'i>(
    inner: &mut impl Iterator<Item = Pair<'i, Rule>>,
    parent: Span<'i>,
    what: &str,
) -> Result<Pair<'i, Rule>, ParseFailure> {
    inner
        .next()
        .ok_or_else(|| failure_at(parent, format!("malformed syntax tree: missing {what}")))
}

/// Children of `pair` with keyword tokens filtered out.
fn significant(pair: Pair<'_, Rule>) -> impl Iterator<Item = Pair<'_, Rule>> {
    pair.into_inner().filter(|p| {
        !matches!(
            p.as_rule(),
            Rule::kw_struct
                | Rule::kw_fn
                | Rule::kw_import
                | Rule::kw_as
                | Rule::kw_let
                | Rule::kw_return
        )
    })
}

fn build_struct(pair: Pair<'_, Rule>) -> Result<StructDecl, ParseFailure> {
    let mut name = String::new();
    let mut fields = Vec::new();
    for p in significant(pair) {
        match p.as_rule() {
            Rule::ident => name = p.as_str().to_string(),
            Rule::typed_names => fields = build_typed_names(p.into_inner())?,
            _ => {}
        }
    }
    Ok(StructDecl { name, fields })
}

fn build_func(pair: Pair<'_, Rule>) -> Result<FuncDecl, ParseFailure> {
    let mut decl = FuncDecl {
        is_public: false,
        name: String::new(),
        params: Vec::new(),
        return_type: TypeRef::unit(),
        body: Vec::new(),
    };
    for p in significant(pair) {
        match p.as_rule() {
            Rule::kw_pub => decl.is_public = true,
            Rule::ident => decl.name = p.as_str().to_string(),
            Rule::typed_names => decl.params = build_typed_names(p.into_inner())?,
            Rule::return_type => decl.return_type = build_return_type(p)?,
            Rule::block => {
                decl.body = p
                    .into_inner()
                    .map(build_statement)
                    .collect::<Result<_, _>>()?
            }
            _ => {}
        }
    }
    Ok(decl)
}

fn build_extern(pair: Pair<'_, Rule>) -> Result<ExternDecl, ParseFailure> {
    let mut decl = ExternDecl {
        external_name: String::new(),
        import_name: String::new(),
        params: Vec::new(),
        return_type: TypeRef::unit(),
    };
    for p in significant(pair) {
        match p.as_rule() {
            Rule::host_path => decl.external_name = p.as_str().to_string(),
            Rule::ident => decl.import_name = p.as_str().to_string(),
            Rule::typed_names => decl.params = build_typed_names(p.into_inner())?,
            Rule::return_type => decl.return_type = build_return_type(p)?,
            _ => {}
        }
    }
    Ok(decl)
}

fn build_typed_names(pairs: Pairs<'_, Rule>) -> Result<Vec<TypedName>, ParseFailure> {
    pairs
        .map(|typed| {
            let span = typed.as_span();
            let mut inner = typed.into_inner();
            let name = child(&mut inner, span, "name")?.as_str().to_string();
            let ty = child(&mut inner, span, "type")?.as_str().trim();
            Ok(TypedName {
                name,
                ty: TypeRef::new(ty),
            })
        })
        .collect()
}

fn build_return_type(pair: Pair<'_, Rule>) -> Result<TypeRef, ParseFailure> {
    let span = pair.as_span();
    let ty = child(&mut pair.into_inner(), span, "return type")?;
    Ok(TypeRef::new(ty.as_str().trim()))
}

fn build_statement(pair: Pair<'_, Rule>) -> Result<Statement, ParseFailure> {
    let rule = pair.as_rule();
    let span = pair.as_span();
    let mut inner = significant(pair);
    let statement = match rule {
        Rule::let_stmt => Statement::Let {
            name: child(&mut inner, span, "let binding name")?
                .as_str()
                .to_string(),
            expr: build_expr(child(&mut inner, span, "let initializer")?)?,
        },
        Rule::return_stmt => Statement::Return {
            expr: build_expr(child(&mut inner, span, "return value")?)?,
        },
        Rule::expr_stmt => Statement::Expr {
            expr: build_expr(child(&mut inner, span, "statement expression")?)?,
        },
        other => return Err(failure_at(span, format!("unexpected statement {other:?}"))),
    };
    Ok(statement)
}

/// Collapse a one-element operator chain to its only operand.
fn chain(
    pair: Pair<'_, Rule>,
    make: fn(Vec<Expression>) -> Expression,
) -> Result<Expression, ParseFailure> {
    let mut operands = pair
        .into_inner()
        .map(build_expr)
        .collect::<Result<Vec<_>, _>>()?;
    Ok(match operands.len() {
        1 => operands.remove(0),
        _ => make(operands),
    })
}

fn build_expr(pair: Pair<'_, Rule>) -> Result<Expression, ParseFailure> {
    let span = pair.as_span();
    match pair.as_rule() {
        Rule::sum => chain(pair, |operands| Expression::Sum { operands }),
        Rule::product => chain(pair, |operands| Expression::Product { operands }),
        Rule::call | Rule::call_expr => {
            let mut inner = pair.into_inner();
            let callee = build_expr(child(&mut inner, span, "callee")?)?;
            let argument_lists = inner
                .map(|args| args.into_inner().map(build_expr).collect::<Result<Vec<_>, _>>())
                .collect::<Result<Vec<_>, _>>()?;
            if argument_lists.is_empty() {
                Ok(callee)
            } else {
                Ok(Expression::Call {
                    callee: Box::new(callee),
                    argument_lists,
                })
            }
        }
        Rule::dot => {
            let mut inner = pair.into_inner();
            let receiver = build_expr(child(&mut inner, span, "receiver")?)?;
            let accessors: Vec<String> = inner.map(|p| p.as_str().to_string()).collect();
            if accessors.is_empty() {
                Ok(receiver)
            } else {
                Ok(Expression::FieldAccess {
                    receiver: Box::new(receiver),
                    accessors,
                })
            }
        }
        Rule::ident => Ok(Expression::var(pair.as_str())),
        Rule::int_lit => pair.as_str().parse().map(Expression::int).map_err(|_| {
            failure_at(
                span,
                format!(
                    "integer literal `{}` does not fit in 64 bits",
                    pair.as_str()
                ),
            )
        }),
        other => Err(failure_at(span, format!("unexpected expression {other:?}"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_struct_definition() {
        let program = parse_program("struct Foo { a: i32, b: i32 }").unwrap();
        assert_eq!(
            program.toplevels,
            vec![TopLevel::StructDef(StructDecl {
                name: "Foo".to_string(),
                fields: vec![
                    TypedName {
                        name: "a".to_string(),
                        ty: TypeRef::new("i32"),
                    },
                    TypedName {
                        name: "b".to_string(),
                        ty: TypeRef::new("i32"),
                    },
                ],
            })]
        );
    }

    #[test]
    fn parses_public_function_with_body() {
        let program =
            parse_program("pub fn foo(a: i32, b: i32) -> i32 { let c = a + b; return c; }")
                .unwrap();
        let TopLevel::FuncDef(func) = &program.toplevels[0] else {
            panic!("expected a function, got {:?}", program.toplevels[0]);
        };
        assert!(func.is_public);
        assert_eq!(func.name, "foo");
        assert_eq!(func.params.len(), 2);
        assert_eq!(func.return_type, TypeRef::new("i32"));
        assert_eq!(
            func.body,
            vec![
                Statement::Let {
                    name: "c".to_string(),
                    expr: Expression::Sum {
                        operands: vec![Expression::var("a"), Expression::var("b")],
                    },
                },
                Statement::Return {
                    expr: Expression::var("c"),
                },
            ]
        );
    }

    #[test]
    fn missing_return_type_means_unit() {
        let program = parse_program("fn main() { println(42); }").unwrap();
        let TopLevel::FuncDef(func) = &program.toplevels[0] else {
            panic!("expected a function");
        };
        assert!(!func.is_public);
        assert_eq!(func.return_type, TypeRef::unit());
        assert_eq!(
            func.body,
            vec![Statement::Expr {
                expr: Expression::Call {
                    callee: Box::new(Expression::var("println")),
                    argument_lists: vec![vec![Expression::int(42)]],
                },
            }]
        );
    }

    #[test]
    fn parses_extern_import() {
        let program =
            parse_program("import console.log as fn println(value: i32) -> unit;").unwrap();
        assert_eq!(
            program.toplevels,
            vec![TopLevel::ExternFunc(ExternDecl {
                external_name: "console.log".to_string(),
                import_name: "println".to_string(),
                params: vec![TypedName {
                    name: "value".to_string(),
                    ty: TypeRef::new("i32"),
                }],
                return_type: TypeRef::unit(),
            })]
        );
    }

    #[test]
    fn variable_arity_chains_stay_flat() {
        let program = parse_program("fn f() -> i32 { return 1 + 2 * 3 * 4 + 5; }").unwrap();
        let TopLevel::FuncDef(func) = &program.toplevels[0] else {
            panic!("expected a function");
        };
        assert_eq!(
            func.body[0],
            Statement::Return {
                expr: Expression::Sum {
                    operands: vec![
                        Expression::int(1),
                        Expression::Product {
                            operands: vec![
                                Expression::int(2),
                                Expression::int(3),
                                Expression::int(4),
                            ],
                        },
                        Expression::int(5),
                    ],
                },
            }
        );
    }

    #[test]
    fn field_access_chain_and_curried_call() {
        let program = parse_program("fn f(p: Point) -> i32 { return p.a.b + g(1)(2); }").unwrap();
        let TopLevel::FuncDef(func) = &program.toplevels[0] else {
            panic!("expected a function");
        };
        let Statement::Return {
            expr: Expression::Sum { operands },
        } = &func.body[0]
        else {
            panic!("expected a returned sum, got {:?}", func.body[0]);
        };
        assert_eq!(
            operands[0],
            Expression::FieldAccess {
                receiver: Box::new(Expression::var("p")),
                accessors: vec!["a".to_string(), "b".to_string()],
            }
        );
        assert_eq!(
            operands[1],
            Expression::Call {
                callee: Box::new(Expression::var("g")),
                argument_lists: vec![vec![Expression::int(1)], vec![Expression::int(2)]],
            }
        );
    }

    #[test]
    fn keyword_prefixed_identifiers_are_identifiers() {
        let program = parse_program("fn f() { return_value(1); }").unwrap();
        let TopLevel::FuncDef(func) = &program.toplevels[0] else {
            panic!("expected a function");
        };
        assert!(matches!(func.body[0], Statement::Expr { .. }));
    }

    #[test]
    fn comments_are_ignored() {
        let program = parse_program("// a point\nstruct P { x: i32 } // trailing").unwrap();
        assert_eq!(program.toplevels.len(), 1);
    }

    #[test]
    fn bare_variable_statement_is_rejected() {
        let err = parse_program("fn f(a: i32) { a; }").unwrap_err();
        assert_eq!(err.diagnostics.len(), 1);
        assert_eq!(err.diagnostics[0].line, 1);
    }

    #[test]
    fn literal_digits_are_kept_exactly() {
        let program = parse_program("fn f() -> i64 { return 9223372036854775807; }").unwrap();
        let TopLevel::FuncDef(func) = &program.toplevels[0] else {
            panic!("expected a function");
        };
        assert_eq!(
            func.body[0],
            Statement::Return {
                expr: Expression::int(i64::MAX),
            }
        );
    }

    #[test]
    fn oversized_literal_is_a_diagnostic() {
        let err = parse_program("fn f() -> i32 {\n  return 99999999999999999999;\n}").unwrap_err();
        println!("{err}");
        assert_eq!(err.diagnostics.len(), 1);
        let diag = &err.diagnostics[0];
        assert_eq!((diag.line, diag.column), (2, 10));
        assert!(diag.message.contains("99999999999999999999"));
    }

    #[test]
    fn walker_reports_unexpected_nodes() {
        let pair = KelpParser::parse(Rule::dot, "x.y").unwrap().next().unwrap();
        let err = build_statement(pair.clone()).unwrap_err();
        assert!(err.diagnostics[0].message.contains("unexpected statement"));

        let arg = KelpParser::parse(Rule::arg_list, "(1)").unwrap().next().unwrap();
        let err = build_expr(arg).unwrap_err();
        assert!(err.diagnostics[0].message.contains("unexpected expression"));
        assert_eq!(err.diagnostics[0].column, 1);
    }

    #[test]
    fn empty_source_is_an_empty_program() {
        assert_eq!(parse_program("").unwrap(), Program::default());
    }
}

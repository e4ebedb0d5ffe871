//! Property-based tests for the parser.

use proptest::prelude::*;
use snip_ir::ExprKind;
use snip_lexer::lex;
use snip_parse::{parse_unit, Parser};

fn arb_int() -> impl Strategy<Value = String> {
    prop_oneof![
        (0i64..=1000).prop_map(|n| n.to_string()),
        (1000i64..1_000_000).prop_map(|n| format!("{}_{:03}", n / 1000, n % 1000)),
        (0u32..=0xFFFF).prop_map(|n| format!("0x{n:X}")),
    ]
}

fn arb_string() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9_ ]{0,20}".prop_map(|s| format!("\"{s}\""))
}

fn arb_ident() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9_]{0,10}".prop_filter("keywords are not identifiers", |s| {
        !snip_ir::is_keyword(s)
    })
}

fn arb_binop() -> impl Strategy<Value = &'static str> {
    prop_oneof![
        Just("+"),
        Just("-"),
        Just("*"),
        Just("/"),
        Just("%"),
        Just("=="),
        Just("!="),
        Just("<"),
        Just(">"),
        Just("<="),
        Just(">="),
        Just("&&"),
        Just("||"),
        Just("&"),
        Just("|"),
        Just("^"),
        Just("<<"),
        Just(">>"),
        Just(">>>"),
    ]
}

fn arb_simple_expr() -> impl Strategy<Value = String> {
    prop_oneof![
        arb_int(),
        arb_string(),
        Just("true".to_string()),
        Just("null".to_string()),
        arb_ident(),
    ]
}

fn arb_binary_expr() -> impl Strategy<Value = String> {
    (arb_simple_expr(), arb_binop(), arb_simple_expr())
        .prop_map(|(left, op, right)| format!("{left} {op} {right}"))
}

fn arb_call_expr() -> impl Strategy<Value = String> {
    (
        arb_ident(),
        arb_ident(),
        prop::collection::vec(arb_simple_expr(), 0..3),
    )
        .prop_map(|(receiver, method, args)| format!("{receiver}.{method}({})", args.join(", ")))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// Parsing never panics on arbitrary text, even unbalanced input.
    #[test]
    fn parser_no_panic(input in ".{0,120}") {
        let _result = parse_unit(&input);
    }

    /// Parsing never panics on text shaped like a unit with a garbage body.
    #[test]
    fn unit_with_garbage_body_no_panic(body in "[a-z0-9 ;(){}+*=.\"-]{0,60}") {
        let source = format!("class U {{ static int f(int a) {{ {body} }} }}");
        let _result = parse_unit(&source);
    }

    #[test]
    fn valid_binary_expr_parses(s in arb_binary_expr()) {
        let (tokens, lex_errors) = lex(&s);
        prop_assert!(lex_errors.is_empty());
        let (id, arena, diagnostics) = Parser::new(&tokens).parse_expression();
        prop_assert!(diagnostics.is_empty(), "errors for {}: {:?}", s, diagnostics);
        prop_assert!(
            matches!(arena.kind(id), ExprKind::Binary { .. }),
            "expected Binary for: {}", s
        );
    }

    #[test]
    fn valid_call_parses(s in arb_call_expr()) {
        let (tokens, _) = lex(&s);
        let (id, arena, diagnostics) = Parser::new(&tokens).parse_expression();
        prop_assert!(diagnostics.is_empty(), "errors for {}: {:?}", s, diagnostics);
        prop_assert!(
            matches!(arena.kind(id), ExprKind::MethodCall { .. }),
            "expected MethodCall for: {}", s
        );
    }

    /// A bare expression body is a single tail statement.
    #[test]
    fn bare_expression_is_tail(s in arb_binary_expr()) {
        let source = format!("class U {{ static Object f() {{ {s} }} }}");
        let result = parse_unit(&source);
        prop_assert!(result.diagnostics.is_empty(), "errors for {}: {:?}", s, result.diagnostics);
        let unit = result.unit.ok_or_else(|| TestCaseError::fail("no unit"))?;
        prop_assert_eq!(unit.method.body.len(), 1);
        prop_assert!(matches!(unit.method.body[0].kind, snip_ir::StmtKind::Tail(_)));
    }
}

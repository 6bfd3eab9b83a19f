//! Error recovery: diagnostics are collected, partial trees are kept and
//! every input terminates.

use csparse_syntax::{CsParse, DiagnosticCode, ParseOptions};

fn codes(src: &str) -> Vec<DiagnosticCode> {
    CsParse::new().parse(src).unwrap().diagnostics.iter().map(|d| d.code).collect()
}

#[test]
fn unexpected_token_message() {
    let out = CsParse::new().parse("x; ) y;").unwrap();
    assert_eq!(out.messages(), vec!["Unexpected token at 3: SYMBOL \")\""]);
    assert_eq!(out.program.body.len(), 2);
}

#[test]
fn missing_closing_paren() {
    let out = CsParse::new().parse("if (a { b; }").unwrap();
    assert_eq!(out.diagnostics[0].code, DiagnosticCode::ExpectedToken);
    assert_eq!(out.diagnostics[0].expected.as_deref(), Some("\")\" after if condition"));
}

#[test]
fn unterminated_block_reports_end_of_input() {
    let out = CsParse::new().parse("while (a) { b;").unwrap();
    assert_eq!(out.messages(), vec!["Expected \"}\" to close while body at end of input"]);
}

#[test]
fn bad_member_continuation() {
    assert_eq!(codes("class A { int x = 5; int y; }"), vec![DiagnosticCode::InvalidMember]);
}

#[test]
fn recovery_continues_with_next_member() {
    let out = CsParse::new().parse("class A { 5; void F() { } int y; }").unwrap();
    assert_eq!(out.diagnostics.len(), 1);
    assert_eq!(out.diagnostics[0].code, DiagnosticCode::MissingType);
    let json = serde_json::to_value(&out.program).unwrap();
    assert_eq!(json["body"][0]["body"][0]["name"], "F");
    assert_eq!(json["body"][0]["body"][1]["name"], "y");
}

#[test]
fn method_without_body_or_semicolon() {
    assert_eq!(codes("class A { void F() int y; }"), vec![DiagnosticCode::InvalidMember]);
}

#[test]
fn declaration_in_operand_position() {
    assert!(codes("x = class A { };").contains(&DiagnosticCode::ExpressionRequired));
}

#[test]
fn missing_generic_close() {
    let out = CsParse::new().parse("class A<T { }").unwrap();
    assert!(out.has_errors());
    assert!(out.program.body.is_empty());
}

#[test]
fn unclosed_class_at_end_of_input() {
    let out = CsParse::new().parse("namespace N { class A { int x;").unwrap();
    assert!(out.messages().iter().any(|m| m.ends_with("at end of input")));
}

#[test]
fn rendered_diagnostic_points_at_token() {
    let src = "a = 1;\nclass ;";
    let out = CsParse::new().parse(src).unwrap();
    let rendered = out.render_diagnostics(src, "demo.cs");
    assert!(rendered.contains("--> demo.cs:2:7"), "{}", rendered);
    assert!(rendered.contains("  2 | class ;"));
}

// ============================================================================
// Options
// ============================================================================

#[test]
fn deep_nesting_hits_depth_guard() {
    let depth = 5_000;
    let src = format!("{}1{}", "(".repeat(depth), ")".repeat(depth));
    let out = CsParse::new().parse(&src).unwrap();
    assert!(out.diagnostics.iter().any(|d| d.code == DiagnosticCode::NestingTooDeep));
}

#[test]
fn deep_unary_chain_hits_depth_guard() {
    let ctx = CsParse::with_options(ParseOptions { max_depth: 16, max_diagnostics: None });
    let out = ctx.parse(&format!("{}x", "!".repeat(64))).unwrap();
    assert_eq!(out.diagnostics[0].code, DiagnosticCode::NestingTooDeep);
}

#[test]
fn nesting_within_limit_is_clean() {
    let ctx = CsParse::with_options(ParseOptions { max_depth: 16, max_diagnostics: None });
    let out = ctx.parse("((((1))))").unwrap();
    assert!(out.diagnostics.is_empty());
}

#[test]
fn diagnostic_budget_stops_early() {
    let ctx = CsParse::from_toml_str("max_diagnostics = 3").unwrap();
    let out = ctx.parse(&") ".repeat(100)).unwrap();
    assert_eq!(out.diagnostics.len(), 3);
}

#[test]
fn budget_keeps_partial_tree() {
    let ctx = CsParse::with_options(ParseOptions { max_depth: 256, max_diagnostics: Some(1) });
    let out = ctx.parse("a; b; ) c; ) d;").unwrap();
    assert_eq!(out.diagnostics.len(), 1);
    assert_eq!(out.program.body.len(), 2);
}

#[test]
fn deeply_nested_classes_hit_depth_guard() {
    let ctx = CsParse::with_options(ParseOptions { max_depth: 32, max_diagnostics: None });
    let src = format!("{}{}", "class A { ".repeat(200), "} ".repeat(200));
    let out = ctx.parse(&src).unwrap();
    assert!(out.diagnostics.iter().any(|d| d.code == DiagnosticCode::NestingTooDeep));
}

#[test]
fn long_else_if_chain_hits_depth_guard() {
    let src = format!("if (a) {{ }}{}", " else if (a) { }".repeat(2000));
    let out = CsParse::new().parse(&src).unwrap();
    assert!(out.diagnostics.iter().any(|d| d.code == DiagnosticCode::NestingTooDeep));
}

#[test]
fn short_else_if_chain_is_clean() {
    let src = format!("if (a) {{ }}{}", " else if (a) { }".repeat(100));
    let out = CsParse::new().parse(&src).unwrap();
    assert!(out.diagnostics.is_empty());
    assert_eq!(out.program.body.len(), 1);
}

#[test]
fn deeply_nested_generic_arguments_hit_depth_guard() {
    let src = format!("class C {{ {}int{} x; }}", "A<".repeat(2000), ">".repeat(2000));
    let out = CsParse::new().parse(&src).unwrap();
    assert!(out.diagnostics.iter().any(|d| d.code == DiagnosticCode::NestingTooDeep));
}

#[test]
fn long_flat_sum_hits_depth_guard() {
    let src = vec!["1"; 100_000].join(" + ");
    let out = CsParse::new().parse(&src).unwrap();
    assert!(out.diagnostics.iter().any(|d| d.code == DiagnosticCode::NestingTooDeep));
}

#[test]
fn long_postfix_chain_hits_depth_guard() {
    let src = format!("i{};", "++".repeat(10_000));
    let out = CsParse::new().parse(&src).unwrap();
    assert_eq!(out.diagnostics[0].code, DiagnosticCode::NestingTooDeep);
}

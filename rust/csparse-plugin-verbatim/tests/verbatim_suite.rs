//! The verbatim plugin installed on a real parsing context.

use csparse_plugin_verbatim::{plugin, plugin_keeping_directives};
use csparse_syntax::{CsParse, TokenKind};
use serde_json::json;

fn ctx() -> CsParse {
    let mut ctx = CsParse::new();
    ctx.register_plugin(plugin);
    ctx
}

#[test]
fn verbatim_string_node() {
    let out = ctx().parse(r#"path = @"c:\temp\""log"".txt";"#).unwrap();
    assert!(out.diagnostics.is_empty(), "{:?}", out.messages());
    let json = serde_json::to_value(&out.program).unwrap();
    assert_eq!(
        json["body"][0]["right"],
        json!({
            "type": "VerbatimString",
            "value": {"raw": r#"@"c:\temp\""log"".txt""#, "text": r#"c:\temp\"log".txt"#},
            "children": []
        })
    );
}

#[test]
fn verbatim_string_spans_lines() {
    let tokens = ctx().lex("@\"line one\nline two\"").unwrap().tokens;
    assert_eq!(tokens.len(), 1);
    assert_eq!(tokens[0].kind, TokenKind::custom("VERBATIM_STR"));
}

#[test]
fn verbatim_argument_in_call() {
    let out = ctx().parse(r#"File.ReadAllText(@"data\in.csv");"#).unwrap();
    let json = serde_json::to_value(&out.program).unwrap();
    assert_eq!(json["body"][0]["body"][1]["arguments"][0]["type"], "VerbatimString");
}

#[test]
fn without_plugin_verbatim_is_a_lex_error() {
    assert!(CsParse::new().parse(r#"x = @"a";"#).is_err());
}

#[test]
fn directives_are_dropped() {
    let src = "#region Fields\nclass A {\n#if DEBUG\n  int x;\n#endif\n}\n#endregion\n";
    let out = ctx().parse(src).unwrap();
    assert!(out.diagnostics.is_empty(), "{:?}", out.messages());
    assert_eq!(out.program.body.len(), 1);
    assert_eq!(out.program.body[0].type_name(), "ClassDeclaration");
}

#[test]
fn kept_directives_become_nodes() {
    let mut ctx = CsParse::new();
    ctx.register_plugin(plugin_keeping_directives);
    let out = ctx.parse("#pragma warning disable 168\nx = 1;").unwrap();
    assert!(out.diagnostics.is_empty(), "{:?}", out.messages());
    let json = serde_json::to_value(&out.program).unwrap();
    assert_eq!(json["body"][0]["type"], "PreprocessorDirective");
    assert_eq!(json["body"][0]["value"], json!({"name": "pragma", "argument": "warning disable 168"}));
    assert_eq!(json["body"][1]["type"], "AssignmentExpression");
}

#[test]
fn hash_outside_directives_still_fails() {
    assert!(ctx().lex("#nope").is_err());
}

//! Verbatim strings and preprocessor directive lines for csparse.
//!
//! Two extensions:
//! - `verbatim-string`: `@"c:\temp\""x"""` literals, where `""` is an
//!   escaped quote and backslashes are literal. Parsed into a
//!   `VerbatimString` node.
//! - `preprocessor`: `#region`, `#if DEBUG`, `#pragma ...` lines. Dropped by
//!   the lexer, or kept as `PreprocessorDirective` nodes with
//!   [`plugin_keeping_directives`].
//!
//! ```ignore
//! let mut ctx = CsParse::new();
//! ctx.register_plugin(csparse_plugin_verbatim::plugin);
//! ```

use csparse_syntax::syntax::ast::{Expr, ExtensionNode, Node};
use csparse_syntax::syntax::plugin::rule;
use csparse_syntax::{CsParse, Extension, Lexer, Parser, PluginDescriptor, PluginError, TokenAliases, TokenKind};
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::json;
use std::rc::Rc;
use tracing::debug;

pub const VERBATIM_KIND: &str = "VERBATIM_STR";
pub const DIRECTIVE_KIND: &str = "PREPROCESSOR";

const VERBATIM_PATTERN: &str = r#"@"(?:""|[^"])*""#;
const DIRECTIVE_PATTERN: &str =
    r"#(?:region|endregion|if|elif|else|endif|define|undef|pragma|nullable|warning|error|line)\b[^\n]*";

static DIRECTIVE_PARTS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^#(\w+)[ \t]*(.*?)\s*$").expect("directive pattern compiles"));

/// Plugin factory: verbatim strings plus discarded directive lines.
pub fn plugin(_ctx: &CsParse) -> PluginDescriptor {
    PluginDescriptor::new("verbatim")
        .extension("verbatim-string", VerbatimString)
        .extension("preprocessor", Preprocessor { keep: false })
}

/// Like [`plugin`] but directive lines become `PreprocessorDirective` nodes.
pub fn plugin_keeping_directives(_ctx: &CsParse) -> PluginDescriptor {
    PluginDescriptor::new("verbatim")
        .extension("verbatim-string", VerbatimString)
        .extension("preprocessor", Preprocessor { keep: true })
}

/// Text between the quotes of a verbatim literal, `""` collapsed to `"`.
pub fn unescape_verbatim(literal: &str) -> Option<String> {
    let inner = literal.strip_prefix("@\"")?.strip_suffix('"')?;
    Some(inner.replace("\"\"", "\""))
}

fn token_kind(aliases: &TokenAliases, alias: &str, name: &str) -> TokenKind {
    aliases.get(alias).cloned().unwrap_or_else(|| TokenKind::custom(name))
}

// ---------------------------------------------------------------------------
// Verbatim strings
// ---------------------------------------------------------------------------

pub struct VerbatimString;

impl Extension for VerbatimString {
    fn aliases(&self, aliases: &mut TokenAliases) {
        aliases.insert("verbatim", TokenKind::custom(VERBATIM_KIND));
    }

    fn lex(&self, lexer: &mut Lexer<'_>) -> Result<(), PluginError> {
        lexer.insert_rule_before(&TokenKind::String, rule(TokenKind::custom(VERBATIM_KIND), VERBATIM_PATTERN, false)?);
        Ok(())
    }

    fn parse(&self, parser: &mut Parser, aliases: &TokenAliases) {
        let kind = token_kind(aliases, "verbatim", VERBATIM_KIND);
        parser.define_routine(
            "verbatim_string",
            Rc::new(move |p: &mut Parser| {
                if !p.check(&kind, None) {
                    return None;
                }
                let tok = p.consume()?;
                let text = unescape_verbatim(&tok.text)?;
                let value = json!({ "raw": tok.text, "text": text });
                Some(Node::Expr(Expr::Extension(ExtensionNode::new("VerbatimString", value))))
            }),
        );
        parser.push_expression_extension(Rc::new(|p: &mut Parser| p.call_routine("verbatim_string")));
        debug!("verbatim string routine installed");
    }
}

// ---------------------------------------------------------------------------
// Preprocessor directives
// ---------------------------------------------------------------------------

pub struct Preprocessor {
    /// Emit directive tokens and parse them into nodes instead of skipping
    pub keep: bool,
}

impl Extension for Preprocessor {
    fn aliases(&self, aliases: &mut TokenAliases) {
        if self.keep {
            aliases.insert("directive", TokenKind::custom(DIRECTIVE_KIND));
        }
    }

    fn lex(&self, lexer: &mut Lexer<'_>) -> Result<(), PluginError> {
        lexer.push_rule(rule(TokenKind::custom(DIRECTIVE_KIND), DIRECTIVE_PATTERN, !self.keep)?);
        Ok(())
    }

    fn parse(&self, parser: &mut Parser, aliases: &TokenAliases) {
        if !self.keep {
            return;
        }
        let kind = token_kind(aliases, "directive", DIRECTIVE_KIND);
        parser.push_expression_extension(Rc::new(move |p: &mut Parser| {
            if !p.check(&kind, None) {
                return None;
            }
            let tok = p.consume()?;
            let caps = DIRECTIVE_PARTS.captures(&tok.text)?;
            let value = json!({ "name": &caps[1], "argument": &caps[2] });
            Some(Node::Expr(Expr::Extension(ExtensionNode::new("PreprocessorDirective", value))))
        }));
    }
}

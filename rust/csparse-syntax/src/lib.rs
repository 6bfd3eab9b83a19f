//! csparse
//!
//! Tokenizes and parses a C#-like source language into a JSON-serializable
//! syntax tree. Plugins add token rules and expression forms without
//! touching the core grammar.

pub mod config;
pub mod diagnostics;
pub mod syntax;

pub use config::{ConfigError, ParseOptions};
pub use diagnostics::{Diagnostic, DiagnosticCode, Severity};
pub use syntax::ast::{Node, Program};
pub use syntax::lexer::{LexError, Lexer, TokenRule};
pub use syntax::parser::{ExpressionExtension, Parser};
pub use syntax::plugin::{Extension, PluginDescriptor, PluginError, PluginRegistry};
pub use syntax::tokens::{Token, TokenAliases, TokenKind};

use serde::Serialize;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum CsParseError {
    #[error("lex error: {0}")]
    Lex(#[from] LexError),
    #[error("plugin error: {0}")]
    Plugin(#[from] PluginError),
    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl CsParseError {
    /// Source-located diagnostic for failures that point into the input.
    /// Lex errors carry an offset; plugin and config errors do not.
    pub fn diagnostic(&self) -> Option<Diagnostic> {
        match self {
            CsParseError::Lex(err) => Some(Diagnostic::from(err)),
            CsParseError::Plugin(_) | CsParseError::Config(_) => None,
        }
    }
}

/// Result of [`CsParse::lex`].
#[derive(Debug, Clone, Serialize)]
pub struct LexOutput {
    pub tokens: Vec<Token>,
    /// Always empty: lexing either succeeds or fails with a [`LexError`].
    pub diagnostics: Vec<Diagnostic>,
}

/// Result of [`CsParse::parse`]. A non-empty `diagnostics` list does not
/// mean the tree is empty; whatever parsed is kept.
#[derive(Debug, Clone, Serialize)]
pub struct ParseOutput {
    pub program: Program,
    pub diagnostics: Vec<Diagnostic>,
}

impl ParseOutput {
    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(|d| d.severity == Severity::Error)
    }

    /// Diagnostic messages as plain strings.
    pub fn messages(&self) -> Vec<String> {
        self.diagnostics.iter().map(|d| d.message.clone()).collect()
    }

    pub fn render_diagnostics(&self, source: &str, file: &str) -> String {
        diagnostics::format_diagnostics(&self.diagnostics, source, file)
    }
}

/// Parsing context: options plus the installed plugins. Cheap to share;
/// every `lex`/`parse` call builds its own lexer and parser.
#[derive(Debug, Clone, Default)]
pub struct CsParse {
    options: ParseOptions,
    registry: PluginRegistry,
}

impl CsParse {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: ParseOptions) -> Self {
        Self { options, registry: PluginRegistry::new() }
    }

    /// Context configured from a TOML options table.
    pub fn from_toml_str(source: &str) -> Result<Self, CsParseError> {
        Ok(Self::with_options(ParseOptions::from_toml_str(source)?))
    }

    pub fn options(&self) -> &ParseOptions {
        &self.options
    }

    pub fn plugins(&self) -> &PluginRegistry {
        &self.registry
    }

    /// Install a plugin. The factory sees the context as configured so far.
    pub fn register_plugin<F>(&mut self, factory: F) -> &mut Self
    where
        F: FnOnce(&CsParse) -> PluginDescriptor,
    {
        let plugin = factory(self);
        self.registry.install(plugin);
        self
    }

    /// Lexer with the built-in rules plus every plugin rule.
    pub fn lexer<'a>(&self, source: &'a str) -> Result<Lexer<'a>, CsParseError> {
        let mut lexer = Lexer::new(source);
        self.registry.apply_to_lexer(&mut lexer)?;
        Ok(lexer)
    }

    /// Parser over `tokens` with the context options and every plugin hook.
    pub fn parser(&self, tokens: Vec<Token>) -> Parser {
        let mut parser = Parser::with_options(tokens, self.options.clone());
        self.registry.apply_to_parser(&mut parser, &self.registry.aliases());
        parser
    }

    pub fn lex(&self, source: &str) -> Result<LexOutput, CsParseError> {
        let tokens = self.lexer(source)?.tokenize()?;
        Ok(LexOutput { tokens, diagnostics: Vec::new() })
    }

    pub fn parse(&self, source: &str) -> Result<ParseOutput, CsParseError> {
        let tokens = self.lexer(source)?.tokenize()?;
        let mut parser = self.parser(tokens);
        let program = parser.parse_statements();
        let diagnostics = parser.take_diagnostics();
        debug!(nodes = program.body.len(), diagnostics = diagnostics.len(), "parse finished");
        Ok(ParseOutput { program, diagnostics })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_send_sync<T: Send + Sync>() {}

    #[test]
    fn context_is_shareable() {
        assert_send_sync::<CsParse>();
    }

    #[test]
    fn lex_has_no_diagnostics() {
        let out = CsParse::new().lex("using System;").unwrap();
        assert_eq!(out.tokens.len(), 3);
        assert!(out.diagnostics.is_empty());
    }

    #[test]
    fn parse_keeps_partial_tree() {
        let out = CsParse::new().parse("x = 1; class ; y;").unwrap();
        assert!(out.has_errors());
        assert_eq!(out.program.body.len(), 2);
        assert!(out.messages()[0].starts_with("Expected class name identifier"));
    }

    #[test]
    fn lex_error_surfaces() {
        let err = CsParse::new().parse("a ` b").unwrap_err();
        assert!(matches!(err, CsParseError::Lex(LexError::UnexpectedChar { offset: 2, .. })));
        let diag = err.diagnostic().unwrap();
        assert_eq!(diag.code, DiagnosticCode::UnexpectedChar);
        assert_eq!(diag.offset, Some(2));
    }

    #[test]
    fn config_error_has_no_location() {
        let err = CsParse::from_toml_str("max_depth = -").unwrap_err();
        assert!(err.diagnostic().is_none());
    }

    #[test]
    fn options_from_toml() {
        let ctx = CsParse::from_toml_str("max_depth = 4").unwrap();
        assert_eq!(ctx.options().max_depth, 4);
        assert!(matches!(CsParse::from_toml_str("max_depth = -"), Err(CsParseError::Config(_))));
    }

    #[test]
    fn factory_sees_context() {
        let mut ctx = CsParse::with_options(ParseOptions { max_depth: 9, max_diagnostics: None });
        ctx.register_plugin(|c| PluginDescriptor::new(format!("depth-{}", c.options().max_depth)));
        assert_eq!(ctx.plugins().plugins()[0].name(), "depth-9");
    }
}

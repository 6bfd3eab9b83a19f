//! Recursive descent parser with precedence climbing for expressions.
//!
//! Parse routines never fail hard: a problem is recorded as a [`Diagnostic`]
//! and the routine returns `None`. Every loop that consumes a sequence makes
//! at least one token of progress per iteration, so any token stream
//! terminates.

use crate::config::ParseOptions;
use crate::diagnostics::{Diagnostic, DiagnosticCode};
use crate::syntax::ast::*;
use crate::syntax::tokens::{Token, TokenKind};
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashMap;
use std::rc::Rc;
use tracing::{debug, trace};

/// Hook tried when no built-in primary form matches the current token.
///
/// An extension that does not recognize the token returns `None`; the
/// parser rewinds whatever it consumed before trying the next one.
pub trait ExpressionExtension {
    fn try_parse(&self, parser: &mut Parser) -> Option<Node>;
}

impl<F> ExpressionExtension for F
where
    F: Fn(&mut Parser) -> Option<Node>,
{
    fn try_parse(&self, parser: &mut Parser) -> Option<Node> {
        self(parser)
    }
}

/// Named parse routine installed by a plugin.
pub type Routine = Rc<dyn Fn(&mut Parser) -> Option<Node>>;

const MODIFIERS: &[&str] = &[
    "public", "private", "protected", "internal", "static", "readonly", "sealed", "abstract",
    "virtual", "override", "async",
];

/// Keywords accepted as a simple type name.
const TYPE_KEYWORDS: &[&str] = &["void", "int", "float", "string", "bool", "var"];

const PREFIX_OPERATORS: &[&str] = &["-", "+", "!", "~", "++", "--"];
const UNARY_PRECEDENCE: u8 = 7;

static REPLACEE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\{[^}]*\}").expect("replacee pattern compiles"));

/// Binding power of a binary operator; higher binds tighter.
pub fn precedence(operator: &str) -> Option<u8> {
    match operator {
        "||" => Some(1),
        "&&" => Some(2),
        "=" | "==" | "!=" => Some(3),
        "<" | "<=" | ">" | ">=" => Some(4),
        "+" | "-" => Some(5),
        "*" | "/" | "%" => Some(6),
        _ => None,
    }
}

pub struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    diagnostics: Vec<Diagnostic>,
    extensions: Vec<Rc<dyn ExpressionExtension>>,
    routines: HashMap<String, Routine>,
    options: ParseOptions,
    depth: usize,
}

impl Parser {
    pub fn new(tokens: Vec<Token>) -> Self {
        Self::with_options(tokens, ParseOptions::default())
    }

    pub fn with_options(tokens: Vec<Token>, options: ParseOptions) -> Self {
        Self {
            tokens,
            pos: 0,
            diagnostics: Vec::new(),
            extensions: Vec::new(),
            routines: HashMap::new(),
            options,
            depth: 0,
        }
    }

    pub fn options(&self) -> &ParseOptions {
        &self.options
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn take_diagnostics(&mut self) -> Vec<Diagnostic> {
        std::mem::take(&mut self.diagnostics)
    }

    // ── Cursor ──

    pub fn current(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    /// Token `n` positions ahead; `peek(0)` is the current token.
    pub fn peek(&self, n: usize) -> Option<&Token> {
        self.tokens.get(self.pos + n)
    }

    pub fn at_end(&self) -> bool {
        self.pos >= self.tokens.len()
    }

    pub fn advance(&mut self, n: usize) {
        self.pos = (self.pos + n).min(self.tokens.len());
    }

    /// Take the current token and move past it.
    pub fn consume(&mut self) -> Option<Token> {
        let tok = self.current().cloned()?;
        self.pos += 1;
        Some(tok)
    }

    /// Current token has `kind` and, when given, exactly `value` as text.
    pub fn check(&self, kind: &TokenKind, value: Option<&str>) -> bool {
        self.current()
            .is_some_and(|t| &t.kind == kind && value.map_or(true, |v| t.text == v))
    }

    fn check_symbol(&self, symbol: &str) -> bool {
        self.check(&TokenKind::Symbol, Some(symbol))
    }

    fn check_keyword(&self, keyword: &str) -> bool {
        self.check(&TokenKind::Keyword, Some(keyword))
    }

    /// Like [`check`](Self::check) but describes the mismatch.
    pub fn expect(&self, kind: &TokenKind, value: Option<&str>, what: &str) -> Result<&Token, Diagnostic> {
        match self.current() {
            Some(tok) if &tok.kind == kind && value.map_or(true, |v| tok.text == v) => Ok(tok),
            other => Err(Diagnostic::expected(what, other)),
        }
    }

    /// Consume the expected token or record why it is missing.
    pub fn require(&mut self, kind: &TokenKind, value: Option<&str>, what: &str) -> Option<Token> {
        let checked = self.expect(kind, value, what).map(|_| ());
        match checked {
            Ok(()) => self.consume(),
            Err(diag) => {
                self.report(diag);
                None
            }
        }
    }

    fn require_symbol(&mut self, symbol: &str, what: &str) -> Option<Token> {
        self.require(&TokenKind::Symbol, Some(symbol), what)
    }

    fn require_keyword(&mut self, keyword: &str) -> Option<Token> {
        self.require(&TokenKind::Keyword, Some(keyword), &format!("\"{}\" keyword", keyword))
    }

    /// Offset of the current token, or "end of input".
    fn here(&self) -> String {
        self.current().map_or_else(|| "end of input".to_string(), |t| t.offset.to_string())
    }

    /// Record a diagnostic. Once `max_diagnostics` is reached further
    /// reports are dropped and every loop winds down.
    pub fn report(&mut self, diagnostic: Diagnostic) {
        if self.halted() {
            return;
        }
        debug!(code = %diagnostic.code, offset = ?diagnostic.offset, "{}", diagnostic.message);
        self.diagnostics.push(diagnostic);
    }

    fn halted(&self) -> bool {
        self.options.max_diagnostics.is_some_and(|max| self.diagnostics.len() >= max)
    }

    // ── Extension points ──

    pub fn push_expression_extension(&mut self, extension: Rc<dyn ExpressionExtension>) {
        self.extensions.push(extension);
    }

    pub fn expression_extension_count(&self) -> usize {
        self.extensions.len()
    }

    /// Define (or replace) a named routine.
    pub fn define_routine(&mut self, name: impl Into<String>, routine: Routine) {
        self.routines.insert(name.into(), routine);
    }

    pub fn routine(&self, name: &str) -> Option<Routine> {
        self.routines.get(name).cloned()
    }

    /// Run a named routine; `None` when it is undefined or declines.
    pub fn call_routine(&mut self, name: &str) -> Option<Node> {
        let routine = self.routine(name)?;
        routine(self)
    }

    /// First extension to return a node wins. A declining extension leaves
    /// neither position nor diagnostics behind.
    fn parse_with_extensions(&mut self) -> Option<Node> {
        let extensions = self.extensions.clone();
        for extension in &extensions {
            let start = self.pos;
            let reported = self.diagnostics.len();
            if let Some(node) = extension.try_parse(self) {
                return Some(node);
            }
            self.pos = start;
            self.diagnostics.truncate(reported);
        }
        None
    }

    // ── Statements ──

    pub fn parse_statements(&mut self) -> Program {
        let mut body = Vec::new();
        while !self.at_end() && !self.halted() {
            if let Some(node) = self.parse_statement() {
                body.push(node);
            }
        }
        debug!(nodes = body.len(), diagnostics = self.diagnostics.len(), "parsed program");
        Program { body }
    }

    /// One statement plus an optional trailing `;`. Consumes at least one
    /// token.
    fn parse_statement(&mut self) -> Option<Node> {
        let start = self.pos;
        if self.check_symbol(";") {
            self.advance(1);
            return None;
        }
        let node = self.parse_expression(0);
        if self.check_symbol(";") {
            self.advance(1);
        }
        if self.pos == start {
            self.advance(1);
        }
        node
    }

    /// Statements up to (not including) the `terminator` symbol.
    pub fn parse_block(&mut self, terminator: &str) -> Block {
        let mut body = Vec::new();
        while !self.at_end() && !self.check_symbol(terminator) && !self.halted() {
            if let Some(node) = self.parse_statement() {
                body.push(node);
            }
        }
        Block { body }
    }

    fn parse_braced_block(&mut self, owner: &str) -> Option<Block> {
        self.require_symbol("{", &format!("\"{{\" to open {} body", owner))?;
        let block = self.parse_block("}");
        self.require_symbol("}", &format!("\"}}\" to close {} body", owner))?;
        Some(block)
    }

    fn parse_condition(&mut self, owner: &str) -> Option<Expr> {
        self.require_symbol("(", &format!("\"(\" after \"{}\"", owner))?;
        let condition = self.parse_operand(0)?;
        self.require_symbol(")", &format!("\")\" after {} condition", owner))?;
        Some(condition)
    }

    /// `if (c) { .. }` with any number of `else if` links and an optional
    /// final `else`.
    pub fn parse_if(&mut self) -> Option<IfStmt> {
        trace!(offset = ?self.current().map(|t| t.offset), "if statement");
        self.require_keyword("if")?;
        let condition = self.parse_condition("if")?;
        let consequent = self.parse_braced_block("if")?;
        let mut alternate = None;
        if self.check_keyword("else") {
            self.advance(1);
            alternate = if self.check_keyword("if") {
                Some(Alternate::ElseIf(Box::new(self.nested(|p| p.parse_if())?)))
            } else {
                Some(Alternate::Else(ElseStmt { body: self.parse_braced_block("else")? }))
            };
        }
        Some(IfStmt { condition, consequent, alternate })
    }

    pub fn parse_while(&mut self) -> Option<WhileStmt> {
        self.require_keyword("while")?;
        let condition = self.parse_condition("while")?;
        let consequent = self.parse_braced_block("while")?;
        Some(WhileStmt { condition, consequent })
    }

    // ── Declarations ──

    fn is_modifier(tok: &Token) -> bool {
        tok.kind == TokenKind::Keyword && MODIFIERS.contains(&tok.text.as_str())
    }

    /// Modifiers (if any) followed by `class`.
    fn at_class_declaration(&self) -> bool {
        let mut i = 0;
        while self.peek(i).is_some_and(Self::is_modifier) {
            i += 1;
        }
        self.peek(i).is_some_and(|t| t.is_keyword("class"))
    }

    fn parse_modifiers(&mut self) -> Vec<String> {
        let mut modifiers = Vec::new();
        while let Some(tok) = self.current().filter(|t| Self::is_modifier(t)) {
            modifiers.push(tok.text.clone());
            self.advance(1);
        }
        modifiers
    }

    pub fn parse_class(&mut self) -> Option<ClassDecl> {
        let modifiers = self.parse_modifiers();
        self.require_keyword("class")?;
        let name = self.require(&TokenKind::Identifier, None, "class name identifier")?.text;
        trace!(class = %name, "class declaration");

        let mut generics = Vec::new();
        if self.check_symbol("<") {
            self.advance(1);
            while !self.at_end() && !self.check_symbol(">") {
                let param = self.require(&TokenKind::Identifier, None, "identifier in generic parameter list")?;
                generics.push(param.text);
                if !self.check_symbol(",") {
                    break;
                }
                self.advance(1);
            }
            self.require_symbol(">", "\">\" to close generic parameter list")?;
        }

        let mut base_types = Vec::new();
        if self.check_symbol(":") {
            self.advance(1);
            base_types = self.parse_type_list();
        }

        self.require_symbol("{", "\"{\" to open class body")?;
        let body = self.parse_members(false);
        self.require_symbol("}", "\"}\" to close class body")?;
        Some(ClassDecl { modifiers, name, generics, base_types, body })
    }

    /// Class or namespace body up to the closing `}`.
    fn parse_members(&mut self, namespace_items: bool) -> Vec<Member> {
        let mut body = Vec::new();
        while !self.at_end() && !self.check_symbol("}") && !self.halted() {
            let start = self.pos;
            match self.nested(|p| p.parse_body_item(namespace_items)) {
                Some(member) => body.push(member),
                None => self.skip_member(),
            }
            if self.pos == start && !self.check_symbol("}") {
                self.advance(1);
            }
        }
        body
    }

    fn parse_body_item(&mut self, namespace_items: bool) -> Option<Member> {
        if self.at_class_declaration() {
            return self.parse_class().map(Member::Class);
        }
        if namespace_items && self.check_keyword("namespace") {
            return self.parse_namespace().map(Member::Namespace);
        }
        if namespace_items && self.check_keyword("using") {
            return self.parse_using().map(Member::Using);
        }
        self.parse_member().map(Member::Member)
    }

    /// Skip the rest of a broken member: up to and including the next `;`
    /// or balanced `{ .. }`, stopping before the enclosing `}`.
    fn skip_member(&mut self) {
        let mut depth = 0usize;
        while let Some(tok) = self.current() {
            if tok.is_symbol("{") {
                depth += 1;
            } else if tok.is_symbol("}") {
                if depth == 0 {
                    return;
                }
                depth -= 1;
                if depth == 0 {
                    self.advance(1);
                    return;
                }
            } else if tok.is_symbol(";") && depth == 0 {
                self.advance(1);
                return;
            }
            self.advance(1);
        }
    }

    /// Field or method: modifiers, type, name, then `;` or a parameter list
    /// with a body (or `;`).
    pub fn parse_member(&mut self) -> Option<ClassMember> {
        let modifiers = self.parse_modifiers();
        let Some(return_type) = self.parse_type() else {
            let diag = Diagnostic::error(
                DiagnosticCode::MissingType,
                format!("Expected a valid return type for class/namespace member at {}", self.here()),
                self.current(),
            );
            self.report(diag);
            return None;
        };
        let name = self.require(&TokenKind::Identifier, None, "identifier for class/namespace member name")?.text;

        if self.check_symbol("(") {
            let parameters = self.parse_args()?;
            let body = if self.check_symbol("{") {
                Some(self.parse_method_body())
            } else if self.check_symbol(";") {
                self.advance(1);
                None
            } else {
                let diag = Diagnostic::error(
                    DiagnosticCode::InvalidMember,
                    format!("Expected \"{{\" or \";\" after method declaration at {}", self.here()),
                    self.current(),
                );
                self.report(diag);
                return None;
            };
            return Some(ClassMember { modifiers, return_type, name, kind: MemberKind::Method, parameters, body });
        }

        if self.check_symbol(";") {
            self.advance(1);
            return Some(ClassMember {
                modifiers,
                return_type,
                name,
                kind: MemberKind::Field,
                parameters: Vec::new(),
                body: None,
            });
        }

        let diag = Diagnostic::error(
            DiagnosticCode::InvalidMember,
            format!("Unexpected token after class/namespace member name at {}", self.here()),
            self.current(),
        );
        self.report(diag);
        None
    }

    /// Method body; the cursor is on the opening `{`. Nested braces are
    /// tracked by depth and statements in between are parsed normally.
    fn parse_method_body(&mut self) -> Block {
        self.advance(1);
        let mut body = Vec::new();
        let mut depth = 1usize;
        while !self.at_end() && !self.halted() {
            if self.check_symbol("{") {
                depth += 1;
                self.advance(1);
                continue;
            }
            if self.check_symbol("}") {
                depth -= 1;
                self.advance(1);
                if depth == 0 {
                    break;
                }
                continue;
            }
            if let Some(node) = self.parse_statement() {
                body.push(node);
            }
        }
        if depth > 0 && self.at_end() {
            self.report(Diagnostic::expected("\"}\" to close method body", None));
        }
        Block { body }
    }

    pub fn parse_namespace(&mut self) -> Option<NamespaceDecl> {
        self.require_keyword("namespace")?;
        let Some(name) = self.parse_identifier() else {
            let diag = Diagnostic::expected("namespace name", self.current());
            self.report(diag);
            return None;
        };
        trace!(namespace = ?name.dotted_path(), "namespace declaration");
        // file-scoped form
        if self.check_symbol(";") {
            self.advance(1);
            return Some(NamespaceDecl { name, body: Vec::new() });
        }
        self.require_symbol("{", "\"{\" to open namespace body")?;
        let body = self.parse_members(true);
        self.require_symbol("}", "\"}\" to close namespace body")?;
        Some(NamespaceDecl { name, body })
    }

    /// `using [static] [Alias =] Target;`
    pub fn parse_using(&mut self) -> Option<UsingDirective> {
        self.require_keyword("using")?;
        let is_static = self.check_keyword("static");
        if is_static {
            self.advance(1);
        }
        let mut alias = None;
        if self.check(&TokenKind::Identifier, None) && self.peek(1).is_some_and(|t| t.is_symbol("=")) {
            alias = self.consume().map(|t| t.text);
            self.advance(1);
        }
        let Some(target) = self.parse_identifier() else {
            let diag = Diagnostic::expected("target of using directive", self.current());
            self.report(diag);
            return None;
        };
        self.require_symbol(";", "\";\" after using directive")?;
        Some(UsingDirective { alias, is_static, target })
    }

    // ── Types ──

    /// A type keyword or a dotted name, with an optional `<..>` argument
    /// list. Returns `None` without a diagnostic when no type starts here.
    pub fn parse_type(&mut self) -> Option<TypeExpr> {
        let tok = self.current()?.clone();
        let mut ty = match tok.kind {
            TokenKind::Keyword if TYPE_KEYWORDS.contains(&tok.text.as_str()) => {
                self.advance(1);
                TypeExpr::simple(tok.text)
            }
            TokenKind::Identifier => {
                self.advance(1);
                let mut name = tok.text;
                while self.check_symbol(".")
                    && self.peek(1).is_some_and(|t| t.kind == TokenKind::Identifier)
                {
                    self.advance(1);
                    let segment = self.consume()?;
                    name.push('.');
                    name.push_str(&segment.text);
                }
                TypeExpr::named(name)
            }
            _ => return None,
        };
        if self.check_symbol("<") {
            self.advance(1);
            ty.generics = self.nested(|p| Some(p.parse_type_list()))?;
            self.require_symbol(">", "\">\" to close type argument list")?;
        }
        Some(ty)
    }

    /// Comma separated types; stops (with a diagnostic) at the first
    /// position that holds no type.
    pub fn parse_type_list(&mut self) -> Vec<TypeExpr> {
        let mut types = Vec::new();
        loop {
            let Some(ty) = self.parse_type() else {
                let diag = Diagnostic::expected("a type inside type list", self.current());
                self.report(diag);
                break;
            };
            types.push(ty);
            if !self.check_symbol(",") {
                break;
            }
            self.advance(1);
        }
        types
    }

    // ── Expressions ──

    /// Identifier with its `.name`, `[expr]` and `(args)` postfixes.
    /// Returns `None` without a diagnostic when the current token is not an
    /// identifier.
    pub fn parse_identifier(&mut self) -> Option<AccessExpr> {
        if !self.check(&TokenKind::Identifier, None) {
            return None;
        }
        let target = self.consume()?;
        let mut body = Vec::new();
        loop {
            if self.check_symbol(".") {
                self.advance(1);
                let property = self.require(&TokenKind::Identifier, None, "identifier after dot in access expression")?;
                body.push(AccessOp::Dot { property });
            } else if self.check_symbol("[") {
                self.advance(1);
                let expression = self.parse_operand(0)?;
                self.require_symbol("]", "closing bracket in access expression")?;
                body.push(AccessOp::Bracket { expression: Box::new(expression) });
            } else if self.check_symbol("(") {
                let arguments = self.parse_args()?;
                body.push(AccessOp::Call { arguments });
            } else {
                break;
            }
        }
        Some(AccessExpr { target, body })
    }

    /// Parenthesized, comma separated expressions.
    pub fn parse_args(&mut self) -> Option<Vec<Expr>> {
        self.require_symbol("(", "opening parenthesis for argument list")?;
        let mut args = Vec::new();
        while !self.at_end() && !self.check_symbol(")") {
            let Some(arg) = self.parse_operand(0) else {
                break;
            };
            args.push(arg);
            if !self.check_symbol(",") {
                break;
            }
            self.advance(1);
        }
        self.require_symbol(")", "closing parenthesis for argument list")?;
        Some(args)
    }

    pub fn parse_template_literal(&mut self) -> Option<TemplateLiteral> {
        if !self.check(&TokenKind::InterpolatedString, None) {
            return None;
        }
        let tok = self.consume()?;
        let replacees = REPLACEE.find_iter(&tok.text).map(|m| m.as_str().to_string()).collect();
        Some(TemplateLiteral { template: tok.text, replacees })
    }

    /// Expression in a position where statements and declarations are not
    /// allowed.
    pub fn parse_operand(&mut self, min_precedence: u8) -> Option<Expr> {
        let at = self.current().cloned();
        match self.parse_expression(min_precedence)? {
            Node::Expr(expr) => Some(expr),
            other => {
                let at_text = at.as_ref().map_or_else(|| "end of input".to_string(), |t| t.offset.to_string());
                let diag = Diagnostic::error(
                    DiagnosticCode::ExpressionRequired,
                    format!("Expected an expression at {}, got {}", at_text, other.type_name()),
                    at.as_ref(),
                );
                self.report(diag);
                None
            }
        }
    }

    /// Precedence climbing entry point. Statement and declaration forms
    /// come back as-is; expressions continue through the binary loop while
    /// operators bind at least as tightly as `min_precedence`.
    pub fn parse_expression(&mut self, min_precedence: u8) -> Option<Node> {
        self.nested(|p| p.parse_expression_at_depth(min_precedence))
    }

    /// Run `f` one nesting level deeper, or report `P006` at the limit.
    fn nested<T>(&mut self, f: impl FnOnce(&mut Self) -> Option<T>) -> Option<T> {
        if self.too_deep(0) {
            return None;
        }
        self.depth += 1;
        let result = f(self);
        self.depth -= 1;
        result
    }

    fn parse_expression_at_depth(&mut self, min_precedence: u8) -> Option<Node> {
        let Some(token) = self.current().cloned() else {
            self.report(Diagnostic::expected("an expression", None));
            return None;
        };

        let left = if token.kind == TokenKind::Symbol && PREFIX_OPERATORS.contains(&token.text.as_str()) {
            self.advance(1);
            let argument = self.parse_operand(UNARY_PRECEDENCE)?;
            Expr::Unary(UnaryExpr { operator: token.text, argument: Box::new(argument), prefix: true })
        } else {
            match self.parse_primary(&token)? {
                Node::Expr(expr) => expr,
                other => return Some(other),
            }
        };

        self.parse_binary(left, min_precedence).map(Node::Expr)
    }

    /// Reports P006 when `extra` levels on top of the current depth would
    /// pass the configured maximum.
    fn too_deep(&mut self, extra: usize) -> bool {
        if self.depth + extra < self.options.max_depth {
            return false;
        }
        let diag = Diagnostic::error(
            DiagnosticCode::NestingTooDeep,
            format!("Nesting exceeds {} levels at {}", self.options.max_depth, self.here()),
            self.current(),
        );
        self.report(diag);
        true
    }

    /// Each fold deepens the left spine, so long chains count against
    /// `max_depth` like any other nesting, right operands included.
    fn parse_binary(&mut self, left: Expr, min_precedence: u8) -> Option<Expr> {
        let base = self.depth;
        let result = self.fold_binary(left, min_precedence);
        self.depth = base;
        result
    }

    fn fold_binary(&mut self, mut left: Expr, min_precedence: u8) -> Option<Expr> {
        while let Some((operator, prec)) = self.current_operator().filter(|&(_, p)| p >= min_precedence) {
            if self.too_deep(0) {
                return None;
            }
            self.advance(1);
            let right = self.parse_operand(prec + 1)?;
            left = Expr::binary(operator, left, right);
            self.depth += 1;
        }
        Some(left)
    }

    fn current_operator(&self) -> Option<(String, u8)> {
        let tok = self.current().filter(|t| t.kind == TokenKind::Symbol)?;
        precedence(&tok.text).map(|p| (tok.text.clone(), p))
    }

    fn parse_primary(&mut self, token: &Token) -> Option<Node> {
        let literal = match token.kind {
            TokenKind::Number => Some(LiteralKind::Number),
            TokenKind::String => Some(LiteralKind::String),
            TokenKind::Char => Some(LiteralKind::Char),
            _ => None,
        };
        if let Some(kind) = literal {
            self.advance(1);
            return Some(Expr::Literal(Literal { kind, value: token.text.clone() }).into());
        }
        if token.kind == TokenKind::Identifier {
            return self.parse_identifier_expression().map(Node::Expr);
        }
        if token.is_symbol("(") {
            self.advance(1);
            let inner = self.parse_expression(0)?;
            self.require_symbol(")", "closing parenthesis")?;
            return Some(inner);
        }
        if self.at_class_declaration() {
            return self.parse_class().map(|c| Decl::Class(c).into());
        }
        if token.is_keyword("using") {
            return self.parse_using().map(|u| Decl::Using(u).into());
        }
        if token.is_keyword("namespace") {
            return self.parse_namespace().map(|n| Decl::Namespace(n).into());
        }
        if token.kind == TokenKind::InterpolatedString {
            return self.parse_template_literal().map(|t| Expr::TemplateLiteral(t).into());
        }
        if token.is_keyword("if") {
            return self.parse_if().map(|s| Stmt::If(s).into());
        }
        if token.is_keyword("while") {
            return self.parse_while().map(|s| Stmt::While(s).into());
        }
        if let Some(node) = self.parse_with_extensions() {
            return Some(node);
        }
        self.report(Diagnostic::unexpected(token));
        None
    }

    /// Access chain, then postfix `++`/`--`, then an optional `= value`.
    fn parse_identifier_expression(&mut self) -> Option<Expr> {
        let mut expr = Expr::Access(self.parse_identifier()?);
        let mut postfix = 0;
        while let Some(operator) = self
            .current()
            .filter(|t| t.is_symbol("++") || t.is_symbol("--"))
            .map(|t| t.text.clone())
        {
            if self.too_deep(postfix) {
                return None;
            }
            self.advance(1);
            expr = Expr::Unary(UnaryExpr { operator, argument: Box::new(expr), prefix: false });
            postfix += 1;
        }
        if self.check_symbol("=") {
            self.advance(1);
            let right = self.parse_operand(0)?;
            expr = Expr::Assignment(AssignmentExpr {
                operator: "=".to_string(),
                left: Box::new(expr),
                right: Box::new(right),
            });
        }
        Some(expr)
    }
}

//! Rule-ordered lexer: tries each token rule in turn at the cursor and keeps
//! the first match.

use crate::syntax::tokens::{Token, TokenKind};
use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;
use tracing::{debug, trace};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LexError {
    #[error("unexpected character '{ch}' at offset {offset}")]
    UnexpectedChar { ch: char, offset: usize },
}

impl LexError {
    pub fn offset(&self) -> usize {
        match self {
            LexError::UnexpectedChar { offset, .. } => *offset,
        }
    }
}

/// One entry of the ordered rule list.
#[derive(Debug, Clone)]
pub struct TokenRule {
    pub kind: TokenKind,
    pattern: Regex,
    /// Matched text is skipped instead of emitted
    pub discard: bool,
}

impl TokenRule {
    /// Compile `pattern` anchored at the start of the remaining input.
    pub fn new(kind: TokenKind, pattern: &str, discard: bool) -> Result<Self, regex::Error> {
        let pattern = Regex::new(&format!("^(?:{})", pattern))?;
        Ok(Self { kind, pattern, discard })
    }

    pub fn pattern(&self) -> &str {
        self.pattern.as_str()
    }

    /// Length in bytes of the match at the start of `input`, if any.
    /// Empty matches count as no match so the cursor always moves.
    fn match_len(&self, input: &str) -> Option<usize> {
        self.pattern.find(input).map(|m| m.end()).filter(|&len| len > 0)
    }
}

/// Reserved words; matched before the identifier rule.
pub const KEYWORDS: &[&str] = &[
    "class", "public", "virtual", "readonly", "sealed", "abstract", "private", "protected",
    "internal", "static", "async", "void", "float", "int", "string", "if", "else", "for",
    "while", "return", "new", "using", "namespace", "var", "bool", "true", "false", "this",
    "base", "override",
];

static BUILTIN_RULES: Lazy<Vec<TokenRule>> = Lazy::new(|| {
    let keyword = format!(r"(?:{})\b", KEYWORDS.join("|"));
    let specs: [(TokenKind, &str, bool); 10] = [
        (TokenKind::Whitespace, r"\s+", true),
        (TokenKind::LineComment, r"//.*", true),
        (TokenKind::BlockComment, r"/\*[\s\S]*?\*/", true),
        // must precede STRING, `$"` would otherwise fail on the `$`
        (TokenKind::InterpolatedString, r#"\$"(?:\\.|\{[^}]*\}|[^"\\])*""#, false),
        (TokenKind::Keyword, keyword.as_str(), false),
        (TokenKind::Identifier, r"[a-zA-Z_][a-zA-Z0-9_]*", false),
        (TokenKind::Number, r"[0-9]+(?:\.[0-9]+)?", false),
        (TokenKind::String, r#""(?:\\.|[^"\\])*""#, false),
        (TokenKind::Char, r"'(?:\\.|[^'\\])'", false),
        (
            TokenKind::Symbol,
            r"\+\+|--|==|!=|<=|>=|&&|\|\||[{}()\[\].,;:+\-*/%&|^!<>=~?]",
            false,
        ),
    ];
    specs
        .into_iter()
        .map(|(kind, pattern, discard)| {
            TokenRule::new(kind, pattern, discard).expect("built-in token pattern compiles")
        })
        .collect()
});

pub struct Lexer<'a> {
    source: &'a str,
    rules: Vec<TokenRule>,
    /// Byte position of the cursor
    pos: usize,
    /// Character position of the cursor
    offset: usize,
}

impl<'a> Lexer<'a> {
    pub fn new(source: &'a str) -> Self {
        Self { source, rules: BUILTIN_RULES.clone(), pos: 0, offset: 0 }
    }

    pub fn source(&self) -> &'a str {
        self.source
    }

    pub fn rules(&self) -> &[TokenRule] {
        &self.rules
    }

    /// Append a rule; it is tried after every existing rule.
    pub fn push_rule(&mut self, rule: TokenRule) {
        self.rules.push(rule);
    }

    /// Insert a rule at `index` (clamped to the end of the list).
    pub fn insert_rule(&mut self, index: usize, rule: TokenRule) {
        let index = index.min(self.rules.len());
        self.rules.insert(index, rule);
    }

    /// Insert a rule right before the first rule of kind `before`.
    /// Falls back to appending when no such rule exists; returns whether
    /// the anchor was found.
    pub fn insert_rule_before(&mut self, before: &TokenKind, rule: TokenRule) -> bool {
        match self.rules.iter().position(|r| &r.kind == before) {
            Some(index) => {
                self.rules.insert(index, rule);
                true
            }
            None => {
                self.rules.push(rule);
                false
            }
        }
    }

    /// Consume the remaining input. Fails on the first character no rule
    /// accepts.
    pub fn tokenize(&mut self) -> Result<Vec<Token>, LexError> {
        let mut tokens = Vec::new();
        while self.pos < self.source.len() {
            let rest = &self.source[self.pos..];
            let matched = self
                .rules
                .iter()
                .find_map(|rule| rule.match_len(rest).map(|len| (rule, len)));
            let Some((rule, len)) = matched else {
                let ch = rest.chars().next().unwrap_or_default();
                debug!(offset = self.offset, %ch, "no token rule matched");
                return Err(LexError::UnexpectedChar { ch, offset: self.offset });
            };
            let text = &rest[..len];
            if !rule.discard {
                trace!(kind = %rule.kind, text, offset = self.offset, "token");
                tokens.push(Token::new(rule.kind.clone(), text, self.offset));
            }
            self.pos += len;
            self.offset += text.chars().count();
        }
        debug!(tokens = tokens.len(), rules = self.rules.len(), "tokenized source");
        Ok(tokens)
    }
}

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::HashMap;
use std::fmt;

/// Token categories produced by the lexer.
///
/// The first three kinds are produced by discard rules and never reach the
/// parser. `Custom` covers kinds registered by plugins.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TokenKind {
    Whitespace,
    LineComment,
    BlockComment,
    InterpolatedString,
    Keyword,
    Identifier,
    Number,
    String,
    Char,
    Symbol,
    Custom(String),
}

impl TokenKind {
    pub fn custom(name: impl Into<String>) -> Self {
        TokenKind::Custom(name.into())
    }

    /// Stable upper-case name, used in diagnostics and serialized output.
    pub fn name(&self) -> &str {
        match self {
            TokenKind::Whitespace => "WHITESPACE",
            TokenKind::LineComment => "COMMENT_SINGLE",
            TokenKind::BlockComment => "COMMENT_MULTI",
            TokenKind::InterpolatedString => "INTERPOLATED_STR",
            TokenKind::Keyword => "KEYWORD",
            TokenKind::Identifier => "IDENTIFIER",
            TokenKind::Number => "NUMBER",
            TokenKind::String => "STRING",
            TokenKind::Char => "CHAR",
            TokenKind::Symbol => "SYMBOL",
            TokenKind::Custom(name) => name,
        }
    }

    /// Inverse of [`TokenKind::name`]; unknown names become `Custom`.
    pub fn from_name(name: &str) -> Self {
        match name {
            "WHITESPACE" => TokenKind::Whitespace,
            "COMMENT_SINGLE" => TokenKind::LineComment,
            "COMMENT_MULTI" => TokenKind::BlockComment,
            "INTERPOLATED_STR" => TokenKind::InterpolatedString,
            "KEYWORD" => TokenKind::Keyword,
            "IDENTIFIER" => TokenKind::Identifier,
            "NUMBER" => TokenKind::Number,
            "STRING" => TokenKind::String,
            "CHAR" => TokenKind::Char,
            "SYMBOL" => TokenKind::Symbol,
            other => TokenKind::Custom(other.to_string()),
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl Serialize for TokenKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

impl<'de> Deserialize<'de> for TokenKind {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        Ok(TokenKind::from_name(&name))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    pub kind: TokenKind,
    /// Exact matched source text
    pub text: String,
    /// Zero-based character offset of the first character
    pub offset: usize,
}

impl Token {
    pub fn new(kind: TokenKind, text: impl Into<String>, offset: usize) -> Self {
        Self { kind, text: text.into(), offset }
    }

    pub fn is(&self, kind: &TokenKind, text: &str) -> bool {
        &self.kind == kind && self.text == text
    }

    pub fn is_symbol(&self, text: &str) -> bool {
        self.is(&TokenKind::Symbol, text)
    }

    pub fn is_keyword(&self, text: &str) -> bool {
        self.is(&TokenKind::Keyword, text)
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} \"{}\"", self.kind, self.text)
    }
}

/// Short alias names for token kinds, handed to plugin parse hooks.
///
/// Built-in aliases: `str`, `num`, `id`, `keyword`, `sym`, `chr`,
/// `templatestr`. Plugins add their own through `Extension::aliases`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenAliases {
    aliases: HashMap<String, TokenKind>,
}

impl TokenAliases {
    pub fn builtin() -> Self {
        let aliases = [
            ("str", TokenKind::String),
            ("num", TokenKind::Number),
            ("id", TokenKind::Identifier),
            ("keyword", TokenKind::Keyword),
            ("sym", TokenKind::Symbol),
            ("chr", TokenKind::Char),
            ("templatestr", TokenKind::InterpolatedString),
        ]
        .into_iter()
        .map(|(alias, kind)| (alias.to_string(), kind))
        .collect();
        Self { aliases }
    }

    pub fn insert(&mut self, alias: impl Into<String>, kind: TokenKind) {
        self.aliases.insert(alias.into(), kind);
    }

    pub fn get(&self, alias: &str) -> Option<&TokenKind> {
        self.aliases.get(alias)
    }

    pub fn len(&self) -> usize {
        self.aliases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.aliases.is_empty()
    }
}

impl Default for TokenAliases {
    fn default() -> Self {
        Self::builtin()
    }
}

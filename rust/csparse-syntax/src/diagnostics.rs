//! Structured parse diagnostics and their rendering with source snippets.

use crate::syntax::lexer::LexError;
use crate::syntax::tokens::Token;
use serde::Serialize;
use std::fmt;

/// Severity level for diagnostics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
}

/// Stable diagnostic codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DiagnosticCode {
    /// L001: no token rule matched
    #[serde(rename = "L001")]
    UnexpectedChar,
    /// P001: a specific token was required
    #[serde(rename = "P001")]
    ExpectedToken,
    /// P002: no grammar rule or extension accepts the token
    #[serde(rename = "P002")]
    UnexpectedToken,
    /// P003: member without a type
    #[serde(rename = "P003")]
    MissingType,
    /// P004: member name followed by something other than `(` or `;`
    #[serde(rename = "P004")]
    InvalidMember,
    /// P005: statement or declaration in operand position
    #[serde(rename = "P005")]
    ExpressionRequired,
    /// P006: recursion limit reached
    #[serde(rename = "P006")]
    NestingTooDeep,
}

impl DiagnosticCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            DiagnosticCode::UnexpectedChar => "L001",
            DiagnosticCode::ExpectedToken => "P001",
            DiagnosticCode::UnexpectedToken => "P002",
            DiagnosticCode::MissingType => "P003",
            DiagnosticCode::InvalidMember => "P004",
            DiagnosticCode::ExpressionRequired => "P005",
            DiagnosticCode::NestingTooDeep => "P006",
        }
    }
}

impl fmt::Display for DiagnosticCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A recorded, non-fatal problem. `offset` is a character offset into the
/// source; `None` means end of input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub severity: Severity,
    pub code: DiagnosticCode,
    pub message: String,
    pub offset: Option<usize>,
    pub expected: Option<String>,
    /// `KIND "text"` of the offending token
    pub found: Option<String>,
    /// Character length of the offending token, for underlining
    #[serde(skip)]
    pub width: usize,
}

impl Diagnostic {
    pub fn error(code: DiagnosticCode, message: impl Into<String>, at: Option<&Token>) -> Self {
        Self {
            severity: Severity::Error,
            code,
            message: message.into(),
            offset: at.map(|t| t.offset),
            expected: None,
            found: at.map(|t| t.to_string()),
            width: at.map_or(1, |t| t.text.chars().count().max(1)),
        }
    }

    /// `Expected <what> at <pos>, got <KIND>: <text>`
    pub fn expected(what: impl Into<String>, found: Option<&Token>) -> Self {
        let what = what.into();
        let message = match found {
            Some(tok) => format!("Expected {} at {}, got {}: {}", what, tok.offset, tok.kind, tok.text),
            None => format!("Expected {} at end of input", what),
        };
        let mut diag = Self::error(DiagnosticCode::ExpectedToken, message, found);
        diag.expected = Some(what);
        diag
    }

    /// `Unexpected token at <pos>: <KIND> "<text>"`
    pub fn unexpected(found: &Token) -> Self {
        let message = format!("Unexpected token at {}: {} \"{}\"", found.offset, found.kind, found.text);
        Self::error(DiagnosticCode::UnexpectedToken, message, Some(found))
    }

    /// Render with ANSI colors for terminal
    pub fn render_ansi(&self, source: &str, file: &str) -> String {
        self.render(source, file, true)
    }

    /// Render without colors (for logs, tests)
    pub fn render_plain(&self, source: &str, file: &str) -> String {
        self.render(source, file, false)
    }

    fn render(&self, source: &str, file: &str, color: bool) -> String {
        let paint = |s: &str, code: &str| {
            if color { format!("\x1b[{}m{}\x1b[0m", code, s) } else { s.to_string() }
        };
        let mut out = String::new();

        // Header: error[P001]: message
        let label = match self.severity {
            Severity::Error => paint("error", "31"),
        };
        out.push_str(&format!("{}[{}]: {}\n", label, self.code, paint(self.message.as_str(), "1")));

        let offset = self.offset.unwrap_or_else(|| source.chars().count());
        let (line, col, line_text) = locate(source, offset);
        out.push_str(&format!("  {} {}:{}:{}\n", paint("-->", "36"), file, line, col));

        let gutter = paint("|", "36");
        let underline = format!("{}{}", " ".repeat(col - 1), "^".repeat(self.width.max(1)));
        out.push_str(&format!("   {}\n", gutter));
        out.push_str(&format!("{:>3} {} {}\n", line, gutter, line_text));
        out.push_str(&format!("   {} {}\n", gutter, paint(underline.as_str(), "31")));
        out
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl From<&LexError> for Diagnostic {
    fn from(err: &LexError) -> Self {
        Self {
            severity: Severity::Error,
            code: DiagnosticCode::UnexpectedChar,
            message: err.to_string(),
            offset: Some(err.offset()),
            expected: None,
            found: None,
            width: 1,
        }
    }
}

/// 1-based line and column for a character offset, plus the line's text.
pub fn locate(source: &str, offset: usize) -> (usize, usize, &str) {
    let (mut line, mut col, mut line_start) = (1, 1, 0);
    for (i, (byte, ch)) in source.char_indices().enumerate() {
        if i == offset {
            break;
        }
        if ch == '\n' {
            line += 1;
            col = 1;
            line_start = byte + 1;
        } else {
            col += 1;
        }
    }
    let line_end = source[line_start..].find('\n').map_or(source.len(), |i| line_start + i);
    (line, col, source[line_start..line_end].trim_end_matches('\r'))
}

/// Render every diagnostic, separated by blank lines.
pub fn format_diagnostics(diagnostics: &[Diagnostic], source: &str, file: &str) -> String {
    diagnostics
        .iter()
        .map(|d| d.render_plain(source, file))
        .collect::<Vec<_>>()
        .join("\n")
}

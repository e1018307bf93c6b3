//! Parse error types.

use bdl_ast::{Diagnostic, Span};
use bdl_lexer::Token;
use std::fmt;

/// Parse error with source location.
#[derive(Debug, Clone, PartialEq)]
pub struct ParseError {
    pub kind: ParseErrorKind,
    pub span: Span,
    /// Human-readable error message
    pub message: String,
}

/// Category of parse error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseErrorKind {
    /// A specific token was expected but a different one was found.
    ///
    /// Example: `source "kafka" "k" topics = []` is missing the `{`.
    UnexpectedToken,

    /// The input ended while a construct was still open, e.g. an unclosed
    /// block.
    UnexpectedEof,

    /// Tokens are present but violate the grammar, e.g. an index that is
    /// neither a whole number nor a string.
    InvalidSyntax,

    /// Characters that do not form any token.
    InvalidCharacter,
}

impl ParseError {
    /// Create an "expected token" error.
    pub fn expected_token(expected: &Token, found: Option<&Token>, span: Span) -> Self {
        Self::expected(&format!("\"{expected}\""), found, span)
    }

    /// Create an error for a missing construct described in words.
    pub fn expected(what: &str, found: Option<&Token>, span: Span) -> Self {
        match found {
            Some(token) => Self {
                kind: ParseErrorKind::UnexpectedToken,
                span,
                message: format!("expected {what}, found {}", token.describe()),
            },
            None => Self {
                kind: ParseErrorKind::UnexpectedEof,
                span,
                message: format!("expected {what}, found end of file"),
            },
        }
    }

    pub fn invalid_syntax(message: impl Into<String>, span: Span) -> Self {
        Self {
            kind: ParseErrorKind::InvalidSyntax,
            span,
            message: message.into(),
        }
    }

    pub fn invalid_character(span: Span) -> Self {
        Self {
            kind: ParseErrorKind::InvalidCharacter,
            span,
            message: "this character is not used within the language".to_string(),
        }
    }

    /// Converts the error into a diagnostic.
    pub fn to_diagnostic(&self) -> Diagnostic {
        let summary = match self.kind {
            ParseErrorKind::UnexpectedToken => "Unexpected token",
            ParseErrorKind::UnexpectedEof => "Unexpected end of file",
            ParseErrorKind::InvalidSyntax => "Invalid syntax",
            ParseErrorKind::InvalidCharacter => "Invalid character",
        };
        Diagnostic::error(summary, capitalize(&self.message) + ".").with_subject(self.span)
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

impl From<ParseError> for Diagnostic {
    fn from(err: ParseError) -> Self {
        err.to_diagnostic()
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} at {}..{}", self.message, self.span.start, self.span.end)
    }
}

impl std::error::Error for ParseError {}

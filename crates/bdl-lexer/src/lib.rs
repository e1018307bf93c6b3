// Allow unwrap in tests
#![cfg_attr(test, allow(clippy::unwrap_used))]

//! Lexical analysis for the Bridge Description Language.
//!
//! BDL uses an HCL-like block syntax. Block types, attribute names and
//! category tags are all plain identifiers; the only keywords are the
//! literals `true`, `false` and `null`.
//!
//! # Design
//!
//! - `Token`: all BDL token types, produced by logos
//! - Comments (`#`, `//`, `/* */`) and whitespace are skipped
//! - Heredocs (`<<EOF` / `<<-EOF`) are lexed by a callback that consumes
//!   everything up to the closing marker line
//!
//! # Examples
//!
//! ```
//! # use bdl_lexer::*;
//! # use logos::Logos;
//! let source = r#"source "kafka" "orders" { topics = ["orders"] }"#;
//! let tokens: Vec<Result<Token, ()>> = Token::lexer(source).collect();
//! assert!(tokens.iter().all(Result::is_ok));
//! ```

use logos::{Lexer, Logos};
use std::fmt;
use std::ops::Range;
use std::rc::Rc;

/// BDL token.
#[derive(Logos, Debug, Clone, PartialEq)]
#[logos(skip r"[ \t\r\n]+")] // Skip whitespace
#[logos(skip r"//[^\n]*")] // Skip // comments
#[logos(skip r"#[^\n]*")] // Skip # comments
#[logos(skip r"/\*([^*]|\*+[^*/])*\*+/")] // Skip /* */ comments
pub enum Token {
    // === Literals keywords ===
    #[token("true")]
    True,
    #[token("false")]
    False,
    #[token("null")]
    Null,

    // === Punctuation ===
    #[token("=")]
    Eq,
    #[token(":")]
    Colon,
    #[token(".")]
    Dot,
    #[token(",")]
    Comma,
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token("{")]
    LBrace,
    #[token("}")]
    RBrace,
    #[token("[")]
    LBracket,
    #[token("]")]
    RBracket,

    // === Literals ===
    /// Numeric literal. All numbers are floating point, as in HCL.
    #[regex(r"-?[0-9]+(\.[0-9]+)?([eE][+-]?[0-9]+)?", |lex| lex.slice().parse::<f64>().ok())]
    Number(f64),

    /// Quoted string literal, unescaped.
    #[regex(r#""([^"\\\n]|\\.)*""#, |lex| {
        let s = lex.slice();
        let content = &s[1..s.len() - 1];
        unescape_string(content).map(|s| Rc::from(s.as_str()))
    })]
    String(Rc<str>),

    /// Heredoc string. The token text covers the whole heredoc, closing
    /// marker included.
    #[regex(r"<<-?[A-Za-z_][A-Za-z0-9_]*", lex_heredoc)]
    Heredoc(Rc<str>),

    /// Identifier. Dashes are allowed after the first character.
    #[regex(r"[a-zA-Z_][a-zA-Z0-9_-]*", |lex| Rc::from(lex.slice()))]
    Ident(Rc<str>),
}

/// Unescape a string literal content.
fn unescape_string(s: &str) -> Option<String> {
    let mut result = String::with_capacity(s.len());
    let mut chars = s.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            match chars.next()? {
                'n' => result.push('\n'),
                'r' => result.push('\r'),
                't' => result.push('\t'),
                '\\' => result.push('\\'),
                '"' => result.push('"'),
                'u' => {
                    let hex: String = chars.by_ref().take(4).collect();
                    let code = u32::from_str_radix(&hex, 16).ok()?;
                    result.push(char::from_u32(code)?);
                }
                _ => return None,
            }
        } else {
            result.push(c);
        }
    }
    Some(result)
}

/// Consumes a heredoc body following its `<<MARKER` introducer.
///
/// The introducer must be followed by a line break. The body ends at the
/// first line whose trimmed content is the marker. With `<<-` the smallest
/// common indentation of the non-blank lines is removed.
fn lex_heredoc(lex: &mut Lexer<'_, Token>) -> Option<Rc<str>> {
    let intro = lex.slice();
    let indented = intro.starts_with("<<-");
    let marker = intro.trim_start_matches('<').trim_start_matches('-');

    let rest = lex.remainder();
    let body_start = if rest.starts_with("\r\n") {
        2
    } else if rest.starts_with('\n') {
        1
    } else {
        return None;
    };

    let mut consumed = body_start;
    let mut lines = Vec::new();
    for line in rest[body_start..].split_inclusive('\n') {
        if line.trim() == marker {
            consumed += line.trim_end_matches(['\n', '\r']).len();
            let text = assemble_heredoc(&lines, indented);
            lex.bump(consumed);
            return Some(Rc::from(text.as_str()));
        }
        consumed += line.len();
        lines.push(line);
    }

    // Unterminated
    None
}

fn assemble_heredoc(lines: &[&str], indented: bool) -> String {
    if !indented {
        return lines.concat();
    }

    let indent = lines
        .iter()
        .filter(|l| !l.trim().is_empty())
        .map(|l| l.len() - l.trim_start_matches([' ', '\t']).len())
        .min()
        .unwrap_or(0);

    lines
        .iter()
        .map(|l| {
            let strip = indent.min(l.len() - l.trim_start_matches([' ', '\t']).len());
            &l[strip..]
        })
        .collect()
}

impl Token {
    /// Short description for parse error messages.
    pub fn describe(&self) -> String {
        match self {
            Token::String(_) | Token::Heredoc(_) => "string".to_string(),
            Token::Number(_) => "number".to_string(),
            Token::Ident(name) => format!("identifier \"{name}\""),
            other => format!("\"{other}\""),
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::True => f.write_str("true"),
            Token::False => f.write_str("false"),
            Token::Null => f.write_str("null"),
            Token::Eq => f.write_str("="),
            Token::Colon => f.write_str(":"),
            Token::Dot => f.write_str("."),
            Token::Comma => f.write_str(","),
            Token::LParen => f.write_str("("),
            Token::RParen => f.write_str(")"),
            Token::LBrace => f.write_str("{"),
            Token::RBrace => f.write_str("}"),
            Token::LBracket => f.write_str("["),
            Token::RBracket => f.write_str("]"),
            Token::Number(n) => write!(f, "{n}"),
            Token::String(s) | Token::Heredoc(s) => write!(f, "{s:?}"),
            Token::Ident(id) => f.write_str(id),
        }
    }
}

/// Tokenizes a whole source text.
///
/// Returns the tokens paired with their byte ranges, and the byte ranges of
/// every invalid input that could not be tokenized.
pub fn tokenize(source: &str) -> (Vec<(Token, Range<usize>)>, Vec<Range<usize>>) {
    let mut lexer = Token::lexer(source);
    let mut tokens = Vec::new();
    let mut errors = Vec::new();

    while let Some(result) = lexer.next() {
        let span = lexer.span();
        match result {
            Ok(token) => tokens.push((token, span)),
            Err(()) => errors.push(span),
        }
    }

    (tokens, errors)
}

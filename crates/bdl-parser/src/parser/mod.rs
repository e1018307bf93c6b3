//! Hand-written recursive descent parser for BDL.
//!
//! ## Architecture
//!
//! - `stream`: TokenStream wrapper with lookahead
//! - `error`: ParseError and its conversion to diagnostics
//! - `expr`: expression parser
//! - `body`: attribute and nested block parser
//! - `decl`: top-level `bridge` and component blocks
//!
//! Syntax errors become diagnostics; the parser always returns a Bridge,
//! possibly partial, together with everything it reported.

mod body;
mod decl;
mod error;
mod expr;
mod stream;

pub use decl::is_top_level_block;
pub use error::{ParseError, ParseErrorKind};
use stream::TokenStream;

use bdl_ast::{Bridge, Diagnostics, Expr, Span};
use bdl_lexer::tokenize;
use tracing::debug;

/// Parse a BDL document.
///
/// Invalid characters abort parsing, since the token stream can not be
/// trusted past them. Every other problem is reported and parsing goes on.
pub fn parse_bridge(source: &str, file_id: u16) -> (Bridge, Diagnostics) {
    let mut bridge = Bridge::new();
    let mut diags = Diagnostics::new();

    let (tokens, lex_errors) = tokenize(source);
    if !lex_errors.is_empty() {
        for range in lex_errors {
            let span = Span::new(file_id, range.start as u32, range.end as u32);
            let text = source.get(range).unwrap_or_default();
            diags.push(lex_error(text, span).to_diagnostic());
        }
        return (bridge, diags);
    }

    let mut stream = TokenStream::new(&tokens, file_id);
    decl::parse_document(&mut stream, &mut bridge, &mut diags);

    debug!(
        file_id,
        components = bridge.component_count(),
        diagnostics = diags.len(),
        "parsed bridge"
    );
    (bridge, diags)
}

/// Parse a standalone expression, e.g. a value given on the command line.
pub fn parse_expression(source: &str, file_id: u16) -> Result<Expr, ParseError> {
    let (tokens, lex_errors) = tokenize(source);
    if let Some(range) = lex_errors.into_iter().next() {
        let span = Span::new(file_id, range.start as u32, range.end as u32);
        return Err(lex_error(source.get(range).unwrap_or_default(), span));
    }
    let mut stream = TokenStream::new(&tokens, file_id);
    let expr = expr::parse_expr(&mut stream)?;
    if !stream.at_end() {
        return Err(ParseError::expected(
            "end of expression",
            stream.peek(),
            stream.current_span(),
        ));
    }
    Ok(expr)
}

fn lex_error(text: &str, span: Span) -> ParseError {
    if text.starts_with("<<") {
        ParseError::invalid_syntax("unterminated heredoc", span)
    } else if text.starts_with('"') {
        ParseError::invalid_syntax("unterminated string or invalid escape sequence", span)
    } else {
        ParseError::invalid_character(span)
    }
}

//! Body parsing: attributes and nested blocks between braces.

use super::expr::parse_expr;
use super::{ParseError, TokenStream};
use bdl_ast::{Attribute, Block, Body, Diagnostic, Diagnostics, Label};
use bdl_lexer::Token;

/// Parse `{ item* }`.
///
/// Redefined attributes are reported to `diags` and the first definition
/// is kept; syntax errors abort the body.
pub fn parse_body(stream: &mut TokenStream, diags: &mut Diagnostics) -> Result<Body, ParseError> {
    let start = stream.current_pos();
    stream.expect(Token::LBrace)?;
    let mut body = Body::default();

    loop {
        match stream.peek() {
            Some(Token::RBrace) => {
                stream.advance();
                break;
            }
            Some(Token::Ident(_)) => parse_item(stream, &mut body, diags)?,
            found => {
                return Err(ParseError::expected(
                    "an argument or block definition",
                    found,
                    stream.current_span(),
                ));
            }
        }
    }

    body.span = stream.span_from(start);
    Ok(body)
}

/// Parse the string labels following a block type.
pub fn parse_labels(stream: &mut TokenStream) -> Vec<Label> {
    let mut labels = Vec::new();
    while let Some(Token::String(value)) = stream.peek() {
        let value = value.to_string();
        let span = stream.current_span();
        stream.advance();
        labels.push(Label { value, span });
    }
    labels
}

fn parse_item(
    stream: &mut TokenStream,
    body: &mut Body,
    diags: &mut Diagnostics,
) -> Result<(), ParseError> {
    let start = stream.current_pos();
    let name_span = stream.current_span();
    let name = match stream.advance() {
        Some(Token::Ident(name)) => name.to_string(),
        found => {
            let found = found.cloned();
            return Err(ParseError::expected("an argument name", found.as_ref(), name_span));
        }
    };

    if stream.eat(&Token::Eq) {
        let expr = parse_expr(stream)?;
        let attr = Attribute {
            name: name.clone(),
            expr,
            name_span,
            span: stream.span_from(start),
        };
        match body.attributes.get(&name) {
            Some(previous) => diags.push(
                Diagnostic::error(
                    "Attribute redefined",
                    format!(
                        "The argument \"{name}\" was already set. Each argument may be set only once."
                    ),
                )
                .with_subject(name_span)
                .with_context(previous.span),
            ),
            None => {
                body.attributes.insert(name, attr);
            }
        }
        return Ok(());
    }

    let labels = parse_labels(stream);
    if !stream.check(&Token::LBrace) {
        let expected = if labels.is_empty() {
            "\"=\" or a block definition"
        } else {
            "\"{\""
        };
        return Err(ParseError::expected(
            expected,
            stream.peek(),
            stream.current_span(),
        ));
    }
    let inner = parse_body(stream, diags)?;
    body.blocks.push(Block {
        type_name: name,
        labels,
        body: inner,
        type_span: name_span,
        span: stream.span_from(start),
    });
    Ok(())
}

//! Expression parsing.
//!
//! BDL expressions have no operators, so a single level of recursive descent
//! covers the whole grammar:
//!
//! ```text
//! expr      := literal | list | object | call | traversal
//! literal   := NUMBER | STRING | HEREDOC | "true" | "false" | "null"
//! list      := "[" (expr ("," expr)* ","?)? "]"
//! object    := "{" (key ("=" | ":") expr ","?)* "}"
//! call      := IDENT "(" (expr ("," expr)* ","?)? ")"
//! traversal := IDENT ("." IDENT | "[" (NUMBER | STRING) "]")*
//! ```

use super::{ParseError, TokenStream};
use bdl_ast::{Expr, ExprKind, IndexKey, ObjectItem, Step, Traversal};
use bdl_lexer::Token;

/// Parse a single expression.
pub fn parse_expr(stream: &mut TokenStream) -> Result<Expr, ParseError> {
    let start = stream.current_pos();
    let kind = match stream.peek().cloned() {
        Some(Token::Null) => {
            stream.advance();
            ExprKind::Null
        }
        Some(Token::True) => {
            stream.advance();
            ExprKind::Bool(true)
        }
        Some(Token::False) => {
            stream.advance();
            ExprKind::Bool(false)
        }
        Some(Token::Number(n)) => {
            stream.advance();
            ExprKind::Number(n)
        }
        Some(Token::String(s)) | Some(Token::Heredoc(s)) => {
            stream.advance();
            ExprKind::String(s.to_string())
        }
        Some(Token::LBracket) => parse_list(stream)?,
        Some(Token::LBrace) => parse_object(stream)?,
        Some(Token::Ident(_)) if matches!(stream.peek_nth(1), Some(Token::LParen)) => {
            parse_call(stream)?
        }
        Some(Token::Ident(_)) => ExprKind::Traversal(parse_traversal(stream)?),
        found => {
            return Err(ParseError::expected(
                "an expression",
                found.as_ref(),
                stream.current_span(),
            ));
        }
    };
    Ok(Expr::new(kind, stream.span_from(start)))
}

/// Parse an absolute traversal such as `target.my_sns` or `secret.creds`.
pub fn parse_traversal(stream: &mut TokenStream) -> Result<Traversal, ParseError> {
    let start = stream.current_pos();
    let root = match stream.advance().cloned() {
        Some(Token::Ident(name)) => name.to_string(),
        found => {
            return Err(ParseError::expected(
                "a variable name",
                found.as_ref(),
                stream.span_from(start),
            ));
        }
    };

    let mut steps = Vec::new();
    loop {
        if stream.eat(&Token::Dot) {
            let span = stream.current_span();
            match stream.advance().cloned() {
                Some(Token::Ident(name)) => steps.push(Step::Attr(name.to_string())),
                found => return Err(ParseError::expected("an attribute name", found.as_ref(), span)),
            }
        } else if stream.eat(&Token::LBracket) {
            let span = stream.current_span();
            let key = match stream.advance().cloned() {
                Some(Token::Number(n)) if n >= 0.0 && n.fract() == 0.0 => IndexKey::Int(n as u64),
                Some(Token::String(s)) => IndexKey::Key(s.to_string()),
                _ => {
                    return Err(ParseError::invalid_syntax(
                        "index must be a whole number or a string",
                        span,
                    ));
                }
            };
            stream.expect(Token::RBracket)?;
            steps.push(Step::Index(key));
        } else {
            break;
        }
    }

    Ok(Traversal::new(root, steps, stream.span_from(start)))
}

fn parse_list(stream: &mut TokenStream) -> Result<ExprKind, ParseError> {
    stream.expect(Token::LBracket)?;
    let mut items = Vec::new();
    while !stream.check(&Token::RBracket) {
        items.push(parse_expr(stream)?);
        if !stream.eat(&Token::Comma) {
            break;
        }
    }
    stream.expect(Token::RBracket)?;
    Ok(ExprKind::List(items))
}

fn parse_object(stream: &mut TokenStream) -> Result<ExprKind, ParseError> {
    stream.expect(Token::LBrace)?;
    let mut items = Vec::new();
    while !stream.check(&Token::RBrace) {
        let key_span = stream.current_span();
        let key = match stream.advance().cloned() {
            Some(Token::Ident(name)) | Some(Token::String(name)) => name.to_string(),
            Some(Token::True) => "true".to_string(),
            Some(Token::False) => "false".to_string(),
            Some(Token::Null) => "null".to_string(),
            found => return Err(ParseError::expected("an object key", found.as_ref(), key_span)),
        };
        if !stream.eat(&Token::Eq) && !stream.eat(&Token::Colon) {
            return Err(ParseError::expected_token(
                &Token::Eq,
                stream.peek(),
                stream.current_span(),
            ));
        }
        let value = parse_expr(stream)?;
        items.push(ObjectItem {
            key,
            key_span,
            value,
        });
        stream.eat(&Token::Comma);
    }
    stream.expect(Token::RBrace)?;
    Ok(ExprKind::Object(items))
}

fn parse_call(stream: &mut TokenStream) -> Result<ExprKind, ParseError> {
    let name = match stream.advance().cloned() {
        Some(Token::Ident(name)) => name.to_string(),
        found => {
            return Err(ParseError::expected(
                "a function name",
                found.as_ref(),
                stream.current_span(),
            ));
        }
    };
    stream.expect(Token::LParen)?;
    let mut args = Vec::new();
    while !stream.check(&Token::RParen) {
        args.push(parse_expr(stream)?);
        if !stream.eat(&Token::Comma) {
            break;
        }
    }
    stream.expect(Token::RParen)?;
    Ok(ExprKind::Call { name, args })
}

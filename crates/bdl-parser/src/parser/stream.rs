//! Token stream wrapper for the hand-written parser.

use bdl_ast::Span;
use bdl_lexer::Token;
use std::ops::Range;

/// Token stream with lookahead and position tracking.
///
/// Each token is paired with its byte range in the source, so every node
/// and error carries an accurate [`Span`].
pub struct TokenStream<'src> {
    tokens: &'src [(Token, Range<usize>)],
    pos: usize,
    file_id: u16,
}

impl<'src> TokenStream<'src> {
    pub fn new(tokens: &'src [(Token, Range<usize>)], file_id: u16) -> Self {
        Self {
            tokens,
            pos: 0,
            file_id,
        }
    }

    /// Peek at the current token without consuming it.
    pub fn peek(&self) -> Option<&Token> {
        self.peek_nth(0)
    }

    /// Peek at the nth token ahead without consuming.
    pub fn peek_nth(&self, n: usize) -> Option<&Token> {
        self.tokens.get(self.pos + n).map(|(tok, _)| tok)
    }

    /// Advance to the next token and return the current one.
    pub fn advance(&mut self) -> Option<&Token> {
        let token = self.tokens.get(self.pos).map(|(tok, _)| tok);
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    /// Check if the current token has the same kind as `expected`.
    pub fn check(&self, expected: &Token) -> bool {
        matches!(self.peek(), Some(t) if std::mem::discriminant(t) == std::mem::discriminant(expected))
    }

    /// Consume the current token if it has the same kind as `expected`.
    pub fn eat(&mut self, expected: &Token) -> bool {
        if self.check(expected) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    /// Expect a specific token and advance if it matches.
    pub fn expect(&mut self, expected: Token) -> Result<Span, super::ParseError> {
        if self.check(&expected) {
            let span = self.current_span();
            self.advance();
            Ok(span)
        } else {
            Err(super::ParseError::expected_token(
                &expected,
                self.peek(),
                self.current_span(),
            ))
        }
    }

    pub fn at_end(&self) -> bool {
        self.pos >= self.tokens.len()
    }

    pub fn current_pos(&self) -> usize {
        self.pos
    }

    /// Span from the token at `start` to the last consumed token.
    pub fn span_from(&self, start: usize) -> Span {
        let Some((_, first)) = self.tokens.get(start) else {
            return self.current_span();
        };
        let end = if self.pos > start {
            self.tokens
                .get(self.pos - 1)
                .map_or(first.end, |(_, range)| range.end)
        } else {
            first.start
        };
        Span::new(self.file_id, first.start as u32, end as u32)
    }

    /// Span of the current token, or an empty span at EOF.
    pub fn current_span(&self) -> Span {
        match self.tokens.get(self.pos).or(self.tokens.last()) {
            Some((_, range)) if self.pos < self.tokens.len() => {
                Span::new(self.file_id, range.start as u32, range.end as u32)
            }
            Some((_, range)) => Span::new(self.file_id, range.end as u32, range.end as u32),
            None => Span::zero(self.file_id),
        }
    }

    /// Skip to the next top-level block for error recovery.
    ///
    /// A top-level block starts with an identifier accepted by
    /// `is_block_type` followed by a string label, outside of any braces
    /// opened after the recovery point.
    pub fn synchronize(&mut self, is_block_type: impl Fn(&str) -> bool) {
        let mut depth = 0usize;
        while let Some(token) = self.peek() {
            match token {
                Token::LBrace => depth += 1,
                Token::RBrace => depth = depth.saturating_sub(1),
                Token::Ident(name)
                    if depth == 0
                        && is_block_type(name)
                        && matches!(self.peek_nth(1), Some(Token::String(_))) =>
                {
                    break;
                }
                _ => {}
            }
            self.advance();
        }
    }

    pub fn file_id(&self) -> u16 {
        self.file_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bdl_lexer::tokenize;

    #[test]
    fn test_spans_use_byte_offsets() {
        let (tokens, _) = tokenize("a = b.c");
        let mut stream = TokenStream::new(&tokens, 3);
        stream.advance();
        stream.advance();
        let start = stream.current_pos();
        stream.advance();
        stream.advance();
        stream.advance();
        assert_eq!(stream.span_from(start), Span::new(3, 4, 7));
        assert!(stream.at_end());
        assert_eq!(stream.current_span(), Span::new(3, 7, 7));
    }

    #[test]
    fn test_synchronize_skips_nested_blocks() {
        let (tokens, _) = tokenize(r#"= route "r" { x "y" { } } } target "t" "u" {}"#);
        let mut stream = TokenStream::new(&tokens, 0);
        stream.synchronize(|name| name == "target");
        assert!(matches!(stream.peek(), Some(Token::Ident(name)) if &**name == "target"));
    }

    #[test]
    fn test_empty_stream() {
        let stream = TokenStream::new(&[], 0);
        assert_eq!(stream.current_span(), Span::zero(0));
        assert_eq!(stream.span_from(0), Span::zero(0));
    }
}

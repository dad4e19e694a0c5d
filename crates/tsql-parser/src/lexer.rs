//! Lexer for the T-SQL dialect.
//!
//! Converts source text into tokens with line/column spans. Single pass,
//! one-byte lookahead; uses memchr for delimiter scans. The lexer never
//! fails: unrecognized input becomes a [`TokenKind::SyntaxError`] token and
//! `--` comments become [`TokenKind::Comment`] tokens for the parser to
//! siphon side-band.

use memchr::memchr;
use tsql_ast::{Position, Span};

use crate::token::{Token, TokenKind};

/// Streaming lexer over one source text.
pub struct Lexer<'a> {
    /// The source bytes (UTF-8).
    src: &'a [u8],
    /// The source text, for slicing token text.
    text: &'a str,
    /// Current byte offset into src.
    pos: usize,
    /// Current line number (1-based).
    line: u32,
    /// Current column number (1-based).
    col: u32,
}

impl<'a> Lexer<'a> {
    /// Create a lexer for the given source text.
    #[must_use]
    pub fn new(source: &'a str) -> Self {
        Self {
            src: source.as_bytes(),
            text: source,
            pos: 0,
            line: 1,
            col: 1,
        }
    }

    /// Tokenize the entire input, ending with the EOF token.
    #[must_use]
    pub fn tokenize(source: &'a str) -> Vec<Token> {
        let mut lexer = Self::new(source);
        let mut tokens = Vec::new();
        loop {
            let tok = lexer.next_token();
            let is_eof = tok.kind == TokenKind::Eof;
            tokens.push(tok);
            if is_eof {
                break;
            }
        }
        tokens
    }

    /// Produce the next token.
    pub fn next_token(&mut self) -> Token {
        self.skip_whitespace();

        let start = self.pos;
        let start_pos = Position::new(self.line, self.col);

        if self.pos >= self.src.len() {
            return Token {
                kind: TokenKind::Eof,
                text: String::new(),
                span: Span::new(start_pos, start_pos),
            };
        }

        let ch = self.src[self.pos];
        let kind = match ch {
            b'\'' => self.lex_string(),
            b'[' => self.lex_bracket_ident(),
            b'@' => self.lex_local_variable(),
            b'0'..=b'9' => self.lex_number(),
            b'a'..=b'z' | b'A'..=b'Z' | b'_' => self.lex_word(start),

            b',' => self.single(TokenKind::Comma),
            b'.' => self.single(TokenKind::Dot),
            b';' => self.single(TokenKind::Semicolon),
            b'(' => self.single(TokenKind::LeftParen),
            b')' => self.single(TokenKind::RightParen),
            b'~' => self.single(TokenKind::Tilde),

            // `-` starts a comment, `-=`, or minus.
            b'-' => {
                if self.peek_at(1) == Some(b'-') {
                    self.lex_comment()
                } else {
                    self.op_or_assign(TokenKind::Minus, TokenKind::MinusEq)
                }
            }
            b'+' => self.op_or_assign(TokenKind::Plus, TokenKind::PlusEq),
            b'*' => self.op_or_assign(TokenKind::Star, TokenKind::StarEq),
            b'/' => self.op_or_assign(TokenKind::Slash, TokenKind::SlashEq),
            b'%' => self.op_or_assign(TokenKind::Percent, TokenKind::PercentEq),

            b'=' => {
                self.advance();
                if self.peek() == Some(b'=') {
                    self.advance();
                    TokenKind::EqEq
                } else {
                    TokenKind::Eq
                }
            }
            b'<' => {
                self.advance();
                match self.peek() {
                    Some(b'=') => {
                        self.advance();
                        TokenKind::Le
                    }
                    Some(b'>') => {
                        self.advance();
                        TokenKind::LtGt
                    }
                    _ => TokenKind::Lt,
                }
            }
            b'>' => {
                self.advance();
                if self.peek() == Some(b'=') {
                    self.advance();
                    TokenKind::Ge
                } else {
                    TokenKind::Gt
                }
            }
            b'!' => {
                self.advance();
                if self.peek() == Some(b'=') {
                    self.advance();
                    TokenKind::Ne
                } else {
                    TokenKind::SyntaxError
                }
            }

            // Consume the whole character so token text stays on a UTF-8
            // boundary.
            _ => {
                let width = self.text[self.pos..]
                    .chars()
                    .next()
                    .map_or(1, char::len_utf8);
                self.advance_by(width);
                TokenKind::SyntaxError
            }
        };

        Token {
            kind,
            text: self.text[start..self.pos].to_owned(),
            span: Span::new(start_pos, Position::new(self.line, self.col)),
        }
    }

    // -----------------------------------------------------------------------
    // Helpers
    // -----------------------------------------------------------------------

    fn advance(&mut self) -> u8 {
        let ch = self.src[self.pos];
        self.pos += 1;
        if ch == b'\n' {
            self.line += 1;
            self.col = 1;
        } else {
            self.col += 1;
        }
        ch
    }

    fn peek(&self) -> Option<u8> {
        self.src.get(self.pos).copied()
    }

    fn peek_at(&self, offset: usize) -> Option<u8> {
        self.src.get(self.pos + offset).copied()
    }

    fn single(&mut self, kind: TokenKind) -> TokenKind {
        self.advance();
        kind
    }

    /// Lex a one-byte operator or its `=`-suffixed compound assignment.
    fn op_or_assign(&mut self, plain: TokenKind, assign: TokenKind) -> TokenKind {
        self.advance();
        if self.peek() == Some(b'=') {
            self.advance();
            assign
        } else {
            plain
        }
    }

    fn skip_whitespace(&mut self) {
        while self.pos < self.src.len()
            && matches!(self.src[self.pos], b' ' | b'\t' | b'\r' | b'\n')
        {
            self.advance();
        }
    }

    /// Advance over `n` bytes, keeping line/column accounting right.
    fn advance_by(&mut self, n: usize) {
        for _ in 0..n {
            self.advance();
        }
    }

    // -----------------------------------------------------------------------
    // Token scanners
    // -----------------------------------------------------------------------

    /// Lex a `--` comment through the end of the line (newline excluded).
    fn lex_comment(&mut self) -> TokenKind {
        self.advance(); // -
        self.advance(); // -
        while self.pos < self.src.len() && self.src[self.pos] != b'\n' {
            self.advance();
        }
        TokenKind::Comment
    }

    /// Lex a single-quoted string. A doubled quote is an escaped quote.
    fn lex_string(&mut self) -> TokenKind {
        self.advance(); // opening quote
        loop {
            let remaining = &self.src[self.pos..];
            match memchr(b'\'', remaining) {
                Some(offset) => {
                    self.advance_by(offset);
                    self.advance(); // the quote
                    if self.peek() == Some(b'\'') {
                        self.advance();
                    } else {
                        return TokenKind::SqlString;
                    }
                }
                None => {
                    while self.pos < self.src.len() {
                        self.advance();
                    }
                    return TokenKind::SyntaxError;
                }
            }
        }
    }

    /// Lex a `[bracketed]` identifier.
    fn lex_bracket_ident(&mut self) -> TokenKind {
        self.advance(); // [
        let remaining = &self.src[self.pos..];
        match memchr(b']', remaining) {
            Some(offset) => {
                self.advance_by(offset);
                self.advance(); // ]
                TokenKind::QuotedIdent
            }
            None => {
                while self.pos < self.src.len() {
                    self.advance();
                }
                TokenKind::SyntaxError
            }
        }
    }

    /// Lex `@name`.
    fn lex_local_variable(&mut self) -> TokenKind {
        self.advance(); // @
        let name_start = self.pos;
        while self.pos < self.src.len() {
            let ch = self.src[self.pos];
            if ch.is_ascii_alphanumeric() || ch == b'_' {
                self.advance();
            } else {
                break;
            }
        }
        if self.pos == name_start {
            TokenKind::SyntaxError
        } else {
            TokenKind::LocalVariable
        }
    }

    /// Lex a number: digits with an optional fractional part. No exponent
    /// and no sign — unary sign is a parser-level prefix operator.
    fn lex_number(&mut self) -> TokenKind {
        while self.pos < self.src.len() && self.src[self.pos].is_ascii_digit() {
            self.advance();
        }
        if self.peek() == Some(b'.') && self.peek_at(1).is_some_and(|c| c.is_ascii_digit()) {
            self.advance(); // .
            while self.pos < self.src.len() && self.src[self.pos].is_ascii_digit() {
                self.advance();
            }
        }
        TokenKind::Number
    }

    /// Lex a bare word and classify it via the keyword table.
    fn lex_word(&mut self, start: usize) -> TokenKind {
        while self.pos < self.src.len() {
            let ch = self.src[self.pos];
            if ch.is_ascii_alphanumeric() || ch == b'_' {
                self.advance();
            } else {
                break;
            }
        }
        TokenKind::lookup_word(&self.text[start..self.pos])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(src: &str) -> Vec<TokenKind> {
        Lexer::tokenize(src).into_iter().map(|t| t.kind).collect()
    }

    #[test]
    fn test_lex_select_statement() {
        assert_eq!(
            kinds("SELECT a FROM t"),
            vec![
                TokenKind::KwSelect,
                TokenKind::Ident,
                TokenKind::KwFrom,
                TokenKind::Ident,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_lex_keywords_case_insensitive() {
        assert_eq!(
            kinds("select FROM wHeRe"),
            vec![
                TokenKind::KwSelect,
                TokenKind::KwFrom,
                TokenKind::KwWhere,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_lex_builtin_functions() {
        assert_eq!(
            kinds("SUM row_number GETDATE"),
            vec![
                TokenKind::FnSum,
                TokenKind::FnRowNumber,
                TokenKind::FnGetdate,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_lex_numbers() {
        let tokens = Lexer::tokenize("42 3.14 7.");
        assert_eq!(tokens[0].kind, TokenKind::Number);
        assert_eq!(tokens[0].text, "42");
        assert_eq!(tokens[1].kind, TokenKind::Number);
        assert_eq!(tokens[1].text, "3.14");
        // `7.` does not absorb the dot without a following digit.
        assert_eq!(tokens[2].kind, TokenKind::Number);
        assert_eq!(tokens[2].text, "7");
        assert_eq!(tokens[3].kind, TokenKind::Dot);
    }

    #[test]
    fn test_lex_string_with_escaped_quote() {
        let tokens = Lexer::tokenize("'it''s' ''");
        assert_eq!(tokens[0].kind, TokenKind::SqlString);
        assert_eq!(tokens[0].text, "'it''s'");
        assert_eq!(tokens[1].kind, TokenKind::SqlString);
        assert_eq!(tokens[1].text, "''");
    }

    #[test]
    fn test_lex_unterminated_string_is_error_token() {
        let tokens = Lexer::tokenize("'oops");
        assert_eq!(tokens[0].kind, TokenKind::SyntaxError);
        assert_eq!(tokens[1].kind, TokenKind::Eof);
    }

    #[test]
    fn test_lex_bracket_identifier() {
        let tokens = Lexer::tokenize("[Order Details]");
        assert_eq!(tokens[0].kind, TokenKind::QuotedIdent);
        assert_eq!(tokens[0].text, "[Order Details]");
    }

    #[test]
    fn test_lex_local_variable() {
        let tokens = Lexer::tokenize("@total @x1");
        assert_eq!(tokens[0].kind, TokenKind::LocalVariable);
        assert_eq!(tokens[0].text, "@total");
        assert_eq!(tokens[1].kind, TokenKind::LocalVariable);
    }

    #[test]
    fn test_lex_bare_at_sign_is_error() {
        let tokens = Lexer::tokenize("@ x");
        assert_eq!(tokens[0].kind, TokenKind::SyntaxError);
        assert_eq!(tokens[1].kind, TokenKind::Ident);
    }

    #[test]
    fn test_lex_operators() {
        assert_eq!(
            kinds("= == != <> < <= > >= + - * / % ~ += -= *= /= %="),
            vec![
                TokenKind::Eq,
                TokenKind::EqEq,
                TokenKind::Ne,
                TokenKind::LtGt,
                TokenKind::Lt,
                TokenKind::Le,
                TokenKind::Gt,
                TokenKind::Ge,
                TokenKind::Plus,
                TokenKind::Minus,
                TokenKind::Star,
                TokenKind::Slash,
                TokenKind::Percent,
                TokenKind::Tilde,
                TokenKind::PlusEq,
                TokenKind::MinusEq,
                TokenKind::StarEq,
                TokenKind::SlashEq,
                TokenKind::PercentEq,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_lex_comment_is_a_token_not_discarded() {
        let tokens = Lexer::tokenize("SELECT a -- trailing note\nFROM t");
        assert_eq!(tokens[2].kind, TokenKind::Comment);
        assert_eq!(tokens[2].text, "-- trailing note");
        assert_eq!(tokens[3].kind, TokenKind::KwFrom);
    }

    #[test]
    fn test_lex_unrecognized_char_is_error_token() {
        let tokens = Lexer::tokenize("a ? b");
        assert_eq!(tokens[0].kind, TokenKind::Ident);
        assert_eq!(tokens[1].kind, TokenKind::SyntaxError);
        assert_eq!(tokens[1].text, "?");
        assert_eq!(tokens[2].kind, TokenKind::Ident);
    }

    #[test]
    fn test_lex_multibyte_char_is_one_error_token() {
        let tokens = Lexer::tokenize("a é b");
        assert_eq!(tokens[0].kind, TokenKind::Ident);
        assert_eq!(tokens[1].kind, TokenKind::SyntaxError);
        assert_eq!(tokens[1].text, "é");
        assert_eq!(tokens[2].kind, TokenKind::Ident);
    }

    #[test]
    fn test_lex_line_column_tracking() {
        let tokens = Lexer::tokenize("SELECT\n  a,\n  b");
        assert_eq!(tokens[0].span.start, Position::new(1, 1));
        assert_eq!(tokens[0].span.end, Position::new(1, 7));
        assert_eq!(tokens[1].span.start, Position::new(2, 3));
        assert_eq!(tokens[2].span.start, Position::new(2, 4));
        assert_eq!(tokens[3].span.start, Position::new(3, 3));
    }

    #[test]
    fn test_relex_token_text_is_stable() {
        // Re-lexing the concatenated token text (space-separated) yields
        // the same kind sequence.
        let src = "SELECT TOP 5 a, [b c] FROM t WHERE x >= 1.5 AND y != 'it''s'";
        let first = Lexer::tokenize(src);
        let rebuilt = first
            .iter()
            .filter(|t| t.kind != TokenKind::Eof)
            .map(|t| t.text.as_str())
            .collect::<Vec<_>>()
            .join(" ");
        let second = Lexer::tokenize(&rebuilt);
        let first_kinds: Vec<_> = first.iter().map(|t| t.kind).collect();
        let second_kinds: Vec<_> = second.iter().map(|t| t.kind).collect();
        assert_eq!(first_kinds, second_kinds);
    }
}

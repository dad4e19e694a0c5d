//! T-SQL front end: lexer, parser, and comment mapper.
//!
//! The entry point is [`parse`], which never fails: malformed statements
//! are skipped over statement by statement and reported as rendered error
//! messages alongside whatever did parse.

mod comments;
mod expr;
mod lexer;
mod parser;
mod token;

pub use comments::{map_comments, CommentMap};
pub use lexer::Lexer;
pub use parser::{ParseError, Parser};
pub use token::{Token, TokenKind};

use tsql_ast::{Comment, Query};

/// Everything the front end produces for one source text.
#[derive(Debug)]
pub struct Parsed {
    pub query: Query,
    /// Rendered error messages, in source order.
    pub errors: Vec<String>,
    /// Comments in source order, side-band to the tree.
    pub comments: Vec<Comment>,
}

/// Parse a whole document. Lexical errors surface as parse errors at the
/// offending token; comments come back as a flat list ready for
/// [`map_comments`].
#[must_use]
pub fn parse(source: &str) -> Parsed {
    let mut parser = Parser::from_sql(source);
    let query = parser.parse();
    let comments = parser.take_comments();
    let errors: Vec<String> = parser
        .errors()
        .iter()
        .map(|e| e.message.clone())
        .collect();
    tracing::debug!(
        statements = query.statements.len(),
        errors = errors.len(),
        comments = comments.len(),
        "parsed document"
    );
    Parsed {
        query,
        errors,
        comments,
    }
}

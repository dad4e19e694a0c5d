//! Recursive-descent statement parser.
//!
//! Expression parsing lives in `expr.rs`. The parser is resilient per
//! statement: a malformed statement is recorded as an error and parsing
//! resumes at the next statement boundary, so one bad statement never
//! aborts the rest of the document.

use thiserror::Error;
use tsql_ast::{
    Comment, CommonTableExpression, Distinctness, Expr, FetchArg, GroupByClause, HavingClause,
    Join, JoinKind, Keyword, KeywordKind, OffsetFetchClause, OrderByClause, OrderByItem, Query,
    SelectBody, SelectStatement, SortDirection, Span, Statement, TableArg, TopArg, WhereClause,
    WithClause,
};

use crate::lexer::Lexer;
use crate::token::{Token, TokenKind};

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

/// A parse error with its fully rendered message.
///
/// Expected-token mismatches render as
/// `expected (<expected>) got (<actual>) instead` followed by the source
/// line and a caret underline covering the offending token's columns.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ParseError {
    pub message: String,
    pub span: Span,
}

// ---------------------------------------------------------------------------
// Parser
// ---------------------------------------------------------------------------

pub struct Parser {
    pub(crate) tokens: Vec<Token>,
    pub(crate) pos: usize,
    pub(crate) errors: Vec<ParseError>,
    comments: Vec<Comment>,
    /// Source lines, for caret rendering in error messages.
    lines: Vec<String>,
}

impl Parser {
    /// Build a parser over the given source text. Tokenizes the whole input
    /// and siphons comment tokens into a side list so grammar rules never
    /// see them.
    #[must_use]
    pub fn from_sql(sql: &str) -> Self {
        let mut tokens = Vec::new();
        let mut comments = Vec::new();
        for tok in Lexer::tokenize(sql) {
            if tok.kind == TokenKind::Comment {
                comments.push(Comment {
                    text: tok.text,
                    span: tok.span,
                });
            } else {
                tokens.push(tok);
            }
        }
        Self {
            tokens,
            pos: 0,
            errors: Vec::new(),
            comments,
            lines: sql.lines().map(str::to_owned).collect(),
        }
    }

    /// Parse the whole document. Always returns a query; failures are
    /// accumulated in [`Parser::errors`].
    pub fn parse(&mut self) -> Query {
        let mut statements = Vec::new();
        while !self.at_eof() {
            if self.eat(TokenKind::Semicolon) {
                continue;
            }
            match self.parse_statement() {
                Ok(stmt) => {
                    statements.push(stmt);
                    let _ = self.eat(TokenKind::Semicolon);
                }
                Err(e) => {
                    self.errors.push(e);
                    self.synchronize();
                }
            }
        }
        Query {
            statements,
            span: self.document_span(),
        }
    }

    /// Errors accumulated so far, in source order.
    #[must_use]
    pub fn errors(&self) -> &[ParseError] {
        &self.errors
    }

    /// Take the collected side-band comments.
    pub fn take_comments(&mut self) -> Vec<Comment> {
        std::mem::take(&mut self.comments)
    }

    /// The span from the first to the last token of the document,
    /// regardless of parse errors. Zero when the input had no tokens.
    fn document_span(&self) -> Span {
        let mut non_eof = self.tokens.iter().filter(|t| t.kind != TokenKind::Eof);
        let Some(first) = non_eof.next() else {
            return Span::ZERO;
        };
        let last = non_eof.last().unwrap_or(first);
        first.span.merge(last.span)
    }

    // -----------------------------------------------------------------------
    // Token navigation
    // -----------------------------------------------------------------------

    pub(crate) fn current(&self) -> &Token {
        &self.tokens[self.pos]
    }

    pub(crate) fn peek(&self) -> TokenKind {
        self.tokens[self.pos].kind
    }

    pub(crate) fn peek_nth(&self, n: usize) -> &Token {
        self.tokens
            .get(self.pos + n)
            .unwrap_or_else(|| &self.tokens[self.tokens.len() - 1])
    }

    pub(crate) fn at_eof(&self) -> bool {
        self.peek() == TokenKind::Eof
    }

    /// Consume and return the current token. Never moves past EOF.
    pub(crate) fn advance(&mut self) -> Token {
        let tok = self.tokens[self.pos].clone();
        if tok.kind != TokenKind::Eof {
            self.pos += 1;
        }
        tok
    }

    pub(crate) fn check(&self, kind: TokenKind) -> bool {
        self.peek() == kind
    }

    pub(crate) fn eat(&mut self, kind: TokenKind) -> bool {
        if self.check(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    pub(crate) fn expect(&mut self, kind: TokenKind) -> Result<Token, ParseError> {
        if self.check(kind) {
            Ok(self.advance())
        } else {
            Err(self.err_expected(kind.label()))
        }
    }

    pub(crate) fn expect_one_of(&mut self, kinds: &[TokenKind]) -> Result<Token, ParseError> {
        if kinds.contains(&self.peek()) {
            Ok(self.advance())
        } else {
            let labels: Vec<&str> = kinds.iter().map(|k| k.label()).collect();
            Err(self.err_expected(&labels.join(" or ")))
        }
    }

    /// The span of the most recently consumed token.
    pub(crate) fn prev_span(&self) -> Span {
        if self.pos == 0 {
            self.tokens[0].span
        } else {
            self.tokens[self.pos - 1].span
        }
    }

    // -----------------------------------------------------------------------
    // Errors
    // -----------------------------------------------------------------------

    /// An expected-token mismatch at the current token, rendered with the
    /// source line and a caret underline.
    pub(crate) fn err_expected(&self, expected: &str) -> ParseError {
        let tok = self.current();
        let actual = if tok.text.is_empty() {
            tok.kind.label().to_owned()
        } else {
            tok.text.clone()
        };
        let mut message = format!("expected ({expected}) got ({actual}) instead");
        let line_no = tok.span.start.line;
        if line_no >= 1 {
            if let Some(line) = self.lines.get(line_no as usize - 1) {
                let col = tok.span.start.column.max(1) as usize;
                let width = if tok.span.is_single_line() {
                    (tok.span.end.column.saturating_sub(tok.span.start.column)).max(1) as usize
                } else {
                    (line.chars().count() + 1).saturating_sub(col).max(1)
                };
                let caret = format!("{}{}", " ".repeat(col - 1), "^".repeat(width));
                message = format!("{message}\n{line}\n{caret}");
            }
        }
        ParseError {
            message,
            span: tok.span,
        }
    }

    /// A plain positioned error at the given span.
    pub(crate) fn err_at(span: Span, msg: impl Into<String>) -> ParseError {
        ParseError {
            message: format!(
                "line {}, column {}: {}",
                span.start.line,
                span.start.column,
                msg.into()
            ),
            span,
        }
    }

    /// A plain positioned error at the current token.
    pub(crate) fn err_here(&self, msg: impl Into<String>) -> ParseError {
        Self::err_at(self.current().span, msg)
    }

    /// Skip to the next statement boundary, always making progress by at
    /// least one token so recovery cannot loop.
    fn synchronize(&mut self) {
        self.advance();
        loop {
            match self.peek() {
                TokenKind::Eof => return,
                TokenKind::Semicolon => {
                    self.advance();
                    return;
                }
                k if k.is_statement_start() => return,
                _ => {
                    self.advance();
                }
            }
        }
    }

    // -----------------------------------------------------------------------
    // Small shared pieces
    // -----------------------------------------------------------------------

    pub(crate) fn parse_comma_sep<T>(
        &mut self,
        f: fn(&mut Self) -> Result<T, ParseError>,
    ) -> Result<Vec<T>, ParseError> {
        let mut v = vec![f(self)?];
        while self.eat(TokenKind::Comma) {
            v.push(f(self)?);
        }
        Ok(v)
    }

    fn keyword(tok: &Token, kind: KeywordKind) -> Keyword {
        Keyword {
            kind,
            text: tok.text.clone(),
            span: tok.span,
        }
    }

    /// Parse a bare or quoted identifier into an expression node.
    pub(crate) fn parse_name(&mut self) -> Result<Expr, ParseError> {
        match self.peek() {
            TokenKind::Ident => {
                let tok = self.advance();
                Ok(Expr::Identifier {
                    name: tok.text,
                    span: tok.span,
                })
            }
            TokenKind::QuotedIdent => {
                let tok = self.advance();
                Ok(Expr::QuotedIdentifier {
                    name: tok.text[1..tok.text.len() - 1].to_owned(),
                    span: tok.span,
                })
            }
            _ => Err(self.err_expected("identifier")),
        }
    }

    // -----------------------------------------------------------------------
    // Statements
    // -----------------------------------------------------------------------

    fn parse_statement(&mut self) -> Result<Statement, ParseError> {
        match self.peek() {
            TokenKind::KwSelect => Ok(Statement::Select(self.parse_select_statement(None)?)),
            TokenKind::KwWith => {
                let with = self.parse_with_clause()?;
                if !self.check(TokenKind::KwSelect) {
                    return Err(self.err_expected("SELECT"));
                }
                Ok(Statement::Select(self.parse_select_statement(Some(with))?))
            }
            TokenKind::KwInsert | TokenKind::KwUpdate | TokenKind::KwDelete => {
                let label = self.peek().label();
                Err(self.err_here(format!("{label} statements are not supported")))
            }
            TokenKind::SyntaxError => {
                let text = self.current().text.clone();
                Err(self.err_here(format!("unrecognized character {text:?}")))
            }
            _ => Err(self.err_expected("SELECT or WITH")),
        }
    }

    fn parse_select_statement(
        &mut self,
        with: Option<WithClause>,
    ) -> Result<SelectStatement, ParseError> {
        let body = self.parse_select_body()?;
        let span = with
            .as_ref()
            .map_or(body.span, |w| w.span.merge(body.span));
        Ok(SelectStatement { with, body, span })
    }

    // -----------------------------------------------------------------------
    // WITH / CTEs
    // -----------------------------------------------------------------------

    fn parse_with_clause(&mut self) -> Result<WithClause, ParseError> {
        let with_tok = self.expect(TokenKind::KwWith)?;
        let keyword = Self::keyword(&with_tok, KeywordKind::With);
        let ctes = self.parse_comma_sep(Self::parse_cte)?;
        let span = ctes
            .last()
            .map_or(with_tok.span, |c| with_tok.span.merge(c.span));
        Ok(WithClause {
            keyword,
            ctes,
            span,
        })
    }

    fn parse_cte(&mut self) -> Result<CommonTableExpression, ParseError> {
        let name = self.parse_name()?;
        let columns = if self.eat(TokenKind::LeftParen) {
            let cols = self.parse_comma_sep(Self::parse_name)?;
            self.expect(TokenKind::RightParen)?;
            Some(cols)
        } else {
            None
        };
        self.expect(TokenKind::KwAs)?;
        self.expect(TokenKind::LeftParen)?;
        let body = self.parse_select_body()?;
        let close = self.expect(TokenKind::RightParen)?;
        if let Some(order_by) = &body.order_by {
            if body.top.is_none() {
                return Err(Self::err_at(
                    order_by.span,
                    "ORDER BY in a common table expression requires TOP",
                ));
            }
        }
        Ok(CommonTableExpression {
            span: name.span().merge(close.span),
            name,
            columns,
            body,
        })
    }

    // -----------------------------------------------------------------------
    // SELECT body
    // -----------------------------------------------------------------------

    pub(crate) fn parse_select_body(&mut self) -> Result<SelectBody, ParseError> {
        let select_tok = self.expect(TokenKind::KwSelect)?;
        let keyword = Self::keyword(&select_tok, KeywordKind::Select);
        let mut end = select_tok.span;

        let distinct = if self.eat(TokenKind::KwDistinct) {
            Distinctness::Distinct
        } else {
            let _ = self.eat(TokenKind::KwAll);
            Distinctness::All
        };

        let top = if self.check(TokenKind::KwTop) {
            Some(self.parse_top()?)
        } else {
            None
        };

        let items = self.parse_comma_sep(Self::parse_expr)?;
        for item in &items {
            Self::validate_subquery_item(item)?;
            end = end.merge(item.span());
        }

        let table = if self.check(TokenKind::KwFrom) {
            let t = self.parse_table_arg()?;
            end = end.merge(t.span);
            Some(t)
        } else {
            None
        };

        let where_clause = if self.check(TokenKind::KwWhere) {
            let tok = self.advance();
            let predicate = self.parse_expr()?;
            let span = tok.span.merge(predicate.span());
            end = end.merge(span);
            Some(WhereClause {
                keyword: Self::keyword(&tok, KeywordKind::Where),
                predicate,
                span,
            })
        } else {
            None
        };

        let group_by = if self.check(TokenKind::KwGroup) {
            let g = self.parse_group_by()?;
            end = end.merge(g.span);
            Some(g)
        } else {
            None
        };

        let having = if self.check(TokenKind::KwHaving) {
            let tok = self.advance();
            let predicate = self.parse_expr()?;
            let span = tok.span.merge(predicate.span());
            end = end.merge(span);
            Some(HavingClause {
                keyword: Self::keyword(&tok, KeywordKind::Having),
                predicate,
                span,
            })
        } else {
            None
        };

        let order_by = if self.check(TokenKind::KwOrder) {
            let o = self.parse_order_by()?;
            end = end.merge(o.span);
            Some(o)
        } else {
            None
        };

        Ok(SelectBody {
            keyword,
            distinct,
            top,
            items,
            table,
            where_clause,
            group_by,
            having,
            order_by,
            span: select_tok.span.merge(end),
        })
    }

    /// Rules for a subquery used as a select item.
    fn validate_subquery_item(item: &Expr) -> Result<(), ParseError> {
        let Expr::Subquery { body, .. } = item.unaliased() else {
            return Ok(());
        };
        if body.items.len() != 1 {
            return Err(Self::err_at(
                body.span,
                "a subquery select item must project exactly one column",
            ));
        }
        if body.distinct == Distinctness::Distinct {
            if let Some(group_by) = &body.group_by {
                if group_by.exprs.len() > 1 {
                    return Err(Self::err_at(
                        body.span,
                        "a subquery select item cannot combine DISTINCT with multiple GROUP BY expressions",
                    ));
                }
            }
        }
        if body.order_by.is_some() && body.top.is_none() {
            return Err(Self::err_at(
                body.span,
                "ORDER BY in a subquery select item requires TOP",
            ));
        }
        Ok(())
    }

    // -----------------------------------------------------------------------
    // TOP
    // -----------------------------------------------------------------------

    fn parse_top(&mut self) -> Result<TopArg, ParseError> {
        let top_tok = self.expect(TokenKind::KwTop)?;
        let quantity = self.parse_top_quantity()?;
        let mut end = quantity.span();
        let percent = self.eat(TokenKind::KwPercent);
        if percent {
            end = end.merge(self.prev_span());
        }
        let with_ties = if self.check(TokenKind::KwWith) {
            self.advance();
            let ties = self.expect(TokenKind::KwTies)?;
            end = end.merge(ties.span);
            true
        } else {
            false
        };
        Ok(TopArg {
            quantity: Box::new(quantity),
            percent,
            with_ties,
            span: top_tok.span.merge(end),
        })
    }

    /// The TOP quantity is a constant, a variable, or a parenthesized
    /// expression; a full expression parse here would read the first select
    /// item as an alias of the quantity.
    fn parse_top_quantity(&mut self) -> Result<Expr, ParseError> {
        match self.peek() {
            TokenKind::Number => {
                let tok = self.advance();
                Ok(Expr::NumberLiteral {
                    value: tok.text,
                    span: tok.span,
                })
            }
            TokenKind::LocalVariable => {
                let tok = self.advance();
                Ok(Expr::LocalVariable {
                    name: tok.text[1..].to_owned(),
                    span: tok.span,
                })
            }
            TokenKind::LeftParen => {
                let open = self.advance();
                let inner = self.parse_expr()?;
                let close = self.expect(TokenKind::RightParen)?;
                Ok(Expr::ExprList {
                    items: vec![inner],
                    span: open.span.merge(close.span),
                })
            }
            _ => Err(self.err_expected("TOP quantity")),
        }
    }

    // -----------------------------------------------------------------------
    // FROM and JOINs
    // -----------------------------------------------------------------------

    fn parse_table_arg(&mut self) -> Result<TableArg, ParseError> {
        let from_tok = self.expect(TokenKind::KwFrom)?;
        let table = self.parse_expr()?;
        let mut end = table.span();
        let mut joins = Vec::new();
        while let Some(join) = self.try_parse_join()? {
            end = end.merge(join.span);
            joins.push(join);
        }
        Ok(TableArg {
            table: Box::new(table),
            joins,
            span: from_tok.span.merge(end),
        })
    }

    fn try_parse_join(&mut self) -> Result<Option<Join>, ParseError> {
        let (kind, outer, start) = match self.peek() {
            TokenKind::KwJoin => {
                let tok = self.advance();
                (JoinKind::Inner, false, tok.span)
            }
            TokenKind::KwInner => {
                let tok = self.advance();
                self.expect(TokenKind::KwJoin)?;
                (JoinKind::Inner, false, tok.span)
            }
            TokenKind::KwLeft | TokenKind::KwRight | TokenKind::KwFull => {
                let tok = self.advance();
                let kind = match tok.kind {
                    TokenKind::KwLeft => JoinKind::Left,
                    TokenKind::KwRight => JoinKind::Right,
                    _ => JoinKind::Full,
                };
                let outer = self.eat(TokenKind::KwOuter);
                self.expect(TokenKind::KwJoin)?;
                (kind, outer, tok.span)
            }
            _ => return Ok(None),
        };
        let table = self.parse_expr()?;
        self.expect(TokenKind::KwOn)?;
        let predicate = self.parse_expr()?;
        Ok(Some(Join {
            kind,
            outer,
            span: start.merge(predicate.span()),
            table,
            predicate,
        }))
    }

    // -----------------------------------------------------------------------
    // GROUP BY / ORDER BY / OFFSET-FETCH
    // -----------------------------------------------------------------------

    fn parse_group_by(&mut self) -> Result<GroupByClause, ParseError> {
        let group_tok = self.expect(TokenKind::KwGroup)?;
        let by_tok = self.expect(TokenKind::KwBy)?;
        let keyword = Keyword {
            kind: KeywordKind::GroupBy,
            text: format!("{} {}", group_tok.text, by_tok.text),
            span: group_tok.span.merge(by_tok.span),
        };
        let exprs = self.parse_comma_sep(Self::parse_expr)?;
        let span = exprs
            .last()
            .map_or(keyword.span, |e| keyword.span.merge(e.span()));
        Ok(GroupByClause {
            keyword,
            exprs,
            span,
        })
    }

    fn parse_order_by(&mut self) -> Result<OrderByClause, ParseError> {
        let order_tok = self.expect(TokenKind::KwOrder)?;
        let by_tok = self.expect(TokenKind::KwBy)?;
        let keyword = Keyword {
            kind: KeywordKind::OrderBy,
            text: format!("{} {}", order_tok.text, by_tok.text),
            span: order_tok.span.merge(by_tok.span),
        };
        let items = self.parse_comma_sep(Self::parse_order_by_item)?;
        let mut span = items
            .last()
            .map_or(keyword.span, |i| keyword.span.merge(i.span));
        let offset_fetch = if self.check(TokenKind::KwOffset) {
            let of = self.parse_offset_fetch()?;
            span = span.merge(of.span);
            Some(of)
        } else {
            None
        };
        Ok(OrderByClause {
            keyword,
            items,
            offset_fetch,
            span,
        })
    }

    pub(crate) fn parse_order_by_item(&mut self) -> Result<OrderByItem, ParseError> {
        let expr = self.parse_expr()?;
        let direction = if self.eat(TokenKind::KwAsc) {
            Some(SortDirection::Asc)
        } else if self.eat(TokenKind::KwDesc) {
            Some(SortDirection::Desc)
        } else {
            None
        };
        let span = if direction.is_some() {
            expr.span().merge(self.prev_span())
        } else {
            expr.span()
        };
        Ok(OrderByItem {
            expr,
            direction,
            span,
        })
    }

    fn parse_offset_fetch(&mut self) -> Result<OffsetFetchClause, ParseError> {
        let offset_tok = self.expect(TokenKind::KwOffset)?;
        let offset = self.parse_expr()?;
        let rows_tok = self.expect_one_of(&[TokenKind::KwRow, TokenKind::KwRows])?;
        let mut span = offset_tok.span.merge(rows_tok.span);
        let fetch = if self.check(TokenKind::KwFetch) {
            let fetch_tok = self.advance();
            let which = self.expect_one_of(&[TokenKind::KwFirst, TokenKind::KwNext])?;
            let quantity = self.parse_expr()?;
            self.expect_one_of(&[TokenKind::KwRow, TokenKind::KwRows])?;
            let only_tok = self.expect(TokenKind::KwOnly)?;
            let fetch_span = fetch_tok.span.merge(only_tok.span);
            span = span.merge(fetch_span);
            Some(FetchArg {
                next: which.kind == TokenKind::KwNext,
                quantity,
                span: fetch_span,
            })
        } else {
            None
        };
        Ok(OffsetFetchClause {
            offset,
            fetch,
            span,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tsql_ast::{Expr, InSet, Statement};

    fn parse_ok(sql: &str) -> Query {
        let mut p = Parser::from_sql(sql);
        let q = p.parse();
        assert!(p.errors().is_empty(), "unexpected errors: {:?}", p.errors());
        q
    }

    fn only_select(q: &Query) -> &SelectStatement {
        assert_eq!(q.statements.len(), 1);
        let Statement::Select(s) = &q.statements[0];
        s
    }

    #[test]
    fn test_parse_minimal_select() {
        let q = parse_ok("SELECT a, b FROM t");
        let s = only_select(&q);
        assert_eq!(s.body.items.len(), 2);
        let table = s.body.table.as_ref().unwrap();
        assert!(matches!(&*table.table, Expr::Identifier { name, .. } if name == "t"));
    }

    #[test]
    fn test_parse_select_without_from() {
        let q = parse_ok("SELECT 1");
        let s = only_select(&q);
        assert!(s.body.table.is_none());
    }

    #[test]
    fn test_parse_top_percent_with_ties() {
        let q = parse_ok("SELECT TOP 10 PERCENT WITH TIES a FROM t");
        let top = only_select(&q).body.top.as_ref().unwrap().clone();
        assert!(top.percent);
        assert!(top.with_ties);
        assert!(matches!(*top.quantity, Expr::NumberLiteral { ref value, .. } if value == "10"));
    }

    #[test]
    fn test_parse_top_does_not_eat_first_item_as_alias() {
        let q = parse_ok("SELECT TOP 5 a FROM t");
        let body = &only_select(&q).body;
        assert!(body.top.is_some());
        assert_eq!(body.items.len(), 1);
        assert!(matches!(&body.items[0], Expr::Identifier { name, .. } if name == "a"));
    }

    #[test]
    fn test_parse_joins() {
        let q = parse_ok(
            "SELECT * FROM a JOIN b ON a.x = b.x LEFT OUTER JOIN c ON b.y = c.y FULL JOIN d ON c.z = d.z",
        );
        let table = only_select(&q).body.table.as_ref().unwrap().clone();
        assert_eq!(table.joins.len(), 3);
        assert_eq!(table.joins[0].kind, JoinKind::Inner);
        assert!(!table.joins[0].outer);
        assert_eq!(table.joins[1].kind, JoinKind::Left);
        assert!(table.joins[1].outer);
        assert_eq!(table.joins[2].kind, JoinKind::Full);
        assert!(!table.joins[2].outer);
    }

    #[test]
    fn test_parse_where_group_having_order() {
        let q = parse_ok(
            "SELECT dept, COUNT(*) FROM emp WHERE active = 1 GROUP BY dept HAVING COUNT(*) > 3 ORDER BY dept DESC",
        );
        let body = &only_select(&q).body;
        assert!(body.where_clause.is_some());
        assert_eq!(body.group_by.as_ref().unwrap().exprs.len(), 1);
        assert!(body.having.is_some());
        let order_by = body.order_by.as_ref().unwrap();
        assert_eq!(order_by.items[0].direction, Some(SortDirection::Desc));
    }

    #[test]
    fn test_parse_offset_fetch() {
        let q = parse_ok("SELECT a FROM t ORDER BY a OFFSET 10 ROWS FETCH NEXT 5 ROWS ONLY");
        let order_by = only_select(&q).body.order_by.clone().unwrap();
        let of = order_by.offset_fetch.unwrap();
        assert!(matches!(of.offset, Expr::NumberLiteral { ref value, .. } if value == "10"));
        let fetch = of.fetch.unwrap();
        assert!(fetch.next);
        assert!(matches!(fetch.quantity, Expr::NumberLiteral { ref value, .. } if value == "5"));
    }

    #[test]
    fn test_parse_cte() {
        let q = parse_ok("WITH c (x, y) AS (SELECT a, b FROM t) SELECT x FROM c");
        let s = only_select(&q);
        let with = s.with.as_ref().unwrap();
        assert_eq!(with.ctes.len(), 1);
        let cte = &with.ctes[0];
        assert!(matches!(&cte.name, Expr::Identifier { name, .. } if name == "c"));
        assert_eq!(cte.columns.as_ref().unwrap().len(), 2);
    }

    #[test]
    fn test_cte_order_by_without_top_is_error() {
        let mut p = Parser::from_sql("WITH c AS (SELECT a FROM t ORDER BY a) SELECT * FROM c");
        let q = p.parse();
        assert!(q.statements.is_empty());
        assert_eq!(p.errors().len(), 1);
        assert!(p.errors()[0]
            .message
            .contains("ORDER BY in a common table expression requires TOP"));
    }

    #[test]
    fn test_cte_order_by_with_top_is_allowed() {
        parse_ok("WITH c AS (SELECT TOP 3 a FROM t ORDER BY a) SELECT * FROM c");
    }

    #[test]
    fn test_subquery_select_item_must_project_one_column() {
        let mut p = Parser::from_sql("SELECT (SELECT a, b FROM t) FROM u");
        p.parse();
        assert_eq!(p.errors().len(), 1);
        assert!(p.errors()[0].message.contains("exactly one column"));
    }

    #[test]
    fn test_subquery_item_distinct_with_multi_group_by_is_error() {
        let mut p = Parser::from_sql(
            "SELECT (SELECT DISTINCT a FROM t GROUP BY a, b) FROM u",
        );
        p.parse();
        assert_eq!(p.errors().len(), 1);
        assert!(p.errors()[0].message.contains("DISTINCT"));
    }

    #[test]
    fn test_subquery_in_from_is_aliasable() {
        let q = parse_ok("SELECT s.a FROM (SELECT a, b FROM t) s");
        let table = only_select(&q).body.table.as_ref().unwrap().clone();
        assert!(matches!(&*table.table, Expr::Alias { .. }));
    }

    #[test]
    fn test_unsupported_statement_is_explicit_error() {
        let mut p = Parser::from_sql("INSERT INTO t VALUES (1)");
        let q = p.parse();
        assert!(q.statements.is_empty());
        assert_eq!(p.errors().len(), 1);
        assert!(p.errors()[0]
            .message
            .contains("INSERT statements are not supported"));
    }

    #[test]
    fn test_resilience_bad_then_good_statement() {
        let mut p = Parser::from_sql("SELECT FROM;\nSELECT a FROM t");
        let q = p.parse();
        assert_eq!(p.errors().len(), 1);
        assert_eq!(q.statements.len(), 1);
    }

    #[test]
    fn test_error_message_has_caret_under_offender() {
        let mut p = Parser::from_sql("SELECT a FRM t");
        p.parse();
        // `FRM` lexes as an identifier, so it is read as an alias of `a`
        // and `t` is left dangling at statement level.
        assert!(!p.errors().is_empty());
        let msg = &p.errors()[0].message;
        assert!(msg.contains("expected ("), "message was: {msg}");
        assert!(msg.contains("got ("), "message was: {msg}");
        assert!(msg.lines().count() >= 3, "message was: {msg}");
        assert!(msg.lines().last().unwrap().contains('^'));
    }

    #[test]
    fn test_query_span_covers_all_tokens() {
        let mut p = Parser::from_sql("SELECT a FROM t;\nSELECT b FROM u");
        let q = p.parse();
        assert_eq!(q.span.start.line, 1);
        assert_eq!(q.span.end.line, 2);
        for stmt in &q.statements {
            assert!(q.span.contains(stmt.span()));
        }
    }

    #[test]
    fn test_empty_input_yields_empty_query() {
        let mut p = Parser::from_sql("");
        let q = p.parse();
        assert!(q.statements.is_empty());
        assert_eq!(q.span, Span::ZERO);
        assert!(p.errors().is_empty());
    }

    #[test]
    fn test_comments_are_siphoned_not_parsed() {
        let mut p = Parser::from_sql("SELECT a -- pick a\nFROM t -- from t");
        let q = p.parse();
        assert!(p.errors().is_empty());
        assert_eq!(q.statements.len(), 1);
        let comments = p.take_comments();
        assert_eq!(comments.len(), 2);
        assert_eq!(comments[0].text, "-- pick a");
    }

    #[test]
    fn test_in_subquery_parses() {
        let q = parse_ok("SELECT a FROM t WHERE a IN (SELECT b FROM u)");
        let where_clause = only_select(&q).body.where_clause.clone().unwrap();
        assert!(matches!(
            where_clause.predicate,
            Expr::In {
                set: InSet::Subquery(_),
                not: false,
                ..
            }
        ));
    }

    #[test]
    fn test_statement_span_contains_children() {
        let q = parse_ok("SELECT TOP 3 a, b FROM t WHERE a > 1 ORDER BY b DESC");
        let s = only_select(&q);
        let body = &s.body;
        assert!(s.span.contains(body.span));
        if let Some(top) = &body.top {
            assert!(body.span.contains(top.span));
        }
        for item in &body.items {
            assert!(body.span.contains(item.span()));
        }
        if let Some(t) = &body.table {
            assert!(body.span.contains(t.span));
        }
        if let Some(w) = &body.where_clause {
            assert!(body.span.contains(w.span));
            assert!(w.span.contains(w.predicate.span()));
        }
        if let Some(o) = &body.order_by {
            assert!(body.span.contains(o.span));
        }
    }
}

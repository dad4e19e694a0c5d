//! Expression parsing by precedence climbing.
//!
//! Each operator level owns a pair of binding powers; the climb loop keeps
//! folding infix operators while the next operator binds at least as
//! tightly as the current minimum. Prefix forms, alias continuations, and
//! the multi-token predicates (BETWEEN, IN, LIKE, quantified comparisons)
//! all live here.

use tsql_ast::{
    BinaryOp, DataType, Expr, FrameBound, FrameUnit, FunctionOverClause, InSet, Quantifier,
    UnaryOp, WindowFrameClause,
};

use crate::parser::{ParseError, Parser};
use crate::token::{is_data_type_name, TokenKind};

/// Binding power pairs, weakest first. The left value decides whether the
/// climb loop continues; the right value is the minimum for the operator's
/// right operand, so an even/odd pair makes the level left-associative.
mod bp {
    pub const ASSIGN: (u8, u8) = (1, 2);
    pub const LOGICAL: (u8, u8) = (3, 4);
    pub const AND: (u8, u8) = (5, 6);
    pub const NOT: (u8, u8) = (7, 8);
    pub const COMPARISON: (u8, u8) = (9, 10);
    pub const ADDITIVE: (u8, u8) = (11, 12);
    pub const MULTIPLICATIVE: (u8, u8) = (13, 14);
    pub const UNARY: u8 = 15;
}

fn unquote_string(text: &str) -> String {
    text[1..text.len() - 1].replace("''", "'")
}

fn binary_op_for(kind: TokenKind) -> Option<BinaryOp> {
    Some(match kind {
        TokenKind::Plus => BinaryOp::Add,
        TokenKind::Minus => BinaryOp::Subtract,
        TokenKind::Star => BinaryOp::Multiply,
        TokenKind::Slash => BinaryOp::Divide,
        TokenKind::Percent => BinaryOp::Modulo,
        TokenKind::Eq | TokenKind::EqEq => BinaryOp::Eq,
        TokenKind::Ne | TokenKind::LtGt => BinaryOp::Ne,
        TokenKind::Lt => BinaryOp::Lt,
        TokenKind::Le => BinaryOp::Le,
        TokenKind::Gt => BinaryOp::Gt,
        TokenKind::Ge => BinaryOp::Ge,
        TokenKind::KwAnd => BinaryOp::And,
        TokenKind::KwOr => BinaryOp::Or,
        TokenKind::PlusEq => BinaryOp::AddAssign,
        TokenKind::MinusEq => BinaryOp::SubAssign,
        TokenKind::StarEq => BinaryOp::MulAssign,
        TokenKind::SlashEq => BinaryOp::DivAssign,
        TokenKind::PercentEq => BinaryOp::ModAssign,
        _ => return None,
    })
}

fn is_comparison(kind: TokenKind) -> bool {
    matches!(
        kind,
        TokenKind::Eq
            | TokenKind::EqEq
            | TokenKind::Ne
            | TokenKind::LtGt
            | TokenKind::Lt
            | TokenKind::Le
            | TokenKind::Gt
            | TokenKind::Ge
    )
}

impl Parser {
    pub(crate) fn parse_expr(&mut self) -> Result<Expr, ParseError> {
        self.parse_expr_bp(0)
    }

    fn parse_expr_bp(&mut self, min_bp: u8) -> Result<Expr, ParseError> {
        let mut lhs = self.parse_prefix()?;
        while let Some((l_bp, r_bp)) = self.infix_bp() {
            if l_bp < min_bp {
                break;
            }
            lhs = self.parse_infix(lhs, r_bp)?;
        }
        Ok(lhs)
    }

    /// Binding power of the operator starting at the current token, or
    /// `None` when the current token cannot continue an expression.
    fn infix_bp(&self) -> Option<(u8, u8)> {
        match self.peek() {
            TokenKind::PlusEq
            | TokenKind::MinusEq
            | TokenKind::StarEq
            | TokenKind::SlashEq
            | TokenKind::PercentEq => Some(bp::ASSIGN),
            TokenKind::KwOr | TokenKind::KwBetween | TokenKind::KwIn | TokenKind::KwLike => {
                Some(bp::LOGICAL)
            }
            TokenKind::KwAnd => Some(bp::AND),
            TokenKind::KwNot => match self.peek_nth(1).kind {
                TokenKind::KwBetween | TokenKind::KwIn | TokenKind::KwLike => Some(bp::NOT),
                _ => None,
            },
            k if is_comparison(k) => Some(bp::COMPARISON),
            TokenKind::Plus | TokenKind::Minus => Some(bp::ADDITIVE),
            TokenKind::Star | TokenKind::Slash | TokenKind::Percent => Some(bp::MULTIPLICATIVE),
            _ => None,
        }
    }

    // -----------------------------------------------------------------------
    // Prefix forms
    // -----------------------------------------------------------------------

    fn parse_prefix(&mut self) -> Result<Expr, ParseError> {
        match self.peek() {
            TokenKind::Number => {
                let tok = self.advance();
                self.try_alias_continue(Expr::NumberLiteral {
                    value: tok.text,
                    span: tok.span,
                })
            }
            TokenKind::SqlString => {
                let tok = self.advance();
                self.try_alias_continue(Expr::StringLiteral {
                    value: unquote_string(&tok.text),
                    span: tok.span,
                })
            }
            TokenKind::LocalVariable => {
                let tok = self.advance();
                self.try_alias_continue(Expr::LocalVariable {
                    name: tok.text[1..].to_owned(),
                    span: tok.span,
                })
            }
            TokenKind::Star => {
                let tok = self.advance();
                Ok(Expr::Star { span: tok.span })
            }
            TokenKind::QuotedIdent => {
                let base = self.parse_name()?;
                let expr = self.parse_compound_tail(base)?;
                self.try_alias_continue(expr)
            }
            k if k == TokenKind::Ident || k.is_builtin_function() => {
                let tok = self.advance();
                if self.check(TokenKind::LeftParen) {
                    let call =
                        self.parse_function_call(tok.text, k.is_builtin_function(), tok.span)?;
                    return self.try_alias_continue(call);
                }
                let base = Expr::Identifier {
                    name: tok.text,
                    span: tok.span,
                };
                let expr = self.parse_compound_tail(base)?;
                self.try_alias_continue(expr)
            }
            TokenKind::LeftParen => {
                let open = self.advance();
                if self.check(TokenKind::KwSelect) {
                    let body = self.parse_select_body()?;
                    let close = self.expect(TokenKind::RightParen)?;
                    return self.try_alias_continue(Expr::Subquery {
                        body: Box::new(body),
                        span: open.span.merge(close.span),
                    });
                }
                let items = self.parse_comma_sep(Self::parse_expr)?;
                let close = self.expect(TokenKind::RightParen)?;
                self.try_alias_continue(Expr::ExprList {
                    items,
                    span: open.span.merge(close.span),
                })
            }
            TokenKind::Minus => self.parse_unary(UnaryOp::Minus, bp::UNARY),
            TokenKind::Plus => self.parse_unary(UnaryOp::Plus, bp::UNARY),
            TokenKind::Tilde => self.parse_unary(UnaryOp::BitNot, bp::UNARY),
            TokenKind::KwNot => self.parse_unary(UnaryOp::Not, bp::NOT.1),
            TokenKind::KwExists => {
                let exists_tok = self.advance();
                self.expect(TokenKind::LeftParen)?;
                if !self.check(TokenKind::KwSelect) {
                    return Err(self.err_here("EXISTS requires a subquery"));
                }
                let body = self.parse_select_body()?;
                let close = self.expect(TokenKind::RightParen)?;
                Ok(Expr::Exists {
                    subquery: Box::new(body),
                    span: exists_tok.span.merge(close.span),
                })
            }
            TokenKind::KwCast => self.parse_cast(),
            TokenKind::SyntaxError => {
                let text = self.current().text.clone();
                Err(self.err_here(format!("unrecognized character {text:?}")))
            }
            _ => Err(self.err_expected("expression")),
        }
    }

    fn parse_unary(&mut self, op: UnaryOp, r_bp: u8) -> Result<Expr, ParseError> {
        let op_tok = self.advance();
        let expr = self.parse_expr_bp(r_bp)?;
        Ok(Expr::Unary {
            span: op_tok.span.merge(expr.span()),
            op,
            expr: Box::new(expr),
        })
    }

    /// Fold `.part` segments onto an identifier. A `*` is allowed as the
    /// final segment, as in `t.*`.
    fn parse_compound_tail(&mut self, base: Expr) -> Result<Expr, ParseError> {
        if !self.check(TokenKind::Dot) {
            return Ok(base);
        }
        let mut parts = vec![base];
        while self.eat(TokenKind::Dot) {
            if self.check(TokenKind::Star) {
                let tok = self.advance();
                parts.push(Expr::Star { span: tok.span });
                break;
            }
            parts.push(self.parse_name()?);
        }
        let span = parts[0].span().merge(parts[parts.len() - 1].span());
        Ok(Expr::CompoundIdentifier { parts, span })
    }

    /// Attach a trailing alias (`expr AS name`, `expr name`, `expr 'name'`)
    /// when one follows. `AS` is left alone when the next word is a
    /// data-type name, so the `AS` inside a CAST stays with the CAST.
    fn try_alias_continue(&mut self, expr: Expr) -> Result<Expr, ParseError> {
        let as_keyword = match self.peek() {
            TokenKind::KwAs => {
                let next = self.peek_nth(1);
                if next.kind == TokenKind::Ident && is_data_type_name(&next.text) {
                    return Ok(expr);
                }
                self.advance();
                true
            }
            TokenKind::Ident | TokenKind::QuotedIdent | TokenKind::SqlString => false,
            _ => return Ok(expr),
        };
        let alias = self.parse_alias_name()?;
        Ok(Expr::Alias {
            span: expr.span().merge(alias.span()),
            expr: Box::new(expr),
            alias: Box::new(alias),
            as_keyword,
        })
    }

    fn parse_alias_name(&mut self) -> Result<Expr, ParseError> {
        match self.peek() {
            TokenKind::Ident | TokenKind::QuotedIdent => self.parse_name(),
            TokenKind::SqlString => {
                let tok = self.advance();
                Ok(Expr::StringLiteral {
                    value: unquote_string(&tok.text),
                    span: tok.span,
                })
            }
            _ => Err(self.err_expected("alias")),
        }
    }

    // -----------------------------------------------------------------------
    // Infix forms
    // -----------------------------------------------------------------------

    fn parse_infix(&mut self, lhs: Expr, r_bp: u8) -> Result<Expr, ParseError> {
        let op_tok = self.advance();
        match op_tok.kind {
            TokenKind::KwBetween => self.parse_between(lhs, false),
            TokenKind::KwIn => self.parse_in(lhs, false),
            TokenKind::KwLike => self.parse_like(lhs, false),
            TokenKind::KwNot => match self.advance().kind {
                TokenKind::KwBetween => self.parse_between(lhs, true),
                TokenKind::KwIn => self.parse_in(lhs, true),
                TokenKind::KwLike => self.parse_like(lhs, true),
                _ => Err(self.err_expected("BETWEEN, IN, or LIKE")),
            },
            k if is_comparison(k) => {
                let op = binary_op_for(k).unwrap_or(BinaryOp::Eq);
                if matches!(
                    self.peek(),
                    TokenKind::KwAll | TokenKind::KwAny | TokenKind::KwSome
                ) {
                    return self.parse_quantified(lhs, op);
                }
                let rhs = self.parse_expr_bp(r_bp)?;
                Ok(Self::binary(lhs, op, rhs))
            }
            k => {
                let Some(op) = binary_op_for(k) else {
                    return Err(self.err_expected("operator"));
                };
                let rhs = self.parse_expr_bp(r_bp)?;
                Ok(Self::binary(lhs, op, rhs))
            }
        }
    }

    fn binary(lhs: Expr, op: BinaryOp, rhs: Expr) -> Expr {
        Expr::Binary {
            span: lhs.span().merge(rhs.span()),
            left: Box::new(lhs),
            op,
            right: Box::new(rhs),
        }
    }

    /// `<expr> <cmp> ALL|ANY|SOME (<subquery>)`. The parenthesized operand
    /// must be a subquery, not a value list.
    fn parse_quantified(&mut self, lhs: Expr, op: BinaryOp) -> Result<Expr, ParseError> {
        let q_tok = self.advance();
        let quantifier = match q_tok.kind {
            TokenKind::KwAll => Quantifier::All,
            TokenKind::KwAny => Quantifier::Any,
            _ => Quantifier::Some,
        };
        self.expect(TokenKind::LeftParen)?;
        if !self.check(TokenKind::KwSelect) {
            return Err(self.err_here(format!("{} requires a subquery", q_tok.kind.label())));
        }
        let body = self.parse_select_body()?;
        let close = self.expect(TokenKind::RightParen)?;
        Ok(Expr::Quantified {
            span: lhs.span().merge(close.span),
            expr: Box::new(lhs),
            op,
            quantifier,
            subquery: Box::new(body),
        })
    }

    /// Bounds are parsed above AND, so the separating AND is never folded
    /// into the low bound.
    fn parse_between(&mut self, lhs: Expr, not: bool) -> Result<Expr, ParseError> {
        let low = self.parse_expr_bp(bp::AND.1)?;
        self.expect(TokenKind::KwAnd)?;
        let high = self.parse_expr_bp(bp::AND.1)?;
        Ok(Expr::Between {
            span: lhs.span().merge(high.span()),
            expr: Box::new(lhs),
            not,
            low: Box::new(low),
            high: Box::new(high),
        })
    }

    fn parse_in(&mut self, lhs: Expr, not: bool) -> Result<Expr, ParseError> {
        self.expect(TokenKind::LeftParen)?;
        let set = if self.check(TokenKind::KwSelect) {
            let body = self.parse_select_body()?;
            InSet::Subquery(Box::new(body))
        } else {
            InSet::List(self.parse_comma_sep(Self::parse_expr)?)
        };
        let close = self.expect(TokenKind::RightParen)?;
        Ok(Expr::In {
            span: lhs.span().merge(close.span),
            expr: Box::new(lhs),
            not,
            set,
        })
    }

    fn parse_like(&mut self, lhs: Expr, not: bool) -> Result<Expr, ParseError> {
        let pattern = self.parse_expr_bp(bp::AND.1)?;
        Ok(Expr::Like {
            span: lhs.span().merge(pattern.span()),
            expr: Box::new(lhs),
            not,
            pattern: Box::new(pattern),
        })
    }

    // -----------------------------------------------------------------------
    // Calls, CAST, OVER
    // -----------------------------------------------------------------------

    fn parse_function_call(
        &mut self,
        name: String,
        builtin: bool,
        start: tsql_ast::Span,
    ) -> Result<Expr, ParseError> {
        self.expect(TokenKind::LeftParen)?;
        let args = if self.check(TokenKind::RightParen) {
            Vec::new()
        } else {
            self.parse_comma_sep(Self::parse_expr)?
        };
        let close = self.expect(TokenKind::RightParen)?;
        let mut span = start.merge(close.span);
        let over = if self.check(TokenKind::KwOver) {
            let over = self.parse_over_clause()?;
            span = span.merge(over.span);
            Some(over)
        } else {
            None
        };
        Ok(Expr::FunctionCall {
            name,
            builtin,
            args,
            over,
            span,
        })
    }

    fn parse_cast(&mut self) -> Result<Expr, ParseError> {
        let cast_tok = self.expect(TokenKind::KwCast)?;
        self.expect(TokenKind::LeftParen)?;
        let inner = self.parse_expr()?;
        self.expect(TokenKind::KwAs)?;
        let data_type = self.parse_data_type()?;
        let close = self.expect(TokenKind::RightParen)?;
        self.try_alias_continue(Expr::Cast {
            expr: Box::new(inner),
            data_type,
            span: cast_tok.span.merge(close.span),
        })
    }

    fn parse_data_type(&mut self) -> Result<DataType, ParseError> {
        if !self.check(TokenKind::Ident) {
            return Err(self.err_expected("data type name"));
        }
        let tok = self.advance();
        let mut span = tok.span;
        let args = if self.eat(TokenKind::LeftParen) {
            let args = self.parse_comma_sep(Self::parse_number_literal)?;
            let close = self.expect(TokenKind::RightParen)?;
            span = span.merge(close.span);
            args
        } else {
            Vec::new()
        };
        Ok(DataType {
            name: tok.text,
            args,
            span,
        })
    }

    fn parse_number_literal(&mut self) -> Result<Expr, ParseError> {
        let tok = self.expect(TokenKind::Number)?;
        Ok(Expr::NumberLiteral {
            value: tok.text,
            span: tok.span,
        })
    }

    fn parse_over_clause(&mut self) -> Result<FunctionOverClause, ParseError> {
        let over_tok = self.expect(TokenKind::KwOver)?;
        self.expect(TokenKind::LeftParen)?;
        let partition_by = if self.check(TokenKind::KwPartition) {
            self.advance();
            self.expect(TokenKind::KwBy)?;
            self.parse_comma_sep(Self::parse_expr)?
        } else {
            Vec::new()
        };
        let order_by = if self.check(TokenKind::KwOrder) {
            self.advance();
            self.expect(TokenKind::KwBy)?;
            self.parse_comma_sep(Self::parse_order_by_item)?
        } else {
            Vec::new()
        };
        let frame = if matches!(self.peek(), TokenKind::KwRows | TokenKind::KwRange) {
            Some(self.parse_window_frame()?)
        } else {
            None
        };
        let close = self.expect(TokenKind::RightParen)?;
        Ok(FunctionOverClause {
            partition_by,
            order_by,
            frame,
            span: over_tok.span.merge(close.span),
        })
    }

    fn parse_window_frame(&mut self) -> Result<WindowFrameClause, ParseError> {
        let unit_tok = self.advance();
        let unit = if unit_tok.kind == TokenKind::KwRows {
            FrameUnit::Rows
        } else {
            FrameUnit::Range
        };
        let (start, end) = if self.eat(TokenKind::KwBetween) {
            let start = self.parse_frame_bound()?;
            self.expect(TokenKind::KwAnd)?;
            let end = self.parse_frame_bound()?;
            (start, Some(end))
        } else {
            (self.parse_frame_bound()?, None)
        };
        Ok(WindowFrameClause {
            unit,
            start,
            end,
            span: unit_tok.span.merge(self.prev_span()),
        })
    }

    fn parse_frame_bound(&mut self) -> Result<FrameBound, ParseError> {
        match self.peek() {
            TokenKind::KwUnbounded => {
                self.advance();
                let dir =
                    self.expect_one_of(&[TokenKind::KwPreceding, TokenKind::KwFollowing])?;
                if dir.kind == TokenKind::KwPreceding {
                    Ok(FrameBound::UnboundedPreceding)
                } else {
                    Ok(FrameBound::UnboundedFollowing)
                }
            }
            TokenKind::KwCurrent => {
                self.advance();
                self.expect(TokenKind::KwRow)?;
                Ok(FrameBound::CurrentRow)
            }
            _ => {
                let offset = self.parse_expr()?;
                let dir =
                    self.expect_one_of(&[TokenKind::KwPreceding, TokenKind::KwFollowing])?;
                if dir.kind == TokenKind::KwPreceding {
                    Ok(FrameBound::Preceding(Box::new(offset)))
                } else {
                    Ok(FrameBound::Following(Box::new(offset)))
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::Parser;

    fn parse_one_expr(sql: &str) -> Expr {
        let mut p = Parser::from_sql(sql);
        let expr = p.parse_expr().expect("expression should parse");
        assert!(p.errors().is_empty());
        expr
    }

    #[test]
    fn test_multiplication_binds_tighter_than_addition() {
        let expr = parse_one_expr("1 + 2 * 3");
        let Expr::Binary {
            op: BinaryOp::Add,
            right,
            ..
        } = expr
        else {
            panic!("expected addition at the root, got {expr:?}");
        };
        assert!(matches!(
            *right,
            Expr::Binary {
                op: BinaryOp::Multiply,
                ..
            }
        ));
    }

    #[test]
    fn test_addition_is_left_associative() {
        let expr = parse_one_expr("1 - 2 - 3");
        let Expr::Binary {
            op: BinaryOp::Subtract,
            left,
            ..
        } = expr
        else {
            panic!("expected subtraction at the root");
        };
        assert!(matches!(
            *left,
            Expr::Binary {
                op: BinaryOp::Subtract,
                ..
            }
        ));
    }

    #[test]
    fn test_and_binds_tighter_than_or() {
        let expr = parse_one_expr("a = 1 OR b = 2 AND c = 3");
        let Expr::Binary {
            op: BinaryOp::Or,
            right,
            ..
        } = expr
        else {
            panic!("expected OR at the root");
        };
        assert!(matches!(
            *right,
            Expr::Binary {
                op: BinaryOp::And,
                ..
            }
        ));
    }

    #[test]
    fn test_comparison_binds_tighter_than_not() {
        let expr = parse_one_expr("NOT a = 1");
        let Expr::Unary {
            op: UnaryOp::Not,
            expr: inner,
            ..
        } = expr
        else {
            panic!("expected NOT at the root");
        };
        assert!(matches!(*inner, Expr::Binary { op: BinaryOp::Eq, .. }));
    }

    #[test]
    fn test_unary_minus_binds_tighter_than_multiplication() {
        let expr = parse_one_expr("-a * b");
        let Expr::Binary {
            op: BinaryOp::Multiply,
            left,
            ..
        } = expr
        else {
            panic!("expected multiplication at the root");
        };
        assert!(matches!(
            *left,
            Expr::Unary {
                op: UnaryOp::Minus,
                ..
            }
        ));
    }

    #[test]
    fn test_between_does_not_consume_trailing_and() {
        let expr = parse_one_expr("a BETWEEN 1 AND 10 AND b = 2");
        let Expr::Binary {
            op: BinaryOp::And,
            left,
            ..
        } = expr
        else {
            panic!("expected AND at the root, got {expr:?}");
        };
        assert!(matches!(*left, Expr::Between { not: false, .. }));
    }

    #[test]
    fn test_not_between() {
        let expr = parse_one_expr("a NOT BETWEEN 1 AND 10");
        assert!(matches!(expr, Expr::Between { not: true, .. }));
    }

    #[test]
    fn test_in_list_and_not_in() {
        let expr = parse_one_expr("a IN (1, 2, 3)");
        let Expr::In {
            not: false,
            set: InSet::List(items),
            ..
        } = expr
        else {
            panic!("expected IN with a value list");
        };
        assert_eq!(items.len(), 3);
        let expr = parse_one_expr("a NOT IN (1)");
        assert!(matches!(expr, Expr::In { not: true, .. }));
    }

    #[test]
    fn test_like_does_not_consume_trailing_and() {
        let expr = parse_one_expr("name LIKE 'a%' AND x = 1");
        let Expr::Binary {
            op: BinaryOp::And,
            left,
            ..
        } = expr
        else {
            panic!("expected AND at the root, got {expr:?}");
        };
        assert!(matches!(*left, Expr::Like { not: false, .. }));
    }

    #[test]
    fn test_quantified_comparison() {
        let expr = parse_one_expr("x > ALL (SELECT y FROM t)");
        assert!(matches!(
            expr,
            Expr::Quantified {
                op: BinaryOp::Gt,
                quantifier: Quantifier::All,
                ..
            }
        ));
    }

    #[test]
    fn test_quantified_comparison_rejects_value_list() {
        let mut p = Parser::from_sql("x > ALL (1, 2)");
        let err = p.parse_expr().unwrap_err();
        assert!(err.message.contains("requires a subquery"), "{}", err.message);
    }

    #[test]
    fn test_exists_subquery() {
        let expr = parse_one_expr("EXISTS (SELECT 1 FROM t)");
        assert!(matches!(expr, Expr::Exists { .. }));
    }

    #[test]
    fn test_cast_keeps_as_for_data_type() {
        let expr = parse_one_expr("CAST(price AS decimal(10, 2))");
        let Expr::Cast { data_type, .. } = expr else {
            panic!("expected a CAST");
        };
        assert_eq!(data_type.name, "decimal");
        assert_eq!(data_type.args.len(), 2);
    }

    #[test]
    fn test_alias_forms() {
        let expr = parse_one_expr("a + b AS total");
        assert!(
            matches!(&expr, Expr::Binary { right, .. }
                if matches!(&**right, Expr::Alias { as_keyword: true, .. })),
            "got {expr:?}"
        );

        let expr = parse_one_expr("price total");
        assert!(matches!(expr, Expr::Alias {
            as_keyword: false, ..
        }));
    }

    #[test]
    fn test_compound_identifier_with_star() {
        let expr = parse_one_expr("db.dbo.t.*");
        let Expr::CompoundIdentifier { parts, .. } = expr else {
            panic!("expected a compound identifier");
        };
        assert_eq!(parts.len(), 4);
        assert!(matches!(parts[3], Expr::Star { .. }));
    }

    #[test]
    fn test_compound_assignment_operator() {
        let expr = parse_one_expr("@total += price * qty");
        let Expr::Binary {
            op: BinaryOp::AddAssign,
            left,
            right,
            ..
        } = expr
        else {
            panic!("expected a compound assignment");
        };
        assert!(matches!(*left, Expr::LocalVariable { .. }));
        assert!(matches!(
            *right,
            Expr::Binary {
                op: BinaryOp::Multiply,
                ..
            }
        ));
    }

    #[test]
    fn test_window_function_with_frame() {
        let expr = parse_one_expr(
            "SUM(x) OVER (PARTITION BY dept ORDER BY hired ROWS BETWEEN 2 PRECEDING AND CURRENT ROW)",
        );
        let Expr::FunctionCall {
            builtin: true,
            over: Some(over),
            ..
        } = expr
        else {
            panic!("expected a windowed call");
        };
        assert_eq!(over.partition_by.len(), 1);
        assert_eq!(over.order_by.len(), 1);
        let frame = over.frame.unwrap();
        assert_eq!(frame.unit, FrameUnit::Rows);
        assert!(matches!(frame.start, FrameBound::Preceding(_)));
        assert_eq!(frame.end, Some(FrameBound::CurrentRow));
    }

    #[test]
    fn test_user_defined_function_call() {
        let expr = parse_one_expr("dbo_fn(a, 1)");
        let Expr::FunctionCall { builtin, args, .. } = expr else {
            panic!("expected a function call");
        };
        assert!(!builtin);
        assert_eq!(args.len(), 2);
    }

    #[test]
    fn test_parenthesized_expression_keeps_grouping() {
        let expr = parse_one_expr("(1 + 2) * 3");
        let Expr::Binary {
            op: BinaryOp::Multiply,
            left,
            ..
        } = expr
        else {
            panic!("expected multiplication at the root");
        };
        assert!(matches!(*left, Expr::ExprList { .. }));
    }

    #[test]
    fn test_expr_span_covers_operands() {
        let expr = parse_one_expr("alpha + beta * gamma");
        let span = expr.span();
        assert_eq!(span.start.column, 1);
        assert_eq!(span.end.column, 21);
    }
}

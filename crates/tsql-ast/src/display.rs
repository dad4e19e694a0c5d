//! SQL text rendering via `fmt::Display` for AST nodes.
//!
//! Every node's textual form is derivable purely from its fields; the
//! formatter collaborator builds its layout on top of these renderings.
//! Clause keywords use the casing preserved in their [`Keyword`] wrappers.

#[allow(clippy::wildcard_imports)]
use crate::*;
use std::fmt;

fn comma_list<T: fmt::Display>(f: &mut fmt::Formatter<'_>, items: &[T]) -> fmt::Result {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{item}")?;
    }
    Ok(())
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, stmt) in self.statements.iter().enumerate() {
            if i > 0 {
                f.write_str("\n")?;
            }
            write!(f, "{stmt}")?;
        }
        Ok(())
    }
}

impl fmt::Display for Statement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Select(s) => write!(f, "{s}"),
        }
    }
}

impl fmt::Display for SelectStatement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(with) = &self.with {
            write!(f, "{with} ")?;
        }
        write!(f, "{}", self.body)
    }
}

impl fmt::Display for WithClause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ", self.keyword.text)?;
        comma_list(f, &self.ctes)
    }
}

impl fmt::Display for CommonTableExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)?;
        if let Some(columns) = &self.columns {
            f.write_str(" (")?;
            comma_list(f, columns)?;
            f.write_str(")")?;
        }
        write!(f, " AS ({})", self.body)
    }
}

impl fmt::Display for SelectBody {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.keyword.text)?;
        if self.distinct == Distinctness::Distinct {
            f.write_str(" DISTINCT")?;
        }
        if let Some(top) = &self.top {
            write!(f, " {top}")?;
        }
        f.write_str(" ")?;
        comma_list(f, &self.items)?;
        if let Some(table) = &self.table {
            write!(f, " {table}")?;
        }
        if let Some(where_clause) = &self.where_clause {
            write!(f, " {where_clause}")?;
        }
        if let Some(group_by) = &self.group_by {
            write!(f, " {group_by}")?;
        }
        if let Some(having) = &self.having {
            write!(f, " {having}")?;
        }
        if let Some(order_by) = &self.order_by {
            write!(f, " {order_by}")?;
        }
        Ok(())
    }
}

impl fmt::Display for TopArg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TOP {}", self.quantity)?;
        if self.percent {
            f.write_str(" PERCENT")?;
        }
        if self.with_ties {
            f.write_str(" WITH TIES")?;
        }
        Ok(())
    }
}

impl fmt::Display for TableArg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FROM {}", self.table)?;
        for join in &self.joins {
            write!(f, " {join}")?;
        }
        Ok(())
    }
}

impl fmt::Display for Join {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match self.kind {
            JoinKind::Inner => "INNER",
            JoinKind::Left => "LEFT",
            JoinKind::Right => "RIGHT",
            JoinKind::Full => "FULL",
        };
        write!(f, "{kind}")?;
        if self.outer {
            f.write_str(" OUTER")?;
        }
        write!(f, " JOIN {} ON {}", self.table, self.predicate)
    }
}

impl fmt::Display for WhereClause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.keyword.text, self.predicate)
    }
}

impl fmt::Display for GroupByClause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ", self.keyword.text)?;
        comma_list(f, &self.exprs)
    }
}

impl fmt::Display for HavingClause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.keyword.text, self.predicate)
    }
}

impl fmt::Display for OrderByClause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ", self.keyword.text)?;
        comma_list(f, &self.items)?;
        if let Some(offset_fetch) = &self.offset_fetch {
            write!(f, " {offset_fetch}")?;
        }
        Ok(())
    }
}

impl fmt::Display for OrderByItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.expr)?;
        match self.direction {
            Some(SortDirection::Asc) => f.write_str(" ASC"),
            Some(SortDirection::Desc) => f.write_str(" DESC"),
            None => Ok(()),
        }
    }
}

impl fmt::Display for OffsetFetchClause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "OFFSET {} ROWS", self.offset)?;
        if let Some(fetch) = &self.fetch {
            write!(f, " {fetch}")?;
        }
        Ok(())
    }
}

impl fmt::Display for FetchArg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let which = if self.next { "NEXT" } else { "FIRST" };
        write!(f, "FETCH {which} {} ROWS ONLY", self.quantity)
    }
}

impl fmt::Display for FunctionOverClause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("OVER (")?;
        let mut need_space = false;
        if !self.partition_by.is_empty() {
            f.write_str("PARTITION BY ")?;
            comma_list(f, &self.partition_by)?;
            need_space = true;
        }
        if !self.order_by.is_empty() {
            if need_space {
                f.write_str(" ")?;
            }
            f.write_str("ORDER BY ")?;
            comma_list(f, &self.order_by)?;
            need_space = true;
        }
        if let Some(frame) = &self.frame {
            if need_space {
                f.write_str(" ")?;
            }
            write!(f, "{frame}")?;
        }
        f.write_str(")")
    }
}

impl fmt::Display for WindowFrameClause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let unit = match self.unit {
            FrameUnit::Rows => "ROWS",
            FrameUnit::Range => "RANGE",
        };
        match &self.end {
            Some(end) => write!(f, "{unit} BETWEEN {} AND {end}", self.start),
            None => write!(f, "{unit} {}", self.start),
        }
    }
}

impl fmt::Display for FrameBound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnboundedPreceding => f.write_str("UNBOUNDED PRECEDING"),
            Self::UnboundedFollowing => f.write_str("UNBOUNDED FOLLOWING"),
            Self::CurrentRow => f.write_str("CURRENT ROW"),
            Self::Preceding(expr) => write!(f, "{expr} PRECEDING"),
            Self::Following(expr) => write!(f, "{expr} FOLLOWING"),
        }
    }
}

impl fmt::Display for UnaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Plus => "+",
            Self::Minus => "-",
            Self::BitNot => "~",
            Self::Not => "NOT",
        })
    }
}

impl fmt::Display for BinaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Add => "+",
            Self::Subtract => "-",
            Self::Multiply => "*",
            Self::Divide => "/",
            Self::Modulo => "%",
            Self::Eq => "=",
            Self::Ne => "!=",
            Self::Lt => "<",
            Self::Le => "<=",
            Self::Gt => ">",
            Self::Ge => ">=",
            Self::And => "AND",
            Self::Or => "OR",
            Self::AddAssign => "+=",
            Self::SubAssign => "-=",
            Self::MulAssign => "*=",
            Self::DivAssign => "/=",
            Self::ModAssign => "%=",
        })
    }
}

impl fmt::Display for Quantifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::All => "ALL",
            Self::Any => "ANY",
            Self::Some => "SOME",
        })
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)?;
        if !self.args.is_empty() {
            f.write_str("(")?;
            comma_list(f, &self.args)?;
            f.write_str(")")?;
        }
        Ok(())
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NumberLiteral { value, .. } | Self::Identifier { name: value, .. } => {
                f.write_str(value)
            }
            Self::StringLiteral { value, .. } => {
                write!(f, "'{}'", value.replace('\'', "''"))
            }
            Self::LocalVariable { name, .. } => write!(f, "@{name}"),
            Self::QuotedIdentifier { name, .. } => write!(f, "[{name}]"),
            Self::Star { .. } => f.write_str("*"),
            Self::CompoundIdentifier { parts, .. } => {
                for (i, part) in parts.iter().enumerate() {
                    if i > 0 {
                        f.write_str(".")?;
                    }
                    write!(f, "{part}")?;
                }
                Ok(())
            }
            Self::Alias {
                expr,
                alias,
                as_keyword,
                ..
            } => {
                if *as_keyword {
                    write!(f, "{expr} AS {alias}")
                } else {
                    write!(f, "{expr} {alias}")
                }
            }
            Self::ExprList { items, .. } => {
                f.write_str("(")?;
                comma_list(f, items)?;
                f.write_str(")")
            }
            Self::Unary { op, expr, .. } => match op {
                UnaryOp::Not => write!(f, "NOT {expr}"),
                _ => write!(f, "{op}{expr}"),
            },
            Self::Binary {
                left, op, right, ..
            } => write!(f, "{left} {op} {right}"),
            Self::Between {
                expr,
                not,
                low,
                high,
                ..
            } => {
                let not = if *not { "NOT " } else { "" };
                write!(f, "{expr} {not}BETWEEN {low} AND {high}")
            }
            Self::In { expr, not, set, .. } => {
                let not = if *not { "NOT " } else { "" };
                match set {
                    InSet::List(items) => {
                        write!(f, "{expr} {not}IN (")?;
                        comma_list(f, items)?;
                        f.write_str(")")
                    }
                    InSet::Subquery(body) => write!(f, "{expr} {not}IN ({body})"),
                }
            }
            Self::Like {
                expr, not, pattern, ..
            } => {
                let not = if *not { "NOT " } else { "" };
                write!(f, "{expr} {not}LIKE {pattern}")
            }
            Self::Exists { subquery, .. } => write!(f, "EXISTS ({subquery})"),
            Self::Quantified {
                expr,
                op,
                quantifier,
                subquery,
                ..
            } => write!(f, "{expr} {op} {quantifier} ({subquery})"),
            Self::FunctionCall {
                name, args, over, ..
            } => {
                write!(f, "{name}(")?;
                comma_list(f, args)?;
                f.write_str(")")?;
                if let Some(over) = over {
                    write!(f, " {over}")?;
                }
                Ok(())
            }
            Self::Cast {
                expr, data_type, ..
            } => write!(f, "CAST({expr} AS {data_type})"),
            Self::Subquery { body, .. } => write!(f, "({body})"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ident(name: &str) -> Expr {
        Expr::Identifier {
            name: name.to_owned(),
            span: Span::ZERO,
        }
    }

    #[test]
    fn test_display_string_literal_reescapes_quotes() {
        let e = Expr::StringLiteral {
            value: "it's".to_owned(),
            span: Span::ZERO,
        };
        assert_eq!(e.to_string(), "'it''s'");
    }

    #[test]
    fn test_display_compound_identifier() {
        let e = Expr::CompoundIdentifier {
            parts: vec![ident("dbo"), ident("users"), Expr::Star { span: Span::ZERO }],
            span: Span::ZERO,
        };
        assert_eq!(e.to_string(), "dbo.users.*");
    }

    #[test]
    fn test_display_between() {
        let e = Expr::Between {
            expr: Box::new(ident("a")),
            not: true,
            low: Box::new(Expr::NumberLiteral {
                value: "1".to_owned(),
                span: Span::ZERO,
            }),
            high: Box::new(Expr::NumberLiteral {
                value: "5".to_owned(),
                span: Span::ZERO,
            }),
            span: Span::ZERO,
        };
        assert_eq!(e.to_string(), "a NOT BETWEEN 1 AND 5");
    }

    #[test]
    fn test_display_empty_query_is_empty_string() {
        assert_eq!(Query::empty().to_string(), "");
    }

    #[test]
    fn test_display_frame_bounds() {
        let frame = WindowFrameClause {
            unit: FrameUnit::Rows,
            start: FrameBound::UnboundedPreceding,
            end: Some(FrameBound::CurrentRow),
            span: Span::ZERO,
        };
        assert_eq!(frame.to_string(), "ROWS BETWEEN UNBOUNDED PRECEDING AND CURRENT ROW");
    }
}

//! Syntax tree node types for the T-SQL front-end.
//!
//! This crate defines the position/span model, the side-band comment type,
//! and every AST node produced by `tsql-parser`. All nodes carry a [`Span`]
//! so the formatter and the language server can point back to the exact
//! source location. The tree is plain owned data: no back-pointers, no
//! interior mutability, and a parse builds it once and never mutates it.

mod display;
pub mod walk;

use std::fmt;

// ---------------------------------------------------------------------------
// Position and Span — source location tracking
// ---------------------------------------------------------------------------

/// A line/column position in the source text. Both are 1-based.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Position {
    /// Line number, starting at 1.
    pub line: u32,
    /// Column number, starting at 1.
    pub column: u32,
}

impl Position {
    /// Create a position from 1-based line and column.
    #[must_use]
    pub const fn new(line: u32, column: u32) -> Self {
        Self { line, column }
    }
}

impl fmt::Debug for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// A half-open range over the source text, from `start` (inclusive) to
/// `end` (exclusive).
///
/// Every token and every AST node carries a `Span`. A node's span always
/// contains the spans of its children.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Span {
    /// Position of the first character (inclusive).
    pub start: Position,
    /// Position one past the last character (exclusive).
    pub end: Position,
}

impl Span {
    /// Create a new span.
    #[must_use]
    pub const fn new(start: Position, end: Position) -> Self {
        Self { start, end }
    }

    /// A zero span, used as the placeholder for an empty query.
    pub const ZERO: Self = Self {
        start: Position { line: 0, column: 0 },
        end: Position { line: 0, column: 0 },
    };

    /// Merge two spans into one that covers both.
    #[must_use]
    pub fn merge(self, other: Self) -> Self {
        Self {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }

    /// Whether `other` lies entirely within this span.
    #[must_use]
    pub fn contains(self, other: Self) -> bool {
        self.start <= other.start && other.end <= self.end
    }

    /// Whether the span starts and ends on the same line.
    #[must_use]
    pub const fn is_single_line(self) -> bool {
        self.start.line == self.end.line
    }
}

impl fmt::Debug for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}..{:?}", self.start, self.end)
    }
}

// ---------------------------------------------------------------------------
// Comments
// ---------------------------------------------------------------------------

/// A `--` comment collected side-band during lexing.
///
/// Comments never enter the grammar; the parser siphons them into a flat
/// list and the comment mapper associates each with the nearest node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comment {
    /// The comment text, including the leading dashes.
    pub text: String,
    /// Where the comment appears in the source.
    pub span: Span,
}

// ---------------------------------------------------------------------------
// Keywords
// ---------------------------------------------------------------------------

/// Semantic keyword identity, independent of source casing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeywordKind {
    Select,
    With,
    Where,
    GroupBy,
    Having,
    OrderBy,
}

/// A keyword as written, pairing its [`KeywordKind`] with the exact source
/// text and span so the formatter can round-trip casing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Keyword {
    pub kind: KeywordKind,
    /// The keyword as spelled in the source (e.g. `select`, `SELECT`).
    pub text: String,
    pub span: Span,
}

// ---------------------------------------------------------------------------
// Query and statements
// ---------------------------------------------------------------------------

/// A parsed document: an ordered sequence of statements.
///
/// The query may hold fewer statements than the source wrote when some
/// failed to parse; the error list travels alongside, not inside the tree.
#[derive(Debug, Clone, PartialEq)]
pub struct Query {
    pub statements: Vec<Statement>,
    /// Covers first token to last token of the document, or [`Span::ZERO`]
    /// when nothing parsed.
    pub span: Span,
}

impl Query {
    /// An empty query with a zero span.
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            statements: Vec::new(),
            span: Span::ZERO,
        }
    }
}

/// A single statement.
#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    Select(SelectStatement),
}

impl Statement {
    /// The span of this statement.
    #[must_use]
    pub fn span(&self) -> Span {
        match self {
            Self::Select(s) => s.span,
        }
    }
}

/// A SELECT statement: optional WITH + CTE list, then one body.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectStatement {
    pub with: Option<WithClause>,
    pub body: SelectBody,
    pub span: Span,
}

/// The WITH clause introducing common table expressions.
#[derive(Debug, Clone, PartialEq)]
pub struct WithClause {
    pub keyword: Keyword,
    pub ctes: Vec<CommonTableExpression>,
    pub span: Span,
}

/// One common table expression: `name [(columns)] AS ( body )`.
#[derive(Debug, Clone, PartialEq)]
pub struct CommonTableExpression {
    /// The CTE name (an identifier or quoted identifier).
    pub name: Expr,
    /// Optional explicit column list.
    pub columns: Option<Vec<Expr>>,
    pub body: SelectBody,
    pub span: Span,
}

// ---------------------------------------------------------------------------
// SELECT body and clauses
// ---------------------------------------------------------------------------

/// DISTINCT / ALL modifier on a SELECT.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Distinctness {
    #[default]
    All,
    Distinct,
}

/// The clause sequence of one SELECT.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectBody {
    /// The SELECT keyword itself, casing preserved.
    pub keyword: Keyword,
    pub distinct: Distinctness,
    pub top: Option<TopArg>,
    /// The projected items, each optionally wrapped in [`Expr::Alias`].
    pub items: Vec<Expr>,
    pub table: Option<TableArg>,
    pub where_clause: Option<WhereClause>,
    pub group_by: Option<GroupByClause>,
    pub having: Option<HavingClause>,
    pub order_by: Option<OrderByClause>,
    pub span: Span,
}

/// `TOP n [PERCENT] [WITH TIES]`.
#[derive(Debug, Clone, PartialEq)]
pub struct TopArg {
    pub quantity: Box<Expr>,
    pub percent: bool,
    pub with_ties: bool,
    pub span: Span,
}

/// The FROM clause: one table source plus zero or more joins.
#[derive(Debug, Clone, PartialEq)]
pub struct TableArg {
    pub table: Box<Expr>,
    pub joins: Vec<Join>,
    pub span: Span,
}

/// The kind of a join.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JoinKind {
    Inner,
    Left,
    Right,
    Full,
}

/// `[INNER|LEFT|RIGHT|FULL [OUTER]] JOIN table ON predicate`.
#[derive(Debug, Clone, PartialEq)]
pub struct Join {
    pub kind: JoinKind,
    /// Whether the OUTER keyword was written.
    pub outer: bool,
    pub table: Expr,
    pub predicate: Expr,
    pub span: Span,
}

/// `WHERE predicate`.
#[derive(Debug, Clone, PartialEq)]
pub struct WhereClause {
    pub keyword: Keyword,
    pub predicate: Expr,
    pub span: Span,
}

/// `GROUP BY expr, ...`.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupByClause {
    pub keyword: Keyword,
    pub exprs: Vec<Expr>,
    pub span: Span,
}

/// `HAVING predicate`.
#[derive(Debug, Clone, PartialEq)]
pub struct HavingClause {
    pub keyword: Keyword,
    pub predicate: Expr,
    pub span: Span,
}

/// `ORDER BY item, ... [OFFSET ...]`.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderByClause {
    pub keyword: Keyword,
    pub items: Vec<OrderByItem>,
    pub offset_fetch: Option<OffsetFetchClause>,
    pub span: Span,
}

/// Sort direction on an ORDER BY item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SortDirection {
    Asc,
    Desc,
}

/// One `expr [ASC|DESC]` ordering term.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderByItem {
    pub expr: Expr,
    pub direction: Option<SortDirection>,
    pub span: Span,
}

/// `OFFSET n ROW[S] [FETCH FIRST|NEXT n ROW[S] ONLY]`.
#[derive(Debug, Clone, PartialEq)]
pub struct OffsetFetchClause {
    pub offset: Expr,
    pub fetch: Option<FetchArg>,
    pub span: Span,
}

/// The FETCH half of an offset-fetch clause.
#[derive(Debug, Clone, PartialEq)]
pub struct FetchArg {
    /// True for `FETCH NEXT`, false for `FETCH FIRST`.
    pub next: bool,
    pub quantity: Expr,
    pub span: Span,
}

// ---------------------------------------------------------------------------
// Window (OVER) clauses
// ---------------------------------------------------------------------------

/// `OVER ([PARTITION BY ...] [ORDER BY ...] [ROWS|RANGE frame])`.
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionOverClause {
    pub partition_by: Vec<Expr>,
    pub order_by: Vec<OrderByItem>,
    pub frame: Option<WindowFrameClause>,
    pub span: Span,
}

/// The frame unit of a window frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FrameUnit {
    Rows,
    Range,
}

/// A window frame: `ROWS|RANGE bound` or `ROWS|RANGE BETWEEN bound AND bound`.
#[derive(Debug, Clone, PartialEq)]
pub struct WindowFrameClause {
    pub unit: FrameUnit,
    pub start: FrameBound,
    pub end: Option<FrameBound>,
    pub span: Span,
}

/// One boundary of a window frame.
#[derive(Debug, Clone, PartialEq)]
pub enum FrameBound {
    UnboundedPreceding,
    UnboundedFollowing,
    CurrentRow,
    Preceding(Box<Expr>),
    Following(Box<Expr>),
}

// ---------------------------------------------------------------------------
// Expressions
// ---------------------------------------------------------------------------

/// Unary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnaryOp {
    Plus,
    Minus,
    BitNot,
    Not,
}

/// Binary operators, including the compound assignment forms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryOp {
    // Arithmetic
    Add,
    Subtract,
    Multiply,
    Divide,
    Modulo,

    // Comparison
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,

    // Logical
    And,
    Or,

    // Compound assignment
    AddAssign,
    SubAssign,
    MulAssign,
    DivAssign,
    ModAssign,
}

/// The quantifier of a quantified comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Quantifier {
    All,
    Any,
    Some,
}

/// The right-hand side of an IN expression.
#[derive(Debug, Clone, PartialEq)]
pub enum InSet {
    /// `IN (expr, expr, ...)`.
    List(Vec<Expr>),
    /// `IN (SELECT ...)`.
    Subquery(Box<SelectBody>),
}

/// A CAST target type, e.g. `INT` or `DECIMAL(10, 2)`.
#[derive(Debug, Clone, PartialEq)]
pub struct DataType {
    /// Type name as written.
    pub name: String,
    /// Optional size/precision arguments.
    pub args: Vec<Expr>,
    pub span: Span,
}

/// An expression node. Every variant carries a [`Span`]; there is no shared
/// base type, and [`Expr::span`] dispatches with an exhaustive match.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// A numeric literal, text preserved as written.
    NumberLiteral { value: String, span: Span },

    /// A single-quoted string literal, escapes resolved.
    StringLiteral { value: String, span: Span },

    /// `@name`. The name excludes the `@`.
    LocalVariable { name: String, span: Span },

    /// A bare identifier.
    Identifier { name: String, span: Span },

    /// A `[bracketed]` identifier, brackets stripped.
    QuotedIdentifier { name: String, span: Span },

    /// The `*` projection.
    Star { span: Span },

    /// A dotted identifier chain like `dbo.users.name` or `t.*`. Parts are
    /// identifier, quoted-identifier, or star nodes.
    CompoundIdentifier { parts: Vec<Expr>, span: Span },

    /// `expr [AS] alias` where the alias is an identifier, quoted
    /// identifier, or string literal.
    Alias {
        expr: Box<Expr>,
        alias: Box<Expr>,
        /// Whether the AS keyword was written.
        as_keyword: bool,
        span: Span,
    },

    /// A parenthesized list `(a, b, c)`, as used by `IN (...)`.
    ExprList { items: Vec<Expr>, span: Span },

    /// A unary operation.
    Unary {
        op: UnaryOp,
        expr: Box<Expr>,
        span: Span,
    },

    /// A binary operation.
    Binary {
        left: Box<Expr>,
        op: BinaryOp,
        right: Box<Expr>,
        span: Span,
    },

    /// `expr [NOT] BETWEEN low AND high`.
    Between {
        expr: Box<Expr>,
        not: bool,
        low: Box<Expr>,
        high: Box<Expr>,
        span: Span,
    },

    /// `expr [NOT] IN (list | subquery)`.
    In {
        expr: Box<Expr>,
        not: bool,
        set: InSet,
        span: Span,
    },

    /// `expr [NOT] LIKE pattern`.
    Like {
        expr: Box<Expr>,
        not: bool,
        pattern: Box<Expr>,
        span: Span,
    },

    /// `EXISTS (subquery)`.
    Exists {
        subquery: Box<SelectBody>,
        span: Span,
    },

    /// A quantified comparison: `expr op ALL|ANY|SOME (subquery)`.
    Quantified {
        expr: Box<Expr>,
        op: BinaryOp,
        quantifier: Quantifier,
        subquery: Box<SelectBody>,
        span: Span,
    },

    /// A function call, built-in or user-defined, with an optional window.
    FunctionCall {
        /// The function name as written.
        name: String,
        /// Whether the name matched a built-in function token.
        builtin: bool,
        args: Vec<Expr>,
        over: Option<FunctionOverClause>,
        span: Span,
    },

    /// `CAST(expr AS type)`.
    Cast {
        expr: Box<Expr>,
        data_type: DataType,
        span: Span,
    },

    /// A parenthesized subquery `(SELECT ...)`.
    Subquery { body: Box<SelectBody>, span: Span },
}

impl Expr {
    /// The span of this expression node.
    #[must_use]
    pub fn span(&self) -> Span {
        match self {
            Self::NumberLiteral { span, .. }
            | Self::StringLiteral { span, .. }
            | Self::LocalVariable { span, .. }
            | Self::Identifier { span, .. }
            | Self::QuotedIdentifier { span, .. }
            | Self::Star { span }
            | Self::CompoundIdentifier { span, .. }
            | Self::Alias { span, .. }
            | Self::ExprList { span, .. }
            | Self::Unary { span, .. }
            | Self::Binary { span, .. }
            | Self::Between { span, .. }
            | Self::In { span, .. }
            | Self::Like { span, .. }
            | Self::Exists { span, .. }
            | Self::Quantified { span, .. }
            | Self::FunctionCall { span, .. }
            | Self::Cast { span, .. }
            | Self::Subquery { span, .. } => *span,
        }
    }

    /// Strip an alias wrapper, if any, yielding the underlying expression.
    #[must_use]
    pub fn unaliased(&self) -> &Self {
        match self {
            Self::Alias { expr, .. } => expr,
            other => other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_span_merge_covers_both() {
        let a = Span::new(Position::new(1, 1), Position::new(1, 7));
        let b = Span::new(Position::new(2, 3), Position::new(3, 9));
        let m = a.merge(b);
        assert_eq!(m.start, Position::new(1, 1));
        assert_eq!(m.end, Position::new(3, 9));
        assert!(m.contains(a));
        assert!(m.contains(b));
    }

    #[test]
    fn test_span_contains_is_inclusive_of_bounds() {
        let outer = Span::new(Position::new(1, 1), Position::new(5, 1));
        assert!(outer.contains(outer));
        let inner = Span::new(Position::new(1, 1), Position::new(2, 4));
        assert!(outer.contains(inner));
        let crossing = Span::new(Position::new(4, 1), Position::new(6, 1));
        assert!(!outer.contains(crossing));
    }

    #[test]
    fn test_single_line_span() {
        assert!(Span::new(Position::new(2, 1), Position::new(2, 10)).is_single_line());
        assert!(!Span::new(Position::new(2, 1), Position::new(3, 1)).is_single_line());
    }

    #[test]
    fn test_position_ordering_is_line_major() {
        assert!(Position::new(1, 99) < Position::new(2, 1));
        assert!(Position::new(3, 4) < Position::new(3, 5));
    }

    #[test]
    fn test_empty_query_has_zero_span() {
        let q = Query::empty();
        assert!(q.statements.is_empty());
        assert_eq!(q.span, Span::ZERO);
    }
}

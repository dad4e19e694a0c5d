//! Token types and the keyword / built-in function tables.
//!
//! Every token carries a discriminant, the exact source text, and a
//! line/column [`Span`]. Keywords and built-in function names are their own
//! variants so the parser matches them in O(1); the tables here are the
//! single source shared by the lexer and the parser's diagnostics.

use tsql_ast::Span;

/// A single token produced by the lexer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    /// The token discriminant.
    pub kind: TokenKind,
    /// The exact source slice this token covers.
    pub text: String,
    /// Line/column span, half-open.
    pub span: Span,
}

/// Token discriminant.
///
/// Organized by category: special, literals, identifiers, punctuation and
/// operators, reserved keywords, and built-in function names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    // === Special ===
    /// End of input.
    Eof,
    /// An unrecognized character; the text carries the offender. The lexer
    /// never fails — reporting is the parser's job.
    SyntaxError,
    /// A `--` line comment; siphoned side-band, never fed to the grammar.
    Comment,

    // === Literals and identifiers ===
    /// Numeric literal (digits, optional fraction).
    Number,
    /// Single-quoted string literal.
    SqlString,
    /// `@name` local variable.
    LocalVariable,
    /// Bare identifier that matched no keyword.
    Ident,
    /// `[bracketed]` identifier.
    QuotedIdent,

    // === Punctuation ===
    Comma,
    Dot,
    Semicolon,
    LeftParen,
    RightParen,

    // === Operators ===
    Plus,
    Minus,
    Star,
    Slash,
    Percent,
    Tilde,
    Eq,        // `=`
    EqEq,      // `==`
    Ne,        // `!=`
    LtGt,      // `<>`
    Lt,
    Le,
    Gt,
    Ge,
    PlusEq,    // `+=`
    MinusEq,   // `-=`
    StarEq,    // `*=`
    SlashEq,   // `/=`
    PercentEq, // `%=`

    // === Keywords ===
    KwAll,
    KwAnd,
    KwAny,
    KwAs,
    KwAsc,
    KwBetween,
    KwBy,
    KwCast,
    KwCurrent,
    KwDelete,
    KwDesc,
    KwDistinct,
    KwExists,
    KwFetch,
    KwFirst,
    KwFollowing,
    KwFrom,
    KwFull,
    KwGroup,
    KwHaving,
    KwIn,
    KwInner,
    KwInsert,
    KwJoin,
    KwLeft,
    KwLike,
    KwNext,
    KwNot,
    KwOffset,
    KwOn,
    KwOnly,
    KwOr,
    KwOrder,
    KwOuter,
    KwOver,
    KwPartition,
    KwPercent,
    KwPreceding,
    KwRange,
    KwRight,
    KwRow,
    KwRows,
    KwSelect,
    KwSome,
    KwTies,
    KwTop,
    KwUnbounded,
    KwUpdate,
    KwWhere,
    KwWith,

    // === Built-in function names ===
    FnAbs,
    FnAvg,
    FnCharindex,
    FnCoalesce,
    FnCount,
    FnDateadd,
    FnDatediff,
    FnDatepart,
    FnDenseRank,
    FnGetdate,
    FnIsnull,
    FnLag,
    FnLead,
    FnLen,
    FnLower,
    FnLtrim,
    FnMax,
    FnMin,
    FnNtile,
    FnNullif,
    FnRank,
    FnReplace,
    FnRowNumber,
    FnRtrim,
    FnSubstring,
    FnSum,
    FnUpper,
}

impl TokenKind {
    /// Look up a bare word (case-insensitively) against the keyword and
    /// built-in function tables. Unmatched words are identifiers.
    #[must_use]
    pub fn lookup_word(word: &str) -> Self {
        match word.to_ascii_lowercase().as_str() {
            "all" => Self::KwAll,
            "and" => Self::KwAnd,
            "any" => Self::KwAny,
            "as" => Self::KwAs,
            "asc" => Self::KwAsc,
            "between" => Self::KwBetween,
            "by" => Self::KwBy,
            "cast" => Self::KwCast,
            "current" => Self::KwCurrent,
            "delete" => Self::KwDelete,
            "desc" => Self::KwDesc,
            "distinct" => Self::KwDistinct,
            "exists" => Self::KwExists,
            "fetch" => Self::KwFetch,
            "first" => Self::KwFirst,
            "following" => Self::KwFollowing,
            "from" => Self::KwFrom,
            "full" => Self::KwFull,
            "group" => Self::KwGroup,
            "having" => Self::KwHaving,
            "in" => Self::KwIn,
            "inner" => Self::KwInner,
            "insert" => Self::KwInsert,
            "join" => Self::KwJoin,
            "left" => Self::KwLeft,
            "like" => Self::KwLike,
            "next" => Self::KwNext,
            "not" => Self::KwNot,
            "offset" => Self::KwOffset,
            "on" => Self::KwOn,
            "only" => Self::KwOnly,
            "or" => Self::KwOr,
            "order" => Self::KwOrder,
            "outer" => Self::KwOuter,
            "over" => Self::KwOver,
            "partition" => Self::KwPartition,
            "percent" => Self::KwPercent,
            "preceding" => Self::KwPreceding,
            "range" => Self::KwRange,
            "right" => Self::KwRight,
            "row" => Self::KwRow,
            "rows" => Self::KwRows,
            "select" => Self::KwSelect,
            "some" => Self::KwSome,
            "ties" => Self::KwTies,
            "top" => Self::KwTop,
            "unbounded" => Self::KwUnbounded,
            "update" => Self::KwUpdate,
            "where" => Self::KwWhere,
            "with" => Self::KwWith,

            "abs" => Self::FnAbs,
            "avg" => Self::FnAvg,
            "charindex" => Self::FnCharindex,
            "coalesce" => Self::FnCoalesce,
            "count" => Self::FnCount,
            "dateadd" => Self::FnDateadd,
            "datediff" => Self::FnDatediff,
            "datepart" => Self::FnDatepart,
            "dense_rank" => Self::FnDenseRank,
            "getdate" => Self::FnGetdate,
            "isnull" => Self::FnIsnull,
            "lag" => Self::FnLag,
            "lead" => Self::FnLead,
            "len" => Self::FnLen,
            "lower" => Self::FnLower,
            "ltrim" => Self::FnLtrim,
            "max" => Self::FnMax,
            "min" => Self::FnMin,
            "ntile" => Self::FnNtile,
            "nullif" => Self::FnNullif,
            "rank" => Self::FnRank,
            "replace" => Self::FnReplace,
            "row_number" => Self::FnRowNumber,
            "rtrim" => Self::FnRtrim,
            "substring" => Self::FnSubstring,
            "sum" => Self::FnSum,
            "upper" => Self::FnUpper,

            _ => Self::Ident,
        }
    }

    /// Whether this kind is a built-in function name. The parser uses this
    /// to decide when an identifier-like token starts a function call.
    #[must_use]
    pub const fn is_builtin_function(self) -> bool {
        matches!(
            self,
            Self::FnAbs
                | Self::FnAvg
                | Self::FnCharindex
                | Self::FnCoalesce
                | Self::FnCount
                | Self::FnDateadd
                | Self::FnDatediff
                | Self::FnDatepart
                | Self::FnDenseRank
                | Self::FnGetdate
                | Self::FnIsnull
                | Self::FnLag
                | Self::FnLead
                | Self::FnLen
                | Self::FnLower
                | Self::FnLtrim
                | Self::FnMax
                | Self::FnMin
                | Self::FnNtile
                | Self::FnNullif
                | Self::FnRank
                | Self::FnReplace
                | Self::FnRowNumber
                | Self::FnRtrim
                | Self::FnSubstring
                | Self::FnSum
                | Self::FnUpper
        )
    }

    /// Whether this keyword can begin a statement. Used both for dispatch
    /// and as an error-recovery sync point.
    #[must_use]
    pub const fn is_statement_start(self) -> bool {
        matches!(
            self,
            Self::KwSelect | Self::KwWith | Self::KwInsert | Self::KwUpdate | Self::KwDelete
        )
    }

    /// A short human-readable label for diagnostics.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Eof => "end of input",
            Self::SyntaxError => "invalid character",
            Self::Comment => "comment",
            Self::Number => "number",
            Self::SqlString => "string",
            Self::LocalVariable => "local variable",
            Self::Ident => "identifier",
            Self::QuotedIdent => "quoted identifier",
            Self::Comma => ",",
            Self::Dot => ".",
            Self::Semicolon => ";",
            Self::LeftParen => "(",
            Self::RightParen => ")",
            Self::Plus => "+",
            Self::Minus => "-",
            Self::Star => "*",
            Self::Slash => "/",
            Self::Percent => "%",
            Self::Tilde => "~",
            Self::Eq => "=",
            Self::EqEq => "==",
            Self::Ne => "!=",
            Self::LtGt => "<>",
            Self::Lt => "<",
            Self::Le => "<=",
            Self::Gt => ">",
            Self::Ge => ">=",
            Self::PlusEq => "+=",
            Self::MinusEq => "-=",
            Self::StarEq => "*=",
            Self::SlashEq => "/=",
            Self::PercentEq => "%=",
            Self::KwAll => "ALL",
            Self::KwAnd => "AND",
            Self::KwAny => "ANY",
            Self::KwAs => "AS",
            Self::KwAsc => "ASC",
            Self::KwBetween => "BETWEEN",
            Self::KwBy => "BY",
            Self::KwCast => "CAST",
            Self::KwCurrent => "CURRENT",
            Self::KwDelete => "DELETE",
            Self::KwDesc => "DESC",
            Self::KwDistinct => "DISTINCT",
            Self::KwExists => "EXISTS",
            Self::KwFetch => "FETCH",
            Self::KwFirst => "FIRST",
            Self::KwFollowing => "FOLLOWING",
            Self::KwFrom => "FROM",
            Self::KwFull => "FULL",
            Self::KwGroup => "GROUP",
            Self::KwHaving => "HAVING",
            Self::KwIn => "IN",
            Self::KwInner => "INNER",
            Self::KwInsert => "INSERT",
            Self::KwJoin => "JOIN",
            Self::KwLeft => "LEFT",
            Self::KwLike => "LIKE",
            Self::KwNext => "NEXT",
            Self::KwNot => "NOT",
            Self::KwOffset => "OFFSET",
            Self::KwOn => "ON",
            Self::KwOnly => "ONLY",
            Self::KwOr => "OR",
            Self::KwOrder => "ORDER",
            Self::KwOuter => "OUTER",
            Self::KwOver => "OVER",
            Self::KwPartition => "PARTITION",
            Self::KwPercent => "PERCENT",
            Self::KwPreceding => "PRECEDING",
            Self::KwRange => "RANGE",
            Self::KwRight => "RIGHT",
            Self::KwRow => "ROW",
            Self::KwRows => "ROWS",
            Self::KwSelect => "SELECT",
            Self::KwSome => "SOME",
            Self::KwTies => "TIES",
            Self::KwTop => "TOP",
            Self::KwUnbounded => "UNBOUNDED",
            Self::KwUpdate => "UPDATE",
            Self::KwWhere => "WHERE",
            Self::KwWith => "WITH",
            Self::FnAbs => "ABS",
            Self::FnAvg => "AVG",
            Self::FnCharindex => "CHARINDEX",
            Self::FnCoalesce => "COALESCE",
            Self::FnCount => "COUNT",
            Self::FnDateadd => "DATEADD",
            Self::FnDatediff => "DATEDIFF",
            Self::FnDatepart => "DATEPART",
            Self::FnDenseRank => "DENSE_RANK",
            Self::FnGetdate => "GETDATE",
            Self::FnIsnull => "ISNULL",
            Self::FnLag => "LAG",
            Self::FnLead => "LEAD",
            Self::FnLen => "LEN",
            Self::FnLower => "LOWER",
            Self::FnLtrim => "LTRIM",
            Self::FnMax => "MAX",
            Self::FnMin => "MIN",
            Self::FnNtile => "NTILE",
            Self::FnNullif => "NULLIF",
            Self::FnRank => "RANK",
            Self::FnReplace => "REPLACE",
            Self::FnRowNumber => "ROW_NUMBER",
            Self::FnRtrim => "RTRIM",
            Self::FnSubstring => "SUBSTRING",
            Self::FnSum => "SUM",
            Self::FnUpper => "UPPER",
        }
    }
}

/// Whether a bare word names a T-SQL data type. Data types are not reserved
/// words; the parser consults this to keep `CAST(x AS int)` from reading
/// `int` as an alias, and to accept it as a CAST target.
#[must_use]
pub fn is_data_type_name(word: &str) -> bool {
    matches!(
        word.to_ascii_lowercase().as_str(),
        "bigint"
            | "binary"
            | "bit"
            | "char"
            | "date"
            | "datetime"
            | "datetime2"
            | "datetimeoffset"
            | "decimal"
            | "float"
            | "image"
            | "int"
            | "money"
            | "nchar"
            | "ntext"
            | "numeric"
            | "nvarchar"
            | "real"
            | "smalldatetime"
            | "smallint"
            | "smallmoney"
            | "text"
            | "time"
            | "tinyint"
            | "uniqueidentifier"
            | "varbinary"
            | "varchar"
            | "xml"
    )
}

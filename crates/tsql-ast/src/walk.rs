//! Generic depth-first traversal over the syntax tree.
//!
//! A [`Visitor`] receives [`Visitor::visit`] when a node is entered (return
//! `false` to skip its children) and [`Visitor::leave`] once the node has no
//! more children, so per-node state can be popped. [`Node`] is a closed enum
//! and every dispatch below is an exhaustive match; adding a node kind
//! without updating the traversal fails to compile.

use crate::{
    CommonTableExpression, Expr, FetchArg, FrameBound, FunctionOverClause, GroupByClause,
    HavingClause, InSet, Join, OffsetFetchClause, OrderByClause, OrderByItem, Query, SelectBody,
    SelectStatement, Span, Statement, TableArg, TopArg, WhereClause, WindowFrameClause, WithClause,
};

/// A borrowed reference to any concrete node in the tree.
#[derive(Debug, Clone, Copy)]
pub enum Node<'a> {
    Query(&'a Query),
    Statement(&'a Statement),
    SelectStatement(&'a SelectStatement),
    WithClause(&'a WithClause),
    CommonTableExpression(&'a CommonTableExpression),
    SelectBody(&'a SelectBody),
    TopArg(&'a TopArg),
    TableArg(&'a TableArg),
    Join(&'a Join),
    WhereClause(&'a WhereClause),
    GroupByClause(&'a GroupByClause),
    HavingClause(&'a HavingClause),
    OrderByClause(&'a OrderByClause),
    OrderByItem(&'a OrderByItem),
    OffsetFetchClause(&'a OffsetFetchClause),
    FetchArg(&'a FetchArg),
    FunctionOverClause(&'a FunctionOverClause),
    WindowFrameClause(&'a WindowFrameClause),
    Expr(&'a Expr),
}

impl Node<'_> {
    /// The span of the referenced node.
    #[must_use]
    pub fn span(&self) -> Span {
        match self {
            Self::Query(n) => n.span,
            Self::Statement(n) => n.span(),
            Self::SelectStatement(n) => n.span,
            Self::WithClause(n) => n.span,
            Self::CommonTableExpression(n) => n.span,
            Self::SelectBody(n) => n.span,
            Self::TopArg(n) => n.span,
            Self::TableArg(n) => n.span,
            Self::Join(n) => n.span,
            Self::WhereClause(n) => n.span,
            Self::GroupByClause(n) => n.span,
            Self::HavingClause(n) => n.span,
            Self::OrderByClause(n) => n.span,
            Self::OrderByItem(n) => n.span,
            Self::OffsetFetchClause(n) => n.span,
            Self::FetchArg(n) => n.span,
            Self::FunctionOverClause(n) => n.span,
            Self::WindowFrameClause(n) => n.span,
            Self::Expr(n) => n.span(),
        }
    }
}

/// Tree-walking capability.
pub trait Visitor {
    /// Called when `node` is entered. Return `false` to skip its children.
    fn visit(&mut self, node: Node<'_>) -> bool;

    /// Called after all of `node`'s children have been visited.
    fn leave(&mut self, node: Node<'_>) {
        let _ = node;
    }
}

/// Walk the whole query depth-first.
pub fn walk_query<V: Visitor>(v: &mut V, query: &Query) {
    if v.visit(Node::Query(query)) {
        for stmt in &query.statements {
            walk_statement(v, stmt);
        }
    }
    v.leave(Node::Query(query));
}

/// Walk a single statement.
pub fn walk_statement<V: Visitor>(v: &mut V, stmt: &Statement) {
    if v.visit(Node::Statement(stmt)) {
        match stmt {
            Statement::Select(select) => walk_select_statement(v, select),
        }
    }
    v.leave(Node::Statement(stmt));
}

fn walk_select_statement<V: Visitor>(v: &mut V, select: &SelectStatement) {
    if v.visit(Node::SelectStatement(select)) {
        if let Some(with) = &select.with {
            walk_with_clause(v, with);
        }
        walk_select_body(v, &select.body);
    }
    v.leave(Node::SelectStatement(select));
}

fn walk_with_clause<V: Visitor>(v: &mut V, with: &WithClause) {
    if v.visit(Node::WithClause(with)) {
        for cte in &with.ctes {
            walk_cte(v, cte);
        }
    }
    v.leave(Node::WithClause(with));
}

fn walk_cte<V: Visitor>(v: &mut V, cte: &CommonTableExpression) {
    if v.visit(Node::CommonTableExpression(cte)) {
        walk_expr(v, &cte.name);
        if let Some(columns) = &cte.columns {
            for col in columns {
                walk_expr(v, col);
            }
        }
        walk_select_body(v, &cte.body);
    }
    v.leave(Node::CommonTableExpression(cte));
}

/// Walk a SELECT body and all of its clauses.
pub fn walk_select_body<V: Visitor>(v: &mut V, body: &SelectBody) {
    if v.visit(Node::SelectBody(body)) {
        if let Some(top) = &body.top {
            walk_top(v, top);
        }
        for item in &body.items {
            walk_expr(v, item);
        }
        if let Some(table) = &body.table {
            walk_table_arg(v, table);
        }
        if let Some(where_clause) = &body.where_clause {
            walk_where(v, where_clause);
        }
        if let Some(group_by) = &body.group_by {
            walk_group_by(v, group_by);
        }
        if let Some(having) = &body.having {
            walk_having(v, having);
        }
        if let Some(order_by) = &body.order_by {
            walk_order_by(v, order_by);
        }
    }
    v.leave(Node::SelectBody(body));
}

fn walk_top<V: Visitor>(v: &mut V, top: &TopArg) {
    if v.visit(Node::TopArg(top)) {
        walk_expr(v, &top.quantity);
    }
    v.leave(Node::TopArg(top));
}

fn walk_table_arg<V: Visitor>(v: &mut V, table: &TableArg) {
    if v.visit(Node::TableArg(table)) {
        walk_expr(v, &table.table);
        for join in &table.joins {
            walk_join(v, join);
        }
    }
    v.leave(Node::TableArg(table));
}

fn walk_join<V: Visitor>(v: &mut V, join: &Join) {
    if v.visit(Node::Join(join)) {
        walk_expr(v, &join.table);
        walk_expr(v, &join.predicate);
    }
    v.leave(Node::Join(join));
}

fn walk_where<V: Visitor>(v: &mut V, clause: &WhereClause) {
    if v.visit(Node::WhereClause(clause)) {
        walk_expr(v, &clause.predicate);
    }
    v.leave(Node::WhereClause(clause));
}

fn walk_group_by<V: Visitor>(v: &mut V, clause: &GroupByClause) {
    if v.visit(Node::GroupByClause(clause)) {
        for expr in &clause.exprs {
            walk_expr(v, expr);
        }
    }
    v.leave(Node::GroupByClause(clause));
}

fn walk_having<V: Visitor>(v: &mut V, clause: &HavingClause) {
    if v.visit(Node::HavingClause(clause)) {
        walk_expr(v, &clause.predicate);
    }
    v.leave(Node::HavingClause(clause));
}

fn walk_order_by<V: Visitor>(v: &mut V, clause: &OrderByClause) {
    if v.visit(Node::OrderByClause(clause)) {
        for item in &clause.items {
            walk_order_by_item(v, item);
        }
        if let Some(offset_fetch) = &clause.offset_fetch {
            walk_offset_fetch(v, offset_fetch);
        }
    }
    v.leave(Node::OrderByClause(clause));
}

fn walk_order_by_item<V: Visitor>(v: &mut V, item: &OrderByItem) {
    if v.visit(Node::OrderByItem(item)) {
        walk_expr(v, &item.expr);
    }
    v.leave(Node::OrderByItem(item));
}

fn walk_offset_fetch<V: Visitor>(v: &mut V, clause: &OffsetFetchClause) {
    if v.visit(Node::OffsetFetchClause(clause)) {
        walk_expr(v, &clause.offset);
        if let Some(fetch) = &clause.fetch {
            walk_fetch(v, fetch);
        }
    }
    v.leave(Node::OffsetFetchClause(clause));
}

fn walk_fetch<V: Visitor>(v: &mut V, fetch: &FetchArg) {
    if v.visit(Node::FetchArg(fetch)) {
        walk_expr(v, &fetch.quantity);
    }
    v.leave(Node::FetchArg(fetch));
}

fn walk_over<V: Visitor>(v: &mut V, over: &FunctionOverClause) {
    if v.visit(Node::FunctionOverClause(over)) {
        for expr in &over.partition_by {
            walk_expr(v, expr);
        }
        for item in &over.order_by {
            walk_order_by_item(v, item);
        }
        if let Some(frame) = &over.frame {
            walk_frame(v, frame);
        }
    }
    v.leave(Node::FunctionOverClause(over));
}

fn walk_frame<V: Visitor>(v: &mut V, frame: &WindowFrameClause) {
    if v.visit(Node::WindowFrameClause(frame)) {
        walk_frame_bound(v, &frame.start);
        if let Some(end) = &frame.end {
            walk_frame_bound(v, end);
        }
    }
    v.leave(Node::WindowFrameClause(frame));
}

fn walk_frame_bound<V: Visitor>(v: &mut V, bound: &FrameBound) {
    match bound {
        FrameBound::Preceding(expr) | FrameBound::Following(expr) => walk_expr(v, expr),
        FrameBound::UnboundedPreceding
        | FrameBound::UnboundedFollowing
        | FrameBound::CurrentRow => {}
    }
}

/// Walk an expression subtree.
pub fn walk_expr<V: Visitor>(v: &mut V, expr: &Expr) {
    if v.visit(Node::Expr(expr)) {
        match expr {
            Expr::NumberLiteral { .. }
            | Expr::StringLiteral { .. }
            | Expr::LocalVariable { .. }
            | Expr::Identifier { .. }
            | Expr::QuotedIdentifier { .. }
            | Expr::Star { .. } => {}

            Expr::CompoundIdentifier { parts, .. } => {
                for part in parts {
                    walk_expr(v, part);
                }
            }
            Expr::Alias { expr, alias, .. } => {
                walk_expr(v, expr);
                walk_expr(v, alias);
            }
            Expr::ExprList { items, .. } => {
                for item in items {
                    walk_expr(v, item);
                }
            }
            Expr::Unary { expr, .. } => walk_expr(v, expr),
            Expr::Binary { left, right, .. } => {
                walk_expr(v, left);
                walk_expr(v, right);
            }
            Expr::Between {
                expr, low, high, ..
            } => {
                walk_expr(v, expr);
                walk_expr(v, low);
                walk_expr(v, high);
            }
            Expr::In { expr, set, .. } => {
                walk_expr(v, expr);
                match set {
                    InSet::List(items) => {
                        for item in items {
                            walk_expr(v, item);
                        }
                    }
                    InSet::Subquery(body) => walk_select_body(v, body),
                }
            }
            Expr::Like { expr, pattern, .. } => {
                walk_expr(v, expr);
                walk_expr(v, pattern);
            }
            Expr::Exists { subquery, .. } => walk_select_body(v, subquery),
            Expr::Quantified { expr, subquery, .. } => {
                walk_expr(v, expr);
                walk_select_body(v, subquery);
            }
            Expr::FunctionCall { args, over, .. } => {
                for arg in args {
                    walk_expr(v, arg);
                }
                if let Some(over) = over {
                    walk_over(v, over);
                }
            }
            Expr::Cast { expr, data_type, .. } => {
                walk_expr(v, expr);
                for arg in &data_type.args {
                    walk_expr(v, arg);
                }
            }
            Expr::Subquery { body, .. } => walk_select_body(v, body),
        }
    }
    v.leave(Node::Expr(expr));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Keyword, KeywordKind, Position};

    fn span(line: u32, start_col: u32, end_col: u32) -> Span {
        Span::new(Position::new(line, start_col), Position::new(line, end_col))
    }

    fn ident(name: &str, line: u32, col: u32) -> Expr {
        let width = u32::try_from(name.len()).unwrap();
        Expr::Identifier {
            name: name.to_owned(),
            span: span(line, col, col + width),
        }
    }

    fn kw(text: &str, kind: KeywordKind, line: u32, col: u32) -> Keyword {
        let width = u32::try_from(text.len()).unwrap();
        Keyword {
            kind,
            text: text.to_owned(),
            span: span(line, col, col + width),
        }
    }

    /// Records enter/leave pairing depth to prove the sentinel fires once
    /// per node, after its children.
    struct DepthCheck {
        depth: usize,
        max_depth: usize,
        entered: usize,
        left: usize,
    }

    impl Visitor for DepthCheck {
        fn visit(&mut self, _node: Node<'_>) -> bool {
            self.depth += 1;
            self.max_depth = self.max_depth.max(self.depth);
            self.entered += 1;
            true
        }

        fn leave(&mut self, _node: Node<'_>) {
            self.depth -= 1;
            self.left += 1;
        }
    }

    fn tiny_query() -> Query {
        // SELECT a FROM t
        let body = SelectBody {
            keyword: kw("SELECT", KeywordKind::Select, 1, 1),
            distinct: crate::Distinctness::All,
            top: None,
            items: vec![ident("a", 1, 8)],
            table: Some(TableArg {
                table: Box::new(ident("t", 1, 15)),
                joins: vec![],
                span: span(1, 15, 16),
            }),
            where_clause: None,
            group_by: None,
            having: None,
            order_by: None,
            span: span(1, 1, 16),
        };
        let stmt = Statement::Select(SelectStatement {
            with: None,
            body,
            span: span(1, 1, 16),
        });
        Query {
            span: stmt.span(),
            statements: vec![stmt],
        }
    }

    #[test]
    fn test_enter_leave_are_balanced() {
        let query = tiny_query();
        let mut v = DepthCheck {
            depth: 0,
            max_depth: 0,
            entered: 0,
            left: 0,
        };
        walk_query(&mut v, &query);
        assert_eq!(v.depth, 0);
        assert_eq!(v.entered, v.left);
        // Query > Statement > SelectStatement > SelectBody > TableArg > Expr
        assert!(v.max_depth >= 6);
    }

    #[test]
    fn test_visit_false_skips_children() {
        struct StopAtBody {
            exprs_seen: usize,
        }
        impl Visitor for StopAtBody {
            fn visit(&mut self, node: Node<'_>) -> bool {
                match node {
                    Node::SelectBody(_) => false,
                    Node::Expr(_) => {
                        self.exprs_seen += 1;
                        true
                    }
                    _ => true,
                }
            }
        }
        let query = tiny_query();
        let mut v = StopAtBody { exprs_seen: 0 };
        walk_query(&mut v, &query);
        assert_eq!(v.exprs_seen, 0);
    }

    #[test]
    fn test_walk_reaches_all_spans() {
        struct Collect(Vec<Span>);
        impl Visitor for Collect {
            fn visit(&mut self, node: Node<'_>) -> bool {
                self.0.push(node.span());
                true
            }
        }
        let query = tiny_query();
        let mut v = Collect(Vec::new());
        walk_query(&mut v, &query);
        // Query, Statement, SelectStatement, SelectBody, item a, TableArg, t.
        assert_eq!(v.0.len(), 7);
        for s in &v.0 {
            assert!(query.span.contains(*s));
        }
    }
}

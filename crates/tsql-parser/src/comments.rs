//! Attaching free-floating comments to the syntactically nearest node.
//!
//! The tree stays immutable; the mapping lives in a side table keyed by
//! node span. A formatter walks the tree and asks the map which comments
//! ride along with each node.

use std::collections::HashMap;

use tsql_ast::walk::{walk_query, Node, Visitor};
use tsql_ast::{Comment, Query, Span};

/// Comments bucketed per node. `same_line` comments share their node's
/// line; `before` comments sit on their own line above the node; comments
/// past every node trail the query as a whole.
#[derive(Debug, Default)]
pub struct CommentMap {
    same_line: HashMap<Span, Vec<Comment>>,
    before: HashMap<Span, Vec<Comment>>,
    trailing: Vec<Comment>,
}

impl CommentMap {
    #[must_use]
    pub fn same_line(&self, span: Span) -> &[Comment] {
        self.same_line.get(&span).map_or(&[], Vec::as_slice)
    }

    #[must_use]
    pub fn before(&self, span: Span) -> &[Comment] {
        self.before.get(&span).map_or(&[], Vec::as_slice)
    }

    #[must_use]
    pub fn trailing(&self) -> &[Comment] {
        &self.trailing
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.same_line.is_empty() && self.before.is_empty() && self.trailing.is_empty()
    }
}

/// Collects every node span in walk (pre-)order, so "first found" ties
/// resolve the same way a full tree scan would.
struct SpanCollector {
    spans: Vec<Span>,
}

impl Visitor for SpanCollector {
    fn visit(&mut self, node: Node<'_>) -> bool {
        self.spans.push(node.span());
        true
    }
}

/// Associate each comment with its nearest node. Per comment: prefer a
/// single-line node starting on the comment's line, nearest by column;
/// otherwise the first node starting at or after the comment's line,
/// nearest by line; otherwise the comment trails the query.
#[must_use]
pub fn map_comments(query: &Query, comments: Vec<Comment>) -> CommentMap {
    let mut collector = SpanCollector { spans: Vec::new() };
    walk_query(&mut collector, query);
    let spans = collector.spans;

    let mut map = CommentMap::default();
    'comments: for comment in comments {
        let line = comment.span.start.line;

        let mut best: Option<(i64, Span)> = None;
        for &span in &spans {
            if span.start.line == line && span.is_single_line() {
                let dist = i64::from(comment.span.start.column) - i64::from(span.start.column);
                if best.is_none_or(|(d, _)| dist < d) {
                    best = Some((dist, span));
                }
            }
        }
        if let Some((_, span)) = best {
            map.same_line.entry(span).or_default().push(comment);
            continue 'comments;
        }

        let mut best: Option<(u32, Span)> = None;
        for &span in &spans {
            if span.start.line >= line {
                let dist = span.start.line - line;
                if best.is_none_or(|(d, _)| dist < d) {
                    best = Some((dist, span));
                }
            }
        }
        if let Some((_, span)) = best {
            map.before.entry(span).or_default().push(comment);
        } else {
            map.trailing.push(comment);
        }
    }
    map
}

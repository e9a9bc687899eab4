//! Read-only traversals and substring search.
//!
//! All walks use an explicit stack; nothing here mutates the tree, so any
//! number of them can run over a shared `&Tree` at once.

use std::fmt;

use crate::model::SequenceRecord;

use super::{Node, Tree};

/// Pre-order iterator (node, left subtree, right subtree) over records.
pub struct Preorder<'a> {
    stack: Vec<&'a Node>,
}

impl<'a> Iterator for Preorder<'a> {
    type Item = &'a SequenceRecord;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.stack.extend(node.right.as_deref());
        self.stack.extend(node.left.as_deref());
        Some(&node.record)
    }
}

/// In-order iterator: records in ascending header order.
pub struct InOrder<'a> {
    stack: Vec<&'a Node>,
}

impl<'a> InOrder<'a> {
    fn push_left_spine(&mut self, mut node: Option<&'a Node>) {
        while let Some(n) = node {
            self.stack.push(n);
            node = n.left.as_deref();
        }
    }
}

impl<'a> Iterator for InOrder<'a> {
    type Item = &'a SequenceRecord;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.push_left_spine(node.right.as_deref());
        Some(&node.record)
    }
}

/// Pre-order iterator over headers only.
pub struct Labels<'a>(Preorder<'a>);

impl<'a> Iterator for Labels<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<Self::Item> {
        self.0.next().map(SequenceRecord::header)
    }
}

/// Which part of a record a search looks at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchField {
    Header,
    Body,
}

impl fmt::Display for SearchField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SearchField::Header => write!(f, "header"),
            SearchField::Body => write!(f, "sequence"),
        }
    }
}

/// Decides whether a record matches a query.
///
/// On a match the matcher returns the field it matched in and the byte
/// offset of the match within that field.
pub trait Matcher {
    fn find(&self, header: &str, body: &str, query: &str) -> Option<(SearchField, usize)>;
}

/// Ordinal substring match on the header.
#[derive(Debug, Clone, Copy, Default)]
pub struct HeaderMatcher;

impl Matcher for HeaderMatcher {
    fn find(&self, header: &str, _body: &str, query: &str) -> Option<(SearchField, usize)> {
        header.find(query).map(|pos| (SearchField::Header, pos))
    }
}

/// Ordinal substring match on the sequence body.
#[derive(Debug, Clone, Copy, Default)]
pub struct BodyMatcher;

impl Matcher for BodyMatcher {
    fn find(&self, _header: &str, body: &str, query: &str) -> Option<(SearchField, usize)> {
        body.find(query).map(|pos| (SearchField::Body, pos))
    }
}

impl<F> Matcher for F
where
    F: Fn(&str, &str, &str) -> Option<(SearchField, usize)>,
{
    fn find(&self, header: &str, body: &str, query: &str) -> Option<(SearchField, usize)> {
        self(header, body, query)
    }
}

/// One search match, with enough detail to highlight it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchHit<'a> {
    pub record: &'a SequenceRecord,
    pub field: SearchField,
    /// Byte offset of the match within the field.
    pub position: usize,
    /// Byte length of the match.
    pub len: usize,
}

impl<'a> SearchHit<'a> {
    /// The full text of the field that matched.
    pub fn text(&self) -> &'a str {
        match self.field {
            SearchField::Header => self.record.header(),
            SearchField::Body => self.record.body(),
        }
    }

    /// Splits the matched field into (before, match, after).
    ///
    /// If the reported match does not fall on character boundaries of the
    /// field, the whole field comes back as `before` with nothing matched.
    pub fn split(&self) -> (&'a str, &'a str, &'a str) {
        let text = self.text();
        let end = self.position.saturating_add(self.len);
        match (
            text.get(..self.position),
            text.get(self.position..end),
            text.get(end..),
        ) {
            (Some(before), Some(matched), Some(after)) => (before, matched, after),
            _ => (text, "", ""),
        }
    }
}

impl Tree {
    /// Records in pre-order.
    pub fn preorder(&self) -> Preorder<'_> {
        Preorder {
            stack: self.root.as_deref().into_iter().collect(),
        }
    }

    /// Headers in pre-order.
    pub fn labels(&self) -> Labels<'_> {
        Labels(self.preorder())
    }

    /// Records in ascending header order.
    pub fn in_order(&self) -> InOrder<'_> {
        let mut iter = InOrder { stack: Vec::new() };
        iter.push_left_spine(self.root.as_deref());
        iter
    }

    /// Walks the tree in pre-order, reporting every record `matcher` accepts
    /// to `on_hit`. Returns the number of matches.
    pub fn search<'a, M, F>(&'a self, query: &str, matcher: &M, mut on_hit: F) -> usize
    where
        M: Matcher + ?Sized,
        F: FnMut(SearchHit<'a>),
    {
        let mut count = 0;
        for record in self.preorder() {
            if let Some((field, position)) = matcher.find(record.header(), record.body(), query) {
                count += 1;
                on_hit(SearchHit {
                    record,
                    field,
                    position,
                    len: query.len(),
                });
            }
        }
        count
    }

    /// Collects all matches of `query` into a vector.
    pub fn search_hits<'a, M>(&'a self, query: &str, matcher: &M) -> Vec<SearchHit<'a>>
    where
        M: Matcher + ?Sized,
    {
        let mut hits = Vec::new();
        self.search(query, matcher, |hit| hits.push(hit));
        hits
    }
}

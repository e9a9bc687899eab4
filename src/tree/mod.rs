//! Ordered sequence-record tree.
//!
//! Records are kept in an unbalanced binary search tree ordered by header
//! (byte-wise comparison). Insertion never rebalances; balancing is the
//! separate, explicit [`Tree::balance`] step (Day–Stout–Warren), which is
//! also run after every [`Tree::merge`].
//!
//! Each node owns its children outright, so there are no parent links and
//! no aliasing. Everything that walks the tree does so iteratively, because
//! a tree built from sorted input degenerates into a chain as deep as the
//! number of records.

mod balance;
mod merge;
mod traversal;

use std::cmp::Ordering;

use log::debug;
use thiserror::Error;

use crate::model::SequenceRecord;

pub use balance::{count_ground_leaves, minimum_height, BalanceStatus};
pub use merge::MergeStatus;
pub use traversal::{
    BodyMatcher, HeaderMatcher, InOrder, Labels, Matcher, Preorder, SearchField, SearchHit,
};

/// Errors reported by tree operations.
#[derive(Error, Debug)]
pub enum TreeError {
    #[error("Failed to allocate record '{header}': {source}")]
    Allocation {
        header: String,
        #[source]
        source: std::collections::TryReserveError,
    },

    #[error("Merge drained {drained} node(s) from a source tree of size {expected}")]
    MergeInvariant { expected: usize, drained: usize },
}

/// Result type for tree operations.
pub type TreeResult<T> = Result<T, TreeError>;

pub(crate) type Link = Option<Box<Node>>;

/// A tree node: one record plus two owned subtrees.
#[derive(Debug)]
pub(crate) struct Node {
    pub(crate) record: SequenceRecord,
    pub(crate) left: Link,
    pub(crate) right: Link,
}

impl Node {
    pub(crate) fn new(record: SequenceRecord) -> Self {
        Self {
            record,
            left: None,
            right: None,
        }
    }
}

/// A binary search tree of sequence records, named after the file it came from.
#[derive(Debug)]
pub struct Tree {
    name: String,
    size: usize,
    root: Link,
}

impl Tree {
    /// Creates an empty tree.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            size: 0,
            root: None,
        }
    }

    /// The provenance of the tree, usually the file it was read from.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of records in the tree.
    pub fn len(&self) -> usize {
        self.size
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Inserts a record unless one with the same header is already present.
    ///
    /// A duplicate header is not an error: the newcomer is dropped and the
    /// record that got there first is kept. On allocation failure the tree
    /// is left exactly as it was.
    pub fn insert(&mut self, header: &str, body: &str) -> TreeResult<()> {
        let record = SequenceRecord::try_new(header, body).map_err(|source| {
            TreeError::Allocation {
                header: header.to_string(),
                source,
            }
        })?;
        self.insert_record(record);
        Ok(())
    }

    /// Inserts an already constructed record. Returns false if the header
    /// was already present and the record was discarded.
    pub fn insert_record(&mut self, record: SequenceRecord) -> bool {
        match vacant_slot(&mut self.root, record.header()) {
            Some(slot) => {
                *slot = Some(Box::new(Node::new(record)));
                self.size += 1;
                true
            }
            None => {
                debug!("{}: duplicate header {:?} ignored", self.name, record.label());
                false
            }
        }
    }

    /// Looks up a record by its exact header.
    pub fn get(&self, header: &str) -> Option<&SequenceRecord> {
        let mut link = &self.root;
        while let Some(node) = link {
            link = match header.cmp(node.record.header()) {
                Ordering::Less => &node.left,
                Ordering::Greater => &node.right,
                Ordering::Equal => return Some(&node.record),
            };
        }
        None
    }

    pub fn contains(&self, header: &str) -> bool {
        self.get(header).is_some()
    }

    /// Number of nodes on the longest root-to-leaf path (0 for an empty tree).
    pub fn height(&self) -> usize {
        let mut height = 0;
        let mut stack: Vec<(&Node, usize)> = Vec::new();
        if let Some(root) = self.root.as_deref() {
            stack.push((root, 1));
        }
        while let Some((node, depth)) = stack.pop() {
            height = height.max(depth);
            for child in [node.left.as_deref(), node.right.as_deref()].into_iter().flatten() {
                stack.push((child, depth + 1));
            }
        }
        height
    }

    /// The header stored at the root, if any.
    pub fn root_header(&self) -> Option<&str> {
        self.root.as_deref().map(|node| node.record.header())
    }

    /// Releases every node, leaving an empty tree with the same name.
    pub fn clear(&mut self) {
        deallocate_iteratively(&mut self.root);
        self.size = 0;
    }

    /// Counts the nodes reachable from the root.
    pub fn count_nodes(&self) -> usize {
        self.preorder().count()
    }
}

impl Drop for Tree {
    fn drop(&mut self) {
        deallocate_iteratively(&mut self.root);
    }
}

/// Descends from `link` to the empty slot where `header` belongs.
/// Returns `None` if a node with that header already exists.
pub(crate) fn vacant_slot<'a>(mut link: &'a mut Link, header: &str) -> Option<&'a mut Link> {
    while let Some(node) = link {
        link = match header.cmp(node.record.header()) {
            Ordering::Less => &mut node.left,
            Ordering::Greater => &mut node.right,
            Ordering::Equal => return None,
        };
    }
    Some(link)
}

/// The derived drop of a boxed node chain is recursive, which overflows the
/// stack on a degenerate tree. This frees the nodes from an explicit stack.
fn deallocate_iteratively(link: &mut Link) {
    let mut stack: Vec<Box<Node>> = link.take().into_iter().collect();
    while let Some(mut node) = stack.pop() {
        stack.extend(node.left.take());
        stack.extend(node.right.take());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tree_of(headers: &[&str]) -> Tree {
        let mut tree = Tree::new("test");
        for header in headers {
            tree.insert(header, "ACGT\n").unwrap();
        }
        tree
    }

    fn in_order(tree: &Tree) -> Vec<&str> {
        tree.in_order().map(|r| r.header()).collect()
    }

    #[test]
    fn test_new_tree_is_empty() {
        let tree = Tree::new("test1");
        assert_eq!(tree.name(), "test1");
        assert_eq!(tree.len(), 0);
        assert!(tree.is_empty());
        assert_eq!(tree.height(), 0);
        assert_eq!(tree.root_header(), None);
    }

    #[test]
    fn test_first_insert_becomes_root() {
        let tree = tree_of(&["m"]);
        assert_eq!(tree.len(), 1);
        assert_eq!(tree.root_header(), Some("m"));
    }

    #[test]
    fn test_insert_orders_headers() {
        let tree = tree_of(&["b", "a", "c", "e", "d"]);
        assert_eq!(in_order(&tree), vec!["a", "b", "c", "d", "e"]);
        assert_eq!(tree.len(), 5);
        assert_eq!(tree.root_header(), Some("b"));
    }

    #[test]
    fn test_duplicate_header_keeps_first() {
        let mut tree = Tree::new("test");
        tree.insert("seq1", "FIRST").unwrap();
        tree.insert("seq2", "OTHER").unwrap();
        tree.insert("seq1", "SECOND").unwrap();

        assert_eq!(tree.len(), 2);
        assert_eq!(tree.get("seq1").unwrap().body(), "FIRST");
    }

    #[test]
    fn test_ordering_is_bytewise() {
        let tree = tree_of(&["b", "B", "a", "_", "A"]);
        assert_eq!(in_order(&tree), vec!["A", "B", "_", "a", "b"]);
    }

    #[test]
    fn test_sorted_input_degenerates() {
        let headers: Vec<String> = (0..50).map(|i| format!("seq{:03}", i)).collect();
        let refs: Vec<&str> = headers.iter().map(String::as_str).collect();
        let tree = tree_of(&refs);
        assert_eq!(tree.height(), 50);
        assert_eq!(tree.count_nodes(), 50);
    }

    #[test]
    fn test_get_and_contains() {
        let tree = tree_of(&["b", "a", "c"]);
        assert!(tree.contains("a"));
        assert!(!tree.contains("z"));
        assert_eq!(tree.get("c").unwrap().header(), "c");
    }

    #[test]
    fn test_clear_releases_nodes() {
        let mut tree = tree_of(&["b", "a", "c"]);
        tree.clear();
        assert!(tree.is_empty());
        assert_eq!(tree.len(), 0);
        assert_eq!(tree.name(), "test");
    }

    #[test]
    fn test_drop_deep_chain() {
        // built by hand: inserting sorted headers one by one is quadratic
        let mut link: Link = None;
        for i in 0..200_000u32 {
            let mut node = Box::new(Node::new(SequenceRecord::new(format!("{:08}", i), "A\n")));
            node.left = link;
            link = Some(node);
        }
        let mut tree = Tree::new("deep");
        tree.root = link;
        tree.size = 200_000;

        assert_eq!(tree.height(), 200_000);
        assert_eq!(tree.count_nodes(), 200_000);
        drop(tree);
    }
}

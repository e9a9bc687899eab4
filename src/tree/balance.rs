//! Day–Stout–Warren balancing.
//!
//! The tree is first unwound into a "vine" (a chain of right children in
//! ascending order) and then folded back into a tree of minimum height by
//! sweeps of left rotations. Both passes walk the vine with a single cursor,
//! so the extra space is constant.
//!
//! Rotations swap *records* between the pivot and its child instead of
//! relinking the pivot into its parent, which is what lets the algorithm work
//! without parent links:
//!
//! ```text
//!  Left rotation on A               Right rotation on B
//!
//!     A            B                    B           A
//!    / \          / \                  / \         / \
//!   X   B   =>   A   Z                A   Z   =>  X   B
//!      / \      / \                  / \             / \
//!     Y   Z    X   Y                X   Y           Y   Z
//! ```
//!
//! The node that held A before a left rotation holds B afterwards; the node
//! that held B becomes the left child and now holds A.

use log::debug;

use super::{Link, Node, Tree};

/// Outcome of [`Tree::balance`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BalanceStatus {
    /// The tree was empty; nothing was done.
    Empty,
    /// The tree was rebuilt and now has the given height.
    Balanced { height: usize },
}

/// Number of nodes on the lowest, possibly incomplete level of a
/// minimum-height tree with `n` nodes: `n + 1 - 2^floor(log2(n + 1))`.
pub fn count_ground_leaves(n: usize) -> usize {
    let m = n + 1;
    m - (1 << m.ilog2())
}

/// Height of a minimum-height tree with `n` nodes: `ceil(log2(n + 1))`.
pub fn minimum_height(n: usize) -> usize {
    match n {
        0 => 0,
        _ => n.ilog2() as usize + 1,
    }
}

impl Tree {
    /// Rebuilds the tree into minimum height, keeping the in-order sequence.
    ///
    /// Two trees with the same records end up with the same shape, whatever
    /// shape they started from.
    pub fn balance(&mut self) -> BalanceStatus {
        if self.root.is_none() {
            return BalanceStatus::Empty;
        }
        self.tree_to_vine();
        self.vine_to_tree();

        let height = self.height();
        debug!("{}: balanced {} records to height {}", self.name, self.size, height);
        BalanceStatus::Balanced { height }
    }

    /// Right-rotates until no node has a left child. Afterwards the root is
    /// the smallest header and every node's right child is its successor.
    pub fn tree_to_vine(&mut self) {
        let mut cursor = self.root.as_deref_mut();
        while let Some(node) = cursor {
            while rotate_right(node) {}
            cursor = node.right.as_deref_mut();
        }
    }

    /// Folds a vine of `len()` nodes into a minimum-height tree.
    ///
    /// The first sweep makes exactly [`count_ground_leaves`] rotations, each
    /// one hanging a node off the vine as a bottom-level leaf. These are
    /// spread evenly over the vine so the bottom level fills from both sides
    /// and the root ends up at the median. The remaining vine of
    /// `2^k - 1` nodes is then halved sweep by sweep until one node is left.
    pub fn vine_to_tree(&mut self) {
        let leaves = count_ground_leaves(self.size);
        let mut remaining = self.size - leaves;

        spread_ground_leaves(&mut self.root, leaves, remaining);
        while remaining > 1 {
            remaining /= 2;
            compress(&mut self.root, remaining);
        }
    }
}

/// Left-rotates the vine at `leaves` of its first `slots` positions, chosen
/// so that the rotations are evenly distributed.
fn spread_ground_leaves(root: &mut Link, leaves: usize, slots: usize) {
    if leaves == 0 {
        return;
    }
    let mut cursor = root.as_deref_mut();
    for slot in 0..slots {
        let Some(node) = cursor else { break };
        if (slot + 1) * leaves / slots > slot * leaves / slots {
            rotate_left(node);
        }
        cursor = node.right.as_deref_mut();
    }
}

/// Left-rotates at every other node along the vine, `count` times.
fn compress(root: &mut Link, count: usize) {
    let mut cursor = root.as_deref_mut();
    for _ in 0..count {
        let Some(node) = cursor else { break };
        rotate_left(node);
        cursor = node.right.as_deref_mut();
    }
}

/// Right rotation at `pivot`. Returns false (and does nothing) if the pivot
/// has no left child.
pub(crate) fn rotate_right(pivot: &mut Node) -> bool {
    let Some(mut child) = pivot.left.take() else {
        return false;
    };
    std::mem::swap(&mut pivot.record, &mut child.record);

    let z = pivot.right.take();
    pivot.left = child.left.take();
    child.left = child.right.take();
    child.right = z;
    pivot.right = Some(child);
    true
}

/// Left rotation at `pivot`. Returns false (and does nothing) if the pivot
/// has no right child.
pub(crate) fn rotate_left(pivot: &mut Node) -> bool {
    let Some(mut child) = pivot.right.take() else {
        return false;
    };
    std::mem::swap(&mut pivot.record, &mut child.record);

    let x = pivot.left.take();
    pivot.right = child.right.take();
    child.right = child.left.take();
    child.left = x;
    pivot.left = Some(child);
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tree_of(headers: &[&str]) -> Tree {
        let mut tree = Tree::new("test");
        for header in headers {
            tree.insert(header, "\n").unwrap();
        }
        tree
    }

    fn numbered(order: impl IntoIterator<Item = usize>) -> Tree {
        let mut tree = Tree::new("numbered");
        for i in order {
            tree.insert(&format!("defline{:04}\n", i), &format!("sequence{}\n", i))
                .unwrap();
        }
        tree
    }

    fn headers(tree: &Tree) -> Vec<String> {
        tree.in_order().map(|r| r.header().to_string()).collect()
    }

    fn shape(tree: &Tree) -> Vec<String> {
        tree.preorder().map(|r| r.header().to_string()).collect()
    }

    fn is_vine(tree: &Tree) -> bool {
        let mut link = &tree.root;
        while let Some(node) = link {
            if node.left.is_some() {
                return false;
            }
            link = &node.right;
        }
        true
    }

    #[test]
    fn test_count_ground_leaves() {
        assert_eq!(count_ground_leaves(0), 0);
        assert_eq!(count_ground_leaves(1), 0);
        assert_eq!(count_ground_leaves(2), 1);
        assert_eq!(count_ground_leaves(3), 0);
        assert_eq!(count_ground_leaves(5), 2);
        assert_eq!(count_ground_leaves(7), 0);
        assert_eq!(count_ground_leaves(9), 2);
        assert_eq!(count_ground_leaves(14), 7);
    }

    #[test]
    fn test_minimum_height() {
        assert_eq!(minimum_height(0), 0);
        assert_eq!(minimum_height(1), 1);
        assert_eq!(minimum_height(2), 2);
        assert_eq!(minimum_height(3), 2);
        assert_eq!(minimum_height(4), 3);
        assert_eq!(minimum_height(7), 3);
        assert_eq!(minimum_height(8), 4);
    }

    #[test]
    fn test_rotations_swap_records() {
        let mut tree = tree_of(&["b", "a", "c"]);
        let root = tree.root.as_deref_mut().unwrap();

        assert!(rotate_right(root));
        assert_eq!(root.record.header(), "a");
        assert!(root.left.is_none());
        assert_eq!(root.right.as_ref().unwrap().record.header(), "b");

        assert!(rotate_left(root));
        assert_eq!(root.record.header(), "b");
        assert_eq!(root.left.as_ref().unwrap().record.header(), "a");
        assert_eq!(root.right.as_ref().unwrap().record.header(), "c");

        let leaf = root.left.as_deref_mut().unwrap();
        assert!(!rotate_left(leaf));
        assert!(!rotate_right(leaf));
    }

    #[test]
    fn test_tree_to_vine() {
        let mut tree = tree_of(&["d", "b", "f", "a", "c", "e", "g"]);
        tree.tree_to_vine();

        assert!(is_vine(&tree));
        assert_eq!(shape(&tree), vec!["a", "b", "c", "d", "e", "f", "g"]);
        assert_eq!(tree.height(), 7);
    }

    #[test]
    fn test_balance_empty_tree() {
        let mut tree = Tree::new("empty");
        assert_eq!(tree.balance(), BalanceStatus::Empty);
        assert!(tree.is_empty());
    }

    #[test]
    fn test_balance_five_records() {
        let mut tree = tree_of(&["b", "a", "c", "e", "d"]);
        assert_eq!(tree.balance(), BalanceStatus::Balanced { height: 3 });

        assert_eq!(tree.root_header(), Some("c"));
        assert_eq!(headers(&tree), vec!["a", "b", "c", "d", "e"]);
        assert_eq!(tree.len(), 5);
    }

    #[test]
    fn test_balance_reaches_minimum_height() {
        for n in 1..=130 {
            let mut tree = numbered(0..n);
            tree.balance();
            assert_eq!(tree.height(), minimum_height(n), "n = {}", n);
            assert_eq!(tree.count_nodes(), n);
            assert_eq!(tree.len(), n);
        }
    }

    #[test]
    fn test_balance_keeps_order() {
        let mut tree = numbered((0..100).map(|i| (i * 37) % 100));
        let before = headers(&tree);
        tree.balance();
        assert_eq!(headers(&tree), before);
    }

    #[test]
    fn test_balance_converges_to_same_shape() {
        let mut ascending = numbered(0..40);
        let mut descending = numbered((0..40).rev());
        let mut shuffled = numbered((0..40).map(|i| (i * 17) % 40));

        ascending.balance();
        descending.balance();
        shuffled.balance();

        assert_eq!(shape(&ascending), shape(&descending));
        assert_eq!(shape(&ascending), shape(&shuffled));
    }

    #[test]
    fn test_balance_is_idempotent() {
        let mut tree = numbered((0..9).rev());
        tree.balance();
        let once = shape(&tree);
        tree.balance();
        assert_eq!(shape(&tree), once);
    }

    #[test]
    fn test_vine_round_trip_nine_records() {
        let mut tree = numbered([4, 1, 7, 0, 8, 2, 6, 3, 5]);
        let before = headers(&tree);

        tree.tree_to_vine();
        assert!(is_vine(&tree));
        assert_eq!(headers(&tree), before);
        tree.vine_to_tree();

        assert_eq!(headers(&tree), before);
        assert_eq!(tree.height(), 4);
        assert_eq!(tree.count_nodes(), 9);
    }
}

//! Merging one tree into another.
//!
//! The source is unwound into a vine so its nodes can be popped off the head
//! in ascending order, and each popped node (the allocation itself, not a
//! copy) is hung as a new leaf in the destination. A single rebalance at the
//! end restores minimum height.

use log::{debug, info};

use super::{vacant_slot, Tree, TreeError, TreeResult};

/// Outcome of [`Tree::merge`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeStatus {
    /// The source was empty; the destination is unchanged.
    SourceEmpty,
    /// The destination was empty and has been replaced by the source.
    Adopted { size: usize },
    /// Nodes were moved across; `discarded` counts source records whose
    /// header was already in the destination.
    Merged { moved: usize, discarded: usize },
}

impl Tree {
    /// Moves every record of `src` into `self`, dropping source records whose
    /// header is already present, then rebalances.
    ///
    /// If `self` is empty it is replaced by `src` wholesale, name included.
    pub fn merge(&mut self, mut src: Tree) -> TreeResult<MergeStatus> {
        if src.is_empty() {
            debug!("merge: {} is empty, nothing to do", src.name);
            return Ok(MergeStatus::SourceEmpty);
        }
        if self.is_empty() {
            let size = src.size;
            debug!("merge: {} is empty, adopting {}", self.name, src.name);
            *self = src;
            return Ok(MergeStatus::Adopted { size });
        }

        src.tree_to_vine();

        let expected = src.size;
        let mut drained = 0;
        let mut moved = 0;
        let mut discarded = 0;
        while let Some(mut head) = src.root.take() {
            src.root = head.right.take();
            src.size = src.size.saturating_sub(1);
            drained += 1;
            head.left = None;

            match vacant_slot(&mut self.root, head.record.header()) {
                Some(slot) => {
                    *slot = Some(head);
                    self.size += 1;
                    moved += 1;
                }
                None => discarded += 1,
            }
        }

        if src.size != 0 || drained != expected {
            return Err(TreeError::MergeInvariant { expected, drained });
        }
        drop(src);

        self.balance();
        info!(
            "merge into {}: {} moved, {} duplicate(s) discarded, {} records",
            self.name, moved, discarded, self.size
        );
        Ok(MergeStatus::Merged { moved, discarded })
    }
}

//! Fixed-capacity table of loaded files.
//!
//! Each slot holds at most one [`Tree`]. Slots are addressed by 1-based
//! handles, the numbers users type at the prompt and see in `list`.

use std::path::Path;

use log::debug;
use thiserror::Error;

use crate::fasta::{read_fasta_file, FastaError};
use crate::tree::{MergeStatus, Tree, TreeError};

/// Number of slots when none is configured.
pub const DEFAULT_CAPACITY: usize = 10;

/// Errors from buffer table operations.
#[derive(Error, Debug)]
pub enum BufferError {
    #[error("buffer number {handle} is out of bounds (1-{capacity})")]
    OutOfBounds { handle: usize, capacity: usize },

    #[error("buffer {0} is not empty")]
    Occupied(usize),

    #[error("buffer {0} is empty")]
    Empty(usize),

    #[error("all {0} buffers are in use")]
    Full(usize),

    #[error("could not read {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: FastaError,
    },

    #[error("could not write {path}: {source}")]
    Write {
        path: String,
        #[source]
        source: FastaError,
    },

    #[error(transparent)]
    Tree(#[from] TreeError),
}

/// Result type for buffer table operations.
pub type BufferResult<T> = Result<T, BufferError>;

/// What a buffer-level merge did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeOutcome {
    /// Source and destination were the same buffer.
    SameBuffer,
    /// The source buffer was empty.
    NothingToDo,
    /// The destination buffer was empty; the tree moved over.
    Moved,
    /// Both buffers held trees; the source tree was merged in.
    Merged(MergeStatus),
}

/// The table of loaded trees.
#[derive(Debug)]
pub struct BufferTable {
    slots: Vec<Option<Tree>>,
}

impl Default for BufferTable {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

impl BufferTable {
    /// Creates a table with `capacity` empty slots.
    pub fn new(capacity: usize) -> Self {
        Self {
            slots: (0..capacity).map(|_| None).collect(),
        }
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Number of occupied slots.
    pub fn occupied(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_some()).count()
    }

    fn index(&self, handle: usize) -> BufferResult<usize> {
        match handle.checked_sub(1) {
            Some(index) if index < self.slots.len() => Ok(index),
            _ => Err(BufferError::OutOfBounds {
                handle,
                capacity: self.slots.len(),
            }),
        }
    }

    /// Reads a FASTA file into the first free slot.
    pub fn load<P: AsRef<Path>>(&mut self, path: P) -> BufferResult<usize> {
        let handle = self.first_free()?;
        self.load_into(path, handle)?;
        Ok(handle)
    }

    /// Reads a FASTA file into a specific slot, which must be free.
    pub fn load_into<P: AsRef<Path>>(&mut self, path: P, handle: usize) -> BufferResult<()> {
        let index = self.index(handle)?;
        if self.slots[index].is_some() {
            return Err(BufferError::Occupied(handle));
        }
        let path = path.as_ref();
        let tree = read_fasta_file(path).map_err(|source| BufferError::Read {
            path: path.display().to_string(),
            source,
        })?;
        self.slots[index] = Some(tree);
        Ok(())
    }

    /// Stores an existing tree in the first free slot.
    pub fn store(&mut self, tree: Tree) -> BufferResult<usize> {
        let handle = self.first_free()?;
        self.slots[handle - 1] = Some(tree);
        Ok(handle)
    }

    fn first_free(&self) -> BufferResult<usize> {
        self.slots
            .iter()
            .position(Option::is_none)
            .map(|index| index + 1)
            .ok_or(BufferError::Full(self.slots.len()))
    }

    /// The tree in a slot.
    pub fn get(&self, handle: usize) -> BufferResult<&Tree> {
        let index = self.index(handle)?;
        self.slots[index].as_ref().ok_or(BufferError::Empty(handle))
    }

    pub fn get_mut(&mut self, handle: usize) -> BufferResult<&mut Tree> {
        let index = self.index(handle)?;
        self.slots[index].as_mut().ok_or(BufferError::Empty(handle))
    }

    /// Removes and returns the tree in a slot.
    pub fn take(&mut self, handle: usize) -> BufferResult<Tree> {
        let index = self.index(handle)?;
        self.slots[index].take().ok_or(BufferError::Empty(handle))
    }

    /// Drops the tree in a slot.
    pub fn delete(&mut self, handle: usize) -> BufferResult<()> {
        let tree = self.take(handle)?;
        debug!("deleted buffer {} ({})", handle, tree.name());
        Ok(())
    }

    /// Drops every tree. Returns how many slots were cleared.
    pub fn delete_all(&mut self) -> usize {
        self.slots.iter_mut().filter_map(Option::take).count()
    }

    /// Merges the tree in `src` into the tree in `dest`, leaving `src` free.
    pub fn merge(&mut self, src: usize, dest: usize) -> BufferResult<MergeOutcome> {
        let src_index = self.index(src)?;
        let dest_index = self.index(dest)?;
        if src_index == dest_index {
            return Ok(MergeOutcome::SameBuffer);
        }
        let Some(source) = self.slots[src_index].take() else {
            return Ok(MergeOutcome::NothingToDo);
        };
        let slot = &mut self.slots[dest_index];
        match slot {
            Some(target) => Ok(MergeOutcome::Merged(target.merge(source)?)),
            None => {
                *slot = Some(source);
                Ok(MergeOutcome::Moved)
            }
        }
    }

    /// Iterates over `(handle, slot)` pairs.
    pub fn entries(&self) -> impl Iterator<Item = (usize, Option<&Tree>)> + '_ {
        self.slots
            .iter()
            .enumerate()
            .map(|(index, slot)| (index + 1, slot.as_ref()))
    }
}

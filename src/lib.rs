//! # fproc - FASTA buffer shell
//!
//! Loads FASTA files into binary search trees keyed by header, and lets you
//! list, search, merge and write them back out from an interactive prompt.
//!
//! ## Architecture
//!
//! - `model`: the sequence record (header + one-line body)
//! - `tree`: the ordered record tree, Day–Stout–Warren balancing, merging,
//!   traversal and search
//! - `fasta`: reading records from and writing them to FASTA files
//! - `buffers`: the fixed-size table of loaded trees
//! - `command`: parsing of prompt input into commands
//! - `ui`: text rendering (listing, records, highlighted matches)
//! - `controller`: command execution and the prompt loop

pub mod buffers;
pub mod command;
pub mod controller;
pub mod fasta;
pub mod model;
pub mod tree;
pub mod ui;

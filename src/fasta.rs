//! FASTA reading and writing.
//!
//! Records are one header line followed by exactly one sequence line:
//!
//! ```text
//! >sequence_identifier optional description
//! ACGTACGTACGT
//! >another_sequence
//! TGCATGCATGCA
//! ```
//!
//! Multi-line sequences are not supported. Lines are kept with their line
//! terminators, so a tree written back with [`write_fasta`] reproduces the
//! records byte for byte (in tree order rather than file order).

use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use log::{debug, info, warn};
use thiserror::Error;

use crate::tree::{Tree, TreeError};

/// Errors that can occur during FASTA reading and writing.
#[derive(Error, Debug)]
pub enum FastaError {
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Sequence without header at line {0}")]
    SequenceWithoutHeader(usize),

    #[error(transparent)]
    Tree(#[from] TreeError),
}

/// Result type for FASTA operations.
pub type FastaResult<T> = Result<T, FastaError>;

/// Reads a FASTA file into a new tree named after the path.
///
/// # Examples
///
/// ```no_run
/// use fproc::fasta::read_fasta_file;
///
/// let tree = read_fasta_file("sequences.fasta").unwrap();
/// println!("Loaded {} sequences", tree.len());
/// ```
pub fn read_fasta_file<P: AsRef<Path>>(path: P) -> FastaResult<Tree> {
    let path = path.as_ref();
    let file = File::open(path)?;
    let tree = read_fasta(BufReader::new(file), path.display().to_string())?;
    info!("read {} records from {}", tree.len(), path.display());
    Ok(tree)
}

/// Reads FASTA records from a reader into a new tree called `name`.
pub fn read_fasta<R: BufRead>(mut reader: R, name: impl Into<String>) -> FastaResult<Tree> {
    let mut tree = Tree::new(name);
    let mut line = String::new();
    let mut header: Option<String> = None;
    let mut seen_header = false;
    let mut line_number = 0;

    loop {
        line.clear();
        if reader.read_line(&mut line)? == 0 {
            break;
        }
        line_number += 1;

        if let Some(rest) = line.strip_prefix('>') {
            if let Some(orphan) = header.replace(rest.to_string()) {
                warn!(
                    "{}: header {:?} has no sequence line, skipped",
                    tree.name(),
                    orphan.trim_end()
                );
            }
            seen_header = true;
            continue;
        }

        if line.trim().is_empty() {
            continue;
        }

        match header.take() {
            Some(h) => tree.insert(&h, &line)?,
            None if seen_header => {
                debug!("{}: extra sequence line {} ignored", tree.name(), line_number);
            }
            None => return Err(FastaError::SequenceWithoutHeader(line_number)),
        }
    }

    if let Some(orphan) = header {
        warn!(
            "{}: header {:?} has no sequence line, skipped",
            tree.name(),
            orphan.trim_end()
        );
    }
    if tree.is_empty() {
        warn!("{}: no records found", tree.name());
    }

    Ok(tree)
}

/// Reads FASTA records from a string.
///
/// Useful for testing or processing in-memory data.
pub fn read_fasta_str(content: &str, name: impl Into<String>) -> FastaResult<Tree> {
    read_fasta(content.as_bytes(), name)
}

/// Writes every record as `>` + header + body, in pre-order.
pub fn write_fasta<W: Write>(tree: &Tree, writer: &mut W) -> FastaResult<()> {
    for record in tree.preorder() {
        write!(writer, ">{}{}", record.header(), record.body())?;
    }
    Ok(())
}

/// Writes a tree to a file, replacing it if it exists.
pub fn write_fasta_file<P: AsRef<Path>>(tree: &Tree, path: P) -> FastaResult<()> {
    let path = path.as_ref();
    let mut writer = BufWriter::new(File::create(path)?);
    write_fasta(tree, &mut writer)?;
    writer.flush()?;
    info!("wrote {} records to {}", tree.len(), path.display());
    Ok(())
}

//! Data model for sequence records.
//!
//! A record is one header/body pair read from a FASTA file. Both strings keep
//! whatever line terminator they had in the source, so writing a record back
//! out reproduces the original lines.

use std::collections::TryReserveError;

/// A single sequence record: the header line (without the leading `>`) and
/// its one-line sequence body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SequenceRecord {
    header: String,
    body: String,
}

impl SequenceRecord {
    /// Creates a new record.
    pub fn new(header: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            header: header.into(),
            body: body.into(),
        }
    }

    /// Creates a record by copying `header` and `body` into freshly reserved
    /// storage, reporting allocation failure instead of aborting.
    pub fn try_new(header: &str, body: &str) -> Result<Self, TryReserveError> {
        Ok(Self {
            header: try_copy(header)?,
            body: try_copy(body)?,
        })
    }

    /// The header text, used as the ordering key.
    pub fn header(&self) -> &str {
        &self.header
    }

    /// The sequence body.
    pub fn body(&self) -> &str {
        &self.body
    }

    /// The header with any trailing line terminator removed (for display).
    pub fn label(&self) -> &str {
        trim_line_end(&self.header)
    }

    /// The body with any trailing line terminator removed (for display).
    pub fn residues(&self) -> &str {
        trim_line_end(&self.body)
    }

    /// Returns the number of residues in the body, ignoring the terminator.
    pub fn len(&self) -> usize {
        self.residues().len()
    }

    /// Returns true if the body holds no residues.
    pub fn is_empty(&self) -> bool {
        self.residues().is_empty()
    }
}

fn try_copy(s: &str) -> Result<String, TryReserveError> {
    let mut owned = String::new();
    owned.try_reserve_exact(s.len())?;
    owned.push_str(s);
    Ok(owned)
}

/// Strips a trailing `\n` or `\r\n`.
pub fn trim_line_end(s: &str) -> &str {
    s.trim_end_matches(['\n', '\r'])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_creation() {
        let record = SequenceRecord::new("seq1\n", "ACGT\n");
        assert_eq!(record.header(), "seq1\n");
        assert_eq!(record.body(), "ACGT\n");
        assert_eq!(record.label(), "seq1");
        assert_eq!(record.residues(), "ACGT");
        assert_eq!(record.len(), 4);
    }

    #[test]
    fn test_try_new_copies_content() {
        let record = SequenceRecord::try_new("seq1 description", "TTGA").unwrap();
        assert_eq!(record, SequenceRecord::new("seq1 description", "TTGA"));
    }

    #[test]
    fn test_crlf_terminators() {
        let record = SequenceRecord::new("seq1\r\n", "\r\n");
        assert_eq!(record.label(), "seq1");
        assert!(record.is_empty());
    }
}

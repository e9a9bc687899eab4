//! Text rendering for the shell.
//!
//! Everything the shell prints goes through here: the banner, help, buffer
//! listing, records and highlighted search matches. Colors come from
//! crossterm's styling and are only emitted when the [`Palette`] allows it.

use std::io::{self, Write};
use std::path::Path;

use crossterm::style::{style, Color, Stylize};

use crate::buffers::BufferTable;
use crate::model::{trim_line_end, SequenceRecord};
use crate::tree::{minimum_height, SearchHit, Tree};

/// Prompt shown before each command.
pub const PROMPT: &str = "(fproc) > ";

/// Width used when wrapping help text.
const HELP_WIDTH: usize = 80;

/// Width of the name column in `list`.
const NAME_COLUMN_WIDTH: usize = 40;

const COMMANDS: &[(&str, &str)] = &[
    ("read FILE", "read in and store contents of FILE"),
    ("read-to FILE N", "read in and store contents of FILE in buffer N, if free"),
    ("print N", "print description lines from buffer N"),
    ("print-full N", "print description lines and sequences from buffer N"),
    ("list", "print contents of file buffer"),
    ("write N FILE", "write contents of buffer N to output file FILE"),
    ("merge N1 N2", "merge contents of buffer N1 into buffer N2"),
    ("balance N", "rebalance the tree held in buffer N"),
    ("stats N", "show record count and tree height of buffer N"),
    ("search-label N STRING", "search buffer N for description lines containing STRING"),
    ("search-seq N STRING", "search buffer N for sequences containing STRING"),
    ("delete N", "delete buffer N from file buffer"),
    ("delete-all", "delete all buffers"),
    ("help", "display this help message"),
    ("credits", "display credits"),
];

/// Decides whether output is colored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub color: bool,
    pub highlight: Color,
}

impl Palette {
    pub fn new(color: bool) -> Self {
        Self {
            color,
            highlight: Color::Red,
        }
    }

    /// Plain output, no escape sequences.
    pub fn plain() -> Self {
        Self::new(false)
    }

    fn emphasize(&self, text: &str) -> String {
        if self.color {
            style(text).with(self.highlight).to_string()
        } else {
            text.to_string()
        }
    }
}

pub fn render_banner<W: Write>(out: &mut W) -> io::Result<()> {
    let rule = "*".repeat(HELP_WIDTH);
    writeln!(out, "{}", rule)?;
    writeln!(out, "*{:^width$}*", "fproc", width = HELP_WIDTH - 2)?;
    writeln!(out, "{}", rule)?;
    writeln!(out, "fproc v{}", env!("CARGO_PKG_VERSION"))?;
    writeln!(out, "Type `help' or `credits' for more information.")
}

pub fn render_help<W: Write>(out: &mut W) -> io::Result<()> {
    writeln!(out, "fproc - a terminal-based program for FASTA file manipulation.\n")?;
    writeln!(out, "List of commands:\n")?;

    let indent = " ".repeat(32);
    for (synopsis, description) in COMMANDS {
        let options = textwrap::Options::new(HELP_WIDTH)
            .initial_indent("")
            .subsequent_indent(&indent);
        let line = format!("    {:<27} {}", synopsis, description);
        writeln!(out, "{}", textwrap::fill(&line, options))?;
    }

    writeln!(out, "\nUse `quit' or `Ctrl-D' to exit.\n")
}

pub fn render_credits<W: Write>(out: &mut W) -> io::Result<()> {
    writeln!(out, "fproc {}", env!("CARGO_PKG_VERSION"))?;
    writeln!(out, "Written by {}", env!("CARGO_PKG_AUTHORS").replace(':', ", "))
}

/// Confirmation printed after a file is loaded.
pub fn stored_message(path: &Path, handle: usize) -> String {
    format!("file {} successfully stored in buffer {}", path.display(), handle)
}

/// One line per buffer: `N: name (count sequences)` or `N: [FREE]`.
pub fn render_list<W: Write>(out: &mut W, buffers: &BufferTable) -> io::Result<()> {
    for (handle, slot) in buffers.entries() {
        match slot {
            Some(tree) => writeln!(
                out,
                "{:2}: {:<width$} ({} sequences)",
                handle,
                tree.name(),
                tree.len(),
                width = NAME_COLUMN_WIDTH
            )?,
            None => writeln!(out, "{:2}: [FREE]", handle)?,
        }
    }
    Ok(())
}

/// Headers in pre-order, each as a `>` line.
pub fn render_labels<W: Write>(out: &mut W, tree: &Tree) -> io::Result<()> {
    for header in tree.labels() {
        writeln!(out, ">{}", trim_line_end(header))?;
    }
    Ok(())
}

/// Whole records in pre-order, one header line and one sequence line each.
pub fn render_records<W: Write>(out: &mut W, tree: &Tree) -> io::Result<()> {
    for record in tree.preorder() {
        render_record(out, record)?;
    }
    Ok(())
}

fn render_record<W: Write>(out: &mut W, record: &SequenceRecord) -> io::Result<()> {
    writeln!(out, ">{}", record.label())?;
    writeln!(out, "{}", record.residues())
}

/// A search match with the matched text highlighted.
pub fn render_hit<W: Write>(
    out: &mut W,
    hit: &SearchHit<'_>,
    palette: &Palette,
) -> io::Result<()> {
    let (before, matched, after) = hit.split();
    writeln!(out, "Match found in >{}:", hit.record.label())?;
    writeln!(
        out,
        "{}{}{}",
        before,
        palette.emphasize(matched),
        trim_line_end(after)
    )
}

pub fn render_match_count<W: Write>(out: &mut W, count: usize) -> io::Result<()> {
    match count {
        1 => writeln!(out, "1 match"),
        n => writeln!(out, "{} matches", n),
    }
}

/// Record count, current height and the best possible height.
pub fn render_stats<W: Write>(out: &mut W, handle: usize, tree: &Tree) -> io::Result<()> {
    writeln!(
        out,
        "{:2}: {} ({} sequences, height {}, minimum {})",
        handle,
        tree.name(),
        tree.len(),
        tree.height(),
        minimum_height(tree.len())
    )
}

//! Shell controller.
//!
//! This module orchestrates the interactive loop:
//! - Prompting and reading command lines
//! - Parsing them into [`Command`]s
//! - Executing them against the [`BufferTable`] and rendering the result
//!
//! Command and buffer errors are reported to the user and the loop carries
//! on; only failures writing to the output stream end the session.

use std::io::{BufRead, Write};

use anyhow::Result;
use log::{debug, info};

use crate::buffers::{BufferError, BufferTable, MergeOutcome};
use crate::command::{parse_command, Command};
use crate::fasta::write_fasta_file;
use crate::tree::{BalanceStatus, BodyMatcher, HeaderMatcher, Matcher, MergeStatus};
use crate::ui::{self, Palette};

/// Whether the loop should keep going after a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// Shell state: the loaded buffers and output settings.
#[derive(Debug)]
pub struct Session {
    pub buffers: BufferTable,
    pub palette: Palette,
}

impl Session {
    /// Creates a session with `capacity` buffers.
    pub fn new(capacity: usize, palette: Palette) -> Self {
        Self {
            buffers: BufferTable::new(capacity),
            palette,
        }
    }

    /// Parses and executes one input line.
    pub fn execute_line<W: Write>(&mut self, line: &str, out: &mut W) -> Result<Flow> {
        match parse_command(line) {
            Ok(Some(command)) => self.execute(command, out),
            Ok(None) => Ok(Flow::Continue),
            Err(e) => {
                writeln!(out, "{}", e)?;
                Ok(Flow::Continue)
            }
        }
    }

    /// Executes a command, printing buffer errors instead of returning them.
    pub fn execute<W: Write>(&mut self, command: Command, out: &mut W) -> Result<Flow> {
        debug!("executing {:?}", command);
        if command == Command::Quit {
            return Ok(Flow::Quit);
        }
        match self.run(command, out) {
            Ok(()) => {}
            Err(CommandFailure::Buffer(e)) => writeln!(out, "error: {}", e)?,
            Err(CommandFailure::Output(e)) => return Err(e.into()),
        }
        Ok(Flow::Continue)
    }

    fn run<W: Write>(&mut self, command: Command, out: &mut W) -> Result<(), CommandFailure> {
        match command {
            Command::Read(path) => {
                let handle = self.buffers.load(&path)?;
                writeln!(out, "{}", ui::stored_message(&path, handle))?;
            }
            Command::ReadTo { path, buffer } => {
                self.buffers.load_into(&path, buffer)?;
                writeln!(out, "{}", ui::stored_message(&path, buffer))?;
            }
            Command::Print(buffer) => ui::render_labels(out, self.buffers.get(buffer)?)?,
            Command::PrintFull(buffer) => ui::render_records(out, self.buffers.get(buffer)?)?,
            Command::List => ui::render_list(out, &self.buffers)?,
            Command::Write { buffer, path } => {
                let tree = self.buffers.get(buffer)?;
                write_fasta_file(tree, &path).map_err(|source| BufferError::Write {
                    path: path.display().to_string(),
                    source,
                })?;
                writeln!(
                    out,
                    "wrote {} sequences to {}",
                    tree.len(),
                    path.display()
                )?;
            }
            Command::Merge { src, dest } => {
                let outcome = self.buffers.merge(src, dest)?;
                info!("merge {} -> {}: {:?}", src, dest, outcome);
                match outcome {
                    MergeOutcome::SameBuffer => {
                        writeln!(out, "buffers {} and {} are the same: nothing to do", src, dest)?
                    }
                    MergeOutcome::NothingToDo
                    | MergeOutcome::Merged(MergeStatus::SourceEmpty) => {
                        writeln!(out, "buffer {} is empty: nothing to do", src)?
                    }
                    MergeOutcome::Moved | MergeOutcome::Merged(MergeStatus::Adopted { .. }) => {
                        writeln!(out, "buffer {} moved to buffer {}", src, dest)?
                    }
                    MergeOutcome::Merged(MergeStatus::Merged { moved, discarded }) => writeln!(
                        out,
                        "merged buffer {} into buffer {}: {} added, {} duplicates discarded",
                        src, dest, moved, discarded
                    )?,
                }
            }
            Command::Balance(buffer) => match self.buffers.get_mut(buffer)?.balance() {
                BalanceStatus::Empty => writeln!(out, "buffer {} holds no records", buffer)?,
                BalanceStatus::Balanced { height } => {
                    writeln!(out, "buffer {} balanced to height {}", buffer, height)?
                }
            },
            Command::Stats(buffer) => ui::render_stats(out, buffer, self.buffers.get(buffer)?)?,
            Command::SearchLabel { buffer, query } => {
                self.search(buffer, &query, &HeaderMatcher, out)?
            }
            Command::SearchSeq { buffer, query } => {
                self.search(buffer, &query, &BodyMatcher, out)?
            }
            Command::Delete(buffer) => self.buffers.delete(buffer)?,
            Command::DeleteAll => {
                let cleared = self.buffers.delete_all();
                writeln!(out, "{} buffers deleted", cleared)?;
            }
            Command::Help => ui::render_help(out)?,
            Command::Credits => ui::render_credits(out)?,
            Command::Quit => {}
        }
        Ok(())
    }

    fn search<W: Write, M: Matcher>(
        &self,
        buffer: usize,
        query: &str,
        matcher: &M,
        out: &mut W,
    ) -> Result<(), CommandFailure> {
        let tree = self.buffers.get(buffer)?;
        let mut written = Ok(());
        let count = tree.search(query, matcher, |hit| {
            if written.is_ok() {
                written = ui::render_hit(&mut *out, &hit, &self.palette);
            }
        });
        written?;
        ui::render_match_count(out, count)?;
        Ok(())
    }
}

/// Internal split between errors shown to the user and errors that end
/// the session.
enum CommandFailure {
    Buffer(BufferError),
    Output(std::io::Error),
}

impl From<BufferError> for CommandFailure {
    fn from(e: BufferError) -> Self {
        CommandFailure::Buffer(e)
    }
}

impl From<std::io::Error> for CommandFailure {
    fn from(e: std::io::Error) -> Self {
        CommandFailure::Output(e)
    }
}

/// Runs the prompt loop until `quit` or end of input.
pub fn run_repl<R: BufRead, W: Write>(
    mut input: R,
    out: &mut W,
    session: &mut Session,
) -> Result<()> {
    let mut line = String::new();
    loop {
        write!(out, "{}", ui::PROMPT)?;
        out.flush()?;

        line.clear();
        if input.read_line(&mut line)? == 0 {
            writeln!(out)?;
            break;
        }
        if session.execute_line(&line, out)? == Flow::Quit {
            break;
        }
    }
    Ok(())
}

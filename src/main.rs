//! fproc - FASTA buffer shell
//!
//! ## Usage
//!
//! ```bash
//! fproc                              # interactive prompt
//! fproc a.fa b.fa                    # preload buffers 1 and 2
//! fproc a.fa b.fa -e "merge 1 2" -e "write 2 merged.fa"
//! ```
//!
//! Commands can also be piped in on standard input.
//! Set `RUST_LOG=debug` for diagnostic output on stderr.

// Use jemalloc for better memory management (returns memory to OS)
#[cfg(not(windows))]
#[global_allocator]
static GLOBAL: tikv_jemallocator::Jemalloc = tikv_jemallocator::Jemalloc;

use std::io::{self, IsTerminal, Write};
use std::path::PathBuf;

use anyhow::Result;
use clap::builder::TypedValueParser;
use clap::Parser;
use log::warn;

use fproc::buffers::DEFAULT_CAPACITY;
use fproc::controller::{run_repl, Flow, Session};
use fproc::ui::{self, render_banner, Palette};

/// fproc - a terminal-based program for FASTA file manipulation
///
/// Each FASTA file is held in a numbered buffer as a binary search tree
/// keyed by header. Buffers can be printed, searched, merged (with
/// duplicate headers dropped and the result rebalanced) and written back.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// FASTA files to load into buffers 1, 2, ... before starting
    files: Vec<PathBuf>,

    /// Number of file buffers
    #[arg(
        short = 'b',
        long = "buffers",
        default_value_t = DEFAULT_CAPACITY,
        value_parser = clap::value_parser!(u8).range(1..=99).map(usize::from)
    )]
    buffers: usize,

    /// Run a command and exit instead of prompting (repeatable)
    #[arg(short = 'e', long = "execute", value_name = "COMMAND")]
    execute: Vec<String>,

    /// Disable colored match highlighting
    #[arg(long = "no-color")]
    no_color: bool,

    /// Do not print the welcome banner
    #[arg(short = 'q', long = "quiet")]
    quiet: bool,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let args = Args::parse();

    let stdout = io::stdout();
    let color = !args.no_color && std::env::var_os("NO_COLOR").is_none() && stdout.is_terminal();
    let mut session = Session::new(args.buffers, Palette::new(color));
    let mut out = stdout.lock();

    for path in &args.files {
        match session.buffers.load(path) {
            Ok(handle) => writeln!(out, "{}", ui::stored_message(path, handle))?,
            Err(e) => {
                warn!("skipping {}: {}", path.display(), e);
                writeln!(out, "error: {}", e)?;
            }
        }
    }

    // Batch mode: run the given commands and exit
    if !args.execute.is_empty() {
        for line in &args.execute {
            if session.execute_line(line, &mut out)? == Flow::Quit {
                break;
            }
        }
        return Ok(());
    }

    let stdin = io::stdin();
    if !args.quiet && stdin.is_terminal() {
        render_banner(&mut out)?;
    }
    run_repl(stdin.lock(), &mut out, &mut session)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_buffer_count_range() {
        let args = Args::try_parse_from(["fproc", "-b", "20", "a.fa"]).unwrap();
        assert_eq!(args.buffers, 20);
        assert_eq!(args.files, vec![PathBuf::from("a.fa")]);

        let args = Args::try_parse_from(["fproc"]).unwrap();
        assert_eq!(args.buffers, DEFAULT_CAPACITY);

        assert!(Args::try_parse_from(["fproc", "--buffers", "0"]).is_err());
        assert!(Args::try_parse_from(["fproc", "--buffers", "100"]).is_err());
    }

    #[test]
    fn test_repeated_execute() {
        let args = Args::try_parse_from(["fproc", "-e", "list", "-e", "quit", "-q"]).unwrap();
        assert_eq!(args.execute, vec!["list", "quit"]);
        assert!(args.quiet);
        assert!(!args.no_color);
    }
}

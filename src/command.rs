//! Shell command parsing.
//!
//! Each input line is split on whitespace; the first word selects the
//! command and the rest are its arguments. Buffer numbers are 1-based.
//!
//! - `read FILE`: load FILE into the first free buffer
//! - `read-to FILE N`: load FILE into buffer N, if free
//! - `print N` / `print-full N`: print headers / whole records of buffer N
//! - `list`: show every buffer
//! - `write N FILE`: write buffer N to FILE
//! - `merge N1 N2`: merge buffer N1 into buffer N2
//! - `balance N`: rebalance buffer N
//! - `stats N`: size and height of buffer N
//! - `search-label N STRING` / `search-seq N STRING`: substring search
//! - `delete N` / `delete-all`: free buffers
//! - `help`, `credits`, `quit`

use std::path::PathBuf;

use thiserror::Error;

/// Commands understood by the shell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Load a file into the first free buffer
    Read(PathBuf),
    /// Load a file into a given buffer
    ReadTo { path: PathBuf, buffer: usize },
    /// Print headers in tree order
    Print(usize),
    /// Print whole records in tree order
    PrintFull(usize),
    /// List all buffers
    List,
    /// Write a buffer to a file
    Write { buffer: usize, path: PathBuf },
    /// Merge the first buffer into the second
    Merge { src: usize, dest: usize },
    /// Rebalance a buffer
    Balance(usize),
    /// Show size and height of a buffer
    Stats(usize),
    /// Search headers for a substring
    SearchLabel { buffer: usize, query: String },
    /// Search sequences for a substring
    SearchSeq { buffer: usize, query: String },
    /// Free a buffer
    Delete(usize),
    /// Free all buffers
    DeleteAll,
    Help,
    Credits,
    Quit,
}

/// Errors produced while parsing a command line.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    #[error("{what} required\nusage: {usage}")]
    MissingArgument {
        what: &'static str,
        usage: &'static str,
    },

    #[error("{0} is not a valid buffer number")]
    InvalidNumber(String),

    #[error("command not recognised: {0}")]
    Unknown(String),
}

/// Parses one input line. Blank lines yield `Ok(None)`.
pub fn parse_command(line: &str) -> Result<Option<Command>, CommandError> {
    let mut words = line.split_whitespace();
    let Some(verb) = words.next() else {
        return Ok(None);
    };
    let mut args = Args { words, usage: usage(verb) };

    let command = match verb {
        "quit" | "exit" | "q" => Command::Quit,
        "read" => Command::Read(args.path("input file")?),
        "read-to" => {
            let path = args.path("input file")?;
            let buffer = args.buffer("destination buffer")?;
            Command::ReadTo { path, buffer }
        }
        "print" => Command::Print(args.buffer("buffer number")?),
        "print-full" | "print-all" => Command::PrintFull(args.buffer("buffer number")?),
        "list" => Command::List,
        "write" => {
            let buffer = args.buffer("source buffer number")?;
            let path = args.path("output filename")?;
            Command::Write { buffer, path }
        }
        "merge" => {
            let src = args.buffer("source buffer number")?;
            let dest = args.buffer("destination buffer number")?;
            Command::Merge { src, dest }
        }
        "balance" => Command::Balance(args.buffer("buffer number")?),
        "stats" => Command::Stats(args.buffer("buffer number")?),
        "search-label" => {
            let buffer = args.buffer("source buffer number")?;
            let query = args.word("search string")?.to_string();
            Command::SearchLabel { buffer, query }
        }
        "search-seq" => {
            let buffer = args.buffer("source buffer number")?;
            let query = args.word("search string")?.to_string();
            Command::SearchSeq { buffer, query }
        }
        "delete" => Command::Delete(args.buffer("buffer number")?),
        "delete-all" => Command::DeleteAll,
        "help" => Command::Help,
        "credits" => Command::Credits,
        other => return Err(CommandError::Unknown(other.to_string())),
    };

    Ok(Some(command))
}

/// Usage line for a command word.
pub fn usage(verb: &str) -> &'static str {
    match verb {
        "read" => "read FILE",
        "read-to" => "read-to FILE N",
        "print" => "print N",
        "print-full" | "print-all" => "print-full N",
        "write" => "write N FILE",
        "merge" => "merge N1 N2",
        "balance" => "balance N",
        "stats" => "stats N",
        "search-label" => "search-label N STRING",
        "search-seq" => "search-seq N STRING",
        "delete" => "delete N",
        _ => "help",
    }
}

struct Args<'a> {
    words: std::str::SplitWhitespace<'a>,
    usage: &'static str,
}

impl<'a> Args<'a> {
    fn word(&mut self, what: &'static str) -> Result<&'a str, CommandError> {
        self.words.next().ok_or(CommandError::MissingArgument {
            what,
            usage: self.usage,
        })
    }

    fn path(&mut self, what: &'static str) -> Result<PathBuf, CommandError> {
        self.word(what).map(PathBuf::from)
    }

    fn buffer(&mut self, what: &'static str) -> Result<usize, CommandError> {
        let word = self.word(what)?;
        match word.parse::<usize>() {
            Ok(n) if n > 0 => Ok(n),
            _ => Err(CommandError::InvalidNumber(word.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(line: &str) -> Command {
        parse_command(line).unwrap().unwrap()
    }

    #[test]
    fn test_blank_line() {
        assert_eq!(parse_command("").unwrap(), None);
        assert_eq!(parse_command("   \t\n").unwrap(), None);
    }

    #[test]
    fn test_quit_aliases() {
        assert_eq!(parse("quit"), Command::Quit);
        assert_eq!(parse("exit"), Command::Quit);
        assert_eq!(parse("q\n"), Command::Quit);
    }

    #[test]
    fn test_read_commands() {
        assert_eq!(parse("read seqs.fa"), Command::Read(PathBuf::from("seqs.fa")));
        assert_eq!(
            parse("read-to seqs.fa 3"),
            Command::ReadTo {
                path: PathBuf::from("seqs.fa"),
                buffer: 3
            }
        );
    }

    #[test]
    fn test_buffer_commands() {
        assert_eq!(parse("print 1"), Command::Print(1));
        assert_eq!(parse("print-full 2"), Command::PrintFull(2));
        assert_eq!(parse("print-all 2"), Command::PrintFull(2));
        assert_eq!(parse("merge 1 2"), Command::Merge { src: 1, dest: 2 });
        assert_eq!(parse("balance 4"), Command::Balance(4));
        assert_eq!(parse("stats 4"), Command::Stats(4));
        assert_eq!(parse("delete 5"), Command::Delete(5));
        assert_eq!(
            parse("write 1 out.fa"),
            Command::Write {
                buffer: 1,
                path: PathBuf::from("out.fa")
            }
        );
    }

    #[test]
    fn test_search_commands() {
        assert_eq!(
            parse("search-label 1 human"),
            Command::SearchLabel {
                buffer: 1,
                query: "human".to_string()
            }
        );
        assert_eq!(
            parse("  search-seq\t2   ACGT  "),
            Command::SearchSeq {
                buffer: 2,
                query: "ACGT".to_string()
            }
        );
    }

    #[test]
    fn test_invalid_buffer_number() {
        assert_eq!(
            parse_command("print 0"),
            Err(CommandError::InvalidNumber("0".to_string()))
        );
        assert_eq!(
            parse_command("merge 1 two"),
            Err(CommandError::InvalidNumber("two".to_string()))
        );
    }

    #[test]
    fn test_missing_arguments() {
        assert_eq!(
            parse_command("write 1"),
            Err(CommandError::MissingArgument {
                what: "output filename",
                usage: "write N FILE"
            })
        );
        assert!(matches!(
            parse_command("search-seq 1"),
            Err(CommandError::MissingArgument { what: "search string", .. })
        ));
        assert!(matches!(
            parse_command("read"),
            Err(CommandError::MissingArgument { .. })
        ));
    }

    #[test]
    fn test_unknown_command() {
        assert_eq!(
            parse_command("frobnicate 1"),
            Err(CommandError::Unknown("frobnicate".to_string()))
        );
    }
}

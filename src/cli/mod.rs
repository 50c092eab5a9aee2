//! CLI module for the Elle front-end
//!
//! A developer tool for inspecting what the front-end makes of a source file. It never type-checks or
//! generates code.
//!
//! ## Commands
//!
//! - `lex <file>` - Print the token stream
//! - `parse <file>` - Print the syntax tree and any diagnostics
//! - `fmt <file>` - Print, check or rewrite the canonical form
//! - `deps <file>` - Follow `use` declarations and print the module graph
//!
//! ## Design
//!
//! Command functions return `CliResult<T>` instead of calling `process::exit`.
//! Only the top-level `run()` function handles errors and exits.

// Enforce explicit error handling - no panicking in production code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

pub mod commands;
pub mod fs_loader;

use std::fmt;
use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

use crate::parser::ParseOptions;
use crate::printer::PrintConfig;
use crate::version::ELLE_VERSION;

// ============================================================================
// CLI Error handling
// ============================================================================

/// Exit code for CLI operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExitCode(pub i32);

impl ExitCode {
    pub const SUCCESS: ExitCode = ExitCode(0);
    pub const FAILURE: ExitCode = ExitCode(1);
    /// Input is valid but not in canonical form (`fmt --check`).
    pub const UNFORMATTED: ExitCode = ExitCode(2);
}

/// Error type for CLI operations.
///
/// Contains a user-facing message and an exit code. The CLI entry point
/// catches these errors, prints the message, and exits with the code.
#[derive(Debug)]
pub struct CliError {
    /// User-facing error message (already formatted for display)
    pub message: String,
    /// Exit code to return to the shell
    pub exit_code: ExitCode,
}

impl CliError {
    pub fn new(message: impl Into<String>, exit_code: ExitCode) -> Self {
        Self {
            message: message.into(),
            exit_code,
        }
    }

    /// Create a failure error (exit code 1).
    pub fn failure(message: impl Into<String>) -> Self {
        Self::new(message, ExitCode::FAILURE)
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

/// Result type for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

// ============================================================================
// Clap CLI definition
// ============================================================================

/// Lexer, parser and formatter for the Elle language
#[derive(Parser, Debug)]
#[command(name = "elle")]
#[command(version = ELLE_VERSION)]
#[command(about = "Lexer, parser and formatter for the Elle language", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// Parser knobs shared by the commands that parse.
#[derive(clap::Args, Debug, Clone, Copy)]
pub struct ParseArgs {
    /// Maximum nesting depth before the parser gives up
    #[arg(long = "max-depth", value_name = "N", default_value_t = ParseOptions::default().max_depth)]
    pub max_depth: usize,
}

impl ParseArgs {
    pub fn options(&self) -> ParseOptions {
        ParseOptions::new().with_max_depth(self.max_depth)
    }
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print the token stream of a file
    Lex {
        #[arg(value_name = "FILE")]
        file: PathBuf,
        /// Print tokens re-rendered as source instead of one per line
        #[arg(long)]
        render: bool,
    },

    /// Parse a file and print its syntax tree
    Parse {
        #[arg(value_name = "FILE")]
        file: PathBuf,
        #[command(flatten)]
        parse: ParseArgs,
        /// Stop at the first error instead of resynchronizing
        #[arg(long = "no-recover")]
        no_recover: bool,
        /// Only report diagnostics
        #[arg(short, long)]
        quiet: bool,
    },

    /// Format an Elle source file (files containing comments are refused, never rewritten)
    Fmt {
        #[arg(value_name = "FILE")]
        file: PathBuf,
        /// Check formatting without printing or modifying the file
        #[arg(long, conflicts_with_all = ["write", "diff"])]
        check: bool,
        /// Rewrite the file in place
        #[arg(short, long, conflicts_with = "diff")]
        write: bool,
        /// Show the lines that would change
        #[arg(long)]
        diff: bool,
        /// Spaces per indentation level
        #[arg(long, value_name = "N", default_value_t = PrintConfig::default().indent_width)]
        indent: usize,
    },

    /// Load a file and everything it imports, then print the module graph
    Deps {
        #[arg(value_name = "FILE")]
        file: PathBuf,
        #[command(flatten)]
        parse: ParseArgs,
    },
}

// ============================================================================
// CLI entry point
// ============================================================================

/// Main CLI entry point.
///
/// This is the only place where `process::exit` is called. All command
/// implementations return `CliResult` and errors are handled here.
pub fn run() {
    let cli = Cli::parse();

    match execute(cli) {
        Ok(exit_code) => {
            if exit_code != ExitCode::SUCCESS {
                process::exit(exit_code.0);
            }
        }
        Err(e) => {
            if !e.message.is_empty() {
                eprintln!("{}", e.message);
            }
            process::exit(e.exit_code.0);
        }
    }
}

/// Execute the CLI command and return result.
pub fn execute(cli: Cli) -> CliResult<ExitCode> {
    match cli.command {
        Command::Lex { file, render } => commands::lex_file(&file, render),
        Command::Parse {
            file,
            parse,
            no_recover,
            quiet,
        } => commands::parse_file(&file, parse.options().with_recovery(!no_recover), quiet),
        Command::Fmt {
            file,
            check,
            write,
            diff,
            indent,
        } => {
            let mode = if check {
                commands::FmtMode::Check
            } else if write {
                commands::FmtMode::Write
            } else if diff {
                commands::FmtMode::Diff
            } else {
                commands::FmtMode::Print
            };
            commands::fmt_file(&file, mode, &PrintConfig::new().with_indent_width(indent))
        }
        Command::Deps { file, parse } => commands::deps_file(&file, parse.options()),
    }
}

// ============================================================================
// Tests
// ============================================================================

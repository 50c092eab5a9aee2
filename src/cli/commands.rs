//! CLI command implementations
//!
//! All command functions return `CliResult<ExitCode>` instead of calling
//! `process::exit`. Error handling and exits happen in the top-level `run()`.

use std::fmt::Write as _;
use std::fs;
use std::path::Path;

use tracing::debug;

use crate::diagnostics::{self, CompileError};
use crate::lexer;
use crate::loader::ModuleGraph;
use crate::parser::ParseOptions;
use crate::printer::{self, PrintConfig};

use super::fs_loader::{FsLoader, MAX_SOURCE_SIZE};
use super::{CliError, CliResult, ExitCode};

/// Read a source file, rejecting anything over [`MAX_SOURCE_SIZE`].
pub fn read_source(file_path: &Path) -> CliResult<String> {
    let metadata = fs::metadata(file_path)
        .map_err(|e| CliError::failure(format!("Cannot access file '{}': {}", file_path.display(), e)))?;

    if metadata.len() > MAX_SOURCE_SIZE {
        return Err(CliError::failure(format!(
            "Source file '{}' is too large ({} bytes, max {} bytes)",
            file_path.display(),
            metadata.len(),
            MAX_SOURCE_SIZE
        )));
    }

    fs::read_to_string(file_path)
        .map_err(|e| CliError::failure(format!("Error reading file '{}': {}", file_path.display(), e)))
}

/// Render every diagnostic with its source snippet.
pub fn render_diagnostics(errors: &[CompileError], file_name: &str, source: &str) -> String {
    let mut out = String::new();
    for error in errors {
        let _ = writeln!(out, "{:?}", diagnostics::report(error, file_name, source));
    }
    out
}

fn diagnostics_failure(errors: &[CompileError], file_name: &str, source: &str) -> CliError {
    let mut msg = render_diagnostics(errors, file_name, source);
    let _ = write!(msg, "{} error(s) in {file_name}", errors.len());
    CliError::failure(msg)
}

// ============================================================================
// lex
// ============================================================================

/// Print the token stream, one `line:column kind` entry per token, or re-rendered as source.
pub fn lex_file(file_path: &Path, render: bool) -> CliResult<ExitCode> {
    let source = read_source(file_path)?;
    let name = file_path.display().to_string();
    let tokens = lexer::lex(&source).map_err(|errs| diagnostics_failure(&errs, &name, &source))?;

    if render {
        println!("{}", lexer::render(&tokens));
    } else {
        for tok in &tokens {
            println!("{}:{}\t{:?}", tok.pos.line, tok.pos.column, tok.kind);
        }
    }
    Ok(ExitCode::SUCCESS)
}

// ============================================================================
// parse
// ============================================================================

/// Parse and display the AST.
///
/// With recovery on, the partial tree is printed even when diagnostics were reported; the command still
/// fails in that case.
pub fn parse_file(file_path: &Path, options: ParseOptions, quiet: bool) -> CliResult<ExitCode> {
    let source = read_source(file_path)?;
    let name = file_path.display().to_string();
    let output = crate::parse_source_with(&source, options);
    debug!(
        declarations = output.program.declarations.len(),
        errors = output.diagnostics.len(),
        "parsed {name}"
    );

    if !quiet {
        println!("{:#?}", output.program);
    }
    if output.has_errors() {
        return Err(diagnostics_failure(&output.diagnostics, &name, &source));
    }
    Ok(ExitCode::SUCCESS)
}

// ============================================================================
// fmt
// ============================================================================

/// What `fmt` does with the canonical form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FmtMode {
    /// Write it to stdout.
    Print,
    /// Report whether the file is already canonical.
    Check,
    /// Rewrite the file when it differs.
    Write,
    /// Show the differing lines.
    Diff,
}

pub fn fmt_file(file_path: &Path, mode: FmtMode, config: &PrintConfig) -> CliResult<ExitCode> {
    let source = read_source(file_path)?;
    let name = file_path.display().to_string();
    let fail = |errs: Vec<CompileError>| diagnostics_failure(&errs, &name, &source);

    match mode {
        FmtMode::Print => {
            let formatted = printer::format_source(&source, config).map_err(fail)?;
            print!("{formatted}");
            Ok(ExitCode::SUCCESS)
        }
        FmtMode::Check => {
            if printer::check_formatted(&source, config).map_err(fail)? {
                Ok(ExitCode::SUCCESS)
            } else {
                Err(CliError::new(format!("Would reformat: {name}"), ExitCode::UNFORMATTED))
            }
        }
        FmtMode::Write => {
            let formatted = printer::format_source(&source, config).map_err(fail)?;
            if formatted != source {
                fs::write(file_path, &formatted)
                    .map_err(|e| CliError::failure(format!("Error writing {name}: {e}")))?;
                println!("Formatted {name}");
            }
            Ok(ExitCode::SUCCESS)
        }
        FmtMode::Diff => {
            if let Some(diff) = printer::format_diff(&source, config).map_err(fail)? {
                println!("--- {name}");
                print!("{diff}");
            }
            Ok(ExitCode::SUCCESS)
        }
    }
}

// ============================================================================
// deps
// ============================================================================

/// Load `file_path` and everything it imports, print the graph in discovery order, then report
/// diagnostics and unresolved imports.
pub fn deps_file(file_path: &Path, options: ParseOptions) -> CliResult<ExitCode> {
    let source = read_source(file_path)?;
    let loader = FsLoader::for_entry(file_path);
    let root_name = file_path
        .file_stem()
        .and_then(|s| s.to_str())
        .ok_or_else(|| CliError::failure(format!("Invalid file name '{}'", file_path.display())))?;

    let graph = ModuleGraph::build_with(root_name, &source, &loader, options);
    print!("{}", describe_graph(&graph));

    if graph.is_clean() {
        return Ok(ExitCode::SUCCESS);
    }

    let mut msg = String::new();
    let mut count = 0;
    for (i, module) in graph.modules().iter().enumerate() {
        if module.diagnostics.is_empty() {
            continue;
        }
        let file_name = if i == 0 {
            file_path.display().to_string()
        } else {
            loader.file_for(&module.path).display().to_string()
        };
        msg.push_str(&render_diagnostics(&module.diagnostics, &file_name, &module.source));
        count += module.diagnostics.len();
    }
    for unresolved in graph.unresolved() {
        let report = miette::Report::new(unresolved.error.clone());
        let _ = writeln!(msg, "{report:?}  (imported by `{}`)", unresolved.importer);
        count += 1;
    }
    let _ = write!(msg, "{count} error(s) while loading {}", file_path.display());
    Err(CliError::failure(msg))
}

/// One line per module, followed by an indented `-> import` line per direct import.
pub fn describe_graph(graph: &ModuleGraph) -> String {
    let mut out = String::new();
    for module in graph.modules() {
        let _ = writeln!(
            out,
            "{} ({} declarations)",
            module.path,
            module.program.declarations.len()
        );
        for import in graph.imports_of(&module.path) {
            let _ = writeln!(out, "  -> {import}");
        }
    }
    out
}

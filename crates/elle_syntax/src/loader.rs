//! Module loading for multi-file Elle programs
//!
//! `use a/b/c;` names a module by a slash-separated path. Where the module's text comes from is up to a
//! [`ModuleLoader`]: [`MemoryLoader`] serves it from a map (tests, embedding), and the `elle` binary
//! reads it from disk.
//!
//! [`ModuleGraph::build`] starts at a root source, follows `use` declarations breadth-first and parses
//! every reachable module exactly once, so import cycles terminate.
//!
//! ## Examples
//! ```rust
//! use elle_syntax::loader::{MemoryLoader, ModuleGraph};
//!
//! let loader = MemoryLoader::new().with("util/math", "fn square(i32 x) -> i32 { return x * x; }");
//! let graph = ModuleGraph::build("main", "use util/math;\nfn main() {}", &loader);
//! assert_eq!(graph.modules().len(), 2);
//! assert!(graph.is_clean());
//! ```

use std::collections::{BTreeMap, HashSet, VecDeque};

use miette::Diagnostic;
use thiserror::Error;
use tracing::debug;

use crate::ast::{ModulePath, Program};
use crate::diagnostics::CompileError;
use crate::parser::ParseOptions;
use crate::{ParseOutput, parse_source_with};

/// Failure to produce a module's source text.
#[derive(Debug, Clone, PartialEq, Eq, Error, Diagnostic)]
pub enum LoadError {
    #[error("module `{0}` not found")]
    #[diagnostic(code(elle::load::not_found), help("check the `use` path"))]
    NotFound(ModulePath),

    #[error("cannot read module `{path}`: {message}")]
    #[diagnostic(code(elle::load::io))]
    Io { path: ModulePath, message: String },
}

/// Source provider for `use` paths.
pub trait ModuleLoader {
    /// Return the source text of the module at `path`.
    fn load(&self, path: &ModulePath) -> Result<String, LoadError>;
}

/// In-memory loader keyed by `a/b/c` paths.
#[derive(Debug, Clone, Default)]
pub struct MemoryLoader {
    sources: BTreeMap<String, String>,
}

impl MemoryLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, path: impl Into<String>, source: impl Into<String>) {
        self.sources.insert(path.into(), source.into());
    }

    /// Builder form of [`MemoryLoader::insert`].
    pub fn with(mut self, path: impl Into<String>, source: impl Into<String>) -> Self {
        self.insert(path, source);
        self
    }
}

impl ModuleLoader for MemoryLoader {
    fn load(&self, path: &ModulePath) -> Result<String, LoadError> {
        self.sources
            .get(&path.to_string())
            .cloned()
            .ok_or_else(|| LoadError::NotFound(path.clone()))
    }
}

/// One parsed module of a [`ModuleGraph`].
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedModule {
    pub path: ModulePath,
    pub source: String,
    pub program: Program,
    /// Lex and parse diagnostics for this module's source.
    pub diagnostics: Vec<CompileError>,
}

/// A `use` that could not be satisfied.
#[derive(Debug, Clone, PartialEq)]
pub struct UnresolvedImport {
    /// Module containing the `use`.
    pub importer: ModulePath,
    pub error: LoadError,
}

/// Every module reachable from a root, parsed once each.
#[derive(Debug, Clone, Default)]
pub struct ModuleGraph {
    /// Discovery order: the root first, then breadth-first over `use` declarations.
    modules: Vec<LoadedModule>,
    /// Direct imports per module, in source order and without duplicates.
    edges: BTreeMap<ModulePath, Vec<ModulePath>>,
    unresolved: Vec<UnresolvedImport>,
}

impl ModuleGraph {
    /// Parse `root_source` as module `root_name` and load everything it transitively imports.
    pub fn build(root_name: &str, root_source: &str, loader: &dyn ModuleLoader) -> ModuleGraph {
        Self::build_with(root_name, root_source, loader, ParseOptions::default())
    }

    /// [`ModuleGraph::build`] with explicit parser options for every module.
    #[tracing::instrument(skip_all, fields(root = root_name))]
    pub fn build_with(
        root_name: &str,
        root_source: &str,
        loader: &dyn ModuleLoader,
        options: ParseOptions,
    ) -> ModuleGraph {
        let root = ModulePath::from(root_name);
        let mut graph = ModuleGraph::default();
        let mut seen: HashSet<ModulePath> = HashSet::from([root.clone()]);
        let mut queue: VecDeque<(ModulePath, String)> = VecDeque::from([(root, root_source.to_string())]);

        while let Some((path, source)) = queue.pop_front() {
            let ParseOutput { program, diagnostics } = parse_source_with(&source, options);
            debug!(module = %path, errors = diagnostics.len(), "parsed module");

            let mut imports = Vec::new();
            for import in program.imports() {
                if imports.contains(import) {
                    continue;
                }
                imports.push(import.clone());
                if !seen.insert(import.clone()) {
                    continue;
                }
                match loader.load(import) {
                    Ok(text) => {
                        debug!(module = %import, importer = %path, "loading module");
                        queue.push_back((import.clone(), text));
                    }
                    Err(error) => {
                        debug!(module = %import, importer = %path, %error, "module failed to load");
                        graph.unresolved.push(UnresolvedImport {
                            importer: path.clone(),
                            error,
                        });
                    }
                }
            }

            graph.edges.insert(path.clone(), imports);
            graph.modules.push(LoadedModule {
                path,
                source,
                program,
                diagnostics,
            });
        }

        graph
    }

    /// Modules in discovery order, root first.
    pub fn modules(&self) -> &[LoadedModule] {
        &self.modules
    }

    pub fn root(&self) -> Option<&LoadedModule> {
        self.modules.first()
    }

    pub fn get(&self, path: &ModulePath) -> Option<&LoadedModule> {
        self.modules.iter().find(|m| &m.path == path)
    }

    /// Direct imports of `path`. Empty for unknown or unloaded modules.
    pub fn imports_of(&self, path: &ModulePath) -> &[ModulePath] {
        self.edges.get(path).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn unresolved(&self) -> &[UnresolvedImport] {
        &self.unresolved
    }

    /// No module has diagnostics and every import resolved.
    pub fn is_clean(&self) -> bool {
        self.unresolved.is_empty() && self.modules.iter().all(|m| m.diagnostics.is_empty())
    }
}

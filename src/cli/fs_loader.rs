//! Filesystem [`ModuleLoader`]: `use a/b/c;` reads `<root>/a/b/c.le`.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::ast::ModulePath;
use crate::loader::{LoadError, ModuleLoader};

/// File extension of Elle sources.
pub const SOURCE_EXTENSION: &str = "le";

/// Maximum source file size (100 MB)
///
/// Larger files are rejected before reading.
pub const MAX_SOURCE_SIZE: u64 = 100 * 1024 * 1024;

/// Resolves module paths relative to a root directory.
#[derive(Debug, Clone)]
pub struct FsLoader {
    root: PathBuf,
}

impl FsLoader {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Loader rooted at the directory containing `entry`.
    pub fn for_entry(entry: &Path) -> Self {
        let root = entry
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or(Path::new("."));
        Self::new(root)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// File a module path maps to. Does not check that it exists.
    pub fn file_for(&self, path: &ModulePath) -> PathBuf {
        let mut file = self.root.clone();
        for segment in path.segments() {
            file.push(segment);
        }
        file.set_extension(SOURCE_EXTENSION);
        file
    }
}

impl ModuleLoader for FsLoader {
    fn load(&self, path: &ModulePath) -> Result<String, LoadError> {
        let file = self.file_for(path);
        let io_error = |e: io::Error| match e.kind() {
            io::ErrorKind::NotFound => LoadError::NotFound(path.clone()),
            _ => LoadError::Io {
                path: path.clone(),
                message: e.to_string(),
            },
        };

        let metadata = fs::metadata(&file).map_err(io_error)?;
        if metadata.len() > MAX_SOURCE_SIZE {
            return Err(LoadError::Io {
                path: path.clone(),
                message: format!("file is too large ({} bytes, max {MAX_SOURCE_SIZE} bytes)", metadata.len()),
            });
        }
        fs::read_to_string(&file).map_err(io_error)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_file_for_nested_path() {
        let loader = FsLoader::new("/src");
        assert_eq!(loader.file_for(&ModulePath::from("std/io")), PathBuf::from("/src/std/io.le"));
    }

    #[test]
    fn test_for_entry_uses_parent_directory() {
        assert_eq!(FsLoader::for_entry(Path::new("proj/main.le")).root(), Path::new("proj"));
        assert_eq!(FsLoader::for_entry(Path::new("main.le")).root(), Path::new("."));
    }

    #[test]
    fn test_missing_file_is_not_found() {
        let loader = FsLoader::new(std::env::temp_dir().join("elle-fs-loader-missing"));
        let path = ModulePath::from("nope/never");
        assert_eq!(loader.load(&path), Err(LoadError::NotFound(path.clone())));
    }
}

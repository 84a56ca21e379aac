//! Project file index used to resolve local imports.

use std::path::{Path, PathBuf};
use tracing::debug;
use walkdir::{DirEntry, WalkDir};

/// Directory and file names never indexed.
pub const EXCLUDED: &[&str] = &[
    ".git",
    "node_modules",
    "dist",
    "build",
    "tmp",
    "temp",
    "logs",
    "log",
    "bin",
    "obj",
    "out",
    "lib",
    "target",
    "package-lock.json",
    ".env",
];

/// Every file below a root directory, in file-name order per directory.
#[derive(Debug, Clone, Default)]
pub struct FileIndex {
    files: Vec<PathBuf>,
}

fn is_excluded(entry: &DirEntry) -> bool {
    entry.depth() > 0
        && entry
            .file_name()
            .to_str()
            .is_some_and(|name| EXCLUDED.contains(&name))
}

/// File name up to its first dot: `api.client.ts` becomes `api`.
pub fn base_name(path: &Path) -> Option<&str> {
    path.file_name()
        .and_then(|n| n.to_str())
        .and_then(|n| n.split('.').next())
}

impl FileIndex {
    pub fn build(root: &Path) -> Self {
        let files: Vec<PathBuf> = WalkDir::new(root)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|e| !is_excluded(e))
            .filter_map(Result::ok)
            .filter(|e| e.file_type().is_file())
            .map(DirEntry::into_path)
            .collect();

        debug!(root = %root.display(), files = files.len(), "indexed project files");
        Self { files }
    }

    pub fn files(&self) -> &[PathBuf] {
        &self.files
    }

    /// First indexed file whose base name equals `stem`.
    pub fn find_by_base_name(&self, stem: &str) -> Option<&Path> {
        self.files
            .iter()
            .find(|path| base_name(path) == Some(stem))
            .map(PathBuf::as_path)
    }
}

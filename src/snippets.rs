use crate::core::error::GptermError;
use crate::extract::CodeSnippet;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Lower-case and drop spaces, hyphens and underscores.
pub fn sanitize(name: &str) -> String {
    name.chars()
        .filter(|c| !matches!(c, ' ' | '-' | '_'))
        .flat_map(char::to_lowercase)
        .collect()
}

/// Files in the snippet folder, in directory-listing order. A missing folder is empty.
pub fn list(folder: &Path) -> Result<Vec<PathBuf>, GptermError> {
    let entries = match fs::read_dir(folder) {
        Ok(entries) => entries,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(e.into()),
    };

    let mut files = Vec::new();
    for entry in entries {
        let entry = entry?;
        if entry.file_type()?.is_file() {
            files.push(entry.path());
        }
    }
    Ok(files)
}

/// Resolve a 1-based index or a fuzzy name against `entries`.
pub fn resolve<'a>(entries: &'a [PathBuf], query: &str) -> Result<&'a Path, GptermError> {
    let query = query.trim();

    if !query.is_empty() && query.chars().all(|c| c.is_ascii_digit()) {
        // Too many digits for usize is still past the end.
        let index = query.parse::<usize>().unwrap_or(usize::MAX);
        if index == 0 || index > entries.len() {
            return Err(GptermError::IndexOutOfRange {
                index,
                count: entries.len(),
            });
        }
        return Ok(&entries[index - 1]);
    }

    let wanted = sanitize(query);
    entries
        .iter()
        .find(|path| {
            crate::crawl::base_name(path).is_some_and(|name| sanitize(name) == wanted)
        })
        .map(PathBuf::as_path)
        .ok_or_else(|| GptermError::SnippetNotFound(query.to_string()))
}

/// Where `save` writes a snippet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveTarget {
    pub folder: PathBuf,
    pub file_name: String,
}

impl SaveTarget {
    /// - no argument: `<snippet_folder>/<snippetName>.<fileExtension>`
    /// - last component contains a dot: that component is the file name
    /// - otherwise the argument is a folder and the name comes from the snippet
    ///
    /// Relative arguments resolve against `active_dir`.
    pub fn resolve(
        snippet_folder: &Path,
        active_dir: &Path,
        argument: Option<&str>,
        snippet: &CodeSnippet,
    ) -> Self {
        let Some(argument) = argument.map(str::trim).filter(|a| !a.is_empty()) else {
            return Self {
                folder: snippet_folder.to_path_buf(),
                file_name: snippet.file_name(),
            };
        };

        let path = active_dir.join(argument);
        let explicit_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .filter(|n| n.contains('.'))
            .map(str::to_string);

        match explicit_name {
            Some(file_name) => Self {
                folder: path
                    .parent()
                    .map(Path::to_path_buf)
                    .unwrap_or_else(|| active_dir.to_path_buf()),
                file_name,
            },
            None => Self {
                folder: path,
                file_name: snippet.file_name(),
            },
        }
    }

    pub fn path(&self) -> PathBuf {
        self.folder.join(&self.file_name)
    }

    /// Create the folder if needed and write `contents`.
    pub fn write(&self, contents: &str) -> Result<PathBuf, GptermError> {
        let path = self.path();
        fs::create_dir_all(&self.folder).map_err(|source| GptermError::WriteFailed {
            path: self.folder.clone(),
            source,
        })?;
        fs::write(&path, contents).map_err(|source| GptermError::WriteFailed {
            path: path.clone(),
            source,
        })?;
        Ok(path)
    }
}

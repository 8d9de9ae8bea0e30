use anyhow::{Context, Result};
use log::debug;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

/// A source file handed to the generator: an identifier plus its full text.
///
/// The identifier is attached to every comment block of the file and ends
/// up as the router controller of the routes declared in it.
///
/// # Example
///
/// ```
/// use apidoc_swagger::source::SourceFile;
///
/// let file = SourceFile::new("controllers/items.js", "/** @api {get} /items List items */");
/// assert_eq!(file.identifier, "controllers/items.js");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SourceFile {
    /// Path of the file as discovered, used as the controller identifier
    pub identifier: String,
    /// Complete file contents
    pub content: String,
}

impl SourceFile {
    pub fn new(identifier: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            content: content.into(),
        }
    }
}

/// Reads a single source file.
///
/// # Errors
///
/// Returns an error if the file cannot be read or is not valid UTF-8.
pub fn load_file(path: &Path) -> Result<SourceFile> {
    debug!("Reading file: {}", path.display());

    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read file: {}", path.display()))?;

    debug!("Read {} bytes from {}", content.len(), path.display());
    Ok(SourceFile::new(path.display().to_string(), content))
}

/// Reads every file in order.
///
/// A file that cannot be read aborts the whole run.
///
/// # Errors
///
/// Returns the error of the first file that cannot be read.
pub fn load_files(paths: &[PathBuf]) -> Result<Vec<SourceFile>> {
    debug!("Reading {} files", paths.len());

    let files = paths
        .iter()
        .map(|path| load_file(path))
        .collect::<Result<Vec<_>>>()?;

    debug!(
        "Read {} files, {} bytes in total",
        files.len(),
        files.iter().map(|f| f.content.len()).sum::<usize>()
    );
    Ok(files)
}

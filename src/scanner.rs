use anyhow::{Context, Result};
use log::{debug, warn};
use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

/// Extensions scanned when none are configured.
pub const DEFAULT_EXTENSIONS: &[&str] = &["js", "go"];

/// Directory names never descended into.
const SKIPPED_DIRS: &[&str] = &["node_modules", "vendor"];

/// File scanner for controller directories.
///
/// Walks the tree in file-name order so the generated document does not
/// depend on the file system's directory listing order. Hidden directories
/// and dependency folders (`node_modules`, `vendor`) are skipped.
///
/// # Example
///
/// ```no_run
/// use apidoc_swagger::scanner::FileScanner;
/// use std::path::PathBuf;
///
/// let scanner = FileScanner::new(PathBuf::from("./controllers"));
/// let result = scanner.scan().unwrap();
/// println!("Found {} source files", result.source_files.len());
/// ```
pub struct FileScanner {
    root_path: PathBuf,
    extensions: Vec<String>,
}

/// Result of directory scanning operation.
pub struct ScanResult {
    /// Matching files, in traversal order
    pub source_files: Vec<PathBuf>,
    /// Warning messages for entries that could not be accessed
    pub warnings: Vec<String>,
}

impl FileScanner {
    /// Scanner for `root_path` with the default `js`/`go` extensions
    pub fn new(root_path: PathBuf) -> Self {
        Self {
            root_path,
            extensions: DEFAULT_EXTENSIONS.iter().map(|e| e.to_string()).collect(),
        }
    }

    /// Replace the scanned extensions. Leading dots are ignored, an empty list keeps the defaults.
    pub fn with_extensions<I, S>(mut self, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let extensions: Vec<String> = extensions
            .into_iter()
            .map(|e| e.as_ref().trim_start_matches('.').to_ascii_lowercase())
            .filter(|e| !e.is_empty())
            .collect();
        if !extensions.is_empty() {
            self.extensions = extensions;
        }
        self
    }

    pub fn extensions(&self) -> &[String] {
        &self.extensions
    }

    fn is_skipped_dir(&self, entry: &DirEntry) -> bool {
        // the root itself is never filtered
        if entry.depth() == 0 || !entry.file_type().is_dir() {
            return false;
        }
        let file_name = entry.file_name().to_string_lossy();
        file_name.starts_with('.') || SKIPPED_DIRS.iter().any(|d| *d == file_name)
    }

    fn has_wanted_extension(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|s| s.to_str())
            .is_some_and(|ext| self.extensions.iter().any(|e| e.eq_ignore_ascii_case(ext)))
    }

    /// Scans the directory tree and collects every file with a wanted extension.
    ///
    /// Entries that cannot be accessed are logged and recorded as warnings;
    /// scanning continues past them.
    ///
    /// # Errors
    ///
    /// Returns an error if the root directory cannot be accessed.
    pub fn scan(&self) -> Result<ScanResult> {
        std::fs::metadata(&self.root_path)
            .with_context(|| format!("Failed to access directory: {}", self.root_path.display()))?;
        debug!(
            "Scanning {} for extensions {:?}",
            self.root_path.display(),
            self.extensions
        );

        let mut source_files = Vec::new();
        let mut warnings = Vec::new();

        for entry in WalkDir::new(&self.root_path)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|e| !self.is_skipped_dir(e))
        {
            match entry {
                Ok(entry) => {
                    let path = entry.path();
                    if entry.file_type().is_file() && self.has_wanted_extension(path) {
                        source_files.push(path.to_path_buf());
                    }
                }
                Err(e) => {
                    let warning = format!("Failed to access path: {}", e);
                    warn!("{}", warning);
                    warnings.push(warning);
                }
            }
        }

        debug!("Found {} source files", source_files.len());
        Ok(ScanResult {
            source_files,
            warnings,
        })
    }
}

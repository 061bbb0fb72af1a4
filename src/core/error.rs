//! Error types for the docs library and the shell bridge

use std::path::PathBuf;

use thiserror::Error;

/// Errors produced while indexing or watching a docs directory.
#[derive(Error, Debug)]
pub enum DocsError {
    /// Wrapper for underlying IO errors.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Directory traversal failed.
    #[error("Failed to walk docs directory: {0}")]
    Walk(#[from] walkdir::Error),

    /// The file watcher could not be set up.
    #[error("Failed to watch docs directory: {0}")]
    Watch(#[from] notify::Error),

    /// The docs root is missing or is a file.
    #[error("Not a directory: {}", .0.display())]
    NotADirectory(PathBuf),

    /// A document could not be read as text.
    #[error("Failed to read document `{}`: {message}", path.display())]
    Parse { path: PathBuf, message: String },
}

/// Errors from queries against the desktop shell.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ShellError {
    /// The shell does not implement this query.
    #[error("shell query not supported")]
    Unsupported,

    /// The shell has not reported the value yet.
    #[error("shell state not available yet")]
    Unavailable,
}

//! Error types for yurtle_core operations.

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Core error type for whole-operation failures.
///
/// Per-file problems during `sync` and `flush` are not raised through this
/// type; they are collected as [`FileError`] values in the operation report.
#[derive(Error, Debug)]
pub enum YurtleError {
    /// Configuration could not be loaded or is invalid.
    #[error("configuration error: {0}")]
    Config(String),

    /// The workspace root does not exist or is not a directory.
    #[error("workspace root not found: {}", .0.display())]
    RootNotFound(PathBuf),

    /// A path could not be expressed as a `file://` URI (or back).
    #[error("invalid file URI: {0}")]
    InvalidFileUri(String),

    /// Invalid hex string for digest parsing.
    #[error("invalid hex string: {0}")]
    InvalidHex(String),

    /// The index snapshot could not be read or decoded.
    #[error("index corrupted at {}: {}", path.display(), reason)]
    IndexCorrupt {
        /// Path to the snapshot file
        path: PathBuf,
        /// Description of the corruption
        reason: String,
    },

    /// Serialization error while writing the index snapshot.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// Error while walking the workspace directory tree.
    #[error("workspace scan error: {0}")]
    Scan(String),

    /// I/O error during file operations.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl YurtleError {
    /// Returns a user-friendly recovery suggestion for the error, if available.
    pub fn recovery_suggestion(&self) -> Option<&'static str> {
        match self {
            Self::Config(_) => {
                Some("Check the patterns and index_file entries in yurtle.toml.")
            }
            Self::RootNotFound(_) => Some("Pass an existing directory with --root."),
            Self::IndexCorrupt { .. } => {
                Some("Delete the index snapshot; the next sync re-reads every file.")
            }
            _ => None,
        }
    }
}

/// Convenience Result type for yurtle_core operations.
pub type Result<T> = std::result::Result<T, YurtleError>;

/// Classification of a per-file failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FileErrorKind {
    /// Header content (or the file encoding) could not be parsed.
    /// The file's previous triples stay in the cache.
    ParseFailure,
    /// The file could not be read or stat-ed. Its digest is unknown, so the
    /// next sync retries it.
    UnreadableFile,
    /// Writing the file during flush failed. The file stays dirty.
    WriteFailure,
    /// A flush was requested for a file with no primary subject.
    Unanchored,
}

impl fmt::Display for FileErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::ParseFailure => "parse failure",
            Self::UnreadableFile => "unreadable file",
            Self::WriteFailure => "write failure",
            Self::Unanchored => "unanchored",
        };
        f.write_str(name)
    }
}

/// A failure isolated to a single file.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind} in {}: {message}", path.display())]
pub struct FileError {
    /// The file the failure applies to.
    pub path: PathBuf,
    /// What went wrong.
    pub kind: FileErrorKind,
    /// Human-readable detail.
    pub message: String,
}

impl FileError {
    pub(crate) fn new(
        path: impl Into<PathBuf>,
        kind: FileErrorKind,
        message: impl fmt::Display,
    ) -> Self {
        Self {
            path: path.into(),
            kind,
            message: message.to_string(),
        }
    }
}

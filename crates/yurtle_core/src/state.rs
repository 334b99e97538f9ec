//! Per-file bookkeeping.

use crate::digest::ContentDigest;
use crate::term::Term;
use std::path::{Path, PathBuf};

/// What the store knows about one workspace file.
#[derive(Debug, Clone, PartialEq)]
pub struct FileState {
    /// Absolute path of the file.
    pub path: PathBuf,
    /// Digest of the bytes last read from or written to disk.
    pub digest: ContentDigest,
    /// Modification time observed at that read or write, in seconds since
    /// the Unix epoch.
    pub last_modified: f64,
    /// Number of owned triples, provenance excluded.
    pub triple_count: usize,
    /// The subject this file owns.
    pub primary_subject: Option<Term>,
    /// The cache may hold edits not yet written to this file.
    pub dirty: bool,
    /// Everything after the header block, re-emitted on flush.
    pub preserved_body: String,
    /// Read into the cache during this process. Never persisted.
    pub(crate) hydrated: bool,
}

impl FileState {
    /// A record for a file that has an owner but has not been read or
    /// written yet.
    pub(crate) fn pending(path: &Path, subject: Term) -> Self {
        Self {
            path: path.to_path_buf(),
            digest: ContentDigest::unknown(),
            last_modified: 0.0,
            triple_count: 0,
            primary_subject: Some(subject),
            dirty: true,
            preserved_body: String::new(),
            hydrated: true,
        }
    }

    /// Returns true if the file was read into the cache during this process.
    pub fn is_hydrated(&self) -> bool {
        self.hydrated
    }

    /// Returns true if a file with `digest` can be skipped by a sync pass.
    pub(crate) fn is_current(&self, digest: &ContentDigest) -> bool {
        self.hydrated && !self.dirty && self.digest.matches(digest)
    }
}

//! Persistent snapshot of per-file records.
//!
//! The snapshot is a single JSON document at the workspace root. It records
//! what the store last knew about each file so a later process can tell which
//! files changed while it was not running. It never holds triples: the files
//! stay the source of truth for the cache.

use crate::atomic::atomic_write;
use crate::digest::ContentDigest;
use crate::error::{Result, YurtleError};
use crate::state::FileState;
use crate::term::Term;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};

/// Snapshot schema version.
pub const INDEX_SCHEMA_VERSION: u32 = 1;

/// Default snapshot file name, relative to the workspace root.
pub const DEFAULT_INDEX_FILE: &str = ".yurtle-store-index.json";

/// One file's entry in the snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndexEntry {
    pub digest: ContentDigest,
    /// Seconds since the Unix epoch.
    pub last_modified: f64,
    pub triple_count: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub primary_subject: Option<String>,
    #[serde(default)]
    pub preserved_body: String,
}

/// The on-disk snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndexSnapshot {
    pub version: u32,
    /// RFC 3339 timestamp of the last save.
    pub updated_at: String,
    pub root_dir: String,
    /// Keyed by path relative to `root_dir`, `/`-separated.
    pub files: BTreeMap<String, IndexEntry>,
}

/// Path of `path` relative to `root`, with `/` separators.
fn relative_key(root: &Path, path: &Path) -> String {
    let rel = path.strip_prefix(root).unwrap_or(path);
    rel.components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}

impl IndexSnapshot {
    /// Builds a snapshot of the given records.
    pub fn from_states<'a>(root: &Path, states: impl IntoIterator<Item = &'a FileState>) -> Self {
        let files = states
            .into_iter()
            .map(|state| {
                let entry = IndexEntry {
                    digest: state.digest,
                    last_modified: state.last_modified,
                    triple_count: state.triple_count,
                    primary_subject: state
                        .primary_subject
                        .as_ref()
                        .and_then(Term::as_iri)
                        .map(str::to_string),
                    preserved_body: state.preserved_body.clone(),
                };
                (relative_key(root, &state.path), entry)
            })
            .collect();

        Self {
            version: INDEX_SCHEMA_VERSION,
            updated_at: chrono::Utc::now().to_rfc3339(),
            root_dir: root.to_string_lossy().into_owned(),
            files,
        }
    }

    /// Restores records relative to `root`. Restored records are clean and
    /// not hydrated.
    pub fn into_states(self, root: &Path) -> Vec<FileState> {
        self.files
            .into_iter()
            .map(|(rel, entry)| FileState {
                path: rel.split('/').fold(root.to_path_buf(), |p, part| p.join(part)),
                digest: entry.digest,
                last_modified: entry.last_modified,
                triple_count: entry.triple_count,
                primary_subject: entry.primary_subject.map(Term::Iri),
                dirty: false,
                preserved_body: entry.preserved_body,
                hydrated: false,
            })
            .collect()
    }

    /// Loads a snapshot. Returns `Ok(None)` when the file does not exist.
    ///
    /// # Errors
    ///
    /// Returns `IndexCorrupt` if the file cannot be read, is not valid JSON
    /// for this schema, or carries another schema version.
    pub fn load(path: &Path) -> Result<Option<Self>> {
        let bytes = match fs::read(path) {
            Ok(b) => b,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(YurtleError::IndexCorrupt {
                    path: path.to_path_buf(),
                    reason: e.to_string(),
                })
            }
        };

        let snapshot: Self =
            serde_json::from_slice(&bytes).map_err(|e| YurtleError::IndexCorrupt {
                path: path.to_path_buf(),
                reason: e.to_string(),
            })?;

        if snapshot.version != INDEX_SCHEMA_VERSION {
            return Err(YurtleError::IndexCorrupt {
                path: path.to_path_buf(),
                reason: format!(
                    "unsupported schema version {} (expected {})",
                    snapshot.version, INDEX_SCHEMA_VERSION
                ),
            });
        }

        Ok(Some(snapshot))
    }

    /// Writes the snapshot atomically.
    pub fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_vec_pretty(self)
            .map_err(|e| YurtleError::Serialization(e.to_string()))?;
        atomic_write(path, &json)?;
        Ok(())
    }
}

/// Outcome of loading the snapshot when a store is opened.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IndexLoad {
    /// No snapshot existed.
    Missing,
    /// A snapshot with this many file records was restored.
    Loaded(usize),
    /// The snapshot was unusable and ignored.
    Discarded(String),
}

impl IndexLoad {
    pub(crate) fn resolve(path: &Path) -> (Self, Option<IndexSnapshot>) {
        match IndexSnapshot::load(path) {
            Ok(None) => (Self::Missing, None),
            Ok(Some(snapshot)) => (Self::Loaded(snapshot.files.len()), Some(snapshot)),
            Err(e) => (Self::Discarded(e.to_string()), None),
        }
    }
}

/// Absolute path of the snapshot inside `root`.
pub(crate) fn index_path(root: &Path, file_name: &str) -> PathBuf {
    root.join(file_name)
}

//! The file-backed triple store.
//!
//! A [`YurtleStore`] keeps a directory of Yurtle documents and an in-memory
//! triple cache in step. Each file owns the triples of one primary subject,
//! linked to the file by a `prov:definedIn` triple. `sync` pulls file
//! changes into the cache, `add`/`remove` edit the cache and mark owning
//! files dirty, and `flush` writes dirty files back.

use crate::atomic::{atomic_write, mtime_secs};
use crate::config::StoreConfig;
use crate::digest::ContentDigest;
use crate::document::{DocumentCodec, YurtleCodec};
use crate::error::{FileError, FileErrorKind, Result, YurtleError};
use crate::graph::TripleCache;
use crate::index::{index_path, IndexLoad, IndexSnapshot};
use crate::namespaces::defined_in;
use crate::scan::scan_workspace;
use crate::state::FileState;
use crate::term::{Term, Triple, TriplePattern};
use crate::uri::{file_uri_to_path, path_to_file_uri};
use globset::GlobSet;
use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Result of a [`YurtleStore::sync`] pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncReport {
    /// Files parsed into the cache.
    pub read: Vec<PathBuf>,
    /// Of `read`, files whose content matched the loaded index snapshot and
    /// were only read to populate this process's cache.
    pub rehydrated: usize,
    /// Files that no longer exist and were dropped.
    pub removed: Vec<PathBuf>,
    /// Files skipped because their digest was unchanged.
    pub skipped: usize,
    /// Per-file failures. The affected files keep their previous state.
    pub failures: Vec<FileError>,
}

impl SyncReport {
    /// Number of files read or removed.
    pub fn touched(&self) -> usize {
        self.read.len() + self.removed.len()
    }
}

/// Result of a flush.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FlushReport {
    /// Files written.
    pub written: Vec<PathBuf>,
    /// Files that could not be written. They stay dirty.
    pub failures: Vec<FileError>,
}

/// Which file, if any, took responsibility for an added triple.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Ownership {
    /// The subject is defined in this file, which is now dirty.
    File(PathBuf),
    /// No file owns the subject. The triple lives only in the cache.
    Unanchored,
    /// Blank node subjects are not tracked.
    BlankSubject,
}

/// Result of [`YurtleStore::add`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddReport {
    /// False if the triple was already cached.
    pub inserted: bool,
    pub ownership: Ownership,
    /// Set when auto-flush wrote the owning file.
    pub flushed: Option<FlushReport>,
}

/// Result of [`YurtleStore::remove`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RemoveReport {
    /// Number of triples removed from the cache.
    pub removed: usize,
    /// Files marked dirty by the removal.
    pub dirtied: Vec<PathBuf>,
    /// Set when auto-flush ran.
    pub flushed: Option<FlushReport>,
}

/// Summary counters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreStats {
    pub root_dir: PathBuf,
    pub patterns: Vec<String>,
    pub auto_flush: bool,
    pub total_files: usize,
    pub dirty_files: usize,
    pub total_triples: usize,
}

enum ReadOutcome {
    Skipped,
    Read { rehydrated: bool },
}

/// A directory of Yurtle documents viewed as one graph.
///
/// # Examples
///
/// ```
/// use yurtle_core::{namespaces::YURTLE, Term, Triple, TriplePattern, YurtleStore};
///
/// let dir = tempfile::tempdir().unwrap();
/// std::fs::write(
///     dir.path().join("task1.md"),
///     "---\n<urn:task:task1> yurtle:title \"Task One\" .\n---\n# Task One\n",
/// )
/// .unwrap();
///
/// let mut store = YurtleStore::open(dir.path()).unwrap();
/// assert_eq!(store.sync().unwrap().touched(), 1);
///
/// let task = Term::iri("urn:task:task1");
/// store
///     .add(Triple::new(task.clone(), YURTLE.term("note"), Term::plain("hi")))
///     .unwrap();
/// assert_eq!(store.flush().unwrap().written.len(), 1);
/// assert_eq!(
///     store.triples(&TriplePattern::any().with_subject(task)).len(),
///     3 // title, note, provenance
/// );
/// ```
pub struct YurtleStore {
    root: PathBuf,
    config: StoreConfig,
    patterns: GlobSet,
    index_path: PathBuf,
    index_load: IndexLoad,
    codec: Box<dyn DocumentCodec>,
    cache: TripleCache,
    files: BTreeMap<PathBuf, FileState>,
    dirty: BTreeSet<PathBuf>,
}

impl YurtleStore {
    /// Opens a workspace with the configuration from its `yurtle.toml`.
    ///
    /// The cache starts empty; call [`sync`](Self::sync) to read the files.
    ///
    /// # Errors
    ///
    /// Returns `RootNotFound` if the root is not a directory, or `Config` if
    /// the configuration is invalid.
    pub fn open(root: impl AsRef<Path>) -> Result<Self> {
        let root = root.as_ref();
        if !root.is_dir() {
            return Err(YurtleError::RootNotFound(root.to_path_buf()));
        }
        let config = StoreConfig::load(root)?;
        Self::open_with_config(root, config)
    }

    /// Opens a workspace with an explicit configuration.
    pub fn open_with_config(root: impl AsRef<Path>, config: StoreConfig) -> Result<Self> {
        let root = fs::canonicalize(root.as_ref())
            .map_err(|_| YurtleError::RootNotFound(root.as_ref().to_path_buf()))?;
        if !root.is_dir() {
            return Err(YurtleError::RootNotFound(root));
        }
        config.validate()?;
        let patterns = config.glob_set()?;
        let index_path = index_path(&root, &config.index_file);

        let (index_load, snapshot) = IndexLoad::resolve(&index_path);
        if let IndexLoad::Discarded(reason) = &index_load {
            warn!(path = %index_path.display(), %reason, "ignoring unusable index snapshot");
        }
        let files = snapshot
            .map(|s| s.into_states(&root))
            .unwrap_or_default()
            .into_iter()
            .map(|state| (state.path.clone(), state))
            .collect();

        debug!(root = %root.display(), auto_flush = config.auto_flush, "opened store");

        Ok(Self {
            root,
            config,
            patterns,
            index_path,
            index_load,
            codec: Box::new(YurtleCodec),
            cache: TripleCache::new(),
            files,
            dirty: BTreeSet::new(),
        })
    }

    /// Replaces the document codec.
    pub fn with_codec(mut self, codec: impl DocumentCodec + 'static) -> Self {
        self.codec = Box::new(codec);
        self
    }

    /// The canonical workspace root.
    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// Path of the index snapshot.
    pub fn index_path(&self) -> &Path {
        &self.index_path
    }

    /// How the index snapshot was loaded when the store was opened.
    pub fn index_load(&self) -> &IndexLoad {
        &self.index_load
    }

    // === Sync ===

    /// Reconciles the cache with the files on disk.
    ///
    /// Changed, new, dirty and not-yet-hydrated files are read; files that
    /// disappeared are removed from the cache. Per-file problems are
    /// reported, not raised.
    ///
    /// # Errors
    ///
    /// Fails only if the root cannot be scanned or the index cannot be
    /// saved.
    pub fn sync(&mut self) -> Result<SyncReport> {
        let present = scan_workspace(&self.root, &self.patterns)?;
        let mut report = SyncReport::default();

        for path in &present {
            match self.read_file(path) {
                Ok(ReadOutcome::Skipped) => report.skipped += 1,
                Ok(ReadOutcome::Read { rehydrated }) => {
                    if rehydrated {
                        report.rehydrated += 1;
                    }
                    report.read.push(path.clone());
                }
                Err(e) => {
                    warn!(path = %e.path.display(), kind = %e.kind, error = %e.message, "skipping file");
                    report.failures.push(e);
                }
            }
        }

        let present: BTreeSet<&PathBuf> = present.iter().collect();
        let gone: Vec<PathBuf> = self
            .files
            .keys()
            .filter(|p| !present.contains(p))
            .cloned()
            .collect();
        for path in gone {
            self.remove_file(&path);
            report.removed.push(path);
        }

        if report.touched() > 0 {
            self.save_index()?;
        }

        info!(
            read = report.read.len(),
            removed = report.removed.len(),
            skipped = report.skipped,
            failed = report.failures.len(),
            "sync complete"
        );
        Ok(report)
    }

    fn read_file(&mut self, path: &Path) -> std::result::Result<ReadOutcome, FileError> {
        let unreadable = |e: &dyn std::fmt::Display| {
            FileError::new(path, FileErrorKind::UnreadableFile, e)
        };
        let meta = fs::metadata(path).map_err(|e| unreadable(&e))?;
        let bytes = fs::read(path).map_err(|e| unreadable(&e))?;
        let digest = ContentDigest::of(&bytes);

        let previous = self.files.get(path);
        if previous.map_or(false, |s| s.is_current(&digest)) {
            return Ok(ReadOutcome::Skipped);
        }
        let rehydrated = previous.map_or(false, |s| !s.hydrated && s.digest.matches(&digest));

        let text = std::str::from_utf8(&bytes)
            .map_err(|e| FileError::new(path, FileErrorKind::ParseFailure, e))?;
        let doc = self
            .codec
            .parse(text, path)
            .map_err(|e| FileError::new(path, FileErrorKind::ParseFailure, e))?;
        let file_uri = Term::Iri(path_to_file_uri(path).map_err(|e| unreadable(&e))?);

        self.strip_file(&file_uri);
        let owned = doc
            .triples
            .iter()
            .filter(|t| Some(&t.subject) == doc.subject.as_ref())
            .count();
        self.cache.extend(doc.triples);
        if let Some(subject) = &doc.subject {
            self.cache
                .insert(Triple::new(subject.clone(), defined_in(), file_uri));
        }

        debug!(path = %path.display(), triples = owned, "read file");
        self.dirty.remove(path);
        self.files.insert(
            path.to_path_buf(),
            FileState {
                path: path.to_path_buf(),
                digest,
                last_modified: mtime_secs(&meta),
                triple_count: owned,
                primary_subject: doc.subject,
                dirty: false,
                preserved_body: doc.body,
                hydrated: true,
            },
        );
        Ok(ReadOutcome::Read { rehydrated })
    }

    /// Removes every triple a file contributed: all triples of the subjects
    /// linked to it, then any links that remain.
    fn strip_file(&mut self, file_uri: &Term) -> usize {
        let predicate = defined_in();
        let mut removed = 0;
        for subject in self.cache.subjects(&predicate, file_uri) {
            removed += self.cache.remove_subject(&subject);
        }
        for subject in self.cache.subjects(&predicate, file_uri) {
            if self
                .cache
                .remove(&Triple::new(subject, predicate.clone(), file_uri.clone()))
            {
                removed += 1;
            }
        }
        removed
    }

    fn remove_file(&mut self, path: &Path) {
        match path_to_file_uri(path) {
            Ok(uri) => {
                let removed = self.strip_file(&Term::Iri(uri));
                debug!(path = %path.display(), triples = removed, "removed file");
            }
            Err(e) => warn!(path = %path.display(), error = %e, "cannot strip triples of removed file"),
        }
        self.files.remove(path);
        self.dirty.remove(path);
    }

    // === Ownership ===

    /// The first provenance link of `subject` that names a file under the
    /// root. Links pointing elsewhere are never written through.
    fn owning_file(&self, subject: &Term) -> Option<(PathBuf, Term)> {
        self.cache
            .objects(subject, &defined_in())
            .into_iter()
            .find_map(|object| {
                let path = file_uri_to_path(object.as_iri()?).ok()?;
                if !self.is_under_root(&path) {
                    warn!(%subject, path = %path.display(), "provenance link outside the root ignored");
                    return None;
                }
                Some((path, object))
            })
    }

    fn is_under_root(&self, path: &Path) -> bool {
        path.starts_with(&self.root)
            && !path
                .components()
                .any(|c| matches!(c, std::path::Component::ParentDir))
    }

    /// Returns the file that defines `subject`, if any.
    ///
    /// Only an existing provenance link counts; file names are never guessed
    /// from the subject.
    pub fn resolve_file(&self, subject: &Term) -> Option<PathBuf> {
        self.owning_file(subject).map(|(path, _)| path)
    }

    /// Same as [`resolve_file`](Self::resolve_file).
    pub fn file_for_subject(&self, subject: &Term) -> Option<PathBuf> {
        self.resolve_file(subject)
    }

    fn mark_dirty(&mut self, path: &Path, subject: &Term) {
        self.files
            .entry(path.to_path_buf())
            .and_modify(|state| state.dirty = true)
            .or_insert_with(|| FileState::pending(path, subject.clone()));
        self.dirty.insert(path.to_path_buf());
    }

    // === Mutation ===

    /// Adds a triple and marks the file that owns its subject dirty.
    ///
    /// A subject with no provenance link leaves the triple unanchored: it
    /// is cached but no file will ever hold it.
    pub fn add(&mut self, triple: Triple) -> Result<AddReport> {
        let inserted = self.cache.insert(triple.clone());
        let subject = &triple.subject;

        let ownership = match subject {
            Term::Blank(_) => Ownership::BlankSubject,
            Term::Iri(_) => match self.owning_file(subject) {
                Some((path, file_uri)) => {
                    self.cache
                        .insert(Triple::new(subject.clone(), defined_in(), file_uri));
                    self.mark_dirty(&path, subject);
                    Ownership::File(path)
                }
                None => {
                    warn!(%subject, "no file defines subject; triple is unanchored");
                    Ownership::Unanchored
                }
            },
            Term::Literal(_) => {
                warn!(%subject, "literal subject; triple is unanchored");
                Ownership::Unanchored
            }
        };

        let flushed = match &ownership {
            Ownership::File(path) if self.config.auto_flush => Some(self.flush_one(path)?),
            _ => None,
        };

        Ok(AddReport {
            inserted,
            ownership,
            flushed,
        })
    }

    /// Removes every triple matching `pattern` and marks the owning files
    /// dirty.
    pub fn remove(&mut self, pattern: &TriplePattern) -> Result<RemoveReport> {
        let matches = self.cache.matching(pattern);

        // Owners are resolved before anything is removed, so dropping a
        // subject's provenance link in the same batch still finds its file.
        let mut owners: BTreeMap<PathBuf, Term> = BTreeMap::new();
        for triple in &matches {
            if triple.subject.is_iri() {
                if let Some(path) = self.resolve_file(&triple.subject) {
                    owners.entry(path).or_insert_with(|| triple.subject.clone());
                }
            }
        }

        for triple in &matches {
            self.cache.remove(triple);
        }
        for (path, subject) in &owners {
            self.mark_dirty(path, subject);
        }

        let flushed = if self.config.auto_flush && !self.dirty.is_empty() {
            Some(self.flush()?)
        } else {
            None
        };

        debug!(removed = matches.len(), dirtied = owners.len(), "removed triples");
        Ok(RemoveReport {
            removed: matches.len(),
            dirtied: owners.into_keys().collect(),
            flushed,
        })
    }

    // === Flush ===

    /// Writes every dirty file.
    ///
    /// # Errors
    ///
    /// Per-file write problems are reported in the [`FlushReport`]; only a
    /// failure to save the index is an error.
    pub fn flush(&mut self) -> Result<FlushReport> {
        let pending: Vec<PathBuf> = self.dirty.iter().cloned().collect();
        let mut report = FlushReport::default();
        for path in pending {
            self.flush_into(&path, &mut report);
        }
        if !report.written.is_empty() {
            self.save_index()?;
        }
        if !report.written.is_empty() || !report.failures.is_empty() {
            info!(
                written = report.written.len(),
                failed = report.failures.len(),
                "flush complete"
            );
        }
        Ok(report)
    }

    /// Writes a single file, dirty or not.
    pub fn flush_one(&mut self, path: &Path) -> Result<FlushReport> {
        let mut report = FlushReport::default();
        self.flush_into(path, &mut report);
        if !report.written.is_empty() {
            self.save_index()?;
        }
        Ok(report)
    }

    fn flush_into(&mut self, path: &Path, report: &mut FlushReport) {
        match self.write_file(path) {
            Ok(()) => report.written.push(path.to_path_buf()),
            Err(e) => {
                warn!(path = %e.path.display(), kind = %e.kind, error = %e.message, "flush failed");
                report.failures.push(e);
            }
        }
    }

    fn write_file(&mut self, path: &Path) -> std::result::Result<(), FileError> {
        let Some(state) = self.files.get(path) else {
            return Err(FileError::new(path, FileErrorKind::Unanchored, "no record for file"));
        };
        let Some(subject) = state.primary_subject.clone() else {
            return Err(FileError::new(path, FileErrorKind::Unanchored, "file has no primary subject"));
        };

        let provenance = defined_in();
        let owned: Vec<Triple> = self
            .cache
            .matching(&TriplePattern::any().with_subject(subject.clone()))
            .into_iter()
            .filter(|t| t.predicate != provenance)
            .collect();
        let file_uri = path_to_file_uri(path)
            .map_err(|e| FileError::new(path, FileErrorKind::WriteFailure, e))?;
        let bytes = self
            .codec
            .render(&subject, &owned, &state.preserved_body)
            .map_err(|e| FileError::new(path, FileErrorKind::WriteFailure, e))?
            .into_bytes();

        atomic_write(path, &bytes)
            .map_err(|e| FileError::new(path, FileErrorKind::WriteFailure, e))?;
        let last_modified = fs::metadata(path).map_or(0.0, |m| mtime_secs(&m));

        // The written file defines its primary subject whether or not the
        // link was removed from the cache before the flush.
        self.cache
            .insert(Triple::new(subject, provenance, Term::Iri(file_uri)));

        if let Some(state) = self.files.get_mut(path) {
            state.digest = ContentDigest::of(&bytes);
            state.last_modified = last_modified;
            state.triple_count = owned.len();
            state.dirty = false;
            state.hydrated = true;
        }
        self.dirty.remove(path);
        debug!(path = %path.display(), triples = owned.len(), "wrote file");
        Ok(())
    }

    // === Queries ===

    /// Triples matching a pattern, in term order.
    pub fn triples(&self, pattern: &TriplePattern) -> Vec<Triple> {
        self.cache.matching(pattern)
    }

    /// Number of cached triples, provenance included.
    pub fn len(&self) -> usize {
        self.cache.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cache.is_empty()
    }

    pub fn contains(&self, triple: &Triple) -> bool {
        self.cache.contains(triple)
    }

    /// Files waiting to be flushed.
    pub fn dirty_files(&self) -> Vec<PathBuf> {
        self.dirty.iter().cloned().collect()
    }

    pub fn file_state(&self, path: &Path) -> Option<&FileState> {
        self.files.get(path)
    }

    /// All file records, ordered by path.
    pub fn file_states(&self) -> impl Iterator<Item = &FileState> {
        self.files.values()
    }

    pub fn stats(&self) -> StoreStats {
        StoreStats {
            root_dir: self.root.clone(),
            patterns: self.config.patterns.clone(),
            auto_flush: self.config.auto_flush,
            total_files: self.files.len(),
            dirty_files: self.dirty.len(),
            total_triples: self.cache.len(),
        }
    }

    // === Lifecycle ===

    fn save_index(&self) -> Result<()> {
        IndexSnapshot::from_states(&self.root, self.files.values()).save(&self.index_path)?;
        debug!(path = %self.index_path.display(), files = self.files.len(), "saved index");
        Ok(())
    }

    /// Flushes pending writes and saves the index.
    pub fn close(mut self) -> Result<FlushReport> {
        let report = if self.dirty.is_empty() {
            FlushReport::default()
        } else {
            self.flush()?
        };
        self.save_index()?;
        Ok(report)
    }

    /// Deletes the index snapshot and forgets everything in memory. Files
    /// are left alone.
    pub fn destroy(&mut self) -> Result<()> {
        match fs::remove_file(&self.index_path) {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => return Err(e.into()),
        }
        self.cache.clear();
        self.files.clear();
        self.dirty.clear();
        self.index_load = IndexLoad::Missing;
        Ok(())
    }
}

//! Yurtle Core Library
//!
//! Keeps a directory of Markdown documents with semantic headers and an
//! in-memory triple graph in sync, in both directions:
//! - Hash-based change detection on read
//! - Per-file ownership through a provenance link
//! - Dirty tracking and atomic write-back
//! - A persistent index of per-file records
//!
//! # Quick Start
//!
//! ```
//! use yurtle_core::{namespaces::PM, Term, Triple, YurtleStore};
//!
//! let dir = tempfile::tempdir().unwrap();
//! std::fs::write(
//!     dir.path().join("task.md"),
//!     "---\n<urn:task:1> a yurtle:WorkItem ;\n    pm:status \"open\" .\n---\n# Task\n",
//! )
//! .unwrap();
//!
//! let mut store = YurtleStore::open(dir.path()).unwrap();
//! store.sync().unwrap();
//!
//! // Edit the graph, then write the owning file back.
//! let task = Term::iri("urn:task:1");
//! store
//!     .add(Triple::new(task.clone(), PM.term("priority"), Term::plain("high")))
//!     .unwrap();
//! store.flush().unwrap();
//!
//! let text = std::fs::read_to_string(dir.path().join("task.md")).unwrap();
//! assert!(text.contains("pm:priority \"high\""));
//! assert!(text.ends_with("---\n# Task\n"));
//! ```
//!
//! # Document Format
//!
//! A document starts with an optional header between two `---` lines. The
//! header is either Turtle or YAML; everything after it is kept verbatim.
//!
//! ```
//! use std::path::Path;
//! use yurtle_core::{DocumentCodec, Term, YurtleCodec};
//!
//! let doc = YurtleCodec
//!     .parse("---\ntitle: Notes\n---\nBody\n", Path::new("/notes/ideas.md"))
//!     .unwrap();
//! assert_eq!(doc.subject, Some(Term::iri("urn:doc:ideas")));
//! assert_eq!(doc.body, "Body\n");
//! ```

mod atomic;
mod config;
mod digest;
mod document;
mod error;
mod frontmatter;
mod graph;
mod index;
mod keyvalue;
pub mod namespaces;
mod scan;
mod state;
mod store;
mod term;
mod turtle;
mod uri;

pub use config::{StoreConfig, CONFIG_FILE, DEFAULT_PATTERN};
pub use digest::ContentDigest;
pub use document::{document_subject, CodecError, DocumentCodec, ParsedDocument, YurtleCodec};
pub use error::{FileError, FileErrorKind, Result, YurtleError};
pub use frontmatter::{split_header, Header, HeaderKind};
pub use graph::TripleCache;
pub use index::{IndexEntry, IndexLoad, IndexSnapshot, DEFAULT_INDEX_FILE, INDEX_SCHEMA_VERSION};
pub use keyvalue::{predicate_for_key, Coercion, KeyValueHeader};
pub use scan::scan_workspace;
pub use state::FileState;
pub use store::{
    AddReport, FlushReport, Ownership, RemoveReport, StoreStats, SyncReport, YurtleStore,
};
pub use term::{Literal, Term, Triple, TriplePattern};
pub use turtle::{
    check_iri, check_triple, parse_turtle, render_turtle, ParsedTurtle, TurtleError, UnwritableTerm,
};
pub use uri::{file_uri_to_path, path_to_file_uri};

use anyhow::Result;
use yurtle_core::{Term, Triple, TriplePattern, YurtleStore};

/// Declarative assertions on store and workspace state
pub enum Assertion {
    // Graph
    TripleExists(Triple),
    TripleAbsent(Triple),
    MatchCount {
        pattern: TriplePattern,
        count: usize,
    },
    TotalTriples(usize),

    // Ownership
    ResolvesTo {
        subject: Term,
        path: String,
    },
    Unresolved(Term),

    // Dirty tracking
    FileDirty {
        path: String,
    },
    FileClean {
        path: String,
    },
    DirtyCount(usize),
    TrackedFiles(usize),

    // Files on disk
    FileContains {
        path: String,
        text: String,
    },
    FileLacks {
        path: String,
        text: String,
    },
    FileEndsWith {
        path: String,
        text: String,
    },
    IndexExists,
    NoIndex,

    // Last reports
    LastSyncRead(usize),
    LastSyncRehydrated(usize),
    LastSyncRemoved(usize),
    LastSyncFailures(usize),
    LastFlushWrote(usize),
    LastFlushFailures(usize),

    // Custom (takes mutable reference to allow mutations)
    Custom(Box<dyn Fn(&mut YurtleStore) -> Result<()> + Send + Sync>),
}

impl std::fmt::Debug for Assertion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::TripleExists(t) => write!(f, "TripleExists({})", t),
            Self::TripleAbsent(t) => write!(f, "TripleAbsent({})", t),
            Self::MatchCount { pattern, count } => {
                write!(f, "MatchCount {{ pattern: {:?}, count: {} }}", pattern, count)
            }
            Self::TotalTriples(n) => write!(f, "TotalTriples({})", n),
            Self::ResolvesTo { subject, path } => {
                write!(f, "ResolvesTo {{ subject: {}, path: {:?} }}", subject, path)
            }
            Self::Unresolved(s) => write!(f, "Unresolved({})", s),
            Self::FileDirty { path } => write!(f, "FileDirty {{ path: {:?} }}", path),
            Self::FileClean { path } => write!(f, "FileClean {{ path: {:?} }}", path),
            Self::DirtyCount(n) => write!(f, "DirtyCount({})", n),
            Self::TrackedFiles(n) => write!(f, "TrackedFiles({})", n),
            Self::FileContains { path, text } => {
                write!(f, "FileContains {{ path: {:?}, text: {:?} }}", path, text)
            }
            Self::FileLacks { path, text } => {
                write!(f, "FileLacks {{ path: {:?}, text: {:?} }}", path, text)
            }
            Self::FileEndsWith { path, text } => {
                write!(f, "FileEndsWith {{ path: {:?}, text: {:?} }}", path, text)
            }
            Self::IndexExists => write!(f, "IndexExists"),
            Self::NoIndex => write!(f, "NoIndex"),
            Self::LastSyncRead(n) => write!(f, "LastSyncRead({})", n),
            Self::LastSyncRehydrated(n) => write!(f, "LastSyncRehydrated({})", n),
            Self::LastSyncRemoved(n) => write!(f, "LastSyncRemoved({})", n),
            Self::LastSyncFailures(n) => write!(f, "LastSyncFailures({})", n),
            Self::LastFlushWrote(n) => write!(f, "LastFlushWrote({})", n),
            Self::LastFlushFailures(n) => write!(f, "LastFlushFailures({})", n),
            Self::Custom(_) => write!(f, "Custom(<fn>)"),
        }
    }
}

//! CLI commands.

pub mod edit;
pub mod flush;
pub mod query;
pub mod status;
pub mod sync;

use anyhow::{bail, Context as _, Result};
use console::style;
use std::path::PathBuf;
use tracing::debug;
use yurtle_core::namespaces::STANDARD_PREFIXES;
use yurtle_core::{
    check_iri, FileError, FlushReport, Literal, StoreConfig, SyncReport, Term, YurtleStore,
};

/// Options shared by every command.
pub struct Context {
    pub root: PathBuf,
    pub auto_flush: bool,
}

impl Context {
    /// Opens the store and brings it up to date with the files.
    pub fn open_synced(&self) -> Result<(YurtleStore, SyncReport)> {
        let mut config = StoreConfig::load(&self.root)?;
        if self.auto_flush {
            config.auto_flush = true;
        }
        debug!(root = %self.root.display(), auto_flush = config.auto_flush, "opening workspace");
        let mut store = YurtleStore::open_with_config(&self.root, config)
            .with_context(|| format!("Failed to open workspace {}", self.root.display()))?;
        let report = store.sync().context("Failed to sync workspace")?;
        print_failures(&report.failures);
        Ok((store, report))
    }
}

pub fn print_failures(failures: &[FileError]) {
    for failure in failures {
        eprintln!(
            "  {} {} ({}): {}",
            style("×").red(),
            failure.path.display(),
            failure.kind,
            failure.message
        );
    }
}

pub fn print_flush(report: &FlushReport) {
    for path in &report.written {
        println!("{} Wrote {}", style("✓").green(), path.display());
    }
    print_failures(&report.failures);
}

fn expand_name(text: &str) -> Option<String> {
    let (prefix, local) = text.split_once(':')?;
    STANDARD_PREFIXES
        .iter()
        .find(|(p, _)| *p == prefix)
        .map(|(_, ns)| ns.iri(local))
}

/// Parses a subject or predicate: `<iri>`, `_:label`, a standard
/// `prefix:name`, or any other text containing `:` as an IRI.
pub fn parse_resource(text: &str) -> Result<Term> {
    let text = text.trim();
    if let Some(iri) = text.strip_prefix('<').and_then(|t| t.strip_suffix('>')) {
        return checked_iri(iri);
    }
    if let Some(label) = text.strip_prefix("_:") {
        return Ok(Term::blank(label));
    }
    if let Some(iri) = expand_name(text) {
        return Ok(Term::iri(iri));
    }
    if text.contains(':') {
        return checked_iri(text);
    }
    bail!("Not an IRI: {:?}. Use <iri> or prefix:name.", text)
}

fn checked_iri(iri: &str) -> Result<Term> {
    check_iri(iri).with_context(|| format!("Not a writable IRI: {:?}", iri))?;
    Ok(Term::iri(iri))
}

/// Parses an object. `<iri>` and `_:label` are resources; anything else is
/// literal text, typed or tagged when requested.
pub fn parse_object(text: &str, datatype: Option<&str>, lang: Option<&str>) -> Result<Term> {
    if let Some(dt) = datatype {
        let dt = parse_resource(dt)?;
        let iri = dt.as_iri().context("Datatype must be an IRI")?;
        return Ok(Literal::typed(text, iri).into());
    }
    if let Some(tag) = lang {
        return Ok(Literal::lang(text, tag).into());
    }
    let trimmed = text.trim();
    if (trimmed.starts_with('<') && trimmed.ends_with('>')) || trimmed.starts_with("_:") {
        return parse_resource(trimmed);
    }
    Ok(Term::plain(text))
}

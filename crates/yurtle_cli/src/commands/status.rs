//! Status command - store statistics and pending writes.

use super::Context;
use anyhow::Result;
use console::style;
use yurtle_core::IndexLoad;

pub fn run(ctx: &Context) -> Result<()> {
    let (store, _) = ctx.open_synced()?;
    let stats = store.stats();

    println!("{}", style("Store Status:").bold());
    println!("  Root: {}", stats.root_dir.display());
    println!("  Patterns: {}", stats.patterns.join(", "));
    println!("  Auto-flush: {}", stats.auto_flush);
    println!("  Files: {}", style(stats.total_files).cyan());
    println!("  Triples: {}", style(stats.total_triples).cyan());

    let index = match store.index_load() {
        IndexLoad::Missing => "none (created on first change)".to_string(),
        IndexLoad::Loaded(n) => format!("loaded ({} files)", n),
        IndexLoad::Discarded(reason) => format!("discarded: {}", reason),
    };
    println!("  Index: {} [{}]", store.index_path().display(), index);

    let dirty = store.dirty_files();
    if dirty.is_empty() {
        println!("  Pending writes: {}", style("none").green());
    } else {
        println!("  Pending writes: {}", style(dirty.len()).yellow());
        for path in dirty {
            println!("    {} {}", style("•").yellow(), path.display());
        }
    }

    let unanchored: Vec<_> = store
        .file_states()
        .filter(|s| s.primary_subject.is_none())
        .collect();
    if !unanchored.is_empty() {
        println!("  Files without a subject: {}", unanchored.len());
    }

    Ok(())
}

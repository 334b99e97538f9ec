//! Sync command - read changed files into the graph.

use super::Context;
use anyhow::Result;
use console::style;

pub fn run(ctx: &Context) -> Result<()> {
    let (store, report) = ctx.open_synced()?;

    println!(
        "{} Synced {}: {} read, {} removed, {} unchanged",
        style("✓").green(),
        store.root().display(),
        style(report.read.len()).cyan(),
        style(report.removed.len()).cyan(),
        report.skipped
    );
    if report.rehydrated > 0 {
        println!("  {} matched the saved index", report.rehydrated);
    }
    if !report.failures.is_empty() {
        println!(
            "  {} {} file(s) could not be read",
            style("⚠").yellow(),
            report.failures.len()
        );
    }
    println!("  {} triples in {} files", store.len(), store.stats().total_files);

    store.close()?;
    Ok(())
}

//! Flush command - write pending changes.

use super::{print_flush, Context};
use anyhow::Result;
use console::style;

pub fn run(ctx: &Context) -> Result<()> {
    let (mut store, _) = ctx.open_synced()?;
    let report = store.flush()?;
    if report.written.is_empty() && report.failures.is_empty() {
        println!("{} Nothing to write", style("✓").green());
    }
    print_flush(&report);
    store.close()?;
    Ok(())
}

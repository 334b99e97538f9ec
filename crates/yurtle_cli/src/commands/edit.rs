//! Edit commands - add and remove triples.

use super::{parse_object, parse_resource, print_flush, Context};
use anyhow::Result;
use console::style;
use yurtle_core::{Ownership, Triple, TriplePattern};

pub fn add(
    ctx: &Context,
    subject: &str,
    predicate: &str,
    object: &str,
    datatype: Option<&str>,
    lang: Option<&str>,
) -> Result<()> {
    let triple = Triple::new(
        parse_resource(subject)?,
        parse_resource(predicate)?,
        parse_object(object, datatype, lang)?,
    );

    let (mut store, _) = ctx.open_synced()?;
    let report = store.add(triple)?;
    if !report.inserted {
        println!("{} Triple already present", style("→").cyan());
    }
    match &report.ownership {
        Ownership::File(path) => {
            println!("{} Added to {}", style("✓").green(), path.display())
        }
        Ownership::Unanchored => println!(
            "{} No file defines this subject; the triple was not saved",
            style("⚠").yellow()
        ),
        Ownership::BlankSubject => println!(
            "{} Blank node subjects are not saved",
            style("⚠").yellow()
        ),
    }
    if let Some(flushed) = &report.flushed {
        print_flush(flushed);
    }

    print_flush(&store.close()?);
    Ok(())
}

pub fn remove(
    ctx: &Context,
    subject: Option<&str>,
    predicate: Option<&str>,
    object: Option<&str>,
) -> Result<()> {
    if subject.is_none() && predicate.is_none() && object.is_none() {
        anyhow::bail!("Refusing to remove every triple. Give at least one of -s, -p, -o.");
    }
    let pattern = TriplePattern::new(
        subject.map(parse_resource).transpose()?,
        predicate.map(parse_resource).transpose()?,
        object.map(|o| parse_object(o, None, None)).transpose()?,
    );

    let (mut store, _) = ctx.open_synced()?;
    let report = store.remove(&pattern)?;
    println!(
        "{} Removed {} triple(s) from {} file(s)",
        style("✓").green(),
        style(report.removed).cyan(),
        report.dirtied.len()
    );
    if let Some(flushed) = &report.flushed {
        print_flush(flushed);
    }

    print_flush(&store.close()?);
    Ok(())
}

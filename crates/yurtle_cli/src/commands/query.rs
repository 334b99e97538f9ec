//! Query commands - pattern lookup and subject resolution.

use super::{parse_object, parse_resource, Context};
use anyhow::{bail, Result};
use console::style;
use yurtle_core::TriplePattern;

/// Prints every triple matching the pattern as N-Triples.
pub fn run(
    ctx: &Context,
    subject: Option<&str>,
    predicate: Option<&str>,
    object: Option<&str>,
) -> Result<()> {
    let pattern = TriplePattern::new(
        subject.map(parse_resource).transpose()?,
        predicate.map(parse_resource).transpose()?,
        object.map(|o| parse_object(o, None, None)).transpose()?,
    );

    let (store, _) = ctx.open_synced()?;
    let triples = store.triples(&pattern);
    for triple in &triples {
        println!("{}", triple);
    }
    eprintln!("{} {} triple(s)", style("→").cyan(), triples.len());
    Ok(())
}

/// Prints the file that defines a subject.
pub fn resolve(ctx: &Context, subject: &str) -> Result<()> {
    let subject = parse_resource(subject)?;
    let (store, _) = ctx.open_synced()?;

    match store.resolve_file(&subject) {
        Some(path) => {
            println!("{}", path.display());
            Ok(())
        }
        None => bail!("No file defines {}", subject),
    }
}

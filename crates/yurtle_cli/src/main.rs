//! Yurtle CLI - Command-line interface for Yurtle document workspaces.

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod commands;

#[derive(Parser)]
#[command(name = "yurtle")]
#[command(about = "Query and edit a directory of Yurtle documents as one graph", long_about = None)]
#[command(version)]
struct Cli {
    /// Workspace root
    #[arg(long, global = true, default_value = ".")]
    root: PathBuf,
    /// Write each edit to disk immediately
    #[arg(long, global = true)]
    auto_flush: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Read changed files into the graph
    Sync,
    /// Show store statistics and pending writes
    Status,
    /// Print triples matching a pattern (N-Triples)
    Query {
        /// Subject (<iri>, prefix:name or _:label)
        #[arg(short, long)]
        subject: Option<String>,
        /// Predicate (<iri> or prefix:name)
        #[arg(short, long)]
        predicate: Option<String>,
        /// Object (<iri>, _:label or literal text)
        #[arg(short, long)]
        object: Option<String>,
    },
    /// Show which file defines a subject
    Resolve {
        /// Subject (<iri> or prefix:name)
        subject: String,
    },
    /// Add a triple and write the owning file
    Add {
        subject: String,
        predicate: String,
        object: String,
        /// Datatype for a literal object
        #[arg(long, conflicts_with = "lang")]
        datatype: Option<String>,
        /// Language tag for a literal object
        #[arg(long)]
        lang: Option<String>,
    },
    /// Remove matching triples and write the owning files
    Remove {
        #[arg(short, long)]
        subject: Option<String>,
        #[arg(short, long)]
        predicate: Option<String>,
        #[arg(short, long)]
        object: Option<String>,
    },
    /// Write all pending changes
    Flush,
}

fn main() -> Result<()> {
    // Initialize tracing subscriber
    // Respects RUST_LOG environment variable (e.g., RUST_LOG=debug)
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let ctx = commands::Context {
        root: cli.root,
        auto_flush: cli.auto_flush,
    };

    match cli.command {
        Commands::Sync => commands::sync::run(&ctx),
        Commands::Status => commands::status::run(&ctx),
        Commands::Query {
            subject,
            predicate,
            object,
        } => commands::query::run(
            &ctx,
            subject.as_deref(),
            predicate.as_deref(),
            object.as_deref(),
        ),
        Commands::Resolve { subject } => commands::query::resolve(&ctx, &subject),
        Commands::Add {
            subject,
            predicate,
            object,
            datatype,
            lang,
        } => commands::edit::add(
            &ctx,
            &subject,
            &predicate,
            &object,
            datatype.as_deref(),
            lang.as_deref(),
        ),
        Commands::Remove {
            subject,
            predicate,
            object,
        } => commands::edit::remove(
            &ctx,
            subject.as_deref(),
            predicate.as_deref(),
            object.as_deref(),
        ),
        Commands::Flush => commands::flush::run(&ctx),
    }
}

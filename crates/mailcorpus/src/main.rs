//! `mailcorpus` - labeled email tree to newline-delimited JSON
//!
//! Walks a directory of raw email files with optional `.cats` label
//! sidecars and writes one JSON object per message.

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use anyhow::{Context, bail};
use clap::Parser;
use mailcorpus_core::{FileGroups, FsSource, JsonLinesWriter, Options, Pipeline, RunSummary};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Convert a labeled email directory tree into newline-delimited JSON.
#[derive(Debug, Parser)]
#[command(name = "mailcorpus", version, about)]
struct Cli {
    /// Root directory of the email tree
    in_dir: PathBuf,

    /// Output file, created or truncated
    out_file: PathBuf,
}

fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    convert(&cli.in_dir, &cli.out_file, &Options::default())?;
    Ok(())
}

/// Converts the tree at `in_dir` into `out_file`.
fn convert(in_dir: &Path, out_file: &Path, options: &Options) -> anyhow::Result<RunSummary> {
    if !in_dir.is_dir() {
        bail!("input directory {} does not exist", in_dir.display());
    }

    let file = File::create(out_file)
        .with_context(|| format!("failed to create {}", out_file.display()))?;
    let mut sink = JsonLinesWriter::new(BufWriter::new(file));

    info!(input = %in_dir.display(), "Converting email tree");
    let pipeline = Pipeline::new(FsSource, options.clone());
    let summary = pipeline
        .run(FileGroups::new(in_dir, options), &mut sink)
        .with_context(|| format!("failed to write {}", out_file.display()))?;

    info!("Output written to {}", out_file.display());
    Ok(summary)
}

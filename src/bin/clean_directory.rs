//! Clean company names in one of the directory files
//!
//! Usage:
//!   cargo run --release --bin clean_directory -- --kind <aea|faa-repair-station|faa-dealer>
//!
//! The AEA directory is rewritten in place; the FAA files are read from the
//! raw download and written to the processed folder.

use std::path::PathBuf;

use anyhow::{Context, Result};
use aviation_coverage::cleaning::{clean_directory, DirectoryKind};
use aviation_coverage::config::PipelineConfig;
use aviation_coverage::table::Table;
use clap::Parser;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "clean_directory")]
#[command(about = "Standardise company names in the AEA or FAA directory files")]
struct Args {
    /// Which file to clean
    #[arg(long, value_enum)]
    kind: DirectoryKind,

    #[command(flatten)]
    paths: PipelineConfig,

    /// Override the input path for this kind
    #[arg(long)]
    input: Option<PathBuf>,

    /// Override the output path for this kind
    #[arg(long)]
    output: Option<PathBuf>,
}

fn default_paths(kind: DirectoryKind, paths: &PipelineConfig) -> (PathBuf, PathBuf) {
    match kind {
        DirectoryKind::Aea => (paths.aea_directory.clone(), paths.aea_directory.clone()),
        DirectoryKind::FaaRepairStation => (
            paths.faa_repair_station_raw.clone(),
            paths.faa_repair_station.clone(),
        ),
        DirectoryKind::FaaDealer => (paths.faa_dealer_raw.clone(), paths.faa_dealer.clone()),
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt().with_env_filter("info").init();

    let args = Args::parse();
    let (default_input, default_output) = default_paths(args.kind, &args.paths);
    let input = args.input.unwrap_or(default_input);
    let output = args.output.unwrap_or(default_output);

    let mut table =
        Table::read_csv(&input).with_context(|| format!("reading {}", input.display()))?;
    clean_directory(&mut table, args.kind)?;
    table
        .write_csv(&output)
        .with_context(|| format!("writing {}", output.display()))?;

    info!(
        "{} file cleaned: {} rows saved to {}",
        args.kind.label(),
        table.len(),
        output.display()
    );
    Ok(())
}

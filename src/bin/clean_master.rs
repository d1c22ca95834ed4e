//! Clean the FAA aircraft registration master file
//!
//! Drops weight-shift-control and powered-parachute aircraft and rows with no
//! address, then writes the processed master with `NA` for empty cells.
//!
//! Usage:
//!   cargo run --release --bin clean_master -- [OPTIONS]
//!
//! Options:
//!   --empty-state      Also export every row with an empty STATE
//!   --report <PATH>    Also write a JSON run summary

use std::path::PathBuf;

use anyhow::{Context, Result};
use aviation_coverage::cleaning::{clean_master, rows_missing_state, MasterCleaning, MasterStats};
use aviation_coverage::config::PipelineConfig;
use aviation_coverage::report::RunReport;
use aviation_coverage::table::Table;
use clap::Parser;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "clean_master")]
#[command(about = "Clean the FAA aircraft registration master file")]
struct Args {
    #[command(flatten)]
    paths: PipelineConfig,

    /// Export rows with an empty STATE (all countries, all aircraft types)
    #[arg(long)]
    empty_state: bool,

    /// Write a JSON run summary to this path
    #[arg(long)]
    report: Option<PathBuf>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt().with_env_filter("info").init();

    let args = Args::parse();
    let paths = &args.paths;

    let raw = Table::read_csv(&paths.faa_master_raw)
        .with_context(|| format!("reading {}", paths.faa_master_raw.display()))?;
    info!("FAA total aircraft population: {}", raw.len());

    if args.empty_state {
        let (addressed, _) = clean_master(raw.clone(), &MasterCleaning::address_only())?;
        let empty_state = rows_missing_state(&addressed)?;
        let out = paths.output("master_empty_state.csv");
        empty_state
            .write_csv_with_na(&out, "NA")
            .with_context(|| format!("writing {}", out.display()))?;
        info!(
            "{} records with empty STATE (all countries) exported to {}",
            empty_state.len(),
            out.display()
        );
    }

    let rules = MasterCleaning::default();
    let (clean, stats) = clean_master(raw, &rules)?;
    clean
        .write_csv_with_na(&paths.faa_master, "NA")
        .with_context(|| format!("writing {}", paths.faa_master.display()))?;
    info!("Cleaned master saved to {}", paths.faa_master.display());

    print_stats(&stats);

    if let Some(report_path) = &args.report {
        RunReport::new("clean_master", &[paths.faa_master_raw.as_path()], &stats)
            .write(report_path)
            .with_context(|| format!("writing {}", report_path.display()))?;
    }

    Ok(())
}

fn print_stats(stats: &MasterStats) {
    println!("\n{}", "=".repeat(60));
    println!("         FAA MASTER CLEANING");
    println!("{}\n", "=".repeat(60));

    println!("  Raw records:                    {:>10}", stats.raw_rows);
    println!("  After dropping types 7 and 8:   {:>10}", stats.after_type_filter);
    println!("  After dropping empty address:   {:>10}", stats.after_address_filter);
    println!();
    println!("  Missing COUNTRY:                {:>10}", stats.missing_country);
    println!("  Missing STATE:                  {:>10}", stats.missing_state);
    println!("  Missing CITY:                   {:>10}", stats.missing_city);
    println!("  Missing TYPE AIRCRAFT:          {:>10}", stats.missing_type_aircraft);
    println!("  Missing ZIP CODE:               {:>10}", stats.missing_zip_code);
    println!();
    println!("  Unique N-NUMBERs:               {:>10}", stats.unique_n_numbers);
    println!("  All N-NUMBERs unique:           {:>10}", stats.n_number_unique);
    println!("\n{}", "=".repeat(60));
}

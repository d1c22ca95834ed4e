//! Link FAA repair stations to the AEA directory
//!
//! Flags every FAA repair station that also appears in the AEA list, by
//! name + city, then name + address, then name alone.
//!
//! Usage:
//!   cargo run --release --bin link_repair_stations -- [OPTIONS]
//!
//! Options:
//!   --fan-out <MODE>   expand (default) or first-match
//!   --report <PATH>    Also write a JSON run summary

use std::fs::File;
use std::path::PathBuf;

use anyhow::{Context, Result};
use aviation_coverage::config::PipelineConfig;
use aviation_coverage::linker::{link, FanOut, MatchSummary};
use aviation_coverage::models::{write_match_records, Dealer, RepairStation};
use aviation_coverage::report::RunReport;
use aviation_coverage::table::Table;
use clap::Parser;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "link_repair_stations")]
#[command(about = "Flag FAA repair stations that are listed in the AEA directory")]
struct Args {
    #[command(flatten)]
    paths: PipelineConfig,

    /// How to treat FAA records whose name + city matches several AEA entries
    #[arg(long, value_enum, default_value_t = FanOut::Expand)]
    fan_out: FanOut,

    /// Output CSV (defaults to dealer_opportunities.csv in the output dir)
    #[arg(long)]
    output: Option<PathBuf>,

    /// Write a JSON run summary to this path
    #[arg(long)]
    report: Option<PathBuf>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt().with_env_filter("info").init();

    let args = Args::parse();
    let paths = &args.paths;

    let aea = Table::read_csv(&paths.aea_directory)
        .with_context(|| format!("reading {}", paths.aea_directory.display()))?;
    let faa = Table::read_csv(&paths.faa_repair_station)
        .with_context(|| format!("reading {}", paths.faa_repair_station.display()))?;

    // both inputs are validated before any linking happens
    let dealers = Dealer::from_table(&aea)?;
    let stations = RepairStation::from_table(&faa)?;
    info!("Loaded {} AEA and {} FAA records", dealers.len(), stations.len());

    let output = link(&stations, &dealers, args.fan_out);

    let out_path = args
        .output
        .clone()
        .unwrap_or_else(|| paths.output("dealer_opportunities.csv"));
    if let Some(parent) = out_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    let file = File::create(&out_path)
        .with_context(|| format!("creating {}", out_path.display()))?;
    write_match_records(&output.results, file)
        .with_context(|| format!("writing {}", out_path.display()))?;
    info!("Wrote {} rows to {}", output.results.len(), out_path.display());

    print_summary(&output.summary);

    if let Some(report_path) = &args.report {
        RunReport::new(
            "link_repair_stations",
            &[paths.aea_directory.as_path(), paths.faa_repair_station.as_path()],
            &output.summary,
        )
        .write(report_path)
        .with_context(|| format!("writing {}", report_path.display()))?;
        info!("Report written to {}", report_path.display());
    }

    Ok(())
}

fn print_summary(summary: &MatchSummary) {
    println!("\n{}", "=".repeat(60));
    println!("         FAA / AEA REPAIR STATION MATCHES");
    println!("{}\n", "=".repeat(60));

    println!("  Total AEA records:        {:>10}", summary.total_aea);
    println!("  Total FAA records:        {:>10}", summary.total_faa);
    println!("  Output rows:              {:>10}", summary.output_rows);
    if summary.fan_out_rows > 0 {
        println!("  Extra rows from fan-out:  {:>10}", summary.fan_out_rows);
    }
    println!();
    println!("  Matched by city:          {:>10}", summary.by_city);
    println!("  Matched by address:       {:>10}", summary.by_address);
    println!("  Matched by name only:     {:>10}", summary.by_name_only);
    println!("  Overall matches:          {:>10}", summary.overall);
    println!("  No match:                 {:>10}", summary.no_match);
    println!("\n{}", "=".repeat(60));
}

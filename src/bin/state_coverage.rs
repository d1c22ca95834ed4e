//! Repair-station coverage per US state and the dealer opportunity list
//!
//! Usage:
//!   cargo run --release --bin state_coverage -- [OPTIONS]
//!
//! Outputs (in the output dir):
//!   faa_aircraft_population_us.csv   US rows of the cleaned master
//!   aea_repair_store_us.csv          US rows of the AEA directory
//!   us_state_coverage.csv            stations per 1,000 aircraft by state
//!   us_dealer_opportunities.csv      AEA stations ranked by priority level

use std::path::PathBuf;

use anyhow::{Context, Result};
use aviation_coverage::config::PipelineConfig;
use aviation_coverage::coverage::{
    dealer_opportunities, state_coverage, us_aircraft, us_repair_stores, StateCoverage,
};
use aviation_coverage::report::RunReport;
use aviation_coverage::table::Table;
use clap::Parser;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "state_coverage")]
#[command(about = "Compare AEA repair-station coverage with the FAA aircraft population per US state")]
struct Args {
    #[command(flatten)]
    paths: PipelineConfig,

    /// Number of states listed in the printed ranking
    #[arg(long, default_value = "15")]
    top: usize,

    /// Write a JSON run summary to this path
    #[arg(long)]
    report: Option<PathBuf>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt().with_env_filter("info").init();

    let args = Args::parse();
    let paths = &args.paths;

    let master = Table::read_csv_with_na(&paths.faa_master, "NA")
        .with_context(|| format!("reading {}", paths.faa_master.display()))?;
    let aea = Table::read_csv(&paths.aea_directory)
        .with_context(|| format!("reading {}", paths.aea_directory.display()))?;

    let aircraft_us = us_aircraft(&master)?;
    let stores_us = us_repair_stores(&aea)?;
    write(&aircraft_us, paths.output("faa_aircraft_population_us.csv"))?;
    write(&stores_us, paths.output("aea_repair_store_us.csv"))?;

    let coverage = state_coverage(&master, &aea)?;
    write(&coverage.to_table(), paths.output("us_state_coverage.csv"))?;

    let opportunities = dealer_opportunities(&aea, &coverage)?;
    write(&opportunities, paths.output("us_dealer_opportunities.csv"))?;

    print_coverage(&coverage, args.top);

    if let Some(report_path) = &args.report {
        RunReport::new(
            "state_coverage",
            &[paths.faa_master.as_path(), paths.aea_directory.as_path()],
            &coverage,
        )
        .write(report_path)
        .with_context(|| format!("writing {}", report_path.display()))?;
    }

    Ok(())
}

fn write(table: &Table, path: PathBuf) -> Result<()> {
    table
        .write_csv(&path)
        .with_context(|| format!("writing {}", path.display()))?;
    info!("Wrote {} rows to {}", table.len(), path.display());
    Ok(())
}

fn print_coverage(coverage: &StateCoverage, top: usize) {
    println!("\n{}", "=".repeat(60));
    println!("         US REPAIR STATION COVERAGE");
    println!("{}\n", "=".repeat(60));

    println!("  US aircraft records:            {:>10}", coverage.us_aircraft);
    println!("  US repair station records:      {:>10}", coverage.us_repair_stores);
    println!("  Aircraft with empty STATE:      {:>10}", coverage.aircraft_missing_state);
    println!("  Stations with empty region:     {:>10}", coverage.stores_missing_region);
    println!("  Stations after merge:           {:>10}", coverage.stores_after_merge);

    println!("\n  {:<6} {:>12} {:>10} {:>14}", "State", "Aircraft", "Stations", "Per 1,000");
    println!("  {}", "-".repeat(45));
    for row in coverage.rows.iter().take(top) {
        println!(
            "  {:<6} {:>12} {:>10} {:>14.2}",
            row.state, row.num_aircraft, row.repair_store_count, row.dealers_per_aircraft
        );
    }

    println!(
        "\n  Alaska (AK): {:.2}, Hawaii (HI): {:.2} stations per 1,000 aircraft",
        coverage.ratio_for("AK").unwrap_or(0.0),
        coverage.ratio_for("HI").unwrap_or(0.0)
    );
    if !coverage.unmapped_regions.is_empty() {
        println!(
            "  Regions without a state code: {}",
            coverage.unmapped_regions.join(", ")
        );
    }
    println!("\n{}", "=".repeat(60));
}

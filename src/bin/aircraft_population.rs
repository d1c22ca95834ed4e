//! Aircraft and repair-station population tables for the choropleth maps
//!
//! Writes per-country FAA aircraft counts (ISO3), per-state US aircraft
//! counts for the continental map and per-country AEA repair-station counts,
//! each with the map category of its bin.
//!
//! Usage:
//!   cargo run --release --bin aircraft_population -- [OPTIONS]

use std::collections::BTreeSet;
use std::path::PathBuf;

use anyhow::{Context, Result};
use aviation_coverage::aggregate::{
    aggregate, Aggregation, AggregationSpec, BinSpec, KeyMap, LegendStyle,
};
use aviation_coverage::config::PipelineConfig;
use aviation_coverage::country_codes::is_valid_iso2;
use aviation_coverage::report::RunReport;
use aviation_coverage::state_codes::{
    state_group, StateGroup, CONTINENTAL_STATES, NON_CONTIGUOUS_STATES, TERRITORIES,
};
use aviation_coverage::table::Table;
use clap::Parser;
use serde::Serialize;
use tracing::{info, warn};

const WORLD_AIRCRAFT_EDGES: [f64; 3] = [1.0, 50.0, 1000.0];
const US_STATE_AIRCRAFT_EDGES: [f64; 7] = [0.0, 500.0, 1000.0, 2000.0, 5000.0, 10000.0, 20000.0];

#[derive(Parser, Debug)]
#[command(name = "aircraft_population")]
#[command(about = "Count FAA aircraft and AEA repair stations per country and US state")]
struct Args {
    #[command(flatten)]
    paths: PipelineConfig,

    /// Write a JSON run summary to this path
    #[arg(long)]
    report: Option<PathBuf>,
}

#[derive(Debug, Serialize)]
struct PopulationSummary {
    aircraft_total: usize,
    aircraft_mapped_to_countries: usize,
    invalid_country_codes: Vec<String>,
    unmapped_country_codes: Vec<String>,
    us_aircraft_by_state: usize,
    outside_continental: Vec<(String, usize)>,
    repair_stations_total: usize,
    repair_stations_mapped: usize,
    unmatched_country_names: Vec<String>,
    world_legend: Vec<String>,
    us_state_legend: Vec<String>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt().with_env_filter("info").init();

    let args = Args::parse();
    let paths = &args.paths;

    let master = Table::read_csv_with_na(&paths.faa_master, "NA")
        .with_context(|| format!("reading {}", paths.faa_master.display()))?;
    let aea = Table::read_csv(&paths.aea_directory)
        .with_context(|| format!("reading {}", paths.aea_directory.display()))?;
    info!("FAA aircraft: {}, AEA repair stations: {}", master.len(), aea.len());

    // World: FAA aircraft per ISO3 country
    let country_col = master.require("FAA MASTER", &["COUNTRY"])?[0];
    let invalid_codes: BTreeSet<&str> = master
        .column_values(country_col)
        .map(str::trim)
        .filter(|c| !c.is_empty() && !is_valid_iso2(c))
        .collect();
    if !invalid_codes.is_empty() {
        info!("COUNTRY codes outside ISO 3166: {:?}", invalid_codes);
    }

    let world = aggregate(
        &master,
        &AggregationSpec::new("COUNTRY", KeyMap::Iso2ToIso3)
            .bins(BinSpec::open_top(WORLD_AIRCRAFT_EDGES.to_vec()).legend(LegendStyle::Closed)),
    )?;
    if !world.unmapped_values.is_empty() {
        warn!(
            "Country codes with no ISO3 mapping after overrides: {:?}",
            world.unmapped_values
        );
    }
    write(&world.to_table("iso3", "aircraft_count"), paths.output("faa_aircraft_by_country.csv"))?;

    // US: aircraft per state, continental map plus the note for the rest
    let us_state_bins = BinSpec::open_top(US_STATE_AIRCRAFT_EDGES.to_vec());
    let mut states = aggregate(
        &master,
        &AggregationSpec::new("STATE", KeyMap::Upper).filter("COUNTRY", "US"),
    )?;
    let us_aircraft_by_state = states.total();
    let outside_continental: Vec<(String, usize)> = NON_CONTIGUOUS_STATES
        .iter()
        .chain(TERRITORIES.iter())
        .map(|code| (code.to_string(), states.count_for(code)))
        .collect();

    states.include_keys(CONTINENTAL_STATES);
    states.retain_keys(Some(&us_state_bins), |key| {
        state_group(key) == Some(StateGroup::Continental)
    });
    write(&states.to_table("STUSPS", "count"), paths.output("faa_aircraft_by_state.csv"))?;

    // World: AEA repair stations per ISO3 country
    let stations = aggregate(&aea, &AggregationSpec::new("country", KeyMap::CountryNameToIso3))?;
    if !stations.unmapped_values.is_empty() {
        warn!("Unmatched AEA country names: {:?}", stations.unmapped_values);
    }
    write(
        &stations.to_table("iso3", "repair_station_count"),
        paths.output("aea_repair_stations_by_country.csv"),
    )?;

    let summary = PopulationSummary {
        aircraft_total: master.len(),
        aircraft_mapped_to_countries: world.total(),
        invalid_country_codes: invalid_codes.iter().map(|c| c.to_string()).collect(),
        unmapped_country_codes: world.unmapped_values.clone(),
        us_aircraft_by_state,
        outside_continental,
        repair_stations_total: aea.len(),
        repair_stations_mapped: stations.total(),
        unmatched_country_names: stations.unmapped_values.clone(),
        world_legend: legend(&world),
        us_state_legend: legend(&states),
    };
    print_summary(&summary);

    if let Some(report_path) = &args.report {
        RunReport::new(
            "aircraft_population",
            &[paths.faa_master.as_path(), paths.aea_directory.as_path()],
            &summary,
        )
        .write(report_path)
        .with_context(|| format!("writing {}", report_path.display()))?;
    }

    Ok(())
}

fn legend(aggregation: &Aggregation) -> Vec<String> {
    aggregation
        .bins
        .as_ref()
        .map(BinSpec::legend_labels)
        .unwrap_or_default()
}

fn write(table: &Table, path: PathBuf) -> Result<()> {
    table
        .write_csv(&path)
        .with_context(|| format!("writing {}", path.display()))?;
    info!("Wrote {} rows to {}", table.len(), path.display());
    Ok(())
}

fn print_summary(summary: &PopulationSummary) {
    println!("\n{}", "=".repeat(60));
    println!("         AIRCRAFT & REPAIR STATION POPULATION");
    println!("{}\n", "=".repeat(60));

    println!("  FAA aircraft in master:          {:>10}", summary.aircraft_total);
    println!("  Aircraft represented on map:     {:>10}", summary.aircraft_mapped_to_countries);
    println!("  US aircraft with a state:        {:>10}", summary.us_aircraft_by_state);
    println!("  AEA repair stations:             {:>10}", summary.repair_stations_total);
    println!("  Repair stations on map:          {:>10}", summary.repair_stations_mapped);

    println!("\n  Not on the continental map:");
    for (code, count) in &summary.outside_continental {
        println!("    {:<6} {:>10}", code, count);
    }

    println!("\n  World aircraft legend:");
    for (i, label) in summary.world_legend.iter().enumerate() {
        println!("    {}: {}", i + 1, label);
    }
    println!("\n  US state aircraft legend:");
    for (i, label) in summary.us_state_legend.iter().enumerate() {
        println!("    {}: {}", i + 1, label);
    }

    if !summary.unmapped_country_codes.is_empty() {
        println!("\n  Unmapped FAA country codes: {}", summary.unmapped_country_codes.join(", "));
    }
    if !summary.unmatched_country_names.is_empty() {
        println!("  Unmatched AEA country names: {}", summary.unmatched_country_names.join(", "));
    }
    println!("\n{}", "=".repeat(60));
}

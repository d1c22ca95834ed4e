//! Sample data generator for the repair-station linker
//!
//! Writes a small AEA directory and an FAA repair-station list whose names
//! are perturbed copies of the AEA ones (case, punctuation, entity suffix),
//! some with moved cities or addresses, so that every matching tier shows up.
//!
//! Usage:
//!   cargo run --release --bin generate_synthetic -- [OPTIONS]
//!
//! Options:
//!   --dealers <N>          AEA directory size, at most 100 (default: 80)
//!   --unlisted <N>         FAA stations with no AEA counterpart, at most 35 (default: 30)
//!   --address-rate <F>     Share of linked stations that moved city (default: 0.2)
//!   --name-only-rate <F>   Share that moved city and address (default: 0.1)
//!   --duplicate-rate <F>   Share of AEA rows listed twice (default: 0.03)
//!   --seed <N>             Random seed for reproducibility (optional)

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use csv::WriterBuilder;
use rand::prelude::*;
use rand::rngs::StdRng;
use serde::Serialize;

#[derive(Parser, Debug)]
#[command(name = "generate_synthetic")]
#[command(about = "Generate sample AEA and FAA repair-station files")]
struct Args {
    /// Number of distinct AEA companies (at most 100)
    #[arg(long, default_value = "80", value_parser = parse_dealer_count)]
    dealers: usize,

    /// FAA stations that are not in the AEA directory (at most 35)
    #[arg(long, default_value = "30", value_parser = parse_unlisted_count)]
    unlisted: usize,

    /// Probability a linked FAA station sits in another city at the same address
    #[arg(long, default_value = "0.2", value_parser = parse_rate)]
    address_rate: f64,

    /// Probability a linked FAA station has both another city and address
    #[arg(long, default_value = "0.1", value_parser = parse_rate)]
    name_only_rate: f64,

    /// Probability an AEA row is listed twice
    #[arg(long, default_value = "0.03", value_parser = parse_rate)]
    duplicate_rate: f64,

    /// Random seed for reproducibility
    #[arg(long)]
    seed: Option<u64>,

    /// AEA directory output path
    #[arg(long, default_value = "data/sample/aea_directory.csv")]
    aea_output: PathBuf,

    /// FAA repair-station output path
    #[arg(long, default_value = "data/sample/faa_repair_station.csv")]
    faa_output: PathBuf,
}

const STEMS: &[&str] = &[
    "Skyline", "Redbird", "Cedar Valley", "Blue Ridge", "Summit", "Prairie", "Lakeshore",
    "Falcon", "Heritage", "Copperstate", "Northwind", "Gulf Coast", "Mesa", "Pinnacle",
    "Sandhills", "Tri-County", "Eagle Rock", "Horizon", "Bayou", "Timberline",
];

const KINDS: &[&str] = &["Avionics", "Aero Services", "Aviation", "Air Repair", "Aircraft Electronics"];

const UNLISTED_STEMS: &[&str] = &[
    "Quarry Hill", "Stillwater", "Ironwood", "Foxglove", "Kestrel Point", "Juniper", "Osprey Bay",
];

const SUFFIXES: &[&str] = &[", LLC", " LLC", " Corp.", " Corp", " Limited", " Ltda", ""];

const CITIES: &[(&str, &str)] = &[
    ("Austin", "Texas"),
    ("Wichita", "Kansas"),
    ("Phoenix", "Arizona"),
    ("Denver", "Colorado"),
    ("Atlanta", "Georgia"),
    ("Anchorage", "Alaska"),
    ("Honolulu", "Hawaii"),
    ("Spokane", "Washington"),
    ("Tulsa", "Oklahoma"),
    ("Orlando", "Florida"),
    ("Columbus", "Ohio"),
    ("Boise", "Idaho"),
    ("San Juan", "Puerto Rico"),
];

const FOREIGN_CITIES: &[(&str, &str, &str, &str)] = &[
    ("Toronto", "Ontario", "Canada", "North America"),
    ("Calgary", "Alberta", "Canada", "North America"),
    ("Sao Paulo", "Sao Paulo", "Brazil", "South America"),
    ("Dubai", "Dubai", "Dubai", "Asia"),
];

const STREETS: &[&str] = &[
    "Airport Rd", "Hangar Way", "Runway Dr", "Aviation Blvd", "Taxiway Ln", "Main St",
    "Industrial Pkwy", "Terminal Ave",
];

#[derive(Debug, Clone, Serialize)]
struct AeaRow {
    company: String,
    address: String,
    #[serde(rename = "city/suburb")]
    city: String,
    #[serde(rename = "state/territory/regions")]
    region: String,
    country: String,
    continent: String,
}

#[derive(Debug, Clone, Serialize)]
struct FaaRow {
    #[serde(rename = "Agency Name")]
    agency_name: String,
    #[serde(rename = "Address Line 1")]
    address_line_1: String,
    #[serde(rename = "City")]
    city: String,
    #[serde(rename = "State")]
    state: String,
}

/// What a generated FAA station is meant to exercise
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Scenario {
    SameCity,
    MovedCity,
    Relocated,
}

fn parse_rate(value: &str) -> Result<f64, String> {
    let rate: f64 = value.parse().map_err(|_| format!("`{}` is not a number", value))?;
    if (0.0..=1.0).contains(&rate) {
        Ok(rate)
    } else {
        Err(format!("{} is not in 0.0..=1.0", rate))
    }
}

fn parse_count(value: &str, max: usize) -> Result<usize, String> {
    let count: usize = value.parse().map_err(|_| format!("`{}` is not a count", value))?;
    if count <= max {
        Ok(count)
    } else {
        Err(format!("at most {} distinct names are available", max))
    }
}

fn parse_dealer_count(value: &str) -> Result<usize, String> {
    parse_count(value, STEMS.len() * KINDS.len())
}

fn parse_unlisted_count(value: &str) -> Result<usize, String> {
    parse_count(value, UNLISTED_STEMS.len() * KINDS.len())
}

fn random_case(text: &str, rng: &mut impl Rng) -> String {
    match rng.gen_range(0..3) {
        0 => text.to_uppercase(),
        1 => text.to_lowercase(),
        _ => text.to_string(),
    }
}

fn perturb_name(company: &str, rng: &mut impl Rng) -> String {
    let suffix = SUFFIXES.choose(rng).copied().unwrap_or("");
    random_case(&format!("{}{}", company, suffix), rng)
}

fn perturb_address(address: &str, rng: &mut impl Rng) -> String {
    let address = random_case(address, rng);
    if rng.gen_bool(0.3) {
        format!("{}.", address)
    } else {
        address
    }
}

fn street_address(rng: &mut impl Rng) -> String {
    let street = STREETS.choose(rng).copied().unwrap_or("Airport Rd");
    format!("{} {}", rng.gen_range(100..9999), street)
}

/// Distinct company names, stem by kind
fn company_names(stems: &[&str], count: usize) -> Vec<String> {
    stems
        .iter()
        .flat_map(|stem| KINDS.iter().map(move |kind| format!("{} {}", stem, kind)))
        .take(count)
        .collect()
}

fn generate_dealers(count: usize, duplicate_rate: f64, rng: &mut impl Rng) -> Vec<AeaRow> {
    let mut names = company_names(STEMS, count);
    names.shuffle(rng);

    let mut rows = Vec::with_capacity(count);
    for company in names {
        let row = if rng.gen_bool(0.85) {
            let (city, region) = CITIES[rng.gen_range(0..CITIES.len())];
            AeaRow {
                company,
                address: street_address(rng),
                city: city.to_string(),
                region: region.to_string(),
                country: "United States".to_string(),
                continent: "North America".to_string(),
            }
        } else {
            let (city, region, country, continent) =
                FOREIGN_CITIES[rng.gen_range(0..FOREIGN_CITIES.len())];
            AeaRow {
                company,
                address: street_address(rng),
                city: city.to_string(),
                region: region.to_string(),
                country: country.to_string(),
                continent: continent.to_string(),
            }
        };

        let duplicate = rng.gen_bool(duplicate_rate);
        rows.push(row.clone());
        if duplicate {
            rows.push(row);
        }
    }
    rows
}

fn other_city(current: &str, rng: &mut impl Rng) -> (&'static str, &'static str) {
    loop {
        let candidate = CITIES[rng.gen_range(0..CITIES.len())];
        if candidate.0 != current {
            return candidate;
        }
    }
}

fn generate_stations(dealers: &[AeaRow], args: &Args, rng: &mut impl Rng) -> Vec<FaaRow> {
    let mut stations = Vec::new();

    let mut seen = std::collections::HashSet::new();
    for dealer in dealers.iter().filter(|d| d.country == "United States") {
        if !seen.insert(dealer.company.as_str()) {
            continue;
        }
        let roll: f64 = rng.gen();
        let scenario = if roll < args.name_only_rate {
            Scenario::Relocated
        } else if roll < args.name_only_rate + args.address_rate {
            Scenario::MovedCity
        } else {
            Scenario::SameCity
        };

        let agency_name = perturb_name(&dealer.company, rng);
        let row = match scenario {
            Scenario::SameCity => FaaRow {
                agency_name,
                address_line_1: perturb_address(&dealer.address, rng),
                city: random_case(&dealer.city, rng),
                state: dealer.region.clone(),
            },
            Scenario::MovedCity => {
                let (city, state) = other_city(&dealer.city, rng);
                FaaRow {
                    agency_name,
                    address_line_1: perturb_address(&dealer.address, rng),
                    city: city.to_string(),
                    state: state.to_string(),
                }
            }
            Scenario::Relocated => {
                let (city, state) = other_city(&dealer.city, rng);
                FaaRow {
                    agency_name,
                    address_line_1: format!("PO Box {}", rng.gen_range(10..999)),
                    city: city.to_string(),
                    state: state.to_string(),
                }
            }
        };
        stations.push(row);
    }

    for company in company_names(UNLISTED_STEMS, args.unlisted) {
        let (city, state) = CITIES[rng.gen_range(0..CITIES.len())];
        stations.push(FaaRow {
            agency_name: perturb_name(&company, rng),
            address_line_1: street_address(rng),
            city: city.to_string(),
            state: state.to_string(),
        });
    }

    stations.shuffle(rng);
    stations
}

fn write_rows<T: Serialize>(rows: &[T], path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let mut writer = WriterBuilder::new()
        .has_headers(true)
        .from_path(path)
        .with_context(|| format!("creating {}", path.display()))?;
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();

    println!("🔧 Sample Repair Station Generator");
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!("AEA output:       {}", args.aea_output.display());
    println!("FAA output:       {}", args.faa_output.display());
    println!("Dealers:          {}", args.dealers);
    println!("Unlisted:         {}", args.unlisted);
    println!("Address rate:     {:.1}%", args.address_rate * 100.0);
    println!("Name-only rate:   {:.1}%", args.name_only_rate * 100.0);
    println!("Duplicate rate:   {:.1}%", args.duplicate_rate * 100.0);
    if let Some(seed) = args.seed {
        println!("Random seed:      {}", seed);
    }
    println!();

    let mut rng: StdRng = match args.seed {
        Some(s) => StdRng::seed_from_u64(s),
        None => StdRng::from_entropy(),
    };

    let dealers = generate_dealers(args.dealers, args.duplicate_rate, &mut rng);
    let stations = generate_stations(&dealers, &args, &mut rng);

    write_rows(&dealers, &args.aea_output)?;
    write_rows(&stations, &args.faa_output)?;

    println!("✅ Wrote {} AEA rows and {} FAA rows", dealers.len(), stations.len());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use aviation_coverage::linker::{link, FanOut};
    use aviation_coverage::models::{Dealer, MatchTier, RepairStation};

    fn args() -> Args {
        Args::parse_from(["generate_synthetic", "--seed", "7"])
    }

    fn generate(seed: u64) -> (Vec<AeaRow>, Vec<FaaRow>) {
        let args = args();
        let mut rng = StdRng::seed_from_u64(seed);
        let dealers = generate_dealers(args.dealers, args.duplicate_rate, &mut rng);
        let stations = generate_stations(&dealers, &args, &mut rng);
        (dealers, stations)
    }

    #[test]
    fn test_same_seed_same_output() {
        let (a_dealers, a_stations) = generate(7);
        let (b_dealers, b_stations) = generate(7);
        assert_eq!(
            a_dealers.iter().map(|d| &d.company).collect::<Vec<_>>(),
            b_dealers.iter().map(|d| &d.company).collect::<Vec<_>>()
        );
        assert_eq!(
            a_stations.iter().map(|s| &s.agency_name).collect::<Vec<_>>(),
            b_stations.iter().map(|s| &s.agency_name).collect::<Vec<_>>()
        );
    }

    #[test]
    fn test_rejects_rates_outside_unit_interval() {
        assert!(Args::try_parse_from(["generate_synthetic", "--duplicate-rate", "1.5"]).is_err());
        assert!(Args::try_parse_from(["generate_synthetic", "--address-rate", "-0.1"]).is_err());
        assert!(Args::try_parse_from(["generate_synthetic", "--name-only-rate", "x"]).is_err());

        let args = Args::try_parse_from(["generate_synthetic", "--duplicate-rate", "1"]).unwrap();
        assert_eq!(args.duplicate_rate, 1.0);
    }

    #[test]
    fn test_rejects_counts_beyond_name_pool() {
        assert!(Args::try_parse_from(["generate_synthetic", "--dealers", "150"]).is_err());
        assert!(Args::try_parse_from(["generate_synthetic", "--unlisted", "36"]).is_err());

        let args = Args::try_parse_from(["generate_synthetic", "--dealers", "100"]).unwrap();
        assert_eq!(args.dealers, 100);
    }

    #[test]
    fn test_company_names_are_distinct() {
        let names = company_names(STEMS, 120);
        let unique: std::collections::HashSet<_> = names.iter().collect();
        assert_eq!(names.len(), 100);
        assert_eq!(unique.len(), names.len());
    }

    #[test]
    fn test_sample_exercises_every_tier() {
        let (dealers, stations) = generate(7);
        let dealers: Vec<Dealer> = dealers
            .iter()
            .map(|d| Dealer::new(&d.company, &d.city, &d.address))
            .collect();
        let stations: Vec<RepairStation> = stations
            .iter()
            .map(|s| RepairStation::new(&s.agency_name, &s.city, &s.address_line_1))
            .collect();

        let out = link(&stations, &dealers, FanOut::FirstMatch);
        for tier in [MatchTier::City, MatchTier::Address, MatchTier::NameOnly, MatchTier::None] {
            assert!(
                out.results.iter().any(|r| r.tier == tier),
                "no station matched as {:?}",
                tier
            );
        }
        assert_eq!(out.summary.no_match, 30);
    }
}

//! Record linkage between FAA repair stations and the AEA directory
//!
//! Matching runs in three tiers on normalized keys:
//! 1. name + city (left join, may fan out),
//! 2. name + address, for records tier 1 missed,
//! 3. name alone, when the name is known but neither city nor address agree.

use std::collections::HashMap;

use serde::Serialize;
use tracing::{info, warn};

use crate::models::{Dealer, MatchResult, MatchTier, RepairStation};
use crate::normalize::key;

/// How to treat an FAA record whose name + city key hits several AEA rows
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum FanOut {
    /// One output row per matching AEA row, as a left join produces
    #[default]
    Expand,
    /// A single output row per FAA record
    FirstMatch,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MatchSummary {
    pub total_aea: usize,
    pub total_faa: usize,
    pub output_rows: usize,
    pub by_city: usize,
    pub by_address: usize,
    pub by_name_only: usize,
    pub overall: usize,
    pub no_match: usize,
    pub fan_out_rows: usize,
}

#[derive(Debug, Clone)]
pub struct LinkOutput {
    pub results: Vec<MatchResult>,
    pub summary: MatchSummary,
}

/// Lookup structures built once from the AEA side
struct DealerIndex {
    by_name_city: HashMap<(String, String), usize>,
    address_by_name: HashMap<String, String>,
}

impl DealerIndex {
    fn build(dealers: &[Dealer]) -> Self {
        let mut by_name_city: HashMap<(String, String), usize> = HashMap::new();
        let mut address_by_name: HashMap<String, String> = HashMap::new();

        for dealer in dealers {
            let name = key(&dealer.company);
            *by_name_city
                .entry((name.clone(), key(&dealer.city)))
                .or_insert(0) += 1;
            // later rows overwrite earlier ones for the same name
            address_by_name.insert(name, key(&dealer.address));
        }

        Self {
            by_name_city,
            address_by_name,
        }
    }

    /// Number of AEA rows sharing this station's name + city key
    fn city_hits(&self, name: &str, city: &str) -> usize {
        self.by_name_city
            .get(&(name.to_string(), city.to_string()))
            .copied()
            .unwrap_or(0)
    }

    fn fallback_tier(&self, name: &str, address: &str) -> MatchTier {
        match self.address_by_name.get(name) {
            Some(known) if known == address => MatchTier::Address,
            Some(_) => MatchTier::NameOnly,
            None => MatchTier::None,
        }
    }
}

/// Classify a single FAA record. Returns the tier and how many output rows it
/// produces under `Expand`.
fn classify(station: &RepairStation, index: &DealerIndex) -> (MatchTier, usize) {
    let name = key(&station.agency_name);
    let hits = index.city_hits(&name, &key(&station.city));
    if hits > 0 {
        return (MatchTier::City, hits);
    }
    (index.fallback_tier(&name, &key(&station.address_line_1)), 1)
}

/// Link FAA repair stations to AEA dealers.
///
/// Output order follows the FAA input. Fan-out rows for one station are
/// adjacent.
pub fn link(stations: &[RepairStation], dealers: &[Dealer], fan_out: FanOut) -> LinkOutput {
    let index = DealerIndex::build(dealers);

    let mut results = Vec::with_capacity(stations.len());
    let mut summary = MatchSummary {
        total_aea: dealers.len(),
        total_faa: stations.len(),
        ..Default::default()
    };

    for station in stations {
        let (tier, hits) = classify(station, &index);
        let copies = match fan_out {
            FanOut::Expand => hits,
            FanOut::FirstMatch => 1,
        };

        if !tier.is_match() {
            summary.no_match += 1;
        }
        summary.fan_out_rows += copies - 1;

        for _ in 0..copies {
            match tier {
                MatchTier::City => summary.by_city += 1,
                MatchTier::Address => summary.by_address += 1,
                MatchTier::NameOnly => summary.by_name_only += 1,
                MatchTier::None => {}
            }
            results.push(MatchResult {
                station: station.clone(),
                tier,
            });
        }
    }

    summary.output_rows = results.len();
    summary.overall = summary.by_city + summary.by_address + summary.by_name_only;

    if summary.fan_out_rows > 0 {
        warn!(
            "{} extra rows from FAA records matching several AEA entries on name + city",
            summary.fan_out_rows
        );
    }
    info!(
        "Linked {} FAA records against {} AEA records: {} by city, {} by address, {} by name only, {} unmatched",
        summary.total_faa,
        summary.total_aea,
        summary.by_city,
        summary.by_address,
        summary.by_name_only,
        summary.no_match
    );

    LinkOutput { results, summary }
}

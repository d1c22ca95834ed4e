//! Repair-station coverage per US state
//!
//! Joins FAA aircraft counts with AEA repair-station counts per state and
//! turns the ratio into a sales priority for each AEA station.

use std::cmp::Ordering;

use serde::Serialize;
use tracing::{info, warn};

use crate::aggregate::{aggregate, AggregationSpec, KeyMap};
use crate::error::Result;
use crate::state_codes::{is_excluded_territory_name, standardize, state_code};
use crate::table::Table;

pub const FAA_COUNTRY: &str = "COUNTRY";
pub const FAA_STATE: &str = "STATE";
pub const FAA_US: &str = "US";

pub const AEA_COUNTRY: &str = "country";
pub const AEA_REGION: &str = "state/territory/regions";
pub const AEA_US: &str = "United States";

/// AEA columns left out of the opportunity list
pub const OPPORTUNITY_DROPPED_COLUMNS: &[&str] = &["country", "continent"];

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StateCoverageRow {
    pub state: String,
    pub num_aircraft: usize,
    pub repair_store_count: usize,
    /// Repair stations per 1,000 registered aircraft
    pub dealers_per_aircraft: f64,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct StateCoverage {
    /// Sorted by ratio, highest first
    pub rows: Vec<StateCoverageRow>,
    pub us_aircraft: usize,
    pub us_repair_stores: usize,
    pub aircraft_missing_state: usize,
    pub stores_missing_region: usize,
    /// AEA region values that are not a US state name
    pub unmapped_regions: Vec<String>,
    /// Stores in states that have registered aircraft
    pub stores_after_merge: usize,
}

impl StateCoverage {
    pub fn ratio_for(&self, state: &str) -> Option<f64> {
        self.rows
            .iter()
            .find(|r| r.state == state)
            .map(|r| r.dealers_per_aircraft)
    }

    pub fn to_table(&self) -> Table {
        let mut table = Table::new(
            ["state", "num_aircraft", "repair_store_count", "dealers_per_aircraft"]
                .iter()
                .map(|h| h.to_string())
                .collect(),
        );
        for row in &self.rows {
            table.push_row(vec![
                row.state.clone(),
                row.num_aircraft.to_string(),
                row.repair_store_count.to_string(),
                format!("{:.4}", row.dealers_per_aircraft),
            ]);
        }
        table
    }
}

/// FAA rows registered in the US
pub fn us_aircraft(master: &Table) -> Result<Table> {
    let col = master.require("FAA MASTER", &[FAA_COUNTRY])?[0];
    Ok(master.filter_eq(col, FAA_US))
}

/// AEA rows located in the US
pub fn us_repair_stores(directory: &Table) -> Result<Table> {
    let col = directory.require("AEA", &[AEA_COUNTRY])?[0];
    Ok(directory.filter_eq(col, AEA_US))
}

/// Aircraft and repair-station counts per state with the stations-per-1,000
/// aircraft ratio. States without aircraft are not listed.
pub fn state_coverage(master: &Table, directory: &Table) -> Result<StateCoverage> {
    directory.require("AEA", &[AEA_COUNTRY, AEA_REGION])?;
    master.require("FAA MASTER", &[FAA_COUNTRY, FAA_STATE])?;

    let aircraft = aggregate(
        master,
        &AggregationSpec::new(FAA_STATE, KeyMap::Upper).filter(FAA_COUNTRY, FAA_US),
    )?;
    let stores = aggregate(
        directory,
        &AggregationSpec::new(AEA_REGION, KeyMap::StateName).filter(AEA_COUNTRY, AEA_US),
    )?;

    if !stores.unmapped_values.is_empty() {
        warn!(
            "{} AEA stores with unrecognised regions: {:?}",
            stores.unmapped, stores.unmapped_values
        );
    }

    let mut rows: Vec<StateCoverageRow> = aircraft
        .groups
        .iter()
        .map(|group| {
            let repair_store_count = stores.count_for(&group.key);
            StateCoverageRow {
                state: group.key.clone(),
                num_aircraft: group.count,
                repair_store_count,
                dealers_per_aircraft: repair_store_count as f64 / group.count as f64 * 1000.0,
            }
        })
        .collect();
    rows.sort_by(|a, b| {
        b.dealers_per_aircraft
            .partial_cmp(&a.dealers_per_aircraft)
            .unwrap_or(Ordering::Equal)
    });

    let coverage = StateCoverage {
        stores_after_merge: rows.iter().map(|r| r.repair_store_count).sum(),
        rows,
        us_aircraft: aircraft.total() + aircraft.missing,
        us_repair_stores: stores.total() + stores.missing + stores.unmapped,
        aircraft_missing_state: aircraft.missing,
        stores_missing_region: stores.missing,
        unmapped_regions: stores.unmapped_values,
    };

    info!(
        "Coverage for {} states: {} US aircraft, {} US repair stores",
        coverage.rows.len(),
        coverage.us_aircraft,
        coverage.us_repair_stores
    );
    Ok(coverage)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PriorityLevel {
    VeryHigh,
    High,
    Medium,
    Low,
    VeryLow,
}

impl PriorityLevel {
    /// Fewer stations per 1,000 aircraft means a bigger opportunity
    pub fn from_ratio(ratio: f64) -> Self {
        if ratio <= 1.0 {
            PriorityLevel::VeryHigh
        } else if ratio <= 2.0 {
            PriorityLevel::High
        } else if ratio <= 3.0 {
            PriorityLevel::Medium
        } else if ratio <= 5.0 {
            PriorityLevel::Low
        } else {
            PriorityLevel::VeryLow
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            PriorityLevel::VeryHigh => "Very High",
            PriorityLevel::High => "High",
            PriorityLevel::Medium => "Medium",
            PriorityLevel::Low => "Low",
            PriorityLevel::VeryLow => "Very Low",
        }
    }
}

/// US AEA stations outside the territories, each prefixed with the priority
/// level of its state. Region names come out upper-cased.
pub fn dealer_opportunities(directory: &Table, coverage: &StateCoverage) -> Result<Table> {
    let cols = directory.require("AEA", &[AEA_COUNTRY, AEA_REGION])?;
    let region_col = cols[1];

    let mut stores = directory.filter_eq(cols[0], AEA_US);
    stores.retain(|row| !is_excluded_territory_name(&row[region_col]));
    stores.map_column(region_col, standardize);

    let priorities: Vec<String> = stores
        .column_values(region_col)
        .map(|region| {
            let ratio = state_code(region)
                .and_then(|code| coverage.ratio_for(code))
                .unwrap_or(0.0);
            PriorityLevel::from_ratio(ratio).label().to_string()
        })
        .collect();

    stores.insert_column(0, "priority_level", priorities);
    stores.drop_columns(OPPORTUNITY_DROPPED_COLUMNS);
    Ok(stores)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn master() -> Table {
        let mut rows = Vec::new();
        for _ in 0..1000 {
            rows.push(vec!["US", "TX"]);
        }
        for _ in 0..500 {
            rows.push(vec!["US", "KS"]);
        }
        rows.push(vec!["US", ""]);
        rows.push(vec!["CA", "ON"]);
        Table::from_rows(&["COUNTRY", "STATE"], rows)
    }

    fn directory() -> Table {
        Table::from_rows(
            &["company", "country", "state/territory/regions", "continent"],
            vec![
                vec!["Alpha", "United States", "Texas", "North America"],
                vec!["Beta", "United States", " kansas", "North America"],
                vec!["Gamma", "United States", "Kansas", "North America"],
                vec!["Delta", "United States", "Kansas", "North America"],
                vec!["Epsilon", "United States", "Puerto Rico", "North America"],
                vec!["Zeta", "United States", "Oregon", "North America"],
                vec!["Eta", "Canada", "Ontario", "North America"],
            ],
        )
    }

    #[test]
    fn test_state_coverage_ratio() {
        let coverage = state_coverage(&master(), &directory()).unwrap();

        assert_eq!(coverage.rows.len(), 2);
        assert_eq!(coverage.rows[0].state, "KS");
        assert_eq!(coverage.rows[0].repair_store_count, 3);
        assert!((coverage.rows[0].dealers_per_aircraft - 6.0).abs() < 1e-9);
        assert!((coverage.ratio_for("TX").unwrap() - 1.0).abs() < 1e-9);
        assert_eq!(coverage.ratio_for("OR"), None);

        assert_eq!(coverage.us_aircraft, 1501);
        assert_eq!(coverage.aircraft_missing_state, 1);
        assert_eq!(coverage.us_repair_stores, 6);
        assert_eq!(coverage.unmapped_regions, vec!["Puerto Rico".to_string()]);
        assert_eq!(coverage.stores_after_merge, 4);
    }

    #[test]
    fn test_country_filters_agree() {
        let directory = Table::from_rows(
            &["company", "country", "state/territory/regions", "continent"],
            vec![
                vec!["Alpha", "United States", "Texas", "North America"],
                vec!["Padded", "United States ", "Texas", "North America"],
            ],
        );
        let coverage = state_coverage(&master(), &directory).unwrap();
        let stores = us_repair_stores(&directory).unwrap();
        let opportunities = dealer_opportunities(&directory, &coverage).unwrap();

        assert_eq!(coverage.us_repair_stores, 1);
        assert_eq!(coverage.rows.iter().find(|r| r.state == "TX").unwrap().repair_store_count, 1);
        assert_eq!(stores.len(), 1);
        assert_eq!(opportunities.len(), 1);
        assert_eq!(opportunities.cell(0, 1), "Alpha");
    }

    #[test]
    fn test_priority_thresholds() {
        assert_eq!(PriorityLevel::from_ratio(0.0), PriorityLevel::VeryHigh);
        assert_eq!(PriorityLevel::from_ratio(1.0), PriorityLevel::VeryHigh);
        assert_eq!(PriorityLevel::from_ratio(1.5), PriorityLevel::High);
        assert_eq!(PriorityLevel::from_ratio(3.0), PriorityLevel::Medium);
        assert_eq!(PriorityLevel::from_ratio(5.0), PriorityLevel::Low);
        assert_eq!(PriorityLevel::from_ratio(5.01).label(), "Very Low");
    }

    #[test]
    fn test_dealer_opportunities() {
        let coverage = state_coverage(&master(), &directory()).unwrap();
        let table = dealer_opportunities(&directory(), &coverage).unwrap();

        assert_eq!(table.headers(), ["priority_level", "company", "state/territory/regions"]);
        let rows: Vec<(&str, &str)> = table
            .rows()
            .iter()
            .map(|r| (r[0].as_str(), r[1].as_str()))
            .collect();
        assert_eq!(
            rows,
            vec![
                ("Very High", "Alpha"),
                ("Very Low", "Beta"),
                ("Very Low", "Gamma"),
                ("Very Low", "Delta"),
                ("Very High", "Zeta"),
            ]
        );
        assert_eq!(table.cell(1, 2), "KANSAS");
    }
}

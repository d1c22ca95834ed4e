//! Cleaning steps for the raw FAA and AEA files

use std::collections::HashSet;

use serde::Serialize;
use tracing::info;

use crate::error::Result;
use crate::normalize::{clean_company_name, clean_dealer_name};
use crate::table::Table;

/// Directory files whose company-name column gets display cleaning
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum DirectoryKind {
    /// AEA repair-station directory
    Aea,
    /// FAA repair-station contacts
    FaaRepairStation,
    /// FAA dealer file
    FaaDealer,
}

impl DirectoryKind {
    pub fn name_column(self) -> &'static str {
        match self {
            DirectoryKind::Aea => "company",
            DirectoryKind::FaaRepairStation => "Agency Name",
            DirectoryKind::FaaDealer => "NAME",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            DirectoryKind::Aea => "AEA",
            DirectoryKind::FaaRepairStation => "FAA repair station",
            DirectoryKind::FaaDealer => "FAA dealer",
        }
    }
}

/// Tidy the company-name column in place
pub fn clean_directory(table: &mut Table, kind: DirectoryKind) -> Result<()> {
    let col = table.require(kind.label(), &[kind.name_column()])?[0];

    match kind {
        DirectoryKind::Aea | DirectoryKind::FaaRepairStation => {
            table.map_column(col, clean_company_name);
        }
        DirectoryKind::FaaDealer => {
            table.map_cells(|cell| cell.trim().to_string());
            table.map_column(col, clean_dealer_name);
        }
    }

    info!("Cleaned {} names in {} rows", kind.label(), table.len());
    Ok(())
}

pub const N_NUMBER: &str = "N-NUMBER";
pub const TYPE_AIRCRAFT: &str = "TYPE AIRCRAFT";
pub const STATE: &str = "STATE";

/// Rules applied to the FAA aircraft registration master file
#[derive(Debug, Clone, Serialize)]
pub struct MasterCleaning {
    /// Location columns; a row with all of them empty is dropped
    pub address_columns: Vec<String>,
    /// `TYPE AIRCRAFT` codes removed from the population
    pub excluded_types: Vec<String>,
    /// Placeholder values treated as empty in address columns (any case)
    pub null_tokens: Vec<String>,
}

impl Default for MasterCleaning {
    fn default() -> Self {
        Self {
            address_columns: ["COUNTRY", "STATE", "CITY", "STREET", "STREET2", "ZIP CODE"]
                .iter()
                .map(|c| c.to_string())
                .collect(),
            // 7 = weight-shift-control, 8 = powered parachute
            excluded_types: vec!["7".to_string(), "8".to_string()],
            null_tokens: vec!["<unset>".to_string(), "NULL".to_string()],
        }
    }
}

impl MasterCleaning {
    /// Address clean-up only, keeping every aircraft type
    pub fn address_only() -> Self {
        Self {
            excluded_types: Vec::new(),
            ..Self::default()
        }
    }

    fn is_null(&self, value: &str) -> bool {
        value.is_empty() || self.null_tokens.iter().any(|t| t.eq_ignore_ascii_case(value))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MasterStats {
    pub raw_rows: usize,
    pub after_type_filter: usize,
    pub after_address_filter: usize,
    pub missing_country: usize,
    pub missing_state: usize,
    pub missing_city: usize,
    pub missing_type_aircraft: usize,
    pub missing_zip_code: usize,
    pub unique_n_numbers: usize,
    pub n_number_unique: bool,
}

/// Clean the master file: trim cells, drop excluded aircraft types, blank out
/// placeholder address values and drop rows with no address at all.
pub fn clean_master(mut table: Table, rules: &MasterCleaning) -> Result<(Table, MasterStats)> {
    let address_names: Vec<&str> = rules.address_columns.iter().map(String::as_str).collect();
    let address_cols = table.require("FAA MASTER", &address_names)?;
    // TYPE AIRCRAFT is only needed when a type is filtered out
    let type_col = if rules.excluded_types.is_empty() {
        None
    } else {
        Some(table.require("FAA MASTER", &[TYPE_AIRCRAFT])?[0])
    };

    let mut stats = MasterStats {
        raw_rows: table.len(),
        ..Default::default()
    };

    table.map_cells(|cell| cell.trim().to_string());

    if let Some(type_col) = type_col {
        table.retain(|row| !rules.excluded_types.iter().any(|t| *t == row[type_col]));
    }
    stats.after_type_filter = table.len();

    for &col in &address_cols {
        table.map_column(col, |cell| {
            if rules.is_null(cell) {
                String::new()
            } else {
                cell.to_string()
            }
        });
    }
    table.retain(|row| address_cols.iter().any(|&col| !row[col].is_empty()));
    stats.after_address_filter = table.len();

    let count_empty = |name: &str| {
        table
            .column_index(name)
            .map(|col| table.column_values(col).filter(|v| v.is_empty()).count())
            .unwrap_or(0)
    };
    stats.missing_country = count_empty("COUNTRY");
    stats.missing_state = count_empty(STATE);
    stats.missing_city = count_empty("CITY");
    stats.missing_type_aircraft = count_empty(TYPE_AIRCRAFT);
    stats.missing_zip_code = count_empty("ZIP CODE");

    if let Some(n_number_col) = table.column_index(N_NUMBER) {
        let unique: HashSet<&str> = table.column_values(n_number_col).collect();
        stats.unique_n_numbers = unique.len();
        stats.n_number_unique = unique.len() == table.len();
    }

    info!(
        "FAA master: {} raw, {} after type filter, {} after address filter",
        stats.raw_rows, stats.after_type_filter, stats.after_address_filter
    );
    Ok((table, stats))
}

/// Rows whose STATE is empty, across all countries
pub fn rows_missing_state(table: &Table) -> Result<Table> {
    let col = table.require("FAA MASTER", &[STATE])?[0];
    let mut missing = table.clone();
    missing.retain(|row| row[col].is_empty());
    Ok(missing)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw_master() -> Table {
        Table::from_rows(
            &["N-NUMBER", "TYPE AIRCRAFT", "COUNTRY", "STATE", "CITY", "STREET", "STREET2", "ZIP CODE"],
            vec![
                vec!["100A ", "4", "US", "TX", "AUSTIN", "1 MAIN", "", "78701"],
                vec!["200B", "7", "US", "KS", "WICHITA", "", "", "67202"],
                vec!["300C", "8", "US", "", "", "", "", ""],
                vec!["400D", "5", " <UNSET> ", "null", "  ", "", "", ""],
                vec!["500E", "4", "CA", "", "TORONTO", "", "", ""],
                vec!["100A", "6", "US", "OK", "", "", "", ""],
            ],
        )
    }

    #[test]
    fn test_clean_master_filters_and_counts() {
        let (clean, stats) = clean_master(raw_master(), &MasterCleaning::default()).unwrap();

        assert_eq!(stats.raw_rows, 6);
        assert_eq!(stats.after_type_filter, 4);
        assert_eq!(stats.after_address_filter, 3);
        assert_eq!(clean.column_values(0).collect::<Vec<_>>(), vec!["100A", "500E", "100A"]);
        assert_eq!(stats.missing_state, 1);
        assert_eq!(stats.missing_city, 1);
        assert_eq!(stats.missing_country, 0);
        assert_eq!(stats.unique_n_numbers, 2);
        assert!(!stats.n_number_unique);
    }

    #[test]
    fn test_address_only_keeps_all_types() {
        let (clean, stats) = clean_master(raw_master(), &MasterCleaning::address_only()).unwrap();
        assert_eq!(stats.after_type_filter, 6);
        assert_eq!(clean.len(), 5);

        let missing = rows_missing_state(&clean).unwrap();
        assert_eq!(missing.column_values(0).collect::<Vec<_>>(), vec!["300C", "500E"]);
    }

    #[test]
    fn test_address_only_needs_only_address_columns() {
        let table = Table::from_rows(
            &["COUNTRY", "STATE", "CITY", "STREET", "STREET2", "ZIP CODE"],
            vec![
                vec!["US", "", "AUSTIN", "", "", ""],
                vec!["NULL", "", "", "", "", ""],
            ],
        );
        let (clean, stats) = clean_master(table.clone(), &MasterCleaning::address_only()).unwrap();
        assert_eq!(clean.len(), 1);
        assert_eq!(stats.unique_n_numbers, 0);
        assert_eq!(rows_missing_state(&clean).unwrap().len(), 1);

        let err = clean_master(table, &MasterCleaning::default()).unwrap_err();
        assert_eq!(err.to_string(), "Missing column in FAA MASTER file: TYPE AIRCRAFT");
    }

    #[test]
    fn test_master_requires_columns() {
        let table = Table::from_rows(&["N-NUMBER", "COUNTRY"], vec![vec!["1", "US"]]);
        let err = clean_master(table, &MasterCleaning::default()).unwrap_err();
        assert_eq!(err.to_string(), "Missing column in FAA MASTER file: STATE");
    }

    #[test]
    fn test_clean_directory() {
        let mut aea = Table::from_rows(
            &["company", "country"],
            vec![vec![" Acme,  Incorporated ", "United States"], vec!["", "Canada"]],
        );
        clean_directory(&mut aea, DirectoryKind::Aea).unwrap();
        assert_eq!(aea.cell(0, 0), "Acme Inc");
        assert_eq!(aea.cell(1, 0), "");

        let mut dealer = Table::from_rows(&["NAME", "CITY"], vec![vec!["  SKY   SALES CO.,", " WICHITA "]]);
        clean_directory(&mut dealer, DirectoryKind::FaaDealer).unwrap();
        assert_eq!(dealer.rows()[0], vec!["SKY SALES CO", "WICHITA"]);

        let err = clean_directory(&mut dealer, DirectoryKind::FaaRepairStation).unwrap_err();
        assert_eq!(err.to_string(), "Missing column in FAA repair station file: Agency Name");
    }
}

use std::io::Write;

use csv::WriterBuilder;
use serde::Serialize;

use crate::error::Result;
use crate::table::Table;

/// FAA repair-station columns the linker depends on
pub const FAA_COLUMNS: [&str; 3] = ["Agency Name", "City", "Address Line 1"];

/// AEA directory columns the linker depends on
pub const AEA_COLUMNS: [&str; 3] = ["company", "city/suburb", "address"];

/// Row from the FAA repair-station contact list
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RepairStation {
    pub agency_name: String,
    pub city: String,
    pub address_line_1: String,
}

/// Row from the AEA repair-station directory
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dealer {
    pub company: String,
    pub city: String,
    pub address: String,
}

impl RepairStation {
    pub fn new(agency_name: &str, city: &str, address_line_1: &str) -> Self {
        Self {
            agency_name: agency_name.to_string(),
            city: city.to_string(),
            address_line_1: address_line_1.to_string(),
        }
    }

    /// Extract records from a loaded table, failing before any row is read if
    /// a required column is absent
    pub fn from_table(table: &Table) -> Result<Vec<Self>> {
        let cols = table.require("FAA", &FAA_COLUMNS)?;
        Ok(table
            .rows()
            .iter()
            .map(|row| Self {
                agency_name: row[cols[0]].clone(),
                city: row[cols[1]].clone(),
                address_line_1: row[cols[2]].clone(),
            })
            .collect())
    }
}

impl Dealer {
    pub fn new(company: &str, city: &str, address: &str) -> Self {
        Self {
            company: company.to_string(),
            city: city.to_string(),
            address: address.to_string(),
        }
    }

    pub fn from_table(table: &Table) -> Result<Vec<Self>> {
        let cols = table.require("AEA", &AEA_COLUMNS)?;
        Ok(table
            .rows()
            .iter()
            .map(|row| Self {
                company: row[cols[0]].clone(),
                city: row[cols[1]].clone(),
                address: row[cols[2]].clone(),
            })
            .collect())
    }
}

/// Header of the linker output file
pub const MATCH_OUTPUT_COLUMNS: [&str; 6] = [
    "Agency Name",
    "City",
    "Address Line 1",
    "MATCH_BY_CITY",
    "MATCH_BY_ADDRESS",
    "MATCH_BY_NAME_ONLY",
];

/// Which linking tier matched an FAA record, if any
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MatchTier {
    City,
    Address,
    NameOnly,
    None,
}

impl MatchTier {
    pub fn is_match(self) -> bool {
        self != MatchTier::None
    }
}

/// One output row of the linker
#[derive(Debug, Clone, PartialEq)]
pub struct MatchResult {
    pub station: RepairStation,
    pub tier: MatchTier,
}

/// CSV shape of a `MatchResult`
#[derive(Debug, Serialize)]
pub struct MatchRecord<'a> {
    #[serde(rename = "Agency Name")]
    pub agency_name: &'a str,
    #[serde(rename = "City")]
    pub city: &'a str,
    #[serde(rename = "Address Line 1")]
    pub address_line_1: &'a str,
    #[serde(rename = "MATCH_BY_CITY")]
    pub match_by_city: &'static str,
    #[serde(rename = "MATCH_BY_ADDRESS")]
    pub match_by_address: &'static str,
    #[serde(rename = "MATCH_BY_NAME_ONLY")]
    pub match_by_name_only: &'static str,
}

impl MatchResult {
    pub fn to_record(&self) -> MatchRecord<'_> {
        let flag = |hit: bool| if hit { "YES" } else { "" };
        MatchRecord {
            agency_name: &self.station.agency_name,
            city: &self.station.city,
            address_line_1: &self.station.address_line_1,
            match_by_city: if self.tier == MatchTier::City { "YES" } else { "NO" },
            match_by_address: flag(self.tier == MatchTier::Address),
            match_by_name_only: flag(self.tier == MatchTier::NameOnly),
        }
    }
}

/// Write linker output as CSV. The header is written even when there are no
/// results.
pub fn write_match_records<W: Write>(results: &[MatchResult], writer: W) -> Result<()> {
    let mut writer = WriterBuilder::new().has_headers(false).from_writer(writer);
    writer.write_record(MATCH_OUTPUT_COLUMNS)?;
    for result in results {
        writer.serialize(result.to_record())?;
    }
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_csv_text() {
        let results = vec![
            MatchResult {
                station: RepairStation::new("Acme LLC", "Austin", "1 Main St"),
                tier: MatchTier::City,
            },
            MatchResult {
                station: RepairStation::new("Acme LLC", "Dallas", "1 Main St"),
                tier: MatchTier::Address,
            },
            MatchResult {
                station: RepairStation::new("Acme, Corp", "Tulsa", "9 Elm Ave"),
                tier: MatchTier::NameOnly,
            },
            MatchResult {
                station: RepairStation::new("Zenith Aero", "Boise", ""),
                tier: MatchTier::None,
            },
        ];
        let mut buf = Vec::new();
        write_match_records(&results, &mut buf).unwrap();

        assert_eq!(
            String::from_utf8(buf).unwrap(),
            "Agency Name,City,Address Line 1,MATCH_BY_CITY,MATCH_BY_ADDRESS,MATCH_BY_NAME_ONLY\n\
             Acme LLC,Austin,1 Main St,YES,,\n\
             Acme LLC,Dallas,1 Main St,NO,YES,\n\
             \"Acme, Corp\",Tulsa,9 Elm Ave,NO,,YES\n\
             Zenith Aero,Boise,,NO,,\n"
        );
    }

    #[test]
    fn test_output_header_without_results() {
        let mut buf = Vec::new();
        write_match_records(&[], &mut buf).unwrap();
        assert_eq!(
            String::from_utf8(buf).unwrap(),
            "Agency Name,City,Address Line 1,MATCH_BY_CITY,MATCH_BY_ADDRESS,MATCH_BY_NAME_ONLY\n"
        );
    }

    #[test]
    fn test_record_flags() {
        let result = MatchResult {
            station: RepairStation::new("Acme LLC", "Dallas", "1 Main St"),
            tier: MatchTier::Address,
        };
        let record = result.to_record();
        assert_eq!(record.match_by_city, "NO");
        assert_eq!(record.match_by_address, "YES");
        assert_eq!(record.match_by_name_only, "");
    }

    #[test]
    fn test_from_table_selects_columns_by_name() {
        let table = Table::from_rows(
            &["Cert No", "City", "Agency Name", "Address Line 1"],
            vec![vec!["X1", "Austin", "Acme LLC", "1 Main St"]],
        );
        let stations = RepairStation::from_table(&table).unwrap();
        assert_eq!(stations, vec![RepairStation::new("Acme LLC", "Austin", "1 Main St")]);

        let err = Dealer::from_table(&table).unwrap_err();
        assert_eq!(err.to_string(), "Missing column in AEA file: company");
    }
}

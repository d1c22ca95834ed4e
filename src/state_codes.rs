//! US state name mapping
//! Maps AEA `state/territory/regions` values to USPS codes and groups codes
//! the way the state maps split them

use std::collections::HashMap;
use std::sync::LazyLock;

pub static STATE_CODES: LazyLock<HashMap<&'static str, &'static str>> = LazyLock::new(|| {
    let mut m = HashMap::new();

    m.insert("ALABAMA", "AL");
    m.insert("ALASKA", "AK");
    m.insert("ARIZONA", "AZ");
    m.insert("ARKANSAS", "AR");
    m.insert("CALIFORNIA", "CA");
    m.insert("COLORADO", "CO");
    m.insert("CONNECTICUT", "CT");
    m.insert("DELAWARE", "DE");
    m.insert("FLORIDA", "FL");
    m.insert("GEORGIA", "GA");
    m.insert("HAWAII", "HI");
    m.insert("IDAHO", "ID");
    m.insert("ILLINOIS", "IL");
    m.insert("INDIANA", "IN");
    m.insert("IOWA", "IA");
    m.insert("KANSAS", "KS");
    m.insert("KENTUCKY", "KY");
    m.insert("LOUISIANA", "LA");
    m.insert("MAINE", "ME");
    m.insert("MARYLAND", "MD");
    m.insert("MASSACHUSETTS", "MA");
    m.insert("MICHIGAN", "MI");
    m.insert("MINNESOTA", "MN");
    m.insert("MISSISSIPPI", "MS");
    m.insert("MISSOURI", "MO");
    m.insert("MONTANA", "MT");
    m.insert("NEBRASKA", "NE");
    m.insert("NEVADA", "NV");
    m.insert("NEW HAMPSHIRE", "NH");
    m.insert("NEW JERSEY", "NJ");
    m.insert("NEW MEXICO", "NM");
    m.insert("NEW YORK", "NY");
    m.insert("NORTH CAROLINA", "NC");
    m.insert("NORTH DAKOTA", "ND");
    m.insert("OHIO", "OH");
    m.insert("OKLAHOMA", "OK");
    m.insert("OREGON", "OR");
    m.insert("PENNSYLVANIA", "PA");
    m.insert("RHODE ISLAND", "RI");
    m.insert("SOUTH CAROLINA", "SC");
    m.insert("SOUTH DAKOTA", "SD");
    m.insert("TENNESSEE", "TN");
    m.insert("TEXAS", "TX");
    m.insert("UTAH", "UT");
    m.insert("VERMONT", "VT");
    m.insert("VIRGINIA", "VA");
    m.insert("WASHINGTON", "WA");
    m.insert("WEST VIRGINIA", "WV");
    m.insert("WISCONSIN", "WI");
    m.insert("WYOMING", "WY");

    m
});

/// Lower 48 plus DC
pub const CONTINENTAL_STATES: &[&str] = &[
    "AL", "AZ", "AR", "CA", "CO", "CT", "DE", "FL", "GA", "ID", "IL", "IN", "IA", "KS", "KY",
    "LA", "ME", "MD", "MA", "MI", "MN", "MS", "MO", "MT", "NE", "NV", "NH", "NJ", "NM", "NY",
    "NC", "ND", "OH", "OK", "OR", "PA", "RI", "SC", "SD", "TN", "TX", "UT", "VT", "VA", "WA",
    "WV", "WI", "WY", "DC",
];

pub const NON_CONTIGUOUS_STATES: &[&str] = &["AK", "HI"];

pub const TERRITORIES: &[&str] = &["PR", "VI", "GU", "MP", "AS"];

/// Territory names excluded from the dealer opportunity list
pub const EXCLUDED_TERRITORY_NAMES: &[&str] = &[
    "PUERTO RICO",
    "GUAM",
    "U.S. VIRGIN ISLANDS",
    "AMERICAN SAMOA",
    "NORTHERN MARIANA ISLANDS",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StateGroup {
    Continental,
    NonContiguous,
    Territory,
}

/// Upper-case and trim a state/region value the way both sources need it
pub fn standardize(name: &str) -> String {
    name.trim().to_uppercase()
}

/// Full US state name (any case) to USPS code
pub fn state_code(name: &str) -> Option<&'static str> {
    STATE_CODES.get(standardize(name).as_str()).copied()
}

pub fn state_group(code: &str) -> Option<StateGroup> {
    if CONTINENTAL_STATES.contains(&code) {
        Some(StateGroup::Continental)
    } else if NON_CONTIGUOUS_STATES.contains(&code) {
        Some(StateGroup::NonContiguous)
    } else if TERRITORIES.contains(&code) {
        Some(StateGroup::Territory)
    } else {
        None
    }
}

pub fn is_excluded_territory_name(name: &str) -> bool {
    EXCLUDED_TERRITORY_NAMES.contains(&standardize(name).as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_code() {
        assert_eq!(state_code("Texas"), Some("TX"));
        assert_eq!(state_code("  new york "), Some("NY"));
        assert_eq!(state_code("WEST VIRGINIA"), Some("WV"));
        assert_eq!(state_code("Ontario"), None);
        assert_eq!(STATE_CODES.len(), 50);
    }

    #[test]
    fn test_state_group() {
        assert_eq!(state_group("KS"), Some(StateGroup::Continental));
        assert_eq!(state_group("DC"), Some(StateGroup::Continental));
        assert_eq!(state_group("AK"), Some(StateGroup::NonContiguous));
        assert_eq!(state_group("GU"), Some(StateGroup::Territory));
        assert_eq!(state_group("ZZ"), None);
        assert_eq!(CONTINENTAL_STATES.len(), 49);
    }

    #[test]
    fn test_excluded_territories() {
        assert!(is_excluded_territory_name("Puerto Rico"));
        assert!(is_excluded_territory_name(" u.s. virgin islands"));
        assert!(!is_excluded_territory_name("Florida"));
    }
}

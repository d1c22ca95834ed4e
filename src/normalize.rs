//! Text normalization for company, city and address fields
//!
//! `merge_key` builds the comparison key used by the record linker. The
//! `clean_*` functions produce tidied display names that are written back to
//! the directory files.

use regex::Regex;
use std::sync::LazyLock;

/// Legal-entity words stripped from the end of a merge key
pub const ENTITY_SUFFIXES: &[&str] = &["llc", "limited", "corp", "ltda"];

const KEY_PUNCTUATION: &[char] = &['&', '-', '.', ','];

static INCORPORATED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bIncorporated\b").expect("valid regex"));

static INC_DOT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bInc\.\b").expect("valid regex"));

static WHITESPACE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").expect("valid regex"));

/// Normalized comparison key. Missing input gives an empty key.
///
/// Lower-cases, drops `& - . ,`, collapses whitespace and then removes
/// trailing `llc`/`limited`/`corp`/`ltda` words until none is left, so the
/// result is stable under repeated application.
pub fn merge_key(text: Option<&str>) -> String {
    let Some(text) = text else {
        return String::new();
    };

    let lowered = text.to_lowercase();
    let stripped: String = lowered
        .chars()
        .filter(|c| !KEY_PUNCTUATION.contains(c))
        .collect();

    let mut words: Vec<&str> = stripped.split_whitespace().collect();
    while words
        .last()
        .is_some_and(|last| ENTITY_SUFFIXES.contains(last))
    {
        words.pop();
    }

    words.join(" ")
}

/// Shorthand for a field that is present but may be blank
pub fn key(text: &str) -> String {
    merge_key(Some(text))
}

/// Display cleaning for AEA `company` and FAA repair-station `Agency Name`
pub fn clean_company_name(name: &str) -> String {
    let name = name.trim();
    let name = INCORPORATED.replace_all(name, "Inc");
    let name = INC_DOT.replace_all(&name, "Inc");
    let name = name.replace(['.', ','], "");
    WHITESPACE.replace_all(&name, " ").into_owned()
}

/// Display cleaning for the FAA dealer `NAME` column
pub fn clean_dealer_name(name: &str) -> String {
    let name = WHITESPACE.replace_all(name, " ");
    let name = INCORPORATED.replace_all(&name, "Inc");
    name.trim_end_matches(['.', ',', ' ']).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_is_empty() {
        assert_eq!(merge_key(None), "");
        assert_eq!(key(""), "");
        assert_eq!(key("   "), "");
    }

    #[test]
    fn test_case_and_punctuation_insensitive() {
        assert_eq!(key("ACME Corp."), key("acme corp"));
        assert_eq!(key("ACME Corp."), "acme");
        assert_eq!(key("  Acme   LLC "), "acme");
        assert_eq!(key("Smith & Sons, Ltda"), "smith sons");
        assert_eq!(key("Jet-Tech Avionics"), "jettech avionics");
        assert_eq!(key("1 Main St."), "1 main st");
    }

    #[test]
    fn test_suffix_only_at_end_and_whole_word() {
        assert_eq!(key("Corp Aviation"), "corp aviation");
        assert_eq!(key("Microcorp"), "microcorp");
        assert_eq!(key("Sky Limited Corp LLC"), "sky");
        assert_eq!(key("LLC"), "");
    }

    #[test]
    fn test_idempotent() {
        let samples = [
            "ACME Corp.",
            "Sky Limited Corp LLC",
            "  Jet - Tech  ,  Inc. ",
            "Avionics & Co Ltda.",
            "ÉCLAIR AÉRO LIMITED",
            "",
            "corp llc",
            "A.B.C. Services, LLC",
        ];
        for sample in samples {
            let once = key(sample);
            assert_eq!(key(&once), once, "not idempotent for {sample:?}");
        }
    }

    #[test]
    fn test_clean_company_name() {
        assert_eq!(clean_company_name("  Acme Incorporated "), "Acme Inc");
        assert_eq!(clean_company_name("Acme, Inc."), "Acme Inc");
        assert_eq!(clean_company_name("Acme INC.Services"), "Acme IncServices");
        assert_eq!(clean_company_name("Acme  INC. Services"), "Acme INC Services");
        assert_eq!(clean_company_name("J.B.   Avionics"), "JB Avionics");
    }

    #[test]
    fn test_clean_dealer_name() {
        assert_eq!(clean_dealer_name("AERO   SALES incorporated."), "AERO SALES Inc");
        assert_eq!(clean_dealer_name("WINGS CO., "), "WINGS CO");
        assert_eq!(clean_dealer_name("J.B. AIR"), "J.B. AIR");
    }
}

//! Count-by-column aggregation with categorical binning
//!
//! One function covers every per-country and per-state count the maps need:
//! the caller picks the grouping column, an optional row filter, how raw
//! values map to region keys and the bin edges used for map categories.

use std::collections::{BTreeSet, HashMap};

use serde::Serialize;

use crate::country_codes::{country_name_to_iso3, iso2_to_iso3};
use crate::error::Result;
use crate::state_codes::{standardize, state_code};
use crate::table::Table;

/// How a raw cell becomes a group key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyMap {
    Identity,
    Upper,
    Iso2ToIso3,
    CountryNameToIso3,
    StateName,
}

impl KeyMap {
    pub fn apply(self, raw: &str) -> Option<String> {
        match self {
            KeyMap::Identity => Some(raw.to_string()),
            KeyMap::Upper => Some(standardize(raw)),
            KeyMap::Iso2ToIso3 => iso2_to_iso3(raw).map(str::to_string),
            KeyMap::CountryNameToIso3 => country_name_to_iso3(raw).map(str::to_string),
            KeyMap::StateName => state_code(raw).map(str::to_string),
        }
    }
}

/// How legend text is written for each interval
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub enum LegendStyle {
    /// `"{lo+1} - {hi-1}"` with thousands separators (US state map)
    #[default]
    Inner,
    /// `"{lo}-{hi}"` for the first interval, `"{lo+1}-{hi}"` after it and
    /// `">{lo}"` for an open top (world map)
    Closed,
}

/// Bin edges for choropleth categories.
///
/// Intervals are right-closed, `(e[i], e[i+1]]`, and the first interval also
/// includes its lower edge. With `open_top` the last edge is placed one above
/// the largest value once the data is known.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BinSpec {
    pub edges: Vec<f64>,
    pub open_top: bool,
    pub legend: LegendStyle,
    /// Set on resolved specs whose last edge was derived from the data
    pub derived_top: bool,
}

impl BinSpec {
    pub fn new(edges: Vec<f64>) -> Self {
        debug_assert!(edges.windows(2).all(|w| w[0] < w[1]), "bin edges must ascend");
        Self {
            edges,
            open_top: false,
            legend: LegendStyle::default(),
            derived_top: false,
        }
    }

    pub fn legend(mut self, legend: LegendStyle) -> Self {
        self.legend = legend;
        self
    }

    pub fn open_top(edges: Vec<f64>) -> Self {
        Self {
            open_top: true,
            ..Self::new(edges)
        }
    }

    /// Fixed edges for a data set whose largest value is `max`
    pub fn resolve(&self, max: f64) -> BinSpec {
        if !self.open_top {
            return self.clone();
        }
        let mut edges = self.edges.clone();
        let last = edges.last().copied().unwrap_or(0.0);
        edges.push(max.max(last) + 1.0);
        BinSpec {
            derived_top: true,
            ..BinSpec::new(edges).legend(self.legend)
        }
    }

    pub fn intervals(&self) -> usize {
        self.edges.len().saturating_sub(1)
    }

    /// 1-based category of `value`, or `None` outside every interval
    pub fn category(&self, value: f64) -> Option<usize> {
        let first = *self.edges.first()?;
        if value == first && self.intervals() > 0 {
            return Some(1);
        }
        self.edges
            .windows(2)
            .position(|w| value > w[0] && value <= w[1])
            .map(|i| i + 1)
    }

    /// Legend text per interval, e.g. `"1 - 499"` or `"51-1000"`
    pub fn legend_labels(&self) -> Vec<String> {
        let last = self.intervals().saturating_sub(1);
        self.edges
            .windows(2)
            .enumerate()
            .map(|(i, w)| {
                let (lo, hi) = (w[0] as i64, w[1] as i64);
                match self.legend {
                    LegendStyle::Inner => format!("{} - {}", thousands(lo + 1), thousands(hi - 1)),
                    LegendStyle::Closed if i == last && self.derived_top => format!(">{}", lo),
                    LegendStyle::Closed if i == 0 => format!("{}-{}", lo, hi),
                    LegendStyle::Closed => format!("{}-{}", lo + 1, hi),
                }
            })
            .collect()
    }
}

fn thousands(n: i64) -> String {
    let digits = n.unsigned_abs().to_string();
    let mut out = String::new();
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    if n < 0 {
        format!("-{}", out)
    } else {
        out
    }
}

#[derive(Debug, Clone)]
pub struct AggregationSpec {
    pub group_column: String,
    /// Keep only rows whose column equals the value exactly
    pub filter: Option<(String, String)>,
    pub key_map: KeyMap,
    pub bins: Option<BinSpec>,
}

impl AggregationSpec {
    pub fn new(group_column: &str, key_map: KeyMap) -> Self {
        Self {
            group_column: group_column.to_string(),
            filter: None,
            key_map,
            bins: None,
        }
    }

    pub fn filter(mut self, column: &str, value: &str) -> Self {
        self.filter = Some((column.to_string(), value.to_string()));
        self
    }

    pub fn bins(mut self, bins: BinSpec) -> Self {
        self.bins = Some(bins);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupCount {
    pub key: String,
    pub count: usize,
    pub category: Option<usize>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct Aggregation {
    pub groups: Vec<GroupCount>,
    /// Rows with an empty group value
    pub missing: usize,
    /// Rows whose value could not be mapped to a key
    pub unmapped: usize,
    pub unmapped_values: Vec<String>,
    pub bins: Option<BinSpec>,
}

impl Aggregation {
    pub fn total(&self) -> usize {
        self.groups.iter().map(|g| g.count).sum()
    }

    pub fn count_for(&self, key: &str) -> usize {
        self.groups
            .iter()
            .find(|g| g.key == key)
            .map(|g| g.count)
            .unwrap_or(0)
    }

    pub fn max_count(&self) -> usize {
        self.groups.iter().map(|g| g.count).max().unwrap_or(0)
    }

    /// Add a zero-count group for every key not already present, as a left
    /// join against a fixed region list would
    pub fn include_keys(&mut self, keys: &[&str]) {
        for key in keys {
            if !self.groups.iter().any(|g| g.key == *key) {
                self.groups.push(GroupCount {
                    key: key.to_string(),
                    count: 0,
                    category: None,
                });
            }
        }
        sort_groups(&mut self.groups);
    }

    /// Keep only the groups whose key passes `keep`, recomputing categories
    /// against the remaining counts
    pub fn retain_keys<F>(&mut self, bins: Option<&BinSpec>, mut keep: F)
    where
        F: FnMut(&str) -> bool,
    {
        self.groups.retain(|g| keep(&g.key));
        self.apply_bins(bins);
    }

    fn apply_bins(&mut self, spec: Option<&BinSpec>) {
        let resolved = spec.map(|s| s.resolve(self.max_count() as f64));
        for group in &mut self.groups {
            group.category = resolved
                .as_ref()
                .and_then(|bins| bins.category(group.count as f64));
        }
        self.bins = resolved;
    }

    pub fn to_table(&self, key_header: &str, count_header: &str) -> Table {
        let mut headers = vec![key_header.to_string(), count_header.to_string()];
        if self.bins.is_some() {
            headers.push("category".to_string());
        }
        let mut table = Table::new(headers);
        for group in &self.groups {
            let mut row = vec![group.key.clone(), group.count.to_string()];
            if self.bins.is_some() {
                row.push(group.category.map(|c| c.to_string()).unwrap_or_default());
            }
            table.push_row(row);
        }
        table
    }
}

fn sort_groups(groups: &mut [GroupCount]) {
    groups.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.key.cmp(&b.key)));
}

/// Count rows per mapped key of `spec.group_column`.
///
/// Groups are ordered by count descending, then key ascending.
pub fn aggregate(table: &Table, spec: &AggregationSpec) -> Result<Aggregation> {
    let group_col = table.require("input", &[spec.group_column.as_str()])?[0];
    let filter = match &spec.filter {
        Some((column, value)) => Some((table.require("input", &[column.as_str()])?[0], value)),
        None => None,
    };

    let mut counts: HashMap<String, usize> = HashMap::new();
    let mut unmapped_values = BTreeSet::new();
    let mut result = Aggregation::default();

    for row in table.rows() {
        if let Some((col, value)) = filter {
            if row[col] != *value {
                continue;
            }
        }

        let raw = row[group_col].trim();
        if raw.is_empty() {
            result.missing += 1;
            continue;
        }
        match spec.key_map.apply(raw) {
            Some(key) => *counts.entry(key).or_insert(0) += 1,
            None => {
                result.unmapped += 1;
                unmapped_values.insert(raw.to_string());
            }
        }
    }

    let mut groups: Vec<GroupCount> = counts
        .into_iter()
        .map(|(key, count)| GroupCount {
            key,
            count,
            category: None,
        })
        .collect();
    sort_groups(&mut groups);

    result.groups = groups;
    result.unmapped_values = unmapped_values.into_iter().collect();
    result.apply_bins(spec.bins.as_ref());
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn master() -> Table {
        Table::from_rows(
            &["N-NUMBER", "STATE", "COUNTRY"],
            vec![
                vec!["1", "TX", "US"],
                vec!["2", "tx ", "US"],
                vec!["3", "KS", "US"],
                vec!["4", "", "US"],
                vec!["5", "ON", "CA"],
                vec!["6", "", "RQ"],
                vec!["7", "", "ZZ"],
            ],
        )
    }

    #[test]
    fn test_count_by_state_with_filter() {
        let spec = AggregationSpec::new("STATE", KeyMap::Upper).filter("COUNTRY", "US");
        let agg = aggregate(&master(), &spec).unwrap();

        assert_eq!(agg.groups[0], GroupCount { key: "TX".into(), count: 2, category: None });
        assert_eq!(agg.count_for("KS"), 1);
        assert_eq!(agg.count_for("ON"), 0);
        assert_eq!(agg.missing, 1);
        assert_eq!(agg.total(), 3);
    }

    #[test]
    fn test_iso_mapping_reports_unmapped() {
        let spec = AggregationSpec::new("COUNTRY", KeyMap::Iso2ToIso3);
        let agg = aggregate(&master(), &spec).unwrap();

        assert_eq!(agg.count_for("USA"), 4);
        assert_eq!(agg.count_for("PRI"), 1);
        assert_eq!(agg.unmapped, 1);
        assert_eq!(agg.unmapped_values, vec!["ZZ".to_string()]);
    }

    #[test]
    fn test_missing_group_column() {
        let spec = AggregationSpec::new("state/territory/regions", KeyMap::StateName);
        let err = aggregate(&master(), &spec).unwrap_err();
        assert!(err.to_string().contains("state/territory/regions"));
    }

    #[test]
    fn test_bins_are_right_closed_with_inclusive_lowest() {
        let bins = BinSpec::new(vec![0.0, 500.0, 1000.0, 2000.0]);
        assert_eq!(bins.category(0.0), Some(1));
        assert_eq!(bins.category(500.0), Some(1));
        assert_eq!(bins.category(500.5), Some(2));
        assert_eq!(bins.category(2000.0), Some(3));
        assert_eq!(bins.category(2001.0), None);
        assert_eq!(bins.category(-1.0), None);
    }

    #[test]
    fn test_open_top_resolves_against_max() {
        let bins = BinSpec::open_top(vec![1.0, 50.0, 1000.0]);
        let resolved = bins.resolve(4_200.0);
        assert_eq!(resolved.edges, vec![1.0, 50.0, 1000.0, 4201.0]);
        assert_eq!(resolved.category(4_200.0), Some(3));

        // a small data set still yields ascending edges
        assert_eq!(bins.resolve(10.0).edges, vec![1.0, 50.0, 1000.0, 1001.0]);
    }

    #[test]
    fn test_world_legend_labels_cover_every_edge() {
        let bins = BinSpec::open_top(vec![1.0, 50.0, 1000.0])
            .legend(LegendStyle::Closed)
            .resolve(4_200.0);

        assert_eq!(bins.legend_labels(), vec!["1-50", "51-1000", ">1000"]);
        assert_eq!(bins.category(1.0), Some(1));
        assert_eq!(bins.category(50.0), Some(1));
        assert_eq!(bins.category(1000.0), Some(2));
        assert_eq!(bins.category(1001.0), Some(3));
    }

    #[test]
    fn test_filter_compares_exactly() {
        let table = Table::from_rows(
            &["STATE", "COUNTRY"],
            vec![vec!["TX", "US"], vec!["TX", "US "], vec!["KS", " US"]],
        );
        let spec = AggregationSpec::new("STATE", KeyMap::Upper).filter("COUNTRY", "US");
        let agg = aggregate(&table, &spec).unwrap();

        assert_eq!(agg.total(), 1);
        assert_eq!(agg.count_for("KS"), 0);
    }

    #[test]
    fn test_legend_labels() {
        let bins = BinSpec::new(vec![0.0, 500.0, 20000.0, 45211.0]);
        assert_eq!(
            bins.legend_labels(),
            vec!["1 - 499", "501 - 19,999", "20,001 - 45,210"]
        );
    }

    #[test]
    fn test_aggregation_assigns_categories() {
        let spec = AggregationSpec::new("STATE", KeyMap::Upper)
            .filter("COUNTRY", "US")
            .bins(BinSpec::open_top(vec![0.0, 1.0]));
        let agg = aggregate(&master(), &spec).unwrap();

        assert_eq!(agg.bins.as_ref().unwrap().edges, vec![0.0, 1.0, 3.0]);
        assert_eq!(agg.groups[0].category, Some(2));
        assert_eq!(agg.groups[1].category, Some(1));

        let table = agg.to_table("STUSPS", "count");
        assert_eq!(table.headers(), ["STUSPS", "count", "category"]);
        assert_eq!(table.rows()[0], vec!["TX", "2", "2"]);
    }

    #[test]
    fn test_retain_keys_rebins() {
        let spec = AggregationSpec::new("STATE", KeyMap::Upper).filter("COUNTRY", "US");
        let bins = BinSpec::open_top(vec![0.0]);
        let mut agg = aggregate(&master(), &spec.bins(bins.clone())).unwrap();

        agg.retain_keys(Some(&bins), |k| k != "TX");
        assert_eq!(agg.groups.len(), 1);
        assert_eq!(agg.bins.as_ref().unwrap().edges, vec![0.0, 2.0]);
    }

    #[test]
    fn test_include_keys_adds_zero_groups() {
        let spec = AggregationSpec::new("STATE", KeyMap::Upper).filter("COUNTRY", "US");
        let bins = BinSpec::open_top(vec![0.0, 1.0]);
        let mut agg = aggregate(&master(), &spec).unwrap();

        agg.include_keys(&["WY", "TX", "AL"]);
        agg.retain_keys(Some(&bins), |k| k != "KS");

        let keys: Vec<&str> = agg.groups.iter().map(|g| g.key.as_str()).collect();
        assert_eq!(keys, vec!["TX", "AL", "WY"]);
        assert_eq!(agg.groups[1].count, 0);
        assert_eq!(agg.groups[1].category, Some(1));
        assert_eq!(agg.groups[0].category, Some(2));
    }
}

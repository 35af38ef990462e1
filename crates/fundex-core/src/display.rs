//! Display projection and row ordering

use crate::types::FundRecord;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// Column labels, in [`DisplayRow`] field order
pub const DISPLAY_COLUMNS: [&str; 13] = [
    "Fund Name",
    "Fund Manager(s)",
    "Fund House",
    "Category",
    "Sub Category",
    "Risk Level",
    "Groww Rating",
    "AUM (Cr)",
    "1Y Return (%)",
    "3Y Return (%)",
    "5Y Return (%)",
    "Min Lumpsum (₹)",
    "Min SIP (₹)",
];

/// A table-ready view of one fund
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisplayRow {
    pub fund_name: String,
    /// Absent when the record has no usable id
    pub detail_link: Option<String>,
    pub fund_manager: Option<String>,
    pub fund_house: Option<String>,
    pub category: Option<String>,
    pub sub_category: Option<String>,
    pub risk: Option<String>,
    pub rating: Option<f64>,
    pub aum: Option<f64>,
    pub return_1y: Option<f64>,
    pub return_3y: Option<f64>,
    pub return_5y: Option<f64>,
    pub min_lumpsum: Option<f64>,
    pub min_sip: Option<f64>,
}

impl DisplayRow {
    pub fn from_record(record: &FundRecord, link_base: &str) -> Self {
        Self {
            fund_name: record.display_name().to_string(),
            detail_link: record.detail_link(link_base),
            fund_manager: record.fund_manager.clone(),
            fund_house: record.fund_house.clone(),
            category: record.category.clone(),
            sub_category: record.sub_category.clone(),
            risk: record.risk.clone(),
            rating: record.groww_rating,
            aum: record.aum,
            return_1y: record.return_1y,
            return_3y: record.return_3y,
            return_5y: record.return_5y,
            min_lumpsum: record.min_investment_amount,
            min_sip: record.min_sip_investment,
        }
    }

    /// Cell text in [`DISPLAY_COLUMNS`] order; absent values render empty
    pub fn cells(&self) -> [String; 13] {
        let text = |value: &Option<String>| value.clone().unwrap_or_default();
        [
            self.fund_name.clone(),
            text(&self.fund_manager),
            text(&self.fund_house),
            text(&self.category),
            text(&self.sub_category),
            text(&self.risk),
            format_number(self.rating),
            format_number(self.aum),
            format_number(self.return_1y),
            format_number(self.return_3y),
            format_number(self.return_5y),
            format_number(self.min_lumpsum),
            format_number(self.min_sip),
        ]
    }
}

/// Render an optional number with at most two decimals, trimming trailing zeros
pub fn format_number(value: Option<f64>) -> String {
    match value {
        None => String::new(),
        Some(v) => {
            let text = format!("{v:.2}");
            let text = text.trim_end_matches('0').trim_end_matches('.');
            if text == "-0" { "0".to_string() } else { text.to_string() }
        }
    }
}

/// Project records into display rows
pub fn project_for_display(records: &[FundRecord], link_base: &str) -> Vec<DisplayRow> {
    records.iter().map(|record| DisplayRow::from_record(record, link_base)).collect()
}

/// Column a table can be ordered by
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
    #[default]
    Name,
    Category,
    SubCategory,
    Risk,
    Rating,
    Aum,
    #[serde(rename = "return_1y")]
    Return1y,
    #[serde(rename = "return_3y")]
    Return3y,
    #[serde(rename = "return_5y")]
    Return5y,
}

impl SortKey {
    pub const ALL: [SortKey; 9] = [
        SortKey::Name,
        SortKey::Category,
        SortKey::SubCategory,
        SortKey::Risk,
        SortKey::Rating,
        SortKey::Aum,
        SortKey::Return1y,
        SortKey::Return3y,
        SortKey::Return5y,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            SortKey::Name => "name",
            SortKey::Category => "category",
            SortKey::SubCategory => "sub_category",
            SortKey::Risk => "risk",
            SortKey::Rating => "rating",
            SortKey::Aum => "aum",
            SortKey::Return1y => "return_1y",
            SortKey::Return3y => "return_3y",
            SortKey::Return5y => "return_5y",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            SortKey::Name => "Fund Name",
            SortKey::Category => "Category",
            SortKey::SubCategory => "Sub Category",
            SortKey::Risk => "Risk Level",
            SortKey::Rating => "Groww Rating",
            SortKey::Aum => "AUM",
            SortKey::Return1y => "1Y Return",
            SortKey::Return3y => "3Y Return",
            SortKey::Return5y => "5Y Return",
        }
    }

    fn compare(self, a: &DisplayRow, b: &DisplayRow) -> Option<Ordering> {
        let text = |x: &Option<String>, y: &Option<String>| match (x, y) {
            (Some(x), Some(y)) => Some(x.cmp(y)),
            _ => None,
        };
        let number = |x: Option<f64>, y: Option<f64>| match (x, y) {
            (Some(x), Some(y)) => Some(x.total_cmp(&y)),
            _ => None,
        };
        match self {
            SortKey::Name => Some(a.fund_name.cmp(&b.fund_name)),
            SortKey::Category => text(&a.category, &b.category),
            SortKey::SubCategory => text(&a.sub_category, &b.sub_category),
            SortKey::Risk => text(&a.risk, &b.risk),
            SortKey::Rating => number(a.rating, b.rating),
            SortKey::Aum => number(a.aum, b.aum),
            SortKey::Return1y => number(a.return_1y, b.return_1y),
            SortKey::Return3y => number(a.return_3y, b.return_3y),
            SortKey::Return5y => number(a.return_5y, b.return_5y),
        }
    }

    fn is_present(self, row: &DisplayRow) -> bool {
        match self {
            SortKey::Name => true,
            SortKey::Category => row.category.is_some(),
            SortKey::SubCategory => row.sub_category.is_some(),
            SortKey::Risk => row.risk.is_some(),
            SortKey::Rating => row.rating.is_some(),
            SortKey::Aum => row.aum.is_some(),
            SortKey::Return1y => row.return_1y.is_some(),
            SortKey::Return3y => row.return_3y.is_some(),
            SortKey::Return5y => row.return_5y.is_some(),
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SortKey::ALL
            .into_iter()
            .find(|key| key.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown sort key '{s}'"))
    }
}

/// Requested ordering of display rows
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RowOrder {
    pub key: SortKey,
    pub descending: bool,
}

impl RowOrder {
    pub fn new(key: SortKey, descending: bool) -> Self {
        Self { key, descending }
    }

    /// Stable sort; rows missing the key value always go last
    pub fn sort(&self, rows: &mut [DisplayRow]) {
        let key = self.key;
        rows.sort_by(|a, b| match (key.is_present(a), key.is_present(b)) {
            (true, false) => Ordering::Less,
            (false, true) => Ordering::Greater,
            (false, false) => Ordering::Equal,
            (true, true) => {
                let ordering = key.compare(a, b).unwrap_or(Ordering::Equal);
                if self.descending { ordering.reverse() } else { ordering }
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::DEFAULT_DETAIL_LINK_BASE;

    fn record(name: &str, return_1y: Option<f64>) -> FundRecord {
        FundRecord {
            id: Some(name.to_lowercase().replace(' ', "-")),
            scheme_name: Some(name.to_string()),
            return_1y,
            ..Default::default()
        }
    }

    #[test]
    fn test_projection_carries_fields_and_link() {
        let mut source = record("Axis Bluechip", Some(14.2));
        source.fund_house = Some("Axis".into());
        source.min_sip_investment = Some(500.0);

        let rows = project_for_display(&[source], DEFAULT_DETAIL_LINK_BASE);
        let row = &rows[0];
        assert_eq!(row.fund_name, "Axis Bluechip");
        assert_eq!(
            row.detail_link.as_deref(),
            Some("https://groww.in/mutual-funds/axis-bluechip")
        );
        assert_eq!(row.fund_house.as_deref(), Some("Axis"));
        assert_eq!(row.min_sip, Some(500.0));
        assert_eq!(row.fund_manager, None);
    }

    #[test]
    fn test_projection_without_id_or_name() {
        let rows = project_for_display(&[FundRecord::default()], DEFAULT_DETAIL_LINK_BASE);
        assert_eq!(rows[0].fund_name, "Unknown");
        assert_eq!(rows[0].detail_link, None);
        assert_eq!(rows[0].cells()[1], "");
    }

    #[test]
    fn test_missing_values_sort_last_both_directions() {
        let records = vec![
            record("A", None),
            record("B", Some(5.0)),
            record("C", Some(-3.0)),
            record("D", Some(20.0)),
        ];
        let mut rows = project_for_display(&records, DEFAULT_DETAIL_LINK_BASE);

        RowOrder::new(SortKey::Return1y, true).sort(&mut rows);
        let names: Vec<_> = rows.iter().map(|r| r.fund_name.as_str()).collect();
        assert_eq!(names, vec!["D", "B", "C", "A"]);

        RowOrder::new(SortKey::Return1y, false).sort(&mut rows);
        let names: Vec<_> = rows.iter().map(|r| r.fund_name.as_str()).collect();
        assert_eq!(names, vec!["C", "B", "D", "A"]);
    }

    #[test]
    fn test_sort_key_parsing() {
        assert_eq!("return_3y".parse::<SortKey>(), Ok(SortKey::Return3y));
        assert_eq!(" AUM ".parse::<SortKey>(), Ok(SortKey::Aum));
        assert!("yield".parse::<SortKey>().is_err());
        for key in SortKey::ALL {
            assert_eq!(key.to_string().parse::<SortKey>(), Ok(key));
        }
    }

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(None), "");
        assert_eq!(format_number(Some(12.0)), "12");
        assert_eq!(format_number(Some(12.346)), "12.35");
        assert_eq!(format_number(Some(-0.001)), "0");
        assert_eq!(format_number(Some(1500.5)), "1500.5");
    }
}

//! Facet construction
//!
//! Facets enumerate the distinct values a user can filter on. Absent values are
//! grouped under [`UNKNOWN_BUCKET`](crate::types::UNKNOWN_BUCKET) so that every
//! record is reachable from some facet value.

use crate::types::FundRecord;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Category to subcategory index, both levels in ascending order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FacetIndex {
    entries: BTreeMap<String, BTreeSet<String>>,
}

impl FacetIndex {
    /// Group every record's subcategory under its category
    pub fn build(records: &[FundRecord]) -> Self {
        let mut entries: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();
        for record in records {
            entries
                .entry(record.category_bucket().to_string())
                .or_default()
                .insert(record.sub_category_bucket().to_string());
        }
        Self { entries }
    }

    pub fn categories(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Subcategories observed under `category`, empty when the category is unknown
    pub fn subcategories(&self, category: &str) -> impl Iterator<Item = &str> {
        self.entries.get(category).into_iter().flatten().map(String::as_str)
    }

    pub fn contains(&self, category: &str, sub_category: &str) -> bool {
        self.entries.get(category).is_some_and(|subs| subs.contains(sub_category))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &BTreeSet<String>)> {
        self.entries.iter().map(|(category, subs)| (category.as_str(), subs))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Convenience wrapper matching the other engine entry points
pub fn build_facets(records: &[FundRecord]) -> FacetIndex {
    FacetIndex::build(records)
}

/// Distinct risk levels in ascending order
pub fn build_risk_facet(records: &[FundRecord]) -> BTreeSet<String> {
    records.iter().map(|record| record.risk_bucket().to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::UNKNOWN_BUCKET;

    fn record(category: Option<&str>, sub_category: Option<&str>) -> FundRecord {
        FundRecord {
            category: category.map(str::to_string),
            sub_category: sub_category.map(str::to_string),
            ..Default::default()
        }
    }

    #[test]
    fn test_groups_and_sorts() {
        let records = vec![
            record(Some("Equity"), Some("Mid Cap")),
            record(Some("Debt"), Some("Liquid")),
            record(Some("Equity"), Some("Large Cap")),
            record(Some("Equity"), Some("Mid Cap")),
        ];
        let facets = build_facets(&records);

        assert_eq!(facets.categories().collect::<Vec<_>>(), vec!["Debt", "Equity"]);
        assert_eq!(
            facets.subcategories("Equity").collect::<Vec<_>>(),
            vec!["Large Cap", "Mid Cap"]
        );
        assert!(facets.contains("Debt", "Liquid"));
        assert!(!facets.contains("Debt", "Mid Cap"));
        assert_eq!(facets.subcategories("Hybrid").count(), 0);
    }

    #[test]
    fn test_absent_values_use_unknown_bucket() {
        let records = vec![record(None, Some("Gilt")), record(Some("Debt"), None)];
        let facets = build_facets(&records);

        assert!(facets.contains(UNKNOWN_BUCKET, "Gilt"));
        assert!(facets.contains("Debt", UNKNOWN_BUCKET));
        assert_eq!(facets.len(), 2);
    }

    #[test]
    fn test_risk_facet() {
        let mut records = vec![record(None, None); 3];
        records[0].risk = Some("Very High".into());
        records[1].risk = Some("Low".into());

        let risks: Vec<_> = build_risk_facet(&records).into_iter().collect();
        assert_eq!(risks, vec!["Low", "Unknown", "Very High"]);
    }

    #[test]
    fn test_empty_catalog() {
        let facets = build_facets(&[]);
        assert!(facets.is_empty());
        assert_eq!(serde_json::to_string(&facets).unwrap(), "{}");
    }
}

//! Filter selection and evaluation
//!
//! A [`FilterSelection`] is a plain value built by the presentation layer from
//! user input. Evaluation is a pure projection over the catalog.

use crate::types::FundRecord;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Separator between category and subcategory in flat `category::subcategory` keys
pub const SUBCATEGORY_SEPARATOR: &str = "::";

/// Split a flat `category::subcategory` key on its last separator.
///
/// Either side may be empty, since an empty upstream string is its own facet
/// value. A category may itself contain `::`; a subcategory may not.
pub fn split_subcategory_key(key: &str) -> Option<(&str, &str)> {
    key.rsplit_once(SUBCATEGORY_SEPARATOR)
}

/// The user's current filter choice
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FilterSelection {
    /// Selected categories; empty means no category filter
    pub categories: BTreeSet<String>,
    /// Per-category subcategory narrowing
    pub subcategories_by_category: BTreeMap<String, BTreeSet<String>>,
    /// Selected risk levels; empty means no risk filter
    pub risks: BTreeSet<String>,
    /// Case-insensitive text matched against fund name, fund house and manager
    pub search: Option<String>,
}

impl FilterSelection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.categories.insert(category.into());
        self
    }

    /// Narrow `category` to `sub_category`, selecting the category as well
    pub fn with_subcategory(
        mut self,
        category: impl Into<String>,
        sub_category: impl Into<String>,
    ) -> Self {
        let category = category.into();
        self.categories.insert(category.clone());
        self.subcategories_by_category.entry(category).or_default().insert(sub_category.into());
        self
    }

    pub fn with_risk(mut self, risk: impl Into<String>) -> Self {
        self.risks.insert(risk.into());
        self
    }

    pub fn with_search(mut self, text: impl Into<String>) -> Self {
        self.search = Some(text.into());
        self
    }

    /// Parse a flat `category::subcategory` key and add it to the selection.
    ///
    /// Returns `false` when the key has no separator.
    pub fn insert_subcategory_key(&mut self, key: &str) -> bool {
        match split_subcategory_key(key) {
            Some((category, sub_category)) => {
                self.categories.insert(category.to_string());
                self.subcategories_by_category
                    .entry(category.to_string())
                    .or_default()
                    .insert(sub_category.to_string());
                true
            }
            None => false,
        }
    }

    /// Search text with surrounding whitespace removed; blank means no search
    pub fn search_text(&self) -> Option<&str> {
        self.search.as_deref().map(str::trim).filter(|text| !text.is_empty())
    }

    /// True when nothing is selected and every record passes
    pub fn is_empty(&self) -> bool {
        self.categories.is_empty() && self.risks.is_empty() && self.search_text().is_none()
    }

    /// True when at least one category carries a non-empty subcategory set
    pub fn narrows_subcategories(&self) -> bool {
        self.subcategories_by_category.values().any(|subs| !subs.is_empty())
    }

    pub fn is_subcategory_selected(&self, category: &str, sub_category: &str) -> bool {
        self.subcategories_by_category
            .get(category)
            .is_some_and(|subs| subs.contains(sub_category))
    }

    /// Decide whether a single record passes this selection
    pub fn matches(&self, record: &FundRecord) -> bool {
        self.matches_category(record) && self.matches_risk(record) && self.matches_search(record)
    }

    fn matches_category(&self, record: &FundRecord) -> bool {
        if self.categories.is_empty() {
            return true;
        }

        let category = record.category_bucket();
        if !self.categories.contains(category) {
            return false;
        }
        if !self.narrows_subcategories() {
            return true;
        }

        // (cat = C1 AND sub in S1) OR (cat = C2 AND sub in S2) OR ..., where a
        // category without a subcategory choice admits all of its records.
        match self.subcategories_by_category.get(category) {
            Some(subs) if !subs.is_empty() => subs.contains(record.sub_category_bucket()),
            _ => true,
        }
    }

    fn matches_risk(&self, record: &FundRecord) -> bool {
        self.risks.is_empty() || self.risks.contains(record.risk_bucket())
    }

    fn matches_search(&self, record: &FundRecord) -> bool {
        let Some(text) = self.search_text() else {
            return true;
        };
        let needle = text.to_lowercase();
        [&record.scheme_name, &record.fund_house, &record.fund_manager]
            .into_iter()
            .flatten()
            .any(|field| field.to_lowercase().contains(&needle))
    }
}

/// Keep the records that pass `selection`, preserving input order
pub fn apply_filter(records: &[FundRecord], selection: &FilterSelection) -> Vec<FundRecord> {
    if selection.is_empty() {
        return records.to_vec();
    }
    records.iter().filter(|record| selection.matches(record)).cloned().collect()
}

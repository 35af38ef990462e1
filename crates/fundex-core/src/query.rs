//! Flat key/value form of a filter request
//!
//! Browsers submit checkbox forms as repeated keys. The HTTP and HTML layers
//! decode the query string into pairs and hand them here:
//!
//! * `category=<name>` (repeatable)
//! * `subcategory=<category>::<subcategory>` (repeatable, selects the category too)
//! * `risk=<level>` (repeatable)
//! * `q=<text>` (case-insensitive match on fund name, fund house or manager)
//! * `sort=<key>` and `order=asc|desc`
//! * `limit=<n>`
//!
//! Facet values are taken verbatim: an empty upstream string is a facet of its
//! own, so `category=` selects it. The remaining parameters are trimmed, and a
//! blank one is ignored so that empty form fields do not narrow anything.

use crate::display::{RowOrder, SortKey};
use crate::filter::{FilterSelection, SUBCATEGORY_SEPARATOR};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid `{field}` parameter: {message}")]
pub struct QueryError {
    pub field: String,
    pub message: String,
}

impl QueryError {
    fn new(field: &str, message: impl Into<String>) -> Self {
        Self { field: field.to_string(), message: message.into() }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListQuery {
    pub selection: FilterSelection,
    pub order: RowOrder,
    pub limit: Option<usize>,
}

impl ListQuery {
    pub fn from_pairs<I, K, V>(pairs: I) -> Result<Self, QueryError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut query = ListQuery::default();
        for (key, value) in pairs {
            let raw = value.as_ref();
            match key.as_ref() {
                "category" => {
                    query.selection.categories.insert(raw.to_string());
                    continue;
                }
                "subcategory" => {
                    if !query.selection.insert_subcategory_key(raw) {
                        return Err(QueryError::new(
                            "subcategory",
                            format!("expected `category{SUBCATEGORY_SEPARATOR}subcategory`, got '{raw}'"),
                        ));
                    }
                    continue;
                }
                "risk" => {
                    query.selection.risks.insert(raw.to_string());
                    continue;
                }
                _ => {}
            }

            let value = raw.trim();
            if value.is_empty() {
                continue;
            }
            match key.as_ref() {
                "q" => {
                    query.selection.search = Some(value.to_string());
                }
                "sort" => {
                    query.order.key =
                        value.parse::<SortKey>().map_err(|e| QueryError::new("sort", e))?;
                }
                "order" => {
                    query.order.descending = match value.to_ascii_lowercase().as_str() {
                        "asc" => false,
                        "desc" => true,
                        other => {
                            return Err(QueryError::new(
                                "order",
                                format!("expected `asc` or `desc`, got '{other}'"),
                            ));
                        }
                    };
                }
                "limit" => {
                    let limit = value
                        .parse::<usize>()
                        .map_err(|_| QueryError::new("limit", format!("not a count: '{value}'")))?;
                    query.limit = Some(limit);
                }
                // Unknown keys are tolerated so that links can carry extra state.
                _ => {}
            }
        }
        Ok(query)
    }

    /// Inverse of [`ListQuery::from_pairs`], in a deterministic order
    pub fn to_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = Vec::new();
        for category in &self.selection.categories {
            pairs.push(("category".to_string(), category.clone()));
        }
        for (category, subs) in &self.selection.subcategories_by_category {
            for sub in subs {
                pairs.push((
                    "subcategory".to_string(),
                    format!("{category}{SUBCATEGORY_SEPARATOR}{sub}"),
                ));
            }
        }
        for risk in &self.selection.risks {
            pairs.push(("risk".to_string(), risk.clone()));
        }
        if let Some(text) = self.selection.search_text() {
            pairs.push(("q".to_string(), text.to_string()));
        }
        if self.order != RowOrder::default() {
            pairs.push(("sort".to_string(), self.order.key.to_string()));
            let direction = if self.order.descending { "desc" } else { "asc" };
            pairs.push(("order".to_string(), direction.to_string()));
        }
        if let Some(limit) = self.limit {
            pairs.push(("limit".to_string(), limit.to_string()));
        }
        pairs
    }
}

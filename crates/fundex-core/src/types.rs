use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Bucket name used for absent categorical values
pub const UNKNOWN_BUCKET: &str = "Unknown";

/// Default base for per-fund detail pages
pub const DEFAULT_DETAIL_LINK_BASE: &str = "https://groww.in/mutual-funds/";

/// One scheme from the upstream catalog
///
/// Every field is optional. Absent upstream values decode to `None`; an empty
/// string stays `Some("")` so callers can tell the two apart.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FundRecord {
    /// Opaque identifier, used as the detail link path segment
    #[serde(default, deserialize_with = "lenient_text")]
    pub id: Option<String>,

    #[serde(default, deserialize_with = "lenient_text")]
    pub scheme_name: Option<String>,

    #[serde(default, deserialize_with = "lenient_text")]
    pub category: Option<String>,

    #[serde(default, deserialize_with = "lenient_text")]
    pub sub_category: Option<String>,

    #[serde(default, deserialize_with = "lenient_text")]
    pub fund_manager: Option<String>,

    #[serde(default, deserialize_with = "lenient_text")]
    pub fund_house: Option<String>,

    #[serde(default, deserialize_with = "lenient_text")]
    pub risk: Option<String>,

    #[serde(default, deserialize_with = "lenient_number")]
    pub groww_rating: Option<f64>,

    /// Assets under management, in crores
    #[serde(default, deserialize_with = "lenient_number")]
    pub aum: Option<f64>,

    #[serde(rename = "return1y", default, deserialize_with = "lenient_number")]
    pub return_1y: Option<f64>,

    #[serde(rename = "return3y", default, deserialize_with = "lenient_number")]
    pub return_3y: Option<f64>,

    #[serde(rename = "return5y", default, deserialize_with = "lenient_number")]
    pub return_5y: Option<f64>,

    #[serde(default, deserialize_with = "lenient_number")]
    pub min_investment_amount: Option<f64>,

    #[serde(default, deserialize_with = "lenient_number")]
    pub min_sip_investment: Option<f64>,
}

impl FundRecord {
    /// Category used for grouping and matching
    pub fn category_bucket(&self) -> &str {
        self.category.as_deref().unwrap_or(UNKNOWN_BUCKET)
    }

    /// Subcategory used for grouping and matching
    pub fn sub_category_bucket(&self) -> &str {
        self.sub_category.as_deref().unwrap_or(UNKNOWN_BUCKET)
    }

    pub fn risk_bucket(&self) -> &str {
        self.risk.as_deref().unwrap_or(UNKNOWN_BUCKET)
    }

    pub fn display_name(&self) -> &str {
        self.scheme_name.as_deref().unwrap_or(UNKNOWN_BUCKET)
    }

    /// Detail page URL, or `None` when the record has no usable id
    pub fn detail_link(&self, link_base: &str) -> Option<String> {
        let id = self.id.as_deref()?.trim();
        if id.is_empty() {
            return None;
        }
        Some(format!("{}/{}", link_base.trim_end_matches('/'), id))
    }
}

// Upstream fields are loosely typed. A value of the wrong shape degrades to
// `None` rather than failing the whole payload.

fn lenient_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::String(s)) => Some(s),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}

fn lenient_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok().filter(|v| v.is_finite()),
        _ => None,
    })
}

//! Fundex Core
//!
//! Data model and engine for the Fundex mutual fund explorer. The crate turns a
//! raw scheme list into filter facets and a filtered, display-ready view, and
//! publishes each successful load as an immutable snapshot.
//!
//! Nothing here performs HTTP; concrete sources implement [`CatalogSource`].

pub mod catalog;
pub mod decode;
pub mod display;
pub mod error;
pub mod facets;
pub mod filter;
pub mod query;
pub mod types;

pub use catalog::{Catalog, CatalogSource, CatalogView, Snapshot, SnapshotInfo};
pub use decode::{CONTENT_FIELD, decode_catalog_page, decode_catalog_value};
pub use display::{DISPLAY_COLUMNS, DisplayRow, RowOrder, SortKey, format_number, project_for_display};
pub use error::{LoadError, LoadResult};
pub use facets::{FacetIndex, build_facets, build_risk_facet};
pub use filter::{FilterSelection, SUBCATEGORY_SEPARATOR, apply_filter, split_subcategory_key};
pub use query::{ListQuery, QueryError};
pub use types::{DEFAULT_DETAIL_LINK_BASE, FundRecord, UNKNOWN_BUCKET};

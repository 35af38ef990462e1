//! Catalog snapshots and their publication
//!
//! A [`Snapshot`] bundles the records of one successful load with the facets
//! derived from them. [`Catalog`] owns the currently published snapshot and
//! replaces it wholesale on every successful refresh. Readers clone the `Arc`
//! and never observe a snapshot under construction.

use crate::display::{DisplayRow, RowOrder, project_for_display};
use crate::error::LoadResult;
use crate::facets::{FacetIndex, build_risk_facet};
use crate::filter::{FilterSelection, apply_filter};
use crate::types::{DEFAULT_DETAIL_LINK_BASE, FundRecord};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock};
use std::time::Instant;
use tracing::{debug, info, instrument, warn};

/// Anything that can produce a full catalog in one call
#[async_trait]
pub trait CatalogSource: Send + Sync {
    async fn load(&self) -> LoadResult<Vec<FundRecord>>;

    /// Short label for logs
    fn describe(&self) -> String {
        "catalog source".to_string()
    }
}

/// One immutable, fully built catalog load
#[derive(Debug)]
pub struct Snapshot {
    pub records: Vec<FundRecord>,
    pub facets: FacetIndex,
    pub risks: BTreeSet<String>,
    pub loaded_at: DateTime<Utc>,
    /// Refresh ticket that produced this snapshot; newer loads have larger values
    pub generation: u64,
}

impl Snapshot {
    pub fn build(records: Vec<FundRecord>, generation: u64) -> Self {
        let facets = FacetIndex::build(&records);
        let risks = build_risk_facet(&records);
        Self { records, facets, risks, loaded_at: Utc::now(), generation }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Filter, project and order this snapshot's records
    pub fn view(&self, selection: &FilterSelection, order: RowOrder, link_base: &str) -> CatalogView {
        let matched = apply_filter(&self.records, selection);
        let mut rows = project_for_display(&matched, link_base);
        order.sort(&mut rows);
        CatalogView {
            generation: self.generation,
            loaded_at: self.loaded_at,
            total: self.records.len(),
            matched: rows.len(),
            rows,
        }
    }

    pub fn info(&self) -> SnapshotInfo {
        SnapshotInfo {
            generation: self.generation,
            loaded_at: self.loaded_at,
            records: self.records.len(),
            categories: self.facets.len(),
        }
    }
}

/// Summary of a published snapshot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotInfo {
    pub generation: u64,
    pub loaded_at: DateTime<Utc>,
    pub records: usize,
    pub categories: usize,
}

/// Filtered rows computed against a single snapshot
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogView {
    pub generation: u64,
    pub loaded_at: DateTime<Utc>,
    pub total: usize,
    pub matched: usize,
    pub rows: Vec<DisplayRow>,
}

/// Holder of the published snapshot
pub struct Catalog {
    source: Arc<dyn CatalogSource>,
    link_base: String,
    published: RwLock<Option<Arc<Snapshot>>>,
    next_ticket: AtomicU64,
}

impl std::fmt::Debug for Catalog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Catalog")
            .field("source", &self.source.describe())
            .field("link_base", &self.link_base)
            .field("generation", &self.current().map(|s| s.generation))
            .finish()
    }
}

impl Catalog {
    pub fn new(source: Arc<dyn CatalogSource>) -> Self {
        Self {
            source,
            link_base: DEFAULT_DETAIL_LINK_BASE.to_string(),
            published: RwLock::new(None),
            next_ticket: AtomicU64::new(0),
        }
    }

    pub fn with_link_base(mut self, link_base: impl Into<String>) -> Self {
        self.link_base = link_base.into();
        self
    }

    pub fn link_base(&self) -> &str {
        &self.link_base
    }

    /// The last published snapshot, if any load has succeeded
    pub fn current(&self) -> Option<Arc<Snapshot>> {
        self.published.read().unwrap_or_else(PoisonError::into_inner).clone()
    }

    /// Load from the source and publish the result.
    ///
    /// On failure the previously published snapshot stays in place. When loads
    /// overlap, the one started last wins and older results are dropped.
    #[instrument(skip(self), fields(source = %self.source.describe()))]
    pub async fn refresh(&self) -> LoadResult<Arc<Snapshot>> {
        let ticket = self.next_ticket.fetch_add(1, Ordering::SeqCst) + 1;
        let started = Instant::now();

        let records = match self.source.load().await {
            Ok(records) => records,
            Err(e) => {
                warn!(
                    ticket,
                    error = %e,
                    category = e.category(),
                    retained_generation = self.current().map(|s| s.generation),
                    "Catalog refresh failed; keeping previous snapshot"
                );
                return Err(e);
            }
        };

        let snapshot = Arc::new(Snapshot::build(records, ticket));
        info!(
            ticket,
            records = snapshot.len(),
            categories = snapshot.facets.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Catalog snapshot built"
        );
        Ok(self.publish(snapshot))
    }

    fn publish(&self, snapshot: Arc<Snapshot>) -> Arc<Snapshot> {
        let mut published = self.published.write().unwrap_or_else(PoisonError::into_inner);
        match published.as_ref() {
            Some(current) if current.generation > snapshot.generation => {
                debug!(
                    stale = snapshot.generation,
                    current = current.generation,
                    "Discarding stale catalog load"
                );
                Arc::clone(current)
            }
            _ => {
                *published = Some(Arc::clone(&snapshot));
                snapshot
            }
        }
    }

    /// Filtered view of the published snapshot
    pub fn view(&self, selection: &FilterSelection, order: RowOrder) -> Option<CatalogView> {
        self.current().map(|snapshot| snapshot.view(selection, order, &self.link_base))
    }
}

//! Upstream catalog client
//!
//! Issues the single search request that returns the whole direct-plan scheme
//! list and hands the body to the core decoder. There is no retry; a failed
//! load is reported and the previous snapshot keeps serving.

use crate::config::SourceConfig;
use async_trait::async_trait;
use fundex_core::{CatalogSource, FundRecord, LoadError, LoadResult, decode_catalog_page};
use reqwest::Url;
use std::time::{Duration, Instant};
use tracing::{debug, info, instrument};

/// Catalog source backed by the Groww scheme search endpoint
#[derive(Debug, Clone)]
pub struct GrowwSource {
    client: reqwest::Client,
    url: Url,
}

impl GrowwSource {
    pub fn new(config: &SourceConfig) -> anyhow::Result<Self> {
        let url = Self::request_url(config)?;
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .user_agent(concat!("fundex/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { client, url })
    }

    /// Base URL plus the fixed search parameters
    pub fn request_url(config: &SourceConfig) -> anyhow::Result<Url> {
        let page_size = config.page_size.to_string();
        let sort_by = config.sort_by.to_string();
        let url = Url::parse_with_params(
            &config.base_url,
            &[
                ("available_for_investment", "true"),
                ("doc_type", "scheme"),
                ("max_aum", ""),
                ("page", "0"),
                ("plan_type", config.plan_type.as_str()),
                ("q", ""),
                ("size", page_size.as_str()),
                ("sort_by", sort_by.as_str()),
            ],
        )?;
        Ok(url)
    }

    pub fn url(&self) -> &Url {
        &self.url
    }
}

#[async_trait]
impl CatalogSource for GrowwSource {
    #[instrument(name = "catalog_load", skip(self), fields(url = %self.url))]
    async fn load(&self) -> LoadResult<Vec<FundRecord>> {
        let started = Instant::now();
        let response = self
            .client
            .get(self.url.clone())
            .send()
            .await
            .map_err(|e| LoadError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(LoadError::Transport(status.as_u16()));
        }

        let body = response.bytes().await.map_err(|e| LoadError::Network(e.to_string()))?;
        debug!(bytes = body.len(), "Catalog body received");

        let records = decode_catalog_page(&body)?;
        info!(
            records = records.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Catalog loaded"
        );
        Ok(records)
    }

    fn describe(&self) -> String {
        format!("{}{}", self.url.host_str().unwrap_or("catalog"), self.url.path())
    }
}

use anyhow::Context;
use fundex_core::DEFAULT_DETAIL_LINK_BASE;
use serde::Deserialize;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;
use tracing::{info, warn};

pub const DEFAULT_SOURCE_URL: &str = "https://groww.in/v1/api/search/v1/derived/scheme";

#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_max_body_kb")]
    pub max_body_kb: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            max_body_kb: default_max_body_kb(),
        }
    }
}

/// Upstream search endpoint and its fixed query parameters
#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct SourceConfig {
    #[serde(default = "default_source_url")]
    pub base_url: String,
    #[serde(default = "default_plan_type")]
    pub plan_type: String,
    #[serde(default = "default_page_size")]
    pub page_size: u32,
    #[serde(default = "default_sort_by")]
    pub sort_by: u32,
    #[serde(default = "default_source_timeout_seconds")]
    pub timeout_seconds: u64,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            base_url: default_source_url(),
            plan_type: default_plan_type(),
            page_size: default_page_size(),
            sort_by: default_sort_by(),
            timeout_seconds: default_source_timeout_seconds(),
        }
    }
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct RefreshConfig {
    /// Seconds between background reloads; 0 disables them
    #[serde(default = "default_refresh_interval_seconds")]
    pub interval_seconds: u64,
}

impl Default for RefreshConfig {
    fn default() -> Self {
        Self { interval_seconds: default_refresh_interval_seconds() }
    }
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct DisplayConfig {
    #[serde(default = "default_detail_link_base")]
    pub detail_link_base: String,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self { detail_link_base: default_detail_link_base() }
    }
}

#[derive(Deserialize, Debug, Clone, Default, PartialEq)]
pub struct FundexConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub source: SourceConfig,
    #[serde(default)]
    pub refresh: RefreshConfig,
    #[serde(default)]
    pub display: DisplayConfig,
}

impl FundexConfig {
    /// Read the TOML file named by `FUNDEX_CONFIG_PATH` (default `fundex.toml`).
    ///
    /// A missing file falls back to built-in defaults; an unreadable or
    /// malformed one is an error.
    pub fn load() -> anyhow::Result<Self> {
        let config_path =
            std::env::var("FUNDEX_CONFIG_PATH").unwrap_or_else(|_| "fundex.toml".to_string());
        Self::load_from(Path::new(&config_path))
    }

    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        match fs::read_to_string(path) {
            Ok(config_str) => Self::from_toml_str(&config_str).with_context(|| {
                format!("failed to parse configuration file '{}'", path.display())
            }),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                warn!(
                    "Configuration file '{}' not found. Using default configuration.",
                    path.display()
                );
                Ok(Self::default())
            }
            Err(e) => Err(e)
                .with_context(|| format!("failed to read configuration file '{}'", path.display())),
        }
    }

    pub fn from_toml_str(config_str: &str) -> anyhow::Result<Self> {
        Ok(toml::from_str(config_str)?)
    }

    /// Apply `FUNDEX_*` environment variable overrides
    pub fn apply_profile(self) -> Self {
        self.apply_overrides(|key| std::env::var(key).ok())
    }

    pub fn apply_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        fn parsed<T: std::str::FromStr>(
            lookup: &impl Fn(&str) -> Option<String>,
            key: &str,
        ) -> Option<T> {
            let raw = lookup(key)?;
            match raw.trim().parse::<T>() {
                Ok(value) => Some(value),
                Err(_) => {
                    warn!(key, value = %raw, "Ignoring unparsable environment override");
                    None
                }
            }
        }

        if let Some(host) = lookup("FUNDEX_HOST") {
            self.server.host = host;
        }
        if let Some(port) = parsed(&lookup, "FUNDEX_PORT") {
            self.server.port = port;
        }
        if let Some(url) = lookup("FUNDEX_SOURCE_URL") {
            self.source.base_url = url;
        }
        if let Some(size) = parsed(&lookup, "FUNDEX_PAGE_SIZE") {
            self.source.page_size = size;
        }
        if let Some(timeout) = parsed(&lookup, "FUNDEX_TIMEOUT_SECONDS") {
            self.source.timeout_seconds = timeout;
        }
        if let Some(interval) = parsed(&lookup, "FUNDEX_REFRESH_INTERVAL_SECONDS") {
            self.refresh.interval_seconds = interval;
        }
        if let Some(base) = lookup("FUNDEX_DETAIL_LINK_BASE") {
            self.display.detail_link_base = base;
        }

        info!(
            host = %self.server.host,
            port = self.server.port,
            source = %self.source.base_url,
            refresh_interval_seconds = self.refresh.interval_seconds,
            "Configuration resolved"
        );
        self
    }
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}
fn default_port() -> u16 {
    8050
}
fn default_max_body_kb() -> usize {
    64
}
fn default_source_url() -> String {
    DEFAULT_SOURCE_URL.to_string()
}
fn default_plan_type() -> String {
    "Direct".to_string()
}
fn default_page_size() -> u32 {
    1500
}
fn default_sort_by() -> u32 {
    1
}
fn default_source_timeout_seconds() -> u64 {
    30
}
fn default_refresh_interval_seconds() -> u64 {
    3600
}
fn default_detail_link_base() -> String {
    DEFAULT_DETAIL_LINK_BASE.to_string()
}

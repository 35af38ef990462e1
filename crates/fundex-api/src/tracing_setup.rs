//! Logging setup
//!
//! Structured logging through `tracing-subscriber`. The filter comes from
//! `RUST_LOG` when set; `FUNDEX_LOG_FORMAT=json` switches to JSON lines.
//! Output goes to stderr so that CLI commands keep stdout for their results.

use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

const DEFAULT_FILTER: &str =
    "fundex_api=debug,fundex_core=debug,fundex_web=debug,tower_http=info,info";

/// Configuration for log output
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TracingConfig {
    /// Filter directives used when `RUST_LOG` is unset
    pub default_filter: String,
    /// Emit JSON lines instead of human-readable text
    pub json: bool,
}

impl Default for TracingConfig {
    fn default() -> Self {
        Self { default_filter: DEFAULT_FILTER.to_string(), json: false }
    }
}

impl TracingConfig {
    /// Create configuration from environment variables
    pub fn from_environment() -> Self {
        Self {
            json: std::env::var("FUNDEX_LOG_FORMAT")
                .map(|v| v.eq_ignore_ascii_case("json"))
                .unwrap_or(false),
            ..Self::default()
        }
    }

    /// Quieter defaults for one-shot CLI commands
    pub fn quiet(mut self) -> Self {
        self.default_filter = "warn".to_string();
        self
    }
}

pub fn init_tracing(config: &TracingConfig) -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.default_filter))?;

    let registry = tracing_subscriber::registry().with(filter);
    if config.json {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .try_init()?;
    } else {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(false)
                    .with_writer(std::io::stderr),
            )
            .try_init()?;
    }
    Ok(())
}

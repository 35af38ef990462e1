use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use fundex_api::{
    config::FundexConfig,
    create_app,
    refresh::spawn_refresh_task,
    source::GrowwSource,
    table::{render_facets, render_rows},
    tracing_setup::{TracingConfig, init_tracing},
};
use fundex_core::{Catalog, ListQuery};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

#[derive(Parser, Debug)]
#[command(name = "fundex", version, about = "Mutual fund catalog explorer")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the HTTP API and dashboard (default)
    Serve {
        #[arg(long)]
        host: Option<String>,
        #[arg(long)]
        port: Option<u16>,
    },
    /// Load the catalog once and print the filtered funds
    List(ListArgs),
    /// Load the catalog once and print categories, subcategories and risk levels
    Facets {
        #[arg(long)]
        json: bool,
    },
}

#[derive(Args, Debug, Default)]
struct ListArgs {
    #[arg(long = "category", value_name = "CATEGORY")]
    categories: Vec<String>,
    /// `Category::Subcategory`; also selects the category
    #[arg(long = "subcategory", value_name = "CATEGORY::SUBCATEGORY")]
    subcategories: Vec<String>,
    #[arg(long = "risk", value_name = "RISK")]
    risks: Vec<String>,
    /// Case-insensitive match on fund name, fund house or manager
    #[arg(long, short = 'q')]
    search: Option<String>,
    /// name, category, sub_category, risk, rating, aum, return_1y, return_3y, return_5y
    #[arg(long)]
    sort: Option<String>,
    #[arg(long)]
    desc: bool,
    #[arg(long)]
    json: bool,
    #[arg(long)]
    limit: Option<usize>,
}

impl ListArgs {
    fn to_query(&self) -> anyhow::Result<ListQuery> {
        let mut pairs: Vec<(&str, String)> = Vec::new();
        pairs.extend(self.categories.iter().map(|c| ("category", c.clone())));
        pairs.extend(self.subcategories.iter().map(|s| ("subcategory", s.clone())));
        pairs.extend(self.risks.iter().map(|r| ("risk", r.clone())));
        if let Some(search) = &self.search {
            pairs.push(("q", search.clone()));
        }
        if let Some(sort) = &self.sort {
            pairs.push(("sort", sort.clone()));
        }
        if self.desc {
            pairs.push(("order", "desc".to_string()));
        }
        if let Some(limit) = self.limit {
            pairs.push(("limit", limit.to_string()));
        }
        Ok(ListQuery::from_pairs(pairs)?)
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let command = cli.command.unwrap_or(Command::Serve { host: None, port: None });

    let tracing_config = TracingConfig::from_environment();
    let tracing_config = match command {
        Command::Serve { .. } => tracing_config,
        _ => tracing_config.quiet(),
    };
    init_tracing(&tracing_config).context("failed to initialise logging")?;

    let config = FundexConfig::load()?.apply_profile();

    match command {
        Command::Serve { host, port } => serve(config, host, port).await,
        Command::List(args) => list(config, &args).await,
        Command::Facets { json } => facets(config, json).await,
    }
}

fn build_catalog(config: &FundexConfig) -> anyhow::Result<Arc<Catalog>> {
    let source = GrowwSource::new(&config.source).context("failed to build catalog client")?;
    Ok(Arc::new(
        Catalog::new(Arc::new(source)).with_link_base(config.display.detail_link_base.clone()),
    ))
}

async fn serve(
    mut config: FundexConfig,
    host: Option<String>,
    port: Option<u16>,
) -> anyhow::Result<()> {
    if let Some(host) = host {
        config.server.host = host;
    }
    if let Some(port) = port {
        config.server.port = port;
    }

    info!(version = env!("CARGO_PKG_VERSION"), "Starting Fundex");
    let catalog = build_catalog(&config)?;

    // Serve even if the first load fails; the dashboard reports 503 until a refresh lands.
    if let Err(e) = catalog.refresh().await {
        warn!(error = %e, "Initial catalog load failed");
    }
    let _refresh = spawn_refresh_task(
        Arc::clone(&catalog),
        Duration::from_secs(config.refresh.interval_seconds),
    );

    let app = create_app(catalog, &config.server);
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;

    info!(%addr, "Fundex listening");
    axum::serve(listener, app).await.context("server error")?;
    Ok(())
}

async fn list(config: FundexConfig, args: &ListArgs) -> anyhow::Result<()> {
    let query = args.to_query()?;
    let catalog = build_catalog(&config)?;
    catalog.refresh().await.context("failed to load catalog")?;

    let mut view = catalog
        .view(&query.selection, query.order)
        .context("catalog snapshot missing after load")?;
    if let Some(limit) = query.limit {
        view.rows.truncate(limit);
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(&view.rows)?);
    } else {
        print!("{}", render_rows(&view.rows));
        println!("\nShowing {} of {} funds", view.matched, view.total);
    }
    Ok(())
}

async fn facets(config: FundexConfig, json: bool) -> anyhow::Result<()> {
    let catalog = build_catalog(&config)?;
    let snapshot = catalog.refresh().await.context("failed to load catalog")?;

    if json {
        let body = serde_json::json!({
            "categories": snapshot.facets,
            "risks": snapshot.risks,
        });
        println!("{}", serde_json::to_string_pretty(&body)?);
    } else {
        print!("{}", render_facets(&snapshot.facets, &snapshot.risks));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use fundex_core::SortKey;

    #[test]
    fn test_no_subcommand_means_serve() {
        let cli = Cli::try_parse_from(["fundex"]).unwrap();
        assert!(cli.command.is_none());
    }

    #[test]
    fn test_list_flags_build_query() {
        let cli = Cli::try_parse_from([
            "fundex",
            "list",
            "--category",
            "Debt",
            "--subcategory",
            "Equity::Large Cap",
            "--risk",
            "High",
            "-q",
            "Bluechip",
            "--sort",
            "return_1y",
            "--desc",
            "--limit",
            "5",
        ])
        .unwrap();
        let Some(Command::List(args)) = cli.command else {
            panic!("expected list command");
        };
        let query = args.to_query().unwrap();

        assert!(query.selection.categories.contains("Debt"));
        assert!(query.selection.categories.contains("Equity"));
        assert!(query.selection.is_subcategory_selected("Equity", "Large Cap"));
        assert!(query.selection.risks.contains("High"));
        assert_eq!(query.selection.search_text(), Some("Bluechip"));
        assert_eq!(query.order.key, SortKey::Return1y);
        assert!(query.order.descending);
        assert_eq!(query.limit, Some(5));
    }

    #[test]
    fn test_bad_subcategory_is_rejected() {
        let args = ListArgs { subcategories: vec!["Large Cap".into()], ..Default::default() };
        assert!(args.to_query().is_err());
    }
}

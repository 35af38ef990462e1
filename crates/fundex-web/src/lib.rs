//! Fundex Web
//!
//! Server-rendered dashboard: a filter sidebar with nested category and
//! subcategory checkboxes, a risk filter, a refresh button, and the fund
//! table with a detail link per row. All filter state travels in the query
//! string, so every view is a plain bookmarkable URL.

use askama::Template;
use axum::{
    Router,
    extract::{RawQuery, State},
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
    routing::{get, post},
};
use fundex_core::{
    Catalog, DISPLAY_COLUMNS, ListQuery, SUBCATEGORY_SEPARATOR, SortKey, Snapshot,
    split_subcategory_key,
};
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{error, info, warn};

/// Dashboard routes: `GET /` and `POST /refresh`
pub fn routes(catalog: Arc<Catalog>) -> Router {
    Router::new()
        .route("/", get(dashboard))
        .route("/refresh", post(refresh))
        .with_state(catalog)
}

struct SubcategoryOption {
    key: String,
    name: String,
    checked: bool,
}

struct CategoryOption {
    name: String,
    checked: bool,
    subcategories: Vec<SubcategoryOption>,
}

struct CheckOption {
    value: String,
    checked: bool,
}

struct SortOption {
    value: &'static str,
    label: &'static str,
    selected: bool,
}

struct RowView {
    name: String,
    link: String,
    cells: Vec<String>,
}

#[derive(Template)]
#[template(path = "dashboard.html")]
struct DashboardTemplate {
    error_message: String,
    loaded_at: String,
    generation: u64,
    total: usize,
    matched: usize,
    query_string: String,
    search: String,
    categories: Vec<CategoryOption>,
    risks: Vec<CheckOption>,
    sort_options: Vec<SortOption>,
    descending: bool,
    columns: Vec<&'static str>,
    rows: Vec<RowView>,
}

impl DashboardTemplate {
    fn build(snapshot: Option<&Snapshot>, query: &ListQuery, link_base: &str) -> Self {
        let selection = &query.selection;
        let sort_options = SortKey::ALL
            .into_iter()
            .map(|key| SortOption {
                value: key.as_str(),
                label: key.label(),
                selected: key == query.order.key,
            })
            .collect();
        let mut template = Self {
            error_message: String::new(),
            loaded_at: String::new(),
            generation: 0,
            total: 0,
            matched: 0,
            query_string: encode_query(query),
            search: selection.search_text().unwrap_or_default().to_string(),
            categories: Vec::new(),
            risks: Vec::new(),
            sort_options,
            descending: query.order.descending,
            columns: DISPLAY_COLUMNS.to_vec(),
            rows: Vec::new(),
        };

        let Some(snapshot) = snapshot else {
            template.error_message = "The fund catalog has not been loaded yet.".to_string();
            return template;
        };

        template.categories = snapshot
            .facets
            .iter()
            .map(|(category, subs)| CategoryOption {
                name: category.to_string(),
                checked: selection.categories.contains(category),
                subcategories: subs
                    .iter()
                    .map(|sub| SubcategoryOption {
                        key: format!("{category}{SUBCATEGORY_SEPARATOR}{sub}"),
                        name: sub.clone(),
                        checked: selection.is_subcategory_selected(category, sub),
                    })
                    .collect(),
            })
            .collect();
        template.risks = snapshot
            .risks
            .iter()
            .map(|risk| CheckOption { value: risk.clone(), checked: selection.risks.contains(risk) })
            .collect();

        let mut view = snapshot.view(selection, query.order, link_base);
        if let Some(limit) = query.limit {
            view.rows.truncate(limit);
        }
        template.loaded_at = view.loaded_at.format("%Y-%m-%d %H:%M:%S UTC").to_string();
        template.generation = view.generation;
        template.total = view.total;
        template.matched = view.matched;
        template.rows = view
            .rows
            .iter()
            .map(|row| {
                let mut cells = row.cells().to_vec();
                let name = cells.remove(0);
                RowView { name, link: row.detail_link.clone().unwrap_or_default(), cells }
            })
            .collect();
        template
    }
}

fn encode_query(query: &ListQuery) -> String {
    serde_urlencoded::to_string(query.to_pairs()).unwrap_or_default()
}

fn parse_query(raw: Option<&str>) -> Result<ListQuery, String> {
    let pairs: Vec<(String, String)> =
        serde_urlencoded::from_str(raw.unwrap_or_default()).map_err(|e| e.to_string())?;
    ListQuery::from_pairs(drop_unchecked_subcategories(pairs)).map_err(|e| e.to_string())
}

/// Unchecking a category hides its subcategory boxes, so their stale keys are
/// dropped here instead of re-selecting the category.
fn drop_unchecked_subcategories(mut pairs: Vec<(String, String)>) -> Vec<(String, String)> {
    let checked: HashSet<String> = pairs
        .iter()
        .filter(|(key, _)| key == "category")
        .map(|(_, value)| value.clone())
        .collect();
    pairs.retain(|(key, value)| {
        key != "subcategory"
            || split_subcategory_key(value).is_none_or(|(category, _)| checked.contains(category))
    });
    pairs
}

fn render(status: StatusCode, template: DashboardTemplate) -> Response {
    match template.render() {
        Ok(body) => (status, Html(body)).into_response(),
        Err(e) => {
            error!(error = %e, "Dashboard template failed to render");
            (StatusCode::INTERNAL_SERVER_ERROR, "template rendering failed").into_response()
        }
    }
}

async fn dashboard(State(catalog): State<Arc<Catalog>>, RawQuery(raw): RawQuery) -> Response {
    let snapshot = catalog.current();
    match parse_query(raw.as_deref()) {
        Ok(query) => {
            let template = DashboardTemplate::build(snapshot.as_deref(), &query, catalog.link_base());
            let status =
                if snapshot.is_some() { StatusCode::OK } else { StatusCode::SERVICE_UNAVAILABLE };
            render(status, template)
        }
        Err(message) => {
            warn!(%message, "Rejected dashboard query");
            let mut template = DashboardTemplate::build(
                snapshot.as_deref(),
                &ListQuery::default(),
                catalog.link_base(),
            );
            template.error_message = message;
            render(StatusCode::BAD_REQUEST, template)
        }
    }
}

async fn refresh(State(catalog): State<Arc<Catalog>>, RawQuery(raw): RawQuery) -> Response {
    let query = parse_query(raw.as_deref()).unwrap_or_default();
    match catalog.refresh().await {
        Ok(snapshot) => {
            info!(generation = snapshot.generation, "Catalog refreshed from dashboard");
            let query_string = encode_query(&query);
            let target =
                if query_string.is_empty() { "/".to_string() } else { format!("/?{query_string}") };
            Redirect::to(&target).into_response()
        }
        Err(e) => {
            let snapshot = catalog.current();
            let mut template =
                DashboardTemplate::build(snapshot.as_deref(), &query, catalog.link_base());
            template.error_message = format!("Refresh failed: {e}");
            render(StatusCode::BAD_GATEWAY, template)
        }
    }
}

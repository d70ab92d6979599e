use crate::db::{self, Database};
use crate::error::{HttpError, ServerError};
use anyhow::Context;
use axum::body::Bytes;
use axum::extract::{RawQuery, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use recruit_protocol::{
    parse_tag_ids, HealthReport, MatchMode, OperatorRow, SetupPayload, SetupReport, TagRow,
    BUNDLE_PATH, FILTER_PATH, HEALTH_PATH, OPERATORS_PATH, SETUP_PATH, TAGS_PATH,
};
use rusqlite::Connection;
use std::sync::Arc;

type HttpResult<T> = Result<Json<T>, HttpError>;

#[derive(Debug)]
pub struct AppState {
    pub db: Database,
}

/// All data API routes over `db`.
pub fn router(db: Database) -> Router {
    let state = Arc::new(AppState { db });
    Router::new()
        .route(TAGS_PATH, get(tags))
        .route(FILTER_PATH, get(filter_operators))
        .route(OPERATORS_PATH, get(all_operators))
        .route(SETUP_PATH, post(setup))
        .route(BUNDLE_PATH, get(bundle))
        .route(HEALTH_PATH, get(health))
        .with_state(state)
}

/// Run `f` on a blocking thread with a fresh connection.
async fn with_conn<T, F>(db: &Database, f: F) -> anyhow::Result<T>
where
    T: Send + 'static,
    F: FnOnce(&mut Connection) -> crate::error::Result<T> + Send + 'static,
{
    let db = db.clone();
    let result = tokio::task::spawn_blocking(move || {
        let mut conn = db.connect()?;
        f(&mut conn)
    })
    .await
    .map_err(|e| ServerError::Task(e.to_string()))?;
    Ok(result?)
}

async fn tags(State(state): State<Arc<AppState>>) -> HttpResult<Vec<TagRow>> {
    with_conn(&state.db, |conn| db::list_tags(conn))
        .await
        .context("listing recruitment tags")
        .map(Json)
        .map_err(|e| HttpError::internal("Failed to load tags.", &e))
}

async fn filter_operators(
    State(state): State<Arc<AppState>>,
    RawQuery(query): RawQuery,
) -> HttpResult<Vec<OperatorRow>> {
    let query = query.unwrap_or_default();
    let tag_ids = parse_tag_ids(query_values(&query, "tag_ids").iter().map(String::as_str))
        .map_err(|e| HttpError::bad_request("Invalid tag IDs.").with_details(e.to_string()))?;
    if tag_ids.is_empty() {
        return Err(HttpError::bad_request("No tag IDs provided."));
    }
    let mode = match query_values(&query, "match").last() {
        Some(raw) => raw
            .parse::<MatchMode>()
            .map_err(|e| HttpError::bad_request("Invalid match mode.").with_details(e.to_string()))?,
        None => MatchMode::All,
    };

    let ids = tag_ids.clone();
    with_conn(&state.db, move |conn| db::operators_by_tags(conn, &ids, mode))
        .await
        .with_context(|| format!("filtering operators by {tag_ids:?} ({mode})"))
        .map(Json)
        .map_err(|e| HttpError::internal("Failed to process JSON.", &e))
}

async fn all_operators(State(state): State<Arc<AppState>>) -> HttpResult<Vec<OperatorRow>> {
    with_conn(&state.db, |conn| db::list_operators(conn))
        .await
        .context("listing operators")
        .map(Json)
        .map_err(|e| HttpError::internal("Failed to load operators.", &e))
}

async fn setup(State(state): State<Arc<AppState>>, body: Bytes) -> HttpResult<SetupReport> {
    let payload: SetupPayload = serde_json::from_slice(&body).map_err(|e| {
        HttpError::bad_request("Invalid JSON format: expected data array from tags.")
            .with_details(e.to_string())
    })?;

    with_conn(&state.db, move |conn| db::apply_setup(conn, &payload))
        .await
        .context("applying setup payload")
        .map(Json)
        .map_err(|e| HttpError::internal("Failed to process JSON.", &e))
}

async fn bundle(State(state): State<Arc<AppState>>) -> HttpResult<SetupPayload> {
    with_conn(&state.db, |conn| db::export_bundle(conn))
        .await
        .context("exporting recruitment bundle")
        .map(Json)
        .map_err(|e| HttpError::internal("Failed to build bundle.", &e))
}

async fn health() -> Json<HealthReport> {
    Json(HealthReport {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Values of `key` in a raw query string; `%2C` is read as a comma.
fn query_values(query: &str, key: &str) -> Vec<String> {
    query
        .split('&')
        .filter_map(|pair| pair.split_once('='))
        .filter(|(k, _)| *k == key)
        .map(|(_, v)| v.replace("%2C", ",").replace("%2c", ","))
        .collect()
}

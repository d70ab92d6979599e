//! # Recruit Server
//!
//! Data API for the recruitment resolver, backed by SQLite.
//!
//! ```text
//! GET  /api/arknights/recruitment-tags                      tag rows
//! GET  /api/arknights/recruitment-operators?tag_ids=..&match=all|any
//! GET  /api/arknights/operators                             every operator
//! POST /api/setup                                           load a payload
//! GET  /static/arknights/recruitment.json                   full bundle
//! GET  /health
//! ```
//!
//! Each request opens its own connection on a blocking thread. Failures are
//! answered with `{"error": .., "details": ..}` and status 400 or 500.

mod config;
mod db;
mod error;
mod routes;

pub use config::{ServerConfig, DEFAULT_BIND, DEFAULT_DB_PATH};
pub use db::{
    apply_setup, create_schema, export_bundle, list_operators, list_tags, operators_by_tags,
    Database,
};
pub use error::{HttpError, Result, ServerError};
pub use routes::{router, AppState};

use anyhow::Context;
use tokio::net::TcpListener;

/// Bind `config.bind` and serve until the process stops.
pub async fn serve(config: &ServerConfig) -> anyhow::Result<()> {
    config
        .validate()
        .map_err(ServerError::InvalidConfig)
        .context("invalid server configuration")?;
    let listener = TcpListener::bind(&config.bind)
        .await
        .with_context(|| format!("binding {}", config.bind))?;
    serve_on(listener, Database::new(&config.db_path)).await
}

/// Serve on an already bound listener.
pub async fn serve_on(listener: TcpListener, db: Database) -> anyhow::Result<()> {
    let init = db.clone();
    tokio::task::spawn_blocking(move || init.init())
        .await
        .context("database init task")??;

    let addr = listener.local_addr()?;
    log::info!("Serving recruitment data API on http://{addr}");
    axum::serve(listener, router(db)).await?;
    Ok(())
}

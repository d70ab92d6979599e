//! # Recruit Client
//!
//! Data boundary of the recruitment resolver. A [`RecruitmentSource`] hands
//! out the tag catalog, operators per tag set and the full published bundle.
//!
//! ```text
//!                ┌──────────────────┐
//!  HttpSource ──►│                  │   load_catalog()   ┌────────────┐
//!                │ RecruitmentSource│ ─────────────────► │ LocalStore │
//! BundleSource ─►│                  │                    └────────────┘
//!                └────────┬─────────┘
//!                         │ OperatorFetcher (union mode)
//!                         ▼
//!                  RecruitSession
//! ```
//!
//! `dyn RecruitmentSource` implements the engine's `OperatorFetcher`, so any
//! source can drive a session directly.
//!
//! ## Example
//!
//! ```rust,no_run
//! use recruit_client::{load_catalog, ApiConfig, HttpSource, RecruitmentSource};
//! use recruit_store::LocalStore;
//!
//! # async fn run() -> recruit_client::Result<()> {
//! let source = HttpSource::new(&ApiConfig::default())?;
//! let store = LocalStore::in_memory();
//! let sync = load_catalog(&source, &store, false).await?;
//! println!("{} tags ({:?})", sync.tags.len(), sync.origin);
//! # Ok(())
//! # }
//! ```

mod bundle;
mod catalog;
mod config;
mod error;
mod http;
mod source;

pub use bundle::BundleSource;
pub use catalog::{load_catalog, CatalogSync, SyncOrigin};
pub use config::{ApiConfig, DEFAULT_API_URL};
pub use error::{ClientError, Result};
pub use http::HttpSource;
pub use source::RecruitmentSource;

//! # Recruit Store
//!
//! Local persistent cache mirroring the browser-side object stores of the
//! recruitment page: `tags` and `operators` keyed by id, a `meta` document
//! with the last `updatedAt` seen per store, and the section visibility
//! preferences.
//!
//! ```text
//! <cache dir>/
//! ├── tags.json         [Tag] ordered by id
//! ├── operators.json    [Operator] ordered by id
//! ├── meta.json         { "tags": "2025-03-01T00:00:00Z", ... }
//! └── preferences.json  { "hide_rarity_common": false, ... }
//! ```
//!
//! Writes are atomic (temporary file + rename). A corrupted document is
//! logged and read as empty so the next sync rebuilds it.
//!
//! ## Example
//!
//! ```rust
//! use recruit_model::Tag;
//! use recruit_store::{LocalStore, StoreName};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let store = LocalStore::in_memory();
//! store.put(&[Tag::new(9, "Melee")]).await.unwrap();
//! assert!(store.is_outdated(StoreName::Tags, Some("2025-01-01")).await.unwrap());
//! # }
//! ```

mod backend;
mod config;
mod error;
mod store;

pub use config::{StoreBackend, StoreConfig, DEFAULT_CACHE_DIR};
pub use error::{Result, StoreError};
pub use store::{LocalStore, Preferences, Record, StoreName};

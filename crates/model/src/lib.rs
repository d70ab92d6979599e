//! # Recruit Model
//!
//! Data model shared by every recruitment crate: tags, operators, rarity tiers
//! and the fixed tag categories.
//!
//! ## Ingestion
//!
//! ```text
//! wire JSON (API rows / bundle file / local cache)
//!     │
//!     ├──> Tag       (flat name_en/name_zh/name_jp or nested names → names map)
//!     │
//!     └──> Operator  (rarity: 6 | "6" | "TIER_6" → Rarity(6),
//!                     tags / tagList → Vec<TagRef>,
//!                     recruitment: null → not recruitable)
//! ```
//!
//! Every representation quirk of the data sources is resolved here, once, so the
//! engine only ever sees normalized values.
//!
//! ## Example
//!
//! ```rust
//! use recruit_model::{Operator, Rarity};
//!
//! let op: Operator = serde_json::from_str(
//!     r#"{"id":"char_1","appellation":"Lancet-2","rarity":"TIER_1",
//!         "profession":"MEDIC","subProfessionId":"physician","tags":[28]}"#,
//! ).unwrap();
//! assert_eq!(op.rarity, Rarity::LOWEST);
//! assert_eq!(op.name, "Lancet-2");
//! ```

mod category;
mod error;
mod operator;
mod rarity;
mod tag;

pub use category::{Category, FilterKey};
pub use error::{ModelError, Result};
pub use operator::{Operator, TagRef};
pub use rarity::Rarity;
pub use tag::{Tag, TagId, DEFAULT_LOCALE};

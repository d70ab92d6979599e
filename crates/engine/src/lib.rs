//! # Recruit Engine
//!
//! Resolves recruitment tag selections into ordered result sections.
//!
//! ## Pipeline
//!
//! ```text
//! toggle(tag)
//!     │
//!     ├──> Selection (≤ 5 tags, partitioned by filter key)
//!     │
//!     ├──> FetchPlan (selected tags not fetched yet, tagged with a generation)
//!     │      └─> OperatorFetcher (data API / bundle)  ─┐
//!     │                                                │ stale generation → discarded
//!     ├──> apply_fetch ◄───────────────────────────────┘ failure → rollback
//!     │
//!     ├──> plan_requests: singles + every subset of size ≥ 2 (bitmask)
//!     │
//!     ├──> reconcile: reuse cached keys, resolve missing, evict stale
//!     │      └─> SectionResolver (union predicate per tag, rarity gate)
//!     │
//!     └──> sort_sections (distinct-rarity ordering rule) → SessionObserver::on_render
//! ```
//!
//! ## Example
//!
//! ```rust
//! use recruit_engine::{EngineConfig, RecruitSession, TagCatalog};
//! use recruit_model::{Operator, Rarity, Tag};
//!
//! let catalog = TagCatalog::new(vec![Tag::new(9, "Melee"), Tag::new(20, "DPS")]);
//! let mut session = RecruitSession::new(catalog, EngineConfig::default()).unwrap();
//!
//! session.toggle_tag(9).unwrap();
//! session.toggle_tag(20).unwrap();
//! let plan = session.plan_refresh();
//! let fetched = vec![
//!     Operator::new("a", "Melantha", Rarity::new(3).unwrap(), "WARRIOR").with_tags([9u32, 20]),
//! ];
//! let outcome = session.apply_fetch(plan, Ok(fetched), &mut ());
//! assert_eq!(outcome.sections().len(), 3); // Melee, DPS, DPS-Melee
//! ```

mod catalog;
mod classifier;
mod combination;
mod config;
mod error;
mod finder;
mod matcher;
mod operators;
mod reconciler;
mod resolver;
mod section;
mod selection;
mod session;
mod visibility;

pub use catalog::TagCatalog;
pub use classifier::{category_of, classify, ClassifiedTags, CATEGORY_TABLE, RESERVED_TAG_IDS};
pub use combination::enumerate_combinations;
pub use config::{EngineConfig, TOP_OPERATOR_TAG_ID};
pub use error::{EngineError, Result};
pub use finder::TagFinder;
pub use matcher::{filter_operators, matches, Criterion, FilterSpec, FilterValue};
pub use operators::OperatorCache;
pub use reconciler::{reconcile, SectionCache};
pub use resolver::{plan_requests, union_predicate, ResolveSection, SectionRequest, SectionResolver};
pub use section::{compare_sections, section_key, sort_sections, Section};
pub use selection::{SelectedTag, Selection, SelectionState, ToggleOutcome, MAX_SELECTED_TAGS};
pub use session::{CycleOutcome, FetchPlan, OperatorFetcher, RecruitSession, SessionObserver};
pub use visibility::Visibility;

//! Restaurant Catalog
//!
//! Filterable restaurant catalog with AI-generated blurbs.
//!
//! Module structure:
//! - `utils/`: Field parsers for the noisy raw dataset
//! - `data`: Normalization into `Restaurant` records, CSV ingestion with Polars
//! - `catalog_index`: Locality and cuisine choice lists
//! - `filter_state` / `sync` / `session`: Filter state, paired-control sync,
//!   deferred reset
//! - `query_engine`: Filter + stable sort + aggregates
//! - `source` / `insight` (feature `remote`): dataset fetch and AI insights
//! - `api_server` (feature `api`): JSON HTTP binding

pub mod utils;
pub mod config;
pub mod data;
pub mod fallback;
pub mod catalog_index;
pub mod filter_state;
pub mod sync;
pub mod session;
pub mod query_engine;

#[cfg(feature = "remote")]
pub mod source;
#[cfg(feature = "remote")]
pub mod insight;
#[cfg(feature = "api")]
pub mod api_server;

// Re-export commonly used types
pub use catalog_index::{CatalogIndex, CatalogStats, ALL_LOCALITIES};
pub use config::{AppConfig, CatalogConfig};
pub use data::{CatalogData, DataError, DataOrigin, Normalizer, RawRow, Restaurant};
pub use filter_state::{FilterState, PriceBounds, SortKey};
pub use query_engine::{Aggregates, QueryEngine, QueryResult};
pub use session::Session;
pub use sync::{FilterEvent, Signals, SyncController, SyncError};

#[cfg(feature = "api")]
pub use api_server::{create_router, AppState};

//! # allocine-bridge - Movie metadata from AlloCiné as OpenSearch XML
//!
//! This crate answers a free-text movie title query with a normalized XML
//! document built from AlloCiné's search results and movie pages. It is
//! meant to sit behind a media-library scanner that issues one request per
//! lookup and expects a well-formed document back, whatever happened.
//!
//! ## Features
//!
//! - Search-results parsing into an ordered list of candidate movie ids
//! - Fault-tolerant, per-field extraction of detail pages (titles, people,
//!   genres, release date, runtime, ratings, budget, synopsis)
//! - Write-once on-disk cache for movies that are already released
//! - Stable OpenSearch-style output schema, empty elements for missing data
//! - Async API with Tokio, structured logging with `tracing`
//!
//! ## Example
//!
//! ```rust,no_run
//! use allocine_bridge::{BridgeConfig, FileCache, HttpFetcher, SearchCoordinator};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = BridgeConfig::from_env();
//!     let fetcher = HttpFetcher::new(&config)?;
//!     let cache = FileCache::new(config.cache_dir.clone());
//!
//!     let coordinator = SearchCoordinator::new(fetcher, cache, config);
//!     let document = coordinator.handle("title=la+haine").await?;
//!     println!("{}", document);
//!     Ok(())
//! }
//! ```

mod error;

pub mod builder;
pub mod cache;
pub mod config;
pub mod coordinator;
pub mod extract;
pub mod http;
pub mod record;
pub mod xml;

pub use builder::RecordBuilder;
pub use cache::{CacheError, FileCache, MemoryCache, RecordCache};
pub use config::BridgeConfig;
pub use coordinator::{SearchCoordinator, SearchOutcome, parse_query};
pub use error::{Error, Result};
pub use http::{HttpFetcher, PageFetcher};
pub use record::{Category, Job, Person, Record, Title};

/// Re-export of types module for public use
pub mod prelude {
    pub use crate::error::Error;
    pub use crate::error::Result;
}

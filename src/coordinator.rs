//! # Search Coordinator Module
//!
//! Drives one lookup from the raw inbound query string to a rendered
//! document:
//!
//! 1. no usable `title` parameter: error document, nothing is fetched
//! 2. fetch the search page for the query
//! 3. no result count on the page: "no results" document
//! 4. resolve every candidate id in page order, from the cache when an
//!    entry exists, otherwise by building it from its detail page
//! 5. render the query, the announced count and the resolved records
//!
//! Failures below step 4 are contained per movie: the caller always gets a
//! complete document.

use chrono::{Local, NaiveDate};
use tracing::{error, info, instrument, warn};
use url::form_urlencoded;

use crate::builder::RecordBuilder;
use crate::cache::RecordCache;
use crate::config::BridgeConfig;
use crate::error::Result;
use crate::extract;
use crate::http::PageFetcher;
use crate::record::Record;
use crate::xml;

/// What one invocation resolved to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchOutcome {
    /// The request carried no query
    NoQuery,

    /// The search page reported no movie matches
    Empty { query: String },

    /// Movies resolved for the query
    Results {
        query: String,
        /// Count announced by the search page, verbatim
        total: String,
        records: Vec<Record>,
    },
}

/// Extract the search text from a raw `title=...` query string
///
/// The string is decoded as a form; the first non-blank `title` value wins.
pub fn parse_query(raw: &str) -> Option<String> {
    let raw = raw.strip_prefix('?').unwrap_or(raw);
    form_urlencoded::parse(raw.as_bytes())
        .find(|(key, value)| key == "title" && !value.trim().is_empty())
        .map(|(_, value)| value.into_owned())
}

/// Top-level driver for one search
pub struct SearchCoordinator<F, C> {
    fetcher: F,
    cache: C,
    config: BridgeConfig,
    today: Option<NaiveDate>,
}

impl<F, C> SearchCoordinator<F, C>
where
    F: PageFetcher,
    C: RecordCache,
{
    pub fn new(fetcher: F, cache: C, config: BridgeConfig) -> Self {
        Self {
            fetcher,
            cache,
            config,
            today: None,
        }
    }

    /// Pin the date used to decide whether a movie is released
    pub fn with_today(mut self, today: NaiveDate) -> Self {
        self.today = Some(today);
        self
    }

    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }

    pub fn cache(&self) -> &C {
        &self.cache
    }

    fn today(&self) -> NaiveDate {
        self.today.unwrap_or_else(|| Local::now().date_naive())
    }

    /// Handle a raw inbound query string and render the response document
    pub async fn handle(&self, raw_query: &str) -> Result<String> {
        let outcome = match parse_query(raw_query) {
            Some(query) => self.search(&query).await,
            None => {
                info!("Request without a title query");
                SearchOutcome::NoQuery
            }
        };
        xml::render(&outcome)
    }

    /// Run a search for an already decoded query
    #[instrument(skip(self))]
    pub async fn search(&self, query: &str) -> SearchOutcome {
        let escaped: String = form_urlencoded::byte_serialize(query.as_bytes()).collect();
        let url = self.config.search_page_url(&escaped);

        let page = match self.fetcher.fetch(&url).await {
            Ok(page) => page,
            Err(e) => {
                error!("Failed to fetch search page {}: {}", url, e);
                return SearchOutcome::Empty {
                    query: query.to_string(),
                };
            }
        };

        let Some(total) = extract::extract_result_count(&page) else {
            info!("No movie matches for {:?}", query);
            return SearchOutcome::Empty {
                query: query.to_string(),
            };
        };

        let candidates = extract::extract_candidate_ids(&page);
        info!(
            "Search page announces {} matches, {} candidates parsed",
            total,
            candidates.len()
        );

        let mut records = Vec::with_capacity(candidates.len());
        for id in &candidates {
            records.push(self.resolve(id).await);
        }

        SearchOutcome::Results {
            query: query.to_string(),
            total,
            records,
        }
    }

    /// Record for one candidate id, from the cache when possible
    #[instrument(skip(self))]
    pub async fn resolve(&self, id: &str) -> Record {
        if self.cache.exists(id).await {
            match self.cache.load(id).await {
                Ok(record) => {
                    info!("Loaded {} from cache", id);
                    return record;
                }
                Err(e) => warn!("Cache entry for {} unusable, rebuilding: {}", id, e),
            }
        }

        RecordBuilder::new(&self.fetcher, &self.cache, &self.config, self.today())
            .build(id)
            .await
    }
}

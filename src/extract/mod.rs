//! # Field Extraction Module
//!
//! Independent extraction rules turning AlloCiné markup into field values.
//! Every extractor takes the raw page text and returns `Option` (or an
//! empty `Vec` for list fields): a pattern that does not match is a normal
//! outcome and never stops the other fields from being read.
//!
//! ## Key Components
//!
//! - `fields`: one extractor per detail-page field
//! - `search`: result count and candidate ids of a search-results page
//! - `date`: French textual release dates
//! - `text`: tag stripping, entity decoding and whitespace cleanup

mod date;
mod fields;
mod search;
mod text;

pub use date::parse_release;
pub use fields::{
    Credit, Genre, extract_actors, extract_alternative_title, extract_budget,
    extract_categories, extract_directors, extract_popularity, extract_release, extract_runtime,
    extract_score, extract_short_overview, extract_title,
};
pub use search::{extract_candidate_ids, extract_result_count};
pub use text::fragment_text;

//! # Record Cache Module
//!
//! Write-once storage for records whose data is final (released movies).
//! The coordinator and builder talk to the [`RecordCache`] trait so the
//! on-disk store can be swapped for an in-memory one in tests.
//!
//! ## Key Components
//!
//! - `RecordCache`: presence check, load and store keyed by movie id
//! - `FileCache`: one XML file per movie under a cache directory
//! - `MemoryCache`: map-backed implementation

mod file;
mod memory;

use std::future::Future;

use thiserror::Error;

use crate::record::Record;

pub use file::FileCache;
pub use memory::MemoryCache;

/// Error type for cache operations
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("XML serialization error: {0}")]
    Serialize(#[from] quick_xml::errors::serialize::SeError),

    #[error("XML deserialization error: {0}")]
    Deserialize(#[from] quick_xml::errors::serialize::DeError),

    #[error("Not found: {0}")]
    NotFound(String),

    /// The stored artifact parsed but does not describe a valid record
    #[error("Corrupt entry {id}: {reason}")]
    Corrupt { id: String, reason: String },

    #[error("Invalid movie id: {0:?}")]
    InvalidId(String),
}

/// Keyed store of previously resolved records
pub trait RecordCache: Send + Sync {
    /// Whether a record was stored for `id`
    fn exists(&self, id: &str) -> impl Future<Output = bool> + Send;

    /// Load the record stored for `id`
    fn load(&self, id: &str) -> impl Future<Output = Result<Record, CacheError>> + Send;

    /// Store `record` under `id`, replacing any previous entry
    fn store(&self, record: &Record, id: &str)
    -> impl Future<Output = Result<(), CacheError>> + Send;
}

/// Movie ids are used as file names, so only plain identifiers are accepted
pub(crate) fn validate_id(id: &str) -> Result<(), CacheError> {
    if !id.is_empty() && id.chars().all(|c| c.is_ascii_alphanumeric()) {
        Ok(())
    } else {
        Err(CacheError::InvalidId(id.to_string()))
    }
}

use std::io::{self, Write};
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use quick_xml::{de::from_str, se::to_string};
use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;
use tokio::fs;
use tracing::{debug, instrument, warn};

use super::{CacheError, RecordCache, validate_id};
use crate::record::{Category, Job, Person, Record, Title};

type Result<T> = std::result::Result<T, CacheError>;

/// XML representation of a record for storage
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename = "movie")]
struct MovieEntry {
    id: String,
    url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    score: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    popularity: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    title: Option<TitleEntry>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    alternative_title: Option<TitleEntry>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    short_overview: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    release: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    runtime: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    budget: Option<String>,
    #[serde(default)]
    people: PeopleEntry,
    #[serde(default)]
    categories: CategoriesEntry,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
struct TitleEntry {
    #[serde(rename = "@lower")]
    lower: String,
    #[serde(rename = "$text")]
    display: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default)]
struct PeopleEntry {
    #[serde(rename = "person", default)]
    persons: Vec<PersonEntry>,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
struct PersonEntry {
    #[serde(rename = "@job")]
    job: String,
    name: String,
    url: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default)]
struct CategoriesEntry {
    #[serde(rename = "category", default)]
    categories: Vec<CategoryEntry>,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
struct CategoryEntry {
    name: String,
    url: String,
}

impl From<&Title> for TitleEntry {
    fn from(title: &Title) -> Self {
        TitleEntry {
            lower: title.lower.clone(),
            display: title.display.clone(),
        }
    }
}

impl From<TitleEntry> for Title {
    fn from(entry: TitleEntry) -> Self {
        Title {
            display: entry.display,
            lower: entry.lower,
        }
    }
}

impl From<&Record> for MovieEntry {
    fn from(record: &Record) -> Self {
        MovieEntry {
            id: record.id.clone(),
            url: record.url.clone(),
            score: record.score.clone(),
            popularity: record.popularity.clone(),
            title: record.title.as_ref().map(TitleEntry::from),
            alternative_title: record.alternative_title.as_ref().map(TitleEntry::from),
            short_overview: record.short_overview.clone(),
            release: record.release,
            runtime: record.runtime,
            budget: record.budget.clone(),
            people: PeopleEntry {
                persons: record
                    .people
                    .iter()
                    .map(|person| PersonEntry {
                        job: person.job.as_str().to_string(),
                        name: person.name.clone(),
                        url: person.url.clone(),
                    })
                    .collect(),
            },
            categories: CategoriesEntry {
                categories: record
                    .categories
                    .iter()
                    .map(|category| CategoryEntry {
                        name: category.name.clone(),
                        url: category.url.clone(),
                    })
                    .collect(),
            },
        }
    }
}

impl MovieEntry {
    fn into_record(self) -> Result<Record> {
        let id = self.id;
        let people = self
            .people
            .persons
            .into_iter()
            .map(|entry| {
                let job = match entry.job.as_str() {
                    "director" => Job::Director,
                    "actor" => Job::Actor,
                    other => {
                        return Err(CacheError::Corrupt {
                            id: id.clone(),
                            reason: format!("unknown job {:?}", other),
                        });
                    }
                };
                Ok(Person {
                    name: entry.name,
                    job,
                    url: entry.url,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Record {
            id,
            url: self.url,
            score: self.score,
            popularity: self.popularity,
            title: self.title.map(Title::from),
            alternative_title: self.alternative_title.map(Title::from),
            short_overview: self.short_overview,
            release: self.release,
            runtime: self.runtime,
            budget: self.budget,
            people,
            categories: self
                .categories
                .categories
                .into_iter()
                .map(|entry| Category {
                    name: entry.name,
                    url: entry.url,
                })
                .collect(),
        })
    }
}

/// Serialize a record to its standalone XML document
fn to_document(record: &Record) -> Result<String> {
    let xml = to_string(&MovieEntry::from(record))?;
    Ok(format!("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n{}", xml))
}

/// Parse a standalone XML document back into a record
fn from_document(id: &str, xml: &str) -> Result<Record> {
    let entry: MovieEntry = from_str(xml)?;
    if entry.id != id {
        return Err(CacheError::Corrupt {
            id: id.to_string(),
            reason: format!("entry belongs to {}", entry.id),
        });
    }
    entry.into_record()
}

/// Record cache keeping one XML file per movie id
#[derive(Debug, Clone)]
pub struct FileCache {
    base_path: PathBuf,
}

impl FileCache {
    /// Create a cache rooted at `base_path`; the directory is created on first store
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
        }
    }

    /// Directory holding the entries
    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    /// Gets the storage path for a movie id
    pub fn entry_path(&self, id: &str) -> Result<PathBuf> {
        validate_id(id)?;
        Ok(self.base_path.join(format!("{}.xml", id)))
    }

    /// Ids of every stored entry, sorted
    pub async fn list(&self) -> Result<Vec<String>> {
        if !fs::try_exists(&self.base_path).await? {
            return Ok(Vec::new());
        }

        let mut ids = Vec::new();
        let mut dir_entries = fs::read_dir(&self.base_path).await?;
        while let Some(entry) = dir_entries.next_entry().await? {
            let path = entry.path();
            if path.extension().is_some_and(|ext| ext == "xml") {
                if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                    if validate_id(stem).is_ok() {
                        ids.push(stem.to_string());
                    }
                }
            }
        }
        ids.sort();
        Ok(ids)
    }
}

impl RecordCache for FileCache {
    async fn exists(&self, id: &str) -> bool {
        match self.entry_path(id) {
            Ok(path) => fs::try_exists(path).await.unwrap_or(false),
            Err(_) => false,
        }
    }

    #[instrument(skip(self), level = "debug")]
    async fn load(&self, id: &str) -> Result<Record> {
        let path = self.entry_path(id)?;
        let xml = match fs::read_to_string(&path).await {
            Ok(xml) => xml,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(CacheError::NotFound(id.to_string()));
            }
            Err(e) => return Err(e.into()),
        };

        from_document(id, &xml).inspect_err(|e| {
            warn!("Unreadable cache entry {}: {}", path.display(), e);
        })
    }

    #[instrument(skip(self, record), level = "debug")]
    async fn store(&self, record: &Record, id: &str) -> Result<()> {
        let path = self.entry_path(id)?;
        let document = to_document(record)?;

        fs::create_dir_all(&self.base_path).await?;

        // Each writer stages into its own file; the last rename wins
        let base_path = self.base_path.clone();
        let target = path.clone();
        tokio::task::spawn_blocking(move || -> Result<()> {
            let mut staging = NamedTempFile::new_in(&base_path)?;
            staging.write_all(document.as_bytes())?;
            staging.persist(&target).map_err(|e| e.error)?;
            Ok(())
        })
        .await
        .map_err(io::Error::other)??;

        debug!("Cached {} at {}", id, path.display());
        Ok(())
    }
}

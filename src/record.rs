//! Structured representation of one movie
//!
//! A [`Record`] is built once from a detail page (or loaded from the cache)
//! and never mutated afterwards. Every extracted field is optional; absence
//! is a normal state that renders as an empty element.

use chrono::NaiveDate;
use serde::Serialize;

/// Display title with its lowercased sort key
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Title {
    /// Title as shown on the page
    pub display: String,

    /// Lowercased copy used for sorting
    pub lower: String,
}

impl Title {
    /// Create a title, computing the sort key
    pub fn new(display: impl Into<String>) -> Self {
        let display = display.into();
        let lower = display.to_lowercase();
        Self { display, lower }
    }
}

/// Role a person holds on a movie
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Job {
    Director,
    Actor,
}

impl Job {
    /// Label used in the `job` attribute
    pub fn as_str(&self) -> &'static str {
        match self {
            Job::Director => "director",
            Job::Actor => "actor",
        }
    }
}

/// A credited person
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Person {
    pub name: String,
    pub job: Job,
    /// Profile page URL
    pub url: String,
}

/// A genre the movie is listed under
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Category {
    pub name: String,
    /// Genre listing URL
    pub url: String,
}

/// One movie, as resolved for a search
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Record {
    /// External movie identifier
    pub id: String,

    /// Detail page URL
    pub url: String,

    /// Press rating, dot-decimal
    pub score: Option<String>,

    /// Audience rating, dot-decimal
    pub popularity: Option<String>,

    /// Original title, falling back to the page title
    pub title: Option<Title>,

    /// Page title without site branding
    pub alternative_title: Option<Title>,

    pub short_overview: Option<String>,

    /// Theatrical release date
    pub release: Option<NaiveDate>,

    /// Runtime in minutes
    pub runtime: Option<u32>,

    /// Budget in dollars, digits only
    pub budget: Option<String>,

    /// Directors first, then actors, each in page order
    pub people: Vec<Person>,

    pub categories: Vec<Category>,
}

impl Record {
    /// A record carrying only its identity, every field absent
    pub fn empty(id: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            url: url.into(),
            score: None,
            popularity: None,
            title: None,
            alternative_title: None,
            short_overview: None,
            release: None,
            runtime: None,
            budget: None,
            people: Vec::new(),
            categories: Vec::new(),
        }
    }

    /// Whether the movie's data is final as of `today`
    ///
    /// Only records with a known release date on or before `today` qualify
    /// for caching.
    pub fn is_final(&self, today: NaiveDate) -> bool {
        self.release.is_some_and(|release| release <= today)
    }

    /// Release date in the `Y-M-DD` form scanners expect
    ///
    /// The month is not zero-padded while the day is.
    pub fn release_text(&self) -> Option<String> {
        self.release.map(format_release)
    }
}

/// Format a date as `year-month-day` with only the day zero-padded
pub fn format_release(date: NaiveDate) -> String {
    use chrono::Datelike;
    format!("{}-{}-{:02}", date.year(), date.month(), date.day())
}

//! Builds a [`Record`] from a movie's detail page
//!
//! The builder fetches the detail page, runs every field extractor over it
//! and, when the movie has already been released as of the injected
//! `today`, persists the result so later searches skip the fetch.

use chrono::NaiveDate;
use tracing::{debug, info, instrument, warn};

use crate::cache::RecordCache;
use crate::config::BridgeConfig;
use crate::extract;
use crate::http::PageFetcher;
use crate::record::{Category, Job, Person, Record};

/// Assembles records from detail pages
pub struct RecordBuilder<'a, F, C> {
    fetcher: &'a F,
    cache: &'a C,
    config: &'a BridgeConfig,
    today: NaiveDate,
}

impl<'a, F, C> RecordBuilder<'a, F, C>
where
    F: PageFetcher,
    C: RecordCache,
{
    pub fn new(fetcher: &'a F, cache: &'a C, config: &'a BridgeConfig, today: NaiveDate) -> Self {
        Self {
            fetcher,
            cache,
            config,
            today,
        }
    }

    /// Fetch, extract and possibly cache the record for `id`
    ///
    /// A failed fetch still yields a record carrying the id and URL with
    /// every other field absent; such records are never cached.
    #[instrument(skip(self))]
    pub async fn build(&self, id: &str) -> Record {
        let url = self.config.movie_url(id);

        let record = match self.fetcher.fetch(&url).await {
            Ok(page) => self.assemble(id, &page),
            Err(e) => {
                warn!("Failed to fetch detail page {}: {}", url, e);
                return Record::empty(id, url);
            }
        };

        if record.is_final(self.today) {
            match self.cache.store(&record, id).await {
                Ok(()) => info!("Cached record {}", id),
                Err(e) => warn!("Failed to cache record {}: {}", id, e),
            }
        } else {
            debug!("Record {} not released as of {}, not caching", id, self.today);
        }

        record
    }

    /// Run every extractor over `page`
    pub fn assemble(&self, id: &str, page: &str) -> Record {
        let directors = extract::extract_directors(page)
            .into_iter()
            .map(|credit| (Job::Director, credit));
        let actors = extract::extract_actors(page)
            .into_iter()
            .map(|credit| (Job::Actor, credit));

        let people = directors
            .chain(actors)
            .map(|(job, credit)| Person {
                url: self.config.person_url(&credit.id),
                name: credit.name,
                job,
            })
            .collect();

        let categories = extract::extract_categories(page)
            .into_iter()
            .map(|genre| Category {
                url: self.config.genre_url(&genre.slug),
                name: genre.name,
            })
            .collect();

        Record {
            id: id.to_string(),
            url: self.config.movie_url(id),
            score: extract::extract_score(page),
            popularity: extract::extract_popularity(page),
            title: extract::extract_title(page),
            alternative_title: extract::extract_alternative_title(page),
            short_overview: extract::extract_short_overview(page),
            release: extract::extract_release(page),
            runtime: extract::extract_runtime(page),
            budget: extract::extract_budget(page),
            people,
            categories,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::MemoryCache;
    use crate::error::{Error, Result};
    use std::collections::HashMap;

    struct StaticFetcher {
        pages: HashMap<String, String>,
    }

    impl PageFetcher for StaticFetcher {
        async fn fetch(&self, url: &str) -> Result<String> {
            self.pages.get(url).cloned().ok_or(Error::Status {
                status_code: 404,
                url: url.to_string(),
            })
        }
    }

    fn detail(release: &str) -> String {
        format!(
            r#"<title>Les Choristes (2004) - AlloCiné</title>
Date de sortie cinéma : {release}<br />
Avec <a href='/personne/fichepersonne_gen_cpersonne=5.html' title='Gérard Jugnot'>Gérard Jugnot</a>
<a class="underline" href="/film/casting_gen_cfilm=1.html">plus</a>
Réalisé par <span class="bold"><a href='/personne/fichepersonne_gen_cpersonne=9.html' title='Christophe Barratier'>Christophe Barratier</a></span>"#
        )
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2004, 3, 17).unwrap()
    }

    fn fetcher_for(id: &str, page: String) -> (StaticFetcher, BridgeConfig) {
        let config = BridgeConfig::default();
        let mut pages = HashMap::new();
        pages.insert(config.movie_url(id), page);
        (StaticFetcher { pages }, config)
    }

    #[tokio::test]
    async fn test_directors_before_actors() {
        let (fetcher, config) = fetcher_for("1", detail("17 mars 2004"));
        let cache = MemoryCache::new();
        let builder = RecordBuilder::new(&fetcher, &cache, &config, today());

        let record = builder.build("1").await;
        let people: Vec<_> = record
            .people
            .iter()
            .map(|p| (p.job, p.name.as_str()))
            .collect();
        assert_eq!(
            people,
            vec![
                (Job::Director, "Christophe Barratier"),
                (Job::Actor, "Gérard Jugnot"),
            ]
        );
        assert_eq!(
            record.people[0].url,
            "http://www.allocine.fr/personne/fichepersonne_gen_cpersonne=9.html"
        );
        assert_eq!(record.title.unwrap().display, "Les Choristes");
    }

    #[tokio::test]
    async fn test_released_yesterday_is_cached() {
        let (fetcher, config) = fetcher_for("1", detail("16 mars 2004"));
        let cache = MemoryCache::new();
        let builder = RecordBuilder::new(&fetcher, &cache, &config, today());

        let record = builder.build("1").await;
        assert!(cache.exists("1").await);
        assert_eq!(cache.load("1").await.unwrap(), record);
    }

    #[tokio::test]
    async fn test_released_today_is_cached() {
        let (fetcher, config) = fetcher_for("1", detail("17 mars 2004"));
        let cache = MemoryCache::new();
        RecordBuilder::new(&fetcher, &cache, &config, today())
            .build("1")
            .await;
        assert!(cache.exists("1").await);
    }

    #[tokio::test]
    async fn test_released_tomorrow_is_not_cached() {
        let (fetcher, config) = fetcher_for("1", detail("18 mars 2004"));
        let cache = MemoryCache::new();
        let record = RecordBuilder::new(&fetcher, &cache, &config, today())
            .build("1")
            .await;

        assert_eq!(record.release, NaiveDate::from_ymd_opt(2004, 3, 18));
        assert!(!cache.exists("1").await);
    }

    #[tokio::test]
    async fn test_unknown_release_is_not_cached() {
        let (fetcher, config) = fetcher_for("1", detail("prochainement"));
        let cache = MemoryCache::new();
        let record = RecordBuilder::new(&fetcher, &cache, &config, today())
            .build("1")
            .await;

        assert!(record.release.is_none());
        assert!(cache.is_empty());
    }

    #[tokio::test]
    async fn test_fetch_failure_yields_empty_record() {
        let fetcher = StaticFetcher {
            pages: HashMap::new(),
        };
        let config = BridgeConfig::default();
        let cache = MemoryCache::new();
        let record = RecordBuilder::new(&fetcher, &cache, &config, today())
            .build("77")
            .await;

        assert_eq!(record, Record::empty("77", config.movie_url("77")));
        assert!(cache.is_empty());
    }
}

//! # Bridge Configuration Module
//!
//! Configuration for the AlloCiné bridge: where pages are fetched from,
//! where resolved records are cached, and how the HTTP client identifies
//! itself. It uses a builder pattern for flexible configuration and can be
//! overlaid from environment variables.
//!
//! ## Key Components
//!
//! - `BridgeConfig`: endpoints, cache directory and HTTP client settings
//! - `BridgeConfigBuilder`: Builder pattern implementation for easier configuration
//!
//! ## Environment
//!
//! - `ALLOCINE_BRIDGE_CACHE_DIR`: cache directory
//! - `ALLOCINE_BRIDGE_BASE_URL`: site root used for movie, person and genre URLs
//! - `ALLOCINE_BRIDGE_SEARCH_URL`: search endpoint, the escaped query is appended

use std::path::PathBuf;
use std::time::Duration;

/// Default search endpoint, the escaped query is appended verbatim
pub const DEFAULT_SEARCH_URL: &str = "http://www.allocine.fr/recherche/?q=";

/// Default site root
pub const DEFAULT_BASE_URL: &str = "http://www.allocine.fr";

/// Default cache directory
pub const DEFAULT_CACHE_DIR: &str = "/tmp/allocine_api";

/// Configuration for the bridge
#[derive(Debug, Clone)]
pub struct BridgeConfig {
    /// Search endpoint prefix
    pub search_url: String,

    /// Site root, without trailing slash
    pub base_url: String,

    /// Directory holding one cached record per movie id
    pub cache_dir: PathBuf,

    /// User agent to use for requests
    pub user_agent: String,

    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            search_url: DEFAULT_SEARCH_URL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            cache_dir: PathBuf::from(DEFAULT_CACHE_DIR),
            user_agent: format!("allocine-bridge/{}", env!("CARGO_PKG_VERSION")),
            timeout_secs: 30,
        }
    }
}

/// Builder for BridgeConfig
#[derive(Debug, Default)]
pub struct BridgeConfigBuilder {
    config: BridgeConfig,
}

impl BridgeConfigBuilder {
    /// Create a new builder with default configuration
    pub fn new() -> Self {
        Self {
            config: BridgeConfig::default(),
        }
    }

    /// Start from an existing configuration
    pub fn from_config(config: BridgeConfig) -> Self {
        Self { config }
    }

    /// Set the search endpoint prefix
    pub fn search_url(mut self, search_url: impl Into<String>) -> Self {
        self.config.search_url = search_url.into();
        self
    }

    /// Set the site root
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.config.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Set the cache directory
    pub fn cache_dir(mut self, cache_dir: impl Into<PathBuf>) -> Self {
        self.config.cache_dir = cache_dir.into();
        self
    }

    /// Set the user agent to use for requests
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.config.user_agent = user_agent.into();
        self
    }

    /// Set the request timeout in seconds
    pub fn timeout_secs(mut self, timeout_secs: u64) -> Self {
        self.config.timeout_secs = timeout_secs;
        self
    }

    /// Build the configuration
    pub fn build(self) -> BridgeConfig {
        self.config
    }
}

impl BridgeConfig {
    /// Create a new builder
    pub fn builder() -> BridgeConfigBuilder {
        BridgeConfigBuilder::new()
    }

    /// Default configuration overlaid with `ALLOCINE_BRIDGE_*` variables
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut builder = BridgeConfigBuilder::new();
        if let Some(dir) = lookup("ALLOCINE_BRIDGE_CACHE_DIR") {
            builder = builder.cache_dir(dir);
        }
        if let Some(base) = lookup("ALLOCINE_BRIDGE_BASE_URL") {
            builder = builder.base_url(base);
        }
        if let Some(search) = lookup("ALLOCINE_BRIDGE_SEARCH_URL") {
            builder = builder.search_url(search);
        }
        builder.build()
    }

    /// Get the request timeout as a Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Search page URL for an already escaped query
    pub fn search_page_url(&self, escaped_query: &str) -> String {
        format!("{}{}", self.search_url, escaped_query)
    }

    /// Detail page URL of a movie
    pub fn movie_url(&self, id: &str) -> String {
        format!("{}/film/fichefilm_gen_cfilm={}.html", self.base_url, id)
    }

    /// Profile URL of a person
    pub fn person_url(&self, id: &str) -> String {
        format!(
            "{}/personne/fichepersonne_gen_cpersonne={}.html",
            self.base_url, id
        )
    }

    /// Listing URL of a genre
    pub fn genre_url(&self, slug: &str) -> String {
        format!("{}/film/tous/genre-{}/", self.base_url, slug)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_templates() {
        let config = BridgeConfig::default();
        assert_eq!(
            config.movie_url("5818"),
            "http://www.allocine.fr/film/fichefilm_gen_cfilm=5818.html"
        );
        assert_eq!(
            config.person_url("1877"),
            "http://www.allocine.fr/personne/fichepersonne_gen_cpersonne=1877.html"
        );
        assert_eq!(
            config.genre_url("13025"),
            "http://www.allocine.fr/film/tous/genre-13025/"
        );
        assert_eq!(
            config.search_page_url("la+haine"),
            "http://www.allocine.fr/recherche/?q=la+haine"
        );
    }

    #[test]
    fn test_builder_trims_base_url() {
        let config = BridgeConfig::builder()
            .base_url("http://localhost:8080/")
            .cache_dir("/var/cache/bridge")
            .timeout_secs(5)
            .build();

        assert_eq!(config.base_url, "http://localhost:8080");
        assert_eq!(config.cache_dir, PathBuf::from("/var/cache/bridge"));
        assert_eq!(config.timeout(), Duration::from_secs(5));
        assert_eq!(
            config.movie_url("1"),
            "http://localhost:8080/film/fichefilm_gen_cfilm=1.html"
        );
    }

    #[test]
    fn test_env_overlay() {
        let config = BridgeConfig::from_lookup(|key| match key {
            "ALLOCINE_BRIDGE_CACHE_DIR" => Some("/srv/allocine".to_string()),
            "ALLOCINE_BRIDGE_SEARCH_URL" => Some("http://mirror/?q=".to_string()),
            _ => None,
        });

        assert_eq!(config.cache_dir, PathBuf::from("/srv/allocine"));
        assert_eq!(config.search_url, "http://mirror/?q=");
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
    }
}

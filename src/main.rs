//! # allocine-bridge CLI
//!
//! Entry points for the bridge:
//!
//! - `cgi`: answer a CGI request, reading `QUERY_STRING` and writing the
//!   content-type header followed by the document
//! - `search`: run the pipeline for a raw query string and print the document
//! - `lookup`: resolve a single movie id
//! - `cached`: list movie ids present in the cache

mod telemetry;

use std::path::PathBuf;

use allocine_bridge::{BridgeConfig, FileCache, HttpFetcher, SearchCoordinator, xml};
use clap::{Args, Parser, Subcommand};
use telemetry::LogTarget;
use tracing::instrument;

#[derive(Parser)]
#[command(author, version, about = "AlloCiné movie metadata as OpenSearch XML", long_about = None)]
struct Cli {
    /// Cache directory (default: $ALLOCINE_BRIDGE_CACHE_DIR or /tmp/allocine_api)
    #[arg(long, global = true)]
    cache_dir: Option<PathBuf>,

    /// Site root used for movie, person and genre URLs
    #[arg(long, global = true)]
    base_url: Option<String>,

    /// Search endpoint, the escaped query is appended
    #[arg(long, global = true)]
    search_url: Option<String>,

    /// Request timeout in seconds
    #[arg(long, global = true)]
    timeout: Option<u64>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Answer a CGI request from QUERY_STRING
    Cgi,

    /// Run a search for a raw query string such as `title=la+haine`
    Search(SearchArgs),

    /// Resolve one movie id through the cache or its detail page
    Lookup(LookupArgs),

    /// List movie ids present in the cache
    Cached,
}

#[derive(Args, Debug)]
struct SearchArgs {
    /// Raw query string
    #[arg(required = true)]
    query_string: String,
}

#[derive(Args, Debug)]
struct LookupArgs {
    /// AlloCiné movie id
    #[arg(required = true)]
    id: String,

    /// Output format (xml|json)
    #[arg(short, long, default_value = "xml", value_parser = ["xml", "json"])]
    format: String,
}

impl Cli {
    fn config(&self) -> BridgeConfig {
        let mut builder = allocine_bridge::config::BridgeConfigBuilder::from_config(
            BridgeConfig::from_env(),
        );
        if let Some(dir) = &self.cache_dir {
            builder = builder.cache_dir(dir);
        }
        if let Some(base) = &self.base_url {
            builder = builder.base_url(base);
        }
        if let Some(search) = &self.search_url {
            builder = builder.search_url(search);
        }
        if let Some(timeout) = self.timeout {
            builder = builder.timeout_secs(timeout);
        }
        builder.build()
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = cli.config();

    // stdout carries the CGI response, so logs go to a file there
    let _telemetry = match cli.command {
        Commands::Cgi => telemetry::init_tracing_subscriber(LogTarget::File(&config.cache_dir))?,
        _ => telemetry::init_tracing_subscriber(LogTarget::Stderr)?,
    };

    let cache = FileCache::new(config.cache_dir.clone());
    let fetcher = HttpFetcher::new(&config)?;
    let coordinator = SearchCoordinator::new(fetcher, cache, config);

    match cli.command {
        Commands::Cgi => cgi_command(&coordinator).await?,
        Commands::Search(args) => search_command(&coordinator, args).await?,
        Commands::Lookup(args) => lookup_command(&coordinator, args).await?,
        Commands::Cached => cached_command(&coordinator).await?,
    }

    Ok(())
}

type Coordinator = SearchCoordinator<HttpFetcher, FileCache>;

#[instrument(skip(coordinator))]
async fn cgi_command(coordinator: &Coordinator) -> anyhow::Result<()> {
    let query_string = std::env::var("QUERY_STRING").unwrap_or_default();
    let document = coordinator.handle(&query_string).await?;

    print!("Content-Type: {}\n\n{}", xml::CONTENT_TYPE, document);
    Ok(())
}

#[instrument(skip(coordinator))]
async fn search_command(coordinator: &Coordinator, args: SearchArgs) -> anyhow::Result<()> {
    let document = coordinator.handle(&args.query_string).await?;
    print!("{}", document);
    Ok(())
}

#[instrument(skip(coordinator))]
async fn lookup_command(coordinator: &Coordinator, args: LookupArgs) -> anyhow::Result<()> {
    anyhow::ensure!(
        !args.id.is_empty() && args.id.chars().all(|c| c.is_ascii_digit()),
        "movie id must be numeric, got {:?}",
        args.id
    );

    let record = coordinator.resolve(&args.id).await;
    match args.format.as_str() {
        "json" => println!("{}", serde_json::to_string_pretty(&record)?),
        _ => print!("{}", xml::render_movie(&record)?),
    }
    Ok(())
}

#[instrument(skip(coordinator))]
async fn cached_command(coordinator: &Coordinator) -> anyhow::Result<()> {
    let ids = coordinator.cache().list().await?;
    println!(
        "{} cached movies in {}",
        ids.len(),
        coordinator.cache().base_path().display()
    );
    for id in ids {
        println!("{}", id);
    }
    Ok(())
}

//! dealfinder CLI
//!
//! Local entry point: runs searches and manages history and favorites.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use dealfinder::{
    error::{AppError, Result},
    models::Config,
    pipeline::{Aggregator, ResultOrigin},
    storage::{Favorites, LocalStorage, SearchHistory},
    utils::http,
};

/// dealfinder - compare prices across marketplaces
#[derive(Parser, Debug)]
#[command(
    name = "dealfinder",
    version,
    about = "Compare prices across marketplaces"
)]

struct Cli {
    /// Path to storage directory containing config and saved data
    #[arg(short, long, default_value = "storage")]
    storage_dir: PathBuf,

    /// Scraping proxy api key (overrides config)
    #[arg(long, env = "SCRAPER_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Search all sources for a product
    Search {
        /// Product query
        query: Vec<String>,

        /// Print the full outcome as JSON
        #[arg(long)]
        json: bool,

        /// Do not record the search in history
        #[arg(long)]
        no_history: bool,
    },

    /// Show or clear recent searches
    History {
        #[arg(short, long, default_value_t = 10)]
        limit: usize,

        /// Delete all recorded searches
        #[arg(long)]
        clear: bool,
    },

    /// Manage saved listings
    Favorites {
        #[command(subcommand)]
        action: FavoriteAction,
    },

    /// List configured sources and whether they are active
    Sources,

    /// Validate configuration file
    Validate,
}

#[derive(Subcommand, Debug)]
enum FavoriteAction {
    /// Show saved listings
    List,
    /// Save a listing from the last search by id
    Add { id: String },
    /// Remove a saved listing by id
    Remove { id: String },
}

/// Initialize logging based on verbosity flag.
fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp_secs()
        .init();
}

/// Main entry point for the CLI application.
#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config_path = cli.storage_dir.join("config.toml");
    let mut config = Config::load_or_default(&config_path);
    if let Some(key) = cli.api_key {
        config.proxy.api_key = Some(key);
    }

    let storage = LocalStorage::new(&cli.storage_dir);

    match cli.command {
        Command::Search {
            query,
            json,
            no_history,
        } => {
            let query = query.join(" ");
            if query.trim().is_empty() {
                return Err(AppError::validation("Query must not be empty"));
            }

            let client = http::create_async_client(&config.http)?;
            let aggregator = Aggregator::from_config(&config, &client)?;
            let outcome = aggregator.search_detailed(&query).await;

            if json {
                println!("{}", serde_json::to_string_pretty(&outcome)?);
            } else {
                if let ResultOrigin::Fallback(reason) = outcome.origin {
                    log::info!("Showing sample listings ({:?})", reason);
                }
                for listing in &outcome.listings {
                    println!("{}", listing.format(&config.output.template));
                }
                if outcome.listings.is_empty() {
                    println!("No results.");
                }
            }

            storage.save_last_search(&outcome.listings).await?;
            if !no_history {
                storage
                    .add_search(&outcome.query, outcome.listings.len())
                    .await?;
            }
        }

        Command::History { limit, clear } => {
            if clear {
                storage.clear_history().await?;
                log::info!("Search history cleared");
                return Ok(());
            }

            let history = storage.recent_searches(limit).await?;
            if history.is_empty() {
                println!("No searches recorded yet.");
            }
            for record in history {
                println!(
                    "{}  {:>3} results  {}",
                    record.created_at.format("%Y-%m-%d %H:%M"),
                    record.result_count,
                    record.query
                );
            }
        }

        Command::Favorites { action } => match action {
            FavoriteAction::List => {
                let favorites = storage.favorites().await?;
                if favorites.is_empty() {
                    println!("No favorites saved yet.");
                }
                for fav in favorites {
                    println!(
                        "{}  {:.2} {}  {}  {}",
                        fav.item_id, fav.price, fav.currency, fav.seller, fav.title
                    );
                }
            }
            FavoriteAction::Add { id } => {
                let last = storage.load_last_search().await?;
                let Some(listing) = last.iter().find(|l| l.id == id) else {
                    return Err(AppError::validation(format!(
                        "No listing '{id}' in the last search"
                    )));
                };
                storage.add_favorite(listing).await?;
                log::info!("Saved '{}' to favorites", listing.title);
            }
            FavoriteAction::Remove { id } => {
                if storage.remove_favorite(&id).await? {
                    log::info!("Removed '{}' from favorites", id);
                } else {
                    log::warn!("'{}' is not in favorites", id);
                }
            }
        },

        Command::Sources => {
            for source in &config.sources {
                let state = if !source.enabled {
                    "disabled"
                } else if source.via_proxy && !config.proxy.has_credentials() {
                    "needs api key"
                } else {
                    "active"
                };
                println!("{:<10} {:<10} {}", source.id, source.name, state);
            }
        }

        Command::Validate => {
            log::info!("Validating configuration...");

            if let Err(e) = config.validate() {
                log::error!("Config validation failed: {}", e);
                return Err(e);
            }
            log::info!("✓ Config OK ({} sources)", config.sources.len());
        }
    }

    Ok(())
}

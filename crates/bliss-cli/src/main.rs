mod app;
mod config;
mod facade;
mod fetcher;
mod library;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use bliss_core::{
    FontSize, Passage, PassageFilter, PreferencesPatch, Quote, Theme, WORDS_PER_MINUTE,
    parse_iso8601, reading_time_minutes, relative_time, time_based_greeting, today_key,
    truncate_text,
};
use bliss_store::{FavoriteOutcome, KvStore, MemoryBackend, SqliteBackend, db_path};
use chrono::{Timelike, Utc};
use clap::{Parser, Subcommand};
use uuid::Uuid;

use crate::app::{App, Origin};
use crate::config::Config;
use crate::facade::{NetworkStatus, PassageFacade};
use crate::fetcher::{Answer, RemoteFetcher};
use crate::library::{PassageLibrary, ResourceLocation};

type BlissApp = App<ResourceLocation, RemoteFetcher, NetworkStatus>;

#[derive(Parser)]
#[command(name = "bliss", about = "Holy Bliss: a daily passage of wisdom")]
struct Cli {
    /// Never contact the quotes API
    #[arg(long, global = true)]
    offline: bool,

    /// Enable verbose debug output
    #[arg(long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show today's passage
    Today,

    /// Show a new passage
    Random {
        /// Source or author, matched case-insensitively
        #[arg(long)]
        source: Option<String>,

        /// Exact category
        #[arg(long)]
        category: Option<String>,

        /// Tag to match (repeatable; any one matches)
        #[arg(long = "tag")]
        tags: Vec<String>,

        /// Exact passage id
        #[arg(long)]
        id: Option<String>,

        /// Ask the quotes API before the local collection
        #[arg(long)]
        remote: bool,
    },

    /// Search passage text, sources and tags
    Search {
        term: String,
    },

    /// Describe the passage collection
    Collection,

    /// Save the last shown passage as a favorite
    Favorite {
        /// Favorite today's passage instead
        #[arg(long)]
        daily: bool,
    },

    /// List favorites
    Favorites,

    /// Remove a favorite by id
    Unfavorite {
        id: Uuid,
    },

    /// Write a reflection on the last shown passage
    Reflect {
        text: String,
    },

    /// List reflections
    Reflections,

    /// Show or switch the theme (ocean, sunset, forest, cosmic)
    Theme {
        name: Option<Theme>,
    },

    /// Show or change preferences
    Prefs {
        #[arg(long)]
        notifications: Option<bool>,

        #[arg(long)]
        auto_save: Option<bool>,

        #[arg(long)]
        font_size: Option<FontSize>,

        #[arg(long)]
        language: Option<String>,
    },

    /// Show reading statistics
    Stats,

    /// Greeting for the time of day
    Greet {
        #[arg(long)]
        name: Option<String>,
    },

    /// Export all data to a JSON file
    Export {
        path: PathBuf,
    },

    /// Import data from a JSON export
    Import {
        path: PathBuf,
    },

    /// Delete all stored data
    Clear,

    /// Show storage usage
    Storage,

    /// List authors known to the quotes API
    Authors,

    /// List tags known to the quotes API
    Tags,

    /// Quotes by an author from the quotes API
    By {
        author: String,
    },

    /// Quotes carrying any of the given tags from the quotes API
    Tagged {
        #[arg(required = true)]
        tags: Vec<String>,
    },
}

fn init_tracing(verbose: bool) {
    use tracing_subscriber::EnvFilter;

    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env().add_directive(tracing::Level::WARN.into())
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();
}

fn open_store(base: &Path, config: &Config) -> KvStore {
    let path = db_path(base);
    let store = match SqliteBackend::open(&path) {
        Ok(backend) => KvStore::new(backend),
        Err(e) => {
            tracing::warn!(
                "cannot open {}: {e}; nothing will be saved this run",
                path.display()
            );
            KvStore::new(MemoryBackend::new())
        }
    };
    store
        .with_prefix(&config.storage.prefix)
        .with_quota(config.storage.quota_bytes)
}

fn build_app(cli: &Cli) -> Result<BlissApp> {
    let base = config::data_dir();
    let mut config = Config::load(&base).context("failed to load configuration")?;
    if cli.offline {
        config.offline = true;
    }
    tracing::debug!("data dir: {}", base.display());

    let status = if config.offline {
        NetworkStatus::offline()
    } else {
        NetworkStatus::online()
    };
    let facade = PassageFacade::new(
        PassageLibrary::new(config.collection_location()),
        RemoteFetcher::new(&config.api.base_url),
        status,
    );
    let store = open_store(&base, &config);
    Ok(App::new(store, facade, config))
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Commands::Greet { name } = &cli.command {
        println!("{}", time_based_greeting(chrono::Local::now().hour(), name.as_deref()));
        return Ok(());
    }

    let app = build_app(&cli)?;
    let today = today_key();

    match &cli.command {
        Commands::Today => {
            app.record_visit(&today);
            let shown = app.today(&today).await;
            print_quote(&shown.quote);
            if cli.verbose {
                match shown.origin {
                    Origin::Cache => eprintln!("--- from today's cache ---"),
                    Origin::Fresh(p) => eprintln!("--- from {} ---", p.describe()),
                }
            }
        }
        Commands::Random {
            source,
            category,
            tags,
            id,
            remote,
        } => {
            app.record_visit(&today);
            let filter = PassageFilter {
                source: source.clone(),
                category: category.clone(),
                tags: tags.clone(),
                id: id.clone(),
            };
            let selection = app.random(filter, *remote).await;
            print_quote(&selection.quote);
            if cli.verbose || selection.provenance.is_fallback() {
                eprintln!("--- from {} ---", selection.provenance.describe());
            }
        }
        Commands::Search { term } => cmd_search(&app, term).await,
        Commands::Collection => cmd_collection(&app).await,
        Commands::Favorite { daily } => {
            let outcome = if *daily {
                app.favorite_daily(&today).await
            } else {
                app.favorite_current()?
            };
            match outcome {
                FavoriteOutcome::Added(fav) => {
                    println!("added to favorites: {} ({})", fav.author, fav.id)
                }
                FavoriteOutcome::AlreadyPresent => println!("already in favorites"),
                FavoriteOutcome::NotSaved => println!("favorite could not be saved"),
            }
        }
        Commands::Favorites => cmd_favorites(&app),
        Commands::Unfavorite { id } => {
            if app.unfavorite(*id) {
                println!("removed {id}");
            } else {
                println!("no favorite with id {id}");
            }
        }
        Commands::Reflect { text } => {
            let reflection = app.reflect(text)?;
            match &reflection.quote {
                Some(q) => println!("reflection saved on \"{}\"", truncate_text(&q.content, 48, "…")),
                None => println!("reflection saved"),
            }
        }
        Commands::Reflections => cmd_reflections(&app),
        Commands::Theme { name } => println!("{}", app.theme(*name)),
        Commands::Prefs {
            notifications,
            auto_save,
            font_size,
            language,
        } => {
            let prefs = app.update_preferences(PreferencesPatch {
                theme: None,
                notifications: *notifications,
                auto_save: *auto_save,
                font_size: *font_size,
                language: language.clone(),
            });
            println!("{}", serde_json::to_string_pretty(&prefs)?);
        }
        Commands::Stats => {
            let stats = app.stats();
            println!("total quotes:  {}", stats.total_quotes);
            println!("quotes read:   {}", stats.quotes_read);
            println!("favorites:     {}", stats.favorite_count);
            println!("reflections:   {}", stats.reflections_count);
            println!("days active:   {}", stats.days_active);
            println!("first visit:   {}", when(&stats.first_visit));
        }
        Commands::Greet { .. } => {}
        Commands::Export { path } => {
            let bundle = app.export_to(path)?;
            println!(
                "exported {} reflections and {} favorites to {}",
                bundle.reflections.map(|r| r.len()).unwrap_or(0),
                bundle.favorites.map(|f| f.len()).unwrap_or(0),
                path.display()
            );
        }
        Commands::Import { path } => {
            let bundle = app.import_from(path)?;
            let from = if bundle.export_date.is_empty() {
                "unknown date".to_string()
            } else {
                bundle.export_date
            };
            println!("imported {} (exported {from})", path.display());
        }
        Commands::Clear => {
            if app.clear() {
                println!("all data cleared");
            } else {
                println!("storage could not be cleared");
            }
        }
        Commands::Storage => {
            let info = app.storage_info();
            println!("available:  {}", info.available);
            println!("app bytes:  {}", info.app_bytes);
            println!("total:      {}", info.total_bytes);
        }
        Commands::Authors => print_list(app.authors().await),
        Commands::Tags => print_list(app.tags().await),
        Commands::By { author } => print_quotes(app.quotes_by_author(author).await),
        Commands::Tagged { tags } => print_quotes(app.quotes_by_tags(tags).await),
    }

    Ok(())
}

fn print_quote(quote: &Quote) {
    println!("\"{}\"", quote.content);
    println!("  {}", quote.attribution());
}

fn print_quotes(answer: Answer<Vec<Quote>>) {
    note_fallback(&answer);
    let quotes = answer.into_inner();
    if quotes.is_empty() {
        println!("(no quotes found)");
    }
    for q in &quotes {
        print_quote(q);
    }
}

fn when(timestamp: &str) -> String {
    match parse_iso8601(timestamp) {
        Some(ts) => relative_time(ts, Utc::now()),
        None => timestamp.to_string(),
    }
}

fn note_fallback<T>(answer: &Answer<T>) {
    if let Answer::Fallback { reason, .. } = answer {
        eprintln!("--- quotes API unavailable ({reason}); showing offline list ---");
    }
}

fn print_list(answer: Answer<Vec<String>>) {
    note_fallback(&answer);
    for item in answer.into_inner() {
        println!("{item}");
    }
}

async fn cmd_search(app: &BlissApp, term: &str) {
    let hits: Vec<Passage> = app.search(term).await;
    if hits.is_empty() {
        println!("(no passages found)");
        return;
    }
    for p in &hits {
        println!("[{}] {} — {}", p.id, truncate_text(&p.text, 72, "…"), p.source);
    }
    println!("{} match(es)", hits.len());
}

async fn cmd_collection(app: &BlissApp) {
    let info = app.collection_info().await;
    println!("passages:   {}", info.stats.total);
    println!("version:    {}", info.version.as_deref().unwrap_or("-"));
    println!("degraded:   {}", info.degraded);
    if let Some(reason) = &info.failure {
        println!("reason:     {reason}");
    }
    println!("sources:    {}", info.sources.join(", "));
    println!("categories: {}", info.categories.join(", "));
    for (source, count) in &info.stats.by_source {
        println!("  {source}: {count}");
    }
}

fn cmd_favorites(app: &BlissApp) {
    let favorites = app.favorites();
    if favorites.is_empty() {
        println!("(no favorites)");
        return;
    }
    for fav in &favorites {
        println!("{}  \"{}\" — {}", fav.id, fav.content, fav.author);
        println!(
            "    added {}, {} min read",
            when(&fav.added_at),
            reading_time_minutes(&fav.content, WORDS_PER_MINUTE)
        );
    }
}

fn cmd_reflections(app: &BlissApp) {
    let reflections = app.reflections();
    if reflections.is_empty() {
        println!("(no reflections)");
        return;
    }
    for r in &reflections {
        println!("{}  {}", when(&r.date), r.text);
        if let Some(q) = &r.quote {
            println!("    on \"{}\" {}", truncate_text(&q.content, 60, "…"), q.attribution());
        }
    }
}

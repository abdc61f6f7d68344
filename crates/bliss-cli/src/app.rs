//! Application controller: routes commands to the facade and the store.
//!
//! Owns no global state. The store, the facade and the configuration are
//! built by the caller and handed in.

use std::path::Path;

use anyhow::{Context, Result, bail};
use bliss_core::{
    CollectionStats, ExportBundle, Favorite, Passage, PassageFilter, Preferences,
    PreferencesPatch, Quote, Reflection, StatEvent, Stats, Theme, export_json, import_json,
};
use bliss_store::{FavoriteOutcome, KvStore, StorageInfo};
use uuid::Uuid;

use crate::config::Config;
use crate::facade::{Connectivity, PassageFacade, PassageRequest, Provenance, Selection};
use crate::fetcher::{Answer, QuoteFetcher, RemoteFetcher};
use crate::library::CollectionSource;

/// Where a shown quote came from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Origin {
    /// Today's cached daily quote.
    Cache,
    Fresh(Provenance),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Shown {
    pub quote: Quote,
    pub origin: Origin,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CollectionInfo {
    pub stats: CollectionStats,
    pub sources: Vec<String>,
    pub categories: Vec<String>,
    pub version: Option<String>,
    pub degraded: bool,
    pub failure: Option<String>,
}

pub struct App<S, F, C> {
    store: KvStore,
    facade: PassageFacade<S, F, C>,
    config: Config,
}

impl<S, F, C> App<S, F, C>
where
    S: CollectionSource,
    F: QuoteFetcher,
    C: Connectivity,
{
    pub fn new(store: KvStore, facade: PassageFacade<S, F, C>, config: Config) -> Self {
        Self {
            store,
            facade,
            config,
        }
    }

    pub fn store(&self) -> &KvStore {
        &self.store
    }

    /// Count `today` as an active day. Safe to call on every run.
    pub fn record_visit(&self, today: &str) -> bool {
        self.store.record_visit(today)
    }

    // --- Quotes ---

    /// Today's quote: the cached one when it was chosen today, otherwise a
    /// fresh daily selection that replaces the cache.
    pub async fn today(&self, today: &str) -> Shown {
        if let Some(cache) = self.store.daily_quote(today) {
            tracing::debug!("daily quote served from cache");
            self.store.set_current_quote(&cache.quote);
            return Shown {
                quote: cache.quote,
                origin: Origin::Cache,
            };
        }

        let Selection { quote, provenance } = self.facade.daily(today).await;
        self.store.set_daily_quote(&quote, today);
        self.store.set_current_quote(&quote);
        self.store.record(StatEvent::QuoteRead);
        Shown {
            quote,
            origin: Origin::Fresh(provenance),
        }
    }

    /// A new passage. `remote` asks the API first.
    pub async fn random(&self, filter: PassageFilter, remote: bool) -> Selection {
        let request = PassageRequest {
            prefer_local: Some(self.config.prefer_local && !remote),
            filter,
            fetch: self.config.fetch_options(),
        };
        let selection = self.facade.get_passage(&request).await;
        if selection.provenance.is_fallback() {
            tracing::info!("passage served via {}", selection.provenance.describe());
        }
        self.store.set_current_quote(&selection.quote);
        self.store.record(StatEvent::QuoteGenerated);
        self.store.record(StatEvent::QuoteRead);
        selection
    }

    pub fn current_quote(&self) -> Option<Quote> {
        self.store.current_quote()
    }

    pub async fn search(&self, term: &str) -> Vec<Passage> {
        let repo = self.facade.library().repository().await;
        repo.search(term).into_iter().cloned().collect()
    }

    pub async fn collection_info(&self) -> CollectionInfo {
        let library = self.facade.library();
        let repo = library.repository().await;
        CollectionInfo {
            stats: repo.stats(),
            sources: repo.sources(),
            categories: repo.categories(),
            version: repo.collection().version.clone(),
            degraded: repo.is_degraded(),
            failure: library.failure().await.map(str::to_string),
        }
    }

    // --- Favorites ---

    /// Favorite the quote last shown.
    pub fn favorite_current(&self) -> Result<FavoriteOutcome> {
        let Some(quote) = self.store.current_quote() else {
            bail!("no quote has been shown yet; run `bliss today` or `bliss random` first");
        };
        Ok(self.favorite(&quote))
    }

    /// Favorite today's daily quote.
    pub async fn favorite_daily(&self, today: &str) -> FavoriteOutcome {
        let shown = self.today(today).await;
        self.favorite(&shown.quote)
    }

    fn favorite(&self, quote: &Quote) -> FavoriteOutcome {
        let outcome = self.store.add_favorite(quote);
        if matches!(outcome, FavoriteOutcome::Added(_)) {
            self.store.record(StatEvent::FavoriteAdded);
        }
        outcome
    }

    pub fn favorites(&self) -> Vec<Favorite> {
        self.store.favorites()
    }

    pub fn unfavorite(&self, id: Uuid) -> bool {
        self.store.remove_favorite(id)
    }

    // --- Reflections ---

    /// Save a reflection on the quote last shown.
    pub fn reflect(&self, text: &str) -> Result<Reflection> {
        if text.trim().is_empty() {
            bail!("reflection is empty");
        }
        let reflection = Reflection::new(text, self.store.current_quote());
        if self.store.add_reflection(reflection.clone()) {
            self.store.record(StatEvent::ReflectionAdded);
        }
        Ok(reflection)
    }

    pub fn reflections(&self) -> Vec<Reflection> {
        self.store.reflections()
    }

    // --- Preferences & stats ---

    /// Switch theme when one is given. Returns the theme in effect.
    pub fn theme(&self, theme: Option<Theme>) -> Theme {
        if let Some(theme) = theme {
            self.store.set_preferences(PreferencesPatch {
                theme: Some(theme),
                ..PreferencesPatch::default()
            });
        }
        self.store.preferences().theme
    }

    pub fn update_preferences(&self, patch: PreferencesPatch) -> Preferences {
        if patch != PreferencesPatch::default() {
            self.store.set_preferences(patch);
        }
        self.store.preferences()
    }

    pub fn stats(&self) -> Stats {
        self.store.stats()
    }

    // --- Data ---

    pub fn export_to(&self, path: &Path) -> Result<ExportBundle> {
        let bundle = self.store.export_data();
        let json = export_json(&bundle).context("failed to serialize export")?;
        std::fs::write(path, json).with_context(|| format!("failed to write {}", path.display()))?;
        Ok(bundle)
    }

    pub fn import_from(&self, path: &Path) -> Result<ExportBundle> {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        let bundle =
            import_json(&json).with_context(|| format!("invalid export in {}", path.display()))?;
        if !self.store.import_data(&bundle) {
            bail!("storage rejected part of the import");
        }
        Ok(bundle)
    }

    pub fn clear(&self) -> bool {
        self.store.clear()
    }

    pub fn storage_info(&self) -> StorageInfo {
        self.store.storage_info()
    }
}

impl<S, C> App<S, RemoteFetcher, C>
where
    S: CollectionSource,
    C: Connectivity,
{
    pub async fn authors(&self) -> Answer<Vec<String>> {
        let fetcher = self.facade.fetcher();
        if !self.facade.is_online() {
            return offline(fetcher.fallback_authors());
        }
        fetcher.authors().await
    }

    pub async fn tags(&self) -> Answer<Vec<String>> {
        let fetcher = self.facade.fetcher();
        if !self.facade.is_online() {
            return offline(fetcher.fallback_tags());
        }
        fetcher.tags().await
    }

    pub async fn quotes_by_author(&self, author: &str) -> Answer<Vec<Quote>> {
        let fetcher = self.facade.fetcher();
        if !self.facade.is_online() {
            return offline(fetcher.fallback_by_author(author));
        }
        fetcher.quotes_by_author(author).await
    }

    pub async fn quotes_by_tags(&self, tags: &[String]) -> Answer<Vec<Quote>> {
        let fetcher = self.facade.fetcher();
        if !self.facade.is_online() {
            return offline(fetcher.fallback_by_tags(tags));
        }
        fetcher.quotes_by_tags(tags).await
    }
}

fn offline<T>(value: T) -> Answer<T> {
    Answer::Fallback {
        value,
        reason: "offline".to_string(),
    }
}

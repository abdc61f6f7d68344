//! Typed accessors for the records the application persists.

use bliss_core::{
    DailyQuoteCache, Favorite, Preferences, PreferencesPatch, Quote, Reflection, StatEvent,
    Stats, StatsPatch,
};
use uuid::Uuid;

use crate::kv::KvStore;

pub mod keys {
    pub const PREFERENCES: &str = "preferences";
    pub const STATS: &str = "stats";
    pub const DAILY_QUOTE: &str = "dailyQuote";
    pub const REFLECTIONS: &str = "reflections";
    pub const FAVORITES: &str = "favorites";
    pub const CURRENT_QUOTE: &str = "currentQuote";
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FavoriteOutcome {
    Added(Favorite),
    /// A favorite with the same content and author exists already.
    AlreadyPresent,
    /// The write failed; nothing was stored.
    NotSaved,
}

impl KvStore {
    // --- Preferences ---

    pub fn preferences(&self) -> Preferences {
        self.get(keys::PREFERENCES, Preferences::default())
    }

    pub fn set_preferences(&self, patch: PreferencesPatch) -> bool {
        let mut prefs = self.preferences();
        prefs.merge(patch);
        self.set(keys::PREFERENCES, &prefs)
    }

    // --- Stats ---

    pub fn stats(&self) -> Stats {
        self.get(keys::STATS, Stats::default())
    }

    pub fn update_stats(&self, patch: StatsPatch) -> bool {
        let mut stats = self.stats();
        stats.merge(patch);
        self.set(keys::STATS, &stats)
    }

    pub fn record(&self, event: StatEvent) -> bool {
        let mut stats = self.stats();
        stats.record(event);
        self.set(keys::STATS, &stats)
    }

    /// Count `today` as an active day unless it already is. `lastVisit`
    /// holds the day key of the latest visit. Returns true when the first
    /// visit of the day was stored.
    pub fn record_visit(&self, today: &str) -> bool {
        let mut stats = self.stats();
        if stats.last_visit.as_deref() == Some(today) {
            return false;
        }
        stats.record(StatEvent::DayActive);
        stats.last_visit = Some(today.to_string());
        self.set(keys::STATS, &stats)
    }

    // --- Daily quote ---

    /// The cached daily quote, only if it was chosen for `today`.
    pub fn daily_quote(&self, today: &str) -> Option<DailyQuoteCache> {
        self.stored_daily_quote()
            .filter(|cache| cache.is_valid_for(today))
    }

    /// The cached daily quote regardless of its date.
    pub fn stored_daily_quote(&self) -> Option<DailyQuoteCache> {
        self.get(keys::DAILY_QUOTE, None)
    }

    pub fn set_daily_quote(&self, quote: &Quote, today: &str) -> bool {
        self.set(
            keys::DAILY_QUOTE,
            &DailyQuoteCache::new(quote.clone(), today),
        )
    }

    // --- Current quote ---

    /// The quote most recently shown to the user.
    pub fn current_quote(&self) -> Option<Quote> {
        self.get(keys::CURRENT_QUOTE, None)
    }

    pub fn set_current_quote(&self, quote: &Quote) -> bool {
        self.set(keys::CURRENT_QUOTE, quote)
    }

    // --- Reflections ---

    pub fn reflections(&self) -> Vec<Reflection> {
        self.get(keys::REFLECTIONS, Vec::new())
    }

    pub fn add_reflection(&self, reflection: Reflection) -> bool {
        let mut reflections = self.reflections();
        reflections.push(reflection);
        self.set(keys::REFLECTIONS, &reflections)
    }

    // --- Favorites ---

    pub fn favorites(&self) -> Vec<Favorite> {
        self.get(keys::FAVORITES, Vec::new())
    }

    pub fn add_favorite(&self, quote: &Quote) -> FavoriteOutcome {
        let mut favorites = self.favorites();
        if favorites.iter().any(|f| f.same_quote(quote)) {
            return FavoriteOutcome::AlreadyPresent;
        }
        let favorite = Favorite::from_quote(quote);
        favorites.push(favorite.clone());
        if self.set(keys::FAVORITES, &favorites) {
            FavoriteOutcome::Added(favorite)
        } else {
            FavoriteOutcome::NotSaved
        }
    }

    /// Returns false when no favorite has `id` or the write failed.
    pub fn remove_favorite(&self, id: Uuid) -> bool {
        let mut favorites = self.favorites();
        let before = favorites.len();
        favorites.retain(|f| f.id != id);
        if favorites.len() == before {
            return false;
        }
        self.set(keys::FAVORITES, &favorites)
    }
}

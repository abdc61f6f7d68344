//! Holy Bliss passage engine.
//!
//! Passages, normalized quotes, the deterministic daily selection and the
//! user records (preferences, stats, reflections, favorites) that the store
//! persists and the CLI renders.
//!
//! Zero I/O: loading, fetching and persistence live in the other crates.

pub mod constants;
pub mod defaults;
pub mod filter;
pub mod greeting;
pub mod hash;
pub mod passage;
pub mod quote;
pub mod records;
pub mod repository;
pub mod serde_compat;
pub mod text;
pub mod time;

pub use constants::{DEFAULT_MAX_LENGTH, DEFAULT_MIN_LENGTH, EXPORT_VERSION, WORDS_PER_MINUTE};
pub use defaults::{embedded_collection, fallback_quotes};
pub use filter::PassageFilter;
pub use greeting::time_based_greeting;
pub use hash::{daily_index, date_hash};
pub use passage::{CollectionError, Passage, PassageCollection};
pub use quote::{Quote, QuoteSource};
pub use records::{
    DailyQuoteCache, Favorite, FontSize, Preferences, PreferencesPatch, Reflection, StatEvent,
    Stats, StatsPatch, Theme,
};
pub use repository::{CollectionStats, PassageRepository};
pub use serde_compat::{ExportBundle, export_json, import_json};
pub use text::{reading_time_minutes, relative_time, truncate_text};
pub use time::{date_key, now_iso8601, parse_iso8601, today_key};

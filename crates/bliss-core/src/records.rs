//! User records persisted by the store.
//!
//! Stored documents may be partial (older exports, hand edits); every record
//! deserializes field-by-field onto its defaults. Changes arrive as patch
//! types and are applied with an explicit merge.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::quote::Quote;
use crate::time::now_iso8601;

// --- Preferences ---

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Theme {
    #[default]
    #[serde(rename = "theme-ocean")]
    Ocean,
    #[serde(rename = "theme-sunset")]
    Sunset,
    #[serde(rename = "theme-forest")]
    Forest,
    #[serde(rename = "theme-cosmic")]
    Cosmic,
}

impl Theme {
    pub const ALL: [Theme; 4] = [Theme::Ocean, Theme::Sunset, Theme::Forest, Theme::Cosmic];

    pub fn as_str(self) -> &'static str {
        match self {
            Theme::Ocean => "theme-ocean",
            Theme::Sunset => "theme-sunset",
            Theme::Forest => "theme-forest",
            Theme::Cosmic => "theme-cosmic",
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Theme {
    type Err = String;

    /// Accepts `theme-ocean` as well as the bare `ocean`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim().to_lowercase();
        let name = name.strip_prefix("theme-").unwrap_or(&name);
        match name {
            "ocean" => Ok(Theme::Ocean),
            "sunset" => Ok(Theme::Sunset),
            "forest" => Ok(Theme::Forest),
            "cosmic" => Ok(Theme::Cosmic),
            other => Err(format!(
                "unknown theme '{other}' (expected ocean, sunset, forest or cosmic)"
            )),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FontSize {
    Small,
    #[default]
    Medium,
    Large,
}

impl FromStr for FontSize {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "small" => Ok(FontSize::Small),
            "medium" => Ok(FontSize::Medium),
            "large" => Ok(FontSize::Large),
            other => Err(format!("unknown font size '{other}'")),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Preferences {
    pub theme: Theme,
    pub notifications: bool,
    pub auto_save: bool,
    pub font_size: FontSize,
    pub language: String,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            theme: Theme::Ocean,
            notifications: true,
            auto_save: true,
            font_size: FontSize::Medium,
            language: "en".to_string(),
        }
    }
}

/// Partial preferences update. `None` keeps the current value.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PreferencesPatch {
    pub theme: Option<Theme>,
    pub notifications: Option<bool>,
    pub auto_save: Option<bool>,
    pub font_size: Option<FontSize>,
    pub language: Option<String>,
}

impl From<Preferences> for PreferencesPatch {
    fn from(p: Preferences) -> Self {
        Self {
            theme: Some(p.theme),
            notifications: Some(p.notifications),
            auto_save: Some(p.auto_save),
            font_size: Some(p.font_size),
            language: Some(p.language),
        }
    }
}

impl Preferences {
    pub fn merge(&mut self, patch: PreferencesPatch) {
        if let Some(theme) = patch.theme {
            self.theme = theme;
        }
        if let Some(notifications) = patch.notifications {
            self.notifications = notifications;
        }
        if let Some(auto_save) = patch.auto_save {
            self.auto_save = auto_save;
        }
        if let Some(font_size) = patch.font_size {
            self.font_size = font_size;
        }
        if let Some(language) = patch.language {
            self.language = language;
        }
    }
}

// --- Stats ---

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Stats {
    pub total_quotes: u64,
    pub quotes_read: u64,
    pub favorite_count: u64,
    pub reflections_count: u64,
    pub days_active: u64,
    pub last_visit: Option<String>,
    pub first_visit: String,
}

impl Default for Stats {
    fn default() -> Self {
        Self {
            total_quotes: 0,
            quotes_read: 0,
            favorite_count: 0,
            reflections_count: 0,
            days_active: 0,
            last_visit: None,
            first_visit: now_iso8601(),
        }
    }
}

/// Things that bump a counter.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StatEvent {
    QuoteGenerated,
    QuoteRead,
    FavoriteAdded,
    ReflectionAdded,
    DayActive,
}

/// Partial stats update. Counters never move backwards.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StatsPatch {
    pub total_quotes: Option<u64>,
    pub quotes_read: Option<u64>,
    pub favorite_count: Option<u64>,
    pub reflections_count: Option<u64>,
    pub days_active: Option<u64>,
    pub last_visit: Option<String>,
}

impl Stats {
    pub fn record(&mut self, event: StatEvent) {
        let counter = match event {
            StatEvent::QuoteGenerated => &mut self.total_quotes,
            StatEvent::QuoteRead => &mut self.quotes_read,
            StatEvent::FavoriteAdded => &mut self.favorite_count,
            StatEvent::ReflectionAdded => &mut self.reflections_count,
            StatEvent::DayActive => &mut self.days_active,
        };
        *counter = counter.saturating_add(1);
    }

    pub fn merge(&mut self, patch: StatsPatch) {
        raise(&mut self.total_quotes, patch.total_quotes);
        raise(&mut self.quotes_read, patch.quotes_read);
        raise(&mut self.favorite_count, patch.favorite_count);
        raise(&mut self.reflections_count, patch.reflections_count);
        raise(&mut self.days_active, patch.days_active);
        if patch.last_visit.is_some() {
            self.last_visit = patch.last_visit;
        }
    }
}

fn raise(counter: &mut u64, value: Option<u64>) {
    if let Some(v) = value {
        *counter = (*counter).max(v);
    }
}

// --- Reflections & favorites ---

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reflection {
    pub id: Uuid,
    pub text: String,
    /// The quote on screen when the reflection was written.
    #[serde(default)]
    pub quote: Option<Quote>,
    pub date: String,
}

impl Reflection {
    pub fn new(text: &str, quote: Option<Quote>) -> Self {
        Self {
            id: Uuid::new_v4(),
            text: text.trim().to_string(),
            quote,
            date: now_iso8601(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Favorite {
    pub id: Uuid,
    pub content: String,
    pub author: String,
    #[serde(default)]
    pub tags: Vec<String>,
    pub added_at: String,
}

impl Favorite {
    pub fn from_quote(quote: &Quote) -> Self {
        Self {
            id: Uuid::new_v4(),
            content: quote.content.clone(),
            author: quote.author.clone(),
            tags: quote.tags.clone(),
            added_at: now_iso8601(),
        }
    }

    /// Favorites are identified by their (content, author) pair.
    pub fn same_quote(&self, quote: &Quote) -> bool {
        self.content == quote.content && self.author == quote.author
    }
}

// --- Daily cache ---

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyQuoteCache {
    pub quote: Quote,
    /// Day key the quote was chosen for, see [`crate::time::date_key`].
    pub date: String,
}

impl DailyQuoteCache {
    pub fn new(quote: Quote, date: &str) -> Self {
        Self {
            quote,
            date: date.to_string(),
        }
    }

    pub fn is_valid_for(&self, today: &str) -> bool {
        self.date == today
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quote::QuoteSource;

    #[test]
    fn test_theme_parse() {
        assert_eq!("theme-sunset".parse::<Theme>().unwrap(), Theme::Sunset);
        assert_eq!("Forest".parse::<Theme>().unwrap(), Theme::Forest);
        assert!("neon".parse::<Theme>().is_err());
    }

    #[test]
    fn test_theme_wire_name() {
        let json = serde_json::to_string(&Theme::Cosmic).unwrap();
        assert_eq!(json, "\"theme-cosmic\"");
    }

    #[test]
    fn test_preferences_defaults() {
        let p = Preferences::default();
        assert_eq!(p.theme, Theme::Ocean);
        assert!(p.notifications);
        assert!(p.auto_save);
        assert_eq!(p.font_size, FontSize::Medium);
        assert_eq!(p.language, "en");
    }

    #[test]
    fn test_partial_preferences_document() {
        let p: Preferences = serde_json::from_str(r#"{"theme": "theme-forest"}"#).unwrap();
        assert_eq!(p.theme, Theme::Forest);
        assert_eq!(p.language, "en");
    }

    #[test]
    fn test_preferences_merge_keeps_unset() {
        let mut p = Preferences::default();
        p.merge(PreferencesPatch {
            theme: Some(Theme::Sunset),
            language: Some("fr".into()),
            ..PreferencesPatch::default()
        });
        assert_eq!(p.theme, Theme::Sunset);
        assert_eq!(p.language, "fr");
        assert!(p.notifications);
    }

    #[test]
    fn test_stats_record() {
        let mut s = Stats::default();
        s.record(StatEvent::QuoteGenerated);
        s.record(StatEvent::QuoteGenerated);
        s.record(StatEvent::FavoriteAdded);
        assert_eq!(s.total_quotes, 2);
        assert_eq!(s.favorite_count, 1);
        assert_eq!(s.quotes_read, 0);
    }

    #[test]
    fn test_stats_merge_never_decreases() {
        let mut s = Stats {
            quotes_read: 10,
            ..Stats::default()
        };
        s.merge(StatsPatch {
            quotes_read: Some(3),
            total_quotes: Some(4),
            ..StatsPatch::default()
        });
        assert_eq!(s.quotes_read, 10);
        assert_eq!(s.total_quotes, 4);
    }

    #[test]
    fn test_stats_wire_names() {
        let v = serde_json::to_value(Stats::default()).unwrap();
        assert!(v.get("totalQuotes").is_some());
        assert!(v.get("reflectionsCount").is_some());
        assert!(v.get("firstVisit").is_some());
    }

    #[test]
    fn test_favorite_identity() {
        let q = Quote::new("Be here now.", "Ram Dass", &[], QuoteSource::Api);
        let fav = Favorite::from_quote(&q);
        assert!(fav.same_quote(&q));
        let other = Quote::new("Be here now.", "Someone", &[], QuoteSource::Api);
        assert!(!fav.same_quote(&other));
    }

    #[test]
    fn test_reflection_trims_text() {
        let r = Reflection::new("  grateful today \n", None);
        assert_eq!(r.text, "grateful today");
    }

    #[test]
    fn test_daily_cache_validity() {
        let q = Quote::new("c", "a", &[], QuoteSource::Local);
        let cache = DailyQuoteCache::new(q, "Tue Jan 01 2030");
        assert!(cache.is_valid_for("Tue Jan 01 2030"));
        assert!(!cache.is_valid_for("Wed Jan 02 2030"));
    }
}

//! JSON export document.
//!
//! camelCase field names. Every section is optional on import so partial
//! or older exports still apply what they carry.

use serde::{Deserialize, Serialize};

use crate::constants::EXPORT_VERSION;
use crate::records::{DailyQuoteCache, Favorite, Preferences, Reflection, Stats};
use crate::time::now_iso8601;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportBundle {
    #[serde(default)]
    pub version: String,
    #[serde(default)]
    pub export_date: String,
    #[serde(default)]
    pub preferences: Option<Preferences>,
    #[serde(default)]
    pub stats: Option<Stats>,
    #[serde(default)]
    pub reflections: Option<Vec<Reflection>>,
    #[serde(default)]
    pub favorites: Option<Vec<Favorite>>,
    #[serde(default)]
    pub daily_quote: Option<DailyQuoteCache>,
}

impl ExportBundle {
    /// A complete snapshot stamped with the current version and time.
    pub fn snapshot(
        preferences: Preferences,
        stats: Stats,
        reflections: Vec<Reflection>,
        favorites: Vec<Favorite>,
        daily_quote: Option<DailyQuoteCache>,
    ) -> Self {
        Self {
            version: EXPORT_VERSION.to_string(),
            export_date: now_iso8601(),
            preferences: Some(preferences),
            stats: Some(stats),
            reflections: Some(reflections),
            favorites: Some(favorites),
            daily_quote,
        }
    }
}

/// Pretty-printed export document.
pub fn export_json(bundle: &ExportBundle) -> serde_json::Result<String> {
    serde_json::to_string_pretty(bundle)
}

pub fn import_json(json: &str) -> serde_json::Result<ExportBundle> {
    serde_json::from_str(json)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quote::{Quote, QuoteSource};
    use crate::records::Theme;

    #[test]
    fn test_snapshot_wire_names() {
        let bundle = ExportBundle::snapshot(
            Preferences::default(),
            Stats::default(),
            Vec::new(),
            Vec::new(),
            None,
        );
        let json = export_json(&bundle).unwrap();
        let v: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(v["version"], EXPORT_VERSION);
        assert!(v["exportDate"].as_str().unwrap().ends_with('Z'));
        assert!(v["dailyQuote"].is_null());
        assert_eq!(v["preferences"]["theme"], "theme-ocean");
    }

    #[test]
    fn test_import_partial_document() {
        let bundle = import_json(r#"{"preferences": {"theme": "theme-cosmic"}}"#).unwrap();
        assert_eq!(bundle.preferences.unwrap().theme, Theme::Cosmic);
        assert!(bundle.stats.is_none());
        assert!(bundle.favorites.is_none());
        assert_eq!(bundle.version, "");
    }

    #[test]
    fn test_import_carries_daily_quote() {
        let quote = Quote::new("c", "a", &["x"], QuoteSource::Local).into_daily();
        let bundle = ExportBundle::snapshot(
            Preferences::default(),
            Stats::default(),
            Vec::new(),
            Vec::new(),
            Some(DailyQuoteCache::new(quote.clone(), "Tue Jan 01 2030")),
        );
        let back = import_json(&export_json(&bundle).unwrap()).unwrap();
        assert_eq!(back, bundle);
        assert_eq!(back.daily_quote.unwrap().quote, quote);
    }

    #[test]
    fn test_import_rejects_non_object() {
        assert!(import_json("[1, 2, 3]").is_err());
    }
}

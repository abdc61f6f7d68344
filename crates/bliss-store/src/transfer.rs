//! Whole-state export and import.

use std::collections::HashSet;

use bliss_core::{ExportBundle, Favorite, PreferencesPatch};

use crate::accessors::keys;
use crate::kv::KvStore;

impl KvStore {
    pub fn export_data(&self) -> ExportBundle {
        ExportBundle::snapshot(
            self.preferences(),
            self.stats(),
            self.reflections(),
            self.favorites(),
            self.stored_daily_quote(),
        )
    }

    /// Apply every section present in `bundle`. Preferences merge onto the
    /// current ones, other sections replace what is stored. Returns false if
    /// any write failed.
    pub fn import_data(&self, bundle: &ExportBundle) -> bool {
        let mut ok = true;
        if let Some(prefs) = &bundle.preferences {
            ok &= self.set_preferences(PreferencesPatch::from(prefs.clone()));
        }
        if let Some(stats) = &bundle.stats {
            ok &= self.set(keys::STATS, stats);
        }
        if let Some(reflections) = &bundle.reflections {
            ok &= self.set(keys::REFLECTIONS, reflections);
        }
        if let Some(favorites) = &bundle.favorites {
            ok &= self.set(keys::FAVORITES, &dedupe_favorites(favorites));
        }
        if let Some(daily) = &bundle.daily_quote {
            ok &= self.set(keys::DAILY_QUOTE, daily);
        }
        if ok {
            tracing::info!("imported export from {}", bundle.export_date);
        }
        ok
    }
}

fn dedupe_favorites(favorites: &[Favorite]) -> Vec<Favorite> {
    let mut seen = HashSet::new();
    favorites
        .iter()
        .filter(|f| seen.insert((f.content.as_str(), f.author.as_str())))
        .cloned()
        .collect()
}

//! Passages compiled into the crate.
//!
//! The embedded collection backs the repository when the bundled document
//! cannot be loaded. The fallback quotes back the remote fetcher.

use crate::passage::{Passage, PassageCollection};
use crate::quote::{Quote, QuoteSource};

/// Minimal collection served in degraded mode.
pub fn embedded_collection() -> PassageCollection {
    let passages = vec![
        Passage::new(
            "embedded-1",
            "The present moment is the only time over which we have dominion.",
            "Thích Nhất Hạnh",
            "mindfulness",
            &["mindfulness", "present"],
        ),
        Passage::new(
            "embedded-2",
            "Your task is not to seek for love, but merely to seek and find all the barriers within yourself that you have built against it.",
            "Rumi",
            "love",
            &["love", "self-discovery"],
        ),
        Passage::new(
            "embedded-3",
            "The only way to make sense out of change is to plunge into it, move with it, and join the dance.",
            "Alan Watts",
            "change",
            &["change", "acceptance"],
        ),
        Passage::new(
            "embedded-4",
            "Peace comes from within. Do not seek it without.",
            "Buddha",
            "wisdom",
            &["peace", "inner-wisdom"],
        ),
        Passage::new(
            "embedded-5",
            "The soul becomes dyed with the color of its thoughts.",
            "Marcus Aurelius",
            "stoicism",
            &["thoughts", "soul"],
        ),
        Passage::new(
            "embedded-6",
            "The way is not in the sky. The way is in the heart.",
            "Buddha",
            "path",
            &["path", "heart"],
        ),
    ];

    let mut sources: Vec<String> = Vec::new();
    let mut categories: Vec<String> = Vec::new();
    for p in &passages {
        if !sources.contains(&p.source) {
            sources.push(p.source.clone());
        }
        if !categories.contains(&p.category) {
            categories.push(p.category.clone());
        }
    }

    PassageCollection {
        passages,
        sources,
        categories,
        version: Some("embedded".to_string()),
        last_updated: None,
    }
}

const FALLBACK: &[(&str, &str, &[&str])] = &[
    (
        "The present moment is the only time over which we have dominion.",
        "Thích Nhất Hạnh",
        &["mindfulness", "present"],
    ),
    (
        "Your task is not to seek for love, but merely to seek and find all the barriers within yourself that you have built against it.",
        "Rumi",
        &["love", "self-discovery"],
    ),
    (
        "The only way to make sense out of change is to plunge into it, move with it, and join the dance.",
        "Alan Watts",
        &["change", "acceptance"],
    ),
    (
        "Peace comes from within. Do not seek it without.",
        "Buddha",
        &["peace", "inner-wisdom"],
    ),
    (
        "Be yourself; everyone else is already taken.",
        "Oscar Wilde",
        &["authenticity", "self"],
    ),
    (
        "The way is not in the sky. The way is in the heart.",
        "Buddha",
        &["path", "heart"],
    ),
    (
        "Yesterday is history, tomorrow is a mystery, today is a gift of God, which is why we call it the present.",
        "Bill Keane",
        &["present", "gratitude"],
    ),
    (
        "The soul becomes dyed with the color of its thoughts.",
        "Marcus Aurelius",
        &["thoughts", "soul"],
    ),
];

/// Quotes served when the remote API is unreachable.
pub fn fallback_quotes() -> Vec<Quote> {
    FALLBACK
        .iter()
        .map(|(content, author, tags)| Quote::new(content, author, tags, QuoteSource::Fallback))
        .collect()
}

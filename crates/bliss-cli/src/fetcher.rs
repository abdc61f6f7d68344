//! Client for the public quotes API.
//!
//! One attempt per call, no retries. `fetch_random` reports failure to the
//! caller; the list queries answer from the embedded fallback quotes instead
//! and say so.

use std::collections::BTreeSet;
use std::future::Future;

use bliss_core::{DEFAULT_MAX_LENGTH, DEFAULT_MIN_LENGTH, Quote, QuoteSource, fallback_quotes};
use rand::Rng;
use rand::seq::IndexedRandom;
use reqwest::Client;
use serde::Deserialize;
use serde::de::DeserializeOwned;

pub const DEFAULT_API_URL: &str = "https://api.quotable.io";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FetchOptions {
    pub min_length: u32,
    pub max_length: u32,
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self {
            min_length: DEFAULT_MIN_LENGTH,
            max_length: DEFAULT_MAX_LENGTH,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("quote API answered HTTP {status}")]
    Status { status: u16 },
    #[error("quote API returned an empty quote")]
    Empty,
}

/// A value from the API, or from the fallback list when the API failed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Answer<T> {
    Remote(T),
    Fallback { value: T, reason: String },
}

impl<T> Answer<T> {
    pub fn is_fallback(&self) -> bool {
        matches!(self, Answer::Fallback { .. })
    }

    pub fn into_inner(self) -> T {
        match self {
            Answer::Remote(value) | Answer::Fallback { value, .. } => value,
        }
    }
}

pub trait QuoteFetcher: Send + Sync {
    fn fetch_random(
        &self,
        options: FetchOptions,
    ) -> impl Future<Output = Result<Quote, FetchError>> + Send;

    /// Random entry from an offline list, used when nothing else answers.
    fn fallback_quote<R: Rng + ?Sized>(&self, rng: &mut R) -> Quote;
}

// --- Wire types ---

#[derive(Deserialize)]
struct ApiQuote {
    #[serde(rename = "_id", default)]
    id: Option<String>,
    content: String,
    author: String,
    #[serde(default)]
    tags: Vec<String>,
}

impl From<ApiQuote> for Quote {
    fn from(q: ApiQuote) -> Self {
        Quote {
            content: q.content,
            author: q.author,
            tags: q.tags,
            category: None,
            id: q.id,
            source: QuoteSource::Api,
            is_daily: false,
        }
    }
}

#[derive(Deserialize)]
struct ApiPage<T> {
    #[serde(default = "Vec::new")]
    results: Vec<T>,
}

#[derive(Deserialize)]
struct Named {
    name: String,
}

// --- Client ---

pub struct RemoteFetcher {
    client: Client,
    base_url: String,
    fallback: Vec<Quote>,
}

impl RemoteFetcher {
    pub fn new(base_url: &str) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            fallback: fallback_quotes(),
        }
    }

    pub fn fallback_by_author(&self, author: &str) -> Vec<Quote> {
        let needle = author.to_lowercase();
        self.fallback
            .iter()
            .filter(|q| q.author.to_lowercase().contains(&needle))
            .cloned()
            .collect()
    }

    pub fn fallback_by_tags(&self, tags: &[String]) -> Vec<Quote> {
        self.fallback
            .iter()
            .filter(|q| q.tags.iter().any(|t| tags.contains(t)))
            .cloned()
            .collect()
    }

    pub fn fallback_authors(&self) -> Vec<String> {
        distinct(self.fallback.iter().map(|q| q.author.clone()))
    }

    pub fn fallback_tags(&self) -> Vec<String> {
        distinct(self.fallback.iter().flat_map(|q| q.tags.iter().cloned()))
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, FetchError> {
        let url = format!("{}{path}", self.base_url);
        tracing::debug!("GET {url}");
        let response = self.client.get(&url).query(query).send().await?;
        if !response.status().is_success() {
            return Err(FetchError::Status {
                status: response.status().as_u16(),
            });
        }
        Ok(response.json().await?)
    }

    pub async fn quotes_by_author(&self, author: &str) -> Answer<Vec<Quote>> {
        let query = [("author", author.to_string())];
        match self.get_json::<ApiPage<ApiQuote>>("/quotes", &query).await {
            Ok(page) => Answer::Remote(page.results.into_iter().map(Quote::from).collect()),
            Err(e) => {
                tracing::warn!("author lookup failed: {e}");
                Answer::Fallback {
                    value: self.fallback_by_author(author),
                    reason: e.to_string(),
                }
            }
        }
    }

    pub async fn quotes_by_tags(&self, tags: &[String]) -> Answer<Vec<Quote>> {
        let query = [("tags", tags.join(","))];
        match self.get_json::<ApiPage<ApiQuote>>("/quotes", &query).await {
            Ok(page) => Answer::Remote(page.results.into_iter().map(Quote::from).collect()),
            Err(e) => {
                tracing::warn!("tag lookup failed: {e}");
                Answer::Fallback {
                    value: self.fallback_by_tags(tags),
                    reason: e.to_string(),
                }
            }
        }
    }

    pub async fn authors(&self) -> Answer<Vec<String>> {
        match self.get_json::<ApiPage<Named>>("/authors", &[]).await {
            Ok(page) => Answer::Remote(page.results.into_iter().map(|a| a.name).collect()),
            Err(e) => {
                tracing::warn!("author listing failed: {e}");
                Answer::Fallback {
                    value: self.fallback_authors(),
                    reason: e.to_string(),
                }
            }
        }
    }

    pub async fn tags(&self) -> Answer<Vec<String>> {
        match self.get_json::<Vec<Named>>("/tags", &[]).await {
            Ok(tags) => Answer::Remote(tags.into_iter().map(|t| t.name).collect()),
            Err(e) => {
                tracing::warn!("tag listing failed: {e}");
                Answer::Fallback {
                    value: self.fallback_tags(),
                    reason: e.to_string(),
                }
            }
        }
    }
}

impl QuoteFetcher for RemoteFetcher {
    async fn fetch_random(&self, options: FetchOptions) -> Result<Quote, FetchError> {
        let query = [
            ("minLength", options.min_length.to_string()),
            ("maxLength", options.max_length.to_string()),
        ];
        let quote: ApiQuote = self.get_json("/random", &query).await?;
        if quote.content.trim().is_empty() {
            return Err(FetchError::Empty);
        }
        Ok(quote.into())
    }

    fn fallback_quote<R: Rng + ?Sized>(&self, rng: &mut R) -> Quote {
        self.fallback
            .choose(rng)
            .cloned()
            .unwrap_or_else(|| Quote::new("Be still.", "Unknown", &[], QuoteSource::Fallback))
    }
}

fn distinct(items: impl Iterator<Item = String>) -> Vec<String> {
    items.collect::<BTreeSet<_>>().into_iter().collect()
}

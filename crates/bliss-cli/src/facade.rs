//! One "give me a passage" operation over the local collection, the remote
//! API and the embedded defaults.
//!
//! Never fails: every path ends in some passage, and the returned
//! [`Provenance`] says which path produced it.

use std::sync::Mutex;

use bliss_core::{PassageFilter, PassageRepository, Quote, QuoteSource};
use rand::SeedableRng;
use rand::rngs::SmallRng;

use crate::fetcher::{FetchOptions, QuoteFetcher};
use crate::library::{CollectionSource, PassageLibrary};

pub trait Connectivity: Send + Sync {
    fn is_online(&self) -> bool;
}

/// Connectivity fixed at startup from configuration and flags.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct NetworkStatus {
    online: bool,
}

impl NetworkStatus {
    pub fn online() -> Self {
        Self { online: true }
    }

    pub fn offline() -> Self {
        Self { online: false }
    }
}

impl Connectivity for NetworkStatus {
    fn is_online(&self) -> bool {
        self.online
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PassageRequest {
    /// `Some(false)` sends the request to the remote API first.
    pub prefer_local: Option<bool>,
    pub filter: PassageFilter,
    pub fetch: FetchOptions,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Provenance {
    Local,
    /// Served from the embedded defaults standing in for the collection.
    LocalDegraded,
    Remote,
    /// Remote was wanted but unavailable; served locally instead.
    RemoteFallback { reason: String },
    Embedded,
}

impl Provenance {
    pub fn is_fallback(&self) -> bool {
        !matches!(self, Provenance::Local | Provenance::Remote)
    }

    pub fn describe(&self) -> String {
        match self {
            Provenance::Local => "local collection".to_string(),
            Provenance::LocalDegraded => "embedded passages (collection unavailable)".to_string(),
            Provenance::Remote => "quotes API".to_string(),
            Provenance::RemoteFallback { reason } => format!("local collection ({reason})"),
            Provenance::Embedded => "embedded passages".to_string(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Selection {
    pub quote: Quote,
    pub provenance: Provenance,
}

pub struct PassageFacade<S, F, C> {
    library: PassageLibrary<S>,
    fetcher: F,
    connectivity: C,
    rng: Mutex<SmallRng>,
}

impl<S, F, C> PassageFacade<S, F, C>
where
    S: CollectionSource,
    F: QuoteFetcher,
    C: Connectivity,
{
    pub fn new(library: PassageLibrary<S>, fetcher: F, connectivity: C) -> Self {
        Self::with_rng(library, fetcher, connectivity, SmallRng::from_os_rng())
    }

    pub fn with_rng(library: PassageLibrary<S>, fetcher: F, connectivity: C, rng: SmallRng) -> Self {
        Self {
            library,
            fetcher,
            connectivity,
            rng: Mutex::new(rng),
        }
    }

    pub fn library(&self) -> &PassageLibrary<S> {
        &self.library
    }

    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }

    pub fn is_online(&self) -> bool {
        self.connectivity.is_online()
    }

    pub async fn get_passage(&self, request: &PassageRequest) -> Selection {
        if request.prefer_local != Some(false)
            && let Some(selection) = self.local(&request.filter).await
        {
            return selection;
        }

        let reason = if self.connectivity.is_online() {
            match self.fetcher.fetch_random(request.fetch).await {
                Ok(quote) => {
                    return Selection {
                        quote,
                        provenance: Provenance::Remote,
                    };
                }
                Err(e) => {
                    tracing::warn!("remote quote failed: {e}");
                    e.to_string()
                }
            }
        } else {
            "offline".to_string()
        };

        if let Some(selection) = self.local(&request.filter).await {
            tracing::debug!("serving local passage after remote miss: {reason}");
            return Selection {
                quote: selection.quote,
                provenance: Provenance::RemoteFallback { reason },
            };
        }

        self.embedded()
    }

    /// The passage of the day for `date_key`.
    pub async fn daily(&self, date_key: &str) -> Selection {
        let repo = self.library.repository().await;
        match repo.daily(date_key) {
            Some(quote) => Selection {
                quote,
                provenance: local_provenance(repo),
            },
            None => {
                let quote = PassageRepository::embedded()
                    .daily(date_key)
                    .unwrap_or_else(last_resort);
                Selection {
                    quote,
                    provenance: Provenance::Embedded,
                }
            }
        }
    }

    async fn local(&self, filter: &PassageFilter) -> Option<Selection> {
        let repo = self.library.repository().await;
        let quote = {
            let mut rng = self.rng.lock().unwrap_or_else(|e| e.into_inner());
            repo.random(filter, &mut *rng)?
        };
        Some(Selection {
            quote,
            provenance: local_provenance(repo),
        })
    }

    fn embedded(&self) -> Selection {
        let mut rng = self.rng.lock().unwrap_or_else(|e| e.into_inner());
        let quote = self.fetcher.fallback_quote(&mut *rng);
        Selection {
            quote,
            provenance: Provenance::Embedded,
        }
    }
}

fn local_provenance(repo: &PassageRepository) -> Provenance {
    if repo.is_degraded() {
        Provenance::LocalDegraded
    } else {
        Provenance::Local
    }
}

fn last_resort() -> Quote {
    Quote::new(
        "Peace comes from within. Do not seek it without.",
        "Buddha",
        &["peace"],
        QuoteSource::Fallback,
    )
}

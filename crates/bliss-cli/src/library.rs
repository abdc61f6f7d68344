//! Memoized loading of the passage collection.
//!
//! The collection is read once per process. Concurrent callers wait on the
//! same in-flight load. Any failure degrades to the embedded defaults.

use std::future::Future;
use std::path::PathBuf;

use bliss_core::{CollectionError, PassageCollection, PassageRepository};
use tokio::sync::OnceCell;

/// Collection compiled into the binary.
pub const BUNDLED_COLLECTION: &str = include_str!("../assets/passages.json");

#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("request to {url} failed: {source}")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("{url} answered HTTP {status}")]
    Status { url: String, status: u16 },
    #[error(transparent)]
    Collection(#[from] CollectionError),
}

/// Somewhere a collection document can be read from.
pub trait CollectionSource: Send + Sync {
    fn describe(&self) -> String;
    fn read(&self) -> impl Future<Output = Result<String, LoadError>> + Send;
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ResourceLocation {
    Bundled,
    File(PathBuf),
    Url(String),
}

impl ResourceLocation {
    /// `http(s)://` locations are fetched, anything else is a file path.
    pub fn parse(location: &str) -> Self {
        let trimmed = location.trim();
        if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
            ResourceLocation::Url(trimmed.to_string())
        } else {
            ResourceLocation::File(PathBuf::from(trimmed))
        }
    }
}

impl CollectionSource for ResourceLocation {
    fn describe(&self) -> String {
        match self {
            ResourceLocation::Bundled => "bundled collection".to_string(),
            ResourceLocation::File(path) => path.display().to_string(),
            ResourceLocation::Url(url) => url.clone(),
        }
    }

    async fn read(&self) -> Result<String, LoadError> {
        match self {
            ResourceLocation::Bundled => Ok(BUNDLED_COLLECTION.to_string()),
            ResourceLocation::File(path) => {
                tokio::fs::read_to_string(path)
                    .await
                    .map_err(|source| LoadError::Io {
                        path: path.clone(),
                        source,
                    })
            }
            ResourceLocation::Url(url) => {
                let http = |source| LoadError::Http {
                    url: url.clone(),
                    source,
                };
                let response = reqwest::get(url).await.map_err(http)?;
                if !response.status().is_success() {
                    return Err(LoadError::Status {
                        url: url.clone(),
                        status: response.status().as_u16(),
                    });
                }
                response.text().await.map_err(http)
            }
        }
    }
}

struct Loaded {
    repository: PassageRepository,
    failure: Option<String>,
}

pub struct PassageLibrary<S> {
    source: S,
    loaded: OnceCell<Loaded>,
}

impl<S: CollectionSource> PassageLibrary<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            loaded: OnceCell::new(),
        }
    }

    /// A library whose load already happened and produced `repository`.
    #[cfg(test)]
    pub fn with_repository(source: S, repository: PassageRepository) -> Self {
        Self {
            source,
            loaded: OnceCell::new_with(Some(Loaded {
                repository,
                failure: None,
            })),
        }
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded.initialized()
    }

    /// The active repository, loading it on first use.
    pub async fn repository(&self) -> &PassageRepository {
        &self.loaded().await.repository
    }

    /// Why the last load degraded, if it did.
    pub async fn failure(&self) -> Option<&str> {
        self.loaded().await.failure.as_deref()
    }

    async fn loaded(&self) -> &Loaded {
        self.loaded.get_or_init(|| self.load()).await
    }

    async fn load(&self) -> Loaded {
        match self.try_load().await {
            Ok(repository) => Loaded {
                repository,
                failure: None,
            },
            Err(e) => {
                tracing::warn!(
                    "failed to load {}: {e}; using embedded passages",
                    self.source.describe()
                );
                Loaded {
                    repository: PassageRepository::embedded(),
                    failure: Some(e.to_string()),
                }
            }
        }
    }

    async fn try_load(&self) -> Result<PassageRepository, LoadError> {
        let raw = self.source.read().await?;
        let mut collection = PassageCollection::from_json(&raw)?;
        let dropped = collection.dedupe_ids();
        if dropped > 0 {
            tracing::warn!("dropped {dropped} passages with duplicate ids");
        }
        tracing::debug!(
            "loaded {} passages from {}",
            collection.passages.len(),
            self.source.describe()
        );
        Ok(PassageRepository::new(collection))
    }
}

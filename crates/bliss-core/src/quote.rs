use serde::{Deserialize, Serialize};

use crate::passage::Passage;

/// Where a quote came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuoteSource {
    Local,
    Api,
    Fallback,
}

impl QuoteSource {
    pub fn as_str(self) -> &'static str {
        match self {
            QuoteSource::Local => "local",
            QuoteSource::Api => "api",
            QuoteSource::Fallback => "fallback",
        }
    }
}

/// Normalized, display-facing quote shape shared by every source.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quote {
    pub content: String,
    pub author: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub source: QuoteSource,
    #[serde(rename = "isDaily", default, skip_serializing_if = "std::ops::Not::not")]
    pub is_daily: bool,
}

impl Quote {
    pub fn new(content: &str, author: &str, tags: &[&str], source: QuoteSource) -> Self {
        Self {
            content: content.to_string(),
            author: author.to_string(),
            tags: tags.iter().map(|t| t.to_string()).collect(),
            category: None,
            id: None,
            source,
            is_daily: false,
        }
    }

    pub fn into_daily(mut self) -> Self {
        self.is_daily = true;
        self
    }

    /// `— Author`, as printed under the quote.
    pub fn attribution(&self) -> String {
        format!("— {}", self.author)
    }
}

impl From<&Passage> for Quote {
    fn from(p: &Passage) -> Self {
        Self {
            content: p.text.clone(),
            author: p.source.clone(),
            tags: p.tags.iter().cloned().collect(),
            category: (!p.category.is_empty()).then(|| p.category.clone()),
            id: Some(p.id.clone()),
            source: QuoteSource::Local,
            is_daily: false,
        }
    }
}

use std::collections::{BTreeSet, HashSet};

use serde::{Deserialize, Deserializer, Serialize};

/// A quotable text unit with attribution and classification.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Passage {
    #[serde(deserialize_with = "id_from_text_or_number")]
    pub id: String,
    pub text: String,
    /// Author or origin, e.g. "Buddha" or "Tao Te Ching".
    pub source: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub tags: BTreeSet<String>,
}

impl Passage {
    pub fn new(id: &str, text: &str, source: &str, category: &str, tags: &[&str]) -> Self {
        Self {
            id: id.to_string(),
            text: text.to_string(),
            source: source.to_string(),
            category: category.to_string(),
            tags: tags.iter().map(|t| t.to_string()).collect(),
        }
    }

    pub fn has_any_tag(&self, tags: &[String]) -> bool {
        tags.iter().any(|t| self.tags.contains(t))
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CollectionError {
    #[error("invalid collection document: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("collection contains no passages")]
    Empty,
}

/// The bundled passage document.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct PassageCollection {
    pub passages: Vec<Passage>,
    #[serde(default)]
    pub sources: Vec<String>,
    #[serde(default)]
    pub categories: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(rename = "lastUpdated", default, skip_serializing_if = "Option::is_none")]
    pub last_updated: Option<String>,
}

impl PassageCollection {
    pub fn new(passages: Vec<Passage>) -> Self {
        Self {
            passages,
            ..Self::default()
        }
    }

    /// Parse a collection document. A document without passages is an error.
    pub fn from_json(json: &str) -> Result<Self, CollectionError> {
        let collection: PassageCollection = serde_json::from_str(json)?;
        if collection.passages.is_empty() {
            return Err(CollectionError::Empty);
        }
        Ok(collection)
    }

    /// Drop passages whose id was already seen. First occurrence wins.
    /// Returns the number of passages removed.
    pub fn dedupe_ids(&mut self) -> usize {
        let before = self.passages.len();
        let mut seen = HashSet::new();
        self.passages.retain(|p| seen.insert(p.id.clone()));
        before - self.passages.len()
    }
}

fn id_from_text_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Text(String),
        Number(i64),
    }

    Ok(match RawId::deserialize(deserializer)? {
        RawId::Text(s) => s,
        RawId::Number(n) => n.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const DOC: &str = r#"{
        "version": "2.1",
        "lastUpdated": "2025-01-01",
        "sources": ["Buddha"],
        "categories": ["wisdom"],
        "passages": [
            {"id": "b1", "text": "Peace comes from within.", "source": "Buddha",
             "category": "wisdom", "tags": ["peace", "inner-wisdom"]},
            {"id": 7, "text": "Be here now.", "source": "Ram Dass"}
        ]
    }"#;

    #[test]
    fn test_parse_full_document() {
        let c = PassageCollection::from_json(DOC).unwrap();
        assert_eq!(c.passages.len(), 2);
        assert_eq!(c.version.as_deref(), Some("2.1"));
        assert_eq!(c.last_updated.as_deref(), Some("2025-01-01"));
        assert!(c.passages[0].tags.contains("peace"));
    }

    #[test]
    fn test_numeric_ids_become_strings() {
        let c = PassageCollection::from_json(DOC).unwrap();
        assert_eq!(c.passages[1].id, "7");
        assert!(c.passages[1].tags.is_empty());
        assert_eq!(c.passages[1].category, "");
    }

    #[test]
    fn test_missing_passages_field_is_error() {
        let err = PassageCollection::from_json(r#"{"sources": []}"#).unwrap_err();
        assert!(matches!(err, CollectionError::Parse(_)));
    }

    #[test]
    fn test_empty_passages_is_error() {
        let err = PassageCollection::from_json(r#"{"passages": []}"#).unwrap_err();
        assert!(matches!(err, CollectionError::Empty));
    }

    #[test]
    fn test_garbage_is_error() {
        assert!(PassageCollection::from_json("<html>").is_err());
    }

    #[test]
    fn test_dedupe_keeps_first() {
        let mut c = PassageCollection::new(vec![
            Passage::new("a", "first", "X", "c", &[]),
            Passage::new("b", "other", "Y", "c", &[]),
            Passage::new("a", "second", "Z", "c", &[]),
        ]);
        assert_eq!(c.dedupe_ids(), 1);
        assert_eq!(c.passages.len(), 2);
        assert_eq!(c.passages[0].text, "first");
    }

    #[test]
    fn test_has_any_tag() {
        let p = Passage::new("a", "t", "s", "c", &["love", "peace"]);
        assert!(p.has_any_tag(&["joy".into(), "peace".into()]));
        assert!(!p.has_any_tag(&["joy".into()]));
        assert!(!p.has_any_tag(&[]));
    }
}

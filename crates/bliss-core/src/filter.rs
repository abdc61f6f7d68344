use crate::passage::Passage;

/// Optional narrowing of the passage pool. Set fields combine with AND.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PassageFilter {
    /// Case-insensitive substring of the passage source.
    pub source: Option<String>,
    /// Exact category.
    pub category: Option<String>,
    /// Passage must carry at least one of these tags.
    pub tags: Vec<String>,
    /// Exact passage id.
    pub id: Option<String>,
}

impl PassageFilter {
    pub fn by_source(source: &str) -> Self {
        Self {
            source: Some(source.to_string()),
            ..Self::default()
        }
    }

    pub fn by_category(category: &str) -> Self {
        Self {
            category: Some(category.to_string()),
            ..Self::default()
        }
    }

    pub fn by_tags(tags: &[&str]) -> Self {
        Self {
            tags: tags.iter().map(|t| t.to_string()).collect(),
            ..Self::default()
        }
    }

    pub fn by_id(id: &str) -> Self {
        Self {
            id: Some(id.to_string()),
            ..Self::default()
        }
    }

    /// True when no field would narrow anything. Blank strings count as unset.
    pub fn is_empty(&self) -> bool {
        blank(&self.source) && blank(&self.category) && blank(&self.id) && self.tags.is_empty()
    }

    pub fn matches(&self, passage: &Passage) -> bool {
        if let Some(source) = present(&self.source)
            && !passage
                .source
                .to_lowercase()
                .contains(&source.to_lowercase())
        {
            return false;
        }
        if let Some(category) = present(&self.category)
            && passage.category != category
        {
            return false;
        }
        if !self.tags.is_empty() && !passage.has_any_tag(&self.tags) {
            return false;
        }
        if let Some(id) = present(&self.id)
            && passage.id != id
        {
            return false;
        }
        true
    }

    /// Passages matching the filter. Falls back to the full slice when the
    /// filter leaves nothing; the flag reports whether that happened.
    pub fn apply<'a>(&self, passages: &'a [Passage]) -> (Vec<&'a Passage>, bool) {
        if self.is_empty() {
            return (passages.iter().collect(), false);
        }
        let matched: Vec<&Passage> = passages.iter().filter(|p| self.matches(p)).collect();
        if matched.is_empty() {
            (passages.iter().collect(), true)
        } else {
            (matched, false)
        }
    }
}

fn present(field: &Option<String>) -> Option<&str> {
    field.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

fn blank(field: &Option<String>) -> bool {
    present(field).is_none()
}

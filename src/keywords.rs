//! Keyword normalization and case-insensitive substring matching.

/// Ordered list of lowercase, trimmed, non-empty keywords.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeywordSet {
    keywords: Vec<String>,
}

impl KeywordSet {
    /// Normalize raw keywords: trim, lowercase, drop empties and repeats.
    pub fn new<I, S>(raw: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut keywords: Vec<String> = Vec::new();
        for kw in raw {
            let kw = kw.as_ref().trim().to_lowercase();
            if !kw.is_empty() && !keywords.contains(&kw) {
                keywords.push(kw);
            }
        }
        Self { keywords }
    }

    pub fn as_slice(&self) -> &[String] {
        &self.keywords
    }

    pub fn is_empty(&self) -> bool {
        self.keywords.is_empty()
    }

    pub fn len(&self) -> usize {
        self.keywords.len()
    }

    /// First keyword contained anywhere in `text`, ignoring case.
    pub fn find(&self, text: &str) -> Option<&str> {
        if text.is_empty() {
            return None;
        }
        let hay = text.to_lowercase();
        self.keywords
            .iter()
            .find(|kw| hay.contains(kw.as_str()))
            .map(String::as_str)
    }
}

/// Whether `text` contains any keyword. Absent or empty text never matches.
pub fn has_keyword(text: Option<&str>, keywords: &KeywordSet) -> bool {
    text.is_some_and(|t| keywords.find(t).is_some())
}

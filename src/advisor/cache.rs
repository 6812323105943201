//! Per-session memo of advisor answers.

use std::collections::HashMap;

use super::model::AdviceCategory;

/// Answers keyed by (category, input text). No eviction or expiry; the cache
/// lives and dies with its session.
#[derive(Debug, Clone, Default)]
pub struct SuggestionCache {
    entries: HashMap<(AdviceCategory, String), String>,
}

impl SuggestionCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, category: AdviceCategory, input: &str) -> Option<&str> {
        self.entries
            .get(&(category, input.to_string()))
            .map(String::as_str)
    }

    pub fn insert(&mut self, category: AdviceCategory, input: impl Into<String>, answer: String) {
        self.entries.insert((category, input.into()), answer);
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hit_requires_same_category_and_input() {
        let mut cache = SuggestionCache::new();
        cache.insert(AdviceCategory::Bonuses, "course", "Add a workbook".into());

        assert_eq!(cache.get(AdviceCategory::Bonuses, "course"), Some("Add a workbook"));
        assert!(cache.get(AdviceCategory::Bonuses, "Course").is_none());
        assert!(cache.get(AdviceCategory::RiskReversal, "course").is_none());
    }

    #[test]
    fn insert_replaces_and_clear_empties() {
        let mut cache = SuggestionCache::new();
        cache.insert(AdviceCategory::DreamOutcome, "lose weight", "first".into());
        cache.insert(AdviceCategory::DreamOutcome, "lose weight", "second".into());
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.get(AdviceCategory::DreamOutcome, "lose weight"), Some("second"));

        cache.clear();
        assert!(cache.is_empty());
    }
}

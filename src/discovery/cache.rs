//! Analyzer result cache keyed by base domain.

use std::collections::HashMap;
use std::sync::Mutex;

use crate::llm::MediaJudgment;

/// Memoizes successful analyzer judgments for the lifetime of a service instance.
///
/// Entries are never evicted or invalidated; the key space is bounded by the
/// number of distinct domains seen by one process.
#[derive(Debug, Default)]
pub struct DomainCache {
    entries: Mutex<HashMap<String, MediaJudgment>>,
}

impl DomainCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, domain: &str) -> Option<MediaJudgment> {
        self.entries
            .lock()
            .ok()
            .and_then(|entries| entries.get(domain).cloned())
    }

    pub fn insert(&self, domain: String, judgment: MediaJudgment) {
        if let Ok(mut entries) = self.entries.lock() {
            entries.insert(domain, judgment);
        }
    }

    pub fn len(&self) -> usize {
        self.entries.lock().map(|e| e.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stores_and_returns_by_domain() {
        let cache = DomainCache::new();
        assert!(cache.get("example.ua").is_none());

        cache.insert(
            "example.ua".into(),
            MediaJudgment {
                domain: "example.ua".into(),
                description: "Regional news".into(),
                ..Default::default()
            },
        );

        assert_eq!(cache.len(), 1);
        assert_eq!(cache.get("example.ua").unwrap().description, "Regional news");
        assert!(cache.get("other.ua").is_none());
    }
}

use dashmap::DashMap;
use serde::Serialize;
use sha2::{Digest, Sha256};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use extract::{Participant, Relation};

use crate::NetworkMetrics;

/// Memoized network metrics keyed by input content.
///
/// Cloning shares the underlying map and counters.
#[derive(Clone)]
pub struct AnalysisCache {
    entries: Arc<DashMap<String, Arc<NetworkMetrics>>>,
    hits: Arc<AtomicU64>,
    misses: Arc<AtomicU64>,
    max_entries: usize,
}

impl AnalysisCache {
    pub fn new(max_entries: usize) -> Self {
        Self {
            entries: Arc::new(DashMap::new()),
            hits: Arc::new(AtomicU64::new(0)),
            misses: Arc::new(AtomicU64::new(0)),
            max_entries: max_entries.max(1),
        }
    }

    pub fn get(&self, key: &str) -> Option<Arc<NetworkMetrics>> {
        match self.entries.get(key) {
            Some(entry) => {
                self.hits.fetch_add(1, Ordering::Relaxed);
                Some(Arc::clone(entry.value()))
            }
            None => {
                self.misses.fetch_add(1, Ordering::Relaxed);
                None
            }
        }
    }

    pub fn insert(&self, key: String, metrics: Arc<NetworkMetrics>) {
        if self.entries.len() >= self.max_entries {
            // Simple eviction: drop a quarter when full
            let to_remove: Vec<_> = self
                .entries
                .iter()
                .take((self.max_entries / 4).max(1))
                .map(|r| r.key().clone())
                .collect();
            for key in to_remove {
                self.entries.remove(&key);
            }
            tracing::debug!(remaining = self.entries.len(), "Evicted cached analyses");
        }
        self.entries.insert(key, metrics);
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            entries: self.entries.len(),
            max_entries: self.max_entries,
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
        }
    }

    pub fn clear(&self) {
        self.entries.clear();
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheStats {
    pub entries: usize,
    pub max_entries: usize,
    pub hits: u64,
    pub misses: u64,
}

/// SHA-256 over sorted `id|name|importance` participant lines and sorted
/// `from|to|type` relation lines. Input order does not change the key.
pub fn content_key(participants: &[Participant], relations: &[Relation]) -> String {
    let mut participant_lines: Vec<String> = participants
        .iter()
        .map(|p| format!("{}|{}|{}", p.id, p.name, p.importance.as_str()))
        .collect();
    participant_lines.sort_unstable();

    let mut relation_lines: Vec<String> = relations
        .iter()
        .map(|r| format!("{}|{}|{}", r.from_id, r.to_id, r.relation_type))
        .collect();
    relation_lines.sort_unstable();

    let mut hasher = Sha256::new();
    for line in &participant_lines {
        hasher.update(line.as_bytes());
        hasher.update(b"\n");
    }
    // separates the two sections so a participant line can never pose as a relation
    hasher.update(b"--\n");
    for line in &relation_lines {
        hasher.update(line.as_bytes());
        hasher.update(b"\n");
    }
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;
    use extract::{Importance, ParticipantType, RelationType, Strength};

    fn org(name: &str, importance: Importance) -> Participant {
        Participant::new(name, ParticipantType::Organization, "", importance, 0, 0.5)
    }

    #[test]
    fn test_key_ignores_order() {
        let a = org("甲", Importance::High);
        let b = org("乙", Importance::Low);
        let r = Relation::new(&a.id, &b.id, RelationType::Influence, Strength::Weak, "");

        let forward = content_key(&[a.clone(), b.clone()], &[r.clone()]);
        let reverse = content_key(&[b, a], &[r]);
        assert_eq!(forward, reverse);
        assert_eq!(forward.len(), 64);
    }

    #[test]
    fn test_key_covers_importance_and_relation_type() {
        let a = org("甲", Importance::High);
        let b = org("乙", Importance::Low);
        let influence = Relation::new(&a.id, &b.id, RelationType::Influence, Strength::Weak, "");
        let supervision = Relation::new(&a.id, &b.id, RelationType::Supervision, Strength::Weak, "");

        let base = content_key(&[a.clone(), b.clone()], &[influence.clone()]);
        assert_ne!(base, content_key(&[a.clone(), b.clone()], &[supervision]));
        assert_ne!(base, content_key(&[a, org("乙", Importance::High)], &[influence]));
    }

    #[test]
    fn test_eviction_keeps_cache_bounded() {
        let cache = AnalysisCache::new(8);
        for i in 0..20 {
            cache.insert(format!("key-{}", i), Arc::new(NetworkMetrics::default()));
        }

        assert!(cache.stats().entries <= 8);
        assert!(cache.get("key-19").is_some());
    }

    #[test]
    fn test_hit_and_miss_counters() {
        let cache = AnalysisCache::new(4);
        cache.insert("k".to_string(), Arc::new(NetworkMetrics::default()));

        assert!(cache.get("k").is_some());
        assert!(cache.get("other").is_none());

        let stats = cache.stats();
        assert_eq!((stats.hits, stats.misses), (1, 1));

        cache.clear();
        assert_eq!(cache.stats().entries, 0);
    }
}

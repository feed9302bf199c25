use indexmap::IndexMap;
use parking_lot::RwLock;

use crate::allocator::Recommendation;

/// Stores the most recent allocation plan, keyed by incident id.
///
/// Each run replaces the whole mapping atomically; there is no
/// incremental merge. A `None` from [`Self::get`] means "no
/// recommendation computed" (stale cache, unknown incident, or incident
/// filtered upstream) and is distinct from an empty recommendation.
#[derive(Debug, Default)]
pub struct RecommendationCache {
    plan: RwLock<IndexMap<String, Recommendation>>,
}

impl RecommendationCache {
    /// Creates an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the cached recommendation for an incident, if one exists.
    #[must_use]
    pub fn get(&self, incident_id: &str) -> Option<Recommendation> {
        self.plan.read().get(incident_id).cloned()
    }

    /// Whether any plan has been cached for the incident.
    #[must_use]
    pub fn contains(&self, incident_id: &str) -> bool {
        self.plan.read().contains_key(incident_id)
    }

    /// Snapshot of the whole cached plan, in rank order.
    #[must_use]
    pub fn snapshot(&self) -> IndexMap<String, Recommendation> {
        self.plan.read().clone()
    }

    /// Replaces the entire cached plan with a fresh run's output.
    pub fn replace_all(&self, plan: IndexMap<String, Recommendation>) {
        *self.plan.write() = plan;
    }

    /// Drops everything, e.g. after the incident feed is reloaded.
    pub fn clear(&self) {
        self.plan.write().clear();
    }

    /// Number of incidents covered by the cached plan.
    #[must_use]
    pub fn len(&self) -> usize {
        self.plan.read().len()
    }

    /// Whether no plan is cached.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.plan.read().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plan_with(ids: &[&str]) -> IndexMap<String, Recommendation> {
        ids.iter()
            .map(|id| ((*id).to_string(), Recommendation::default()))
            .collect()
    }

    #[test]
    fn replace_all_swaps_whole_plan() {
        let cache = RecommendationCache::new();
        cache.replace_all(plan_with(&["D001", "D002"]));
        assert!(cache.contains("D001"));
        cache.replace_all(plan_with(&["D003"]));
        assert!(!cache.contains("D001"));
        assert!(cache.contains("D003"));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn absent_is_distinct_from_empty() {
        let cache = RecommendationCache::new();
        cache.replace_all(plan_with(&["D001"]));
        let cached = cache.get("D001").unwrap();
        assert!(cached.is_empty());
        assert!(cache.get("D999").is_none());
    }

    #[test]
    fn clear_empties_the_cache() {
        let cache = RecommendationCache::new();
        cache.replace_all(plan_with(&["D001"]));
        cache.clear();
        assert!(cache.is_empty());
    }
}

//! Tag-indexed cache for memoized database reads
//!
//! Reads go through [`DbCache::get_or_load`]: the loader result is stored
//! under an explicit key and registered against every tag the caller names.
//! Mutations call [`DbCache::invalidate`] with a [`CacheScope`], which drops
//! the tags' key sets and the entries behind them. Invalidating a tag that
//! holds nothing is a no-op, so invalidation is idempotent and the order of
//! overlapping invalidations does not matter.
//!
//! Entries also carry a TTL: the public banner endpoints cache under keys
//! built from caller-chosen query values, so without expiry the map would
//! grow with every distinct request. Expired entries miss on read and are
//! swept by [`DbCache::cleanup`], which the server runs on an interval.
//!
//! Entries are serialized as `serde_json::Value`, which keeps the store
//! homogeneous across result types at the cost of a round-trip per hit.

use std::collections::HashSet;
use std::sync::Arc;

use dashmap::DashMap;
use serde::Serialize;
use serde::de::DeserializeOwned;
use uuid::Uuid;

use shared::util::now_millis;

use crate::error::ServiceError;

/// Entry lifetime before a read misses again
const DEFAULT_TTL_MS: i64 = 5 * 60 * 1000;

/// The cacheable resource families
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheKind {
    Products,
    Countries,
    CountryGroups,
    Subscriptions,
}

impl CacheKind {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Products => "products",
            Self::Countries => "countries",
            Self::CountryGroups => "country-groups",
            Self::Subscriptions => "subscriptions",
        }
    }
}

/// Tag covering every entry of a kind
pub fn global_tag(kind: CacheKind) -> String {
    format!("global:{}", kind.as_str())
}

/// Tag covering one user's entries of a kind
pub fn user_tag(user_id: &str, kind: CacheKind) -> String {
    format!("user:{user_id}:{}", kind.as_str())
}

/// Tag covering one record's entries of a kind
pub fn id_tag(id: Uuid, kind: CacheKind) -> String {
    format!("id:{id}:{}", kind.as_str())
}

/// What a mutation touched; expands to the tag set to drop
#[derive(Debug, Clone)]
pub struct CacheScope<'a> {
    pub kind: CacheKind,
    pub user_id: Option<&'a str>,
    pub id: Option<Uuid>,
}

impl CacheScope<'_> {
    /// The global tag is always included; the user and id tags only
    /// when the scope names them.
    pub fn tags(&self) -> Vec<String> {
        let mut tags = vec![global_tag(self.kind)];
        if let Some(user_id) = self.user_id {
            tags.push(user_tag(user_id, self.kind));
        }
        if let Some(id) = self.id {
            tags.push(id_tag(id, self.kind));
        }
        tags
    }
}

struct CacheEntry {
    value: serde_json::Value,
    expires_at: i64,
}

/// In-process cache of memoized reads with a tag side-index
#[derive(Clone, Default)]
pub struct DbCache {
    entries: Arc<DashMap<String, CacheEntry>>,
    tag_index: Arc<DashMap<String, HashSet<String>>>,
}

impl DbCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached value for `key`, or run `load`, store its result
    /// under `key`, and register the key against every tag in `tags`.
    ///
    /// A concurrent miss on the same key may run the loader more than once;
    /// last write wins, which is harmless for pure reads.
    pub async fn get_or_load<T, F, Fut>(
        &self,
        key: String,
        tags: Vec<String>,
        load: F,
    ) -> Result<T, ServiceError>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, ServiceError>>,
    {
        self.get_or_load_with_ttl(key, tags, DEFAULT_TTL_MS, load)
            .await
    }

    async fn get_or_load_with_ttl<T, F, Fut>(
        &self,
        key: String,
        tags: Vec<String>,
        ttl_ms: i64,
        load: F,
    ) -> Result<T, ServiceError>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, ServiceError>>,
    {
        let now = now_millis();
        if let Some(hit) = self
            .entries
            .get(&key)
            .filter(|entry| entry.expires_at > now)
            .map(|entry| entry.value.clone())
            && let Ok(value) = serde_json::from_value(hit)
        {
            return Ok(value);
        }

        let fresh = load().await?;
        let entry = CacheEntry {
            value: serde_json::to_value(&fresh)?,
            expires_at: now + ttl_ms,
        };
        self.entries.insert(key.clone(), entry);
        for tag in tags {
            self.tag_index.entry(tag).or_default().insert(key.clone());
        }
        Ok(fresh)
    }

    /// Drop everything the scope's tags cover
    pub fn invalidate(&self, scope: &CacheScope<'_>) {
        for tag in scope.tags() {
            self.drop_tag(&tag);
        }
    }

    /// Sweep expired entries and the index rows that pointed at them.
    /// Run on an interval; reads never serve expired values either way.
    pub fn cleanup(&self) {
        let now = now_millis();
        self.entries.retain(|_, entry| entry.expires_at > now);
        self.tag_index.retain(|_, keys| {
            keys.retain(|key| self.entries.contains_key(key));
            !keys.is_empty()
        });
    }

    fn drop_tag(&self, tag: &str) {
        if let Some((_, keys)) = self.tag_index.remove(tag) {
            for key in keys {
                self.entries.remove(&key);
            }
        }
    }

    #[cfg(test)]
    fn len(&self) -> usize {
        self.entries.len()
    }

    #[cfg(test)]
    fn tag_count(&self) -> usize {
        self.tag_index.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    async fn load_counted(cache: &DbCache, key: &str, tags: Vec<String>, calls: &AtomicUsize) -> i64 {
        cache
            .get_or_load(key.to_string(), tags, || async {
                calls.fetch_add(1, Ordering::SeqCst);
                Ok(42i64)
            })
            .await
            .unwrap()
    }

    async fn load_expired(cache: &DbCache, key: &str, tags: Vec<String>, calls: &AtomicUsize) -> i64 {
        cache
            .get_or_load_with_ttl(key.to_string(), tags, 0, || async {
                calls.fetch_add(1, Ordering::SeqCst);
                Ok(42i64)
            })
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_hit_skips_loader() {
        let cache = DbCache::new();
        let calls = AtomicUsize::new(0);
        let tags = vec![global_tag(CacheKind::Products)];

        assert_eq!(load_counted(&cache, "k", tags.clone(), &calls).await, 42);
        assert_eq!(load_counted(&cache, "k", tags, &calls).await, 42);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_invalidate_forces_reload() {
        let cache = DbCache::new();
        let calls = AtomicUsize::new(0);
        let tags = vec![user_tag("u1", CacheKind::Products)];

        load_counted(&cache, "k", tags.clone(), &calls).await;
        cache.invalidate(&CacheScope {
            kind: CacheKind::Products,
            user_id: Some("u1"),
            id: None,
        });
        load_counted(&cache, "k", tags, &calls).await;
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_global_tag_covers_all_users() {
        let cache = DbCache::new();
        let calls = AtomicUsize::new(0);

        load_counted(
            &cache,
            "a",
            vec![global_tag(CacheKind::Products), user_tag("u1", CacheKind::Products)],
            &calls,
        )
        .await;
        load_counted(
            &cache,
            "b",
            vec![global_tag(CacheKind::Products), user_tag("u2", CacheKind::Products)],
            &calls,
        )
        .await;
        assert_eq!(cache.len(), 2);

        // Scope without user/id still drops the global tag
        cache.invalidate(&CacheScope {
            kind: CacheKind::Products,
            user_id: None,
            id: None,
        });
        assert_eq!(cache.len(), 0);
    }

    #[tokio::test]
    async fn test_invalidate_other_user_keeps_entry() {
        let cache = DbCache::new();
        let calls = AtomicUsize::new(0);

        load_counted(&cache, "a", vec![user_tag("u1", CacheKind::Products)], &calls).await;
        cache.invalidate(&CacheScope {
            kind: CacheKind::Subscriptions,
            user_id: Some("u1"),
            id: None,
        });
        load_counted(&cache, "a", vec![user_tag("u1", CacheKind::Products)], &calls).await;
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_invalidate_is_idempotent() {
        let cache = DbCache::new();
        let calls = AtomicUsize::new(0);
        let scope = CacheScope {
            kind: CacheKind::Products,
            user_id: Some("u1"),
            id: Some(Uuid::new_v4()),
        };

        load_counted(&cache, "a", scope.tags(), &calls).await;
        cache.invalidate(&scope);
        cache.invalidate(&scope);
        assert_eq!(cache.len(), 0);
    }

    #[tokio::test]
    async fn test_expired_entry_reloads() {
        let cache = DbCache::new();
        let calls = AtomicUsize::new(0);
        let tags = vec![global_tag(CacheKind::Products)];

        load_expired(&cache, "k", tags.clone(), &calls).await;
        load_expired(&cache, "k", tags, &calls).await;
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_cleanup_bounds_distinct_key_growth() {
        let cache = DbCache::new();
        let calls = AtomicUsize::new(0);
        let id = Uuid::new_v4();

        // Banner-style keys vary per request; expired ones must not linger.
        for i in 0..100 {
            let key = format!("banner:product={id}:country=US:url=https://example.com/{i}");
            load_expired(&cache, &key, vec![id_tag(id, CacheKind::Products)], &calls).await;
        }
        assert_eq!(cache.len(), 100);

        cache.cleanup();
        assert_eq!(cache.len(), 0);
        assert_eq!(cache.tag_count(), 0);
    }

    #[tokio::test]
    async fn test_cleanup_keeps_live_entries() {
        let cache = DbCache::new();
        let calls = AtomicUsize::new(0);
        let tags = vec![user_tag("u1", CacheKind::Products)];

        load_counted(&cache, "live", tags.clone(), &calls).await;
        load_expired(&cache, "stale", tags.clone(), &calls).await;

        cache.cleanup();
        assert_eq!(cache.len(), 1);

        load_counted(&cache, "live", tags, &calls).await;
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_scope_tags() {
        let id = Uuid::new_v4();
        let scope = CacheScope {
            kind: CacheKind::Countries,
            user_id: Some("u1"),
            id: Some(id),
        };
        let tags = scope.tags();
        assert_eq!(tags.len(), 3);
        assert!(tags.contains(&"global:countries".to_string()));
        assert!(tags.contains(&"user:u1:countries".to_string()));
        assert!(tags.contains(&format!("id:{id}:countries")));
    }
}

//! Cache-aside read path over persisted prefix documents

use std::sync::Arc;
use std::time::Duration;

use super::error::LookupError;
use crate::core::constants::SUGGESTION_CACHE_TTL_SECS;
use crate::data::PrefixStore;
use crate::data::cache::{CacheKey, CacheService};
use crate::data::types::SuggestionRecord;

/// Serves suggestions by exact prefix, cache first
///
/// A miss reads the store once and caches the result, including an empty
/// list when no document exists. Cache and store errors are returned as is;
/// a failing cache never falls through to the store.
pub struct SuggestCache {
    cache: Arc<CacheService>,
    store: Arc<dyn PrefixStore>,
    ttl: Duration,
}

impl SuggestCache {
    pub fn new(cache: Arc<CacheService>, store: Arc<dyn PrefixStore>) -> Self {
        Self {
            cache,
            store,
            ttl: Duration::from_secs(SUGGESTION_CACHE_TTL_SECS),
        }
    }

    /// Ranked suggestions for an exact prefix
    pub async fn lookup(&self, prefix: &str) -> Result<Vec<SuggestionRecord>, LookupError> {
        if prefix.is_empty() {
            return Err(LookupError::InvalidArgument("prefix must not be empty"));
        }

        let key = CacheKey::suggestions(prefix);
        if let Some(cached) = self.cache.get::<Vec<SuggestionRecord>>(&key).await? {
            tracing::trace!(prefix, count = cached.len(), "Suggestion cache hit");
            return Ok(cached);
        }

        let suggestions = match self.store.get_document(prefix).await? {
            Some(document) => {
                tracing::debug!(
                    prefix,
                    count = document.suggestions.len(),
                    "Suggestion cache miss, document found"
                );
                document.suggestions
            }
            None => {
                tracing::debug!(prefix, "Suggestion cache miss, no document");
                Vec::new()
            }
        };

        self.cache.set(&key, &suggestions, Some(self.ttl)).await?;
        Ok(suggestions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;

    use crate::core::config::{CacheBackendType, CacheConfig, EvictionPolicy};
    use crate::data::cache::{CacheBackend, CacheError};
    use crate::data::types::PrefixDocument;
    use crate::data::{DataError, SqliteService};
    use crate::domain::suggest::{BatchPersister, TrieBuilder, TrieFlattener};

    /// Store wrapper counting document reads
    struct CountingStore {
        inner: Arc<dyn PrefixStore>,
        reads: AtomicUsize,
    }

    #[async_trait]
    impl PrefixStore for CountingStore {
        async fn get_document(&self, key: &str) -> Result<Option<PrefixDocument>, DataError> {
            self.reads.fetch_add(1, Ordering::SeqCst);
            self.inner.get_document(key).await
        }

        async fn upsert_document(&self, document: &PrefixDocument) -> Result<(), DataError> {
            self.inner.upsert_document(document).await
        }

        async fn count_documents(&self) -> Result<u64, DataError> {
            self.inner.count_documents().await
        }

        async fn health_check(&self) -> Result<(), DataError> {
            self.inner.health_check().await
        }

        fn backend_name(&self) -> &'static str {
            "counting"
        }
    }

    /// Cache backend wrapper counting writes and recording their TTLs
    struct CountingCache {
        inner: CacheService,
        writes: AtomicUsize,
        last_ttl: std::sync::Mutex<Option<Duration>>,
    }

    #[async_trait]
    impl CacheBackend for CountingCache {
        async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, CacheError> {
            self.inner.get_raw(key).await
        }

        async fn set(
            &self,
            key: &str,
            value: Vec<u8>,
            ttl: Option<Duration>,
        ) -> Result<(), CacheError> {
            self.writes.fetch_add(1, Ordering::SeqCst);
            *self.last_ttl.lock().unwrap() = ttl;
            self.inner.set_raw(key, value, ttl).await
        }

        async fn ttl(&self, key: &str) -> Result<Option<Duration>, CacheError> {
            self.inner.ttl(key).await
        }

        async fn health_check(&self) -> Result<(), CacheError> {
            self.inner.health_check().await
        }

        fn backend_name(&self) -> &'static str {
            "counting"
        }
    }

    /// Cache backend that fails every call
    struct BrokenCache;

    #[async_trait]
    impl CacheBackend for BrokenCache {
        async fn get(&self, _key: &str) -> Result<Option<Vec<u8>>, CacheError> {
            Err(CacheError::Connection("cache down".into()))
        }

        async fn set(
            &self,
            _key: &str,
            _value: Vec<u8>,
            _ttl: Option<Duration>,
        ) -> Result<(), CacheError> {
            Err(CacheError::Connection("cache down".into()))
        }

        async fn ttl(&self, _key: &str) -> Result<Option<Duration>, CacheError> {
            Err(CacheError::Connection("cache down".into()))
        }

        async fn health_check(&self) -> Result<(), CacheError> {
            Err(CacheError::Connection("cache down".into()))
        }

        fn backend_name(&self) -> &'static str {
            "broken"
        }
    }

    struct Harness {
        lookup: SuggestCache,
        store: Arc<CountingStore>,
        cache: Arc<CountingCache>,
    }

    async fn memory_cache() -> CacheService {
        CacheService::new(&CacheConfig {
            backend: CacheBackendType::Memory,
            max_entries: 1000,
            eviction_policy: EvictionPolicy::TinyLfu,
            redis_url: None,
        })
        .await
        .unwrap()
    }

    /// Build and persist the example corpus, then wrap store and cache
    async fn harness() -> Harness {
        let sqlite: Arc<dyn PrefixStore> =
            Arc::new(Arc::new(SqliteService::open_in_memory().await.unwrap()));

        let mut builder = TrieBuilder::new();
        builder.extend(&[
            SuggestionRecord::new("cat", 10),
            SuggestionRecord::new("car", 7),
            SuggestionRecord::new("cap", 5),
            SuggestionRecord::new("cats", 3),
            SuggestionRecord::new("cards", 9),
        ]);
        let documents = TrieFlattener::flatten(builder.root());
        BatchPersister::new(Arc::clone(&sqlite))
            .persist(&documents)
            .await
            .unwrap();

        let store = Arc::new(CountingStore {
            inner: sqlite,
            reads: AtomicUsize::new(0),
        });
        let cache = Arc::new(CountingCache {
            inner: memory_cache().await,
            writes: AtomicUsize::new(0),
            last_ttl: std::sync::Mutex::new(None),
        });
        let lookup = SuggestCache::new(
            Arc::new(CacheService::with_backend(cache.clone())),
            store.clone(),
        );

        Harness {
            lookup,
            store,
            cache,
        }
    }

    #[tokio::test]
    async fn test_example_prefix_ranking() {
        let h = harness().await;

        let result = h.lookup.lookup("ca").await.unwrap();
        assert_eq!(
            result,
            vec![
                SuggestionRecord::new("cat", 10),
                SuggestionRecord::new("cards", 9),
                SuggestionRecord::new("car", 7),
                SuggestionRecord::new("cap", 5),
                SuggestionRecord::new("cats", 3),
            ]
        );
    }

    #[tokio::test]
    async fn test_miss_then_hit() {
        let h = harness().await;

        let first = h.lookup.lookup("car").await.unwrap();
        assert_eq!(h.store.reads.load(Ordering::SeqCst), 1);
        assert_eq!(h.cache.writes.load(Ordering::SeqCst), 1);
        assert_eq!(
            *h.cache.last_ttl.lock().unwrap(),
            Some(Duration::from_secs(3600))
        );

        let second = h.lookup.lookup("car").await.unwrap();
        assert_eq!(h.store.reads.load(Ordering::SeqCst), 1);
        assert_eq!(h.cache.writes.load(Ordering::SeqCst), 1);
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_negative_caching() {
        let h = harness().await;

        for _ in 0..3 {
            assert!(h.lookup.lookup("xyz").await.unwrap().is_empty());
        }
        assert_eq!(h.store.reads.load(Ordering::SeqCst), 1);
        assert_eq!(h.cache.writes.load(Ordering::SeqCst), 1);

        let remaining = h
            .cache
            .inner
            .ttl(&CacheKey::suggestions("xyz"))
            .await
            .unwrap()
            .unwrap();
        assert!(remaining <= Duration::from_secs(3600));
        assert!(remaining > Duration::from_secs(3500));
    }

    #[tokio::test]
    async fn test_empty_prefix_rejected() {
        let h = harness().await;

        let err = h.lookup.lookup("").await.unwrap_err();
        assert!(matches!(err, LookupError::InvalidArgument(_)));
        assert_eq!(h.store.reads.load(Ordering::SeqCst), 0);
        assert_eq!(h.cache.writes.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_lookup_is_exact_match() {
        let h = harness().await;

        assert!(h.lookup.lookup("CA").await.unwrap().is_empty());
        assert!(h.lookup.lookup("ca ").await.unwrap().is_empty());
        assert_eq!(h.lookup.lookup("cards").await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_cache_failure_does_not_fall_back_to_store() {
        let h = harness().await;
        let lookup = SuggestCache::new(
            Arc::new(CacheService::with_backend(Arc::new(BrokenCache))),
            h.store.clone(),
        );

        let err = lookup.lookup("ca").await.unwrap_err();
        assert!(matches!(err, LookupError::Cache(_)));
        assert_eq!(h.store.reads.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_store_failure_surfaces() {
        let sqlite = Arc::new(SqliteService::open_in_memory().await.unwrap());
        sqlite.close().await;
        let lookup = SuggestCache::new(Arc::new(memory_cache().await), Arc::new(sqlite));

        let err = lookup.lookup("ca").await.unwrap_err();
        assert!(matches!(err, LookupError::Store(_)));
    }
}

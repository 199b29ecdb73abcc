use crate::config::{DEFAULT_CACHE_CAPACITY, DEFAULT_CACHE_TTL};
use crate::error::SourceError;
use crate::query::SpeciesQuery;
use crate::source::SpeciesSource;
use bingo_types::SpeciesPool;
use moka::sync::Cache;
use std::fmt;
use std::time::Duration;

/// Caches pools from an inner source for a fixed time-to-live.
///
/// Entries are keyed by the whole query (place, pool size and months) and
/// expire `ttl` after insertion. Failures are never cached.
pub struct CachedSpeciesSource<S> {
    inner: S,
    ttl: Duration,
    entries: Cache<SpeciesQuery, SpeciesPool>,
}

impl<S: SpeciesSource> CachedSpeciesSource<S> {
    pub fn new(inner: S) -> Self {
        Self::with_ttl(inner, DEFAULT_CACHE_TTL)
    }

    pub fn with_ttl(inner: S, ttl: Duration) -> Self {
        let entries = Cache::builder()
            .max_capacity(DEFAULT_CACHE_CAPACITY)
            .time_to_live(ttl)
            .build();
        Self { inner, ttl, entries }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }

    /// Drops every cached entry.
    pub fn clear(&self) {
        self.entries.invalidate_all();
    }
}

impl<S: fmt::Debug> fmt::Debug for CachedSpeciesSource<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CachedSpeciesSource")
            .field("inner", &self.inner)
            .field("ttl", &self.ttl)
            .field("entries", &self.entries.entry_count())
            .finish()
    }
}

impl<S: SpeciesSource> SpeciesSource for CachedSpeciesSource<S> {
    fn species(&self, query: &SpeciesQuery) -> Result<SpeciesPool, SourceError> {
        if let Some(pool) = self.entries.get(query) {
            log::debug!("Species cache hit for {}", query);
            return Ok(pool);
        }

        log::debug!("Species cache miss for {}, asking {}", query, self.inner.name());
        let pool = self.inner.species(query)?;
        self.entries.insert(query.clone(), pool.clone());
        Ok(pool)
    }

    fn name(&self) -> &'static str {
        "CachedSpeciesSource"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bingo_types::Species;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Debug, Default)]
    struct CountingSource {
        calls: AtomicUsize,
        fail: bool,
    }

    impl SpeciesSource for CountingSource {
        fn species(&self, query: &SpeciesQuery) -> Result<SpeciesPool, SourceError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(SourceError::PlaceNotFound {
                    place_id: query.place_id,
                    path: "missing.json".into(),
                });
            }
            let species = (0..query.top_n as u64).map(|i| Species::new(i, format!("Taxon {}", i)));
            Ok(SpeciesPool::ranked(species, query.top_n))
        }

        fn name(&self) -> &'static str {
            "CountingSource"
        }
    }

    #[test]
    fn test_repeated_query_served_from_cache() {
        let cache = CachedSpeciesSource::new(CountingSource::default());
        let query = SpeciesQuery::new(1, 5);

        let first = cache.species(&query).unwrap();
        let second = cache.species(&query).unwrap();
        assert_eq!(first, second);
        assert_eq!(cache.inner().calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_distinct_queries_cached_separately() {
        let cache = CachedSpeciesSource::new(CountingSource::default());
        cache.species(&SpeciesQuery::new(1, 5)).unwrap();
        cache.species(&SpeciesQuery::new(1, 6)).unwrap();
        cache.species(&SpeciesQuery::new(1, 5).with_months(&[4]).unwrap()).unwrap();
        assert_eq!(cache.inner().calls.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn test_expired_entries_are_refetched() {
        let cache = CachedSpeciesSource::with_ttl(CountingSource::default(), Duration::ZERO);
        let query = SpeciesQuery::new(1, 5);
        cache.species(&query).unwrap();
        cache.species(&query).unwrap();
        assert_eq!(cache.inner().calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_expired_entries_are_evicted() {
        let cache = CachedSpeciesSource::with_ttl(CountingSource::default(), Duration::from_millis(1));
        for place in 1..=200 {
            cache.species(&SpeciesQuery::new(place, 3)).unwrap();
        }
        std::thread::sleep(Duration::from_millis(20));
        cache.entries.run_pending_tasks();
        assert_eq!(cache.entries.entry_count(), 0);
    }

    #[test]
    fn test_errors_are_not_cached() {
        let failing = CountingSource {
            fail: true,
            ..Default::default()
        };
        let cache = CachedSpeciesSource::new(failing);
        let query = SpeciesQuery::new(1, 5);
        assert!(cache.species(&query).is_err());
        assert!(cache.species(&query).is_err());
        assert_eq!(cache.inner().calls.load(Ordering::SeqCst), 2);
        cache.entries.run_pending_tasks();
        assert_eq!(cache.entries.entry_count(), 0);
    }

    #[test]
    fn test_clear_forces_refetch() {
        let cache = CachedSpeciesSource::new(CountingSource::default());
        let query = SpeciesQuery::new(2, 3);
        cache.species(&query).unwrap();
        cache.clear();
        cache.species(&query).unwrap();
        assert_eq!(cache.inner().calls.load(Ordering::SeqCst), 2);
        assert_eq!(cache.ttl(), DEFAULT_CACHE_TTL);
    }
}

//! Memoizing wrapper around a research source.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use tracing::debug;

use super::models::{Experience, Factor, Note, Page, Strategy};
use super::{ApiError, ResearchSource};
use crate::filters::{
    ExperienceFilters, FactorFilters, FilterCodec, NoteFilters, QueryString, StrategyFilters,
};
use crate::location::View;

/// Hit/miss counters for the status line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub entries: usize,
}

struct Entry<T> {
    fetched_at: Instant,
    value: T,
}

/// Results keyed by canonical encoded query. Entries older than
/// `stale_after` are refetched and dropped on the next insert; failures are
/// never stored.
pub struct QueryCache<T> {
    entries: HashMap<String, Entry<T>>,
    stale_after: Duration,
    hits: u64,
    misses: u64,
}

impl<T: Clone> QueryCache<T> {
    pub fn new(stale_after: Duration) -> Self {
        Self {
            entries: HashMap::new(),
            stale_after,
            hits: 0,
            misses: 0,
        }
    }

    /// Canonical key for a filter object: its encoded map in key order.
    pub fn key_for(filters: &impl FilterCodec) -> String {
        QueryString::from_map(&filters.encode()).to_string()
    }

    pub fn get_or_fetch<F>(&mut self, key: String, fetch: F) -> Result<T, ApiError>
    where
        F: FnOnce() -> Result<T, ApiError>,
    {
        self.get_or_fetch_at(key, Instant::now(), fetch)
    }

    pub(crate) fn get_or_fetch_at<F>(
        &mut self,
        key: String,
        now: Instant,
        fetch: F,
    ) -> Result<T, ApiError>
    where
        F: FnOnce() -> Result<T, ApiError>,
    {
        if let Some(entry) = self.entries.get(&key)
            && now.saturating_duration_since(entry.fetched_at) < self.stale_after
        {
            self.hits += 1;
            return Ok(entry.value.clone());
        }

        self.misses += 1;
        let value = fetch()?;
        let stale_after = self.stale_after;
        self.entries
            .retain(|_, entry| now.saturating_duration_since(entry.fetched_at) < stale_after);
        self.entries.insert(
            key,
            Entry {
                fetched_at: now,
                value: value.clone(),
            },
        );
        Ok(value)
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

    pub fn hits(&self) -> u64 {
        self.hits
    }

    pub fn misses(&self) -> u64 {
        self.misses
    }
}

/// A `ResearchSource` that serves repeated identical requests from memory.
pub struct CachedSource<S> {
    inner: S,
    factors: QueryCache<Page<Factor>>,
    strategies: QueryCache<Page<Strategy>>,
    experiences: QueryCache<Page<Experience>>,
    notes: QueryCache<Page<Note>>,
}

impl<S: ResearchSource> CachedSource<S> {
    pub fn new(inner: S, stale_after: Duration) -> Self {
        Self {
            inner,
            factors: QueryCache::new(stale_after),
            strategies: QueryCache::new(stale_after),
            experiences: QueryCache::new(stale_after),
            notes: QueryCache::new(stale_after),
        }
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }

    pub fn inner_mut(&mut self) -> &mut S {
        &mut self.inner
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.factors.hits()
                + self.strategies.hits()
                + self.experiences.hits()
                + self.notes.hits(),
            misses: self.factors.misses()
                + self.strategies.misses()
                + self.experiences.misses()
                + self.notes.misses(),
            entries: self.factors.len()
                + self.strategies.len()
                + self.experiences.len()
                + self.notes.len(),
        }
    }
}

impl<S: ResearchSource> ResearchSource for CachedSource<S> {
    fn name(&self) -> String {
        self.inner.name()
    }

    fn list_factors(&mut self, filters: &FactorFilters) -> Result<Page<Factor>, ApiError> {
        let inner = &mut self.inner;
        self.factors
            .get_or_fetch(QueryCache::<Page<Factor>>::key_for(filters), || {
                inner.list_factors(filters)
            })
    }

    fn list_strategies(
        &mut self,
        filters: &StrategyFilters,
    ) -> Result<Page<Strategy>, ApiError> {
        let inner = &mut self.inner;
        self.strategies
            .get_or_fetch(QueryCache::<Page<Strategy>>::key_for(filters), || {
                inner.list_strategies(filters)
            })
    }

    fn list_experiences(
        &mut self,
        filters: &ExperienceFilters,
    ) -> Result<Page<Experience>, ApiError> {
        let inner = &mut self.inner;
        self.experiences
            .get_or_fetch(QueryCache::<Page<Experience>>::key_for(filters), || {
                inner.list_experiences(filters)
            })
    }

    fn list_notes(&mut self, filters: &NoteFilters) -> Result<Page<Note>, ApiError> {
        let inner = &mut self.inner;
        self.notes
            .get_or_fetch(QueryCache::<Page<Note>>::key_for(filters), || {
                inner.list_notes(filters)
            })
    }

    fn invalidate(&mut self, view: Option<View>) {
        debug!(view = ?view, "cache invalidated");
        match view {
            Some(View::Factors) => self.factors.clear(),
            Some(View::Strategies) => self.strategies.clear(),
            Some(View::Experiences) => self.experiences.clear(),
            Some(View::Notes) => self.notes.clear(),
            None => {
                self.factors.clear();
                self.strategies.clear();
                self.experiences.clear();
                self.notes.clear();
            }
        }
        self.inner.invalidate(view);
    }

    fn cache_stats(&self) -> Option<CacheStats> {
        Some(self.stats())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::MockSource;

    #[test]
    fn repeated_request_is_served_from_cache() {
        let mut source = CachedSource::new(MockSource::new(), Duration::from_secs(60));
        let filters = FactorFilters::default();
        let first = source.list_factors(&filters).unwrap();
        let second = source.list_factors(&filters).unwrap();
        assert_eq!(first, second);
        assert_eq!(source.inner().requests(), 1);
        assert_eq!(
            source.stats(),
            CacheStats {
                hits: 1,
                misses: 1,
                entries: 1
            }
        );
    }

    #[test]
    fn different_filters_are_different_entries() {
        let mut source = CachedSource::new(MockSource::new(), Duration::from_secs(60));
        source.list_notes(&NoteFilters::default()).unwrap();
        let second_page = NoteFilters {
            page: 2,
            ..NoteFilters::default()
        };
        source.list_notes(&second_page).unwrap();
        assert_eq!(source.inner().requests(), 2);
    }

    #[test]
    fn stale_entries_are_refetched() {
        let mut cache: QueryCache<u32> = QueryCache::new(Duration::from_secs(30));
        let start = Instant::now();
        let mut calls = 0;
        let mut fetch = |n: u32| -> Result<u32, ApiError> {
            calls += 1;
            Ok(n)
        };
        assert_eq!(cache.get_or_fetch_at("k".into(), start, || fetch(1)), Ok(1));
        assert_eq!(
            cache.get_or_fetch_at("k".into(), start + Duration::from_secs(10), || fetch(2)),
            Ok(1)
        );
        assert_eq!(
            cache.get_or_fetch_at("k".into(), start + Duration::from_secs(31), || fetch(3)),
            Ok(3)
        );
        assert_eq!(calls, 2);
    }

    #[test]
    fn inserting_drops_stale_entries_for_other_keys() {
        let mut cache: QueryCache<u32> = QueryCache::new(Duration::from_secs(30));
        let start = Instant::now();
        cache.get_or_fetch_at("page=1".into(), start, || Ok(1)).unwrap();
        cache
            .get_or_fetch_at("page=2".into(), start + Duration::from_secs(5), || Ok(2))
            .unwrap();
        assert_eq!(cache.len(), 2);

        cache
            .get_or_fetch_at("page=3".into(), start + Duration::from_secs(31), || Ok(3))
            .unwrap();
        assert_eq!(cache.len(), 2);

        cache
            .get_or_fetch_at("page=4".into(), start + Duration::from_secs(70), || Ok(4))
            .unwrap();
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn errors_are_not_cached() {
        let mut source = CachedSource::new(MockSource::new(), Duration::from_secs(60));
        source.inner_mut().set_offline(true);
        assert!(source.list_strategies(&StrategyFilters::default()).is_err());
        source.inner_mut().set_offline(false);
        assert!(source.list_strategies(&StrategyFilters::default()).is_ok());
        assert_eq!(source.inner().requests(), 2);
        assert_eq!(source.stats().entries, 1);
    }

    #[test]
    fn invalidate_drops_only_the_named_view() {
        let mut source = CachedSource::new(MockSource::new(), Duration::from_secs(60));
        source.list_factors(&FactorFilters::default()).unwrap();
        source.list_notes(&NoteFilters::default()).unwrap();
        source.invalidate(Some(View::Factors));
        source.list_factors(&FactorFilters::default()).unwrap();
        source.list_notes(&NoteFilters::default()).unwrap();
        assert_eq!(source.inner().requests(), 3);

        source.invalidate(None);
        assert_eq!(source.stats().entries, 0);
    }

    #[test]
    fn key_is_canonical() {
        let a = FactorFilters::default();
        let b = FactorFilters::decode(&QueryString::parse("order=desc&page=1&order_by=created_at"));
        assert_eq!(
            QueryCache::<()>::key_for(&a),
            QueryCache::<()>::key_for(&b)
        );
    }
}

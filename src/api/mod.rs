//! Data sources for the research lists.
//!
//! The TUI talks to a `ResearchSource`: either the REST backend
//! (`HttpSource`) or the built-in demo dataset (`MockSource`), usually
//! wrapped in a `CachedSource` so that re-rendering the same location does
//! not hit the backend again.

mod cache;
mod http;
mod mock;
mod models;

pub use cache::{CacheStats, CachedSource, QueryCache};
pub use http::HttpSource;
pub use mock::MockSource;
pub use models::{Experience, Factor, Note, Page, Strategy};

use crate::filters::{ExperienceFilters, FactorFilters, NoteFilters, StrategyFilters};
use crate::location::View;

/// Errors returned by a research source.
#[derive(Debug, Clone, PartialEq)]
pub enum ApiError {
    /// Transport failure: connection refused, timeout, TLS.
    Network(String),
    /// Response body did not decode.
    Parse(String),
    /// Backend answered with a non-2xx status.
    Server { status: u16, message: String },
    /// Base URL could not be used to build request URLs.
    InvalidUrl(String),
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ApiError::Network(msg) => write!(f, "Network error: {}", msg),
            ApiError::Parse(msg) => write!(f, "Parse error: {}", msg),
            ApiError::Server { status, message } => {
                write!(f, "Server error {}: {}", status, message)
            }
            ApiError::InvalidUrl(msg) => write!(f, "Invalid URL: {}", msg),
        }
    }
}

impl std::error::Error for ApiError {}

/// Paginated list backend.
///
/// The trait is object-safe and is used as `Box<dyn ResearchSource>`.
pub trait ResearchSource {
    /// Short label shown in the header (backend URL or "mock").
    fn name(&self) -> String;

    fn list_factors(&mut self, filters: &FactorFilters) -> Result<Page<Factor>, ApiError>;

    fn list_strategies(&mut self, filters: &StrategyFilters)
    -> Result<Page<Strategy>, ApiError>;

    fn list_experiences(
        &mut self,
        filters: &ExperienceFilters,
    ) -> Result<Page<Experience>, ApiError>;

    fn list_notes(&mut self, filters: &NoteFilters) -> Result<Page<Note>, ApiError>;

    /// Drops memoized results for one view, or all of them for `None`.
    /// Sources without a cache ignore this.
    fn invalidate(&mut self, _view: Option<View>) {}

    /// Cache counters, if the source caches.
    fn cache_stats(&self) -> Option<CacheStats> {
        None
    }
}

impl<S: ResearchSource + ?Sized> ResearchSource for Box<S> {
    fn name(&self) -> String {
        (**self).name()
    }

    fn list_factors(&mut self, filters: &FactorFilters) -> Result<Page<Factor>, ApiError> {
        (**self).list_factors(filters)
    }

    fn list_strategies(
        &mut self,
        filters: &StrategyFilters,
    ) -> Result<Page<Strategy>, ApiError> {
        (**self).list_strategies(filters)
    }

    fn list_experiences(
        &mut self,
        filters: &ExperienceFilters,
    ) -> Result<Page<Experience>, ApiError> {
        (**self).list_experiences(filters)
    }

    fn list_notes(&mut self, filters: &NoteFilters) -> Result<Page<Note>, ApiError> {
        (**self).list_notes(filters)
    }

    fn invalidate(&mut self, view: Option<View>) {
        (**self).invalidate(view)
    }

    fn cache_stats(&self) -> Option<CacheStats> {
        (**self).cache_stats()
    }
}

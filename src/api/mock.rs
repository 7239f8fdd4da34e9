//! In-memory research source with a deterministic demo dataset.
//!
//! Filtering, ordering and pagination follow the backend's list endpoints,
//! so the TUI behaves the same against `--mock` as against a server.

use std::cmp::Ordering;

use chrono::{DateTime, Duration, Utc};
use tracing::debug;

use super::models::{Experience, Factor, Note, Page, Strategy};
use super::{ApiError, ResearchSource};
use crate::filters::{
    ExperienceFilters, ExperienceOrderBy, FactorCategory, FactorFilters, FactorOrderBy, Frequency,
    NoteFilters, NoteOrderBy, NoteType, Outcome, QueryEnum, ResearchType, StrategyFilters,
    StrategyOrderBy, StrategyStatus, StrategyType,
};
use crate::table::SortDirection;

/// 2024-01-02T00:00:00Z
const EPOCH_SECS: i64 = 1_704_153_600;

const FACTOR_STEMS: &[&str] = &[
    "Reversal", "Momentum", "Book-to-price", "ROE", "Idio vol", "Earnings growth", "Amihud",
    "RSI", "Analyst revisions", "Size", "Beta", "Skewness",
];

const STRATEGY_STEMS: &[&str] = &[
    "Low vol tilt", "Value-momentum blend", "Sector neutral alpha", "GBDT ranker",
    "Pairs reversion", "Quality core", "Event drift", "Smart beta",
];

const LESSONS: &[&str] = &[
    "Survivorship bias in universe",
    "Turnover kills small-cap edge",
    "Winsorize before z-scoring",
    "Point-in-time fundamentals",
    "Neutralize industry exposure",
    "Regime shifts break IC",
];

const NOTE_STEMS: &[&str] = &[
    "Crowding in momentum",
    "Liquidity premium test",
    "Weekly recap",
    "Idea: options skew factor",
    "Backtest discrepancy",
    "Data vendor comparison",
];

const TAGS: &[&str] = &["alpha", "risk", "data", "backtest", "a-share", "us"];

fn timestamp(days: i64, hours: i64) -> DateTime<Utc> {
    DateTime::from_timestamp(EPOCH_SECS, 0).unwrap_or_default()
        + Duration::days(days)
        + Duration::hours(hours)
}

/// Cheap deterministic pseudo-random value in [0, 1).
fn jitter(seed: u64) -> f64 {
    let mut x = seed.wrapping_mul(0x9E37_79B9_7F4A_7C15).wrapping_add(0x2545_F491);
    x ^= x >> 29;
    x = x.wrapping_mul(0xBF58_476D_1CE4_E5B9);
    x ^= x >> 32;
    (x % 10_000) as f64 / 10_000.0
}

fn pick<T: Copy>(items: &[T], i: usize) -> T {
    items[i % items.len()]
}

fn tags_for(i: usize) -> Vec<String> {
    let mut tags = vec![pick(TAGS, i).to_string()];
    if i % 3 == 0 {
        tags.push(pick(TAGS, i + 2).to_string());
    }
    tags
}

/// Demo source serving generated factors, strategies, experiences and notes.
#[derive(Debug, Clone)]
pub struct MockSource {
    factors: Vec<Factor>,
    strategies: Vec<Strategy>,
    experiences: Vec<Experience>,
    notes: Vec<Note>,
    offline: bool,
    requests: u64,
}

impl Default for MockSource {
    fn default() -> Self {
        Self::new()
    }
}

impl MockSource {
    pub fn new() -> Self {
        Self {
            factors: (0..36).map(demo_factor).collect(),
            strategies: (0..30).map(demo_strategy).collect(),
            experiences: (0..24).map(demo_experience).collect(),
            notes: (0..24).map(demo_note).collect(),
            offline: false,
            requests: 0,
        }
    }

    /// Makes every following request fail with a network error.
    pub fn set_offline(&mut self, offline: bool) {
        self.offline = offline;
    }

    /// Number of list requests served, failed ones included.
    pub fn requests(&self) -> u64 {
        self.requests
    }

    fn begin(&mut self, resource: &str) -> Result<(), ApiError> {
        self.requests += 1;
        debug!(resource, requests = self.requests, "mock request");
        if self.offline {
            return Err(ApiError::Network("mock source is offline".into()));
        }
        Ok(())
    }
}

fn demo_factor(i: usize) -> Factor {
    let seed = i as u64;
    let created = timestamp(i as i64 * 3, 9);
    Factor {
        id: seed + 1,
        name: format!("{} {}", pick(FACTOR_STEMS, i), i / FACTOR_STEMS.len() + 1),
        category: pick(FactorCategory::VARIANTS, i),
        frequency: pick(Frequency::VARIANTS, i / 2),
        description: (i % 4 != 0)
            .then(|| format!("Cross-sectional {} signal", pick(FACTOR_STEMS, i).to_lowercase())),
        ic_mean: jitter(seed) * 0.14 - 0.03,
        ir: jitter(seed + 7) * 2.4 - 0.4,
        turnover: 0.05 + jitter(seed + 13) * 0.9,
        is_public: i % 3 != 1,
        created_at: created,
        updated_at: created + Duration::hours((jitter(seed + 21) * 400.0) as i64),
    }
}

fn demo_strategy(i: usize) -> Strategy {
    let seed = 1000 + i as u64;
    let status = pick(StrategyStatus::VARIANTS, i);
    let has_metrics = status == StrategyStatus::Completed || i % 5 == 1;
    let created = timestamp(i as i64 * 4 + 1, 14);
    Strategy {
        id: i as u64 + 1,
        name: format!("{} v{}", pick(STRATEGY_STEMS, i), i / STRATEGY_STEMS.len() + 1),
        strategy_type: pick(StrategyType::VARIANTS, i / 2),
        status,
        description: Some(format!("Backtest of {}", pick(STRATEGY_STEMS, i).to_lowercase())),
        annual_return: has_metrics.then(|| jitter(seed) * 0.45 - 0.08),
        sharpe_ratio: has_metrics.then(|| jitter(seed + 3) * 2.8 - 0.3),
        max_drawdown: has_metrics.then(|| -(0.04 + jitter(seed + 5) * 0.4)),
        is_favorite: i % 4 == 0,
        is_archived: i % 7 == 6,
        created_at: created,
        updated_at: created + Duration::hours((jitter(seed + 11) * 300.0) as i64),
    }
}

fn demo_experience(i: usize) -> Experience {
    let seed = 2000 + i as u64;
    let created = timestamp(i as i64 * 5 + 2, 10);
    Experience {
        id: i as u64 + 1,
        title: format!("{} ({})", pick(LESSONS, i), i + 1),
        research_type: pick(ResearchType::VARIANTS, i),
        outcome: pick(Outcome::VARIANTS, i / 2),
        importance: (i % 5) as u8 + 1,
        tags: tags_for(i),
        content: format!("Lesson recorded while working on {}.", pick(FACTOR_STEMS, i)),
        is_archived: i % 8 == 7,
        created_at: created,
        updated_at: created + Duration::hours((jitter(seed) * 500.0) as i64),
    }
}

fn demo_note(i: usize) -> Note {
    let seed = 3000 + i as u64;
    let created = timestamp(i as i64 * 2 + 3, 16);
    Note {
        id: i as u64 + 1,
        title: format!("{} #{}", pick(NOTE_STEMS, i), i + 1),
        note_type: pick(NoteType::VARIANTS, i),
        tags: tags_for(i + 1),
        content: format!("Working note on {}.", pick(STRATEGY_STEMS, i).to_lowercase()),
        is_pinned: i % 6 == 0,
        is_archived: i % 9 == 8,
        created_at: created,
        updated_at: created + Duration::hours((jitter(seed) * 200.0) as i64),
    }
}

fn matches_search(search: Option<&str>, fields: &[&str]) -> bool {
    let Some(search) = search.map(str::trim).filter(|s| !s.is_empty()) else {
        return true;
    };
    let needle = search.to_lowercase();
    fields.iter().any(|f| f.to_lowercase().contains(&needle))
}

/// Missing metrics sort after present ones regardless of direction.
fn cmp_opt(a: Option<f64>, b: Option<f64>, direction: SortDirection) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => directed(a.total_cmp(&b), direction),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

fn directed(ordering: Ordering, direction: SortDirection) -> Ordering {
    match direction {
        SortDirection::Asc => ordering,
        SortDirection::Desc => ordering.reverse(),
    }
}

fn paginate<T: Clone>(items: Vec<T>, page: u32, page_size: u32) -> Page<T> {
    let total = items.len() as u64;
    let start = (page.saturating_sub(1) as usize).saturating_mul(page_size as usize);
    Page {
        items: items
            .into_iter()
            .skip(start)
            .take(page_size as usize)
            .collect(),
        total,
        page,
        page_size,
    }
}

impl ResearchSource for MockSource {
    fn name(&self) -> String {
        "mock".to_string()
    }

    fn list_factors(&mut self, f: &FactorFilters) -> Result<Page<Factor>, ApiError> {
        self.begin("factors")?;
        let mut items: Vec<Factor> = self
            .factors
            .iter()
            .filter(|x| {
                let description = x.description.as_deref().unwrap_or("");
                matches_search(f.search.as_deref(), &[&x.name, description])
            })
            .filter(|x| f.category.is_none_or(|c| x.category == c))
            .filter(|x| f.frequency.is_none_or(|fr| x.frequency == fr))
            .filter(|x| f.is_public.is_none_or(|p| x.is_public == p))
            .cloned()
            .collect();
        items.sort_by(|a, b| {
            let ord = match f.order_by {
                FactorOrderBy::CreatedAt => a.created_at.cmp(&b.created_at),
                FactorOrderBy::UpdatedAt => a.updated_at.cmp(&b.updated_at),
                FactorOrderBy::Name => a.name.cmp(&b.name),
                FactorOrderBy::IcMean => a.ic_mean.total_cmp(&b.ic_mean),
                FactorOrderBy::Ir => a.ir.total_cmp(&b.ir),
                FactorOrderBy::Turnover => a.turnover.total_cmp(&b.turnover),
            };
            directed(ord, f.order).then(a.id.cmp(&b.id))
        });
        Ok(paginate(items, f.page, f.page_size))
    }

    fn list_strategies(&mut self, f: &StrategyFilters) -> Result<Page<Strategy>, ApiError> {
        self.begin("strategies")?;
        let mut items: Vec<Strategy> = self
            .strategies
            .iter()
            .filter(|x| {
                let description = x.description.as_deref().unwrap_or("");
                matches_search(f.search.as_deref(), &[&x.name, description])
            })
            .filter(|x| f.status.is_none_or(|s| x.status == s))
            .filter(|x| f.strategy_type.is_none_or(|t| x.strategy_type == t))
            .filter(|x| f.is_favorite.is_none_or(|v| x.is_favorite == v))
            .filter(|x| x.is_archived == f.is_archived)
            .cloned()
            .collect();
        items.sort_by(|a, b| {
            let ord = match f.order_by {
                StrategyOrderBy::CreatedAt => directed(a.created_at.cmp(&b.created_at), f.order),
                StrategyOrderBy::UpdatedAt => directed(a.updated_at.cmp(&b.updated_at), f.order),
                StrategyOrderBy::Name => directed(a.name.cmp(&b.name), f.order),
                StrategyOrderBy::AnnualReturn => cmp_opt(a.annual_return, b.annual_return, f.order),
                StrategyOrderBy::SharpeRatio => cmp_opt(a.sharpe_ratio, b.sharpe_ratio, f.order),
                StrategyOrderBy::MaxDrawdown => cmp_opt(a.max_drawdown, b.max_drawdown, f.order),
            };
            ord.then(a.id.cmp(&b.id))
        });
        Ok(paginate(items, f.page, f.page_size))
    }

    fn list_experiences(
        &mut self,
        f: &ExperienceFilters,
    ) -> Result<Page<Experience>, ApiError> {
        self.begin("experiences")?;
        let mut items: Vec<Experience> = self
            .experiences
            .iter()
            .filter(|x| matches_search(f.search.as_deref(), &[&x.title, &x.content]))
            .filter(|x| f.research_type.is_none_or(|t| x.research_type == t))
            .filter(|x| f.outcome.is_none_or(|o| x.outcome == o))
            .filter(|x| f.tag.as_ref().is_none_or(|t| x.tags.contains(t)))
            .filter(|x| x.is_archived == f.is_archived)
            .cloned()
            .collect();
        items.sort_by(|a, b| {
            let ord = match f.order_by {
                ExperienceOrderBy::CreatedAt => a.created_at.cmp(&b.created_at),
                ExperienceOrderBy::UpdatedAt => a.updated_at.cmp(&b.updated_at),
                ExperienceOrderBy::Title => a.title.cmp(&b.title),
                ExperienceOrderBy::Importance => a.importance.cmp(&b.importance),
            };
            directed(ord, f.order).then(a.id.cmp(&b.id))
        });
        Ok(paginate(items, f.page, f.page_size))
    }

    fn list_notes(&mut self, f: &NoteFilters) -> Result<Page<Note>, ApiError> {
        self.begin("notes")?;
        let mut items: Vec<Note> = self
            .notes
            .iter()
            .filter(|x| matches_search(f.search.as_deref(), &[&x.title, &x.content]))
            .filter(|x| f.note_type.is_none_or(|t| x.note_type == t))
            .filter(|x| f.tag.as_ref().is_none_or(|t| x.tags.contains(t)))
            .filter(|x| f.is_pinned.is_none_or(|p| x.is_pinned == p))
            .filter(|x| x.is_archived == f.is_archived)
            .cloned()
            .collect();
        items.sort_by(|a, b| {
            let ord = match f.order_by {
                NoteOrderBy::UpdatedAt => a.updated_at.cmp(&b.updated_at),
                NoteOrderBy::CreatedAt => a.created_at.cmp(&b.created_at),
                NoteOrderBy::Title => a.title.cmp(&b.title),
            };
            // Pinned notes stay on top.
            b.is_pinned
                .cmp(&a.is_pinned)
                .then(directed(ord, f.order))
                .then(a.id.cmp(&b.id))
        });
        Ok(paginate(items, f.page, f.page_size))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dataset_is_deterministic() {
        let a = MockSource::new();
        let b = MockSource::new();
        assert_eq!(a.factors, b.factors);
        assert_eq!(a.strategies, b.strategies);
    }

    #[test]
    fn paginates_with_total() {
        let mut source = MockSource::new();
        let filters = FactorFilters {
            page: 2,
            page_size: 10,
            ..FactorFilters::default()
        };
        let page = source.list_factors(&filters).unwrap();
        assert_eq!(page.total, 36);
        assert_eq!(page.items.len(), 10);
        assert_eq!(page.page_count(), 4);

        let last = FactorFilters {
            page: 4,
            page_size: 10,
            ..FactorFilters::default()
        };
        assert_eq!(source.list_factors(&last).unwrap().items.len(), 6);
    }

    #[test]
    fn page_past_the_end_is_empty() {
        let mut source = MockSource::new();
        let filters = NoteFilters {
            page: 99,
            ..NoteFilters::default()
        };
        let page = source.list_notes(&filters).unwrap();
        assert!(page.items.is_empty());
        assert!(page.total > 0);
    }

    #[test]
    fn orders_by_requested_field() {
        let mut source = MockSource::new();
        let filters = FactorFilters {
            order_by: FactorOrderBy::IcMean,
            order: SortDirection::Asc,
            page_size: 100,
            ..FactorFilters::default()
        };
        let items = source.list_factors(&filters).unwrap().items;
        assert!(items.windows(2).all(|w| w[0].ic_mean <= w[1].ic_mean));
    }

    #[test]
    fn missing_metrics_sort_last() {
        let mut source = MockSource::new();
        for order in [SortDirection::Asc, SortDirection::Desc] {
            let filters = StrategyFilters {
                order_by: StrategyOrderBy::SharpeRatio,
                order,
                page_size: 100,
                ..StrategyFilters::default()
            };
            let items = source.list_strategies(&filters).unwrap().items;
            let first_missing = items.iter().position(|s| s.sharpe_ratio.is_none());
            if let Some(pos) = first_missing {
                assert!(items[pos..].iter().all(|s| s.sharpe_ratio.is_none()));
            }
        }
    }

    #[test]
    fn applies_enum_filters_and_archived_flag() {
        let mut source = MockSource::new();
        let filters = StrategyFilters {
            status: Some(StrategyStatus::Failed),
            page_size: 100,
            ..StrategyFilters::default()
        };
        let page = source.list_strategies(&filters).unwrap();
        assert!(!page.items.is_empty());
        assert!(
            page.items
                .iter()
                .all(|s| s.status == StrategyStatus::Failed && !s.is_archived)
        );

        let archived = StrategyFilters {
            is_archived: true,
            page_size: 100,
            ..StrategyFilters::default()
        };
        let page = source.list_strategies(&archived).unwrap();
        assert!(!page.items.is_empty());
        assert!(page.items.iter().all(|s| s.is_archived));
    }

    #[test]
    fn search_is_case_insensitive() {
        let mut source = MockSource::new();
        let filters = FactorFilters {
            search: Some("MOMENTUM".into()),
            page_size: 100,
            ..FactorFilters::default()
        };
        let page = source.list_factors(&filters).unwrap();
        assert!(page.total > 0);
        assert!(page.items.iter().all(|f| {
            f.name.to_lowercase().contains("momentum")
                || f.description
                    .as_deref()
                    .is_some_and(|d| d.contains("momentum"))
        }));
    }

    #[test]
    fn tag_filter_matches_exact_tag() {
        let mut source = MockSource::new();
        let filters = ExperienceFilters {
            tag: Some("risk".into()),
            page_size: 100,
            ..ExperienceFilters::default()
        };
        let page = source.list_experiences(&filters).unwrap();
        assert!(page.total > 0);
        assert!(page.items.iter().all(|e| e.tags.iter().any(|t| t == "risk")));
    }

    #[test]
    fn pinned_notes_come_first() {
        let mut source = MockSource::new();
        let filters = NoteFilters {
            page_size: 100,
            ..NoteFilters::default()
        };
        let items = source.list_notes(&filters).unwrap().items;
        let pinned = items.iter().take_while(|n| n.is_pinned).count();
        assert!(pinned > 0);
        assert!(items[pinned..].iter().all(|n| !n.is_pinned));
    }

    #[test]
    fn offline_source_fails_with_network_error() {
        let mut source = MockSource::new();
        source.set_offline(true);
        let err = source.list_notes(&NoteFilters::default()).unwrap_err();
        assert!(matches!(err, ApiError::Network(_)));
        assert_eq!(source.requests(), 1);
    }
}

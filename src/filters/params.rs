//! Typed parameter readers. Invalid input never fails: each reader falls
//! back to its default.

use std::collections::BTreeMap;

use super::query::QueryReader;
use crate::table::{SortDirection, SortState};

/// Page sizes a list view accepts.
pub const PAGE_SIZES: [u32; 4] = [10, 20, 50, 100];
pub const DEFAULT_PAGE_SIZE: u32 = 20;
pub const DEFAULT_PAGE: u32 = 1;

/// Enum whose values travel as fixed query-string tokens.
pub trait QueryEnum: Sized + Copy + PartialEq + 'static {
    const VARIANTS: &'static [Self];

    fn as_param(self) -> &'static str;

    /// Human-readable name for filter bars.
    fn label(self) -> &'static str {
        self.as_param()
    }

    fn from_param(raw: &str) -> Option<Self> {
        Self::VARIANTS.iter().copied().find(|v| v.as_param() == raw)
    }

    /// Next variant, wrapping around. `None` cycles through "unset" first.
    fn cycle(current: Option<Self>) -> Option<Self> {
        match current {
            None => Self::VARIANTS.first().copied(),
            Some(value) => {
                let pos = Self::VARIANTS.iter().position(|v| *v == value)?;
                Self::VARIANTS.get(pos + 1).copied()
            }
        }
    }
}

impl QueryEnum for SortDirection {
    const VARIANTS: &'static [Self] = &[SortDirection::Asc, SortDirection::Desc];

    fn as_param(self) -> &'static str {
        match self {
            SortDirection::Asc => "asc",
            SortDirection::Desc => "desc",
        }
    }
}

/// Page number: integer ≥ 1, default 1.
pub fn read_page(q: &impl QueryReader) -> u32 {
    q.get("page")
        .and_then(|raw| raw.trim().parse::<u32>().ok())
        .filter(|&page| page >= 1)
        .unwrap_or(DEFAULT_PAGE)
}

/// Page size restricted to [`PAGE_SIZES`], default [`DEFAULT_PAGE_SIZE`].
pub fn read_page_size(q: &impl QueryReader) -> u32 {
    q.get("page_size")
        .and_then(|raw| raw.trim().parse::<u32>().ok())
        .filter(|size| PAGE_SIZES.contains(size))
        .unwrap_or(DEFAULT_PAGE_SIZE)
}

/// Tri-state boolean: only the literals `true` and `false` are accepted.
pub fn read_bool(q: &impl QueryReader, key: &str) -> Option<bool> {
    match q.get(key) {
        Some("true") => Some(true),
        Some("false") => Some(false),
        _ => None,
    }
}

/// Boolean with a hard default for missing or malformed values.
pub fn read_flag(q: &impl QueryReader, key: &str, default: bool) -> bool {
    read_bool(q, key).unwrap_or(default)
}

/// Enum with a default for missing or unknown values.
pub fn read_enum<E: QueryEnum>(q: &impl QueryReader, key: &str, default: E) -> E {
    read_opt_enum(q, key).unwrap_or(default)
}

/// Optional enum filter: unknown values read as "no filter".
pub fn read_opt_enum<E: QueryEnum>(q: &impl QueryReader, key: &str) -> Option<E> {
    q.get(key).and_then(E::from_param)
}

/// Free text; empty reads as absent.
pub fn read_text(q: &impl QueryReader, key: &str) -> Option<String> {
    q.get(key).filter(|s| !s.is_empty()).map(str::to_string)
}

/// Builds the flat string map produced by [`FilterCodec::encode`].
#[derive(Debug, Default)]
pub struct ParamWriter {
    map: BTreeMap<String, String>,
}

impl ParamWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn number(&mut self, key: &str, value: u32) -> &mut Self {
        self.map.insert(key.to_string(), value.to_string());
        self
    }

    pub fn flag(&mut self, key: &str, value: bool) -> &mut Self {
        self.map.insert(key.to_string(), value.to_string());
        self
    }

    pub fn opt_flag(&mut self, key: &str, value: Option<bool>) -> &mut Self {
        if let Some(value) = value {
            self.flag(key, value);
        }
        self
    }

    pub fn value<E: QueryEnum>(&mut self, key: &str, value: E) -> &mut Self {
        self.map.insert(key.to_string(), value.as_param().to_string());
        self
    }

    pub fn opt_value<E: QueryEnum>(&mut self, key: &str, value: Option<E>) -> &mut Self {
        if let Some(value) = value {
            self.value(key, value);
        }
        self
    }

    pub fn text(&mut self, key: &str, value: Option<&str>) -> &mut Self {
        if let Some(value) = value.filter(|s| !s.is_empty()) {
            self.map.insert(key.to_string(), value.to_string());
        }
        self
    }

    pub fn finish(&mut self) -> BTreeMap<String, String> {
        std::mem::take(&mut self.map)
    }
}

/// Conversion between a query string and a typed filter object.
pub trait FilterCodec: Sized {
    /// Every key this filter reads or writes.
    const KEYS: &'static [&'static str];

    fn decode(q: &impl QueryReader) -> Self;

    /// Flat key/value map. `None` fields and empty text are omitted.
    fn encode(&self) -> BTreeMap<String, String>;
}

/// Filters that carry pagination and an `order_by`/`order` pair.
pub trait ListFilters: FilterCodec + Clone + Default {
    type OrderBy: QueryEnum;

    fn page(&self) -> u32;
    fn set_page(&mut self, page: u32);
    fn page_size(&self) -> u32;
    fn set_page_size(&mut self, size: u32);
    fn search(&self) -> Option<&str>;
    fn set_search(&mut self, search: Option<String>);
    fn order_by(&self) -> Self::OrderBy;
    fn order(&self) -> SortDirection;
    fn set_ordering(&mut self, order_by: Self::OrderBy, order: SortDirection);

    /// Current ordering as the table widget sees it.
    fn sort_state(&self) -> SortState {
        SortState::new(self.order_by().as_param(), self.order())
    }

    /// Applies a table sort change. Fields outside the `order_by` domain
    /// are corrected to the default, as decode would.
    fn with_sort(&self, sort: &SortState) -> Self {
        let mut next = self.clone();
        let order_by =
            Self::OrderBy::from_param(&sort.field).unwrap_or(Self::default().order_by());
        next.set_ordering(order_by, sort.direction);
        next.set_page(DEFAULT_PAGE);
        next
    }
}

/// Next allowed page size, wrapping.
pub fn next_page_size(current: u32) -> u32 {
    let pos = PAGE_SIZES.iter().position(|&s| s == current).unwrap_or(0);
    PAGE_SIZES[(pos + 1) % PAGE_SIZES.len()]
}

/// Previous allowed page size, wrapping.
pub fn prev_page_size(current: u32) -> u32 {
    let pos = PAGE_SIZES.iter().position(|&s| s == current).unwrap_or(0);
    PAGE_SIZES[(pos + PAGE_SIZES.len() - 1) % PAGE_SIZES.len()]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filters::QueryString;

    #[test]
    fn page_falls_back_on_garbage_and_zero() {
        assert_eq!(read_page(&QueryString::parse("page=3")), 3);
        assert_eq!(read_page(&QueryString::parse("page=0")), 1);
        assert_eq!(read_page(&QueryString::parse("page=-4")), 1);
        assert_eq!(read_page(&QueryString::parse("page=abc")), 1);
        assert_eq!(read_page(&QueryString::parse("")), 1);
    }

    #[test]
    fn page_size_must_be_allowed() {
        assert_eq!(read_page_size(&QueryString::parse("page_size=50")), 50);
        assert_eq!(read_page_size(&QueryString::parse("page_size=33")), 20);
        assert_eq!(read_page_size(&QueryString::parse("page_size=")), 20);
    }

    #[test]
    fn bool_is_tri_state_and_strict() {
        let q = QueryString::parse("a=true&b=false&c=TRUE&d=1");
        assert_eq!(read_bool(&q, "a"), Some(true));
        assert_eq!(read_bool(&q, "b"), Some(false));
        assert_eq!(read_bool(&q, "c"), None);
        assert_eq!(read_bool(&q, "d"), None);
        assert_eq!(read_bool(&q, "missing"), None);
        assert!(!read_flag(&q, "c", false));
        assert!(read_flag(&q, "missing", true));
    }

    #[test]
    fn enum_reads_fall_back() {
        let q = QueryString::parse("order=asc&bad=sideways");
        assert_eq!(read_enum(&q, "order", SortDirection::Desc), SortDirection::Asc);
        assert_eq!(read_enum(&q, "bad", SortDirection::Desc), SortDirection::Desc);
        assert_eq!(read_opt_enum::<SortDirection>(&q, "bad"), None);
    }

    #[test]
    fn writer_omits_absent_values() {
        let map = ParamWriter::new()
            .number("page", 2)
            .opt_flag("is_public", None)
            .opt_flag("is_favorite", Some(false))
            .text("search", Some(""))
            .text("tag", None)
            .opt_value::<SortDirection>("order", None)
            .finish();
        assert_eq!(map.len(), 2);
        assert_eq!(map["page"], "2");
        assert_eq!(map["is_favorite"], "false");
    }

    #[test]
    fn cycle_walks_variants_then_unset() {
        assert_eq!(SortDirection::cycle(None), Some(SortDirection::Asc));
        assert_eq!(
            SortDirection::cycle(Some(SortDirection::Asc)),
            Some(SortDirection::Desc)
        );
        assert_eq!(SortDirection::cycle(Some(SortDirection::Desc)), None);
    }

    #[test]
    fn page_size_stepping_wraps() {
        assert_eq!(next_page_size(20), 50);
        assert_eq!(next_page_size(100), 10);
        assert_eq!(prev_page_size(10), 100);
        assert_eq!(next_page_size(33), 20);
    }
}

//! Query-string ⇄ filter-object codec for the list views.
//!
//! The location's query string is the only copy of a view's filters. Pages
//! decode it on every render and encode changes back into it; nothing here
//! keeps state between calls. Malformed input is corrected to defaults,
//! never reported.

/// Declares an enum carried in query strings and API payloads as fixed tokens.
macro_rules! query_enum {
    (
        $(#[$meta:meta])*
        pub enum $name:ident {
            $($variant:ident => ($param:literal, $label:literal)),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
        pub enum $name {
            $(#[serde(rename = $param)] $variant),+
        }

        impl $crate::filters::QueryEnum for $name {
            const VARIANTS: &'static [Self] = &[$(Self::$variant),+];

            fn as_param(self) -> &'static str {
                match self {
                    $(Self::$variant => $param),+
                }
            }

            fn label(self) -> &'static str {
                match self {
                    $(Self::$variant => $label),+
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str($crate::filters::QueryEnum::label(*self))
            }
        }
    };
}

/// Implements [`ListFilters`] for a filter struct with the common
/// `page`/`page_size`/`search`/`order_by`/`order` fields.
macro_rules! list_filters {
    ($filters:ty, $order_by:ty) => {
        impl $crate::filters::ListFilters for $filters {
            type OrderBy = $order_by;

            fn page(&self) -> u32 {
                self.page
            }

            fn set_page(&mut self, page: u32) {
                self.page = page.max(1);
            }

            fn page_size(&self) -> u32 {
                self.page_size
            }

            fn set_page_size(&mut self, size: u32) {
                self.page_size = size;
                self.page = 1;
            }

            fn search(&self) -> Option<&str> {
                self.search.as_deref()
            }

            fn set_search(&mut self, search: Option<String>) {
                self.search = search.filter(|s| !s.is_empty());
                self.page = 1;
            }

            fn order_by(&self) -> $order_by {
                self.order_by
            }

            fn order(&self) -> $crate::table::SortDirection {
                self.order
            }

            fn set_ordering(&mut self, order_by: $order_by, order: $crate::table::SortDirection) {
                self.order_by = order_by;
                self.order = order;
            }
        }
    };
}

mod experiences;
mod factors;
mod notes;
mod params;
mod query;
mod strategies;

pub use experiences::{ExperienceFilters, ExperienceOrderBy, Outcome, ResearchType};
pub use factors::{FactorCategory, FactorFilters, FactorOrderBy, Frequency};
pub use notes::{NoteFilters, NoteOrderBy, NoteType};
pub use params::{
    DEFAULT_PAGE, DEFAULT_PAGE_SIZE, FilterCodec, ListFilters, PAGE_SIZES, ParamWriter, QueryEnum,
    next_page_size, prev_page_size, read_bool, read_enum, read_flag, read_opt_enum, read_page,
    read_page_size, read_text,
};
pub use query::{QueryReader, QueryString, merge_query};
pub use strategies::{StrategyFilters, StrategyOrderBy, StrategyStatus, StrategyType};

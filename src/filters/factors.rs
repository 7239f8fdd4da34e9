//! Factor list filters.

use std::collections::BTreeMap;

use super::params::{
    DEFAULT_PAGE, DEFAULT_PAGE_SIZE, FilterCodec, ParamWriter, read_bool, read_enum,
    read_opt_enum, read_page, read_page_size, read_text,
};
use super::query::QueryReader;
use crate::table::SortDirection;

query_enum! {
    /// Economic family a factor belongs to.
    pub enum FactorCategory {
        Momentum => ("momentum", "Momentum"),
        Value => ("value", "Value"),
        Quality => ("quality", "Quality"),
        Volatility => ("volatility", "Volatility"),
        Growth => ("growth", "Growth"),
        Liquidity => ("liquidity", "Liquidity"),
        Technical => ("technical", "Technical"),
        Sentiment => ("sentiment", "Sentiment"),
    }
}

query_enum! {
    /// Rebalance frequency of a factor.
    pub enum Frequency {
        Daily => ("daily", "Daily"),
        Weekly => ("weekly", "Weekly"),
        Monthly => ("monthly", "Monthly"),
    }
}

query_enum! {
    pub enum FactorOrderBy {
        CreatedAt => ("created_at", "Created"),
        UpdatedAt => ("updated_at", "Updated"),
        Name => ("name", "Name"),
        IcMean => ("ic_mean", "IC mean"),
        Ir => ("ir", "IR"),
        Turnover => ("turnover", "Turnover"),
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FactorFilters {
    pub page: u32,
    pub page_size: u32,
    pub search: Option<String>,
    pub category: Option<FactorCategory>,
    pub frequency: Option<Frequency>,
    pub is_public: Option<bool>,
    pub order_by: FactorOrderBy,
    pub order: SortDirection,
}

impl Default for FactorFilters {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            page_size: DEFAULT_PAGE_SIZE,
            search: None,
            category: None,
            frequency: None,
            is_public: None,
            order_by: FactorOrderBy::CreatedAt,
            order: SortDirection::Desc,
        }
    }
}

impl FilterCodec for FactorFilters {
    const KEYS: &'static [&'static str] = &[
        "page",
        "page_size",
        "search",
        "category",
        "frequency",
        "is_public",
        "order_by",
        "order",
    ];

    fn decode(q: &impl QueryReader) -> Self {
        let defaults = Self::default();
        Self {
            page: read_page(q),
            page_size: read_page_size(q),
            search: read_text(q, "search"),
            category: read_opt_enum(q, "category"),
            frequency: read_opt_enum(q, "frequency"),
            is_public: read_bool(q, "is_public"),
            order_by: read_enum(q, "order_by", defaults.order_by),
            order: read_enum(q, "order", defaults.order),
        }
    }

    fn encode(&self) -> BTreeMap<String, String> {
        ParamWriter::new()
            .number("page", self.page)
            .number("page_size", self.page_size)
            .text("search", self.search.as_deref())
            .opt_value("category", self.category)
            .opt_value("frequency", self.frequency)
            .opt_flag("is_public", self.is_public)
            .value("order_by", self.order_by)
            .value("order", self.order)
            .finish()
    }
}

list_filters!(FactorFilters, FactorOrderBy);

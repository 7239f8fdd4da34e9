//! Research experience (knowledge base) list filters.

use std::collections::BTreeMap;

use super::params::{
    DEFAULT_PAGE, DEFAULT_PAGE_SIZE, FilterCodec, ParamWriter, read_enum, read_flag,
    read_opt_enum, read_page, read_page_size, read_text,
};
use super::query::QueryReader;
use crate::table::SortDirection;

query_enum! {
    pub enum ResearchType {
        FactorMining => ("factor_mining", "Factor mining"),
        StrategyOptimization => ("strategy_optimization", "Strategy optimization"),
        RiskControl => ("risk_control", "Risk control"),
        DataProcessing => ("data_processing", "Data processing"),
        General => ("general", "General"),
    }
}

query_enum! {
    /// How a recorded research attempt turned out.
    pub enum Outcome {
        Success => ("success", "Success"),
        Partial => ("partial", "Partial"),
        Failure => ("failure", "Failure"),
    }
}

query_enum! {
    pub enum ExperienceOrderBy {
        CreatedAt => ("created_at", "Created"),
        UpdatedAt => ("updated_at", "Updated"),
        Title => ("title", "Title"),
        Importance => ("importance", "Importance"),
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExperienceFilters {
    pub page: u32,
    pub page_size: u32,
    pub search: Option<String>,
    pub research_type: Option<ResearchType>,
    pub outcome: Option<Outcome>,
    pub tag: Option<String>,
    pub is_archived: bool,
    pub order_by: ExperienceOrderBy,
    pub order: SortDirection,
}

impl Default for ExperienceFilters {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            page_size: DEFAULT_PAGE_SIZE,
            search: None,
            research_type: None,
            outcome: None,
            tag: None,
            is_archived: false,
            order_by: ExperienceOrderBy::UpdatedAt,
            order: SortDirection::Desc,
        }
    }
}

impl FilterCodec for ExperienceFilters {
    const KEYS: &'static [&'static str] = &[
        "page",
        "page_size",
        "search",
        "research_type",
        "outcome",
        "tag",
        "is_archived",
        "order_by",
        "order",
    ];

    fn decode(q: &impl QueryReader) -> Self {
        let defaults = Self::default();
        Self {
            page: read_page(q),
            page_size: read_page_size(q),
            search: read_text(q, "search"),
            research_type: read_opt_enum(q, "research_type"),
            outcome: read_opt_enum(q, "outcome"),
            tag: read_text(q, "tag"),
            is_archived: read_flag(q, "is_archived", defaults.is_archived),
            order_by: read_enum(q, "order_by", defaults.order_by),
            order: read_enum(q, "order", defaults.order),
        }
    }

    fn encode(&self) -> BTreeMap<String, String> {
        ParamWriter::new()
            .number("page", self.page)
            .number("page_size", self.page_size)
            .text("search", self.search.as_deref())
            .opt_value("research_type", self.research_type)
            .opt_value("outcome", self.outcome)
            .text("tag", self.tag.as_deref())
            .flag("is_archived", self.is_archived)
            .value("order_by", self.order_by)
            .value("order", self.order)
            .finish()
    }
}

list_filters!(ExperienceFilters, ExperienceOrderBy);

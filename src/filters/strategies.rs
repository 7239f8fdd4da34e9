//! Strategy list filters.

use std::collections::BTreeMap;

use super::params::{
    DEFAULT_PAGE, DEFAULT_PAGE_SIZE, FilterCodec, ParamWriter, read_bool, read_enum, read_flag,
    read_opt_enum, read_page, read_page_size, read_text,
};
use super::query::QueryReader;
use crate::table::SortDirection;

query_enum! {
    /// Lifecycle of a backtested strategy.
    pub enum StrategyStatus {
        Draft => ("draft", "Draft"),
        Backtesting => ("backtesting", "Backtesting"),
        Completed => ("completed", "Completed"),
        Failed => ("failed", "Failed"),
    }
}

query_enum! {
    pub enum StrategyType {
        SingleFactor => ("single_factor", "Single factor"),
        MultiFactor => ("multi_factor", "Multi factor"),
        MachineLearning => ("machine_learning", "ML"),
        RuleBased => ("rule_based", "Rule based"),
    }
}

query_enum! {
    pub enum StrategyOrderBy {
        CreatedAt => ("created_at", "Created"),
        UpdatedAt => ("updated_at", "Updated"),
        Name => ("name", "Name"),
        AnnualReturn => ("annual_return", "Annual return"),
        SharpeRatio => ("sharpe_ratio", "Sharpe"),
        MaxDrawdown => ("max_drawdown", "Max drawdown"),
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StrategyFilters {
    pub page: u32,
    pub page_size: u32,
    pub search: Option<String>,
    pub status: Option<StrategyStatus>,
    pub strategy_type: Option<StrategyType>,
    pub is_favorite: Option<bool>,
    /// Archived strategies are hidden unless asked for.
    pub is_archived: bool,
    pub order_by: StrategyOrderBy,
    pub order: SortDirection,
}

impl Default for StrategyFilters {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            page_size: DEFAULT_PAGE_SIZE,
            search: None,
            status: None,
            strategy_type: None,
            is_favorite: None,
            is_archived: false,
            order_by: StrategyOrderBy::CreatedAt,
            order: SortDirection::Desc,
        }
    }
}

impl FilterCodec for StrategyFilters {
    const KEYS: &'static [&'static str] = &[
        "page",
        "page_size",
        "search",
        "status",
        "strategy_type",
        "is_favorite",
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
            status: read_opt_enum(q, "status"),
            strategy_type: read_opt_enum(q, "strategy_type"),
            is_favorite: read_bool(q, "is_favorite"),
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
            .opt_value("status", self.status)
            .opt_value("strategy_type", self.strategy_type)
            .opt_flag("is_favorite", self.is_favorite)
            .flag("is_archived", self.is_archived)
            .value("order_by", self.order_by)
            .value("order", self.order)
            .finish()
    }
}

list_filters!(StrategyFilters, StrategyOrderBy);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filters::QueryString;

    #[test]
    fn archived_flag_defaults_to_false_not_unset() {
        let f = StrategyFilters::decode(&QueryString::parse("is_archived=maybe"));
        assert!(!f.is_archived);
        let f = StrategyFilters::decode(&QueryString::parse("is_archived=true"));
        assert!(f.is_archived);
    }

    #[test]
    fn favorite_flag_is_tri_state() {
        assert_eq!(
            StrategyFilters::decode(&QueryString::parse("")).is_favorite,
            None
        );
        assert_eq!(
            StrategyFilters::decode(&QueryString::parse("is_favorite=false")).is_favorite,
            Some(false)
        );
    }

    #[test]
    fn invalid_values_are_corrected() {
        let f = StrategyFilters::decode(&QueryString::parse(
            "order_by=not_a_real_field&order=up&status=exploded&page_size=7&page=x",
        ));
        assert_eq!(f, StrategyFilters::default());
    }

    #[test]
    fn round_trip() {
        let f = StrategyFilters {
            page: 3,
            page_size: 10,
            search: Some("低波".into()),
            status: Some(StrategyStatus::Failed),
            strategy_type: Some(StrategyType::MachineLearning),
            is_favorite: Some(true),
            is_archived: true,
            order_by: StrategyOrderBy::MaxDrawdown,
            order: SortDirection::Asc,
        };
        let encoded = QueryString::from_map(&f.encode()).to_string();
        assert_eq!(StrategyFilters::decode(&QueryString::parse(&encoded)), f);
    }

    #[test]
    fn encode_uses_literal_booleans() {
        let map = StrategyFilters::default().encode();
        assert_eq!(map["is_archived"], "false");
        assert!(!map.contains_key("is_favorite"));
        assert!(!map.values().any(|v| v == "undefined" || v.is_empty()));
    }
}

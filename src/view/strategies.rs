//! Strategy list page.

use chrono::Utc;

use super::ResearchRecord;
use super::format;
use crate::api::Strategy;
use crate::table::{Align, ColumnDescriptor, ColumnError, ColumnSet, TableRow};

pub fn columns() -> Result<ColumnSet<Strategy>, ColumnError> {
    ColumnSet::new(vec![
        ColumnDescriptor::new("name", "Name", 26).sortable().bounds(8, 60),
        ColumnDescriptor::new("strategy_type", "Type", 12).bounds(4, 20),
        ColumnDescriptor::new("status", "Status", 11).bounds(6, 14),
        ColumnDescriptor::new("annual_return", "Ann. return", 11)
            .sortable()
            .align(Align::Right)
            .bounds(7, 16),
        ColumnDescriptor::new("sharpe_ratio", "Sharpe", 7)
            .sortable()
            .align(Align::Right)
            .bounds(5, 12),
        ColumnDescriptor::new("max_drawdown", "Max DD", 9)
            .sortable()
            .align(Align::Right)
            .bounds(6, 14),
        ColumnDescriptor::new("is_favorite", "Fav", 3)
            .align(Align::Center)
            .bounds(3, 6)
            .format(|s: &Strategy| if s.is_favorite { "★" } else { "" }.to_string()),
        ColumnDescriptor::new("updated_at", "Updated", 10)
            .sortable()
            .bounds(8, 24),
    ])
}

impl TableRow for Strategy {
    fn id(&self) -> u64 {
        self.id
    }

    fn cell(&self, key: &str) -> String {
        match key {
            "name" => self.name.clone(),
            "strategy_type" => self.strategy_type.to_string(),
            "status" => self.status.to_string(),
            "annual_return" => format::opt_percent(self.annual_return),
            "sharpe_ratio" => format::opt_decimal(self.sharpe_ratio, 2),
            "max_drawdown" => format::opt_percent(self.max_drawdown),
            "is_favorite" => format::flag(self.is_favorite),
            "updated_at" => format::relative(self.updated_at, Utc::now()),
            "created_at" => format::relative(self.created_at, Utc::now()),
            _ => String::new(),
        }
    }
}

impl ResearchRecord for Strategy {
    fn title(&self) -> &str {
        &self.name
    }

    fn detail(&self) -> Vec<(&'static str, String)> {
        vec![
            ("Type", self.strategy_type.to_string()),
            ("Status", self.status.to_string()),
            ("Annual return", format::opt_percent(self.annual_return)),
            ("Sharpe ratio", format::opt_decimal(self.sharpe_ratio, 3)),
            ("Max drawdown", format::opt_percent(self.max_drawdown)),
            ("Favorite", if self.is_favorite { "yes" } else { "no" }.to_string()),
            ("Archived", if self.is_archived { "yes" } else { "no" }.to_string()),
            ("Created", format::timestamp(self.created_at)),
            ("Updated", format::timestamp(self.updated_at)),
        ]
    }

    fn body(&self) -> Option<&str> {
        self.description.as_deref()
    }

    fn is_archived(&self) -> bool {
        self.is_archived
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filters::{StrategyStatus, StrategyType};
    use crate::table::CellRenderer;
    use chrono::DateTime;

    fn strategy(metrics: bool) -> Strategy {
        let ts = DateTime::from_timestamp(1_704_153_600, 0).unwrap();
        Strategy {
            id: 11,
            name: "Quality core v1".into(),
            strategy_type: StrategyType::MultiFactor,
            status: StrategyStatus::Backtesting,
            description: None,
            annual_return: metrics.then_some(0.153),
            sharpe_ratio: metrics.then_some(1.234),
            max_drawdown: metrics.then_some(-0.2),
            is_favorite: true,
            is_archived: false,
            created_at: ts,
            updated_at: ts,
        }
    }

    #[test]
    fn metrics_render_or_show_placeholder() {
        let with = strategy(true);
        assert_eq!(with.cell("annual_return"), "15.30%");
        assert_eq!(with.cell("sharpe_ratio"), "1.23");
        assert_eq!(with.cell("max_drawdown"), "-20.00%");
        let without = strategy(false);
        assert_eq!(without.cell("annual_return"), "-");
        assert_eq!(without.cell("sharpe_ratio"), "-");
    }

    #[test]
    fn favorite_column_uses_custom_formatter() {
        let columns = columns().unwrap();
        let fav = columns.get("is_favorite").unwrap();
        assert!(matches!(fav.renderer, CellRenderer::Format(_)));
        assert_eq!(fav.renderer.render(fav.key, &strategy(true)), "★");
    }
}

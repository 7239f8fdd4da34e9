//! Factor library page.

use chrono::Utc;

use super::ResearchRecord;
use super::format;
use crate::api::Factor;
use crate::table::{Align, ColumnDescriptor, ColumnError, ColumnSet, TableRow};

pub fn columns() -> Result<ColumnSet<Factor>, ColumnError> {
    ColumnSet::new(vec![
        ColumnDescriptor::new("name", "Name", 24).sortable().bounds(8, 60),
        ColumnDescriptor::new("category", "Category", 11).bounds(6, 20),
        ColumnDescriptor::new("frequency", "Freq", 8).bounds(4, 12),
        ColumnDescriptor::new("ic_mean", "IC mean", 8)
            .sortable()
            .align(Align::Right)
            .bounds(6, 14),
        ColumnDescriptor::new("ir", "IR", 7)
            .sortable()
            .align(Align::Right)
            .bounds(5, 12),
        ColumnDescriptor::new("turnover", "Turnover", 9)
            .sortable()
            .align(Align::Right)
            .bounds(6, 14),
        ColumnDescriptor::new("is_public", "Public", 6)
            .align(Align::Center)
            .bounds(4, 8),
        ColumnDescriptor::new("updated_at", "Updated", 10)
            .sortable()
            .bounds(8, 24),
    ])
}

impl TableRow for Factor {
    fn id(&self) -> u64 {
        self.id
    }

    fn cell(&self, key: &str) -> String {
        match key {
            "name" => self.name.clone(),
            "category" => self.category.to_string(),
            "frequency" => self.frequency.to_string(),
            "ic_mean" => format::decimal(self.ic_mean, 4),
            "ir" => format::decimal(self.ir, 2),
            "turnover" => format::percent(self.turnover),
            "is_public" => format::flag(self.is_public),
            "updated_at" => format::relative(self.updated_at, Utc::now()),
            "created_at" => format::relative(self.created_at, Utc::now()),
            _ => String::new(),
        }
    }
}

impl ResearchRecord for Factor {
    fn title(&self) -> &str {
        &self.name
    }

    fn detail(&self) -> Vec<(&'static str, String)> {
        vec![
            ("Category", self.category.to_string()),
            ("Frequency", self.frequency.to_string()),
            ("IC mean", format::decimal(self.ic_mean, 4)),
            ("IR", format::decimal(self.ir, 3)),
            ("Turnover", format::percent(self.turnover)),
            ("Public", if self.is_public { "yes" } else { "no" }.to_string()),
            ("Created", format::timestamp(self.created_at)),
            ("Updated", format::timestamp(self.updated_at)),
        ]
    }

    fn body(&self) -> Option<&str> {
        self.description.as_deref()
    }
}
